//! Backend pool: the ordered backend set plus the round-robin cursor.
//!
//! # Responsibilities
//! - Own the fixed, ordered backend sequence
//! - Advance the shared cursor atomically with respect to concurrent callers
//! - Skip unhealthy backends with a bounded number of attempts
//! - Record health updates from the prober

use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::http::uri::{Authority, Scheme};
use thiserror::Error;
use url::Url;

use crate::load_balancer::backend::{Backend, InvalidBackend};

/// Full rotations `select_healthy` scans before giving up.
const MAX_SELECT_LAPS: usize = 3;

/// Why a pool cannot be constructed.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("backend pool must contain at least one backend")]
    Empty,

    #[error(transparent)]
    Backend(#[from] InvalidBackend),
}

/// Selection failure: every rotation slot observed was unhealthy.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no healthy backend after {attempts} attempts")]
    NoHealthyBackend { attempts: usize },
}

/// The outcome of one cursor advance: which backend, and the pieces the
/// forwarding path needs without re-entering the lock.
#[derive(Debug, Clone)]
pub struct Selection {
    pub index: usize,
    pub scheme: Scheme,
    pub authority: Authority,
}

/// The fixed backend set and the shared round-robin cursor.
///
/// One mutex guards both the cursor and the health flags, per the pool's
/// concurrency contract: advancement, healthy-selection, and health writes
/// all contend on the same short critical section.
pub struct BackendPool {
    inner: Mutex<PoolState>,
}

#[derive(Debug)]
struct PoolState {
    backends: Vec<Backend>,
    cursor: usize,
}

impl PoolState {
    /// Step the cursor one position, wrapping at the end, and describe the
    /// backend now under it.
    fn advance(&mut self) -> Selection {
        self.cursor = (self.cursor + 1) % self.backends.len();
        let backend = &self.backends[self.cursor];
        Selection {
            index: self.cursor,
            scheme: backend.scheme.clone(),
            authority: backend.authority.clone(),
        }
    }
}

impl BackendPool {
    /// Build a pool from an ordered backend list.
    pub fn new(backends: Vec<Backend>) -> Result<Self, PoolError> {
        if backends.is_empty() {
            return Err(PoolError::Empty);
        }
        Ok(Self {
            inner: Mutex::new(PoolState {
                backends,
                cursor: 0,
            }),
        })
    }

    /// Build a pool straight from configured address strings.
    pub fn from_addresses(addresses: &[String]) -> Result<Self, PoolError> {
        let backends = addresses
            .iter()
            .map(|address| Backend::from_address(address))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(backends)
    }

    /// Advance the cursor by one position and return the backend at the new
    /// position. Pure rotation; health is not consulted.
    pub fn advance(&self) -> Selection {
        self.state().advance()
    }

    /// Advance until a healthy backend turns up, scanning at most three
    /// full rotations before reporting failure. The bound keeps a
    /// fully-unhealthy pool from turning selection into a live spin.
    pub fn select_healthy(&self) -> Result<Selection, SelectError> {
        let mut state = self.state();
        let attempts = state.backends.len() * MAX_SELECT_LAPS;

        for _ in 0..attempts {
            let selection = state.advance();
            if state.backends[selection.index].healthy {
                return Ok(selection);
            }
        }

        Err(SelectError::NoHealthyBackend { attempts })
    }

    /// Set one backend's health flag. Out-of-range indices are ignored.
    pub fn set_health(&self, index: usize, healthy: bool) {
        let mut state = self.state();
        if let Some(backend) = state.backends.get_mut(index) {
            backend.healthy = healthy;
        }
    }

    /// Read one backend's health flag.
    pub fn is_healthy(&self, index: usize) -> bool {
        self.state()
            .backends
            .get(index)
            .is_some_and(|backend| backend.healthy)
    }

    /// The fixed backend base URLs, in pool order.
    pub fn backend_urls(&self) -> Vec<Url> {
        self.state()
            .backends
            .iter()
            .map(|backend| backend.url.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The critical sections cannot panic, so a poisoned lock still holds a
    // consistent state.
    fn state(&self) -> MutexGuard<'_, PoolState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
