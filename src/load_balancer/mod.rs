//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives
//!     → pool.rs (advance the shared cursor, skip unhealthy backends)
//!     → backend.rs (pre-parsed scheme/authority for the rewrite)
//!     → Return Selection or NoHealthyBackend
//!
//! Health prober (independently)
//!     → pool.rs set_health(index, flag)
//! ```
//!
//! # Design Decisions
//! - One mutex covers the cursor and every health flag; critical sections
//!   hold index arithmetic and boolean reads only, never I/O
//! - Backend identity is positional; the set never changes after startup
//! - Selection is bounded: a fully-unhealthy pool yields an error, not a spin

pub mod backend;
pub mod pool;

pub use backend::{Backend, InvalidBackend};
pub use pool::{BackendPool, PoolError, SelectError, Selection};
