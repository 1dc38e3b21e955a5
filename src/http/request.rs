//! Request sequence tagging.
//!
//! # Responsibilities
//! - Hand out the process-wide request sequence number
//! - Merge the sequence tag into the outgoing query string

use std::sync::atomic::{AtomicU64, Ordering};

/// Query parameter carrying the request sequence number.
pub const REQ_COUNTER_PARAM: &str = "reqCounter";

/// Process-wide request sequence.
///
/// Values are unique and monotonically increasing under concurrent
/// dispatch. Sequence assignment and backend selection are two independent
/// steps, so the value carries no ordering guarantee relative to when a
/// request actually reaches a backend; it exists for log and capture
/// correlation only.
#[derive(Debug, Default)]
pub struct RequestSequence {
    counter: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next sequence value. The first request gets 1.
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Merge `reqCounter=<sequence>` into an optional existing query string:
/// `&`-concatenated after an existing query, set directly otherwise.
pub fn tag_query(original: Option<&str>, sequence: u64) -> String {
    match original {
        Some(query) if !query.is_empty() => format!("{query}&{REQ_COUNTER_PARAM}={sequence}"),
        _ => format!("{REQ_COUNTER_PARAM}={sequence}"),
    }
}
