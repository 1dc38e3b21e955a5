//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl+C
//!     → shutdown.rs (broadcast to all subscribers)
//!     → server stops accepting, prober exits its loop
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - Tests trigger the same signal to stop servers deterministically

pub mod shutdown;

pub use shutdown::Shutdown;
