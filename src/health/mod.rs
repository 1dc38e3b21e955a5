//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (prober.rs)
//!     → GET <backend><health_path> with a bounded timeout
//!     → 2xx ⇒ healthy, anything else ⇒ unhealthy
//!     → pool.set_health(index, flag)
//! ```
//!
//! # Design Decisions
//! - Probe failures become state, never errors: a failed probe flips the
//!   flag and nothing else
//! - Flips are immediate in both directions; a backend probed healthy is
//!   eligible for selection again at its next turn in rotation
//! - The prober owns its own HTTP client, independent of the forwarding
//!   client, so probe timeout tuning cannot affect traffic

pub mod prober;

pub use prober::HealthProber;
