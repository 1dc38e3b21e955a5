//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum catch-all handler)
//!     → [pool selects a healthy backend]
//!     → request.rs (take sequence number, merge it into the query)
//!     → server.rs (URI rewrite, forward via hyper client)
//!     → Relay upstream response to client
//! ```

pub mod request;
pub mod server;

pub use request::{tag_query, RequestSequence, REQ_COUNTER_PARAM};
pub use server::{AppState, HttpServer};
