//! Round-robin load-balancing reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────┐
//!                      │               LOAD BALANCER                │
//!                      │                                            │
//!   Client Request     │  ┌─────────┐      ┌───────────────┐       │
//!   ───────────────────┼─▶│  http   │─────▶│ load_balancer │       │
//!                      │  │ server  │      │ pool + cursor │       │
//!                      │  └────┬────┘      └───────┬───────┘       │
//!                      │       │                   │ health flags  │
//!                      │       ▼                   │               │
//!   Client Response    │  ┌─────────┐      ┌───────┴───────┐       │
//!   ◀──────────────────┼──│  http   │      │    health     │──────▶│ GET /health
//!                      │  │ client  │      │    prober     │       │
//!                      │  └─────────┘      └───────────────┘       │
//!                      │                                           │
//!                      │  config · lifecycle · observability       │
//!                      └───────────────────────────────────────────┘
//! ```
//!
//! Requests enter through the catch-all Axum handler, which asks the pool
//! for the next healthy backend, rewrites the request URI for it, tags the
//! query string with a sequence number, and forwards upstream. The prober
//! runs beside the traffic and is the only writer of the health flags.

// Core subsystems
pub mod config;
pub mod http;

// Traffic management
pub mod health;
pub mod load_balancer;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
