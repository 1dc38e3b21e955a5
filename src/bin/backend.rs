//! Demo backend server.
//!
//! Implements the upstream contract the balancer expects: a liveness probe
//! on `/health` and a counted no-op on `/ping`. Useful for running the
//! balancer locally against a handful of instances on different ports.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, State},
    routing::get,
    Json, Router,
};
use clap::Parser;
use serde_json::{json, Value};

use rr_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "backend")]
#[command(about = "Demo backend server for the load balancer", long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(default_value = "127.0.0.1:8080")]
    listen: SocketAddr,
}

#[derive(Clone, Default)]
struct BackendState {
    request_count: Arc<AtomicU64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init("backend=debug");

    let state = BackendState::default();

    // Periodic status line, same cadence whether or not traffic arrives.
    let count = state.request_count.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(10));
        ticker.tick().await; // the first tick fires immediately; skip it
        loop {
            ticker.tick().await;
            tracing::info!(request_count = count.load(Ordering::Relaxed), "Status");
        }
    });

    let app = Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!(address = %listener.local_addr()?, "Backend listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn ping(State(state): State<BackendState>) -> Json<Value> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    Json(json!({ "message": "pong" }))
}

async fn health(ConnectInfo(peer): ConnectInfo<SocketAddr>) -> Json<Value> {
    tracing::debug!(peer = %peer, "Health probe");
    Json(json!({}))
}
