//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Select a backend and rewrite the inbound request URI for it
//! - Tag each outgoing request with its sequence number
//! - Forward upstream and relay status, headers, and body unmodified
//! - Surface gateway-level failures to the original caller

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::uri::PathAndQuery,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::BalancerConfig;
use crate::health::HealthProber;
use crate::http::request::{tag_query, RequestSequence};
use crate::lifecycle::Shutdown;
use crate::load_balancer::{BackendPool, PoolError, Selection};
use crate::observability::metrics;

/// Application state injected into the proxy handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<BackendPool>,
    pub client: Client<HttpConnector, Body>,
    pub sequence: Arc<RequestSequence>,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: BalancerConfig,
    pool: Arc<BackendPool>,
}

impl HttpServer {
    /// Build the pool and router from a validated configuration.
    ///
    /// A backend address that fails to parse is fatal here: the pool is
    /// complete or the process does not start.
    pub fn new(config: BalancerConfig) -> Result<Self, PoolError> {
        let pool = Arc::new(BackendPool::from_addresses(&config.backends)?);

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            pool: pool.clone(),
            client,
            sequence: Arc::new(RequestSequence::new()),
        };

        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            pool,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &BalancerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// The pool backing this server.
    pub fn pool(&self) -> Arc<BackendPool> {
        self.pool.clone()
    }

    /// Run the server on the given listener until shutdown is triggered.
    ///
    /// Spawns the health prober alongside the accept loop; both subscribe
    /// to the same shutdown signal.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.pool.len(),
            "HTTP server starting"
        );

        if self.config.health_check.enabled {
            let prober = HealthProber::new(self.pool.clone(), self.config.health_check.clone());
            let prober_shutdown = shutdown.subscribe();
            tokio::spawn(prober.run(prober_shutdown));
        }

        let mut server_shutdown = shutdown.subscribe();
        let app = self.router.into_make_service();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler: select a backend, rewrite, tag, forward, relay.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    // 1. Select a healthy backend.
    let selection = match state.pool.select_healthy() {
        Ok(selection) => selection,
        Err(error) => {
            tracing::warn!(%error, "Rejecting request: no healthy backend");
            metrics::record_request(
                &method,
                StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                "none",
                start_time,
            );
            return (StatusCode::SERVICE_UNAVAILABLE, "No healthy backends").into_response();
        }
    };

    // 2. Take the sequence number. Selection and sequence assignment are
    //    independent steps; reqCounter order does not imply dispatch order.
    let sequence = state.sequence.next();

    // 3.–4. Rewrite the destination and merge the sequence tag.
    let (mut parts, body) = request.into_parts();
    let upstream_uri = match rewrite_uri(&parts.uri, &selection, sequence) {
        Ok(uri) => uri,
        Err(error) => {
            tracing::error!(%error, uri = %parts.uri, "Failed to rewrite request URI");
            metrics::record_request(
                &method,
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                selection.authority.as_str(),
                start_time,
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    parts.uri = upstream_uri;

    tracing::debug!(
        sequence,
        backend = %selection.authority,
        method = %parts.method,
        path = %parts.uri.path(),
        "Forwarding request"
    );

    // 5. Forward and relay. An upstream failure surfaces to the caller as a
    //    gateway error and leaves the pool's health flags alone; only the
    //    prober mutates health.
    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(
                &method,
                status.as_u16(),
                selection.authority.as_str(),
                start_time,
            );

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(error) => {
            tracing::error!(
                sequence,
                backend = %selection.authority,
                %error,
                "Upstream request failed"
            );
            metrics::record_request(
                &method,
                StatusCode::BAD_GATEWAY.as_u16(),
                selection.authority.as_str(),
                start_time,
            );
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Point a request URI at the selected backend: swap scheme and authority,
/// keep the path, and merge the sequence tag into the query string.
fn rewrite_uri(
    original: &Uri,
    selection: &Selection,
    sequence: u64,
) -> Result<Uri, axum::http::Error> {
    let query = tag_query(original.query(), sequence);
    let path_and_query: PathAndQuery = format!("{}?{}", original.path(), query).parse()?;

    let mut parts = original.clone().into_parts();
    parts.scheme = Some(selection.scheme.clone());
    parts.authority = Some(selection.authority.clone());
    parts.path_and_query = Some(path_and_query);

    Ok(Uri::from_parts(parts)?)
}
