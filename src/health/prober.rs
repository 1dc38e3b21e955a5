//! Active health probing.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::load_balancer::BackendPool;
use crate::observability::metrics;

/// One probe destination, precomputed at startup: the backend set is fixed,
/// only the flags change.
struct ProbeTarget {
    uri: String,
    authority: String,
}

/// Background task that keeps the pool's health flags current.
pub struct HealthProber {
    pool: Arc<BackendPool>,
    targets: Vec<ProbeTarget>,
    config: HealthCheckConfig,
    client: Client<HttpConnector, Body>,
}

impl HealthProber {
    pub fn new(pool: Arc<BackendPool>, config: HealthCheckConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let targets = pool
            .backend_urls()
            .iter()
            .map(|url| ProbeTarget {
                uri: format!("{}://{}{}", url.scheme(), url.authority(), config.path),
                authority: url.authority().to_string(),
            })
            .collect();

        Self {
            pool,
            targets,
            config,
            client,
        }
    }

    /// Probe every backend on the configured interval until shutdown.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.config.interval_secs,
            timeout_secs = self.config.timeout_secs,
            path = %self.config.path,
            "Health prober starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.probe_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health prober received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// One full sweep over the pool. Sequential, so a sweep takes at most
    /// `backends × timeout` in the worst case.
    pub async fn probe_all(&self) {
        for (index, target) in self.targets.iter().enumerate() {
            let was_healthy = self.pool.is_healthy(index);
            let healthy = self.probe(target).await;

            self.pool.set_health(index, healthy);
            metrics::record_backend_health(&target.authority, healthy);

            if healthy != was_healthy {
                if healthy {
                    tracing::info!(backend = %target.authority, "Backend recovered");
                } else {
                    tracing::warn!(backend = %target.authority, "Backend marked unhealthy");
                }
            }
        }
    }

    async fn probe(&self, target: &ProbeTarget) -> bool {
        let request = match Request::builder()
            .method("GET")
            .uri(target.uri.as_str())
            .header("user-agent", "rr-proxy-health-probe")
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(error) => {
                tracing::error!(%error, uri = %target.uri, "Failed to build probe request");
                return false;
            }
        };

        let timeout = Duration::from_secs(self.config.timeout_secs);

        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let healthy = response.status().is_success();
                if !healthy {
                    tracing::warn!(
                        backend = %target.authority,
                        status = %response.status(),
                        "Probe failed: non-success status"
                    );
                }
                healthy
            }
            Ok(Err(error)) => {
                tracing::warn!(backend = %target.authority, %error, "Probe failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(backend = %target.authority, "Probe failed: timeout");
                false
            }
        }
    }
}
