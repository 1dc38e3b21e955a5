//! Health prober behavior against live, failing, and unreachable backends.

use std::sync::Arc;
use std::time::Duration;

use rr_proxy::config::HealthCheckConfig;
use rr_proxy::health::HealthProber;
use rr_proxy::lifecycle::Shutdown;
use rr_proxy::load_balancer::BackendPool;

mod common;

fn pool_of(addresses: Vec<String>) -> Arc<BackendPool> {
    Arc::new(BackendPool::from_addresses(&addresses).unwrap())
}

#[tokio::test]
async fn sweep_flags_dead_backends_and_keeps_live_ones() {
    let live = common::start_mock_backend("ok").await;
    let dead = common::dead_address().await;

    let pool = pool_of(vec![format!("http://{live}/"), format!("http://{dead}/")]);

    let prober = HealthProber::new(pool.clone(), HealthCheckConfig::default());
    prober.probe_all().await;

    assert!(pool.is_healthy(0));
    assert!(!pool.is_healthy(1));

    // Selection now parks on the live backend.
    for _ in 0..4 {
        assert_eq!(pool.select_healthy().unwrap().index, 0);
    }
}

#[tokio::test]
async fn non_success_status_counts_as_unhealthy() {
    let failing = common::start_failing_backend(500).await;

    let pool = pool_of(vec![format!("http://{failing}/")]);

    let prober = HealthProber::new(pool.clone(), HealthCheckConfig::default());
    prober.probe_all().await;

    assert!(!pool.is_healthy(0));
}

#[tokio::test]
async fn recovered_backend_is_flagged_healthy_in_one_sweep() {
    let live = common::start_mock_backend("ok").await;

    let pool = pool_of(vec![format!("http://{live}/")]);
    pool.set_health(0, false);

    let prober = HealthProber::new(pool.clone(), HealthCheckConfig::default());
    prober.probe_all().await;

    // No healthy streak required; one good probe readmits the backend.
    assert!(pool.is_healthy(0));
}

#[tokio::test]
async fn prober_stops_on_shutdown() {
    let live = common::start_mock_backend("ok").await;
    let pool = pool_of(vec![format!("http://{live}/")]);

    let prober = HealthProber::new(pool, HealthCheckConfig::default());
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(prober.run(shutdown.subscribe()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.trigger();

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("prober did not stop after shutdown")
        .unwrap();
}
