//! Load balancer entry point.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rr_proxy::config::load_config;
use rr_proxy::http::HttpServer;
use rr_proxy::lifecycle::Shutdown;
use rr_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "rr-proxy")]
#[command(about = "Round-robin load-balancing reverse proxy", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "balancer.toml")]
    config: PathBuf,

    /// Override the configured listen address.
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init("rr_proxy=debug,tower_http=debug");

    tracing::info!("rr-proxy v0.1.0 starting");

    let mut config = load_config(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        probe_interval_secs = config.health_check.interval_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(error) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                %error,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
