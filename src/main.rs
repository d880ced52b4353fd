//! Gateway route configuration service.
//!
//! Loads the route configuration, publishes the resolved snapshot, and keeps
//! it current until shutdown.
//!
//! ```text
//!   config file ──▶ ConfigBuilder ──▶ ConfigHolder ──▶ readers
//!        ▲                ▲
//!        │                │
//!   ConfigWatcher      SIGHUP
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use gateway_routes::config::watcher::ConfigWatcher;
use gateway_routes::config::{ConfigBuilder, FileSource};
use gateway_routes::lifecycle::signals::spawn_signal_handler;
use gateway_routes::lifecycle::{Gateway, Shutdown};
use gateway_routes::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "gateway-routes")]
#[command(about = "Builds and serves the gateway's resolved route configuration", long_about = None)]
struct Args {
    /// Configuration file (.toml or .json)
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,

    /// Reload when the configuration file changes
    #[arg(short, long)]
    watch: bool,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<SocketAddr>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logging::init_logging(logging::DEFAULT_FILTER, args.json_logs)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "gateway-routes starting"
    );

    if let Some(addr) = args.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let gateway = Gateway::start(ConfigBuilder::new(FileSource::new(&args.config)))?;

    let shutdown = Shutdown::new();
    let mut shutdown_rx = shutdown.subscribe();

    let (reload_tx, mut reload_rx) = mpsc::unbounded_channel();
    let _signals = spawn_signal_handler(shutdown.clone(), reload_tx);

    // Keep the watcher handle alive for the lifetime of the loop.
    let (_watcher, mut updates) = if args.watch {
        let (watcher, rx) = ConfigWatcher::new(&args.config);
        (Some(watcher.run()?), Some(rx))
    } else {
        (None, None)
    };

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            Some(()) = reload_rx.recv() => {
                if let Err(e) = gateway.reload() {
                    tracing::error!(error = %e, "SIGHUP reload failed");
                }
            }
            Some(config) = recv_update(&mut updates) => {
                if let Err(e) = gateway.apply(&config) {
                    tracing::error!(error = %e, "File change reload failed");
                }
            }
        }
    }

    tracing::info!(
        routes = gateway.holder().current().routes().len(),
        "Shutdown complete"
    );
    Ok(())
}

async fn recv_update<T>(updates: &mut Option<mpsc::UnboundedReceiver<T>>) -> Option<T> {
    match updates {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
