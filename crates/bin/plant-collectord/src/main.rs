//! # plant-collectord — plant sensor collector daemon
//!
//! Composition root that wires the adapters together and runs the
//! collection loop.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize structured logging
//! - Resolve the collector identity
//! - Construct the BLE radio and HTTP ingester (adapters)
//! - Construct the collection cycle and loop, injecting adapters via port traits
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod identity;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use plant_collector_adapter_ble::BtleRadio;
use plant_collector_adapter_ingester::HttpIngester;
use plant_collector_app::services::collection_cycle::CollectionCycle;
use plant_collector_app::services::collection_loop::CollectionLoop;
use plant_collector_app::services::discovery::Discovery;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.logging.filter);

    let collector = identity::resolve_collector_mac(config.collector.mac.as_deref())?;
    tracing::info!(
        %collector,
        ingester = %config.ingester.url,
        interval_secs = config.collector.interval_secs,
        "plant-collectord starting"
    );

    // Adapters
    let radio = BtleRadio::new(config.ble.clone());
    let ingester = HttpIngester::new(&config.ingester)?;

    // Services
    let discovery = Discovery::new(config.ble.scan_duration())
        .with_device_filter(config.ble.device_filter.clone());
    let cycle = CollectionCycle::new(radio, ingester, discovery, collector);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown signal received, finishing current step");
        request_shutdown(&shutdown_tx);
    });

    CollectionLoop::new(cycle, config.collector.interval(), shutdown_rx)
        .run()
        .await;

    tracing::info!("plant-collectord stopped");
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Raise the shutdown flag. Returns `false` when the loop has already gone.
fn request_shutdown(shutdown: &watch::Sender<bool>) -> bool {
    if shutdown.send(true).is_err() {
        tracing::debug!("collection loop already stopped");
        return false;
    }
    true
}

/// Resolves on the first SIGINT or SIGTERM. A signal that cannot be
/// installed never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
