//! flowbridge node synchronizer
//!
//! Watches the cluster's nodes and keeps the flow scheduler's resource
//! topology in step with them.

use std::sync::Arc;

use anyhow::{Context, Result};
use flowbridge_node_sync::cluster::KubeNodeSource;
use flowbridge_node_sync::{Config, GrpcSchedulerClient, NodeSynchronizer, Registry};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        scheduler_addr = %config.scheduler_addr,
        workers = config.node_workers,
        "Starting flowbridge node synchronizer"
    );

    let scheduler =
        GrpcSchedulerClient::new(&config).context("failed to create scheduler client")?;
    let source = KubeNodeSource::try_default(&config)
        .await
        .context("failed to create cluster client")?;
    let synchronizer = Arc::new(NodeSynchronizer::new(
        Arc::new(Registry::new()),
        Arc::new(scheduler),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        let _ = shutdown_tx.send(true);
    });

    synchronizer
        .run(
            source,
            config.node_workers,
            config.cache_sync_timeout,
            shutdown_rx,
        )
        .await
        .context("node synchronizer stopped")?;

    info!("Node synchronizer shutdown complete");
    Ok(())
}
