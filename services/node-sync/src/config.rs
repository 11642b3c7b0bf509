//! Configuration for the node synchronizer.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Node synchronizer configuration.
///
/// The cluster connection itself comes from the kubeconfig (`KUBECONFIG`) or
/// the in-cluster service account.
#[derive(Debug, Clone)]
pub struct Config {
    /// Flow scheduler gRPC endpoint.
    pub scheduler_addr: String,

    /// Number of node workers draining the queue.
    pub node_workers: usize,

    /// Deadline for the initial node listing.
    pub cache_sync_timeout: Duration,

    /// Per-attempt timeout of scheduler calls.
    pub rpc_timeout: Duration,

    /// Retries after a failed scheduler call.
    pub rpc_max_retries: u32,

    /// Server-side timeout of one watch request.
    pub watch_timeout: Duration,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler_addr: "http://127.0.0.1:9090".to_string(),
            node_workers: 2,
            cache_sync_timeout: Duration::from_secs(60),
            rpc_timeout: Duration::from_secs(10),
            rpc_max_retries: 3,
            watch_timeout: Duration::from_secs(290),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let scheduler_addr =
            std::env::var("FLOWBRIDGE_SCHEDULER_ADDR").unwrap_or(defaults.scheduler_addr);

        let node_workers: usize = env_parse("FLOWBRIDGE_NODE_WORKERS", defaults.node_workers)?;
        if node_workers == 0 {
            anyhow::bail!("FLOWBRIDGE_NODE_WORKERS must be at least 1");
        }

        let cache_sync_timeout = Duration::from_secs(env_parse(
            "FLOWBRIDGE_CACHE_SYNC_TIMEOUT_SECS",
            defaults.cache_sync_timeout.as_secs(),
        )?);

        let rpc_timeout = Duration::from_secs(env_parse(
            "FLOWBRIDGE_RPC_TIMEOUT_SECS",
            defaults.rpc_timeout.as_secs(),
        )?);

        let rpc_max_retries = env_parse("FLOWBRIDGE_RPC_MAX_RETRIES", defaults.rpc_max_retries)?;

        let watch_timeout = Duration::from_secs(env_parse(
            "FLOWBRIDGE_WATCH_TIMEOUT_SECS",
            defaults.watch_timeout.as_secs(),
        )?);

        let log_level = std::env::var("FLOWBRIDGE_LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            scheduler_addr,
            node_workers,
            cache_sync_timeout,
            rpc_timeout,
            rpc_max_retries,
            watch_timeout,
            log_level,
        })
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {name}: '{raw}'")),
        Err(_) => Ok(default),
    }
}
