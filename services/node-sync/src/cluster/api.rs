//! Node source backed by the cluster API server.
//!
//! Uses the `kube` watcher: one paginated listing, then a watch resumed from
//! the last seen resource version. Expired versions trigger a relist, which
//! the informer diffs against its store. Errors are retried with the
//! watcher's default backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{Node, NodeInformer, NodeSource};
use crate::config::Config;
use crate::error::ClusterError;
use crate::shutdown;

/// The API server rejects watch timeouts from 295 seconds up.
const MAX_WATCH_TIMEOUT_SECS: u64 = 290;

/// Node source watching `Node` objects through the API server.
pub struct KubeNodeSource {
    api: Api<Node>,
    watch_timeout: Duration,
}

impl KubeNodeSource {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            api: Api::all(client),
            watch_timeout: config.watch_timeout,
        }
    }

    /// Build a client from the local kubeconfig or the in-cluster service
    /// account.
    pub async fn try_default(config: &Config) -> Result<Self, ClusterError> {
        let client = Client::try_default().await?;
        Ok(Self::new(client, config))
    }

    fn watcher_config(&self) -> watcher::Config {
        let timeout = self.watch_timeout.as_secs().min(MAX_WATCH_TIMEOUT_SECS);
        watcher::Config::default().timeout(timeout as u32)
    }
}

#[async_trait]
impl NodeSource for KubeNodeSource {
    async fn run(self: Box<Self>, informer: Arc<NodeInformer>, mut shutdown: watch::Receiver<bool>) {
        info!(
            watch_timeout_secs = self.watch_timeout.as_secs(),
            "Starting node watch"
        );
        let config = self.watcher_config();
        let mut events = watcher(self.api, config).default_backoff().boxed();

        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => informer.handle(event),
                    Some(Err(e)) => warn!(error = %e, "Node watch failed, retrying"),
                    None => break,
                },
                _ = shutdown::signaled(&mut shutdown) => break,
            }
        }

        info!("Node watch stopped");
    }
}
