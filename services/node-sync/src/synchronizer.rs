//! Node synchronizer.
//!
//! A fixed pool of workers drains the node queue. Each worker holds one
//! hostname at a time and applies that hostname's batch strictly in arrival
//! order:
//!
//! | registered | event   | action                                          |
//! |------------|---------|-------------------------------------------------|
//! | no         | Added   | build tree, register, notify added              |
//! | yes        | Deleted | notify removed, unregister tree and all ids     |
//! | yes        | Failed  | notify failed, unregister tree and all ids      |
//! | yes        | Updated | refresh labels, notify updated                  |
//! | otherwise  |         | invariant violation, the synchronizer halts     |
//!
//! A removed node stays registered until the scheduler has been told, so its
//! resource ids cannot be handed to another node while the call is in
//! flight. Hostnames are processed one at a time, so nothing else observes
//! the entry in between.
//!
//! An invariant violation halts every worker: the queue is shut down
//! without draining and no further event is applied.
//!
//! The registry lock is held only for the map operations, never across a
//! scheduler call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flowbridge_proto::firmament::ResourceTopologyNodeDescriptor;
use flowbridge_reconcile::KeyedQueue;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, instrument, warn};

use crate::classifier::{NodeEventEnqueuer, NodePhase, NodeSnapshot};
use crate::cluster::{NodeEventHandler, NodeInformer, NodeSource, SyncStatus};
use crate::error::{SchedulerError, SyncError};
use crate::registry::{Registry, RegistryError};
use crate::scheduler::SchedulerClient;
use crate::shutdown;
use crate::topology::build_resource_topology;

/// Work queue of classified node events, keyed by hostname.
pub type NodeQueue = KeyedQueue<String, NodeSnapshot>;

/// Keeps the registry and the scheduler in step with the cluster's nodes.
pub struct NodeSynchronizer {
    queue: Arc<NodeQueue>,
    registry: Arc<Registry>,
    scheduler: Arc<dyn SchedulerClient>,
    /// Set on the first invariant violation.
    halted: AtomicBool,
}

impl NodeSynchronizer {
    pub fn new(registry: Arc<Registry>, scheduler: Arc<dyn SchedulerClient>) -> Self {
        Self {
            queue: Arc::new(NodeQueue::new()),
            registry,
            scheduler,
            halted: AtomicBool::new(false),
        }
    }

    pub fn queue(&self) -> &Arc<NodeQueue> {
        &self.queue
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Event handler that classifies node callbacks onto this queue.
    pub fn handler(&self) -> Arc<dyn NodeEventHandler> {
        Arc::new(NodeEventEnqueuer::new(Arc::clone(&self.queue)))
    }

    /// Apply one classified event.
    #[instrument(skip(self, node), fields(hostname = %node.hostname, phase = %node.phase))]
    pub async fn process(&self, node: NodeSnapshot) -> Result<(), SyncError> {
        match node.phase {
            NodePhase::Added => {
                let tree = build_resource_topology(&node);
                self.registry
                    .insert_registered(&node.hostname, tree.clone())
                    .map_err(|e| invariant_violation(&node, e))?;
                info!(resource_id = %tree.uuid(), "Node registered");
                report("NodeAdded", self.scheduler.node_added(&tree).await);
            }
            NodePhase::Deleted => {
                let tree = self.registered(&node)?;
                report("NodeRemoved", self.scheduler.node_removed(tree.uuid()).await);
                self.unregister(&node)?;
                info!(resource_id = %tree.uuid(), "Node unregistered");
            }
            NodePhase::Failed => {
                let tree = self.registered(&node)?;
                report("NodeFailed", self.scheduler.node_failed(tree.uuid()).await);
                self.unregister(&node)?;
                warn!(resource_id = %tree.uuid(), "Node failed, unregistered");
            }
            NodePhase::Updated => {
                let tree = self
                    .registry
                    .refresh_labels(&node.hostname, &node.labels)
                    .map_err(|e| invariant_violation(&node, e))?;
                info!(resource_id = %tree.uuid(), labels = node.labels.len(), "Node labels refreshed");
                report("NodeUpdated", self.scheduler.node_updated(&tree).await);
            }
        }
        Ok(())
    }

    fn registered(&self, node: &NodeSnapshot) -> Result<ResourceTopologyNodeDescriptor, SyncError> {
        self.registry.lookup(&node.hostname).ok_or_else(|| {
            invariant_violation(node, RegistryError::NotRegistered(node.hostname.clone()))
        })
    }

    fn unregister(&self, node: &NodeSnapshot) -> Result<(), SyncError> {
        self.registry
            .remove_registered(&node.hostname)
            .map(drop)
            .map_err(|e| invariant_violation(node, e))
    }

    /// Whether an invariant violation has stopped processing.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    fn halt(&self) {
        self.halted.store(true, Ordering::Release);
        self.queue.shut_down_now();
    }

    async fn run_worker(self: Arc<Self>, id: usize) -> Result<(), SyncError> {
        debug!(worker = id, "Node worker started");

        while let Some((hostname, batch)) = self.queue.get().await {
            debug!(worker = id, hostname = %hostname, events = batch.len(), "Processing node batch");
            for node in batch {
                if self.is_halted() {
                    debug!(worker = id, hostname = %hostname, "Halted, dropping node batch");
                    break;
                }
                if let Err(e) = self.process(node).await {
                    self.halt();
                    self.queue.done(&hostname);
                    return Err(e);
                }
            }
            self.queue.done(&hostname);
        }

        debug!(worker = id, "Node worker stopped");
        Ok(())
    }

    /// Start the source, wait for the initial listing, then process events
    /// with `workers` workers until shutdown is requested or a worker stops
    /// on an invariant violation.
    pub async fn run<S: NodeSource>(
        self: Arc<Self>,
        source: S,
        workers: usize,
        cache_sync_timeout: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), SyncError> {
        let informer = Arc::new(NodeInformer::new(self.handler()));
        let (stop_source, source_shutdown) = watch::channel(false);
        let source_task = tokio::spawn(Box::new(source).run(Arc::clone(&informer), source_shutdown));

        info!(workers, "Waiting for initial node listing");
        match informer
            .wait_for_sync(cache_sync_timeout, shutdown.clone())
            .await
        {
            SyncStatus::Synced => info!(nodes = informer.len(), "Node cache synced"),
            SyncStatus::TimedOut => {
                error!(timeout_secs = cache_sync_timeout.as_secs(), "Node cache sync timed out");
                stop(stop_source, source_task).await;
                self.queue.shut_down();
                return Err(SyncError::CacheSyncTimeout(cache_sync_timeout));
            }
            SyncStatus::ShutDown => {
                info!("Shutdown requested before node cache synced");
                stop(stop_source, source_task).await;
                self.queue.shut_down();
                return Ok(());
            }
        }

        let mut pool = JoinSet::new();
        for id in 0..workers.max(1) {
            pool.spawn(Arc::clone(&self).run_worker(id));
        }

        let mut result = tokio::select! {
            _ = shutdown::signaled(&mut shutdown) => {
                info!("Shutdown requested");
                Ok(())
            }
            Some(joined) = pool.join_next() => flatten(joined),
        };

        stop(stop_source, source_task).await;
        self.queue.shut_down();

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = flatten(joined) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }

        info!(nodes = self.registry.len(), "Node synchronizer stopped");
        result
    }
}

fn invariant_violation(node: &NodeSnapshot, err: RegistryError) -> SyncError {
    error!(hostname = %node.hostname, phase = %node.phase, error = %err, "Registry invariant violated");
    SyncError::InvariantViolation(err)
}

fn report(call: &'static str, result: Result<(), SchedulerError>) {
    if let Err(e) = result {
        error!(call, error = %e, "Scheduler notification failed");
    }
}

fn flatten(joined: Result<Result<(), SyncError>, JoinError>) -> Result<(), SyncError> {
    joined.map_err(|e| SyncError::WorkerPanicked(e.to_string()))?
}

async fn stop(stop_source: watch::Sender<bool>, source_task: JoinHandle<()>) {
    let _ = stop_source.send(true);
    if let Err(e) = source_task.await {
        warn!(error = %e, "Node source task failed");
    }
}
