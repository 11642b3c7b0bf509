//! Node event classification.
//!
//! Raw creation/update/removal callbacks are reduced to at most one typed
//! lifecycle event per callback. Rules, first match wins:
//!
//! - creation: unschedulable nodes are ignored, everything else is `Added`
//! - update: an unschedulable toggle is `Deleted` (became unschedulable) or
//!   `Added` (became schedulable); a readiness/out-of-disk change is `Added`
//!   when the node is now ready and has disk, `Failed` otherwise; a label or
//!   annotation change is `Updated`; anything else (heartbeats, timestamps)
//!   is ignored
//! - removal: unschedulable nodes are ignored, everything else is `Deleted`
//!   carrying only the hostname

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::ResourceExt;

use crate::cluster::{
    Node, NodeEventHandler, NodeExt, QuantityExt, RESOURCE_CPU, RESOURCE_MEMORY,
};
use crate::synchronizer::NodeQueue;

const BYTES_PER_KB: i64 = 1024;

/// Lifecycle transition of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodePhase {
    Added,
    Updated,
    Deleted,
    Failed,
}

impl fmt::Display for NodePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodePhase::Added => "added",
            NodePhase::Updated => "updated",
            NodePhase::Deleted => "deleted",
            NodePhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Classified view of a node, placed on the work queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub hostname: String,
    pub phase: NodePhase,
    pub is_ready: bool,
    pub is_out_of_disk: bool,
    /// Milli-cores.
    pub cpu_capacity: i64,
    /// Milli-cores.
    pub cpu_allocatable: i64,
    pub mem_capacity_kb: i64,
    pub mem_allocatable_kb: i64,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl NodeSnapshot {
    /// Build a snapshot from a node object.
    pub fn from_node(node: &Node, phase: NodePhase) -> Self {
        let (is_ready, is_out_of_disk) = node.ready_and_out_of_disk();
        let hostname = node.hostname();

        Self {
            hostname: hostname.to_string(),
            phase,
            is_ready,
            is_out_of_disk,
            cpu_capacity: milli_or_zero(node.capacity(RESOURCE_CPU), hostname, "capacity"),
            cpu_allocatable: milli_or_zero(
                node.allocatable(RESOURCE_CPU),
                hostname,
                "allocatable",
            ),
            mem_capacity_kb: bytes_or_zero(node.capacity(RESOURCE_MEMORY), hostname, "capacity")
                / BYTES_PER_KB,
            mem_allocatable_kb: bytes_or_zero(
                node.allocatable(RESOURCE_MEMORY),
                hostname,
                "allocatable",
            ) / BYTES_PER_KB,
            labels: node.labels().clone(),
            annotations: node.annotations().clone(),
        }
    }

    /// Removal snapshot: only the hostname is meaningful.
    pub fn deleted(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            phase: NodePhase::Deleted,
            is_ready: false,
            is_out_of_disk: false,
            cpu_capacity: 0,
            cpu_allocatable: 0,
            mem_capacity_kb: 0,
            mem_allocatable_kb: 0,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }
}

fn milli_or_zero(quantity: Option<&Quantity>, hostname: &str, field: &str) -> i64 {
    let Some(quantity) = quantity else {
        return 0;
    };
    quantity.milli_value().unwrap_or_else(|e| {
        warn!(hostname, field, error = %e, "Unparsable cpu quantity, using 0");
        0
    })
}

fn bytes_or_zero(quantity: Option<&Quantity>, hostname: &str, field: &str) -> i64 {
    let Some(quantity) = quantity else {
        return 0;
    };
    quantity.value().unwrap_or_else(|e| {
        warn!(hostname, field, error = %e, "Unparsable memory quantity, using 0");
        0
    })
}

/// Classification failures. The event is dropped; the control plane will
/// redeliver the node on a later update or resync.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("node object has no name")]
    MissingName,
}

fn key_of(node: &Node) -> Result<&str, ClassifyError> {
    match node.hostname() {
        "" => Err(ClassifyError::MissingName),
        name => Ok(name),
    }
}

/// Classify a creation callback.
pub fn classify_addition(node: &Node) -> Result<Option<NodeSnapshot>, ClassifyError> {
    key_of(node)?;
    if node.is_unschedulable() {
        return Ok(None);
    }
    Ok(Some(NodeSnapshot::from_node(node, NodePhase::Added)))
}

/// Classify an update callback.
pub fn classify_update(old: &Node, new: &Node) -> Result<Option<NodeSnapshot>, ClassifyError> {
    key_of(new)?;

    if old.is_unschedulable() != new.is_unschedulable() {
        let phase = if old.is_unschedulable() {
            NodePhase::Added
        } else {
            NodePhase::Deleted
        };
        return Ok(Some(NodeSnapshot::from_node(new, phase)));
    }

    let (old_ready, old_out_of_disk) = old.ready_and_out_of_disk();
    let (new_ready, new_out_of_disk) = new.ready_and_out_of_disk();
    if old_ready != new_ready || old_out_of_disk != new_out_of_disk {
        let phase = if new_ready && !new_out_of_disk {
            NodePhase::Added
        } else {
            NodePhase::Failed
        };
        return Ok(Some(NodeSnapshot::from_node(new, phase)));
    }

    if old.labels() != new.labels() || old.annotations() != new.annotations() {
        return Ok(Some(NodeSnapshot::from_node(new, NodePhase::Updated)));
    }

    Ok(None)
}

/// Classify a removal callback.
pub fn classify_deletion(node: &Node) -> Result<Option<NodeSnapshot>, ClassifyError> {
    let hostname = key_of(node)?;
    if node.is_unschedulable() {
        return Ok(None);
    }
    Ok(Some(NodeSnapshot::deleted(hostname)))
}

/// Watch callback handler that classifies events and enqueues them under the
/// node's hostname.
pub struct NodeEventEnqueuer {
    queue: Arc<NodeQueue>,
}

impl NodeEventEnqueuer {
    pub fn new(queue: Arc<NodeQueue>) -> Self {
        Self { queue }
    }

    fn enqueue(&self, callback: &'static str, result: Result<Option<NodeSnapshot>, ClassifyError>) {
        match result {
            Ok(Some(snapshot)) => {
                info!(
                    hostname = %snapshot.hostname,
                    phase = %snapshot.phase,
                    callback,
                    "Enqueued node event"
                );
                self.queue.add(snapshot.hostname.clone(), snapshot);
            }
            Ok(None) => debug!(callback, "Node event suppressed"),
            Err(e) => warn!(callback, error = %e, "Dropping node event"),
        }
    }
}

impl NodeEventHandler for NodeEventEnqueuer {
    fn on_add(&self, node: &Node) {
        self.enqueue("add", classify_addition(node));
    }

    fn on_update(&self, old: &Node, new: &Node) {
        self.enqueue("update", classify_update(old, new));
    }

    fn on_delete(&self, node: &Node) {
        self.enqueue("delete", classify_deletion(node));
    }
}
