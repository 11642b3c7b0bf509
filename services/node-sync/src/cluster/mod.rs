//! Cluster API boundary: node accessors over the `k8s-openapi` model, the
//! watcher-backed node source and the informer that turns watcher output into
//! add/update/delete callbacks.

mod api;
mod informer;
mod quantity;
mod source;

pub use api::KubeNodeSource;
pub use informer::{NodeEventHandler, NodeInformer, SyncStatus};
pub use k8s_openapi::api::core::v1::Node;
pub use quantity::{QuantityError, QuantityExt};
pub use source::{ChannelNodeSource, NodeSource};

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

/// Condition type reporting kubelet readiness.
pub const CONDITION_READY: &str = "Ready";

/// Condition type reporting disk exhaustion.
pub const CONDITION_OUT_OF_DISK: &str = "OutOfDisk";

/// Resource name of the CPU quantity.
pub const RESOURCE_CPU: &str = "cpu";

/// Resource name of the memory quantity.
pub const RESOURCE_MEMORY: &str = "memory";

/// Node fields the synchronizer reads.
pub trait NodeExt {
    /// The node name, empty when the object carries none.
    fn hostname(&self) -> &str;

    fn is_unschedulable(&self) -> bool;

    /// Returns `(ready, out_of_disk)`. A condition counts only when its status
    /// is exactly `"True"`; a missing condition is false.
    fn ready_and_out_of_disk(&self) -> (bool, bool);

    fn capacity(&self, resource: &str) -> Option<&Quantity>;

    fn allocatable(&self, resource: &str) -> Option<&Quantity>;
}

impl NodeExt for Node {
    fn hostname(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn is_unschedulable(&self) -> bool {
        self.spec
            .as_ref()
            .and_then(|spec| spec.unschedulable)
            .unwrap_or(false)
    }

    fn ready_and_out_of_disk(&self) -> (bool, bool) {
        let mut ready = false;
        let mut out_of_disk = false;
        let conditions = self
            .status
            .as_ref()
            .and_then(|status| status.conditions.as_deref())
            .unwrap_or_default();
        for cond in conditions {
            match cond.type_.as_str() {
                CONDITION_READY => ready = cond.status == "True",
                CONDITION_OUT_OF_DISK => out_of_disk = cond.status == "True",
                _ => {}
            }
        }
        (ready, out_of_disk)
    }

    fn capacity(&self, resource: &str) -> Option<&Quantity> {
        self.status.as_ref()?.capacity.as_ref()?.get(resource)
    }

    fn allocatable(&self, resource: &str) -> Option<&Quantity> {
        self.status.as_ref()?.allocatable.as_ref()?.get(resource)
    }
}
