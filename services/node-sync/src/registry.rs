//! Registry of known schedulable nodes.
//!
//! Holds two maps behind one lock: hostname to topology tree, and resource id
//! to hostname. The reverse map's keys are always exactly the resource ids
//! reachable from the trees in the forward map. Both maps change together
//! under a single lock acquisition, and every operation checks its
//! precondition before mutating anything.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use flowbridge_proto::firmament::ResourceTopologyNodeDescriptor;
use parking_lot::Mutex;
use thiserror::Error;

use crate::topology;

/// Registry precondition failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("node {0} is already registered")]
    AlreadyRegistered(String),

    #[error("node {0} is not registered")]
    NotRegistered(String),

    #[error("resource id {resource_id} of node {hostname} already belongs to node {owner}")]
    ResourceIdConflict {
        resource_id: String,
        hostname: String,
        owner: String,
    },
}

#[derive(Default)]
struct Maps {
    nodes: HashMap<String, ResourceTopologyNodeDescriptor>,
    resources: HashMap<String, String>,
}

/// Shared registry of node topologies.
#[derive(Default)]
pub struct Registry {
    maps: Mutex<Maps>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node's tree and every resource id in it.
    pub fn insert_registered(
        &self,
        hostname: &str,
        tree: ResourceTopologyNodeDescriptor,
    ) -> Result<(), RegistryError> {
        let mut maps = self.maps.lock();
        if maps.nodes.contains_key(hostname) {
            return Err(RegistryError::AlreadyRegistered(hostname.to_string()));
        }

        let ids = topology::resource_ids(&tree);
        if let Some((resource_id, owner)) = ids
            .iter()
            .find_map(|id| maps.resources.get(id).map(|owner| (id, owner)))
        {
            return Err(RegistryError::ResourceIdConflict {
                resource_id: resource_id.clone(),
                hostname: hostname.to_string(),
                owner: owner.clone(),
            });
        }

        for id in ids {
            maps.resources.insert(id, hostname.to_string());
        }
        maps.nodes.insert(hostname.to_string(), tree);
        Ok(())
    }

    /// Unregister a node, purging every resource id of its tree.
    pub fn remove_registered(
        &self,
        hostname: &str,
    ) -> Result<ResourceTopologyNodeDescriptor, RegistryError> {
        let mut maps = self.maps.lock();
        let tree = maps
            .nodes
            .remove(hostname)
            .ok_or_else(|| RegistryError::NotRegistered(hostname.to_string()))?;
        recursive_purge(&mut maps.resources, &tree);
        Ok(tree)
    }

    /// Snapshot of a node's tree.
    pub fn lookup(&self, hostname: &str) -> Option<ResourceTopologyNodeDescriptor> {
        self.maps.lock().nodes.get(hostname).cloned()
    }

    /// Replace the labels across a registered node's tree and return the
    /// updated tree. Resource ids and capacities are left untouched.
    pub fn refresh_labels(
        &self,
        hostname: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<ResourceTopologyNodeDescriptor, RegistryError> {
        let mut maps = self.maps.lock();
        let tree = maps
            .nodes
            .get_mut(hostname)
            .ok_or_else(|| RegistryError::NotRegistered(hostname.to_string()))?;
        topology::set_labels(tree, labels);
        Ok(tree.clone())
    }

    /// Hostname owning a resource id.
    pub fn host_for(&self, resource_id: &str) -> Option<String> {
        self.maps.lock().resources.get(resource_id).cloned()
    }

    pub fn contains_host(&self, hostname: &str) -> bool {
        self.maps.lock().nodes.contains_key(hostname)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.maps.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hostnames(&self) -> BTreeSet<String> {
        self.maps.lock().nodes.keys().cloned().collect()
    }

    /// All ids in the reverse map.
    pub fn resource_ids(&self) -> BTreeSet<String> {
        self.maps.lock().resources.keys().cloned().collect()
    }

    /// Check that the reverse map matches the registered trees exactly.
    pub fn is_consistent(&self) -> bool {
        let maps = self.maps.lock();
        let mut expected = HashMap::new();
        for (hostname, tree) in &maps.nodes {
            for id in topology::resource_ids(tree) {
                if expected.insert(id, hostname.clone()).is_some() {
                    return false;
                }
            }
        }
        expected == maps.resources
    }
}

/// Remove the ids of `tree` and all of its descendants from the reverse map.
fn recursive_purge(resources: &mut HashMap<String, String>, tree: &ResourceTopologyNodeDescriptor) {
    topology::walk(tree, &mut |node| {
        resources.remove(node.uuid());
    });
}
