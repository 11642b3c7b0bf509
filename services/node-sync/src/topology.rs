//! Resource topology construction.
//!
//! Every node is represented to the scheduler as a machine resource with a
//! single processing-unit child. Per-core detail is not modelled because
//! per-core utilisation is not observable upstream, so the child carries the
//! machine's full capacity and labels.

use std::collections::BTreeMap;

use flowbridge_id::ResourceId;
use flowbridge_proto::firmament::{
    Label, ResourceDescriptor, ResourceState, ResourceTopologyNodeDescriptor, ResourceType,
    ResourceVector,
};

use crate::classifier::NodeSnapshot;

/// Seed suffix of the processing-unit child.
pub const PROCESSING_UNIT_SUFFIX: &str = "_PU #0";

/// Build the topology tree for a node.
pub fn build_resource_topology(node: &NodeSnapshot) -> ResourceTopologyNodeDescriptor {
    let machine_id = ResourceId::from_seed(&node.hostname).to_string();
    let labels = labels_from(&node.labels);
    let capacity = ResourceVector {
        ram_cap: u64::try_from(node.mem_capacity_kb).unwrap_or(0),
        cpu_cores: node.cpu_capacity as f32,
        ..Default::default()
    };

    let pu_name = format!("{}{}", node.hostname, PROCESSING_UNIT_SUFFIX);
    let processing_unit = ResourceTopologyNodeDescriptor {
        resource_desc: Some(ResourceDescriptor {
            uuid: ResourceId::from_seed(&pu_name).to_string(),
            friendly_name: pu_name,
            state: ResourceState::Idle as i32,
            r#type: ResourceType::Pu as i32,
            resource_capacity: Some(capacity.clone()),
            labels: labels.clone(),
            ..Default::default()
        }),
        children: Vec::new(),
        parent_id: machine_id.clone(),
    };

    ResourceTopologyNodeDescriptor {
        resource_desc: Some(ResourceDescriptor {
            uuid: machine_id,
            friendly_name: node.hostname.clone(),
            state: ResourceState::Idle as i32,
            r#type: ResourceType::Machine as i32,
            resource_capacity: Some(capacity),
            labels,
            ..Default::default()
        }),
        children: vec![processing_unit],
        parent_id: String::new(),
    }
}

/// Convert a label map into scheduler labels, ordered by key.
pub fn labels_from(labels: &BTreeMap<String, String>) -> Vec<Label> {
    labels
        .iter()
        .map(|(key, value)| Label {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Every resource id in the tree, depth-first, root first.
pub fn resource_ids(tree: &ResourceTopologyNodeDescriptor) -> Vec<String> {
    let mut ids = Vec::new();
    walk(tree, &mut |node| ids.push(node.uuid().to_string()));
    ids
}

/// Replace the labels of every resource in the tree.
pub fn set_labels(tree: &mut ResourceTopologyNodeDescriptor, labels: &BTreeMap<String, String>) {
    let labels = labels_from(labels);
    walk_mut(tree, &mut |node| {
        if let Some(rd) = node.resource_desc.as_mut() {
            rd.labels = labels.clone();
        }
    });
}

/// Visit the tree depth-first, parents before children.
pub fn walk<'a, F>(tree: &'a ResourceTopologyNodeDescriptor, visit: &mut F)
where
    F: FnMut(&'a ResourceTopologyNodeDescriptor),
{
    visit(tree);
    for child in &tree.children {
        walk(child, visit);
    }
}

fn walk_mut<F>(tree: &mut ResourceTopologyNodeDescriptor, visit: &mut F)
where
    F: FnMut(&mut ResourceTopologyNodeDescriptor),
{
    visit(tree);
    for child in &mut tree.children {
        walk_mut(child, visit);
    }
}
