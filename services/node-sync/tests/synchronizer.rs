//! End-to-end synchronizer scenarios driven through a channel node source.

use std::sync::Arc;
use std::time::Duration;

use flowbridge_id::ResourceId;
use flowbridge_node_sync::cluster::{ChannelNodeSource, Node};
use flowbridge_node_sync::{
    NodePhase, NodeSnapshot, NodeSynchronizer, Notification, RecordingScheduler, Registry,
    RegistryError, SyncError,
};
use flowbridge_proto::firmament::{ResourceState, ResourceType};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::runtime::watcher::Event;
use kube::ResourceExt;
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

struct Harness {
    events: mpsc::UnboundedSender<Event<Node>>,
    shutdown: watch::Sender<bool>,
    scheduler: Arc<RecordingScheduler>,
    registry: Arc<Registry>,
    synchronizer: Arc<NodeSynchronizer>,
    run: JoinHandle<Result<(), SyncError>>,
}

impl Harness {
    fn start(workers: usize, cache_sync_timeout: Duration) -> Self {
        let scheduler = Arc::new(RecordingScheduler::new());
        let registry = Arc::new(Registry::new());
        let synchronizer = Arc::new(NodeSynchronizer::new(
            Arc::clone(&registry),
            scheduler.clone(),
        ));
        let (events, source) = ChannelNodeSource::new();
        let (shutdown, shutdown_rx) = watch::channel(false);
        let run = tokio::spawn(Arc::clone(&synchronizer).run(
            source,
            workers,
            cache_sync_timeout,
            shutdown_rx,
        ));

        Self {
            events,
            shutdown,
            scheduler,
            registry,
            synchronizer,
            run,
        }
    }

    fn list(&self, nodes: Vec<Node>) {
        self.events.send(Event::Init).unwrap();
        for node in nodes {
            self.events.send(Event::InitApply(node)).unwrap();
        }
        self.events.send(Event::InitDone).unwrap();
    }

    fn modified(&self, node: Node) {
        self.events.send(Event::Apply(node)).unwrap();
    }

    fn deleted(&self, node: Node) {
        self.events.send(Event::Delete(node)).unwrap();
    }

    async fn wait_for_notifications(&self, count: usize) -> Vec<Notification> {
        for _ in 0..200 {
            let notifications = self.scheduler.notifications();
            if notifications.len() >= count {
                return notifications;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {count} notifications, got {:?}",
            self.scheduler.notifications()
        );
    }

    async fn stop(self) -> Result<(), SyncError> {
        self.shutdown.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), self.run)
            .await
            .expect("run did not stop")
            .expect("run panicked")
    }
}

fn node(name: &str, version: u32) -> Node {
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Node",
        "metadata": {
            "name": name,
            "resourceVersion": version.to_string(),
            "labels": { "zone": "a" }
        },
        "spec": {},
        "status": {
            "conditions": [
                { "type": "Ready", "status": "True" },
                { "type": "OutOfDisk", "status": "False" }
            ],
            "capacity": { "cpu": "2", "memory": "4096Mi" },
            "allocatable": { "cpu": "1500m", "memory": "3Gi" }
        }
    }))
    .unwrap()
}

fn cordon(node: &mut Node) {
    node.spec.get_or_insert_with(Default::default).unschedulable = Some(true);
}

fn set_condition(node: &mut Node, condition_type: &str, status: &str) {
    let conditions = node
        .status
        .as_mut()
        .and_then(|status| status.conditions.as_mut())
        .unwrap();
    for condition in conditions.iter_mut().filter(|c| c.type_ == condition_type) {
        condition.status = status.to_string();
    }
}

fn machine_id(hostname: &str) -> String {
    ResourceId::from_seed(hostname).to_string()
}

#[tokio::test]
async fn test_add_then_fail() {
    let harness = Harness::start(2, Duration::from_secs(5));
    harness.list(vec![node("n1", 1)]);

    let notifications = harness.wait_for_notifications(1).await;
    let Notification::Added(tree) = &notifications[0] else {
        panic!("expected node added, got {notifications:?}");
    };
    let machine = tree.resource_desc.as_ref().unwrap();
    assert_eq!(machine.r#type, ResourceType::Machine as i32);
    assert_eq!(machine.state, ResourceState::Idle as i32);
    let capacity = machine.resource_capacity.clone().unwrap();
    assert_eq!(capacity.cpu_cores, 2000.0);
    assert_eq!(capacity.ram_cap, 4096 * 1024);

    assert_eq!(tree.children.len(), 1);
    let pu = tree.children[0].resource_desc.as_ref().unwrap();
    assert_eq!(pu.r#type, ResourceType::Pu as i32);
    assert_eq!(pu.state, ResourceState::Idle as i32);
    assert_eq!(harness.registry.resource_ids().len(), 2);

    let mut failed = node("n1", 2);
    set_condition(&mut failed, "Ready", "False");
    harness.modified(failed);

    let notifications = harness.wait_for_notifications(2).await;
    assert_eq!(notifications[1], Notification::Failed(machine_id("n1")));
    assert!(harness.registry.is_empty());
    assert!(harness.registry.resource_ids().is_empty());

    harness.stop().await.unwrap();
}

// Ids derive from the hostname, so a node that comes back keeps its machine id.
#[tokio::test]
async fn test_uncordoned_node_returns_with_same_machine_id() {
    let harness = Harness::start(2, Duration::from_secs(5));
    harness.list(vec![node("n1", 1)]);
    harness.wait_for_notifications(1).await;

    let mut cordoned = node("n1", 2);
    cordon(&mut cordoned);
    harness.modified(cordoned);
    let notifications = harness.wait_for_notifications(2).await;
    assert_eq!(notifications[1], Notification::Removed(machine_id("n1")));
    assert!(!harness.registry.contains_host("n1"));

    harness.modified(node("n1", 3));
    let notifications = harness.wait_for_notifications(3).await;
    let Notification::Added(tree) = &notifications[2] else {
        panic!("expected node added, got {notifications:?}");
    };
    assert_eq!(tree.uuid(), machine_id("n1"));
    assert!(harness.registry.contains_host("n1"));
    assert!(harness.registry.is_consistent());

    harness.stop().await.unwrap();
}

#[tokio::test]
async fn test_label_only_update() {
    let harness = Harness::start(1, Duration::from_secs(5));
    harness.list(vec![node("n1", 1), node("n2", 1)]);
    harness.wait_for_notifications(2).await;

    let mut relabelled = node("n1", 2);
    relabelled
        .labels_mut()
        .insert("gpu".to_string(), "true".to_string());
    harness.modified(relabelled);

    let notifications = harness.wait_for_notifications(3).await;
    let Notification::Updated(tree) = &notifications[2] else {
        panic!("expected node updated, got {notifications:?}");
    };
    assert_eq!(tree.uuid(), machine_id("n1"));
    let keys: Vec<_> = tree
        .resource_desc
        .as_ref()
        .unwrap()
        .labels
        .iter()
        .map(|label| label.key.as_str())
        .collect();
    assert_eq!(keys, vec!["gpu", "zone"]);
    assert_eq!(harness.registry.len(), 2);
    assert_eq!(harness.registry.resource_ids().len(), 4);

    harness.stop().await.unwrap();
}

#[tokio::test]
async fn test_heartbeat_update_is_ignored() {
    let harness = Harness::start(1, Duration::from_secs(5));
    harness.list(vec![node("n1", 1)]);
    harness.wait_for_notifications(1).await;

    let mut heartbeat = node("n1", 2);
    heartbeat
        .status
        .as_mut()
        .and_then(|status| status.allocatable.as_mut())
        .unwrap()
        .insert("cpu".to_string(), Quantity("1400m".to_string()));
    harness.modified(heartbeat);
    harness.modified(node("n2", 1));

    let notifications = harness.wait_for_notifications(2).await;
    assert!(matches!(&notifications[1], Notification::Added(tree) if tree.uuid() == machine_id("n2")));
    assert_eq!(notifications.len(), 2);

    harness.stop().await.unwrap();
}

#[tokio::test]
async fn test_delete_unknown_node_is_suppressed() {
    let harness = Harness::start(2, Duration::from_secs(5));
    let mut cordoned = node("n2", 1);
    cordon(&mut cordoned);
    harness.list(vec![node("n1", 1), cordoned.clone()]);
    harness.wait_for_notifications(1).await;

    harness.deleted(cordoned);
    harness.deleted(node("n1", 2));

    let notifications = harness.wait_for_notifications(2).await;
    assert_eq!(notifications[1], Notification::Removed(machine_id("n1")));
    assert_eq!(notifications.len(), 2);
    assert!(harness.registry.is_empty());

    harness.stop().await.unwrap();
}

#[tokio::test]
async fn test_registry_duality_after_churn() {
    let harness = Harness::start(4, Duration::from_secs(5));
    let nodes: Vec<_> = (0..8).map(|i| node(&format!("n{i}"), 1)).collect();
    harness.list(nodes);
    harness.wait_for_notifications(8).await;

    for i in 0..8 {
        let mut next = node(&format!("n{i}"), 2);
        match i % 3 {
            0 => cordon(&mut next),
            1 => set_condition(&mut next, "OutOfDisk", "True"),
            _ => {
                next.labels_mut().insert("rack".to_string(), i.to_string());
            }
        }
        harness.modified(next);
    }
    harness.wait_for_notifications(16).await;

    assert!(harness.registry.is_consistent());
    assert_eq!(harness.registry.len(), 2);
    assert_eq!(harness.registry.resource_ids().len(), 4);

    harness.stop().await.unwrap();
}

#[tokio::test]
async fn test_invariant_violation_stops_run() {
    let harness = Harness::start(2, Duration::from_secs(5));
    harness.list(vec![]);
    tokio::time::sleep(Duration::from_millis(50)).await;

    harness
        .synchronizer
        .queue()
        .add("ghost".to_string(), NodeSnapshot::deleted("ghost"));

    let result = tokio::time::timeout(Duration::from_secs(5), harness.run)
        .await
        .expect("run did not stop")
        .expect("run panicked");
    assert!(matches!(
        result,
        Err(SyncError::InvariantViolation(RegistryError::NotRegistered(ref host))) if host == "ghost"
    ));
}

#[tokio::test]
async fn test_invariant_violation_halts_other_workers() {
    let harness = Harness::start(2, Duration::from_secs(5));
    let queue = harness.synchronizer.queue();
    queue.add("ghost".to_string(), NodeSnapshot::deleted("ghost"));
    for i in 0..50 {
        let mut added = NodeSnapshot::deleted(format!("n{i}"));
        added.phase = NodePhase::Added;
        queue.add(added.hostname.clone(), added);
    }
    harness.list(vec![]);

    let result = tokio::time::timeout(Duration::from_secs(5), harness.run)
        .await
        .expect("run did not stop")
        .expect("run panicked");
    assert!(matches!(
        result,
        Err(SyncError::InvariantViolation(RegistryError::NotRegistered(ref host))) if host == "ghost"
    ));
    assert!(harness.synchronizer.is_halted());
    assert!(harness.scheduler.notifications().is_empty());
    assert!(harness.registry.is_empty());
    assert!(harness.synchronizer.queue().is_empty());
}

#[tokio::test]
async fn test_duplicate_add_is_fatal() {
    let harness = Harness::start(1, Duration::from_secs(5));
    harness.list(vec![node("n1", 1)]);
    harness.wait_for_notifications(1).await;

    let mut again = NodeSnapshot::deleted("n1");
    again.phase = NodePhase::Added;
    harness.synchronizer.queue().add("n1".to_string(), again);

    let result = tokio::time::timeout(Duration::from_secs(5), harness.run)
        .await
        .expect("run did not stop")
        .expect("run panicked");
    assert!(matches!(
        result,
        Err(SyncError::InvariantViolation(RegistryError::AlreadyRegistered(_)))
    ));
    assert!(harness.registry.is_consistent());
}

#[tokio::test]
async fn test_cache_sync_timeout() {
    let harness = Harness::start(2, Duration::from_millis(100));

    let result = tokio::time::timeout(Duration::from_secs(5), harness.run)
        .await
        .expect("run did not stop")
        .expect("run panicked");
    assert!(matches!(result, Err(SyncError::CacheSyncTimeout(_))));
    assert!(harness.scheduler.notifications().is_empty());
}

#[tokio::test]
async fn test_shutdown_before_sync() {
    let harness = Harness::start(2, Duration::from_secs(30));
    harness.stop().await.unwrap();
}

#[tokio::test]
async fn test_events_before_sync_are_processed_after() {
    let harness = Harness::start(2, Duration::from_secs(5));
    harness.list(vec![node("n1", 1), node("n2", 1)]);

    let notifications = harness.wait_for_notifications(2).await;
    assert!(notifications
        .iter()
        .all(|n| matches!(n, Notification::Added(_))));
    assert_eq!(
        harness.registry.hostnames().into_iter().collect::<Vec<_>>(),
        vec!["n1".to_string(), "n2".to_string()]
    );

    harness.stop().await.unwrap();
}
