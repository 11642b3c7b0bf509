//! Local node cache in front of the watcher stream.
//!
//! Watcher events are applied to a `kube` reflector store. Before each event
//! is applied the informer compares it with the stored object and turns the
//! difference into creation, update(old, new) and removal callbacks. A
//! relisting is diffed against the whole store once it completes. The store
//! becomes ready once the first listing has been applied.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use kube::runtime::reflector::{self, store::Writer, ObjectRef, Store};
use kube::runtime::watcher::Event;
use kube::ResourceExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info};

use super::{Node, NodeExt};
use crate::shutdown;

/// Callbacks invoked for node lifecycle changes. Calls are made one at a
/// time from the source task and must not block.
pub trait NodeEventHandler: Send + Sync {
    fn on_add(&self, node: &Node);
    fn on_update(&self, old: &Node, new: &Node);
    fn on_delete(&self, node: &Node);
}

/// Outcome of waiting for the initial listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    TimedOut,
    ShutDown,
}

enum Delivery {
    Add(Node),
    Update(Node, Node),
    Delete(Node),
}

struct Pending {
    writer: Writer<Node>,
    /// Objects of a listing in progress.
    relist: Vec<Node>,
}

/// Node cache that dispatches changes to a [`NodeEventHandler`].
pub struct NodeInformer {
    store: Store<Node>,
    pending: Mutex<Pending>,
    handler: Arc<dyn NodeEventHandler>,
}

impl NodeInformer {
    pub fn new(handler: Arc<dyn NodeEventHandler>) -> Self {
        let (store, writer) = reflector::store();
        Self {
            store,
            pending: Mutex::new(Pending {
                writer,
                relist: Vec::new(),
            }),
            handler,
        }
    }

    /// Apply one watcher event. Events must come from a single task.
    pub fn handle(&self, event: Event<Node>) {
        let deliveries = {
            let mut pending = self.pending.lock();
            match &event {
                Event::Init => {
                    pending.relist.clear();
                    Vec::new()
                }
                Event::InitApply(node) => {
                    pending.relist.push(node.clone());
                    Vec::new()
                }
                Event::InitDone => {
                    let listed = std::mem::take(&mut pending.relist);
                    self.diff_listing(listed)
                }
                Event::Apply(node) => match self.store.get(&ObjectRef::from_obj(node)) {
                    None => vec![Delivery::Add(node.clone())],
                    Some(old) if is_changed(&old, node) => {
                        vec![Delivery::Update(Node::clone(&old), node.clone())]
                    }
                    Some(_) => Vec::new(),
                },
                Event::Delete(node) => {
                    let last = self
                        .store
                        .get(&ObjectRef::from_obj(node))
                        .map(|old| Node::clone(&old))
                        .unwrap_or_else(|| node.clone());
                    vec![Delivery::Delete(last)]
                }
            }
        };

        self.dispatch(deliveries);

        // Readiness flips on the first `InitDone`, after its callbacks ran.
        self.pending.lock().writer.apply_watcher_event(&event);
        if matches!(event, Event::InitDone) {
            info!(nodes = self.len(), "Node listing delivered");
        }
    }

    /// New names become creations, changed objects updates and names missing
    /// from the listing removals.
    fn diff_listing(&self, listed: Vec<Node>) -> Vec<Delivery> {
        let mut known: HashMap<String, Arc<Node>> = self
            .store
            .state()
            .into_iter()
            .map(|node| (node.name_any(), node))
            .collect();

        let mut deliveries = Vec::new();
        for node in listed {
            match known.remove(node.hostname()) {
                None => deliveries.push(Delivery::Add(node)),
                Some(old) if is_changed(&old, &node) => {
                    deliveries.push(Delivery::Update(Node::clone(&old), node))
                }
                Some(_) => {}
            }
        }
        deliveries.extend(known.into_values().map(|old| Delivery::Delete(Node::clone(&old))));

        debug!(changes = deliveries.len(), "Diffed node listing");
        deliveries
    }

    /// Wait until the first listing has been delivered, the timeout expires
    /// or shutdown is requested.
    pub async fn wait_for_sync(
        &self,
        timeout: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> SyncStatus {
        let wait = async {
            tokio::select! {
                ready = self.store.wait_until_ready() => {
                    if ready.is_ok() { SyncStatus::Synced } else { SyncStatus::ShutDown }
                }
                _ = shutdown::signaled(&mut shutdown) => SyncStatus::ShutDown,
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .unwrap_or(SyncStatus::TimedOut)
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.store.state().len()
    }

    fn dispatch(&self, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            match delivery {
                Delivery::Add(node) => self.handler.on_add(&node),
                Delivery::Update(old, new) => self.handler.on_update(&old, &new),
                Delivery::Delete(node) => self.handler.on_delete(&node),
            }
        }
    }
}

/// Objects with equal resource versions are the same object; without versions
/// fall back to comparing content.
fn is_changed(old: &Node, new: &Node) -> bool {
    match (
        old.metadata.resource_version.as_deref(),
        new.metadata.resource_version.as_deref(),
    ) {
        (Some(a), Some(b)) => a != b,
        _ => old != new,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.calls.lock())
        }
    }

    fn version(node: &Node) -> &str {
        node.metadata.resource_version.as_deref().unwrap_or("-")
    }

    impl NodeEventHandler for Recorder {
        fn on_add(&self, node: &Node) {
            self.calls.lock().push(format!("add:{}", node.hostname()));
        }

        fn on_update(&self, old: &Node, new: &Node) {
            self.calls.lock().push(format!(
                "update:{}:{}->{}",
                new.hostname(),
                version(old),
                version(new)
            ));
        }

        fn on_delete(&self, node: &Node) {
            self.calls.lock().push(format!("delete:{}", node.hostname()));
        }
    }

    fn node(name: &str, rv: &str) -> Node {
        Node {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                resource_version: Some(rv.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn informer() -> (Arc<Recorder>, NodeInformer) {
        let recorder = Arc::new(Recorder::default());
        let informer = NodeInformer::new(recorder.clone());
        (recorder, informer)
    }

    fn list(informer: &NodeInformer, nodes: Vec<Node>) {
        informer.handle(Event::Init);
        for node in nodes {
            informer.handle(Event::InitApply(node));
        }
        informer.handle(Event::InitDone);
    }

    #[test]
    fn test_first_listing_adds() {
        let (recorder, informer) = informer();

        informer.handle(Event::Init);
        informer.handle(Event::InitApply(node("a", "1")));
        informer.handle(Event::InitApply(node("b", "1")));
        assert!(recorder.take().is_empty());
        informer.handle(Event::InitDone);

        assert_eq!(informer.len(), 2);
        let mut calls = recorder.take();
        calls.sort();
        assert_eq!(calls, vec!["add:a", "add:b"]);
    }

    #[test]
    fn test_relist_diffs_against_cache() {
        let (recorder, informer) = informer();
        list(&informer, vec![node("a", "1"), node("b", "1"), node("c", "1")]);
        recorder.take();

        list(&informer, vec![node("a", "1"), node("b", "2"), node("d", "1")]);

        let mut calls = recorder.take();
        calls.sort();
        assert_eq!(calls, vec!["add:d", "delete:c", "update:b:1->2"]);
        assert_eq!(informer.len(), 3);
    }

    #[test]
    fn test_watch_events_update_cache() {
        let (recorder, informer) = informer();
        list(&informer, vec![node("a", "1")]);
        recorder.take();

        informer.handle(Event::Apply(node("a", "2")));
        informer.handle(Event::Apply(node("b", "3")));
        informer.handle(Event::Apply(node("a", "2")));
        informer.handle(Event::Delete(node("a", "4")));

        assert_eq!(recorder.take(), vec!["update:a:1->2", "add:b", "delete:a"]);
        assert_eq!(informer.len(), 1);
    }

    #[test]
    fn test_delete_of_unknown_node_is_still_delivered() {
        let (recorder, informer) = informer();
        informer.handle(Event::Delete(node("ghost", "1")));
        assert_eq!(recorder.take(), vec!["delete:ghost"]);
    }

    #[tokio::test]
    async fn test_wait_for_sync_outcomes() {
        let (_recorder, informer) = informer();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let status = informer
            .wait_for_sync(Duration::from_millis(20), shutdown_rx.clone())
            .await;
        assert_eq!(status, SyncStatus::TimedOut);

        shutdown_tx.send(true).unwrap();
        let status = informer
            .wait_for_sync(Duration::from_secs(5), shutdown_rx)
            .await;
        assert_eq!(status, SyncStatus::ShutDown);

        let (_tx, fresh_rx) = watch::channel(false);
        list(&informer, vec![]);
        let status = informer
            .wait_for_sync(Duration::from_secs(5), fresh_rx)
            .await;
        assert_eq!(status, SyncStatus::Synced);
    }
}
