//! Sources feeding the informer.

use std::sync::Arc;

use async_trait::async_trait;
use kube::runtime::watcher::Event;
use tokio::sync::{mpsc, watch};
use tracing::info;

use super::{Node, NodeInformer};
use crate::shutdown;

/// Delivers a full node listing followed by live changes into an informer.
#[async_trait]
pub trait NodeSource: Send + 'static {
    /// Run until shutdown is requested or the source is exhausted.
    async fn run(self: Box<Self>, informer: Arc<NodeInformer>, shutdown: watch::Receiver<bool>);
}

/// Source fed with watcher events through a channel, for tests and
/// embedding.
pub struct ChannelNodeSource {
    events: mpsc::UnboundedReceiver<Event<Node>>,
}

impl ChannelNodeSource {
    pub fn new() -> (mpsc::UnboundedSender<Event<Node>>, Self) {
        let (tx, events) = mpsc::unbounded_channel();
        (tx, Self { events })
    }
}

#[async_trait]
impl NodeSource for ChannelNodeSource {
    async fn run(
        self: Box<Self>,
        informer: Arc<NodeInformer>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut events = self.events;
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => informer.handle(event),
                    None => break,
                },
                _ = shutdown::signaled(&mut shutdown) => break,
            }
        }
        info!("Channel node source stopped");
    }
}
