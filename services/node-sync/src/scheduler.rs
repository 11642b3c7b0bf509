//! Notifications to the flow scheduler.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use flowbridge_proto::firmament::{
    FirmamentSchedulerClient, NodeReplyType, ResourceTopologyNodeDescriptor, ResourceUid,
};
use flowbridge_reconcile::BackoffPolicy;
use parking_lot::Mutex;
use tonic::transport::Channel;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::SchedulerError;

/// Outbound node lifecycle notifications.
#[async_trait]
pub trait SchedulerClient: Send + Sync {
    async fn node_added(&self, tree: &ResourceTopologyNodeDescriptor) -> Result<(), SchedulerError>;

    async fn node_removed(&self, machine_id: &str) -> Result<(), SchedulerError>;

    async fn node_failed(&self, machine_id: &str) -> Result<(), SchedulerError>;

    async fn node_updated(&self, tree: &ResourceTopologyNodeDescriptor)
        -> Result<(), SchedulerError>;
}

/// Scheduler client speaking gRPC.
pub struct GrpcSchedulerClient {
    client: FirmamentSchedulerClient<Channel>,
    rpc_timeout: Duration,
    max_retries: u32,
    backoff: BackoffPolicy,
}

impl GrpcSchedulerClient {
    /// Create a client. The connection is established on first use, so an
    /// unreachable scheduler does not prevent startup.
    pub fn new(config: &Config) -> Result<Self, SchedulerError> {
        let addr = if config.scheduler_addr.contains("://") {
            config.scheduler_addr.clone()
        } else {
            format!("http://{}", config.scheduler_addr)
        };

        let channel = Channel::from_shared(addr.clone())
            .map_err(|e| SchedulerError::InvalidEndpoint {
                addr,
                reason: e.to_string(),
            })?
            .connect_timeout(config.rpc_timeout)
            .connect_lazy();

        Ok(Self {
            client: FirmamentSchedulerClient::new(channel),
            rpc_timeout: config.rpc_timeout,
            max_retries: config.rpc_max_retries,
            backoff: BackoffPolicy::default(),
        })
    }

    /// Override the retry backoff.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    async fn with_retries<F, Fut>(
        &self,
        call: &'static str,
        mut attempt: F,
    ) -> Result<(), SchedulerError>
    where
        F: FnMut(FirmamentSchedulerClient<Channel>) -> Fut,
        Fut: Future<Output = Result<i32, tonic::Status>>,
    {
        let mut retries = 0;
        loop {
            let call_future = attempt(self.client.clone());
            let result = match tokio::time::timeout(self.rpc_timeout, call_future).await {
                Ok(Ok(reply)) => check_reply(call, reply),
                Ok(Err(status)) => Err(SchedulerError::Rpc { call, status }),
                Err(_) => Err(SchedulerError::Timeout {
                    call,
                    timeout: self.rpc_timeout,
                }),
            };

            match result {
                Err(e) if e.is_retryable() && retries < self.max_retries => {
                    let delay = self.backoff.delay(retries);
                    warn!(
                        call,
                        retry = retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Scheduler call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                other => return other,
            }
        }
    }
}

fn check_reply(call: &'static str, reply: i32) -> Result<(), SchedulerError> {
    match NodeReplyType::try_from(reply) {
        Ok(kind) if kind.is_ok() => {
            debug!(call, "Scheduler acknowledged");
            Ok(())
        }
        Ok(kind @ (NodeReplyType::NodeNotFound | NodeReplyType::NodeAlreadyExists)) => {
            warn!(call, reply = ?kind, "Scheduler state already matches, treating as delivered");
            Ok(())
        }
        _ => Err(SchedulerError::UnexpectedReply { call, reply }),
    }
}

#[async_trait]
impl SchedulerClient for GrpcSchedulerClient {
    async fn node_added(&self, tree: &ResourceTopologyNodeDescriptor) -> Result<(), SchedulerError> {
        self.with_retries("NodeAdded", |mut client| {
            let request = tree.clone();
            async move {
                client
                    .node_added(request)
                    .await
                    .map(|response| response.into_inner().r#type)
            }
        })
        .await
    }

    async fn node_removed(&self, machine_id: &str) -> Result<(), SchedulerError> {
        self.with_retries("NodeRemoved", |mut client| {
            let request = ResourceUid {
                resource_uid: machine_id.to_string(),
            };
            async move {
                client
                    .node_removed(request)
                    .await
                    .map(|response| response.into_inner().r#type)
            }
        })
        .await
    }

    async fn node_failed(&self, machine_id: &str) -> Result<(), SchedulerError> {
        self.with_retries("NodeFailed", |mut client| {
            let request = ResourceUid {
                resource_uid: machine_id.to_string(),
            };
            async move {
                client
                    .node_failed(request)
                    .await
                    .map(|response| response.into_inner().r#type)
            }
        })
        .await
    }

    async fn node_updated(
        &self,
        tree: &ResourceTopologyNodeDescriptor,
    ) -> Result<(), SchedulerError> {
        self.with_retries("NodeUpdated", |mut client| {
            let request = tree.clone();
            async move {
                client
                    .node_updated(request)
                    .await
                    .map(|response| response.into_inner().r#type)
            }
        })
        .await
    }
}

/// A notification captured by [`RecordingScheduler`].
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Added(ResourceTopologyNodeDescriptor),
    Removed(String),
    Failed(String),
    Updated(ResourceTopologyNodeDescriptor),
}

/// In-memory scheduler that records every notification.
#[derive(Default)]
pub struct RecordingScheduler {
    notifications: Mutex<Vec<Notification>>,
    failing: Mutex<bool>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as unavailable. Calls are still
    /// recorded.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    /// Everything recorded so far, in call order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    fn record(&self, call: &'static str, notification: Notification) -> Result<(), SchedulerError> {
        self.notifications.lock().push(notification);
        if *self.failing.lock() {
            return Err(SchedulerError::Rpc {
                call,
                status: tonic::Status::unavailable("scheduler unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SchedulerClient for RecordingScheduler {
    async fn node_added(&self, tree: &ResourceTopologyNodeDescriptor) -> Result<(), SchedulerError> {
        self.record("NodeAdded", Notification::Added(tree.clone()))
    }

    async fn node_removed(&self, machine_id: &str) -> Result<(), SchedulerError> {
        self.record("NodeRemoved", Notification::Removed(machine_id.to_string()))
    }

    async fn node_failed(&self, machine_id: &str) -> Result<(), SchedulerError> {
        self.record("NodeFailed", Notification::Failed(machine_id.to_string()))
    }

    async fn node_updated(
        &self,
        tree: &ResourceTopologyNodeDescriptor,
    ) -> Result<(), SchedulerError> {
        self.record("NodeUpdated", Notification::Updated(tree.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_reply() {
        assert!(check_reply("NodeAdded", NodeReplyType::NodeAddedOk as i32).is_ok());
        assert!(check_reply("NodeRemoved", NodeReplyType::NodeNotFound as i32).is_ok());
        assert!(check_reply("NodeAdded", NodeReplyType::NodeAlreadyExists as i32).is_ok());
        assert!(matches!(
            check_reply("NodeAdded", 99),
            Err(SchedulerError::UnexpectedReply { reply: 99, .. })
        ));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let config = Config {
            scheduler_addr: "http://bad host:9090".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            GrpcSchedulerClient::new(&config),
            Err(SchedulerError::InvalidEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_scheduler_gives_up_after_retries() {
        let config = Config {
            scheduler_addr: "127.0.0.1:1".to_string(),
            rpc_timeout: Duration::from_millis(500),
            rpc_max_retries: 1,
            ..Config::default()
        };
        let client = GrpcSchedulerClient::new(&config)
            .unwrap()
            .with_backoff(BackoffPolicy::fixed_ratio(
                Duration::from_millis(10),
                Duration::from_millis(10),
            ));

        assert!(client.node_removed("machine").await.is_err());
    }

    #[tokio::test]
    async fn test_recording_scheduler_records_failures_too() {
        let scheduler = RecordingScheduler::new();
        scheduler.node_removed("a").await.unwrap();
        scheduler.set_failing(true);
        assert!(scheduler.node_failed("b").await.is_err());

        assert_eq!(
            scheduler.notifications(),
            vec![
                Notification::Removed("a".to_string()),
                Notification::Failed("b".to_string()),
            ]
        );
    }
}
