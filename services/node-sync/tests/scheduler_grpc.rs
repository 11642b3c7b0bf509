//! gRPC notifications against an in-process scheduler.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flowbridge_node_sync::{Config, GrpcSchedulerClient, SchedulerClient, SchedulerError};
use flowbridge_proto::firmament::{
    FirmamentScheduler, FirmamentSchedulerServer, NodeAddedResponse, NodeFailedResponse,
    NodeRemovedResponse, NodeReplyType, NodeUpdatedResponse, ResourceDescriptor,
    ResourceTopologyNodeDescriptor, ResourceUid,
};
use flowbridge_reconcile::BackoffPolicy;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

#[derive(Default)]
struct FakeScheduler {
    calls: Mutex<Vec<String>>,
    /// Calls answered with `UNAVAILABLE` before the real reply.
    unavailable: AtomicU32,
    remove_reply: Mutex<Option<NodeReplyType>>,
}

impl FakeScheduler {
    fn record(&self, call: String) -> Result<(), Status> {
        self.calls.lock().push(call);
        let remaining = self.unavailable.load(Ordering::SeqCst);
        if remaining > 0 {
            self.unavailable.store(remaining - 1, Ordering::SeqCst);
            return Err(Status::unavailable("warming up"));
        }
        Ok(())
    }
}

#[tonic::async_trait]
impl FirmamentScheduler for FakeScheduler {
    async fn node_added(
        &self,
        request: Request<ResourceTopologyNodeDescriptor>,
    ) -> Result<Response<NodeAddedResponse>, Status> {
        self.record(format!("added {}", request.get_ref().uuid()))?;
        Ok(Response::new(NodeAddedResponse {
            r#type: NodeReplyType::NodeAddedOk as i32,
        }))
    }

    async fn node_failed(
        &self,
        request: Request<ResourceUid>,
    ) -> Result<Response<NodeFailedResponse>, Status> {
        self.record(format!("failed {}", request.get_ref().resource_uid))?;
        Ok(Response::new(NodeFailedResponse {
            r#type: NodeReplyType::NodeFailedOk as i32,
        }))
    }

    async fn node_removed(
        &self,
        request: Request<ResourceUid>,
    ) -> Result<Response<NodeRemovedResponse>, Status> {
        self.record(format!("removed {}", request.get_ref().resource_uid))?;
        let reply = self.remove_reply.lock().unwrap_or(NodeReplyType::NodeRemovedOk);
        Ok(Response::new(NodeRemovedResponse {
            r#type: reply as i32,
        }))
    }

    async fn node_updated(
        &self,
        request: Request<ResourceTopologyNodeDescriptor>,
    ) -> Result<Response<NodeUpdatedResponse>, Status> {
        self.record(format!("updated {}", request.get_ref().uuid()))?;
        Ok(Response::new(NodeUpdatedResponse {
            r#type: NodeReplyType::NodeUpdatedOk as i32,
        }))
    }
}

async fn serve(scheduler: Arc<FakeScheduler>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(
        tonic::transport::Server::builder()
            .add_service(FirmamentSchedulerServer::from_arc(scheduler))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );
    addr
}

fn client(addr: SocketAddr, max_retries: u32) -> GrpcSchedulerClient {
    let config = Config {
        scheduler_addr: addr.to_string(),
        rpc_timeout: Duration::from_secs(2),
        rpc_max_retries: max_retries,
        ..Config::default()
    };
    GrpcSchedulerClient::new(&config)
        .unwrap()
        .with_backoff(BackoffPolicy::fixed_ratio(
            Duration::from_millis(10),
            Duration::from_millis(10),
        ))
}

fn tree(uuid: &str) -> ResourceTopologyNodeDescriptor {
    ResourceTopologyNodeDescriptor {
        resource_desc: Some(ResourceDescriptor {
            uuid: uuid.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_lifecycle_calls_reach_scheduler() {
    let scheduler = Arc::new(FakeScheduler::default());
    let client = client(serve(Arc::clone(&scheduler)).await, 0);

    client.node_added(&tree("m1")).await.unwrap();
    client.node_updated(&tree("m1")).await.unwrap();
    client.node_failed("m1").await.unwrap();
    client.node_removed("m2").await.unwrap();

    assert_eq!(
        *scheduler.calls.lock(),
        ["added m1", "updated m1", "failed m1", "removed m2"]
    );
}

#[tokio::test]
async fn test_unavailable_scheduler_is_retried() {
    let scheduler = Arc::new(FakeScheduler::default());
    scheduler.unavailable.store(2, Ordering::SeqCst);
    let client = client(serve(Arc::clone(&scheduler)).await, 3);

    client.node_added(&tree("m1")).await.unwrap();

    assert_eq!(scheduler.calls.lock().len(), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let scheduler = Arc::new(FakeScheduler::default());
    scheduler.unavailable.store(10, Ordering::SeqCst);
    let client = client(serve(Arc::clone(&scheduler)).await, 1);

    let err = client.node_failed("m1").await.unwrap_err();

    assert!(matches!(err, SchedulerError::Rpc { .. }));
    assert_eq!(scheduler.calls.lock().len(), 2);
}

#[tokio::test]
async fn test_not_found_reply_counts_as_delivered() {
    let scheduler = Arc::new(FakeScheduler::default());
    *scheduler.remove_reply.lock() = Some(NodeReplyType::NodeNotFound);
    let client = client(serve(Arc::clone(&scheduler)).await, 3);

    client.node_removed("m1").await.unwrap();

    assert_eq!(scheduler.calls.lock().len(), 1);
}
