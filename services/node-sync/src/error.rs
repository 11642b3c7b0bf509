//! Error types for the node synchronizer.

use std::time::Duration;

use thiserror::Error;

use crate::registry::RegistryError;

/// Errors from the cluster API client.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The client could not be configured from kubeconfig or the in-cluster
    /// environment.
    #[error("cluster client error: {0}")]
    Client(#[from] kube::Error),
}

/// Errors from calls to the flow scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The configured scheduler address is not a valid endpoint.
    #[error("invalid scheduler endpoint '{addr}': {reason}")]
    InvalidEndpoint { addr: String, reason: String },

    /// The RPC failed.
    #[error("{call} failed: {status}")]
    Rpc {
        call: &'static str,
        status: tonic::Status,
    },

    /// The RPC did not complete within the per-attempt timeout.
    #[error("{call} timed out after {timeout:?}")]
    Timeout {
        call: &'static str,
        timeout: Duration,
    },

    /// The scheduler answered with a reply type that means neither success
    /// nor a known state mismatch.
    #[error("{call} returned unexpected reply type {reply}")]
    UnexpectedReply { call: &'static str, reply: i32 },
}

impl SchedulerError {
    /// Returns true if the call may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SchedulerError::Timeout { .. } => true,
            SchedulerError::Rpc { status, .. } => matches!(
                status.code(),
                tonic::Code::Unavailable
                    | tonic::Code::DeadlineExceeded
                    | tonic::Code::ResourceExhausted
                    | tonic::Code::Aborted
            ),
            SchedulerError::InvalidEndpoint { .. } | SchedulerError::UnexpectedReply { .. } => {
                false
            }
        }
    }
}

/// Errors that stop the synchronizer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The registry and the event stream disagree about a node. Processing
    /// stops rather than let the registry and the scheduler diverge.
    #[error("registry invariant violated: {0}")]
    InvariantViolation(#[from] RegistryError),

    /// The initial node listing was not delivered in time.
    #[error("timed out after {0:?} waiting for the initial node listing")]
    CacheSyncTimeout(Duration),

    /// A worker task panicked.
    #[error("node worker panicked: {0}")]
    WorkerPanicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_scheduler_errors() {
        let unavailable = SchedulerError::Rpc {
            call: "NodeAdded",
            status: tonic::Status::unavailable("connection refused"),
        };
        assert!(unavailable.is_retryable());

        let timeout = SchedulerError::Timeout {
            call: "NodeAdded",
            timeout: Duration::from_secs(1),
        };
        assert!(timeout.is_retryable());

        let invalid = SchedulerError::Rpc {
            call: "NodeAdded",
            status: tonic::Status::invalid_argument("bad descriptor"),
        };
        assert!(!invalid.is_retryable());

        let reply = SchedulerError::UnexpectedReply {
            call: "NodeAdded",
            reply: 42,
        };
        assert!(!reply.is_retryable());
    }
}
