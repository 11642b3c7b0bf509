//! flowbridge node synchronizer
//!
//! Mirrors the cluster's schedulable nodes into the flow scheduler's resource
//! topology.
//!
//! ```text
//! watcher ─▶ NodeInformer ─▶ classifier ─▶ NodeQueue ─▶ workers ─▶ Registry
//!                                                             └──────▶ scheduler
//! ```
//!
//! ## Modules
//!
//! - `cluster`: node accessors, `kube` watcher source and informer cache
//! - `classifier`: reduces node callbacks to lifecycle events
//! - `topology`: builds the machine/processing-unit tree for a node
//! - `registry`: hostname and resource id maps kept in step under one lock
//! - `scheduler`: outbound notifications over gRPC, with retries
//! - `synchronizer`: the worker pool and the `run` entry point

pub mod classifier;
pub mod cluster;
pub mod config;
pub mod error;
pub mod registry;
pub mod scheduler;
pub mod shutdown;
pub mod synchronizer;
pub mod topology;

pub use classifier::{NodePhase, NodeSnapshot};
pub use config::Config;
pub use error::{ClusterError, SchedulerError, SyncError};
pub use registry::{Registry, RegistryError};
pub use scheduler::{GrpcSchedulerClient, Notification, RecordingScheduler, SchedulerClient};
pub use synchronizer::{NodeQueue, NodeSynchronizer};
