//! Wire types and gRPC stubs for the flow scheduler's
//! `firmament.FirmamentScheduler` service, generated from
//! `api/proto/firmament/firmament.proto`.

pub mod firmament {
    include!("gen/firmament.rs");

    pub use firmament_scheduler_client::FirmamentSchedulerClient;
    pub use firmament_scheduler_server::{FirmamentScheduler, FirmamentSchedulerServer};

    impl ResourceTopologyNodeDescriptor {
        /// UUID of this node's resource, or an empty string when the
        /// descriptor is missing.
        pub fn uuid(&self) -> &str {
            self.resource_desc
                .as_ref()
                .map(|rd| rd.uuid.as_str())
                .unwrap_or_default()
        }
    }

    impl NodeReplyType {
        /// Returns true for any of the `*_OK` replies.
        pub fn is_ok(self) -> bool {
            matches!(
                self,
                Self::NodeAddedOk | Self::NodeFailedOk | Self::NodeRemovedOk | Self::NodeUpdatedOk
            )
        }
    }
}
