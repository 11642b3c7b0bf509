//! # flowbridge-id
//!
//! Resource identifiers handed to the flow scheduler.
//!
//! ## Design Principles
//!
//! - A resource id is a UUID derived deterministically from a human-readable
//!   seed (a hostname, or `"{hostname}_PU #0"` for a processing unit)
//! - The same seed always yields the same id, across restarts and processes
//! - The canonical string form is the hyphenated lowercase UUID, which is
//!   what the scheduler expects on the wire
//!
//! Examples:
//! - `ResourceId::from_seed("node-1")`
//! - `ResourceId::from_seed("node-1_PU #0")`

mod types;

pub use types::*;
