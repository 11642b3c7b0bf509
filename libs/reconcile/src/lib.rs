//! Reconciliation loop primitives.
//!
//! This library provides the building blocks the node synchronizer uses to
//! turn a stream of watch callbacks into ordered, per-entity work:
//!
//! - **Keyed queue**: a blocking work queue that coalesces items per key and
//!   hands each key to at most one worker at a time.
//! - **Backoff**: exponential delay with jitter for retrying calls to remote
//!   collaborators.
//!
//! # Invariants
//!
//! - Items added for one key are observed by workers in the order they were added
//! - A key is never held by two workers at once
//! - No added item is dropped; items that arrive while their key is being
//!   processed are delivered in a later batch

mod backoff;
mod queue;

pub use backoff::BackoffPolicy;
pub use queue::KeyedQueue;
