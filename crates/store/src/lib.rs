//! Path-addressed state store
//!
//! The event-test engine reads and writes state only through the
//! [`PathStore`] trait. [`JsonStore`] is the in-memory implementation used by
//! default: a JSON object tree addressed by dot-delimited paths, with change
//! subscribers whose notifications are coalesced inside a batch.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json_store;
pub mod traits;

pub use json_store::{JsonStore, Listener, SubscriptionId};
pub use traits::{parse_path, BatchGuard, PathStore};
