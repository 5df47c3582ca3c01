//! Core types for eventtest
//!
//! This crate defines the foundational types used throughout the system:
//! - JSON types: JsonValue, JsonPath, PathSegment, get_at_path, set_at_path
//! - Type categories: TypeCategory, Shape
//! - Records: EventLogEntry, TypeAssertion
//! - Timestamp: millisecond wall-clock stamps for the event log
//! - Error: AssertionError, StoreError and the crate-level Error

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;
pub mod primitives;
pub mod timestamp;
pub mod types;

pub use error::{AssertionError, Error, Result, StoreError, StoreResult};
pub use json::{
    deep_equal, get_at_path, set_at_path, value_type_name, JsonPath, JsonPathError, JsonValue,
    PathParseError, PathSegment,
};
pub use primitives::{EventLogEntry, TypeAssertion};
pub use timestamp::Timestamp;
pub use types::{Shape, TypeCategory, UnknownTypeCategory};
