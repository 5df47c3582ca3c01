//! eventtest - event-sequence assertions for path-addressed state
//!
//! A test session wraps a store whose state is a JSON object addressed by
//! dot-delimited paths. Writes go through `trigger`, which records every
//! mutation; assertions check values, runtime types, object shapes, array
//! contents and how often each path was written. Successful type-level
//! assertions accumulate into a trail that can be folded into a type
//! signature.
//!
//! # Quick Start
//!
//! ```
//! use eventtest::{EventTest, TypeCategory};
//! use serde_json::json;
//!
//! # fn main() -> eventtest::Result<()> {
//! let mut t = EventTest::new(json!({"user": {"name": "Alice"}}))?;
//! t.trigger("user.email", "alice@example.com")?
//!     .assert_shape(
//!         "user",
//!         [("name", TypeCategory::String), ("email", TypeCategory::String)],
//!     )?
//!     .assert_event_fired("user.email", 1)?;
//!
//! println!("{}", t.signature().to_typescript("State"));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `eventtest-core`: JSON paths, type categories, records and errors
//! - `eventtest-store`: the `PathStore` contract and the in-memory `JsonStore`
//! - `eventtest-engine`: recorder, collector, assertions and the `EventTest` session
//! - `eventtest-runner`: labelled test cases, suites and runner config

pub use eventtest_core::{
    AssertionError, Error, EventLogEntry, JsonPath, JsonValue, Result, Shape, StoreError,
    Timestamp, TypeAssertion, TypeCategory,
};
pub use eventtest_engine::{
    EventRecorder, EventTest, SignatureNode, TypeAssertionCollector, TypeSignature,
};
pub use eventtest_runner::{run_tests, run_tests_with, test, RunSummary, RunnerConfig, TestSuite};
pub use eventtest_store::{parse_path, BatchGuard, JsonStore, PathStore, SubscriptionId};

/// Lower-level crates, for callers that need more than the re-exports
pub mod crates {
    pub use eventtest_core as core;
    pub use eventtest_engine as engine;
    pub use eventtest_runner as runner;
    pub use eventtest_store as store;
}
