//! The event-test session
//!
//! `EventTest` owns one store, one event log and one type assertion trail.
//! Mutations go through [`EventTest::trigger`], which writes the store and
//! records the write. Assertions read the store and either fail with an
//! [`AssertionError`] or return `&mut Self` so calls chain with `?`.
//!
//! ```
//! use eventtest_core::{Shape, TypeCategory};
//! use eventtest_engine::EventTest;
//! use serde_json::json;
//!
//! # fn main() -> eventtest_core::Result<()> {
//! let mut t = EventTest::new(json!({"count": 0, "items": []}))?;
//! t.trigger("count", 5)?
//!     .assert_path("count", 5)?
//!     .assert_type("count", TypeCategory::Number)?
//!     .trigger("items", json!([{"id": 1}]))?
//!     .assert_array_of("items", [("id", TypeCategory::Number)])?
//!     .assert_array_length("items", 1)?
//!     .assert_event_fired("count", 1)?;
//! assert_eq!(t.event_log().len(), 2);
//! # Ok(())
//! # }
//! ```

use eventtest_core::{
    AssertionError, EventLogEntry, JsonValue, Result, Shape, TypeAssertion, TypeCategory,
};
use eventtest_store::{parse_path, JsonStore, PathStore};
use serde_json::Value;
use tracing::debug;

use crate::assertions;
use crate::collector::TypeAssertionCollector;
use crate::recorder::EventRecorder;
use crate::signature::TypeSignature;

/// Event-sequence test session over a path store
pub struct EventTest<S: PathStore = JsonStore> {
    store: S,
    recorder: EventRecorder,
    collector: TypeAssertionCollector,
}

impl EventTest<JsonStore> {
    /// Create a session over a fresh [`JsonStore`] seeded from `initial_state`
    ///
    /// # Errors
    ///
    /// Fails if the snapshot is not an object (`null` counts as empty).
    pub fn new(initial_state: impl Into<JsonValue>) -> Result<Self> {
        let store = JsonStore::new(initial_state.into())?;
        Ok(Self::with_store(store))
    }

    /// Create a session over an empty store
    pub fn empty() -> Self {
        Self::with_store(JsonStore::empty())
    }
}

impl Default for EventTest<JsonStore> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: PathStore> EventTest<S> {
    /// Create a session over an existing store
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            recorder: EventRecorder::new(),
            collector: TypeAssertionCollector::new(),
        }
    }

    /// Write `value` at `path` and record the write
    ///
    /// Intermediate objects are created for deep paths. Nothing is recorded
    /// if the store rejects the write.
    pub fn trigger(&mut self, path: &str, value: impl Into<JsonValue>) -> Result<&mut Self> {
        let parsed = parse_path(path)?;
        let value = value.into();
        self.store.set(&parsed, value.clone())?;
        self.recorder.record(path, value);
        if let Some(entry) = self.recorder.last() {
            debug!(target: "eventtest::session", events = self.recorder.len(), %entry, "trigger");
        }
        Ok(self)
    }

    /// Assert the value at `path` deep-equals `expected`
    pub fn assert_path(&mut self, path: &str, expected: impl Into<JsonValue>) -> Result<&mut Self> {
        let expected = expected.into();
        let actual = self.read(path);
        let outcome = assertions::check_path(path, actual.as_ref(), &expected);
        self.finish("assert_path", path, outcome)
    }

    /// Assert the runtime category of the value at `path`
    pub fn assert_type(&mut self, path: &str, expected: TypeCategory) -> Result<&mut Self> {
        let actual = self.read(path);
        let outcome = assertions::check_type(path, actual.as_ref(), expected);
        if outcome.is_ok() {
            self.collector.record_primitive(path, expected);
        }
        self.finish("assert_type", path, outcome)
    }

    /// Assert the value at `path` is an object matching `shape`
    pub fn assert_shape(&mut self, path: &str, shape: impl Into<Shape>) -> Result<&mut Self> {
        let shape = shape.into();
        let actual = self.read(path);
        let outcome = assertions::check_shape(path, actual.as_ref(), &shape);
        if outcome.is_ok() {
            self.collector.record_shape(path, shape);
        }
        self.finish("assert_shape", path, outcome)
    }

    /// Assert the value at `path` is an array whose elements all match
    /// `element_shape`
    ///
    /// An empty array passes for any shape.
    pub fn assert_array_of(
        &mut self,
        path: &str,
        element_shape: impl Into<Shape>,
    ) -> Result<&mut Self> {
        let element_shape = element_shape.into();
        let actual = self.read(path);
        let outcome = assertions::check_array_of(path, actual.as_ref(), &element_shape);
        if outcome.is_ok() {
            self.collector.record_array_shape(path, element_shape);
        }
        self.finish("assert_array_of", path, outcome)
    }

    /// Assert the value at `path` is an array of exactly `expected` elements
    pub fn assert_array_length(&mut self, path: &str, expected: usize) -> Result<&mut Self> {
        let actual = self.read(path);
        let outcome = assertions::check_array_length(path, actual.as_ref(), expected);
        self.finish("assert_array_length", path, outcome)
    }

    /// Assert exactly `expected` triggers used `path`
    ///
    /// Matching is exact; writes to `user.name` do not count for `user`.
    pub fn assert_event_fired(&mut self, path: &str, expected: usize) -> Result<&mut Self> {
        let outcome = assertions::check_fire_count(path, &self.recorder, expected);
        self.finish("assert_event_fired", path, outcome)
    }

    /// Copy of the event log in trigger order
    pub fn event_log(&self) -> Vec<EventLogEntry> {
        self.recorder.snapshot()
    }

    /// Copy of the type assertion trail in call order
    pub fn type_assertions(&self) -> Vec<TypeAssertion> {
        self.collector.snapshot()
    }

    /// Type signature folded from the trail so far
    pub fn signature(&self) -> TypeSignature {
        TypeSignature::from_assertions(self.collector.entries())
    }

    /// Current value at `path`
    ///
    /// `None` if the path is missing or does not parse.
    pub fn value_at(&self, path: &str) -> Option<JsonValue> {
        let parsed = parse_path(path).ok()?;
        self.store.get(&parsed)
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store
    ///
    /// Writes made this way bypass `trigger` and are not recorded in the
    /// event log, so `assert_event_fired` does not see them.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the session, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Run `f` inside a store batch
    ///
    /// Each trigger inside `f` is still recorded on its own; only the
    /// store's change notifications are coalesced.
    ///
    /// The batch is closed even if `f` panics.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.store.begin_batch();
        let mut guard = SessionBatch(self);
        f(&mut *guard.0)
    }

    // An unparsable path addresses nothing, so assertions see `undefined`.
    fn read(&self, path: &str) -> Option<Value> {
        self.value_at(path).map(JsonValue::into_inner)
    }

    fn finish(
        &mut self,
        op: &'static str,
        path: &str,
        outcome: std::result::Result<(), AssertionError>,
    ) -> Result<&mut Self> {
        match outcome {
            Ok(()) => {
                debug!(target: "eventtest::session", op, path, "passed");
                Ok(self)
            }
            Err(e) => {
                debug!(target: "eventtest::session", op, path, error = %e, "failed");
                Err(e.into())
            }
        }
    }
}

struct SessionBatch<'a, S: PathStore>(&'a mut EventTest<S>);

impl<S: PathStore> Drop for SessionBatch<'_, S> {
    fn drop(&mut self) {
        self.0.store.end_batch();
    }
}

impl<S: PathStore + std::fmt::Debug> std::fmt::Debug for EventTest<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTest")
            .field("store", &self.store)
            .field("events", &self.recorder.len())
            .field("type_assertions", &self.collector.len())
            .finish()
    }
}
