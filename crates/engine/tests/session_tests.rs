//! Session integration tests
//!
//! Exercises `EventTest` over the default `JsonStore` and over a custom
//! `PathStore`, plus property tests for the trigger/assert contract.

use std::collections::BTreeMap;

use eventtest_core::{
    AssertionError, Error, JsonPath, JsonValue, Shape, StoreError, StoreResult, TypeCategory,
};
use eventtest_engine::EventTest;
use eventtest_store::PathStore;
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Test Helpers
// ============================================================================

/// Flat store keyed by path string that refuses writes under `locked`
#[derive(Debug, Default)]
struct FlatStore {
    values: BTreeMap<String, JsonValue>,
    batches_opened: usize,
    batches_closed: usize,
}

impl PathStore for FlatStore {
    fn get(&self, path: &JsonPath) -> Option<JsonValue> {
        self.values.get(&path.to_path_string()).cloned()
    }

    fn set(&mut self, path: &JsonPath, value: JsonValue) -> StoreResult<()> {
        let key = path.to_path_string();
        if key.starts_with("locked") {
            return Err(StoreError::Rejected(format!("{key} is read-only")));
        }
        self.values.insert(key, value);
        Ok(())
    }

    fn begin_batch(&mut self) {
        self.batches_opened += 1;
    }

    fn end_batch(&mut self) {
        self.batches_closed += 1;
    }

    fn snapshot(&self) -> JsonValue {
        let map: serde_json::Map<String, serde_json::Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone().into_inner()))
            .collect();
        JsonValue::from(serde_json::Value::Object(map))
    }
}

fn assertion_of(err: Error) -> AssertionError {
    match err {
        Error::Assertion(e) => e,
        other => panic!("expected assertion failure, got {other}"),
    }
}

// ============================================================================
// Custom Store
// ============================================================================

#[test]
fn custom_store_drives_assertions() {
    let mut t = EventTest::with_store(FlatStore::default());
    t.trigger("score", 10)
        .unwrap()
        .assert_path("score", 10)
        .unwrap()
        .assert_type("score", TypeCategory::Number)
        .unwrap()
        .assert_event_fired("score", 1)
        .unwrap();
    assert_eq!(t.store().values.len(), 1);
}

#[test]
fn custom_store_rejection_surfaces_as_store_error() {
    let mut t = EventTest::with_store(FlatStore::default());
    let err = t.trigger("locked.flag", true).unwrap_err();
    assert!(!err.is_assertion());
    assert!(matches!(err, Error::Store(StoreError::Rejected(_))));
    assert!(t.event_log().is_empty());
}

#[test]
fn batch_delegates_to_custom_store() {
    let mut t = EventTest::with_store(FlatStore::default());
    let fired = t.batch(|t| {
        t.trigger("a", 1).unwrap().trigger("b", 2).unwrap();
        t.event_log().len()
    });
    assert_eq!(fired, 2);
    assert_eq!(t.store().batches_opened, 1);
    assert_eq!(t.store().batches_closed, 1);
}

// ============================================================================
// Assertion failure kinds
// ============================================================================

#[test]
fn shape_failures_are_distinguishable() {
    let mut t = EventTest::new(json!({
        "list": [1],
        "nothing": null,
        "user": {"name": "Alice"},
        "typed": {"name": 7},
    }))
    .unwrap();
    let shape = Shape::from([("name", TypeCategory::String)]);

    let kinds: Vec<&str> = ["list", "nothing", "missing", "typed"]
        .iter()
        .map(|p| assertion_of(t.assert_shape(p, shape.clone()).unwrap_err()).kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "not an object",
            "not an object",
            "not an object",
            "property type mismatch"
        ]
    );

    let err = assertion_of(
        t.assert_shape("user", [("name", TypeCategory::String), ("email", TypeCategory::String)])
            .unwrap_err(),
    );
    assert_eq!(
        err,
        AssertionError::MissingProperty {
            path: "user".to_string(),
            index: None,
            key: "email".to_string(),
        }
    );
}

#[test]
fn array_of_reports_first_bad_element() {
    let mut t = EventTest::new(json!({
        "items": [{"id": 1}, {"id": 2}, {"name": "x"}, {"id": "4"}]
    }))
    .unwrap();
    let err = assertion_of(
        t.assert_array_of("items", [("id", TypeCategory::Number)])
            .unwrap_err(),
    );
    assert_eq!(err.kind(), "missing property");
    assert_eq!(err.element_index(), Some(2));
    assert_eq!(err.to_string(), "missing property `id` at `items[2]`");
}

#[test]
fn unparsable_assertion_path_reads_as_undefined() {
    let mut t = EventTest::new(json!({"user": {"name": "A"}, "cfg": {}})).unwrap();
    t.assert_type("a..b", TypeCategory::Undefined).unwrap();
    assert_eq!(t.value_at("user."), None);

    let err = assertion_of(t.assert_path("user.", 1).unwrap_err());
    assert_eq!(
        err,
        AssertionError::PathMismatch {
            path: "user.".to_string(),
            expected: JsonValue::from(1i64),
            actual: None,
        }
    );
    let err = t
        .assert_shape("cfg[x]", [("a", TypeCategory::String)])
        .unwrap_err();
    assert!(matches!(err, Error::Assertion(_)));
    let err = t.assert_array_length("items[", 0).unwrap_err();
    assert!(matches!(err, Error::Assertion(_)));
}

#[test]
fn unparsable_trigger_path_is_a_store_error() {
    let mut t = EventTest::empty();
    let err = t.trigger("a..b", 1).unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::InvalidPath { .. })));
    assert!(t.event_log().is_empty());
}

#[test]
fn indexed_paths_read_array_elements() {
    let mut t = EventTest::new(json!({"items": [{"id": 1}, {"id": 2}]})).unwrap();
    t.assert_path("items[1].id", 2)
        .unwrap()
        .assert_path("items.0.id", 1)
        .unwrap()
        .trigger("items[2]", json!({"id": 3}))
        .unwrap()
        .assert_array_length("items", 3)
        .unwrap();
}

// ============================================================================
// Properties
// ============================================================================

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn scalar_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(|b| json!(b)),
        "[ -~]{0,12}".prop_map(|s| json!(s)),
        Just(serde_json::Value::Null),
    ]
}

proptest! {
    #[test]
    fn trigger_then_assert_path_succeeds(
        keys in prop::collection::vec(key_strategy(), 1..4),
        value in scalar_strategy(),
    ) {
        let path = keys.join(".");
        let mut t = EventTest::empty();
        t.trigger(&path, value.clone()).unwrap();
        prop_assert!(t.assert_path(&path, value.clone()).is_ok());

        let log = t.event_log();
        let last = log.last().unwrap();
        prop_assert_eq!(&last.path, &path);
        prop_assert_eq!(&last.value, &JsonValue::from(value));
    }

    #[test]
    fn fire_count_matches_trigger_count(
        writes in prop::collection::vec(prop_oneof![Just("a"), Just("b"), Just("a.b")], 0..20),
    ) {
        let mut t = EventTest::empty();
        for (i, path) in writes.iter().enumerate() {
            // `a` and `a.b` overwrite each other; the log still counts both.
            t.trigger(path, i).unwrap();
        }
        for path in ["a", "b", "a.b"] {
            let n = writes.iter().filter(|w| **w == path).count();
            prop_assert!(t.assert_event_fired(path, n).is_ok());
            prop_assert!(t.assert_event_fired(path, n + 1).is_err());
        }
    }

    #[test]
    fn empty_array_passes_any_shape(
        keys in prop::collection::vec(key_strategy(), 0..5),
    ) {
        let shape: Shape = keys.into_iter().map(|k| (k, TypeCategory::Number)).collect();
        let mut t = EventTest::new(json!({"xs": []})).unwrap();
        prop_assert!(t.assert_array_of("xs", shape).is_ok());
    }
}
