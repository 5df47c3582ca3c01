//! Built-in self-test suite
//!
//! Exercises sessions, every assertion and the runner itself. Run by the
//! `eventtest-selftest` binary to check an installation end to end.

use anyhow::{ensure, Context};
use eventtest_core::{JsonValue, Shape, TypeCategory};
use eventtest_engine::EventTest;
use serde_json::json;

use crate::runner::{run_tests, test, TestSuite};

fn session(initial: serde_json::Value) -> anyhow::Result<EventTest> {
    EventTest::new(initial).context("creating session")
}

/// The self-test suite, one case per feature area
pub fn suite() -> TestSuite {
    TestSuite::new()
        .case("session starts from the initial state", session_basics)
        .case("trigger then assert_path", trigger_and_assert_path)
        .case("calls chain", chaining)
        .case("assert_type", assert_type)
        .case("assert_shape", assert_shape)
        .case("assert_array_of and assert_array_length", arrays)
        .case("assert_event_fired", event_fired)
        .case("event_log", event_log)
        .case("type_assertions", type_assertions)
        .case("test() reports outcomes", single_test)
        .case("run_tests() tallies outcomes", suite_tally)
}

fn session_basics() -> anyhow::Result<()> {
    let t = session(json!({"count": 0, "name": "Alice"}))?;
    ensure!(t.value_at("count") == Some(JsonValue::from(0i64)), "count not seeded");
    ensure!(t.value_at("name") == Some(JsonValue::from("Alice")), "name not seeded");
    ensure!(t.event_log().is_empty(), "fresh log is not empty");
    ensure!(t.type_assertions().is_empty(), "fresh trail is not empty");
    Ok(())
}

fn trigger_and_assert_path() -> anyhow::Result<()> {
    let mut t = session(json!({"count": 0}))?;
    t.trigger("count", 5)?;
    ensure!(t.value_at("count") == Some(JsonValue::from(5i64)), "trigger did not set value");
    t.assert_path("count", 5)?;
    ensure!(t.assert_path("count", 999).is_err(), "assert_path passed on mismatch");
    Ok(())
}

fn chaining() -> anyhow::Result<()> {
    let mut t = session(json!({"a": 0, "b": ""}))?;
    t.trigger("a", 1)?.trigger("b", "hello")?;
    t.trigger("a", 10)?.assert_path("a", 10)?.assert_path("b", "hello")?;
    Ok(())
}

fn assert_type() -> anyhow::Result<()> {
    let mut t = session(json!({"n": 42, "s": "hello", "b": true}))?;
    t.assert_type("n", TypeCategory::Number)?
        .assert_type("s", TypeCategory::String)?
        .assert_type("b", TypeCategory::Boolean)?;
    ensure!(
        t.assert_type("n", TypeCategory::String).is_err(),
        "assert_type passed on wrong type"
    );
    Ok(())
}

fn assert_shape() -> anyhow::Result<()> {
    let mut t = session(json!({"user": {"name": "Alice", "age": 30}}))?;
    t.assert_shape(
        "user",
        [("name", TypeCategory::String), ("age", TypeCategory::Number)],
    )?;
    ensure!(
        t.assert_shape(
            "user",
            [("name", TypeCategory::String), ("email", TypeCategory::String)]
        )
        .is_err(),
        "missing property not detected"
    );
    ensure!(
        t.assert_shape("user", [("name", TypeCategory::Number)]).is_err(),
        "wrong property type not detected"
    );
    ensure!(
        t.assert_shape("user.name", [("x", TypeCategory::String)]).is_err(),
        "non-object not detected"
    );
    Ok(())
}

fn arrays() -> anyhow::Result<()> {
    let mut t = session(json!({"items": [{"id": 1, "text": "a"}, {"id": 2, "text": "b"}]}))?;
    t.assert_array_of(
        "items",
        [("id", TypeCategory::Number), ("text", TypeCategory::String)],
    )?
    .assert_array_length("items", 2)?;
    ensure!(
        t.assert_array_length("items", 5).is_err(),
        "wrong length not detected"
    );

    let mut other = session(json!({"x": "not-array"}))?;
    ensure!(
        other.assert_array_of("x", [("a", TypeCategory::String)]).is_err(),
        "non-array not detected"
    );
    Ok(())
}

fn event_fired() -> anyhow::Result<()> {
    let mut t = session(json!({"x": 0}))?;
    t.trigger("x", 1)?.trigger("x", 2)?;
    t.assert_event_fired("x", 2)?;
    ensure!(
        t.assert_event_fired("x", 10).is_err(),
        "wrong fire count not detected"
    );
    Ok(())
}

fn event_log() -> anyhow::Result<()> {
    let mut t = session(json!({"a": 0}))?;
    t.trigger("a", 1)?.trigger("a", 2)?;
    let log = t.event_log();
    ensure!(log.len() == 2, "expected 2 entries, got {}", log.len());
    ensure!(log[0].path == "a", "entry path is {}", log[0].path);
    ensure!(log[0].value == JsonValue::from(1i64), "entry value is {}", log[0].value);
    ensure!(log[0].timestamp <= log[1].timestamp, "timestamps went backwards");
    ensure!(t.event_log() == log, "second snapshot differs");
    Ok(())
}

fn type_assertions() -> anyhow::Result<()> {
    let mut t = session(json!({"count": 0, "items": [{"id": 1}]}))?;
    t.assert_type("count", TypeCategory::Number)?
        .assert_array_of("items", Shape::from([("id", TypeCategory::Number)]))?;
    let trail = t.type_assertions();
    ensure!(trail.len() == 2, "expected 2 entries, got {}", trail.len());
    ensure!(
        trail[0].path() == "count" && trail[0].category() == TypeCategory::Number,
        "first entry is {:?}",
        trail[0]
    );
    ensure!(
        trail[1].path() == "items" && trail[1].kind() == "array",
        "second entry is {:?}",
        trail[1]
    );
    Ok(())
}

fn single_test() -> anyhow::Result<()> {
    ensure!(test("passing test", || Ok(())), "passing case reported failure");
    ensure!(
        !test("failing test", || anyhow::bail!("oops")),
        "failing case reported success"
    );
    Ok(())
}

fn suite_tally() -> anyhow::Result<()> {
    let summary = run_tests(
        TestSuite::new()
            .case("should pass", || Ok(()))
            .case("should fail", || anyhow::bail!("nope"))
            .case("should also pass", || Ok(())),
    );
    ensure!(summary.passed == 2, "passed = {}", summary.passed);
    ensure!(summary.failed == 1, "failed = {}", summary.failed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_test_suite_passes() {
        let suite = suite();
        assert_eq!(suite.len(), 11);
        let summary = run_tests(suite);
        assert_eq!(summary.failures, Vec::<String>::new());
        assert_eq!(summary.passed, 11);
    }
}
