//! Labelled test cases and suite execution
//!
//! A case is a zero-argument closure returning `anyhow::Result<()>`. Both an
//! `Err` and a panic count as a failure. Outcomes are logged through
//! `tracing` under the `eventtest::runner` target, one line per case.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::RunnerConfig;

/// Boxed test case body
pub type TestCase = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// Run one labelled case and report whether it passed
///
/// ```
/// use eventtest_runner::test;
///
/// assert!(test("passes", || Ok(())));
/// assert!(!test("fails", || anyhow::bail!("oops")));
/// ```
pub fn test(label: &str, f: impl FnOnce() -> anyhow::Result<()>) -> bool {
    run_case(label, f, true)
}

fn run_case(label: &str, f: impl FnOnce() -> anyhow::Result<()>, report_errors: bool) -> bool {
    let failure = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("{:#}", e)),
        Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
    };

    match failure {
        None => {
            info!(target: "eventtest::runner", "✓ {}", label);
            true
        }
        Some(message) if report_errors => {
            error!(target: "eventtest::runner", "✗ {}: {}", label, message);
            false
        }
        Some(_) => {
            error!(target: "eventtest::runner", "✗ {}", label);
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Ordered collection of labelled cases
#[derive(Default)]
pub struct TestSuite {
    cases: Vec<(String, TestCase)>,
}

impl TestSuite {
    /// Create an empty suite
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case (builder style)
    pub fn case(
        mut self,
        label: impl Into<String>,
        f: impl FnOnce() -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.add(label, f);
        self
    }

    /// Append a case
    pub fn add(&mut self, label: impl Into<String>, f: impl FnOnce() -> anyhow::Result<()> + 'static) {
        self.cases.push((label.into(), Box::new(f)));
    }

    /// Case labels in run order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|(label, _)| label.as_str())
    }

    /// Number of cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// True if the suite has no cases
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl std::fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

/// Tally of a suite run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Cases that returned `Ok`
    pub passed: usize,
    /// Cases that returned `Err` or panicked
    pub failed: usize,
    /// Cases not run because of `fail_fast`
    pub skipped: usize,
    /// Labels of the failed cases, in run order
    pub failures: Vec<String>,
}

impl RunSummary {
    /// Number of cases in the suite
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// True if nothing failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Run every case in insertion order with the default config
///
/// A failing case does not stop the ones after it.
pub fn run_tests(suite: TestSuite) -> RunSummary {
    run_tests_with(suite, &RunnerConfig::default())
}

/// Run a suite under `config`
pub fn run_tests_with(suite: TestSuite, config: &RunnerConfig) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut cases = suite.cases.into_iter();

    for (label, case) in cases.by_ref() {
        if run_case(&label, case, config.report_errors) {
            summary.passed += 1;
        } else {
            summary.failed += 1;
            summary.failures.push(label);
            if config.fail_fast {
                break;
            }
        }
    }

    summary.skipped = cases.count();
    if summary.skipped > 0 {
        warn!(target: "eventtest::runner", skipped = summary.skipped, "stopped after first failure");
    }
    info!(
        target: "eventtest::runner",
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "run complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_returns_true_on_ok() {
        assert!(test("passing test", || Ok(())));
    }

    #[test]
    fn test_returns_false_on_err() {
        assert!(!test("failing test", || Err(anyhow::anyhow!("oops"))));
    }

    #[test]
    fn test_returns_false_on_panic() {
        assert!(!test("panicking test", || panic!("boom")));
    }

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let s: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(s.as_ref()), "owned");
        let s: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(s.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_run_tests_counts_pass_and_fail() {
        let suite = TestSuite::new()
            .case("should pass", || Ok(()))
            .case("should fail", || anyhow::bail!("nope"))
            .case("should also pass", || Ok(()));

        let summary = run_tests(suite);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failures, vec!["should fail".to_string()]);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_run_tests_runs_in_insertion_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut suite = TestSuite::new();
        for name in ["c", "a", "b"] {
            let order = Rc::clone(&order);
            suite.add(name, move || {
                order.borrow_mut().push(name);
                Ok(())
            });
        }
        assert_eq!(suite.labels().collect::<Vec<_>>(), vec!["c", "a", "b"]);

        let summary = run_tests(suite);
        assert!(summary.is_success());
        assert_eq!(*order.borrow(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_fail_fast_skips_remaining() {
        let config = RunnerConfig {
            fail_fast: true,
            ..RunnerConfig::default()
        };
        let suite = TestSuite::new()
            .case("one", || Ok(()))
            .case("two", || anyhow::bail!("stop"))
            .case("three", || Ok(()))
            .case("four", || Ok(()));

        let summary = run_tests_with(suite, &config);
        assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 1, 2));
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_empty_suite_is_success() {
        let suite = TestSuite::new();
        assert!(suite.is_empty());
        let summary = run_tests(suite);
        assert_eq!(summary.total(), 0);
        assert!(summary.is_success());
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary {
            passed: 2,
            failed: 1,
            skipped: 0,
            failures: vec!["x".to_string()],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"passed": 2, "failed": 1, "skipped": 0, "failures": ["x"]})
        );
    }
}
