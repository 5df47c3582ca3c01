//! Labelled test-case runner for event-test sessions
//!
//! - `test`: run one case, log the outcome, report pass/fail
//! - `TestSuite` / `run_tests`: run cases in order and tally the results
//! - `RunnerConfig`: `eventtest.toml` settings
//! - `self_test`: the built-in suite run by `eventtest-selftest`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod runner;
pub mod self_test;

pub use config::{ConfigError, RunnerConfig, CONFIG_FILE_NAME};
pub use runner::{run_tests, run_tests_with, test, RunSummary, TestCase, TestSuite};
