//! Event log entry type
//!
//! One entry is appended for every `trigger` call, in call order.

use crate::json::JsonValue;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// A recorded mutation
///
/// Entries are immutable records in an append-only log. Each entry includes:
/// - The path exactly as passed to `trigger`
/// - An owned snapshot of the written value
/// - The wall-clock time of the write
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLogEntry {
    /// Path as given by the caller (not normalized)
    pub path: String,
    /// Value written at the path
    pub value: JsonValue,
    /// Milliseconds since epoch when the trigger ran
    pub timestamp: Timestamp,
}

impl EventLogEntry {
    /// Create an entry
    pub fn new(path: impl Into<String>, value: JsonValue, timestamp: Timestamp) -> Self {
        Self {
            path: path.into(),
            value,
            timestamp,
        }
    }

    /// True if this entry was recorded for exactly `path`
    pub fn is_for(&self, path: &str) -> bool {
        self.path == path
    }
}

impl std::fmt::Display for EventLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} = {}", self.timestamp.to_rfc3339(), self.path, self.value)
    }
}
