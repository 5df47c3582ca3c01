//! EventRecorder: append-only history of triggered mutations
//!
//! ## Design Principles
//!
//! 1. **Append-Only**: entries are never updated or removed.
//! 2. **Call Order**: entries appear in the order `record` was called; the
//!    sequence, not the timestamp, is authoritative for ordering.
//! 3. **Non-Decreasing Timestamps**: a wall clock that steps backwards is
//!    clamped to the previous entry's timestamp.
//! 4. **Read Isolation**: `snapshot` returns an owned copy, so later records
//!    are never visible through an earlier snapshot.

use eventtest_core::{EventLogEntry, JsonValue, Timestamp};

/// Append-only log of mutations issued through `trigger`
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    entries: Vec<EventLogEntry>,
    last_timestamp: Timestamp,
}

impl EventRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped with the current time
    pub fn record(&mut self, path: impl Into<String>, value: JsonValue) {
        self.record_at(path, value, Timestamp::now());
    }

    fn record_at(&mut self, path: impl Into<String>, value: JsonValue, now: Timestamp) {
        let timestamp = now.max(self.last_timestamp);
        self.last_timestamp = timestamp;
        self.entries.push(EventLogEntry::new(path, value, timestamp));
    }

    /// Owned copy of the log in call order
    pub fn snapshot(&self) -> Vec<EventLogEntry> {
        self.entries.clone()
    }

    /// Number of entries recorded for exactly `path`
    ///
    /// Matching is case-sensitive with no prefix or wildcard semantics.
    pub fn count_for(&self, path: &str) -> usize {
        self.entries.iter().filter(|e| e.is_for(path)).count()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&EventLogEntry> {
        self.entries.last()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_call_order() {
        let mut rec = EventRecorder::new();
        rec.record("a", JsonValue::from(1i64));
        rec.record("b", JsonValue::from(2i64));
        rec.record("a", JsonValue::from(3i64));

        let log = rec.snapshot();
        let paths: Vec<&str> = log.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b", "a"]);
        assert_eq!(log[2].value, JsonValue::from(3i64));
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.last().map(|e| e.path.as_str()), Some("a"));
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_records() {
        let mut rec = EventRecorder::new();
        rec.record("x", JsonValue::from(1i64));
        let before = rec.snapshot();
        rec.record("x", JsonValue::from(2i64));
        assert_eq!(before.len(), 1);
        assert_eq!(rec.snapshot().len(), 2);
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let mut rec = EventRecorder::new();
        rec.record_at("x", JsonValue::null(), Timestamp::from_millis(500));
        rec.record_at("x", JsonValue::null(), Timestamp::from_millis(200));
        rec.record_at("x", JsonValue::null(), Timestamp::from_millis(900));

        let stamps: Vec<u64> = rec
            .snapshot()
            .iter()
            .map(|e| e.timestamp.as_millis())
            .collect();
        assert_eq!(stamps, vec![500, 500, 900]);
    }

    #[test]
    fn test_count_for_is_exact() {
        let mut rec = EventRecorder::new();
        rec.record("user", JsonValue::object());
        rec.record("user.name", JsonValue::from("Bob"));
        rec.record("User", JsonValue::null());
        assert_eq!(rec.count_for("user"), 1);
        assert_eq!(rec.count_for("user.name"), 1);
        assert_eq!(rec.count_for("use"), 0);
        assert_eq!(rec.count_for("missing"), 0);
    }

    #[test]
    fn test_empty_recorder() {
        let rec = EventRecorder::new();
        assert!(rec.is_empty());
        assert!(rec.last().is_none());
        assert!(rec.snapshot().is_empty());
    }
}
