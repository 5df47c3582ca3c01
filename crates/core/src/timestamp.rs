//! Millisecond-precision timestamp type
//!
//! Event log entries are stamped with the wall clock at the moment of the
//! trigger. Timestamps are stored as milliseconds since Unix epoch
//! (1970-01-01 00:00:00 UTC). Two triggers within the same millisecond share
//! a timestamp; the log's sequence order, not the timestamp, is authoritative.
//!
//! ```
//! use eventtest_core::Timestamp;
//!
//! let now = Timestamp::now();
//! let then = Timestamp::from_millis(1_000);
//! assert!(now > then);
//! assert_eq!(then.to_rfc3339(), "1970-01-01T00:00:01.000Z");
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond-precision timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Create a timestamp for the current moment
    ///
    /// Returns epoch if the system clock is before Unix epoch.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_millis() as u64)
    }

    /// Create a timestamp from milliseconds since epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Milliseconds since Unix epoch
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// RFC 3339 rendering in UTC with millisecond precision
    ///
    /// Used by the `Display` of event log entries.
    pub fn to_rfc3339(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.0 as i64)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| self.0.to_string())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::EPOCH
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
