//! In-memory JSON path store
//!
//! State is a JSON object. Every successful `set` bumps the revision and
//! notifies subscribers with the written path. Inside a batch the paths are
//! queued instead, and subscribers get one call with the de-duplicated list
//! when the outermost batch closes.

use std::fmt;

use eventtest_core::{
    get_at_path, set_at_path, value_type_name, JsonPath, JsonValue, StoreError, StoreResult,
};
use tracing::{debug, warn};

use crate::traits::PathStore;

/// Change callback, receives the paths written since the last call
pub type Listener = Box<dyn FnMut(&[String])>;

/// Handle returned by [`JsonStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// JSON object tree addressed by dot-delimited paths
pub struct JsonStore {
    state: JsonValue,
    revision: u64,
    batch_depth: usize,
    pending: Vec<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl JsonStore {
    /// Create a store seeded from an object snapshot
    ///
    /// Top-level keys of the snapshot become top-level paths. `null` is
    /// accepted as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRoot`] for any other non-object snapshot.
    pub fn new(initial_state: JsonValue) -> StoreResult<Self> {
        let state = match initial_state.as_inner() {
            serde_json::Value::Object(_) => initial_state,
            serde_json::Value::Null => JsonValue::object(),
            other => {
                return Err(StoreError::InvalidRoot {
                    found: value_type_name(other),
                })
            }
        };
        Ok(Self::from_object(state))
    }

    /// Create an empty store
    pub fn empty() -> Self {
        Self::from_object(JsonValue::object())
    }

    fn from_object(state: JsonValue) -> Self {
        Self {
            state,
            revision: 0,
            batch_depth: 0,
            pending: Vec::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Number of successful writes so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True while at least one batch is open
    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Register a change listener
    pub fn subscribe(&mut self, listener: impl FnMut(&[String]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a change listener, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, paths: &[String]) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(paths);
        }
    }
}

impl PathStore for JsonStore {
    fn get(&self, path: &JsonPath) -> Option<JsonValue> {
        get_at_path(&self.state, path).cloned().map(JsonValue::from)
    }

    fn set(&mut self, path: &JsonPath, value: JsonValue) -> StoreResult<()> {
        if path.is_root() && !value.is_object() {
            return Err(StoreError::InvalidRoot {
                found: value_type_name(&value),
            });
        }
        set_at_path(self.state.as_inner_mut(), path, value.into_inner()).map_err(|source| {
            StoreError::Write {
                path: path.to_path_string(),
                source,
            }
        })?;
        self.revision += 1;

        let written = path.to_path_string();
        debug!(target: "eventtest::store", path = %written, revision = self.revision, "set");
        if self.batch_depth > 0 {
            if !self.pending.contains(&written) {
                self.pending.push(written);
            }
        } else {
            self.notify(&[written]);
        }
        Ok(())
    }

    fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            warn!(target: "eventtest::store", "end_batch called without an open batch");
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && !self.pending.is_empty() {
            let paths = std::mem::take(&mut self.pending);
            debug!(target: "eventtest::store", changed = paths.len(), "batch flushed");
            self.notify(&paths);
        }
    }

    fn snapshot(&self) -> JsonValue {
        self.state.clone()
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("batch_depth", &self.batch_depth)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
