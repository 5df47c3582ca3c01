//! Store abstraction used by the event-test engine
//!
//! This trait is the narrow get/set/batch contract between the engine and
//! whatever holds the state. The engine never reaches past it, so a store
//! with its own mutation model can be swapped in without touching the
//! assertion code.

use eventtest_core::{JsonPath, JsonValue, StoreError, StoreResult};

/// Parse a dot-delimited path, mapping failures to [`StoreError::InvalidPath`]
pub fn parse_path(path: &str) -> StoreResult<JsonPath> {
    path.parse().map_err(|source| StoreError::InvalidPath {
        path: path.to_string(),
        source,
    })
}

/// Mutable container addressed by paths
///
/// # Examples
///
/// ```
/// use eventtest_store::{parse_path, JsonStore, PathStore};
/// use serde_json::json;
///
/// let mut store = JsonStore::new(json!({"user": {"name": "Alice"}}).into()).unwrap();
/// let path = parse_path("user.name").unwrap();
/// store.set(&path, "Bob".into()).unwrap();
/// assert_eq!(store.get(&path), Some("Bob".into()));
/// ```
pub trait PathStore {
    /// Read the value at `path`
    ///
    /// Returns `None` when the path, or any intermediate segment, is missing.
    fn get(&self, path: &JsonPath) -> Option<JsonValue>;

    /// Write `value` at `path`, creating intermediate containers as needed
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot place a value at the path.
    fn set(&mut self, path: &JsonPath, value: JsonValue) -> StoreResult<()>;

    /// Open a batch. Batches nest.
    fn begin_batch(&mut self);

    /// Close the innermost batch
    fn end_batch(&mut self);

    /// Whole state tree
    fn snapshot(&self) -> JsonValue;

    /// Run `f` inside a batch
    ///
    /// What a batch means is up to the store; the engine does not participate.
    /// The batch is closed even if `f` panics.
    fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        let mut guard = BatchGuard::enter(self);
        f(guard.store())
    }
}

/// Open batch that is closed when dropped
pub struct BatchGuard<'a, S: PathStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: PathStore + ?Sized> BatchGuard<'a, S> {
    /// Open a batch on `store`
    pub fn enter(store: &'a mut S) -> Self {
        store.begin_batch();
        Self { store }
    }

    /// The store inside the batch
    pub fn store(&mut self) -> &mut S {
        self.store
    }
}

impl<S: PathStore + ?Sized> Drop for BatchGuard<'_, S> {
    fn drop(&mut self) {
        self.store.end_batch();
    }
}
