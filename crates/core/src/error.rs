//! Error types for eventtest
//!
//! `AssertionError` is the single assertion-failure kind: every variant names
//! the failing path and carries the expected and actual details. Store
//! failures (bad paths, impossible writes) are a separate `StoreError`, and
//! the crate-level `Error` wraps both so session calls chain with `?`.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::json::{JsonPathError, JsonValue, PathParseError};
use crate::types::TypeCategory;
use thiserror::Error;

/// Result type alias for eventtest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

fn show_value(value: &Option<JsonValue>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "undefined".to_string(),
    }
}

fn show_len(len: &Option<usize>) -> String {
    match len {
        Some(n) => n.to_string(),
        None => "non-array".to_string(),
    }
}

fn show_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("[{}]", i),
        None => String::new(),
    }
}

/// Assertion failure raised by the assertion engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssertionError {
    /// `assert_path`: value differs from the expectation
    #[error("path mismatch at `{path}`: expected {expected}, got {}", show_value(.actual))]
    PathMismatch {
        /// Asserted path
        path: String,
        /// Expected value
        expected: JsonValue,
        /// Value found, `None` if the path is missing
        actual: Option<JsonValue>,
    },

    /// `assert_type`: category differs
    #[error("type mismatch at `{path}`: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Asserted path
        path: String,
        /// Expected category
        expected: TypeCategory,
        /// Category found
        actual: TypeCategory,
    },

    /// Shape target is not a plain object (arrays and `null` included)
    #[error("not an object at `{path}{}`: got {found}", show_index(.index))]
    NotAnObject {
        /// Asserted path
        path: String,
        /// Array element index when checking `assert_array_of`
        index: Option<usize>,
        /// JSON type found, `undefined` if missing
        found: &'static str,
    },

    /// Shape key absent from the object
    #[error("missing property `{key}` at `{path}{}`", show_index(.index))]
    MissingProperty {
        /// Asserted path
        path: String,
        /// Array element index when checking `assert_array_of`
        index: Option<usize>,
        /// Missing key
        key: String,
    },

    /// Shape key present with the wrong category
    #[error(
        "property type mismatch for `{key}` at `{path}{}`: expected {expected}, got {actual}",
        show_index(.index)
    )]
    PropertyTypeMismatch {
        /// Asserted path
        path: String,
        /// Array element index when checking `assert_array_of`
        index: Option<usize>,
        /// Offending key
        key: String,
        /// Expected category
        expected: TypeCategory,
        /// Category found
        actual: TypeCategory,
    },

    /// `assert_array_of`: target is not an array
    #[error("not an array at `{path}`: got {found}")]
    NotAnArray {
        /// Asserted path
        path: String,
        /// JSON type found, `undefined` if missing
        found: &'static str,
    },

    /// `assert_array_length`: wrong length or not an array
    #[error("length mismatch at `{path}`: expected {expected}, got {}", show_len(.actual))]
    LengthMismatch {
        /// Asserted path
        path: String,
        /// Expected length
        expected: usize,
        /// Length found, `None` if the value is not an array
        actual: Option<usize>,
    },

    /// `assert_event_fired`: trigger count differs
    #[error("fire count mismatch for `{path}`: expected {expected}, got {actual}")]
    FireCountMismatch {
        /// Asserted path
        path: String,
        /// Expected trigger count
        expected: usize,
        /// Trigger count found
        actual: usize,
    },
}

impl AssertionError {
    /// Stable short description of the failure
    pub fn kind(&self) -> &'static str {
        match self {
            AssertionError::PathMismatch { .. } => "path mismatch",
            AssertionError::TypeMismatch { .. } => "type mismatch",
            AssertionError::NotAnObject { .. } => "not an object",
            AssertionError::MissingProperty { .. } => "missing property",
            AssertionError::PropertyTypeMismatch { .. } => "property type mismatch",
            AssertionError::NotAnArray { .. } => "not an array",
            AssertionError::LengthMismatch { .. } => "length mismatch",
            AssertionError::FireCountMismatch { .. } => "fire count mismatch",
        }
    }

    /// Path the failing assertion was made against
    pub fn path(&self) -> &str {
        match self {
            AssertionError::PathMismatch { path, .. }
            | AssertionError::TypeMismatch { path, .. }
            | AssertionError::NotAnObject { path, .. }
            | AssertionError::MissingProperty { path, .. }
            | AssertionError::PropertyTypeMismatch { path, .. }
            | AssertionError::NotAnArray { path, .. }
            | AssertionError::LengthMismatch { path, .. }
            | AssertionError::FireCountMismatch { path, .. } => path,
        }
    }

    /// Offending array element for `assert_array_of` failures
    pub fn element_index(&self) -> Option<usize> {
        match self {
            AssertionError::NotAnObject { index, .. }
            | AssertionError::MissingProperty { index, .. }
            | AssertionError::PropertyTypeMismatch { index, .. } => *index,
            _ => None,
        }
    }
}

/// Failure reported by a path store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Path string could not be parsed
    #[error("invalid path `{path}`: {source}")]
    InvalidPath {
        /// Path as given
        path: String,
        /// Parse failure
        source: PathParseError,
    },

    /// Initial state must be an object
    #[error("initial state must be an object, got {found}")]
    InvalidRoot {
        /// JSON type of the rejected snapshot
        found: &'static str,
    },

    /// Write could not be applied at the path
    #[error("cannot write `{path}`: {source}")]
    Write {
        /// Path as given
        path: String,
        /// Traversal failure
        source: JsonPathError,
    },

    /// Rejected by a custom store implementation
    #[error("store rejected operation: {0}")]
    Rejected(String),
}

/// Error type for event-test sessions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An assertion failed
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// The store could not serve a read or write
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// The assertion failure, if this is one
    pub fn as_assertion(&self) -> Option<&AssertionError> {
        match self {
            Error::Assertion(e) => Some(e),
            Error::Store(_) => None,
        }
    }

    /// True if this is an assertion failure
    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::Assertion(_))
    }
}
