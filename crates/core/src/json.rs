//! JSON values and dot-delimited paths
//!
//! This module defines the value and addressing types shared by the store and
//! the assertion engine:
//! - JsonValue: Newtype wrapper around serde_json::Value
//! - JsonPath: Path into a state tree (e.g., `user.name` or `items[0]`)
//! - PathSegment: Individual path component (Key or Index)
//! - get_at_path / set_at_path: read and deep-write helpers
//! - deep_equal: structural equality with numeric comparison by value

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use thiserror::Error;

use serde_json::{Map, Value};

/// JSON value wrapper
///
/// Newtype around serde_json::Value providing:
/// - Direct access to underlying serde_json::Value via Deref/DerefMut
/// - Easy construction from common types
/// - Serialization/deserialization support
///
/// # Examples
///
/// ```
/// use eventtest_core::JsonValue;
///
/// let obj = JsonValue::object();
/// let null = JsonValue::null();
///
/// let s = JsonValue::from("hello");
/// let n = JsonValue::from(42i64);
/// let b = JsonValue::from(true);
///
/// assert!(obj.is_object());
/// assert!(null.is_null());
/// assert!(s.is_string() && n.is_number() && b.is_boolean());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonValue(Value);

impl JsonValue {
    /// Create a null JSON value
    pub fn null() -> Self {
        JsonValue(Value::Null)
    }

    /// Create an empty JSON object
    pub fn object() -> Self {
        JsonValue(Value::Object(Map::new()))
    }

    /// Get the underlying serde_json::Value
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Get a reference to the underlying serde_json::Value
    pub fn as_inner(&self) -> &Value {
        &self.0
    }

    /// Get a mutable reference to the underlying serde_json::Value
    pub fn as_inner_mut(&mut self) -> &mut Value {
        &mut self.0
    }
}

impl FromStr for JsonValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(JsonValue)
    }
}

impl Deref for JsonValue {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for JsonValue {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for JsonValue {
    fn default() -> Self {
        JsonValue::null()
    }
}

impl From<Value> for JsonValue {
    fn from(v: Value) -> Self {
        JsonValue(v)
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        v.0
    }
}

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        JsonValue(Value::Bool(v))
    }
}

impl From<i64> for JsonValue {
    fn from(v: i64) -> Self {
        JsonValue(Value::from(v))
    }
}

impl From<i32> for JsonValue {
    fn from(v: i32) -> Self {
        JsonValue(Value::from(v))
    }
}

impl From<u64> for JsonValue {
    fn from(v: u64) -> Self {
        JsonValue(Value::from(v))
    }
}

impl From<u32> for JsonValue {
    fn from(v: u32) -> Self {
        JsonValue(Value::from(v))
    }
}

impl From<usize> for JsonValue {
    fn from(v: usize) -> Self {
        JsonValue(Value::from(v))
    }
}

impl From<f64> for JsonValue {
    fn from(v: f64) -> Self {
        // NaN and infinities have no JSON form and become null
        JsonValue(Value::from(v))
    }
}

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        JsonValue(Value::String(v.to_string()))
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        JsonValue(Value::String(v))
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(v: Vec<T>) -> Self {
        JsonValue(Value::Array(
            v.into_iter().map(|x| x.into().into_inner()).collect(),
        ))
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(x) => x.into(),
            None => JsonValue::null(),
        }
    }
}

// =============================================================================
// Structural Equality
// =============================================================================

/// Deep structural equality between two JSON values
///
/// Objects are equal when they have the same key set and equal values per
/// key; arrays when they have the same length and equal elements per index.
/// Numbers compare by numeric value, so `5` equals `5.0`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                return true;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(fx), Some(fy)) => fx == fy,
                _ => false,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, xv)| ym.get(k).map_or(false, |yv| deep_equal(xv, yv)))
        }
        _ => false,
    }
}

// =============================================================================
// JsonPath and PathSegment
// =============================================================================

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty key in path (`a..b`, trailing dot)
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Invalid array index
    #[error("invalid array index at position {0}: {1}")]
    InvalidIndex(usize, String),
    /// Unexpected character
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

/// A segment in a path
///
/// Paths are composed of key segments (object property access)
/// and index segments (array element access). A key segment made of digits
/// also addresses an array element when the value it is applied to is an
/// array, so `items.0` and `items[0]` read the same element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Object key: `.foo`
    Key(String),
    /// Array index: `[0]`
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{}", k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A path into a state tree
///
/// # Path Syntax
///
/// | Syntax | Meaning | Example |
/// |--------|---------|---------|
/// | `key` | Top-level property | `count` |
/// | `key1.key2` | Nested property | `user.name` |
/// | `key[n]` | Property then index | `items[0]` |
/// | `key.n` | Property then index (on arrays) | `items.0` |
/// | (empty) | Root | `` |
///
/// # Examples
///
/// ```
/// use eventtest_core::JsonPath;
///
/// let user_name = JsonPath::root().key("user").key("name");
/// let parsed: JsonPath = "user.name".parse().unwrap();
/// assert_eq!(parsed, user_name);
/// assert_eq!(parsed.to_path_string(), "user.name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Create a root path (empty path)
    pub fn root() -> Self {
        JsonPath {
            segments: Vec::new(),
        }
    }

    /// Create a path from segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        JsonPath { segments }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if this is the root path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder style)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder style)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Dot-delimited rendering, indices as `[n]`; empty for the root
    pub fn to_path_string(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                PathSegment::Key(k) if out.is_empty() => out.push_str(k),
                other => out.push_str(&other.to_string()),
            }
        }
        out
    }
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    /// Parse `a.b[0].c`. A single leading dot is allowed; the empty string
    /// is the root. Error positions are byte offsets into `s`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(JsonPath::root());
        }

        let body = s.strip_prefix('.').unwrap_or(s);
        let mut offset = s.len() - body.len();
        let mut segments = Vec::new();
        for part in body.split('.') {
            if part.is_empty() {
                return Err(PathParseError::EmptyKey(offset));
            }
            parse_part(part, offset, &mut segments)?;
            offset += part.len() + 1;
        }
        Ok(JsonPath { segments })
    }
}

// One dot-separated piece: an optional key followed by `[n]` groups.
fn parse_part(
    part: &str,
    offset: usize,
    segments: &mut Vec<PathSegment>,
) -> Result<(), PathParseError> {
    let key_len = part.find(|c: char| c == '[' || c == ']').unwrap_or(part.len());
    if key_len > 0 {
        segments.push(PathSegment::Key(part[..key_len].to_string()));
    }

    let mut rest = &part[key_len..];
    let mut pos = offset + key_len;
    while let Some(c) = rest.chars().next() {
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(PathParseError::UnexpectedChar(c, pos));
        };
        let close = inner
            .find(']')
            .ok_or(PathParseError::UnclosedBracket(pos))?;
        let digits = &inner[..close];
        let idx = digits
            .parse::<usize>()
            .map_err(|_| PathParseError::InvalidIndex(pos + 1, digits.to_string()))?;
        segments.push(PathSegment::Index(idx));
        rest = &inner[close + 1..];
        pos += close + 2;
    }
    Ok(())
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}

// =============================================================================
// Path Operations Error
// =============================================================================

/// Error type for path traversal and mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonPathError {
    /// Type mismatch during path traversal
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected type
        expected: &'static str,
        /// Actual type found
        found: &'static str,
    },

    /// Array index out of bounds
    #[error("index out of bounds: {index} > {len}")]
    IndexOutOfBounds {
        /// The requested index
        index: usize,
        /// The array length
        len: usize,
    },

    /// Path not found
    #[error("path not found")]
    NotFound,
}

// =============================================================================
// Path Operations
// =============================================================================

/// Get value at path within a JSON tree
///
/// Returns `None` when any segment is missing or is applied to a value of the
/// wrong kind; reading never fails.
///
/// # Examples
///
/// ```
/// use eventtest_core::{get_at_path, JsonPath, JsonValue};
///
/// let json: JsonValue = serde_json::json!({
///     "user": { "name": "Alice", "scores": [100, 95, 88] }
/// }).into();
///
/// let path: JsonPath = "user.name".parse().unwrap();
/// assert_eq!(get_at_path(&json, &path).unwrap().as_str(), Some("Alice"));
///
/// let path: JsonPath = "user.scores[1]".parse().unwrap();
/// assert_eq!(get_at_path(&json, &path).unwrap().as_i64(), Some(95));
///
/// let path: JsonPath = "user.missing.deeper".parse().unwrap();
/// assert!(get_at_path(&json, &path).is_none());
/// ```
pub fn get_at_path<'a>(root: &'a Value, path: &JsonPath) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(obj)) => obj.get(key)?,
            (PathSegment::Key(key), Value::Array(arr)) => arr.get(key.parse::<usize>().ok()?)?,
            (PathSegment::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set value at path within a JSON tree
///
/// Missing intermediates are created: an object when the following segment is
/// a key, an array when it is an index. Scalar and null intermediates are
/// replaced by a fresh object. Arrays accept writes at an existing index or
/// exactly one past the end (append).
///
/// # Examples
///
/// ```
/// use eventtest_core::{get_at_path, set_at_path, JsonPath, JsonValue};
///
/// let mut json = JsonValue::object();
/// let path: JsonPath = "user.profile.name".parse().unwrap();
/// set_at_path(&mut json, &path, JsonValue::from("Alice").into_inner()).unwrap();
/// assert_eq!(get_at_path(&json, &path).unwrap().as_str(), Some("Alice"));
/// ```
pub fn set_at_path(root: &mut Value, path: &JsonPath, value: Value) -> Result<(), JsonPathError> {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut current = root;
    for (i, segment) in parents.iter().enumerate() {
        current = descend_or_create(current, segment, &segments[i + 1])?;
    }
    assign(current, last, value)
}

fn fresh_container(next: &PathSegment) -> Value {
    match next {
        PathSegment::Key(_) => Value::Object(Map::new()),
        PathSegment::Index(_) => Value::Array(Vec::new()),
    }
}

fn array_key(key: &str, found: &Value) -> Result<usize, JsonPathError> {
    key.parse::<usize>().map_err(|_| JsonPathError::TypeMismatch {
        expected: "object",
        found: value_type_name(found),
    })
}

fn array_slot(
    arr: &mut Vec<Value>,
    idx: usize,
    fill: impl FnOnce() -> Value,
) -> Result<&mut Value, JsonPathError> {
    let len = arr.len();
    if idx == len {
        arr.push(fill());
    } else if idx > len {
        return Err(JsonPathError::IndexOutOfBounds { index: idx, len });
    }
    Ok(&mut arr[idx])
}

fn descend_or_create<'a>(
    current: &'a mut Value,
    segment: &PathSegment,
    next: &PathSegment,
) -> Result<&'a mut Value, JsonPathError> {
    match segment {
        PathSegment::Key(key) => {
            if current.is_array() {
                let idx = array_key(key, current)?;
                let Value::Array(arr) = current else {
                    return Err(JsonPathError::NotFound);
                };
                return array_slot(arr, idx, || fresh_container(next));
            }
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(obj) => Ok(obj
                    .entry(key.clone())
                    .or_insert_with(|| fresh_container(next))),
                _ => Err(JsonPathError::NotFound),
            }
        }
        PathSegment::Index(idx) => match current {
            Value::Array(arr) => array_slot(arr, *idx, || fresh_container(next)),
            other => Err(JsonPathError::TypeMismatch {
                expected: "array",
                found: value_type_name(other),
            }),
        },
    }
}

fn assign(current: &mut Value, segment: &PathSegment, value: Value) -> Result<(), JsonPathError> {
    match segment {
        PathSegment::Key(key) => {
            if current.is_array() {
                let idx = array_key(key, current)?;
                if let Value::Array(arr) = current {
                    *array_slot(arr, idx, || Value::Null)? = value;
                }
                return Ok(());
            }
            if let Value::Object(obj) = current {
                obj.insert(key.clone(), value);
                return Ok(());
            }
            let mut obj = Map::new();
            obj.insert(key.clone(), value);
            *current = Value::Object(obj);
            Ok(())
        }
        PathSegment::Index(idx) => match current {
            Value::Array(arr) => {
                *array_slot(arr, *idx, || Value::Null)? = value;
                Ok(())
            }
            other => Err(JsonPathError::TypeMismatch {
                expected: "array",
                found: value_type_name(other),
            }),
        },
    }
}

/// JSON type name for error messages
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
