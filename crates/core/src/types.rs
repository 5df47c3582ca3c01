//! Type categories and one-level shapes
//!
//! `TypeCategory` is the runtime category of a value read from the store.
//! Arrays are distinguished from plain objects, and a missing value is
//! `Undefined`. `Shape` maps property names to categories, in the order the
//! caller listed them.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown category name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown type category: {0}")]
pub struct UnknownTypeCategory(pub String);

/// Runtime category of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeCategory {
    /// Any JSON number
    Number,
    /// JSON string
    String,
    /// JSON boolean
    Boolean,
    /// Non-array object, including `null`
    Object,
    /// JSON array
    Array,
    /// Callable value. Never produced by a JSON-backed store.
    Function,
    /// Missing value
    Undefined,
}

impl TypeCategory {
    /// All categories, in declaration order
    pub const ALL: [TypeCategory; 7] = [
        TypeCategory::Number,
        TypeCategory::String,
        TypeCategory::Boolean,
        TypeCategory::Object,
        TypeCategory::Array,
        TypeCategory::Function,
        TypeCategory::Undefined,
    ];

    /// Category of a value read from the store, `None` meaning missing
    ///
    /// `null` is an object, matching JavaScript's `typeof null`.
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => TypeCategory::Undefined,
            Some(Value::Null) | Some(Value::Object(_)) => TypeCategory::Object,
            Some(Value::Bool(_)) => TypeCategory::Boolean,
            Some(Value::Number(_)) => TypeCategory::Number,
            Some(Value::String(_)) => TypeCategory::String,
            Some(Value::Array(_)) => TypeCategory::Array,
        }
    }

    /// Lowercase name as used in shapes and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Number => "number",
            TypeCategory::String => "string",
            TypeCategory::Boolean => "boolean",
            TypeCategory::Object => "object",
            TypeCategory::Array => "array",
            TypeCategory::Function => "function",
            TypeCategory::Undefined => "undefined",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeCategory {
    type Err = UnknownTypeCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownTypeCategory(s.to_string()))
    }
}

/// Ordered mapping from property name to expected category
///
/// Checks run in insertion order. Inserting an existing key replaces its
/// category without moving it.
///
/// ```
/// use eventtest_core::{Shape, TypeCategory};
///
/// let shape = Shape::new()
///     .field("id", TypeCategory::Number)
///     .field("text", TypeCategory::String);
/// assert_eq!(shape.len(), 2);
///
/// let same: Shape = [("id", TypeCategory::Number), ("text", TypeCategory::String)].into();
/// assert_eq!(shape, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shape {
    fields: Vec<(String, TypeCategory)>,
}

impl Shape {
    /// Empty shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder style)
    pub fn field(mut self, name: impl Into<String>, category: TypeCategory) -> Self {
        self.insert(name, category);
        self
    }

    /// Add or replace a field
    pub fn insert(&mut self, name: impl Into<String>, category: TypeCategory) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = category,
            None => self.fields.push((name, category)),
        }
    }

    /// Expected category of a field
    pub fn get(&self, name: &str) -> Option<TypeCategory> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, c)| *c)
    }

    /// Fields in check order
    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeCategory)> {
        self.fields.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the shape has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, TypeCategory)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, TypeCategory)>>(iter: I) -> Self {
        let mut shape = Shape::new();
        for (k, c) in iter {
            shape.insert(k, c);
        }
        shape
    }
}

impl<K: Into<String>, const N: usize> From<[(K, TypeCategory); N]> for Shape {
    fn from(fields: [(K, TypeCategory); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<K: Into<String>> From<Vec<(K, TypeCategory)>> for Shape {
    fn from(fields: Vec<(K, TypeCategory)>) -> Self {
        fields.into_iter().collect()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, c)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", k, c)?;
        }
        f.write_str("}")
    }
}

// Serialized as a JSON object whose key order is the check order.
impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, c) in &self.fields {
            map.serialize_entry(k, c)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ShapeVisitor;

        impl<'de> Visitor<'de> for ShapeVisitor {
            type Value = Shape;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of property names to type categories")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Shape, A::Error> {
                let mut shape = Shape::new();
                while let Some((k, c)) = access.next_entry::<String, TypeCategory>()? {
                    shape.insert(k, c);
                }
                Ok(shape)
            }
        }

        deserializer.deserialize_map(ShapeVisitor)
    }
}
