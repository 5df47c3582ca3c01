//! Type assertion trail entries
//!
//! A closed sum type so that consumers extracting a type signature can match
//! exhaustively. Serialized with a `kind` tag.

use crate::types::{Shape, TypeCategory};
use serde::{Deserialize, Serialize};

/// One successful type-level assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeAssertion {
    /// `assert_type(path, category)`
    Primitive {
        /// Asserted path
        path: String,
        /// Asserted category
        #[serde(rename = "type")]
        category: TypeCategory,
    },
    /// `assert_shape(path, shape)`
    Object {
        /// Asserted path
        path: String,
        /// Asserted one-level shape
        shape: Shape,
    },
    /// `assert_array_of(path, element_shape)`
    Array {
        /// Asserted path
        path: String,
        /// Shape every element satisfied
        #[serde(rename = "elementShape")]
        element_shape: Shape,
    },
}

impl TypeAssertion {
    /// Path the assertion was made against
    pub fn path(&self) -> &str {
        match self {
            TypeAssertion::Primitive { path, .. }
            | TypeAssertion::Object { path, .. }
            | TypeAssertion::Array { path, .. } => path,
        }
    }

    /// Tag name: `primitive`, `object` or `array`
    pub fn kind(&self) -> &'static str {
        match self {
            TypeAssertion::Primitive { .. } => "primitive",
            TypeAssertion::Object { .. } => "object",
            TypeAssertion::Array { .. } => "array",
        }
    }

    /// Category of the asserted value itself
    pub fn category(&self) -> TypeCategory {
        match self {
            TypeAssertion::Primitive { category, .. } => *category,
            TypeAssertion::Object { .. } => TypeCategory::Object,
            TypeAssertion::Array { .. } => TypeCategory::Array,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let p = TypeAssertion::Primitive {
            path: "count".to_string(),
            category: TypeCategory::Number,
        };
        assert_eq!(p.path(), "count");
        assert_eq!(p.kind(), "primitive");
        assert_eq!(p.category(), TypeCategory::Number);

        let a = TypeAssertion::Array {
            path: "items".to_string(),
            element_shape: Shape::from([("id", TypeCategory::Number)]),
        };
        assert_eq!(a.kind(), "array");
        assert_eq!(a.category(), TypeCategory::Array);
    }

    #[test]
    fn test_serialized_forms() {
        let p = TypeAssertion::Primitive {
            path: "count".to_string(),
            category: TypeCategory::Number,
        };
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({"kind": "primitive", "path": "count", "type": "number"})
        );

        let o = TypeAssertion::Object {
            path: "user".to_string(),
            shape: Shape::from([("name", TypeCategory::String)]),
        };
        assert_eq!(
            serde_json::to_value(&o).unwrap(),
            json!({"kind": "object", "path": "user", "shape": {"name": "string"}})
        );

        let a = TypeAssertion::Array {
            path: "items".to_string(),
            element_shape: Shape::from([("id", TypeCategory::Number)]),
        };
        let text = serde_json::to_string(&a).unwrap();
        assert!(text.contains("\"elementShape\""));
        let back: TypeAssertion = serde_json::from_str(&text).unwrap();
        assert_eq!(back, a);
    }
}
