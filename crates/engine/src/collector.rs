//! TypeAssertionCollector: the type assertion trail
//!
//! Populated only by successful type, shape and array-shape assertions.
//! Value equality, length and fire-count assertions never add entries.

use eventtest_core::{Shape, TypeAssertion, TypeCategory};

/// Append-only list of type-level assertions
#[derive(Debug, Clone, Default)]
pub struct TypeAssertionCollector {
    entries: Vec<TypeAssertion>,
}

impl TypeAssertionCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a primitive category assertion
    pub fn record_primitive(&mut self, path: impl Into<String>, category: TypeCategory) {
        self.entries.push(TypeAssertion::Primitive {
            path: path.into(),
            category,
        });
    }

    /// Record an object shape assertion
    pub fn record_shape(&mut self, path: impl Into<String>, shape: Shape) {
        self.entries.push(TypeAssertion::Object {
            path: path.into(),
            shape,
        });
    }

    /// Record an array element shape assertion
    pub fn record_array_shape(&mut self, path: impl Into<String>, element_shape: Shape) {
        self.entries.push(TypeAssertion::Array {
            path: path.into(),
            element_shape,
        });
    }

    /// Owned copy of the trail in call order
    pub fn snapshot(&self) -> Vec<TypeAssertion> {
        self.entries.clone()
    }

    /// Borrow the trail
    pub fn entries(&self) -> &[TypeAssertion] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no type-level assertion has succeeded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
