//! Type signature extraction from the assertion trail
//!
//! Folds successful type-level assertions into a tree keyed by path segment
//! and renders it as a TypeScript interface. Entries are applied in trail
//! order, so a later assertion on a path wins over an earlier one.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use eventtest_core::{JsonPath, PathSegment, Shape, TypeAssertion, TypeCategory};
use serde::Serialize;
use tracing::warn;

/// One node of a [`TypeSignature`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureNode {
    /// Bare category from `assert_type` or a shape field
    Leaf(TypeCategory),
    /// Object with known fields
    Object(BTreeMap<String, SignatureNode>),
    /// Array whose elements share a one-level shape
    ArrayOf(BTreeMap<String, TypeCategory>),
}

impl SignatureNode {
    /// Category of the value this node describes
    pub fn category(&self) -> TypeCategory {
        match self {
            SignatureNode::Leaf(c) => *c,
            SignatureNode::Object(_) => TypeCategory::Object,
            SignatureNode::ArrayOf(_) => TypeCategory::Array,
        }
    }
}

/// Tree of asserted types rooted at the store's top-level object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeSignature {
    fields: BTreeMap<String, SignatureNode>,
}

impl TypeSignature {
    /// Fold a trail into a signature
    ///
    /// # Examples
    ///
    /// ```
    /// use eventtest_core::{Shape, TypeAssertion, TypeCategory};
    /// use eventtest_engine::TypeSignature;
    ///
    /// let trail = vec![
    ///     TypeAssertion::Primitive { path: "count".into(), category: TypeCategory::Number },
    ///     TypeAssertion::Object {
    ///         path: "user".into(),
    ///         shape: Shape::from([("name", TypeCategory::String)]),
    ///     },
    /// ];
    /// let sig = TypeSignature::from_assertions(&trail);
    /// assert_eq!(
    ///     sig.to_typescript("State"),
    ///     "interface State {\n  count: number;\n  user: {\n    name: string;\n  };\n}\n"
    /// );
    /// ```
    pub fn from_assertions(trail: &[TypeAssertion]) -> Self {
        let mut sig = TypeSignature::default();
        for entry in trail {
            sig.apply(entry);
        }
        sig
    }

    fn apply(&mut self, entry: &TypeAssertion) {
        let path: JsonPath = match entry.path().parse() {
            Ok(path) => path,
            Err(e) => {
                warn!(target: "eventtest::session", path = entry.path(), error = %e, "skipping trail entry");
                return;
            }
        };
        let keys: Vec<String> = path.segments().iter().map(segment_key).collect();
        if keys.is_empty() {
            if let TypeAssertion::Object { shape, .. } = entry {
                merge_fields(&mut self.fields, shape);
            }
            return;
        }
        insert(&mut self.fields, &keys, entry);
    }

    /// Top-level fields
    pub fn fields(&self) -> &BTreeMap<String, SignatureNode> {
        &self.fields
    }

    /// Node at a dot-delimited path, if one was asserted
    pub fn node_at(&self, path: &str) -> Option<&SignatureNode> {
        let path: JsonPath = path.parse().ok()?;
        let mut keys = path.segments().iter().map(segment_key);
        let mut node = self.fields.get(&keys.next()?)?;
        for key in keys {
            node = match node {
                SignatureNode::Object(children) => children.get(&key)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// True if nothing has been asserted
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as a TypeScript interface declaration
    ///
    /// Keys are sorted. Keys that are not plain identifiers are quoted.
    pub fn to_typescript(&self, name: &str) -> String {
        let mut out = format!("interface {} {{\n", name);
        write_fields(&mut out, &self.fields, 1);
        out.push_str("}\n");
        out
    }
}

fn segment_key(segment: &PathSegment) -> String {
    match segment {
        PathSegment::Key(k) => k.clone(),
        PathSegment::Index(i) => i.to_string(),
    }
}

fn insert(fields: &mut BTreeMap<String, SignatureNode>, keys: &[String], entry: &TypeAssertion) {
    let Some((first, rest)) = keys.split_first() else {
        return;
    };
    if rest.is_empty() {
        place(fields, first, entry);
        return;
    }

    let node = fields
        .entry(first.clone())
        .or_insert_with(|| SignatureNode::Object(BTreeMap::new()));
    if let SignatureNode::Object(children) = node {
        insert(children, rest, entry);
        return;
    }
    let mut children = BTreeMap::new();
    insert(&mut children, rest, entry);
    *node = SignatureNode::Object(children);
}

fn place(fields: &mut BTreeMap<String, SignatureNode>, key: &str, entry: &TypeAssertion) {
    match entry {
        TypeAssertion::Primitive { category, .. } => set_leaf(fields, key, *category),
        TypeAssertion::Object { shape, .. } => match fields.get_mut(key) {
            Some(SignatureNode::Object(children)) => merge_fields(children, shape),
            _ => {
                let mut children = BTreeMap::new();
                merge_fields(&mut children, shape);
                fields.insert(key.to_string(), SignatureNode::Object(children));
            }
        },
        TypeAssertion::Array { element_shape, .. } => match fields.get_mut(key) {
            Some(SignatureNode::ArrayOf(element)) => merge_element(element, element_shape),
            _ => {
                let mut element = BTreeMap::new();
                merge_element(&mut element, element_shape);
                fields.insert(key.to_string(), SignatureNode::ArrayOf(element));
            }
        },
    }
}

// A bare `object`/`array` category does not erase a richer node of that kind.
fn set_leaf(fields: &mut BTreeMap<String, SignatureNode>, key: &str, category: TypeCategory) {
    let keep = matches!(
        (fields.get(key), category),
        (Some(SignatureNode::Object(_)), TypeCategory::Object)
            | (Some(SignatureNode::ArrayOf(_)), TypeCategory::Array)
    );
    if !keep {
        fields.insert(key.to_string(), SignatureNode::Leaf(category));
    }
}

fn merge_fields(fields: &mut BTreeMap<String, SignatureNode>, shape: &Shape) {
    for (key, category) in shape.iter() {
        set_leaf(fields, key, category);
    }
}

fn merge_element(element: &mut BTreeMap<String, TypeCategory>, shape: &Shape) {
    for (key, category) in shape.iter() {
        element.insert(key.to_string(), category);
    }
}

fn ts_type(category: TypeCategory) -> &'static str {
    match category {
        TypeCategory::Number => "number",
        TypeCategory::String => "string",
        TypeCategory::Boolean => "boolean",
        TypeCategory::Object => "object",
        TypeCategory::Array => "unknown[]",
        TypeCategory::Function => "Function",
        TypeCategory::Undefined => "undefined",
    }
}

fn ts_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if is_ident {
        key.to_string()
    } else {
        serde_json::Value::String(key.to_string()).to_string()
    }
}

fn write_fields(out: &mut String, fields: &BTreeMap<String, SignatureNode>, depth: usize) {
    let indent = "  ".repeat(depth);
    for (key, node) in fields {
        let _ = write!(out, "{}{}: ", indent, ts_key(key));
        match node {
            SignatureNode::Leaf(c) => out.push_str(ts_type(*c)),
            SignatureNode::Object(children) => {
                out.push_str("{\n");
                write_fields(out, children, depth + 1);
                out.push_str(&indent);
                out.push('}');
            }
            SignatureNode::ArrayOf(element) => {
                let parts: Vec<String> = element
                    .iter()
                    .map(|(k, c)| format!("{}: {}", ts_key(k), ts_type(*c)))
                    .collect();
                if parts.is_empty() {
                    out.push_str("{}[]");
                } else {
                    let _ = write!(out, "{{ {} }}[]", parts.join("; "));
                }
            }
        }
        out.push_str(";\n");
    }
}
