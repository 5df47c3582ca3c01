//! Assertion checks over values read from a store
//!
//! Each check takes the value found at a path (`None` when the path or any
//! intermediate segment is missing) and returns the first violation as an
//! [`AssertionError`]. The checks are pure: they never touch the store and
//! never record anything. Recording happens in the session once a check
//! has passed.

use eventtest_core::{deep_equal, value_type_name, AssertionError, JsonValue, Shape, TypeCategory};
use serde_json::Value;

use crate::recorder::EventRecorder;

fn found_name(value: Option<&Value>) -> &'static str {
    value.map(value_type_name).unwrap_or("undefined")
}

/// Structural deep equality against `expected`
///
/// A missing value never equals anything, not even `null`.
pub fn check_path(
    path: &str,
    actual: Option<&Value>,
    expected: &JsonValue,
) -> Result<(), AssertionError> {
    match actual {
        Some(v) if deep_equal(v, expected) => Ok(()),
        _ => Err(AssertionError::PathMismatch {
            path: path.to_string(),
            expected: expected.clone(),
            actual: actual.cloned().map(JsonValue::from),
        }),
    }
}

/// Runtime category check
pub fn check_type(
    path: &str,
    actual: Option<&Value>,
    expected: TypeCategory,
) -> Result<(), AssertionError> {
    let found = TypeCategory::of(actual);
    if found == expected {
        Ok(())
    } else {
        Err(AssertionError::TypeMismatch {
            path: path.to_string(),
            expected,
            actual: found,
        })
    }
}

/// One-level shape check
///
/// The value must be a plain object; `null` and arrays are rejected. Keys
/// are checked in shape order and the first violation is returned. Extra
/// keys on the object are allowed.
pub fn check_shape(path: &str, actual: Option<&Value>, shape: &Shape) -> Result<(), AssertionError> {
    check_object(path, None, actual, shape)
}

fn check_object(
    path: &str,
    index: Option<usize>,
    actual: Option<&Value>,
    shape: &Shape,
) -> Result<(), AssertionError> {
    let object = match actual {
        Some(Value::Object(map)) => map,
        other => {
            return Err(AssertionError::NotAnObject {
                path: path.to_string(),
                index,
                found: found_name(other),
            })
        }
    };

    for (key, expected) in shape.iter() {
        let field = match object.get(key) {
            Some(field) => field,
            None => {
                return Err(AssertionError::MissingProperty {
                    path: path.to_string(),
                    index,
                    key: key.to_string(),
                })
            }
        };
        let found = TypeCategory::of(Some(field));
        if found != expected {
            return Err(AssertionError::PropertyTypeMismatch {
                path: path.to_string(),
                index,
                key: key.to_string(),
                expected,
                actual: found,
            });
        }
    }
    Ok(())
}

/// Shape check applied to every element of an array
///
/// An empty array passes for any shape. The first failing element stops the
/// check and its index is carried in the error.
pub fn check_array_of(
    path: &str,
    actual: Option<&Value>,
    element_shape: &Shape,
) -> Result<(), AssertionError> {
    let items = match actual {
        Some(Value::Array(items)) => items,
        other => {
            return Err(AssertionError::NotAnArray {
                path: path.to_string(),
                found: found_name(other),
            })
        }
    };

    for (i, item) in items.iter().enumerate() {
        check_object(path, Some(i), Some(item), element_shape)?;
    }
    Ok(())
}

/// Exact array length check
pub fn check_array_length(
    path: &str,
    actual: Option<&Value>,
    expected: usize,
) -> Result<(), AssertionError> {
    let len = match actual {
        Some(Value::Array(items)) => Some(items.len()),
        _ => None,
    };
    if len == Some(expected) {
        Ok(())
    } else {
        Err(AssertionError::LengthMismatch {
            path: path.to_string(),
            expected,
            actual: len,
        })
    }
}

/// Trigger count check against the recorder
pub fn check_fire_count(
    path: &str,
    recorder: &EventRecorder,
    expected: usize,
) -> Result<(), AssertionError> {
    let actual = recorder.count_for(path);
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::FireCountMismatch {
            path: path.to_string(),
            expected,
            actual,
        })
    }
}
