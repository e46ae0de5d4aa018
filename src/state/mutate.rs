//! The three state mutations: set, toggle, remove.
//!
//! Each operation takes a resolved [`Location`] and either fully applies or
//! leaves state untouched.

use serde_json::Value;

use super::resolve::{kind_name, Container, Location, PathError};

/// Overwrite the value at `location`, returning the previous value if any.
pub fn set(location: Location<'_>, value: Value) -> Option<Value> {
    match location.container {
        Container::Map { map, key } => map.insert(key, value),
        Container::Seq { seq, index } => seq
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value)),
    }
}

/// Negate the boolean at `location`, returning the new value.
///
/// Fails with [`PathError::TypeMismatch`] if the value is not a boolean.
pub fn toggle(location: Location<'_>) -> Result<bool, PathError> {
    let Location { container, path } = location;
    let slot = match container {
        Container::Map { map, key } => {
            map.get_mut(&key).ok_or_else(|| PathError::MissingField {
                path: path.clone(),
                field: key.clone(),
            })?
        }
        Container::Seq { seq, index } => {
            let len = seq.len();
            seq.get_mut(index).ok_or_else(|| PathError::IndexOutOfRange {
                path: path.clone(),
                index,
                len,
            })?
        }
    };

    match slot {
        Value::Bool(flag) => {
            *flag = !*flag;
            Ok(*flag)
        }
        other => Err(PathError::TypeMismatch {
            path,
            expected: "boolean",
            found: kind_name(other),
        }),
    }
}

/// Delete the value at `location`, returning it.
///
/// A sequence element is removed and later elements shift left; a map entry
/// is removed by key and the remaining keys keep their order.
pub fn remove(location: Location<'_>) -> Result<Value, PathError> {
    let Location { container, path } = location;
    match container {
        Container::Map { map, key } => map
            .shift_remove(&key)
            .ok_or(PathError::MissingField { path, field: key }),
        Container::Seq { seq, index } => {
            if index < seq.len() {
                Ok(seq.remove(index))
            } else {
                Err(PathError::IndexOutOfRange {
                    path,
                    index,
                    len: seq.len(),
                })
            }
        }
    }
}
