//! Path resolution: PathExpression + state root + iteration context -> Location.
//!
//! Resolution walks every segment but the last, then stops at the terminal
//! container. The caller gets the container and the terminal key/index, never
//! the value itself, so the same [`Location`] can be read or mutated.

use serde_json::{Map, Value};

use super::State;
use crate::syntax::{PathExpression, Segment};

// ---------------------------------------------------------------------------
// PathError
// ---------------------------------------------------------------------------

/// Errors from resolving or mutating a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("`{path}`: placeholder `{placeholder}` has no active iteration index")]
    UnresolvedIndex { path: String, placeholder: String },
    #[error("`{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("`{path}`: field `{field}` does not exist")]
    MissingField { path: String, field: String },
    #[error("`{path}`: index {index} is out of range for length {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}

/// Short name of a value's kind, for error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

// ---------------------------------------------------------------------------
// IterationContext
// ---------------------------------------------------------------------------

/// Indices of the repeated scopes an event originated in, outermost first.
///
/// The n-th placeholder of a path takes the n-th index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationContext {
    indices: Vec<usize>,
}

impl IterationContext {
    /// An empty context (no active iteration).
    pub fn new() -> Self {
        Self::default()
    }

    /// A context for a single repeated scope.
    pub fn single(index: usize) -> Self {
        Self {
            indices: vec![index],
        }
    }

    /// A context for nested repeated scopes, outermost first.
    pub fn nested(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    /// Enter one more (inner) repeated scope.
    pub fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Index of the innermost active scope.
    pub fn innermost(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn get(&self, depth: usize) -> Option<usize> {
        self.indices.get(depth).copied()
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// The container holding a resolved path's terminal value.
#[derive(Debug)]
pub enum Container<'a> {
    /// A map slot. The key may be absent (a `set` creates it).
    Map {
        map: &'a mut Map<String, Value>,
        key: String,
    },
    /// A sequence slot. The index is always in range when resolved.
    Seq { seq: &'a mut Vec<Value>, index: usize },
}

/// A resolved place in state: container + terminal key/index.
#[derive(Debug)]
pub struct Location<'a> {
    pub(crate) container: Container<'a>,
    pub(crate) path: String,
}

impl<'a> Location<'a> {
    pub fn container(&self) -> &Container<'a> {
        &self.container
    }

    /// Display form of the path this location was resolved from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The current value at this location, if present.
    pub fn value(&self) -> Option<&Value> {
        match &self.container {
            Container::Map { map, key } => map.get(key),
            Container::Seq { seq, index } => seq.get(*index),
        }
    }

    /// Whether the terminal container is a sequence.
    pub fn is_element(&self) -> bool {
        matches!(self.container, Container::Seq { .. })
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A segment with its placeholder already replaced by a concrete index.
enum Key<'p> {
    Field(&'p str),
    Index(usize),
}

fn concrete_keys<'p>(
    expr: &'p PathExpression,
    iteration: Option<&IterationContext>,
    path: &str,
) -> Result<Vec<Key<'p>>, PathError> {
    let mut depth = 0;
    expr.segments()
        .iter()
        .map(|segment| match segment {
            Segment::Key(name) => Ok(Key::Field(name.as_str())),
            Segment::Index(index) => Ok(Key::Index(*index)),
            Segment::Placeholder(name) => {
                let index = iteration.and_then(|ctx| ctx.get(depth)).ok_or_else(|| {
                    PathError::UnresolvedIndex {
                        path: path.to_string(),
                        placeholder: name.clone(),
                    }
                })?;
                depth += 1;
                Ok(Key::Index(index))
            }
        })
        .collect()
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> PathError {
    PathError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: kind_name(found),
    }
}

fn step<'a>(value: &'a mut Value, key: &Key<'_>, path: &str) -> Result<&'a mut Value, PathError> {
    match (key, value) {
        (Key::Field(name), Value::Object(map)) => {
            map.get_mut(*name).ok_or_else(|| PathError::MissingField {
                path: path.to_string(),
                field: name.to_string(),
            })
        }
        (Key::Index(index), Value::Array(seq)) => {
            let len = seq.len();
            seq.get_mut(*index).ok_or_else(|| PathError::IndexOutOfRange {
                path: path.to_string(),
                index: *index,
                len,
            })
        }
        (Key::Field(_), other) => Err(mismatch(path, "map", other)),
        (Key::Index(_), other) => Err(mismatch(path, "sequence", other)),
    }
}

/// Resolve `expr` against `state` to a mutable [`Location`].
///
/// Field segments require a map; placeholder and index segments require a
/// sequence. Placeholders need an active `iteration` context.
pub fn resolve<'a>(
    expr: &PathExpression,
    state: &'a mut State,
    iteration: Option<&IterationContext>,
) -> Result<Location<'a>, PathError> {
    resolve_value(expr, state.root_mut(), iteration)
}

pub(crate) fn resolve_value<'a>(
    expr: &PathExpression,
    root: &'a mut Value,
    iteration: Option<&IterationContext>,
) -> Result<Location<'a>, PathError> {
    let path = expr.to_string();
    let keys = concrete_keys(expr, iteration, &path)?;
    let Some((last, init)) = keys.split_last() else {
        return Err(PathError::MissingField {
            path,
            field: String::new(),
        });
    };

    let mut current = root;
    for key in init {
        current = step(current, key, &path)?;
    }

    let container = match (last, current) {
        (Key::Field(name), Value::Object(map)) => Container::Map {
            map,
            key: name.to_string(),
        },
        (Key::Index(index), Value::Array(seq)) => {
            if *index >= seq.len() {
                return Err(PathError::IndexOutOfRange {
                    path,
                    index: *index,
                    len: seq.len(),
                });
            }
            Container::Seq { seq, index: *index }
        }
        (Key::Field(_), other) => return Err(mismatch(&path, "map", other)),
        (Key::Index(_), other) => return Err(mismatch(&path, "sequence", other)),
    };

    Ok(Location { container, path })
}

/// Read the value at `expr` without mutating anything.
pub fn lookup<'a>(
    expr: &PathExpression,
    root: &'a Value,
    iteration: Option<&IterationContext>,
) -> Result<&'a Value, PathError> {
    let path = expr.to_string();
    let keys = concrete_keys(expr, iteration, &path)?;

    let mut current = root;
    for key in &keys {
        current = match (key, current) {
            (Key::Field(name), Value::Object(map)) => {
                map.get(*name).ok_or_else(|| PathError::MissingField {
                    path: path.clone(),
                    field: name.to_string(),
                })?
            }
            (Key::Index(index), Value::Array(seq)) => {
                seq.get(*index).ok_or_else(|| PathError::IndexOutOfRange {
                    path: path.clone(),
                    index: *index,
                    len: seq.len(),
                })?
            }
            (Key::Field(_), other) => return Err(mismatch(&path, "map", other)),
            (Key::Index(_), other) => return Err(mismatch(&path, "sequence", other)),
        };
    }
    Ok(current)
}
