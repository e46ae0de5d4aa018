//! Component state: the owned value tree, path resolution, and mutation.
//!
//! - [`State`]: one per component instance, never shared.
//! - [`resolve`] / [`lookup`]: walk a [`PathExpression`](crate::syntax::PathExpression)
//!   to a [`Location`] (for mutation) or a value (for reading).
//! - [`mutate`]: the only three ways state changes: `set`, `toggle`, `remove`.

pub mod mutate;
pub mod resolve;

use serde_json::Value;

pub use resolve::{lookup, resolve, IterationContext, Location, PathError};

/// The mutable data tree of one component instance.
///
/// Wraps a [`serde_json::Value`]. Reading is open; writing goes through
/// [`resolve`] and the [`mutate`] operations.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    root: Value,
}

impl State {
    /// Create a state with the given root value.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// An empty object root.
    pub fn empty() -> Self {
        Self {
            root: Value::Object(serde_json::Map::new()),
        }
    }

    /// The root value.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Consume the state, returning its root value.
    pub fn into_inner(self) -> Value {
        self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// Replace the whole tree with `snapshot`. Used to undo a failed dispatch.
    pub(crate) fn restore(&mut self, snapshot: State) {
        *self = snapshot;
    }
}

impl Default for State {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for State {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_state_is_object() {
        let state = State::empty();
        assert_eq!(state.root(), &json!({}));
        assert_eq!(State::default(), state);
    }

    #[test]
    fn from_value() {
        let state: State = json!({"title": "x"}).into();
        assert_eq!(state.root()["title"], "x");
        assert_eq!(state.into_inner(), json!({"title": "x"}));
    }

    #[test]
    fn restore_replaces_tree() {
        let mut state = State::new(json!({"a": 1}));
        let snapshot = state.clone();
        *state.root_mut() = json!({"a": 2});
        state.restore(snapshot);
        assert_eq!(state.root(), &json!({"a": 1}));
    }
}
