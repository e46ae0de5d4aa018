//! Handlers: named closures run when a bound method's event fires.
//!
//! A handler receives a [`HandlerContext`], which is the only window it gets
//! onto the component: read state, apply the three mutations, or queue a
//! follow-up event. Queued events run after the current one completes.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::message::Event;
use crate::state::{lookup, mutate, resolve, IterationContext, PathError, State};
use crate::syntax::{PathExpression, Selector};

// ---------------------------------------------------------------------------
// HandlerError
// ---------------------------------------------------------------------------

/// A failure reported by handler code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("{0}")]
    Message(String),
}

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

pub type HandlerResult = Result<(), HandlerError>;

// ---------------------------------------------------------------------------
// HandlerContext
// ---------------------------------------------------------------------------

/// What a running handler can see and do.
pub struct HandlerContext<'a> {
    state: &'a mut State,
    selector: &'a Selector,
    payload: &'a Value,
    iteration: Option<&'a IterationContext>,
    follow_ups: &'a mut Vec<Event>,
}

impl<'a> HandlerContext<'a> {
    pub(crate) fn new(
        state: &'a mut State,
        selector: &'a Selector,
        payload: &'a Value,
        iteration: Option<&'a IterationContext>,
        follow_ups: &'a mut Vec<Event>,
    ) -> Self {
        Self {
            state,
            selector,
            payload,
            iteration,
            follow_ups,
        }
    }

    pub fn state(&self) -> &State {
        self.state
    }

    /// Selector of the node the event came from.
    pub fn selector(&self) -> &Selector {
        self.selector
    }

    pub fn payload(&self) -> &Value {
        self.payload
    }

    pub fn iteration(&self) -> Option<&IterationContext> {
        self.iteration
    }

    /// Index of the innermost repeated scope, if any.
    pub fn index(&self) -> Option<usize> {
        self.iteration.and_then(IterationContext::innermost)
    }

    /// Read the value at `path`, resolving placeholders against this event.
    pub fn get(&self, path: &PathExpression) -> Result<&Value, PathError> {
        lookup(path, self.state.root(), self.iteration)
    }

    /// Overwrite the value at `path`, returning the previous one.
    pub fn set(&mut self, path: &PathExpression, value: Value) -> Result<Option<Value>, PathError> {
        let location = resolve(path, self.state, self.iteration)?;
        Ok(mutate::set(location, value))
    }

    /// Negate the boolean at `path`, returning the new value.
    pub fn toggle(&mut self, path: &PathExpression) -> Result<bool, PathError> {
        mutate::toggle(resolve(path, self.state, self.iteration)?)
    }

    /// Delete the element or key at `path`, returning it.
    pub fn remove(&mut self, path: &PathExpression) -> Result<Value, PathError> {
        mutate::remove(resolve(path, self.state, self.iteration)?)
    }

    /// Queue `event` to run after the current event completes.
    pub fn dispatch(&mut self, event: Event) {
        self.follow_ups.push(event);
    }
}

// ---------------------------------------------------------------------------
// HandlerTable
// ---------------------------------------------------------------------------

pub(crate) type BoxedHandler = Box<dyn FnMut(&mut HandlerContext<'_>) -> HandlerResult>;

/// Handlers by method name.
#[derive(Default)]
pub struct HandlerTable {
    handlers: HashMap<String, BoxedHandler>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, replacing any previous one.
    pub fn insert<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: FnMut(&mut HandlerContext<'_>) -> HandlerResult + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    /// Register `handler` under `name` (builder).
    pub fn with<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&mut HandlerContext<'_>) -> HandlerResult + 'static,
    {
        self.insert(name, handler);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler named `name`. `None` if there is none.
    pub fn call(&mut self, name: &str, cx: &mut HandlerContext<'_>) -> Option<HandlerResult> {
        self.handlers.get_mut(name).map(|handler| handler(cx))
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("handlers", &self.names())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
