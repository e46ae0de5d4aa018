//! Runtime events: what the host UI reports, with where and with what.

use serde_json::Value;

use crate::binding::EventKind;
use crate::state::IterationContext;
use crate::syntax::Selector;

/// Per-event data: iteration indices and payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventContext {
    /// Set when the event came from inside a repeated scope.
    pub iteration: Option<IterationContext>,
    /// New value for inputs and checkboxes; `null` for taps.
    pub payload: Value,
}

impl EventContext {
    /// No iteration, `null` payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inside one repeated scope, at `index`.
    pub fn at(index: usize) -> Self {
        Self {
            iteration: Some(IterationContext::single(index)),
            payload: Value::Null,
        }
    }

    /// Inside nested repeated scopes, outermost first.
    pub fn nested(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            iteration: Some(IterationContext::nested(indices)),
            payload: Value::Null,
        }
    }

    /// Set the payload (builder).
    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// A UI event addressed to a selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub selector: Selector,
    pub context: EventContext,
}

impl Event {
    pub fn new(kind: EventKind, selector: Selector, context: EventContext) -> Self {
        Self {
            kind,
            selector,
            context,
        }
    }

    /// A button tap with no payload.
    pub fn tap(selector: Selector) -> Self {
        Self::new(EventKind::ButtonTap, selector, EventContext::new())
    }

    /// A text input change carrying `value`.
    pub fn input(selector: Selector, value: impl Into<Value>) -> Self {
        Self::new(
            EventKind::InputChange,
            selector,
            EventContext::new().with_payload(value.into()),
        )
    }

    /// A checkbox change carrying the new checked state.
    pub fn check(selector: Selector, checked: bool) -> Self {
        Self::new(
            EventKind::CheckboxChange,
            selector,
            EventContext::new().with_payload(checked),
        )
    }

    /// Replace the iteration context (builder).
    pub fn within(mut self, iteration: IterationContext) -> Self {
        self.context.iteration = Some(iteration);
        self
    }
}
