//! Binding registry: (selector, event) -> binding pipeline.
//!
//! [`BindingRegistry`] enforces that each (selector, event kind) pair is bound
//! at most once, and each selector is repeated by at most one collection.
//! Lookups that find nothing are not errors: most markup nodes have no behavior.

use std::collections::HashMap;

use super::annotation::EventKind;
use crate::syntax::{PathExpression, Selector};

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// What a mutation step does with its resolved location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOp {
    /// Write the event payload (two-way data binding).
    Bind,
    /// Negate a boolean.
    Toggle,
    /// Delete an element or key.
    Remove,
}

/// One path-based step of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mutation {
    pub op: MutationOp,
    pub path: PathExpression,
}

/// Everything one member does when its bound event fires.
///
/// Mutations run in declaration order. Whether they run before or after the
/// handler is decided by the dispatcher's composition order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPipeline {
    /// Member that declared the binding (also the markup handler identifier).
    pub member: String,
    /// Handler to invoke: the member name when the member is a method.
    pub handler: Option<String>,
    pub mutations: Vec<Mutation>,
}

/// A collection rendered once per element at a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatBinding {
    pub member: String,
    pub collection: PathExpression,
}

// ---------------------------------------------------------------------------
// DuplicateSelector
// ---------------------------------------------------------------------------

/// A second registration for an already bound selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("selector `{selector}` already has a {trigger} binding from `{existing}` (redeclared by `{member}`)")]
pub struct DuplicateSelector {
    pub selector: Selector,
    /// Event kind name, or `viewFor` for repeat bindings.
    pub trigger: String,
    pub existing: String,
    pub member: String,
}

// ---------------------------------------------------------------------------
// BindingRegistry
// ---------------------------------------------------------------------------

/// Registry of event bindings and repeat bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingRegistry {
    bindings: HashMap<(Selector, EventKind), BindingPipeline>,
    repeats: HashMap<Selector, RepeatBinding>,
}

impl BindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pipeline for `(selector, event)`.
    ///
    /// Fails if the pair is already bound; the existing binding is kept.
    pub fn register(
        &mut self,
        selector: Selector,
        event: EventKind,
        pipeline: BindingPipeline,
    ) -> Result<(), DuplicateSelector> {
        let key = (selector, event);
        if let Some(existing) = self.bindings.get(&key) {
            return Err(DuplicateSelector {
                selector: key.0,
                trigger: event.to_string(),
                existing: existing.member.clone(),
                member: pipeline.member,
            });
        }
        self.bindings.insert(key, pipeline);
        Ok(())
    }

    /// Register a repeat (list rendering) binding for `selector`.
    pub fn register_repeat(
        &mut self,
        selector: Selector,
        repeat: RepeatBinding,
    ) -> Result<(), DuplicateSelector> {
        if let Some(existing) = self.repeats.get(&selector) {
            return Err(DuplicateSelector {
                selector,
                trigger: "viewFor".into(),
                existing: existing.member.clone(),
                member: repeat.member,
            });
        }
        self.repeats.insert(selector, repeat);
        Ok(())
    }

    /// Look up the pipeline bound to `(selector, event)`.
    pub fn lookup(&self, selector: &Selector, event: EventKind) -> Option<&BindingPipeline> {
        self.bindings.get(&(selector.clone(), event))
    }

    /// The repeat binding at `selector`, if it is a repeated scope.
    pub fn repeat_for(&self, selector: &Selector) -> Option<&RepeatBinding> {
        self.repeats.get(selector)
    }

    /// Number of repeated scopes enclosing `selector`, itself included.
    pub fn repeat_depth(&self, selector: &Selector) -> usize {
        selector
            .prefixes()
            .filter(|prefix| self.repeats.contains_key(prefix))
            .count()
    }

    /// All event bindings, ordered by selector then event kind.
    pub fn entries(&self) -> Vec<(&Selector, EventKind, &BindingPipeline)> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|((selector, event), pipeline)| (selector, *event, pipeline))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(&b.1)));
        entries
    }

    /// Number of event bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no event bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
