//! Node types: NodeId, NodeTag, Directive, MarkupNode.

use std::fmt;

use slotmap::new_key_type;

use crate::binding::EventKind;
use crate::syntax::PathExpression;

new_key_type! {
    /// Unique identifier for a markup node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// The host element a node renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    View,
    Input,
    Button,
    Checkbox,
}

impl NodeTag {
    /// The element name used in rendered markup.
    pub fn name(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Input => "input",
            Self::Button => "button",
            Self::Checkbox => "checkbox",
        }
    }

    /// The tag implied by an event kind.
    pub fn for_event(event: EventKind) -> Self {
        match event {
            EventKind::InputChange => Self::Input,
            EventKind::ButtonTap => Self::Button,
            EventKind::CheckboxChange => Self::Checkbox,
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A markup attribute directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Render the node once per element of `collection`.
    Repeat {
        collection: PathExpression,
        item: String,
        index: String,
    },
    /// Show `path` and write input back to it.
    Bind { path: PathExpression },
    /// Route `event` to the member named `handler`.
    On { event: EventKind, handler: String },
}

impl Directive {
    /// The default per-element repeat variables: `item` and `index`.
    pub fn repeat(collection: PathExpression) -> Self {
        Self::Repeat {
            collection,
            item: "item".into(),
            index: "index".into(),
        }
    }
}

/// Data associated with a single markup node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    /// Scope token this node stands for (its `id` in markup).
    pub name: String,
    pub tag: NodeTag,
    /// Declaration order.
    pub directives: Vec<Directive>,
}

impl MarkupNode {
    /// A `view` node with no directives.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: NodeTag::View,
            directives: Vec::new(),
        }
    }

    /// Set the tag (builder).
    pub fn with_tag(mut self, tag: NodeTag) -> Self {
        self.tag = tag;
        self
    }

    /// Add a directive (builder).
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// The repeat directive, if the node is a repeated scope.
    pub fn repeat(&self) -> Option<&Directive> {
        self.directives
            .iter()
            .find(|d| matches!(d, Directive::Repeat { .. }))
    }

    /// Handler identifier wired to `event`, if any.
    pub fn handler_for(&self, event: EventKind) -> Option<&str> {
        self.directives.iter().find_map(|d| match d {
            Directive::On { event: e, handler } if *e == event => Some(handler.as_str()),
            _ => None,
        })
    }
}
