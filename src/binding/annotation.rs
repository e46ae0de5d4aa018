//! Binding annotations: raw (as declared) and validated forms.
//!
//! A [`RawAnnotation`] is what a component definition carries: a kind plus
//! unparsed selector/path strings. The extractor turns each one into a
//! [`BindingAnnotation`], a closed enum whose payloads are already parsed.

use std::fmt;

use crate::syntax::{PathExpression, Selector};

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Host UI events a binding can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Text input value changed.
    InputChange,
    /// Button tapped.
    ButtonTap,
    /// Checkbox toggled.
    CheckboxChange,
}

impl EventKind {
    /// Event name as it appears in an event attribute (`bind:<name>`).
    pub fn event_name(self) -> &'static str {
        match self {
            Self::InputChange => "change",
            Self::ButtonTap => "tap",
            Self::CheckboxChange => "change",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InputChange => "inputChange",
            Self::ButtonTap => "buttonTap",
            Self::CheckboxChange => "checkboxChange",
        })
    }
}

// ---------------------------------------------------------------------------
// AnnotationKind
// ---------------------------------------------------------------------------

/// The seven annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    ViewFor,
    InputChange,
    ButtonTap,
    CheckboxChange,
    DataBind,
    Toggle,
    Remove,
}

impl AnnotationKind {
    /// The event this kind listens to, for the three event kinds.
    pub fn event(self) -> Option<EventKind> {
        match self {
            Self::InputChange => Some(EventKind::InputChange),
            Self::ButtonTap => Some(EventKind::ButtonTap),
            Self::CheckboxChange => Some(EventKind::CheckboxChange),
            _ => None,
        }
    }

    /// Whether this kind carries a state path.
    pub fn is_mutation(self) -> bool {
        matches!(self, Self::DataBind | Self::Toggle | Self::Remove)
    }

    /// The event a mutation fires on when no event annotation on the same
    /// member shares its selector.
    pub fn default_event(self) -> Option<EventKind> {
        match self {
            Self::DataBind => Some(EventKind::InputChange),
            Self::Toggle => Some(EventKind::CheckboxChange),
            Self::Remove => Some(EventKind::ButtonTap),
            _ => None,
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ViewFor => "viewFor",
            Self::InputChange => "inputChange",
            Self::ButtonTap => "buttonTap",
            Self::CheckboxChange => "checkboxChange",
            Self::DataBind => "dataBind",
            Self::Toggle => "toggle",
            Self::Remove => "remove",
        })
    }
}

// ---------------------------------------------------------------------------
// RawAnnotation
// ---------------------------------------------------------------------------

/// An annotation as declared on a member, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    pub kind: AnnotationKind,
    pub selector: Option<String>,
    pub path: Option<String>,
}

impl RawAnnotation {
    /// An annotation with neither selector nor path.
    pub fn new(kind: AnnotationKind) -> Self {
        Self {
            kind,
            selector: None,
            path: None,
        }
    }

    fn with_selector(kind: AnnotationKind, selector: impl Into<String>) -> Self {
        Self {
            kind,
            selector: Some(selector.into()),
            path: None,
        }
    }

    fn with_path(kind: AnnotationKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            selector: None,
            path: Some(path.into()),
        }
    }

    /// Render the field's collection once per element at `selector`.
    pub fn view_for(selector: impl Into<String>) -> Self {
        Self::with_selector(AnnotationKind::ViewFor, selector)
    }

    pub fn input_change(selector: impl Into<String>) -> Self {
        Self::with_selector(AnnotationKind::InputChange, selector)
    }

    pub fn button_tap(selector: impl Into<String>) -> Self {
        Self::with_selector(AnnotationKind::ButtonTap, selector)
    }

    pub fn checkbox_change(selector: impl Into<String>) -> Self {
        Self::with_selector(AnnotationKind::CheckboxChange, selector)
    }

    /// Two-way bind `path`: the node shows it and input writes the payload back.
    pub fn data_bind(path: impl Into<String>) -> Self {
        Self::with_path(AnnotationKind::DataBind, path)
    }

    /// Negate the boolean at `path` when the event fires.
    pub fn toggle(path: impl Into<String>) -> Self {
        Self::with_path(AnnotationKind::Toggle, path)
    }

    /// Delete the element or key at `path` when the event fires.
    pub fn remove(path: impl Into<String>) -> Self {
        Self::with_path(AnnotationKind::Remove, path)
    }

    /// Set an explicit selector (builder).
    ///
    /// Mutations without one inherit the selector of the member's first event
    /// annotation.
    pub fn at(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Set the path (builder).
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

// ---------------------------------------------------------------------------
// BindingAnnotation
// ---------------------------------------------------------------------------

/// A validated annotation with parsed payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingAnnotation {
    ViewFor { selector: Selector },
    InputChange { selector: Selector },
    ButtonTap { selector: Selector },
    CheckboxChange { selector: Selector },
    DataBind { selector: Selector, path: PathExpression },
    Toggle { selector: Selector, path: PathExpression },
    Remove { selector: Selector, path: PathExpression },
}

impl BindingAnnotation {
    /// Build from a kind and parsed payloads.
    ///
    /// Returns `None` when a mutation kind is given no path.
    pub fn from_parts(
        kind: AnnotationKind,
        selector: Selector,
        path: Option<PathExpression>,
    ) -> Option<Self> {
        Some(match kind {
            AnnotationKind::ViewFor => Self::ViewFor { selector },
            AnnotationKind::InputChange => Self::InputChange { selector },
            AnnotationKind::ButtonTap => Self::ButtonTap { selector },
            AnnotationKind::CheckboxChange => Self::CheckboxChange { selector },
            AnnotationKind::DataBind => Self::DataBind { selector, path: path? },
            AnnotationKind::Toggle => Self::Toggle { selector, path: path? },
            AnnotationKind::Remove => Self::Remove { selector, path: path? },
        })
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Self::ViewFor { .. } => AnnotationKind::ViewFor,
            Self::InputChange { .. } => AnnotationKind::InputChange,
            Self::ButtonTap { .. } => AnnotationKind::ButtonTap,
            Self::CheckboxChange { .. } => AnnotationKind::CheckboxChange,
            Self::DataBind { .. } => AnnotationKind::DataBind,
            Self::Toggle { .. } => AnnotationKind::Toggle,
            Self::Remove { .. } => AnnotationKind::Remove,
        }
    }

    pub fn selector(&self) -> &Selector {
        match self {
            Self::ViewFor { selector }
            | Self::InputChange { selector }
            | Self::ButtonTap { selector }
            | Self::CheckboxChange { selector }
            | Self::DataBind { selector, .. }
            | Self::Toggle { selector, .. }
            | Self::Remove { selector, .. } => selector,
        }
    }

    /// The state path, for the three mutation kinds.
    pub fn path(&self) -> Option<&PathExpression> {
        match self {
            Self::DataBind { path, .. } | Self::Toggle { path, .. } | Self::Remove { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    /// The event listened to, for the three event kinds.
    pub fn event(&self) -> Option<EventKind> {
        self.kind().event()
    }
}
