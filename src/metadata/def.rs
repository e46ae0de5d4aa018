//! Component definitions: the unvalidated input to extraction.
//!
//! A [`ComponentDef`] is a named, ordered list of members, each carrying its
//! raw annotations. It is what `#[component]` generates, and what tests build
//! by hand with the builder methods.

use serde_json::Value;

use crate::binding::RawAnnotation;

// ---------------------------------------------------------------------------
// MemberKind / FieldType
// ---------------------------------------------------------------------------

/// Whether a member holds state or runs code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
}

/// Declared type of a state field. Decides the field's initial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A sequence (`[]`).
    Collection,
    /// A map (`{}`).
    Record,
    /// A string (`""`).
    Text,
    /// A boolean (`false`).
    Flag,
    /// A number (`0`).
    Number,
}

impl FieldType {
    /// The value a field of this type starts with.
    pub fn default_value(self) -> Value {
        match self {
            Self::Collection => Value::Array(Vec::new()),
            Self::Record => Value::Object(serde_json::Map::new()),
            Self::Text => Value::String(String::new()),
            Self::Flag => Value::Bool(false),
            Self::Number => Value::from(0),
        }
    }
}

// ---------------------------------------------------------------------------
// MemberDef
// ---------------------------------------------------------------------------

/// One declared member and its annotations, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDef {
    pub kind: MemberKind,
    pub name: String,
    pub annotations: Vec<RawAnnotation>,
    /// Only meaningful for fields.
    pub field_type: Option<FieldType>,
}

impl MemberDef {
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Field,
            name: name.into(),
            annotations: Vec::new(),
            field_type: None,
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Method,
            name: name.into(),
            annotations: Vec::new(),
            field_type: None,
        }
    }

    /// Set the field type (builder).
    pub fn typed(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Append an annotation (builder).
    pub fn annotate(mut self, annotation: RawAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

// ---------------------------------------------------------------------------
// ComponentDef
// ---------------------------------------------------------------------------

/// A component definition: a name plus ordered members.
///
/// ```
/// use bindview::binding::RawAnnotation;
/// use bindview::metadata::{ComponentDef, FieldType};
///
/// let def = ComponentDef::new("TodoPage")
///     .field("todoList", Some(FieldType::Collection), [RawAnnotation::view_for("todo-list")])
///     .method("handleTapAddTodo", [RawAnnotation::button_tap("add-todo")]);
/// assert_eq!(def.members().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDef {
    name: String,
    members: Vec<MemberDef>,
}

impl ComponentDef {
    /// Create an empty definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a field member (builder).
    pub fn field(
        self,
        name: impl Into<String>,
        field_type: Option<FieldType>,
        annotations: impl IntoIterator<Item = RawAnnotation>,
    ) -> Self {
        let mut member = MemberDef::field(name);
        member.field_type = field_type;
        member.annotations.extend(annotations);
        self.member(member)
    }

    /// Add a method member (builder).
    pub fn method(
        self,
        name: impl Into<String>,
        annotations: impl IntoIterator<Item = RawAnnotation>,
    ) -> Self {
        let mut member = MemberDef::method(name);
        member.annotations.extend(annotations);
        self.member(member)
    }

    /// Add a prepared member (builder).
    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[MemberDef] {
        &self.members
    }

    /// Names of the method members, in declaration order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|m| m.kind == MemberKind::Method)
            .map(|m| m.name.as_str())
    }
}
