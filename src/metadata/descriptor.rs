//! Extracted, immutable component metadata.

use serde_json::{Map, Value};

use super::def::{FieldType, MemberKind};
use crate::binding::{BindingAnnotation, BindingRegistry, EventKind, Mutation};
use crate::state::State;
use crate::syntax::Selector;

/// An event a member reacts to, with the mutations it performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub selector: Selector,
    pub event: EventKind,
    /// Opened by a mutation with no matching event annotation.
    pub implied: bool,
    /// Declared order.
    pub mutations: Vec<Mutation>,
}

/// One member of a [`ComponentSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub kind: MemberKind,
    pub name: String,
    pub annotations: Vec<BindingAnnotation>,
    pub field_type: Option<FieldType>,
    pub triggers: Vec<Trigger>,
}

impl MemberDescriptor {
    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    /// Selector this field is repeated at, if it has a `viewFor` annotation.
    pub fn repeat_selector(&self) -> Option<&Selector> {
        self.annotations.iter().find_map(|a| match a {
            BindingAnnotation::ViewFor { selector } => Some(selector),
            _ => None,
        })
    }
}

/// The validated binding metadata of a component.
///
/// Built once by [`extract`](super::extract). Members keep declaration order,
/// and every binding they declare is already in the [`BindingRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    name: String,
    members: Vec<MemberDescriptor>,
    registry: BindingRegistry,
}

impl ComponentSpec {
    pub(crate) fn new(
        name: String,
        members: Vec<MemberDescriptor>,
        registry: BindingRegistry,
    ) -> Self {
        Self {
            name,
            members,
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Find a member by name.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Initial state: one entry per field, in declaration order.
    ///
    /// Fields without a declared type start as `null`.
    pub fn default_state(&self) -> State {
        let root: Map<String, Value> = self
            .members
            .iter()
            .filter(|m| m.kind == MemberKind::Field)
            .map(|m| {
                let value = m.field_type.map_or(Value::Null, FieldType::default_value);
                (m.name.clone(), value)
            })
            .collect();
        State::new(Value::Object(root))
    }
}
