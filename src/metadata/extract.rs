//! Metadata extraction: ComponentDef -> ComponentSpec.
//!
//! Parses every selector and path exactly once, derives each member's
//! triggers, and registers them. Extraction is pure: it never sees state.

use std::collections::HashSet;

use super::def::{ComponentDef, FieldType, MemberDef, MemberKind};
use super::descriptor::{ComponentSpec, MemberDescriptor, Trigger};
use crate::binding::{
    AnnotationKind, BindingAnnotation, BindingPipeline, BindingRegistry, DuplicateSelector,
    Mutation, MutationOp, RawAnnotation, RepeatBinding,
};
use crate::syntax::{ParseError, PathExpression, Selector};

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors in a component definition. Raised at load time; always fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    DuplicateSelector(#[from] DuplicateSelector),
    #[error("member `{member}` is declared twice")]
    DuplicateMember { member: String },
    #[error("`{member}`: {kind} annotation requires a path")]
    MissingPath { member: String, kind: AnnotationKind },
    #[error("`{member}`: {kind} annotation has no selector and no event annotation to inherit one from")]
    MissingSelector { member: String, kind: AnnotationKind },
    #[error("`{member}`: invalid selector `{selector}`: {source}")]
    InvalidSelector {
        member: String,
        selector: String,
        source: ParseError,
    },
    #[error("`{member}`: invalid path `{path}`: {source}")]
    InvalidPath {
        member: String,
        path: String,
        source: ParseError,
    },
    #[error("`{member}`: viewFor is only valid on fields")]
    RepeatOnMethod { member: String },
    #[error("`{member}`: viewFor requires a collection field, found {found:?}")]
    RepeatOnNonCollection { member: String, found: FieldType },
    #[error("handler `{name}` does not match any method")]
    UnknownHandler { name: String },
    #[error("method `{member}` has bindings but no handler")]
    MissingHandler { member: String },
    #[error("`{member}`: path `{path}` has more placeholders than repeated scopes around `{selector}`")]
    PlaceholderOutsideRepeat {
        member: String,
        path: String,
        selector: String,
    },
}

// ---------------------------------------------------------------------------
// extract
// ---------------------------------------------------------------------------

/// Build the [`ComponentSpec`] for `def`.
pub fn extract(def: &ComponentDef) -> Result<ComponentSpec, ConfigError> {
    let mut registry = BindingRegistry::new();
    let mut members = Vec::with_capacity(def.members().len());
    let mut seen = HashSet::new();

    for member in def.members() {
        if !seen.insert(member.name.as_str()) {
            return Err(ConfigError::DuplicateMember {
                member: member.name.clone(),
            });
        }
        let descriptor = describe(member)?;
        register(&mut registry, &descriptor)?;
        members.push(descriptor);
    }
    check_placeholders(&registry, &members)?;

    log::debug!(
        "extracted `{}`: {} members, {} bindings",
        def.name(),
        members.len(),
        registry.len()
    );
    Ok(ComponentSpec::new(def.name().to_string(), members, registry))
}

/// Each placeholder in a mutation path needs its own enclosing repeated scope.
///
/// Runs after registration so repeats declared by later members count.
fn check_placeholders(
    registry: &BindingRegistry,
    members: &[MemberDescriptor],
) -> Result<(), ConfigError> {
    for member in members {
        for trigger in &member.triggers {
            let depth = registry.repeat_depth(&trigger.selector);
            if let Some(mutation) = trigger
                .mutations
                .iter()
                .find(|m| m.path.placeholder_count() > depth)
            {
                return Err(ConfigError::PlaceholderOutsideRepeat {
                    member: member.name.clone(),
                    path: mutation.path.to_string(),
                    selector: trigger.selector.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Validate one member's annotations and derive its triggers.
fn describe(member: &MemberDef) -> Result<MemberDescriptor, ConfigError> {
    // Mutations without a selector inherit the first event annotation's.
    let inherited = member
        .annotations
        .iter()
        .find(|a| a.kind.event().is_some())
        .and_then(|a| a.selector.as_deref());

    let annotations = member
        .annotations
        .iter()
        .map(|raw| validate(member, raw, inherited))
        .collect::<Result<Vec<_>, _>>()?;

    let mut field_type = member.field_type;
    if annotations.iter().any(|a| a.kind() == AnnotationKind::ViewFor) {
        if member.kind == MemberKind::Method {
            return Err(ConfigError::RepeatOnMethod {
                member: member.name.clone(),
            });
        }
        match field_type {
            None => field_type = Some(FieldType::Collection),
            Some(FieldType::Collection) => {}
            Some(found) => {
                return Err(ConfigError::RepeatOnNonCollection {
                    member: member.name.clone(),
                    found,
                })
            }
        }
    }

    let triggers = derive_triggers(&annotations);
    Ok(MemberDescriptor {
        kind: member.kind,
        name: member.name.clone(),
        annotations,
        field_type,
        triggers,
    })
}

fn validate(
    member: &MemberDef,
    raw: &RawAnnotation,
    inherited: Option<&str>,
) -> Result<BindingAnnotation, ConfigError> {
    let path = match (raw.kind.is_mutation(), raw.path.as_deref()) {
        (true, None) => {
            return Err(ConfigError::MissingPath {
                member: member.name.clone(),
                kind: raw.kind,
            })
        }
        (true, Some(text)) => {
            Some(
                PathExpression::parse(text).map_err(|source| ConfigError::InvalidPath {
                    member: member.name.clone(),
                    path: text.to_string(),
                    source,
                })?,
            )
        }
        (false, _) => None,
    };

    let selector_text = match raw.selector.as_deref() {
        Some(text) => text,
        None if raw.kind.is_mutation() => inherited.ok_or_else(|| ConfigError::MissingSelector {
            member: member.name.clone(),
            kind: raw.kind,
        })?,
        None => {
            return Err(ConfigError::MissingSelector {
                member: member.name.clone(),
                kind: raw.kind,
            })
        }
    };
    let selector =
        Selector::parse(selector_text).map_err(|source| ConfigError::InvalidSelector {
            member: member.name.clone(),
            selector: selector_text.to_string(),
            source,
        })?;

    BindingAnnotation::from_parts(raw.kind, selector, path).ok_or_else(|| ConfigError::MissingPath {
        member: member.name.clone(),
        kind: raw.kind,
    })
}

/// Event annotations open triggers in order. Each mutation joins the first
/// trigger on its selector, or opens an implied one with its default event.
fn derive_triggers(annotations: &[BindingAnnotation]) -> Vec<Trigger> {
    let mut triggers: Vec<Trigger> = annotations
        .iter()
        .filter_map(|a| {
            a.event().map(|event| Trigger {
                selector: a.selector().clone(),
                event,
                implied: false,
                mutations: Vec::new(),
            })
        })
        .collect();

    for annotation in annotations {
        let (op, path) = match annotation {
            BindingAnnotation::DataBind { path, .. } => (MutationOp::Bind, path),
            BindingAnnotation::Toggle { path, .. } => (MutationOp::Toggle, path),
            BindingAnnotation::Remove { path, .. } => (MutationOp::Remove, path),
            _ => continue,
        };
        let mutation = Mutation {
            op,
            path: path.clone(),
        };
        let selector = annotation.selector();

        if let Some(trigger) = triggers.iter_mut().find(|t| &t.selector == selector) {
            trigger.mutations.push(mutation);
            continue;
        }
        if let Some(event) = annotation.kind().default_event() {
            triggers.push(Trigger {
                selector: selector.clone(),
                event,
                implied: true,
                mutations: vec![mutation],
            });
        }
    }

    triggers
}

fn register(registry: &mut BindingRegistry, member: &MemberDescriptor) -> Result<(), ConfigError> {
    for trigger in &member.triggers {
        registry.register(
            trigger.selector.clone(),
            trigger.event,
            BindingPipeline {
                member: member.name.clone(),
                handler: member.is_method().then(|| member.name.clone()),
                mutations: trigger.mutations.clone(),
            },
        )?;
    }
    if let Some(selector) = member.repeat_selector() {
        registry.register_repeat(
            selector.clone(),
            RepeatBinding {
                member: member.name.clone(),
                collection: PathExpression::key(member.name.as_str()),
            },
        )?;
    }
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================
