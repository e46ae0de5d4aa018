//! Component metadata: definitions in, validated specs out.
//!
//! - [`def`]: [`ComponentDef`], the annotated member list a component declares.
//! - [`descriptor`]: [`ComponentSpec`] and [`MemberDescriptor`], the immutable result.
//! - [`extract`](mod@extract): validation, trigger derivation, registration.

pub mod def;
pub mod descriptor;
pub mod extract;

pub use def::{ComponentDef, FieldType, MemberDef, MemberKind};
pub use descriptor::{ComponentSpec, MemberDescriptor, Trigger};
pub use extract::{extract, ConfigError};
