//! Binding declarations and the registry they compile into.
//!
//! - [`annotation`]: the seven annotation kinds, raw and validated.
//! - [`registry`]: (selector, event kind) -> [`BindingPipeline`].

pub mod annotation;
pub mod registry;

pub use annotation::{AnnotationKind, BindingAnnotation, EventKind, RawAnnotation};
pub use registry::{
    BindingPipeline, BindingRegistry, DuplicateSelector, Mutation, MutationOp, RepeatBinding,
};
