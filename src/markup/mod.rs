//! Markup: arena tree, node directives, and emission from a component spec.

pub mod emit;
pub mod node;
pub mod tree;

pub use emit::emit;
pub use node::{Directive, MarkupNode, NodeId, NodeTag};
pub use tree::MarkupTree;
