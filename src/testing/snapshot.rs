//! Snapshot rendering helpers.
//!
//! Converts a [`MarkupTree`] into deterministic, indented text suitable for
//! snapshot testing and assertions. The output is a readable stand-in for
//! host markup, not a host template grammar.

use std::fmt::Write;

use crate::markup::{Directive, MarkupNode, MarkupTree, NodeId};

const INDENT: &str = "  ";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a markup tree to text, one element per line.
///
/// Leaf nodes are self-closing; nodes with children open and close on their
/// own lines with children indented two spaces. Roots are rendered in order.
/// The final line has no trailing newline.
///
/// # Examples
///
/// ```
/// use bindview::markup::{MarkupNode, MarkupTree, NodeTag};
/// use bindview::testing::render_to_string;
///
/// let mut tree = MarkupTree::new();
/// tree.insert_root(MarkupNode::new("add-todo").with_tag(NodeTag::Button));
/// assert_eq!(render_to_string(&tree), r#"<button id="add-todo" />"#);
/// ```
pub fn render_to_string(tree: &MarkupTree) -> String {
    let mut lines = Vec::new();
    for &root in tree.roots() {
        render_node(tree, root, 0, &mut lines);
    }
    lines.join("\n")
}

/// Render a node's opening attributes: `id` then one group per directive.
pub fn render_attributes(node: &MarkupNode) -> String {
    let mut out = format!("id=\"{}\"", node.name);
    for directive in &node.directives {
        // Writing to a String cannot fail.
        let _ = match directive {
            Directive::Repeat {
                collection,
                item,
                index,
            } => write!(
                out,
                " for=\"{{{{{collection}}}}}\" for-item=\"{item}\" for-index=\"{index}\""
            ),
            Directive::Bind { path } => write!(out, " value=\"{{{{{path}}}}}\""),
            Directive::On { event, handler } => {
                write!(out, " bind:{}=\"{handler}\"", event.event_name())
            }
        };
    }
    out
}

fn render_node(tree: &MarkupTree, id: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let pad = INDENT.repeat(depth);
    let tag = node.tag.name();
    let attributes = render_attributes(node);
    let children = tree.children(id);

    if children.is_empty() {
        lines.push(format!("{pad}<{tag} {attributes} />"));
        return;
    }
    lines.push(format!("{pad}<{tag} {attributes}>"));
    for &child in children {
        render_node(tree, child, depth + 1, lines);
    }
    lines.push(format!("{pad}</{tag}>"));
}

// ===========================================================================
// Tests
// ===========================================================================
