//! Parsed forms: Selector, PathExpression, Segment.

use std::fmt;
use std::str::FromStr;

use super::parser::{parse_path, parse_selector, ParseError};

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Hierarchical address of a markup node.
///
/// `todo-list > delete-todo` is the `delete-todo` node inside the `todo-list`
/// scope. The scope list is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector {
    scopes: Vec<String>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_selector(input)
    }

    pub(crate) fn from_scopes(scopes: Vec<String>) -> Self {
        debug_assert!(!scopes.is_empty(), "selector must have at least one scope");
        Self { scopes }
    }

    /// Scope tokens, outermost first.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Number of scope tokens.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost scope token (the node itself).
    pub fn leaf(&self) -> &str {
        self.scopes.last().map(String::as_str).unwrap_or_default()
    }

    /// The enclosing selector, or `None` for a top-level node.
    pub fn parent(&self) -> Option<Selector> {
        if self.scopes.len() <= 1 {
            return None;
        }
        Some(Self {
            scopes: self.scopes[..self.scopes.len() - 1].to_vec(),
        })
    }

    /// Every prefix of this selector, outermost first, ending with `self`.
    pub fn prefixes(&self) -> impl Iterator<Item = Selector> + '_ {
        (1..=self.scopes.len()).map(|n| Selector {
            scopes: self.scopes[..n].to_vec(),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scopes.join(" > "))
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}

// ---------------------------------------------------------------------------
// PathExpression
// ---------------------------------------------------------------------------

/// One step of a [`PathExpression`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object field access: `.done`.
    Key(String),
    /// Literal sequence index: `[0]`.
    Index(usize),
    /// Index supplied by the active iteration context: `[index]`.
    Placeholder(String),
}

/// A parsed state path such as `todoList[index].done`.
///
/// Always has at least one segment, and the first segment is a [`Segment::Key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parse a path string.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_path(input)
    }

    /// A single-key path, for top-level state fields.
    ///
    /// The name is taken verbatim; no parsing happens.
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Key(name.into())],
        }
    }

    pub(crate) fn from_segments(segments: Vec<Segment>) -> Self {
        debug_assert!(!segments.is_empty(), "path must have at least one segment");
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of placeholder segments (iteration indices the path needs).
    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) if i == 0 => f.write_str(name)?,
                Segment::Key(name) => write!(f, ".{name}")?,
                Segment::Index(n) => write!(f, "[{n}]")?,
                Segment::Placeholder(name) => write!(f, "[{name}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for PathExpression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Selector ─────────────────────────────────────────────────────

    #[test]
    fn selector_accessors() {
        let sel = Selector::parse("todo-list > delete-todo").unwrap();
        assert_eq!(sel.scopes(), &["todo-list", "delete-todo"]);
        assert_eq!(sel.depth(), 2);
        assert_eq!(sel.leaf(), "delete-todo");
    }

    #[test]
    fn selector_parent() {
        let sel = Selector::parse("a > b > c").unwrap();
        assert_eq!(sel.parent().unwrap().to_string(), "a > b");
        assert!(Selector::parse("a").unwrap().parent().is_none());
    }

    #[test]
    fn selector_prefixes() {
        let sel = Selector::parse("a > b > c").unwrap();
        let prefixes: Vec<String> = sel.prefixes().map(|p| p.to_string()).collect();
        assert_eq!(prefixes, vec!["a", "a > b", "a > b > c"]);
    }

    #[test]
    fn selector_display_normalizes_whitespace() {
        let sel: Selector = "todo-list>check-todo".parse().unwrap();
        assert_eq!(sel.to_string(), "todo-list > check-todo");
    }

    #[test]
    fn selector_equality_ignores_spacing() {
        let a = Selector::parse("x > y").unwrap();
        let b = Selector::parse("x>y").unwrap();
        assert_eq!(a, b);
    }

    // ── PathExpression ───────────────────────────────────────────────

    #[test]
    fn path_display_round_trip() {
        for input in ["title", "todoList[index].done", "rows[0].cells[col]", "a.b.c"] {
            let path = PathExpression::parse(input).unwrap();
            assert_eq!(path.to_string(), input);
        }
    }

    #[test]
    fn path_placeholder_count() {
        assert_eq!(PathExpression::parse("a").unwrap().placeholder_count(), 0);
        assert_eq!(PathExpression::parse("a[i].b[j]").unwrap().placeholder_count(), 2);
        assert_eq!(PathExpression::parse("a[0]").unwrap().placeholder_count(), 0);
    }

    #[test]
    fn path_key_constructor() {
        let path = PathExpression::key("title");
        assert_eq!(path.segments(), &[Segment::Key("title".into())]);
        assert_eq!(path, PathExpression::parse("title").unwrap());
    }
}
