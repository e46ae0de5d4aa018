//! Recursive descent parser for selectors and paths.
//!
//! Uses the logos-based tokenizer from [`crate::syntax::tokenizer`]. Parsing
//! happens once, when a component spec is extracted; dispatch only ever sees
//! the parsed forms.

use crate::syntax::model::{PathExpression, Segment, Selector};
use crate::syntax::tokenizer::{tokenize, Spanned, Token};

/// Errors from selector and path parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { offset: usize, found: char },
    #[error("unexpected token at offset {offset}: {message}")]
    UnexpectedToken { offset: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("index `{0}` at offset {1} is out of range")]
    IndexOverflow(String, usize),
}

/// Parse a selector: `Ident ('>' Ident)*`.
pub fn parse_selector(input: &str) -> Result<Selector, ParseError> {
    let mut parser = Parser::new(input)?;
    let mut scopes = vec![parser.expect_ident("a scope name")?];

    while !parser.is_eof() {
        parser.expect(Token::GreaterThan, "`>` between scopes")?;
        scopes.push(parser.expect_ident("a scope name after `>`")?);
    }

    Ok(Selector::from_scopes(scopes))
}

/// Parse a path: `Ident ('.' Ident | '[' (Number | Ident) ']')*`.
pub fn parse_path(input: &str) -> Result<PathExpression, ParseError> {
    let mut parser = Parser::new(input)?;
    let mut segments = vec![Segment::Key(parser.expect_ident("a field name")?)];

    while let Some(tok) = parser.advance() {
        match tok.token {
            Token::Dot => {
                segments.push(Segment::Key(parser.expect_ident("a field name after `.`")?));
            }
            Token::BracketOpen => {
                segments.push(parser.parse_bracket()?);
            }
            _ => return Err(unexpected(&tok, "`.` or `[`")),
        }
    }

    Ok(PathExpression::from_segments(segments))
}

fn unexpected(tok: &Spanned, expected: &str) -> ParseError {
    ParseError::UnexpectedToken {
        offset: tok.offset,
        message: format!("expected {expected}, got {:?} '{}'", tok.token, tok.text),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
}

impl Parser {
    fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(input).map_err(|e| ParseError::UnexpectedChar {
            offset: e.offset,
            found: e.found,
        })?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self { tokens, cursor: 0 })
    }

    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<Spanned> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<Spanned, ParseError> {
        match self.advance() {
            Some(tok) if tok.token == expected => Ok(tok),
            Some(tok) => Err(unexpected(&tok, what)),
            None => Err(ParseError::UnexpectedEof(format!("expected {what}"))),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        self.expect(Token::Ident, what).map(|tok| tok.text)
    }

    /// Parse the inside of `[...]` after the opening bracket was consumed.
    fn parse_bracket(&mut self) -> Result<Segment, ParseError> {
        let segment = match self.advance() {
            Some(tok) if tok.token == Token::Number => {
                let index = tok
                    .text
                    .parse::<usize>()
                    .map_err(|_| ParseError::IndexOverflow(tok.text.clone(), tok.offset))?;
                Segment::Index(index)
            }
            Some(tok) if tok.token == Token::Ident => Segment::Placeholder(tok.text),
            Some(tok) => return Err(unexpected(&tok, "an index or placeholder name")),
            None => {
                return Err(ParseError::UnexpectedEof(
                    "expected an index or placeholder name after `[`".into(),
                ))
            }
        };
        self.expect(Token::BracketClose, "`]`")?;
        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Selectors ────────────────────────────────────────────────────

    #[test]
    fn single_scope_selector() {
        let sel = parse_selector("add-todo").unwrap();
        assert_eq!(sel.scopes(), &["add-todo"]);
    }

    #[test]
    fn nested_selector() {
        let sel = parse_selector("todo-list > check-todo").unwrap();
        assert_eq!(sel.scopes(), &["todo-list", "check-todo"]);
    }

    #[test]
    fn selector_without_spaces() {
        let sel = parse_selector("a>b>c").unwrap();
        assert_eq!(sel.depth(), 3);
    }

    #[test]
    fn selector_empty_is_error() {
        assert_eq!(parse_selector(""), Err(ParseError::Empty));
        assert_eq!(parse_selector("  "), Err(ParseError::Empty));
    }

    #[test]
    fn selector_trailing_combinator_is_error() {
        let err = parse_selector("todo-list >").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn selector_leading_combinator_is_error() {
        let err = parse_selector("> todo").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { offset: 0, .. }));
    }

    #[test]
    fn selector_missing_combinator_is_error() {
        let err = parse_selector("todo-list check-todo").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { offset: 10, .. }));
    }

    #[test]
    fn selector_bad_character_is_error() {
        let err = parse_selector("todo#list").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedChar {
                offset: 4,
                found: '#'
            }
        );
    }

    // ── Paths ────────────────────────────────────────────────────────

    #[test]
    fn single_key_path() {
        let path = parse_path("title").unwrap();
        assert_eq!(path.segments(), &[Segment::Key("title".into())]);
    }

    #[test]
    fn placeholder_path() {
        let path = parse_path("todoList[index].done").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("todoList".into()),
                Segment::Placeholder("index".into()),
                Segment::Key("done".into()),
            ]
        );
    }

    #[test]
    fn literal_index_path() {
        let path = parse_path("todoList[0]").unwrap();
        assert_eq!(
            path.segments(),
            &[Segment::Key("todoList".into()), Segment::Index(0)]
        );
    }

    #[test]
    fn consecutive_brackets() {
        let path = parse_path("grid[row][col]").unwrap();
        assert_eq!(path.placeholder_count(), 2);
    }

    #[test]
    fn path_starting_with_bracket_is_error() {
        assert!(parse_path("[0].a").is_err());
    }

    #[test]
    fn path_unclosed_bracket_is_error() {
        let err = parse_path("todoList[index").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn path_empty_bracket_is_error() {
        let err = parse_path("todoList[]").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn path_trailing_dot_is_error() {
        assert!(matches!(
            parse_path("todoList."),
            Err(ParseError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn path_rejects_combinator() {
        assert!(parse_path("a > b").is_err());
    }

    #[test]
    fn path_index_overflow() {
        let err = parse_path("a[99999999999999999999999]").unwrap_err();
        assert!(matches!(err, ParseError::IndexOverflow(_, 2)));
    }

    #[test]
    fn error_messages_are_readable() {
        let err = parse_selector("a b").unwrap_err();
        assert!(err.to_string().contains("expected `>` between scopes"));
    }
}
