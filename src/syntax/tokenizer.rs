//! logos-based tokenizer for selector and path strings.
//!
//! Both grammars share one token set:
//! - selectors: `todo-list > check-todo`
//! - paths: `todoList[index].done`, `rows[0].cells`
//!
//! Identifiers may contain `-` so that selector scope names lex as one token.
//! A leading digit always lexes as [`Token::Number`].

use logos::Logos;

/// Token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Unsigned integer literal, used for literal indices: `[0]`.
    #[regex(r"[0-9]+")]
    Number,

    /// Identifier: scope names, field names, placeholder names.
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$-]*")]
    Ident,

    /// `.`
    #[token(".")]
    Dot,

    /// `[`
    #[token("[")]
    BracketOpen,

    /// `]`
    #[token("]")]
    BracketClose,

    /// `>`
    #[token(">")]
    GreaterThan,
}

/// A token with its source text and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub text: String,
    pub offset: usize,
}

/// A character the lexer could not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub found: char,
}

/// Tokenize `input`, stopping at the first unlexable character.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, LexError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => tokens.push(Spanned {
                token,
                text: input[span.clone()].to_string(),
                offset: span.start,
            }),
            Err(()) => {
                let found = input[span.start..].chars().next().unwrap_or('\0');
                return Err(LexError {
                    offset: span.start,
                    found,
                });
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            tokens(". [ ] >"),
            vec![
                Token::Dot,
                Token::BracketOpen,
                Token::BracketClose,
                Token::GreaterThan,
            ]
        );
    }

    #[test]
    fn test_hyphenated_ident_is_one_token() {
        assert_eq!(texts("todo-list"), vec!["todo-list"]);
        assert_eq!(tokens("todo-list"), vec![Token::Ident]);
    }

    #[test]
    fn test_selector_tokens() {
        assert_eq!(
            tokens("todo-list > check-todo"),
            vec![Token::Ident, Token::GreaterThan, Token::Ident]
        );
    }

    #[test]
    fn test_path_tokens() {
        assert_eq!(
            tokens("todoList[index].done"),
            vec![
                Token::Ident,
                Token::BracketOpen,
                Token::Ident,
                Token::BracketClose,
                Token::Dot,
                Token::Ident,
            ]
        );
    }

    #[test]
    fn test_number_vs_ident() {
        assert_eq!(tokens("[12]")[1], Token::Number);
        assert_eq!(tokens("[i2]")[1], Token::Ident);
    }

    #[test]
    fn test_offsets() {
        let spanned = tokenize("a > b").unwrap();
        assert_eq!(spanned[0].offset, 0);
        assert_eq!(spanned[1].offset, 2);
        assert_eq!(spanned[2].offset, 4);
    }

    #[test]
    fn test_unlexable_character() {
        let err = tokenize("todo?list").unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.found, '?');
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }
}
