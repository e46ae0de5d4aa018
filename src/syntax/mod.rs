//! Selector and path syntax: tokenizer, parser, parsed model.

pub mod model;
pub mod parser;
pub mod tokenizer;

pub use model::{PathExpression, Segment, Selector};
pub use parser::{parse_path, parse_selector, ParseError};
