//! SQL lexer.
//!
//! A hand-written scanner turning query text into a flat token vector that
//! always ends with [`TokenKind::Eof`]. Malformed input becomes
//! [`TokenKind::Error`] tokens; the parser refuses them up front.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;

/// Tokenizes `input` in one go.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}
