//! Parser error types.

use crate::ast::InvariantError;
use crate::lexer::{Span, Token, TokenKind};

/// Errors that abort parsing outright instead of letting a speculative
/// attempt fall back to the next alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FatalKind {
    /// The tokenizer rejected part of the input.
    Lexical,
    /// Nesting went deeper than the configured maximum.
    RecursionLimit,
    /// No handler is registered for a requested node kind.
    MissingHandler,
    /// A handler produced a node of the wrong family.
    NodeMismatch,
}

/// Whether an error may be recovered from by backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseErrorKind {
    /// Ordinary syntax error; speculative parses restore and move on.
    Syntax,
    /// Unrecoverable error; always propagated.
    Fatal(FatalKind),
}

/// A parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {span}")]
pub struct ParseError {
    /// Recoverable or fatal.
    pub kind: ParseErrorKind,
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates a new syntax error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::Syntax,
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" error, or an "unexpected end of input"
    /// error when `found` is the end marker.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        let expected: String = expected.into();
        if found.is_eof() {
            return Self::unexpected_eof(expected, found.span);
        }
        Self {
            kind: ParseErrorKind::Syntax,
            message: format!("Unexpected token: expected {expected}, found {}", found.kind),
            span: found.span,
            expected: Some(expected),
            found: Some(found.kind.clone()),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected: String = expected.into();
        Self {
            kind: ParseErrorKind::Syntax,
            message: format!("Unexpected end of input: expected {expected}"),
            span,
            expected: Some(expected),
            found: Some(TokenKind::Eof),
        }
    }

    /// Creates an unrecoverable error.
    #[must_use]
    pub fn fatal(kind: FatalKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::Fatal(kind),
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Positions a tree invariant violation found while parsing.
    #[must_use]
    pub fn invariant(err: &InvariantError, span: Span) -> Self {
        Self::new(err.to_string(), span)
    }

    /// Returns true if backtracking must not swallow this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Fatal(_))
    }
}
