//! Crate-level error type.

use crate::ast::InvariantError;
use crate::parser::ParseError;
use crate::render::RenderError;

/// Errors from parsing, rendering or building queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input did not parse.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The target dialect cannot express the tree.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// A tree was assembled in an impossible shape.
    #[error("Invalid tree: {0}")]
    Invariant(#[from] InvariantError),

    /// No dialect is registered under the name.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
}

/// Result alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
