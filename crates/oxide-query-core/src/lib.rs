//! # oxide-query-core
//!
//! A bidirectional SQL query toolkit: parse query text into a tree, then
//! render the tree back as SQL for any registered dialect.
//!
//! This crate provides:
//! - A hand-written lexer and a table-driven recursive descent parser whose
//!   grammar is a registry of handlers that dialects can override
//! - A typed AST for queries, predicates and scalar expressions
//! - A renderer driven by per-dialect policy: identifier quoting, the
//!   operator lexicon, null ordering and pagination
//! - A typestate builder producing the same trees as the parser
//!
//! ## Reformatting
//!
//! ```rust
//! use oxide_query_core::dialect::SqlDialect;
//!
//! let dialect = SqlDialect::ansi();
//! let query = dialect
//!     .parse_query("select id from users where active and (age > 18 or vip)")
//!     .unwrap();
//! assert_eq!(
//!     dialect.render(&query).unwrap(),
//!     "SELECT id\nFROM users\nWHERE active\nAND (\n  age > 18\n  OR vip\n)"
//! );
//! ```
//!
//! ## Transpiling
//!
//! A dialect is the standard bundle with its policy, parsers or renderers
//! swapped out. Here a `LIMIT` query goes to a dialect that keeps `LIMIT`
//! and to ANSI, which has only `OFFSET ... FETCH`:
//!
//! ```rust
//! use oxide_query_core::dialect::{Dialect, DialectCatalog, PaginationStyle, SqlDialect};
//! use oxide_query_core::transpile;
//!
//! #[derive(Debug)]
//! struct Lite;
//!
//! impl Dialect for Lite {
//!     fn name(&self) -> &'static str {
//!         "lite"
//!     }
//!
//!     fn pagination(&self) -> PaginationStyle {
//!         PaginationStyle::LimitOffset
//!     }
//! }
//!
//! let mut catalog = DialectCatalog::new();
//! catalog.register(SqlDialect::ansi().extend().policy(Lite).build());
//!
//! let sql = "SELECT a FROM t ORDER BY a LIMIT 5";
//! assert_eq!(
//!     transpile(sql, "ansi", "lite", &catalog).unwrap(),
//!     "SELECT a\nFROM t\nORDER BY a\nLIMIT 5"
//! );
//! assert_eq!(
//!     transpile(sql, "ansi", "ansi", &catalog).unwrap(),
//!     "SELECT a\nFROM t\nORDER BY a\nOFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
//! );
//! ```

pub mod ast;
pub mod builder;
pub mod config;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod render;

pub use ast::{Expr, NodeKind, NodeRef, Predicate, Query};
pub use builder::{col, SelectBuilder};
pub use config::{ParserConfig, RenderConfig};
pub use dialect::{Dialect, DialectCatalog, SqlDialect};
pub use error::{Error, Result};
pub use parser::ParseError;
pub use render::RenderError;

/// Parses a query with the standard grammar.
///
/// # Errors
///
/// Returns the first syntax error.
pub fn parse_query(sql: &str) -> Result<Query> {
    Ok(SqlDialect::ansi().parse_query(sql)?)
}

/// Parses a search condition with the standard grammar.
///
/// # Errors
///
/// Returns the first syntax error.
pub fn parse_predicate(sql: &str) -> Result<Predicate> {
    Ok(SqlDialect::ansi().parse_predicate(sql)?)
}

/// Parses a scalar expression with the standard grammar.
///
/// # Errors
///
/// Returns the first syntax error.
pub fn parse_expr(sql: &str) -> Result<Expr> {
    Ok(SqlDialect::ansi().parse_expr(sql)?)
}

/// Renders `node` in `dialect`.
///
/// # Errors
///
/// Returns an error if the dialect cannot express the node.
pub fn render<'a>(node: impl Into<NodeRef<'a>>, dialect: &SqlDialect) -> Result<String> {
    Ok(dialect.render(node)?)
}

/// Parses a query in the `from` dialect and renders it in the `to` dialect.
///
/// # Errors
///
/// Fails if either dialect is unknown, the input does not parse, or the
/// target cannot express the query.
pub fn transpile(sql: &str, from: &str, to: &str, catalog: &DialectCatalog) -> Result<String> {
    let source = catalog.get(from)?;
    let target = catalog.get(to)?;
    let query = source.parse_query(sql)?;
    Ok(target.render(&query)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_helpers() {
        let query = parse_query("SELECT 1").unwrap();
        assert_eq!(render(&query, &SqlDialect::ansi()).unwrap(), "SELECT 1");
        assert!(parse_predicate("a = 1 AND").is_err());
        assert!(matches!(parse_expr("1 +"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_transpile_errors() {
        let catalog = DialectCatalog::new();
        assert_eq!(
            transpile("SELECT 1", "ansi", "nope", &catalog),
            Err(Error::UnknownDialect("nope".into()))
        );
        let err = transpile("SELECT a FROM t LIMIT 1", "ansi", "ansi", &catalog).unwrap_err();
        assert_eq!(
            err,
            Error::Render(RenderError::MissingOrderBy { dialect: "ansi" })
        );
    }
}
