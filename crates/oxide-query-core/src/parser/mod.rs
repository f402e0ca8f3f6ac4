//! SQL parser.
//!
//! Parsing is table driven: every grammar layer and every concrete construct
//! is a [`ParseHandler`] registered under a [`NodeKind`] in a
//! [`ParserRegistry`]. Layers call each other through the [`ParseContext`],
//! so a dialect changes the grammar by registering a different handler or by
//! editing a category's candidate list.

mod context;
mod cursor;
mod error;
mod expr;
mod lookahead;
mod predicate;
mod query;
mod table;
mod types;

pub use context::{ParseContext, ParseHandler, ParserRegistry};
pub use cursor::{Cursor, Mark};
pub use error::{FatalKind, ParseError, ParseErrorKind};
pub use expr::{LiteralParser, WindowSpecParser};
pub use lookahead::Lookahead;
pub use predicate::LikeParser;
pub use query::{DistinctSpecParser, LockClauseParser};
pub use types::DataTypeParser;

use tracing::debug;

use crate::ast::{Expr, Ident, Node, NodeKind, ObjectName};
use crate::config::ParserConfig;
use crate::lexer::{tokenize, Keyword, TokenKind};

/// Builds the registry of the standard grammar.
#[must_use]
pub fn standard_parsers() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    expr::register(&mut registry);
    predicate::register(&mut registry);
    query::register(&mut registry);
    table::register(&mut registry);
    types::register(&mut registry);
    registry
}

/// Parses `sql` as a `kind` node and unwraps it as `T`.
///
/// A trailing semicolon is allowed; anything else after the node is an
/// error.
///
/// # Errors
///
/// Returns a fatal lexical error if the tokenizer rejected part of the
/// input, otherwise the first syntax error encountered.
pub fn parse<T>(
    registry: &ParserRegistry,
    kind: NodeKind,
    sql: &str,
    config: &ParserConfig,
) -> Result<T, ParseError>
where
    T: TryFrom<Node, Error = Node>,
{
    let tokens = tokenize(sql);
    if let Some((message, span)) = tokens.iter().find_map(|t| match &t.kind {
        TokenKind::Error(message) => Some((message, t.span)),
        _ => None,
    }) {
        return Err(ParseError::fatal(FatalKind::Lexical, message.clone(), span));
    }
    debug!(?kind, tokens = tokens.len(), "parsing");

    let mut cur = Cursor::new(&tokens);
    let mut ctx = ParseContext::new(registry, config);
    let value = ctx.parse::<T>(kind, &mut cur)?;
    cur.consume_if(&TokenKind::Semicolon);
    expect_exhausted(&cur)?;
    Ok(value)
}

/// Fails unless every visible token has been consumed.
///
/// # Errors
///
/// Returns an "unexpected token" error at the first leftover token.
pub fn expect_exhausted(cur: &Cursor<'_>) -> Result<(), ParseError> {
    if cur.is_at_end() {
        Ok(())
    } else {
        Err(ParseError::unexpected("end of input", cur.current()))
    }
}

/// Parses `item (, item)*`.
///
/// # Errors
///
/// Propagates the first item error.
pub fn comma_list<T>(
    cur: &mut Cursor<'_>,
    mut item: impl FnMut(&mut Cursor<'_>) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    let mut items = vec![item(cur)?];
    while cur.consume_if(&TokenKind::Comma) {
        items.push(item(cur)?);
    }
    Ok(items)
}

/// Parses a parenthesized identifier list such as `(a, b)`.
///
/// # Errors
///
/// Returns an error on a malformed list.
pub fn ident_list(cur: &mut Cursor<'_>) -> Result<Vec<Ident>, ParseError> {
    cur.expect_left_paren()?;
    let idents = comma_list(cur, |cur| cur.expect_ident())?;
    cur.expect_right_paren()?;
    Ok(idents)
}

/// Parses a dotted name such as `schema.table`.
///
/// # Errors
///
/// Returns an error if a part is not an identifier.
pub fn object_name(cur: &mut Cursor<'_>) -> Result<ObjectName, ParseError> {
    let mut parts = vec![cur.expect_ident()?];
    while cur.check(&TokenKind::Dot) && cur.peek(1).is_identifier_like() {
        cur.advance();
        parts.push(cur.expect_ident()?);
    }
    Ok(ObjectName::new(parts))
}

/// Parses an optional alias: `AS name`, or a bare identifier token.
///
/// Keywords never act as implicit aliases, so `FROM t WHERE` and
/// `SELECT a FROM` stop where they should.
///
/// # Errors
///
/// Returns an error if `AS` is not followed by an identifier.
pub fn alias(cur: &mut Cursor<'_>) -> Result<Option<Ident>, ParseError> {
    if cur.consume_keyword(Keyword::As) {
        return cur.expect_ident().map(Some);
    }
    match cur.peek_kind(0) {
        TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => cur.expect_ident().map(Some),
        _ => Ok(None),
    }
}

/// Unwraps the left operand handed to an infix handler.
///
/// # Errors
///
/// Fails fatally if the operand is not an expression.
pub fn expr_operand(node: Node, cur: &Cursor<'_>) -> Result<Expr, ParseError> {
    Expr::try_from(node).map_err(|node| {
        ParseError::fatal(
            FatalKind::NodeMismatch,
            format!("expected an expression operand, got a {}", node.family()),
            cur.current().span,
        )
    })
}

/// Parses an unsigned count such as a LIMIT value or type modifier.
///
/// # Errors
///
/// Returns an error if the current token is not a non-negative integer
/// that fits in a `u32`.
pub fn unsigned(cur: &mut Cursor<'_>, what: &str) -> Result<u32, ParseError> {
    let token = cur.current().clone();
    let TokenKind::Integer(value) = token.kind else {
        return Err(ParseError::unexpected(what, &token));
    };
    let value = u32::try_from(value)
        .map_err(|_| ParseError::new(format!("{what} {value} is out of range"), token.span))?;
    cur.advance();
    Ok(value)
}
