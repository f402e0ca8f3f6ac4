#![allow(dead_code)]

use oxide_query_core::ast::{Expr, Predicate, Query, Select};
use oxide_query_core::dialect::SqlDialect;
use oxide_query_core::{NodeRef, ParseError, RenderError};

pub fn parse_query(sql: &str) -> Query {
    SqlDialect::ansi()
        .parse_query(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_query_err(sql: &str) -> ParseError {
    SqlDialect::ansi()
        .parse_query(sql)
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> Select {
    match parse_query(sql) {
        Query::Select(s) => *s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_predicate(sql: &str) -> Predicate {
    SqlDialect::ansi()
        .parse_predicate(sql)
        .unwrap_or_else(|e| panic!("Failed to parse predicate: {sql}\nError: {e:?}"))
}

pub fn parse_expr(sql: &str) -> Expr {
    SqlDialect::ansi()
        .parse_expr(sql)
        .unwrap_or_else(|e| panic!("Failed to parse expression: {sql}\nError: {e:?}"))
}

pub fn render_ansi<'a>(node: impl Into<NodeRef<'a>>) -> String {
    SqlDialect::ansi()
        .render(node)
        .unwrap_or_else(|e| panic!("Failed to render: {e}"))
}

pub fn render_err<'a>(dialect: &SqlDialect, node: impl Into<NodeRef<'a>>) -> RenderError {
    dialect
        .render(node)
        .expect_err("Expected render error")
}

/// Reformats `sql` in the standard dialect.
pub fn reformat(sql: &str) -> String {
    render_ansi(&parse_query(sql))
}

/// Verifies that rendering is a fixed point in `dialect`:
/// parse(render(parse(sql))) equals parse(sql), and rendering the re-parsed
/// tree yields the same text again.
pub fn round_trip_in(dialect: &SqlDialect, sql: &str) -> String {
    let ast1 = dialect
        .parse_query(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));
    let rendered1 = dialect
        .render(&ast1)
        .unwrap_or_else(|e| panic!("Failed to render: {sql}\nError: {e}"));
    let ast2 = dialect
        .parse_query(&rendered1)
        .unwrap_or_else(|e| panic!("Failed to re-parse: {rendered1}\nError: {e:?}"));
    assert_eq!(
        ast1, ast2,
        "Round-trip changed the tree.\n  Input:    {sql}\n  Rendered: {rendered1}"
    );
    let rendered2 = dialect
        .render(&ast2)
        .unwrap_or_else(|e| panic!("Failed to render: {rendered1}\nError: {e}"));
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    rendered1
}

pub fn round_trip(sql: &str) -> String {
    round_trip_in(&SqlDialect::ansi(), sql)
}

/// Collapses whitespace so layout differences do not matter.
pub fn normalize(sql: &str) -> String {
    sql.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(" )", ")")
}
