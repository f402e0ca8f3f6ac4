//! Tests for rendering under custom dialect policies.

mod common;
use common::*;

use oxide_query_core::ast::{Expr, Ident, NullOrdering, OrderDirection, Predicate};
use oxide_query_core::dialect::{
    standard_operator, Dialect, DialectCatalog, Operator, PaginationStyle, SqlDialect,
};
use oxide_query_core::{transpile, Error, RenderConfig, RenderError};

/// Paginates with `SELECT TOP n`, sorts NULLs low and cannot write
/// `NULLS FIRST|LAST`.
#[derive(Debug)]
struct TopDialect;

impl Dialect for TopDialect {
    fn name(&self) -> &'static str {
        "top"
    }

    fn supports_nulls_ordering(&self) -> bool {
        false
    }

    fn default_nulls(&self, direction: OrderDirection) -> NullOrdering {
        match direction {
            OrderDirection::Asc => NullOrdering::First,
            OrderDirection::Desc => NullOrdering::Last,
        }
    }

    fn pagination(&self) -> PaginationStyle {
        PaginationStyle::Top
    }
}

/// Backtick quoting, `LIMIT`/`OFFSET`, `%` and `ILIKE`.
#[derive(Debug)]
struct BacktickDialect;

impl Dialect for BacktickDialect {
    fn name(&self) -> &'static str {
        "backtick"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn operator(&self, op: Operator) -> Option<&'static str> {
        match op {
            Operator::Mod => Some("%"),
            Operator::ILike => Some("ILIKE"),
            Operator::NotILike => Some("NOT ILIKE"),
            other => standard_operator(other),
        }
    }

    fn pagination(&self) -> PaginationStyle {
        PaginationStyle::LimitOffset
    }
}

/// No pagination at all.
#[derive(Debug)]
struct BareDialect;

impl Dialect for BareDialect {
    fn name(&self) -> &'static str {
        "bare"
    }

    fn pagination(&self) -> PaginationStyle {
        PaginationStyle::None
    }
}

fn top() -> SqlDialect {
    SqlDialect::ansi().extend().policy(TopDialect).build()
}

fn backtick() -> SqlDialect {
    SqlDialect::ansi().extend().policy(BacktickDialect).build()
}

fn render_in(dialect: &SqlDialect, sql: &str) -> String {
    dialect
        .render(&parse_query(sql))
        .unwrap_or_else(|e| panic!("Failed to render: {sql}\nError: {e}"))
}

// ===== pagination =====

#[test]
fn top_dialect_writes_limit_in_head() {
    let sql = "SELECT DISTINCT a FROM t ORDER BY a FETCH FIRST 5 ROWS ONLY";
    assert_eq!(
        render_in(&top(), sql),
        "SELECT DISTINCT TOP 5 a\nFROM t\nORDER BY a"
    );
}

#[test]
fn top_dialect_rejects_offsets() {
    let query = parse_query("SELECT a FROM t ORDER BY a OFFSET 10 ROWS");
    let err = render_err(&top(), &query);
    assert_eq!(
        err,
        RenderError::UnsupportedPagination {
            dialect: "top",
            what: "OFFSET together with TOP",
        }
    );
    let err = render_err(
        &top(),
        &parse_query("SELECT a FROM t UNION SELECT a FROM u ORDER BY 1 FETCH FIRST 3 ROWS ONLY"),
    );
    assert_eq!(
        err,
        RenderError::UnsupportedPagination {
            dialect: "top",
            what: "a set operation with TOP",
        }
    );
}

#[test]
fn limit_offset_dialect_needs_no_order() {
    let sql = "SELECT a FROM t OFFSET 4 ROWS FETCH NEXT 2 ROWS ONLY";
    assert_eq!(
        render_in(&backtick(), sql),
        "SELECT a\nFROM t\nLIMIT 2 OFFSET 4"
    );
    assert_eq!(
        render_in(&backtick(), "SELECT a FROM t OFFSET 4 ROWS"),
        "SELECT a\nFROM t\nOFFSET 4"
    );
}

#[test]
fn dialect_without_pagination_fails() {
    let bare = SqlDialect::ansi().extend().policy(BareDialect).build();
    assert_eq!(
        render_in(&bare, "SELECT a FROM t ORDER BY a"),
        "SELECT a\nFROM t\nORDER BY a"
    );
    let query = parse_query("SELECT a FROM t ORDER BY a FETCH FIRST 1 ROW ONLY");
    let err = render_err(&bare, &query);
    assert_eq!(
        err,
        RenderError::UnsupportedPagination {
            dialect: "bare",
            what: "LIMIT or OFFSET",
        }
    );
}

// ===== null ordering =====

#[test]
fn redundant_null_ordering_is_dropped() {
    let sql = "SELECT a FROM t ORDER BY a NULLS FIRST, b DESC NULLS LAST";
    assert_eq!(
        render_in(&top(), sql),
        "SELECT a\nFROM t\nORDER BY a, b DESC"
    );
}

#[test]
fn non_default_null_ordering_is_emulated() {
    let sql = "SELECT a FROM t ORDER BY a NULLS LAST, b DESC NULLS FIRST";
    assert_eq!(
        render_in(&top(), sql),
        "SELECT a\n\
         FROM t\n\
         ORDER BY CASE WHEN a IS NULL THEN 1 ELSE 0 END, a, \
         CASE WHEN b IS NULL THEN 0 ELSE 1 END, b DESC"
    );
}

#[test]
fn native_null_ordering_is_kept() {
    assert_eq!(
        reformat("SELECT a FROM t ORDER BY a ASC NULLS FIRST"),
        "SELECT a\nFROM t\nORDER BY a ASC NULLS FIRST"
    );
}

// ===== quoting and operators =====

#[test]
fn backtick_quoting() {
    let sql = "SELECT \"select\", \"Mixed Case\", plain FROM \"a`b\"";
    assert_eq!(
        render_in(&backtick(), sql),
        "SELECT `select`, `Mixed Case`, plain\nFROM `a``b`"
    );
    assert_eq!(
        BacktickDialect.quote_identifier(&Ident::new("order")),
        "`order`"
    );
}

#[test]
fn operator_lexicon_decides_spelling() {
    assert_eq!(
        render_in(&backtick(), "SELECT a % 2 FROM t"),
        "SELECT a % 2\nFROM t"
    );
    assert_eq!(reformat("SELECT a % 2 FROM t"), "SELECT MOD(a, 2)\nFROM t");

    let ilike = Predicate::Like {
        expr: Expr::column("name"),
        pattern: Expr::string("a%"),
        escape: None,
        negated: true,
        case_insensitive: true,
    };
    assert_eq!(backtick().render(&ilike).unwrap(), "name NOT ILIKE 'a%'");
    assert_eq!(
        render_err(&SqlDialect::ansi(), &ilike),
        RenderError::UnsupportedOperator {
            dialect: "ansi",
            operator: "NOT ILIKE".into(),
        }
    );
}

// ===== render settings =====

#[test]
fn indent_width_and_keyword_case() {
    let dialect = SqlDialect::ansi().with_render_config(
        RenderConfig::default()
            .with_indent_width(4)
            .with_uppercase_keywords(false),
    );
    assert_eq!(
        dialect
            .render(&parse_query("SELECT a FROM (SELECT a FROM t) AS s WHERE a = 1 OR a = 2"))
            .unwrap(),
        "select a\nfrom (\n    select a\n    from t\n) as s\nwhere a = 1\nor a = 2"
    );
}

// ===== catalog =====

#[test]
fn catalog_transpiles_into_custom_dialects() {
    let mut catalog = DialectCatalog::new();
    assert!(catalog.register(top()).is_none());
    assert!(catalog.register(backtick()).is_none());
    assert_eq!(
        catalog.names().collect::<Vec<_>>(),
        ["ansi", "backtick", "top"]
    );

    let sql = "SELECT a FROM t ORDER BY a LIMIT 3";
    assert_eq!(
        transpile(sql, "ansi", "Top", &catalog).unwrap(),
        "SELECT TOP 3 a\nFROM t\nORDER BY a"
    );
    assert_eq!(
        transpile("SELECT a FROM t LIMIT 3 OFFSET 1", "ansi", "top", &catalog),
        Err(Error::Render(RenderError::UnsupportedPagination {
            dialect: "top",
            what: "OFFSET together with TOP",
        }))
    );
}
