//! Integration tests for the PostgreSQL dialect bundle.

use oxide_query_core::ast::{Distinct, Expr, Query};
use oxide_query_core::dialect::{DialectCatalog, SqlDialect};
use oxide_query_core::{transpile, Error, RenderError};
use oxide_query_postgres::postgres;

fn catalog() -> DialectCatalog {
    let mut catalog = DialectCatalog::new();
    oxide_query_postgres::register(&mut catalog);
    catalog
}

fn reformat(sql: &str) -> String {
    let pg = postgres();
    let query = pg
        .parse_query(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"));
    pg.render(&query)
        .unwrap_or_else(|e| panic!("Failed to render: {sql}\nError: {e}"))
}

/// Checks that rendering is a fixed point and returns the rendered text.
fn round_trip(sql: &str) -> String {
    let pg = postgres();
    let ast1 = pg
        .parse_query(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"));
    let rendered1 = pg.render(&ast1).unwrap();
    let ast2 = pg
        .parse_query(&rendered1)
        .unwrap_or_else(|e| panic!("Failed to re-parse: {rendered1}\nError: {e}"));
    assert_eq!(ast1, ast2, "tree changed; rendered: {rendered1}");
    assert_eq!(rendered1, pg.render(&ast2).unwrap());
    rendered1
}

fn to_ansi(sql: &str) -> Result<String, Error> {
    transpile(sql, "postgres", "ansi", &catalog())
}

// ===== grammar =====

#[test]
fn parses_distinct_on() {
    let Query::Select(select) = postgres()
        .parse_query("SELECT DISTINCT ON (a, b) a, b, c FROM t ORDER BY a, b")
        .unwrap()
    else {
        panic!("expected a SELECT");
    };
    assert_eq!(
        select.distinct,
        Some(Distinct::On(vec![Expr::column("a"), Expr::column("b")]))
    );
}

#[test]
fn standard_grammar_still_applies() {
    let sql = "SELECT a FROM t WHERE a IN (SELECT b FROM u) ORDER BY a OFFSET 1 ROWS";
    assert_eq!(
        postgres().parse_query(sql).unwrap(),
        SqlDialect::ansi().parse_query(sql).unwrap()
    );
}

// ===== rendering =====

#[test]
fn casts_and_arrays() {
    assert_eq!(
        reformat("SELECT a::int, b::varchar(20)[], CAST(c AS text) FROM t"),
        "SELECT a::INTEGER, b::VARCHAR(20)[], CAST(c AS TEXT)\nFROM t"
    );
    assert_eq!(
        reformat("SELECT (a + b)::numeric(10, 2), -c::int FROM t"),
        "SELECT (a + b)::NUMERIC(10, 2), -c::INTEGER\nFROM t"
    );
}

#[test]
fn subscripts_and_slices() {
    assert_eq!(
        reformat("SELECT a[1], a[2:3], a[:3], a[2:], m[i + 1][j] FROM t"),
        "SELECT a[1], a[2:3], a[:3], a[2:], m[i + 1][j]\nFROM t"
    );
}

#[test]
fn vendor_operators() {
    assert_eq!(
        reformat("SELECT * FROM t WHERE tags @> '{a}'::text[] AND a OPERATOR(pg_catalog.=) b"),
        "SELECT *\nFROM t\nWHERE tags @> '{a}'::TEXT[]\nAND a OPERATOR(pg_catalog.=) b"
    );
}

#[test]
fn pattern_matching() {
    assert_eq!(
        reformat("SELECT a FROM t WHERE a ILIKE 'x%' OR a NOT ILIKE 'y%' OR a ~* '^z' OR a !~ 'w'"),
        "SELECT a\nFROM t\nWHERE a ILIKE 'x%'\nOR a NOT ILIKE 'y%'\nOR a ~* '^z'\nOR a !~ 'w'"
    );
}

#[test]
fn native_modulo() {
    assert_eq!(reformat("SELECT a % 2 FROM t"), "SELECT a % 2\nFROM t");
}

#[test]
fn limit_offset_without_order() {
    assert_eq!(
        reformat("SELECT a FROM t OFFSET 5 ROWS FETCH FIRST 10 ROWS ONLY"),
        "SELECT a\nFROM t\nLIMIT 10 OFFSET 5"
    );
    assert_eq!(
        reformat("SELECT a FROM t LIMIT 3"),
        "SELECT a\nFROM t\nLIMIT 3"
    );
}

#[test]
fn row_locks() {
    assert_eq!(
        reformat("SELECT a FROM t FOR NO KEY UPDATE OF t SKIP LOCKED"),
        "SELECT a\nFROM t\nFOR NO KEY UPDATE OF t SKIP LOCKED"
    );
}

#[test]
fn vendor_strings() {
    assert_eq!(
        reformat("SELECT E'a\\tb', $fn$it's$fn$, $$x$$ FROM t"),
        "SELECT E'a\\tb', $fn$it's$fn$, $$x$$\nFROM t"
    );
}

#[test]
fn round_trips() {
    for sql in [
        "SELECT DISTINCT ON (a) a, b FROM t ORDER BY a, b DESC NULLS LAST",
        "SELECT a::int::text, b[1]::int, c[1:2] FROM t WHERE d ~ 'x' AND e !~* 'y'",
        "SELECT a FROM t WHERE tags @> ARRAY_AGG(x) OR tags && other",
        "SELECT a OPERATOR(+) b, a OPERATOR(ops.@@) b || c FROM t",
        "SELECT a FROM t WHERE name NOT ILIKE 'a%' ESCAPE '!' ORDER BY a LIMIT 5 OFFSET 2",
        "SELECT E'it\\'s', $q$body$q$ FROM t FOR KEY SHARE NOWAIT",
        "SELECT count(*) FILTER (WHERE x::int > 0) FROM t GROUP BY a HAVING max(b[1]) > 2",
        "WITH x AS (SELECT a % 3 AS m FROM t) SELECT m FROM x UNION ALL SELECT 1",
    ] {
        round_trip(sql);
    }
}

// ===== transpiling =====

#[test]
fn postgres_to_ansi() {
    assert_eq!(
        to_ansi("SELECT a % 2, b::int[] FROM t ORDER BY a LIMIT 5").unwrap(),
        "SELECT MOD(a, 2), CAST(b AS INTEGER ARRAY)\nFROM t\nORDER BY a\n\
         OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
    );
    assert_eq!(
        to_ansi("SELECT E'a\\nb', $$it's$$").unwrap(),
        "SELECT 'a\nb', 'it''s'"
    );
}

#[test]
fn postgres_only_constructs_fail_in_ansi() {
    let unsupported = |construct: &str| {
        Error::Render(RenderError::UnsupportedConstruct {
            dialect: "ansi",
            construct: construct.into(),
        })
    };
    assert_eq!(
        to_ansi("SELECT a[1:2] FROM t"),
        Err(unsupported("array slices"))
    );
    assert_eq!(
        to_ansi("SELECT a @> b FROM t"),
        Err(unsupported("operator @>"))
    );
    assert_eq!(
        to_ansi("SELECT DISTINCT ON (a) a FROM t"),
        Err(unsupported("DISTINCT ON"))
    );
    assert_eq!(
        to_ansi("SELECT a FROM t FOR NO KEY UPDATE"),
        Err(unsupported("FOR NO KEY UPDATE"))
    );
    assert_eq!(
        to_ansi("SELECT a FROM t WHERE a ~ 'x'"),
        Err(Error::Render(RenderError::UnsupportedOperator {
            dialect: "ansi",
            operator: "~".into(),
        }))
    );
    assert!(matches!(
        to_ansi("SELECT a FROM t LIMIT 1"),
        Err(Error::Render(RenderError::MissingOrderBy { .. }))
    ));
}

#[test]
fn ansi_to_postgres() {
    assert_eq!(
        transpile(
            "SELECT CAST(a AS INTEGER), b || 'x' FROM t ORDER BY a \
             OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY",
            "ansi",
            "postgres",
            &catalog(),
        )
        .unwrap(),
        "SELECT CAST(a AS INTEGER), b || 'x'\nFROM t\nORDER BY a\nLIMIT 10 OFFSET 5"
    );
}

#[test]
fn ansi_rejects_postgres_input() {
    assert!(matches!(
        transpile("SELECT a::int FROM t", "ansi", "postgres", &catalog()),
        Err(Error::Parse(_))
    ));
}
