//! Tests for the rendered layout of whole queries.

mod common;
use common::*;

use oxide_query_core::ast::{Expr, Predicate, Query, SelectItem};
use oxide_query_core::dialect::DialectCatalog;
use oxide_query_core::{transpile, Error, RenderError};

// ===== clause layout =====

#[test]
fn layout_report_query() {
    assert_eq!(
        reformat(
            "SELECT c.name, COUNT(o.id) AS order_count, SUM(o.total) AS revenue \
             FROM customers c \
             LEFT JOIN orders o ON c.id = o.customer_id \
             WHERE c.active = 1 \
             GROUP BY c.name \
             HAVING COUNT(o.id) > 0 \
             ORDER BY revenue DESC \
             OFFSET 0 ROWS FETCH NEXT 100 ROWS ONLY"
        ),
        "SELECT c.name, COUNT(o.id) AS order_count, SUM(o.total) AS revenue\n\
         FROM customers AS c\n\
         LEFT JOIN orders AS o ON c.id = o.customer_id\n\
         WHERE c.active = 1\n\
         GROUP BY c.name\n\
         HAVING COUNT(o.id) > 0\n\
         ORDER BY revenue DESC\n\
         OFFSET 0 ROWS FETCH NEXT 100 ROWS ONLY"
    );
}

#[test]
fn layout_subquery_in_value_position_is_inline() {
    assert_eq!(
        reformat("SELECT a FROM t WHERE a IN (SELECT b FROM u WHERE c = 1 AND d = 2)"),
        "SELECT a\nFROM t\nWHERE a IN (SELECT b FROM u WHERE c = 1 AND d = 2)"
    );
    assert_eq!(
        reformat("SELECT (SELECT max(x) FROM u) AS m FROM t"),
        "SELECT (SELECT max(x) FROM u) AS m\nFROM t"
    );
}

#[test]
fn layout_nested_derived_table_indents() {
    assert_eq!(
        reformat(
            "SELECT * FROM (SELECT a FROM (SELECT a FROM t WHERE a > 1 OR a < -1) AS i) AS o"
        ),
        "SELECT *\n\
         FROM (\n\
         \x20 SELECT a\n\
         \x20 FROM (\n\
         \x20   SELECT a\n\
         \x20   FROM t\n\
         \x20   WHERE a > 1\n\
         \x20   OR a < -1\n\
         \x20 ) AS i\n\
         ) AS o"
    );
}

#[test]
fn layout_reserved_and_odd_identifiers_are_quoted() {
    assert_eq!(
        reformat("SELECT \"order\", \"Mixed Case\", plain FROM \"select\""),
        "SELECT \"order\", \"Mixed Case\", plain\nFROM \"select\""
    );
}

#[test]
fn layout_programmatic_tree() {
    let mut select = oxide_query_core::ast::Select::new(vec![SelectItem::Wildcard]);
    select.from.push(oxide_query_core::ast::TableRef::table("t"));
    select.where_clause = Some(Predicate::and_all(vec![
        Predicate::IsNull {
            expr: Expr::column("a"),
            negated: true,
        },
        Predicate::Or(vec![
            Predicate::IsNull {
                expr: Expr::column("b"),
                negated: false,
            },
            Predicate::Not(Box::new(Predicate::Truth {
                expr: Expr::column("c"),
                test: None,
            })),
        ]),
    ]));
    let query = Query::from(select);
    assert_eq!(
        render_ansi(&query),
        "SELECT *\nFROM t\nWHERE a IS NOT NULL\nAND (\n  b IS NULL\n  OR NOT (c)\n)"
    );
}

// ===== round trips =====

#[test]
fn round_trip_clause_mix() {
    for sql in [
        "SELECT DISTINCT a, b FROM t WHERE a BETWEEN 1 AND 2 ORDER BY a DESC NULLS LAST",
        "SELECT a FROM t WHERE (a = 1 OR b = 2) AND NOT (c = 3 OR d = 4)",
        "SELECT count(*) FILTER (WHERE x > 0) FROM t GROUP BY ROLLUP (a, b)",
        "SELECT * FROM a CROSS JOIN b NATURAL LEFT JOIN c",
        "WITH x AS (SELECT 1 AS n) SELECT n FROM x",
        "SELECT a FROM t UNION SELECT a FROM u INTERSECT SELECT a FROM v",
        "SELECT CASE WHEN a > 0 THEN 'pos' WHEN a < 0 THEN 'neg' ELSE 'zero' END FROM t",
        "SELECT CAST(a AS VARCHAR(10)), a || b, -(-a) FROM t",
        "SELECT a FROM t WHERE b LIKE 'x%' AND c IN (1, 2) AND d IS NOT DISTINCT FROM e",
        "SELECT * FROM (VALUES (1, 'a'), (2, 'b')) AS v (n, s) ORDER BY n OFFSET 1 ROWS",
    ] {
        round_trip(sql);
    }
}

#[test]
fn round_trip_is_insensitive_to_input_layout() {
    let compact = round_trip("select a from t where a=1 and(b=2 or c=3)");
    let spread = round_trip(
        "SELECT a\n   FROM t\n  WHERE a = 1\n    AND (   b = 2\n      OR c = 3 )",
    );
    assert_eq!(compact, spread);
    assert_eq!(
        normalize(&compact),
        "SELECT a FROM t WHERE a = 1 AND (b = 2 OR c = 3)"
    );
}

// ===== transpiling =====

#[test]
fn transpile_between_catalog_entries() {
    let catalog = DialectCatalog::new();
    assert_eq!(
        transpile("SELECT a % 2 FROM t", "ANSI", "ansi", &catalog).unwrap(),
        "SELECT MOD(a, 2)\nFROM t"
    );
    assert!(matches!(
        transpile("SELECT a FROM t OFFSET 5", "ansi", "ansi", &catalog),
        Err(Error::Render(RenderError::MissingOrderBy { .. }))
    ));
    assert!(matches!(
        transpile("SELECT", "ansi", "ansi", &catalog),
        Err(Error::Parse(_))
    ));
}
