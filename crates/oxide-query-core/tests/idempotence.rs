//! Property test: rendering a parsed query is a fixed point.

use std::fmt::Write as _;

use oxide_query_core::dialect::SqlDialect;
use oxide_query_core::lexer::Keyword;
use proptest::prelude::*;

fn arb_ident() -> BoxedStrategy<String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,5}")
        .expect("valid regex")
        .prop_filter("must not be a keyword", |s| Keyword::from_str(s).is_none())
        .boxed()
}

fn arb_literal() -> BoxedStrategy<String> {
    prop_oneof![
        (0i64..100_000).prop_map(|n| n.to_string()),
        (1i32..1000).prop_map(|n| format!("{n}.{}", n % 100)),
        arb_ident().prop_map(|s| format!("'{s}'")),
        arb_ident().prop_map(|s| format!("'{s}''s'")),
        Just("NULL".to_string()),
        Just("TRUE".to_string()),
        Just("FALSE".to_string()),
    ]
    .boxed()
}

fn arb_expr(depth: u32) -> BoxedStrategy<String> {
    let leaf = prop_oneof![
        arb_literal(),
        arb_ident(),
        (arb_ident(), arb_ident()).prop_map(|(t, c)| format!("{t}.{c}")),
    ];
    if depth == 0 {
        return leaf.boxed();
    }
    prop_oneof![
        4 => leaf,
        3 => (
            arb_expr(depth - 1),
            prop_oneof![Just("+"), Just("-"), Just("*"), Just("/"), Just("||")],
            arb_expr(depth - 1),
        )
            .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
        1 => arb_expr(depth - 1).prop_map(|e| format!("({e})")),
        1 => arb_expr(depth - 1).prop_map(|e| format!("-{e}")),
        1 => arb_expr(depth - 1).prop_map(|e| format!("CAST({e} AS VARCHAR(20))")),
        1 => (arb_ident(), proptest::collection::vec(arb_expr(0), 0..3))
            .prop_map(|(name, args)| format!("{name}({})", args.join(", "))),
        1 => (arb_condition(), arb_expr(0), arb_expr(0))
            .prop_map(|(c, t, e)| format!("CASE WHEN {c} THEN {t} ELSE {e} END")),
        1 => (arb_expr(0), arb_ident())
            .prop_map(|(e, t)| format!("(SELECT {e} FROM {t})")),
    ]
    .boxed()
}

/// A comparison between leaves.
fn arb_condition() -> BoxedStrategy<String> {
    (arb_expr(0), prop_oneof![Just("="), Just("<>"), Just(">")], arb_expr(0))
        .prop_map(|(l, op, r)| format!("{l} {op} {r}"))
        .boxed()
}

fn arb_predicate(depth: u32) -> BoxedStrategy<String> {
    let atom = prop_oneof![
        (
            arb_expr(1),
            prop_oneof![Just("="), Just("<>"), Just("<"), Just("<="), Just(">"), Just(">=")],
            arb_expr(1),
        )
            .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
        arb_expr(1).prop_map(|e| format!("{e} IS NULL")),
        arb_expr(1).prop_map(|e| format!("{e} IS NOT NULL")),
        (arb_expr(1), arb_expr(0), arb_expr(0))
            .prop_map(|(e, lo, hi)| format!("{e} BETWEEN {lo} AND {hi}")),
        (arb_expr(1), proptest::collection::vec(arb_expr(0), 1..4))
            .prop_map(|(e, items)| format!("{e} IN ({})", items.join(", "))),
        (arb_expr(1), arb_ident()).prop_map(|(e, p)| format!("{e} NOT LIKE '{p}%'")),
        (arb_ident(), arb_ident())
            .prop_map(|(c, t)| format!("EXISTS (SELECT {c} FROM {t})")),
    ];
    if depth == 0 {
        return atom.boxed();
    }
    prop_oneof![
        3 => atom,
        2 => (
            arb_predicate(depth - 1),
            prop_oneof![Just("AND"), Just("OR")],
            arb_predicate(depth - 1),
        )
            .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
        2 => (
            arb_predicate(depth - 1),
            prop_oneof![Just("AND"), Just("OR")],
            arb_predicate(depth - 1),
        )
            .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
        1 => arb_predicate(depth - 1).prop_map(|p| format!("NOT ({p})")),
    ]
    .boxed()
}

fn arb_select() -> BoxedStrategy<String> {
    let cols = proptest::collection::vec(arb_expr(2), 1..4).prop_map(|cols| cols.join(", "));
    let where_clause = prop::option::of(arb_predicate(2));
    let group = prop::option::of((arb_ident(), prop::option::of(arb_predicate(1))));
    let order_by = prop::option::of((
        arb_ident(),
        prop_oneof![Just(""), Just(" ASC"), Just(" DESC NULLS LAST")],
    ));
    let page = prop::option::of((0u32..50, 1u32..100));

    (cols, arb_ident(), where_clause, group, order_by, page)
        .prop_map(|(cols, table, wh, group, order, page)| {
            let mut sql = format!("SELECT {cols} FROM {table}");
            if let Some(w) = wh {
                write!(sql, " WHERE {w}").expect("writing to String should not fail");
            }
            if let Some((g, having)) = group {
                write!(sql, " GROUP BY {g}").expect("writing to String should not fail");
                if let Some(h) = having {
                    write!(sql, " HAVING {h}").expect("writing to String should not fail");
                }
            }
            if let Some((o, direction)) = order {
                write!(sql, " ORDER BY {o}{direction}").expect("writing to String should not fail");
                if let Some((offset, fetch)) = page {
                    write!(sql, " OFFSET {offset} ROWS FETCH NEXT {fetch} ROWS ONLY")
                        .expect("writing to String should not fail");
                }
            }
            sql
        })
        .boxed()
}

fn arb_query() -> BoxedStrategy<String> {
    prop_oneof![
        6 => arb_select(),
        1 => (
            arb_select(),
            prop_oneof![Just("UNION"), Just("UNION ALL"), Just("EXCEPT")],
            arb_select(),
        )
            .prop_map(|(l, op, r)| format!("({l}) {op} ({r})")),
        1 => (arb_ident(), arb_select())
            .prop_map(|(name, body)| format!("WITH {name} AS ({body}) SELECT * FROM {name}")),
    ]
    .boxed()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn rendering_is_a_fixed_point(sql in arb_query()) {
        let dialect = SqlDialect::ansi();
        // Generated text may be outside the grammar; only accepted input is checked.
        let Ok(ast1) = dialect.parse_query(&sql) else {
            return Ok(());
        };
        let rendered1 = dialect.render(&ast1);
        prop_assert!(rendered1.is_ok(), "render failed for {}: {:?}", sql, rendered1);
        let rendered1 = rendered1.unwrap_or_default();

        let ast2 = dialect.parse_query(&rendered1);
        prop_assert!(ast2.is_ok(), "re-parse failed for {:?}: {:?}", rendered1, ast2);
        let ast2 = ast2.unwrap_or_else(|_| ast1.clone());
        prop_assert_eq!(&ast1, &ast2, "tree changed:\n  input: {}\n  rendered: {}", sql, rendered1);

        let rendered2 = dialect.render(&ast2).unwrap_or_default();
        prop_assert_eq!(rendered1, rendered2);
    }
}
