//! Tests for how AND/OR filters are laid out and grouped.

mod common;
use common::*;

use oxide_query_core::ast::{ComparisonOp, Expr, Predicate};
use oxide_query_core::builder::col;

fn eq(column: &str, value: i64) -> Predicate {
    Predicate::Comparison {
        left: Expr::column(column),
        op: ComparisonOp::Eq,
        right: Expr::integer(value),
    }
}

// ===== flattening =====

#[test]
fn deep_same_connective_prints_flat() {
    let tree = Predicate::Or(vec![
        Predicate::Or(vec![eq("a", 1), Predicate::Or(vec![eq("b", 2), eq("c", 3)])]),
        eq("d", 4),
    ]);
    assert_eq!(render_ansi(&tree), "a = 1\nOR b = 2\nOR c = 3\nOR d = 4");
}

#[test]
fn parser_folds_parenthesized_same_connective() {
    assert_eq!(
        parse_predicate("a = 1 AND (b = 2 AND c = 3)"),
        Predicate::And(vec![eq("a", 1), eq("b", 2), eq("c", 3)])
    );
    assert_eq!(
        render_ansi(&parse_predicate("(a = 1 OR b = 2) OR c = 3")),
        "a = 1\nOR b = 2\nOR c = 3"
    );
}

#[test]
fn single_operand_composite_prints_its_operand() {
    assert_eq!(render_ansi(&Predicate::And(vec![eq("a", 1)])), "a = 1");
    assert_eq!(Predicate::and_all(vec![eq("a", 1)]), eq("a", 1));
}

// ===== nesting =====

#[test]
fn alternating_connectives_nest_blocks() {
    let tree = Predicate::And(vec![
        eq("a", 1),
        Predicate::Or(vec![
            eq("b", 2),
            Predicate::And(vec![eq("c", 3), eq("d", 4)]),
        ]),
    ]);
    assert_eq!(
        render_ansi(&tree),
        "a = 1\n\
         AND (\n\
         \x20 b = 2\n\
         \x20 OR (\n\
         \x20   c = 3\n\
         \x20   AND d = 4\n\
         \x20 )\n\
         )"
    );
}

#[test]
fn block_in_where_clause_round_trips() {
    let rendered = round_trip(
        "SELECT * FROM t WHERE (a = 1 OR b = 2) AND (c = 3 OR d = 4) AND e = 5",
    );
    assert_eq!(
        rendered,
        "SELECT *\n\
         FROM t\n\
         WHERE (\n\
         \x20 a = 1\n\
         \x20 OR b = 2\n\
         )\n\
         AND (\n\
         \x20 c = 3\n\
         \x20 OR d = 4\n\
         )\n\
         AND e = 5"
    );
}

#[test]
fn having_uses_the_same_layout() {
    assert_eq!(
        reformat("SELECT a FROM t GROUP BY a HAVING count(*) > 1 AND (min(b) = 0 OR max(b) = 9)"),
        "SELECT a\n\
         FROM t\n\
         GROUP BY a\n\
         HAVING count(*) > 1\n\
         AND (\n\
         \x20 min(b) = 0\n\
         \x20 OR max(b) = 9\n\
         )"
    );
}

// ===== inline positions =====

#[test]
fn join_condition_stays_on_one_line() {
    assert_eq!(
        reformat("SELECT * FROM a JOIN b ON a.id = b.id AND (a.x = 1 OR b.y = 2)"),
        "SELECT *\nFROM a\nJOIN b ON a.id = b.id AND (a.x = 1 OR b.y = 2)"
    );
}

#[test]
fn case_condition_stays_on_one_line() {
    assert_eq!(
        reformat("SELECT CASE WHEN a = 1 AND (b = 2 OR c = 3) THEN 1 END FROM t"),
        "SELECT CASE WHEN a = 1 AND (b = 2 OR c = 3) THEN 1 END\nFROM t"
    );
}

// ===== negation =====

#[test]
fn not_of_composite_is_a_block() {
    assert_eq!(
        render_ansi(&Predicate::Or(vec![eq("a", 1), eq("b", 2)]).not()),
        "NOT (\n  a = 1\n  OR b = 2\n)"
    );
    assert_eq!(render_ansi(&eq("a", 1).not()), "NOT (a = 1)");
}

#[test]
fn builder_filters_match_parsed_filters() {
    let built = col("a").eq(1).and(col("b").eq(2).or(col("c").eq(3)));
    assert_eq!(built, parse_predicate("a = 1 AND (b = 2 OR c = 3)"));
}
