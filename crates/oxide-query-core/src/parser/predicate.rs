//! Predicate grammar.
//!
//! A predicate first bounds itself: it scans for the first clause keyword or
//! unmatched closer outside brackets and parses only the tokens before it.
//! Within that extent OR and AND split the tokens at their top-level
//! occurrences, skipping the `AND` that closes a `BETWEEN` on the same
//! bracket level, and every slice must be consumed completely.

use std::sync::Arc;

use crate::ast::{
    ComparisonOp, Expr, Node, NodeKind, Predicate, Quantifier, Query, TruthTest, TruthValue,
    ValueSet,
};
use crate::lexer::{Keyword, TokenKind};

use super::{
    comma_list, expr_operand, Cursor, ParseContext, ParseError, ParseHandler, ParserRegistry,
};

pub(super) fn register(registry: &mut ParserRegistry) {
    registry.register(NodeKind::Predicate, Arc::new(PredicateParser));
    registry.register(
        NodeKind::OrPredicate,
        Arc::new(ConnectiveLayer {
            keyword: Keyword::Or,
            operand: NodeKind::AndPredicate,
        }),
    );
    registry.register(
        NodeKind::AndPredicate,
        Arc::new(ConnectiveLayer {
            keyword: Keyword::And,
            operand: NodeKind::AtomicPredicate,
        }),
    );
    registry.register(NodeKind::AtomicPredicate, Arc::new(AtomicPredicateParser));
    registry.register(NodeKind::GroupedPredicate, Arc::new(GroupedPredicateParser));
    registry.register(NodeKind::Exists, Arc::new(ExistsParser));
    registry.register(NodeKind::Not, Arc::new(NotParser));
    registry.register(
        NodeKind::ExpressionPredicate,
        Arc::new(ExpressionPredicateParser),
    );

    registry.register(NodeKind::Comparison, Arc::new(ComparisonParser));
    registry.register(NodeKind::Between, Arc::new(BetweenParser));
    registry.register(NodeKind::In, Arc::new(InParser));
    registry.register(NodeKind::Like, Arc::new(LikeParser::STANDARD));
    registry.register(NodeKind::Is, Arc::new(IsParser));
    registry.register(NodeKind::ValueSet, Arc::new(ValueSetParser));

    registry.set_candidates(
        NodeKind::AtomicPredicate,
        vec![
            NodeKind::GroupedPredicate,
            NodeKind::Exists,
            NodeKind::Not,
            NodeKind::ExpressionPredicate,
        ],
    );
    registry.set_candidates(
        NodeKind::PredicateTail,
        vec![
            NodeKind::Comparison,
            NodeKind::Between,
            NodeKind::In,
            NodeKind::Like,
            NodeKind::Is,
        ],
    );
}

/// Keywords that end a predicate when found outside brackets.
const TERMINATORS: &[TokenKind] = &[
    TokenKind::Keyword(Keyword::Where),
    TokenKind::Keyword(Keyword::Group),
    TokenKind::Keyword(Keyword::Having),
    TokenKind::Keyword(Keyword::Window),
    TokenKind::Keyword(Keyword::Order),
    TokenKind::Keyword(Keyword::Limit),
    TokenKind::Keyword(Keyword::Offset),
    TokenKind::Keyword(Keyword::Fetch),
    TokenKind::Keyword(Keyword::For),
    TokenKind::Keyword(Keyword::Union),
    TokenKind::Keyword(Keyword::Intersect),
    TokenKind::Keyword(Keyword::Except),
    TokenKind::Keyword(Keyword::Then),
    TokenKind::Keyword(Keyword::Else),
    TokenKind::Keyword(Keyword::When),
    TokenKind::Keyword(Keyword::Join),
    TokenKind::Keyword(Keyword::Inner),
    TokenKind::Keyword(Keyword::Left),
    TokenKind::Keyword(Keyword::Right),
    TokenKind::Keyword(Keyword::Full),
    TokenKind::Keyword(Keyword::Cross),
    TokenKind::Keyword(Keyword::Natural),
    TokenKind::Keyword(Keyword::On),
    TokenKind::Keyword(Keyword::Using),
    TokenKind::Comma,
    TokenKind::Semicolon,
];

const OPENERS: &[TokenKind] = &[
    TokenKind::LeftParen,
    TokenKind::LeftBracket,
    TokenKind::Keyword(Keyword::Case),
];

const CLOSERS: &[TokenKind] = &[
    TokenKind::RightParen,
    TokenKind::RightBracket,
    TokenKind::Keyword(Keyword::End),
];

/// Absolute index of the first `AND` that separates conjuncts, or of an
/// unmatched closer. The first `AND` after a `BETWEEN` at the same nesting
/// level belongs to the range and is skipped.
fn conjunction_end(cur: &Cursor<'_>) -> usize {
    let contains = |set: &[TokenKind], kind: &TokenKind| set.iter().any(|k| k.same_kind(kind));
    // One entry per open bracket level: is a BETWEEN waiting for its AND?
    let mut pending = vec![false];
    for offset in 0..cur.limit().saturating_sub(cur.position()) {
        let kind = cur.peek_kind(offset);
        if contains(OPENERS, kind) {
            pending.push(false);
        } else if contains(CLOSERS, kind) {
            if pending.len() == 1 {
                return cur.position() + offset;
            }
            pending.pop();
        } else if let TokenKind::Keyword(keyword) = kind {
            let level = pending.len() - 1;
            match keyword {
                Keyword::Between => pending[level] = true,
                Keyword::And if pending[level] => pending[level] = false,
                Keyword::And if level == 0 => return cur.position() + offset,
                _ => {}
            }
        }
    }
    cur.limit()
}

/// Bounds the predicate and parses its OR level.
struct PredicateParser;

impl PredicateParser {
    /// Absolute index of the first token past the predicate.
    fn extent(cur: &Cursor<'_>) -> usize {
        let mut from = 0;
        loop {
            match cur.find(TERMINATORS, OPENERS, CLOSERS, from) {
                // LEFT(...) and RIGHT(...) are function calls, not joins.
                Some(index)
                    if matches!(
                        cur.peek_keyword(index - cur.position()),
                        Some(Keyword::Left | Keyword::Right)
                    ) && matches!(
                        cur.peek_kind(index - cur.position() + 1),
                        TokenKind::LeftParen
                    ) =>
                {
                    from = index - cur.position() + 1;
                }
                Some(index) => return index,
                None => return cur.limit(),
            }
        }
    }
}

impl ParseHandler for PredicateParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let end = Self::extent(cur);
        cur.bounded(end, |cur| {
            let predicate = ctx.parse_node(NodeKind::OrPredicate, cur)?;
            if cur.is_at_end() {
                Ok(predicate)
            } else {
                Err(ParseError::unexpected("end of predicate", cur.current()))
            }
        })
    }
}

/// The OR or AND level: splits on `keyword` and folds the operands.
struct ConnectiveLayer {
    keyword: Keyword,
    operand: NodeKind,
}

impl ParseHandler for ConnectiveLayer {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let separator = TokenKind::Keyword(self.keyword);
        let mut operands = Vec::new();
        loop {
            let end = if self.keyword == Keyword::And {
                conjunction_end(cur)
            } else {
                cur.find(std::slice::from_ref(&separator), OPENERS, CLOSERS, 0)
                    .unwrap_or_else(|| cur.limit())
            };
            let operand: Predicate = cur.bounded(end, |cur| {
                let operand = ctx.parse(self.operand, cur)?;
                if cur.is_at_end() {
                    Ok(operand)
                } else {
                    Err(ParseError::unexpected(
                        format!("{} or end of predicate", self.keyword.as_str()),
                        cur.current(),
                    ))
                }
            })?;
            operands.push(operand);
            if !cur.consume_keyword(self.keyword) {
                break;
            }
        }
        Ok(match self.keyword {
            Keyword::And => Predicate::and_all(operands),
            _ => Predicate::or_all(operands),
        }
        .into())
    }
}

struct AtomicPredicateParser;

impl ParseHandler for AtomicPredicateParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        ctx.parse_alternatives::<Predicate>(NodeKind::AtomicPredicate, cur, "predicate")
            .map(Node::Predicate)
    }
}

/// `( predicate )`, accepted only when followed by AND, OR, `)` or the end
/// of the predicate; otherwise the parentheses belong to an expression as in
/// `(a) IN (1, 2)`.
struct GroupedPredicateParser;

impl ParseHandler for GroupedPredicateParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        cur.check(&TokenKind::LeftParen)
            && !ctx.lookahead().subquery(cur, 0)
            && !ctx.lookahead().tuple_filter(cur)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_left_paren()?;
        let inner = ctx.parse_node(NodeKind::Predicate, cur)?;
        cur.expect_right_paren()?;
        let follows = cur.is_at_end()
            || cur.check(&TokenKind::RightParen)
            || matches!(cur.peek_keyword(0), Some(Keyword::And | Keyword::Or));
        if follows {
            Ok(inner)
        } else {
            Err(ParseError::unexpected(
                "AND, OR or `)` after grouped predicate",
                cur.current(),
            ))
        }
    }
}

/// `[NOT] EXISTS (query)`.
struct ExistsParser;

impl ParseHandler for ExistsParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::Exists) || cur.check_keywords(&[Keyword::Not, Keyword::Exists])
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let negated = cur.consume_keyword(Keyword::Not);
        cur.expect_keyword(Keyword::Exists)?;
        cur.expect_left_paren()?;
        let query: Query = ctx.parse(NodeKind::Query, cur)?;
        cur.expect_right_paren()?;
        Ok(Predicate::Exists {
            query: Box::new(query),
            negated,
        }
        .into())
    }
}

/// `NOT p`, binding tighter than AND.
struct NotParser;

impl ParseHandler for NotParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::Not)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_keyword(Keyword::Not)?;
        let inner: Predicate = ctx.parse(NodeKind::AtomicPredicate, cur)?;
        Ok(inner.not().into())
    }
}

/// An expression followed by one predicate tail, or a bare boolean
/// expression.
struct ExpressionPredicateParser;

impl ParseHandler for ExpressionPredicateParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let start = cur.current().span;
        let expr: Expr = ctx.parse(NodeKind::Expr, cur)?;
        let registry = ctx.registry();
        for &kind in registry.candidates(NodeKind::PredicateTail) {
            if ctx.matches(kind, cur)? {
                let predicate: Predicate = ctx.apply(kind, expr.into(), cur)?;
                return Ok(predicate.into());
            }
        }
        if expr.is_truth_candidate() {
            return Ok(Predicate::Truth { expr, test: None }.into());
        }
        if cur.is_at_end() {
            return Err(ParseError::new(
                "expression is not a predicate",
                start.to(cur.current().span),
            ));
        }
        Err(ParseError::unexpected("comparison operator", cur.current()))
    }
}

const fn comparison_op(kind: &TokenKind) -> Option<ComparisonOp> {
    match kind {
        TokenKind::Eq => Some(ComparisonOp::Eq),
        TokenKind::NotEq => Some(ComparisonOp::NotEq),
        TokenKind::Lt => Some(ComparisonOp::Lt),
        TokenKind::LtEq => Some(ComparisonOp::LtEq),
        TokenKind::Gt => Some(ComparisonOp::Gt),
        TokenKind::GtEq => Some(ComparisonOp::GtEq),
        _ => None,
    }
}

/// `= < <= > >= <>`, optionally quantified with ANY, SOME or ALL.
struct ComparisonParser;

impl ParseHandler for ComparisonParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before comparison", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        comparison_op(cur.peek_kind(0)).is_some()
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let left = expr_operand(lhs, cur)?;
        let Some(op) = comparison_op(cur.peek_kind(0)) else {
            return Err(ParseError::unexpected("comparison operator", cur.current()));
        };
        let span = cur.advance().span;
        let quantifier = match cur.peek_keyword(0) {
            Some(Keyword::Any) => Some(Quantifier::Any),
            Some(Keyword::Some) => Some(Quantifier::Some),
            Some(Keyword::All) => Some(Quantifier::All),
            _ => None,
        };
        if let Some(quantifier) = quantifier {
            cur.advance();
            if !cur.check(&TokenKind::LeftParen) {
                return Err(ParseError::unexpected("`(`", cur.current()));
            }
            let right: Expr = ctx.parse(NodeKind::Expr, cur)?;
            return Ok(Predicate::Quantified {
                left,
                op,
                quantifier,
                right,
            }
            .into());
        }
        let right: Expr = ctx.parse(NodeKind::Expr, cur)?;
        Predicate::comparison(left, op, right)
            .map(Node::Predicate)
            .map_err(|err| ParseError::invariant(&err, span))
    }
}

/// `[NOT] BETWEEN [SYMMETRIC | ASYMMETRIC] low AND high`.
struct BetweenParser;

impl ParseHandler for BetweenParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before BETWEEN", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::Between) || cur.check_keywords(&[Keyword::Not, Keyword::Between])
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = expr_operand(lhs, cur)?;
        let negated = cur.consume_keyword(Keyword::Not);
        let span = cur.expect_keyword(Keyword::Between)?;
        let symmetric = cur.consume_keyword(Keyword::Symmetric);
        if !symmetric {
            cur.consume_keyword(Keyword::Asymmetric);
        }
        let low: Expr = ctx.parse(NodeKind::Expr, cur)?;
        cur.expect_keyword(Keyword::And)?;
        let high: Expr = ctx.parse(NodeKind::Expr, cur)?;
        Predicate::between(expr, low, high, negated, symmetric)
            .map(Node::Predicate)
            .map_err(|err| ParseError::invariant(&err, span))
    }
}

/// `[NOT] IN value-set`.
struct InParser;

impl ParseHandler for InParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before IN", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::In) || cur.check_keywords(&[Keyword::Not, Keyword::In])
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = expr_operand(lhs, cur)?;
        let negated = cur.consume_keyword(Keyword::Not);
        let span = cur.expect_keyword(Keyword::In)?;
        let set: ValueSet = ctx.parse(NodeKind::ValueSet, cur)?;
        Predicate::in_set(expr, set, negated)
            .map(Node::Predicate)
            .map_err(|err| ParseError::invariant(&err, span))
    }
}

/// `[NOT] LIKE pattern [ESCAPE e]`, plus `ILIKE` where enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LikeParser {
    /// Accept `ILIKE`.
    pub ilike: bool,
}

impl LikeParser {
    /// `LIKE` only.
    pub const STANDARD: Self = Self { ilike: false };

    /// `LIKE` and `ILIKE`.
    pub const WITH_ILIKE: Self = Self { ilike: true };

    const fn is_operator(self, keyword: Option<Keyword>) -> bool {
        match keyword {
            Some(Keyword::Like) => true,
            Some(Keyword::Ilike) => self.ilike,
            _ => false,
        }
    }
}

impl ParseHandler for LikeParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before LIKE", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        if cur.check_keyword(Keyword::Not) {
            self.is_operator(cur.peek_keyword(1))
        } else {
            self.is_operator(cur.peek_keyword(0))
        }
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = expr_operand(lhs, cur)?;
        let negated = cur.consume_keyword(Keyword::Not);
        let keywords: &[Keyword] = if self.ilike {
            &[Keyword::Like, Keyword::Ilike]
        } else {
            &[Keyword::Like]
        };
        let case_insensitive = cur.expect_one_of(keywords)? == Keyword::Ilike;
        let pattern: Expr = ctx.parse(NodeKind::Expr, cur)?;
        let escape = if cur.consume_keyword(Keyword::Escape) {
            Some(ctx.parse(NodeKind::Expr, cur)?)
        } else {
            None
        };
        Ok(Predicate::Like {
            expr,
            pattern,
            escape,
            negated,
            case_insensitive,
        }
        .into())
    }
}

/// `IS [NOT] NULL | TRUE | FALSE | UNKNOWN | DISTINCT FROM e | name`.
struct IsParser;

impl ParseHandler for IsParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before IS", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::Is)
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = expr_operand(lhs, cur)?;
        cur.expect_keyword(Keyword::Is)?;
        let negated = cur.consume_keyword(Keyword::Not);
        let value = match cur.peek_keyword(0) {
            Some(Keyword::Null) => {
                cur.advance();
                return Ok(Predicate::IsNull { expr, negated }.into());
            }
            Some(Keyword::Distinct) => {
                cur.advance();
                cur.expect_keyword(Keyword::From)?;
                let right: Expr = ctx.parse(NodeKind::Expr, cur)?;
                return Ok(Predicate::DistinctFrom {
                    left: expr,
                    right,
                    negated,
                }
                .into());
            }
            Some(Keyword::True) => {
                cur.advance();
                TruthValue::True
            }
            Some(Keyword::False) => {
                cur.advance();
                TruthValue::False
            }
            Some(Keyword::Unknown) => {
                cur.advance();
                TruthValue::Unknown
            }
            _ if cur.current().is_identifier_like() => TruthValue::Named(cur.expect_ident()?),
            _ => {
                return Err(ParseError::unexpected(
                    "NULL, TRUE, FALSE, UNKNOWN or DISTINCT FROM",
                    cur.current(),
                ))
            }
        };
        Ok(Predicate::Truth {
            expr,
            test: Some(TruthTest { value, negated }),
        }
        .into())
    }
}

/// `(query)`, `(a, b)` or `((a, b), (c, d))`.
struct ValueSetParser;

impl ParseHandler for ValueSetParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let open = cur.current().span;
        if ctx.lookahead().subquery(cur, 0) {
            cur.expect_left_paren()?;
            let query: Query = ctx.parse(NodeKind::Query, cur)?;
            cur.expect_right_paren()?;
            return Ok(ValueSet::Subquery(Box::new(query)).into());
        }
        cur.expect_left_paren()?;
        if cur.check(&TokenKind::RightParen) {
            return Err(ParseError::unexpected("value", cur.current()));
        }
        let items = comma_list(cur, |cur| ctx.parse(NodeKind::Expr, cur))?;
        let close = cur.current().span;
        cur.expect_right_paren()?;
        ValueSet::from_items(items)
            .map(Node::ValueSet)
            .map_err(|err| ParseError::invariant(&err, open.to(close)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, LogicalOp};
    use crate::config::ParserConfig;
    use crate::parser::{parse, standard_parsers};

    fn predicate(sql: &str) -> Predicate {
        parse(
            &standard_parsers(),
            NodeKind::Predicate,
            sql,
            &ParserConfig::default(),
        )
        .unwrap()
    }

    fn predicate_err(sql: &str) -> ParseError {
        parse::<Predicate>(
            &standard_parsers(),
            NodeKind::Predicate,
            sql,
            &ParserConfig::default(),
        )
        .unwrap_err()
    }

    #[test]
    fn test_parenthesized_operand_of_in() {
        let p = predicate("(a) IN (1, 2, 3)");
        let Predicate::In {
            expr,
            set,
            negated,
        } = p
        else {
            panic!("expected IN, got {p:?}");
        };
        assert!(!negated);
        assert_eq!(expr, Expr::column("a").nested());
        assert_eq!(set.arity(), Some(1));
    }

    #[test]
    fn test_grouped_predicate_in_or() {
        let p = predicate("(a > 1 AND b < 2) OR c IS NOT NULL");
        let Some((LogicalOp::Or, children)) = p.as_composite() else {
            panic!("expected OR, got {p:?}");
        };
        assert!(matches!(children[0], Predicate::And(ref inner) if inner.len() == 2));
        assert!(matches!(children[1], Predicate::IsNull { negated: true, .. }));
    }

    #[test]
    fn test_and_binds_tighter() {
        let p = predicate("a = 1 OR b = 2 AND c = 3");
        let Predicate::Or(children) = p else {
            panic!("expected OR");
        };
        assert!(matches!(children[1], Predicate::And(_)));
    }

    #[test]
    fn test_between_and_is_opaque() {
        let p = predicate("x BETWEEN 1 AND 2 AND y = 3");
        let Predicate::And(children) = p else {
            panic!("expected AND");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], Predicate::Between { negated: false, .. }));
    }

    #[test]
    fn test_between_pairs_with_and_per_level() {
        let Predicate::Or(children) = predicate("(a BETWEEN 1 AND 2) OR b = 1") else {
            panic!("expected OR");
        };
        assert!(matches!(children[0], Predicate::Between { .. }));

        let Predicate::And(children) = predicate("(a AND b) AND x BETWEEN (1) AND 2 AND c")
        else {
            panic!("expected AND");
        };
        assert_eq!(children.len(), 4);
        assert!(matches!(children[2], Predicate::Between { .. }));

        let p = predicate("a IN (SELECT b FROM u WHERE c BETWEEN 1 AND 2 AND d = 2) AND e");
        let Predicate::And(children) = p else {
            panic!("expected AND, got {p:?}");
        };
        assert!(matches!(
            children[0],
            Predicate::In {
                set: ValueSet::Subquery(_),
                ..
            }
        ));
    }

    #[test]
    fn test_flat_conjunction() {
        let Predicate::And(children) = predicate("a = 1 AND (b = 2 AND c = 3)") else {
            panic!("expected AND");
        };
        assert_eq!(children.len(), 3);
    }

    #[test]
    fn test_not_and_exists() {
        assert!(matches!(predicate("NOT a = 1"), Predicate::Not(_)));
        assert!(matches!(
            predicate("NOT EXISTS (SELECT 1)"),
            Predicate::Exists { negated: true, .. }
        ));
        let Predicate::And(children) = predicate("NOT a AND b") else {
            panic!("expected AND");
        };
        assert!(matches!(children[0], Predicate::Not(_)));
    }

    #[test]
    fn test_quantified() {
        assert!(matches!(
            predicate("a = ANY (SELECT b FROM t)"),
            Predicate::Quantified {
                quantifier: Quantifier::Any,
                ..
            }
        ));
    }

    #[test]
    fn test_is_forms() {
        assert!(matches!(
            predicate("a IS DISTINCT FROM b"),
            Predicate::DistinctFrom { negated: false, .. }
        ));
        assert!(matches!(
            predicate("a IS NOT TRUE"),
            Predicate::Truth {
                test: Some(TruthTest {
                    value: TruthValue::True,
                    negated: true
                }),
                ..
            }
        ));
        assert!(matches!(
            predicate("flag"),
            Predicate::Truth { test: None, .. }
        ));
    }

    #[test]
    fn test_like_escape() {
        let Predicate::Like {
            escape,
            negated,
            case_insensitive,
            ..
        } = predicate("name NOT LIKE 'a!%' ESCAPE '!'")
        else {
            panic!("expected LIKE");
        };
        assert!(negated);
        assert!(!case_insensitive);
        assert_eq!(escape, Some(Expr::string("!")));
    }

    #[test]
    fn test_ilike_not_standard() {
        let err = predicate_err("name ILIKE 'a%'");
        assert_eq!(err.expected.as_deref(), Some("AND or end of predicate"));
    }

    #[test]
    fn test_tuple_filters() {
        let Predicate::In { set, .. } = predicate("(a, b) IN ((1, 2), (3, 4))") else {
            panic!("expected IN");
        };
        assert_eq!(set.arity(), Some(2));
        assert!(matches!(
            predicate("(a, b) = (1, 2)"),
            Predicate::Comparison { .. }
        ));
    }

    #[test]
    fn test_invariants_are_positioned() {
        let err = predicate_err("(a, b) IN ((1, 2, 3))");
        assert!(err.message.contains("columns"));
        let err = predicate_err("(a, b) = (1, 2, 3)");
        assert_eq!(err.span.start, 7);
        let err = predicate_err("a BETWEEN (1, 2) AND 3");
        assert!(err.message.contains("BETWEEN"));
    }

    #[test]
    fn test_arithmetic_is_not_a_predicate() {
        let err = predicate_err("a + 1");
        assert_eq!(err.message, "expression is not a predicate");
    }

    #[test]
    fn test_case_inside_predicate() {
        let p = predicate("CASE WHEN a = 1 THEN b ELSE c END = d AND e");
        let Predicate::And(children) = p else {
            panic!("expected AND");
        };
        assert!(matches!(children[0], Predicate::Comparison { .. }));
    }

    #[test]
    fn test_left_function_in_predicate() {
        assert!(matches!(
            predicate("LEFT(name, 1) = 'a'"),
            Predicate::Comparison { .. }
        ));
    }

    #[test]
    fn test_grouped_arithmetic_operand() {
        let Predicate::Comparison { left, .. } = predicate("(a + b) * 2 > c") else {
            panic!("expected comparison");
        };
        assert!(matches!(left, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_regex_needs_dialect() {
        let err = predicate_err("a ~ 'x'");
        assert_eq!(err.expected.as_deref(), Some("AND or end of predicate"));
    }
}
