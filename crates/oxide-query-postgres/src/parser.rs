//! PostgreSQL grammar additions.
//!
//! Everything here plugs into the standard grammar's extension points:
//! postfix handlers for `::` and `[...]`, an infix handler for vendor
//! operators and a predicate tail for the regex operators.

use std::sync::Arc;

use oxide_query_core::ast::{DataType, Expr, Node, NodeKind, Predicate, RegexOp, VendorOperator};
use oxide_query_core::lexer::{Keyword, TokenKind};
use oxide_query_core::parser::{
    expr_operand, Cursor, DataTypeParser, DistinctSpecParser, LikeParser, LiteralParser,
    LockClauseParser, ParseContext, ParseError, ParseHandler, ParserRegistry,
};
use oxide_query_core::registry::Position;

/// The `expr::type` postfix cast.
pub const CAST_SHORTHAND: NodeKind = NodeKind::Extension("postgres.cast");

/// Installs the PostgreSQL grammar into a copy of the standard registry.
pub fn register(registry: &mut ParserRegistry) {
    registry.register(NodeKind::Literal, Arc::new(LiteralParser::EXTENDED));
    registry.register(NodeKind::DataType, Arc::new(DataTypeParser::WITH_ARRAYS));
    registry.register(NodeKind::Like, Arc::new(LikeParser::WITH_ILIKE));
    registry.register(
        NodeKind::DistinctSpec,
        Arc::new(DistinctSpecParser::WITH_ON),
    );
    registry.register(NodeKind::LockClause, Arc::new(LockClauseParser::EXTENDED));

    registry.register(CAST_SHORTHAND, Arc::new(CastShorthandParser));
    registry.register(NodeKind::Subscript, Arc::new(SubscriptParser));
    registry.register(NodeKind::VendorBinary, Arc::new(VendorOperatorParser));
    registry.register(NodeKind::Regex, Arc::new(RegexParser));

    registry.add_candidate(NodeKind::PostfixExpr, CAST_SHORTHAND, Position::First);
    registry.add_candidate(NodeKind::PostfixExpr, NodeKind::Subscript, Position::First);
    registry.add_candidate(
        NodeKind::OperatorExpr,
        NodeKind::VendorBinary,
        Position::Last,
    );
    registry.add_candidate(NodeKind::PredicateTail, NodeKind::Regex, Position::Last);
}

/// `expr::type`.
struct CastShorthandParser;

impl ParseHandler for CastShorthandParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before `::`", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check(&TokenKind::DoubleColon)
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = expr_operand(lhs, cur)?;
        cur.advance();
        let data_type: DataType = ctx.parse(NodeKind::DataType, cur)?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
            shorthand: true,
        }
        .into())
    }
}

/// `a[i]` and `a[lo:hi]`, either slice bound optional.
struct SubscriptParser;

impl ParseHandler for SubscriptParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before `[`", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check(&TokenKind::LeftBracket)
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = Box::new(expr_operand(lhs, cur)?);
        cur.advance();
        let lower = if cur.check(&TokenKind::Colon) {
            None
        } else {
            Some(Box::new(ctx.parse::<Expr>(NodeKind::Expr, cur)?))
        };
        let node = if cur.consume_if(&TokenKind::Colon) {
            let upper = if cur.check(&TokenKind::RightBracket) {
                None
            } else {
                Some(Box::new(ctx.parse::<Expr>(NodeKind::Expr, cur)?))
            };
            Expr::Slice { expr, lower, upper }
        } else {
            let Some(index) = lower else {
                return Err(ParseError::unexpected("subscript", cur.current()));
            };
            Expr::Subscript { expr, index }
        };
        cur.expect(&[TokenKind::RightBracket])?;
        Ok(node.into())
    }
}

/// Operators outside the standard set: `a @> b`, `a OPERATOR(s.op) b`.
///
/// Binds like `||`, looser than arithmetic.
struct VendorOperatorParser;

impl VendorOperatorParser {
    fn explicit(cur: &mut Cursor<'_>) -> Result<VendorOperator, ParseError> {
        cur.expect_keyword(Keyword::Operator)?;
        cur.expect_left_paren()?;
        let schema = if cur.current().is_identifier_like() {
            let schema = cur.expect_ident()?;
            cur.expect(&[TokenKind::Dot])?;
            Some(schema)
        } else {
            None
        };
        let Some(symbol) = operator_symbol(cur.peek_kind(0)) else {
            return Err(ParseError::unexpected("operator", cur.current()));
        };
        cur.advance();
        cur.expect_right_paren()?;
        Ok(VendorOperator { schema, symbol })
    }
}

impl ParseHandler for VendorOperatorParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before operator", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        matches!(cur.peek_kind(0), TokenKind::Op(_))
            || (cur.check_keyword(Keyword::Operator)
                && matches!(cur.peek_kind(1), TokenKind::LeftParen))
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let left = expr_operand(lhs, cur)?;
        let operator = if let TokenKind::Op(symbol) = cur.peek_kind(0) {
            let symbol = symbol.clone();
            cur.advance();
            VendorOperator {
                schema: None,
                symbol,
            }
        } else {
            Self::explicit(cur)?
        };
        let right: Expr = ctx.parse(NodeKind::AdditiveExpr, cur)?;
        Ok(Expr::VendorBinary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
        .into())
    }
}

/// Spelling of a token usable inside `OPERATOR(...)`.
fn operator_symbol(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Op(text) => Some(text.clone()),
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
        | TokenKind::Concat
        | TokenKind::Tilde
        | TokenKind::TildeStar
        | TokenKind::NotTilde
        | TokenKind::NotTildeStar => kind.symbol().map(str::to_string),
        _ => None,
    }
}

/// Returns true if `symbol` lexes as an operator with a meaning of its own
/// in the standard grammar, so it must stay inside `OPERATOR(...)`.
#[must_use]
pub fn is_standard_symbol(symbol: &str) -> bool {
    matches!(
        symbol,
        "+" | "-"
            | "*"
            | "/"
            | "%"
            | "="
            | "<>"
            | "!="
            | "<"
            | "<="
            | ">"
            | ">="
            | "||"
            | "~"
            | "~*"
            | "!~"
            | "!~*"
    )
}

/// `expr ~ pattern` and its case-insensitive and negated forms.
struct RegexParser;

const fn regex_op(kind: &TokenKind) -> Option<RegexOp> {
    match kind {
        TokenKind::Tilde => Some(RegexOp::Match),
        TokenKind::TildeStar => Some(RegexOp::IMatch),
        TokenKind::NotTilde => Some(RegexOp::NotMatch),
        TokenKind::NotTildeStar => Some(RegexOp::NotIMatch),
        _ => None,
    }
}

impl ParseHandler for RegexParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before `~`", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        regex_op(cur.peek_kind(0)).is_some()
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = expr_operand(lhs, cur)?;
        let Some(op) = regex_op(cur.peek_kind(0)) else {
            return Err(ParseError::unexpected("regular expression operator", cur.current()));
        };
        cur.advance();
        let pattern: Expr = ctx.parse(NodeKind::Expr, cur)?;
        Ok(Predicate::Regex { expr, op, pattern }.into())
    }
}
