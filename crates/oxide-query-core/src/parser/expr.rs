//! Expression grammar.
//!
//! Layers, loosest first: `||` and vendor operators, additive, multiplicative,
//! postfix operators, operands. Each layer parses its operands through the
//! layer below and left-folds its own operators.

use std::sync::Arc;

use crate::ast::{
    BinaryOp, CaseExpr, DataType, Expr, FrameBound, FrameUnits, FunctionArgs, FunctionCall, Ident,
    Literal, Node, NodeKind, ObjectName, OrderItem, Parameter, Predicate, Query, TypedLiteralKind,
    UnaryOp, WindowDefinition, WindowFrame, WindowSpec,
};
use crate::lexer::{Keyword, TokenKind};

use super::{
    comma_list, expr_operand, object_name, Cursor, ParseContext, ParseError, ParseHandler,
    ParserRegistry,
};

pub(super) fn register(registry: &mut ParserRegistry) {
    registry.register(NodeKind::Expr, Arc::new(ExprParser));
    registry.register(NodeKind::OperatorExpr, Arc::new(OperatorExprParser));
    registry.register(NodeKind::AdditiveExpr, Arc::new(ArithmeticLayer::ADDITIVE));
    registry.register(
        NodeKind::MultiplicativeExpr,
        Arc::new(ArithmeticLayer::MULTIPLICATIVE),
    );
    registry.register(NodeKind::PostfixExpr, Arc::new(PostfixExprParser));
    registry.register(NodeKind::AtomicExpr, Arc::new(AtomicExprParser));
    registry.register(NodeKind::Concat, Arc::new(ConcatParser));

    registry.register(NodeKind::Collate, Arc::new(CollateParser));
    registry.register(NodeKind::AtTimeZone, Arc::new(AtTimeZoneParser));

    registry.register(NodeKind::Unary, Arc::new(UnaryParser));
    registry.register(NodeKind::Nested, Arc::new(NestedParser));
    registry.register(NodeKind::Case, Arc::new(CaseParser));
    registry.register(NodeKind::Cast, Arc::new(CastParser));
    registry.register(NodeKind::Function, Arc::new(FunctionParser));
    registry.register(
        NodeKind::AnonymousParameter,
        Arc::new(AnonymousParameterParser),
    );
    registry.register(NodeKind::NamedParameter, Arc::new(NamedParameterParser));
    registry.register(NodeKind::OrdinalParameter, Arc::new(OrdinalParameterParser));
    registry.register(NodeKind::Subquery, Arc::new(SubqueryParser));
    registry.register(NodeKind::Row, Arc::new(RowParser));
    registry.register(NodeKind::ColumnRef, Arc::new(ColumnRefParser));
    registry.register(NodeKind::Literal, Arc::new(LiteralParser::STANDARD));
    registry.register(NodeKind::WindowSpec, Arc::new(WindowSpecParser));

    registry.set_candidates(NodeKind::OperatorExpr, vec![NodeKind::Concat]);
    registry.set_candidates(
        NodeKind::PostfixExpr,
        vec![NodeKind::Collate, NodeKind::AtTimeZone],
    );
    registry.set_candidates(
        NodeKind::AtomicExpr,
        vec![
            NodeKind::Unary,
            NodeKind::Nested,
            NodeKind::Case,
            NodeKind::Cast,
            NodeKind::Function,
            NodeKind::AnonymousParameter,
            NodeKind::NamedParameter,
            NodeKind::OrdinalParameter,
            NodeKind::Subquery,
            NodeKind::Row,
            NodeKind::ColumnRef,
            NodeKind::Literal,
        ],
    );
}

/// Entry point for scalar expressions.
struct ExprParser;

impl ParseHandler for ExprParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        ctx.parse_node(NodeKind::OperatorExpr, cur)
    }
}

/// The loosest layer: `||` plus whatever infix handlers the dialect lists
/// under [`NodeKind::OperatorExpr`].
struct OperatorExprParser;

impl ParseHandler for OperatorExprParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let left = ctx.parse_node(NodeKind::AdditiveExpr, cur)?;
        ctx.apply_candidates(NodeKind::OperatorExpr, left, cur)
    }
}

struct ConcatParser;

impl ParseHandler for ConcatParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before `||`", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check(&TokenKind::Concat)
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let left = expr_operand(lhs, cur)?;
        cur.advance();
        let right: Expr = ctx.parse(NodeKind::AdditiveExpr, cur)?;
        Ok(left.binary(BinaryOp::Concat, right).into())
    }
}

const fn additive_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

const fn multiplicative_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        _ => None,
    }
}

/// One left-associative arithmetic precedence level.
struct ArithmeticLayer {
    operand: NodeKind,
    operator: fn(&TokenKind) -> Option<BinaryOp>,
}

impl ArithmeticLayer {
    const ADDITIVE: Self = Self {
        operand: NodeKind::MultiplicativeExpr,
        operator: additive_op,
    };

    const MULTIPLICATIVE: Self = Self {
        operand: NodeKind::PostfixExpr,
        operator: multiplicative_op,
    };
}

impl ParseHandler for ArithmeticLayer {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let mut left: Expr = ctx.parse(self.operand, cur)?;
        while let Some(op) = (self.operator)(cur.peek_kind(0)) {
            cur.advance();
            let right: Expr = ctx.parse(self.operand, cur)?;
            left = left.binary(op, right);
        }
        Ok(left.into())
    }
}

/// Operands followed by any number of postfix operators.
struct PostfixExprParser;

impl ParseHandler for PostfixExprParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let operand = ctx.parse_node(NodeKind::AtomicExpr, cur)?;
        ctx.apply_candidates(NodeKind::PostfixExpr, operand, cur)
    }
}

struct CollateParser;

impl ParseHandler for CollateParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before COLLATE", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::Collate)
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        _ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = expr_operand(lhs, cur)?;
        cur.expect_keyword(Keyword::Collate)?;
        let collation = object_name(cur)?;
        Ok(Expr::Collate {
            expr: Box::new(expr),
            collation,
        }
        .into())
    }
}

struct AtTimeZoneParser;

impl ParseHandler for AtTimeZoneParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Err(ParseError::unexpected("expression before AT TIME ZONE", cur.current()))
    }

    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keywords(&[Keyword::At, Keyword::Time, Keyword::Zone])
    }

    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let expr = expr_operand(lhs, cur)?;
        for keyword in [Keyword::At, Keyword::Time, Keyword::Zone] {
            cur.expect_keyword(keyword)?;
        }
        let zone: Expr = ctx.parse(NodeKind::AtomicExpr, cur)?;
        Ok(Expr::AtTimeZone {
            expr: Box::new(expr),
            zone: Box::new(zone),
        }
        .into())
    }
}

/// Tries the operand alternatives in registration order.
struct AtomicExprParser;

impl ParseHandler for AtomicExprParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        ctx.parse_alternatives::<Expr>(NodeKind::AtomicExpr, cur, "expression")
            .map(Node::Expr)
    }
}

/// `-x`, `~x` and `+x`; unary plus leaves no trace in the tree.
struct UnaryParser;

impl ParseHandler for UnaryParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.match_any(&[TokenKind::Minus, TokenKind::Tilde, TokenKind::Plus])
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let op = match cur.advance().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        };
        let operand: Expr = ctx.parse(NodeKind::PostfixExpr, cur)?;
        Ok(match op {
            Some(op) => Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            None => operand,
        }
        .into())
    }
}

/// `( expr )`. Tried speculatively so `(a, b)` falls through to the row
/// constructor.
struct NestedParser;

impl ParseHandler for NestedParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        cur.check(&TokenKind::LeftParen) && !ctx.lookahead().subquery(cur, 0)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_left_paren()?;
        let inner: Expr = ctx.parse(NodeKind::Expr, cur)?;
        cur.expect_right_paren()?;
        Ok(inner.nested().into())
    }
}

struct CaseParser;

impl ParseHandler for CaseParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::Case)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_keyword(Keyword::Case)?;
        let case = if cur.check_keyword(Keyword::When) {
            let mut whens = Vec::new();
            while cur.consume_keyword(Keyword::When) {
                let condition: Predicate = ctx.parse(NodeKind::Predicate, cur)?;
                cur.expect_keyword(Keyword::Then)?;
                let result: Expr = ctx.parse(NodeKind::Expr, cur)?;
                whens.push((condition, result));
            }
            CaseExpr::Searched {
                whens,
                else_result: else_result(cur, ctx)?,
            }
        } else {
            let operand: Expr = ctx.parse(NodeKind::Expr, cur)?;
            let mut whens = Vec::new();
            while cur.consume_keyword(Keyword::When) {
                let value: Expr = ctx.parse(NodeKind::Expr, cur)?;
                cur.expect_keyword(Keyword::Then)?;
                let result: Expr = ctx.parse(NodeKind::Expr, cur)?;
                whens.push((value, result));
            }
            if whens.is_empty() {
                return Err(ParseError::unexpected("WHEN", cur.current()));
            }
            CaseExpr::Simple {
                operand,
                whens,
                else_result: else_result(cur, ctx)?,
            }
        };
        cur.expect_keyword(Keyword::End)?;
        Ok(Expr::Case(Box::new(case)).into())
    }
}

fn else_result(
    cur: &mut Cursor<'_>,
    ctx: &mut ParseContext<'_>,
) -> Result<Option<Expr>, ParseError> {
    if cur.consume_keyword(Keyword::Else) {
        Ok(Some(ctx.parse(NodeKind::Expr, cur)?))
    } else {
        Ok(None)
    }
}

/// `CAST(expr AS type)`.
struct CastParser;

impl ParseHandler for CastParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::Cast) && matches!(cur.peek_kind(1), TokenKind::LeftParen)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_keyword(Keyword::Cast)?;
        cur.expect_left_paren()?;
        let expr: Expr = ctx.parse(NodeKind::Expr, cur)?;
        cur.expect_keyword(Keyword::As)?;
        let data_type: DataType = ctx.parse(NodeKind::DataType, cur)?;
        cur.expect_right_paren()?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
            shorthand: false,
        }
        .into())
    }
}

/// Function calls with their aggregate and window decorations.
struct FunctionParser;

impl FunctionParser {
    fn name(cur: &mut Cursor<'_>) -> Result<ObjectName, ParseError> {
        let first = match cur.peek_keyword(0) {
            Some(kw @ (Keyword::Left | Keyword::Right)) => {
                cur.advance();
                Ident::new(kw.as_str().to_lowercase())
            }
            _ => cur.expect_ident()?,
        };
        let mut parts = vec![first];
        while cur.consume_if(&TokenKind::Dot) {
            parts.push(cur.expect_ident()?);
        }
        Ok(ObjectName::new(parts))
    }
}

impl ParseHandler for FunctionParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        !cur.check_keyword(Keyword::Row) && ctx.lookahead().function_call(cur)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let name = Self::name(cur)?;
        cur.expect_left_paren()?;
        let mut call = FunctionCall::new(name, Vec::new());
        if cur.consume_if(&TokenKind::Star) {
            call.args = FunctionArgs::Star;
        } else {
            call.distinct = cur.consume_keyword(Keyword::Distinct);
            if !call.distinct {
                cur.consume_keyword(Keyword::All);
            }
            if !cur.check(&TokenKind::RightParen) {
                call.args = FunctionArgs::List(comma_list(cur, |cur| {
                    ctx.parse(NodeKind::Expr, cur)
                })?);
            }
        }
        cur.expect_right_paren()?;

        if cur.check_keywords(&[Keyword::Within, Keyword::Group]) {
            cur.advance();
            cur.advance();
            cur.expect_left_paren()?;
            cur.expect_keyword(Keyword::Order)?;
            cur.expect_keyword(Keyword::By)?;
            call.within_group = comma_list(cur, |cur| ctx.parse(NodeKind::OrderItem, cur))?;
            cur.expect_right_paren()?;
        }
        if cur.check_keyword(Keyword::Filter) && matches!(cur.peek_kind(1), TokenKind::LeftParen)
        {
            cur.advance();
            cur.expect_left_paren()?;
            cur.expect_keyword(Keyword::Where)?;
            let filter: Predicate = ctx.parse(NodeKind::Predicate, cur)?;
            cur.expect_right_paren()?;
            call.filter = Some(Box::new(filter));
        }
        if cur.consume_keyword(Keyword::Over) {
            call.over = Some(ctx.parse(NodeKind::WindowSpec, cur)?);
        }
        Ok(Expr::Function(Box::new(call)).into())
    }
}

/// `OVER name` or `OVER (...)`, parsed after the `OVER` keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowSpecParser;

impl WindowSpecParser {
    /// Parses the body of a window: `[base] [PARTITION BY ..] [ORDER BY ..]
    /// [frame]`, without the surrounding parentheses.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed clauses.
    pub fn definition(
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<WindowDefinition, ParseError> {
        let mut definition = WindowDefinition::default();
        if cur.current().is_identifier_like()
            && !matches!(
                cur.peek_keyword(0),
                Some(Keyword::Partition | Keyword::Rows | Keyword::Range | Keyword::Groups)
            )
        {
            definition.base = Some(cur.expect_ident()?);
        }
        if cur.check_keywords(&[Keyword::Partition, Keyword::By]) {
            cur.advance();
            cur.advance();
            definition.partition_by = comma_list(cur, |cur| ctx.parse(NodeKind::Expr, cur))?;
        }
        if cur.check_keywords(&[Keyword::Order, Keyword::By]) {
            cur.advance();
            cur.advance();
            definition.order_by =
                comma_list(cur, |cur| ctx.parse::<OrderItem>(NodeKind::OrderItem, cur))?;
        }
        let units = match cur.peek_keyword(0) {
            Some(Keyword::Rows) => Some(FrameUnits::Rows),
            Some(Keyword::Range) => Some(FrameUnits::Range),
            Some(Keyword::Groups) => Some(FrameUnits::Groups),
            _ => None,
        };
        if let Some(units) = units {
            cur.advance();
            definition.frame = Some(if cur.consume_keyword(Keyword::Between) {
                let start = Self::bound(cur, ctx)?;
                cur.expect_keyword(Keyword::And)?;
                WindowFrame {
                    units,
                    start,
                    end: Some(Self::bound(cur, ctx)?),
                }
            } else {
                WindowFrame {
                    units,
                    start: Self::bound(cur, ctx)?,
                    end: None,
                }
            });
        }
        Ok(definition)
    }

    fn bound(cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<FrameBound, ParseError> {
        if cur.consume_keyword(Keyword::Unbounded) {
            return match cur.expect_one_of(&[Keyword::Preceding, Keyword::Following])? {
                Keyword::Preceding => Ok(FrameBound::UnboundedPreceding),
                _ => Ok(FrameBound::UnboundedFollowing),
            };
        }
        if cur.check_keywords(&[Keyword::Current, Keyword::Row]) {
            cur.advance();
            cur.advance();
            return Ok(FrameBound::CurrentRow);
        }
        let offset: Expr = ctx.parse(NodeKind::Expr, cur)?;
        match cur.expect_one_of(&[Keyword::Preceding, Keyword::Following])? {
            Keyword::Preceding => Ok(FrameBound::Preceding(Box::new(offset))),
            _ => Ok(FrameBound::Following(Box::new(offset))),
        }
    }
}

impl ParseHandler for WindowSpecParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        if cur.consume_if(&TokenKind::LeftParen) {
            let definition = Self::definition(cur, ctx)?;
            cur.expect_right_paren()?;
            Ok(WindowSpec::Inline(definition).into())
        } else {
            Ok(WindowSpec::Named(cur.expect_ident()?).into())
        }
    }
}

struct AnonymousParameterParser;

impl ParseHandler for AnonymousParameterParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check(&TokenKind::Question)
    }

    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect(&[TokenKind::Question])?;
        Ok(Expr::Parameter(Parameter::Anonymous).into())
    }
}

struct NamedParameterParser;

impl ParseHandler for NamedParameterParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check(&TokenKind::Colon) && cur.peek(1).is_identifier_like()
    }

    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect(&[TokenKind::Colon])?;
        let name = cur.expect_ident()?;
        Ok(Expr::Parameter(Parameter::Named(name.value)).into())
    }
}

struct OrdinalParameterParser;

impl ParseHandler for OrdinalParameterParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        matches!(cur.peek_kind(0), TokenKind::Positional(_))
    }

    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        match cur.current().kind {
            TokenKind::Positional(n) => {
                cur.advance();
                Ok(Expr::Parameter(Parameter::Ordinal(n)).into())
            }
            _ => Err(ParseError::unexpected("parameter", cur.current())),
        }
    }
}

/// A scalar subquery: `(SELECT ...)`.
struct SubqueryParser;

impl ParseHandler for SubqueryParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        ctx.lookahead().subquery(cur, 0)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_left_paren()?;
        let query: Query = ctx.parse(NodeKind::Query, cur)?;
        cur.expect_right_paren()?;
        Ok(Expr::Subquery(Box::new(query)).into())
    }
}

/// `(a, b)` or `ROW(a, b)`.
struct RowParser;

impl ParseHandler for RowParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        if cur.check_keyword(Keyword::Row) {
            return matches!(cur.peek_kind(1), TokenKind::LeftParen);
        }
        cur.check(&TokenKind::LeftParen) && !ctx.lookahead().subquery(cur, 0)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let explicit = cur.consume_keyword(Keyword::Row);
        cur.expect_left_paren()?;
        let mut items: Vec<Expr> = if explicit && cur.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            comma_list(cur, |cur| ctx.parse(NodeKind::Expr, cur))?
        };
        cur.expect_right_paren()?;
        if !explicit && items.len() == 1 {
            if let Some(only) = items.pop() {
                return Ok(only.nested().into());
            }
        }
        Ok(Expr::Row { items, explicit }.into())
    }
}

struct ColumnRefParser;

impl ParseHandler for ColumnRefParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        cur.current().is_identifier_like() && !ctx.lookahead().typed_literal(cur)
    }

    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Ok(Expr::Column(object_name(cur)?).into())
    }
}

/// Literal values.
///
/// Escape strings and dollar-quoted strings are lexed everywhere but only
/// accepted when the dialect enables them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralParser {
    /// Accept `$tag$...$tag$`.
    pub dollar_strings: bool,
    /// Accept `E'...'`.
    pub escape_strings: bool,
}

impl LiteralParser {
    /// The standard literal forms only.
    pub const STANDARD: Self = Self {
        dollar_strings: false,
        escape_strings: false,
    };

    /// Standard forms plus escape and dollar-quoted strings.
    pub const EXTENDED: Self = Self {
        dollar_strings: true,
        escape_strings: true,
    };
}

impl ParseHandler for LiteralParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        match cur.peek_kind(0) {
            TokenKind::Integer(_)
            | TokenKind::Decimal(_)
            | TokenKind::String(_)
            | TokenKind::EscapeString(_)
            | TokenKind::DollarString { .. }
            | TokenKind::Blob(_)
            | TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Null) => true,
            _ => ctx.lookahead().typed_literal(cur),
        }
    }

    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let token = cur.current().clone();
        let literal = match token.kind {
            TokenKind::Integer(value) => Literal::Integer(value),
            TokenKind::Decimal(text) => Literal::Decimal(text),
            TokenKind::String(value) => Literal::String(value),
            TokenKind::Blob(bytes) => Literal::Blob(bytes),
            TokenKind::EscapeString(raw) if self.escape_strings => Literal::EscapeString(raw),
            TokenKind::DollarString { tag, body } if self.dollar_strings => {
                Literal::DollarString { tag, body }
            }
            TokenKind::EscapeString(_) => {
                return Err(ParseError::new(
                    "escape string literals are not supported by this dialect",
                    token.span,
                ));
            }
            TokenKind::DollarString { .. } => {
                return Err(ParseError::new(
                    "dollar-quoted strings are not supported by this dialect",
                    token.span,
                ));
            }
            TokenKind::Keyword(Keyword::True) => Literal::Boolean(true),
            TokenKind::Keyword(Keyword::False) => Literal::Boolean(false),
            TokenKind::Keyword(Keyword::Null) => Literal::Null,
            TokenKind::Keyword(kw @ (Keyword::Date
            | Keyword::Time
            | Keyword::Timestamp
            | Keyword::Interval)) => {
                let kind = match kw {
                    Keyword::Date => TypedLiteralKind::Date,
                    Keyword::Time => TypedLiteralKind::Time,
                    Keyword::Timestamp => TypedLiteralKind::Timestamp,
                    _ => TypedLiteralKind::Interval,
                };
                cur.advance();
                let TokenKind::String(value) = cur.current().kind.clone() else {
                    return Err(ParseError::unexpected("string literal", cur.current()));
                };
                Literal::Typed { kind, value }
            }
            _ => return Err(ParseError::unexpected("literal", &token)),
        };
        cur.advance();
        Ok(Expr::Literal(literal).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::parser::{parse, standard_parsers, ParseErrorKind};

    fn expr(sql: &str) -> Expr {
        let config = ParserConfig::default();
        parse(&standard_parsers(), NodeKind::Expr, sql, &config).unwrap()
    }

    fn expr_err(sql: &str) -> ParseError {
        let config = ParserConfig::default();
        parse::<Expr>(&standard_parsers(), NodeKind::Expr, sql, &config).unwrap_err()
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        let e = expr("a + b * 2");
        let Expr::Binary { op, right, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_left_associative() {
        let e = expr("a - b - c");
        let Expr::Binary { left, op, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn test_concat_is_loosest() {
        let e = expr("a || b + 1");
        assert!(matches!(e, Expr::Binary { op: BinaryOp::Concat, .. }));
    }

    #[test]
    fn test_nested_kept() {
        let e = expr("(a + b) * 2");
        let Expr::Binary { left, .. } = e else {
            panic!("expected binary");
        };
        assert!(matches!(*left, Expr::Nested(_)));
    }

    #[test]
    fn test_unary() {
        assert!(matches!(expr("-a"), Expr::Unary { op: UnaryOp::Neg, .. }));
        assert!(matches!(expr("~a"), Expr::Unary { op: UnaryOp::BitNot, .. }));
        assert_eq!(expr("+a"), Expr::column("a"));
    }

    #[test]
    fn test_row_falls_through_nested() {
        let e = expr("(1, 2)");
        assert_eq!(e.arity(), 2);
        assert!(matches!(e, Expr::Row { explicit: false, .. }));
        assert!(matches!(expr("ROW(1)"), Expr::Row { explicit: true, .. }));
        assert_eq!(
            expr("ROW()"),
            Expr::Row {
                items: vec![],
                explicit: true,
            }
        );
        assert_eq!(expr("(a)"), Expr::column("a").nested());
    }

    #[test]
    fn test_parameters() {
        assert_eq!(expr("?"), Expr::Parameter(Parameter::Anonymous));
        assert_eq!(expr(":id"), Expr::Parameter(Parameter::Named("id".into())));
        assert_eq!(expr("$2"), Expr::Parameter(Parameter::Ordinal(2)));
    }

    #[test]
    fn test_function_decorations() {
        let e = expr(
            "count(DISTINCT x) FILTER (WHERE x > 0) \
             OVER (PARTITION BY g ORDER BY t ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)",
        );
        let Expr::Function(call) = e else {
            panic!("expected function");
        };
        assert!(call.distinct);
        assert!(call.filter.is_some());
        let Some(WindowSpec::Inline(window)) = call.over else {
            panic!("expected inline window");
        };
        assert_eq!(window.partition_by.len(), 1);
        let frame = window.frame.unwrap();
        assert_eq!(frame.start, FrameBound::UnboundedPreceding);
        assert_eq!(frame.end, Some(FrameBound::CurrentRow));
    }

    #[test]
    fn test_within_group() {
        let Expr::Function(call) = expr("percentile_cont(0.5) WITHIN GROUP (ORDER BY x)") else {
            panic!("expected function");
        };
        assert_eq!(call.within_group.len(), 1);
    }

    #[test]
    fn test_count_star_and_left() {
        let Expr::Function(call) = expr("count(*)") else {
            panic!("expected function");
        };
        assert_eq!(call.args, FunctionArgs::Star);
        let Expr::Function(call) = expr("LEFT(name, 2)") else {
            panic!("expected function");
        };
        assert_eq!(call.name.to_string(), "left");
    }

    #[test]
    fn test_case_forms() {
        let Expr::Case(case) = expr("CASE WHEN a > 1 THEN 'x' ELSE 'y' END") else {
            panic!("expected case");
        };
        assert!(matches!(*case, CaseExpr::Searched { .. }));
        let Expr::Case(case) = expr("CASE a WHEN 1 THEN 'x' END") else {
            panic!("expected case");
        };
        assert!(matches!(*case, CaseExpr::Simple { else_result: None, .. }));
    }

    #[test]
    fn test_cast_and_postfix() {
        assert!(matches!(
            expr("CAST(a AS VARCHAR(10))"),
            Expr::Cast {
                data_type: DataType::Varchar(Some(10)),
                shorthand: false,
                ..
            }
        ));
        assert!(matches!(expr("name COLLATE \"C\""), Expr::Collate { .. }));
        assert!(matches!(
            expr("ts AT TIME ZONE 'UTC'"),
            Expr::AtTimeZone { .. }
        ));
    }

    #[test]
    fn test_typed_literal_vs_column() {
        assert_eq!(
            expr("DATE '2024-01-01'"),
            Expr::Literal(Literal::Typed {
                kind: TypedLiteralKind::Date,
                value: "2024-01-01".into(),
            })
        );
        assert_eq!(expr("date"), Expr::column("date"));
    }

    #[test]
    fn test_dollar_strings_rejected() {
        let err = expr_err("$$x$$");
        assert_eq!(err.kind, ParseErrorKind::Syntax);
        assert!(err.message.contains("dollar-quoted"));
    }

    #[test]
    fn test_no_operand() {
        let err = expr_err("FROM");
        assert_eq!(err.expected.as_deref(), Some("expression"));
    }

    #[test]
    fn test_scalar_subquery() {
        assert!(matches!(expr("(SELECT 1)"), Expr::Subquery(_)));
    }
}
