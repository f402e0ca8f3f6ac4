//! Query grammar: WITH, set operations, SELECT blocks and their clauses.

use std::sync::Arc;

use crate::ast::{
    CompositeQuery, Cte, Distinct, Expr, InvariantError, LockClause, LockStrength, LockWait,
    NamedWindow, Node, NodeKind, NullOrdering, OrderDirection, OrderItem, Pagination, Query,
    Select, SelectItem, SetOpKind, SetOperator, WithQuery,
};
use crate::lexer::{Keyword, Span, TokenKind};

use super::{
    alias, comma_list, ident_list, object_name, Cursor, ParseContext, ParseError, ParseHandler,
    ParserRegistry, WindowSpecParser,
};

pub(super) fn register(registry: &mut ParserRegistry) {
    registry.register(NodeKind::Query, Arc::new(QueryParser));
    registry.register(NodeKind::CompositeQuery, Arc::new(CompositeQueryParser));
    registry.register(NodeKind::AtomicQuery, Arc::new(AtomicQueryParser));
    registry.register(NodeKind::Select, Arc::new(SelectParser));
    registry.register(NodeKind::SelectItem, Arc::new(SelectItemParser));
    registry.register(
        NodeKind::DistinctSpec,
        Arc::new(DistinctSpecParser::STANDARD),
    );
    registry.register(NodeKind::OrderItem, Arc::new(OrderItemParser));
    registry.register(NodeKind::Pagination, Arc::new(PaginationParser));
    registry.register(NodeKind::LockClause, Arc::new(LockClauseParser::STANDARD));
    registry.register(NodeKind::NamedWindow, Arc::new(NamedWindowParser));
}

/// `[WITH [RECURSIVE] cte, ...] composite`.
struct QueryParser;

impl QueryParser {
    fn cte(cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Cte, ParseError> {
        let name = cur.expect_ident()?;
        let columns = if cur.check(&TokenKind::LeftParen) {
            ident_list(cur)?
        } else {
            Vec::new()
        };
        cur.expect_keyword(Keyword::As)?;
        cur.expect_left_paren()?;
        let query: Query = ctx.parse(NodeKind::Query, cur)?;
        cur.expect_right_paren()?;
        Ok(Cte {
            name,
            columns,
            query,
        })
    }
}

impl ParseHandler for QueryParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        if !cur.check_keyword(Keyword::With) {
            return ctx.parse_node(NodeKind::CompositeQuery, cur);
        }
        let span = cur.expect_keyword(Keyword::With)?;
        let recursive = cur.consume_keyword(Keyword::Recursive);
        let ctes = comma_list(cur, |cur| Self::cte(cur, ctx))?;
        let body: Query = ctx.parse(NodeKind::CompositeQuery, cur)?;
        WithQuery::new(recursive, ctes, body)
            .map(|with| Query::With(Box::new(with)).into())
            .map_err(|err| ParseError::invariant(&err, span))
    }
}

/// Query terms joined by UNION, INTERSECT and EXCEPT.
///
/// ORDER BY and pagination written after the last term belong to the whole
/// composite, unless the last term is parenthesized. A lone parenthesized
/// SELECT followed by a tail absorbs it.
struct CompositeQueryParser;

/// A parsed term and where it started.
struct Term {
    query: Query,
    span: Span,
    parenthesized: bool,
}

impl CompositeQueryParser {
    fn set_operator(cur: &mut Cursor<'_>) -> Option<SetOperator> {
        let kind = match cur.peek_keyword(0) {
            Some(Keyword::Union) => SetOpKind::Union,
            Some(Keyword::Intersect) => SetOpKind::Intersect,
            Some(Keyword::Except) => SetOpKind::Except,
            _ => return None,
        };
        cur.advance();
        let all = cur.consume_keyword(Keyword::All);
        if !all {
            cur.consume_keyword(Keyword::Distinct);
        }
        Some(SetOperator { kind, all })
    }

    fn absorb_tail(
        term: Term,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Query, ParseError> {
        let (order_by, pagination) = tail(cur, ctx)?;
        if order_by.is_empty() && pagination.is_empty() {
            return Ok(term.query);
        }
        if term.query.has_tail() {
            return Err(ParseError::new(
                "query already has ORDER BY, LIMIT or OFFSET",
                term.span,
            ));
        }
        match term.query {
            Query::Select(mut select) => {
                select.order_by = order_by;
                select.limit = pagination.limit;
                select.offset = pagination.offset;
                Ok(Query::Select(select))
            }
            Query::Composite(composite) => CompositeQuery::new(
                composite.terms().to_vec(),
                composite.operators().to_vec(),
                order_by,
                pagination,
            )
            .map(|c| Query::Composite(Box::new(c)))
            .map_err(|err| ParseError::invariant(&err, term.span)),
            Query::With(_) => Err(ParseError::new(
                "ORDER BY and pagination must go inside a parenthesized WITH query",
                term.span,
            )),
        }
    }
}

impl ParseHandler for CompositeQueryParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let mut terms = Vec::new();
        let mut operators = Vec::new();
        loop {
            let span = cur.current().span;
            let parenthesized = cur.check(&TokenKind::LeftParen);
            let query: Query = ctx.parse(NodeKind::AtomicQuery, cur)?;
            terms.push(Term {
                query,
                span,
                parenthesized,
            });
            match Self::set_operator(cur) {
                Some(op) => operators.push(op),
                None => break,
            }
        }

        if terms.len() == 1 {
            let Some(term) = terms.pop() else {
                return Err(ParseError::unexpected("query", cur.current()));
            };
            if term.parenthesized {
                return Self::absorb_tail(term, cur, ctx).map(Node::Query);
            }
            return Ok(term.query.into());
        }

        let last = terms.len() - 1;
        if let Some(index) = terms[..last].iter().position(|t| t.query.has_tail()) {
            return Err(ParseError::invariant(
                &InvariantError::TermTail { index },
                terms[index].span,
            ));
        }

        let (order_by, pagination) = match &mut terms[last] {
            Term {
                query: Query::Select(select),
                parenthesized: false,
                ..
            } if select.has_tail() => {
                let order_by = std::mem::take(&mut select.order_by);
                let pagination = Pagination {
                    limit: select.limit.take(),
                    offset: select.offset.take(),
                };
                (order_by, pagination)
            }
            _ => tail(cur, ctx)?,
        };

        let spans: Vec<Span> = terms.iter().map(|t| t.span).collect();
        let queries = terms.into_iter().map(|t| t.query).collect();
        CompositeQuery::new(queries, operators, order_by, pagination)
            .map(|composite| Query::Composite(Box::new(composite)).into())
            .map_err(|err| {
                let span = match err {
                    InvariantError::TermTail { index } => spans[index],
                    _ => spans[0],
                };
                ParseError::invariant(&err, span)
            })
    }
}

/// Parses a trailing `ORDER BY ... [pagination]`.
fn tail(
    cur: &mut Cursor<'_>,
    ctx: &mut ParseContext<'_>,
) -> Result<(Vec<OrderItem>, Pagination), ParseError> {
    let order_by = order_by(cur, ctx)?;
    let pagination = if ctx.matches(NodeKind::Pagination, cur)? {
        ctx.parse(NodeKind::Pagination, cur)?
    } else {
        Pagination::default()
    };
    Ok((order_by, pagination))
}

fn order_by(
    cur: &mut Cursor<'_>,
    ctx: &mut ParseContext<'_>,
) -> Result<Vec<OrderItem>, ParseError> {
    if !cur.check_keywords(&[Keyword::Order, Keyword::By]) {
        return Ok(Vec::new());
    }
    cur.advance();
    cur.advance();
    comma_list(cur, |cur| ctx.parse(NodeKind::OrderItem, cur))
}

/// `( query )` or a SELECT block.
struct AtomicQueryParser;

impl ParseHandler for AtomicQueryParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        if cur.consume_if(&TokenKind::LeftParen) {
            let query = ctx.parse_node(NodeKind::Query, cur)?;
            cur.expect_right_paren()?;
            return Ok(query);
        }
        if !cur.check_keyword(Keyword::Select) {
            return Err(ParseError::unexpected("SELECT", cur.current()));
        }
        ctx.parse_node(NodeKind::Select, cur)
    }
}

/// A SELECT block with its clauses in standard order.
struct SelectParser;

impl ParseHandler for SelectParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_keyword(Keyword::Select)?;
        let mut select = Select::default();
        if ctx.matches(NodeKind::DistinctSpec, cur)? {
            select.distinct = Some(ctx.parse(NodeKind::DistinctSpec, cur)?);
        }
        select.items = comma_list(cur, |cur| ctx.parse(NodeKind::SelectItem, cur))?;

        if cur.consume_keyword(Keyword::From) {
            select.from = comma_list(cur, |cur| ctx.parse(NodeKind::TableRef, cur))?;
            while ctx.lookahead().join_start(cur) {
                select.joins.push(ctx.parse(NodeKind::Join, cur)?);
            }
        }
        if cur.consume_keyword(Keyword::Where) {
            select.where_clause = Some(ctx.parse(NodeKind::Predicate, cur)?);
        }
        if cur.check_keywords(&[Keyword::Group, Keyword::By]) {
            cur.advance();
            cur.advance();
            select.group_by = comma_list(cur, |cur| ctx.parse(NodeKind::GroupItem, cur))?;
        }
        if cur.consume_keyword(Keyword::Having) {
            select.having = Some(ctx.parse(NodeKind::Predicate, cur)?);
        }
        if cur.consume_keyword(Keyword::Window) {
            select.windows = comma_list(cur, |cur| ctx.parse(NodeKind::NamedWindow, cur))?;
        }
        let (order_by, pagination) = tail(cur, ctx)?;
        select.order_by = order_by;
        select.limit = pagination.limit;
        select.offset = pagination.offset;
        if ctx.matches(NodeKind::LockClause, cur)? {
            select.lock = Some(ctx.parse(NodeKind::LockClause, cur)?);
        }
        Ok(Query::from(select).into())
    }
}

/// `*`, `t.*` or `expr [[AS] alias]`.
struct SelectItemParser;

impl ParseHandler for SelectItemParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        if cur.consume_if(&TokenKind::Star) {
            return Ok(SelectItem::Wildcard.into());
        }
        if ctx.lookahead().qualified_wildcard(cur) {
            let name = object_name(cur)?;
            cur.expect(&[TokenKind::Dot])?;
            cur.expect(&[TokenKind::Star])?;
            return Ok(SelectItem::QualifiedWildcard(name).into());
        }
        let expr: Expr = ctx.parse(NodeKind::Expr, cur)?;
        let alias = alias(cur)?;
        Ok(SelectItem::Expr { expr, alias }.into())
    }
}

/// `ALL`, `DISTINCT` and, where enabled, `DISTINCT ON (exprs)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistinctSpecParser {
    /// Accept `DISTINCT ON`.
    pub allow_on: bool,
}

impl DistinctSpecParser {
    /// `ALL` and `DISTINCT` only.
    pub const STANDARD: Self = Self { allow_on: false };

    /// Also `DISTINCT ON (...)`.
    pub const WITH_ON: Self = Self { allow_on: true };
}

impl ParseHandler for DistinctSpecParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        matches!(cur.peek_keyword(0), Some(Keyword::Distinct | Keyword::All))
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        if cur.consume_keyword(Keyword::All) {
            return Ok(Distinct::All.into());
        }
        cur.expect_keyword(Keyword::Distinct)?;
        if !cur.check_keyword(Keyword::On) {
            return Ok(Distinct::Distinct.into());
        }
        if !self.allow_on {
            return Err(ParseError::new(
                "DISTINCT ON is not supported by this dialect",
                cur.current().span,
            ));
        }
        cur.advance();
        cur.expect_left_paren()?;
        let exprs = comma_list(cur, |cur| ctx.parse(NodeKind::Expr, cur))?;
        cur.expect_right_paren()?;
        Ok(Distinct::On(exprs).into())
    }
}

/// `expr [ASC | DESC] [NULLS FIRST | NULLS LAST]`.
struct OrderItemParser;

impl ParseHandler for OrderItemParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let mut item = OrderItem::new(ctx.parse(NodeKind::Expr, cur)?);
        item.direction = match cur.peek_keyword(0) {
            Some(Keyword::Asc) => Some(OrderDirection::Asc),
            Some(Keyword::Desc) => Some(OrderDirection::Desc),
            _ => None,
        };
        if item.direction.is_some() {
            cur.advance();
        }
        if cur.consume_keyword(Keyword::Nulls) {
            item.nulls = Some(match cur.expect_one_of(&[Keyword::First, Keyword::Last])? {
                Keyword::First => NullOrdering::First,
                _ => NullOrdering::Last,
            });
        }
        Ok(item.into())
    }
}

/// `LIMIT n`, `OFFSET m [ROW | ROWS]` and `FETCH {FIRST | NEXT} [n] {ROW |
/// ROWS} ONLY`, in any order, each at most once.
struct PaginationParser;

impl PaginationParser {
    fn count(cur: &mut Cursor<'_>, clause: &str) -> Result<i64, ParseError> {
        let negative = cur.consume_if(&TokenKind::Minus);
        let token = cur.current().clone();
        let TokenKind::Integer(value) = token.kind else {
            return Err(ParseError::unexpected(format!("{clause} count"), &token));
        };
        cur.advance();
        Ok(if negative { -value } else { value })
    }
}

impl ParseHandler for PaginationParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        matches!(
            cur.peek_keyword(0),
            Some(Keyword::Limit | Keyword::Offset | Keyword::Fetch)
        )
    }

    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let start = cur.current().span;
        let mut limit = None;
        let mut offset = None;
        loop {
            match cur.peek_keyword(0) {
                Some(Keyword::Limit) if limit.is_none() => {
                    cur.advance();
                    limit = Some(Self::count(cur, "LIMIT")?);
                }
                Some(Keyword::Offset) if offset.is_none() => {
                    cur.advance();
                    offset = Some(Self::count(cur, "OFFSET")?);
                    if !cur.consume_keyword(Keyword::Rows) {
                        cur.consume_keyword(Keyword::Row);
                    }
                }
                Some(Keyword::Fetch) if limit.is_none() => {
                    cur.advance();
                    cur.expect_one_of(&[Keyword::First, Keyword::Next])?;
                    limit = Some(match cur.peek_keyword(0) {
                        Some(Keyword::Row | Keyword::Rows) => 1,
                        _ => Self::count(cur, "FETCH")?,
                    });
                    cur.expect_one_of(&[Keyword::Row, Keyword::Rows])?;
                    cur.expect_keyword(Keyword::Only)?;
                }
                _ => break,
            }
        }
        Pagination::new(limit, offset)
            .map(Node::Pagination)
            .map_err(|err| ParseError::invariant(&err, start.to(cur.current().span)))
    }
}

/// `FOR UPDATE | SHARE [OF t, ...] [NOWAIT | SKIP LOCKED]`; the extended
/// form adds `NO KEY UPDATE` and `KEY SHARE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockClauseParser {
    /// Accept the `NO KEY UPDATE` and `KEY SHARE` strengths.
    pub extended: bool,
}

impl LockClauseParser {
    /// `FOR UPDATE` and `FOR SHARE`.
    pub const STANDARD: Self = Self { extended: false };

    /// All four lock strengths.
    pub const EXTENDED: Self = Self { extended: true };

    fn strength(self, cur: &mut Cursor<'_>) -> Result<LockStrength, ParseError> {
        let strength = match cur.peek_keyword(0) {
            Some(Keyword::Update) => LockStrength::Update,
            Some(Keyword::Share) => LockStrength::Share,
            Some(Keyword::No) if self.extended => {
                cur.advance();
                cur.expect_keyword(Keyword::Key)?;
                cur.expect_keyword(Keyword::Update)?;
                return Ok(LockStrength::NoKeyUpdate);
            }
            Some(Keyword::Key) if self.extended => {
                cur.advance();
                cur.expect_keyword(Keyword::Share)?;
                return Ok(LockStrength::KeyShare);
            }
            _ => return Err(ParseError::unexpected("UPDATE or SHARE", cur.current())),
        };
        cur.advance();
        Ok(strength)
    }
}

impl ParseHandler for LockClauseParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::For)
    }

    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_keyword(Keyword::For)?;
        let strength = self.strength(cur)?;
        let of = if cur.consume_keyword(Keyword::Of) {
            comma_list(cur, object_name)?
        } else {
            Vec::new()
        };
        let wait = if cur.consume_keyword(Keyword::Nowait) {
            Some(LockWait::Nowait)
        } else if cur.consume_keyword(Keyword::Skip) {
            cur.expect_keyword(Keyword::Locked)?;
            Some(LockWait::SkipLocked)
        } else {
            None
        };
        Ok(LockClause { strength, of, wait }.into())
    }
}

/// `name AS (definition)` in a WINDOW clause.
struct NamedWindowParser;

impl ParseHandler for NamedWindowParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let name = cur.expect_ident()?;
        cur.expect_keyword(Keyword::As)?;
        cur.expect_left_paren()?;
        let definition = WindowSpecParser::definition(cur, ctx)?;
        cur.expect_right_paren()?;
        Ok(NamedWindow { name, definition }.into())
    }
}
