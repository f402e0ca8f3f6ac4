//! FROM items, joins and GROUP BY items.

use std::sync::Arc;

use crate::ast::{
    Expr, GroupItem, InvariantError, Join, JoinKind, Node, NodeKind, Predicate, Query,
    TableAlias, TableRef,
};
use crate::lexer::{Keyword, TokenKind};

use super::{
    alias, comma_list, ident_list, object_name, Cursor, ParseContext, ParseError, ParseHandler,
    ParserRegistry,
};

pub(super) fn register(registry: &mut ParserRegistry) {
    registry.register(NodeKind::TableRef, Arc::new(TableRefParser));
    registry.register(NodeKind::Lateral, Arc::new(LateralParser));
    registry.register(NodeKind::SubqueryTable, Arc::new(SubqueryTableParser));
    registry.register(NodeKind::ValuesTable, Arc::new(ValuesTableParser));
    registry.register(NodeKind::FunctionTable, Arc::new(FunctionTableParser));
    registry.register(NodeKind::NamedTable, Arc::new(NamedTableParser));
    registry.register(NodeKind::Join, Arc::new(JoinParser));

    registry.register(NodeKind::GroupItem, Arc::new(GroupItemParser));
    registry.register(NodeKind::Rollup, Arc::new(GroupListParser::ROLLUP));
    registry.register(NodeKind::Cube, Arc::new(GroupListParser::CUBE));
    registry.register(NodeKind::GroupingSets, Arc::new(GroupingSetsParser));
    registry.register(NodeKind::GroupingSet, Arc::new(GroupingSetParser));
    registry.register(NodeKind::GroupExpr, Arc::new(GroupExprParser));

    registry.set_candidates(
        NodeKind::TableRef,
        vec![
            NodeKind::Lateral,
            NodeKind::SubqueryTable,
            NodeKind::ValuesTable,
            NodeKind::FunctionTable,
            NodeKind::NamedTable,
        ],
    );
    registry.set_candidates(
        NodeKind::GroupItem,
        vec![
            NodeKind::Rollup,
            NodeKind::Cube,
            NodeKind::GroupingSets,
            NodeKind::GroupingSet,
            NodeKind::GroupExpr,
        ],
    );
}

/// `[AS] alias [(col, ...)]`.
fn table_alias(cur: &mut Cursor<'_>) -> Result<Option<TableAlias>, ParseError> {
    let Some(name) = alias(cur)? else {
        return Ok(None);
    };
    let columns = if cur.check(&TokenKind::LeftParen) {
        ident_list(cur)?
    } else {
        Vec::new()
    };
    Ok(Some(TableAlias { name, columns }))
}

struct TableRefParser;

impl ParseHandler for TableRefParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        ctx.parse_alternatives::<TableRef>(NodeKind::TableRef, cur, "table reference")
            .map(Node::TableRef)
    }
}

/// `LATERAL (query)` or `LATERAL f(...)`.
struct LateralParser;

impl ParseHandler for LateralParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(Keyword::Lateral)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_keyword(Keyword::Lateral)?;
        let kind = if ctx.lookahead().subquery(cur, 0) {
            NodeKind::SubqueryTable
        } else {
            NodeKind::FunctionTable
        };
        if !ctx.matches(kind, cur)? {
            return Err(ParseError::unexpected(
                "subquery or function after LATERAL",
                cur.current(),
            ));
        }
        let inner: TableRef = ctx.parse(kind, cur)?;
        Ok(TableRef::Lateral(Box::new(inner)).into())
    }
}

/// `(query) [alias]`.
struct SubqueryTableParser;

impl ParseHandler for SubqueryTableParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        ctx.lookahead().subquery(cur, 0)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_left_paren()?;
        let query: Query = ctx.parse(NodeKind::Query, cur)?;
        cur.expect_right_paren()?;
        Ok(TableRef::Subquery {
            query: Box::new(query),
            alias: table_alias(cur)?,
        }
        .into())
    }
}

/// `(VALUES (...), (...)) [alias]`; every row must have the same width.
struct ValuesTableParser;

impl ParseHandler for ValuesTableParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check(&TokenKind::LeftParen) && cur.peek_keyword(1) == Some(Keyword::Values)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_left_paren()?;
        cur.expect_keyword(Keyword::Values)?;
        let mut rows: Vec<Vec<Expr>> = Vec::new();
        loop {
            let span = cur.current().span;
            cur.expect_left_paren()?;
            let row = comma_list(cur, |cur| ctx.parse(NodeKind::Expr, cur))?;
            cur.expect_right_paren()?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    let err = InvariantError::RowArity {
                        expected: first.len(),
                        found: row.len(),
                    };
                    return Err(ParseError::invariant(&err, span));
                }
            }
            rows.push(row);
            if !cur.consume_if(&TokenKind::Comma) {
                break;
            }
        }
        cur.expect_right_paren()?;
        Ok(TableRef::Values {
            rows,
            alias: table_alias(cur)?,
        }
        .into())
    }
}

/// `f(...) [WITH ORDINALITY] [alias]`.
struct FunctionTableParser;

impl ParseHandler for FunctionTableParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        ctx.lookahead().function_call(cur)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let span = cur.current().span;
        let expr: Expr = ctx.parse(NodeKind::Function, cur)?;
        let Expr::Function(call) = expr else {
            return Err(ParseError::new("expected a function call", span));
        };
        let with_ordinality = cur.check_keywords(&[Keyword::With, Keyword::Ordinality]);
        if with_ordinality {
            cur.advance();
            cur.advance();
        }
        Ok(TableRef::Function {
            call,
            with_ordinality,
            alias: table_alias(cur)?,
        }
        .into())
    }
}

/// `schema.table [alias]`.
struct NamedTableParser;

impl ParseHandler for NamedTableParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.current().is_identifier_like()
    }

    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let name = object_name(cur)?;
        Ok(TableRef::Named {
            name,
            alias: table_alias(cur)?,
        }
        .into())
    }
}

/// `CROSS JOIN t`, `NATURAL [kind] JOIN t` and
/// `[INNER | LEFT | RIGHT | FULL [OUTER]] JOIN t {ON p | USING (cols)}`.
struct JoinParser;

impl JoinParser {
    fn kind(cur: &mut Cursor<'_>) -> JoinKind {
        let kind = match cur.peek_keyword(0) {
            Some(Keyword::Inner) => JoinKind::Inner,
            Some(Keyword::Left) => JoinKind::Left,
            Some(Keyword::Right) => JoinKind::Right,
            Some(Keyword::Full) => JoinKind::Full,
            _ => return JoinKind::Inner,
        };
        cur.advance();
        if kind != JoinKind::Inner {
            cur.consume_keyword(Keyword::Outer);
        }
        kind
    }
}

impl ParseHandler for JoinParser {
    fn matches(&self, cur: &Cursor<'_>, ctx: &ParseContext<'_>) -> bool {
        ctx.lookahead().join_start(cur)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        if cur.consume_keyword(Keyword::Cross) {
            cur.expect_keyword(Keyword::Join)?;
            let table: TableRef = ctx.parse(NodeKind::TableRef, cur)?;
            return Ok(Join::Cross { table }.into());
        }
        let natural = cur.consume_keyword(Keyword::Natural);
        let kind = Self::kind(cur);
        cur.expect_keyword(Keyword::Join)?;
        let table: TableRef = ctx.parse(NodeKind::TableRef, cur)?;
        if natural {
            return Ok(Join::Natural { kind, table }.into());
        }
        if cur.consume_keyword(Keyword::On) {
            let condition: Predicate = ctx.parse(NodeKind::Predicate, cur)?;
            return Ok(Join::On {
                kind,
                table,
                condition,
            }
            .into());
        }
        if cur.consume_keyword(Keyword::Using) {
            let columns = ident_list(cur)?;
            return Ok(Join::Using {
                kind,
                table,
                columns,
            }
            .into());
        }
        Err(ParseError::unexpected("ON or USING", cur.current()))
    }
}

struct GroupItemParser;

impl ParseHandler for GroupItemParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        ctx.parse_alternatives::<GroupItem>(NodeKind::GroupItem, cur, "grouping item")
            .map(Node::GroupItem)
    }
}

fn paren_exprs(cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Vec<Expr>, ParseError> {
    cur.expect_left_paren()?;
    if cur.consume_if(&TokenKind::RightParen) {
        return Ok(Vec::new());
    }
    let exprs = comma_list(cur, |cur| ctx.parse(NodeKind::Expr, cur))?;
    cur.expect_right_paren()?;
    Ok(exprs)
}

/// `ROLLUP (...)` and `CUBE (...)`.
struct GroupListParser {
    keyword: Keyword,
    build: fn(Vec<Expr>) -> GroupItem,
}

impl GroupListParser {
    const ROLLUP: Self = Self {
        keyword: Keyword::Rollup,
        build: GroupItem::Rollup,
    };

    const CUBE: Self = Self {
        keyword: Keyword::Cube,
        build: GroupItem::Cube,
    };
}

impl ParseHandler for GroupListParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keyword(self.keyword) && matches!(cur.peek_kind(1), TokenKind::LeftParen)
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.expect_keyword(self.keyword)?;
        let exprs = paren_exprs(cur, ctx)?;
        if exprs.is_empty() {
            let err = InvariantError::Empty {
                construct: self.keyword.as_str(),
            };
            return Err(ParseError::invariant(&err, cur.current().span));
        }
        Ok((self.build)(exprs).into())
    }
}

/// `GROUPING SETS (item, ...)`.
struct GroupingSetsParser;

impl ParseHandler for GroupingSetsParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.check_keywords(&[Keyword::Grouping, Keyword::Sets])
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        cur.advance();
        cur.advance();
        cur.expect_left_paren()?;
        let items = comma_list(cur, |cur| ctx.parse(NodeKind::GroupItem, cur))?;
        cur.expect_right_paren()?;
        Ok(GroupItem::GroupingSets(items).into())
    }
}

/// A parenthesized grouping set such as `(a, b)` or `()`.
///
/// Only taken when the closing parenthesis ends the item; `(a + b) * 2` is
/// an ordinary expression.
struct GroupingSetParser;

impl GroupingSetParser {
    const fn ends_item(kind: &TokenKind) -> bool {
        match kind {
            TokenKind::Comma | TokenKind::RightParen | TokenKind::Semicolon | TokenKind::Eof => {
                true
            }
            TokenKind::Keyword(keyword) => matches!(
                keyword,
                Keyword::Having
                    | Keyword::Window
                    | Keyword::Order
                    | Keyword::Limit
                    | Keyword::Offset
                    | Keyword::Fetch
                    | Keyword::For
                    | Keyword::Union
                    | Keyword::Intersect
                    | Keyword::Except
            ),
            _ => false,
        }
    }
}

impl ParseHandler for GroupingSetParser {
    fn matches(&self, cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        cur.matching_paren(0)
            .is_some_and(|after| Self::ends_item(cur.peek_kind(after - cur.position())))
    }

    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Ok(GroupItem::Set(paren_exprs(cur, ctx)?).into())
    }
}

struct GroupExprParser;

impl ParseHandler for GroupExprParser {
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        Ok(GroupItem::Expr(ctx.parse(NodeKind::Expr, cur)?).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionArgs, Select};
    use crate::config::ParserConfig;
    use crate::parser::{parse, standard_parsers};

    fn select(sql: &str) -> Select {
        let query: Query = parse(
            &standard_parsers(),
            NodeKind::Query,
            sql,
            &ParserConfig::default(),
        )
        .unwrap();
        match query {
            Query::Select(select) => *select,
            other => panic!("expected SELECT, got {other:?}"),
        }
    }

    fn select_err(sql: &str) -> ParseError {
        parse::<Query>(
            &standard_parsers(),
            NodeKind::Query,
            sql,
            &ParserConfig::default(),
        )
        .unwrap_err()
    }

    #[test]
    fn test_named_table_aliases() {
        let s = select("SELECT 1 FROM public.users AS u (id, name), orders o");
        let TableRef::Named { name, alias } = &s.from[0] else {
            panic!("expected named table");
        };
        assert_eq!(name.parts().len(), 2);
        assert_eq!(alias.as_ref().unwrap().columns.len(), 2);
        let TableRef::Named {
            alias: Some(alias), ..
        } = &s.from[1]
        else {
            panic!("expected aliased table");
        };
        assert_eq!(alias.name.value, "o");
    }

    #[test]
    fn test_values_table() {
        let s = select("SELECT * FROM (VALUES (1, 'a'), (2, 'b')) AS v (n, s)");
        let TableRef::Values { rows, alias } = &s.from[0] else {
            panic!("expected VALUES");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(alias.as_ref().unwrap().columns.len(), 2);
        let err = select_err("SELECT * FROM (VALUES (1, 2), (3)) v");
        assert_eq!(err.message, "row value has 1 columns, expected 2");
    }

    #[test]
    fn test_function_table() {
        let s = select("SELECT * FROM generate_series(1, 3) WITH ORDINALITY AS g (n, i)");
        let TableRef::Function {
            call,
            with_ordinality,
            ..
        } = &s.from[0]
        else {
            panic!("expected table function");
        };
        assert!(with_ordinality);
        assert!(matches!(&call.args, FunctionArgs::List(args) if args.len() == 2));
    }

    #[test]
    fn test_lateral() {
        let s = select("SELECT * FROM t, LATERAL (SELECT * FROM u WHERE u.id = t.id) x");
        let TableRef::Lateral(inner) = &s.from[1] else {
            panic!("expected lateral");
        };
        assert!(matches!(**inner, TableRef::Subquery { .. }));
    }

    #[test]
    fn test_join_forms() {
        let s = select(
            "SELECT * FROM a \
             JOIN b ON a.id = b.id \
             LEFT OUTER JOIN c USING (id) \
             NATURAL FULL JOIN d \
             CROSS JOIN e \
             RIGHT JOIN f ON f.x = a.x AND f.y > 1",
        );
        assert_eq!(s.joins.len(), 5);
        assert!(matches!(s.joins[0], Join::On { kind: JoinKind::Inner, .. }));
        assert!(matches!(s.joins[1], Join::Using { kind: JoinKind::Left, .. }));
        assert!(matches!(s.joins[2], Join::Natural { kind: JoinKind::Full, .. }));
        assert!(matches!(s.joins[3], Join::Cross { .. }));
        let Join::On {
            kind: JoinKind::Right,
            condition: Predicate::And(parts),
            ..
        } = &s.joins[4]
        else {
            panic!("expected right join on a conjunction");
        };
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_join_needs_condition() {
        let err = select_err("SELECT * FROM a JOIN b WHERE x");
        assert_eq!(err.expected.as_deref(), Some("ON or USING"));
    }

    #[test]
    fn test_group_items() {
        let s = select(
            "SELECT 1 FROM t GROUP BY a, (b, c), (a + b) * 2, ROLLUP (a, b), CUBE (c), \
             GROUPING SETS ((a), ())",
        );
        assert!(matches!(s.group_by[0], GroupItem::Expr(_)));
        assert!(matches!(&s.group_by[1], GroupItem::Set(items) if items.len() == 2));
        assert!(matches!(s.group_by[2], GroupItem::Expr(Expr::Binary { .. })));
        assert!(matches!(s.group_by[3], GroupItem::Rollup(_)));
        assert!(matches!(s.group_by[4], GroupItem::Cube(_)));
        let GroupItem::GroupingSets(sets) = &s.group_by[5] else {
            panic!("expected GROUPING SETS");
        };
        assert_eq!(sets[1], GroupItem::Set(Vec::new()));
    }

    #[test]
    fn test_left_function_is_not_a_join() {
        let s = select("SELECT 1 FROM t WHERE LEFT(name, 1) = 'a' ORDER BY 1");
        assert!(s.joins.is_empty());
        assert!(s.where_clause.is_some());
    }
}
