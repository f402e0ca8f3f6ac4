//! Query renderers: SELECT, set operations, WITH.

use std::sync::Arc;

use crate::ast::{
    CompositeQuery, Distinct, LockClause, LockStrength, LockWait, NodeKind, NodeRef, NullOrdering,
    OrderItem, Query, Select, SelectItem, WithQuery,
};
use crate::dialect::PaginationStyle;

use super::expr::{write_exprs, write_window_definition};
use super::{expect_node, RenderContext, RenderError, RendererRegistry, SqlWriter};

pub(super) fn register(registry: &mut RendererRegistry) {
    registry.register(NodeKind::Select, Arc::new(render_select));
    registry.register(NodeKind::Composite, Arc::new(render_composite_query));
    registry.register(NodeKind::With, Arc::new(render_with));
}

/// Writes ORDER BY items, applying the dialect's null-ordering policy.
///
/// # Errors
///
/// Propagates the first sort key that fails.
pub fn write_order_items(
    items: &[OrderItem],
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    w.comma_join(items, |item, w| write_order_item(item, ctx, w))
}

fn write_order_item(
    item: &OrderItem,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let dialect = ctx.dialect();
    let default_nulls = dialect.default_nulls(item.effective_direction());
    let nulls = item
        .nulls
        .filter(|nulls| dialect.supports_nulls_ordering() || *nulls != default_nulls);
    if let Some(nulls) = nulls {
        if !dialect.supports_nulls_ordering() {
            // Sort on a NULL flag first.
            let (null_rank, value_rank) = match nulls {
                NullOrdering::First => ("0", "1"),
                NullOrdering::Last => ("1", "0"),
            };
            w.keyword("CASE WHEN");
            w.space();
            ctx.render(&item.expr, w)?;
            w.space();
            w.keyword("IS NULL THEN");
            w.append(&format!(" {null_rank} "));
            w.keyword("ELSE");
            w.append(&format!(" {value_rank} "));
            w.keyword("END");
            w.append(", ");
        }
    }
    ctx.render(&item.expr, w)?;
    if let Some(direction) = item.direction {
        w.space();
        w.keyword(direction.as_str());
    }
    if let Some(nulls) = nulls {
        if dialect.supports_nulls_ordering() {
            w.space();
            w.keyword(nulls.as_str());
        }
    }
    Ok(())
}

/// Writes the trailing LIMIT/OFFSET of a query in the dialect's style. TOP
/// is written by the SELECT head, so this only validates it.
fn write_pagination(
    limit: Option<u64>,
    offset: Option<u64>,
    ordered: bool,
    ctx: &RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    if limit.is_none() && offset.is_none() {
        return Ok(());
    }
    match ctx.dialect().pagination() {
        PaginationStyle::LimitOffset => {
            w.newline();
            if let Some(limit) = limit {
                w.keyword("LIMIT");
                w.append(&format!(" {limit}"));
                if offset.is_some() {
                    w.space();
                }
            }
            if let Some(offset) = offset {
                w.keyword("OFFSET");
                w.append(&format!(" {offset}"));
            }
        }
        PaginationStyle::OffsetFetch => {
            if !ordered {
                return Err(RenderError::MissingOrderBy {
                    dialect: ctx.dialect().name(),
                });
            }
            w.newline();
            w.keyword("OFFSET");
            w.append(&format!(" {} ", offset.unwrap_or(0)));
            w.keyword("ROWS");
            if let Some(limit) = limit {
                w.space();
                w.keyword("FETCH NEXT");
                w.append(&format!(" {limit} "));
                w.keyword("ROWS ONLY");
            }
        }
        PaginationStyle::Top => {
            if offset.is_some() {
                return Err(ctx.unsupported_pagination("OFFSET together with TOP"));
            }
        }
        PaginationStyle::None => return Err(ctx.unsupported_pagination("LIMIT or OFFSET")),
    }
    Ok(())
}

/// Writes a SELECT with all of its clauses.
///
/// # Errors
///
/// Fails if a clause or the pagination request cannot be expressed.
pub fn write_select(
    select: &Select,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    w.keyword("SELECT");
    match &select.distinct {
        None => {}
        Some(Distinct::All) => {
            w.space();
            w.keyword("ALL");
        }
        Some(Distinct::Distinct) => {
            w.space();
            w.keyword("DISTINCT");
        }
        Some(Distinct::On(exprs)) => {
            if !ctx.dialect().supports_distinct_on() {
                return Err(ctx.unsupported("DISTINCT ON"));
            }
            w.space();
            w.keyword("DISTINCT ON");
            w.append(" (");
            write_exprs(exprs, ctx, w)?;
            w.append(")");
        }
    }
    if ctx.dialect().pagination() == PaginationStyle::Top {
        if select.offset.is_some() {
            return Err(ctx.unsupported_pagination("OFFSET together with TOP"));
        }
        if let Some(limit) = select.limit {
            w.space();
            w.keyword("TOP");
            w.append(&format!(" {limit}"));
        }
    }
    w.space();
    w.comma_join(&select.items, |item, w| write_select_item(item, ctx, w))?;

    if !select.from.is_empty() {
        w.newline();
        w.keyword("FROM");
        w.space();
        w.comma_join(&select.from, |table, w| ctx.render(table, w))?;
    }
    for join in &select.joins {
        w.newline();
        ctx.render(join, w)?;
    }
    if let Some(predicate) = &select.where_clause {
        w.newline();
        w.keyword("WHERE");
        w.space();
        ctx.render(predicate, w)?;
    }
    if !select.group_by.is_empty() {
        w.newline();
        w.keyword("GROUP BY");
        w.space();
        w.comma_join(&select.group_by, |item, w| ctx.render(item, w))?;
    }
    if let Some(predicate) = &select.having {
        w.newline();
        w.keyword("HAVING");
        w.space();
        ctx.render(predicate, w)?;
    }
    if !select.windows.is_empty() {
        w.newline();
        w.keyword("WINDOW");
        w.space();
        w.comma_join(&select.windows, |window, w| {
            w.append(&ctx.ident(&window.name));
            w.space();
            w.keyword("AS");
            w.append(" (");
            write_window_definition(&window.definition, ctx, w)?;
            w.append(")");
            Ok::<(), RenderError>(())
        })?;
    }
    if !select.order_by.is_empty() {
        w.newline();
        w.keyword("ORDER BY");
        w.space();
        write_order_items(&select.order_by, ctx, w)?;
    }
    write_pagination(
        select.limit,
        select.offset,
        !select.order_by.is_empty(),
        ctx,
        w,
    )?;
    if let Some(lock) = &select.lock {
        write_lock(lock, ctx, w)?;
    }
    Ok(())
}

fn write_select_item(
    item: &SelectItem,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    match item {
        SelectItem::Wildcard => w.append("*"),
        SelectItem::QualifiedWildcard(name) => {
            w.append(&ctx.object_name(name));
            w.append(".*");
        }
        SelectItem::Expr { expr, alias } => {
            ctx.render(expr, w)?;
            if let Some(alias) = alias {
                w.space();
                w.keyword("AS");
                w.space();
                w.append(&ctx.ident(alias));
            }
        }
    }
    Ok(())
}

fn write_lock(
    lock: &LockClause,
    ctx: &RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let key_lock = matches!(
        lock.strength,
        LockStrength::NoKeyUpdate | LockStrength::KeyShare
    );
    if key_lock && !ctx.dialect().supports_key_locks() {
        return Err(ctx.unsupported(format!("FOR {}", lock.strength.as_str())));
    }
    w.newline();
    w.keyword("FOR");
    w.space();
    w.keyword(lock.strength.as_str());
    if !lock.of.is_empty() {
        w.space();
        w.keyword("OF");
        w.space();
        let names: Vec<String> = lock.of.iter().map(|name| ctx.object_name(name)).collect();
        w.append(&names.join(", "));
    }
    match lock.wait {
        Some(LockWait::Nowait) => {
            w.space();
            w.keyword("NOWAIT");
        }
        Some(LockWait::SkipLocked) => {
            w.space();
            w.keyword("SKIP LOCKED");
        }
        None => {}
    }
    Ok(())
}

fn render_select(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Query(Query::Select(select)));
    write_select(select, ctx, w)
}

/// Writes a query in parentheses on its own indented lines.
fn write_query_block(
    query: &Query,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    w.append("(");
    w.indented(|w| {
        w.newline();
        ctx.render(query, w)
    })?;
    w.newline();
    w.append(")");
    Ok(())
}

fn write_composite(
    composite: &CompositeQuery,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let paginated = composite.limit().is_some() || composite.offset().is_some();
    if paginated && ctx.dialect().pagination() == PaginationStyle::Top {
        return Err(ctx.unsupported_pagination("a set operation with TOP"));
    }
    let Some((first, rest)) = composite.terms().split_first() else {
        return Ok(());
    };
    write_term(first, ctx, w)?;
    for (op, term) in composite.operators().iter().zip(rest) {
        w.newline();
        w.keyword(op.as_str());
        w.newline();
        write_term(term, ctx, w)?;
    }
    if !composite.order_by().is_empty() {
        w.newline();
        w.keyword("ORDER BY");
        w.space();
        write_order_items(composite.order_by(), ctx, w)?;
    }
    write_pagination(
        composite.limit(),
        composite.offset(),
        !composite.order_by().is_empty(),
        ctx,
        w,
    )
}

/// Writes a composite term; nested set operations and WITH go in a block.
fn write_term(
    term: &Query,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    match term {
        Query::Select(_) => ctx.render(term, w),
        Query::Composite(_) | Query::With(_) => write_query_block(term, ctx, w),
    }
}

fn render_composite_query(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Query(Query::Composite(composite)));
    write_composite(composite, ctx, w)
}

fn write_with(
    with: &WithQuery,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    w.keyword("WITH");
    if with.recursive {
        w.space();
        w.keyword("RECURSIVE");
    }
    w.space();
    for (i, cte) in with.ctes.iter().enumerate() {
        if i > 0 {
            w.append(",");
            w.newline();
        }
        w.append(&ctx.ident(&cte.name));
        if !cte.columns.is_empty() {
            let columns: Vec<String> = cte.columns.iter().map(|c| ctx.ident(c)).collect();
            w.append(&format!(" ({})", columns.join(", ")));
        }
        w.space();
        w.keyword("AS");
        w.space();
        write_query_block(&cte.query, ctx, w)?;
    }
    w.newline();
    ctx.render(&with.body, w)
}

fn render_with(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Query(Query::With(with)));
    write_with(with, ctx, w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, OrderDirection, Pagination, SetOpKind, SetOperator, TableRef};
    use crate::dialect::{Dialect, SqlDialect};

    fn reformat(sql: &str) -> String {
        let dialect = SqlDialect::ansi();
        dialect.render(&dialect.parse_query(sql).unwrap()).unwrap()
    }

    #[derive(Debug)]
    struct LimitDialect;

    impl Dialect for LimitDialect {
        fn name(&self) -> &'static str {
            "limit"
        }

        fn pagination(&self) -> PaginationStyle {
            PaginationStyle::LimitOffset
        }

        fn supports_nulls_ordering(&self) -> bool {
            false
        }
    }

    fn limit_dialect() -> SqlDialect {
        SqlDialect::ansi().extend().policy(LimitDialect).build()
    }

    fn paged(limit: Option<u64>, offset: Option<u64>, ordered: bool) -> Query {
        let mut select = Select::new(vec![SelectItem::Wildcard]);
        select.from.push(TableRef::table("t"));
        select.limit = limit;
        select.offset = offset;
        if ordered {
            select.order_by.push(OrderItem::new(Expr::column("id")));
        }
        select.into()
    }

    #[test]
    fn test_clause_layout() {
        assert_eq!(
            reformat(
                "select distinct a, b as total from t join u on t.id = u.id where a = 1 and b > 2 \
                 group by a having count(*) > 1 order by a desc nulls last"
            ),
            "SELECT DISTINCT a, b AS total\nFROM t\nJOIN u ON t.id = u.id\nWHERE a = 1\nAND b > 2\n\
             GROUP BY a\nHAVING count(*) > 1\nORDER BY a DESC NULLS LAST"
        );
    }

    #[test]
    fn test_offset_fetch() {
        let dialect = SqlDialect::ansi();
        assert_eq!(
            dialect.render(&paged(Some(5), Some(10), true)).unwrap(),
            "SELECT *\nFROM t\nORDER BY id\nOFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
        );
        assert_eq!(
            dialect.render(&paged(Some(5), None, true)).unwrap(),
            "SELECT *\nFROM t\nORDER BY id\nOFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
        );
        assert_eq!(
            dialect.render(&paged(Some(5), None, false)).unwrap_err(),
            RenderError::MissingOrderBy { dialect: "ansi" }
        );
    }

    #[test]
    fn test_limit_offset() {
        let dialect = limit_dialect();
        assert_eq!(
            dialect.render(&paged(Some(5), Some(10), false)).unwrap(),
            "SELECT *\nFROM t\nLIMIT 5 OFFSET 10"
        );
        assert_eq!(
            dialect.render(&paged(None, Some(10), false)).unwrap(),
            "SELECT *\nFROM t\nOFFSET 10"
        );
    }

    #[test]
    fn test_null_ordering_emulation() {
        let dialect = limit_dialect();
        let query = dialect
            .parse_query("SELECT a FROM t ORDER BY a NULLS FIRST, b DESC NULLS FIRST")
            .unwrap();
        assert_eq!(
            dialect.render(&query).unwrap(),
            "SELECT a\nFROM t\nORDER BY CASE WHEN a IS NULL THEN 0 ELSE 1 END, a, b DESC"
        );
    }

    #[test]
    fn test_set_operations() {
        let sql = "SELECT a FROM t UNION ALL (SELECT a FROM u EXCEPT SELECT a FROM v) ORDER BY 1";
        assert_eq!(
            reformat(sql),
            "SELECT a\nFROM t\nUNION ALL\n(\n  SELECT a\n  FROM u\n  EXCEPT\n  \
             SELECT a\n  FROM v\n)\nORDER BY 1"
        );
    }

    #[test]
    fn test_composite_pagination() {
        let term = || -> Query { Select::new(vec![SelectItem::Wildcard]).into() };
        let union = SetOperator {
            kind: SetOpKind::Union,
            all: false,
        };
        let composite = CompositeQuery::new(
            vec![term(), term()],
            vec![union],
            vec![OrderItem {
                expr: Expr::integer(1),
                direction: Some(OrderDirection::Asc),
                nulls: None,
            }],
            Pagination::new(Some(3), None).unwrap(),
        )
        .unwrap();
        let query = Query::Composite(Box::new(composite));
        assert_eq!(
            limit_dialect().render(&query).unwrap(),
            "SELECT *\nUNION\nSELECT *\nORDER BY 1 ASC\nLIMIT 3"
        );
    }

    #[test]
    fn test_with_and_lock() {
        let sql = "WITH RECURSIVE r (n) AS (SELECT 1) SELECT n FROM r FOR UPDATE OF r SKIP LOCKED";
        assert_eq!(
            reformat(sql),
            "WITH RECURSIVE r (n) AS (\n  SELECT 1\n)\nSELECT n\nFROM r\n\
             FOR UPDATE OF r SKIP LOCKED"
        );
    }

    #[test]
    fn test_named_window() {
        assert_eq!(
            reformat("SELECT sum(x) OVER w FROM t WINDOW w AS (PARTITION BY g)"),
            "SELECT sum(x) OVER w\nFROM t\nWINDOW w AS (PARTITION BY g)"
        );
    }

    #[test]
    fn test_distinct_on_rejected() {
        let mut select = Select::new(vec![SelectItem::Wildcard]);
        select.distinct = Some(Distinct::On(vec![Expr::column("a")]));
        let err = SqlDialect::ansi().render(&Query::from(select)).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnsupportedConstruct {
                dialect: "ansi",
                construct: "DISTINCT ON".into()
            }
        );
    }
}
