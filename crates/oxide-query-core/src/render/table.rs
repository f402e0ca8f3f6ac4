//! FROM items, joins and GROUP BY items.

use std::sync::Arc;

use crate::ast::{GroupItem, Join, NodeKind, NodeRef, TableAlias, TableRef};

use super::expr::{write_call, write_exprs};
use super::{expect_node, RenderContext, RenderError, RendererRegistry, SqlWriter};

pub(super) fn register(registry: &mut RendererRegistry) {
    for kind in [
        NodeKind::NamedTable,
        NodeKind::SubqueryTable,
        NodeKind::ValuesTable,
        NodeKind::FunctionTable,
        NodeKind::Lateral,
    ] {
        registry.register(kind, Arc::new(render_table));
    }
    for kind in [
        NodeKind::OnJoin,
        NodeKind::UsingJoin,
        NodeKind::NaturalJoin,
        NodeKind::CrossJoin,
    ] {
        registry.register(kind, Arc::new(render_join));
    }
    for kind in [
        NodeKind::GroupExpr,
        NodeKind::Rollup,
        NodeKind::Cube,
        NodeKind::GroupingSets,
        NodeKind::GroupingSet,
    ] {
        registry.register(kind, Arc::new(render_group_item));
    }
}

fn write_alias(alias: Option<&TableAlias>, ctx: &RenderContext<'_>, w: &mut SqlWriter) {
    let Some(alias) = alias else {
        return;
    };
    w.space();
    w.keyword("AS");
    w.space();
    w.append(&ctx.ident(&alias.name));
    if !alias.columns.is_empty() {
        let columns: Vec<String> = alias.columns.iter().map(|c| ctx.ident(c)).collect();
        w.append(&format!(" ({})", columns.join(", ")));
    }
}

fn render_table(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::TableRef(table));
    match table {
        TableRef::Named { name, alias } => {
            w.append(&ctx.object_name(name));
            write_alias(alias.as_ref(), ctx, w);
        }
        TableRef::Subquery { query, alias } => {
            w.append("(");
            w.indented(|w| {
                w.newline();
                ctx.render(&**query, w)
            })?;
            w.newline();
            w.append(")");
            write_alias(alias.as_ref(), ctx, w);
        }
        TableRef::Values { rows, alias } => {
            w.append("(");
            w.keyword("VALUES");
            w.space();
            w.comma_join(rows, |row, w| {
                w.append("(");
                write_exprs(row, ctx, w)?;
                w.append(")");
                Ok::<(), RenderError>(())
            })?;
            w.append(")");
            write_alias(alias.as_ref(), ctx, w);
        }
        TableRef::Function {
            call,
            with_ordinality,
            alias,
        } => {
            write_call(call, ctx, w)?;
            if *with_ordinality {
                w.space();
                w.keyword("WITH ORDINALITY");
            }
            write_alias(alias.as_ref(), ctx, w);
        }
        TableRef::Lateral(inner) => {
            w.keyword("LATERAL");
            w.space();
            ctx.render(&**inner, w)?;
        }
    }
    Ok(())
}

fn render_join(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Join(join));
    match join {
        Join::On {
            kind,
            table,
            condition,
        } => {
            w.keyword(kind.as_str());
            w.space();
            ctx.render(table, w)?;
            w.space();
            w.keyword("ON");
            w.space();
            // Join conditions stay on the join's line.
            w.inline(|w| ctx.render(condition, w))?;
        }
        Join::Using {
            kind,
            table,
            columns,
        } => {
            w.keyword(kind.as_str());
            w.space();
            ctx.render(table, w)?;
            w.space();
            w.keyword("USING");
            let columns: Vec<String> = columns.iter().map(|c| ctx.ident(c)).collect();
            w.append(&format!(" ({})", columns.join(", ")));
        }
        Join::Natural { kind, table } => {
            w.keyword("NATURAL");
            w.space();
            w.keyword(kind.as_str());
            w.space();
            ctx.render(table, w)?;
        }
        Join::Cross { table } => {
            w.keyword("CROSS JOIN");
            w.space();
            ctx.render(table, w)?;
        }
    }
    Ok(())
}

fn render_group_item(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::GroupItem(item));
    let (keyword, exprs) = match item {
        GroupItem::Expr(expr) => return ctx.render(expr, w),
        GroupItem::GroupingSets(sets) => {
            w.keyword("GROUPING SETS");
            w.append(" (");
            w.comma_join(sets, |set, w| ctx.render(set, w))?;
            w.append(")");
            return Ok(());
        }
        GroupItem::Rollup(exprs) => (Some("ROLLUP"), exprs),
        GroupItem::Cube(exprs) => (Some("CUBE"), exprs),
        GroupItem::Set(exprs) => (None, exprs),
    };
    if let Some(keyword) = keyword {
        w.keyword(keyword);
        w.space();
    }
    w.append("(");
    write_exprs(exprs, ctx, w)?;
    w.append(")");
    Ok(())
}
