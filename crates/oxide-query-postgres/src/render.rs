//! PostgreSQL renderers for the constructs standard SQL spells differently
//! or cannot spell at all.

use std::sync::Arc;

use oxide_query_core::ast::{DataType, Expr, Literal, NodeKind, NodeRef};
use oxide_query_core::render::{
    write_data_type, write_literal, write_operand, RenderContext, RenderError, RendererRegistry,
    SqlWriter,
};

use crate::parser::is_standard_symbol;

/// Replaces the standard renderers PostgreSQL overrides.
pub fn register(registry: &mut RendererRegistry) {
    registry.register(NodeKind::Literal, Arc::new(render_literal));
    registry.register(NodeKind::Cast, Arc::new(render_cast));
    registry.register(NodeKind::DataType, Arc::new(render_data_type));
    registry.register(NodeKind::Slice, Arc::new(render_slice));
    registry.register(NodeKind::VendorBinary, Arc::new(render_vendor_binary));
}

/// Keeps `E'...'` and `$tag$...$tag$` strings in their source form.
fn render_literal(
    node: NodeRef<'_>,
    _ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let NodeRef::Expr(Expr::Literal(literal)) = node else {
        return Err(RenderContext::mismatch(node));
    };
    match literal {
        Literal::EscapeString(raw) => w.append(&format!("E'{raw}'")),
        Literal::DollarString { tag, body } => w.append(&format!("${tag}${body}${tag}$")),
        other => write_literal(other, w),
    }
    Ok(())
}

fn render_cast(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let NodeRef::Expr(Expr::Cast {
        expr,
        data_type,
        shorthand,
    }) = node
    else {
        return Err(RenderContext::mismatch(node));
    };
    if *shorthand {
        write_operand(expr, 5, ctx, w)?;
        w.append("::");
        return ctx.render(data_type, w);
    }
    w.keyword("CAST");
    w.append("(");
    ctx.render(&**expr, w)?;
    w.space();
    w.keyword("AS");
    w.space();
    ctx.render(data_type, w)?;
    w.append(")");
    Ok(())
}

/// Arrays use the bracket suffix: `INTEGER[]`.
fn render_data_type(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let NodeRef::DataType(data_type) = node else {
        return Err(RenderContext::mismatch(node));
    };
    if let DataType::Array(inner) = data_type {
        ctx.render(&**inner, w)?;
        w.append("[]");
        return Ok(());
    }
    write_data_type(data_type, ctx, w)
}

fn render_slice(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let NodeRef::Expr(Expr::Slice { expr, lower, upper }) = node else {
        return Err(RenderContext::mismatch(node));
    };
    write_operand(expr, 5, ctx, w)?;
    w.append("[");
    if let Some(lower) = lower {
        ctx.render(&**lower, w)?;
    }
    w.append(":");
    if let Some(upper) = upper {
        ctx.render(&**upper, w)?;
    }
    w.append("]");
    Ok(())
}

/// Writes `a @> b`, or `a OPERATOR(s.op) b` when the operator is schema
/// qualified or would otherwise read as a standard operator.
fn render_vendor_binary(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let NodeRef::Expr(Expr::VendorBinary {
        left,
        operator,
        right,
    }) = node
    else {
        return Err(RenderContext::mismatch(node));
    };
    write_operand(left, 1, ctx, w)?;
    w.space();
    if operator.schema.is_none() && !is_standard_symbol(&operator.symbol) {
        w.append(&operator.symbol);
    } else {
        w.keyword("OPERATOR");
        w.append("(");
        if let Some(schema) = &operator.schema {
            w.append(&ctx.ident(schema));
            w.append(".");
        }
        w.append(&operator.symbol);
        w.append(")");
    }
    w.space();
    write_operand(right, 2, ctx, w)
}
