//! Predicate renderers.
//!
//! AND and OR print one operand per line, each continuation led by its
//! connective. Operands of the same connective are flattened into the list;
//! a nested composite of the other connective goes in an indented block.

use std::sync::Arc;

use crate::ast::{LogicalOp, NodeKind, NodeRef, Predicate, TruthValue, ValueSet};
use crate::dialect::Operator;

use super::expr::write_exprs;
use super::{expect_node, Fragment, RenderContext, RenderError, RendererRegistry, SqlWriter};

pub(super) fn register(registry: &mut RendererRegistry) {
    registry.register(NodeKind::Comparison, Arc::new(render_comparison));
    registry.register(NodeKind::Quantified, Arc::new(render_quantified));
    registry.register(NodeKind::Between, Arc::new(render_between));
    registry.register(NodeKind::In, Arc::new(render_in));
    registry.register(NodeKind::Like, Arc::new(render_like));
    registry.register(NodeKind::IsNull, Arc::new(render_is_null));
    registry.register(NodeKind::Truth, Arc::new(render_truth));
    registry.register(NodeKind::And, Arc::new(render_composite));
    registry.register(NodeKind::Or, Arc::new(render_composite));
    registry.register(NodeKind::Not, Arc::new(render_not));
    registry.register(NodeKind::Exists, Arc::new(render_exists));
    registry.register(NodeKind::DistinctFrom, Arc::new(render_distinct_from));
    registry.register(NodeKind::Regex, Arc::new(render_regex));

    registry.register(NodeKind::SubquerySet, Arc::new(render_value_set));
    registry.register(NodeKind::RowSet, Arc::new(render_value_set));
    registry.register(NodeKind::RowListSet, Arc::new(render_value_set));
}

/// Writes `fragment` between parentheses, on its own indented lines when it
/// spans several.
pub fn write_block(fragment: &Fragment, w: &mut SqlWriter) {
    w.append("(");
    if fragment.is_multiline() {
        w.indented(|w| {
            w.newline();
            w.write_fragment(fragment);
        });
        w.newline();
    } else {
        w.write_fragment(fragment);
    }
    w.append(")");
}

fn render_comparison(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::Comparison { left, op, right })
    );
    let symbol = ctx.operator(Operator::Comparison(*op))?;
    ctx.render(left, w)?;
    w.space();
    w.append(symbol);
    w.space();
    ctx.render(right, w)
}

fn render_quantified(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::Quantified {
            left,
            op,
            quantifier,
            right,
        })
    );
    let symbol = ctx.operator(Operator::Comparison(*op))?;
    ctx.render(left, w)?;
    w.space();
    w.append(symbol);
    w.space();
    w.keyword(quantifier.as_str());
    w.space();
    ctx.render(right, w)
}

fn render_between(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::Between {
            expr,
            low,
            high,
            negated,
            symmetric,
        })
    );
    ctx.render(expr, w)?;
    w.space();
    if *negated {
        w.keyword(ctx.operator(Operator::Not)?);
        w.space();
    }
    w.keyword("BETWEEN");
    w.space();
    if *symmetric {
        w.keyword("SYMMETRIC");
        w.space();
    }
    ctx.render(low, w)?;
    w.space();
    w.keyword(ctx.operator(Operator::And)?);
    w.space();
    ctx.render(high, w)
}

fn render_in(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::In { expr, set, negated })
    );
    let symbol = ctx.operator(if *negated { Operator::NotIn } else { Operator::In })?;
    ctx.render(expr, w)?;
    w.space();
    w.keyword(symbol);
    w.space();
    ctx.render(set, w)
}

fn render_like(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::Like {
            expr,
            pattern,
            escape,
            negated,
            case_insensitive,
        })
    );
    let op = match (*case_insensitive, *negated) {
        (false, false) => Operator::Like,
        (false, true) => Operator::NotLike,
        (true, false) => Operator::ILike,
        (true, true) => Operator::NotILike,
    };
    let symbol = ctx.operator(op)?;
    ctx.render(expr, w)?;
    w.space();
    w.keyword(symbol);
    w.space();
    ctx.render(pattern, w)?;
    if let Some(escape) = escape {
        w.space();
        w.keyword("ESCAPE");
        w.space();
        ctx.render(escape, w)?;
    }
    Ok(())
}

fn render_is_null(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::IsNull { expr, negated })
    );
    ctx.render(expr, w)?;
    w.space();
    w.keyword(if *negated { "IS NOT NULL" } else { "IS NULL" });
    Ok(())
}

fn render_truth(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Predicate(Predicate::Truth { expr, test }));
    ctx.render(expr, w)?;
    if let Some(test) = test {
        w.space();
        w.keyword(if test.negated { "IS NOT" } else { "IS" });
        w.space();
        match &test.value {
            TruthValue::True => w.keyword("TRUE"),
            TruthValue::False => w.keyword("FALSE"),
            TruthValue::Unknown => w.keyword("UNKNOWN"),
            TruthValue::Named(name) => w.append(&ctx.ident(name)),
        }
    }
    Ok(())
}

fn render_composite(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Predicate(predicate));
    let Some((op, operands)) = predicate.as_composite() else {
        return Err(RenderContext::mismatch(node));
    };
    if operands.is_empty() {
        // The identity of the connective.
        w.keyword(match op {
            LogicalOp::And => "TRUE",
            LogicalOp::Or => "FALSE",
        });
        return Ok(());
    }
    let connective = ctx.operator(match op {
        LogicalOp::And => Operator::And,
        LogicalOp::Or => Operator::Or,
    })?;
    let mut first = true;
    write_operands(op, connective, operands, &mut first, ctx, w)
}

fn write_operands(
    op: LogicalOp,
    connective: &'static str,
    operands: &[Predicate],
    first: &mut bool,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    for operand in operands {
        let nested = operand.as_composite();
        if let Some((inner, grandchildren)) = nested {
            if inner == op && !grandchildren.is_empty() {
                write_operands(op, connective, grandchildren, first, ctx, w)?;
                continue;
            }
        }
        if !*first {
            w.newline();
            w.keyword(connective);
            w.space();
        }
        *first = false;
        let fragment = ctx.capture(operand, w)?;
        match nested {
            Some((_, grandchildren)) if !grandchildren.is_empty() => write_block(&fragment, w),
            _ => w.write_fragment(&fragment),
        }
    }
    Ok(())
}

fn render_not(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Predicate(Predicate::Not(inner)));
    w.keyword(ctx.operator(Operator::Not)?);
    w.space();
    let fragment = ctx.capture(&**inner, w)?;
    write_block(&fragment, w);
    Ok(())
}

fn render_exists(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::Exists { query, negated })
    );
    if *negated {
        w.keyword(ctx.operator(Operator::Not)?);
        w.space();
    }
    w.keyword("EXISTS");
    w.append(" (");
    w.inline(|w| ctx.render(&**query, w))?;
    w.append(")");
    Ok(())
}

fn render_distinct_from(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::DistinctFrom {
            left,
            right,
            negated,
        })
    );
    ctx.render(left, w)?;
    w.space();
    w.keyword(if *negated {
        "IS NOT DISTINCT FROM"
    } else {
        "IS DISTINCT FROM"
    });
    w.space();
    ctx.render(right, w)
}

fn render_regex(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Predicate(Predicate::Regex { expr, op, pattern })
    );
    let symbol = ctx.operator(Operator::Regex(*op))?;
    ctx.render(expr, w)?;
    w.space();
    w.append(symbol);
    w.space();
    ctx.render(pattern, w)
}

fn render_value_set(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::ValueSet(set));
    w.append("(");
    match set {
        ValueSet::Subquery(query) => w.inline(|w| ctx.render(&**query, w))?,
        ValueSet::Row(items) => write_exprs(items, ctx, w)?,
        ValueSet::Rows(rows) => w.comma_join(rows, |row, w| {
            w.append("(");
            write_exprs(row, ctx, w)?;
            w.append(")");
            Ok::<(), RenderError>(())
        })?,
    }
    w.append(")");
    Ok(())
}
