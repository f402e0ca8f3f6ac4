//! Expression renderers.
//!
//! Parentheses come from two places: `Expr::Nested` nodes the parser kept,
//! and operand precedence, so trees built without `Nested` still render
//! with their intended grouping.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::ast::{
    BinaryOp, CaseExpr, DataType, Expr, FrameBound, FunctionArgs, FunctionCall, Literal, NodeKind,
    NodeRef, Parameter, WindowDefinition, WindowFrame, WindowSpec,
};
use crate::dialect::Operator;

use super::query::write_order_items;
use super::{expect_node, RenderContext, RenderError, RendererRegistry, SqlWriter};

pub(super) fn register(registry: &mut RendererRegistry) {
    registry.register(NodeKind::Literal, Arc::new(render_literal));
    registry.register(NodeKind::ColumnRef, Arc::new(render_column));
    registry.register(NodeKind::Binary, Arc::new(render_binary));
    registry.register(NodeKind::Unary, Arc::new(render_unary));
    registry.register(NodeKind::Case, Arc::new(render_case));
    registry.register(NodeKind::Cast, Arc::new(render_cast));
    registry.register(NodeKind::Function, Arc::new(render_function));
    registry.register(NodeKind::AnonymousParameter, Arc::new(render_parameter));
    registry.register(NodeKind::NamedParameter, Arc::new(render_parameter));
    registry.register(NodeKind::OrdinalParameter, Arc::new(render_parameter));
    registry.register(NodeKind::Subquery, Arc::new(render_subquery));
    registry.register(NodeKind::Row, Arc::new(render_row));
    registry.register(NodeKind::Subscript, Arc::new(render_subscript));
    registry.register(NodeKind::Slice, Arc::new(render_slice));
    registry.register(NodeKind::Collate, Arc::new(render_collate));
    registry.register(NodeKind::AtTimeZone, Arc::new(render_at_time_zone));
    registry.register(NodeKind::VendorBinary, Arc::new(render_vendor_binary));
    registry.register(NodeKind::Nested, Arc::new(render_nested));
    registry.register(NodeKind::DataType, Arc::new(render_data_type));
}

/// Renders `expr`, parenthesized if it binds looser than `min_precedence`.
///
/// # Errors
///
/// Propagates the render error of `expr`.
pub fn write_operand(
    expr: &Expr,
    min_precedence: u8,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    if expr.precedence() < min_precedence {
        w.append("(");
        ctx.render(expr, w)?;
        w.append(")");
        Ok(())
    } else {
        ctx.render(expr, w)
    }
}

/// Renders a comma-separated expression list.
///
/// # Errors
///
/// Stops at the first element that fails.
pub fn write_exprs(
    exprs: &[Expr],
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    w.comma_join(exprs, |expr, w| ctx.render(expr, w))
}

/// Quotes a string as a standard SQL literal.
#[must_use]
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Resolves the backslash sequences of an escape string body.
#[must_use]
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('b') => out.push('\u{8}'),
                Some('f') => out.push('\u{c}'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            other => out.push(other),
        }
    }
    out
}

/// Writes a literal in standard SQL. Escape and dollar-quoted strings become
/// ordinary string literals.
pub fn write_literal(literal: &Literal, w: &mut SqlWriter) {
    match literal {
        Literal::Integer(value) => w.append(&value.to_string()),
        Literal::Decimal(text) => w.append(text),
        Literal::String(value) | Literal::DollarString { body: value, .. } => {
            w.append(&quote_string(value));
        }
        Literal::EscapeString(raw) => w.append(&quote_string(&unescape(raw))),
        Literal::Blob(bytes) => {
            let mut text = String::from("X'");
            for byte in bytes {
                let _ = write!(text, "{byte:02X}");
            }
            text.push('\'');
            w.append(&text);
        }
        Literal::Boolean(true) => w.keyword("TRUE"),
        Literal::Boolean(false) => w.keyword("FALSE"),
        Literal::Null => w.keyword("NULL"),
        Literal::Typed { kind, value } => {
            w.keyword(kind.as_str());
            w.space();
            w.append(&quote_string(value));
        }
    }
}

fn render_literal(
    node: NodeRef<'_>,
    _ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Literal(literal)));
    write_literal(literal, w);
    Ok(())
}

fn render_column(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Column(name)));
    w.append(&ctx.object_name(name));
    Ok(())
}

fn render_binary(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Binary { left, op, right }));
    let symbol = match op {
        BinaryOp::Mod => {
            if ctx.dialect().operator(Operator::Mod).is_none() {
                w.keyword("MOD");
                w.append("(");
                ctx.render(&**left, w)?;
                w.append(", ");
                ctx.render(&**right, w)?;
                w.append(")");
                return Ok(());
            }
            ctx.operator(Operator::Mod)?
        }
        BinaryOp::Concat => ctx.operator(Operator::Concat)?,
        other => other.as_str(),
    };
    let precedence = op.precedence();
    write_operand(left, precedence, ctx, w)?;
    w.append(" ");
    w.append(symbol);
    w.append(" ");
    write_operand(right, precedence + 1, ctx, w)
}

fn render_unary(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Unary { op, operand }));
    let symbol = op.as_str();
    let fragment = w.capture(|scratch| write_operand(operand, 4, ctx, scratch))?;
    w.append(symbol);
    // `--` would start a comment.
    if fragment.as_str().starts_with(['-', '~']) {
        w.space();
    }
    w.write_fragment(&fragment);
    Ok(())
}

fn render_case(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Case(case)));
    w.inline(|w| {
        w.keyword("CASE");
        let else_result = match &**case {
            CaseExpr::Simple {
                operand,
                whens,
                else_result,
            } => {
                w.space();
                ctx.render(operand, w)?;
                for (value, result) in whens {
                    w.space();
                    w.keyword("WHEN");
                    w.space();
                    ctx.render(value, w)?;
                    w.space();
                    w.keyword("THEN");
                    w.space();
                    ctx.render(result, w)?;
                }
                else_result
            }
            CaseExpr::Searched { whens, else_result } => {
                for (condition, result) in whens {
                    w.space();
                    w.keyword("WHEN");
                    w.space();
                    ctx.render(condition, w)?;
                    w.space();
                    w.keyword("THEN");
                    w.space();
                    ctx.render(result, w)?;
                }
                else_result
            }
        };
        if let Some(else_result) = else_result {
            w.space();
            w.keyword("ELSE");
            w.space();
            ctx.render(else_result, w)?;
        }
        w.space();
        w.keyword("END");
        Ok(())
    })
}

fn render_cast(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(
        node,
        NodeRef::Expr(Expr::Cast {
            expr, data_type, ..
        })
    );
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

/// Writes a function call with its aggregate and window decorations.
///
/// # Errors
///
/// Propagates the first argument or clause that fails.
pub fn write_call(
    call: &FunctionCall,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    w.inline(|w| {
        w.append(&ctx.function_name(&call.name));
        w.append("(");
        match &call.args {
            FunctionArgs::Star => w.append("*"),
            FunctionArgs::List(args) => {
                if call.distinct {
                    w.keyword("DISTINCT");
                    w.space();
                }
                write_exprs(args, ctx, w)?;
            }
        }
        w.append(")");
        if !call.within_group.is_empty() {
            w.space();
            w.keyword("WITHIN GROUP");
            w.append(" (");
            w.keyword("ORDER BY");
            w.space();
            write_order_items(&call.within_group, ctx, w)?;
            w.append(")");
        }
        if let Some(filter) = &call.filter {
            w.space();
            w.keyword("FILTER");
            w.append(" (");
            w.keyword("WHERE");
            w.space();
            ctx.render(&**filter, w)?;
            w.append(")");
        }
        match &call.over {
            Some(WindowSpec::Named(name)) => {
                w.space();
                w.keyword("OVER");
                w.space();
                w.append(&ctx.ident(name));
            }
            Some(WindowSpec::Inline(definition)) => {
                w.space();
                w.keyword("OVER");
                w.append(" (");
                write_window_definition(definition, ctx, w)?;
                w.append(")");
            }
            None => {}
        }
        Ok(())
    })
}

fn render_function(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Function(call)));
    write_call(call, ctx, w)
}

/// Writes the inside of a window's parentheses.
///
/// # Errors
///
/// Propagates the first part that fails.
pub fn write_window_definition(
    definition: &WindowDefinition,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    let mut started = false;
    if let Some(base) = &definition.base {
        w.append(&ctx.ident(base));
        started = true;
    }
    if !definition.partition_by.is_empty() {
        if started {
            w.space();
        }
        w.keyword("PARTITION BY");
        w.space();
        write_exprs(&definition.partition_by, ctx, w)?;
        started = true;
    }
    if !definition.order_by.is_empty() {
        if started {
            w.space();
        }
        w.keyword("ORDER BY");
        w.space();
        write_order_items(&definition.order_by, ctx, w)?;
        started = true;
    }
    if let Some(frame) = &definition.frame {
        if started {
            w.space();
        }
        write_frame(frame, ctx, w)?;
    }
    Ok(())
}

fn write_frame(
    frame: &WindowFrame,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    w.keyword(frame.units.as_str());
    w.space();
    if let Some(end) = &frame.end {
        w.keyword("BETWEEN");
        w.space();
        write_frame_bound(&frame.start, ctx, w)?;
        w.space();
        w.keyword("AND");
        w.space();
        write_frame_bound(end, ctx, w)
    } else {
        write_frame_bound(&frame.start, ctx, w)
    }
}

fn write_frame_bound(
    bound: &FrameBound,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    match bound {
        FrameBound::UnboundedPreceding => w.keyword("UNBOUNDED PRECEDING"),
        FrameBound::CurrentRow => w.keyword("CURRENT ROW"),
        FrameBound::UnboundedFollowing => w.keyword("UNBOUNDED FOLLOWING"),
        FrameBound::Preceding(offset) => {
            ctx.render(&**offset, w)?;
            w.space();
            w.keyword("PRECEDING");
        }
        FrameBound::Following(offset) => {
            ctx.render(&**offset, w)?;
            w.space();
            w.keyword("FOLLOWING");
        }
    }
    Ok(())
}

fn render_parameter(
    node: NodeRef<'_>,
    _ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Parameter(parameter)));
    match parameter {
        Parameter::Anonymous => w.append("?"),
        Parameter::Named(name) => w.append(&format!(":{name}")),
        Parameter::Ordinal(n) => w.append(&format!("${n}")),
    }
    Ok(())
}

fn render_subquery(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Subquery(query)));
    w.append("(");
    w.inline(|w| ctx.render(&**query, w))?;
    w.append(")");
    Ok(())
}

fn render_row(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Row { items, explicit }));
    if *explicit {
        w.keyword("ROW");
    }
    w.append("(");
    write_exprs(items, ctx, w)?;
    w.append(")");
    Ok(())
}

fn render_subscript(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Subscript { expr, index }));
    write_operand(expr, 5, ctx, w)?;
    w.append("[");
    ctx.render(&**index, w)?;
    w.append("]");
    Ok(())
}

fn render_slice(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    _w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Slice { .. }));
    Err(ctx.unsupported("array slices"))
}

fn render_collate(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Collate { expr, collation }));
    write_operand(expr, 5, ctx, w)?;
    w.space();
    w.keyword("COLLATE");
    w.space();
    w.append(&ctx.object_name(collation));
    Ok(())
}

fn render_at_time_zone(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::AtTimeZone { expr, zone }));
    write_operand(expr, 5, ctx, w)?;
    w.space();
    w.keyword("AT TIME ZONE");
    w.space();
    write_operand(zone, 6, ctx, w)
}

fn render_vendor_binary(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    _w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::VendorBinary { operator, .. }));
    Err(ctx.unsupported(format!("operator {}", operator.symbol)))
}

fn render_nested(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::Expr(Expr::Nested(inner)));
    w.append("(");
    ctx.render(&**inner, w)?;
    w.append(")");
    Ok(())
}

/// Writes a data type in standard spelling; arrays use the `ARRAY` suffix.
///
/// # Errors
///
/// Propagates the error of an array's element type.
pub fn write_data_type(
    data_type: &DataType,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    match data_type {
        DataType::Array(inner) => {
            ctx.render(&**inner, w)?;
            w.space();
            w.keyword("ARRAY");
        }
        DataType::Custom { name, modifiers } => {
            w.append(&ctx.object_name(name));
            if !modifiers.is_empty() {
                let list: Vec<String> = modifiers.iter().map(u32::to_string).collect();
                w.append(&format!("({})", list.join(", ")));
            }
        }
        other => w.keyword(&other.to_sql()),
    }
    Ok(())
}

fn render_data_type(
    node: NodeRef<'_>,
    ctx: &mut RenderContext<'_>,
    w: &mut SqlWriter,
) -> Result<(), RenderError> {
    expect_node!(node, NodeRef::DataType(data_type));
    write_data_type(data_type, ctx, w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ident, ObjectName, TypedLiteralKind, UnaryOp, VendorOperator};
    use crate::dialect::SqlDialect;

    fn ansi(expr: &Expr) -> String {
        SqlDialect::ansi().render(expr).unwrap()
    }

    fn reformat(sql: &str) -> String {
        let dialect = SqlDialect::ansi();
        dialect.render(&dialect.parse_expr(sql).unwrap()).unwrap()
    }

    #[test]
    fn test_parser_parentheses_survive() {
        assert_eq!(reformat("(a + b) * 2"), "(a + b) * 2");
        assert_eq!(reformat("a + b * 2"), "a + b * 2");
        assert_eq!(reformat("a - (b - c)"), "a - (b - c)");
    }

    #[test]
    fn test_precedence_parentheses_for_built_trees() {
        let sum = Expr::column("a").binary(BinaryOp::Add, Expr::column("b"));
        assert_eq!(
            ansi(&sum.clone().binary(BinaryOp::Mul, Expr::integer(2))),
            "(a + b) * 2"
        );
        let right = Expr::column("b").binary(BinaryOp::Sub, Expr::column("c"));
        assert_eq!(
            ansi(&Expr::column("a").binary(BinaryOp::Sub, right)),
            "a - (b - c)"
        );
        assert_eq!(
            ansi(&sum.binary(BinaryOp::Sub, Expr::column("c"))),
            "a + b - c"
        );
    }

    #[test]
    fn test_mod_without_native_operator() {
        assert_eq!(reformat("a * b / c % 2"), "MOD(a * b / c, 2)");
    }

    #[test]
    fn test_unary_spacing() {
        let twice = Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Expr::integer(1)),
            }),
        };
        assert_eq!(ansi(&twice), "- -1");
        assert_eq!(reformat("-(a + 1)"), "-(a + 1)");
        assert_eq!(reformat("~flags"), "~flags");
    }

    #[test]
    fn test_literals() {
        assert_eq!(reformat("'it''s'"), "'it''s'");
        assert_eq!(reformat("X'0aff'"), "X'0AFF'");
        assert_eq!(reformat("date '2024-01-02'"), "DATE '2024-01-02'");
        assert_eq!(reformat("null"), "NULL");
        assert_eq!(reformat("1.50"), "1.50");
        let typed = Expr::Literal(Literal::Typed {
            kind: TypedLiteralKind::Interval,
            value: "1 day".into(),
        });
        assert_eq!(ansi(&typed), "INTERVAL '1 day'");
    }

    #[test]
    fn test_vendor_strings_become_standard() {
        let escaped = Expr::Literal(Literal::EscapeString("a\\nb\\'c''d".into()));
        assert_eq!(ansi(&escaped), "'a\nb''c''d'");
        let dollar = Expr::Literal(Literal::DollarString {
            tag: "fn".into(),
            body: "it's".into(),
        });
        assert_eq!(ansi(&dollar), "'it''s'");
    }

    #[test]
    fn test_cast_and_types() {
        assert_eq!(reformat("CAST(a AS varchar(10))"), "CAST(a AS VARCHAR(10))");
        assert_eq!(reformat("CAST(a AS int array)"), "CAST(a AS INTEGER ARRAY)");
        assert_eq!(
            reformat("CAST(p AS geo.\"Point\"(4326))"),
            "CAST(p AS geo.\"Point\"(4326))"
        );
    }

    #[test]
    fn test_functions_and_windows() {
        assert_eq!(reformat("count(*)"), "count(*)");
        assert_eq!(reformat("COUNT(DISTINCT a)"), "COUNT(DISTINCT a)");
        assert_eq!(
            reformat("sum(x) FILTER (WHERE x > 0 AND y < 1) OVER w"),
            "sum(x) FILTER (WHERE x > 0 AND y < 1) OVER w"
        );
        let window = "row_number() over (partition by a order by b desc \
                      rows between unbounded preceding and current row)";
        assert_eq!(
            reformat(window),
            "row_number() OVER (PARTITION BY a ORDER BY b DESC \
             ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"
        );
        assert_eq!(
            reformat("percentile_cont(0.5) WITHIN GROUP (ORDER BY x)"),
            "percentile_cont(0.5) WITHIN GROUP (ORDER BY x)"
        );
        assert_eq!(reformat("left(name, 2)"), "left(name, 2)");
    }

    #[test]
    fn test_case_parameters_rows() {
        assert_eq!(
            reformat("CASE WHEN a > 1 THEN 'x' ELSE 'y' END"),
            "CASE WHEN a > 1 THEN 'x' ELSE 'y' END"
        );
        assert_eq!(
            reformat("case kind when 1 then 'a' end"),
            "CASE kind WHEN 1 THEN 'a' END"
        );
        assert_eq!(reformat("?"), "?");
        assert_eq!(reformat(":name"), ":name");
        assert_eq!(reformat("$2"), "$2");
        assert_eq!(reformat("(a, b)"), "(a, b)");
        assert_eq!(reformat("ROW(1, 2)"), "ROW(1, 2)");
    }

    #[test]
    fn test_postfix_forms() {
        assert_eq!(reformat("name COLLATE \"C\""), "name COLLATE \"C\"");
        assert_eq!(
            reformat("ts AT TIME ZONE 'UTC'"),
            "ts AT TIME ZONE 'UTC'"
        );
        assert_eq!(reformat("(a || b) COLLATE c"), "(a || b) COLLATE c");
    }

    #[test]
    fn test_quoting_is_preserved() {
        assert_eq!(reformat("\"Order\".\"select\""), "\"Order\".\"select\"");
        assert_eq!(reformat("t.id"), "t.id");
    }

    #[test]
    fn test_subquery_is_inline() {
        assert_eq!(
            reformat("(SELECT max(x) FROM t WHERE a = 1 AND b = 2)"),
            "(SELECT max(x) FROM t WHERE a = 1 AND b = 2)"
        );
    }

    #[test]
    fn test_vendor_constructs_rejected() {
        let slice = Expr::Slice {
            expr: Box::new(Expr::column("a")),
            lower: None,
            upper: Some(Box::new(Expr::integer(2))),
        };
        let err = SqlDialect::ansi().render(&slice).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnsupportedConstruct {
                dialect: "ansi",
                construct: "array slices".into()
            }
        );
        let custom = Expr::VendorBinary {
            left: Box::new(Expr::column("a")),
            operator: VendorOperator {
                schema: Some(Ident::new("pg_catalog")),
                symbol: "@>".into(),
            },
            right: Box::new(Expr::column("b")),
        };
        assert!(SqlDialect::ansi().render(&custom).is_err());
        let subscript = Expr::Subscript {
            expr: Box::new(Expr::Column(ObjectName::from_dotted("t.tags"))),
            index: Box::new(Expr::integer(1)),
        };
        assert_eq!(ansi(&subscript), "t.tags[1]");
    }
}
