//! Dialect-aware SQL rendering.
//!
//! Every node kind is written by a [`RenderHandler`] looked up in a
//! [`RendererRegistry`]. Handlers consult the [`RenderContext`] for the
//! dialect's quoting, operator spellings, null ordering and pagination, and
//! write through a [`SqlWriter`] that owns line breaks and indentation.

mod context;
mod error;
mod expr;
mod predicate;
mod query;
mod table;
mod writer;

use tracing::debug;

pub(crate) use context::expect_node;
pub use context::{RenderContext, RenderHandler, RendererRegistry};
pub use error::RenderError;
pub use expr::{
    quote_string, unescape, write_call, write_data_type, write_exprs, write_literal,
    write_operand, write_window_definition,
};
pub use predicate::write_block;
pub use query::{write_order_items, write_select};
pub use writer::{Fragment, SqlWriter};

use crate::ast::NodeRef;
use crate::config::RenderConfig;
use crate::dialect::Dialect;

/// Returns a registry with a renderer for every standard node kind.
#[must_use]
pub fn standard_renderers() -> RendererRegistry {
    let mut registry = RendererRegistry::new();
    expr::register(&mut registry);
    predicate::register(&mut registry);
    query::register(&mut registry);
    table::register(&mut registry);
    registry
}

/// Renders `node` for `dialect` using the handlers in `registry`.
///
/// # Errors
///
/// Returns an error if a node has no renderer or the dialect cannot express
/// it.
pub fn render<'a>(
    registry: &RendererRegistry,
    dialect: &dyn Dialect,
    node: impl Into<NodeRef<'a>>,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let node = node.into();
    debug!(dialect = dialect.name(), kind = ?node.kind(), "rendering");
    let mut ctx = RenderContext::new(dialect, registry);
    let mut writer = SqlWriter::new(config);
    ctx.render(node, &mut writer)?;
    let sql = writer.finish();
    debug!(dialect = dialect.name(), len = sql.len(), "rendered");
    Ok(sql)
}
