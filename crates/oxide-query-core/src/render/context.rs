//! Render handlers and the context that dispatches between them.

use tracing::debug;

use crate::ast::{Ident, NodeRef, ObjectName};
use crate::dialect::{Dialect, Operator};
use crate::registry::Registry;

use super::{Fragment, RenderError, SqlWriter};

/// Registry of render handlers.
pub type RendererRegistry = Registry<dyn RenderHandler>;

/// Renders one node kind.
pub trait RenderHandler: Send + Sync {
    /// Writes `node` to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dialect cannot express the node.
    fn render(
        &self,
        node: NodeRef<'_>,
        ctx: &mut RenderContext<'_>,
        w: &mut SqlWriter,
    ) -> Result<(), RenderError>;
}

impl<F> RenderHandler for F
where
    F: Fn(NodeRef<'_>, &mut RenderContext<'_>, &mut SqlWriter) -> Result<(), RenderError>
        + Send
        + Sync,
{
    fn render(
        &self,
        node: NodeRef<'_>,
        ctx: &mut RenderContext<'_>,
        w: &mut SqlWriter,
    ) -> Result<(), RenderError> {
        self(node, ctx, w)
    }
}

/// Per-render state: the dialect policy and the renderer registry.
pub struct RenderContext<'d> {
    dialect: &'d dyn Dialect,
    registry: &'d RendererRegistry,
}

impl<'d> RenderContext<'d> {
    /// Creates a context rendering for `dialect` through `registry`.
    #[must_use]
    pub const fn new(dialect: &'d dyn Dialect, registry: &'d RendererRegistry) -> Self {
        Self { dialect, registry }
    }

    /// The dialect policy.
    #[must_use]
    pub const fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Renders `node` through the handler registered for its kind.
    ///
    /// # Errors
    ///
    /// Fails if no handler is registered or the handler fails.
    pub fn render<'n>(
        &mut self,
        node: impl Into<NodeRef<'n>>,
        w: &mut SqlWriter,
    ) -> Result<(), RenderError> {
        let node = node.into();
        let kind = node.kind();
        let registry: &'d RendererRegistry = self.registry;
        let handler = registry.get(kind).ok_or_else(|| RenderError::MissingRenderer {
            dialect: self.dialect.name(),
            kind,
        })?;
        handler.render(node, self, w)
    }

    /// Renders `node` into a scratch buffer sharing `w`'s settings.
    ///
    /// # Errors
    ///
    /// Propagates the render error.
    pub fn capture<'n>(
        &mut self,
        node: impl Into<NodeRef<'n>>,
        w: &SqlWriter,
    ) -> Result<Fragment, RenderError> {
        let node = node.into();
        w.capture(|scratch| self.render(node, scratch))
    }

    /// Quotes `ident` for the dialect.
    #[must_use]
    pub fn ident(&self, ident: &Ident) -> String {
        self.dialect.quote_identifier(ident)
    }

    /// Quotes every part of a dotted name.
    #[must_use]
    pub fn object_name(&self, name: &ObjectName) -> String {
        name.parts()
            .iter()
            .map(|part| self.ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Spells a function name. Unquoted parts stay bare even when they are
    /// keywords, so `left(s, 2)` keeps its shape.
    #[must_use]
    pub fn function_name(&self, name: &ObjectName) -> String {
        name.parts()
            .iter()
            .map(|part| {
                if part.quoted {
                    self.ident(part)
                } else {
                    part.value.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Looks `op` up in the dialect's operator lexicon.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedOperator`] if the dialect has no
    /// spelling for it.
    pub fn operator(&self, op: Operator) -> Result<&'static str, RenderError> {
        self.dialect.operator(op).ok_or_else(|| {
            debug!(dialect = self.dialect.name(), operator = op.name(), "operator not supported");
            RenderError::UnsupportedOperator {
                dialect: self.dialect.name(),
                operator: op.name().to_string(),
            }
        })
    }

    /// Error for a construct the dialect lacks.
    #[must_use]
    pub fn unsupported(&self, construct: impl Into<String>) -> RenderError {
        let construct = construct.into();
        debug!(dialect = self.dialect.name(), %construct, "construct not supported");
        RenderError::UnsupportedConstruct {
            dialect: self.dialect.name(),
            construct,
        }
    }

    /// Error for a pagination request the dialect cannot spell.
    #[must_use]
    pub fn unsupported_pagination(&self, what: &'static str) -> RenderError {
        debug!(dialect = self.dialect.name(), what, "pagination not supported");
        RenderError::UnsupportedPagination {
            dialect: self.dialect.name(),
            what,
        }
    }

    /// Error for a renderer dispatched with a node it does not handle.
    #[must_use]
    pub const fn mismatch(node: NodeRef<'_>) -> RenderError {
        RenderError::NodeMismatch { kind: node.kind() }
    }
}

/// Binds the fields of the expected node variant, or returns
/// [`RenderError::NodeMismatch`].
macro_rules! expect_node {
    ($node:expr, $pat:pat) => {
        let node: $crate::ast::NodeRef<'_> = $node;
        let $pat = node else {
            return Err($crate::render::RenderContext::mismatch(node));
        };
    };
}

pub(crate) use expect_node;
