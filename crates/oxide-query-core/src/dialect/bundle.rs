//! A dialect's policy bundled with its grammar and renderers.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::ast::{Expr, Node, NodeKind, NodeRef, Predicate, Query};
use crate::config::{ParserConfig, RenderConfig};
use crate::parser::{self, ParseError, ParseHandler, ParserRegistry};
use crate::render::{self, RenderError, RenderHandler, RendererRegistry};

use super::{AnsiDialect, Dialect};

/// A complete dialect: policy, parser registry and renderer registry.
///
/// Bundles are cheap to clone; the registries are shared.
#[derive(Clone)]
pub struct SqlDialect {
    policy: Arc<dyn Dialect>,
    parsers: Arc<ParserRegistry>,
    renderers: Arc<RendererRegistry>,
    parser_config: ParserConfig,
    render_config: RenderConfig,
}

impl fmt::Debug for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlDialect")
            .field("name", &self.policy.name())
            .field("parsers", &self.parsers.len())
            .field("renderers", &self.renderers.len())
            .field("parser_config", &self.parser_config)
            .field("render_config", &self.render_config)
            .finish()
    }
}

impl SqlDialect {
    /// Assembles a bundle from its parts.
    #[must_use]
    pub fn new(
        policy: impl Dialect + 'static,
        parsers: ParserRegistry,
        renderers: RendererRegistry,
    ) -> Self {
        Self {
            policy: Arc::new(policy),
            parsers: Arc::new(parsers),
            renderers: Arc::new(renderers),
            parser_config: ParserConfig::default(),
            render_config: RenderConfig::default(),
        }
    }

    /// The standard SQL dialect.
    #[must_use]
    pub fn ansi() -> Self {
        static ANSI: OnceLock<SqlDialect> = OnceLock::new();
        ANSI.get_or_init(|| {
            Self::new(
                AnsiDialect::new(),
                parser::standard_parsers(),
                render::standard_renderers(),
            )
        })
        .clone()
    }

    /// The dialect name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.policy.name()
    }

    /// The formatting policy.
    #[must_use]
    pub fn policy(&self) -> &dyn Dialect {
        &*self.policy
    }

    /// The parser registry.
    #[must_use]
    pub fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    /// The renderer registry.
    #[must_use]
    pub fn renderers(&self) -> &RendererRegistry {
        &self.renderers
    }

    /// Parser settings.
    #[must_use]
    pub const fn parser_config(&self) -> &ParserConfig {
        &self.parser_config
    }

    /// Renderer settings.
    #[must_use]
    pub const fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    /// Returns the bundle with different parser settings.
    #[must_use]
    pub const fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    /// Returns the bundle with different renderer settings.
    #[must_use]
    pub const fn with_render_config(mut self, config: RenderConfig) -> Self {
        self.render_config = config;
        self
    }

    /// Parses `sql` as a `kind` node.
    ///
    /// # Errors
    ///
    /// Returns the parse error, or a mismatch if `kind` does not produce a
    /// `T`.
    pub fn parse<T>(&self, kind: NodeKind, sql: &str) -> Result<T, ParseError>
    where
        T: TryFrom<Node, Error = Node>,
    {
        parser::parse(&self.parsers, kind, sql, &self.parser_config)
    }

    /// Parses a full query.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error.
    pub fn parse_query(&self, sql: &str) -> Result<Query, ParseError> {
        self.parse(NodeKind::Query, sql)
    }

    /// Parses a search condition.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error.
    pub fn parse_predicate(&self, sql: &str) -> Result<Predicate, ParseError> {
        self.parse(NodeKind::Predicate, sql)
    }

    /// Parses a scalar expression.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error.
    pub fn parse_expr(&self, sql: &str) -> Result<Expr, ParseError> {
        self.parse(NodeKind::Expr, sql)
    }

    /// Renders `node` in this dialect.
    ///
    /// # Errors
    ///
    /// Returns an error if the dialect cannot express the node.
    pub fn render<'a>(&self, node: impl Into<NodeRef<'a>>) -> Result<String, RenderError> {
        render::render(&self.renderers, &*self.policy, node, &self.render_config)
    }

    /// Starts a new dialect from copies of this one's parts.
    #[must_use]
    pub fn extend(&self) -> DialectBuilder {
        DialectBuilder {
            policy: Arc::clone(&self.policy),
            parsers: (*self.parsers).clone(),
            renderers: (*self.renderers).clone(),
            parser_config: self.parser_config,
            render_config: self.render_config,
        }
    }
}

/// Builds a [`SqlDialect`] by overriding parts of a base dialect.
///
/// # Example
///
/// ```
/// use oxide_query_core::dialect::{AnsiDialect, SqlDialect};
///
/// let dialect = SqlDialect::ansi().extend().policy(AnsiDialect::new()).build();
/// assert_eq!(dialect.name(), "ansi");
/// ```
pub struct DialectBuilder {
    policy: Arc<dyn Dialect>,
    parsers: ParserRegistry,
    renderers: RendererRegistry,
    parser_config: ParserConfig,
    render_config: RenderConfig,
}

impl DialectBuilder {
    /// Replaces the formatting policy.
    #[must_use]
    pub fn policy(mut self, policy: impl Dialect + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Registers a parse handler, replacing any handler for `kind`.
    #[must_use]
    pub fn parser(mut self, kind: NodeKind, handler: Arc<dyn ParseHandler>) -> Self {
        self.parsers.register(kind, handler);
        self
    }

    /// Registers a render handler, replacing any handler for `kind`.
    #[must_use]
    pub fn renderer(mut self, kind: NodeKind, handler: Arc<dyn RenderHandler>) -> Self {
        self.renderers.register(kind, handler);
        self
    }

    /// Direct access to the parser registry, for candidate list edits.
    pub fn parsers_mut(&mut self) -> &mut ParserRegistry {
        &mut self.parsers
    }

    /// Direct access to the renderer registry.
    pub fn renderers_mut(&mut self) -> &mut RendererRegistry {
        &mut self.renderers
    }

    /// Sets parser settings.
    #[must_use]
    pub const fn parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    /// Sets renderer settings.
    #[must_use]
    pub const fn render_config(mut self, config: RenderConfig) -> Self {
        self.render_config = config;
        self
    }

    /// Finishes the dialect.
    #[must_use]
    pub fn build(self) -> SqlDialect {
        debug!(
            dialect = self.policy.name(),
            parsers = self.parsers.len(),
            renderers = self.renderers.len(),
            "dialect built"
        );
        SqlDialect {
            policy: self.policy,
            parsers: Arc::new(self.parsers),
            renderers: Arc::new(self.renderers),
            parser_config: self.parser_config,
            render_config: self.render_config,
        }
    }
}
