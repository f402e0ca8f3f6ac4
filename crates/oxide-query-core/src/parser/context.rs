//! Parse handlers and the context that dispatches between them.

use std::sync::Arc;

use tracing::trace;

use crate::ast::{Node, NodeKind};
use crate::config::ParserConfig;
use crate::registry::Registry;

use super::{Cursor, FatalKind, Lookahead, ParseError};

/// Registry of parse handlers.
pub type ParserRegistry = Registry<dyn ParseHandler>;

/// Parses one grammar construct.
///
/// Handlers are stateless and shared between threads; all per-parse state
/// lives in the [`Cursor`] and [`ParseContext`].
pub trait ParseHandler: Send + Sync {
    /// Parses the construct at the cursor.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if the tokens do not form the construct.
    fn parse(&self, cur: &mut Cursor<'_>, ctx: &mut ParseContext<'_>) -> Result<Node, ParseError>;

    /// Cheap structural check deciding whether [`ParseHandler::parse`] is
    /// worth attempting. Must not consume tokens.
    fn matches(&self, _cur: &Cursor<'_>, _ctx: &ParseContext<'_>) -> bool {
        true
    }

    /// Extends an already parsed left operand, for infix and postfix
    /// handlers.
    ///
    /// # Errors
    ///
    /// The default implementation reports that the handler is not infix.
    fn apply_to(
        &self,
        lhs: Node,
        cur: &mut Cursor<'_>,
        ctx: &mut ParseContext<'_>,
    ) -> Result<Node, ParseError> {
        let _ = (lhs, ctx);
        Err(ParseError::fatal(
            FatalKind::MissingHandler,
            "handler cannot extend a left operand",
            cur.current().span,
        ))
    }
}

/// Per-parse state: the registry, the lookahead helper and the recursion
/// guard.
pub struct ParseContext<'r> {
    registry: &'r ParserRegistry,
    lookahead: Lookahead,
    depth: usize,
    max_depth: usize,
}

impl<'r> ParseContext<'r> {
    /// Creates a context over `registry`.
    #[must_use]
    pub const fn new(registry: &'r ParserRegistry, config: &ParserConfig) -> Self {
        Self {
            registry,
            lookahead: Lookahead,
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// The handler registry.
    #[must_use]
    pub const fn registry(&self) -> &'r ParserRegistry {
        self.registry
    }

    /// The stateless lookahead helper.
    #[must_use]
    pub const fn lookahead(&self) -> &Lookahead {
        &self.lookahead
    }

    /// Current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    fn handler(
        &self,
        kind: NodeKind,
        cur: &Cursor<'_>,
    ) -> Result<&'r Arc<dyn ParseHandler>, ParseError> {
        let registry: &'r ParserRegistry = self.registry;
        registry.get(kind).ok_or_else(|| {
            ParseError::fatal(
                FatalKind::MissingHandler,
                format!("no parse handler registered for {kind:?}"),
                cur.current().span,
            )
        })
    }

    fn enter(&mut self, cur: &Cursor<'_>) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::fatal(
                FatalKind::RecursionLimit,
                format!("query nests deeper than {} levels", self.max_depth),
                cur.current().span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs the handler for `kind`.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error; fails fatally if no handler is
    /// registered or the recursion limit is hit.
    pub fn parse_node(&mut self, kind: NodeKind, cur: &mut Cursor<'_>) -> Result<Node, ParseError> {
        let handler = self.handler(kind, cur)?;
        self.enter(cur)?;
        let result = handler.parse(cur, self);
        self.depth -= 1;
        result
    }

    /// Runs the handler for `kind` and unwraps the node family `T`.
    ///
    /// # Errors
    ///
    /// As [`ParseContext::parse_node`], plus a fatal error if the handler
    /// produced a different family.
    pub fn parse<T>(&mut self, kind: NodeKind, cur: &mut Cursor<'_>) -> Result<T, ParseError>
    where
        T: TryFrom<Node, Error = Node>,
    {
        let span = cur.current().span;
        let node = self.parse_node(kind, cur)?;
        T::try_from(node).map_err(|node| {
            ParseError::fatal(
                FatalKind::NodeMismatch,
                format!("{kind:?} handler produced a {}", node.family()),
                span,
            )
        })
    }

    /// Returns true if the handler for `kind` accepts the tokens ahead.
    ///
    /// # Errors
    ///
    /// Fails fatally if no handler is registered.
    pub fn matches(&self, kind: NodeKind, cur: &Cursor<'_>) -> Result<bool, ParseError> {
        Ok(self.handler(kind, cur)?.matches(cur, self))
    }

    /// Speculatively parses `kind`: on a structural mismatch or a
    /// recoverable error the cursor is restored and `None` returned. Fatal
    /// errors still propagate.
    ///
    /// # Errors
    ///
    /// Returns fatal errors only.
    pub fn try_parse<T>(
        &mut self,
        kind: NodeKind,
        cur: &mut Cursor<'_>,
    ) -> Result<Option<T>, ParseError>
    where
        T: TryFrom<Node, Error = Node>,
    {
        if !self.matches(kind, cur)? {
            return Ok(None);
        }
        let mark = cur.mark();
        match self.parse::<T>(kind, cur) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                trace!(?kind, error = %err, "speculative parse failed, backtracking");
                cur.restore(mark);
                Ok(None)
            }
        }
    }

    /// Extends `lhs` with the infix or postfix handler for `kind`.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error.
    pub fn apply_node(
        &mut self,
        kind: NodeKind,
        lhs: Node,
        cur: &mut Cursor<'_>,
    ) -> Result<Node, ParseError> {
        let handler = self.handler(kind, cur)?;
        self.enter(cur)?;
        let result = handler.apply_to(lhs, cur, self);
        self.depth -= 1;
        result
    }

    /// Extends `lhs` and unwraps the node family `T`.
    ///
    /// # Errors
    ///
    /// As [`ParseContext::apply_node`], plus a fatal error on a family mismatch.
    pub fn apply<T>(
        &mut self,
        kind: NodeKind,
        lhs: Node,
        cur: &mut Cursor<'_>,
    ) -> Result<T, ParseError>
    where
        T: TryFrom<Node, Error = Node>,
    {
        let span = cur.current().span;
        let node = self.apply_node(kind, lhs, cur)?;
        T::try_from(node).map_err(|node| {
            ParseError::fatal(
                FatalKind::NodeMismatch,
                format!("{kind:?} handler produced a {}", node.family()),
                span,
            )
        })
    }

    /// Repeatedly extends `lhs` with the first matching candidate of
    /// `category` until none matches.
    ///
    /// # Errors
    ///
    /// Propagates handler errors.
    pub fn apply_candidates(
        &mut self,
        category: NodeKind,
        mut lhs: Node,
        cur: &mut Cursor<'_>,
    ) -> Result<Node, ParseError> {
        let registry = self.registry;
        'extend: loop {
            for &kind in registry.candidates(category) {
                if self.matches(kind, cur)? {
                    lhs = self.apply_node(kind, lhs, cur)?;
                    continue 'extend;
                }
            }
            return Ok(lhs);
        }
    }

    /// Parses one of the alternatives listed for `category`.
    ///
    /// Every candidate whose `matches` accepts the tokens is tried in order;
    /// all but the last are attempted speculatively, so the last candidate's
    /// error is the one reported. With no candidate matching, the error says
    /// `expected` was wanted.
    ///
    /// # Errors
    ///
    /// Returns the final candidate's error or an "unexpected token" error.
    pub fn parse_alternatives<T>(
        &mut self,
        category: NodeKind,
        cur: &mut Cursor<'_>,
        expected: &str,
    ) -> Result<T, ParseError>
    where
        T: TryFrom<Node, Error = Node>,
    {
        let registry = self.registry;
        let mut matching = Vec::new();
        for &kind in registry.candidates(category) {
            if self.matches(kind, cur)? {
                matching.push(kind);
            }
        }
        let Some((&last, rest)) = matching.split_last() else {
            return Err(ParseError::unexpected(expected, cur.current()));
        };
        for &kind in rest {
            if let Some(value) = self.try_parse::<T>(kind, cur)? {
                return Ok(value);
            }
        }
        self.parse::<T>(last, cur)
    }
}
