//! Type-keyed handler registries.
//!
//! Parsing and rendering both dispatch through a [`Registry`]: a map from
//! [`NodeKind`] to a shared handler, plus ordered candidate lists naming the
//! alternatives tried for a grammar category. Dialects start from a copy of a
//! base registry and override or insert entries.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::ast::NodeKind;

/// Where to put a kind in a candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Try it before everything else.
    First,
    /// Try it after everything else.
    Last,
    /// Try it just before `kind`; appended if `kind` is absent.
    Before(NodeKind),
    /// Try it just after `kind`; appended if `kind` is absent.
    After(NodeKind),
}

/// Handlers keyed by node kind.
pub struct Registry<H: ?Sized> {
    handlers: HashMap<NodeKind, Arc<H>>,
    candidates: HashMap<NodeKind, Vec<NodeKind>>,
}

impl<H: ?Sized> Registry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            candidates: HashMap::new(),
        }
    }

    /// Registers `handler` for `kind`, returning the handler it replaces.
    pub fn register(&mut self, kind: NodeKind, handler: Arc<H>) -> Option<Arc<H>> {
        self.handlers.insert(kind, handler)
    }

    /// Looks up the handler for `kind`.
    #[must_use]
    pub fn get(&self, kind: NodeKind) -> Option<&Arc<H>> {
        self.handlers.get(&kind)
    }

    /// Returns true if a handler is registered for `kind`.
    #[must_use]
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Replaces the candidate list of `category`.
    pub fn set_candidates(&mut self, category: NodeKind, kinds: Vec<NodeKind>) {
        self.candidates.insert(category, kinds);
    }

    /// Inserts `kind` into the candidate list of `category`, moving it if it
    /// is already listed.
    pub fn add_candidate(&mut self, category: NodeKind, kind: NodeKind, position: Position) {
        let list = self.candidates.entry(category).or_default();
        list.retain(|k| *k != kind);
        let index = match position {
            Position::First => 0,
            Position::Last => list.len(),
            Position::Before(anchor) => list
                .iter()
                .position(|k| *k == anchor)
                .unwrap_or(list.len()),
            Position::After(anchor) => list
                .iter()
                .position(|k| *k == anchor)
                .map_or(list.len(), |i| i + 1),
        };
        list.insert(index, kind);
    }

    /// Removes `kind` from the candidate list of `category`.
    pub fn remove_candidate(&mut self, category: NodeKind, kind: NodeKind) {
        if let Some(list) = self.candidates.get_mut(&category) {
            list.retain(|k| *k != kind);
        }
    }

    /// The alternatives of `category`, in trial order.
    #[must_use]
    pub fn candidates(&self, category: NodeKind) -> &[NodeKind] {
        self.candidates
            .get(&category)
            .map_or(&[][..], Vec::as_slice)
    }
}

impl<H: ?Sized> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> Clone for Registry<H> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            candidates: self.candidates.clone(),
        }
    }
}

impl<H: ?Sized> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("handlers", &self.handlers.len())
            .field("candidates", &self.candidates)
            .finish()
    }
}
