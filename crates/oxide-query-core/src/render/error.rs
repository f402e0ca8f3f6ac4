//! Rendering errors.

use crate::ast::NodeKind;

/// A tree the target dialect cannot express, or a registry gap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The pagination request has no spelling in the dialect.
    #[error("{dialect} cannot paginate {what}")]
    UnsupportedPagination {
        /// Target dialect.
        dialect: &'static str,
        /// What was requested.
        what: &'static str,
    },
    /// OFFSET/FETCH pagination without an ORDER BY.
    #[error("{dialect} needs ORDER BY to paginate with OFFSET and FETCH")]
    MissingOrderBy {
        /// Target dialect.
        dialect: &'static str,
    },
    /// The operator lexicon has no entry for an operator.
    #[error("{dialect} has no operator for {operator}")]
    UnsupportedOperator {
        /// Target dialect.
        dialect: &'static str,
        /// Name of the operator.
        operator: String,
    },
    /// A construct the dialect does not have.
    #[error("{dialect} does not support {construct}")]
    UnsupportedConstruct {
        /// Target dialect.
        dialect: &'static str,
        /// Description of the construct.
        construct: String,
    },
    /// No renderer is registered for a node kind.
    #[error("{dialect} has no renderer for {kind:?}")]
    MissingRenderer {
        /// Target dialect.
        dialect: &'static str,
        /// Kind of the node.
        kind: NodeKind,
    },
    /// A renderer was registered under a kind it cannot handle.
    #[error("renderer registered for {kind:?} cannot render that node")]
    NodeMismatch {
        /// Kind the renderer was dispatched for.
        kind: NodeKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_dialect() {
        let err = RenderError::MissingOrderBy { dialect: "ansi" };
        assert_eq!(
            err.to_string(),
            "ansi needs ORDER BY to paginate with OFFSET and FETCH"
        );
        let err = RenderError::UnsupportedOperator {
            dialect: "ansi",
            operator: "ILIKE".into(),
        };
        assert_eq!(err.to_string(), "ansi has no operator for ILIKE");
    }
}
