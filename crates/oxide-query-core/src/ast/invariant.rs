//! Structural invariants checked when trees are constructed.

/// A tree shape that no SQL text could describe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// Composite queries need exactly one set operator between each pair of terms.
    #[error("composite query has {terms} terms but {operators} set operators")]
    OperatorCount {
        /// Number of query terms.
        terms: usize,
        /// Number of set operators.
        operators: usize,
    },
    /// A non-final composite term carries its own ORDER BY or pagination.
    #[error("term {index} of a composite query carries its own ORDER BY, LIMIT or OFFSET")]
    TermTail {
        /// Zero-based position of the offending term.
        index: usize,
    },
    /// LIMIT or OFFSET was negative.
    #[error("{clause} must be non-negative, got {value}")]
    NegativeCount {
        /// `LIMIT` or `OFFSET`.
        clause: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// Row values that must line up have different widths.
    #[error("row value has {found} columns, expected {expected}")]
    RowArity {
        /// Width required by context.
        expected: usize,
        /// Width actually supplied.
        found: usize,
    },
    /// A row value appeared where only a scalar is allowed.
    #[error("{construct} does not accept a row value here")]
    MultiValued {
        /// The construct that rejected it.
        construct: &'static str,
    },
    /// A list that needs at least one element was empty.
    #[error("{construct} cannot be empty")]
    Empty {
        /// The construct that rejected it.
        construct: &'static str,
    },
}
