//! The right-hand side of IN predicates.

use super::{Expr, InvariantError, NodeKind, Query};

/// Candidate values of an IN predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueSet {
    /// `IN (SELECT ...)`
    Subquery(Box<Query>),
    /// `IN (1, 2, 3)`: one row of scalar candidates.
    Row(Vec<Expr>),
    /// `IN ((1, 2), (3, 4))`: candidate tuples of equal width.
    Rows(Vec<Vec<Expr>>),
}

impl ValueSet {
    /// Creates a scalar candidate list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or holds a row value.
    pub fn row(items: Vec<Expr>) -> Result<Self, InvariantError> {
        if items.is_empty() {
            return Err(InvariantError::Empty {
                construct: "IN list",
            });
        }
        if items.iter().any(Expr::is_row) {
            return Err(InvariantError::MultiValued {
                construct: "scalar IN list",
            });
        }
        Ok(Self::Row(items))
    }

    /// Creates a tuple candidate list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or the tuples differ in width.
    pub fn rows(rows: Vec<Vec<Expr>>) -> Result<Self, InvariantError> {
        let Some(first) = rows.first() else {
            return Err(InvariantError::Empty {
                construct: "IN list",
            });
        };
        let width = first.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != width) {
            return Err(InvariantError::RowArity {
                expected: width,
                found: bad.len(),
            });
        }
        Ok(Self::Rows(rows))
    }

    /// Classifies a parenthesized list: all row values become tuples, all
    /// scalars become a scalar list, and a mixture is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or mixed lists and uneven tuples.
    pub fn from_items(items: Vec<Expr>) -> Result<Self, InvariantError> {
        if !items.is_empty() && items.iter().all(Expr::is_row) {
            let rows = items
                .into_iter()
                .map(|item| match item {
                    Expr::Row { items, .. } => items,
                    other => vec![other],
                })
                .collect();
            return Self::rows(rows);
        }
        Self::row(items)
    }

    /// Width of each candidate, or `None` for subqueries.
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Subquery(_) => None,
            Self::Row(_) => Some(1),
            Self::Rows(rows) => rows.first().map(Vec::len),
        }
    }

    /// The renderer key for this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Subquery(_) => NodeKind::SubquerySet,
            Self::Row(_) => NodeKind::RowSet,
            Self::Rows(_) => NodeKind::RowListSet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: i64, b: i64) -> Expr {
        Expr::Row {
            items: vec![Expr::integer(a), Expr::integer(b)],
            explicit: false,
        }
    }

    #[test]
    fn test_from_items_scalars() {
        let set = ValueSet::from_items(vec![Expr::integer(1), Expr::integer(2)]).unwrap();
        assert_eq!(set.arity(), Some(1));
        assert_eq!(set.kind(), NodeKind::RowSet);
    }

    #[test]
    fn test_from_items_tuples() {
        let set = ValueSet::from_items(vec![pair(1, 2), pair(3, 4)]).unwrap();
        assert_eq!(set.arity(), Some(2));
        assert_eq!(set.kind(), NodeKind::RowListSet);
    }

    #[test]
    fn test_mixed_and_uneven_lists() {
        assert!(ValueSet::from_items(vec![pair(1, 2), Expr::integer(3)]).is_err());
        let uneven = ValueSet::rows(vec![vec![Expr::integer(1)], vec![]]);
        assert_eq!(
            uneven,
            Err(InvariantError::RowArity {
                expected: 1,
                found: 0
            })
        );
        assert!(ValueSet::from_items(vec![]).is_err());
    }
}
