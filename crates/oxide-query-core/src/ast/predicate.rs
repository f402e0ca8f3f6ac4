//! Boolean predicates: the language of WHERE, HAVING, ON and FILTER.

use super::{Expr, Ident, InvariantError, NodeKind, Query, ValueSet};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

/// `ANY`, `SOME` or `ALL` in a quantified comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quantifier {
    /// `ANY`
    Any,
    /// `SOME`
    Some,
    /// `ALL`
    All,
}

impl Quantifier {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Some => "SOME",
            Self::All => "ALL",
        }
    }
}

/// Right-hand side of `IS [NOT] ...` truth tests.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TruthValue {
    /// `TRUE`
    True,
    /// `FALSE`
    False,
    /// `UNKNOWN`
    Unknown,
    /// Vendor truth words such as `IS JSON`.
    Named(Ident),
}

/// An `IS [NOT] value` test.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TruthTest {
    /// The tested value.
    pub value: TruthValue,
    /// `IS NOT`.
    pub negated: bool,
}

/// Regular-expression match operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegexOp {
    /// Case-sensitive match.
    Match,
    /// Case-insensitive match.
    IMatch,
    /// Case-sensitive non-match.
    NotMatch,
    /// Case-insensitive non-match.
    NotIMatch,
}

/// Boolean connectives of composite filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicalOp {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
}

/// A boolean predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predicate {
    /// `a = b`
    Comparison {
        /// Left operand.
        left: Expr,
        /// Operator.
        op: ComparisonOp,
        /// Right operand.
        right: Expr,
    },
    /// `a = ANY (subquery)`
    Quantified {
        /// Left operand.
        left: Expr,
        /// Operator.
        op: ComparisonOp,
        /// Quantifier.
        quantifier: Quantifier,
        /// Subquery or array operand.
        right: Expr,
    },
    /// `a [NOT] BETWEEN [SYMMETRIC] lo AND hi`
    Between {
        /// Tested expression.
        expr: Expr,
        /// Lower bound.
        low: Expr,
        /// Upper bound.
        high: Expr,
        /// `NOT BETWEEN`.
        negated: bool,
        /// `BETWEEN SYMMETRIC`.
        symmetric: bool,
    },
    /// `a [NOT] IN (...)`
    In {
        /// Tested expression.
        expr: Expr,
        /// Candidate values.
        set: ValueSet,
        /// `NOT IN`.
        negated: bool,
    },
    /// `a [NOT] LIKE p [ESCAPE e]`
    Like {
        /// Tested expression.
        expr: Expr,
        /// Pattern.
        pattern: Expr,
        /// Escape character.
        escape: Option<Expr>,
        /// `NOT LIKE`.
        negated: bool,
        /// `ILIKE`.
        case_insensitive: bool,
    },
    /// `a IS [NOT] NULL`
    IsNull {
        /// Tested expression.
        expr: Expr,
        /// `IS NOT NULL`.
        negated: bool,
    },
    /// A boolean expression, optionally followed by an `IS` test.
    Truth {
        /// Tested expression.
        expr: Expr,
        /// `IS [NOT] TRUE|FALSE|UNKNOWN|...`.
        test: Option<TruthTest>,
    },
    /// Conjunction of two or more predicates.
    And(Vec<Predicate>),
    /// Disjunction of two or more predicates.
    Or(Vec<Predicate>),
    /// Negation.
    Not(Box<Predicate>),
    /// `[NOT] EXISTS (subquery)`
    Exists {
        /// The subquery.
        query: Box<Query>,
        /// `NOT EXISTS`.
        negated: bool,
    },
    /// `a IS [NOT] DISTINCT FROM b`
    DistinctFrom {
        /// Left operand.
        left: Expr,
        /// Right operand.
        right: Expr,
        /// `IS NOT DISTINCT FROM`.
        negated: bool,
    },
    /// Regular-expression match.
    Regex {
        /// Tested expression.
        expr: Expr,
        /// Operator.
        op: RegexOp,
        /// Pattern.
        pattern: Expr,
    },
}

impl Predicate {
    /// Creates a comparison, rejecting a row value on one side only and rows
    /// of different widths. A subquery may stand opposite a row value.
    ///
    /// # Errors
    ///
    /// Returns an error if the operand shapes are incompatible.
    pub fn comparison(left: Expr, op: ComparisonOp, right: Expr) -> Result<Self, InvariantError> {
        let subquery = matches!(left, Expr::Subquery(_)) || matches!(right, Expr::Subquery(_));
        match (left.is_row(), right.is_row()) {
            (true, true) if left.arity() != right.arity() => Err(InvariantError::RowArity {
                expected: left.arity(),
                found: right.arity(),
            }),
            (false, true) | (true, false) if !subquery => Err(InvariantError::MultiValued {
                construct: "comparison",
            }),
            _ => Ok(Self::Comparison { left, op, right }),
        }
    }

    /// Creates a BETWEEN predicate; the bounds must be scalars.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is a row value.
    pub fn between(
        expr: Expr,
        low: Expr,
        high: Expr,
        negated: bool,
        symmetric: bool,
    ) -> Result<Self, InvariantError> {
        if low.is_row() || high.is_row() || expr.is_row() {
            return Err(InvariantError::MultiValued {
                construct: "BETWEEN",
            });
        }
        Ok(Self::Between {
            expr,
            low,
            high,
            negated,
            symmetric,
        })
    }

    /// Creates an IN predicate whose tested value matches the set's width.
    ///
    /// # Errors
    ///
    /// Returns an error if the widths differ.
    pub fn in_set(expr: Expr, set: ValueSet, negated: bool) -> Result<Self, InvariantError> {
        if let Some(width) = set.arity() {
            if width != expr.arity() {
                return Err(InvariantError::RowArity {
                    expected: expr.arity(),
                    found: width,
                });
            }
        }
        Ok(Self::In { expr, set, negated })
    }

    /// Joins predicates with AND, splicing in the operands of nested
    /// conjunctions. A single operand is returned unchanged.
    #[must_use]
    pub fn and_all(operands: Vec<Self>) -> Self {
        Self::fold(LogicalOp::And, operands)
    }

    /// Joins predicates with OR, splicing in the operands of nested
    /// disjunctions. A single operand is returned unchanged.
    #[must_use]
    pub fn or_all(operands: Vec<Self>) -> Self {
        Self::fold(LogicalOp::Or, operands)
    }

    fn fold(op: LogicalOp, operands: Vec<Self>) -> Self {
        let mut flat = Vec::with_capacity(operands.len());
        for operand in operands {
            match (op, operand) {
                (LogicalOp::And, Self::And(children)) | (LogicalOp::Or, Self::Or(children)) => {
                    flat.extend(children);
                }
                (_, other) => flat.push(other),
            }
        }
        if flat.len() == 1 {
            if let Some(only) = flat.pop() {
                return only;
            }
        }
        match op {
            LogicalOp::And => Self::And(flat),
            LogicalOp::Or => Self::Or(flat),
        }
    }

    /// Conjoins two predicates.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::and_all(vec![self, other])
    }

    /// Disjoins two predicates.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::or_all(vec![self, other])
    }

    /// Negates the predicate.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Returns the connective and operands of AND/OR predicates.
    #[must_use]
    pub fn as_composite(&self) -> Option<(LogicalOp, &[Self])> {
        match self {
            Self::And(children) => Some((LogicalOp::And, children.as_slice())),
            Self::Or(children) => Some((LogicalOp::Or, children.as_slice())),
            _ => None,
        }
    }

    /// The renderer key for this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Comparison { .. } => NodeKind::Comparison,
            Self::Quantified { .. } => NodeKind::Quantified,
            Self::Between { .. } => NodeKind::Between,
            Self::In { .. } => NodeKind::In,
            Self::Like { .. } => NodeKind::Like,
            Self::IsNull { .. } => NodeKind::IsNull,
            Self::Truth { .. } => NodeKind::Truth,
            Self::And(_) => NodeKind::And,
            Self::Or(_) => NodeKind::Or,
            Self::Not(_) => NodeKind::Not,
            Self::Exists { .. } => NodeKind::Exists,
            Self::DistinctFrom { .. } => NodeKind::DistinctFrom,
            Self::Regex { .. } => NodeKind::Regex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(col: &str, v: i64) -> Predicate {
        Predicate::Comparison {
            left: Expr::column(col),
            op: ComparisonOp::Eq,
            right: Expr::integer(v),
        }
    }

    fn row(n: i64) -> Expr {
        Expr::Row {
            items: (0..n).map(Expr::integer).collect(),
            explicit: false,
        }
    }

    #[test]
    fn test_and_all_flattens() {
        let nested = Predicate::and_all(vec![eq("a", 1), eq("b", 2)]);
        let outer = Predicate::and_all(vec![nested, eq("c", 3)]);
        let Predicate::And(children) = outer else {
            panic!("expected AND");
        };
        assert_eq!(children.len(), 3);
    }

    #[test]
    fn test_fold_keeps_other_connective() {
        let or = Predicate::or_all(vec![eq("a", 1), eq("b", 2)]);
        let and = Predicate::and_all(vec![or, eq("c", 3)]);
        let Some((LogicalOp::And, children)) = and.as_composite() else {
            panic!("expected AND");
        };
        assert!(matches!(children[0], Predicate::Or(_)));
    }

    #[test]
    fn test_single_operand_is_unwrapped() {
        assert_eq!(Predicate::and_all(vec![eq("a", 1)]), eq("a", 1));
    }

    #[test]
    fn test_comparison_row_arity() {
        assert!(Predicate::comparison(row(2), ComparisonOp::Eq, row(2)).is_ok());
        assert_eq!(
            Predicate::comparison(row(2), ComparisonOp::Eq, row(3)),
            Err(InvariantError::RowArity {
                expected: 2,
                found: 3
            })
        );
        assert!(Predicate::comparison(Expr::column("a"), ComparisonOp::Eq, row(2)).is_err());
        let sub = Expr::Subquery(Box::new(Query::Select(Box::new(
            crate::ast::Select::new(vec![]),
        ))));
        assert!(Predicate::comparison(row(2), ComparisonOp::Eq, sub).is_ok());
    }

    #[test]
    fn test_between_rejects_rows() {
        let err = Predicate::between(Expr::column("a"), row(2), Expr::integer(1), false, false);
        assert!(matches!(err, Err(InvariantError::MultiValued { .. })));
    }

    #[test]
    fn test_in_set_arity() {
        let set = ValueSet::rows(vec![vec![Expr::integer(1), Expr::integer(2)]]).unwrap();
        assert!(Predicate::in_set(row(2), set.clone(), false).is_ok());
        assert!(Predicate::in_set(Expr::column("a"), set, false).is_err());
    }
}
