//! GROUP BY items.

use super::{Expr, NodeKind};

/// An item of a GROUP BY clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupItem {
    /// A plain grouping expression.
    Expr(Expr),
    /// `ROLLUP (a, b)`
    Rollup(Vec<Expr>),
    /// `CUBE (a, b)`
    Cube(Vec<Expr>),
    /// `GROUPING SETS (...)`
    GroupingSets(Vec<GroupItem>),
    /// A parenthesized grouping set; `()` is the empty set.
    Set(Vec<Expr>),
}

impl GroupItem {
    /// The renderer key for this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Expr(_) => NodeKind::GroupExpr,
            Self::Rollup(_) => NodeKind::Rollup,
            Self::Cube(_) => NodeKind::Cube,
            Self::GroupingSets(_) => NodeKind::GroupingSets,
            Self::Set(_) => NodeKind::GroupingSet,
        }
    }
}
