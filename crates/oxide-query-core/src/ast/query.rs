//! Query AST types: SELECT, set operations and WITH.

use super::{
    Expr, GroupItem, Ident, InvariantError, Join, NodeKind, ObjectName, Predicate, TableRef,
    WindowDefinition,
};

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderDirection {
    /// Ascending order (default).
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderItem {
    /// The expression to order by.
    pub expr: Expr,
    /// Explicit direction, if written.
    pub direction: Option<OrderDirection>,
    /// Explicit null placement, if written.
    pub nulls: Option<NullOrdering>,
}

impl OrderItem {
    /// Orders by `expr` with no explicit direction.
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self {
            expr,
            direction: None,
            nulls: None,
        }
    }

    /// The direction in effect.
    #[must_use]
    pub fn effective_direction(&self) -> OrderDirection {
        self.direction.unwrap_or(OrderDirection::Asc)
    }
}

/// `SELECT ALL`, `SELECT DISTINCT` or `SELECT DISTINCT ON (...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distinct {
    /// `ALL`
    All,
    /// `DISTINCT`
    Distinct,
    /// `DISTINCT ON (exprs)`
    On(Vec<Expr>),
}

/// An entry of the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectItem {
    /// `expr [AS alias]`
    Expr {
        /// The expression.
        expr: Expr,
        /// Column alias.
        alias: Option<Ident>,
    },
    /// `*`
    Wildcard,
    /// `t.*`
    QualifiedWildcard(ObjectName),
}

/// LIMIT/OFFSET values, validated to be non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pagination {
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Rows to skip.
    pub offset: Option<u64>,
}

impl Pagination {
    /// Validates signed counts.
    ///
    /// # Errors
    ///
    /// Returns an error if either count is negative.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, InvariantError> {
        let check = |clause, value: Option<i64>| {
            value
                .map(|v| {
                    u64::try_from(v).map_err(|_| InvariantError::NegativeCount { clause, value: v })
                })
                .transpose()
        };
        Ok(Self {
            limit: check("LIMIT", limit)?,
            offset: check("OFFSET", offset)?,
        })
    }

    /// Returns true if neither count is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}

/// Lock strength of a locking clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockStrength {
    /// `FOR UPDATE`
    Update,
    /// `FOR NO KEY UPDATE`
    NoKeyUpdate,
    /// `FOR SHARE`
    Share,
    /// `FOR KEY SHARE`
    KeyShare,
}

impl LockStrength {
    /// Returns the SQL keywords following `FOR`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "UPDATE",
            Self::NoKeyUpdate => "NO KEY UPDATE",
            Self::Share => "SHARE",
            Self::KeyShare => "KEY SHARE",
        }
    }
}

/// Behaviour when rows are already locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockWait {
    /// `NOWAIT`
    Nowait,
    /// `SKIP LOCKED`
    SkipLocked,
}

/// `FOR UPDATE [OF t] [NOWAIT | SKIP LOCKED]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockClause {
    /// Lock strength.
    pub strength: LockStrength,
    /// Tables the lock applies to.
    pub of: Vec<ObjectName>,
    /// Wait policy.
    pub wait: Option<LockWait>,
}

/// `WINDOW name AS (...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedWindow {
    /// Window name.
    pub name: Ident,
    /// Window body.
    pub definition: WindowDefinition,
}

/// A SELECT query block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Select {
    /// DISTINCT / ALL.
    pub distinct: Option<Distinct>,
    /// The select list.
    pub items: Vec<SelectItem>,
    /// Comma-separated FROM items.
    pub from: Vec<TableRef>,
    /// Joins following the FROM items.
    pub joins: Vec<Join>,
    /// The WHERE clause.
    pub where_clause: Option<Predicate>,
    /// GROUP BY items.
    pub group_by: Vec<GroupItem>,
    /// HAVING clause.
    pub having: Option<Predicate>,
    /// WINDOW clause.
    pub windows: Vec<NamedWindow>,
    /// ORDER BY items.
    pub order_by: Vec<OrderItem>,
    /// LIMIT value.
    pub limit: Option<u64>,
    /// OFFSET value.
    pub offset: Option<u64>,
    /// Locking clause.
    pub lock: Option<LockClause>,
}

impl Select {
    /// Creates a query block with the given select list.
    #[must_use]
    pub fn new(items: Vec<SelectItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Returns true if the block has ORDER BY, LIMIT or OFFSET.
    #[must_use]
    pub fn has_tail(&self) -> bool {
        !self.order_by.is_empty() || self.limit.is_some() || self.offset.is_some()
    }
}

/// Kind of set operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetOpKind {
    /// `UNION`
    Union,
    /// `INTERSECT`
    Intersect,
    /// `EXCEPT`
    Except,
}

/// A set operator between two composite terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetOperator {
    /// The operation.
    pub kind: SetOpKind,
    /// `ALL` keeps duplicates.
    pub all: bool,
}

impl SetOperator {
    /// Returns the SQL keywords.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match (self.kind, self.all) {
            (SetOpKind::Union, false) => "UNION",
            (SetOpKind::Union, true) => "UNION ALL",
            (SetOpKind::Intersect, false) => "INTERSECT",
            (SetOpKind::Intersect, true) => "INTERSECT ALL",
            (SetOpKind::Except, false) => "EXCEPT",
            (SetOpKind::Except, true) => "EXCEPT ALL",
        }
    }
}

/// Queries combined with set operators, with an optional shared tail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeQuery {
    terms: Vec<Query>,
    operators: Vec<SetOperator>,
    order_by: Vec<OrderItem>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl CompositeQuery {
    /// Creates a composite query.
    ///
    /// # Errors
    ///
    /// Returns an error unless there is exactly one operator between each
    /// pair of terms and no term carries its own ORDER BY or pagination.
    pub fn new(
        terms: Vec<Query>,
        operators: Vec<SetOperator>,
        order_by: Vec<OrderItem>,
        pagination: Pagination,
    ) -> Result<Self, InvariantError> {
        if terms.is_empty() || operators.len() + 1 != terms.len() {
            return Err(InvariantError::OperatorCount {
                terms: terms.len(),
                operators: operators.len(),
            });
        }
        if let Some(index) = terms.iter().position(Query::has_tail) {
            return Err(InvariantError::TermTail { index });
        }
        Ok(Self {
            terms,
            operators,
            order_by,
            limit: pagination.limit,
            offset: pagination.offset,
        })
    }

    /// The combined queries.
    #[must_use]
    pub fn terms(&self) -> &[Query] {
        &self.terms
    }

    /// The set operators; `operators()[i]` joins terms `i` and `i + 1`.
    #[must_use]
    pub fn operators(&self) -> &[SetOperator] {
        &self.operators
    }

    /// ORDER BY applying to the whole result.
    #[must_use]
    pub fn order_by(&self) -> &[OrderItem] {
        &self.order_by
    }

    /// LIMIT applying to the whole result.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// OFFSET applying to the whole result.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        self.offset
    }
}

/// A common table expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cte {
    /// The CTE name.
    pub name: Ident,
    /// Optional column names.
    pub columns: Vec<Ident>,
    /// The defining query.
    pub query: Query,
}

/// `WITH [RECURSIVE] ctes body`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithQuery {
    /// `RECURSIVE` was given.
    pub recursive: bool,
    /// The common table expressions, at least one.
    pub ctes: Vec<Cte>,
    /// The main query.
    pub body: Query,
}

impl WithQuery {
    /// Creates a WITH query.
    ///
    /// # Errors
    ///
    /// Returns an error if `ctes` is empty.
    pub fn new(recursive: bool, ctes: Vec<Cte>, body: Query) -> Result<Self, InvariantError> {
        if ctes.is_empty() {
            return Err(InvariantError::Empty {
                construct: "WITH clause",
            });
        }
        Ok(Self {
            recursive,
            ctes,
            body,
        })
    }
}

/// A query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Query {
    /// A single SELECT block.
    Select(Box<Select>),
    /// Set operations over several queries.
    Composite(Box<CompositeQuery>),
    /// A query with common table expressions.
    With(Box<WithQuery>),
}

impl Query {
    /// Returns true if the query itself carries ORDER BY or pagination.
    #[must_use]
    pub fn has_tail(&self) -> bool {
        match self {
            Self::Select(select) => select.has_tail(),
            Self::Composite(composite) => {
                !composite.order_by.is_empty()
                    || composite.limit.is_some()
                    || composite.offset.is_some()
            }
            Self::With(with) => with.body.has_tail(),
        }
    }

    /// The renderer key for this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Select(_) => NodeKind::Select,
            Self::Composite(_) => NodeKind::Composite,
            Self::With(_) => NodeKind::With,
        }
    }
}

impl From<Select> for Query {
    fn from(select: Select) -> Self {
        Self::Select(Box::new(select))
    }
}
