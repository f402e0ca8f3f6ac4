//! FROM items and joins.

use super::{Expr, FunctionCall, Ident, NodeKind, ObjectName, Predicate, Query};

/// `AS alias (col, ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableAlias {
    /// The alias.
    pub name: Ident,
    /// Optional column aliases.
    pub columns: Vec<Ident>,
}

impl TableAlias {
    /// Creates an alias without column names.
    #[must_use]
    pub fn new(name: impl Into<Ident>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }
}

/// A table reference in a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableRef {
    /// A named table or view.
    Named {
        /// The table name.
        name: ObjectName,
        /// Alias.
        alias: Option<TableAlias>,
    },
    /// A derived table.
    Subquery {
        /// The subquery.
        query: Box<Query>,
        /// Alias.
        alias: Option<TableAlias>,
    },
    /// `(VALUES (...), (...)) AS t(a, b)`.
    Values {
        /// The rows.
        rows: Vec<Vec<Expr>>,
        /// Alias.
        alias: Option<TableAlias>,
    },
    /// A set-returning function.
    Function {
        /// The call.
        call: Box<FunctionCall>,
        /// `WITH ORDINALITY`.
        with_ordinality: bool,
        /// Alias.
        alias: Option<TableAlias>,
    },
    /// `LATERAL` applied to a derived table or function.
    Lateral(Box<TableRef>),
}

impl TableRef {
    /// Creates a table reference from a dotted name.
    #[must_use]
    pub fn table(name: &str) -> Self {
        Self::Named {
            name: ObjectName::from_dotted(name),
            alias: None,
        }
    }

    /// Adds an alias to this table reference.
    #[must_use]
    pub fn alias(self, alias: &str) -> Self {
        let new_alias = Some(TableAlias::new(alias));
        match self {
            Self::Named { name, .. } => Self::Named {
                name,
                alias: new_alias,
            },
            Self::Subquery { query, .. } => Self::Subquery {
                query,
                alias: new_alias,
            },
            Self::Values { rows, .. } => Self::Values {
                rows,
                alias: new_alias,
            },
            Self::Function {
                call,
                with_ordinality,
                ..
            } => Self::Function {
                call,
                with_ordinality,
                alias: new_alias,
            },
            Self::Lateral(inner) => Self::Lateral(Box::new(inner.alias(alias))),
        }
    }

    /// The renderer key for this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Named { .. } => NodeKind::NamedTable,
            Self::Subquery { .. } => NodeKind::SubqueryTable,
            Self::Values { .. } => NodeKind::ValuesTable,
            Self::Function { .. } => NodeKind::FunctionTable,
            Self::Lateral(_) => NodeKind::Lateral,
        }
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinKind {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    Left,
    /// RIGHT OUTER JOIN.
    Right,
    /// FULL OUTER JOIN.
    Full,
}

impl JoinKind {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }
}

/// A join attached to the FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Join {
    /// `JOIN t ON cond`
    On {
        /// Join type.
        kind: JoinKind,
        /// Joined table.
        table: TableRef,
        /// Join condition.
        condition: Predicate,
    },
    /// `JOIN t USING (cols)`
    Using {
        /// Join type.
        kind: JoinKind,
        /// Joined table.
        table: TableRef,
        /// Shared columns.
        columns: Vec<Ident>,
    },
    /// `NATURAL JOIN t`
    Natural {
        /// Join type.
        kind: JoinKind,
        /// Joined table.
        table: TableRef,
    },
    /// `CROSS JOIN t`
    Cross {
        /// Joined table.
        table: TableRef,
    },
}

impl Join {
    /// The joined table.
    #[must_use]
    pub const fn table(&self) -> &TableRef {
        match self {
            Self::On { table, .. }
            | Self::Using { table, .. }
            | Self::Natural { table, .. }
            | Self::Cross { table } => table,
        }
    }

    /// The renderer key for this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::On { .. } => NodeKind::OnJoin,
            Self::Using { .. } => NodeKind::UsingJoin,
            Self::Natural { .. } => NodeKind::NaturalJoin,
            Self::Cross { .. } => NodeKind::CrossJoin,
        }
    }
}
