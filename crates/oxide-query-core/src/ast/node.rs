//! Node kinds and the type-erased node wrappers the registries traffic in.

use super::{
    DataType, Distinct, Expr, GroupItem, Join, LockClause, NamedWindow, OrderItem, Pagination,
    Predicate, Query, SelectItem, TableRef, ValueSet, WindowSpec,
};

/// Registry key for parse and render handlers.
///
/// Grammar kinds name a parsing layer or category; variant kinds name one
/// concrete tree shape and double as render keys. Dialects may register
/// handlers under [`NodeKind::Extension`] for grammar pieces of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeKind {
    // Query grammar
    /// `WITH ...` or a composite query.
    Query,
    /// Terms joined by set operators.
    CompositeQuery,
    /// A SELECT block or parenthesized query.
    AtomicQuery,
    /// An entry of the select list.
    SelectItem,
    /// `DISTINCT`, `ALL` or `DISTINCT ON`.
    DistinctSpec,
    /// An ORDER BY entry.
    OrderItem,
    /// LIMIT / OFFSET / FETCH.
    Pagination,
    /// `FOR UPDATE ...`.
    LockClause,
    /// `OVER w` or `OVER (...)`.
    WindowSpec,
    /// `WINDOW w AS (...)`.
    NamedWindow,
    /// A FROM item.
    TableRef,
    /// A join clause.
    Join,
    /// A GROUP BY item.
    GroupItem,
    /// The right-hand side of IN.
    ValueSet,
    /// A data type.
    DataType,

    // Predicate grammar
    /// Entry point: bounds the predicate and parses it.
    Predicate,
    /// OR level.
    OrPredicate,
    /// AND level.
    AndPredicate,
    /// NOT, EXISTS, grouping or expression-based predicates.
    AtomicPredicate,
    /// A parenthesized predicate.
    GroupedPredicate,
    /// An expression followed by a predicate tail.
    ExpressionPredicate,
    /// Category of infix tails applied to an expression.
    PredicateTail,
    /// `IS [NOT] ...` tail.
    Is,

    // Expression grammar
    /// Entry point for scalar expressions.
    Expr,
    /// `||` and vendor operator level.
    OperatorExpr,
    /// `+` and `-` level.
    AdditiveExpr,
    /// `*`, `/` and `%` level.
    MultiplicativeExpr,
    /// Postfix operators such as COLLATE.
    PostfixExpr,
    /// Operands.
    AtomicExpr,
    /// `||` infix handler.
    Concat,

    // Expression variants
    /// A literal.
    Literal,
    /// A column reference.
    ColumnRef,
    /// Arithmetic or concatenation.
    Binary,
    /// Unary minus or bitwise not.
    Unary,
    /// CASE.
    Case,
    /// CAST.
    Cast,
    /// A function call.
    Function,
    /// `?`
    AnonymousParameter,
    /// `:name`
    NamedParameter,
    /// `$1`
    OrdinalParameter,
    /// A scalar subquery.
    Subquery,
    /// A row value.
    Row,
    /// `a[i]`
    Subscript,
    /// `a[lo:hi]`
    Slice,
    /// `COLLATE`
    Collate,
    /// `AT TIME ZONE`
    AtTimeZone,
    /// `OPERATOR(...)`
    VendorBinary,
    /// Parentheses.
    Nested,

    // Predicate variants
    /// Comparison.
    Comparison,
    /// Quantified comparison.
    Quantified,
    /// BETWEEN.
    Between,
    /// IN.
    In,
    /// LIKE / ILIKE.
    Like,
    /// IS NULL.
    IsNull,
    /// Bare boolean or IS TRUE/FALSE/UNKNOWN.
    Truth,
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Negation.
    Not,
    /// EXISTS.
    Exists,
    /// IS DISTINCT FROM.
    DistinctFrom,
    /// Regular-expression match.
    Regex,

    // Value set variants
    /// `IN (subquery)`
    SubquerySet,
    /// `IN (a, b)`
    RowSet,
    /// `IN ((a, b), (c, d))`
    RowListSet,

    // Query variants
    /// A SELECT block.
    Select,
    /// A composite query.
    Composite,
    /// A WITH query.
    With,

    // Table variants
    /// A named table.
    NamedTable,
    /// A derived table.
    SubqueryTable,
    /// A VALUES table.
    ValuesTable,
    /// A table function.
    FunctionTable,
    /// `LATERAL`.
    Lateral,

    // Join variants
    /// `JOIN ... ON`
    OnJoin,
    /// `JOIN ... USING`
    UsingJoin,
    /// `NATURAL JOIN`
    NaturalJoin,
    /// `CROSS JOIN`
    CrossJoin,

    // Group variants
    /// A plain grouping expression.
    GroupExpr,
    /// `ROLLUP`
    Rollup,
    /// `CUBE`
    Cube,
    /// `GROUPING SETS`
    GroupingSets,
    /// A parenthesized grouping set.
    GroupingSet,

    /// A dialect-defined kind.
    Extension(&'static str),
}

/// A parsed node of any family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A scalar expression.
    Expr(Expr),
    /// A predicate.
    Predicate(Predicate),
    /// A query.
    Query(Query),
    /// A select-list entry.
    SelectItem(SelectItem),
    /// An ORDER BY entry.
    OrderItem(OrderItem),
    /// A FROM item.
    TableRef(TableRef),
    /// A join.
    Join(Join),
    /// A GROUP BY item.
    GroupItem(GroupItem),
    /// An IN right-hand side.
    ValueSet(ValueSet),
    /// A data type.
    DataType(DataType),
    /// A DISTINCT specification.
    Distinct(Distinct),
    /// LIMIT/OFFSET values.
    Pagination(Pagination),
    /// A locking clause.
    Lock(LockClause),
    /// A window reference or definition.
    Window(WindowSpec),
    /// A named window.
    NamedWindow(NamedWindow),
}

impl Node {
    /// Family name used in diagnostics.
    #[must_use]
    pub const fn family(&self) -> &'static str {
        match self {
            Self::Expr(_) => "expression",
            Self::Predicate(_) => "predicate",
            Self::Query(_) => "query",
            Self::SelectItem(_) => "select item",
            Self::OrderItem(_) => "order item",
            Self::TableRef(_) => "table reference",
            Self::Join(_) => "join",
            Self::GroupItem(_) => "group item",
            Self::ValueSet(_) => "value set",
            Self::DataType(_) => "data type",
            Self::Distinct(_) => "distinct specification",
            Self::Pagination(_) => "pagination",
            Self::Lock(_) => "locking clause",
            Self::Window(_) => "window",
            Self::NamedWindow(_) => "named window",
        }
    }
}

macro_rules! node_family {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl TryFrom<Node> for $ty {
                type Error = Node;

                fn try_from(node: Node) -> Result<Self, Node> {
                    match node {
                        Node::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

node_family! {
    Expr => Expr,
    Predicate => Predicate,
    Query => Query,
    SelectItem => SelectItem,
    OrderItem => OrderItem,
    TableRef => TableRef,
    Join => Join,
    GroupItem => GroupItem,
    ValueSet => ValueSet,
    DataType => DataType,
    Distinct => Distinct,
    Pagination => Pagination,
    Lock => LockClause,
    Window => WindowSpec,
    NamedWindow => NamedWindow,
}

/// A borrowed node handed to render handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    /// A scalar expression.
    Expr(&'a Expr),
    /// A predicate.
    Predicate(&'a Predicate),
    /// A query.
    Query(&'a Query),
    /// A FROM item.
    TableRef(&'a TableRef),
    /// A join.
    Join(&'a Join),
    /// A GROUP BY item.
    GroupItem(&'a GroupItem),
    /// An IN right-hand side.
    ValueSet(&'a ValueSet),
    /// A data type.
    DataType(&'a DataType),
}

impl NodeRef<'_> {
    /// The render key of the referenced node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Expr(e) => e.kind(),
            Self::Predicate(p) => p.kind(),
            Self::Query(q) => q.kind(),
            Self::TableRef(t) => t.kind(),
            Self::Join(j) => j.kind(),
            Self::GroupItem(g) => g.kind(),
            Self::ValueSet(v) => v.kind(),
            Self::DataType(_) => NodeKind::DataType,
        }
    }
}

macro_rules! node_ref {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for NodeRef<'a> {
                fn from(value: &'a $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

node_ref! {
    Expr => Expr,
    Predicate => Predicate,
    Query => Query,
    TableRef => TableRef,
    Join => Join,
    GroupItem => GroupItem,
    ValueSet => ValueSet,
    DataType => DataType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_round_trips_through_family() {
        let node = Node::from(Expr::integer(1));
        assert_eq!(node.family(), "expression");
        assert_eq!(Expr::try_from(node), Ok(Expr::integer(1)));
    }

    #[test]
    fn test_wrong_family_is_returned() {
        let node = Node::from(Expr::integer(1));
        let back = Predicate::try_from(node);
        assert!(matches!(back, Err(Node::Expr(_))));
    }

    #[test]
    fn test_node_ref_kind() {
        let expr = Expr::column("a");
        assert_eq!(NodeRef::from(&expr).kind(), NodeKind::ColumnRef);
        assert_eq!(NodeRef::from(&DataType::Text).kind(), NodeKind::DataType);
    }
}
