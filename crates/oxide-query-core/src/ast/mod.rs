//! Abstract syntax tree for SQL queries.
//!
//! The tree keeps enough surface detail (quoted identifiers, cast shorthand,
//! explicit parentheses) for a parse-render-parse cycle to be stable.

mod expression;
mod group;
mod ident;
mod invariant;
mod node;
mod predicate;
mod query;
mod table;
mod types;
mod value_set;

pub use expression::{
    BinaryOp, CaseExpr, Expr, FrameBound, FrameUnits, FunctionArgs, FunctionCall, Literal,
    Parameter, TypedLiteralKind, UnaryOp, VendorOperator, WindowDefinition, WindowFrame,
    WindowSpec,
};
pub use group::GroupItem;
pub use ident::{Ident, ObjectName};
pub use invariant::InvariantError;
pub use node::{Node, NodeKind, NodeRef};
pub use predicate::{
    ComparisonOp, LogicalOp, Predicate, Quantifier, RegexOp, TruthTest, TruthValue,
};
pub use query::{
    CompositeQuery, Cte, Distinct, LockClause, LockStrength, LockWait, NamedWindow, NullOrdering,
    OrderDirection, OrderItem, Pagination, Query, Select, SelectItem, SetOpKind, SetOperator,
    WithQuery,
};
pub use table::{Join, JoinKind, TableAlias, TableRef};
pub use types::DataType;
pub use value_set::ValueSet;
