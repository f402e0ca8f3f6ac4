//! Scalar expression AST types.

use super::{DataType, Ident, NodeKind, ObjectName, OrderItem, Predicate, Query};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Decimal literal, kept exactly as written.
    Decimal(String),
    /// Standard string literal.
    String(String),
    /// Escape string with its raw, still-escaped body.
    EscapeString(String),
    /// Dollar-quoted string.
    DollarString {
        /// Tag between the dollar signs.
        tag: String,
        /// Verbatim body.
        body: String,
    },
    /// Blob literal.
    Blob(Vec<u8>),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
    /// Typed literal such as `DATE '2024-01-01'`.
    Typed {
        /// The type keyword.
        kind: TypedLiteralKind,
        /// The quoted text.
        value: String,
    },
}

/// Type prefixes accepted on string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypedLiteralKind {
    /// `DATE '...'`
    Date,
    /// `TIME '...'`
    Time,
    /// `TIMESTAMP '...'`
    Timestamp,
    /// `INTERVAL '...'`
    Interval,
}

impl TypedLiteralKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Interval => "INTERVAL",
        }
    }
}

/// Arithmetic and string operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%` or `MOD(a, b)`
    Mod,
    /// `||`
    Concat,
}

impl BinaryOp {
    /// Returns the symbolic spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Concat => "||",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Concat => 1,
            Self::Add | Self::Sub => 2,
            Self::Mul | Self::Div | Self::Mod => 3,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::BitNot => "~",
        }
    }
}

/// Bind parameter placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parameter {
    /// `?`
    Anonymous,
    /// `:name`
    Named(String),
    /// `$1`
    Ordinal(u32),
}

/// Arguments of a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionArgs {
    /// `f(*)`
    Star,
    /// `f(a, b)`; possibly empty.
    List(Vec<Expr>),
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionCall {
    /// The function name.
    pub name: ObjectName,
    /// The arguments.
    pub args: FunctionArgs,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// `WITHIN GROUP (ORDER BY ...)` of ordered-set aggregates.
    pub within_group: Vec<OrderItem>,
    /// `FILTER (WHERE ...)`.
    pub filter: Option<Box<Predicate>>,
    /// `OVER ...` window.
    pub over: Option<WindowSpec>,
}

impl FunctionCall {
    /// Creates a plain call with positional arguments.
    #[must_use]
    pub fn new(name: ObjectName, args: Vec<Expr>) -> Self {
        Self {
            name,
            args: FunctionArgs::List(args),
            distinct: false,
            within_group: Vec::new(),
            filter: None,
            over: None,
        }
    }
}

/// The window a window function is evaluated over.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowSpec {
    /// `OVER w`
    Named(Ident),
    /// `OVER (...)`
    Inline(WindowDefinition),
}

/// The body of a window specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowDefinition {
    /// Existing window this one refines.
    pub base: Option<Ident>,
    /// `PARTITION BY` expressions.
    pub partition_by: Vec<Expr>,
    /// `ORDER BY` items.
    pub order_by: Vec<OrderItem>,
    /// Frame clause.
    pub frame: Option<WindowFrame>,
}

/// `ROWS`, `RANGE` or `GROUPS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameUnits {
    /// `ROWS`
    Rows,
    /// `RANGE`
    Range,
    /// `GROUPS`
    Groups,
}

impl FrameUnits {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
        }
    }
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameBound {
    /// `UNBOUNDED PRECEDING`
    UnboundedPreceding,
    /// `<n> PRECEDING`
    Preceding(Box<Expr>),
    /// `CURRENT ROW`
    CurrentRow,
    /// `<n> FOLLOWING`
    Following(Box<Expr>),
    /// `UNBOUNDED FOLLOWING`
    UnboundedFollowing,
}

/// A window frame clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowFrame {
    /// Frame units.
    pub units: FrameUnits,
    /// Start bound.
    pub start: FrameBound,
    /// End bound, when written as `BETWEEN start AND end`.
    pub end: Option<FrameBound>,
}

/// CASE expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaseExpr {
    /// `CASE x WHEN v THEN r ... END`
    Simple {
        /// Value being compared.
        operand: Expr,
        /// WHEN/THEN pairs.
        whens: Vec<(Expr, Expr)>,
        /// ELSE result.
        else_result: Option<Expr>,
    },
    /// `CASE WHEN cond THEN r ... END`
    Searched {
        /// WHEN/THEN pairs.
        whens: Vec<(Predicate, Expr)>,
        /// ELSE result.
        else_result: Option<Expr>,
    },
}

/// A vendor operator spelled `OPERATOR(schema.op)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VendorOperator {
    /// Schema qualifying the operator.
    pub schema: Option<Ident>,
    /// The operator symbol.
    pub symbol: String,
}

/// An SQL scalar expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),
    /// A column reference, optionally qualified.
    Column(ObjectName),
    /// An arithmetic or concatenation expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// A CASE expression.
    Case(Box<CaseExpr>),
    /// A cast.
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type.
        data_type: DataType,
        /// Written with the `::` shorthand.
        shorthand: bool,
    },
    /// A function call.
    Function(Box<FunctionCall>),
    /// A bind parameter.
    Parameter(Parameter),
    /// A scalar subquery.
    Subquery(Box<Query>),
    /// A row value: `(a, b)` or `ROW(a, b)`.
    Row {
        /// The row items.
        items: Vec<Expr>,
        /// Written with the `ROW` keyword.
        explicit: bool,
    },
    /// Element access: `a[i]`.
    Subscript {
        /// The indexed value.
        expr: Box<Expr>,
        /// The index.
        index: Box<Expr>,
    },
    /// Slice access: `a[lo:hi]`.
    Slice {
        /// The sliced value.
        expr: Box<Expr>,
        /// Lower bound.
        lower: Option<Box<Expr>>,
        /// Upper bound.
        upper: Option<Box<Expr>>,
    },
    /// `expr COLLATE name`.
    Collate {
        /// The collated expression.
        expr: Box<Expr>,
        /// The collation.
        collation: ObjectName,
    },
    /// `expr AT TIME ZONE zone`.
    AtTimeZone {
        /// The timestamp.
        expr: Box<Expr>,
        /// The zone.
        zone: Box<Expr>,
    },
    /// Binary expression with a vendor operator.
    VendorBinary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        operator: VendorOperator,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Parenthesized expression.
    Nested(Box<Expr>),
}

impl Expr {
    /// Creates a column reference from a dotted path.
    #[must_use]
    pub fn column(path: &str) -> Self {
        Self::Column(ObjectName::from_dotted(path))
    }

    /// Creates a new integer literal.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    /// Creates a new decimal literal.
    #[must_use]
    pub fn decimal(text: impl Into<String>) -> Self {
        Self::Literal(Literal::Decimal(text.into()))
    }

    /// Creates a new string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Creates a new boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Wraps the expression in parentheses.
    #[must_use]
    pub fn nested(self) -> Self {
        Self::Nested(Box::new(self))
    }

    /// Creates a call of `name` with positional arguments.
    #[must_use]
    pub fn function(name: &str, args: Vec<Self>) -> Self {
        Self::Function(Box::new(FunctionCall::new(
            ObjectName::from_dotted(name),
            args,
        )))
    }

    /// Creates a `CAST(expr AS ty)`.
    #[must_use]
    pub fn cast(self, data_type: DataType) -> Self {
        Self::Cast {
            expr: Box::new(self),
            data_type,
            shorthand: false,
        }
    }

    /// Number of values this expression yields: the width of a row value,
    /// one for everything else.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Row { items, .. } => items.len(),
            _ => 1,
        }
    }

    /// Returns true for row values.
    #[must_use]
    pub const fn is_row(&self) -> bool {
        matches!(self, Self::Row { .. })
    }

    /// Returns true if the expression can stand alone as a filter, as in
    /// `WHERE active` or `WHERE f(x)`.
    #[must_use]
    pub fn is_truth_candidate(&self) -> bool {
        match self {
            Self::Literal(lit) => matches!(lit, Literal::Boolean(_) | Literal::Null),
            Self::Nested(inner) => inner.is_truth_candidate(),
            Self::Row { .. } | Self::Binary { .. } | Self::Unary { .. } => false,
            _ => true,
        }
    }

    /// Binding strength used to decide where parentheses are needed.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } => op.precedence(),
            Self::VendorBinary { .. } => 1,
            Self::Unary { .. } => 4,
            Self::Cast {
                shorthand: true, ..
            }
            | Self::Subscript { .. }
            | Self::Slice { .. }
            | Self::Collate { .. }
            | Self::AtTimeZone { .. } => 5,
            _ => 6,
        }
    }

    /// The renderer key for this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Literal(_) => NodeKind::Literal,
            Self::Column(_) => NodeKind::ColumnRef,
            Self::Binary { .. } => NodeKind::Binary,
            Self::Unary { .. } => NodeKind::Unary,
            Self::Case(_) => NodeKind::Case,
            Self::Cast { .. } => NodeKind::Cast,
            Self::Function(_) => NodeKind::Function,
            Self::Parameter(Parameter::Anonymous) => NodeKind::AnonymousParameter,
            Self::Parameter(Parameter::Named(_)) => NodeKind::NamedParameter,
            Self::Parameter(Parameter::Ordinal(_)) => NodeKind::OrdinalParameter,
            Self::Subquery(_) => NodeKind::Subquery,
            Self::Row { .. } => NodeKind::Row,
            Self::Subscript { .. } => NodeKind::Subscript,
            Self::Slice { .. } => NodeKind::Slice,
            Self::Collate { .. } => NodeKind::Collate,
            Self::AtTimeZone { .. } => NodeKind::AtTimeZone,
            Self::VendorBinary { .. } => NodeKind::VendorBinary,
            Self::Nested(_) => NodeKind::Nested,
        }
    }
}
