//! Operand and predicate construction.

use crate::ast::{
    ComparisonOp, Expr, InvariantError, NullOrdering, ObjectName, OrderDirection, OrderItem,
    Parameter, Predicate, ValueSet,
};

/// Creates a column reference from a dotted path such as `u.id`.
#[must_use]
pub fn col(path: &str) -> Column {
    Column {
        expr: Expr::Column(ObjectName::from_dotted(path)),
    }
}

/// Creates a literal.
#[must_use]
pub fn lit<T: ToExpr>(value: T) -> Expr {
    value.to_expr()
}

/// Creates a named parameter `:name`.
#[must_use]
pub fn param(name: &str) -> Column {
    Column {
        expr: Expr::Parameter(Parameter::Named(String::from(name))),
    }
}

/// Values usable as scalar operands.
pub trait ToExpr {
    /// Converts the value into an expression.
    fn to_expr(self) -> Expr;
}

impl ToExpr for i64 {
    fn to_expr(self) -> Expr {
        Expr::integer(self)
    }
}

impl ToExpr for i32 {
    fn to_expr(self) -> Expr {
        Expr::integer(i64::from(self))
    }
}

impl ToExpr for bool {
    fn to_expr(self) -> Expr {
        Expr::boolean(self)
    }
}

impl ToExpr for &str {
    fn to_expr(self) -> Expr {
        Expr::string(self)
    }
}

impl ToExpr for String {
    fn to_expr(self) -> Expr {
        Expr::string(self)
    }
}

impl<T: ToExpr> ToExpr for Option<T> {
    fn to_expr(self) -> Expr {
        self.map_or_else(Expr::null, ToExpr::to_expr)
    }
}

impl ToExpr for Column {
    fn to_expr(self) -> Expr {
        self.expr
    }
}

/// A scalar operand that predicates are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    expr: Expr,
}

impl Column {
    /// Wraps an arbitrary scalar expression.
    ///
    /// # Errors
    ///
    /// Returns an error if `expr` is a row value.
    pub fn expr(expr: Expr) -> Result<Self, InvariantError> {
        if expr.is_row() {
            return Err(InvariantError::MultiValued {
                construct: "builder operand",
            });
        }
        Ok(Self { expr })
    }

    /// The wrapped expression.
    #[must_use]
    pub fn into_expr(self) -> Expr {
        self.expr
    }

    fn compare<T: ToExpr>(self, op: ComparisonOp, value: T) -> Predicate {
        // Both sides are scalars, so the comparison is always well formed.
        Predicate::Comparison {
            left: self.expr,
            op,
            right: value.to_expr(),
        }
    }

    /// `self = value`
    #[must_use]
    pub fn eq<T: ToExpr>(self, value: T) -> Predicate {
        self.compare(ComparisonOp::Eq, value)
    }

    /// `self <> value`
    #[must_use]
    pub fn not_eq<T: ToExpr>(self, value: T) -> Predicate {
        self.compare(ComparisonOp::NotEq, value)
    }

    /// `self < value`
    #[must_use]
    pub fn lt<T: ToExpr>(self, value: T) -> Predicate {
        self.compare(ComparisonOp::Lt, value)
    }

    /// `self <= value`
    #[must_use]
    pub fn lt_eq<T: ToExpr>(self, value: T) -> Predicate {
        self.compare(ComparisonOp::LtEq, value)
    }

    /// `self > value`
    #[must_use]
    pub fn gt<T: ToExpr>(self, value: T) -> Predicate {
        self.compare(ComparisonOp::Gt, value)
    }

    /// `self >= value`
    #[must_use]
    pub fn gt_eq<T: ToExpr>(self, value: T) -> Predicate {
        self.compare(ComparisonOp::GtEq, value)
    }

    /// `self IS NULL`
    #[must_use]
    pub fn is_null(self) -> Predicate {
        Predicate::IsNull {
            expr: self.expr,
            negated: false,
        }
    }

    /// `self IS NOT NULL`
    #[must_use]
    pub fn is_not_null(self) -> Predicate {
        Predicate::IsNull {
            expr: self.expr,
            negated: true,
        }
    }

    /// `self LIKE pattern`
    #[must_use]
    pub fn like<T: ToExpr>(self, pattern: T) -> Predicate {
        Predicate::Like {
            expr: self.expr,
            pattern: pattern.to_expr(),
            escape: None,
            negated: false,
            case_insensitive: false,
        }
    }

    /// `self NOT LIKE pattern`
    #[must_use]
    pub fn not_like<T: ToExpr>(self, pattern: T) -> Predicate {
        Predicate::Like {
            expr: self.expr,
            pattern: pattern.to_expr(),
            escape: None,
            negated: true,
            case_insensitive: false,
        }
    }

    /// `self BETWEEN low AND high`
    #[must_use]
    pub fn between<T: ToExpr, U: ToExpr>(self, low: T, high: U) -> Predicate {
        Predicate::Between {
            expr: self.expr,
            low: low.to_expr(),
            high: high.to_expr(),
            negated: false,
            symmetric: false,
        }
    }

    /// `self NOT BETWEEN low AND high`
    #[must_use]
    pub fn not_between<T: ToExpr, U: ToExpr>(self, low: T, high: U) -> Predicate {
        Predicate::Between {
            expr: self.expr,
            low: low.to_expr(),
            high: high.to_expr(),
            negated: true,
            symmetric: false,
        }
    }

    /// `self IN (values)`
    ///
    /// # Errors
    ///
    /// Returns an error if `values` is empty.
    pub fn in_list<T: ToExpr>(self, values: Vec<T>) -> Result<Predicate, InvariantError> {
        self.membership(values, false)
    }

    /// `self NOT IN (values)`
    ///
    /// # Errors
    ///
    /// Returns an error if `values` is empty.
    pub fn not_in_list<T: ToExpr>(self, values: Vec<T>) -> Result<Predicate, InvariantError> {
        self.membership(values, true)
    }

    fn membership<T: ToExpr>(
        self,
        values: Vec<T>,
        negated: bool,
    ) -> Result<Predicate, InvariantError> {
        let set = ValueSet::row(values.into_iter().map(ToExpr::to_expr).collect())?;
        Predicate::in_set(self.expr, set, negated)
    }

    /// Ascending sort key.
    #[must_use]
    pub fn asc(self) -> OrderItem {
        OrderItem {
            expr: self.expr,
            direction: Some(OrderDirection::Asc),
            nulls: None,
        }
    }

    /// Descending sort key.
    #[must_use]
    pub fn desc(self) -> OrderItem {
        OrderItem {
            expr: self.expr,
            direction: Some(OrderDirection::Desc),
            nulls: None,
        }
    }

    /// Sort key with an explicit null placement.
    #[must_use]
    pub fn nulls(self, direction: OrderDirection, nulls: NullOrdering) -> OrderItem {
        OrderItem {
            expr: self.expr,
            direction: Some(direction),
            nulls: Some(nulls),
        }
    }
}
