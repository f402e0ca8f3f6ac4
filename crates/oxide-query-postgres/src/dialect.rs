//! PostgreSQL formatting policy.

use oxide_query_core::dialect::{standard_operator, Dialect, Operator, PaginationStyle};

/// PostgreSQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn operator(&self, op: Operator) -> Option<&'static str> {
        match op {
            Operator::Mod | Operator::ILike | Operator::NotILike | Operator::Regex(_) => {
                Some(op.name())
            }
            other => standard_operator(other),
        }
    }

    fn pagination(&self) -> PaginationStyle {
        PaginationStyle::LimitOffset
    }

    fn supports_distinct_on(&self) -> bool {
        true
    }

    fn supports_key_locks(&self) -> bool {
        true
    }
}
