//! Standard SQL policy.

use super::{Dialect, PaginationStyle};

/// Standard SQL: double-quoted identifiers, `NULLS FIRST|LAST`, OFFSET/FETCH
/// pagination, no `%`, no `ILIKE`, no regex operators.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl AnsiDialect {
    /// Creates a new ANSI dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for AnsiDialect {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn pagination(&self) -> PaginationStyle {
        PaginationStyle::OffsetFetch
    }
}
