//! Programmatic query construction.
//!
//! Trees built here go through the same invariant-checking constructors the
//! parser uses, so anything the builder produces can be rendered.
//!
//! # Example
//!
//! ```rust
//! use oxide_query_core::builder::{col, SelectBuilder};
//! use oxide_query_core::dialect::SqlDialect;
//!
//! let query = SelectBuilder::new()
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .where_clause(col("active").eq(true))
//!     .build();
//!
//! let sql = SqlDialect::ansi().render(&query).unwrap();
//! assert_eq!(sql, "SELECT id, name\nFROM users\nWHERE active = TRUE");
//! ```

mod expr;
mod select;

pub use expr::{col, lit, param, Column, ToExpr};
pub use select::{HasColumns, HasFrom, NoColumns, NoFrom, SelectBuilder};
