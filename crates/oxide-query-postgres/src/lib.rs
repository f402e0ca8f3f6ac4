//! # oxide-query-postgres
//!
//! PostgreSQL dialect for `oxide-query-core`.
//!
//! The dialect starts from the standard bundle and overrides only what
//! PostgreSQL does differently.
//!
//! # How PostgreSQL differs from standard SQL
//!
//! - **[Type casts]**: `expr::type` next to `CAST(expr AS type)`, and array
//!   types written `type[]`.
//! - **[Arrays]**: subscripts `a[i]` and slices `a[lo:hi]`.
//! - **[Operators]**: `%`, `ILIKE`, the POSIX regex operators `~ ~* !~ !~*`,
//!   free-form operators such as `@>` and the qualified form
//!   `OPERATOR(schema.op)`.
//! - **[String constants]**: escape strings `E'...'` and dollar-quoted
//!   strings `$tag$...$tag$`.
//! - **[DISTINCT ON]** and the `FOR NO KEY UPDATE` / `FOR KEY SHARE` row locks.
//! - **Pagination** with `LIMIT` / `OFFSET`, no ORDER BY required.
//!
//! [Type casts]: https://www.postgresql.org/docs/current/sql-expressions.html#SQL-SYNTAX-TYPE-CASTS
//! [Arrays]: https://www.postgresql.org/docs/current/arrays.html
//! [Operators]: https://www.postgresql.org/docs/current/functions-matching.html
//! [String constants]: https://www.postgresql.org/docs/current/sql-syntax-lexical.html#SQL-SYNTAX-STRINGS
//! [DISTINCT ON]: https://www.postgresql.org/docs/current/sql-select.html#SQL-DISTINCT
//!
//! ## Example
//!
//! ```rust
//! use oxide_query_core::{transpile, DialectCatalog};
//!
//! let mut catalog = DialectCatalog::new();
//! oxide_query_postgres::register(&mut catalog);
//!
//! let sql = transpile(
//!     "SELECT id::text FROM users ORDER BY id LIMIT 5 OFFSET 10",
//!     "postgres",
//!     "ansi",
//!     &catalog,
//! )
//! .unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT CAST(id AS TEXT)\nFROM users\nORDER BY id\nOFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
//! );
//!
//! let sql = transpile("SELECT id FROM users LIMIT 5", "ansi", "postgres", &catalog).unwrap();
//! assert_eq!(sql, "SELECT id\nFROM users\nLIMIT 5");
//! ```

mod dialect;
mod parser;
mod render;

use std::sync::OnceLock;

use oxide_query_core::dialect::{DialectCatalog, SqlDialect};
use tracing::debug;

pub use dialect::PostgresDialect;
pub use parser::CAST_SHORTHAND;

/// The PostgreSQL dialect bundle.
#[must_use]
pub fn postgres() -> SqlDialect {
    static POSTGRES: OnceLock<SqlDialect> = OnceLock::new();
    POSTGRES
        .get_or_init(|| {
            let mut builder = SqlDialect::ansi().extend().policy(PostgresDialect::new());
            parser::register(builder.parsers_mut());
            render::register(builder.renderers_mut());
            builder.build()
        })
        .clone()
}

/// Adds the `postgres` dialect to `catalog`.
pub fn register(catalog: &mut DialectCatalog) {
    debug!("adding postgres to the dialect catalog");
    catalog.register(postgres());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_is_shared() {
        assert_eq!(postgres().name(), "postgres");
        assert_eq!(postgres().policy().name(), "postgres");
    }

    #[test]
    fn test_register() {
        let mut catalog = DialectCatalog::new();
        register(&mut catalog);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["ansi", "postgres"]);
        assert!(catalog.get("PostgreSQL").is_err());
        assert_eq!(catalog.get("Postgres").unwrap().name(), "postgres");
    }

    #[test]
    fn test_standard_bundle_is_untouched() {
        let _ = postgres();
        assert!(SqlDialect::ansi().parse_expr("a::int").is_err());
    }
}
