//! Dialect lookup by name.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};

use super::SqlDialect;

/// Named dialects. Lookups ignore case; `ansi` is always present.
#[derive(Debug, Clone)]
pub struct DialectCatalog {
    dialects: BTreeMap<String, SqlDialect>,
}

impl Default for DialectCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectCatalog {
    /// Creates a catalog holding the standard dialect.
    #[must_use]
    pub fn new() -> Self {
        let mut catalog = Self {
            dialects: BTreeMap::new(),
        };
        catalog.register(SqlDialect::ansi());
        catalog
    }

    /// Adds `dialect` under its name, returning the dialect it replaces.
    pub fn register(&mut self, dialect: SqlDialect) -> Option<SqlDialect> {
        debug!(dialect = dialect.name(), "registering dialect");
        self.dialects
            .insert(dialect.name().to_ascii_lowercase(), dialect)
    }

    /// Looks a dialect up by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDialect`] if nothing is registered under
    /// `name`.
    pub fn get(&self, name: &str) -> Result<&SqlDialect> {
        self.dialects
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownDialect(name.to_string()))
    }

    /// Registered dialect names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dialects.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let catalog = DialectCatalog::new();
        assert_eq!(catalog.get("ANSI").unwrap().name(), "ansi");
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["ansi"]);
    }

    #[test]
    fn test_unknown_dialect() {
        let catalog = DialectCatalog::default();
        let err = catalog.get("oracle").unwrap_err();
        assert_eq!(err.to_string(), "unknown dialect: oracle");
    }
}
