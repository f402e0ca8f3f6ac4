//! Identifiers and dotted object names.

use std::fmt;

/// A single identifier.
///
/// `quoted` records that the source used a delimited identifier; renderers
/// keep such names quoted so their spelling survives case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    /// The name with delimiters removed.
    pub value: String,
    /// Whether the name was written as a delimited identifier.
    pub quoted: bool,
}

impl Ident {
    /// Creates a bare identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// Creates a delimited identifier.
    #[must_use]
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A possibly qualified name such as `schema.table.column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectName(pub Vec<Ident>);

impl ObjectName {
    /// Creates a name from its parts.
    #[must_use]
    pub const fn new(parts: Vec<Ident>) -> Self {
        Self(parts)
    }

    /// Splits a dotted path into bare identifiers.
    #[must_use]
    pub fn from_dotted(path: &str) -> Self {
        Self(path.split('.').map(Ident::new).collect())
    }

    /// Returns the name parts.
    #[must_use]
    pub fn parts(&self) -> &[Ident] {
        &self.0
    }

    /// Returns the unqualified part of the name.
    #[must_use]
    pub fn last(&self) -> Option<&Ident> {
        self.0.last()
    }
}

impl From<Ident> for ObjectName {
    fn from(ident: Ident) -> Self {
        Self(vec![ident])
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}
