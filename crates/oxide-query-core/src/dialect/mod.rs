//! SQL dialect support.
//!
//! A dialect has two halves. The [`Dialect`] trait is its formatting policy:
//! identifier quoting, the operator lexicon, null ordering and pagination.
//! A [`SqlDialect`] bundles a policy with the parser and renderer registries
//! that implement the dialect's grammar, and a [`DialectCatalog`] looks
//! bundles up by name.

mod ansi;
mod bundle;
mod catalog;

use std::fmt;

pub use ansi::AnsiDialect;
pub use bundle::{DialectBuilder, SqlDialect};
pub use catalog::DialectCatalog;

use crate::ast::{ComparisonOp, Ident, NullOrdering, OrderDirection, RegexOp};
use crate::lexer::Keyword;

/// How a dialect spells LIMIT/OFFSET semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationStyle {
    /// `LIMIT n OFFSET m`, either part optional.
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`; needs an ORDER BY.
    OffsetFetch,
    /// `SELECT TOP n`; no offset.
    Top,
    /// No pagination at all.
    None,
}

/// Operators whose spelling varies between dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// A comparison operator.
    Comparison(ComparisonOp),
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Negation.
    Not,
    /// Membership.
    In,
    /// Negated membership.
    NotIn,
    /// Pattern match.
    Like,
    /// Negated pattern match.
    NotLike,
    /// Case-insensitive pattern match.
    ILike,
    /// Negated case-insensitive pattern match.
    NotILike,
    /// String concatenation.
    Concat,
    /// Integer remainder.
    Mod,
    /// A regular-expression match.
    Regex(RegexOp),
}

impl Operator {
    /// A name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Comparison(op) => comparison_symbol(*op),
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::ILike => "ILIKE",
            Self::NotILike => "NOT ILIKE",
            Self::Concat => "||",
            Self::Mod => "%",
            Self::Regex(RegexOp::Match) => "~",
            Self::Regex(RegexOp::IMatch) => "~*",
            Self::Regex(RegexOp::NotMatch) => "!~",
            Self::Regex(RegexOp::NotIMatch) => "!~*",
        }
    }
}

const fn comparison_symbol(op: ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Eq => "=",
        ComparisonOp::NotEq => "<>",
        ComparisonOp::Lt => "<",
        ComparisonOp::LtEq => "<=",
        ComparisonOp::Gt => ">",
        ComparisonOp::GtEq => ">=",
    }
}

/// The operator lexicon of standard SQL.
#[must_use]
pub const fn standard_operator(op: Operator) -> Option<&'static str> {
    match op {
        Operator::ILike | Operator::NotILike | Operator::Mod | Operator::Regex(_) => None,
        other => Some(other.name()),
    }
}

/// Returns true for names that never need quoting on lexical grounds.
#[must_use]
pub fn is_simple_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Formatting policy of a SQL dialect.
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns true if `word` cannot be used as a bare identifier.
    fn is_reserved(&self, word: &str) -> bool {
        Keyword::from_str(word).is_some_and(|kw| kw.is_reserved())
    }

    /// Quotes an identifier if it was quoted in the source, is reserved, or
    /// is not a simple name.
    fn quote_identifier(&self, ident: &Ident) -> String {
        if !ident.quoted && is_simple_identifier(&ident.value) && !self.is_reserved(&ident.value) {
            return ident.value.clone();
        }
        let quote = self.identifier_quote();
        let escaped = ident
            .value
            .replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Spells `op`, or returns `None` if the dialect has no such operator.
    fn operator(&self, op: Operator) -> Option<&'static str> {
        standard_operator(op)
    }

    /// Returns whether `NULLS FIRST` / `NULLS LAST` can be written.
    fn supports_nulls_ordering(&self) -> bool {
        true
    }

    /// Where NULLs sort when no null ordering is written.
    fn default_nulls(&self, direction: OrderDirection) -> NullOrdering {
        match direction {
            OrderDirection::Asc => NullOrdering::Last,
            OrderDirection::Desc => NullOrdering::First,
        }
    }

    /// Returns the pagination style.
    fn pagination(&self) -> PaginationStyle;

    /// Returns whether `SELECT DISTINCT ON (...)` exists.
    fn supports_distinct_on(&self) -> bool {
        false
    }

    /// Returns whether `FOR NO KEY UPDATE` and `FOR KEY SHARE` exist.
    fn supports_key_locks(&self) -> bool {
        false
    }
}
