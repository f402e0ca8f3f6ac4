//! Stateless token pattern checks shared by handlers' `matches` methods.

use crate::lexer::{Keyword, TokenKind};

use super::Cursor;

/// Lookahead predicates. None of them consume tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lookahead;

#[allow(clippy::unused_self)]
impl Lookahead {
    /// `SELECT`, `WITH`, or parentheses opening one of those.
    #[must_use]
    pub const fn query_start(&self, cur: &Cursor<'_>, offset: usize) -> bool {
        let mut i = offset;
        while matches!(cur.peek_kind(i), TokenKind::LeftParen) {
            i += 1;
        }
        matches!(cur.peek_keyword(i), Some(Keyword::Select | Keyword::With))
    }

    /// A parenthesized query at `offset`.
    #[must_use]
    pub const fn subquery(&self, cur: &Cursor<'_>, offset: usize) -> bool {
        matches!(cur.peek_kind(offset), TokenKind::LeftParen) && self.query_start(cur, offset + 1)
    }

    /// `name [. name]* (` at the cursor.
    #[must_use]
    pub const fn function_call(&self, cur: &Cursor<'_>) -> bool {
        let mut i = 0;
        loop {
            if !cur.peek(i).is_identifier_like() && !Self::callable_keyword(cur, i) {
                return false;
            }
            match cur.peek_kind(i + 1) {
                TokenKind::Dot => i += 2,
                TokenKind::LeftParen => return true,
                _ => return false,
            }
        }
    }

    /// Reserved words that still name functions, such as `LEFT(s, 2)`.
    const fn callable_keyword(cur: &Cursor<'_>, offset: usize) -> bool {
        matches!(
            cur.peek_keyword(offset),
            Some(Keyword::Left | Keyword::Right)
        )
    }

    /// `name [. name]* . *` at the cursor.
    #[must_use]
    pub const fn qualified_wildcard(&self, cur: &Cursor<'_>) -> bool {
        let mut i = 0;
        while cur.peek(i).is_identifier_like() && matches!(cur.peek_kind(i + 1), TokenKind::Dot) {
            if matches!(cur.peek_kind(i + 2), TokenKind::Star) {
                return true;
            }
            i += 2;
        }
        false
    }

    /// `DATE '...'`, `TIME '...'`, `TIMESTAMP '...'` or `INTERVAL '...'`.
    #[must_use]
    pub const fn typed_literal(&self, cur: &Cursor<'_>) -> bool {
        matches!(
            cur.peek_keyword(0),
            Some(Keyword::Date | Keyword::Time | Keyword::Timestamp | Keyword::Interval)
        ) && matches!(cur.peek_kind(1), TokenKind::String(_))
    }

    /// A parenthesized list with a top-level comma followed by a comparison
    /// or IN, as in `(a, b) IN (...)`. Such text is a row-value filter, never
    /// a grouped predicate.
    #[must_use]
    pub fn tuple_filter(&self, cur: &Cursor<'_>) -> bool {
        let Some(after) = cur.matching_paren(0) else {
            return false;
        };
        let has_comma = cur
            .find(
                &[TokenKind::Comma],
                &[TokenKind::LeftParen],
                &[TokenKind::RightParen],
                1,
            )
            .is_some_and(|stop| {
                stop < after
                    && matches!(cur.peek_kind(stop - cur.position()), TokenKind::Comma)
            });
        if !has_comma {
            return false;
        }
        let next = after - cur.position();
        match cur.peek_kind(next) {
            TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::Keyword(Keyword::In) => true,
            TokenKind::Keyword(Keyword::Not) => cur.peek_keyword(next + 1) == Some(Keyword::In),
            _ => false,
        }
    }

    /// A set operator at the cursor.
    #[must_use]
    pub const fn set_operator(&self, cur: &Cursor<'_>) -> bool {
        matches!(
            cur.peek_keyword(0),
            Some(Keyword::Union | Keyword::Intersect | Keyword::Except)
        )
    }

    /// The start of a join clause.
    #[must_use]
    pub const fn join_start(&self, cur: &Cursor<'_>) -> bool {
        matches!(
            cur.peek_keyword(0),
            Some(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Cross
                    | Keyword::Natural
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn check(sql: &str, f: impl Fn(&Lookahead, &Cursor<'_>) -> bool) -> bool {
        let tokens = tokenize(sql);
        let cur = Cursor::new(&tokens);
        f(&Lookahead, &cur)
    }

    #[test]
    fn test_function_call() {
        assert!(check("count(*)", |l, c| l.function_call(c)));
        assert!(check("pg_catalog.lower(x)", |l, c| l.function_call(c)));
        assert!(check("left(s, 2)", |l, c| l.function_call(c)));
        assert!(!check("t.col", |l, c| l.function_call(c)));
        assert!(!check("(a)", |l, c| l.function_call(c)));
    }

    #[test]
    fn test_subquery() {
        assert!(check("(SELECT 1)", |l, c| l.subquery(c, 0)));
        assert!(check("((SELECT 1) UNION (SELECT 2))", |l, c| l.subquery(c, 0)));
        assert!(!check("(a + 1)", |l, c| l.subquery(c, 0)));
    }

    #[test]
    fn test_tuple_filter() {
        assert!(check("(a, b) IN ((1, 2))", |l, c| l.tuple_filter(c)));
        assert!(check("(a, b) = (1, 2)", |l, c| l.tuple_filter(c)));
        assert!(check("(a, b) NOT IN ((1, 2))", |l, c| l.tuple_filter(c)));
        assert!(!check("(a) IN (1)", |l, c| l.tuple_filter(c)));
        assert!(!check("(a = 1 OR b = 2)", |l, c| l.tuple_filter(c)));
    }

    #[test]
    fn test_qualified_wildcard() {
        assert!(check("t.*", |l, c| l.qualified_wildcard(c)));
        assert!(check("s.t.*", |l, c| l.qualified_wildcard(c)));
        assert!(!check("t.a", |l, c| l.qualified_wildcard(c)));
    }

    #[test]
    fn test_typed_literal() {
        assert!(check("DATE '2024-01-01'", |l, c| l.typed_literal(c)));
        assert!(!check("date + 1", |l, c| l.typed_literal(c)));
    }
}
