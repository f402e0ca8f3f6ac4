//! Backtrackable view over a token vector.

use crate::ast::Ident;
use crate::lexer::{Keyword, Span, Token, TokenKind};

use super::ParseError;

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Reads tokens by index with arbitrary lookahead.
///
/// Tokens at or beyond the current limit are invisible: peeking there yields
/// a synthetic end-of-input token. Handlers narrow the limit to parse a
/// bounded slice (see [`Cursor::bounded`]).
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    limit: usize,
    eof: Token,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over `tokens`, which should end with an EOF token.
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        let limit = match tokens.last() {
            Some(last) if last.is_eof() => tokens.len() - 1,
            _ => tokens.len(),
        };
        let mut cursor = Self {
            tokens,
            pos: 0,
            limit,
            eof: Token::new(TokenKind::Eof, Span::point(0)),
        };
        cursor.set_limit(limit);
        cursor
    }

    fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        let offset = self.tokens.get(limit).map_or_else(
            || self.tokens.last().map_or(0, |t| t.span.end),
            |t| t.span.start,
        );
        self.eof = Token::new(TokenKind::Eof, Span::point(offset));
    }

    /// Current token index.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Index of the first invisible token.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the token `offset` positions ahead without consuming it.
    #[must_use]
    pub const fn peek(&self, offset: usize) -> &Token {
        let index = self.pos + offset;
        if index < self.limit {
            &self.tokens[index]
        } else {
            &self.eof
        }
    }

    /// Returns the current token.
    #[must_use]
    pub const fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the kind of the token `offset` positions ahead.
    #[must_use]
    pub const fn peek_kind(&self, offset: usize) -> &TokenKind {
        &self.peek(offset).kind
    }

    /// Returns the keyword `offset` positions ahead, if it is one.
    #[must_use]
    pub const fn peek_keyword(&self, offset: usize) -> Option<Keyword> {
        self.peek(offset).as_keyword()
    }

    /// Returns true when every visible token has been consumed.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.limit
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> &Token {
        if self.pos < self.limit {
            self.pos += 1;
            &self.tokens[self.pos - 1]
        } else {
            &self.eof
        }
    }

    /// Returns true if the current token has the given kind.
    #[must_use]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current().kind.same_kind(kind)
    }

    /// Returns true if the current token is the given keyword.
    #[must_use]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek_keyword(0) == Some(keyword)
    }

    /// Returns true if the tokens ahead are exactly `keywords`.
    #[must_use]
    pub fn check_keywords(&self, keywords: &[Keyword]) -> bool {
        keywords
            .iter()
            .enumerate()
            .all(|(i, kw)| self.peek_keyword(i) == Some(*kw))
    }

    /// Returns true if the current token has any of the given kinds.
    #[must_use]
    pub fn match_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|kind| self.check(kind))
    }

    /// Consumes the current token if it has the given kind.
    pub fn consume_if(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is the given keyword.
    pub fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of one of the given kinds and returns it.
    ///
    /// # Errors
    ///
    /// Returns an "unexpected token" error naming the alternatives.
    pub fn expect(&mut self, kinds: &[TokenKind]) -> Result<Token, ParseError> {
        if self.match_any(kinds) {
            return Ok(self.advance().clone());
        }
        let expected: Vec<String> = kinds.iter().map(ToString::to_string).collect();
        Err(ParseError::unexpected(expected.join(" or "), self.current()))
    }

    /// Consumes the given keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the current token is anything else.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<Span, ParseError> {
        if self.check_keyword(keyword) {
            return Ok(self.advance().span);
        }
        Err(ParseError::unexpected(keyword.as_str(), self.current()))
    }

    /// Consumes one of `keywords` and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if none of them is next.
    pub fn expect_one_of(&mut self, keywords: &[Keyword]) -> Result<Keyword, ParseError> {
        match self.peek_keyword(0) {
            Some(kw) if keywords.contains(&kw) => {
                self.advance();
                Ok(kw)
            }
            _ => {
                let expected: Vec<&str> = keywords.iter().map(Keyword::as_str).collect();
                Err(ParseError::unexpected(expected.join(" or "), self.current()))
            }
        }
    }

    /// Consumes an identifier: bare, quoted, or a non-reserved keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the current token cannot name anything.
    pub fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        let ident = match &self.current().kind {
            TokenKind::Identifier(name) => Ident::new(name.clone()),
            TokenKind::QuotedIdentifier(name) => Ident::quoted(name.clone()),
            TokenKind::Keyword(kw) if !kw.is_reserved() => Ident::new(kw.as_str().to_lowercase()),
            _ => return Err(ParseError::unexpected("identifier", self.current())),
        };
        self.advance();
        Ok(ident)
    }

    /// Consumes a closing parenthesis.
    ///
    /// # Errors
    ///
    /// Returns an error if the current token is not `)`.
    pub fn expect_right_paren(&mut self) -> Result<(), ParseError> {
        self.expect(&[TokenKind::RightParen]).map(drop)
    }

    /// Consumes an opening parenthesis.
    ///
    /// # Errors
    ///
    /// Returns an error if the current token is not `(`.
    pub fn expect_left_paren(&mut self) -> Result<(), ParseError> {
        self.expect(&[TokenKind::LeftParen]).map(drop)
    }

    /// Scans forward from `current + from` for the first token in `stop`
    /// that is not nested inside an `open`/`close` pair, returning its
    /// absolute index. An unmatched closer also ends the scan. Stop tokens
    /// are checked before closers, so a kind may appear in both sets.
    #[must_use]
    pub fn find(
        &self,
        stop: &[TokenKind],
        open: &[TokenKind],
        close: &[TokenKind],
        from: usize,
    ) -> Option<usize> {
        let contains = |set: &[TokenKind], kind: &TokenKind| set.iter().any(|k| k.same_kind(kind));
        let mut depth = 0usize;
        for index in (self.pos + from)..self.limit {
            let kind = &self.tokens[index].kind;
            if depth == 0 && contains(stop, kind) {
                return Some(index);
            }
            if contains(open, kind) {
                depth += 1;
            } else if contains(close, kind) {
                if depth == 0 {
                    return Some(index);
                }
                depth -= 1;
            }
        }
        None
    }

    /// Index just past the parenthesis matching the `(` at `current + offset`.
    #[must_use]
    pub fn matching_paren(&self, offset: usize) -> Option<usize> {
        if !self.peek_kind(offset).same_kind(&TokenKind::LeftParen) {
            return None;
        }
        self.find(
            &[],
            &[TokenKind::LeftParen],
            &[TokenKind::RightParen],
            offset + 1,
        )
        .map(|close| close + 1)
    }

    /// Saves the current position.
    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Rewinds to a saved position.
    pub fn restore(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    /// Runs `f` with the visible range ending at absolute index `end`, then
    /// restores the previous limit. The limit never grows.
    pub fn bounded<T>(&mut self, end: usize, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.limit;
        self.set_limit(end.min(saved));
        let result = f(self);
        self.set_limit(saved);
        result
    }
}
