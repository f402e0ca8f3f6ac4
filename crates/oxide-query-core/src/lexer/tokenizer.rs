//! SQL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// Characters that may form part of a free-form operator such as `@>`.
const OPERATOR_CHARS: &[char] = &['@', '#', '^', '&', '|', '<', '>', '=', '!', '~', '-', '+'];

/// A lexer that tokenizes SQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.start = self.pos;
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => {
                            return Some(self.error("Unterminated block comment"));
                        }
                        _ => {}
                    }
                }
                continue;
            }

            return None;
        }
    }

    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: &str) -> Token {
        self.make_token(TokenKind::Error(message.to_string()))
    }

    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        Keyword::from_str(text).map_or_else(
            || self.make_token(TokenKind::Identifier(text.to_string())),
            |keyword| self.make_token(TokenKind::Keyword(keyword)),
        )
    }

    /// Scans a delimited identifier; doubled quotes stand for one quote.
    fn scan_quoted_identifier(&mut self, quote: char) -> Token {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        value.push(quote);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => return self.error("Unterminated quoted identifier"),
            }
        }
        if value.is_empty() {
            return self.error("Zero-length delimited identifier");
        }
        self.make_token(TokenKind::QuotedIdentifier(value))
    }

    /// Scans a number; anything with a fraction or exponent stays textual.
    fn scan_number(&mut self) -> Token {
        let mut is_decimal = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_decimal = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let mark = self.pos;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_decimal = true;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                self.pos = mark;
            }
        }

        let text = &self.input[self.start..self.pos];
        if is_decimal {
            return self.make_token(TokenKind::Decimal(text.to_string()));
        }
        match text.parse::<i64>() {
            Ok(i) => self.make_token(TokenKind::Integer(i)),
            // Out-of-range integers keep their digits.
            Err(_) => self.make_token(TokenKind::Decimal(text.to_string())),
        }
    }

    /// Scans the body of a single-quoted literal. The opening quote has
    /// already been consumed.
    fn scan_quoted_body(&mut self, backslash_escapes: bool) -> Result<String, Token> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('\'') => {
                    if self.peek() == Some('\'') {
                        value.push('\'');
                        if backslash_escapes {
                            value.push('\'');
                        }
                        self.advance();
                    } else {
                        return Ok(value);
                    }
                }
                Some('\\') if backslash_escapes => {
                    value.push('\\');
                    match self.advance() {
                        Some(c) => value.push(c),
                        None => return Err(self.error("Unterminated string literal")),
                    }
                }
                Some(c) => value.push(c),
                None => return Err(self.error("Unterminated string literal")),
            }
        }
    }

    fn scan_string(&mut self) -> Token {
        match self.scan_quoted_body(false) {
            Ok(value) => self.make_token(TokenKind::String(value)),
            Err(token) => token,
        }
    }

    /// Scans `E'...'`, keeping backslash sequences verbatim.
    fn scan_escape_string(&mut self) -> Token {
        self.advance();
        match self.scan_quoted_body(true) {
            Ok(value) => self.make_token(TokenKind::EscapeString(value)),
            Err(token) => token,
        }
    }

    /// Scans `$tag$ ... $tag$` or a positional parameter `$1`.
    fn scan_dollar(&mut self) -> Token {
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            let digits = &self.input[self.start + 1..self.pos];
            return digits.parse::<u32>().map_or_else(
                |_| self.error("Positional parameter out of range"),
                |n| self.make_token(TokenKind::Positional(n)),
            );
        }

        let tag_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        if self.peek() != Some('$') {
            return self.error("Unexpected character: $");
        }
        let tag = self.input[tag_start..self.pos].to_string();
        self.advance();

        let delimiter = format!("${tag}$");
        let rest = &self.input[self.pos..];
        match rest.find(&delimiter) {
            Some(offset) => {
                let body = rest[..offset].to_string();
                self.pos += offset + delimiter.len();
                self.make_token(TokenKind::DollarString { tag, body })
            }
            None => {
                self.pos = self.input.len();
                self.error("Unterminated dollar-quoted string")
            }
        }
    }

    /// Scans a blob literal (X'...' or x'...').
    fn scan_blob(&mut self) -> Token {
        self.advance();

        let mut bytes = Vec::new();
        let mut hex_chars = String::new();

        loop {
            match self.advance() {
                Some('\'') => break,
                Some(c) if c.is_ascii_hexdigit() => {
                    hex_chars.push(c);
                    if hex_chars.len() == 2 {
                        if let Ok(byte) = u8::from_str_radix(&hex_chars, 16) {
                            bytes.push(byte);
                        }
                        hex_chars.clear();
                    }
                }
                Some(c) if c.is_whitespace() => {}
                Some(_) => return self.error("Invalid character in blob literal"),
                None => return self.error("Unterminated blob literal"),
            }
        }

        if !hex_chars.is_empty() {
            return self.error("Odd number of hex digits in blob literal");
        }
        self.make_token(TokenKind::Blob(bytes))
    }

    /// Consumes a run of operator characters and classifies it.
    fn scan_operator(&mut self) -> Token {
        while self.peek().is_some_and(|c| OPERATOR_CHARS.contains(&c)) {
            // `--` starts a comment even when glued to an operator.
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                break;
            }
            self.advance();
        }
        // A trailing sign belongs to the next operand unless the operator
        // contains a character that cannot start an expression.
        while self.pos - self.start > 1
            && self.input[..self.pos].ends_with(['+', '-'])
            && !self.input[self.start..self.pos - 1].contains(['~', '!', '@', '#', '^', '&', '|'])
        {
            self.pos -= 1;
        }
        let text = &self.input[self.start..self.pos];
        let kind = match text {
            "=" => TokenKind::Eq,
            "<>" | "!=" => TokenKind::NotEq,
            "<" => TokenKind::Lt,
            "<=" => TokenKind::LtEq,
            ">" => TokenKind::Gt,
            ">=" => TokenKind::GtEq,
            "||" => TokenKind::Concat,
            "~" => TokenKind::Tilde,
            "!~" => TokenKind::NotTilde,
            "+" => TokenKind::Plus,
            "-" => TokenKind::Minus,
            _ => TokenKind::Op(text.to_string()),
        };
        self.make_token(kind)
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        if let Some(error) = self.skip_whitespace_and_comments() {
            return error;
        }
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '?' => self.make_token(TokenKind::Question),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.pos = self.start;
                self.scan_fraction()
            }
            '.' => self.make_token(TokenKind::Dot),
            ':' => {
                if self.peek() == Some(':') {
                    self.advance();
                    self.make_token(TokenKind::DoubleColon)
                } else {
                    self.make_token(TokenKind::Colon)
                }
            }
            '~' if self.peek() == Some('*') => {
                self.advance();
                self.make_token(TokenKind::TildeStar)
            }
            '!' if self.peek() == Some('~') && self.peek_next() == Some('*') => {
                self.advance();
                self.advance();
                self.make_token(TokenKind::NotTildeStar)
            }
            // Arithmetic signs stand alone so `1--2` style input stays unambiguous.
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            c if OPERATOR_CHARS.contains(&c) => self.scan_operator(),
            '\'' => self.scan_string(),
            '"' => self.scan_quoted_identifier('"'),
            '`' => self.scan_quoted_identifier('`'),
            '$' => self.scan_dollar(),
            'X' | 'x' if self.peek() == Some('\'') => self.scan_blob(),
            'E' | 'e' if self.peek() == Some('\'') => self.scan_escape_string(),
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),
            _ => self.make_token(TokenKind::Error(format!("Unexpected character: {c}"))),
        }
    }

    /// Scans numbers written without a leading digit, such as `.5`.
    fn scan_fraction(&mut self) -> Token {
        self.advance();
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        self.make_token(TokenKind::Decimal(
            self.input[self.start..self.pos].to_string(),
        ))
    }

    /// Tokenizes the entire input. The result always ends with an EOF token.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
