//! Token types produced by the lexer.

use std::fmt;

use super::Span;

macro_rules! keywords {
    ($( $variant:ident => $text:literal, $reserved:literal; )*) => {
        /// SQL keywords recognised by the lexer.
        ///
        /// Non-reserved keywords may still be used as identifiers; the parser
        /// decides from context.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Keyword {
            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $( $text => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// Returns the keyword in its canonical upper-case spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )*
                }
            }

            /// Returns true if the keyword can never be used as a bare identifier.
            #[must_use]
            pub const fn is_reserved(&self) -> bool {
                match self {
                    $( Self::$variant => $reserved, )*
                }
            }
        }
    };
}

keywords! {
    Select => "SELECT", true;
    From => "FROM", true;
    Where => "WHERE", true;
    Order => "ORDER", true;
    By => "BY", true;
    Group => "GROUP", true;
    Having => "HAVING", true;
    Limit => "LIMIT", true;
    Offset => "OFFSET", true;
    Fetch => "FETCH", true;
    First => "FIRST", false;
    Next => "NEXT", false;
    Only => "ONLY", false;
    Rows => "ROWS", false;
    Row => "ROW", false;
    Distinct => "DISTINCT", true;
    All => "ALL", true;
    As => "AS", true;
    On => "ON", true;
    Using => "USING", true;
    Join => "JOIN", true;
    Inner => "INNER", true;
    Left => "LEFT", true;
    Right => "RIGHT", true;
    Full => "FULL", true;
    Outer => "OUTER", true;
    Cross => "CROSS", true;
    Natural => "NATURAL", true;
    Lateral => "LATERAL", true;
    Union => "UNION", true;
    Intersect => "INTERSECT", true;
    Except => "EXCEPT", true;
    With => "WITH", true;
    Recursive => "RECURSIVE", false;
    Values => "VALUES", true;
    And => "AND", true;
    Or => "OR", true;
    Not => "NOT", true;
    In => "IN", true;
    Between => "BETWEEN", true;
    Symmetric => "SYMMETRIC", false;
    Asymmetric => "ASYMMETRIC", false;
    Like => "LIKE", true;
    Ilike => "ILIKE", true;
    Escape => "ESCAPE", false;
    Is => "IS", true;
    Null => "NULL", true;
    True => "TRUE", true;
    False => "FALSE", true;
    Unknown => "UNKNOWN", false;
    Exists => "EXISTS", true;
    Any => "ANY", true;
    Some => "SOME", true;
    Asc => "ASC", true;
    Desc => "DESC", true;
    Nulls => "NULLS", false;
    Last => "LAST", false;
    Case => "CASE", true;
    When => "WHEN", true;
    Then => "THEN", true;
    Else => "ELSE", true;
    End => "END", true;
    Cast => "CAST", true;
    Collate => "COLLATE", true;
    At => "AT", false;
    Time => "TIME", false;
    Zone => "ZONE", false;
    Timestamp => "TIMESTAMP", false;
    Date => "DATE", false;
    Interval => "INTERVAL", false;
    Without => "WITHOUT", false;
    Over => "OVER", false;
    Partition => "PARTITION", false;
    Window => "WINDOW", true;
    Range => "RANGE", false;
    Groups => "GROUPS", false;
    Unbounded => "UNBOUNDED", false;
    Preceding => "PRECEDING", false;
    Following => "FOLLOWING", false;
    Current => "CURRENT", false;
    Filter => "FILTER", false;
    Within => "WITHIN", false;
    Rollup => "ROLLUP", false;
    Cube => "CUBE", false;
    Grouping => "GROUPING", false;
    Sets => "SETS", false;
    For => "FOR", true;
    Update => "UPDATE", false;
    Share => "SHARE", false;
    No => "NO", false;
    Key => "KEY", false;
    Nowait => "NOWAIT", false;
    Skip => "SKIP", false;
    Locked => "LOCKED", false;
    Of => "OF", false;
    Ordinality => "ORDINALITY", false;
    Operator => "OPERATOR", false;
    Int => "INT", false;
    Integer => "INTEGER", false;
    Smallint => "SMALLINT", false;
    Bigint => "BIGINT", false;
    Real => "REAL", false;
    Double => "DOUBLE", false;
    Precision => "PRECISION", false;
    Float => "FLOAT", false;
    Decimal => "DECIMAL", false;
    Numeric => "NUMERIC", false;
    Char => "CHAR", false;
    Character => "CHARACTER", false;
    Varying => "VARYING", false;
    Varchar => "VARCHAR", false;
    Text => "TEXT", false;
    Blob => "BLOB", false;
    Boolean => "BOOLEAN", false;
    Array => "ARRAY", false;
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Decimal or exponent literal, kept as written (e.g., 3.14, 1e10)
    Decimal(String),
    /// String literal (e.g., 'hello')
    String(String),
    /// Escape string literal with its raw body (e.g., E'a\nb')
    EscapeString(String),
    /// Dollar-quoted string (e.g., $fn$body$fn$)
    DollarString {
        /// The tag between the dollar signs, possibly empty.
        tag: String,
        /// The verbatim body.
        body: String,
    },
    /// Blob literal (e.g., X'1234')
    Blob(Vec<u8>),

    // Identifiers and keywords
    /// Bare identifier (e.g., `column_name`)
    Identifier(String),
    /// Delimited identifier (e.g., "Column Name")
    QuotedIdentifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// ~
    Tilde,
    /// ~*
    TildeStar,
    /// !~
    NotTilde,
    /// !~*
    NotTildeStar,
    /// Any other run of operator characters (e.g., @>, &&)
    Op(String),

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,
    /// ?
    Question,
    /// $1
    Positional(u32),

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

impl TokenKind {
    /// Compares token kinds, looking at keyword identity but ignoring the
    /// payload of every other kind.
    #[must_use]
    pub fn same_kind(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Keyword(a), Self::Keyword(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }

    /// Returns the operator spelling for symbolic tokens.
    #[must_use]
    pub const fn symbol(&self) -> Option<&'static str> {
        Some(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::Tilde => "~",
            Self::TildeStar => "~*",
            Self::NotTilde => "!~",
            Self::NotTildeStar => "!~*",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::DoubleColon => "::",
            Self::Question => "?",
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(symbol) = self.symbol() {
            return write!(f, "`{symbol}`");
        }
        match self {
            Self::Integer(i) => write!(f, "integer `{i}`"),
            Self::Decimal(d) => write!(f, "number `{d}`"),
            Self::String(s) => write!(f, "string '{s}'"),
            Self::EscapeString(s) => write!(f, "escape string E'{s}'"),
            Self::DollarString { tag, .. } => write!(f, "dollar-quoted string ${tag}$"),
            Self::Blob(_) => f.write_str("blob literal"),
            Self::Identifier(name) => write!(f, "identifier `{name}`"),
            Self::QuotedIdentifier(name) => write!(f, "identifier \"{name}\""),
            Self::Keyword(kw) => write!(f, "keyword {}", kw.as_str()),
            Self::Op(op) => write!(f, "operator `{op}`"),
            Self::Positional(n) => write!(f, "parameter `${n}`"),
            Self::Eof => f.write_str("end of input"),
            Self::Error(message) => write!(f, "invalid token ({message})"),
            _ => write!(f, "{self:?}"),
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns true if this token can name a column, table or alias:
    /// bare or quoted identifiers and non-reserved keywords.
    #[must_use]
    pub const fn is_identifier_like(&self) -> bool {
        match &self.kind {
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => true,
            TokenKind::Keyword(kw) => !kw.is_reserved(),
            _ => false,
        }
    }
}
