//! Data type grammar for CAST targets.

use std::sync::Arc;

use crate::ast::{DataType, Node, NodeKind};
use crate::lexer::{Keyword, TokenKind};

use super::{
    comma_list, object_name, unsigned, Cursor, ParseContext, ParseError, ParseHandler,
    ParserRegistry,
};

pub(super) fn register(registry: &mut ParserRegistry) {
    registry.register(NodeKind::DataType, Arc::new(DataTypeParser::STANDARD));
}

/// Parses a data type, including `WITH TIME ZONE` variants, custom dotted
/// names with numeric modifiers and the `ARRAY` suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTypeParser {
    /// Also accept the `type[]` array suffix.
    pub arrays: bool,
}

impl DataTypeParser {
    /// Standard types; arrays only as `type ARRAY`.
    pub const STANDARD: Self = Self { arrays: false };

    /// Also `type[]`.
    pub const WITH_ARRAYS: Self = Self { arrays: true };

    fn modifiers(cur: &mut Cursor<'_>) -> Result<Vec<u32>, ParseError> {
        if !cur.consume_if(&TokenKind::LeftParen) {
            return Ok(Vec::new());
        }
        let modifiers = comma_list(cur, |cur| unsigned(cur, "type modifier"))?;
        cur.expect_right_paren()?;
        Ok(modifiers)
    }

    fn length(cur: &mut Cursor<'_>, name: &str) -> Result<Option<u32>, ParseError> {
        let span = cur.current().span;
        match Self::modifiers(cur)?.as_slice() {
            [] => Ok(None),
            [len] => Ok(Some(*len)),
            _ => Err(ParseError::new(format!("{name} takes one modifier"), span)),
        }
    }

    fn precision_scale(
        cur: &mut Cursor<'_>,
        name: &str,
    ) -> Result<(Option<u16>, Option<u16>), ParseError> {
        let span = cur.current().span;
        let narrow = |value: u32| {
            u16::try_from(value).map_err(|_| {
                ParseError::new(format!("{name} modifier {value} is out of range"), span)
            })
        };
        match Self::modifiers(cur)?.as_slice() {
            [] => Ok((None, None)),
            [p] => Ok((Some(narrow(*p)?), None)),
            [p, s] => Ok((Some(narrow(*p)?), Some(narrow(*s)?))),
            _ => Err(ParseError::new(format!("{name} takes at most two modifiers"), span)),
        }
    }

    fn with_time_zone(cur: &mut Cursor<'_>) -> bool {
        for (keyword, value) in [(Keyword::With, true), (Keyword::Without, false)] {
            if cur.check_keywords(&[keyword, Keyword::Time, Keyword::Zone]) {
                cur.advance();
                cur.advance();
                cur.advance();
                return value;
            }
        }
        false
    }

    fn base(cur: &mut Cursor<'_>) -> Result<DataType, ParseError> {
        let Some(keyword) = cur.peek_keyword(0) else {
            return Self::custom(cur);
        };
        let data_type = match keyword {
            Keyword::Smallint => DataType::Smallint,
            Keyword::Int | Keyword::Integer => DataType::Integer,
            Keyword::Bigint => DataType::Bigint,
            Keyword::Real => DataType::Real,
            Keyword::Double => {
                cur.advance();
                cur.consume_keyword(Keyword::Precision);
                return Ok(DataType::Double);
            }
            Keyword::Float => {
                cur.advance();
                return Ok(DataType::Float(Self::length(cur, "FLOAT")?));
            }
            Keyword::Decimal | Keyword::Numeric => {
                cur.advance();
                let (precision, scale) = Self::precision_scale(cur, keyword.as_str())?;
                return Ok(if keyword == Keyword::Decimal {
                    DataType::Decimal { precision, scale }
                } else {
                    DataType::Numeric { precision, scale }
                });
            }
            Keyword::Char | Keyword::Character => {
                cur.advance();
                if cur.consume_keyword(Keyword::Varying) {
                    return Ok(DataType::Varchar(Self::length(cur, "VARCHAR")?));
                }
                return Ok(DataType::Char(Self::length(cur, "CHAR")?));
            }
            Keyword::Varchar => {
                cur.advance();
                return Ok(DataType::Varchar(Self::length(cur, "VARCHAR")?));
            }
            Keyword::Text => DataType::Text,
            Keyword::Blob => DataType::Blob,
            Keyword::Boolean => DataType::Boolean,
            Keyword::Date => DataType::Date,
            Keyword::Interval => DataType::Interval,
            Keyword::Time => {
                cur.advance();
                return Ok(DataType::Time {
                    with_time_zone: Self::with_time_zone(cur),
                });
            }
            Keyword::Timestamp => {
                cur.advance();
                return Ok(DataType::Timestamp {
                    with_time_zone: Self::with_time_zone(cur),
                });
            }
            _ => return Self::custom(cur),
        };
        cur.advance();
        Ok(data_type)
    }

    fn custom(cur: &mut Cursor<'_>) -> Result<DataType, ParseError> {
        if !cur.current().is_identifier_like() {
            return Err(ParseError::unexpected("data type", cur.current()));
        }
        let name = object_name(cur)?;
        let modifiers = Self::modifiers(cur)?;
        Ok(DataType::Custom { name, modifiers })
    }
}

impl ParseHandler for DataTypeParser {
    fn parse(&self, cur: &mut Cursor<'_>, _ctx: &mut ParseContext<'_>) -> Result<Node, ParseError> {
        let mut data_type = Self::base(cur)?;
        loop {
            if cur.consume_keyword(Keyword::Array) {
                data_type = DataType::Array(Box::new(data_type));
            } else if self.arrays
                && cur.check(&TokenKind::LeftBracket)
                && matches!(cur.peek_kind(1), TokenKind::RightBracket)
            {
                cur.advance();
                cur.advance();
                data_type = DataType::Array(Box::new(data_type));
            } else {
                return Ok(data_type.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ObjectName;
    use crate::config::ParserConfig;
    use crate::lexer::tokenize;

    fn data_type_with(parser: DataTypeParser, sql: &str) -> Result<DataType, ParseError> {
        let mut registry = ParserRegistry::new();
        registry.register(NodeKind::DataType, Arc::new(parser));
        let tokens = tokenize(sql);
        let mut cur = Cursor::new(&tokens);
        let config = ParserConfig::default();
        let mut ctx = ParseContext::new(&registry, &config);
        let data_type = ctx.parse(NodeKind::DataType, &mut cur)?;
        assert!(cur.is_at_end(), "leftover tokens in {sql:?}");
        Ok(data_type)
    }

    fn data_type(sql: &str) -> DataType {
        data_type_with(DataTypeParser::STANDARD, sql).unwrap()
    }

    #[test]
    fn test_keyword_types() {
        assert_eq!(data_type("int"), DataType::Integer);
        assert_eq!(data_type("DOUBLE PRECISION"), DataType::Double);
        assert_eq!(
            data_type("character varying(20)"),
            DataType::Varchar(Some(20))
        );
        assert_eq!(data_type("char"), DataType::Char(None));
        assert_eq!(
            data_type("NUMERIC(10, 2)"),
            DataType::Numeric {
                precision: Some(10),
                scale: Some(2)
            }
        );
    }

    #[test]
    fn test_time_zones() {
        assert_eq!(
            data_type("timestamp with time zone"),
            DataType::Timestamp {
                with_time_zone: true
            }
        );
        assert_eq!(
            data_type("TIME WITHOUT TIME ZONE"),
            DataType::Time {
                with_time_zone: false
            }
        );
    }

    #[test]
    fn test_custom_types() {
        assert_eq!(
            data_type("geo.point(4326)"),
            DataType::Custom {
                name: ObjectName::from_dotted("geo.point"),
                modifiers: vec![4326],
            }
        );
    }

    #[test]
    fn test_array_suffixes() {
        assert_eq!(
            data_type("INTEGER ARRAY"),
            DataType::Array(Box::new(DataType::Integer))
        );
        assert_eq!(
            data_type_with(DataTypeParser::WITH_ARRAYS, "text[][]").unwrap(),
            DataType::Array(Box::new(DataType::Array(Box::new(DataType::Text))))
        );
    }

    #[test]
    fn test_modifier_errors() {
        let err = data_type_with(DataTypeParser::STANDARD, "VARCHAR(1, 2)").unwrap_err();
        assert_eq!(err.message, "VARCHAR takes one modifier");
        let err = data_type_with(DataTypeParser::STANDARD, "DECIMAL(70000)").unwrap_err();
        assert!(err.message.contains("out of range"));
        let err = data_type_with(DataTypeParser::STANDARD, "SELECT").unwrap_err();
        assert_eq!(err.expected.as_deref(), Some("data type"));
    }
}
