//! SQL data type definitions.

use std::fmt;

use super::ObjectName;

/// SQL data types usable in casts and typed literals.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    // Integer types
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,

    // Floating point
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// Float with optional binary precision.
    Float(Option<u32>),
    /// Decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },
    /// Numeric (alias for Decimal).
    Numeric {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after decimal point.
        scale: Option<u16>,
    },

    // String types
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Text (variable length, no limit).
    Text,
    /// Binary large object.
    Blob,

    // Date/time types
    /// Date.
    Date,
    /// Time of day.
    Time {
        /// `WITH TIME ZONE` was given.
        with_time_zone: bool,
    },
    /// Timestamp.
    Timestamp {
        /// `WITH TIME ZONE` was given.
        with_time_zone: bool,
    },
    /// Interval.
    Interval,

    /// Boolean.
    Boolean,

    /// Array of an element type.
    Array(Box<DataType>),

    /// Any other named type, with optional numeric modifiers.
    Custom {
        /// The type name.
        name: ObjectName,
        /// Modifiers such as `(10, 2)`.
        modifiers: Vec<u32>,
    },
}

fn with_args(name: &str, args: &[Option<u32>]) -> String {
    let args: Vec<String> = args.iter().flatten().map(u32::to_string).collect();
    if args.is_empty() {
        name.to_string()
    } else {
        format!("{name}({})", args.join(", "))
    }
}

impl DataType {
    /// Returns the standard SQL spelling of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Smallint => String::from("SMALLINT"),
            Self::Integer => String::from("INTEGER"),
            Self::Bigint => String::from("BIGINT"),
            Self::Real => String::from("REAL"),
            Self::Double => String::from("DOUBLE PRECISION"),
            Self::Float(p) => with_args("FLOAT", &[*p]),
            Self::Decimal { precision, scale } => with_args(
                "DECIMAL",
                &[precision.map(u32::from), scale.map(u32::from)],
            ),
            Self::Numeric { precision, scale } => with_args(
                "NUMERIC",
                &[precision.map(u32::from), scale.map(u32::from)],
            ),
            Self::Char(len) => with_args("CHAR", &[*len]),
            Self::Varchar(len) => with_args("VARCHAR", &[*len]),
            Self::Text => String::from("TEXT"),
            Self::Blob => String::from("BLOB"),
            Self::Date => String::from("DATE"),
            Self::Time { with_time_zone } => {
                if *with_time_zone {
                    String::from("TIME WITH TIME ZONE")
                } else {
                    String::from("TIME")
                }
            }
            Self::Timestamp { with_time_zone } => {
                if *with_time_zone {
                    String::from("TIMESTAMP WITH TIME ZONE")
                } else {
                    String::from("TIMESTAMP")
                }
            }
            Self::Interval => String::from("INTERVAL"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Array(inner) => format!("{} ARRAY", inner.to_sql()),
            Self::Custom { name, modifiers } => {
                let mods: Vec<Option<u32>> = modifiers.iter().copied().map(Some).collect();
                with_args(&name.to_string(), &mods)
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
