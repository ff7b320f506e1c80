//! Value kind descriptors.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a value.
///
/// Every kind has a distinct typed null; `Type::Null` is the kind of the
/// untyped `null` (also written `null.null`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The null type.
    Null,
    /// Boolean.
    Bool,
    /// Arbitrary-precision integer.
    Int,
    /// 64-bit binary floating point.
    Float,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Point in time with precision and offset.
    Timestamp,
    /// Interned symbol.
    Symbol,
    /// Unicode string.
    String,
    /// Character large object (raw octets meant to be text).
    Clob,
    /// Binary large object.
    Blob,
    /// Ordered sequence.
    List,
    /// Ordered s-expression.
    SExp,
    /// Collection of named fields.
    Struct,
}

impl Type {
    /// All kinds, in the order of their binary type codes.
    pub const ALL: [Type; 13] = [
        Type::Null,
        Type::Bool,
        Type::Int,
        Type::Float,
        Type::Decimal,
        Type::Timestamp,
        Type::Symbol,
        Type::String,
        Type::Clob,
        Type::Blob,
        Type::List,
        Type::SExp,
        Type::Struct,
    ];

    /// Returns true for list, s-expression and struct.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::List | Self::SExp | Self::Struct)
    }

    /// Returns true for every non-container kind.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !self.is_container()
    }

    /// Returns true for int, float and decimal.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Decimal)
    }

    /// Returns true for string and symbol.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::String | Self::Symbol)
    }

    /// Returns true for blob and clob.
    #[must_use]
    pub const fn is_lob(self) -> bool {
        matches!(self, Self::Blob | Self::Clob)
    }

    /// The keyword used for this type in text (`null.<name>`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Timestamp => "timestamp",
            Self::Symbol => "symbol",
            Self::String => "string",
            Self::Clob => "clob",
            Self::Blob => "blob",
            Self::List => "list",
            Self::SExp => "sexp",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a type keyword is not recognized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type keyword: {}", self.0)
    }
}

impl std::error::Error for UnknownType {}

impl FromStr for Type {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownType(s.to_string()))
    }
}
