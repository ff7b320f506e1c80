//! Type descriptors: the octet that opens every binary value.
//!
//! The high nibble is the type code, the low nibble the length or a flag.

use ionflow_foundation::{Error, Result, Type};

use crate::primitives::{read_var_usize, write_var_usize};

/// The binary version marker for format 1.0.
pub const VERSION_MARKER: [u8; 4] = [0xE0, 0x01, 0x00, 0xEA];

/// Type code of null and NOP padding.
pub const NULL: u8 = 0x0;
/// Type code of bool.
pub const BOOL: u8 = 0x1;
/// Type code of non-negative ints.
pub const POS_INT: u8 = 0x2;
/// Type code of negative ints.
pub const NEG_INT: u8 = 0x3;
/// Type code of float.
pub const FLOAT: u8 = 0x4;
/// Type code of decimal.
pub const DECIMAL: u8 = 0x5;
/// Type code of timestamp.
pub const TIMESTAMP: u8 = 0x6;
/// Type code of symbol.
pub const SYMBOL: u8 = 0x7;
/// Type code of string.
pub const STRING: u8 = 0x8;
/// Type code of clob.
pub const CLOB: u8 = 0x9;
/// Type code of blob.
pub const BLOB: u8 = 0xA;
/// Type code of list.
pub const LIST: u8 = 0xB;
/// Type code of s-expression.
pub const SEXP: u8 = 0xC;
/// Type code of struct.
pub const STRUCT: u8 = 0xD;
/// Type code of the annotation wrapper.
pub const ANNOTATION: u8 = 0xE;
/// Reserved type code.
pub const RESERVED: u8 = 0xF;

/// Length nibble meaning a `VarUInt` length follows.
pub const VAR_LENGTH: u8 = 0xE;
/// Length nibble meaning the value is a typed null.
pub const NULL_LENGTH: u8 = 0xF;

/// A decoded descriptor with its resolved body bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// High nibble.
    pub type_code: u8,
    /// Low nibble.
    pub length_code: u8,
    /// Offset of the body.
    pub body: usize,
    /// Offset just past the body.
    pub end: usize,
}

impl Descriptor {
    /// Decodes the descriptor at `pos`, bounded by `limit`.
    ///
    /// # Errors
    ///
    /// `UnexpectedEof` if the value runs past the end of the data,
    /// `MalformedInput` if it runs past `limit` or uses a reserved form.
    pub fn read(data: &[u8], pos: usize, limit: usize) -> Result<Self> {
        let &octet = data.get(pos).ok_or_else(|| Error::unexpected_eof(pos))?;
        let type_code = octet >> 4;
        let length_code = octet & 0x0F;
        let mut body = pos + 1;
        let length = match (type_code, length_code) {
            (RESERVED, _) => return Err(Error::malformed("reserved type code 0xF", pos)),
            (BOOL, 0 | 1 | NULL_LENGTH) | (_, NULL_LENGTH) => 0,
            (BOOL, _) => return Err(Error::malformed("invalid bool length", pos)),
            (STRUCT, 1) | (_, VAR_LENGTH) => {
                let (length, len) = read_var_usize(data.get(body..limit).unwrap_or(&[]), body)?;
                body += len;
                length
            }
            (_, l) => usize::from(l),
        };
        let end = body
            .checked_add(length)
            .ok_or_else(|| Error::malformed("length overflow", pos))?;
        if end > limit {
            return Err(if limit >= data.len() {
                Error::unexpected_eof(data.len())
            } else {
                Error::malformed("value overruns its container", pos)
            });
        }
        Ok(Self {
            type_code,
            length_code,
            body,
            end,
        })
    }

    /// Returns true for NOP padding.
    #[must_use]
    pub const fn is_nop(&self) -> bool {
        self.type_code == NULL && self.length_code != NULL_LENGTH
    }

    /// Returns true for a typed null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.length_code == NULL_LENGTH
    }

    /// Returns the body length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.body
    }

    /// Returns true if the body is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.body
    }
}

/// Returns the value type of a type code, for codes that carry values.
#[must_use]
pub const fn value_type(type_code: u8) -> Option<Type> {
    Some(match type_code {
        NULL => Type::Null,
        BOOL => Type::Bool,
        POS_INT | NEG_INT => Type::Int,
        FLOAT => Type::Float,
        DECIMAL => Type::Decimal,
        TIMESTAMP => Type::Timestamp,
        SYMBOL => Type::Symbol,
        STRING => Type::String,
        CLOB => Type::Clob,
        BLOB => Type::Blob,
        LIST => Type::List,
        SEXP => Type::SExp,
        STRUCT => Type::Struct,
        _ => return None,
    })
}

/// Returns the type code used to write values of a type.
#[must_use]
pub const fn type_code(ty: Type) -> u8 {
    match ty {
        Type::Null => NULL,
        Type::Bool => BOOL,
        Type::Int => POS_INT,
        Type::Float => FLOAT,
        Type::Decimal => DECIMAL,
        Type::Timestamp => TIMESTAMP,
        Type::Symbol => SYMBOL,
        Type::String => STRING,
        Type::Clob => CLOB,
        Type::Blob => BLOB,
        Type::List => LIST,
        Type::SExp => SEXP,
        Type::Struct => STRUCT,
    }
}

/// Appends a descriptor (and `VarUInt` length if needed) for a body of
/// `length` octets.
pub fn write_header(out: &mut Vec<u8>, type_code: u8, length: usize) {
    // struct length 1 is taken by the sorted-struct flag
    if length < usize::from(VAR_LENGTH) && !(type_code == STRUCT && length == 1) {
        #[allow(clippy::cast_possible_truncation)]
        out.push((type_code << 4) | length as u8);
    } else {
        out.push((type_code << 4) | VAR_LENGTH);
        write_var_usize(out, length);
    }
}

/// Returns the encoded size of a header for a body of `length` octets.
#[must_use]
pub fn header_len(type_code: u8, length: usize) -> usize {
    let mut scratch = Vec::with_capacity(10);
    write_header(&mut scratch, type_code, length);
    scratch.len()
}
