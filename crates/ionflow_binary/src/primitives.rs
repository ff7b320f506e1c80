//! Variable- and fixed-length integer primitives.
//!
//! - `VarUInt`: big-endian groups of 7 bits; the last octet has its high
//!   bit set.
//! - `VarInt`: as `VarUInt`, but the first octet gives up bit 6 to the sign.
//! - `UInt`: big-endian magnitude, length given by the enclosing field.
//! - `Int`: as `UInt`, with the sign in the high bit of the first octet.
//!
//! Readers take a slice starting at the field and return the value plus the
//! number of octets consumed; `offset` is only used to report errors.

use ionflow_foundation::{Error, Int, Result};

const END_FLAG: u8 = 0x80;
const VAR_INT_SIGN: u8 = 0x40;

/// Reads a `VarUInt`.
///
/// # Errors
///
/// `UnexpectedEof` if the field is cut short, `MalformedInput` if the value
/// does not fit 64 bits.
pub fn read_var_uint(bytes: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if value > (u64::MAX >> 7) {
            return Err(Error::malformed("VarUInt exceeds 64 bits", offset));
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & END_FLAG != 0 {
            return Ok((value, i + 1));
        }
    }
    Err(Error::unexpected_eof(offset + bytes.len()))
}

/// Reads a `VarUInt` that must fit a `usize`.
///
/// # Errors
///
/// As [`read_var_uint`].
pub fn read_var_usize(bytes: &[u8], offset: usize) -> Result<(usize, usize)> {
    let (value, len) = read_var_uint(bytes, offset)?;
    let value =
        usize::try_from(value).map_err(|_| Error::malformed("VarUInt exceeds usize", offset))?;
    Ok((value, len))
}

/// A decoded `VarInt`; negative zero is kept distinct from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarInt {
    /// The signed value.
    pub value: i64,
    /// True for the negative-zero encoding.
    pub negative_zero: bool,
}

/// Reads a `VarInt`.
///
/// # Errors
///
/// `UnexpectedEof` if the field is cut short, `MalformedInput` if the value
/// does not fit 64 bits.
pub fn read_var_int(bytes: &[u8], offset: usize) -> Result<(VarInt, usize)> {
    let Some(&first) = bytes.first() else {
        return Err(Error::unexpected_eof(offset));
    };
    let negative = first & VAR_INT_SIGN != 0;
    let mut magnitude = u64::from(first & 0x3F);
    let mut len = 1;
    if first & END_FLAG == 0 {
        let (rest, rest_len) = read_var_uint(&bytes[1..], offset + 1)?;
        let shift = 7 * u32::try_from(rest_len).unwrap_or(u32::MAX);
        if shift >= 64 || magnitude.checked_shl(shift).is_none_or(|m| m >> shift != magnitude) {
            return Err(Error::malformed("VarInt exceeds 64 bits", offset));
        }
        magnitude = (magnitude << shift) | rest;
        len += rest_len;
    }
    let value = i64::try_from(magnitude)
        .map_err(|_| Error::malformed("VarInt exceeds 64 bits", offset))?;
    Ok((
        VarInt {
            value: if negative { -value } else { value },
            negative_zero: negative && value == 0,
        },
        len,
    ))
}

/// Reads a `UInt` occupying all of `bytes`.
#[must_use]
pub fn read_uint(bytes: &[u8]) -> Int {
    Int::from_magnitude(false, bytes)
}

/// Reads a `UInt` that must fit a `usize`.
///
/// # Errors
///
/// `MalformedInput` if the value is too large.
pub fn read_uint_usize(bytes: &[u8], offset: usize) -> Result<usize> {
    if bytes.len() > std::mem::size_of::<usize>() {
        return Err(Error::malformed("UInt exceeds usize", offset));
    }
    Ok(bytes.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b)))
}

/// Reads an `Int` occupying all of `bytes`.
///
/// Returns the value and whether it was encoded as negative zero.
#[must_use]
pub fn read_int(bytes: &[u8]) -> (Int, bool) {
    let Some((&first, rest)) = bytes.split_first() else {
        return (Int::default(), false);
    };
    let negative = first & 0x80 != 0;
    let mut magnitude = Vec::with_capacity(bytes.len());
    magnitude.push(first & 0x7F);
    magnitude.extend_from_slice(rest);
    let value = Int::from_magnitude(negative, &magnitude);
    let negative_zero = negative && value.is_zero();
    (value, negative_zero)
}

/// Appends a `VarUInt`.
pub fn write_var_uint(out: &mut Vec<u8>, value: u64) {
    let mut groups = [0u8; 10];
    let mut n = value;
    let mut i = groups.len();
    loop {
        i -= 1;
        groups[i] = (n & 0x7F) as u8;
        n >>= 7;
        if n == 0 {
            break;
        }
    }
    groups[groups.len() - 1] |= END_FLAG;
    out.extend_from_slice(&groups[i..]);
}

/// Appends a `VarUInt` holding a `usize`.
pub fn write_var_usize(out: &mut Vec<u8>, value: usize) {
    write_var_uint(out, value as u64);
}

/// Appends a `VarInt`; `negative_zero` writes `-0` when `value` is zero.
pub fn write_var_int(out: &mut Vec<u8>, value: i64, negative_zero: bool) {
    let negative = value < 0 || (value == 0 && negative_zero);
    let magnitude = value.unsigned_abs();
    // the first octet carries 6 magnitude bits, the rest 7 each
    let mut groups = Vec::with_capacity(10);
    let mut n = magnitude;
    groups.push((n & 0x7F) as u8);
    n >>= 7;
    while n != 0 {
        groups.push((n & 0x7F) as u8);
        n >>= 7;
    }
    groups.reverse();
    if groups[0] & VAR_INT_SIGN != 0 {
        groups.insert(0, 0);
    }
    if negative {
        groups[0] |= VAR_INT_SIGN;
    }
    let last = groups.len() - 1;
    groups[last] |= END_FLAG;
    out.extend_from_slice(&groups);
}

/// Appends a `usize` as a `UInt`; zero appends nothing.
pub fn write_uint_usize(out: &mut Vec<u8>, value: usize) {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    out.extend_from_slice(&bytes[first..]);
}

/// Appends an `Int`; positive zero appends nothing, negative zero `0x80`.
pub fn write_int(out: &mut Vec<u8>, value: &Int, negative_zero: bool) {
    let mut magnitude = value.magnitude_bytes();
    let negative = value.is_negative() || (value.is_zero() && negative_zero);
    if magnitude.is_empty() {
        if negative {
            out.push(0x80);
        }
        return;
    }
    if magnitude[0] & 0x80 != 0 {
        magnitude.insert(0, 0);
    }
    if negative {
        magnitude[0] |= 0x80;
    }
    out.extend_from_slice(&magnitude);
}

/// Returns the encoded length of a `VarUInt`.
#[must_use]
pub fn var_uint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}
