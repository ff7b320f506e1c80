//! Encoders for complete binary values.
//!
//! Each function appends one value (descriptor, length and body) to `out`.

use ionflow_foundation::{Decimal, Int, Precision, Timestamp, Type};

use crate::descriptor::{
    self, ANNOTATION, BOOL, DECIMAL, FLOAT, NEG_INT, NULL_LENGTH, POS_INT, STRING, SYMBOL,
    TIMESTAMP, write_header,
};
use crate::primitives::{write_int, write_uint_usize, write_var_int, write_var_uint, write_var_usize};

/// Appends a typed null.
pub fn null(out: &mut Vec<u8>, ty: Type) {
    out.push((descriptor::type_code(ty) << 4) | NULL_LENGTH);
}

/// Appends a bool.
pub fn boolean(out: &mut Vec<u8>, value: bool) {
    out.push((BOOL << 4) | u8::from(value));
}

/// Appends an int.
pub fn int(out: &mut Vec<u8>, value: &Int) {
    let code = if value.is_negative() { NEG_INT } else { POS_INT };
    let magnitude = value.magnitude_bytes();
    write_header(out, code, magnitude.len());
    out.extend_from_slice(&magnitude);
}

/// Appends a float: no body for positive zero, 8 octets otherwise.
pub fn float(out: &mut Vec<u8>, value: f64) {
    if value.to_bits() == 0 {
        write_header(out, FLOAT, 0);
    } else {
        write_header(out, FLOAT, 8);
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Appends a decimal; `0d0` has no body.
pub fn decimal(out: &mut Vec<u8>, value: &Decimal) {
    if value.exponent() == 0 && value.is_zero() && !value.is_negative_zero() {
        write_header(out, DECIMAL, 0);
        return;
    }
    let mut body = Vec::new();
    write_var_int(&mut body, value.exponent(), false);
    write_int(&mut body, value.coefficient(), value.is_negative_zero());
    write_header(out, DECIMAL, body.len());
    out.extend_from_slice(&body);
}

/// Appends a timestamp, storing its fields in UTC.
pub fn timestamp(out: &mut Vec<u8>, value: &Timestamp) {
    let mut body = Vec::new();
    match value.offset() {
        Some(offset) if value.precision() >= Precision::Minute => {
            write_var_int(&mut body, i64::from(offset), false);
        }
        _ => write_var_int(&mut body, 0, true),
    }
    let (year, month, day, hour, minute) = value.utc_fields();
    write_var_uint(&mut body, u64::from(year));
    if value.precision() >= Precision::Month {
        write_var_uint(&mut body, u64::from(month));
    }
    if value.precision() >= Precision::Day {
        write_var_uint(&mut body, u64::from(day));
    }
    if value.precision() >= Precision::Minute {
        write_var_uint(&mut body, u64::from(hour));
        write_var_uint(&mut body, u64::from(minute));
    }
    if value.precision() >= Precision::Second {
        write_var_uint(&mut body, u64::from(value.second()));
        if let Some(fraction) = value.fraction() {
            write_var_int(&mut body, fraction.exponent(), false);
            write_int(&mut body, fraction.coefficient(), false);
        }
    }
    write_header(out, TIMESTAMP, body.len());
    out.extend_from_slice(&body);
}

/// Appends a symbol by id.
pub fn symbol(out: &mut Vec<u8>, sid: usize) {
    let mut body = Vec::new();
    write_uint_usize(&mut body, sid);
    write_header(out, SYMBOL, body.len());
    out.extend_from_slice(&body);
}

/// Appends a string.
pub fn string(out: &mut Vec<u8>, value: &str) {
    write_header(out, STRING, value.len());
    out.extend_from_slice(value.as_bytes());
}

/// Appends a blob or clob.
pub fn lob(out: &mut Vec<u8>, ty: Type, value: &[u8]) {
    write_header(out, descriptor::type_code(ty), value.len());
    out.extend_from_slice(value);
}

/// Appends a container around an already-encoded body.
pub fn container(out: &mut Vec<u8>, ty: Type, body: &[u8]) {
    write_header(out, descriptor::type_code(ty), body.len());
    out.extend_from_slice(body);
}

/// Appends a value wrapped in annotations; no annotations appends it bare.
pub fn annotated(out: &mut Vec<u8>, annotations: &[usize], value: &[u8]) {
    if annotations.is_empty() {
        out.extend_from_slice(value);
        return;
    }
    let mut sids = Vec::new();
    for &sid in annotations {
        write_var_usize(&mut sids, sid);
    }
    let mut prefix = Vec::new();
    write_var_usize(&mut prefix, sids.len());
    write_header(out, ANNOTATION, prefix.len() + sids.len() + value.len());
    out.extend_from_slice(&prefix);
    out.extend_from_slice(&sids);
    out.extend_from_slice(value);
}
