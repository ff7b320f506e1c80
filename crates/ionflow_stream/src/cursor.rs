//! Pull-based reading of value streams.
//!
//! A cursor walks one depth at a time. `next` moves to the following
//! sibling, skipping any container that was not stepped into; `step_in` and
//! `step_out` move between depths. Materializers read the current scalar.
//!
//! Materializers on typed nulls follow one rule: accessors with a natural
//! sentinel return it (`false`, `0`, `0e0`, `0d0`), the rest fail with
//! `NullValue`.

use std::sync::Arc;

use ionflow_foundation::{
    Decimal, Error, ErrorKind, Int, Result, Span, SymbolToken, Timestamp, Type,
};
use ionflow_symbols::SymbolTable;

/// A streaming reader over a sequence of values.
pub trait Cursor {
    /// Moves to the next value at the current depth.
    ///
    /// Returns `None` at the end of the current container or stream, and
    /// keeps returning `None` if called again.
    ///
    /// # Errors
    ///
    /// Fails on malformed input.
    fn next(&mut self) -> Result<Option<Type>>;

    /// Returns the type of the current value.
    fn current_type(&self) -> Option<Type>;

    /// Returns true if the current value is a typed null.
    fn is_null(&self) -> bool;

    /// Returns the number of containers stepped into.
    fn depth(&self) -> usize;

    /// Enters the current container.
    ///
    /// # Errors
    ///
    /// `CursorState` if there is no current value, or it is a scalar or a
    /// null container; `DepthLimit` past the configured nesting limit.
    fn step_in(&mut self) -> Result<()>;

    /// Leaves the current container, positioning after it regardless of how
    /// many children were read.
    ///
    /// # Errors
    ///
    /// `CursorState` at depth 0; malformed input found while skipping.
    fn step_out(&mut self) -> Result<()>;

    /// Returns the field name of the current value inside a struct.
    fn field_name(&self) -> Option<&SymbolToken>;

    /// Returns the annotations of the current value.
    fn annotations(&self) -> &[SymbolToken];

    /// Reads a bool; `null.bool` reads as `false`.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the current value is a bool.
    fn bool_value(&self) -> Result<bool>;

    /// Reads an int; `null.int` reads as `0`.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the current value is an int.
    fn int_value(&self) -> Result<Int>;

    /// Reads a float; `null.float` reads as `0e0`.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the current value is a float.
    fn float_value(&self) -> Result<f64>;

    /// Reads a decimal; `null.decimal` reads as `0d0`.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the current value is a decimal.
    fn decimal_value(&self) -> Result<Decimal>;

    /// Reads a timestamp.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the current value is a timestamp, `NullValue`
    /// for `null.timestamp`.
    fn timestamp_value(&self) -> Result<Timestamp>;

    /// Reads a string.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the current value is a string, `NullValue` for
    /// `null.string`.
    fn string_value(&self) -> Result<String>;

    /// Reads a symbol. Unknown text is returned as a token, not an error.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the current value is a symbol, `NullValue` for
    /// `null.symbol`.
    fn symbol_value(&self) -> Result<SymbolToken>;

    /// Reads the octets of a blob or clob.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the current value is a lob, `NullValue` for a
    /// null lob.
    fn bytes_value(&self) -> Result<Vec<u8>>;

    /// Returns the span of the current value, if this cursor tracks spans.
    fn current_span(&self) -> Option<Span>;

    /// Returns a snapshot of the symbol table in effect.
    fn symbol_table(&self) -> Arc<SymbolTable>;

    /// Reads an int that must fit in an `i64`.
    ///
    /// # Errors
    ///
    /// As [`Cursor::int_value`], plus `NumericOverflow`.
    fn i64_value(&self) -> Result<i64> {
        let value = self.int_value()?;
        value
            .as_i64()
            .ok_or_else(|| Error::new(ErrorKind::NumericOverflow(format!("{value} exceeds i64"))))
    }

    /// Returns the field name text, failing if the field name is unknown.
    ///
    /// # Errors
    ///
    /// `CursorState` outside a struct, `UnknownSymbolText` if the name has
    /// no text.
    fn field_name_text(&self) -> Result<&str> {
        self.field_name()
            .ok_or_else(|| Error::cursor_state("current value has no field name"))?
            .require_text()
    }
}

/// Validates a materializer call against the current value.
///
/// Returns whether the value is a typed null.
///
/// # Errors
///
/// `TypeMismatch` if `current` is not `expected`.
pub fn check_type(current: Option<Type>, is_null: bool, expected: Type) -> Result<bool> {
    match current {
        Some(ty) if ty == expected => Ok(is_null),
        other => Err(Error::type_mismatch(expected, other)),
    }
}

/// Validates a materializer without a null sentinel.
///
/// # Errors
///
/// `TypeMismatch` if `current` is not `expected`, `NullValue` on a null.
pub fn require_value(current: Option<Type>, is_null: bool, expected: Type) -> Result<()> {
    if check_type(current, is_null, expected)? {
        return Err(Error::null_value(expected));
    }
    Ok(())
}

/// Validates a lob materializer, accepting blobs and clobs.
///
/// # Errors
///
/// `TypeMismatch` unless the value is a lob, `NullValue` on a null lob.
pub fn require_lob(current: Option<Type>, is_null: bool) -> Result<Type> {
    match current {
        Some(ty) if ty.is_lob() && is_null => Err(Error::null_value(ty)),
        Some(ty) if ty.is_lob() => Ok(ty),
        other => Err(Error::type_mismatch(Type::Blob, other)),
    }
}

/// Validates a `step_in` call and the nesting limit.
///
/// # Errors
///
/// `CursorState` unless the current value is a non-null container,
/// `DepthLimit` if `depth` has reached `max_depth`.
pub fn check_step_in(
    current: Option<Type>,
    is_null: bool,
    depth: usize,
    max_depth: usize,
) -> Result<Type> {
    match current {
        None => Err(Error::cursor_state("step_in with no current value")),
        Some(ty) if !ty.is_container() => {
            Err(Error::cursor_state(format!("cannot step into a {ty}")))
        }
        Some(ty) if is_null => Err(Error::cursor_state(format!("cannot step into null.{ty}"))),
        Some(_) if depth >= max_depth => {
            Err(Error::new(ErrorKind::DepthLimit { limit: max_depth }))
        }
        Some(ty) => Ok(ty),
    }
}
