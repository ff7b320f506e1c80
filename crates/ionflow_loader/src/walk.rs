//! Full traversal of a cursor.
//!
//! Every value is visited and every scalar materialized, so decoding errors
//! anywhere in a stream surface here rather than when a caller happens to
//! read that value.

use ionflow_foundation::{Error, Result, Type};
use ionflow_stream::Cursor;

/// Counts gathered by [`deep_read`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Values visited, containers included.
    pub values: usize,
    /// Non-null containers entered.
    pub containers: usize,
    /// Typed nulls, including `null` itself.
    pub nulls: usize,
    /// Symbol values, field names and annotations without text.
    pub unknown_symbols: usize,
    /// Deepest nesting reached, relative to where the walk started.
    pub max_depth: usize,
}

impl ReadStats {
    fn merge_child(&mut self, child: Self) {
        self.values += child.values;
        self.containers += child.containers;
        self.nulls += child.nulls;
        self.unknown_symbols += child.unknown_symbols;
        self.max_depth = self.max_depth.max(child.max_depth + 1);
    }
}

/// Reads every remaining value at the cursor's depth, descending into all
/// containers.
///
/// # Errors
///
/// The first decoding error met.
pub fn deep_read(cursor: &mut dyn Cursor) -> Result<ReadStats> {
    let mut stats = ReadStats::default();
    while cursor.next()?.is_some() {
        let value = consume_current_value(cursor)?;
        stats.values += value.values;
        stats.containers += value.containers;
        stats.nulls += value.nulls;
        stats.unknown_symbols += value.unknown_symbols;
        stats.max_depth = stats.max_depth.max(value.max_depth);
    }
    Ok(stats)
}

/// Reads the current value completely, leaving the cursor at the same depth
/// so the next call to `next` moves to the following value.
///
/// A scalar stays current. A non-null container is stepped into and back
/// out of, after which there is no current value.
///
/// # Errors
///
/// `CursorState` with no current value, or the first decoding error met.
pub fn consume_current_value(cursor: &mut dyn Cursor) -> Result<ReadStats> {
    let ty = cursor
        .current_type()
        .ok_or_else(|| Error::cursor_state("no current value to consume"))?;
    let mut stats = ReadStats {
        values: 1,
        ..ReadStats::default()
    };
    if cursor.field_name().is_some_and(|name| name.is_unknown_text()) {
        stats.unknown_symbols += 1;
    }
    stats.unknown_symbols += cursor
        .annotations()
        .iter()
        .filter(|a| a.is_unknown_text())
        .count();

    if cursor.is_null() {
        stats.nulls += 1;
        return Ok(stats);
    }
    match ty {
        Type::Null => stats.nulls += 1,
        Type::Bool => {
            cursor.bool_value()?;
        }
        Type::Int => {
            cursor.int_value()?;
        }
        Type::Float => {
            cursor.float_value()?;
        }
        Type::Decimal => {
            cursor.decimal_value()?;
        }
        Type::Timestamp => {
            cursor.timestamp_value()?;
        }
        Type::String => {
            cursor.string_value()?;
        }
        Type::Symbol => {
            if cursor.symbol_value()?.is_unknown_text() {
                stats.unknown_symbols += 1;
            }
        }
        Type::Blob | Type::Clob => {
            cursor.bytes_value()?;
        }
        Type::List | Type::SExp | Type::Struct => {
            stats.containers += 1;
            cursor.step_in()?;
            let children = deep_read(cursor)?;
            cursor.step_out()?;
            stats.merge_child(children);
        }
    }
    Ok(stats)
}
