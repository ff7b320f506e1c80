//! Source position tracking.
//!
//! A `Span` bounds a value's extent in its source. Positions lie between
//! values; equal start and finish is an empty span. The unit depends on the
//! source: octets for binary input, UTF-16 code units for text input.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The unit a span's offsets count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OffsetUnit {
    /// Octets of a byte source.
    Octets,
    /// UTF-16 code units of a character source.
    Utf16CodeUnits,
}

/// Zero-based offsets of a value within its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Offset of the first unit of the value.
    pub start: usize,
    /// Offset just past the value, when it can be known without parsing ahead.
    pub finish: Option<usize>,
    /// Unit of both offsets.
    pub unit: OffsetUnit,
}

impl Span {
    /// Creates a span with a known finish.
    #[must_use]
    pub const fn new(start: usize, finish: usize, unit: OffsetUnit) -> Self {
        Self {
            start,
            finish: Some(finish),
            unit,
        }
    }

    /// Creates a span whose finish is unknown.
    #[must_use]
    pub const fn open(start: usize, unit: OffsetUnit) -> Self {
        Self {
            start,
            finish: None,
            unit,
        }
    }

    /// Returns the length, when the finish is known.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.finish.map(|f| f - self.start)
    }

    /// Returns true if start and finish are equal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.finish == Some(self.start)
    }
}

/// Offset view of a span, with `-1` standing for an unknown finish.
///
/// Cursors that can locate their values expose this capability through
/// `Cursor::current_span`; cursors that cannot return `None` there.
pub trait OffsetSpan {
    /// Zero-based start offset.
    fn start_offset(&self) -> i64;

    /// Zero-based finish offset, or `-1` when it is implicit.
    fn finish_offset(&self) -> i64;
}

impl OffsetSpan for Span {
    fn start_offset(&self) -> i64 {
        i64::try_from(self.start).unwrap_or(i64::MAX)
    }

    fn finish_offset(&self) -> i64 {
        self.finish
            .map_or(-1, |f| i64::try_from(f).unwrap_or(i64::MAX))
    }
}
