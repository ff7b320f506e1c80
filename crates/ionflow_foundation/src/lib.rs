//! Core types, values, and errors for ionflow.
//!
//! This crate provides:
//! - [`Element`] and [`Value`] - The value model, with typed nulls and annotations
//! - [`SymbolToken`] - Symbol references that may lack text
//! - [`Int`], [`Decimal`], [`Timestamp`] - Exact scalar representations
//! - [`Span`] / [`OffsetSpan`] - Source positions of values
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod collections;
pub mod decimal;
pub mod error;
pub mod int;
pub mod span;
pub mod symbol;
pub mod timestamp;
pub mod types;
pub mod value;

pub use collections::Sequence;
pub use decimal::{Decimal, ParseDecimalError};
pub use error::{Error, ErrorContext, ErrorKind};
pub use int::Int;
pub use span::{OffsetSpan, OffsetUnit, Span};
pub use symbol::SymbolToken;
pub use timestamp::{Precision, Timestamp, TimestampError};
pub use types::Type;
pub use value::{Element, Struct, Value};

/// Result type for ionflow operations.
pub type Result<T> = std::result::Result<T, Error>;
