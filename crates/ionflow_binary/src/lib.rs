//! Binary codec for ionflow.
//!
//! This crate provides:
//! - [`BinaryCursor`] - A [`Cursor`](ionflow_stream::Cursor) over binary streams
//! - [`BinaryEmitter`] - An [`Emitter`](ionflow_stream::Emitter) producing binary streams
//! - [`primitives`] - `VarUInt`, `VarInt`, `UInt` and `Int` fields
//! - [`descriptor`] - Type descriptors and the version marker

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cursor;
pub mod descriptor;
pub mod emitter;
pub mod encode;
pub mod primitives;

pub use cursor::BinaryCursor;
pub use descriptor::VERSION_MARKER;
pub use emitter::{BinaryEmitter, to_bytes};

/// Returns true if `bytes` opens with the binary version marker.
#[must_use]
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.starts_with(&VERSION_MARKER)
}
