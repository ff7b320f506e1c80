//! Loading and transcoding for ionflow.
//!
//! This crate provides:
//! - [`Loader`] - Builds element trees from either encoding, detected by the version marker
//! - [`deep_read`] / [`consume_current_value`] - Full traversal of a cursor, for validation
//! - `ensure_binary` / `ensure_text` - Transcoding only when the input is in the other encoding

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod walk;

pub use ionflow_binary::is_binary;
pub use loader::Loader;
pub use walk::{ReadStats, consume_current_value, deep_read};
