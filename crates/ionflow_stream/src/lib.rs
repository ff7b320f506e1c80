//! Streaming cursors and emitters for ionflow.
//!
//! This crate provides:
//! - [`Cursor`] - Pull-based, depth-aware reading of value streams
//! - [`Emitter`] - Push-based writing, with `write_values` transcoding
//! - [`ElementCursor`] / [`TreeEmitter`] - Adapters to and from element trees
//! - [`ReaderConfig`] / [`WriterConfig`] - Codec configuration
//! - Directive reading and writing shared by the codecs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod cursor;
pub mod directive;
pub mod emitter;
pub mod tree;

pub use config::{DEFAULT_MAX_DEPTH, ReaderConfig, WriterConfig};
pub use cursor::Cursor;
pub use directive::{is_directive, read_directive, write_directive};
pub use emitter::{Emitter, Pending, WriteState};
pub use tree::{ElementCursor, TreeEmitter};
