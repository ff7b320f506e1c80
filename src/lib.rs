//! ionflow - Symbol-interned binary and text data interchange
//!
//! This crate re-exports all layers of the ionflow system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: ionflow_loader       Tree loading, encoding detection, transcoding helpers
//! Layer 3: ionflow_binary       Binary codec, BinaryCursor, BinaryEmitter
//!          ionflow_text         Text codec, TextCursor, TextEmitter
//! Layer 2: ionflow_stream       Cursor/Emitter contracts, transcoding, tree cursor/emitter
//! Layer 1: ionflow_symbols      Symbol tables, catalogs, encoding context
//! Layer 0: ionflow_foundation   Core types (Element, SymbolToken, Span, Error)
//! ```

pub use ionflow_binary as binary;
pub use ionflow_foundation as foundation;
pub use ionflow_loader as loader;
pub use ionflow_stream as stream;
pub use ionflow_symbols as symbols;
pub use ionflow_text as text;
