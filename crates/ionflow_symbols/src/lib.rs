//! Symbol tables and encoding contexts for ionflow.
//!
//! This crate provides:
//! - [`SharedSymbolTable`] - Named, versioned, immutable tables
//! - [`SymbolTable`] - Append-only local tables built from imports
//! - [`Catalog`] - Lookup of shared tables by name and exact version
//! - [`EncodingContext`] - The table in effect at a stream position

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod context;
pub mod directive;
pub mod import;
pub mod shared;
pub mod system;
pub mod table;

pub use catalog::{Catalog, EmptyCatalog, SimpleCatalog};
pub use context::{DEFAULT_MAX_SYMBOL_ID, EncodingContext};
pub use directive::SymbolTableDirective;
pub use import::{Import, ImportDescriptor};
pub use shared::SharedSymbolTable;
pub use system::system_table;
pub use table::SymbolTable;
