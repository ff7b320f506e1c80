//! Decoded symbol-table directives.

use crate::import::ImportDescriptor;

/// The content of a `$ion_symbol_table::{...}` struct.
///
/// Codecs decode directives into this form; the encoding context applies
/// them. Fields the directive format does not define are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTableDirective {
    /// Extend the current local table instead of replacing it.
    pub append: bool,
    /// Shared tables to import, in order. Ignored when appending.
    pub imports: Vec<ImportDescriptor>,
    /// Declared symbols; `None` entries reserve an id with unknown text.
    pub symbols: Vec<Option<String>>,
}

impl SymbolTableDirective {
    /// A directive that starts a fresh table.
    #[must_use]
    pub fn new(imports: Vec<ImportDescriptor>, symbols: Vec<Option<String>>) -> Self {
        Self {
            append: false,
            imports,
            symbols,
        }
    }

    /// A directive that appends symbols to the current table.
    #[must_use]
    pub fn append(symbols: Vec<Option<String>>) -> Self {
        Self {
            append: true,
            imports: Vec::new(),
            symbols,
        }
    }
}
