//! Shared symbol tables.
//!
//! A shared table is named, versioned, and immutable once built. It is
//! distributed through a catalog and may be read from many threads at once.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An immutable, named and versioned symbol table.
///
/// Ids are local to the table and start at 1. Entries may lack text.
#[derive(Clone)]
pub struct SharedSymbolTable {
    name: Arc<str>,
    version: u32,
    symbols: Vec<Option<Arc<str>>>,
    ids: HashMap<Arc<str>, usize>,
}

impl SharedSymbolTable {
    /// Creates a shared table from symbol text in id order.
    #[must_use]
    pub fn new<S: AsRef<str>>(
        name: impl Into<Arc<str>>,
        version: u32,
        symbols: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::with_gaps(
            name,
            version,
            symbols.into_iter().map(|s| Some(s.as_ref().to_string())),
        )
    }

    /// Creates a shared table where some ids have no text.
    #[must_use]
    pub fn with_gaps(
        name: impl Into<Arc<str>>,
        version: u32,
        symbols: impl IntoIterator<Item = Option<String>>,
    ) -> Self {
        let symbols: Vec<Option<Arc<str>>> = symbols
            .into_iter()
            .map(|s| s.map(Arc::from))
            .collect();
        let mut ids = HashMap::new();
        for (i, text) in symbols.iter().enumerate() {
            if let Some(text) = text {
                // lowest id wins for duplicate text
                ids.entry(text.clone()).or_insert(i + 1);
            }
        }
        Self {
            name: name.into(),
            version: version.max(1),
            symbols,
            ids,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table version (at least 1).
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the highest id in the table.
    #[must_use]
    pub fn max_id(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the text for a table-local id.
    #[must_use]
    pub fn text_for(&self, sid: usize) -> Option<&str> {
        sid.checked_sub(1)
            .and_then(|i| self.symbols.get(i))
            .and_then(|s| s.as_deref())
    }

    /// Returns the shared text for a table-local id.
    #[must_use]
    pub fn text_arc(&self, sid: usize) -> Option<&Arc<str>> {
        sid.checked_sub(1)
            .and_then(|i| self.symbols.get(i))
            .and_then(Option::as_ref)
    }

    /// Returns the lowest table-local id with the given text.
    #[must_use]
    pub fn sid_for(&self, text: &str) -> Option<usize> {
        self.ids.get(text).copied()
    }

    /// Iterates over the entries in id order.
    pub fn symbols(&self) -> impl Iterator<Item = Option<&str>> {
        self.symbols.iter().map(|s| s.as_deref())
    }
}

impl fmt::Debug for SharedSymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSymbolTable")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("max_id", &self.max_id())
            .finish()
    }
}
