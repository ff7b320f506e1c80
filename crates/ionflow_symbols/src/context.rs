//! The live symbol resolution state of a stream.

use std::fmt;
use std::sync::Arc;

use ionflow_foundation::{Error, Result, SymbolToken};
use tracing::debug;

use crate::catalog::{Catalog, EmptyCatalog};
use crate::directive::SymbolTableDirective;
use crate::table::SymbolTable;

/// Default bound on the highest id a directive may define.
pub const DEFAULT_MAX_SYMBOL_ID: usize = 1 << 20;

/// The symbol table in effect at a stream position, and where it started.
///
/// The table is held behind an `Arc`: readers take cheap snapshots with
/// [`EncodingContext::snapshot`], and interning copies the table only when a
/// snapshot is still alive.
#[derive(Clone)]
pub struct EncodingContext {
    table: Arc<SymbolTable>,
    activated_at: usize,
    catalog: Arc<dyn Catalog>,
    max_symbol_id: usize,
}

impl Default for EncodingContext {
    fn default() -> Self {
        Self::new(Arc::new(EmptyCatalog))
    }
}

impl EncodingContext {
    /// Creates a context at the system table.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            table: Arc::new(SymbolTable::system()),
            activated_at: 0,
            catalog,
            max_symbol_id: DEFAULT_MAX_SYMBOL_ID,
        }
    }

    /// Creates a context that starts from a given table.
    #[must_use]
    pub fn with_table(table: SymbolTable, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            table: Arc::new(table),
            activated_at: 0,
            catalog,
            max_symbol_id: DEFAULT_MAX_SYMBOL_ID,
        }
    }

    /// Builder method to bound the ids directives may define.
    #[must_use]
    pub const fn with_max_symbol_id(mut self, max_symbol_id: usize) -> Self {
        self.max_symbol_id = max_symbol_id;
        self
    }

    /// Returns the active table.
    #[must_use]
    pub fn current_table(&self) -> &SymbolTable {
        &self.table
    }

    /// Returns a snapshot of the active table.
    #[must_use]
    pub fn snapshot(&self) -> Arc<SymbolTable> {
        self.table.clone()
    }

    /// Returns the offset at which the active table took effect.
    #[must_use]
    pub const fn activated_at(&self) -> usize {
        self.activated_at
    }

    /// Returns the catalog used to resolve imports.
    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }

    /// Makes `table` the active table from `offset` onward.
    pub fn advance_to(&mut self, table: SymbolTable, offset: usize) {
        debug!(
            offset,
            max_id = table.max_id(),
            imports = table.imports().len(),
            "symbol table advanced"
        );
        self.table = Arc::new(table);
        self.activated_at = offset;
    }

    /// Returns to the system table, as a version marker does.
    pub fn reset(&mut self, offset: usize) {
        debug!(offset, "version marker; symbol table reset");
        self.table = Arc::new(SymbolTable::system());
        self.activated_at = offset;
    }

    /// Interns text in the active table.
    pub fn intern(&mut self, text: &str) -> usize {
        if let Some(sid) = self.table.sid_for(text) {
            return sid;
        }
        Arc::make_mut(&mut self.table).intern(text)
    }

    /// Resolves an id against the active table.
    #[must_use]
    pub fn resolve(&self, sid: usize) -> SymbolToken {
        self.table.token_for(sid)
    }

    /// Applies a decoded directive found at `offset`.
    ///
    /// # Errors
    ///
    /// Fails if an import can neither be resolved nor sized, or with
    /// `MalformedInput` if the resulting table would exceed the id limit.
    /// The active table is unchanged on failure.
    pub fn apply(&mut self, directive: &SymbolTableDirective, offset: usize) -> Result<()> {
        let mut table = if directive.append {
            (*self.table).clone()
        } else {
            SymbolTable::build(&directive.imports, self.catalog.as_ref())?
        };
        for symbol in &directive.symbols {
            table.declare(symbol.as_deref());
        }
        if table.max_id() > self.max_symbol_id {
            return Err(Error::malformed(
                format!(
                    "symbol table defines {} ids, more than the limit of {}",
                    table.max_id(),
                    self.max_symbol_id
                ),
                offset,
            ));
        }
        self.advance_to(table, offset);
        Ok(())
    }
}

impl fmt::Debug for EncodingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingContext")
            .field("max_id", &self.table.max_id())
            .field("imports", &self.table.imports().len())
            .field("activated_at", &self.activated_at)
            .finish_non_exhaustive()
    }
}
