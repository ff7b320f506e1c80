//! Reader and writer configuration.

use std::fmt;
use std::sync::Arc;

use ionflow_symbols::{Catalog, DEFAULT_MAX_SYMBOL_ID, EmptyCatalog, Import};

/// Default bound on container nesting for cursors.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Configuration for cursors.
#[derive(Clone)]
pub struct ReaderConfig {
    /// Catalog used to resolve imports named by directives.
    pub catalog: Arc<dyn Catalog>,

    /// Maximum container depth `step_in` may reach.
    pub max_depth: usize,

    /// Highest symbol id a directive may define; larger tables are
    /// rejected as malformed.
    pub max_symbol_id: usize,

    /// Yield directive structs as ordinary values (they are still applied).
    pub surface_directives: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            catalog: Arc::new(EmptyCatalog),
            max_depth: DEFAULT_MAX_DEPTH,
            max_symbol_id: DEFAULT_MAX_SYMBOL_ID,
            surface_directives: false,
        }
    }
}

impl ReaderConfig {
    /// Creates a configuration that resolves imports from `catalog`.
    #[must_use]
    pub fn with_catalog_of(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Creates a configuration that shows directives to the caller.
    #[must_use]
    pub fn system_view() -> Self {
        Self {
            surface_directives: true,
            ..Self::default()
        }
    }

    /// Builder method to set the catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Builder method to set the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder method to set the symbol id limit.
    #[must_use]
    pub fn with_max_symbol_id(mut self, max_symbol_id: usize) -> Self {
        self.max_symbol_id = max_symbol_id;
        self
    }

    /// Builder method to enable/disable surfacing of directives.
    #[must_use]
    pub fn with_surface_directives(mut self, surface: bool) -> Self {
        self.surface_directives = surface;
        self
    }
}

impl fmt::Debug for ReaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderConfig")
            .field("max_depth", &self.max_depth)
            .field("max_symbol_id", &self.max_symbol_id)
            .field("surface_directives", &self.surface_directives)
            .finish_non_exhaustive()
    }
}

/// Configuration for emitters.
#[derive(Clone, Debug, Default)]
pub struct WriterConfig {
    /// Shared tables (or placeholder ranges) the output table imports.
    pub imports: Vec<Import>,

    /// Buffered byte count after which a binary emitter flushes on its own
    /// at the end of a top-level value.
    pub flush_threshold: Option<usize>,
}

impl WriterConfig {
    /// Creates a configuration that imports the given tables.
    #[must_use]
    pub fn with_imports_of(imports: Vec<Import>) -> Self {
        Self {
            imports,
            ..Self::default()
        }
    }

    /// Creates a configuration for long streams that flushes every 64 KiB.
    #[must_use]
    pub fn streaming() -> Self {
        Self {
            flush_threshold: Some(64 * 1024),
            ..Self::default()
        }
    }

    /// Builder method to add an import.
    #[must_use]
    pub fn with_import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    /// Builder method to set the automatic flush threshold.
    #[must_use]
    pub fn with_flush_threshold(mut self, threshold: Option<usize>) -> Self {
        self.flush_threshold = threshold;
        self
    }
}
