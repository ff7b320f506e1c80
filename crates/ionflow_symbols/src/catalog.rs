//! Catalogs of shared symbol tables.
//!
//! A catalog maps `(name, version)` to a shared table. Resolution is exact:
//! a catalog never substitutes a different version for the one requested.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::shared::SharedSymbolTable;

/// Lookup service for shared symbol tables.
///
/// Implementations must tolerate concurrent reads; the core never mutates
/// a catalog.
pub trait Catalog: Send + Sync {
    /// Returns the table with exactly this name and version.
    fn resolve(&self, name: &str, version: u32) -> Option<Arc<SharedSymbolTable>>;
}

/// A catalog with no tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyCatalog;

impl Catalog for EmptyCatalog {
    fn resolve(&self, _name: &str, _version: u32) -> Option<Arc<SharedSymbolTable>> {
        None
    }
}

/// In-memory catalog keyed by name and version.
///
/// Tables can be added while readers resolve from it.
#[derive(Debug, Default)]
pub struct SimpleCatalog {
    tables: RwLock<HashMap<(String, u32), Arc<SharedSymbolTable>>>,
}

impl SimpleCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, replacing any table with the same name and version.
    pub fn insert(&self, table: SharedSymbolTable) -> Arc<SharedSymbolTable> {
        let table = Arc::new(table);
        let key = (table.name().to_string(), table.version());
        self.tables
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key, table.clone());
        table
    }

    /// Builder-style variant of [`SimpleCatalog::insert`].
    #[must_use]
    pub fn with(self, table: SharedSymbolTable) -> Self {
        self.insert(table);
        self
    }

    /// Returns the highest version registered under `name`.
    #[must_use]
    pub fn latest(&self, name: &str) -> Option<Arc<SharedSymbolTable>> {
        self.tables
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|((n, _), _)| n == name)
            .max_by_key(|((_, v), _)| *v)
            .map(|(_, t)| t.clone())
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Returns true if the catalog holds no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Catalog for SimpleCatalog {
    fn resolve(&self, name: &str, version: u32) -> Option<Arc<SharedSymbolTable>> {
        self.tables
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&(name.to_string(), version))
            .cloned()
    }
}

impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    fn resolve(&self, name: &str, version: u32) -> Option<Arc<SharedSymbolTable>> {
        (**self).resolve(name, version)
    }
}
