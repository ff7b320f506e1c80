//! Imports of shared tables into local tables.

use std::sync::Arc;

use ionflow_foundation::{Error, ErrorKind, Result};
use tracing::warn;

use crate::catalog::Catalog;
use crate::shared::SharedSymbolTable;

/// An import as declared in a directive, before resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDescriptor {
    /// Shared table name.
    pub name: String,
    /// Requested version (at least 1).
    pub version: u32,
    /// Declared size of the imported range.
    pub max_id: Option<usize>,
}

impl ImportDescriptor {
    /// Creates a descriptor; versions below 1 are treated as 1.
    #[must_use]
    pub fn new(name: impl Into<String>, version: u32, max_id: Option<usize>) -> Self {
        Self {
            name: name.into(),
            version: version.max(1),
            max_id,
        }
    }
}

/// A resolved import: a contiguous id range backed by a shared table, or a
/// placeholder range whose ids have no known text.
#[derive(Clone, Debug)]
pub struct Import {
    name: Arc<str>,
    version: u32,
    max_id: usize,
    table: Option<Arc<SharedSymbolTable>>,
}

impl Import {
    /// Imports all of a shared table.
    #[must_use]
    pub fn table(table: Arc<SharedSymbolTable>) -> Self {
        Self {
            name: Arc::from(table.name()),
            version: table.version(),
            max_id: table.max_id(),
            table: Some(table),
        }
    }

    /// Imports a shared table, truncated or padded to `max_id` ids.
    #[must_use]
    pub fn table_with_max_id(table: Arc<SharedSymbolTable>, max_id: usize) -> Self {
        Self {
            max_id,
            ..Self::table(table)
        }
    }

    /// A range of `max_id` ids with unknown text.
    #[must_use]
    pub fn placeholder(name: impl Into<Arc<str>>, version: u32, max_id: usize) -> Self {
        Self {
            name: name.into(),
            version: version.max(1),
            max_id,
            table: None,
        }
    }

    /// Resolves a descriptor against a catalog.
    ///
    /// An exact match is used as-is (limited to the declared `max_id`). A miss
    /// degrades to a placeholder sized by the declared `max_id`.
    ///
    /// # Errors
    ///
    /// Returns `UnresolvableImport` when the table is missing and the
    /// descriptor declares no `max_id`, since ids after it would be ambiguous.
    pub fn resolve(descriptor: &ImportDescriptor, catalog: &dyn Catalog) -> Result<Self> {
        match (catalog.resolve(&descriptor.name, descriptor.version), descriptor.max_id) {
            (Some(table), Some(max_id)) => Ok(Self::table_with_max_id(table, max_id)),
            (Some(table), None) => Ok(Self::table(table)),
            (None, Some(max_id)) => {
                warn!(
                    name = %descriptor.name,
                    version = descriptor.version,
                    max_id,
                    "shared symbol table not in catalog; substituting placeholder range"
                );
                Ok(Self::placeholder(descriptor.name.as_str(), descriptor.version, max_id))
            }
            (None, None) => Err(Error::new(ErrorKind::UnresolvableImport {
                name: descriptor.name.clone(),
                version: descriptor.version,
            })),
        }
    }

    /// Returns the shared table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the imported version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the number of ids this import occupies.
    #[must_use]
    pub const fn max_id(&self) -> usize {
        self.max_id
    }

    /// Returns true if the import is backed by a shared table.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.table.is_some()
    }

    /// Returns the text for an id relative to this import (1-based).
    #[must_use]
    pub fn text_arc(&self, sid: usize) -> Option<&Arc<str>> {
        if sid == 0 || sid > self.max_id {
            return None;
        }
        self.table.as_ref().and_then(|t| t.text_arc(sid))
    }

    /// Iterates over the ids with known text, relative to this import.
    pub fn known(&self) -> impl Iterator<Item = (usize, &Arc<str>)> + '_ {
        let limit = self.max_id;
        self.table.iter().flat_map(move |table| {
            (1..=table.max_id().min(limit))
                .filter_map(move |sid| table.text_arc(sid).map(|text| (sid, text)))
        })
    }

    /// Returns the descriptor that reproduces this import.
    #[must_use]
    pub fn descriptor(&self) -> ImportDescriptor {
        ImportDescriptor::new(self.name.to_string(), self.version, Some(self.max_id))
    }
}
