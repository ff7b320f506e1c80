//! Local symbol tables.
//!
//! A local table is the concatenation of the system table, each import's id
//! range in declaration order, and locally declared symbols. It only ever
//! grows: an id, once assigned, keeps its text for the life of the table.
//!
//! Import ranges are kept as segments over their shared tables, so a range
//! costs the same whatever its declared size.

use std::collections::HashMap;
use std::sync::Arc;

use ionflow_foundation::{Result, SymbolToken};

use crate::catalog::Catalog;
use crate::import::{Import, ImportDescriptor};
use crate::system::{SYSTEM_MAX_ID, system_table};

/// An append-only table of symbol ids.
///
/// Cloning is the way to take a snapshot: appends to the original are not
/// visible through the clone.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    imports: Vec<Import>,
    /// First id of each import's range, parallel to `imports`.
    starts: Vec<usize>,
    locals: Vec<Option<Arc<str>>>,
    ids: HashMap<Arc<str>, usize>,
    local_start: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::system()
    }
}

impl SymbolTable {
    /// The table in effect at the start of every stream.
    #[must_use]
    pub fn system() -> Self {
        Self::with_imports(Vec::new())
    }

    /// Creates a table from already-resolved imports.
    ///
    /// The system table always occupies the lowest ids and must not be
    /// listed among `imports`.
    #[must_use]
    pub fn with_imports(imports: Vec<Import>) -> Self {
        let mut table = Self {
            imports: Vec::with_capacity(imports.len() + 1),
            starts: Vec::with_capacity(imports.len() + 1),
            locals: Vec::new(),
            ids: HashMap::new(),
            local_start: 1,
        };
        table.push_import(Import::table(system_table()));
        for import in imports {
            table.push_import(import);
        }
        table
    }

    /// Resolves import descriptors against a catalog and builds a table.
    ///
    /// # Errors
    ///
    /// Fails if an import can neither be resolved nor sized.
    pub fn build(descriptors: &[ImportDescriptor], catalog: &dyn Catalog) -> Result<Self> {
        let imports = descriptors
            .iter()
            .filter(|d| !is_system_import(d))
            .map(|d| Import::resolve(d, catalog))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::with_imports(imports))
    }

    fn push_import(&mut self, import: Import) {
        let start = self.local_start;
        for (offset, text) in import.known() {
            // earlier ids take precedence
            self.ids
                .entry(Arc::clone(text))
                .or_insert(start.saturating_add(offset - 1));
        }
        self.local_start = start.saturating_add(import.max_id());
        self.starts.push(start);
        self.imports.push(import);
    }

    fn push_entry(&mut self, text: Option<Arc<str>>) -> usize {
        self.locals.push(text.clone());
        let sid = self.max_id();
        if let Some(text) = text {
            self.ids.entry(text).or_insert(sid);
        }
        sid
    }

    /// Returns the id for `text`, appending it if the table lacks it.
    pub fn intern(&mut self, text: &str) -> usize {
        match self.ids.get(text) {
            Some(&sid) => sid,
            None => self.push_entry(Some(Arc::from(text))),
        }
    }

    /// Appends a declared entry, even if its text already has an id.
    ///
    /// `None` reserves an id with unknown text.
    pub fn declare(&mut self, text: Option<&str>) -> usize {
        self.push_entry(text.map(Arc::from))
    }

    /// Returns the text of an id.
    #[must_use]
    pub fn text_for(&self, sid: usize) -> Option<&str> {
        self.text_arc(sid).map(|s| &**s)
    }

    fn text_arc(&self, sid: usize) -> Option<&Arc<str>> {
        if sid >= self.local_start {
            return self.locals.get(sid - self.local_start).and_then(Option::as_ref);
        }
        let index = self.starts.partition_point(|&start| start <= sid).checked_sub(1)?;
        self.imports[index].text_arc(sid - self.starts[index] + 1)
    }

    /// Returns the lowest id carrying `text`.
    #[must_use]
    pub fn sid_for(&self, text: &str) -> Option<usize> {
        self.ids.get(text).copied()
    }

    /// Resolves an id into a token; ids without text yield an
    /// unknown-text token rather than an error.
    #[must_use]
    pub fn token_for(&self, sid: usize) -> SymbolToken {
        SymbolToken::from_parts(self.text_arc(sid).cloned(), Some(sid))
    }

    /// Returns the highest assigned id.
    #[must_use]
    pub fn max_id(&self) -> usize {
        (self.local_start - 1).saturating_add(self.locals.len())
    }

    /// Returns the first id available to local symbols.
    #[must_use]
    pub const fn local_start(&self) -> usize {
        self.local_start
    }

    /// Returns the local entries with ids greater than `sid`.
    #[must_use]
    pub fn symbols_after(&self, sid: usize) -> &[Option<Arc<str>>] {
        let skip = sid.saturating_sub(self.local_start - 1);
        self.locals.get(skip..).unwrap_or(&[])
    }

    /// Returns the imports after the system table, in declaration order.
    #[must_use]
    pub fn imports(&self) -> &[Import] {
        self.imports.get(1..).unwrap_or(&[])
    }

    /// Returns true if the table holds only the system symbols.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.max_id() == SYSTEM_MAX_ID && self.imports.len() == 1
    }
}

fn is_system_import(descriptor: &ImportDescriptor) -> bool {
    descriptor.name == crate::system::SYSTEM_TABLE_NAME
}
