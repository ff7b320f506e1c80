//! Integration tests for symbol tables and imports
//!
//! Tests system ids, import ranges, placeholder degradation, and append-only
//! interning.

use std::sync::Arc;

use ionflow_foundation::{ErrorKind, SymbolToken};
use ionflow_symbols::system::{ION_SYMBOL_TABLE, SYSTEM_MAX_ID};
use ionflow_symbols::{
    Catalog, EmptyCatalog, Import, ImportDescriptor, SharedSymbolTable, SimpleCatalog, SymbolTable,
};
use proptest::prelude::*;

fn colors() -> SharedSymbolTable {
    SharedSymbolTable::new("colors", 2, ["red", "green", "blue"])
}

// =============================================================================
// System table
// =============================================================================

#[test]
fn system_ids_are_fixed() {
    let table = SymbolTable::system();
    assert_eq!(table.max_id(), SYSTEM_MAX_ID);
    assert_eq!(table.sid_for("$ion_symbol_table"), Some(ION_SYMBOL_TABLE));
    assert_eq!(table.text_for(4), Some("name"));
    assert_eq!(table.local_start(), 10);
    assert!(table.is_system());
}

#[test]
fn sid_zero_has_no_text() {
    let table = SymbolTable::system();
    assert_eq!(table.text_for(0), None);
    assert!(table.token_for(0).is_unknown_text());
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn imports_occupy_contiguous_ranges() {
    let table = SymbolTable::with_imports(vec![Import::table(Arc::new(colors()))]);
    assert_eq!(table.text_for(10), Some("red"));
    assert_eq!(table.text_for(12), Some("blue"));
    assert_eq!(table.local_start(), 13);
}

#[test]
fn max_id_truncates_or_pads() {
    let shared = Arc::new(colors());
    let short = SymbolTable::with_imports(vec![Import::table_with_max_id(shared.clone(), 2)]);
    assert_eq!(short.max_id(), 11);
    assert_eq!(short.sid_for("blue"), None);

    let long = SymbolTable::with_imports(vec![Import::table_with_max_id(shared, 5)]);
    assert_eq!(long.max_id(), 14);
    assert_eq!(long.text_for(13), None);
    assert_eq!(long.token_for(14), SymbolToken::sid(14));
}

#[test]
fn earlier_import_wins_for_shared_text() {
    let other = SharedSymbolTable::new("other", 1, ["blue", "cyan"]);
    let table = SymbolTable::with_imports(vec![
        Import::table(Arc::new(colors())),
        Import::table(Arc::new(other)),
    ]);
    assert_eq!(table.sid_for("blue"), Some(12));
    assert_eq!(table.text_for(13), Some("blue"));
    assert_eq!(table.sid_for("cyan"), Some(14));
}

#[test]
fn missing_import_degrades_to_placeholder() {
    let descriptor = ImportDescriptor::new("absent", 3, Some(4));
    let table = SymbolTable::build(&[descriptor], &EmptyCatalog).unwrap();
    assert_eq!(table.max_id(), SYSTEM_MAX_ID + 4);
    assert!(!table.imports()[0].is_resolved());
    for sid in 10..=13 {
        assert!(table.token_for(sid).is_unknown_text());
    }
}

#[test]
fn missing_import_without_max_id_fails() {
    let descriptor = ImportDescriptor::new("absent", 1, None);
    let err = SymbolTable::build(&[descriptor], &EmptyCatalog).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnresolvableImport { ref name, version: 1 } if name == "absent"
    ));
}

#[test]
fn catalog_matches_exact_version_only() {
    let catalog = SimpleCatalog::new().with(colors());
    assert!(catalog.resolve("colors", 2).is_some());
    assert!(catalog.resolve("colors", 1).is_none());
    assert_eq!(catalog.latest("colors").map(|t| t.version()), Some(2));

    let descriptor = ImportDescriptor::new("colors", 1, Some(3));
    let table = SymbolTable::build(&[descriptor], &catalog).unwrap();
    assert!(table.text_for(10).is_none());
}

#[test]
fn version_below_one_means_one() {
    assert_eq!(ImportDescriptor::new("t", 0, None).version, 1);
    assert_eq!(Import::placeholder("t", 0, 2).version(), 1);
}

// =============================================================================
// Interning
// =============================================================================

#[test]
fn intern_returns_existing_ids() {
    let mut table = SymbolTable::system();
    let first = table.intern("alpha");
    assert_eq!(first, 10);
    assert_eq!(table.intern("alpha"), 10);
    assert_eq!(table.intern("name"), 4);
    assert_eq!(table.max_id(), 10);
}

#[test]
fn declare_allows_duplicates_and_gaps() {
    let mut table = SymbolTable::system();
    assert_eq!(table.declare(Some("x")), 10);
    assert_eq!(table.declare(None), 11);
    assert_eq!(table.declare(Some("x")), 12);
    assert_eq!(table.sid_for("x"), Some(10));
    assert_eq!(table.text_for(12), Some("x"));
    assert_eq!(table.symbols_after(10).len(), 2);
}

proptest! {
    #[test]
    fn interning_only_appends(words in proptest::collection::vec("[a-z]{1,6}", 0..40)) {
        let mut table = SymbolTable::system();
        let mut seen: Vec<(String, usize)> = Vec::new();
        for word in &words {
            let before = table.max_id();
            let sid = table.intern(word);
            prop_assert!(table.max_id() >= before);
            prop_assert!(sid > SYSTEM_MAX_ID);
            for (text, id) in &seen {
                prop_assert_eq!(table.text_for(*id), Some(text.as_str()));
            }
            seen.push((word.clone(), sid));
        }
    }
}
