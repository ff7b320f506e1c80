//! Unresolved import tests
//!
//! A stream importing a table the catalog cannot supply keeps decoding;
//! ids in the missing range surface without text.

use std::sync::Arc;

use ionflow::binary::to_bytes;
use ionflow::foundation::{Element, ErrorKind, Struct, SymbolToken};
use ionflow::loader::{Loader, deep_read};
use ionflow::stream::{ReaderConfig, WriterConfig};
use ionflow::symbols::{Import, SharedSymbolTable, SimpleCatalog};
use ionflow::text::TextCursor;

/// A catalog holding only version 1 of `X`.
fn catalog_with_v1() -> Arc<SimpleCatalog> {
    Arc::new(SimpleCatalog::new().with(SharedSymbolTable::new("X", 1, ["a", "b", "c"])))
}

fn written_against_v2() -> Vec<u8> {
    let config = WriterConfig::default().with_import(Import::placeholder("X", 2, 5));
    let elements = vec![
        Element::symbol(SymbolToken::sid(12)),
        Element::new(7),
        Element::new(Struct::new().with("local", Element::symbol(SymbolToken::sid(14)))),
    ];
    to_bytes(&elements, config).unwrap()
}

#[test]
fn missing_version_degrades_to_unknown_text() {
    let loader = Loader::new().with_catalog(catalog_with_v1());
    let values = loader.load(&written_against_v2()).unwrap();

    let first = values[0].value().as_symbol().unwrap();
    assert_eq!(first.as_text(), None);
    assert_eq!(first.local_sid(), Some(12));
    assert_eq!(values[1], Element::new(7));
}

#[test]
fn local_symbols_follow_the_declared_range() {
    let loader = Loader::new().with_catalog(catalog_with_v1());
    let values = loader.load(&written_against_v2()).unwrap();
    let record = values[2].value().as_struct().unwrap();
    let (name, value) = record.field(0).unwrap();
    assert_eq!(name.as_text(), Some("local"));
    assert_eq!(name.local_sid(), Some(15));
    assert_eq!(value.value().as_symbol().and_then(SymbolToken::local_sid), Some(14));
}

#[test]
fn unknown_text_survives_transcoding() {
    let loader = Loader::new().with_catalog(catalog_with_v1());
    let binary = written_against_v2();
    let text = loader.ensure_text(&binary).unwrap();
    let values = loader.load_text(&text).unwrap();
    assert_eq!(values[0], Element::symbol(SymbolToken::sid(12)));
    assert_eq!(values[1], Element::new(7));
}

#[test]
fn walk_counts_unresolved_ids() {
    let text = "$ion_symbol_table::{imports:[{name:\"X\",version:2,max_id:5}]} $11 {$13: $14} 8";
    let config = Loader::new().with_catalog(catalog_with_v1()).reader_config();
    let stats = deep_read(&mut TextCursor::with_config(text, config)).unwrap();
    assert_eq!(stats.unknown_symbols, 3);
    assert_eq!(stats.values, 4);
}

#[test]
fn exact_version_supplies_text() {
    let catalog = SimpleCatalog::new().with(SharedSymbolTable::new("X", 2, ["p", "q", "r"]));
    let loader = Loader::new().with_catalog(Arc::new(catalog));
    let values = loader.load(&written_against_v2()).unwrap();
    assert_eq!(values[0], Element::symbol("r"));
}

#[test]
fn import_without_max_id_needs_the_table() {
    let text = "$ion_symbol_table::{imports:[{name:\"X\",version:2}]} 1";
    let err = Loader::new()
        .with_catalog(catalog_with_v1())
        .load_text(text)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnresolvableImport { .. }));
}

#[test]
fn oversized_import_range_is_malformed() {
    let text = "$ion_symbol_table::{imports:[{name:\"X\",version:2,max_id:1000000000000}]} 1";
    let err = Loader::new().load_text(text).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedInput { .. }));
}

#[test]
fn large_import_range_within_the_limit_stays_cheap() {
    let text = "$ion_symbol_table::{imports:[{name:\"X\",version:2,max_id:1000000}]} $10 $1000009";
    let values = Loader::new().load_text(text).unwrap();
    assert_eq!(values[0], Element::symbol(SymbolToken::sid(10)));
    assert_eq!(values[1], Element::symbol(SymbolToken::sid(1_000_009)));
}

#[test]
fn symbol_id_limit_is_configurable() {
    let text = "$ion_symbol_table::{imports:[{name:\"X\",version:2,max_id:5}]} 1";
    let config = ReaderConfig::default().with_max_symbol_id(12);
    let mut cursor = TextCursor::with_config(text, config);
    assert!(Loader::load_cursor(&mut cursor).is_err());
}
