//! Integration tests for the encoding context
//!
//! Tests directive application, appends, resets, and snapshot isolation.

use std::sync::Arc;

use ionflow_symbols::{
    EncodingContext, ImportDescriptor, SharedSymbolTable, SimpleCatalog, SymbolTableDirective,
};

fn catalog() -> Arc<SimpleCatalog> {
    Arc::new(SimpleCatalog::new().with(SharedSymbolTable::new("T", 1, ["x", "y"])))
}

fn strings(words: &[&str]) -> Vec<Option<String>> {
    words.iter().map(|w| Some((*w).to_string())).collect()
}

#[test]
fn fresh_directive_replaces_locals() {
    let mut context = EncodingContext::new(catalog());
    context
        .apply(&SymbolTableDirective::new(vec![], strings(&["a", "b"])), 4)
        .unwrap();
    assert_eq!(context.resolve(11).as_text(), Some("b"));
    assert_eq!(context.activated_at(), 4);

    context
        .apply(&SymbolTableDirective::new(vec![], strings(&["c"])), 30)
        .unwrap();
    assert_eq!(context.resolve(10).as_text(), Some("c"));
    assert!(context.resolve(11).is_unknown_text());
}

#[test]
fn append_directive_extends_locals() {
    let mut context = EncodingContext::new(catalog());
    context
        .apply(&SymbolTableDirective::new(vec![], strings(&["a"])), 4)
        .unwrap();
    context
        .apply(&SymbolTableDirective::append(strings(&["b"])), 20)
        .unwrap();
    assert_eq!(context.resolve(10).as_text(), Some("a"));
    assert_eq!(context.resolve(11).as_text(), Some("b"));
}

#[test]
fn imports_resolve_through_catalog() {
    let mut context = EncodingContext::new(catalog());
    let directive = SymbolTableDirective::new(
        vec![ImportDescriptor::new("T", 1, Some(2))],
        strings(&["local"]),
    );
    context.apply(&directive, 0).unwrap();
    assert_eq!(context.resolve(10).as_text(), Some("x"));
    assert_eq!(context.resolve(12).as_text(), Some("local"));
}

#[test]
fn reset_returns_to_system_table() {
    let mut context = EncodingContext::new(catalog());
    context
        .apply(&SymbolTableDirective::new(vec![], strings(&["a"])), 4)
        .unwrap();
    context.reset(50);
    assert!(context.current_table().is_system());
    assert_eq!(context.activated_at(), 50);
}

#[test]
fn snapshots_do_not_see_later_interning() {
    let mut context = EncodingContext::default();
    context.intern("first");
    let before = context.snapshot();
    let sid = context.intern("second");
    assert_eq!(sid, 11);
    assert_eq!(before.max_id(), 10);
    assert_eq!(before.text_for(11), None);
    assert_eq!(context.current_table().text_for(11), Some("second"));
}

#[test]
fn snapshots_survive_directives() {
    let mut context = EncodingContext::default();
    context
        .apply(&SymbolTableDirective::new(vec![], strings(&["old"])), 0)
        .unwrap();
    let before = context.snapshot();
    context
        .apply(&SymbolTableDirective::new(vec![], strings(&["new"])), 10)
        .unwrap();
    assert_eq!(before.text_for(10), Some("old"));
    assert_eq!(context.resolve(10).as_text(), Some("new"));
}
