//! Integration tests for the binary cursor
//!
//! Tests spans, skipping, import degradation, and malformed input.

use std::sync::Arc;

use ionflow_binary::{BinaryCursor, BinaryEmitter, VERSION_MARKER};
use ionflow_foundation::{ErrorKind, OffsetSpan, SymbolToken, Type};
use ionflow_stream::{Cursor, Emitter, ReaderConfig, WriterConfig};
use ionflow_symbols::{Import, SharedSymbolTable, SimpleCatalog};

fn stream(body: &[u8]) -> Vec<u8> {
    let mut data = VERSION_MARKER.to_vec();
    data.extend_from_slice(body);
    data
}

// =============================================================================
// Spans
// =============================================================================

#[test]
fn container_span_covers_descriptor_and_length() {
    let mut body = vec![0xBE, 0x8E];
    body.extend([0x21, 0x01].repeat(7));
    body.extend([0x20]);
    let data = stream(&body);
    let mut cursor = BinaryCursor::new(&data[..]);

    assert_eq!(cursor.next().unwrap(), Some(Type::List));
    let span = cursor.current_span().unwrap();
    assert_eq!(span.start_offset(), 4);
    assert_eq!(span.finish_offset(), 4 + 2 + 14);

    assert_eq!(cursor.next().unwrap(), Some(Type::Int));
    assert_eq!(cursor.current_span().unwrap().start_offset(), 20);
}

#[test]
fn annotated_span_starts_at_wrapper() {
    // `name::5`, with `name` at sid 4
    let data = stream(&[0xE4, 0x81, 0x84, 0x21, 0x05]);
    let mut cursor = BinaryCursor::new(&data[..]);
    cursor.next().unwrap();
    let span = cursor.current_span().unwrap();
    assert_eq!((span.start_offset(), span.finish_offset()), (4, 9));
    assert_eq!(cursor.annotations()[0].as_text(), Some("name"));
}

// =============================================================================
// Skipping
// =============================================================================

#[test]
fn step_out_skips_unread_children() {
    // [[1], 2] 3
    let data = stream(&[0xB5, 0xB2, 0x21, 0x01, 0x21, 0x02, 0x21, 0x03]);
    let mut cursor = BinaryCursor::new(&data[..]);
    cursor.next().unwrap();
    cursor.step_in().unwrap();
    assert_eq!(cursor.next().unwrap(), Some(Type::List));
    cursor.step_out().unwrap();
    assert_eq!(cursor.next().unwrap(), Some(Type::Int));
    assert_eq!(cursor.i64_value().unwrap(), 3);
}

#[test]
fn padding_inside_struct_is_skipped() {
    // {name: <2-byte pad>, version: 1}
    let data = stream(&[0xD6, 0x84, 0x01, 0xAA, 0x85, 0x21, 0x01]);
    let mut cursor = BinaryCursor::new(&data[..]);
    cursor.next().unwrap();
    cursor.step_in().unwrap();
    assert_eq!(cursor.next().unwrap(), Some(Type::Int));
    assert_eq!(cursor.field_name_text().unwrap(), "version");
    assert_eq!(cursor.next().unwrap(), None);
}

// =============================================================================
// Symbols
// =============================================================================

#[test]
fn unresolved_import_degrades_and_continues() {
    let config = WriterConfig::default().with_import(Import::placeholder("X", 2, 5));
    let mut emitter = BinaryEmitter::with_config(Vec::new(), config);
    emitter.write_symbol(SymbolToken::sid(12)).unwrap();
    emitter.write_i64(7).unwrap();
    let data = emitter.finish().unwrap();

    let catalog = SimpleCatalog::new().with(SharedSymbolTable::new(
        "X",
        1,
        ["a", "b", "c", "d", "e"],
    ));
    let config = ReaderConfig::default().with_catalog(Arc::new(catalog));
    let mut cursor = BinaryCursor::with_config(&data[..], config);

    assert_eq!(cursor.next().unwrap(), Some(Type::Symbol));
    let token = cursor.symbol_value().unwrap();
    assert_eq!(token.local_sid(), Some(12));
    assert!(token.is_unknown_text());
    assert!(token.require_text().is_err());

    assert_eq!(cursor.next().unwrap(), Some(Type::Int));
    assert_eq!(cursor.i64_value().unwrap(), 7);
    assert_eq!(cursor.next().unwrap(), None);
}

#[test]
fn version_marker_resets_symbols() {
    let mut first = BinaryEmitter::new(Vec::new());
    first.write_symbol("local".into()).unwrap();
    let mut data = first.finish().unwrap();
    // a second stream's marker, then a raw reference to sid 10
    data.extend_from_slice(&VERSION_MARKER);
    data.extend_from_slice(&[0x71, 0x0A]);

    let mut cursor = BinaryCursor::new(&data[..]);
    cursor.next().unwrap();
    assert_eq!(cursor.symbol_value().unwrap().as_text(), Some("local"));
    cursor.next().unwrap();
    assert!(cursor.symbol_value().unwrap().is_unknown_text());
}

#[test]
fn system_view_surfaces_directives() {
    let mut emitter = BinaryEmitter::new(Vec::new());
    emitter.write_symbol("s".into()).unwrap();
    let data = emitter.finish().unwrap();

    let mut cursor = BinaryCursor::with_config(&data[..], ReaderConfig::system_view());
    assert_eq!(cursor.next().unwrap(), Some(Type::Struct));
    assert_eq!(cursor.annotations()[0].as_text(), Some("$ion_symbol_table"));
    assert_eq!(cursor.next().unwrap(), Some(Type::Symbol));
    assert_eq!(cursor.symbol_value().unwrap().as_text(), Some("s"));
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn truncated_body_is_eof() {
    let data = stream(&[0x84, b'a', b'b']);
    let err = BinaryCursor::new(&data[..]).next().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnexpectedEof { .. }));
}

#[test]
fn child_overrunning_container_is_malformed() {
    // list of length 2 holding a 3-byte string
    let data = stream(&[0xB2, 0x83, b'a', b'b', b'c']);
    let mut cursor = BinaryCursor::new(&data[..]);
    cursor.next().unwrap();
    cursor.step_in().unwrap();
    assert!(cursor.next().is_err());
}

#[test]
fn other_versions_are_unsupported() {
    let data = [0xE0, 0x02, 0x00, 0xEA];
    let err = BinaryCursor::new(&data[..]).next().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnsupportedVersion { major: 2, minor: 0 }
    ));
}

#[test]
fn negative_zero_int_is_malformed() {
    let data = stream(&[0x31, 0x00]);
    let err = BinaryCursor::new(&data[..]).next().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedInput { .. }));
}

#[test]
fn reserved_type_code_is_malformed() {
    let data = stream(&[0xF0]);
    assert!(BinaryCursor::new(&data[..]).next().is_err());
}

#[test]
fn huge_annotation_length_is_malformed() {
    let mut body = vec![0xEE, 0x8B, 0x01];
    body.extend([0x7F; 8]);
    body.extend([0xFF, 0x20]);
    let data = stream(&body);
    let err = BinaryCursor::new(&data[..]).next().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedInput { .. }));
}
