//! Loader tests over whole streams
//!
//! Covers the struct scenario end to end, encoding detection, and span
//! reporting through the cursor trait object.

use std::borrow::Cow;

use ionflow::binary::{BinaryCursor, VERSION_MARKER, is_binary};
use ionflow::foundation::{Element, ErrorKind, OffsetSpan, Struct, Type};
use ionflow::loader::{Loader, ReadStats, consume_current_value};
use ionflow::stream::{Cursor, ReaderConfig, WriterConfig};
use ionflow::text::TextCursor;

fn record() -> Element {
    Element::new(
        Struct::new()
            .with("a", 1)
            .with("b", Element::list([Element::new(true), Element::null(Type::String)])),
    )
}

/// Counts the directives a binary stream carries.
fn directive_count(bytes: &[u8]) -> usize {
    let mut cursor = BinaryCursor::with_config(bytes, ReaderConfig::system_view());
    let mut count = 0;
    while cursor.next().unwrap().is_some() {
        if cursor
            .annotations()
            .first()
            .and_then(|a| a.as_text())
            .is_some_and(|t| t == "$ion_symbol_table")
        {
            count += 1;
        }
    }
    count
}

#[test]
fn struct_written_twice_reads_back_field_by_field() {
    let bytes = Loader::to_binary(&[record(), record()], &WriterConfig::default()).unwrap();
    assert_eq!(directive_count(&bytes), 1);

    let mut cursor = BinaryCursor::new(&bytes);
    for _ in 0..2 {
        assert_eq!(cursor.next().unwrap(), Some(Type::Struct));
        cursor.step_in().unwrap();

        assert_eq!(cursor.next().unwrap(), Some(Type::Int));
        assert_eq!(cursor.field_name_text().unwrap(), "a");
        assert_eq!(cursor.i64_value().unwrap(), 1);

        assert_eq!(cursor.next().unwrap(), Some(Type::List));
        assert_eq!(cursor.field_name_text().unwrap(), "b");
        cursor.step_in().unwrap();
        assert_eq!(cursor.next().unwrap(), Some(Type::Bool));
        assert!(cursor.bool_value().unwrap());
        assert_eq!(cursor.next().unwrap(), Some(Type::String));
        assert!(cursor.is_null());
        assert_eq!(cursor.next().unwrap(), None);
        cursor.step_out().unwrap();

        assert_eq!(cursor.next().unwrap(), None);
        cursor.step_out().unwrap();
    }
    assert_eq!(cursor.next().unwrap(), None);
}

#[test]
fn loader_agrees_across_encodings() {
    let loader = Loader::new();
    let text = "{a: 1, b: [true, null.string]} {a: 1, b: [true, null.string]}";
    let binary = loader.ensure_binary(text.as_bytes()).unwrap();
    assert!(matches!(binary, Cow::Owned(_)));
    assert!(binary.starts_with(&VERSION_MARKER));
    assert_eq!(directive_count(&binary), 1);

    let from_text = loader.load_text(text).unwrap();
    let from_binary = loader.load(&binary).unwrap();
    assert_eq!(from_text, vec![record(), record()]);
    assert_eq!(from_binary, from_text);
}

#[test]
fn unknown_text_cannot_become_binary_text() {
    let loader = Loader::new();
    let err = loader.ensure_binary(b"foo $10").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownSymbolText { sid: 10 }));
}

#[test]
fn ensure_text_output_loads_as_text() {
    let loader = Loader::new();
    let binary = Loader::to_binary(&[record()], &WriterConfig::default()).unwrap();
    let text = loader.ensure_text(&binary).unwrap();
    assert!(!is_binary(text.as_bytes()));
    assert_eq!(loader.load(text.as_bytes()).unwrap(), vec![record()]);
}

#[test]
fn container_spans_differ_by_encoding() {
    let text = "{a: 1, b: [true, null.string]}";
    let mut text_cursor: Box<dyn Cursor + '_> = Box::new(TextCursor::new(text));
    text_cursor.next().unwrap();
    let span = text_cursor.current_span().unwrap();
    assert_eq!(span.start_offset(), 0);
    assert_eq!(span.finish_offset(), -1);

    let bytes = Loader::to_binary(&[record()], &WriterConfig::default()).unwrap();
    let mut binary_cursor: Box<dyn Cursor + '_> = Box::new(BinaryCursor::new(&bytes));
    binary_cursor.next().unwrap();
    let span = binary_cursor.current_span().unwrap();
    let expected_end = i64::try_from(bytes.len()).unwrap();
    assert_eq!(span.finish_offset(), expected_end);
    assert!(span.start_offset() < span.finish_offset());
}

#[test]
fn consume_then_continue() {
    let mut cursor = TextCursor::new("{a: 1, b: [true, null.string]} done");
    cursor.next().unwrap();
    let stats = consume_current_value(&mut cursor).unwrap();
    assert_eq!(
        stats,
        ReadStats {
            values: 5,
            containers: 2,
            nulls: 1,
            unknown_symbols: 0,
            max_depth: 2,
        }
    );
    assert_eq!(cursor.next().unwrap(), Some(Type::Symbol));
}
