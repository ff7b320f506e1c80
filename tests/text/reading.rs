//! Integration tests for the text cursor
//!
//! Tests literal forms, symbols and directives, spans, and error positions.

use ionflow_foundation::{
    Decimal, Element, ErrorKind, Int, OffsetSpan, Struct, SymbolToken, Timestamp, Type,
};
use ionflow_stream::{Cursor, Emitter, TreeEmitter};
use ionflow_text::TextCursor;

fn load(text: &str) -> Vec<Element> {
    let mut cursor = TextCursor::new(text);
    let mut tree = TreeEmitter::new();
    tree.write_values(&mut cursor).unwrap();
    tree.into_elements()
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn numbers() {
    let values = load("0 -17 0x1F -0b101 1_000 12345678901234567890 1.5e2 -0e0 1.50 2d-1 -0.0");
    assert_eq!(
        values,
        vec![
            Element::new(0),
            Element::new(-17),
            Element::new(31),
            Element::new(-5),
            Element::new(1000),
            Element::new(Int::from_str_radix("12345678901234567890", 10).unwrap()),
            Element::new(150.0),
            Element::new(-0.0),
            Element::new(Decimal::new(150, -2)),
            Element::new(Decimal::new(2, -1)),
            Element::new(Decimal::negative_zero(-1)),
        ]
    );
}

#[test]
fn special_floats() {
    let values = load("nan +inf -inf");
    assert!(values[0].value().as_float().is_some_and(f64::is_nan));
    assert_eq!(values[1], Element::new(f64::INFINITY));
    assert_eq!(values[2], Element::new(f64::NEG_INFINITY));
}

#[test]
fn timestamps() {
    let values = load("2024T 2024-03-15 2024-03-15T10:30:05.5Z");
    let expected: Vec<Element> = ["2024T", "2024-03-15", "2024-03-15T10:30:05.5Z"]
        .iter()
        .map(|t| Element::new(t.parse::<Timestamp>().unwrap()))
        .collect();
    assert_eq!(values, expected);
}

#[test]
fn strings_and_long_strings() {
    let values = load(r#""tab\there" '''multi''' '''part''' "é\U0001F600""#);
    assert_eq!(
        values,
        vec![
            Element::new("tab\there"),
            Element::new("multipart"),
            Element::new("é😀"),
        ]
    );
}

#[test]
fn lobs() {
    let values = load(r#"{{ aGVsbG8= }} {{"raw\x00"}} {{'''a''' '''b'''}}"#);
    assert_eq!(
        values,
        vec![
            Element::blob(&b"hello"[..]),
            Element::clob(&b"raw\x00"[..]),
            Element::clob(&b"ab"[..]),
        ]
    );
}

#[test]
fn typed_nulls() {
    let values = load("null null.null null.int null.struct");
    assert_eq!(
        values,
        vec![
            Element::null(Type::Null),
            Element::null(Type::Null),
            Element::null(Type::Int),
            Element::null(Type::Struct),
        ]
    );
}

#[test]
fn comments_are_whitespace() {
    let values = load("1 // line\n/* block\n */ 2");
    assert_eq!(values, vec![Element::new(1), Element::new(2)]);
}

// =============================================================================
// Containers and symbols
// =============================================================================

#[test]
fn nested_containers_with_annotations() {
    let values = load("a::b::{ 'quoted field': [1, (+ x)], \"str\": c::2, }");
    let expected = Element::new(
        Struct::new()
            .with(
                "quoted field",
                Element::list([
                    Element::new(1),
                    Element::sexp([Element::symbol("+"), Element::symbol("x")]),
                ]),
            )
            .with("str", Element::new(2).with_annotations(["c"])),
    )
    .with_annotations(["a", "b"]);
    assert_eq!(values, vec![expected]);
}

#[test]
fn sexp_operators_split_from_identifiers() {
    let values = load("(a+b -1 <=)");
    assert_eq!(
        values,
        vec![Element::sexp([
            Element::symbol("a"),
            Element::symbol("+"),
            Element::symbol("b"),
            Element::new(-1),
            Element::symbol("<="),
        ])]
    );
}

#[test]
fn symbol_ids_resolve_against_the_table() {
    let values = load("$4 $ion_symbol_table::{symbols:[\"loc\"]} $10 $99");
    assert_eq!(values[0], Element::symbol("name"));
    assert_eq!(values[1], Element::symbol("loc"));
    assert_eq!(values[2], Element::symbol(SymbolToken::sid(99)));
}

#[test]
fn directive_append() {
    let values = load(
        "$ion_symbol_table::{symbols:[\"a\"]} \
         $ion_symbol_table::{imports:$ion_symbol_table, symbols:[\"b\"]} \
         [$10, $11]",
    );
    assert_eq!(
        values,
        vec![Element::list([Element::symbol("a"), Element::symbol("b")])]
    );
}

#[test]
fn annotated_marker_is_a_plain_symbol() {
    let values = load("x::$ion_1_0");
    assert_eq!(values, vec![Element::symbol("$ion_1_0").with_annotations(["x"])]);
}

// =============================================================================
// Cursor behavior
// =============================================================================

#[test]
fn null_sentinels() {
    let mut cursor = TextCursor::new("null.bool null.int null.float null.decimal null.blob");
    cursor.next().unwrap();
    assert!(!cursor.bool_value().unwrap());
    cursor.next().unwrap();
    assert_eq!(cursor.i64_value().unwrap(), 0);
    cursor.next().unwrap();
    assert_eq!(cursor.float_value().unwrap(), 0.0);
    cursor.next().unwrap();
    assert_eq!(cursor.decimal_value().unwrap(), Decimal::new(0, 0));
    cursor.next().unwrap();
    assert!(matches!(
        cursor.bytes_value().unwrap_err().kind,
        ErrorKind::NullValue(Type::Blob)
    ));
}

#[test]
fn container_spans_are_open_until_read() {
    let mut cursor = TextCursor::new("  {a: \"xy\"}");
    cursor.next().unwrap();
    let span = cursor.current_span().unwrap();
    assert_eq!(span.start_offset(), 2);
    assert_eq!(span.finish_offset(), -1);

    cursor.step_in().unwrap();
    cursor.next().unwrap();
    let span = cursor.current_span().unwrap();
    assert_eq!((span.start_offset(), span.finish_offset()), (6, 10));
}

#[test]
fn spans_count_utf16_units() {
    let mut cursor = TextCursor::new("\"😀é\" 5");
    cursor.next().unwrap();
    assert_eq!(cursor.current_span().unwrap().finish_offset(), 5);
    cursor.next().unwrap();
    assert_eq!(cursor.current_span().unwrap().start_offset(), 6);
}

#[test]
fn errors_report_line_and_column() {
    let mut cursor = TextCursor::new("[1,\n  2 3]");
    cursor.next().unwrap();
    cursor.step_in().unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    let err = cursor.next().unwrap_err();
    let context = err.context.expect("position context");
    assert_eq!((context.line, context.column), (Some(2), Some(5)));
}

#[test]
fn unterminated_container_is_eof() {
    let mut cursor = TextCursor::new("{a: [1, 2]");
    cursor.next().unwrap();
    assert!(matches!(
        cursor.next().unwrap_err().kind,
        ErrorKind::UnexpectedEof { .. }
    ));
}

#[test]
fn mismatched_close_is_malformed() {
    let mut cursor = TextCursor::new("[1, 2)");
    cursor.next().unwrap();
    cursor.step_in().unwrap();
    cursor.next().unwrap();
    cursor.next().unwrap();
    assert!(cursor.next().is_err());
}

#[test]
fn skipped_container_with_mismatched_close_is_malformed() {
    let mut cursor = TextCursor::new("[(] 5 ) 6");
    assert_eq!(cursor.next().unwrap(), Some(Type::List));
    assert!(matches!(
        cursor.next().unwrap_err().kind,
        ErrorKind::MalformedInput { .. }
    ));
}

#[test]
fn step_out_checks_skipped_closes() {
    let mut cursor = TextCursor::new("{a: [1, (2}], b: 3} 4");
    cursor.next().unwrap();
    cursor.step_in().unwrap();
    assert!(cursor.step_out().is_err());

    let mut cursor = TextCursor::new("{a: [1, (2 {b: 3})], c: {d: 4}} 5");
    cursor.next().unwrap();
    cursor.step_in().unwrap();
    cursor.step_out().unwrap();
    assert_eq!(cursor.next().unwrap(), Some(Type::Int));
    assert_eq!(cursor.i64_value().unwrap(), 5);
}
