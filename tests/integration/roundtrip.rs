//! Round-trip tests across both encodings
//!
//! Generated element trees are written as binary and as text, read back,
//! and compared with the originals and with each other. The writers import a
//! placeholder range, so generated symbols may also be ids without text.

use ionflow::binary::{BinaryCursor, to_bytes};
use ionflow::foundation::{Decimal, Element, Int, Struct, SymbolToken, Timestamp, Type};
use ionflow::stream::{Emitter, TreeEmitter, WriterConfig};
use ionflow::symbols::Import;
use ionflow::text::{TextCursor, to_text};
use proptest::prelude::*;

/// Writer settings whose table reserves ids 10 to 14 without text.
fn writer() -> WriterConfig {
    WriterConfig::default().with_import(Import::placeholder("ids", 1, 5))
}

fn decode_binary(bytes: &[u8]) -> Vec<Element> {
    let mut tree = TreeEmitter::new();
    tree.write_values(&mut BinaryCursor::new(bytes)).unwrap();
    tree.into_elements()
}

fn decode_text(text: &str) -> Vec<Element> {
    let mut tree = TreeEmitter::new();
    tree.write_values(&mut TextCursor::new(text)).unwrap();
    tree.into_elements()
}

// =============================================================================
// Strategies
// =============================================================================

fn arb_symbol_text() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z][a-z0-9_]{0,5}",
        1 => "[ -~]{0,6}",
    ]
}

fn arb_symbol_token() -> impl Strategy<Value = SymbolToken> {
    prop_oneof![
        4 => arb_symbol_text().prop_map(SymbolToken::from),
        1 => (10usize..15).prop_map(SymbolToken::sid),
    ]
}

fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    prop_oneof![
        4 => arb_common_timestamp(),
        1 => arb_edge_timestamp(),
    ]
}

fn arb_common_timestamp() -> impl Strategy<Value = Timestamp> {
    (
        1970u16..2100,
        1u8..=12,
        1u8..=28,
        0u8..24,
        0u8..60,
        0u8..60,
        prop::option::of(1i64..1000),
        prop::option::of(-720i16..=720),
    )
        .prop_map(|(year, month, day, hour, minute, second, millis, offset)| {
            let fraction = millis.map(|m| Decimal::new(m, -3));
            Timestamp::with_second(year, month, day, hour, minute, second, fraction, offset)
                .unwrap()
        })
}

/// Local times on the first and last days of the year range, with offsets
/// that put the UTC instant outside it.
fn arb_edge_timestamp() -> impl Strategy<Value = Timestamp> {
    prop_oneof![
        (0u8..24, 0u8..60, 1i16..=720).prop_map(|(hour, minute, offset)| {
            Timestamp::with_minute(1, 1, 1, hour, minute, Some(offset)).unwrap()
        }),
        (0u8..24, 0u8..60, -720i16..=-1).prop_map(|(hour, minute, offset)| {
            Timestamp::with_minute(9999, 12, 31, hour, minute, Some(offset)).unwrap()
        }),
    ]
}

fn arb_null_type() -> impl Strategy<Value = Type> {
    prop::sample::select(vec![
        Type::Null,
        Type::Bool,
        Type::Int,
        Type::Float,
        Type::Decimal,
        Type::Timestamp,
        Type::String,
        Type::Symbol,
        Type::Blob,
        Type::Clob,
        Type::List,
        Type::SExp,
        Type::Struct,
    ])
}

fn arb_number() -> impl Strategy<Value = Element> {
    prop_oneof![
        any::<i64>().prop_map(Element::new),
        "-?[1-9][0-9]{19,30}"
            .prop_map(|digits| Element::new(Int::from_str_radix(&digits, 10).unwrap())),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Element::new),
        (any::<i64>(), -12i64..12).prop_map(|(c, e)| Element::new(Decimal::new(c, e))),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Element> {
    prop_oneof![
        arb_null_type().prop_map(Element::null),
        any::<bool>().prop_map(Element::new),
        arb_number(),
        arb_timestamp().prop_map(Element::new),
        "\\PC{0,12}".prop_map(Element::new),
        arb_symbol_token().prop_map(Element::symbol),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Element::blob),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Element::clob),
    ]
}

fn arb_annotated(inner: impl Strategy<Value = Element>) -> impl Strategy<Value = Element> {
    (inner, prop::collection::vec(arb_symbol_token(), 0..3))
        .prop_map(|(element, annotations)| element.with_annotations(annotations))
}

fn arb_element() -> impl Strategy<Value = Element> {
    arb_annotated(arb_scalar()).prop_recursive(4, 48, 6, |inner| {
        let children = prop::collection::vec(inner, 0..6);
        arb_annotated(prop_oneof![
            children.clone().prop_map(Element::list),
            children.clone().prop_map(Element::sexp),
            prop::collection::vec((arb_symbol_token(), children.prop_map(Element::list)), 0..4)
                .prop_map(|fields| {
                    let mut record = Struct::new();
                    for (name, value) in fields {
                        record.push(name, value);
                    }
                    Element::new(record)
                }),
        ])
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn binary_round_trip(elements in prop::collection::vec(arb_element(), 0..5)) {
        let bytes = to_bytes(&elements, writer()).unwrap();
        prop_assert_eq!(decode_binary(&bytes), elements);
    }

    #[test]
    fn text_round_trip(elements in prop::collection::vec(arb_element(), 0..5)) {
        let text = to_text(&elements, writer()).unwrap();
        prop_assert_eq!(decode_text(&text), elements);
    }

    #[test]
    fn codecs_agree(elements in prop::collection::vec(arb_element(), 0..5)) {
        let bytes = to_bytes(&elements, writer()).unwrap();
        let text = to_text(&elements, writer()).unwrap();
        prop_assert_eq!(decode_binary(&bytes), decode_text(&text));
    }

    #[test]
    fn streaming_writes_match_batch(elements in prop::collection::vec(arb_element(), 1..6)) {
        let batch = to_bytes(&elements, writer()).unwrap();
        let eager = writer().with_flush_threshold(Some(1));
        let streamed = to_bytes(&elements, eager).unwrap();
        prop_assert_eq!(decode_binary(&streamed), decode_binary(&batch));
    }
}

// =============================================================================
// Fixed cases
// =============================================================================

#[test]
fn typed_nulls_keep_their_type_in_both_codecs() {
    let elements: Vec<Element> = [Type::Null, Type::Int, Type::Struct, Type::Clob]
        .into_iter()
        .map(Element::null)
        .collect();
    let bytes = to_bytes(&elements, WriterConfig::default()).unwrap();
    let text = to_text(&elements, WriterConfig::default()).unwrap();
    assert_eq!(text, "null\nnull.int\nnull.struct\nnull.clob");
    assert_eq!(decode_binary(&bytes), elements);
    assert_eq!(decode_text(&text), elements);
}

#[test]
fn ids_without_text_and_edge_years_survive_both_codecs() {
    let record = Struct::new().with(SymbolToken::sid(12), Element::symbol(SymbolToken::sid(14)));
    let elements = vec![
        Element::new(record).with_annotations([SymbolToken::sid(10), SymbolToken::text("t")]),
        Element::new("0001-01-01T00:30+01:00".parse::<Timestamp>().unwrap()),
        Element::new("9999-12-31T23:30-01:00".parse::<Timestamp>().unwrap()),
    ];
    let bytes = to_bytes(&elements, writer()).unwrap();
    let text = to_text(&elements, writer()).unwrap();
    assert_eq!(decode_binary(&bytes), elements);
    assert_eq!(decode_text(&text), elements);
}

#[test]
fn transcoding_through_cursors_preserves_values() {
    let elements = decode_text("a::b::{x: (1 + 2), y: 2024-01-02T03:04Z, z: {{\"c\"}}} 3.25");
    let bytes = to_bytes(&elements, WriterConfig::default()).unwrap();

    let mut cursor = BinaryCursor::new(&bytes);
    let mut emitter = ionflow::text::TextEmitter::new(Vec::new());
    emitter.write_values(&mut cursor).unwrap();
    let text = String::from_utf8(emitter.finish().unwrap()).unwrap();
    assert_eq!(decode_text(&text), elements);
}
