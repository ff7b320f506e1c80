//! Partial traversal tests
//!
//! Stepping into a container and straight back out must leave a cursor
//! exactly where skipping the container with `next` would.

use ionflow::binary::{BinaryCursor, to_bytes};
use ionflow::foundation::{Element, Struct, Type};
use ionflow::stream::{Cursor, ElementCursor, WriterConfig};
use ionflow::text::{TextCursor, to_text};
use proptest::prelude::*;

/// A container nested `depth` levels below the top, cycling container types.
fn nested(depth: usize, width: usize) -> Element {
    let mut children: Vec<Element> = (0..width).map(|i| Element::new(i as i64)).collect();
    if depth > 0 {
        children.insert(width / 2, nested(depth - 1, width));
    }
    match depth % 3 {
        0 => Element::list(children),
        1 => Element::sexp(children),
        _ => {
            let mut record = Struct::new();
            for (i, child) in children.into_iter().enumerate() {
                record.push(format!("f{i}"), child);
            }
            Element::new(record)
        }
    }
}

fn stream(depth: usize, width: usize) -> Vec<Element> {
    vec![
        nested(depth, width).with_annotations(["outer"]),
        Element::new(42),
        Element::symbol("after"),
    ]
}

/// Moves both cursors past the first container, one by re-entry and one
/// by skipping, and checks they agree on everything that follows.
fn assert_same_position(stepped: &mut dyn Cursor, skipped: &mut dyn Cursor, read_one: bool) {
    let ty = stepped.next().unwrap();
    assert!(ty.is_some_and(Type::is_container));
    stepped.step_in().unwrap();
    if read_one {
        stepped.next().unwrap();
    }
    stepped.step_out().unwrap();
    assert_eq!(skipped.next().unwrap(), ty);

    assert_eq!(stepped.depth(), 0);
    assert_eq!(stepped.next().unwrap(), Some(Type::Int));
    assert_eq!(skipped.next().unwrap(), Some(Type::Int));
    assert_eq!(stepped.i64_value().unwrap(), 42);
    assert_eq!(skipped.i64_value().unwrap(), 42);
    assert_eq!(stepped.current_span(), skipped.current_span());

    assert_eq!(stepped.next().unwrap(), Some(Type::Symbol));
    assert_eq!(skipped.next().unwrap(), Some(Type::Symbol));
    assert_eq!(stepped.symbol_value().unwrap(), skipped.symbol_value().unwrap());
    assert_eq!(stepped.next().unwrap(), None);
    assert_eq!(skipped.next().unwrap(), None);
}

proptest! {
    #[test]
    fn binary_step_in_out_equals_next(depth in 0usize..=10, width in 0usize..4, read_one in any::<bool>()) {
        let bytes = to_bytes(&stream(depth, width), WriterConfig::default()).unwrap();
        assert_same_position(
            &mut BinaryCursor::new(&bytes),
            &mut BinaryCursor::new(&bytes),
            read_one,
        );
    }

    #[test]
    fn text_step_in_out_equals_next(depth in 0usize..=10, width in 0usize..4, read_one in any::<bool>()) {
        let text = to_text(&stream(depth, width), WriterConfig::default()).unwrap();
        assert_same_position(
            &mut TextCursor::new(&text),
            &mut TextCursor::new(&text),
            read_one,
        );
    }

    #[test]
    fn tree_step_in_out_equals_next(depth in 0usize..=10, width in 0usize..4, read_one in any::<bool>()) {
        assert_same_position(
            &mut ElementCursor::new(stream(depth, width)),
            &mut ElementCursor::new(stream(depth, width)),
            read_one,
        );
    }
}

#[test]
fn re_entering_after_partial_read_is_rejected_at_top() {
    let bytes = to_bytes(&stream(2, 2), WriterConfig::default()).unwrap();
    let mut cursor = BinaryCursor::new(&bytes);
    cursor.next().unwrap();
    cursor.step_in().unwrap();
    cursor.step_out().unwrap();
    assert!(cursor.step_out().is_err());
}

#[test]
fn skipping_whole_stream_visits_top_level_only() {
    let text = "[1, [2, [3]]] {a: {b: c}} (x (y)) 4";
    let mut cursor = TextCursor::new(text);
    let mut types = Vec::new();
    while let Some(ty) = cursor.next().unwrap() {
        types.push(ty);
    }
    assert_eq!(types, vec![Type::List, Type::Struct, Type::SExp, Type::Int]);
    assert_eq!(cursor.depth(), 0);
}
