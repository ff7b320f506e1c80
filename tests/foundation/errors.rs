//! Integration tests for error reporting
//!
//! Tests error kinds, offsets, context rendering and I/O conversion.

use ionflow_foundation::{Error, ErrorContext, ErrorKind, Type};

#[test]
fn malformed_carries_offset() {
    let err = Error::malformed("bad length", 17);
    assert_eq!(err.offset(), Some(17));
    assert!(err.to_string().contains("bad length"));
}

#[test]
fn context_offset_used_for_other_kinds() {
    let err = Error::cursor_state("no value").with_context(ErrorContext::new().with_offset(4));
    assert_eq!(err.offset(), Some(4));
}

#[test]
fn context_renders_position_and_path() {
    let err = Error::malformed("unexpected ']'", 12).with_context(
        ErrorContext::new()
            .with_position(2, 5)
            .with_frame("list")
            .with_frame("struct"),
    );
    let text = err.to_string();
    assert!(text.contains("unexpected ']'"));
    assert!(text.ends_with("at 2:5 in list > struct"));
}

#[test]
fn type_mismatch_names_types() {
    let err = Error::type_mismatch(Type::Int, Some(Type::String));
    assert!(matches!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: Type::Int,
            actual: Some(Type::String)
        }
    ));
    let text = err.to_string();
    assert!(text.contains("int"));
    assert!(text.contains("string"));
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
    let err = Error::from(io);
    assert!(matches!(err.kind, ErrorKind::Io(_)));
    assert_eq!(err.offset(), None);
}

#[test]
fn distinct_kinds() {
    assert!(matches!(
        Error::unknown_symbol_text(30).kind,
        ErrorKind::UnknownSymbolText { sid: 30 }
    ));
    assert!(matches!(
        Error::unsupported_version(2, 0).kind,
        ErrorKind::UnsupportedVersion { major: 2, minor: 0 }
    ));
    assert!(matches!(Error::null_value(Type::Blob).kind, ErrorKind::NullValue(Type::Blob)));
    assert!(matches!(Error::unexpected_eof(3).kind, ErrorKind::UnexpectedEof { offset: 3 }));
}
