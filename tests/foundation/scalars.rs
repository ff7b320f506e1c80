//! Integration tests for exact scalars and spans
//!
//! Tests Int normalization, Decimal precision, Timestamp text and UTC
//! conversion, and span offsets.

use ionflow_foundation::{Decimal, Int, OffsetSpan, OffsetUnit, Precision, Span, Timestamp};
use num_bigint::BigInt;
use proptest::prelude::*;

// =============================================================================
// Int
// =============================================================================

#[test]
fn int_normalizes_to_i64() {
    let small = Int::from(BigInt::from(42));
    assert_eq!(small, Int::I64(42));
    assert_eq!(small.as_i64(), Some(42));
}

#[test]
fn int_beyond_i64_stays_big() {
    let big = Int::from(u64::MAX);
    assert!(big.as_i64().is_none());
    assert_eq!(big.to_string(), "18446744073709551615");
    assert_eq!(big.magnitude_bytes(), vec![0xFF; 8]);
}

#[test]
fn int_radix_parsing() {
    assert_eq!(Int::from_str_radix("101", 2), Some(Int::I64(5)));
    assert_eq!(Int::from_str_radix("-ff", 16), Some(Int::I64(-255)));
    assert_eq!(Int::from_str_radix("", 10), None);
    assert_eq!(Int::from_str_radix("12a", 10), None);
}

// =============================================================================
// Decimal
// =============================================================================

#[test]
fn decimal_precision_is_significant() {
    let one: Decimal = "1.0".parse().unwrap();
    let one_hundredths: Decimal = "1.00".parse().unwrap();
    assert_ne!(one, one_hundredths);
    assert_eq!(one, Decimal::new(10, -1));
}

#[test]
fn decimal_negative_zero() {
    let neg: Decimal = "-0.0".parse().unwrap();
    assert!(neg.is_negative_zero());
    assert_ne!(neg, Decimal::new(0, -1));
    assert_eq!(neg.to_string(), "-0d-1");
    assert!(neg.to_f64().is_sign_negative());
}

#[test]
fn decimal_rejects_garbage() {
    assert!("1.2.3".parse::<Decimal>().is_err());
    assert!("d5".parse::<Decimal>().is_err());
    assert!("1d".parse::<Decimal>().is_err());
}

// =============================================================================
// Timestamp
// =============================================================================

#[test]
fn timestamp_precisions_roundtrip_through_text() {
    for text in [
        "2024T",
        "2024-03T",
        "2024-03-15",
        "2024-03-15T10:30Z",
        "2024-03-15T10:30:05+02:00",
        "2024-03-15T10:30:05.250-00:00",
    ] {
        let ts: Timestamp = text.parse().unwrap();
        assert_eq!(ts.to_string(), text);
    }
}

#[test]
fn timestamp_precision_is_significant() {
    let day: Timestamp = "2024-03-15".parse().unwrap();
    let minute: Timestamp = "2024-03-15T00:00Z".parse().unwrap();
    assert_eq!(day.precision(), Precision::Day);
    assert_ne!(day, minute);
}

#[test]
fn timestamp_unknown_offset() {
    let ts: Timestamp = "2024-03-15T10:30-00:00".parse().unwrap();
    assert_eq!(ts.offset(), None);
    assert_eq!(ts.utc_fields(), (2024, 3, 15, 10, 30));
}

#[test]
fn timestamp_utc_conversion_crosses_days() {
    let ts: Timestamp = "2024-03-01T01:15+02:00".parse().unwrap();
    assert_eq!(ts.utc_fields(), (2024, 2, 29, 23, 15));
    let back =
        Timestamp::from_utc_fields(Precision::Minute, ts.utc_fields(), 0, None, ts.offset()).unwrap();
    assert_eq!(back, ts);
}

#[test]
fn timestamp_rejects_out_of_range() {
    assert!("2023-02-29".parse::<Timestamp>().is_err());
    assert!("2024-13T".parse::<Timestamp>().is_err());
    assert!(Timestamp::with_year(0).is_err());
}

proptest! {
    #[test]
    fn timestamp_utc_roundtrip(
        day in 1u8..=28,
        hour in 0u8..24,
        minute in 0u8..60,
        offset in -1439i16..=1439,
    ) {
        let ts = Timestamp::with_minute(2020, 6, day, hour, minute, Some(offset)).unwrap();
        let back = Timestamp::from_utc_fields(
            Precision::Minute,
            ts.utc_fields(),
            0,
            None,
            Some(offset),
        )
        .unwrap();
        prop_assert_eq!(back, ts);
    }
}

// =============================================================================
// Span
// =============================================================================

#[test]
fn open_span_reports_unknown_finish() {
    let span = Span::open(9, OffsetUnit::Utf16CodeUnits);
    assert_eq!(span.start_offset(), 9);
    assert_eq!(span.finish_offset(), -1);
    assert_eq!(span.len(), None);
}

#[test]
fn closed_span() {
    let span = Span::new(2, 8, OffsetUnit::Octets);
    assert_eq!((span.start_offset(), span.finish_offset()), (2, 8));
    assert_eq!(span.len(), Some(6));
}
