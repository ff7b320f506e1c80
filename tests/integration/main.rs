//! Cross-layer integration tests for ionflow
//!
//! Tests that values survive both codecs, that cursors skip and re-enter
//! containers consistently, and that loading degrades gracefully.

mod imports;
mod loading;
mod roundtrip;
mod traversal;
