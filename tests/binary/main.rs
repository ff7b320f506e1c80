//! Integration tests for Layer 3: Binary codec
//!
//! Tests the binary cursor and emitter against hand-built streams and each
//! other.

mod reading;
