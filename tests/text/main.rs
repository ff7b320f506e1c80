//! Integration tests for Layer 3: Text codec
//!
//! Tests the text cursor over the full grammar and the compact text emitter.

mod reading;
