//! Integration tests for Layer 0: Foundation
//!
//! Tests for the value model, exact scalars, symbol tokens, spans and errors.

mod errors;
mod scalars;
