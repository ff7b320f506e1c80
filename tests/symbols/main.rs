//! Integration tests for Layer 1: Symbols
//!
//! Tests symbol tables, imports, catalogs, and the encoding context.

mod context;
mod tables;
