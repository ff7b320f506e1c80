//! The system symbol table.
//!
//! Every local table begins with these symbols at fixed ids.

use std::sync::{Arc, OnceLock};

use crate::shared::SharedSymbolTable;

/// Name of the system symbol table.
pub const SYSTEM_TABLE_NAME: &str = "$ion";

/// Symbol id of `$ion`.
pub const ION: usize = 1;
/// Symbol id of `$ion_1_0`, the text version marker.
pub const ION_1_0: usize = 2;
/// Symbol id of `$ion_symbol_table`, the directive annotation.
pub const ION_SYMBOL_TABLE: usize = 3;
/// Symbol id of `name`.
pub const NAME: usize = 4;
/// Symbol id of `version`.
pub const VERSION: usize = 5;
/// Symbol id of `imports`.
pub const IMPORTS: usize = 6;
/// Symbol id of `symbols`.
pub const SYMBOLS: usize = 7;
/// Symbol id of `max_id`.
pub const MAX_ID: usize = 8;
/// Symbol id of `$ion_shared_symbol_table`.
pub const ION_SHARED_SYMBOL_TABLE: usize = 9;

/// Text of the system symbols, in id order starting at 1.
pub const SYSTEM_SYMBOLS: [&str; 9] = [
    "$ion",
    "$ion_1_0",
    "$ion_symbol_table",
    "name",
    "version",
    "imports",
    "symbols",
    "max_id",
    "$ion_shared_symbol_table",
];

/// Highest system symbol id.
pub const SYSTEM_MAX_ID: usize = SYSTEM_SYMBOLS.len();

/// Returns the shared instance of the system table.
#[must_use]
pub fn system_table() -> Arc<SharedSymbolTable> {
    static SYSTEM: OnceLock<Arc<SharedSymbolTable>> = OnceLock::new();
    SYSTEM
        .get_or_init(|| Arc::new(SharedSymbolTable::new(SYSTEM_TABLE_NAME, 1, SYSTEM_SYMBOLS)))
        .clone()
}
