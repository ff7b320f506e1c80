//! Reading and writing symbol-table directives through the stream traits.
//!
//! Directives have the same shape in every encoding, so codecs share this
//! code: a cursor positioned on a directive struct decodes it with
//! [`read_directive`], and an emitter writes one with [`write_directive`].

use ionflow_foundation::{Result, SymbolToken, Type};
use ionflow_symbols::system::{ION_SYMBOL_TABLE, SYSTEM_SYMBOLS};
use ionflow_symbols::{ImportDescriptor, SymbolTableDirective};

use crate::cursor::Cursor;
use crate::emitter::Emitter;

/// Text of the annotation that marks a directive.
pub const DIRECTIVE_ANNOTATION: &str = SYSTEM_SYMBOLS[ION_SYMBOL_TABLE - 1];

/// Returns true if a top-level value with these parts is a directive.
#[must_use]
pub fn is_directive(ty: Type, is_null: bool, annotations: &[SymbolToken]) -> bool {
    ty == Type::Struct
        && !is_null
        && annotations
            .first()
            .is_some_and(is_directive_annotation)
}

fn is_directive_annotation(token: &SymbolToken) -> bool {
    match token.as_text() {
        Some(text) => text == DIRECTIVE_ANNOTATION,
        None => token.local_sid() == Some(ION_SYMBOL_TABLE),
    }
}

/// Decodes the directive struct the cursor is positioned on.
///
/// Leaves the cursor after the struct at the same depth. Unknown fields
/// and malformed entries are ignored the way the directive format requires.
///
/// # Errors
///
/// Fails only on malformed input beneath the cursor.
pub fn read_directive<C: Cursor + ?Sized>(cursor: &mut C) -> Result<SymbolTableDirective> {
    let mut directive = SymbolTableDirective::default();
    let mut seen_imports = false;
    let mut seen_symbols = false;
    cursor.step_in()?;
    while let Some(ty) = cursor.next()? {
        let field = cursor.field_name().and_then(SymbolToken::as_text);
        let (is_imports, is_symbols) = (field == Some("imports"), field == Some("symbols"));
        if is_imports && !seen_imports {
            seen_imports = true;
            if cursor.is_null() {
                continue;
            }
            match ty {
                Type::Symbol => {
                    directive.append = is_directive_annotation(&cursor.symbol_value()?);
                }
                Type::List => directive.imports = read_imports(cursor)?,
                _ => {}
            }
        } else if is_symbols && !seen_symbols {
            seen_symbols = true;
            if ty == Type::List && !cursor.is_null() {
                directive.symbols = read_symbols(cursor)?;
            }
        }
    }
    cursor.step_out()?;
    Ok(directive)
}

fn read_imports<C: Cursor + ?Sized>(cursor: &mut C) -> Result<Vec<ImportDescriptor>> {
    let mut imports = Vec::new();
    cursor.step_in()?;
    while let Some(ty) = cursor.next()? {
        if ty != Type::Struct || cursor.is_null() {
            continue;
        }
        if let Some(import) = read_import(cursor)? {
            imports.push(import);
        }
    }
    cursor.step_out()?;
    Ok(imports)
}

fn read_import<C: Cursor + ?Sized>(cursor: &mut C) -> Result<Option<ImportDescriptor>> {
    let mut name = None;
    let mut version = 1u32;
    let mut max_id = None;
    cursor.step_in()?;
    while let Some(ty) = cursor.next()? {
        if cursor.is_null() {
            continue;
        }
        match (cursor.field_name().and_then(SymbolToken::as_text), ty) {
            (Some("name"), Type::String) => name = Some(cursor.string_value()?),
            (Some("version"), Type::Int) => {
                version = cursor
                    .int_value()?
                    .as_i64()
                    .and_then(|v| u32::try_from(v).ok())
                    .filter(|v| *v > 0)
                    .unwrap_or(1);
            }
            (Some("max_id"), Type::Int) => {
                max_id = cursor
                    .int_value()?
                    .as_i64()
                    .and_then(|v| usize::try_from(v).ok());
            }
            _ => {}
        }
    }
    cursor.step_out()?;
    // imports without a usable name, and imports of the system table, are ignored
    Ok(name
        .filter(|n| !n.is_empty() && n != ionflow_symbols::system::SYSTEM_TABLE_NAME)
        .map(|n| ImportDescriptor::new(n, version, max_id)))
}

fn read_symbols<C: Cursor + ?Sized>(cursor: &mut C) -> Result<Vec<Option<String>>> {
    let mut symbols = Vec::new();
    cursor.step_in()?;
    while let Some(ty) = cursor.next()? {
        if ty == Type::String && !cursor.is_null() {
            symbols.push(Some(cursor.string_value()?));
        } else {
            symbols.push(None);
        }
    }
    cursor.step_out()?;
    Ok(symbols)
}

/// Writes a directive struct at the emitter's current position.
///
/// Field names and annotations are written by text, so the emitter resolves
/// them to system ids.
///
/// # Errors
///
/// Any write failure.
pub fn write_directive<E: Emitter + ?Sized>(
    emitter: &mut E,
    directive: &SymbolTableDirective,
) -> Result<()> {
    emitter.add_annotation(SymbolToken::text(DIRECTIVE_ANNOTATION));
    emitter.step_in(Type::Struct)?;
    if directive.append {
        emitter.set_field_name(SymbolToken::text("imports"))?;
        emitter.write_symbol(SymbolToken::text(DIRECTIVE_ANNOTATION))?;
    } else if !directive.imports.is_empty() {
        emitter.set_field_name(SymbolToken::text("imports"))?;
        emitter.step_in(Type::List)?;
        for import in &directive.imports {
            emitter.step_in(Type::Struct)?;
            emitter.set_field_name(SymbolToken::text("name"))?;
            emitter.write_string(&import.name)?;
            emitter.set_field_name(SymbolToken::text("version"))?;
            emitter.write_i64(i64::from(import.version))?;
            if let Some(max_id) = import.max_id {
                emitter.set_field_name(SymbolToken::text("max_id"))?;
                emitter.write_i64(i64::try_from(max_id).unwrap_or(i64::MAX))?;
            }
            emitter.step_out()?;
        }
        emitter.step_out()?;
    }
    if !directive.symbols.is_empty() {
        emitter.set_field_name(SymbolToken::text("symbols"))?;
        emitter.step_in(Type::List)?;
        for symbol in &directive.symbols {
            match symbol {
                Some(text) => emitter.write_string(text)?,
                None => emitter.write_null(Type::String)?,
            }
        }
        emitter.step_out()?;
    }
    emitter.step_out()
}
