//! Emitter producing compact text.
//!
//! Top-level values are separated by newlines, list and struct children by
//! `,`, and s-expression children by a space. Text is built in memory and
//! written to the sink on `flush`.

use std::fmt::Write as _;
use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ionflow_foundation::{Decimal, Element, Error, Int, Result, SymbolToken, Timestamp, Type};
use ionflow_stream::{Emitter, Pending, WriteState, WriterConfig, write_directive};
use ionflow_symbols::{ImportDescriptor, SymbolTableDirective};

use crate::token::is_plain_identifier;

#[derive(Clone, Copy, Debug)]
struct Open {
    ty: Type,
    children: usize,
}

/// A text emitter writing to `W`.
#[derive(Debug)]
pub struct TextEmitter<W: Write> {
    sink: W,
    out: String,
    state: WriteState,
    open: Vec<Open>,
    top_level: usize,
    imports: Vec<ImportDescriptor>,
}

impl<W: Write> TextEmitter<W> {
    /// Creates an emitter with the default configuration.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, WriterConfig::default())
    }

    /// Creates an emitter with the given configuration.
    ///
    /// Configured imports are declared by a directive ahead of the first
    /// value.
    pub fn with_config(sink: W, config: WriterConfig) -> Self {
        Self {
            sink,
            out: String::new(),
            state: WriteState::new(),
            open: Vec::new(),
            top_level: 0,
            imports: config.imports.iter().map(|i| i.descriptor()).collect(),
        }
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    ///
    /// `Structure` with containers still open, or sink failures.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }

    /// Writes the imports directive if it is still owed.
    fn declare_imports(&mut self) -> Result<()> {
        if self.imports.is_empty() || self.state.depth() > 0 {
            return Ok(());
        }
        let directive = SymbolTableDirective::new(std::mem::take(&mut self.imports), Vec::new());
        let staged = std::mem::replace(&mut self.state, WriteState::new());
        let written = write_directive(self, &directive);
        self.state = staged;
        written
    }

    /// Writes the separator, field name and annotations of a value.
    fn begin(&mut self, pending: Pending) {
        match self.open.last_mut() {
            Some(parent) => {
                if parent.children > 0 {
                    self.out.push(if parent.ty == Type::SExp { ' ' } else { ',' });
                }
                parent.children += 1;
            }
            None => {
                if self.top_level > 0 {
                    self.out.push('\n');
                }
                self.top_level += 1;
            }
        }
        if let Some(name) = &pending.field_name {
            write_symbol(&mut self.out, name);
            self.out.push(':');
        }
        for annotation in &pending.annotations {
            write_symbol(&mut self.out, annotation);
            self.out.push_str("::");
        }
    }

    fn scalar(&mut self, write: impl FnOnce(&mut String)) -> Result<()> {
        self.declare_imports()?;
        let pending = self.state.begin_value()?;
        self.begin(pending);
        write(&mut self.out);
        Ok(())
    }
}

impl<W: Write> Emitter for TextEmitter<W> {
    fn set_field_name(&mut self, name: SymbolToken) -> Result<()> {
        self.state.set_field_name(name)
    }

    fn add_annotation(&mut self, annotation: SymbolToken) {
        self.state.add_annotation(annotation);
    }

    fn write_null(&mut self, ty: Type) -> Result<()> {
        self.scalar(|out| {
            out.push_str("null");
            if ty != Type::Null {
                out.push('.');
                out.push_str(ty.name());
            }
        })
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.scalar(|out| out.push_str(if value { "true" } else { "false" }))
    }

    fn write_int(&mut self, value: &Int) -> Result<()> {
        self.scalar(|out| {
            let _ = write!(out, "{value}");
        })
    }

    fn write_float(&mut self, value: f64) -> Result<()> {
        self.scalar(|out| write_float(out, value))
    }

    fn write_decimal(&mut self, value: &Decimal) -> Result<()> {
        self.scalar(|out| {
            let _ = write!(out, "{value}");
        })
    }

    fn write_timestamp(&mut self, value: &Timestamp) -> Result<()> {
        self.scalar(|out| {
            let _ = write!(out, "{value}");
        })
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.scalar(|out| write_quoted(out, value, '"'))
    }

    fn write_symbol(&mut self, value: SymbolToken) -> Result<()> {
        self.scalar(|out| write_symbol(out, &value))
    }

    fn write_blob(&mut self, value: &[u8]) -> Result<()> {
        self.scalar(|out| {
            out.push_str("{{");
            out.push_str(&STANDARD.encode(value));
            out.push_str("}}");
        })
    }

    fn write_clob(&mut self, value: &[u8]) -> Result<()> {
        self.scalar(|out| {
            out.push_str("{{\"");
            for &byte in value {
                match byte {
                    b'"' => out.push_str("\\\""),
                    b'\\' => out.push_str("\\\\"),
                    0x20..=0x7E => out.push(char::from(byte)),
                    _ => {
                        let _ = write!(out, "\\x{byte:02x}");
                    }
                }
            }
            out.push_str("\"}}");
        })
    }

    fn step_in(&mut self, ty: Type) -> Result<()> {
        self.declare_imports()?;
        let pending = self.state.push(ty)?;
        self.begin(pending);
        self.out.push(match ty {
            Type::List => '[',
            Type::SExp => '(',
            _ => '{',
        });
        self.open.push(Open { ty, children: 0 });
        Ok(())
    }

    fn step_out(&mut self) -> Result<()> {
        let ty = self.state.pop()?;
        self.open.pop();
        self.out.push(match ty {
            Type::List => ']',
            Type::SExp => ')',
            _ => '}',
        });
        Ok(())
    }

    fn depth(&self) -> usize {
        self.state.depth()
    }

    fn in_struct(&self) -> bool {
        self.state.in_struct()
    }

    fn flush(&mut self) -> Result<()> {
        if self.state.depth() > 0 {
            return Err(Error::structure("flush with open containers"));
        }
        self.sink.write_all(self.out.as_bytes())?;
        self.sink.flush()?;
        self.out.clear();
        Ok(())
    }
}

/// Encodes elements as text.
///
/// # Errors
///
/// Fails only on emitter misuse, which elements cannot cause.
pub fn to_text(elements: &[Element], config: WriterConfig) -> Result<String> {
    let mut emitter = TextEmitter::with_config(Vec::new(), config);
    for element in elements {
        emitter.write_element(element)?;
    }
    let bytes = emitter.finish()?;
    String::from_utf8(bytes).map_err(|e| Error::malformed(e.to_string(), 0))
}

fn write_symbol(out: &mut String, token: &SymbolToken) {
    match token.as_text() {
        Some(text) if is_plain_identifier(text) => out.push_str(text),
        Some(text) => write_quoted(out, text, '\''),
        None => {
            let _ = write!(out, "${}", token.local_sid().unwrap_or(0));
        }
    }
}

fn write_quoted(out: &mut String, text: &str, quote: char) {
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c < ' ' || c == '\u{7F}' => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

fn write_float(out: &mut String, value: f64) {
    if value.is_nan() {
        out.push_str("nan");
    } else if value.is_infinite() {
        out.push_str(if value > 0.0 { "+inf" } else { "-inf" });
    } else {
        let _ = write!(out, "{value:e}");
    }
}
