//! Emitter producing binary-encoded streams.
//!
//! Container lengths precede their bodies, so every open container is
//! buffered until `step_out`, and completed top-level values are buffered
//! until `flush`. At flush the emitter writes, in order: the version marker
//! (first flush only), a directive declaring every symbol interned since the
//! previous flush (if any), then the buffered values. Binary readers thus
//! never meet a symbol id before its declaration.

use std::io::Write;

use ionflow_foundation::{Decimal, Element, Error, Int, Result, SymbolToken, Timestamp, Type};
use ionflow_stream::{Emitter, Pending, WriteState, WriterConfig, write_directive};
use ionflow_symbols::{SymbolTable, SymbolTableDirective};
use tracing::trace;

use crate::descriptor::VERSION_MARKER;
use crate::encode;
use crate::primitives::write_var_usize;

#[derive(Debug)]
struct OpenContainer {
    ty: Type,
    pending: Pending,
    body: Vec<u8>,
}

/// A binary emitter writing to `W`.
#[derive(Debug)]
pub struct BinaryEmitter<W: Write> {
    sink: W,
    state: WriteState,
    table: SymbolTable,
    declared: usize,
    directive_written: bool,
    marker_written: bool,
    open: Vec<OpenContainer>,
    buffered: Vec<u8>,
    config: WriterConfig,
    scratch: Vec<u8>,
}

impl<W: Write> BinaryEmitter<W> {
    /// Creates an emitter with the default configuration.
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, WriterConfig::default())
    }

    /// Creates an emitter with the given configuration.
    pub fn with_config(sink: W, config: WriterConfig) -> Self {
        let table = SymbolTable::with_imports(config.imports.clone());
        Self {
            sink,
            state: WriteState::new(),
            declared: table.max_id(),
            table,
            directive_written: false,
            marker_written: false,
            open: Vec::new(),
            buffered: Vec::new(),
            config,
            scratch: Vec::new(),
        }
    }

    /// Returns the symbol table the output uses.
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    /// Returns the number of bytes buffered for the next flush.
    pub fn buffered_len(&self) -> usize {
        self.buffered.len()
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

    fn sid_of(&mut self, token: &SymbolToken) -> Result<usize> {
        if let Some(text) = token.as_text() {
            return Ok(self.table.intern(text));
        }
        // a raw id is only written where the output table has no text for it
        match token.local_sid() {
            Some(sid) if sid <= self.table.max_id() && self.table.text_for(sid).is_none() => {
                Ok(sid)
            }
            sid => Err(Error::unknown_symbol_text(sid.unwrap_or(0))),
        }
    }

    /// Encodes a scalar into the scratch buffer, then places it.
    fn scalar(&mut self, encode: impl FnOnce(&mut Vec<u8>)) -> Result<()> {
        let pending = self.state.begin_value()?;
        let mut value = std::mem::take(&mut self.scratch);
        value.clear();
        encode(&mut value);
        let placed = self.place(pending, &value);
        self.scratch = value;
        placed
    }

    fn place(&mut self, pending: Pending, value: &[u8]) -> Result<()> {
        let field = pending
            .field_name
            .as_ref()
            .map(|name| self.sid_of(name))
            .transpose()?;
        let annotations = pending
            .annotations
            .iter()
            .map(|a| self.sid_of(a))
            .collect::<Result<Vec<_>>>()?;
        let out = match self.open.last_mut() {
            Some(parent) => &mut parent.body,
            None => &mut self.buffered,
        };
        if let Some(sid) = field {
            write_var_usize(out, sid);
        }
        encode::annotated(out, &annotations, value);
        if self.open.is_empty() {
            self.value_complete()?;
        }
        Ok(())
    }

    fn value_complete(&mut self) -> Result<()> {
        match self.config.flush_threshold {
            Some(threshold) if self.buffered.len() >= threshold => self.flush(),
            _ => Ok(()),
        }
    }

    /// Builds the directive for symbols not yet declared, if one is needed.
    fn pending_directive(&self) -> Option<SymbolTableDirective> {
        let fresh: Vec<Option<String>> = self
            .table
            .symbols_after(self.declared)
            .iter()
            .map(|s| s.as_deref().map(str::to_string))
            .collect();
        if self.directive_written {
            return (!fresh.is_empty()).then(|| SymbolTableDirective::append(fresh));
        }
        let imports: Vec<_> = self.table.imports().iter().map(|i| i.descriptor()).collect();
        if fresh.is_empty() && imports.is_empty() {
            return None;
        }
        Some(SymbolTableDirective::new(imports, fresh))
    }

    /// Encodes a directive through this emitter's own value path.
    fn encode_directive(&mut self, directive: &SymbolTableDirective) -> Result<Vec<u8>> {
        let values = std::mem::take(&mut self.buffered);
        let threshold = self.config.flush_threshold.take();
        let written = write_directive(self, directive);
        self.config.flush_threshold = threshold;
        let encoded = std::mem::replace(&mut self.buffered, values);
        written.map(|()| encoded)
    }
}

impl<W: Write> Emitter for BinaryEmitter<W> {
    fn set_field_name(&mut self, name: SymbolToken) -> Result<()> {
        self.state.set_field_name(name)
    }

    fn add_annotation(&mut self, annotation: SymbolToken) {
        self.state.add_annotation(annotation);
    }

    fn write_null(&mut self, ty: Type) -> Result<()> {
        self.scalar(|out| encode::null(out, ty))
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.scalar(|out| encode::boolean(out, value))
    }

    fn write_int(&mut self, value: &Int) -> Result<()> {
        self.scalar(|out| encode::int(out, value))
    }

    fn write_float(&mut self, value: f64) -> Result<()> {
        self.scalar(|out| encode::float(out, value))
    }

    fn write_decimal(&mut self, value: &Decimal) -> Result<()> {
        self.scalar(|out| encode::decimal(out, value))
    }

    fn write_timestamp(&mut self, value: &Timestamp) -> Result<()> {
        self.scalar(|out| encode::timestamp(out, value))
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.scalar(|out| encode::string(out, value))
    }

    fn write_symbol(&mut self, value: SymbolToken) -> Result<()> {
        let sid = self.sid_of(&value)?;
        self.scalar(|out| encode::symbol(out, sid))
    }

    fn write_blob(&mut self, value: &[u8]) -> Result<()> {
        self.scalar(|out| encode::lob(out, Type::Blob, value))
    }

    fn write_clob(&mut self, value: &[u8]) -> Result<()> {
        self.scalar(|out| encode::lob(out, Type::Clob, value))
    }

    fn step_in(&mut self, ty: Type) -> Result<()> {
        let pending = self.state.push(ty)?;
        self.open.push(OpenContainer {
            ty,
            pending,
            body: Vec::new(),
        });
        Ok(())
    }

    fn step_out(&mut self) -> Result<()> {
        self.state.pop()?;
        let container = self
            .open
            .pop()
            .ok_or_else(|| Error::structure("step_out at top level"))?;
        let mut value = Vec::with_capacity(container.body.len() + 4);
        encode::container(&mut value, container.ty, &container.body);
        self.place(container.pending, &value)
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
        let mut out = Vec::with_capacity(self.buffered.len() + 64);
        if !self.marker_written {
            out.extend_from_slice(&VERSION_MARKER);
        }
        let directive = self.pending_directive();
        if let Some(directive) = &directive {
            trace!(
                symbols = directive.symbols.len(),
                append = directive.append,
                "declaring symbols"
            );
            let encoded = self.encode_directive(directive)?;
            out.extend_from_slice(&encoded);
        }
        out.extend_from_slice(&self.buffered);
        self.sink.write_all(&out)?;
        self.sink.flush()?;
        self.marker_written = true;
        if directive.is_some() {
            self.directive_written = true;
            self.declared = self.table.max_id();
        }
        self.buffered.clear();
        Ok(())
    }
}

/// Encodes elements into a complete binary stream.
///
/// # Errors
///
/// `UnknownSymbolText` for symbols the output table cannot express.
pub fn to_bytes(elements: &[Element], config: WriterConfig) -> Result<Vec<u8>> {
    let mut emitter = BinaryEmitter::with_config(Vec::new(), config);
    for element in elements {
        emitter.write_element(element)?;
    }
    emitter.finish()
}
