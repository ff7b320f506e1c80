//! Cursor over binary-encoded streams.

use std::sync::Arc;

use ionflow_foundation::{
    Decimal, Error, Int, OffsetUnit, Precision, Result, Span, SymbolToken, Timestamp, Type,
};
use ionflow_stream::cursor::{check_step_in, check_type, require_lob, require_value};
use ionflow_stream::{Cursor, ReaderConfig, is_directive, read_directive};
use ionflow_symbols::{EncodingContext, SymbolTable, SymbolTableDirective};
use tracing::trace;

use crate::descriptor::{self, Descriptor, VERSION_MARKER};
use crate::primitives::{read_int, read_uint_usize, read_var_int, read_var_usize};

#[derive(Clone, Copy, Debug)]
struct Container {
    ty: Type,
    end: usize,
}

#[derive(Clone, Debug)]
struct Current {
    ty: Type,
    null: bool,
    /// Annotation wrapper or descriptor; field ids are not part of the span.
    start: usize,
    descriptor: Descriptor,
    field_name: Option<SymbolToken>,
    annotations: Vec<SymbolToken>,
}

/// A cursor over a binary stream held in memory.
///
/// Spans are measured in octets and are always precise, containers
/// included, since every value is length-prefixed.
#[derive(Debug)]
pub struct BinaryCursor<B: AsRef<[u8]>> {
    data: B,
    pos: usize,
    containers: Vec<Container>,
    current: Option<Current>,
    context: EncodingContext,
    config: ReaderConfig,
    pending: Option<(SymbolTableDirective, usize)>,
}

impl<B: AsRef<[u8]>> BinaryCursor<B> {
    /// Creates a cursor with the default configuration.
    pub fn new(data: B) -> Self {
        Self::with_config(data, ReaderConfig::default())
    }

    /// Creates a cursor with the given configuration.
    pub fn with_config(data: B, config: ReaderConfig) -> Self {
        Self {
            data,
            pos: 0,
            containers: Vec::new(),
            current: None,
            context: EncodingContext::new(config.catalog.clone())
                .with_max_symbol_id(config.max_symbol_id),
            config,
            pending: None,
        }
    }

    /// Returns the encoding context in effect.
    pub fn context(&self) -> &EncodingContext {
        &self.context
    }

    fn bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn limit(&self) -> usize {
        self.containers
            .last()
            .map_or(self.bytes().len(), |c| c.end)
    }

    fn in_struct(&self) -> bool {
        self.containers.last().is_some_and(|c| c.ty == Type::Struct)
    }

    fn body(&self) -> &[u8] {
        self.current
            .as_ref()
            .map_or(&[][..], |c| &self.bytes()[c.descriptor.body..c.descriptor.end])
    }

    fn body_offset(&self) -> usize {
        self.current.as_ref().map_or(self.pos, |c| c.descriptor.body)
    }

    fn read_version_marker(&mut self) -> Result<()> {
        let pos = self.pos;
        let marker = self
            .bytes()
            .get(pos..pos + VERSION_MARKER.len())
            .ok_or_else(|| Error::unexpected_eof(self.bytes().len()))?;
        if marker != VERSION_MARKER {
            if marker[3] == VERSION_MARKER[3] {
                return Err(Error::unsupported_version(marker[1], marker[2]));
            }
            return Err(Error::malformed("annotation wrapper with no annotations", pos));
        }
        self.pos += VERSION_MARKER.len();
        self.context.reset(self.pos);
        Ok(())
    }

    fn read_sid(&self, pos: usize, limit: usize) -> Result<(usize, usize)> {
        read_var_usize(self.bytes().get(pos..limit).unwrap_or(&[]), pos)
    }

    /// Decodes the value at `self.pos`, or `None` for padding.
    fn read_value(&mut self, field_name: Option<SymbolToken>) -> Result<Option<Current>> {
        let start = self.pos;
        let limit = self.limit();
        let outer = Descriptor::read(self.bytes(), start, limit)?;
        self.pos = outer.end;
        if outer.is_nop() {
            return Ok(None);
        }
        let mut annotations = Vec::new();
        let descriptor = if outer.type_code == descriptor::ANNOTATION {
            if outer.is_null() || outer.length_code == 0 {
                return Err(Error::malformed("invalid annotation wrapper", start));
            }
            let (annot_len, len) = self.read_sid(outer.body, outer.end)?;
            let mut p = outer.body + len;
            let annot_end = p
                .checked_add(annot_len)
                .filter(|&end| annot_len > 0 && end < outer.end)
                .ok_or_else(|| Error::malformed("invalid annotation list", start))?;
            while p < annot_end {
                let (sid, len) = self.read_sid(p, annot_end)?;
                annotations.push(self.context.resolve(sid));
                p += len;
            }
            let inner = Descriptor::read(self.bytes(), p, outer.end)?;
            if inner.end != outer.end {
                return Err(Error::malformed("annotation wrapper length mismatch", start));
            }
            if inner.type_code == descriptor::ANNOTATION || inner.is_nop() {
                return Err(Error::malformed("annotation wrapper must hold a value", p));
            }
            inner
        } else {
            outer
        };
        let ty = descriptor::value_type(descriptor.type_code)
            .ok_or_else(|| Error::malformed("reserved type code", start))?;
        if descriptor.type_code == descriptor::NEG_INT
            && !descriptor.is_null()
            && self.bytes()[descriptor.body..descriptor.end].iter().all(|&b| b == 0)
        {
            return Err(Error::malformed("negative int with zero magnitude", start));
        }
        Ok(Some(Current {
            ty,
            null: descriptor.is_null(),
            start,
            descriptor,
            field_name,
            annotations,
        }))
    }

    /// Decodes a directive struct without disturbing the cursor position.
    fn peek_directive(&mut self) -> Result<SymbolTableDirective> {
        let saved_pos = self.pos;
        let saved = self.current.clone();
        let directive = read_directive(self)?;
        self.pos = saved_pos;
        self.current = saved;
        Ok(directive)
    }

    fn timestamp(&self) -> Result<Timestamp> {
        let body = self.body();
        let base = self.body_offset();
        let mut p = 0;
        let (offset, len) = read_var_int(body, base)?;
        p += len;
        let offset = if offset.negative_zero {
            None
        } else {
            Some(
                i16::try_from(offset.value)
                    .map_err(|_| Error::malformed("timestamp offset out of range", base))?,
            )
        };
        let mut fields = [0usize; 6];
        let mut count = 0;
        while p < body.len() && count < fields.len() {
            let (v, len) = read_var_usize(&body[p..], base + p)?;
            fields[count] = v;
            count += 1;
            p += len;
        }
        let narrow = |v: usize| {
            u8::try_from(v).map_err(|_| Error::malformed("timestamp field out of range", base))
        };
        let year = u16::try_from(fields[0])
            .map_err(|_| Error::malformed("timestamp year out of range", base))?;
        let precision = match count {
            1 => Precision::Year,
            2 => Precision::Month,
            3 => Precision::Day,
            5 => Precision::Minute,
            6 => Precision::Second,
            _ => return Err(Error::malformed("invalid timestamp field count", base)),
        };
        let fraction = if p < body.len() {
            if precision != Precision::Second {
                return Err(Error::malformed("fraction below second precision", base + p));
            }
            let (exponent, len) = read_var_int(&body[p..], base + p)?;
            p += len;
            let (coefficient, _) = read_int(&body[p..]);
            Some(Decimal::new(coefficient, exponent.value))
        } else {
            None
        };
        let utc = (
            year,
            narrow(fields[1].max(1))?,
            narrow(fields[2].max(1))?,
            narrow(fields[3])?,
            narrow(fields[4])?,
        );
        Timestamp::from_utc_fields(precision, utc, narrow(fields[5])?, fraction, offset)
            .map_err(|e| Error::malformed(e.0, base))
    }
}

impl<B: AsRef<[u8]>> Cursor for BinaryCursor<B> {
    fn next(&mut self) -> Result<Option<Type>> {
        if self.containers.is_empty() {
            if let Some((directive, offset)) = self.pending.take() {
                self.context.apply(&directive, offset)?;
            }
        }
        if let Some(current) = self.current.take() {
            self.pos = current.descriptor.end;
        }
        loop {
            let limit = self.limit();
            if self.pos >= limit {
                return Ok(None);
            }
            if self.containers.is_empty() && self.bytes()[self.pos] == VERSION_MARKER[0] {
                self.read_version_marker()?;
                continue;
            }
            let field_name = if self.in_struct() {
                let (sid, len) = self.read_sid(self.pos, limit)?;
                self.pos += len;
                Some(self.context.resolve(sid))
            } else {
                None
            };
            let Some(current) = self.read_value(field_name)? else {
                continue;
            };
            let directive = self.containers.is_empty()
                && is_directive(current.ty, current.null, &current.annotations);
            let start = current.start;
            self.current = Some(current);
            if directive {
                let decoded = self.peek_directive()?;
                if self.config.surface_directives {
                    self.pending = Some((decoded, start));
                } else {
                    self.current = None;
                    self.context.apply(&decoded, start)?;
                    continue;
                }
            }
            return Ok(self.current_type());
        }
    }

    fn current_type(&self) -> Option<Type> {
        self.current.as_ref().map(|c| c.ty)
    }

    fn is_null(&self) -> bool {
        self.current.as_ref().is_some_and(|c| c.null)
    }

    fn depth(&self) -> usize {
        self.containers.len()
    }

    fn step_in(&mut self) -> Result<()> {
        let ty = check_step_in(
            self.current_type(),
            self.is_null(),
            self.depth(),
            self.config.max_depth,
        )?;
        let current = self
            .current
            .take()
            .ok_or_else(|| Error::cursor_state("step_in with no current value"))?;
        self.containers.push(Container {
            ty,
            end: current.descriptor.end,
        });
        self.pos = current.descriptor.body;
        Ok(())
    }

    fn step_out(&mut self) -> Result<()> {
        let container = self
            .containers
            .pop()
            .ok_or_else(|| Error::cursor_state("step_out at top level"))?;
        if self.pos < container.end {
            trace!(from = self.pos, to = container.end, "skipping rest of container");
        }
        self.pos = container.end;
        self.current = None;
        Ok(())
    }

    fn field_name(&self) -> Option<&SymbolToken> {
        self.current.as_ref().and_then(|c| c.field_name.as_ref())
    }

    fn annotations(&self) -> &[SymbolToken] {
        self.current.as_ref().map_or(&[][..], |c| &c.annotations)
    }

    fn bool_value(&self) -> Result<bool> {
        if check_type(self.current_type(), self.is_null(), Type::Bool)? {
            return Ok(false);
        }
        Ok(self.current.as_ref().is_some_and(|c| c.descriptor.length_code == 1))
    }

    fn int_value(&self) -> Result<Int> {
        if check_type(self.current_type(), self.is_null(), Type::Int)? {
            return Ok(Int::default());
        }
        let negative = self
            .current
            .as_ref()
            .is_some_and(|c| c.descriptor.type_code == descriptor::NEG_INT);
        Ok(Int::from_magnitude(negative, self.body()))
    }

    fn float_value(&self) -> Result<f64> {
        if check_type(self.current_type(), self.is_null(), Type::Float)? {
            return Ok(0.0);
        }
        let body = self.body();
        match body.len() {
            0 => Ok(0.0),
            4 => {
                let bits: [u8; 4] = body.try_into().unwrap_or_default();
                Ok(f64::from(f32::from_be_bytes(bits)))
            }
            8 => {
                let bits: [u8; 8] = body.try_into().unwrap_or_default();
                Ok(f64::from_be_bytes(bits))
            }
            _ => Err(Error::malformed("invalid float length", self.body_offset())),
        }
    }

    fn decimal_value(&self) -> Result<Decimal> {
        if check_type(self.current_type(), self.is_null(), Type::Decimal)? {
            return Ok(Decimal::default());
        }
        let body = self.body();
        if body.is_empty() {
            return Ok(Decimal::default());
        }
        let (exponent, len) = read_var_int(body, self.body_offset())?;
        let (coefficient, negative_zero) = read_int(&body[len..]);
        if negative_zero {
            return Ok(Decimal::negative_zero(exponent.value));
        }
        Ok(Decimal::new(coefficient, exponent.value))
    }

    fn timestamp_value(&self) -> Result<Timestamp> {
        require_value(self.current_type(), self.is_null(), Type::Timestamp)?;
        self.timestamp()
    }

    fn string_value(&self) -> Result<String> {
        require_value(self.current_type(), self.is_null(), Type::String)?;
        std::str::from_utf8(self.body())
            .map(str::to_string)
            .map_err(|e| Error::malformed(format!("invalid UTF-8: {e}"), self.body_offset()))
    }

    fn symbol_value(&self) -> Result<SymbolToken> {
        require_value(self.current_type(), self.is_null(), Type::Symbol)?;
        let sid = read_uint_usize(self.body(), self.body_offset())?;
        Ok(self.context.resolve(sid))
    }

    fn bytes_value(&self) -> Result<Vec<u8>> {
        require_lob(self.current_type(), self.is_null())?;
        Ok(self.body().to_vec())
    }

    fn current_span(&self) -> Option<Span> {
        self.current
            .as_ref()
            .map(|c| Span::new(c.start, c.descriptor.end, OffsetUnit::Octets))
    }

    fn symbol_table(&self) -> Arc<SymbolTable> {
        self.context.snapshot()
    }
}
