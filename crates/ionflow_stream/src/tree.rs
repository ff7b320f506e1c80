//! Adapters between the stream traits and materialized elements.
//!
//! [`ElementCursor`] reads a tree as if it were a stream; [`TreeEmitter`]
//! builds a tree from write calls. Together with `write_values` they let
//! any cursor load into memory and any tree write to any encoding.

use std::sync::Arc;

use ionflow_foundation::{
    Decimal, Element, Error, Int, Result, Sequence, Span, Struct, SymbolToken, Timestamp, Type,
    Value,
};
use ionflow_symbols::SymbolTable;

use crate::config::DEFAULT_MAX_DEPTH;
use crate::cursor::{Cursor, check_step_in, check_type, require_lob, require_value};
use crate::emitter::{Emitter, Pending, WriteState};

type Entry = (Option<SymbolToken>, Element);

#[derive(Debug)]
struct Level {
    entries: Vec<Entry>,
    next: usize,
}

impl Level {
    fn of(value: &Value) -> Self {
        let entries = match value {
            Value::List(children) | Value::SExp(children) => {
                children.iter().map(|c| (None, c.clone())).collect()
            }
            Value::Struct(fields) => fields
                .iter()
                .map(|(n, c)| (Some(n.clone()), c.clone()))
                .collect(),
            _ => Vec::new(),
        };
        Self { entries, next: 0 }
    }
}

/// A cursor over in-memory elements.
///
/// It reports no spans, since the values have no source.
#[derive(Debug)]
pub struct ElementCursor {
    levels: Vec<Level>,
    current: Option<Entry>,
    table: Arc<SymbolTable>,
    max_depth: usize,
}

impl ElementCursor {
    /// Creates a cursor over top-level elements.
    #[must_use]
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            levels: vec![Level {
                entries: elements.into_iter().map(|e| (None, e)).collect(),
                next: 0,
            }],
            current: None,
            table: Arc::new(SymbolTable::system()),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Builder method to set the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    fn value(&self) -> Option<&Value> {
        self.current.as_ref().map(|(_, e)| e.value())
    }
}

impl Cursor for ElementCursor {
    fn next(&mut self) -> Result<Option<Type>> {
        let Some(level) = self.levels.last_mut() else {
            return Ok(None);
        };
        self.current = level.entries.get(level.next).cloned();
        if self.current.is_some() {
            level.next += 1;
        }
        Ok(self.current_type())
    }

    fn current_type(&self) -> Option<Type> {
        self.value().map(Value::value_type)
    }

    fn is_null(&self) -> bool {
        self.value().is_some_and(Value::is_null)
    }

    fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    fn step_in(&mut self) -> Result<()> {
        check_step_in(self.current_type(), self.is_null(), self.depth(), self.max_depth)?;
        let level = self
            .value()
            .map(Level::of)
            .ok_or_else(|| Error::cursor_state("step_in with no current value"))?;
        self.levels.push(level);
        self.current = None;
        Ok(())
    }

    fn step_out(&mut self) -> Result<()> {
        if self.levels.len() <= 1 {
            return Err(Error::cursor_state("step_out at top level"));
        }
        self.levels.pop();
        self.current = None;
        Ok(())
    }

    fn field_name(&self) -> Option<&SymbolToken> {
        self.current.as_ref().and_then(|(n, _)| n.as_ref())
    }

    fn annotations(&self) -> &[SymbolToken] {
        self.current.as_ref().map_or(&[][..], |(_, e)| e.annotations())
    }

    fn bool_value(&self) -> Result<bool> {
        if check_type(self.current_type(), self.is_null(), Type::Bool)? {
            return Ok(false);
        }
        Ok(self.value().and_then(Value::as_bool).unwrap_or(false))
    }

    fn int_value(&self) -> Result<Int> {
        if check_type(self.current_type(), self.is_null(), Type::Int)? {
            return Ok(Int::default());
        }
        Ok(self.value().and_then(Value::as_int).cloned().unwrap_or_default())
    }

    fn float_value(&self) -> Result<f64> {
        if check_type(self.current_type(), self.is_null(), Type::Float)? {
            return Ok(0.0);
        }
        Ok(self.value().and_then(Value::as_float).unwrap_or(0.0))
    }

    fn decimal_value(&self) -> Result<Decimal> {
        if check_type(self.current_type(), self.is_null(), Type::Decimal)? {
            return Ok(Decimal::default());
        }
        Ok(self.value().and_then(Value::as_decimal).cloned().unwrap_or_default())
    }

    fn timestamp_value(&self) -> Result<Timestamp> {
        require_value(self.current_type(), self.is_null(), Type::Timestamp)?;
        self.value()
            .and_then(Value::as_timestamp)
            .cloned()
            .ok_or_else(|| Error::null_value(Type::Timestamp))
    }

    fn string_value(&self) -> Result<String> {
        require_value(self.current_type(), self.is_null(), Type::String)?;
        self.value()
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::null_value(Type::String))
    }

    fn symbol_value(&self) -> Result<SymbolToken> {
        require_value(self.current_type(), self.is_null(), Type::Symbol)?;
        self.value()
            .and_then(Value::as_symbol)
            .cloned()
            .ok_or_else(|| Error::null_value(Type::Symbol))
    }

    fn bytes_value(&self) -> Result<Vec<u8>> {
        let ty = require_lob(self.current_type(), self.is_null())?;
        self.value()
            .and_then(Value::as_bytes)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::null_value(ty))
    }

    fn current_span(&self) -> Option<Span> {
        None
    }

    fn symbol_table(&self) -> Arc<SymbolTable> {
        self.table.clone()
    }
}

#[derive(Debug)]
struct OpenContainer {
    ty: Type,
    pending: Pending,
    children: Vec<Entry>,
}

/// An emitter that builds elements in memory.
#[derive(Debug, Default)]
pub struct TreeEmitter {
    state: WriteState,
    open: Vec<OpenContainer>,
    top: Vec<Element>,
}

impl TreeEmitter {
    /// Creates an empty emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the completed top-level elements.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.top
    }

    /// Consumes the emitter, returning the completed top-level elements.
    ///
    /// Containers still open are discarded.
    #[must_use]
    pub fn into_elements(self) -> Vec<Element> {
        self.top
    }

    fn scalar(&mut self, value: Value) -> Result<()> {
        let pending = self.state.begin_value()?;
        self.place(pending, value);
        Ok(())
    }

    fn place(&mut self, pending: Pending, value: Value) {
        let element = Element::new(value).with_annotations(pending.annotations);
        match self.open.last_mut() {
            Some(parent) => parent.children.push((pending.field_name, element)),
            None => self.top.push(element),
        }
    }
}

impl Emitter for TreeEmitter {
    fn set_field_name(&mut self, name: SymbolToken) -> Result<()> {
        self.state.set_field_name(name)
    }

    fn add_annotation(&mut self, annotation: SymbolToken) {
        self.state.add_annotation(annotation);
    }

    fn write_null(&mut self, ty: Type) -> Result<()> {
        self.scalar(Value::Null(ty))
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.scalar(Value::Bool(value))
    }

    fn write_int(&mut self, value: &Int) -> Result<()> {
        self.scalar(Value::Int(value.clone()))
    }

    fn write_float(&mut self, value: f64) -> Result<()> {
        self.scalar(Value::Float(value))
    }

    fn write_decimal(&mut self, value: &Decimal) -> Result<()> {
        self.scalar(Value::Decimal(value.clone()))
    }

    fn write_timestamp(&mut self, value: &Timestamp) -> Result<()> {
        self.scalar(Value::Timestamp(value.clone()))
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.scalar(Value::String(Arc::from(value)))
    }

    fn write_symbol(&mut self, value: SymbolToken) -> Result<()> {
        self.scalar(Value::Symbol(value))
    }

    fn write_blob(&mut self, value: &[u8]) -> Result<()> {
        self.scalar(Value::Blob(Arc::from(value)))
    }

    fn write_clob(&mut self, value: &[u8]) -> Result<()> {
        self.scalar(Value::Clob(Arc::from(value)))
    }

    fn step_in(&mut self, ty: Type) -> Result<()> {
        let pending = self.state.push(ty)?;
        self.open.push(OpenContainer {
            ty,
            pending,
            children: Vec::new(),
        });
        Ok(())
    }

    fn step_out(&mut self) -> Result<()> {
        self.state.pop()?;
        let container = self
            .open
            .pop()
            .ok_or_else(|| Error::structure("step_out at top level"))?;
        let value = match container.ty {
            Type::Struct => {
                let mut fields = Struct::new();
                for (name, child) in container.children {
                    fields.push(name.unwrap_or_else(|| SymbolToken::sid(0)), child);
                }
                Value::Struct(fields)
            }
            ty => {
                let children: Sequence<Element> =
                    container.children.into_iter().map(|(_, c)| c).collect();
                if ty == Type::SExp {
                    Value::SExp(children)
                } else {
                    Value::List(children)
                }
            }
        };
        self.place(container.pending, value);
        Ok(())
    }

    fn depth(&self) -> usize {
        self.state.depth()
    }

    fn in_struct(&self) -> bool {
        self.state.in_struct()
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
