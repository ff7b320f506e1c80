//! Push-based writing of value streams.
//!
//! An emitter mirrors a cursor: field names and annotations are staged,
//! then consumed by the next value written. `write_values` drains a cursor
//! into an emitter, which is how streams are transcoded and trees loaded.

use ionflow_foundation::{
    Decimal, Element, Error, Int, Result, SymbolToken, Timestamp, Type, Value,
};

use crate::cursor::Cursor;

/// A streaming writer of values.
pub trait Emitter {
    /// Stages the field name of the next value.
    ///
    /// # Errors
    ///
    /// `Structure` outside a struct.
    fn set_field_name(&mut self, name: SymbolToken) -> Result<()>;

    /// Stages an annotation for the next value.
    fn add_annotation(&mut self, annotation: SymbolToken);

    /// Writes a typed null.
    ///
    /// # Errors
    ///
    /// `Structure` inside a struct without a field name, or sink failures.
    fn write_null(&mut self, ty: Type) -> Result<()>;

    /// Writes a bool.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`].
    fn write_bool(&mut self, value: bool) -> Result<()>;

    /// Writes an int.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`].
    fn write_int(&mut self, value: &Int) -> Result<()>;

    /// Writes a float.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`].
    fn write_float(&mut self, value: f64) -> Result<()>;

    /// Writes a decimal.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`].
    fn write_decimal(&mut self, value: &Decimal) -> Result<()>;

    /// Writes a timestamp.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`].
    fn write_timestamp(&mut self, value: &Timestamp) -> Result<()>;

    /// Writes a string.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`].
    fn write_string(&mut self, value: &str) -> Result<()>;

    /// Writes a symbol.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`], plus `UnknownSymbolText` when the
    /// encoding cannot express the token.
    fn write_symbol(&mut self, value: SymbolToken) -> Result<()>;

    /// Writes a blob.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`].
    fn write_blob(&mut self, value: &[u8]) -> Result<()>;

    /// Writes a clob.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_null`].
    fn write_clob(&mut self, value: &[u8]) -> Result<()>;

    /// Opens a container.
    ///
    /// # Errors
    ///
    /// `Structure` if `ty` is not a container type, or as
    /// [`Emitter::write_null`].
    fn step_in(&mut self, ty: Type) -> Result<()>;

    /// Closes the innermost container.
    ///
    /// # Errors
    ///
    /// `Structure` at depth 0 or with a staged field name or annotation.
    fn step_out(&mut self) -> Result<()>;

    /// Returns the number of open containers.
    fn depth(&self) -> usize;

    /// Returns true if the innermost open container is a struct.
    fn in_struct(&self) -> bool;

    /// Writes everything buffered to the sink.
    ///
    /// # Errors
    ///
    /// Sink failures.
    fn flush(&mut self) -> Result<()>;

    /// Writes an `i64` int.
    ///
    /// # Errors
    ///
    /// As [`Emitter::write_int`].
    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_int(&Int::from(value))
    }

    /// Writes the cursor's current value, including its children.
    ///
    /// The field name is carried over when this emitter is in a struct.
    ///
    /// # Errors
    ///
    /// `CursorState` if the cursor has no current value, or any read or
    /// write failure.
    fn write_value(&mut self, cursor: &mut dyn Cursor) -> Result<()> {
        let ty = cursor
            .current_type()
            .ok_or_else(|| Error::cursor_state("no current value to write"))?;
        if self.in_struct() {
            let name = cursor
                .field_name()
                .cloned()
                .ok_or_else(|| Error::structure("struct field without a name"))?;
            self.set_field_name(name)?;
        }
        for annotation in cursor.annotations() {
            self.add_annotation(annotation.clone());
        }
        if cursor.is_null() {
            return self.write_null(ty);
        }
        match ty {
            Type::Null => self.write_null(Type::Null),
            Type::Bool => self.write_bool(cursor.bool_value()?),
            Type::Int => self.write_int(&cursor.int_value()?),
            Type::Float => self.write_float(cursor.float_value()?),
            Type::Decimal => self.write_decimal(&cursor.decimal_value()?),
            Type::Timestamp => self.write_timestamp(&cursor.timestamp_value()?),
            Type::String => self.write_string(&cursor.string_value()?),
            Type::Symbol => self.write_symbol(cursor.symbol_value()?),
            Type::Blob => self.write_blob(&cursor.bytes_value()?),
            Type::Clob => self.write_clob(&cursor.bytes_value()?),
            Type::List | Type::SExp | Type::Struct => {
                self.step_in(ty)?;
                cursor.step_in()?;
                self.write_values(cursor)?;
                cursor.step_out()?;
                self.step_out()
            }
        }
    }

    /// Writes every remaining value at the cursor's current depth.
    ///
    /// # Errors
    ///
    /// Any read or write failure.
    fn write_values(&mut self, cursor: &mut dyn Cursor) -> Result<()> {
        while cursor.next()?.is_some() {
            self.write_value(cursor)?;
        }
        Ok(())
    }

    /// Writes a materialized element.
    ///
    /// # Errors
    ///
    /// Any write failure.
    fn write_element(&mut self, element: &Element) -> Result<()> {
        for annotation in element.annotations() {
            self.add_annotation(annotation.clone());
        }
        match element.value() {
            Value::Null(ty) => self.write_null(*ty),
            Value::Bool(b) => self.write_bool(*b),
            Value::Int(i) => self.write_int(i),
            Value::Float(f) => self.write_float(*f),
            Value::Decimal(d) => self.write_decimal(d),
            Value::Timestamp(t) => self.write_timestamp(t),
            Value::String(s) => self.write_string(s),
            Value::Symbol(s) => self.write_symbol(s.clone()),
            Value::Blob(b) => self.write_blob(b),
            Value::Clob(c) => self.write_clob(c),
            Value::List(children) | Value::SExp(children) => {
                self.step_in(element.value_type())?;
                for child in children {
                    self.write_element(child)?;
                }
                self.step_out()
            }
            Value::Struct(fields) => {
                self.step_in(Type::Struct)?;
                for (name, child) in fields.iter() {
                    self.set_field_name(name.clone())?;
                    self.write_element(child)?;
                }
                self.step_out()
            }
        }
    }
}

/// Bookkeeping shared by emitter implementations: staged field name and
/// annotations, plus the stack of open container types.
#[derive(Clone, Debug, Default)]
pub struct WriteState {
    containers: Vec<Type>,
    field_name: Option<SymbolToken>,
    annotations: Vec<SymbolToken>,
}

/// The staged parts of a value being written.
#[derive(Clone, Debug, Default)]
pub struct Pending {
    /// Field name, present exactly when the value is a struct field.
    pub field_name: Option<SymbolToken>,
    /// Annotations in order.
    pub annotations: Vec<SymbolToken>,
}

impl WriteState {
    /// Creates an empty state at depth 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a field name.
    ///
    /// # Errors
    ///
    /// `Structure` outside a struct.
    pub fn set_field_name(&mut self, name: SymbolToken) -> Result<()> {
        if !self.in_struct() {
            return Err(Error::structure("field name set outside a struct"));
        }
        self.field_name = Some(name);
        Ok(())
    }

    /// Stages an annotation.
    pub fn add_annotation(&mut self, annotation: SymbolToken) {
        self.annotations.push(annotation);
    }

    /// Takes the staged parts for a value about to be written.
    ///
    /// # Errors
    ///
    /// `Structure` inside a struct when no field name is staged.
    pub fn begin_value(&mut self) -> Result<Pending> {
        if self.in_struct() && self.field_name.is_none() {
            return Err(Error::structure("value written in a struct without a field name"));
        }
        Ok(Pending {
            field_name: self.field_name.take(),
            annotations: std::mem::take(&mut self.annotations),
        })
    }

    /// Opens a container after its header has been started.
    ///
    /// # Errors
    ///
    /// `Structure` if `ty` is not a container type or the value cannot
    /// begin here.
    pub fn push(&mut self, ty: Type) -> Result<Pending> {
        if !ty.is_container() {
            return Err(Error::structure(format!("cannot step into a {ty}")));
        }
        let pending = self.begin_value()?;
        self.containers.push(ty);
        Ok(pending)
    }

    /// Closes the innermost container.
    ///
    /// # Errors
    ///
    /// `Structure` at depth 0 or with staged parts left over.
    pub fn pop(&mut self) -> Result<Type> {
        if self.field_name.is_some() || !self.annotations.is_empty() {
            return Err(Error::structure("step_out with a staged field name or annotation"));
        }
        self.containers
            .pop()
            .ok_or_else(|| Error::structure("step_out at top level"))
    }

    /// Returns the number of open containers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.containers.len()
    }

    /// Returns the innermost open container type.
    #[must_use]
    pub fn container(&self) -> Option<Type> {
        self.containers.last().copied()
    }

    /// Returns true if the innermost open container is a struct.
    #[must_use]
    pub fn in_struct(&self) -> bool {
        self.container() == Some(Type::Struct)
    }
}
