//! The value model.
//!
//! An [`Element`] is a [`Value`] plus its annotations. Containers own their
//! children outright; struct children are paired with their field names.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::Sequence;
use crate::decimal::Decimal;
use crate::int::Int;
use crate::symbol::SymbolToken;
use crate::timestamp::Timestamp;
use crate::types::Type;

/// A value without annotations.
///
/// Values are immutable and cheaply cloneable: text and lobs are shared,
/// containers use persistent sequences.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// A typed null; `Null(Type::Null)` is the untyped `null`.
    Null(Type),
    /// Boolean value.
    Bool(bool),
    /// Integer of arbitrary size.
    Int(Int),
    /// 64-bit floating point.
    Float(f64),
    /// Decimal with explicit precision.
    Decimal(Decimal),
    /// Timestamp.
    Timestamp(Timestamp),
    /// Unicode string.
    String(Arc<str>),
    /// Symbol reference.
    Symbol(SymbolToken),
    /// Binary large object.
    Blob(Arc<[u8]>),
    /// Character large object.
    Clob(Arc<[u8]>),
    /// Ordered list.
    List(Sequence<Element>),
    /// Ordered s-expression.
    SExp(Sequence<Element>),
    /// Struct fields in insertion order; duplicate names are allowed.
    Struct(Struct),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn value_type(&self) -> Type {
        match self {
            Self::Null(ty) => *ty,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::Decimal(_) => Type::Decimal,
            Self::Timestamp(_) => Type::Timestamp,
            Self::String(_) => Type::String,
            Self::Symbol(_) => Type::Symbol,
            Self::Blob(_) => Type::Blob,
            Self::Clob(_) => Type::Clob,
            Self::List(_) => Type::List,
            Self::SExp(_) => Type::SExp,
            Self::Struct(_) => Type::Struct,
        }
    }

    /// Returns true for every typed null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Attempts to extract a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<&Int> {
        match self {
            Self::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Attempts to extract an integer that fits `i64`.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Attempts to extract a float.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Self::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Attempts to extract a timestamp.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Self::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    /// Attempts to extract string text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a symbol.
    #[must_use]
    pub const fn as_symbol(&self) -> Option<&SymbolToken> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract blob or clob bytes.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) | Self::Clob(b) => Some(b),
            _ => None,
        }
    }

    /// Attempts to extract list or s-expression children.
    #[must_use]
    pub const fn as_sequence(&self) -> Option<&Sequence<Element>> {
        match self {
            Self::List(s) | Self::SExp(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract struct fields.
    #[must_use]
    pub const fn as_struct(&self) -> Option<&Struct> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so NaN equals itself and -0e0 differs from 0e0.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null(a), Self::Null(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) | (Self::Clob(a), Self::Clob(b)) => a == b,
            (Self::List(a), Self::List(b)) | (Self::SExp(a), Self::SExp(b)) => a == b,
            (Self::Struct(a), Self::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(Int::I64(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(Int::I64(i64::from(n)))
    }
}

impl From<Int> for Value {
    fn from(n: Int) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Self::Timestamp(t)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<SymbolToken> for Value {
    fn from(s: SymbolToken) -> Self {
        Self::Symbol(s)
    }
}

impl From<Struct> for Value {
    fn from(s: Struct) -> Self {
        Self::Struct(s)
    }
}

/// Struct fields.
///
/// Iteration follows insertion order. Equality ignores order: two structs
/// are equal when their (name, value) pairs are equal as multisets.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Struct {
    fields: Sequence<(SymbolToken, Element)>,
}

impl Struct {
    /// Creates an empty struct.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field in place.
    pub fn push(&mut self, name: impl Into<SymbolToken>, value: impl Into<Element>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Builder-style variant of [`Struct::push`].
    #[must_use]
    pub fn with(mut self, name: impl Into<SymbolToken>, value: impl Into<Element>) -> Self {
        self.push(name, value);
        self
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the first field with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_text() == Some(name))
            .map(|(_, v)| v)
    }

    /// Returns every field with the given name, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.fields
            .iter()
            .filter(move |(n, _)| n.as_text() == Some(name))
            .map(|(_, v)| v)
    }

    /// Returns the field at the given position.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<(&SymbolToken, &Element)> {
        self.fields.get(index).map(|(n, v)| (n, v))
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SymbolToken, &Element)> {
        self.fields.iter().map(|(n, v)| (n, v))
    }
}

impl PartialEq for Struct {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut used = vec![false; other.len()];
        'outer: for field in self.fields.iter() {
            for (i, candidate) in other.fields.iter().enumerate() {
                if !used[i] && field == candidate {
                    used[i] = true;
                    continue 'outer;
                }
            }
            return false;
        }
        true
    }
}

impl Eq for Struct {}

impl<N: Into<SymbolToken>, V: Into<Element>> FromIterator<(N, V)> for Struct {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut s = Self::new();
        for (name, value) in iter {
            s.push(name, value);
        }
        s
    }
}

/// A value with its annotations.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    annotations: Vec<SymbolToken>,
    value: Value,
}

impl Element {
    /// Creates an element with no annotations.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            annotations: Vec::new(),
            value: value.into(),
        }
    }

    /// Creates a typed null.
    #[must_use]
    pub fn null(ty: Type) -> Self {
        Self::new(Value::Null(ty))
    }

    /// Creates a symbol value.
    #[must_use]
    pub fn symbol(token: impl Into<SymbolToken>) -> Self {
        Self::new(Value::Symbol(token.into()))
    }

    /// Creates a blob.
    #[must_use]
    pub fn blob(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(Value::Blob(bytes.into()))
    }

    /// Creates a clob.
    #[must_use]
    pub fn clob(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(Value::Clob(bytes.into()))
    }

    /// Creates a list.
    #[must_use]
    pub fn list(children: impl IntoIterator<Item = Element>) -> Self {
        Self::new(Value::List(children.into_iter().collect()))
    }

    /// Creates an s-expression.
    #[must_use]
    pub fn sexp(children: impl IntoIterator<Item = Element>) -> Self {
        Self::new(Value::SExp(children.into_iter().collect()))
    }

    /// Replaces the annotations.
    #[must_use]
    pub fn with_annotations<A: Into<SymbolToken>>(
        mut self,
        annotations: impl IntoIterator<Item = A>,
    ) -> Self {
        self.annotations = annotations.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the annotations in order.
    #[must_use]
    pub fn annotations(&self) -> &[SymbolToken] {
        &self.annotations
    }

    /// Returns the value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the kind of the value.
    #[must_use]
    pub const fn value_type(&self) -> Type {
        self.value.value_type()
    }

    /// Returns true if the value is a typed null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Splits into annotations and value.
    #[must_use]
    pub fn into_parts(self) -> (Vec<SymbolToken>, Value) {
        (self.annotations, self.value)
    }
}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

macro_rules! element_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Self::new(Value::from(value))
                }
            }
        )*
    };
}

element_from!(bool, i32, i64, Int, f64, Decimal, Timestamp, &str, String, SymbolToken, Struct);
