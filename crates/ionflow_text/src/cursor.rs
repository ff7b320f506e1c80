//! Cursor over text-encoded streams.
//!
//! The cursor pulls tokens from the [`Lexer`] on demand. Scalars are decoded
//! when the cursor reaches them; containers are entered lazily, and a
//! container that is passed over is skipped by balancing its delimiters.

use std::sync::Arc;

use ionflow_foundation::{
    Decimal, Error, ErrorContext, Int, OffsetUnit, Result, Span, SymbolToken, Timestamp, Type,
    Value,
};
use ionflow_stream::cursor::{check_step_in, check_type, require_lob, require_value};
use ionflow_stream::{Cursor, ReaderConfig, is_directive, read_directive};
use ionflow_symbols::{EncodingContext, SymbolTable, SymbolTableDirective};
use tracing::trace;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind, version_marker};

#[derive(Clone, Copy, Debug)]
struct Frame {
    ty: Type,
    /// The closing delimiter has been consumed.
    closed: bool,
    /// A value was read, so a `,` or the close must come next.
    after_value: bool,
}

#[derive(Clone, Debug)]
struct Current {
    ty: Type,
    /// Decoded scalar or typed null; `None` for a container not yet entered.
    value: Option<Value>,
    start: usize,
    finish: Option<usize>,
    field_name: Option<SymbolToken>,
    annotations: Vec<SymbolToken>,
}

fn closing_delimiter(ty: Type) -> TokenKind {
    match ty {
        Type::List => TokenKind::RBracket,
        Type::SExp => TokenKind::RParen,
        _ => TokenKind::RBrace,
    }
}

impl Current {
    fn is_null(&self) -> bool {
        matches!(self.value, Some(Value::Null(_)))
    }

    fn is_open_container(&self) -> bool {
        self.ty.is_container() && self.value.is_none()
    }
}

/// A cursor over a text stream.
///
/// Spans are measured in UTF-16 code units. Scalars have a known finish;
/// containers report an open finish since their end is not known until
/// they are read through.
#[derive(Debug)]
pub struct TextCursor<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
    containers: Vec<Frame>,
    current: Option<Current>,
    context: EncodingContext,
    config: ReaderConfig,
    pending: Option<(SymbolTableDirective, usize)>,
}

impl<'a> TextCursor<'a> {
    /// Creates a cursor with the default configuration.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Creates a cursor with the given configuration.
    #[must_use]
    pub fn with_config(source: &'a str, config: ReaderConfig) -> Self {
        Self {
            lexer: Lexer::new(source),
            peeked: None,
            containers: Vec::new(),
            current: None,
            context: EncodingContext::new(config.catalog.clone())
                .with_max_symbol_id(config.max_symbol_id),
            config,
            pending: None,
        }
    }

    /// Returns the encoding context in effect.
    #[must_use]
    pub fn context(&self) -> &EncodingContext {
        &self.context
    }

    fn next_token(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn peek_token(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        self.peeked
            .as_ref()
            .ok_or_else(|| Error::cursor_state("no token"))
    }

    fn unexpected(&self, token: &Token) -> Error {
        let context = ErrorContext::new()
            .with_position(token.start.line as usize, token.start.column as usize);
        let context = self
            .containers
            .iter()
            .fold(context, |c, frame| c.with_frame(frame.ty.name()));
        if token.kind == TokenKind::Eof {
            return Error::unexpected_eof(token.start.offset).with_context(context);
        }
        Error::malformed(format!("unexpected {}", token.kind.name()), token.start.offset)
            .with_context(context)
    }

    fn symbol(&self, kind: &TokenKind) -> Option<SymbolToken> {
        match kind {
            TokenKind::Identifier(text) | TokenKind::QuotedSymbol(text) => {
                Some(SymbolToken::text(text.as_str()))
            }
            TokenKind::SymbolId(sid) => Some(self.context.resolve(*sid)),
            _ => None,
        }
    }

    /// Consumes tokens through the close of a container of type `ty` whose
    /// open delimiter has already been read. Every nested close must match
    /// its open.
    fn skip_container(&mut self, ty: Type) -> Result<()> {
        let mut expected = vec![closing_delimiter(ty)];
        while let Some(close) = expected.last() {
            let token = self.next_token()?;
            if token.kind == *close {
                expected.pop();
            } else if let Some(nested) = token.closing_delimiter() {
                expected.push(nested);
            } else if token.is_close_delimiter() || token.kind == TokenKind::Eof {
                return Err(self.unexpected(&token));
            }
        }
        Ok(())
    }

    /// Reads the token that starts the next value, handling separators
    /// and closes. `None` means the current container or stream ended.
    fn value_start(&mut self) -> Result<Option<Token>> {
        let Some(frame) = self.containers.last().copied() else {
            let token = self.next_token()?;
            return Ok((token.kind != TokenKind::Eof).then_some(token));
        };
        let close = closing_delimiter(frame.ty);
        let mut token = self.next_token()?;
        if frame.after_value && frame.ty != Type::SExp && token.kind != close {
            if token.kind != TokenKind::Comma {
                return Err(self.unexpected(&token));
            }
            token = self.next_token()?;
        }
        if token.kind == close {
            if let Some(frame) = self.containers.last_mut() {
                frame.closed = true;
            }
            return Ok(None);
        }
        Ok(Some(token))
    }

    fn read_field_name(&mut self, token: &Token) -> Result<SymbolToken> {
        let name = match &token.kind {
            TokenKind::String(text) => SymbolToken::text(text.as_str()),
            kind => self.symbol(kind).ok_or_else(|| self.unexpected(token))?,
        };
        let colon = self.next_token()?;
        if colon.kind != TokenKind::Colon {
            return Err(self.unexpected(&colon));
        }
        Ok(name)
    }

    fn read_value(
        &mut self,
        token: Token,
        start: usize,
        field_name: Option<SymbolToken>,
        annotations: Vec<SymbolToken>,
    ) -> Result<Current> {
        let in_sexp = self.containers.last().is_some_and(|f| f.ty == Type::SExp);
        let (ty, value) = match token.kind {
            TokenKind::LBracket => (Type::List, None),
            TokenKind::LParen => (Type::SExp, None),
            TokenKind::LBrace => (Type::Struct, None),
            TokenKind::Null(ty) => (ty, Some(Value::Null(ty))),
            TokenKind::Bool(b) => (Type::Bool, Some(Value::Bool(b))),
            TokenKind::Int(i) => (Type::Int, Some(Value::Int(i))),
            TokenKind::Float(f) => (Type::Float, Some(Value::Float(f))),
            TokenKind::Decimal(d) => (Type::Decimal, Some(Value::Decimal(d))),
            TokenKind::Timestamp(t) => (Type::Timestamp, Some(Value::Timestamp(t))),
            TokenKind::String(s) => (Type::String, Some(Value::String(s.into()))),
            TokenKind::Blob(b) => (Type::Blob, Some(Value::Blob(b.into()))),
            TokenKind::Clob(b) => (Type::Clob, Some(Value::Clob(b.into()))),
            TokenKind::Operator(op) if in_sexp => {
                (Type::Symbol, Some(Value::Symbol(SymbolToken::text(op))))
            }
            ref kind if kind.is_symbol() => {
                let symbol = self.symbol(kind).ok_or_else(|| self.unexpected(&token))?;
                (Type::Symbol, Some(Value::Symbol(symbol)))
            }
            _ => return Err(self.unexpected(&token)),
        };
        let finish = value.is_some().then_some(token.end);
        Ok(Current {
            ty,
            value,
            start,
            finish,
            field_name,
            annotations,
        })
    }

    /// Decodes a directive struct without disturbing the cursor position.
    fn peek_directive(&mut self) -> Result<SymbolTableDirective> {
        let lexer = self.lexer.clone();
        let peeked = self.peeked.clone();
        let current = self.current.clone();
        let directive = read_directive(self)?;
        self.lexer = lexer;
        self.peeked = peeked;
        self.current = current;
        Ok(directive)
    }

    fn scalar(&self) -> Option<&Value> {
        self.current.as_ref().and_then(|c| c.value.as_ref())
    }

    fn mismatch(&self, expected: Type) -> Error {
        Error::type_mismatch(expected, self.current_type())
    }
}

impl Cursor for TextCursor<'_> {
    fn next(&mut self) -> Result<Option<Type>> {
        if self.containers.is_empty() {
            if let Some((directive, offset)) = self.pending.take() {
                self.context.apply(&directive, offset)?;
            }
        }
        if let Some(current) = self.current.take() {
            if current.is_open_container() {
                self.skip_container(current.ty)?;
            }
        }
        loop {
            if self.containers.last().is_some_and(|f| f.closed) {
                return Ok(None);
            }
            let Some(mut token) = self.value_start()? else {
                return Ok(None);
            };
            let in_struct = self.containers.last().is_some_and(|f| f.ty == Type::Struct);
            let field_name = if in_struct {
                let name = self.read_field_name(&token)?;
                token = self.next_token()?;
                Some(name)
            } else {
                None
            };
            let start = token.start.offset;
            let mut annotations = Vec::new();
            while token.kind.is_symbol() && self.peek_token()?.kind == TokenKind::DoubleColon {
                annotations.push(self.symbol(&token.kind).ok_or_else(|| self.unexpected(&token))?);
                self.next_token()?;
                token = self.next_token()?;
            }
            if !annotations.is_empty() && token.kind == TokenKind::Eof {
                return Err(self.unexpected(&token));
            }
            if let Some(frame) = self.containers.last_mut() {
                frame.after_value = true;
            } else if annotations.is_empty() {
                if let TokenKind::Identifier(text) = &token.kind {
                    match version_marker(text) {
                        Some((1, 0)) => {
                            self.context.reset(start);
                            continue;
                        }
                        Some((major, minor)) => {
                            return Err(Error::unsupported_version(major, minor));
                        }
                        None => {}
                    }
                }
            }
            let current = self.read_value(token, start, field_name, annotations)?;
            let directive = self.containers.is_empty()
                && is_directive(current.ty, current.is_null(), &current.annotations);
            self.current = Some(current);
            if directive {
                if self.config.surface_directives {
                    let decoded = self.peek_directive()?;
                    self.pending = Some((decoded, start));
                } else {
                    let decoded = read_directive(self)?;
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
        self.current.as_ref().is_some_and(Current::is_null)
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
        self.current = None;
        self.containers.push(Frame {
            ty,
            closed: false,
            after_value: false,
        });
        Ok(())
    }

    fn step_out(&mut self) -> Result<()> {
        let frame = self
            .containers
            .last()
            .copied()
            .ok_or_else(|| Error::cursor_state("step_out at top level"))?;
        if let Some(current) = self.current.take() {
            if current.is_open_container() {
                self.skip_container(current.ty)?;
            }
        }
        if !frame.closed {
            trace!(depth = self.containers.len(), "skipping rest of container");
            self.skip_container(frame.ty)?;
        }
        self.containers.pop();
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
        match self.scalar() {
            Some(Value::Bool(b)) => Ok(*b),
            _ => Err(self.mismatch(Type::Bool)),
        }
    }

    fn int_value(&self) -> Result<Int> {
        if check_type(self.current_type(), self.is_null(), Type::Int)? {
            return Ok(Int::default());
        }
        match self.scalar() {
            Some(Value::Int(i)) => Ok(i.clone()),
            _ => Err(self.mismatch(Type::Int)),
        }
    }

    fn float_value(&self) -> Result<f64> {
        if check_type(self.current_type(), self.is_null(), Type::Float)? {
            return Ok(0.0);
        }
        match self.scalar() {
            Some(Value::Float(f)) => Ok(*f),
            _ => Err(self.mismatch(Type::Float)),
        }
    }

    fn decimal_value(&self) -> Result<Decimal> {
        if check_type(self.current_type(), self.is_null(), Type::Decimal)? {
            return Ok(Decimal::default());
        }
        match self.scalar() {
            Some(Value::Decimal(d)) => Ok(d.clone()),
            _ => Err(self.mismatch(Type::Decimal)),
        }
    }

    fn timestamp_value(&self) -> Result<Timestamp> {
        require_value(self.current_type(), self.is_null(), Type::Timestamp)?;
        match self.scalar() {
            Some(Value::Timestamp(t)) => Ok(t.clone()),
            _ => Err(self.mismatch(Type::Timestamp)),
        }
    }

    fn string_value(&self) -> Result<String> {
        require_value(self.current_type(), self.is_null(), Type::String)?;
        match self.scalar() {
            Some(Value::String(s)) => Ok(s.to_string()),
            _ => Err(self.mismatch(Type::String)),
        }
    }

    fn symbol_value(&self) -> Result<SymbolToken> {
        require_value(self.current_type(), self.is_null(), Type::Symbol)?;
        match self.scalar() {
            Some(Value::Symbol(s)) => Ok(s.clone()),
            _ => Err(self.mismatch(Type::Symbol)),
        }
    }

    fn bytes_value(&self) -> Result<Vec<u8>> {
        let ty = require_lob(self.current_type(), self.is_null())?;
        match self.scalar() {
            Some(Value::Blob(b) | Value::Clob(b)) => Ok(b.to_vec()),
            _ => Err(self.mismatch(ty)),
        }
    }

    fn current_span(&self) -> Option<Span> {
        self.current.as_ref().map(|c| Span {
            start: c.start,
            finish: c.finish,
            unit: OffsetUnit::Utf16CodeUnits,
        })
    }

    fn symbol_table(&self) -> Arc<SymbolTable> {
        self.context.snapshot()
    }
}
