//! Lexer for the text encoding.
//!
//! The lexer converts source text into a stream of tokens, skipping
//! whitespace and comments. Adjacent long strings are joined into one
//! token, and lobs are scanned whole so their contents never reach the
//! cursor as separate tokens.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ionflow_foundation::{Decimal, Error, ErrorContext, Int, Result, Timestamp, Type};

use crate::token::{
    Location, Token, TokenKind, is_identifier_char, is_identifier_start, is_operator_char,
};

const LONG_QUOTE: &str = "'''";

/// Lexer over text-encoded source.
#[derive(Clone, Debug)]
pub struct Lexer<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current position.
    location: Location,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            location: Location::at_start(),
        }
    }

    /// Returns the current position.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Returns the next token from the source.
    ///
    /// # Errors
    ///
    /// `MalformedInput` for text that forms no token, `UnexpectedEof` for a
    /// string, comment or lob cut short.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let start = self.location;
        let Some(c) = self.peek_char() else {
            return Ok(Token::new(TokenKind::Eof, start, start.offset));
        };
        let kind = match c {
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '}' => self.single(TokenKind::RBrace),
            ',' => self.single(TokenKind::Comma),
            '{' if self.rest.starts_with("{{") => self.scan_lob()?,
            '{' => self.single(TokenKind::LBrace),
            ':' if self.rest.starts_with("::") => {
                self.advance_by(2);
                TokenKind::DoubleColon
            }
            ':' => self.single(TokenKind::Colon),
            '"' => TokenKind::String(self.scan_short_string()?),
            '\'' if self.rest.starts_with(LONG_QUOTE) => {
                TokenKind::String(self.scan_long_strings()?)
            }
            '\'' => TokenKind::QuotedSymbol(self.scan_quoted_symbol()?),
            c if c.is_ascii_digit() => self.scan_numeric()?,
            '-' if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_numeric()?
            }
            '-' | '+' if self.at_infinity() => {
                self.advance_by(4);
                TokenKind::Float(if c == '-' {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                })
            }
            c if is_identifier_start(c) => self.scan_identifier()?,
            c if is_operator_char(c) => self.scan_operator(),
            c => return Err(self.error(format!("unexpected character: {c:?}"))),
        };
        Ok(Token::new(kind, start, self.location.offset))
    }

    /// Tokenizes all source, ending with an `Eof` token.
    ///
    /// # Errors
    ///
    /// The first lexical error in the source.
    pub fn tokenize_all(source: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::malformed(message, self.location.offset).with_context(
            ErrorContext::new()
                .with_position(self.location.line as usize, self.location.column as usize),
        )
    }

    fn eof(&self) -> Error {
        Error::unexpected_eof(self.location.offset)
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.rest = &self.rest[c.len_utf8()..];
        self.location.offset += c.len_utf16();
        if c == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn at_infinity(&self) -> bool {
        self.rest.get(1..4) == Some("inf")
            && !self.rest[4..].chars().next().is_some_and(is_identifier_char)
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek_char() {
                Some(c) if is_whitespace(c) => {
                    self.advance();
                }
                Some('/') if self.rest.starts_with("//") => {
                    while self.peek_char().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('/') if self.rest.starts_with("/*") => {
                    self.advance_by(2);
                    loop {
                        if self.rest.starts_with("*/") {
                            self.advance_by(2);
                            break;
                        }
                        if self.advance().is_none() {
                            return Err(self.eof());
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    /// Scans a word starting with a letter, `_` or `$`.
    fn scan_identifier(&mut self) -> Result<TokenKind> {
        let word = self.take_while(is_identifier_char);
        Ok(match word {
            "null" if self.peek_char() == Some('.') => {
                self.advance();
                let name = self.take_while(is_identifier_char);
                let ty = name
                    .parse::<Type>()
                    .map_err(|_| self.error(format!("unknown null type: null.{name}")))?;
                TokenKind::Null(ty)
            }
            "null" => TokenKind::Null(Type::Null),
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            "nan" => TokenKind::Float(f64::NAN),
            w => match w.strip_prefix('$') {
                Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                    let sid = digits
                        .parse()
                        .map_err(|_| self.error(format!("symbol id out of range: {w}")))?;
                    TokenKind::SymbolId(sid)
                }
                _ => TokenKind::Identifier(w.to_string()),
            },
        })
    }

    fn scan_operator(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            let comment = self.rest.starts_with("//") || self.rest.starts_with("/*");
            if !is_operator_char(c) || comment {
                break;
            }
            text.push(c);
            self.advance();
        }
        TokenKind::Operator(text)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let rest = self.rest;
        let len = rest.find(|c| !pred(c)).unwrap_or(rest.len());
        let word = &rest[..len];
        self.rest = &rest[len..];
        self.location.offset += word.encode_utf16().count();
        self.location.column += u32::try_from(word.chars().count()).unwrap_or(u32::MAX);
        word
    }

    /// Scans an int, float, decimal or timestamp.
    fn scan_numeric(&mut self) -> Result<TokenKind> {
        let start = self.location;
        let source = self.rest;
        let mut len = self.advance().map_or(0, char::len_utf8);
        len += self
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '+' | '-'))
            .len();
        classify_numeric(&source[..len]).map_err(|message| {
            Error::malformed(message, start.offset).with_context(
                ErrorContext::new().with_position(start.line as usize, start.column as usize),
            )
        })
    }

    /// Scans a `"..."` string.
    fn scan_short_string(&mut self) -> Result<String> {
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return Ok(text);
                }
                Some('\\') => self.scan_escape(&mut text)?,
                Some('\n') => return Err(self.error("unescaped newline in string")),
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => return Err(self.eof()),
            }
        }
    }

    /// Scans one or more `'''...'''` strings separated by trivia.
    fn scan_long_strings(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            self.scan_long_body(&mut text)?;
            let checkpoint = self.clone();
            self.skip_trivia()?;
            if !self.rest.starts_with(LONG_QUOTE) {
                *self = checkpoint;
                return Ok(text);
            }
        }
    }

    fn scan_long_body(&mut self, text: &mut String) -> Result<()> {
        self.advance_by(3);
        loop {
            if self.rest.starts_with(LONG_QUOTE) {
                self.advance_by(3);
                return Ok(());
            }
            match self.peek_char() {
                Some('\\') => self.scan_escape(text)?,
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => return Err(self.eof()),
            }
        }
    }

    /// Scans a `'...'` symbol.
    fn scan_quoted_symbol(&mut self) -> Result<String> {
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('\'') => {
                    self.advance();
                    return Ok(text);
                }
                Some('\\') => self.scan_escape(&mut text)?,
                Some('\n') => return Err(self.error("unescaped newline in quoted symbol")),
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => return Err(self.eof()),
            }
        }
    }

    /// Scans an escape sequence into `text`; an escaped newline adds nothing.
    fn scan_escape(&mut self, text: &mut String) -> Result<()> {
        let Some(code) = self.escape_code(true)? else {
            return Ok(());
        };
        if (0xD800..0xDC00).contains(&code) {
            // a high surrogate must be followed by an escaped low surrogate
            if !self.rest.starts_with("\\u") {
                return Err(self.error("unpaired surrogate escape"));
            }
            let low = self.escape_code(true)?.unwrap_or(0);
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error("unpaired surrogate escape"));
            }
            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
            text.push(char::from_u32(combined).ok_or_else(|| self.error("invalid escape"))?);
            return Ok(());
        }
        text.push(char::from_u32(code).ok_or_else(|| self.error("invalid escape"))?);
        Ok(())
    }

    /// Decodes the escape at a backslash into a code point.
    fn escape_code(&mut self, unicode: bool) -> Result<Option<u32>> {
        self.advance();
        let c = self.advance().ok_or_else(|| self.eof())?;
        let code = match c {
            'a' => 0x07,
            'b' => 0x08,
            't' => 0x09,
            'n' => 0x0A,
            'v' => 0x0B,
            'f' => 0x0C,
            'r' => 0x0D,
            '0' => 0x00,
            '"' | '\'' | '?' | '\\' | '/' => u32::from(c),
            'x' => self.hex_digits(2)?,
            'u' if unicode => self.hex_digits(4)?,
            'U' if unicode => self.hex_digits(8)?,
            '\n' => return Ok(None),
            '\r' => {
                if self.peek_char() == Some('\n') {
                    self.advance();
                }
                return Ok(None);
            }
            c => return Err(self.error(format!("invalid escape sequence: \\{c}"))),
        };
        Ok(Some(code))
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32> {
        let digits = self
            .rest
            .get(..count)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("invalid hex escape"))?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid hex escape"))?;
        self.advance_by(count);
        Ok(code)
    }

    /// Scans a `{{ ... }}` blob or clob.
    fn scan_lob(&mut self) -> Result<TokenKind> {
        self.advance_by(2);
        self.skip_whitespace();
        let kind = if self.rest.starts_with(LONG_QUOTE) {
            let mut bytes = Vec::new();
            while self.rest.starts_with(LONG_QUOTE) {
                self.advance_by(3);
                self.scan_clob_body(&mut bytes, Some(LONG_QUOTE))?;
                self.skip_whitespace();
            }
            TokenKind::Clob(bytes)
        } else if self.peek_char() == Some('"') {
            self.advance();
            let mut bytes = Vec::new();
            self.scan_clob_body(&mut bytes, None)?;
            self.skip_whitespace();
            TokenKind::Clob(bytes)
        } else {
            let mut encoded = String::new();
            while let Some(c) = self.peek_char() {
                if c == '}' {
                    break;
                }
                if c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=') {
                    encoded.push(c);
                } else if !is_whitespace(c) {
                    return Err(self.error(format!("invalid character in blob: {c:?}")));
                }
                self.advance();
            }
            let bytes = STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| self.error(format!("invalid base64: {e}")))?;
            TokenKind::Blob(bytes)
        };
        if !self.rest.starts_with("}}") {
            return Err(if self.rest.is_empty() {
                self.eof()
            } else {
                self.error("expected '}}' to close lob")
            });
        }
        self.advance_by(2);
        Ok(kind)
    }

    /// Scans clob text up to its closing quote; `long` selects `'''`.
    fn scan_clob_body(&mut self, bytes: &mut Vec<u8>, long: Option<&str>) -> Result<()> {
        loop {
            if let Some(close) = long {
                if self.rest.starts_with(close) {
                    self.advance_by(close.len());
                    return Ok(());
                }
            }
            match self.peek_char() {
                Some('"') if long.is_none() => {
                    self.advance();
                    return Ok(());
                }
                Some('\\') => {
                    if let Some(code) = self.escape_code(false)? {
                        let byte =
                            u8::try_from(code).map_err(|_| self.error("clob escape out of range"))?;
                        bytes.push(byte);
                    }
                }
                Some('\n') if long.is_none() => {
                    return Err(self.error("unescaped newline in clob"));
                }
                Some(c) if c.is_ascii() => {
                    self.advance();
                    bytes.push(c as u8);
                }
                Some(c) => return Err(self.error(format!("non-ASCII character in clob: {c:?}"))),
                None => return Err(self.eof()),
            }
        }
    }
}

/// Decides what kind of number a run of numeric text is.
fn classify_numeric(text: &str) -> std::result::Result<TokenKind, String> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, text),
    };
    let bytes = body.as_bytes();
    if !negative
        && bytes.len() > 4
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && matches!(bytes[4], b'-' | b'T')
    {
        return text
            .parse::<Timestamp>()
            .map(TokenKind::Timestamp)
            .map_err(|e| e.0);
    }
    let invalid = || format!("invalid number: {text}");
    if body.starts_with('_') || body.ends_with('_') || body.contains("__") {
        return Err(invalid());
    }
    let sign = if negative { "-" } else { "" };
    let radix = [("0x", 16), ("0X", 16), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| body.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix {
        if digits.starts_with('_') {
            return Err(invalid());
        }
        let digits: String = digits.chars().filter(|&c| c != '_').collect();
        return Int::from_str_radix(&format!("{sign}{digits}"), radix)
            .map(TokenKind::Int)
            .ok_or_else(invalid);
    }
    let cleaned: String = body.chars().filter(|&c| c != '_').collect();
    if cleaned.contains(['e', 'E']) {
        if !cleaned.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) {
            return Err(invalid());
        }
        return format!("{sign}{cleaned}")
            .parse::<f64>()
            .map(TokenKind::Float)
            .map_err(|_| invalid());
    }
    if cleaned.contains(['.', 'd', 'D']) {
        return text
            .parse::<Decimal>()
            .map(TokenKind::Decimal)
            .map_err(|_| invalid());
    }
    if cleaned.len() > 1 && cleaned.starts_with('0') {
        return Err(format!("leading zero in int: {text}"));
    }
    Int::from_str_radix(&format!("{sign}{cleaned}"), 10)
        .map(TokenKind::Int)
        .ok_or_else(invalid)
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}
