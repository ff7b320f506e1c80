//! Token types for the text encoding.
//!
//! Tokens are the output of the lexer and input to the text cursor.

use ionflow_foundation::{Decimal, Int, Timestamp, Type};

/// A position in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Location {
    /// Offset in UTF-16 code units.
    pub offset: usize,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number, counted in characters.
    pub column: u32,
}

impl Location {
    /// The start of the input.
    #[must_use]
    pub const fn at_start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Where the token starts.
    pub start: Location,
    /// Offset just past the token, in UTF-16 code units.
    pub end: usize,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, start: Location, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Returns the delimiter that closes the container this token opens.
    #[must_use]
    pub fn closing_delimiter(&self) -> Option<TokenKind> {
        match self.kind {
            TokenKind::LBracket => Some(TokenKind::RBracket),
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }

    /// Returns true if this token closes a container.
    #[must_use]
    pub const fn is_close_delimiter(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace
        )
    }
}

/// Token types of the text encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:` after a field name
    Colon,
    /// `::` after an annotation
    DoubleColon,

    // Literals
    /// `null` or `null.<type>`
    Null(Type),
    /// `true` or `false`
    Bool(bool),
    /// Integer in decimal, hex or binary notation
    Int(Int),
    /// Float, including `nan` and `±inf`
    Float(f64),
    /// Decimal
    Decimal(Decimal),
    /// Timestamp
    Timestamp(Timestamp),
    /// Short string, or adjacent long strings joined
    String(String),
    /// Unquoted symbol like `foo`
    Identifier(String),
    /// Quoted symbol like `'foo bar'`
    QuotedSymbol(String),
    /// Symbol by id like `$10`
    SymbolId(usize),
    /// Operator symbol like `+` or `<=`, valid in s-expressions
    Operator(String),
    /// `{{ base64 }}`
    Blob(Vec<u8>),
    /// `{{ "text" }}`
    Clob(Vec<u8>),

    /// End of input
    Eof,
}

impl TokenKind {
    /// Returns true for the symbol forms that may precede `::`.
    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(
            self,
            Self::Identifier(_) | Self::QuotedSymbol(_) | Self::SymbolId(_)
        )
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::DoubleColon => "'::'",
            Self::Null(_) => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Timestamp(_) => "timestamp",
            Self::String(_) => "string",
            Self::Identifier(_) => "identifier",
            Self::QuotedSymbol(_) => "quoted symbol",
            Self::SymbolId(_) => "symbol id",
            Self::Operator(_) => "operator",
            Self::Blob(_) => "blob",
            Self::Clob(_) => "clob",
            Self::Eof => "end of input",
        }
    }
}

/// Returns the version named by a version-marker symbol such as `$ion_1_0`.
#[must_use]
pub fn version_marker(text: &str) -> Option<(u8, u8)> {
    let rest = text.strip_prefix("$ion_")?;
    let (major, minor) = rest.split_once('_')?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(major) || !digits(minor) {
        return None;
    }
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// Returns true if `text` can be written as an unquoted symbol.
#[must_use]
pub fn is_plain_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !is_identifier_start(first) || !chars.all(is_identifier_char) {
        return false;
    }
    let sid_form = text
        .strip_prefix('$')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()));
    !sid_form && !is_keyword(text) && version_marker(text).is_none()
}

/// Returns true for words that are never read as symbols.
#[must_use]
pub fn is_keyword(text: &str) -> bool {
    matches!(text, "null" | "true" | "false" | "nan")
}

/// Returns true if `c` can start an unquoted symbol.
#[must_use]
pub const fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Returns true if `c` can continue an unquoted symbol.
#[must_use]
pub const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Returns true if `c` can appear in an operator symbol.
#[must_use]
pub const fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '!' | '#' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | ';' | '<' | '=' | '>' | '?' | '@'
            | '^' | '`' | '|' | '~'
    )
}
