//! Error types for the ionflow system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// The main error type for ionflow operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" {c}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a malformed input error at the given source offset.
    #[must_use]
    pub fn malformed(message: impl Into<String>, offset: usize) -> Self {
        Self::new(ErrorKind::MalformedInput {
            message: message.into(),
            offset,
        })
    }

    /// Creates an error for input that ends in the middle of a value.
    #[must_use]
    pub fn unexpected_eof(offset: usize) -> Self {
        Self::new(ErrorKind::UnexpectedEof { offset })
    }

    /// Creates a cursor misuse error.
    #[must_use]
    pub fn cursor_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CursorState(message.into()))
    }

    /// Creates an emitter misuse error.
    #[must_use]
    pub fn structure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structure(message.into()))
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Option<Type>) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an error for a materializer with no sentinel called on a null.
    #[must_use]
    pub fn null_value(ty: Type) -> Self {
        Self::new(ErrorKind::NullValue(ty))
    }

    /// Creates an error for a symbol whose text was demanded but is unknown.
    #[must_use]
    pub fn unknown_symbol_text(sid: usize) -> Self {
        Self::new(ErrorKind::UnknownSymbolText { sid })
    }

    /// Creates an unsupported format version error.
    #[must_use]
    pub fn unsupported_version(major: u8, minor: u8) -> Self {
        Self::new(ErrorKind::UnsupportedVersion { major, minor })
    }

    /// Returns the source offset recorded by this error, if any.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match &self.kind {
            ErrorKind::MalformedInput { offset, .. } | ErrorKind::UnexpectedEof { offset } => {
                Some(*offset)
            }
            _ => self.context.as_ref().and_then(|c| c.offset),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Bytes or characters do not form a valid value.
    #[error("malformed input at offset {offset}: {message}")]
    MalformedInput {
        /// Description of what was wrong.
        message: String,
        /// Offset in source-native units.
        offset: usize,
    },

    /// The source ended before the current value was complete.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof {
        /// Offset in source-native units.
        offset: usize,
    },

    /// A cursor operation was invoked in a state that does not allow it.
    #[error("invalid cursor state: {0}")]
    CursorState(String),

    /// An emitter operation was invoked out of order.
    #[error("invalid write structure: {0}")]
    Structure(String),

    /// A materializer was invoked against the wrong value type.
    #[error("type mismatch: expected {expected}, got {}", .actual.map_or_else(|| "no value".to_string(), |t| t.to_string()))]
    TypeMismatch {
        /// The type the accessor reads.
        expected: Type,
        /// The type of the current value, if there is one.
        actual: Option<Type>,
    },

    /// A materializer without a safe sentinel was invoked on a typed null.
    #[error("value is null.{0}")]
    NullValue(Type),

    /// A numeric value does not fit the requested representation.
    #[error("numeric overflow: {0}")]
    NumericOverflow(String),

    /// Symbol text was required but the symbol id has no known text.
    #[error("symbol ${sid} has unknown text")]
    UnknownSymbolText {
        /// The symbol id without text.
        sid: usize,
    },

    /// An import without a declared `max_id` could not be resolved.
    #[error("cannot resolve import {name} version {version} without max_id")]
    UnresolvableImport {
        /// Shared table name.
        name: String,
        /// Requested version.
        version: u32,
    },

    /// The binary version marker names a version this library does not read.
    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion {
        /// Major version from the marker.
        major: u8,
        /// Minor version from the marker.
        minor: u8,
    },

    /// Container nesting exceeded the configured limit.
    #[error("container nesting exceeds limit of {limit}")]
    DepthLimit {
        /// The configured limit.
        limit: usize,
    },

    /// The underlying sink or source failed.
    #[error("i/o error: {0}")]
    Io(std::io::Error),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Offset in source-native units.
    pub offset: Option<usize>,
    /// Line number in text sources (1-based).
    pub line: Option<usize>,
    /// Column number in text sources (1-based).
    pub column: Option<usize>,
    /// Descriptions of the enclosing containers, outermost first.
    pub path: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source offset.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds an enclosing container.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.path.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column, self.offset) {
            (Some(line), Some(col), _) => write!(f, "at {line}:{col}")?,
            (_, _, Some(offset)) => write!(f, "at offset {offset}")?,
            _ => {}
        }
        if !self.path.is_empty() {
            write!(f, " in {}", self.path.join(" > "))?;
        }
        Ok(())
    }
}
