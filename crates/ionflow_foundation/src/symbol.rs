//! Symbol tokens.
//!
//! A symbol is interned text identified by an integer id within a symbol
//! table. A token may know its text, its id, or both. A token with an id but
//! no text is a valid, distinct state: it arises when the table that declares
//! the id was imported from a catalog that did not have it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::Error;

/// A symbol reference: optional text plus optional symbol id.
///
/// Equality compares text when both tokens have text, and ids otherwise,
/// so text-equivalent tokens from independent tables compare equal.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymbolToken {
    text: Option<Arc<str>>,
    sid: Option<usize>,
}

impl SymbolToken {
    /// Creates a token that knows only its text.
    #[must_use]
    pub fn text(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: Some(text.into()),
            sid: None,
        }
    }

    /// Creates a token that knows only its id (unknown text).
    #[must_use]
    pub const fn sid(sid: usize) -> Self {
        Self {
            text: None,
            sid: Some(sid),
        }
    }

    /// Creates a token with both text and id.
    #[must_use]
    pub fn resolved(text: impl Into<Arc<str>>, sid: usize) -> Self {
        Self {
            text: Some(text.into()),
            sid: Some(sid),
        }
    }

    /// Creates a token from optional parts.
    #[must_use]
    pub const fn from_parts(text: Option<Arc<str>>, sid: Option<usize>) -> Self {
        Self { text, sid }
    }

    /// Returns the text, if known.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the shared text, if known.
    #[must_use]
    pub fn text_arc(&self) -> Option<&Arc<str>> {
        self.text.as_ref()
    }

    /// Returns the symbol id, if known.
    #[must_use]
    pub const fn local_sid(&self) -> Option<usize> {
        self.sid
    }

    /// Returns true if the text of this symbol is unknown.
    #[must_use]
    pub const fn is_unknown_text(&self) -> bool {
        self.text.is_none()
    }

    /// Returns the text, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSymbolText` when the token carries only an id.
    pub fn require_text(&self) -> Result<&str> {
        self.text
            .as_deref()
            .ok_or_else(|| Error::unknown_symbol_text(self.sid.unwrap_or(0)))
    }

    /// Returns a copy of this token with its id replaced.
    #[must_use]
    pub fn with_sid(&self, sid: Option<usize>) -> Self {
        Self {
            text: self.text.clone(),
            sid,
        }
    }
}

impl PartialEq for SymbolToken {
    fn eq(&self, other: &Self) -> bool {
        match (&self.text, &other.text) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.sid == other.sid,
            _ => false,
        }
    }
}

impl Eq for SymbolToken {}

impl Hash for SymbolToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.text {
            Some(text) => {
                0u8.hash(state);
                text.hash(state);
            }
            None => {
                1u8.hash(state);
                self.sid.hash(state);
            }
        }
    }
}

impl fmt::Display for SymbolToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.text, self.sid) {
            (Some(text), _) => f.write_str(text),
            (None, Some(sid)) => write!(f, "${sid}"),
            (None, None) => f.write_str("$0"),
        }
    }
}

impl From<&str> for SymbolToken {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for SymbolToken {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<Arc<str>> for SymbolToken {
    fn from(text: Arc<str>) -> Self {
        Self::text(text)
    }
}
