//! Loading element trees and converting between encodings.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ionflow_binary::{BinaryCursor, BinaryEmitter, is_binary};
use ionflow_foundation::{Element, Error, Result};
use ionflow_stream::{Cursor, DEFAULT_MAX_DEPTH, Emitter, ReaderConfig, TreeEmitter, WriterConfig};
use ionflow_symbols::{Catalog, EmptyCatalog};
use ionflow_text::{TextCursor, TextEmitter};
use tracing::debug;

/// Loads streams of either encoding into element trees.
///
/// Imports named by directives are resolved from the loader's catalog.
#[derive(Clone)]
pub struct Loader {
    catalog: Arc<dyn Catalog>,
    max_depth: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            catalog: Arc::new(EmptyCatalog),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl Loader {
    /// Creates a loader with an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Builder method to set the nesting limit of the cursors it opens.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the configuration used for every cursor this loader opens.
    #[must_use]
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig::with_catalog_of(Arc::clone(&self.catalog)).with_max_depth(self.max_depth)
    }

    /// Loads every top-level value, detecting the encoding.
    ///
    /// Input opening with the binary version marker is read as binary; any
    /// other input must be UTF-8 text.
    ///
    /// # Errors
    ///
    /// `MalformedInput` for text that is not UTF-8, or any decoding error.
    pub fn load(&self, bytes: &[u8]) -> Result<Vec<Element>> {
        let binary = is_binary(bytes);
        debug!(binary, len = bytes.len(), "detected encoding");
        if binary {
            Self::load_cursor(&mut BinaryCursor::with_config(bytes, self.reader_config()))
        } else {
            self.load_text(utf8(bytes)?)
        }
    }

    /// Loads every top-level value of a text stream.
    ///
    /// # Errors
    ///
    /// Any decoding error.
    pub fn load_text(&self, text: &str) -> Result<Vec<Element>> {
        Self::load_cursor(&mut TextCursor::with_config(text, self.reader_config()))
    }

    /// Loads every remaining value at the cursor's depth.
    ///
    /// # Errors
    ///
    /// Any decoding error.
    pub fn load_cursor(cursor: &mut dyn Cursor) -> Result<Vec<Element>> {
        let mut tree = TreeEmitter::new();
        tree.write_values(cursor)?;
        Ok(tree.into_elements())
    }

    /// Reads and loads a file of either encoding.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, or any decoding error.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Element>> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading file");
        self.load(&bytes)
    }

    /// Encodes elements as binary.
    ///
    /// # Errors
    ///
    /// `UnknownSymbolText` for a symbol with no text and no place in the
    /// output table.
    pub fn to_binary(elements: &[Element], config: &WriterConfig) -> Result<Vec<u8>> {
        ionflow_binary::to_bytes(elements, config.clone())
    }

    /// Encodes elements as text.
    ///
    /// # Errors
    ///
    /// Fails only on emitter misuse, which elements cannot cause.
    pub fn to_text(elements: &[Element], config: &WriterConfig) -> Result<String> {
        ionflow_text::to_text(elements, config.clone())
    }

    /// Writes elements to a file as binary, replacing any existing file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be written, or any encoding error.
    pub fn save_file<P: AsRef<Path>>(
        path: P,
        elements: &[Element],
        config: &WriterConfig,
    ) -> Result<()> {
        let bytes = Self::to_binary(elements, config)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// Returns the input as binary, transcoding only text input.
    ///
    /// # Errors
    ///
    /// Any decoding error in text input, or `UnknownSymbolText` for symbols
    /// the text left without text.
    pub fn ensure_binary<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        if is_binary(bytes) {
            return Ok(Cow::Borrowed(bytes));
        }
        debug!(len = bytes.len(), "transcoding text to binary");
        let mut cursor = TextCursor::with_config(utf8(bytes)?, self.reader_config());
        let mut emitter = BinaryEmitter::new(Vec::new());
        emitter.write_values(&mut cursor)?;
        Ok(Cow::Owned(emitter.finish()?))
    }

    /// Returns the input as text, transcoding only binary input.
    ///
    /// # Errors
    ///
    /// Any decoding error in binary input, or `MalformedInput` for text
    /// input that is not UTF-8.
    pub fn ensure_text<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        if !is_binary(bytes) {
            return utf8(bytes).map(Cow::Borrowed);
        }
        debug!(len = bytes.len(), "transcoding binary to text");
        let mut cursor = BinaryCursor::with_config(bytes, self.reader_config());
        let mut emitter = TextEmitter::new(Vec::new());
        emitter.write_values(&mut cursor)?;
        let text = String::from_utf8(emitter.finish()?)
            .map_err(|e| Error::malformed(e.to_string(), e.utf8_error().valid_up_to()))?;
        Ok(Cow::Owned(text))
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| Error::malformed(format!("text is not UTF-8: {e}"), e.valid_up_to()))
}
