//! Text codec for ionflow.
//!
//! This crate provides:
//! - [`Lexer`] and [`Token`] - Tokenization with UTF-16 positions
//! - [`TextCursor`] - A [`Cursor`](ionflow_stream::Cursor) over text
//! - [`TextEmitter`] - An [`Emitter`](ionflow_stream::Emitter) producing compact text

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cursor;
pub mod emitter;
pub mod lexer;
pub mod token;

pub use cursor::TextCursor;
pub use emitter::{TextEmitter, to_text};
pub use lexer::Lexer;
pub use token::{Location, Token, TokenKind};
