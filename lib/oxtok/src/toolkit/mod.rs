//! oxtok tokenization toolkit.
//!
//! Provides the character level machinery shared by all the tokenizers: character sources, position tracking, escape decoding and lexical checks.

mod cursor;
mod error;
mod escape;
pub(crate) mod productions;
mod source;
pub(crate) mod terms;

pub(crate) use self::cursor::LexerState;
pub use self::error::{TextPosition, TokenSyntaxError, TokenSyntaxErrorKind, TokenizerError};
pub use self::escape::EscapeMode;
pub(crate) use self::escape::{
    handle_complex_local_name_escapes, handle_escapes, unescape_local_name,
};
pub use self::source::{CharSource, ReaderSource, StrSource};
