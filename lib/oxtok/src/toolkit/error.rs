use std::ops::Range;
use std::{fmt, io};

/// A position in a text i.e. a `line` number starting from 1 and a `column` number starting from 1 (in number of code points).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct TextPosition {
    pub line: u64,
    pub column: u64,
}

impl TextPosition {
    pub(crate) const START: Self = Self { line: 1, column: 1 };
}

impl Default for TextPosition {
    #[inline]
    fn default() -> Self {
        Self::START
    }
}

/// The kind of a [`TokenSyntaxError`].
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum TokenSyntaxErrorKind {
    /// A character that is not allowed at this point of the input.
    UnexpectedCharacter,
    /// The input ended in the middle of a token.
    UnexpectedEndOfInput,
    /// A raw new line inside a construct that does not allow it.
    UnexpectedNewLine,
    /// A sub-production returned a token of the wrong kind.
    UnexpectedToken,
    /// An invalid `\` or `%` escape sequence.
    InvalidEscape,
    /// A literal, name or tag whose content does not match its grammar.
    InvalidLiteral,
    /// Any other syntax violation.
    InvalidSyntax,
    /// Misuse of the one character backtracking facility.
    ///
    /// It signals a bug in a tokenizer and is never triggered by the input alone.
    Backtrack,
    /// The tokenizer has already failed and closed its input.
    Closed,
}

/// An error in the syntax of the tokenized input.
///
/// It is composed of a kind, a message and a position range in the input.
#[derive(Debug, thiserror::Error)]
pub struct TokenSyntaxError {
    kind: TokenSyntaxErrorKind,
    location: Range<TextPosition>,
    message: String,
}

impl TokenSyntaxError {
    pub(crate) fn new(
        kind: TokenSyntaxErrorKind,
        location: Range<TextPosition>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location,
            message: message.into(),
        }
    }

    /// The error returned by a tokenizer or a queue that already failed once.
    pub(crate) fn closed(format: &str, position: TextPosition) -> Self {
        Self::new(
            TokenSyntaxErrorKind::Closed,
            position..position,
            format!("The {format} tokenizer has been closed by a previous error"),
        )
    }

    /// The kind of error.
    #[inline]
    pub fn kind(&self) -> TokenSyntaxErrorKind {
        self.kind
    }

    /// The location of the error inside of the input.
    #[inline]
    pub fn location(&self) -> Range<TextPosition> {
        self.location.clone()
    }

    /// The error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TokenSyntaxError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.start == self.location.end {
            write!(
                f,
                "Syntax error at line {} column {}: {}",
                self.location.start.line, self.location.start.column, self.message
            )
        } else if self.location.start.line == self.location.end.line {
            write!(
                f,
                "Syntax error at line {} between columns {} and {}: {}",
                self.location.start.line,
                self.location.start.column,
                self.location.end.column,
                self.message
            )
        } else {
            write!(
                f,
                "Syntax error between line {} column {} and line {} column {}: {}",
                self.location.start.line,
                self.location.start.column,
                self.location.end.line,
                self.location.end.column,
                self.message
            )
        }
    }
}

impl From<TokenSyntaxError> for io::Error {
    #[inline]
    fn from(error: TokenSyntaxError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}

/// A tokenization error.
///
/// It is the union of [`TokenSyntaxError`] and [`io::Error`].
#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    /// I/O error while reading the input (file not found, invalid UTF-8...).
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error in the input syntax.
    #[error(transparent)]
    Syntax(#[from] TokenSyntaxError),
}

impl TokenizerError {
    /// The syntax error kind if this error is a syntax error.
    #[inline]
    pub fn syntax_kind(&self) -> Option<TokenSyntaxErrorKind> {
        match self {
            Self::Syntax(e) => Some(e.kind()),
            Self::Io(_) => None,
        }
    }
}

impl From<TokenizerError> for io::Error {
    #[inline]
    fn from(error: TokenizerError) -> Self {
        match error {
            TokenizerError::Syntax(e) => e.into(),
            TokenizerError::Io(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic_in_result_fn)]

    use super::*;

    fn position(line: u64, column: u64) -> TextPosition {
        TextPosition { line, column }
    }

    #[test]
    fn display_single_position() {
        let error = TokenSyntaxError::new(
            TokenSyntaxErrorKind::UnexpectedCharacter,
            position(3, 7)..position(3, 7),
            "Unexpected character '}'",
        );
        assert_eq!(
            error.to_string(),
            "Syntax error at line 3 column 7: Unexpected character '}'"
        );
    }

    #[test]
    fn display_ranges() {
        let same_line = TokenSyntaxError::new(
            TokenSyntaxErrorKind::UnexpectedEndOfInput,
            position(1, 1)..position(1, 22),
            "Unexpected end of input while trying to parse a URI",
        );
        assert_eq!(
            same_line.to_string(),
            "Syntax error at line 1 between columns 1 and 22: Unexpected end of input while trying to parse a URI"
        );
        let multi_line = TokenSyntaxError::new(
            TokenSyntaxErrorKind::UnexpectedEndOfInput,
            position(1, 5)..position(4, 2),
            "Unexpected end of input while trying to parse a long literal",
        );
        assert_eq!(
            multi_line.to_string(),
            "Syntax error between line 1 column 5 and line 4 column 2: Unexpected end of input while trying to parse a long literal"
        );
    }

    #[test]
    fn into_io_error() -> Result<(), Box<dyn std::error::Error>> {
        let error = TokenizerError::from(TokenSyntaxError::new(
            TokenSyntaxErrorKind::InvalidEscape,
            position(1, 2)..position(1, 2),
            "bad escape",
        ));
        assert_eq!(
            error.syntax_kind(),
            Some(TokenSyntaxErrorKind::InvalidEscape)
        );
        let io_error = io::Error::from(error);
        assert_eq!(io_error.kind(), io::ErrorKind::InvalidData);
        let inner = io_error
            .into_inner()
            .ok_or("the syntax error should be kept")?;
        assert!(inner.to_string().ends_with("bad escape"));
        Ok(())
    }
}
