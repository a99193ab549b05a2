//! A [CSV](https://tools.ietf.org/html/rfc4180) tokenizer implemented by [`CsvTokenizer`].

use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::toolkit::productions::punctuation;
use crate::toolkit::{
    CharSource, LexerState, ReaderSource, StrSource, TokenSyntaxErrorKind, TokenizerError,
};
use std::io::Read;

/// A [CSV](https://tools.ietf.org/html/rfc4180) tokenizer as used by [SPARQL CSV results](https://www.w3.org/TR/sparql11-results-csv-tsv/).
///
/// Quoted fields are returned as [`TokenKind::Literal`] with `""` decoded to `"`, other fields as [`TokenKind::PlainLiteral`].
/// Each line break is a [`TokenKind::Eol`] token.
///
/// ```
/// use oxtok::{CsvTokenizer, TokenKind, Tokenizer};
///
/// let tokens = CsvTokenizer::for_str("x,y\r\nhttp://example.com/,\"a \"\"b\"\"\"\r\n")
///     .tokens()
///     .map(|t| t.map(|t| (t.kind(), t.into_value())))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(tokens[5], (TokenKind::PlainLiteral, "http://example.com/".into()));
/// assert_eq!(tokens[7], (TokenKind::Literal, "a \"b\"".into()));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct CsvTokenizer<S: CharSource> {
    state: LexerState<S>,
}

impl<'a> CsvTokenizer<StrSource<'a>> {
    /// Tokenizes a string slice.
    pub fn for_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<R: Read> CsvTokenizer<ReaderSource<R>> {
    /// Tokenizes a [`Read`] implementation.
    pub fn for_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

impl<S: CharSource> CsvTokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: LexerState::new(source, "CSV"),
        }
    }

    // escaped  ::=  DQUOTE *(TEXTDATA / COMMA / CR / LF / 2DQUOTE) DQUOTE
    fn quoted_field(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        loop {
            match self.state.peek()? {
                None => return Err(self.state.unexpected_end_of_input("a quoted field")),
                Some('"') => {
                    self.state.consume()?;
                    if !self.state.peek_is('"')? {
                        return Ok(self.state.emit_trimmed(TokenKind::Literal, 1, 1));
                    }
                    self.state.skip()?;
                }
                Some('\n' | '\r') => self.state.consume_new_line(true, false)?,
                Some(_) => {
                    self.state.consume()?;
                }
            }
        }
    }

    // non-escaped  ::=  *TEXTDATA
    fn field(&mut self) -> Result<Token, TokenizerError> {
        loop {
            match self.state.peek()? {
                None | Some(',' | '\n' | '\r') => {
                    return Ok(self.state.emit_value(TokenKind::PlainLiteral));
                }
                Some('"') => {
                    return Err(self.state.error(
                        TokenSyntaxErrorKind::UnexpectedCharacter,
                        "Unexpected '\"' inside a field, fields containing quotes must be quoted",
                    ));
                }
                Some(_) => {
                    self.state.consume()?;
                }
            }
        }
    }
}

impl<S: CharSource> Tokenizer for CsvTokenizer<S> {
    fn next_token(&mut self) -> Result<Token, TokenizerError> {
        if let Some(bof) = self.state.enter()? {
            return Ok(bof);
        }
        let after_quoted_field = self.state.last_token_is(TokenKind::Literal);
        match self.state.peek()? {
            None => Ok(self.state.emit_eof()),
            Some(',') => punctuation(&mut self.state, TokenKind::Comma),
            Some('\n' | '\r') => {
                self.state.consume_new_line(false, false)?;
                Ok(self.state.emit_value(TokenKind::Eol))
            }
            Some(c) if after_quoted_field => Err(self
                .state
                .unexpected_character(c, "',' or a new line after a quoted field")),
            Some('"') => self.quoted_field(),
            Some(_) => self.field(),
        }
    }

    #[inline]
    fn last_token_kind(&self) -> Option<TokenKind> {
        self.state.last_token_kind()
    }

    #[inline]
    fn format(&self) -> &'static str {
        self.state.format()
    }
}
