//! A [SPARQL TSV results](https://www.w3.org/TR/sparql11-results-csv-tsv/) tokenizer implemented by [`TsvTokenizer`].

use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::toolkit::productions::{
    LongLiterals, UriWhiteSpace, lang_spec, punctuation, quoted_literal, uri,
};
use crate::toolkit::terms::{is_plain_literal, is_valid_blank_node, is_valid_var_name};
use crate::toolkit::{
    CharSource, EscapeMode, LexerState, ReaderSource, StrSource, TokenSyntaxErrorKind,
    TokenizerError,
};
use std::io::Read;

/// A [SPARQL TSV results](https://www.w3.org/TR/sparql11-results-csv-tsv/) tokenizer.
///
/// Fields are RDF terms in their Turtle encoding separated by [`TokenKind::Tab`] tokens, the header row is made of variables.
///
/// ```
/// use oxtok::{TokenKind, Tokenizer, TsvTokenizer};
///
/// let kinds = TsvTokenizer::for_str("?s\t?o\n<http://example.com/>\t\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>\n")
///     .tokens()
///     .map(|t| t.map(|t| t.kind()))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Bof,
///         TokenKind::Variable,
///         TokenKind::Tab,
///         TokenKind::Variable,
///         TokenKind::Eol,
///         TokenKind::Uri,
///         TokenKind::Tab,
///         TokenKind::Literal,
///         TokenKind::HatHat,
///         TokenKind::Uri,
///         TokenKind::Eol,
///         TokenKind::Eof
///     ]
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct TsvTokenizer<S: CharSource> {
    state: LexerState<S>,
}

impl<'a> TsvTokenizer<StrSource<'a>> {
    /// Tokenizes a string slice.
    pub fn for_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<R: Read> TsvTokenizer<ReaderSource<R>> {
    /// Tokenizes a [`Read`] implementation.
    pub fn for_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

impl<S: CharSource> TsvTokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: LexerState::new(source, "TSV"),
        }
    }

    fn next_main_token(&mut self) -> Result<Token, TokenizerError> {
        loop {
            let Some(c) = self.state.peek()? else {
                return self.state.eof_or_fail("a field");
            };
            return match c {
                '\t' => punctuation(&mut self.state, TokenKind::Tab),
                '\n' | '\r' => {
                    self.state.consume_new_line(false, false)?;
                    Ok(self.state.emit_value(TokenKind::Eol))
                }
                c if c.is_whitespace() => {
                    self.state.skip()?;
                    self.state.start_new_token();
                    continue;
                }
                '<' => uri(&mut self.state, EscapeMode::Uri, UriWhiteSpace::Forbidden),
                '"' => quoted_literal(
                    &mut self.state,
                    '"',
                    EscapeMode::QuotedLiterals,
                    LongLiterals::Forbidden,
                ),
                '\'' => quoted_literal(
                    &mut self.state,
                    '\'',
                    EscapeMode::QuotedLiteralsAlternate,
                    LongLiterals::Forbidden,
                ),
                '@' => {
                    if !self.state.last_token_is(TokenKind::Literal) {
                        return Err(self.state.error(
                            TokenSyntaxErrorKind::UnexpectedCharacter,
                            "Unexpected '@', a language specifier may only follow a literal",
                        ));
                    }
                    self.state.skip()?;
                    self.state.start_new_token();
                    lang_spec(&mut self.state, true)
                }
                '^' => self.hat_hat(),
                '_' => self.blank_node(),
                '?' | '$' => self.variable(),
                _ => self.plain_literal(),
            };
        }
    }

    fn hat_hat(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        match self.state.peek()? {
            Some('^') => (),
            Some(c) => return Err(self.state.unexpected_character(c, "'^' to form '^^'")),
            None => return Err(self.state.unexpected_end_of_input("a '^^' datatype marker")),
        }
        if !self.state.last_token_is(TokenKind::Literal) {
            return Err(self.state.error(
                TokenSyntaxErrorKind::InvalidSyntax,
                "Unexpected '^^', a datatype may only follow a literal",
            ));
        }
        punctuation(&mut self.state, TokenKind::HatHat)
    }

    fn datatype(&mut self) -> Result<Token, TokenizerError> {
        match self.state.peek()? {
            Some('<') => uri(&mut self.state, EscapeMode::Uri, UriWhiteSpace::Forbidden),
            Some(c) => Err(self.state.unexpected_character(c, "a URI as a datatype")),
            None => Err(self.state.unexpected_end_of_input("a datatype")),
        }
    }

    fn consume_field(&mut self) -> Result<(), TokenizerError> {
        while self
            .state
            .peek()?
            .is_some_and(|c| !c.is_whitespace())
        {
            self.state.consume()?;
        }
        Ok(())
    }

    fn blank_node(&mut self) -> Result<Token, TokenizerError> {
        self.consume_field()?;
        if !is_valid_blank_node(self.state.value()) {
            let message = format!(
                "The value '{}' is not a valid blank node identifier",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::BlankNodeWithId))
    }

    fn variable(&mut self) -> Result<Token, TokenizerError> {
        self.consume_field()?;
        if !is_valid_var_name(self.state.value()) {
            let message = format!(
                "The value '{}' is not a valid variable name",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::Variable))
    }

    fn plain_literal(&mut self) -> Result<Token, TokenizerError> {
        self.consume_field()?;
        if !is_plain_literal(self.state.value(), true) {
            let message = format!(
                "The value '{}' is not a valid number or boolean",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::PlainLiteral))
    }
}

impl<S: CharSource> Tokenizer for TsvTokenizer<S> {
    fn next_token(&mut self) -> Result<Token, TokenizerError> {
        if let Some(bof) = self.state.enter()? {
            return Ok(bof);
        }
        if self.state.last_token_is(TokenKind::HatHat) {
            return self.datatype();
        }
        self.next_main_token()
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

#[cfg(test)]
mod tests {
    #![allow(clippy::panic_in_result_fn)]

    use super::*;

    fn tokenize(input: &str) -> Result<Vec<(TokenKind, String)>, TokenizerError> {
        TsvTokenizer::for_str(input)
            .tokens()
            .map(|t| t.map(|t| (t.kind(), t.into_value())))
            .collect()
    }

    fn error_kind(input: &str) -> Option<TokenSyntaxErrorKind> {
        tokenize(input).err().and_then(|e| e.syntax_kind())
    }

    #[test]
    fn results() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize("?x\t$y\t?z\n_:b0\t\"a\\tb\"@en\t\n1.5\ttrue\t'c'\n")?,
            [
                (TokenKind::Bof, String::new()),
                (TokenKind::Variable, "?x".into()),
                (TokenKind::Tab, "\t".into()),
                (TokenKind::Variable, "$y".into()),
                (TokenKind::Tab, "\t".into()),
                (TokenKind::Variable, "?z".into()),
                (TokenKind::Eol, String::new()),
                (TokenKind::BlankNodeWithId, "_:b0".into()),
                (TokenKind::Tab, "\t".into()),
                (TokenKind::Literal, "a\tb".into()),
                (TokenKind::LangSpec, "en".into()),
                (TokenKind::Tab, "\t".into()),
                (TokenKind::Eol, String::new()),
                (TokenKind::PlainLiteral, "1.5".into()),
                (TokenKind::Tab, "\t".into()),
                (TokenKind::PlainLiteral, "true".into()),
                (TokenKind::Tab, "\t".into()),
                (TokenKind::Literal, "c".into()),
                (TokenKind::Eol, String::new()),
                (TokenKind::Eof, String::new()),
            ]
        );
        Ok(())
    }

    #[test]
    fn typed_literals() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize("\"2\"^^<http://www.w3.org/2001/XMLSchema#int>")?[1..4],
            [
                (TokenKind::Literal, "2".into()),
                (TokenKind::HatHat, "^^".into()),
                (TokenKind::Uri, "http://www.w3.org/2001/XMLSchema#int".into()),
            ]
        );
        assert_eq!(
            error_kind("\"2\"^^xsd:int"),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            error_kind("<a>^^<b>"),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        Ok(())
    }

    #[test]
    fn invalid_fields() {
        assert_eq!(error_kind("?x-y"), Some(TokenSyntaxErrorKind::InvalidLiteral));
        assert_eq!(error_kind("_:"), Some(TokenSyntaxErrorKind::InvalidLiteral));
        assert_eq!(error_kind("foo"), Some(TokenSyntaxErrorKind::InvalidLiteral));
        assert_eq!(error_kind("<a b>"), Some(TokenSyntaxErrorKind::UnexpectedCharacter));
        assert_eq!(error_kind("\"a\nb\""), Some(TokenSyntaxErrorKind::UnexpectedNewLine));
    }
}
