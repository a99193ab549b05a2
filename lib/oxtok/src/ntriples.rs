//! A [N-Triples](https://www.w3.org/TR/n-triples/) and [N-Quads](https://www.w3.org/TR/n-quads/) tokenizer implemented by [`NTriplesTokenizer`].

use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::toolkit::productions::{comment, lang_spec, punctuation, validate_iri};
use crate::toolkit::terms::{
    is_pn_chars, is_valid_blank_node, is_valid_legacy_ntriples_blank_node,
};
use crate::toolkit::{
    CharSource, EscapeMode, LexerState, ReaderSource, StrSource, TokenSyntaxErrorKind,
    TokenizerError, handle_escapes,
};
use std::io::Read;

/// The N-Triples grammar revision to tokenize.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Default)]
pub enum NTriplesSyntax {
    /// The [RDF 2004 test cases](https://www.w3.org/TR/rdf-testcases/#ntriples) format: ASCII only input and `[A-Za-z][A-Za-z0-9]*` blank node labels.
    Original,
    /// The [RDF 1.1 Recommendation](https://www.w3.org/TR/n-triples/).
    #[default]
    Rdf11,
}

/// A [N-Triples](https://www.w3.org/TR/n-triples/) tokenizer.
///
/// It also tokenizes [N-Quads](https://www.w3.org/TR/n-quads/): the graph name is just a fourth term before the dot.
///
/// ```
/// use oxtok::{NTriplesTokenizer, TokenKind, Tokenizer};
///
/// let tokens = NTriplesTokenizer::for_str("<http://example.com/s> <http://example.com/p> \"o\"@en .")
///     .tokens()
///     .map(|t| t.map(|t| (t.kind(), t.into_value())))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(tokens[3], (TokenKind::Literal, "o".into()));
/// assert_eq!(tokens[4], (TokenKind::LangSpec, "en".into()));
/// assert_eq!(tokens[5], (TokenKind::Dot, ".".into()));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct NTriplesTokenizer<S: CharSource> {
    state: LexerState<S>,
    syntax: NTriplesSyntax,
    validate_iris: bool,
}

impl<'a> NTriplesTokenizer<StrSource<'a>> {
    /// Tokenizes a string slice.
    pub fn for_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<R: Read> NTriplesTokenizer<ReaderSource<R>> {
    /// Tokenizes a [`Read`] implementation.
    pub fn for_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

impl<S: CharSource> NTriplesTokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: LexerState::new(source, "N-Triples"),
            syntax: NTriplesSyntax::default(),
            validate_iris: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_syntax(mut self, syntax: NTriplesSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Checks that IRIs are valid [RFC 3987](https://tools.ietf.org/html/rfc3987) IRI references.
    ///
    /// Only applies to the RDF 1.1 syntax.
    #[inline]
    #[must_use]
    pub fn with_iri_validation(mut self) -> Self {
        self.validate_iris = true;
        self
    }

    #[inline]
    pub fn syntax(&self) -> NTriplesSyntax {
        self.syntax
    }

    fn next_main_token(&mut self) -> Result<Token, TokenizerError> {
        loop {
            let Some(c) = self.state.peek()? else {
                return self.state.eof_or_fail("a token");
            };
            return match c {
                c if c.is_whitespace() => {
                    self.state.discard_white_space()?;
                    continue;
                }
                '#' => comment(&mut self.state),
                '<' => self.uri(),
                '"' => self.literal(),
                '_' => self.blank_node(),
                '@' => {
                    if !self.state.last_token_is(TokenKind::Literal) {
                        return Err(self.state.error(
                            TokenSyntaxErrorKind::UnexpectedCharacter,
                            "Unexpected '@', a language specifier may only follow a literal",
                        ));
                    }
                    self.state.skip()?;
                    self.state.start_new_token();
                    lang_spec(&mut self.state, self.syntax == NTriplesSyntax::Rdf11)
                }
                '^' => self.hat_hat(),
                '.' => punctuation(&mut self.state, TokenKind::Dot),
                c => Err(self.state.unexpected_character(c, "")),
            };
        }
    }

    fn check_ascii(&mut self, c: char) -> Result<(), TokenizerError> {
        if self.syntax == NTriplesSyntax::Original && !c.is_ascii() {
            return Err(self.state.error(
                TokenSyntaxErrorKind::UnexpectedCharacter,
                format!(
                    "Unexpected non ASCII character '{c}', such characters must be escaped with \\u or \\U in the original N-Triples syntax"
                ),
            ));
        }
        Ok(())
    }

    // [8]  IRIREF  ::=  '<' ([^#x00-#x20<>"{}|^`\] | UCHAR)* '>'
    fn uri(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        loop {
            match self.state.peek()? {
                None => return Err(self.state.unexpected_end_of_input("a URI")),
                Some('>') => {
                    self.state.consume()?;
                    break;
                }
                Some('\\') => handle_escapes(&mut self.state, EscapeMode::Uri)?,
                Some('\n' | '\r') => return Err(self.state.unexpected_new_line("a URI")),
                Some(c) if c.is_whitespace() => {
                    return Err(self.state.error(
                        TokenSyntaxErrorKind::UnexpectedCharacter,
                        "Illegal white space in URI",
                    ));
                }
                Some(c) => {
                    self.check_ascii(c)?;
                    self.state.consume()?;
                }
            }
        }
        let token = self.state.emit_trimmed(TokenKind::Uri, 1, 1);
        if self.validate_iris && self.syntax == NTriplesSyntax::Rdf11 {
            validate_iri(&mut self.state, token)
        } else {
            Ok(token)
        }
    }

    // [9]  STRING_LITERAL_QUOTE  ::=  '"' ([^#x22#x5C#xA#xD] | ECHAR | UCHAR)* '"'
    fn literal(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        loop {
            match self.state.peek()? {
                None => return Err(self.state.unexpected_end_of_input("a literal")),
                Some('"') => {
                    self.state.consume()?;
                    return Ok(self.state.emit_trimmed(TokenKind::Literal, 1, 1));
                }
                Some('\\') => handle_escapes(&mut self.state, EscapeMode::QuotedLiterals)?,
                Some('\n' | '\r') => {
                    return Err(self.state.unexpected_new_line(
                        "a literal, new lines must be escaped with \\n or \\r in N-Triples",
                    ));
                }
                Some(c) => {
                    self.check_ascii(c)?;
                    self.state.consume()?;
                }
            }
        }
    }

    // [141s]  BLANK_NODE_LABEL  ::=  '_:' (PN_CHARS_U | [0-9]) ((PN_CHARS | '.')* PN_CHARS)?
    fn blank_node(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        if !self.state.peek_is(':')? {
            return match self.state.peek()? {
                Some(c) => Err(self.state.unexpected_character(c, "':' to start a blank node label")),
                None => Err(self.state.unexpected_end_of_input("a blank node")),
            };
        }
        self.state.consume()?;
        while self
            .state
            .peek()?
            .is_some_and(|c| c == '.' || c == ':' || is_pn_chars(c))
        {
            self.state.consume()?;
        }
        if self.state.value().ends_with('.') {
            self.state.backtrack()?;
        }
        let valid = match self.syntax {
            NTriplesSyntax::Original => is_valid_legacy_ntriples_blank_node(self.state.value()),
            NTriplesSyntax::Rdf11 => is_valid_blank_node(self.state.value()),
        };
        if !valid {
            let message = format!(
                "The value '{}' is not a valid blank node identifier in N-Triples",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::BlankNodeWithId))
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
            Some('<') => self.uri(),
            Some(c) => Err(self.state.unexpected_character(c, "a URI as a datatype")),
            None => Err(self.state.unexpected_end_of_input("a datatype")),
        }
    }
}

impl<S: CharSource> Tokenizer for NTriplesTokenizer<S> {
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

    fn tokenize(
        input: &str,
        syntax: NTriplesSyntax,
    ) -> Result<Vec<(TokenKind, String)>, TokenizerError> {
        NTriplesTokenizer::for_str(input)
            .with_syntax(syntax)
            .tokens()
            .map(|t| t.map(|t| (t.kind(), t.into_value())))
            .collect()
    }

    fn error_kind(input: &str, syntax: NTriplesSyntax) -> Option<TokenSyntaxErrorKind> {
        tokenize(input, syntax).err().and_then(|e| e.syntax_kind())
    }

    #[test]
    fn triples() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize(
                "# header\n<http://example.com/s> <http://example.com/p> \"a\\tb\" .\n_:b1 <http://example.com/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> . # end",
                NTriplesSyntax::Rdf11
            )?,
            [
                (TokenKind::Bof, String::new()),
                (TokenKind::Comment, "# header".into()),
                (TokenKind::Uri, "http://example.com/s".into()),
                (TokenKind::Uri, "http://example.com/p".into()),
                (TokenKind::Literal, "a\tb".into()),
                (TokenKind::Dot, ".".into()),
                (TokenKind::BlankNodeWithId, "_:b1".into()),
                (TokenKind::Uri, "http://example.com/p".into()),
                (TokenKind::Literal, "1".into()),
                (TokenKind::HatHat, "^^".into()),
                (
                    TokenKind::Uri,
                    "http://www.w3.org/2001/XMLSchema#integer".into()
                ),
                (TokenKind::Dot, ".".into()),
                (TokenKind::Comment, "# end".into()),
                (TokenKind::Eof, String::new()),
            ]
        );
        Ok(())
    }

    #[test]
    fn quads() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize("_:s <p> \"o\"@en-GB <g> .", NTriplesSyntax::Rdf11)?
                .into_iter()
                .map(|(k, _)| k)
                .collect::<Vec<_>>(),
            [
                TokenKind::Bof,
                TokenKind::BlankNodeWithId,
                TokenKind::Uri,
                TokenKind::Literal,
                TokenKind::LangSpec,
                TokenKind::Uri,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
        Ok(())
    }

    #[test]
    fn original_syntax_is_ascii_only() -> Result<(), TokenizerError> {
        assert_eq!(
            error_kind("<http://example.com/\u{e9}> <p> <o> .", NTriplesSyntax::Original),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            error_kind("<s> <p> \"caf\u{e9}\" .", NTriplesSyntax::Original),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            tokenize("<s> <p> \"caf\\u00E9\" .", NTriplesSyntax::Original)?[3],
            (TokenKind::Literal, "caf\u{e9}".into())
        );
        assert_eq!(
            tokenize("<s> <p> \"caf\u{e9}\" .", NTriplesSyntax::Rdf11)?[3],
            (TokenKind::Literal, "caf\u{e9}".into())
        );
        Ok(())
    }

    #[test]
    fn blank_node_labels() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize("_:b.1 _:b_2.", NTriplesSyntax::Rdf11)?[1..4],
            [
                (TokenKind::BlankNodeWithId, "_:b.1".into()),
                (TokenKind::BlankNodeWithId, "_:b_2".into()),
                (TokenKind::Dot, ".".into()),
            ]
        );
        assert_eq!(
            tokenize("_:a1 .", NTriplesSyntax::Original)?[1],
            (TokenKind::BlankNodeWithId, "_:a1".into())
        );
        for label in ["_:1a", "_:a_1", "_:a-b"] {
            assert_eq!(
                error_kind(label, NTriplesSyntax::Original),
                Some(TokenSyntaxErrorKind::InvalidLiteral),
                "{label}"
            );
        }
        assert_eq!(
            error_kind("_b", NTriplesSyntax::Rdf11),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        Ok(())
    }

    #[test]
    fn new_lines_are_not_allowed_in_terms() {
        assert_eq!(
            error_kind("<s> <p> \"a\nb\" .", NTriplesSyntax::Rdf11),
            Some(TokenSyntaxErrorKind::UnexpectedNewLine)
        );
        assert_eq!(
            error_kind("<s\n> <p> <o> .", NTriplesSyntax::Rdf11),
            Some(TokenSyntaxErrorKind::UnexpectedNewLine)
        );
        assert_eq!(
            error_kind("<s t> <p> <o> .", NTriplesSyntax::Rdf11),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
    }

    #[test]
    fn datatypes_and_language_tags() {
        assert_eq!(
            error_kind("<s> <p> <o> ^^<d> .", NTriplesSyntax::Rdf11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        assert_eq!(
            error_kind("<s> <p> \"o\"^^\"d\" .", NTriplesSyntax::Rdf11),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            error_kind("<s> <p> <o>@en .", NTriplesSyntax::Rdf11),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            error_kind("<s> <p> \"o\"@abcdefghi .", NTriplesSyntax::Rdf11),
            Some(TokenSyntaxErrorKind::InvalidLiteral)
        );
    }

    #[test]
    fn iri_validation() -> Result<(), TokenizerError> {
        let input = "<http://example.com/\\u0020> <p> <o> .";
        assert_eq!(
            NTriplesTokenizer::for_str(input)
                .with_iri_validation()
                .tokens()
                .collect::<Result<Vec<_>, _>>()
                .err()
                .and_then(|e| e.syntax_kind()),
            Some(TokenSyntaxErrorKind::InvalidLiteral)
        );
        assert_eq!(tokenize(input, NTriplesSyntax::Rdf11)?.len(), 6);
        Ok(())
    }
}
