//! A [Turtle](https://www.w3.org/TR/turtle/) tokenizer implemented by [`TurtleTokenizer`].

use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::toolkit::productions::{
    LongLiterals, UriWhiteSpace, comment, lang_spec, numeric, punctuation, quoted_literal,
    uri_body, validate_iri,
};
use crate::toolkit::terms::{
    is_pn_chars_base, is_plain_literal, is_valid_blank_node, is_valid_prefix,
    is_valid_turtle_qname,
};
use crate::toolkit::{
    CharSource, EscapeMode, LexerState, ReaderSource, StrSource, TokenSyntaxErrorKind,
    TokenizerError, handle_complex_local_name_escapes, handle_escapes,
};
use std::io::Read;

/// The Turtle grammar revision to tokenize.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Default)]
pub enum TurtleSyntax {
    /// The original Turtle submission: `"` literals only, permissive IRI escapes, a single `:` in prefixed names and case-sensitive booleans.
    Original,
    /// The [W3C Recommendation](https://www.w3.org/TR/turtle/).
    #[default]
    W3C,
}

/// A [Turtle](https://www.w3.org/TR/turtle/) tokenizer.
///
/// ```
/// use oxtok::{TokenKind, Tokenizer, TurtleTokenizer};
///
/// let tokens = TurtleTokenizer::for_str("@prefix ex: <http://example.com/> .\nex:s a ex:Person .")
///     .tokens()
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(tokens[3].kind(), TokenKind::Prefix);
/// assert_eq!(tokens[3].value(), "ex:");
/// assert_eq!(tokens[6].value(), "ex:s");
/// assert_eq!(tokens[7].kind(), TokenKind::KeywordA);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct TurtleTokenizer<S: CharSource> {
    state: LexerState<S>,
    syntax: TurtleSyntax,
    validate_iris: bool,
}

impl<'a> TurtleTokenizer<StrSource<'a>> {
    /// Tokenizes a string slice.
    pub fn for_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<R: Read> TurtleTokenizer<ReaderSource<R>> {
    /// Tokenizes a [`Read`] implementation.
    pub fn for_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

impl<S: CharSource> TurtleTokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: LexerState::new(source, "Turtle"),
            syntax: TurtleSyntax::default(),
            validate_iris: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_syntax(mut self, syntax: TurtleSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Checks that IRIs are valid [RFC 3987](https://tools.ietf.org/html/rfc3987) IRI references.
    #[inline]
    #[must_use]
    pub fn with_iri_validation(mut self) -> Self {
        self.validate_iris = true;
        self
    }

    #[inline]
    pub fn syntax(&self) -> TurtleSyntax {
        self.syntax
    }

    fn is_legacy(&self) -> bool {
        self.syntax == TurtleSyntax::Original
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
                '"' => self.literal('"'),
                '\'' if !self.is_legacy() => self.literal('\''),
                '0'..='9' => numeric(&mut self.state, true),
                '+' | '-' => {
                    self.state.consume()?;
                    numeric(&mut self.state, true)
                }
                '.' => {
                    self.state.consume()?;
                    if self.state.peek()?.is_some_and(|c| c.is_ascii_digit()) {
                        numeric(&mut self.state, true)
                    } else {
                        Ok(self.state.emit_value(TokenKind::Dot))
                    }
                }
                '@' => self.at(),
                '^' => self.hat_hat(),
                ';' => punctuation(&mut self.state, TokenKind::Semicolon),
                ',' => punctuation(&mut self.state, TokenKind::Comma),
                '(' => punctuation(&mut self.state, TokenKind::LeftBracket),
                ')' => punctuation(&mut self.state, TokenKind::RightBracket),
                '[' => punctuation(&mut self.state, TokenKind::LeftSquareBracket),
                ']' => punctuation(&mut self.state, TokenKind::RightSquareBracket),
                '{' | '}' => Err(self.state.error(
                    TokenSyntaxErrorKind::UnexpectedCharacter,
                    format!("Unexpected '{c}', graph literals are not valid in Turtle"),
                )),
                '=' => Err(self.state.error(
                    TokenSyntaxErrorKind::UnexpectedCharacter,
                    "Unexpected '=', equality and implies are not valid in Turtle",
                )),
                '_' | ':' => self.name(),
                c if c.is_alphabetic() || is_pn_chars_base(c) => self.name(),
                c => Err(self.state.unexpected_character(c, "")),
            };
        }
    }

    // [5]  base      ::=  '@base' IRIREF '.'
    // [4]  prefixID  ::=  '@prefix' PNAME_NS IRIREF '.'
    fn directive(&mut self) -> Result<Token, TokenizerError> {
        let (expected, kind) = match self.state.peek()? {
            Some('b') => ("base", TokenKind::BaseDirective),
            Some('p') => ("prefix", TokenKind::PrefixDirective),
            Some('k' | 'K') => {
                return Err(self.state.error(
                    TokenSyntaxErrorKind::InvalidSyntax,
                    "The @keywords directive is not valid in Turtle",
                ));
            }
            Some('f' | 'F') => {
                return Err(self.state.error(
                    TokenSyntaxErrorKind::InvalidSyntax,
                    "The @forAll and @forSome directives are not valid in Turtle",
                ));
            }
            Some(c) => {
                return Err(self
                    .state
                    .unexpected_character(c, "a base or prefix directive after '@'"));
            }
            None => return Err(self.state.unexpected_end_of_input("a directive")),
        };
        while self.state.peek()?.is_some_and(char::is_alphanumeric) {
            self.state.consume()?;
        }
        if self.state.value() != expected {
            let message = format!(
                "Expected a @{expected} directive, found @{}",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidSyntax, message));
        }
        Ok(self.state.emit(kind, expected))
    }

    // [139s]  PNAME_NS  ::=  PN_PREFIX? ':'
    fn prefix(&mut self) -> Result<Token, TokenizerError> {
        loop {
            match self.state.peek()? {
                Some('\n' | '\r') => return Err(self.state.unexpected_new_line("a prefix")),
                Some(c) if c.is_whitespace() => {
                    self.state.skip()?;
                }
                _ => break,
            }
        }
        self.state.start_new_token();
        loop {
            match self.state.peek()? {
                Some(':') => {
                    self.state.consume()?;
                    break;
                }
                Some(c) if !c.is_whitespace() && c != '<' => {
                    self.state.consume()?;
                }
                Some(c) if self.state.is_empty() => {
                    return Err(self.state.unexpected_character(c, "a prefix"));
                }
                None => return Err(self.state.unexpected_end_of_input("a prefix")),
                Some(_) => break,
            }
        }
        if !is_valid_prefix(self.state.value(), self.is_legacy()) {
            let message = format!(
                "The value '{}' is not a valid prefix in Turtle",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::Prefix))
    }

    fn datatype(&mut self) -> Result<Token, TokenizerError> {
        if self.state.peek()?.is_some_and(char::is_whitespace) {
            self.state.discard_white_space()?;
        }
        match self.state.peek()? {
            Some('<') => self.uri(),
            Some(c) if c == ':' || c == '_' || c.is_alphabetic() || is_pn_chars_base(c) => {
                let token = self.name()?;
                if token.kind() == TokenKind::QName {
                    Ok(token)
                } else {
                    Err(self
                        .state
                        .unexpected_token("a URI or a QName as a datatype", &token))
                }
            }
            Some(c) => Err(self
                .state
                .unexpected_character(c, "a URI or a QName as a datatype")),
            None => Err(self.state.unexpected_end_of_input("a datatype")),
        }
    }

    fn uri(&mut self) -> Result<Token, TokenizerError> {
        let (mode, white_space) = if self.is_legacy() {
            (EscapeMode::PermissiveUri, UriWhiteSpace::Discarded)
        } else {
            (EscapeMode::Uri, UriWhiteSpace::Forbidden)
        };
        self.state.consume()?;
        if self.state.peek_is('=')? {
            self.state.consume()?;
            if self.state.peek()?.is_none_or(char::is_whitespace) {
                return Err(self.state.token_error(
                    TokenSyntaxErrorKind::InvalidSyntax,
                    "The implied by symbol <= is only valid in Notation 3",
                ));
            }
        }
        let token = uri_body(&mut self.state, mode, white_space)?;
        if self.validate_iris {
            return validate_iri(&mut self.state, token);
        }
        Ok(token)
    }

    fn literal(&mut self, quote: char) -> Result<Token, TokenizerError> {
        let mode = if self.is_legacy() {
            EscapeMode::QuotedLiterals
        } else {
            EscapeMode::QuotedLiteralsBoth
        };
        quoted_literal(&mut self.state, quote, mode, LongLiterals::Strict)
    }

    fn at(&mut self) -> Result<Token, TokenizerError> {
        if self.state.last_token_is_quoted_literal() {
            self.state.skip()?;
            self.state.start_new_token();
            lang_spec(&mut self.state, self.syntax != TurtleSyntax::Original)
        } else if self.state.last_token_is(TokenKind::PlainLiteral) {
            Err(self.state.error(
                TokenSyntaxErrorKind::UnexpectedCharacter,
                "Unexpected '@', language specifiers are not valid on plain literals",
            ))
        } else {
            punctuation(&mut self.state, TokenKind::At)
        }
    }

    fn hat_hat(&mut self) -> Result<Token, TokenizerError> {
        if self.state.last_token_is_quoted_literal() {
            self.state.consume()?;
            match self.state.peek()? {
                Some('^') => punctuation(&mut self.state, TokenKind::HatHat),
                Some(c) => Err(self
                    .state
                    .unexpected_character(c, "'^' to complete a '^^' datatype marker")),
                None => Err(self.state.unexpected_end_of_input("a datatype marker")),
            }
        } else if self.state.last_token_is(TokenKind::PlainLiteral) {
            Err(self.state.error(
                TokenSyntaxErrorKind::UnexpectedCharacter,
                "Unexpected '^', datatypes are not valid on plain literals",
            ))
        } else {
            Err(self.state.unexpected_character('^', ""))
        }
    }

    // [136s]  PrefixedName      ::=  PNAME_LN | PNAME_NS
    // [137s]  BlankNode         ::=  BLANK_NODE_LABEL | ANON
    // [133s]  BooleanLiteral    ::=  'true' | 'false'
    fn name(&mut self) -> Result<Token, TokenizerError> {
        let legacy = self.is_legacy();
        let mut colon_occurred = false;
        let mut trailing_dot = false;
        while let Some(c) = self.state.peek()? {
            match c {
                ';' | ',' | '(' | ')' | '[' | ']' | '#' => break,
                '.' if legacy => break,
                c if c.is_whitespace() => break,
                ':' => {
                    if colon_occurred && legacy {
                        return Err(self.state.error(
                            TokenSyntaxErrorKind::UnexpectedCharacter,
                            "Unexpected ':', a QName may only contain one colon",
                        ));
                    }
                    colon_occurred = true;
                    trailing_dot = false;
                    self.state.consume()?;
                }
                '\\' | '%' if colon_occurred && !legacy => {
                    trailing_dot = false;
                    handle_complex_local_name_escapes(&mut self.state)?;
                }
                '\\' => {
                    trailing_dot = false;
                    handle_escapes(&mut self.state, EscapeMode::QName)?;
                }
                _ => {
                    trailing_dot = c == '.';
                    self.state.consume()?;
                }
            }
        }
        // only a '.' read as is ends the statement, not an escaped one
        if trailing_dot {
            self.state.backtrack()?;
        }

        let value = self.state.value();
        if colon_occurred {
            if value == "_:" {
                Ok(self.state.emit_value(TokenKind::BlankNode))
            } else if value.starts_with("_:") {
                if !legacy && !is_valid_blank_node(value) {
                    let message = format!("The value {value} is not a valid blank node identifier");
                    return Err(self
                        .state
                        .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
                }
                Ok(self.state.emit_value(TokenKind::BlankNodeWithId))
            } else if value
                .split_once(':')
                .is_some_and(|(_, local)| local.starts_with(['-', '.']))
            {
                let message = format!(
                    "The value {value} is not valid, the local part of a QName cannot start with a '-' or '.'"
                );
                Err(self
                    .state
                    .token_error(TokenSyntaxErrorKind::InvalidLiteral, message))
            } else if is_valid_turtle_qname(value, legacy) {
                Ok(self.state.emit_value(TokenKind::QName))
            } else {
                let message = format!("The value {value} is not a valid QName");
                Err(self
                    .state
                    .token_error(TokenSyntaxErrorKind::InvalidLiteral, message))
            }
        } else if value == "a" {
            Ok(self.state.emit_value(TokenKind::KeywordA))
        } else if matches!(value, "is" | "of") {
            let message = format!("The keyword '{value}' is only valid in Notation 3");
            Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidSyntax, message))
        } else if value.eq_ignore_ascii_case("base") {
            Ok(self.state.emit(TokenKind::BaseDirective, "base"))
        } else if value.eq_ignore_ascii_case("prefix") {
            Ok(self.state.emit(TokenKind::PrefixDirective, "prefix"))
        } else if is_plain_literal(value, legacy) {
            Ok(self.state.emit_value(TokenKind::PlainLiteral))
        } else {
            let message = format!("The value '{value}' is not valid as a QName or a plain literal");
            Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message))
        }
    }
}

impl<S: CharSource> Tokenizer for TurtleTokenizer<S> {
    fn next_token(&mut self) -> Result<Token, TokenizerError> {
        if let Some(bof) = self.state.enter()? {
            return Ok(bof);
        }
        match self.state.last_token_kind() {
            Some(TokenKind::At) => self.directive(),
            Some(TokenKind::PrefixDirective) => self.prefix(),
            Some(TokenKind::HatHat) => self.datatype(),
            _ => self.next_main_token(),
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
