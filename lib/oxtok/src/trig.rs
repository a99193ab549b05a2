//! A [TriG](https://www.w3.org/TR/trig/) tokenizer implemented by [`TriGTokenizer`].

use crate::token::{Keyword, Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::toolkit::productions::{
    LongLiterals, UriWhiteSpace, comment, emit_lang_spec, numeric, punctuation, quoted_literal,
    uri,
};
use crate::toolkit::terms::{
    is_boolean, is_pn_chars_base, is_valid_blank_node, is_valid_prefix, is_valid_turtle_qname,
};
use crate::toolkit::{
    CharSource, EscapeMode, LexerState, ReaderSource, StrSource, TokenSyntaxErrorKind,
    TokenizerError, handle_complex_local_name_escapes, handle_escapes,
};
use std::io::Read;

/// The TriG grammar revision to tokenize.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Default)]
pub enum TriGSyntax {
    /// The original TriG specification, without `@base`.
    Original,
    /// The TriG member submission.
    MemberSubmission,
    /// The [W3C Recommendation](https://www.w3.org/TR/trig/).
    #[default]
    Recommendation,
}

/// A [TriG](https://www.w3.org/TR/trig/) tokenizer.
///
/// ```
/// use oxtok::{Keyword, TokenKind, Tokenizer, TriGTokenizer};
///
/// let kinds = TriGTokenizer::for_str("GRAPH <http://example.com/g> { <s> <p> 'o' }")
///     .tokens()
///     .map(|t| t.map(|t| t.kind()))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(kinds[1], TokenKind::Keyword(Keyword::Graph));
/// assert_eq!(kinds[3], TokenKind::LeftCurlyBracket);
/// assert_eq!(kinds[6], TokenKind::Literal);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct TriGTokenizer<S: CharSource> {
    state: LexerState<S>,
    syntax: TriGSyntax,
}

impl<'a> TriGTokenizer<StrSource<'a>> {
    /// Tokenizes a string slice.
    pub fn for_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<R: Read> TriGTokenizer<ReaderSource<R>> {
    /// Tokenizes a [`Read`] implementation.
    pub fn for_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

impl<S: CharSource> TriGTokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: LexerState::new(source, "TriG"),
            syntax: TriGSyntax::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_syntax(mut self, syntax: TriGSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    #[inline]
    pub fn syntax(&self) -> TriGSyntax {
        self.syntax
    }

    fn is_recommendation(&self) -> bool {
        self.syntax == TriGSyntax::Recommendation
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
                '@' => self.directive_or_lang_spec(),
                '<' => self.uri(),
                '"' => self.literal('"'),
                '\'' if self.is_recommendation() => self.literal('\''),
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
                '^' => {
                    self.state.consume()?;
                    match self.state.peek()? {
                        Some('^') => punctuation(&mut self.state, TokenKind::HatHat),
                        Some(c) => Err(self
                            .state
                            .unexpected_character(c, "the second '^' of a '^^' datatype marker")),
                        None => Err(self.state.unexpected_end_of_input("a datatype marker")),
                    }
                }
                '=' => punctuation(&mut self.state, TokenKind::Equals),
                ';' => punctuation(&mut self.state, TokenKind::Semicolon),
                ',' => punctuation(&mut self.state, TokenKind::Comma),
                '[' => punctuation(&mut self.state, TokenKind::LeftSquareBracket),
                ']' => punctuation(&mut self.state, TokenKind::RightSquareBracket),
                '{' => punctuation(&mut self.state, TokenKind::LeftCurlyBracket),
                '}' => punctuation(&mut self.state, TokenKind::RightCurlyBracket),
                '(' => punctuation(&mut self.state, TokenKind::LeftBracket),
                ')' => punctuation(&mut self.state, TokenKind::RightBracket),
                '_' | ':' => self.name(),
                c if c.is_alphabetic() || is_pn_chars_base(c) => self.name(),
                c => Err(self.state.unexpected_character(c, "")),
            };
        }
    }

    fn directive_or_lang_spec(&mut self) -> Result<Token, TokenizerError> {
        self.state.skip()?;
        self.state.start_new_token();
        while self
            .state
            .peek()?
            .is_some_and(|c| c.is_alphanumeric() || c == '-')
        {
            self.state.consume()?;
        }
        match self.state.value() {
            "prefix" => Ok(self.state.emit(TokenKind::PrefixDirective, "prefix")),
            "base" if self.syntax == TriGSyntax::Original => Err(self.state.token_error(
                TokenSyntaxErrorKind::InvalidSyntax,
                "The @base directive is not permitted in the original version of TriG",
            )),
            "base" => Ok(self.state.emit(TokenKind::BaseDirective, "base")),
            "" => match self.state.peek()? {
                Some(c) => Err(self
                    .state
                    .unexpected_character(c, "a directive or a language specifier after '@'")),
                None => Err(self
                    .state
                    .unexpected_end_of_input("a directive or a language specifier")),
            },
            _ => emit_lang_spec(&mut self.state, self.syntax == TriGSyntax::Recommendation),
        }
    }

    // [6g]  PNAME_NS  ::=  PN_PREFIX? ':'
    fn prefix(&mut self) -> Result<Token, TokenizerError> {
        self.state.discard_white_space()?;
        while self
            .state
            .peek()?
            .is_some_and(|c| !c.is_whitespace() && c != '<')
        {
            self.state.consume()?;
        }
        if self.state.is_empty() {
            return match self.state.peek()? {
                Some(c) => Err(self.state.unexpected_character(c, "a prefix")),
                None => Err(self.state.unexpected_end_of_input("a prefix")),
            };
        }
        if !is_valid_prefix(self.state.value(), !self.is_recommendation()) {
            let message = format!(
                "The value '{}' is not a valid prefix in TriG",
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
        if self.is_recommendation() {
            uri(&mut self.state, EscapeMode::Uri, UriWhiteSpace::Forbidden)
        } else {
            uri(
                &mut self.state,
                EscapeMode::PermissiveUri,
                UriWhiteSpace::Discarded,
            )
        }
    }

    fn literal(&mut self, quote: char) -> Result<Token, TokenizerError> {
        let mode = if self.is_recommendation() {
            EscapeMode::QuotedLiteralsBoth
        } else {
            EscapeMode::QuotedLiterals
        };
        quoted_literal(&mut self.state, quote, mode, LongLiterals::Greedy)
    }

    fn name(&mut self) -> Result<Token, TokenizerError> {
        let recommendation = self.is_recommendation();
        let mut colon_occurred = false;
        let mut trailing_dot = false;
        while let Some(c) = self.state.peek()? {
            match c {
                ';' | ',' | '(' | ')' | '[' | ']' | '{' | '}' | '#' | '<' | '"' | '=' => break,
                '.' if !recommendation => break,
                c if c.is_whitespace() => break,
                ':' => {
                    if colon_occurred && !recommendation {
                        return Err(self.state.error(
                            TokenSyntaxErrorKind::UnexpectedCharacter,
                            "Unexpected ':', a QName may only contain one colon",
                        ));
                    }
                    colon_occurred = true;
                    trailing_dot = false;
                    self.state.consume()?;
                }
                '\\' | '%' if colon_occurred && recommendation => {
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
        if trailing_dot {
            self.state.backtrack()?;
        }

        let value = self.state.value();
        if value == "_:" {
            Ok(self.state.emit_value(TokenKind::BlankNode))
        } else if value.starts_with("_:") {
            if recommendation && !is_valid_blank_node(value) {
                let message = format!("The value {value} is not a valid blank node identifier");
                return Err(self
                    .state
                    .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
            }
            Ok(self.state.emit_value(TokenKind::BlankNodeWithId))
        } else if value == "a" {
            Ok(self.state.emit_value(TokenKind::KeywordA))
        } else if is_boolean(value, true) {
            Ok(self.state.emit_value(TokenKind::PlainLiteral))
        } else if recommendation && value.eq_ignore_ascii_case("prefix") {
            Ok(self.state.emit(TokenKind::PrefixDirective, "prefix"))
        } else if recommendation && value.eq_ignore_ascii_case("base") {
            Ok(self.state.emit(TokenKind::BaseDirective, "base"))
        } else if recommendation && value.eq_ignore_ascii_case("graph") {
            Ok(self
                .state
                .emit(TokenKind::Keyword(Keyword::Graph), Keyword::Graph.as_str()))
        } else if colon_occurred && is_valid_turtle_qname(value, !recommendation) {
            Ok(self.state.emit_value(TokenKind::QName))
        } else {
            let message =
                format!("Unexpected input '{value}', expected a QName, the 'a' keyword or a plain literal");
            Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message))
        }
    }
}

impl<S: CharSource> Tokenizer for TriGTokenizer<S> {
    fn next_token(&mut self) -> Result<Token, TokenizerError> {
        if let Some(bof) = self.state.enter()? {
            return Ok(bof);
        }
        match self.state.last_token_kind() {
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
