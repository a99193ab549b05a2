//! A [Notation 3](https://w3c.github.io/N3/spec/) tokenizer implemented by [`N3Tokenizer`].

use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::toolkit::productions::{
    LongLiterals, UriWhiteSpace, comment, lang_spec, numeric, punctuation, quoted_literal,
    uri_body,
};
use crate::toolkit::terms::{
    is_boolean, is_plain_literal, is_valid_n3_name, is_valid_n3_variable, is_valid_prefix,
};
use crate::toolkit::{
    CharSource, EscapeMode, LexerState, ReaderSource, StrSource, TokenSyntaxErrorKind,
    TokenizerError,
};
use std::io::Read;

/// A [Notation 3](https://w3c.github.io/N3/spec/) tokenizer.
///
/// A `@keywords` directive switches the tokenizer to keywords mode: bare names are then either one of the declared keywords or a name in the default namespace.
///
/// ```
/// use oxtok::{N3Tokenizer, TokenKind, Tokenizer};
///
/// let tokens = N3Tokenizer::for_str("@keywords a, is. x a y.")
///     .tokens()
///     .map(|t| t.map(|t| (t.kind(), t.into_value())))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(tokens[2], (TokenKind::KeywordDefinition, "a".into()));
/// assert_eq!(tokens[6], (TokenKind::QName, ":x".into()));
/// assert_eq!(tokens[7], (TokenKind::KeywordCustom, "a".into()));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct N3Tokenizer<S: CharSource> {
    state: LexerState<S>,
    keywords_mode: bool,
    in_keywords_directive: bool,
    keywords: Vec<String>,
}

impl<'a> N3Tokenizer<StrSource<'a>> {
    /// Tokenizes a string slice.
    pub fn for_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<R: Read> N3Tokenizer<ReaderSource<R>> {
    /// Tokenizes a [`Read`] implementation.
    pub fn for_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

impl<S: CharSource> N3Tokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: LexerState::new(source, "Notation 3"),
            keywords_mode: false,
            in_keywords_directive: false,
            keywords: Vec::new(),
        }
    }

    /// Has a `@keywords` directive been read?
    #[inline]
    pub fn is_keywords_mode(&self) -> bool {
        self.keywords_mode
    }

    /// The keywords declared so far by `@keywords` directives.
    #[inline]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
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
                '<' => self.uri_or_implied_by(),
                '"' => quoted_literal(
                    &mut self.state,
                    '"',
                    EscapeMode::QuotedLiterals,
                    LongLiterals::Strict,
                ),
                '?' => self.variable(),
                '^' => self.hat(),
                '=' => {
                    self.state.consume()?;
                    if self.state.peek_is('>')? {
                        punctuation(&mut self.state, TokenKind::Implies)
                    } else {
                        Ok(self.state.emit_value(TokenKind::Equals))
                    }
                }
                '!' => punctuation(&mut self.state, TokenKind::Exclamation),
                ';' => punctuation(&mut self.state, TokenKind::Semicolon),
                ',' => punctuation(&mut self.state, TokenKind::Comma),
                '[' => punctuation(&mut self.state, TokenKind::LeftSquareBracket),
                ']' => punctuation(&mut self.state, TokenKind::RightSquareBracket),
                '{' => punctuation(&mut self.state, TokenKind::LeftCurlyBracket),
                '}' => punctuation(&mut self.state, TokenKind::RightCurlyBracket),
                '(' => punctuation(&mut self.state, TokenKind::LeftBracket),
                ')' => punctuation(&mut self.state, TokenKind::RightBracket),
                c if c == '_' || c == ':' || c.is_alphabetic() => self.name(),
                c => Err(self.state.unexpected_character(c, "")),
            };
        }
    }

    fn at(&mut self) -> Result<Token, TokenizerError> {
        if self.state.last_token_is_quoted_literal() {
            self.state.skip()?;
            self.state.start_new_token();
            return lang_spec(&mut self.state, false);
        }
        if self.state.last_token_is(TokenKind::PlainLiteral) {
            return Err(self.state.error(
                TokenSyntaxErrorKind::UnexpectedCharacter,
                "Unexpected '@', language specifiers are not valid on plain literals",
            ));
        }
        self.state.consume()?;
        while self
            .state
            .peek()?
            .is_some_and(|c| !c.is_whitespace() && c != '.')
        {
            self.state.consume()?;
        }
        let word = &self.state.value()[1..];
        if word.eq_ignore_ascii_case("keywords") {
            self.keywords_mode = true;
            self.in_keywords_directive = true;
            Ok(self.state.emit(TokenKind::KeywordDirective, "keywords"))
        } else if word.eq_ignore_ascii_case("base") {
            Ok(self.state.emit(TokenKind::BaseDirective, "base"))
        } else if word.eq_ignore_ascii_case("prefix") {
            Ok(self.state.emit(TokenKind::PrefixDirective, "prefix"))
        } else if word.eq_ignore_ascii_case("forall") {
            Ok(self.state.emit(TokenKind::ForAll, "forAll"))
        } else if word.eq_ignore_ascii_case("forsome") {
            Ok(self.state.emit(TokenKind::ForSome, "forSome"))
        } else if word == "a" {
            Ok(self.state.emit(TokenKind::KeywordA, "a"))
        } else if word == "is" {
            Ok(self.state.emit(TokenKind::KeywordIs, "is"))
        } else if word == "of" {
            Ok(self.state.emit(TokenKind::KeywordOf, "of"))
        } else if is_boolean(word, true) {
            let word = word.to_owned();
            Ok(self.state.emit(TokenKind::PlainLiteral, word))
        } else if self.keywords.iter().any(|k| k == word) {
            let word = word.to_owned();
            Ok(self.state.emit(TokenKind::KeywordCustom, word))
        } else {
            let message = format!(
                "The keyword @{word} has not been declared and is not a valid Notation 3 keyword"
            );
            Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidSyntax, message))
        }
    }

    // @keywords a, is, of.
    fn keyword_definition(&mut self) -> Result<Token, TokenizerError> {
        loop {
            match self.state.peek()? {
                Some('\n' | '\r') => {
                    return Err(self.state.unexpected_new_line(
                        "a @keywords directive, it must be terminated by a '.'",
                    ));
                }
                Some(c) if c.is_whitespace() => {
                    self.state.skip()?;
                }
                _ => break,
            }
        }
        self.state.start_new_token();
        match self.state.peek()? {
            Some('.') => {
                self.in_keywords_directive = false;
                punctuation(&mut self.state, TokenKind::Dot)
            }
            Some(',') => punctuation(&mut self.state, TokenKind::Comma),
            Some(_) => {
                while self
                    .state
                    .peek()?
                    .is_some_and(|c| !c.is_whitespace() && c != '.' && c != ',')
                {
                    self.state.consume()?;
                }
                let keyword = self.state.value();
                if !is_valid_n3_name(keyword) || keyword.contains(':') {
                    let message = format!("'{keyword}' is not a valid Notation 3 keyword");
                    return Err(self
                        .state
                        .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
                }
                if !self.keywords.iter().any(|k| k == keyword) {
                    self.keywords.push(keyword.to_owned());
                }
                Ok(self.state.emit_value(TokenKind::KeywordDefinition))
            }
            None => Err(self.state.unexpected_end_of_input("a @keywords directive")),
        }
    }

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
        while let Some(c) = self.state.peek()? {
            if c.is_whitespace() || c == '<' {
                break;
            }
            self.state.consume()?;
            if c == ':' {
                break;
            }
        }
        if !self.state.value().ends_with(':') {
            let message = format!(
                "Didn't find the expected ':' at the end of the prefix {}",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        if !is_valid_prefix(self.state.value(), true) {
            let message = format!(
                "The value '{}' is not a valid prefix in Notation 3",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::Prefix))
    }

    fn uri_or_implied_by(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        if self.state.peek_is('=')? {
            self.state.consume()?;
            if self.state.peek()?.is_none_or(char::is_whitespace) {
                return Ok(self.state.emit_value(TokenKind::ImpliedBy));
            }
            return Err(self.state.token_error(
                TokenSyntaxErrorKind::InvalidSyntax,
                "Ambiguous '<=', unable to determine whether an implied by symbol or a URI was intended",
            ));
        }
        uri_body(
            &mut self.state,
            EscapeMode::PermissiveUri,
            UriWhiteSpace::Discarded,
        )
    }

    fn hat(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        if !self.state.peek_is('^')? {
            return Ok(self.state.emit_value(TokenKind::Hat));
        }
        self.state.consume()?;
        if self.state.last_token_is_quoted_literal() {
            Ok(self.state.emit_value(TokenKind::HatHat))
        } else if self.state.last_token_is(TokenKind::PlainLiteral) {
            Err(self.state.token_error(
                TokenSyntaxErrorKind::InvalidSyntax,
                "Unexpected '^^', the datatype of a plain literal cannot be specified",
            ))
        } else {
            Err(self.state.token_error(
                TokenSyntaxErrorKind::InvalidSyntax,
                "Unexpected '^^', a datatype may only follow a quoted literal",
            ))
        }
    }

    /// The datatype must directly follow `^^`, without white spaces.
    fn datatype(&mut self) -> Result<Token, TokenizerError> {
        match self.state.peek()? {
            Some('<') => self.uri_or_implied_by(),
            Some(c) if c == '_' || c == ':' || c.is_alphabetic() => {
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

    fn variable(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        while self
            .state
            .peek()?
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.state.consume()?;
        }
        if !is_valid_n3_variable(self.state.value()) {
            let message = format!("'{}' is not a valid variable name", self.state.value());
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::Variable))
    }

    fn name(&mut self) -> Result<Token, TokenizerError> {
        let mut colon_occurred = false;
        while let Some(c) = self.state.peek()? {
            if !(c.is_alphanumeric() || matches!(c, ':' | '-' | '_')) {
                break;
            }
            if c == ':' {
                if colon_occurred {
                    return Err(self.state.error(
                        TokenSyntaxErrorKind::UnexpectedCharacter,
                        "Unexpected ':', a QName may only contain one colon",
                    ));
                }
                colon_occurred = true;
            }
            self.state.consume()?;
        }

        let value = self.state.value();
        if self.keywords_mode {
            if self.keywords.iter().any(|k| k == value) {
                return Ok(self.state.emit_value(TokenKind::KeywordCustom));
            }
        } else {
            match value {
                "a" => return Ok(self.state.emit_value(TokenKind::KeywordA)),
                "is" => return Ok(self.state.emit_value(TokenKind::KeywordIs)),
                "of" => return Ok(self.state.emit_value(TokenKind::KeywordOf)),
                _ => (),
            }
            if is_plain_literal(value, true) {
                return Ok(self.state.emit_value(TokenKind::PlainLiteral));
            }
        }
        if value == "_:" {
            Ok(self.state.emit_value(TokenKind::BlankNode))
        } else if !is_valid_n3_name(value) {
            let message = format!("The value '{value}' is not valid as a plain literal or a QName");
            Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message))
        } else if value.starts_with("_:") {
            Ok(self.state.emit_value(TokenKind::BlankNodeWithId))
        } else if colon_occurred {
            Ok(self.state.emit_value(TokenKind::QName))
        } else if self.keywords_mode {
            let value = format!(":{value}");
            Ok(self.state.emit(TokenKind::QName, value))
        } else {
            let message = format!(
                "The value '{value}' is not valid as a QName since it has no ':' and the namespace can thus not be determined"
            );
            Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message))
        }
    }
}

impl<S: CharSource> Tokenizer for N3Tokenizer<S> {
    fn next_token(&mut self) -> Result<Token, TokenizerError> {
        if let Some(bof) = self.state.enter()? {
            return Ok(bof);
        }
        if self.in_keywords_directive {
            return self.keyword_definition();
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
