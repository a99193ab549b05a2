//! A [SPARQL](https://www.w3.org/TR/sparql11-query/) query and update tokenizer implemented by [`SparqlTokenizer`].

use crate::token::{Keyword, Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::toolkit::productions::{
    LongLiterals, UriWhiteSpace, comment, lang_spec, numeric, punctuation, quoted_literal, uri,
    uri_body,
};
use crate::toolkit::terms::{
    is_pn_chars, is_valid_blank_node, is_valid_prefix, is_valid_sparql_qname, is_valid_var_name,
};
use crate::toolkit::{
    CharSource, EscapeMode, LexerState, ReaderSource, StrSource, TokenSyntaxErrorKind,
    TokenizerError, handle_complex_local_name_escapes, handle_escapes, unescape_local_name,
};
use std::io::Read;

/// The SPARQL grammar revision accepted by [`SparqlTokenizer`].
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Default)]
pub enum SparqlQuerySyntax {
    /// [SPARQL 1.0](https://www.w3.org/TR/rdf-sparql-query/): no sub-queries, no escapes in local names and a single colon per prefixed name.
    Sparql10,
    /// [SPARQL 1.1](https://www.w3.org/TR/sparql11-query/).
    #[default]
    Sparql11,
    /// SPARQL 1.1 with extension keywords like `LENGTH`.
    Extended,
}

/// A [SPARQL](https://www.w3.org/TR/sparql11-query/) query and update tokenizer.
///
/// Until the first query form or update keyword is read only the prologue (`BASE` and `PREFIX` declarations) is accepted.
///
/// ```
/// use oxtok::{Keyword, SparqlTokenizer, TokenKind, Tokenizer};
///
/// let kinds = SparqlTokenizer::for_str("SELECT * WHERE { }")
///     .tokens()
///     .map(|t| t.map(|t| t.kind()))
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Bof,
///         TokenKind::Keyword(Keyword::Select),
///         TokenKind::All,
///         TokenKind::Keyword(Keyword::Where),
///         TokenKind::LeftCurlyBracket,
///         TokenKind::RightCurlyBracket,
///         TokenKind::Eof
///     ]
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct SparqlTokenizer<S: CharSource> {
    state: LexerState<S>,
    syntax: SparqlQuerySyntax,
    query_keyword_seen: bool,
    base_declared: bool,
}

impl<'a> SparqlTokenizer<StrSource<'a>> {
    /// Tokenizes a string slice.
    pub fn for_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<R: Read> SparqlTokenizer<ReaderSource<R>> {
    /// Tokenizes a [`Read`] implementation.
    pub fn for_reader(reader: R) -> Self {
        Self::new(ReaderSource::new(reader))
    }
}

impl<S: CharSource> SparqlTokenizer<S> {
    pub fn new(source: S) -> Self {
        Self {
            state: LexerState::new(source, "SPARQL"),
            syntax: SparqlQuerySyntax::default(),
            query_keyword_seen: false,
            base_declared: false,
        }
    }

    #[must_use]
    pub fn with_syntax(mut self, syntax: SparqlQuerySyntax) -> Self {
        self.syntax = syntax;
        self
    }

    #[inline]
    pub fn syntax(&self) -> SparqlQuerySyntax {
        self.syntax
    }

    #[inline]
    fn is_sparql10(&self) -> bool {
        self.syntax == SparqlQuerySyntax::Sparql10
    }

    // [4]  Prologue     ::=  ( BaseDecl | PrefixDecl )*
    // [5]  BaseDecl     ::=  'BASE' IRIREF
    // [6]  PrefixDecl   ::=  'PREFIX' PNAME_NS IRIREF
    fn prologue_or_query_keyword(&mut self) -> Result<Token, TokenizerError> {
        loop {
            let Some(c) = self.state.peek()? else {
                return self.state.eof_or_fail("a query prologue");
            };
            return match c {
                c if c.is_whitespace() => {
                    self.state.discard_white_space()?;
                    continue;
                }
                '#' => comment(&mut self.state),
                '<' => uri(&mut self.state, EscapeMode::Uri, UriWhiteSpace::Forbidden),
                c if c.is_alphanumeric() || c == '_' => self.prologue_keyword(),
                c => Err(self.state.unexpected_character(
                    c,
                    "a base declaration, a prefix declaration or a query or update keyword",
                )),
            };
        }
    }

    fn prologue_keyword(&mut self) -> Result<Token, TokenizerError> {
        if matches!(
            self.state.last_token_kind(),
            Some(TokenKind::BaseDirective | TokenKind::Prefix)
        ) {
            return Err(self.state.error(
                TokenSyntaxErrorKind::InvalidSyntax,
                "Expected a URI to complete the declaration",
            ));
        }
        while self
            .state
            .peek()?
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.state.consume()?;
        }
        let word = self.state.value();
        if word.eq_ignore_ascii_case("base") {
            return self.base_directive();
        }
        if word.eq_ignore_ascii_case("prefix") {
            return Ok(self.state.emit(TokenKind::PrefixDirective, "prefix"));
        }
        match Keyword::from_word(word) {
            Some(keyword) if keyword.is_query_form() || keyword.starts_update() => {
                self.query_keyword_seen = true;
                Ok(self
                    .state
                    .emit(TokenKind::Keyword(keyword), keyword.as_str()))
            }
            _ => {
                let message = format!(
                    "Unexpected '{word}' encountered while trying to parse the query prologue, expected a base declaration, a prefix declaration or a query or update keyword"
                );
                Err(self
                    .state
                    .token_error(TokenSyntaxErrorKind::InvalidSyntax, message))
            }
        }
    }

    fn base_directive(&mut self) -> Result<Token, TokenizerError> {
        if self.base_declared && !self.query_keyword_seen {
            return Err(self.state.token_error(
                TokenSyntaxErrorKind::InvalidSyntax,
                "Unexpected base declaration, the query prologue may only contain one base declaration",
            ));
        }
        self.base_declared = true;
        Ok(self.state.emit(TokenKind::BaseDirective, "base"))
    }

    // [140]  PNAME_NS  ::=  PN_PREFIX? ':'
    fn prefix(&mut self) -> Result<Token, TokenizerError> {
        self.state.discard_white_space()?;
        while let Some(c) = self.state.peek()? {
            if c.is_whitespace() || c == '<' {
                break;
            }
            self.state.consume()?;
            if c == ':' {
                break;
            }
        }
        if self.state.is_empty() {
            return match self.state.peek()? {
                Some(c) => Err(self.state.unexpected_character(c, "a prefix")),
                None => Err(self.state.unexpected_end_of_input("a prefix")),
            };
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
        if !is_valid_prefix(self.state.value(), false) {
            let message = format!(
                "The value '{}' is not a valid prefix in SPARQL",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::Prefix))
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
                '0'..='9' => numeric(&mut self.state, self.syntax != SparqlQuerySyntax::Sparql10),
                c if c.is_alphabetic() || c == '_' || c == ':' => self.name_or_keyword(),
                '*' => {
                    let kind = if matches!(
                        self.state.last_token_kind(),
                        Some(TokenKind::Keyword(
                            Keyword::Select | Keyword::Distinct | Keyword::Reduced
                        ))
                    ) {
                        TokenKind::All
                    } else {
                        TokenKind::Multiply
                    };
                    punctuation(&mut self.state, kind)
                }
                '/' => punctuation(&mut self.state, TokenKind::Divide),
                '=' => punctuation(&mut self.state, TokenKind::Equals),
                '.' => {
                    self.state.consume()?;
                    if self.state.peek()?.is_some_and(|c| c.is_ascii_digit()) {
                        numeric(&mut self.state, self.syntax != SparqlQuerySyntax::Sparql10)
                    } else {
                        Ok(self.state.emit_value(TokenKind::Dot))
                    }
                }
                ';' => punctuation(&mut self.state, TokenKind::Semicolon),
                ',' => punctuation(&mut self.state, TokenKind::Comma),
                '<' => self.less_than_or_uri(),
                '>' => {
                    self.state.consume()?;
                    if self.state.peek_is('=')? {
                        punctuation(&mut self.state, TokenKind::GreaterThanOrEqualTo)
                    } else {
                        Ok(self.state.emit_value(TokenKind::GreaterThan))
                    }
                }
                '"' => quoted_literal(
                    &mut self.state,
                    '"',
                    EscapeMode::QuotedLiterals,
                    LongLiterals::Greedy,
                ),
                '\'' => quoted_literal(
                    &mut self.state,
                    '\'',
                    EscapeMode::QuotedLiteralsAlternate,
                    LongLiterals::Greedy,
                ),
                '^' => {
                    self.state.consume()?;
                    if self.state.peek_is('^')? {
                        punctuation(&mut self.state, TokenKind::HatHat)
                    } else {
                        Ok(self.state.emit_value(TokenKind::Hat))
                    }
                }
                '+' | '-' => self.sign(c),
                '!' => {
                    self.state.consume()?;
                    if self.state.peek_is('=')? {
                        punctuation(&mut self.state, TokenKind::NotEquals)
                    } else {
                        Ok(self.state.emit_value(TokenKind::Negation))
                    }
                }
                '&' => {
                    self.state.consume()?;
                    match self.state.peek()? {
                        Some('&') => punctuation(&mut self.state, TokenKind::And),
                        Some(c) => Err(self.state.unexpected_character(c, "'&' to form '&&'")),
                        None => Err(self.state.unexpected_end_of_input("a '&&' operator")),
                    }
                }
                '|' => {
                    self.state.consume()?;
                    if self.state.peek_is('|')? {
                        punctuation(&mut self.state, TokenKind::Or)
                    } else {
                        Ok(self.state.emit_value(TokenKind::BitwiseOr))
                    }
                }
                '@' => self.lang_spec(),
                '?' | '$' => self.variable(),
                '{' => punctuation(&mut self.state, TokenKind::LeftCurlyBracket),
                '}' => punctuation(&mut self.state, TokenKind::RightCurlyBracket),
                '(' => punctuation(&mut self.state, TokenKind::LeftBracket),
                ')' => punctuation(&mut self.state, TokenKind::RightBracket),
                '[' => punctuation(&mut self.state, TokenKind::LeftSquareBracket),
                ']' => punctuation(&mut self.state, TokenKind::RightSquareBracket),
                c => Err(self.state.unexpected_character(c, "")),
            };
        }
    }

    fn sign(&mut self, sign: char) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        if self
            .state
            .peek()?
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            return numeric(&mut self.state, self.syntax != SparqlQuerySyntax::Sparql10);
        }
        let kind = if sign == '+' {
            TokenKind::Plus
        } else {
            TokenKind::Minus
        };
        Ok(self.state.emit_value(kind))
    }

    // `<` is the less than operator when followed by a white space and an IRI reference otherwise
    fn less_than_or_uri(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        match self.state.peek()? {
            Some('=') => {
                self.state.consume()?;
                if self.state.peek()?.is_none_or(char::is_whitespace) {
                    Ok(self.state.emit_value(TokenKind::LessThanOrEqualTo))
                } else {
                    Err(self.state.token_error(
                        TokenSyntaxErrorKind::InvalidSyntax,
                        "Ambiguous '<=', unable to determine whether a less than or equal operator or a URI was intended",
                    ))
                }
            }
            None => Ok(self.state.emit_value(TokenKind::LessThan)),
            Some(c) if c.is_whitespace() => Ok(self.state.emit_value(TokenKind::LessThan)),
            Some(_) => uri_body(&mut self.state, EscapeMode::Uri, UriWhiteSpace::Forbidden),
        }
    }

    fn lang_spec(&mut self) -> Result<Token, TokenizerError> {
        if !self.state.last_token_is_quoted_literal() {
            return Err(self.state.error(
                TokenSyntaxErrorKind::UnexpectedCharacter,
                "Unexpected '@', a language specifier may only follow a quoted literal",
            ));
        }
        self.state.skip()?;
        self.state.start_new_token();
        lang_spec(
            &mut self.state,
            self.syntax != SparqlQuerySyntax::Extended,
        )
    }

    // [143]  VAR1  ::=  '?' VARNAME
    // [144]  VAR2  ::=  '$' VARNAME
    fn variable(&mut self) -> Result<Token, TokenizerError> {
        self.state.consume()?;
        while let Some(c) = self.state.peek()? {
            if c == '\\' {
                handle_escapes(&mut self.state, EscapeMode::QName)?;
            } else if c != '-' && is_pn_chars(c) {
                self.state.consume()?;
            } else {
                break;
            }
        }
        if self.state.value() == "?" {
            return Ok(self.state.emit_value(TokenKind::Question));
        }
        if !is_valid_var_name(self.state.value()) {
            let message = format!(
                "The value '{}' is not valid as a variable name",
                self.state.value()
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        Ok(self.state.emit_value(TokenKind::Variable))
    }

    fn datatype(&mut self) -> Result<Token, TokenizerError> {
        self.state.discard_white_space()?;
        match self.state.peek()? {
            Some('<') => uri(&mut self.state, EscapeMode::Uri, UriWhiteSpace::Forbidden),
            Some(c) if c == '_' || c == ':' || c.is_alphabetic() => {
                let token = self.name_or_keyword()?;
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

    // [137]  PrefixedName  ::=  PNAME_LN | PNAME_NS
    // [138]  BlankNode     ::=  BLANK_NODE_LABEL | ANON
    fn name_or_keyword(&mut self) -> Result<Token, TokenizerError> {
        let sparql10 = self.is_sparql10();
        let mut colon_occurred = false;
        let mut trailing_dot = false;
        while let Some(c) = self.state.peek()? {
            match c {
                ':' => {
                    if colon_occurred && sparql10 {
                        return Err(self.state.error(
                            TokenSyntaxErrorKind::UnexpectedCharacter,
                            "Unexpected ':', a QName may only contain one colon in SPARQL 1.0",
                        ));
                    }
                    colon_occurred = true;
                    trailing_dot = false;
                    self.state.consume()?;
                    if self.state.value() == ":" && self.state.peek_is('=')? {
                        return punctuation(&mut self.state, TokenKind::Assignment);
                    }
                }
                '\\' | '%' if colon_occurred && !sparql10 => {
                    trailing_dot = false;
                    handle_complex_local_name_escapes(&mut self.state)?;
                }
                '\\' => {
                    trailing_dot = false;
                    handle_escapes(&mut self.state, EscapeMode::QName)?;
                }
                '%' => {
                    return Err(self
                        .state
                        .unexpected_character('%', "a QName character"));
                }
                c if c == '.' || is_pn_chars(c) => {
                    trailing_dot = c == '.';
                    self.state.consume()?;
                }
                _ => break,
            }
        }
        if trailing_dot {
            self.state.backtrack()?;
        }

        if colon_occurred {
            return self.prefixed_name_or_blank_node();
        }
        let word = self.state.value();
        if word == "a" {
            return Ok(self.state.emit_value(TokenKind::KeywordA));
        }
        if matches!(word, "true" | "false") {
            return Ok(self.state.emit_value(TokenKind::PlainLiteral));
        }
        if word.eq_ignore_ascii_case("base") {
            return self.base_directive();
        }
        if word.eq_ignore_ascii_case("prefix") {
            return Ok(self.state.emit(TokenKind::PrefixDirective, "prefix"));
        }
        if word.eq_ignore_ascii_case("group") {
            return self.multi_word_keyword(&[Keyword::GroupBy]);
        }
        if word.eq_ignore_ascii_case("order") {
            return self.multi_word_keyword(&[Keyword::OrderBy]);
        }
        if word.eq_ignore_ascii_case("not") {
            return self.multi_word_keyword(&[Keyword::NotExists, Keyword::NotIn]);
        }
        let Some(keyword) = Keyword::from_word(word) else {
            let message = format!(
                "The value '{word}' is neither a SPARQL keyword nor a valid QName"
            );
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        };
        if keyword.is_query_form() {
            if sparql10 {
                let message = format!(
                    "Unexpected '{word}', sub-queries are not supported in SPARQL 1.0"
                );
                return Err(self
                    .state
                    .token_error(TokenSyntaxErrorKind::InvalidSyntax, message));
            }
            if keyword != Keyword::Select {
                let message = format!(
                    "Unexpected '{word}', only SELECT may be used as a sub-query"
                );
                return Err(self
                    .state
                    .token_error(TokenSyntaxErrorKind::InvalidSyntax, message));
            }
        }
        if keyword == Keyword::Length && self.syntax != SparqlQuerySyntax::Extended {
            return Err(self.state.token_error(
                TokenSyntaxErrorKind::InvalidSyntax,
                "The LENGTH keyword is only supported by the extended SPARQL syntax",
            ));
        }
        Ok(self
            .state
            .emit(TokenKind::Keyword(keyword), keyword.as_str()))
    }

    fn prefixed_name_or_blank_node(&mut self) -> Result<Token, TokenizerError> {
        let value = self.state.value();
        if value.starts_with("_:") {
            if !is_valid_blank_node(value) {
                let message = format!("The value '{value}' is not valid as a blank node identifier");
                return Err(self
                    .state
                    .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
            }
            return Ok(self.state.emit_value(TokenKind::BlankNodeWithId));
        }
        if !is_valid_sparql_qname(value, self.is_sparql10()) {
            let message = format!("The value '{value}' is not valid as a QName");
            return Err(self
                .state
                .token_error(TokenSyntaxErrorKind::InvalidLiteral, message));
        }
        let value = unescape_local_name(value);
        Ok(self.state.emit(TokenKind::QName, value))
    }

    /// Reads the word following `GROUP`, `ORDER` or `NOT` and matches it against the second word of the candidates.
    ///
    /// White spaces and comments between the two words are skipped.
    fn multi_word_keyword(&mut self, candidates: &[Keyword]) -> Result<Token, TokenizerError> {
        let first_len = self.state.value().len();
        loop {
            self.state.skip_white_space()?;
            if !self.state.peek_is('#')? {
                break;
            }
            while self.state.peek()?.is_some_and(|c| !matches!(c, '\n' | '\r')) {
                self.state.skip()?;
            }
        }
        while self.state.peek()?.is_some_and(char::is_alphabetic) {
            self.state.consume()?;
        }
        let second = &self.state.value()[first_len..];
        let found = candidates.iter().copied().find(|keyword| {
            keyword
                .as_str()
                .split_once(' ')
                .is_some_and(|(_, expected)| expected.eq_ignore_ascii_case(second))
        });
        if let Some(keyword) = found {
            return Ok(self
                .state
                .emit(TokenKind::Keyword(keyword), keyword.as_str()));
        }
        let expected = candidates
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        let message = format!(
            "Unexpected content '{}' while trying to parse a {expected} keyword",
            self.state.value()
        );
        Err(self
            .state
            .token_error(TokenSyntaxErrorKind::InvalidSyntax, message))
    }
}

impl<S: CharSource> Tokenizer for SparqlTokenizer<S> {
    fn next_token(&mut self) -> Result<Token, TokenizerError> {
        if let Some(bof) = self.state.enter()? {
            return Ok(bof);
        }
        match self.state.last_token_kind() {
            Some(TokenKind::PrefixDirective) => self.prefix(),
            Some(TokenKind::HatHat) => self.datatype(),
            _ if !self.query_keyword_seen => self.prologue_or_query_keyword(),
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

#[cfg(test)]
mod tests {
    #![allow(clippy::panic_in_result_fn)]

    use super::*;

    fn tokenize(
        input: &str,
        syntax: SparqlQuerySyntax,
    ) -> Result<Vec<(TokenKind, String)>, TokenizerError> {
        SparqlTokenizer::for_str(input)
            .with_syntax(syntax)
            .tokens()
            .map(|t| t.map(|t| (t.kind(), t.into_value())))
            .collect()
    }

    fn kinds(input: &str) -> Result<Vec<TokenKind>, TokenizerError> {
        Ok(tokenize(input, SparqlQuerySyntax::Sparql11)?
            .into_iter()
            .map(|(k, _)| k)
            .collect())
    }

    fn error_kind(input: &str, syntax: SparqlQuerySyntax) -> Option<TokenSyntaxErrorKind> {
        tokenize(input, syntax).err().and_then(|e| e.syntax_kind())
    }

    #[test]
    fn select_all() -> Result<(), TokenizerError> {
        assert_eq!(
            kinds("SELECT * WHERE { }")?,
            [
                TokenKind::Bof,
                TokenKind::Keyword(Keyword::Select),
                TokenKind::All,
                TokenKind::Keyword(Keyword::Where),
                TokenKind::LeftCurlyBracket,
                TokenKind::RightCurlyBracket,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("select distinct * {} ")?[1..4],
            [
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::Distinct),
                TokenKind::All,
            ]
        );
        Ok(())
    }

    #[test]
    fn prologue() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize(
                "BASE <http://example.com/>\n# prefixes\nPREFIX ex: <http://example.com/ns#>\nASK { ?s ex:p ?o }",
                SparqlQuerySyntax::Sparql11
            )?[1..],
            [
                (TokenKind::BaseDirective, "base".into()),
                (TokenKind::Uri, "http://example.com/".into()),
                (TokenKind::Comment, "# prefixes".into()),
                (TokenKind::PrefixDirective, "prefix".into()),
                (TokenKind::Prefix, "ex:".into()),
                (TokenKind::Uri, "http://example.com/ns#".into()),
                (TokenKind::Keyword(Keyword::Ask), "ASK".into()),
                (TokenKind::LeftCurlyBracket, "{".into()),
                (TokenKind::Variable, "?s".into()),
                (TokenKind::QName, "ex:p".into()),
                (TokenKind::Variable, "?o".into()),
                (TokenKind::RightCurlyBracket, "}".into()),
                (TokenKind::Eof, String::new()),
            ]
        );
        assert_eq!(
            error_kind("BASE <a> BASE <b> SELECT", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        assert_eq!(
            error_kind("WHERE { }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        assert_eq!(
            error_kind("BASE SELECT", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        assert_eq!(
            error_kind("PREFIX ex <a>", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidLiteral)
        );
        assert_eq!(kinds("  ")?, [TokenKind::Bof, TokenKind::Eof]);
        Ok(())
    }

    #[test]
    fn updates() -> Result<(), TokenizerError> {
        assert_eq!(
            kinds("INSERT DATA { <a> <b> <c> } ;\nPREFIX ex: <http://example.com/> DELETE WHERE { ?s ex:p ?o }")?,
            [
                TokenKind::Bof,
                TokenKind::Keyword(Keyword::Insert),
                TokenKind::Keyword(Keyword::Data),
                TokenKind::LeftCurlyBracket,
                TokenKind::Uri,
                TokenKind::Uri,
                TokenKind::Uri,
                TokenKind::RightCurlyBracket,
                TokenKind::Semicolon,
                TokenKind::PrefixDirective,
                TokenKind::Prefix,
                TokenKind::Uri,
                TokenKind::Keyword(Keyword::Delete),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::LeftCurlyBracket,
                TokenKind::Variable,
                TokenKind::QName,
                TokenKind::Variable,
                TokenKind::RightCurlyBracket,
                TokenKind::Eof,
            ]
        );
        Ok(())
    }

    #[test]
    fn multi_word_keywords() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize(
                "SELECT ?x { FILTER NOT  EXISTS {} FILTER(?x not in (1)) } GROUP BY ?x order\nby ?x",
                SparqlQuerySyntax::Sparql11
            )?
            .into_iter()
            .filter(|(k, _)| matches!(k, TokenKind::Keyword(_)))
            .collect::<Vec<_>>(),
            [
                (TokenKind::Keyword(Keyword::Select), "SELECT".into()),
                (TokenKind::Keyword(Keyword::Filter), "FILTER".into()),
                (TokenKind::Keyword(Keyword::NotExists), "NOT EXISTS".into()),
                (TokenKind::Keyword(Keyword::Filter), "FILTER".into()),
                (TokenKind::Keyword(Keyword::NotIn), "NOT IN".into()),
                (TokenKind::Keyword(Keyword::GroupBy), "GROUP BY".into()),
                (TokenKind::Keyword(Keyword::OrderBy), "ORDER BY".into()),
            ]
        );
        assert_eq!(
            tokenize(
                "SELECT * {} GROUP # by subject\n  BY ?s ORDER # then\n# by name\nBY ?n",
                SparqlQuerySyntax::Sparql11
            )?[5..],
            [
                (TokenKind::Keyword(Keyword::GroupBy), "GROUP BY".into()),
                (TokenKind::Variable, "?s".into()),
                (TokenKind::Keyword(Keyword::OrderBy), "ORDER BY".into()),
                (TokenKind::Variable, "?n".into()),
                (TokenKind::Eof, String::new()),
            ]
        );
        assert_eq!(
            error_kind("SELECT * {} GROUP ?x", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        assert_eq!(
            error_kind("SELECT * {} GROUP # by", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        assert_eq!(
            error_kind("SELECT * { FILTER NOT BOUND(?x) }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        Ok(())
    }

    #[test]
    fn multi_word_keyword_span() -> Result<(), TokenizerError> {
        let mut tokenizer = SparqlTokenizer::for_str("SELECT * {} ORDER\n  BY ?x");
        let token = loop {
            let token = tokenizer.next_token()?;
            if token.kind() == TokenKind::Keyword(Keyword::OrderBy) {
                break token;
            }
        };
        assert_eq!(token.span().start_line, 1);
        assert_eq!(token.span().start_column, 13);
        assert_eq!(token.span().end_line, 2);
        assert_eq!(token.span().end_column, 4);
        Ok(())
    }

    #[test]
    fn operators() -> Result<(), TokenizerError> {
        assert_eq!(
            kinds("SELECT (?a * 2 / 3 AS ?b) { FILTER(?a <= ?b && ?c != -1 || !?d) FILTER(?a < ?b) ?a <p>|^<q>+ ?e }")?[1..],
            [
                TokenKind::Keyword(Keyword::Select),
                TokenKind::LeftBracket,
                TokenKind::Variable,
                TokenKind::Multiply,
                TokenKind::PlainLiteral,
                TokenKind::Divide,
                TokenKind::PlainLiteral,
                TokenKind::Keyword(Keyword::As),
                TokenKind::Variable,
                TokenKind::RightBracket,
                TokenKind::LeftCurlyBracket,
                TokenKind::Keyword(Keyword::Filter),
                TokenKind::LeftBracket,
                TokenKind::Variable,
                TokenKind::LessThanOrEqualTo,
                TokenKind::Variable,
                TokenKind::And,
                TokenKind::Variable,
                TokenKind::NotEquals,
                TokenKind::PlainLiteral,
                TokenKind::Or,
                TokenKind::Negation,
                TokenKind::Variable,
                TokenKind::RightBracket,
                TokenKind::Keyword(Keyword::Filter),
                TokenKind::LeftBracket,
                TokenKind::Variable,
                TokenKind::LessThan,
                TokenKind::Variable,
                TokenKind::RightBracket,
                TokenKind::Variable,
                TokenKind::Uri,
                TokenKind::BitwiseOr,
                TokenKind::Hat,
                TokenKind::Uri,
                TokenKind::Plus,
                TokenKind::Variable,
                TokenKind::RightCurlyBracket,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("SELECT * { ?a >= ?b . ?c > 1 . LET (?x := 2) }")?[5..],
            [
                TokenKind::GreaterThanOrEqualTo,
                TokenKind::Variable,
                TokenKind::Dot,
                TokenKind::Variable,
                TokenKind::GreaterThan,
                TokenKind::PlainLiteral,
                TokenKind::Dot,
                TokenKind::Keyword(Keyword::Let),
                TokenKind::LeftBracket,
                TokenKind::Variable,
                TokenKind::Assignment,
                TokenKind::PlainLiteral,
                TokenKind::RightBracket,
                TokenKind::RightCurlyBracket,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            error_kind("SELECT * { FILTER(?a & ?b) }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            error_kind("SELECT * { FILTER(?a <=?b) }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        Ok(())
    }

    #[test]
    fn sub_queries() -> Result<(), TokenizerError> {
        assert_eq!(
            kinds("SELECT * { { SELECT ?x {} } }")?[5],
            TokenKind::Keyword(Keyword::Select)
        );
        assert_eq!(
            error_kind("SELECT * { { SELECT ?x {} } }", SparqlQuerySyntax::Sparql10),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        assert_eq!(
            error_kind("SELECT * { { ASK {} } }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        Ok(())
    }

    #[test]
    fn extension_keywords() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize("SELECT (LENGTH(?x) AS ?l) {}", SparqlQuerySyntax::Extended)?[3],
            (TokenKind::Keyword(Keyword::Length), "LENGTH".into())
        );
        assert_eq!(
            error_kind("SELECT (LENGTH(?x) AS ?l) {}", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidSyntax)
        );
        Ok(())
    }

    #[test]
    fn prefixed_names() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize("ASK { ex:a\\.b :c. ex:d:e _:b1 a true }", SparqlQuerySyntax::Sparql11)?[3..10],
            [
                (TokenKind::QName, "ex:a.b".into()),
                (TokenKind::QName, ":c".into()),
                (TokenKind::Dot, ".".into()),
                (TokenKind::QName, "ex:d:e".into()),
                (TokenKind::BlankNodeWithId, "_:b1".into()),
                (TokenKind::KeywordA, "a".into()),
                (TokenKind::PlainLiteral, "true".into()),
            ]
        );
        assert_eq!(
            error_kind("ASK { ex:d:e }", SparqlQuerySyntax::Sparql10),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            error_kind("ASK { ex:a\\.b }", SparqlQuerySyntax::Sparql10),
            Some(TokenSyntaxErrorKind::InvalidEscape)
        );
        // a '.' written as \u002E is never a statement terminator
        assert_eq!(
            error_kind("ASK { ?s ex:a\\u002E ?o }", SparqlQuerySyntax::Sparql10),
            Some(TokenSyntaxErrorKind::InvalidLiteral)
        );
        assert_eq!(
            error_kind("ASK { _: }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidLiteral)
        );
        assert_eq!(
            error_kind("ASK { foo }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidLiteral)
        );
        Ok(())
    }

    #[test]
    fn variables() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize("ASK { ?x $y <p>? ?z-1 }", SparqlQuerySyntax::Sparql11)?[3..9],
            [
                (TokenKind::Variable, "?x".into()),
                (TokenKind::Variable, "$y".into()),
                (TokenKind::Uri, "p".into()),
                (TokenKind::Question, "?".into()),
                (TokenKind::Variable, "?z".into()),
                (TokenKind::PlainLiteral, "-1".into()),
            ]
        );
        assert_eq!(
            error_kind("ASK { $ }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::InvalidLiteral)
        );
        Ok(())
    }

    #[test]
    fn numbers() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize("ASK { ?s ?p 1. }", SparqlQuerySyntax::Sparql11)?[5..7],
            [
                (TokenKind::PlainLiteral, "1".into()),
                (TokenKind::Dot, ".".into()),
            ]
        );
        assert_eq!(
            tokenize("ASK { ?s ?p 1. }", SparqlQuerySyntax::Sparql10)?[5..7],
            [
                (TokenKind::PlainLiteral, "1.".into()),
                (TokenKind::RightCurlyBracket, "}".into()),
            ]
        );
        assert_eq!(
            tokenize("ASK { ?s ?p .5, +2.5e-3 }", SparqlQuerySyntax::Sparql11)?[5..8],
            [
                (TokenKind::PlainLiteral, ".5".into()),
                (TokenKind::Comma, ",".into()),
                (TokenKind::PlainLiteral, "+2.5e-3".into()),
            ]
        );
        Ok(())
    }

    #[test]
    fn literals() -> Result<(), TokenizerError> {
        assert_eq!(
            tokenize(
                "ASK { ?s ?p 'it\\'s', \"\"\"a\n\"b\"\"\"\"\", \"1\"^^xsd:int, \"x\"@en-GB, \"y\"^^ <http://example.com/d> }",
                SparqlQuerySyntax::Sparql11
            )?[5..18],
            [
                (TokenKind::Literal, "it's".into()),
                (TokenKind::Comma, ",".into()),
                (TokenKind::LongLiteral, "a\n\"b\"\"".into()),
                (TokenKind::Comma, ",".into()),
                (TokenKind::Literal, "1".into()),
                (TokenKind::HatHat, "^^".into()),
                (TokenKind::QName, "xsd:int".into()),
                (TokenKind::Comma, ",".into()),
                (TokenKind::Literal, "x".into()),
                (TokenKind::LangSpec, "en-GB".into()),
                (TokenKind::Comma, ",".into()),
                (TokenKind::Literal, "y".into()),
                (TokenKind::HatHat, "^^".into()),
            ]
        );
        assert_eq!(
            error_kind("ASK { ?s ?p \"1\"^^?x }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            error_kind("ASK { ?s ?p \"1\"^^true }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::UnexpectedToken)
        );
        assert_eq!(
            error_kind("ASK { ?s ?p 1@en }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
        assert_eq!(
            error_kind("ASK { ?s ?p 'a\nb' }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::UnexpectedNewLine)
        );
        Ok(())
    }

    #[test]
    fn uris_do_not_allow_white_space() {
        assert_eq!(
            error_kind("ASK { <http://example.com/ a> }", SparqlQuerySyntax::Sparql11),
            Some(TokenSyntaxErrorKind::UnexpectedCharacter)
        );
    }
}
