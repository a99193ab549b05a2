use crate::token::{Token, TokenKind, TokenSpan};
use crate::toolkit::error::{TextPosition, TokenSyntaxError, TokenSyntaxErrorKind, TokenizerError};
use crate::toolkit::source::CharSource;
use std::mem::take;
use tracing::{debug, trace};

/// The character level state shared by all tokenizers.
///
/// It owns the character source, the text of the token being built, its start and end positions and the current position in the input.
/// A single character of lookahead correction is allowed via [`LexerState::backtrack`].
pub struct LexerState<S: CharSource> {
    source: S,
    format: &'static str,
    buffer: String,
    start: TextPosition,
    end: TextPosition,
    current: TextPosition,
    pushback: Option<char>,
    last_token_kind: Option<TokenKind>,
    closed: bool,
}

impl<S: CharSource> LexerState<S> {
    pub fn new(source: S, format: &'static str) -> Self {
        Self {
            source,
            format,
            buffer: String::new(),
            start: TextPosition::START,
            end: TextPosition::START,
            current: TextPosition::START,
            pushback: None,
            last_token_kind: None,
            closed: false,
        }
    }

    /// Must be called at the beginning of each `next_token` call.
    ///
    /// Returns the BOF token on the first call and fails if a previous error closed the input.
    pub fn enter(&mut self) -> Result<Option<Token>, TokenizerError> {
        if self.closed {
            return Err(TokenSyntaxError::closed(self.format, self.current).into());
        }
        if self.last_token_kind.is_none() {
            self.last_token_kind = Some(TokenKind::Bof);
            let token = Token::bof();
            trace!("{} token {}", self.format, token);
            return Ok(Some(token));
        }
        self.start_new_token();
        Ok(None)
    }

    pub fn format(&self) -> &'static str {
        self.format
    }

    /// The kind of the last emitted token, `None` before BOF.
    #[inline]
    pub fn last_token_kind(&self) -> Option<TokenKind> {
        self.last_token_kind
    }

    #[inline]
    pub fn last_token_is(&self, kind: TokenKind) -> bool {
        self.last_token_kind == Some(kind)
    }

    #[inline]
    pub fn last_token_is_quoted_literal(&self) -> bool {
        self.last_token_kind.is_some_and(TokenKind::is_quoted_literal)
    }

    /// Clears the token text and sets the token start to the current position.
    pub fn start_new_token(&mut self) {
        self.buffer.clear();
        self.start = self.current;
        self.end = self.current;
    }

    /// The token text accumulated since the last [`LexerState::start_new_token`].
    #[inline]
    pub fn value(&self) -> &str {
        &self.buffer
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Length of the token text in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    #[inline]
    pub fn take_value(&mut self) -> String {
        take(&mut self.buffer)
    }

    #[cfg(test)]
    pub fn current(&self) -> TextPosition {
        self.current
    }

    /// The next character, the pending backtracked one first.
    pub fn peek(&mut self) -> Result<Option<char>, TokenizerError> {
        if let Some(c) = self.pushback {
            return Ok(Some(c));
        }
        Ok(self.source.peek()?)
    }

    #[inline]
    pub fn peek_is(&mut self, expected: char) -> Result<bool, TokenizerError> {
        Ok(self.peek()? == Some(expected))
    }

    fn read(&mut self) -> Result<Option<char>, TokenizerError> {
        if let Some(c) = self.pushback.take() {
            return Ok(Some(c));
        }
        Ok(self.source.read()?)
    }

    fn advance(&mut self) {
        self.end = self.current;
        self.current.column += 1;
    }

    /// Reads the next character and appends it to the token text.
    pub fn consume(&mut self) -> Result<char, TokenizerError> {
        let Some(c) = self.read()? else {
            return Err(self.unexpected_end_of_input("a token"));
        };
        self.buffer.push(c);
        self.advance();
        Ok(c)
    }

    /// Reads the next character without adding it to the token text.
    pub fn skip(&mut self) -> Result<char, TokenizerError> {
        let Some(c) = self.read()? else {
            return Err(self.unexpected_end_of_input("a token"));
        };
        self.advance();
        Ok(c)
    }

    /// Appends a character that is not read from the input (e.g. a decoded escape sequence).
    #[inline]
    pub fn push_output(&mut self, c: char) {
        self.buffer.push(c);
    }

    /// Pushes the last character of the token text back into the input.
    pub fn backtrack(&mut self) -> Result<(), TokenizerError> {
        if self.pushback.is_some() {
            return Err(self.error(
                TokenSyntaxErrorKind::Backtrack,
                "Cannot backtrack more than one character",
            ));
        }
        let Some(c) = self.buffer.pop() else {
            return Err(self.error(
                TokenSyntaxErrorKind::Backtrack,
                "Cannot backtrack when no characters have been consumed",
            ));
        };
        if matches!(c, '\n' | '\r') {
            return Err(self.error(
                TokenSyntaxErrorKind::Backtrack,
                "Cannot backtrack over a new line",
            ));
        }
        self.pushback = Some(c);
        self.current.column = self.current.column.saturating_sub(1).max(1);
        self.end = if self.buffer.is_empty() {
            self.start
        } else {
            TextPosition {
                line: self.current.line,
                column: self.current.column.saturating_sub(1).max(1),
            }
        };
        Ok(())
    }

    /// Reads a new line: `\n`, `\r`, `\n\r` or `\r\n`.
    ///
    /// The line counter is incremented and the column counter reset.
    pub fn consume_new_line(
        &mut self,
        as_output: bool,
        allow_eof: bool,
    ) -> Result<(), TokenizerError> {
        let c = match self.peek()? {
            Some(c @ ('\n' | '\r')) => c,
            None if allow_eof => return Ok(()),
            None => return Err(self.unexpected_end_of_input("a new line")),
            Some(c) => return Err(self.unexpected_character(c, "a new line")),
        };
        self.read()?;
        if as_output {
            self.buffer.push(c);
        }
        self.end = self.current;
        let pair = if c == '\n' { '\r' } else { '\n' };
        if self.peek_is(pair)? {
            self.read()?;
            if as_output {
                self.buffer.push(pair);
            }
        }
        self.current.line += 1;
        self.current.column = 1;
        Ok(())
    }

    /// Skips white spaces without starting a new token.
    pub fn skip_white_space(&mut self) -> Result<(), TokenizerError> {
        loop {
            match self.peek()? {
                Some('\n' | '\r') => self.consume_new_line(false, false)?,
                Some(c) if c.is_whitespace() => {
                    self.read()?;
                    self.current.column += 1;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skips white spaces and starts a new token after them.
    pub fn discard_white_space(&mut self) -> Result<(), TokenizerError> {
        self.skip_white_space()?;
        self.start_new_token();
        Ok(())
    }

    /// Builds a token spanning from the token start to the last consumed character.
    pub fn token(&self, kind: TokenKind, value: impl Into<String>) -> Token {
        let token = Token::new(kind, value, TokenSpan::new(self.start, self.end));
        trace!("{} token {}", self.format, token);
        token
    }

    /// Same as [`LexerState::token`] but also records the token kind as the last emitted one.
    pub fn emit(&mut self, kind: TokenKind, value: impl Into<String>) -> Token {
        self.last_token_kind = Some(kind);
        self.token(kind, value)
    }

    /// Emits a token whose value is the accumulated token text.
    pub fn emit_value(&mut self, kind: TokenKind) -> Token {
        let value = self.take_value();
        self.emit(kind, value)
    }

    /// Emits a token whose value is the accumulated text without `prefix_len` leading and `suffix_len` trailing characters.
    pub fn emit_trimmed(&mut self, kind: TokenKind, prefix_len: usize, suffix_len: usize) -> Token {
        let value = self.take_value();
        let count = value.chars().count();
        let value = if count >= prefix_len + suffix_len {
            value
                .chars()
                .skip(prefix_len)
                .take(count - prefix_len - suffix_len)
                .collect::<String>()
        } else {
            String::new()
        };
        self.emit(kind, value)
    }

    pub fn emit_eof(&mut self) -> Token {
        self.start = self.current;
        self.end = self.current;
        self.emit(TokenKind::Eof, "")
    }

    /// Emits EOF if the input is exhausted and no token is in progress.
    ///
    /// Fails if the input ends in the middle of a token.
    pub fn eof_or_fail(&mut self, production: &str) -> Result<Token, TokenizerError> {
        if self.buffer.is_empty() {
            Ok(self.emit_eof())
        } else {
            Err(self.unexpected_end_of_input(production))
        }
    }

    fn fail(
        &mut self,
        kind: TokenSyntaxErrorKind,
        start: TextPosition,
        end: TextPosition,
        message: String,
    ) -> TokenizerError {
        debug!(
            "{} tokenizer error at line {} column {}: {}",
            self.format, end.line, end.column, message
        );
        self.closed = true;
        self.pushback = None;
        self.source.close();
        TokenSyntaxError::new(kind, start..end, message).into()
    }

    /// A generic error at the current position.
    pub fn error(
        &mut self,
        kind: TokenSyntaxErrorKind,
        message: impl Into<String>,
    ) -> TokenizerError {
        self.fail(kind, self.current, self.current, message.into())
    }

    /// An error about the token being built, located on its span.
    pub fn token_error(
        &mut self,
        kind: TokenSyntaxErrorKind,
        message: impl Into<String>,
    ) -> TokenizerError {
        self.fail(kind, self.start, self.end, message.into())
    }

    pub fn unexpected_character(&mut self, c: char, expected: &str) -> TokenizerError {
        let mut message = format!(
            "Unexpected character '{}' (code {}) encountered",
            c.escape_default(),
            u32::from(c)
        );
        if !expected.is_empty() {
            message.push_str(", expected ");
            message.push_str(expected);
        }
        self.fail(
            TokenSyntaxErrorKind::UnexpectedCharacter,
            self.current,
            self.current,
            message,
        )
    }

    pub fn unexpected_end_of_input(&mut self, production: &str) -> TokenizerError {
        let message = self.with_content(format!(
            "Unexpected end of input while trying to parse {production}"
        ));
        self.fail(
            TokenSyntaxErrorKind::UnexpectedEndOfInput,
            self.start,
            self.current,
            message,
        )
    }

    pub fn unexpected_new_line(&mut self, production: &str) -> TokenizerError {
        let message = self.with_content(format!(
            "Unexpected new line while trying to parse {production}"
        ));
        self.fail(
            TokenSyntaxErrorKind::UnexpectedNewLine,
            self.start,
            self.current,
            message,
        )
    }

    pub fn unexpected_token(&mut self, expected: &str, token: &Token) -> TokenizerError {
        let message = format!(
            "Unexpected {} token '{}' encountered, expected {expected}",
            token.kind(),
            token.value()
        );
        let span = token.span();
        self.fail(
            TokenSyntaxErrorKind::UnexpectedToken,
            span.start(),
            span.end(),
            message,
        )
    }

    fn with_content(&self, mut message: String) -> String {
        if !self.buffer.trim().is_empty() {
            message.push_str(" from content: ");
            message.push_str(&self.buffer);
        }
        message
    }
}
