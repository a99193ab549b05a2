use crate::token::{Token, TokenKind};
use crate::toolkit::TokenizerError;

/// A pull based tokenizer.
///
/// The first call to [`next_token`](Tokenizer::next_token) returns a [`TokenKind::Bof`] token, then one token is returned per call in input order and the stream ends with exactly one [`TokenKind::Eof`] token.
/// Tokens returned after EOF are unspecified.
///
/// Any error is fatal: the tokenizer closes its input and all later calls fail.
pub trait Tokenizer {
    /// Reads the next token.
    fn next_token(&mut self) -> Result<Token, TokenizerError>;

    /// The kind of the last returned token, `None` before the first call.
    fn last_token_kind(&self) -> Option<TokenKind>;

    /// A human readable name of the tokenized format.
    fn format(&self) -> &'static str;

    /// Iterates on the tokens from BOF to EOF included.
    ///
    /// The iterator stops after EOF or after the first error.
    ///
    /// ```
    /// use oxtok::{TokenKind, Tokenizer, TurtleTokenizer};
    ///
    /// let kinds = TurtleTokenizer::for_str("\"hello\"@en")
    ///     .tokens()
    ///     .map(|t| t.map(|t| t.kind()))
    ///     .collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(
    ///     kinds,
    ///     [TokenKind::Bof, TokenKind::Literal, TokenKind::LangSpec, TokenKind::Eof]
    /// );
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    fn tokens(self) -> TokenIterator<Self>
    where
        Self: Sized,
    {
        TokenIterator {
            tokenizer: self,
            done: false,
        }
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    #[inline]
    fn next_token(&mut self) -> Result<Token, TokenizerError> {
        (**self).next_token()
    }

    #[inline]
    fn last_token_kind(&self) -> Option<TokenKind> {
        (**self).last_token_kind()
    }

    #[inline]
    fn format(&self) -> &'static str {
        (**self).format()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &mut T {
    #[inline]
    fn next_token(&mut self) -> Result<Token, TokenizerError> {
        (**self).next_token()
    }

    #[inline]
    fn last_token_kind(&self) -> Option<TokenKind> {
        (**self).last_token_kind()
    }

    #[inline]
    fn format(&self) -> &'static str {
        (**self).format()
    }
}

/// Iterator on the tokens of a [`Tokenizer`] returned by [`Tokenizer::tokens`].
#[must_use]
pub struct TokenIterator<T> {
    tokenizer: T,
    done: bool,
}

impl<T> TokenIterator<T> {
    pub fn into_inner(self) -> T {
        self.tokenizer
    }
}

impl<T: Tokenizer> Iterator for TokenIterator<T> {
    type Item = Result<Token, TokenizerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.tokenizer.next_token();
        self.done = !result
            .as_ref()
            .is_ok_and(|token| token.kind() != TokenKind::Eof);
        Some(result)
    }
}
