//! Token queues on top of a [`Tokenizer`] with several buffering strategies.
//!
//! All queues drop [`TokenKind::Comment`] tokens.

use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::toolkit::{TextPosition, TokenSyntaxError, TokenizerError};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread;
use tracing::debug;

/// The default number of tokens read ahead by [`BufferedTokenQueue`] and [`AsyncTokenQueue`].
pub const DEFAULT_BUFFER_SIZE: usize = 10;

/// A FIFO of tokens usually filled from a [`Tokenizer`].
pub trait TokenQueue {
    /// Removes and returns the next token, `None` if the queue is exhausted.
    fn dequeue(&mut self) -> Result<Option<Token>, TokenizerError>;

    /// Returns the next token without removing it.
    fn peek(&mut self) -> Result<Option<&Token>, TokenizerError>;

    /// Adds a token at the end of the queue.
    fn enqueue(&mut self, token: Token);

    /// Removes all the buffered tokens.
    fn clear(&mut self);

    /// Fills the buffer according to the queue strategy.
    fn initialise_buffer(&mut self) -> Result<(), TokenizerError>;

    /// Number of buffered tokens.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The kind of the last token returned by [`dequeue`](TokenQueue::dequeue).
    fn last_token_kind(&self) -> Option<TokenKind>;

    /// The buffered tokens.
    fn tokens(&self) -> &VecDeque<Token>;

    fn is_tracing(&self) -> bool;

    /// When enabled each buffered token is logged as a `debug` event.
    fn set_tracing(&mut self, tracing: bool);
}

#[derive(Default)]
struct TokenBuffer {
    tokens: VecDeque<Token>,
    last_token_kind: Option<TokenKind>,
    tracing: bool,
}

impl TokenBuffer {
    fn push(&mut self, token: Token) {
        if token.kind() == TokenKind::Comment {
            return;
        }
        if self.tracing {
            debug!("{token}");
        }
        self.tokens.push_back(token);
    }

    fn pop(&mut self) -> Option<Token> {
        let token = self.tokens.pop_front()?;
        self.last_token_kind = Some(token.kind());
        Some(token)
    }

    fn clear(&mut self) {
        self.tokens.clear();
        self.last_token_kind = None;
    }
}

macro_rules! delegate_to_buffer {
    () => {
        fn enqueue(&mut self, token: Token) {
            self.buffer.push(token);
        }

        #[inline]
        fn len(&self) -> usize {
            self.buffer.tokens.len()
        }

        #[inline]
        fn last_token_kind(&self) -> Option<TokenKind> {
            self.buffer.last_token_kind
        }

        #[inline]
        fn tokens(&self) -> &VecDeque<Token> {
            &self.buffer.tokens
        }

        #[inline]
        fn is_tracing(&self) -> bool {
            self.buffer.tracing
        }

        #[inline]
        fn set_tracing(&mut self, tracing: bool) {
            self.buffer.tracing = tracing;
        }
    };
}

/// A queue that is never filled from a tokenizer, only by [`enqueue`](TokenQueue::enqueue).
///
/// ```
/// use oxtok::{ExplicitTokenQueue, Token, TokenQueue};
///
/// let mut queue = ExplicitTokenQueue::new();
/// queue.enqueue(Token::bof());
/// assert_eq!(queue.len(), 1);
/// assert_eq!(queue.dequeue()?, Some(Token::bof()));
/// assert_eq!(queue.dequeue()?, None);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default)]
pub struct ExplicitTokenQueue {
    buffer: TokenBuffer,
}

impl ExplicitTokenQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenQueue for ExplicitTokenQueue {
    fn dequeue(&mut self) -> Result<Option<Token>, TokenizerError> {
        Ok(self.buffer.pop())
    }

    fn peek(&mut self) -> Result<Option<&Token>, TokenizerError> {
        Ok(self.buffer.tokens.front())
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn initialise_buffer(&mut self) -> Result<(), TokenizerError> {
        Ok(())
    }

    delegate_to_buffer!();
}

/// A queue that reads the whole input up to EOF before serving the first token.
///
/// If the tokenizer fails, the tokens read before the error stay buffered and the next reads return a [`Closed`](crate::TokenSyntaxErrorKind::Closed) error.
pub struct EagerTokenQueue<T: Tokenizer> {
    tokenizer: T,
    buffer: TokenBuffer,
    initialised: bool,
}

impl<T: Tokenizer> EagerTokenQueue<T> {
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer,
            buffer: TokenBuffer::default(),
            initialised: false,
        }
    }

    #[inline]
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Replaces the tokenizer and clears the queue.
    pub fn set_tokenizer(&mut self, tokenizer: T) {
        self.tokenizer = tokenizer;
        self.clear();
    }

}

impl<T: Tokenizer> TokenQueue for EagerTokenQueue<T> {
    fn dequeue(&mut self) -> Result<Option<Token>, TokenizerError> {
        self.initialise_buffer()?;
        Ok(self.buffer.pop())
    }

    fn peek(&mut self) -> Result<Option<&Token>, TokenizerError> {
        self.initialise_buffer()?;
        Ok(self.buffer.tokens.front())
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.initialised = false;
    }

    /// Reads up to EOF. Does nothing once EOF has been buffered.
    fn initialise_buffer(&mut self) -> Result<(), TokenizerError> {
        if self.initialised {
            return Ok(());
        }
        loop {
            let token = self.tokenizer.next_token()?;
            let is_eof = token.kind() == TokenKind::Eof;
            self.buffer.push(token);
            if is_eof {
                self.initialised = true;
                return Ok(());
            }
        }
    }

    delegate_to_buffer!();
}

/// A queue that reads a bounded number of tokens ahead each time it runs empty.
///
/// ```
/// use oxtok::{BufferedTokenQueue, TokenKind, TokenQueue, TurtleTokenizer};
///
/// let mut queue =
///     BufferedTokenQueue::new(TurtleTokenizer::for_str("<s> <p> <o> . # done")).with_buffer_size(2);
/// queue.initialise_buffer()?;
/// assert_eq!(queue.len(), 2);
/// let mut kinds = Vec::new();
/// while let Some(token) = queue.dequeue()? {
///     kinds.push(token.kind());
/// }
/// assert_eq!(kinds.len(), 6);
/// assert_eq!(queue.last_token_kind(), Some(TokenKind::Eof));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct BufferedTokenQueue<T: Tokenizer> {
    tokenizer: T,
    buffer: TokenBuffer,
    buffer_size: usize,
    finished: bool,
}

impl<T: Tokenizer> BufferedTokenQueue<T> {
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer,
            buffer: TokenBuffer::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            finished: false,
        }
    }

    /// Sets the number of tokens read ahead. A size of 0 is read as 1.
    #[inline]
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    #[inline]
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Replaces the tokenizer and clears the queue.
    pub fn set_tokenizer(&mut self, tokenizer: T) {
        self.tokenizer = tokenizer;
        self.clear();
    }

    fn fill_if_empty(&mut self) -> Result<(), TokenizerError> {
        if self.buffer.tokens.is_empty() {
            self.initialise_buffer()?;
        }
        Ok(())
    }
}

impl<T: Tokenizer> TokenQueue for BufferedTokenQueue<T> {
    fn dequeue(&mut self) -> Result<Option<Token>, TokenizerError> {
        self.fill_if_empty()?;
        Ok(self.buffer.pop())
    }

    fn peek(&mut self) -> Result<Option<&Token>, TokenizerError> {
        self.fill_if_empty()?;
        Ok(self.buffer.tokens.front())
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.finished = false;
    }

    fn initialise_buffer(&mut self) -> Result<(), TokenizerError> {
        while !self.finished && self.buffer.tokens.len() < self.buffer_size {
            let token = self.tokenizer.next_token()?;
            self.finished = token.kind() == TokenKind::Eof;
            self.buffer.push(token);
        }
        Ok(())
    }

    delegate_to_buffer!();
}

/// A queue filled by a background thread that owns the tokenizer.
///
/// The thread is started by [`initialise_buffer`](TokenQueue::initialise_buffer) or the first read and stays at most `buffer_size` tokens ahead of the consumer.
/// Dropping the queue stops the thread the next time it tries to hand over a token.
/// After the tokenizer failed, the next reads return a [`Closed`](crate::TokenSyntaxErrorKind::Closed) error like the other queues.
pub struct AsyncTokenQueue<T: Tokenizer + Send + 'static> {
    tokenizer: Option<T>,
    format: &'static str,
    receiver: Option<Receiver<Result<Token, TokenizerError>>>,
    buffer: TokenBuffer,
    buffer_size: usize,
    position: TextPosition,
    closed: Option<TextPosition>,
}

impl<T: Tokenizer + Send + 'static> AsyncTokenQueue<T> {
    pub fn new(tokenizer: T) -> Self {
        Self {
            format: tokenizer.format(),
            tokenizer: Some(tokenizer),
            receiver: None,
            buffer: TokenBuffer::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            position: TextPosition::default(),
            closed: None,
        }
    }

    /// Sets the capacity of the channel between the background thread and the queue. A size of 0 is read as 1.
    #[inline]
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// The tokenizer, `None` once it has been moved to the background thread.
    #[inline]
    pub fn tokenizer(&self) -> Option<&T> {
        self.tokenizer.as_ref()
    }

    /// Replaces the tokenizer and clears the queue.
    ///
    /// A running background thread is disconnected and stops on its own.
    pub fn set_tokenizer(&mut self, tokenizer: T) {
        self.format = tokenizer.format();
        self.tokenizer = Some(tokenizer);
        self.position = TextPosition::default();
        self.closed = None;
        self.clear();
    }

    fn start(&mut self) {
        let Some(tokenizer) = self.tokenizer.take() else {
            return;
        };
        let (sender, receiver) = sync_channel(self.buffer_size);
        self.receiver = Some(receiver);
        thread::spawn(move || produce(tokenizer, &sender));
    }

    fn fill_if_empty(&mut self) -> Result<(), TokenizerError> {
        if !self.buffer.tokens.is_empty() {
            return Ok(());
        }
        if let Some(position) = self.closed {
            return Err(TokenSyntaxError::closed(self.format, position).into());
        }
        if self.receiver.is_none() {
            self.start();
        }
        while self.buffer.tokens.is_empty() {
            let Some(receiver) = &self.receiver else {
                return Ok(());
            };
            match receiver.recv() {
                Ok(Ok(token)) => {
                    if token.kind() == TokenKind::Eof {
                        self.receiver = None;
                    }
                    self.position = token.span().end();
                    self.buffer.push(token);
                }
                Ok(Err(e)) => {
                    self.receiver = None;
                    self.closed = Some(match &e {
                        TokenizerError::Syntax(e) => e.location().end,
                        TokenizerError::Io(_) => self.position,
                    });
                    return Err(e);
                }
                Err(_) => self.receiver = None,
            }
        }
        Ok(())
    }
}

fn produce<T: Tokenizer>(mut tokenizer: T, sender: &SyncSender<Result<Token, TokenizerError>>) {
    loop {
        let result = tokenizer.next_token();
        let done = !result
            .as_ref()
            .is_ok_and(|token| token.kind() != TokenKind::Eof);
        if sender.send(result).is_err() || done {
            return;
        }
    }
}

impl<T: Tokenizer + Send + 'static> TokenQueue for AsyncTokenQueue<T> {
    fn dequeue(&mut self) -> Result<Option<Token>, TokenizerError> {
        self.fill_if_empty()?;
        Ok(self.buffer.pop())
    }

    fn peek(&mut self) -> Result<Option<&Token>, TokenizerError> {
        self.fill_if_empty()?;
        Ok(self.buffer.tokens.front())
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.receiver = None;
    }

    fn initialise_buffer(&mut self) -> Result<(), TokenizerError> {
        self.fill_if_empty()
    }

    delegate_to_buffer!();
}

/// Selects a [`TokenQueue`] implementation.
///
/// ```
/// use oxtok::{TokenKind, TokenQueueMode, TurtleTokenizer};
///
/// let mut queue = TokenQueueMode::default().build(TurtleTokenizer::for_str("<s> <p> <o> ."));
/// assert_eq!(queue.dequeue()?.map(|t| t.kind()), Some(TokenKind::Bof));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum TokenQueueMode {
    /// [`EagerTokenQueue`]
    Eager,
    /// [`BufferedTokenQueue`] with the given buffer size.
    Buffered(usize),
    /// [`AsyncTokenQueue`] with the given buffer size.
    Async(usize),
}

impl Default for TokenQueueMode {
    #[inline]
    fn default() -> Self {
        Self::Buffered(DEFAULT_BUFFER_SIZE)
    }
}

impl TokenQueueMode {
    pub fn build<T: Tokenizer + Send + 'static>(self, tokenizer: T) -> Box<dyn TokenQueue> {
        match self {
            Self::Eager => Box::new(EagerTokenQueue::new(tokenizer)),
            Self::Buffered(size) => {
                Box::new(BufferedTokenQueue::new(tokenizer).with_buffer_size(size))
            }
            Self::Async(size) => Box::new(AsyncTokenQueue::new(tokenizer).with_buffer_size(size)),
        }
    }
}
