use std::io::{self, BufReader, Read};
use std::str;

/// A stream of characters a tokenizer reads from.
///
/// `None` is the end of stream sentinel. I/O failures are reported as [`io::Error`] and are never confused with the end of the stream.
pub trait CharSource {
    /// Returns the next character without consuming it.
    fn peek(&mut self) -> io::Result<Option<char>>;

    /// Consumes and returns the next character.
    fn read(&mut self) -> io::Result<Option<char>>;

    /// Returns `true` if no character is left.
    #[inline]
    fn is_end(&mut self) -> io::Result<bool> {
        Ok(self.peek()?.is_none())
    }

    /// Releases the underlying input.
    ///
    /// The source behaves as an empty stream afterwards.
    fn close(&mut self);
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    #[inline]
    fn peek(&mut self) -> io::Result<Option<char>> {
        (**self).peek()
    }

    #[inline]
    fn read(&mut self) -> io::Result<Option<char>> {
        (**self).read()
    }

    #[inline]
    fn close(&mut self) {
        (**self).close();
    }
}

/// A [`CharSource`] reading from a string slice.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> StrSource<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }
}

impl CharSource for StrSource<'_> {
    #[inline]
    fn peek(&mut self) -> io::Result<Option<char>> {
        Ok(self
            .input
            .get(self.position..)
            .and_then(|rest| rest.chars().next()))
    }

    #[inline]
    fn read(&mut self) -> io::Result<Option<char>> {
        let c = self.peek()?;
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        Ok(c)
    }

    #[inline]
    fn close(&mut self) {
        self.position = self.input.len();
    }
}

/// A [`CharSource`] decoding UTF-8 from a [`Read`] implementation.
///
/// The reader is wrapped in a [`BufReader`]. Invalid UTF-8 is reported as an [`io::ErrorKind::InvalidData`] error.
pub struct ReaderSource<R: Read> {
    reader: Option<BufReader<R>>,
    lookahead: Option<char>,
}

impl<R: Read> ReaderSource<R> {
    #[inline]
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(BufReader::new(reader)),
            lookahead: None,
        }
    }

    fn decode_next(reader: &mut BufReader<R>) -> io::Result<Option<char>> {
        let mut buffer = [0; 4];
        loop {
            match reader.read(&mut buffer[..1]) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => (),
                Err(e) => return Err(e),
            }
        }
        let width = match buffer[0] {
            0x00..=0x7F => 1,
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            b => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid UTF-8 leading byte 0x{b:02X}"),
                ));
            }
        };
        if width > 1 {
            reader.read_exact(&mut buffer[1..width]).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        "The input ends in the middle of a UTF-8 character",
                    )
                } else {
                    e
                }
            })?;
        }
        let decoded = str::from_utf8(&buffer[..width])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(decoded.chars().next())
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn peek(&mut self) -> io::Result<Option<char>> {
        if self.lookahead.is_none() {
            if let Some(reader) = &mut self.reader {
                self.lookahead = Self::decode_next(reader)?;
            }
        }
        Ok(self.lookahead)
    }

    fn read(&mut self) -> io::Result<Option<char>> {
        let c = self.peek()?;
        self.lookahead = None;
        Ok(c)
    }

    #[inline]
    fn close(&mut self) {
        self.reader = None;
        self.lookahead = None;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic_in_result_fn)]

    use super::*;

    fn drain(mut source: impl CharSource) -> io::Result<String> {
        let mut output = String::new();
        while let Some(c) = source.read()? {
            output.push(c);
        }
        Ok(output)
    }

    #[test]
    fn str_source_peek_and_read() -> io::Result<()> {
        let mut source = StrSource::new("a\u{E9}b");
        assert_eq!(source.peek()?, Some('a'));
        assert_eq!(source.read()?, Some('a'));
        assert_eq!(source.read()?, Some('\u{E9}'));
        assert!(!source.is_end()?);
        assert_eq!(source.read()?, Some('b'));
        assert!(source.is_end()?);
        assert_eq!(source.read()?, None);
        Ok(())
    }

    #[test]
    fn reader_source_decodes_utf8() -> io::Result<()> {
        let input = "<http://example.com/\u{E9}t\u{E9}> \u{1F600} .";
        assert_eq!(drain(ReaderSource::new(input.as_bytes()))?, input);
        Ok(())
    }

    #[test]
    fn reader_source_rejects_invalid_utf8() {
        for bad in [&[b'a', 0xFF][..], &[0xC3], &[0xE2, 0x82], &[0xED, 0xA0, 0x80]] {
            let error = drain(ReaderSource::new(bad)).unwrap_err();
            assert_eq!(error.kind(), io::ErrorKind::InvalidData, "{bad:?}");
        }
    }

    #[test]
    fn closed_sources_are_empty() -> io::Result<()> {
        let mut source = StrSource::new("abc");
        source.read()?;
        source.close();
        assert!(source.is_end()?);

        let mut source = ReaderSource::new("abc".as_bytes());
        assert_eq!(source.peek()?, Some('a'));
        source.close();
        assert_eq!(source.read()?, None);
        Ok(())
    }
}
