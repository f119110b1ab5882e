//! Repositionable symbol streams
//!
//! The frequency counter and the stream encoder both read their input through
//! [`SymbolStream`], which supports reading the next symbol and, separately,
//! rewinding to the start. Counting leaves the cursor at the end, so callers
//! that need a second pass rewind explicitly.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{HuffError, Result};

/// A finite symbol source that can be rewound to its start
pub trait SymbolStream {
    /// Symbol type yielded by the stream
    type Symbol;

    /// Read the next symbol, or `None` at end of stream
    fn next_symbol(&mut self) -> Result<Option<Self::Symbol>>;

    /// Reposition the stream at its first symbol
    fn rewind(&mut self) -> Result<()>;
}

impl<T: SymbolStream + ?Sized> SymbolStream for &mut T {
    type Symbol = T::Symbol;

    fn next_symbol(&mut self) -> Result<Option<Self::Symbol>> {
        (**self).next_symbol()
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

/// SymbolStream over an in-memory slice
#[derive(Debug, Clone)]
pub struct SliceSymbolStream<'a, S> {
    data: &'a [S],
    position: usize,
}

impl<'a, S> SliceSymbolStream<'a, S> {
    /// Create a stream positioned at the start of `data`
    pub fn new(data: &'a [S]) -> Self {
        Self { data, position: 0 }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of symbols not yet read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}

impl<S: Clone> SymbolStream for SliceSymbolStream<'_, S> {
    type Symbol = S;

    #[inline]
    fn next_symbol(&mut self) -> Result<Option<S>> {
        let symbol = self.data.get(self.position).cloned();
        if symbol.is_some() {
            self.position += 1;
        }
        Ok(symbol)
    }

    fn rewind(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }
}

/// SymbolStream of UTF-8 `char`s read from any seekable reader
///
/// With `skip_whitespace` set, whitespace characters are consumed but never
/// yielded, which keeps every symbol representable in the line-oriented table
/// format.
#[derive(Debug)]
pub struct CharStream<R> {
    reader: BufReader<R>,
    start: u64,
    skip_whitespace: bool,
}

impl<R: Read + Seek> CharStream<R> {
    /// Wrap a reader; its current position becomes the rewind target
    pub fn new(mut reader: R, skip_whitespace: bool) -> Result<Self> {
        let start = reader.stream_position()?;
        Ok(Self {
            reader: BufReader::new(reader),
            start,
            skip_whitespace,
        })
    }

    /// Whether whitespace characters are skipped
    pub fn skips_whitespace(&self) -> bool {
        self.skip_whitespace
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let buf = self.reader.fill_buf()?;
        let Some(&byte) = buf.first() else {
            return Ok(None);
        };
        self.reader.consume(1);
        Ok(Some(byte))
    }

    fn read_char(&mut self) -> Result<Option<char>> {
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };

        let width = utf8_width(first).ok_or_else(|| {
            HuffError::invalid_data(format!("Invalid UTF-8 lead byte 0x{:02x}", first))
        })?;

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or_else(|| {
                HuffError::invalid_data("Truncated UTF-8 sequence at end of input")
            })?;
        }

        let decoded = std::str::from_utf8(&buf[..width])
            .map_err(|e| HuffError::invalid_data(format!("Invalid UTF-8 sequence: {}", e)))?;
        Ok(decoded.chars().next())
    }
}

impl CharStream<File> {
    /// Open a file as a character stream
    pub fn open<P: AsRef<Path>>(path: P, skip_whitespace: bool) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file, skip_whitespace)
    }
}

impl<'a> CharStream<Cursor<&'a [u8]>> {
    /// Character stream over an in-memory string
    pub fn from_text(text: &'a str, skip_whitespace: bool) -> Self {
        Self {
            reader: BufReader::new(Cursor::new(text.as_bytes())),
            start: 0,
            skip_whitespace,
        }
    }
}

impl<R: Read + Seek> SymbolStream for CharStream<R> {
    type Symbol = char;

    fn next_symbol(&mut self) -> Result<Option<char>> {
        loop {
            match self.read_char()? {
                Some(c) if self.skip_whitespace && c.is_whitespace() => continue,
                other => return Ok(other),
            }
        }
    }

    fn rewind(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(self.start))?;
        Ok(())
    }
}

fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}
