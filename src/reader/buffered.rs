//! Buffered Line Reader
//!
//! Reads text lines from any source implementing Read, using an internal
//! buffer that is compacted and grown as needed. Lines are produced on demand,
//! so a caller that stops early never pulls more than one extra buffer fill.

use std::io::{self, Read};

use crate::core::encoding::{XmlEncoding, SNIFF_LEN};
use crate::error::LineError;

/// Buffer size for reading chunks
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Lazy line source over a byte stream
pub struct LineReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    end: usize,
    eof: bool,
    encoding: Option<XmlEncoding>,
    /// Decoded text of the most recent line
    line: String,
    line_number: usize,
    /// Previous line ended in `\r`
    after_cr: bool,
}

impl<R: Read> LineReader<R> {
    /// Create a new line reader
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new line reader with specified initial buffer capacity
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        LineReader {
            reader,
            buffer: vec![0u8; capacity.max(SNIFF_LEN)],
            pos: 0,
            end: 0,
            eof: false,
            encoding: None,
            line: String::new(),
            line_number: 0,
            after_cr: false,
        }
    }

    /// Line number of the most recent line, counting `\r\n` as one terminator
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Encoding in use, once the first line has been requested
    #[inline]
    pub fn detected_encoding(&self) -> Option<XmlEncoding> {
        self.encoding
    }

    /// Get current buffered data as a slice
    #[inline]
    fn buffered(&self) -> &[u8] {
        &self.buffer[self.pos..self.end]
    }

    /// Consume n bytes from the buffer
    #[inline]
    fn consume(&mut self, n: usize) {
        self.pos += n.min(self.end - self.pos);
    }

    /// Fill the buffer from the reader, growing it when it is already full
    fn fill_buffer(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }

        // Compact: move remaining data to start
        if self.pos > 0 {
            let remaining = self.end - self.pos;
            if remaining > 0 {
                self.buffer.copy_within(self.pos..self.end, 0);
            }
            self.end = remaining;
            self.pos = 0;
        }

        // A single line fills the whole buffer
        if self.end == self.buffer.len() {
            let grown = self.buffer.len() * 2;
            self.buffer.resize(grown, 0);
        }

        loop {
            match self.reader.read(&mut self.buffer[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(read) => {
                    self.end += read;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Sniff the encoding from the first bytes and skip any BOM
    fn encoding(&mut self) -> io::Result<XmlEncoding> {
        if let Some(encoding) = self.encoding {
            return Ok(encoding);
        }
        while self.end - self.pos < SNIFF_LEN && self.fill_buffer()? {}

        let encoding = XmlEncoding::detect(self.buffered());
        let bom = encoding.bom_len(self.buffered());
        self.consume(bom);
        self.encoding = Some(encoding);
        Ok(encoding)
    }

    /// Read the next line, without its terminator.
    ///
    /// `\n`, `\r` and `\r\n` all end a line (the last one shows up as an extra
    /// empty line, which does not advance [`line_number`](Self::line_number)).
    /// Returns `Ok(None)` once the input is exhausted.
    pub fn next_line(&mut self) -> Result<Option<&str>, LineError> {
        let encoding = self.encoding()?;
        let unit = encoding.unit_len();

        let mut scanned = 0;
        let (len, terminator) = loop {
            if let Some(line_end) = encoding.find_line_end(self.buffered(), scanned) {
                break (line_end, unit);
            }
            let buffered = self.end - self.pos;
            scanned = buffered - buffered % unit;

            if !self.fill_buffer()? {
                if buffered == 0 {
                    return Ok(None);
                }
                // Last line has no terminator
                break (buffered, 0);
            }
        };

        let start = self.pos;
        let is_cr = terminator > 0 && encoding.is_carriage_return(&self.buffer[start + len..]);
        // The empty piece between `\r` and `\n` belongs to the line before it
        if !(self.after_cr && len == 0 && terminator > 0 && !is_cr) {
            self.line_number += 1;
        }
        self.after_cr = is_cr;
        let decoded = encoding.decode_into(
            &self.buffer[start..start + len],
            self.line_number,
            &mut self.line,
        );
        self.consume(len + terminator);
        decoded?;

        Ok(Some(self.line.as_str()))
    }
}
