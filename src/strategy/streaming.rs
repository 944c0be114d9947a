//! Streaming Detector
//!
//! Push-based detection for documents that arrive in chunks. Complete lines
//! are classified as soon as they are buffered; once a decision is reached,
//! later chunks are dropped without being stored.

use tracing::debug;

use crate::core::encoding::{XmlEncoding, SNIFF_LEN};
use crate::core::scanner::{LineVerdict, ScanState};
use crate::detector::mode_for;
use crate::mode::ValidationMode;

/// Stateful, chunk-fed validation mode detector
#[derive(Debug, Default)]
pub struct StreamingDetector {
    /// Bytes of the current, incomplete line
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for a terminator
    scanned: usize,
    encoding: Option<XmlEncoding>,
    state: ScanState,
    decision: Option<ValidationMode>,
    line_number: usize,
    /// Previous line ended in `\r`
    after_cr: bool,
    bytes_seen: usize,
    /// Scratch space for the decoded line
    line: String,
}

impl StreamingDetector {
    /// Create a new streaming detector
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of data.
    ///
    /// Returns the decision once one has been reached, by this chunk or an
    /// earlier one.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<ValidationMode> {
        if self.decision.is_some() {
            return self.decision;
        }
        self.bytes_seen += chunk.len();
        self.buffer.extend_from_slice(chunk);
        self.process_buffer(false);
        self.decision
    }

    /// Signal end of input and return the decision.
    ///
    /// A trailing line without terminator is classified first. Calling this
    /// again returns the same mode.
    pub fn finish(&mut self) -> ValidationMode {
        if self.decision.is_none() {
            self.process_buffer(true);
        }
        let mode = self.decision.unwrap_or(ValidationMode::Xsd);
        self.decide(mode);
        mode
    }

    /// Decision so far, if any
    #[inline]
    pub fn decision(&self) -> Option<ValidationMode> {
        self.decision
    }

    #[inline]
    pub fn is_decided(&self) -> bool {
        self.decision.is_some()
    }

    /// Bytes held back waiting for a line terminator
    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes fed before a decision was reached
    #[inline]
    pub fn bytes_seen(&self) -> usize {
        self.bytes_seen
    }

    fn decide(&mut self, mode: ValidationMode) {
        self.decision = Some(mode);
        self.buffer = Vec::new();
        self.scanned = 0;
    }

    /// Settle the encoding once enough bytes are in
    fn sniff_encoding(&mut self, eof: bool) -> Option<XmlEncoding> {
        if let Some(encoding) = self.encoding {
            return Some(encoding);
        }
        if self.buffer.len() < SNIFF_LEN && !eof {
            return None;
        }
        let encoding = XmlEncoding::detect(&self.buffer);
        let bom = encoding.bom_len(&self.buffer);
        self.buffer.drain(..bom);
        self.encoding = Some(encoding);
        Some(encoding)
    }

    /// Classify every complete line in the buffer (and the remainder at `eof`)
    fn process_buffer(&mut self, eof: bool) {
        let encoding = match self.sniff_encoding(eof) {
            Some(encoding) => encoding,
            None => return,
        };
        let unit = encoding.unit_len();

        let mut start = 0;
        loop {
            let from = start.max(self.scanned);
            let (end, next, is_cr) = match encoding.find_line_end(&self.buffer, from) {
                Some(end) => {
                    let is_cr = encoding.is_carriage_return(&self.buffer[end..]);
                    (end, end + unit, is_cr)
                }
                None if eof && start < self.buffer.len() => {
                    (self.buffer.len(), self.buffer.len(), false)
                }
                None => break,
            };

            // `\r\n` advances the line number once
            if !(self.after_cr && end == start && next > end && !is_cr) {
                self.line_number += 1;
            }
            self.after_cr = is_cr;
            if let Err(e) =
                encoding.decode_into(&self.buffer[start..end], self.line_number, &mut self.line)
            {
                debug!(error = %e, "undecodable input, leaving validation mode to caller");
                self.decide(ValidationMode::Auto);
                return;
            }

            let verdict = self.state.classify(&self.line);
            if verdict.is_final() {
                self.conclude(verdict);
                return;
            }
            start = next;
        }

        if eof {
            self.conclude(LineVerdict::Continue);
            return;
        }

        self.buffer.drain(..start);
        let pending = self.buffer.len();
        self.scanned = pending - pending % unit;
    }

    fn conclude(&mut self, verdict: LineVerdict) {
        let mode = mode_for(verdict);
        debug!(
            %mode,
            ?verdict,
            lines = self.line_number,
            bytes = self.bytes_seen,
            "validation mode detected"
        );
        self.decide(mode);
    }
}
