//! Validation Mode Detector
//!
//! Peeks into the preamble of an XML document, line by line, looking for a
//! `DOCTYPE` declaration before the first opening tag:
//! - `DOCTYPE` found first: [`ValidationMode::Dtd`]
//! - opening tag or end of input first: [`ValidationMode::Xsd`]
//! - input does not decode: [`ValidationMode::Auto`], leaving the decision to the caller
//!
//! The detector holds no scan state of its own; each call starts from a fresh
//! [`ScanState`], so one detector can be shared across threads.

use std::io::Read;

use tracing::{debug, trace};

use crate::core::scanner::{LineVerdict, ScanState};
use crate::error::{DetectError, LineError};
use crate::loader::Location;
use crate::mode::ValidationMode;
use crate::reader::buffered::{LineReader, DEFAULT_BUFFER_SIZE};

/// Detects DTD- vs XSD-based validation from a document's preamble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationModeDetector {
    capacity: usize,
}

impl Default for ValidationModeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationModeDetector {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// Use a different initial read buffer size. The buffer still grows for
    /// lines longer than `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        ValidationModeDetector { capacity }
    }

    /// Detect the validation mode of the document in `input`.
    ///
    /// `input` is consumed only up to the line that decides the outcome and is
    /// dropped before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Io`] if reading fails. Malformed text is not an
    /// error: it yields `Ok(ValidationMode::Auto)`.
    pub fn detect<R: Read>(&self, input: R) -> Result<ValidationMode, DetectError> {
        let mut lines = LineReader::with_capacity(input, self.capacity);
        let mut state = ScanState::new();

        let verdict = loop {
            let line = match lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => break LineVerdict::Continue,
                Err(LineError::Decode(e)) => {
                    debug!(error = %e, "undecodable input, leaving validation mode to caller");
                    return Ok(ValidationMode::Auto);
                }
                Err(LineError::Io(e)) => return Err(DetectError::Io(e)),
            };

            let verdict = state.classify(line);
            trace!(
                line = lines.line_number(),
                ?verdict,
                in_comment = state.in_comment(),
                "classified line"
            );
            if verdict.is_final() {
                break verdict;
            }
        };

        let mode = mode_for(verdict);
        debug!(
            %mode,
            ?verdict,
            lines = lines.line_number(),
            encoding = ?lines.detected_encoding(),
            "validation mode detected"
        );
        Ok(mode)
    }

    /// Detect the validation mode of an in-memory document
    pub fn detect_slice(&self, input: &[u8]) -> ValidationMode {
        // Reading from a slice cannot fail
        self.detect(input).unwrap_or(ValidationMode::Auto)
    }

    /// Resolve `location` to a local file and detect its validation mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is unsupported, the file cannot be
    /// opened, or reading it fails.
    pub fn detect_location(&self, location: &str) -> Result<ValidationMode, DetectError> {
        let file = Location::resolve(location)?.open()?;
        self.detect(file)
    }
}

/// Outcome of a scan that ended with `verdict`
pub(crate) fn mode_for(verdict: LineVerdict) -> ValidationMode {
    match verdict {
        LineVerdict::Doctype => ValidationMode::Dtd,
        LineVerdict::OpeningTag | LineVerdict::Continue => ValidationMode::Xsd,
    }
}
