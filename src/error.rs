//! Error Types

use std::io;

use thiserror::Error;

use crate::core::encoding::XmlEncoding;

/// Failure surfaced to callers of the detector
#[derive(Debug, Error)]
pub enum DetectError {
    /// Reading the document failed for a reason other than decoding.
    #[error("failed to read document: {0}")]
    Io(#[from] io::Error),

    /// The location names a scheme this crate cannot open.
    #[error("unsupported location: {0}")]
    UnsupportedLocation(String),

    /// The location resolved, but could not be opened.
    #[error("cannot open {location}: {source}")]
    Resource {
        location: String,
        #[source]
        source: io::Error,
    },
}

/// A line that is not valid text in the detected encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {encoding:?} on line {line}: {reason}")]
pub struct DecodeError {
    pub encoding: XmlEncoding,
    /// 1-based
    pub line: usize,
    pub reason: String,
}

/// Error from the line source, keeping decoding apart from I/O
#[derive(Debug, Error)]
pub enum LineError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
