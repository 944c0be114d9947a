//! Core detection primitives
//!
//! - Scanner: per-line comment tracking and preamble classification
//! - Encoding: BOM sniffing, line splitting on code units, strict decoding

pub mod encoding;
pub mod scanner;
