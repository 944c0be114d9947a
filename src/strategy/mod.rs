//! Detection Strategy Module
//!
//! Front ends beyond the pull-based detector:
//! - Streaming: chunk-fed detection for documents that arrive piecemeal
//! - Parallel: batch detection over the Rayon pool

pub mod parallel;
pub mod streaming;

pub use streaming::StreamingDetector;
