//! XML Reader Module
//!
//! - LineReader: buffered, lazy line source over any `Read`

pub mod buffered;

pub use buffered::LineReader;
