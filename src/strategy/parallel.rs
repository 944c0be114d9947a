//! Parallel Batch Detection
//!
//! Uses Rayon to classify many documents at once. Each document is still
//! scanned sequentially; only the batch is spread over the pool.

use rayon::prelude::*;

use crate::detector::ValidationModeDetector;
use crate::error::DetectError;
use crate::mode::ValidationMode;

/// Detect the validation mode of each in-memory document, in input order
pub fn detect_all(detector: &ValidationModeDetector, inputs: &[&[u8]]) -> Vec<ValidationMode> {
    inputs
        .par_iter()
        .map(|input| detector.detect_slice(input))
        .collect()
}

/// Resolve and detect each location, in input order
pub fn detect_locations(
    detector: &ValidationModeDetector,
    locations: &[&str],
) -> Vec<Result<ValidationMode, DetectError>> {
    locations
        .par_iter()
        .map(|location| detector.detect_location(location))
        .collect()
}
