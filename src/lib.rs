//! XmlMode - Detect whether an XML document uses DTD- or XSD-based validation
//!
//! Front ends:
//! A: Pull detector over any `Read` (detect, detect_code, detect_file)
//! B: Streaming detector fed in chunks (streaming_*)
//! C: Parallel batch detection (detect_batch, detect_files)

use rustler::{Atom, Binary, Env, NifResult, ResourceArc, Term};

pub mod core;
pub mod detector;
pub mod error;
pub mod loader;
pub mod mode;
pub mod reader;
pub mod resource;
pub mod strategy;
pub mod term;

pub use detector::ValidationModeDetector;
pub use error::{DecodeError, DetectError};
pub use loader::Location;
pub use mode::ValidationMode;
pub use strategy::StreamingDetector;

use resource::{StreamingDetectorRef, StreamingDetectorResource};
use term::{decision_to_term, mode_atom, result_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Strategy A: Pull Detector
// ============================================================================

/// Detect the validation mode of a binary (`:dtd`, `:xsd` or `:auto`)
#[rustler::nif]
fn detect(input: Binary) -> Atom {
    mode_atom(ValidationModeDetector::new().detect_slice(input.as_slice()))
}

/// Same as `detect/1`, as the legacy numeric code (1 = auto, 2 = dtd, 3 = xsd)
#[rustler::nif]
fn detect_code(input: Binary) -> u8 {
    ValidationModeDetector::new()
        .detect_slice(input.as_slice())
        .code()
}

/// Detect the validation mode of a file (`{:ok, mode}` or `{:error, reason}`)
/// Accepts plain paths and file: URLs
#[rustler::nif(schedule = "DirtyIo")]
fn detect_file<'a>(env: Env<'a>, location: &str) -> Term<'a> {
    result_to_term(env, ValidationModeDetector::new().detect_location(location))
}

// ============================================================================
// Strategy B: Streaming Detector
// ============================================================================

/// Create a new streaming detector
#[rustler::nif]
fn streaming_new() -> StreamingDetectorRef {
    ResourceArc::new(StreamingDetectorResource::new())
}

/// Feed a chunk; returns the mode once decided, `:pending` before that
#[rustler::nif]
fn streaming_feed<'a>(
    env: Env<'a>,
    detector: StreamingDetectorRef,
    chunk: Binary<'a>,
) -> NifResult<Term<'a>> {
    let decision = detector
        .with_detector(|d| d.feed(chunk.as_slice()))
        .map_err(rustler::Error::RaiseAtom)?;
    Ok(decision_to_term(env, decision))
}

/// Signal end of input and return the mode
#[rustler::nif]
fn streaming_finish(detector: StreamingDetectorRef) -> NifResult<Atom> {
    detector
        .with_detector(|d| mode_atom(d.finish()))
        .map_err(rustler::Error::RaiseAtom)
}

/// Get streaming detector status: {decided?, buffer_size, bytes_seen}
#[rustler::nif]
fn streaming_status(detector: StreamingDetectorRef) -> NifResult<(bool, usize, usize)> {
    detector
        .with_detector(|d| (d.is_decided(), d.buffer_size(), d.bytes_seen()))
        .map_err(rustler::Error::RaiseAtom)
}

// ============================================================================
// Strategy C: Parallel Batch Detection
// ============================================================================

/// Detect the validation mode of many binaries in parallel
#[rustler::nif(schedule = "DirtyCpu")]
fn detect_batch(inputs: Vec<Binary>) -> Vec<Atom> {
    let slices: Vec<&[u8]> = inputs.iter().map(|input| input.as_slice()).collect();
    strategy::parallel::detect_all(&ValidationModeDetector::new(), &slices)
        .into_iter()
        .map(mode_atom)
        .collect()
}

/// Detect the validation mode of many files in parallel, in input order.
/// Each entry is `{:ok, mode}` or `{:error, reason}`
#[rustler::nif(schedule = "DirtyIo")]
fn detect_files<'a>(env: Env<'a>, locations: Vec<String>) -> Vec<Term<'a>> {
    let locations: Vec<&str> = locations.iter().map(String::as_str).collect();
    strategy::parallel::detect_locations(&ValidationModeDetector::new(), &locations)
        .into_iter()
        .map(|result| result_to_term(env, result))
        .collect()
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.XmlMode.Native");
