//! ResourceArc Wrappers
//!
//! Persistent state for streaming detectors held on the Elixir side.

use crate::strategy::StreamingDetector;
use rustler::ResourceArc;
use std::sync::Mutex;

/// Wrapper for StreamingDetector that can be stored in a ResourceArc
pub struct StreamingDetectorResource {
    pub inner: Mutex<StreamingDetector>,
}

impl StreamingDetectorResource {
    pub fn new() -> Self {
        StreamingDetectorResource {
            inner: Mutex::new(StreamingDetector::new()),
        }
    }

    /// Run `f` against the detector.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if a previous caller panicked while holding
    /// the lock.
    pub fn with_detector<F, R>(&self, f: F) -> Result<R, &'static str>
    where
        F: FnOnce(&mut StreamingDetector) -> R,
    {
        let mut guard = self.inner.lock().map_err(|_| "mutex_poisoned")?;
        Ok(f(&mut guard))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for StreamingDetectorResource {}

impl Default for StreamingDetectorResource {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for the ResourceArc
pub type StreamingDetectorRef = ResourceArc<StreamingDetectorResource>;
