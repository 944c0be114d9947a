//! Location Resolution
//!
//! Turns a location string into an open file for the detector. Only local
//! files are supported: plain paths and `file:` URLs. Other schemes are
//! rejected rather than guessed at.

use std::fs::File;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::DetectError;

const FILE_URL_PREFIX: &str = "file:";
const CLASSPATH_URL_PREFIX: &str = "classpath:";

/// A resolved, local document location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: PathBuf,
}

impl Location {
    /// Resolve a location string.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::UnsupportedLocation`] for empty locations,
    /// `classpath:` locations, relative or remote `file:` URLs, and any other
    /// `scheme://` URL.
    pub fn resolve(location: &str) -> Result<Self, DetectError> {
        let unsupported = || DetectError::UnsupportedLocation(location.to_string());

        if location.is_empty() || location.starts_with(CLASSPATH_URL_PREFIX) {
            return Err(unsupported());
        }

        if let Some(rest) = location.strip_prefix(FILE_URL_PREFIX) {
            // The url crate would anchor a relative path at the root
            if !rest.starts_with('/') {
                return Err(unsupported());
            }
            // Decodes percent-escapes and refuses hosts other than localhost
            let path = Url::parse(location)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .ok_or_else(unsupported)?;
            return Ok(Location { path });
        }

        if location.contains("://") {
            return Err(unsupported());
        }

        Ok(Location {
            path: PathBuf::from(location),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Resource`] if the file cannot be opened.
    pub fn open(&self) -> Result<File, DetectError> {
        File::open(&self.path).map_err(|source| DetectError::Resource {
            location: self.path.display().to_string(),
            source,
        })
    }
}
