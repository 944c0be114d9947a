//! Validation Mode
//!
//! The four-valued outcome of detection, with the numeric codes older
//! callers compare against.

use std::fmt;
use std::str::FromStr;

/// Which grammar a document should be validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValidationMode {
    /// Validation disabled. Never produced by detection.
    None = 0,
    /// Could not decide, usually because the input did not decode.
    Auto = 1,
    /// A `DOCTYPE` declaration precedes the root element.
    Dtd = 2,
    /// No `DOCTYPE` before the root element (or before end of input).
    Xsd = 3,
}

impl ValidationMode {
    pub const ALL: [ValidationMode; 4] = [
        ValidationMode::None,
        ValidationMode::Auto,
        ValidationMode::Dtd,
        ValidationMode::Xsd,
    ];

    /// Stable numeric code
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`code`](Self::code)
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ValidationMode::None),
            1 => Some(ValidationMode::Auto),
            2 => Some(ValidationMode::Dtd),
            3 => Some(ValidationMode::Xsd),
            _ => None,
        }
    }

    /// Lowercase name, also used as the atom on the Elixir side
    pub const fn as_str(self) -> &'static str {
        match self {
            ValidationMode::None => "none",
            ValidationMode::Auto => "auto",
            ValidationMode::Dtd => "dtd",
            ValidationMode::Xsd => "xsd",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidationMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown validation mode: {}", s))
    }
}
