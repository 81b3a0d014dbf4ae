//! Error types for the pigment core.

use std::fmt;
use thiserror::Error;

/// Where inside a decoded buffer a palette codec gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Byte offset into a binary buffer.
    Offset(usize),
    /// 1-based line number in a text document.
    Line(usize),
    /// The codec could not pin the failure to a position.
    Unknown,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Offset(offset) => write!(f, " at byte {offset}"),
            Location::Line(line) => write!(f, " on line {line}"),
            Location::Unknown => Ok(()),
        }
    }
}

/// Errors produced by color conversions, analysis, extraction and palette codecs.
#[derive(Debug, Error)]
pub enum ColorError {
    /// A numeric component was outside the legal domain of its color model.
    #[error("{what} out of range: {value}")]
    InvalidRange { what: &'static str, value: f64 },

    /// A textual color representation (HEX, `rgb()`, ...) could not be parsed.
    #[error("invalid color format: {0}")]
    FormatError(String),

    /// A palette buffer failed structural validation.
    #[error("malformed palette{at}: {reason}")]
    MalformedPalette { at: Location, reason: String },

    /// The requested harmony rule is not implemented.
    #[error("unsupported harmony: {0}")]
    UnsupportedHarmony(String),

    /// The requested palette format is not implemented.
    #[error("unsupported palette format: {0}")]
    UnsupportedFormat(String),

    /// Width or height was zero, or their product overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A pixel buffer did not hold `width * height` colors.
    #[error("dimension mismatch: expected {expected} pixels, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl ColorError {
    /// Shorthand for [`ColorError::InvalidRange`].
    pub fn range(what: &'static str, value: f64) -> Self {
        ColorError::InvalidRange { what, value }
    }

    /// Shorthand for [`ColorError::MalformedPalette`].
    pub fn malformed(at: Location, reason: impl Into<String>) -> Self {
        ColorError::MalformedPalette {
            at,
            reason: reason.into(),
        }
    }
}
