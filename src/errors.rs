//! Error types for f64 formatting and parsing.
//!
//! The error surface is narrow: formatting only fails on
//! non-finite input or a caller buffer that is too short, and parsing only
//! reports magnitudes that do not fit in a finite `f64`. Malformed parse
//! input is not an error at all, see [`crate::parse_double`].

use thiserror::Error;

/// Errors reported by the formatting and parsing entry points.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FloatError {
    /// NaN or an infinity was handed to a formatter.
    #[error("cannot format non-finite value {value}")]
    NonFinite {
        /// The rejected value
        value: f64,
    },

    /// Decimal text whose magnitude overflows `f64`, or a scale exponent
    /// past the reach of the powers-of-ten ladder.
    #[error("decimal exponent {exp10} overflows f64")]
    ParseOverflow {
        /// Combined base-10 scale exponent of the accumulated digits
        exp10: i32,
    },

    /// The caller-provided output buffer cannot hold the rendered text.
    #[error("output buffer too small: need {needed} bytes, {available} available")]
    BufferTooSmall {
        /// Bytes the rendering needs
        needed: usize,
        /// Bytes available after the write offset
        available: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, FloatError>;
