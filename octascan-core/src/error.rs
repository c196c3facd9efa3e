//! Error types for octascan-core.

use thiserror::Error;

/// Result type alias for octascan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for octascan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File name lacks the `X<n> Y<n> Z<n>` dimension pattern.
    #[error("file name does not encode scan dimensions: {0}")]
    Format(String),

    /// Sample count inconsistent with the parsed dimensions.
    #[error("expected {expected} samples, got {actual}")]
    Shape { expected: usize, actual: usize },

    /// ROI endpoints outside the valid sample range.
    #[error("ROI [{start}, {end}] outside profile of length {len}")]
    Range {
        start: usize,
        end: usize,
        len: usize,
    },

    /// ROI collapses to a single sample; no line can be fitted.
    #[error("degenerate single-sample ROI at index {0}")]
    DegenerateRoi(usize),

    /// An ROI operation was requested before any profile was attached.
    #[error("no depth profile attached")]
    NoProfile,
}
