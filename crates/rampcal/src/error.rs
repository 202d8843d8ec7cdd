//! Error types for the rampcal library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rampcal operations.
#[derive(Debug, Error)]
pub enum RampcalError {
    /// No reference artifact satisfies the exposure's metadata.
    #[error(
        "no matching {category} reference for instrument '{instrument}', \
         detector '{detector}', exposure type '{exposure_type}'"
    )]
    NoMatchingReference {
        category: String,
        instrument: String,
        detector: String,
        exposure_type: String,
    },

    /// The identified reference artifact could not be loaded.
    #[error("failed to load reference '{path}': {message}")]
    ReferenceLoad { path: PathBuf, message: String },

    /// The reference mask's spatial shape disagrees with the exposure's.
    #[error("shape mismatch: exposure pixel DQ is {expected:?}, reference flag map is {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// The reference artifact covers a different detector than the exposure.
    #[error("detector mismatch: exposure is '{expected}', reference covers '{actual}'")]
    DetectorMismatch { expected: String, actual: String },

    /// A document parsed but violates a container invariant.
    #[error("invalid document '{path}': {message}")]
    InvalidDocument { path: PathBuf, message: String },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV library (reference-selection tables).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for rampcal operations.
pub type Result<T> = std::result::Result<T, RampcalError>;
