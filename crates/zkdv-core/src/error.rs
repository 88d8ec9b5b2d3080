//! # Core Error Types
//!
//! Errors raised while constructing identifiers, timestamps, and canonical
//! byte sequences. Domain crates wrap these in their own error enums.

use thiserror::Error;

/// Top-level error type for `zkdv-core` constructors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// An identifier or timestamp did not satisfy its constructor rules.
    #[error("validation error: {0}")]
    Validation(String),

    /// Hex input could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Amounts are integers in indivisible units.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
