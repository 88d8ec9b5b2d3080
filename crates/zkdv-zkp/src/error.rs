//! # Proof Artifact Errors

use thiserror::Error;

/// Errors from encoding, decoding, and parsing proof artifacts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A decimal string contained something other than ASCII digits.
    #[error("invalid decimal string: {0:?}")]
    InvalidDecimal(String),

    /// A decimal value does not fit in 32 bytes.
    #[error("value does not fit in 32 bytes: {0}")]
    ScalarOverflow(String),

    /// A value is not below the modulus of the field it belongs to.
    #[error("value {value} is not an element of the {field} field")]
    OutOfField {
        /// `base` or `scalar`.
        field: &'static str,
        /// Decimal rendering of the offending value.
        value: String,
    },

    /// Proof bytes were not exactly 256 long.
    #[error("proof must be {expected} bytes, got {actual}")]
    ProofLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// Public-input bytes were not a whole number of 32-byte scalars.
    #[error("public inputs must be a multiple of 32 bytes, got {0}")]
    InputLength(usize),

    /// A snarkjs document did not have the expected shape.
    #[error("snarkjs format: {0}")]
    Snarkjs(String),

    /// Verification key bytes could not be interpreted.
    #[error("verification key format: {0}")]
    KeyFormat(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::Snarkjs(e.to_string())
    }
}

/// Errors from the strict verification gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The key, public inputs, or proof failed a shape precondition. No
    /// pairing check was attempted.
    #[error("malformed verification input: {0}")]
    Malformed(String),
}
