//! # Ledger Errors
//!
//! Every variant aborts the whole unit of work: the snapshot is discarded
//! and no event is appended.

use thiserror::Error;
use zkdv_core::{CanonicalizationError, CoreError, DatasetId, PolicyId, Timestamp};
use zkdv_zkp::{CodecError, GateError};

/// Errors raised by ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An argument failed a constructor or range rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A listing for this dataset was created before. Dataset ids are never
    /// reused, even after a sale.
    #[error("{0} already has a listing")]
    DuplicateListing(DatasetId),

    /// The listing was already sold.
    #[error("{0} is no longer available")]
    ListingUnavailable(DatasetId),

    /// Payment is below the listing price.
    #[error("insufficient payment: price is {required}, offered {offered}")]
    InsufficientPayment {
        /// Listing price.
        required: u64,
        /// Offered payment.
        offered: u64,
    },

    /// The paying account cannot cover the amount.
    #[error("insufficient funds: need {required}, balance is {available}")]
    InsufficientFunds {
        /// Amount to debit.
        required: u64,
        /// Current balance.
        available: u64,
    },

    /// The sender is not permitted to perform this operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No committed, valid proof record backs the request.
    #[error("proof not verified: {0}")]
    ProofNotVerified(String),

    /// The policy has been used `max_uses` times.
    #[error("usage limit of {max_uses} reached")]
    UsageExceeded {
        /// The policy's limit.
        max_uses: u64,
    },

    /// The policy expired.
    #[error("policy expired at {expiry}")]
    Expired {
        /// The policy's expiry.
        expiry: Timestamp,
    },

    /// The policy was revoked by its owner.
    #[error("{0} has been revoked")]
    Revoked(PolicyId),

    /// The dataset's quality score is below the required minimum.
    #[error("quality score {score} is below minimum {minimum}")]
    QualityTooLow {
        /// The listing's score.
        score: u8,
        /// The required minimum.
        minimum: u8,
    },

    /// Verification input failed a shape check, or a proof artifact could
    /// not be decoded.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// An amount computation left the `u64` range.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// A write-once object already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),
}

impl LedgerError {
    /// Short stable label, used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::DuplicateListing(_) => "duplicate_listing",
            Self::ListingUnavailable(_) => "listing_unavailable",
            Self::InsufficientPayment { .. } => "insufficient_payment",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::Unauthorized(_) => "unauthorized",
            Self::ProofNotVerified(_) => "proof_not_verified",
            Self::UsageExceeded { .. } => "usage_exceeded",
            Self::Expired { .. } => "expired",
            Self::Revoked(_) => "revoked",
            Self::QualityTooLow { .. } => "quality_too_low",
            Self::Malformed(_) => "malformed",
            Self::Overflow(_) => "overflow",
            Self::AlreadyExists(_) => "already_exists",
        }
    }
}

impl From<CoreError> for LedgerError {
    fn from(e: CoreError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<CanonicalizationError> for LedgerError {
    fn from(e: CanonicalizationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<GateError> for LedgerError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Malformed(reason) => Self::Malformed(reason),
        }
    }
}

impl From<CodecError> for LedgerError {
    fn from(e: CodecError) -> Self {
        Self::Malformed(e.to_string())
    }
}
