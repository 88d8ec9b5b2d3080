//! # Proof-Gated Listing and Purchase
//!
//! Wraps [`Tx::list`] and [`Tx::purchase`] with a registry check:
//!
//! 1. the proof has a committed record and it is valid;
//! 2. the record's submitter is the sender;
//! 3. the quality score meets the minimum.
//!
//! The effective minimum is the larger of the argument and the configured
//! `min_quality` floor.
//!
//! A proof recorded earlier in the *same* unit of work does not count:
//! verification must commit before a gated action may rely on it. The
//! [`crate::flow`] module makes that ordering explicit.

use zkdv_core::{Address, DatasetId, ProofId};

use crate::error::LedgerError;
use crate::ledger::Tx;
use crate::listing::ListingRequest;
use crate::settlement::PurchaseReceipt;

impl Tx<'_> {
    fn require_committed_proof(&self, proof_id: &ProofId) -> Result<(), LedgerError> {
        if self.pending_proofs.contains(proof_id) {
            return Err(LedgerError::ProofNotVerified(format!(
                "{proof_id} was recorded in this unit of work and is not yet committed"
            )));
        }
        let record = self
            .state
            .registry
            .get_record(proof_id)
            .ok_or_else(|| LedgerError::ProofNotVerified(format!("{proof_id} has no record")))?;
        if !record.is_valid {
            return Err(LedgerError::ProofNotVerified(format!("{proof_id} did not verify")));
        }
        if record.submitter != self.sender {
            return Err(LedgerError::Unauthorized(format!(
                "{proof_id} was submitted by {}, not {}",
                record.submitter, self.sender
            )));
        }
        Ok(())
    }

    fn require_quality(&self, score: u8, min_quality: u8) -> Result<(), LedgerError> {
        let minimum = min_quality.max(self.config.min_quality);
        if score < minimum {
            return Err(LedgerError::QualityTooLow { score, minimum });
        }
        Ok(())
    }

    /// [`Tx::list`] behind a proof, identity, and quality check.
    pub fn list_gated(
        &mut self,
        proof_id: &ProofId,
        request: ListingRequest,
        min_quality: u8,
    ) -> Result<(), LedgerError> {
        self.require_committed_proof(proof_id)?;
        self.require_quality(request.quality_score, min_quality)?;
        tracing::debug!(proof = %proof_id, dataset = %request.dataset_id, "gated listing admitted");
        self.list(request)
    }

    /// [`Tx::purchase`] behind a proof, identity, and quality check.
    ///
    /// The proof must have been submitted by the sender (the buyer); the
    /// quality check uses the listing's score.
    pub fn purchase_gated(
        &mut self,
        proof_id: &ProofId,
        dataset_id: &DatasetId,
        payment: u64,
        treasury: Option<Address>,
        min_quality: u8,
    ) -> Result<PurchaseReceipt, LedgerError> {
        self.require_committed_proof(proof_id)?;
        let score = self
            .state
            .directory
            .get(dataset_id)
            .map(|l| l.quality_score)
            .ok_or_else(|| LedgerError::NotFound(dataset_id.to_string()))?;
        self.require_quality(score, min_quality)?;
        tracing::debug!(proof = %proof_id, dataset = %dataset_id, "gated purchase admitted");
        self.purchase(dataset_id, payment, treasury)
    }
}
