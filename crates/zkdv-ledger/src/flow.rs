//! # Verify-Then-List Typestate
//!
//! Listing behind a proof takes two units of work: one records the proof,
//! a later one lists against the committed record. `ListingFlow<S>` makes
//! the order a compile-time property.
//!
//! ```text
//! AwaitingProof ──submit()──▶ PendingCommit ──confirm()──▶ Verified ──list()──▶ Listed
//! ```
//!
//! `PendingCommit` is the state an off-ledger caller is in between sending
//! the proof and observing its record. `confirm()` reads committed state;
//! it fails with `ProofNotVerified` if the record is missing or invalid.
//!
//! Listing straight from `AwaitingProof` does not compile:
//!
//! ```compile_fail
//! use zkdv_ledger::flow::{AwaitingProof, ListingFlow};
//!
//! fn skip(flow: ListingFlow<AwaitingProof>, ledger: &zkdv_ledger::Ledger) {
//!     let _ = flow.list(ledger, zkdv_core::Timestamp::now(), 0);
//! }
//! ```

use zkdv_core::{Address, DatasetId, ProofFamily, ProofId, Timestamp};

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::listing::ListingRequest;

// ─── States ──────────────────────────────────────────────────────────

/// Proof bytes in hand, nothing submitted.
#[derive(Debug, Clone)]
pub struct AwaitingProof {
    family: ProofFamily,
    public_inputs: Vec<u8>,
    proof: Vec<u8>,
}

/// Proof submitted; its record has not been confirmed.
#[derive(Debug, Clone)]
pub struct PendingCommit {
    proof_id: ProofId,
}

/// A committed, valid record submitted by the seller exists.
#[derive(Debug, Clone)]
pub struct Verified {
    proof_id: ProofId,
}

/// The dataset is listed.
#[derive(Debug, Clone)]
pub struct Listed {
    proof_id: ProofId,
    sequence: u64,
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::AwaitingProof {}
    impl Sealed for super::PendingCommit {}
    impl Sealed for super::Verified {}
    impl Sealed for super::Listed {}
}

/// Marker for the four flow states.
pub trait FlowState: private::Sealed + std::fmt::Debug {
    /// State name for logs.
    fn name() -> &'static str;
}

impl FlowState for AwaitingProof {
    fn name() -> &'static str {
        "AWAITING_PROOF"
    }
}
impl FlowState for PendingCommit {
    fn name() -> &'static str {
        "PENDING_COMMIT"
    }
}
impl FlowState for Verified {
    fn name() -> &'static str {
        "VERIFIED"
    }
}
impl FlowState for Listed {
    fn name() -> &'static str {
        "LISTED"
    }
}

// ─── Flow ────────────────────────────────────────────────────────────

/// A seller's path from proof to listing.
#[derive(Debug, Clone)]
pub struct ListingFlow<S: FlowState> {
    seller: Address,
    request: ListingRequest,
    state: S,
}

impl<S: FlowState> ListingFlow<S> {
    /// The selling account.
    pub fn seller(&self) -> Address {
        self.seller
    }

    /// The dataset being listed.
    pub fn dataset_id(&self) -> &DatasetId {
        &self.request.dataset_id
    }

    /// Current state name.
    pub fn state_name(&self) -> &'static str {
        S::name()
    }
}

impl ListingFlow<AwaitingProof> {
    /// Start a flow with unsubmitted proof bytes.
    pub fn new(
        seller: Address,
        request: ListingRequest,
        family: ProofFamily,
        public_inputs: Vec<u8>,
        proof: Vec<u8>,
    ) -> Self {
        Self { seller, request, state: AwaitingProof { family, public_inputs, proof } }
    }

    /// Verify and record the proof in its own unit of work.
    ///
    /// A proof that fails verification still commits a record; the flow
    /// then stops at [`ListingFlow::confirm`].
    pub fn submit(self, ledger: &Ledger, now: Timestamp) -> Result<ListingFlow<PendingCommit>, LedgerError> {
        let AwaitingProof { family, public_inputs, proof } = &self.state;
        let outcome =
            ledger.transact(self.seller, now, |tx| tx.verify_and_submit(family, public_inputs, proof))?;
        Ok(ListingFlow {
            seller: self.seller,
            request: self.request,
            state: PendingCommit { proof_id: outcome.proof_id },
        })
    }
}

impl ListingFlow<PendingCommit> {
    /// Resume with a proof recorded by some other path.
    pub fn resume(seller: Address, request: ListingRequest, proof_id: ProofId) -> Self {
        Self { seller, request, state: PendingCommit { proof_id } }
    }

    /// The submitted proof's registry key.
    pub fn proof_id(&self) -> &ProofId {
        &self.state.proof_id
    }

    /// Check the committed record.
    ///
    /// # Errors
    ///
    /// `ProofNotVerified` if absent or invalid; `Unauthorized` if another
    /// account submitted it.
    pub fn confirm(self, ledger: &Ledger) -> Result<ListingFlow<Verified>, LedgerError> {
        let proof_id = self.state.proof_id;
        let record = ledger
            .get_record(&proof_id)
            .ok_or_else(|| LedgerError::ProofNotVerified(format!("{proof_id} has no record")))?;
        if !record.is_valid {
            return Err(LedgerError::ProofNotVerified(format!("{proof_id} did not verify")));
        }
        if record.submitter != self.seller {
            return Err(LedgerError::Unauthorized(format!("{proof_id} was submitted by {}", record.submitter)));
        }
        Ok(ListingFlow { seller: self.seller, request: self.request, state: Verified { proof_id } })
    }
}

impl ListingFlow<Verified> {
    /// The verified proof's registry key.
    pub fn proof_id(&self) -> &ProofId {
        &self.state.proof_id
    }

    /// List the dataset behind the verified proof, in a new unit of work.
    pub fn list(self, ledger: &Ledger, now: Timestamp, min_quality: u8) -> Result<ListingFlow<Listed>, LedgerError> {
        let proof_id = self.state.proof_id;
        let request = self.request.clone();
        let sequence = ledger.transact(self.seller, now, |tx| {
            tx.list_gated(&proof_id, request, min_quality)?;
            Ok(tx.sequence())
        })?;
        tracing::info!(dataset = %self.request.dataset_id, seq = sequence, "listing flow complete");
        Ok(ListingFlow { seller: self.seller, request: self.request, state: Listed { proof_id, sequence } })
    }
}

impl ListingFlow<Listed> {
    /// The proof backing the listing.
    pub fn proof_id(&self) -> &ProofId {
        &self.state.proof_id
    }

    /// Sequence number of the listing unit.
    pub fn sequence(&self) -> u64 {
        self.state.sequence
    }
}
