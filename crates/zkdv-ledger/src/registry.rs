//! # Proof Registry
//!
//! Durable `ProofId -> ProofRecord` table. Records are upserted and never
//! deleted: resubmitting a proof overwrites its record (latest outcome
//! wins) without growing the table.
//!
//! The registry only stores outcomes. [`Tx::verify_and_submit`] is the
//! trustless path: it runs the verification gate against the family's
//! registered key and records what the gate decided. [`Tx::submit_batch`]
//! is an admin backfill path that records caller-supplied validity.
//!
//! Also holds the per-family verification key store. Keys are write-once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zkdv_core::{Address, ProofFamily, ProofId, Timestamp};
use zkdv_zkp::VerificationKey;

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::Tx;

/// Outcome of verifying one proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Account that submitted the proof.
    pub submitter: Address,
    /// Statement family.
    pub family: ProofFamily,
    /// When the outcome was recorded.
    pub verified_at: Timestamp,
    /// Whether the proof verified.
    pub is_valid: bool,
}

impl ProofRecord {
    /// The record reported for ids that were never submitted.
    pub fn sentinel() -> Self {
        Self {
            submitter: Address::ZERO,
            family: ProofFamily::none(),
            verified_at: Timestamp::epoch(),
            is_valid: false,
        }
    }
}

/// Three-way registry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofStatus {
    /// Never submitted.
    Absent,
    /// Submitted and did not verify.
    Rejected,
    /// Submitted and verified.
    Accepted,
}

impl std::fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Absent => "absent",
            Self::Rejected => "rejected",
            Self::Accepted => "accepted",
        })
    }
}

/// The record table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofRegistry {
    records: BTreeMap<ProofId, ProofRecord>,
    total_proofs: u64,
}

impl ProofRegistry {
    /// Insert or overwrite the record for `id`. Returns `true` when `id` was
    /// not present before, in which case `total_proofs` grows by one.
    pub fn submit(
        &mut self,
        id: ProofId,
        submitter: Address,
        family: ProofFamily,
        verified_at: Timestamp,
        is_valid: bool,
    ) -> bool {
        let record = ProofRecord { submitter, family, verified_at, is_valid };
        let is_new = self.records.insert(id, record).is_none();
        if is_new {
            self.total_proofs += 1;
        }
        is_new
    }

    /// True iff a record exists and it is valid.
    pub fn is_verified(&self, id: &ProofId) -> bool {
        self.records.get(id).is_some_and(|r| r.is_valid)
    }

    /// The record for `id`.
    pub fn get_record(&self, id: &ProofId) -> Option<&ProofRecord> {
        self.records.get(id)
    }

    /// The record for `id`, or [`ProofRecord::sentinel`].
    pub fn record_or_sentinel(&self, id: &ProofId) -> ProofRecord {
        self.records.get(id).cloned().unwrap_or_else(ProofRecord::sentinel)
    }

    /// Absent, rejected, or accepted.
    pub fn status(&self, id: &ProofId) -> ProofStatus {
        match self.records.get(id) {
            None => ProofStatus::Absent,
            Some(r) if r.is_valid => ProofStatus::Accepted,
            Some(_) => ProofStatus::Rejected,
        }
    }

    /// Distinct ids ever recorded.
    pub fn total_proofs(&self) -> u64 {
        self.total_proofs
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Write-once verification keys, one per family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyStore {
    keys: BTreeMap<ProofFamily, VerificationKey>,
}

impl KeyStore {
    /// Store `key` under its family.
    pub fn register(&mut self, key: VerificationKey) -> Result<(), LedgerError> {
        let family = key.family().clone();
        if self.keys.contains_key(&family) {
            return Err(LedgerError::AlreadyExists(format!(
                "verification key for family {family}"
            )));
        }
        self.keys.insert(family, key);
        Ok(())
    }

    /// The key for `family`.
    pub fn get(&self, family: &ProofFamily) -> Option<&VerificationKey> {
        self.keys.get(family)
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key is registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// What [`Tx::verify_and_submit`] recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Registry key of the proof.
    pub proof_id: ProofId,
    /// Gate decision.
    pub is_valid: bool,
    /// Whether this id was new to the registry.
    pub first_submission: bool,
}

impl Tx<'_> {
    /// Register the verification key for a family.
    ///
    /// When an admin is configured only the admin may register keys.
    pub fn register_key(&mut self, key: VerificationKey) -> Result<(), LedgerError> {
        if self.config.admin.is_some() {
            self.require_admin("key registration")?;
        }
        if key.family().as_str().is_empty() {
            return Err(LedgerError::Validation("key family must not be empty".into()));
        }
        if key.is_empty() {
            return Err(LedgerError::Validation("verification key is empty".into()));
        }
        let family = key.family().clone();
        let key_len = key.len() as u64;
        self.state.keys.register(key)?;
        tracing::info!(family = %family, key_len, "verification key registered");
        self.emit(LedgerEvent::KeyRegistered { family, key_len });
        Ok(())
    }

    /// Verify a proof against the family's key and record the outcome.
    ///
    /// Emits `ProofSubmitted` then `ProofVerified`, valid or not. A proof
    /// that fails verification is recorded as invalid and the unit still
    /// commits.
    ///
    /// # Errors
    ///
    /// `NotFound` if no key is registered for `family`; `Malformed` if the
    /// gate rejects the input shape, in which case nothing is recorded.
    pub fn verify_and_submit(
        &mut self,
        family: &ProofFamily,
        public_inputs: &[u8],
        proof: &[u8],
    ) -> Result<SubmissionOutcome, LedgerError> {
        let key = self
            .state
            .keys
            .get(family)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("verification key for family {family}")))?;
        let proof_id = ProofId::derive(self.config.proof_id_scheme, proof);
        self.emit(LedgerEvent::ProofSubmitted {
            proof_id: proof_id.clone(),
            submitter: self.sender,
            family: family.clone(),
        });

        let is_valid = self.gate.verify(&key, public_inputs, proof)?;

        let first_submission = self.state.registry.submit(
            proof_id.clone(),
            self.sender,
            family.clone(),
            self.now,
            is_valid,
        );
        self.pending_proofs.insert(proof_id.clone());
        self.emit(LedgerEvent::ProofVerified { proof_id: proof_id.clone(), is_valid });
        tracing::info!(
            proof = %proof_id,
            family = %family,
            submitter = %self.sender,
            is_valid,
            first_submission,
            "proof recorded"
        );
        Ok(SubmissionOutcome { proof_id, is_valid, first_submission })
    }

    /// Record caller-supplied outcomes for many proofs at once.
    ///
    /// Admin only. This path does not run the gate, so the registry trusts
    /// the admin for these records.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the sender is the configured admin;
    /// `Validation` if `ids` and `validity` differ in length.
    pub fn submit_batch(
        &mut self,
        ids: &[ProofId],
        family: &ProofFamily,
        validity: &[bool],
    ) -> Result<usize, LedgerError> {
        self.require_admin("batch submission")?;
        if ids.len() != validity.len() {
            return Err(LedgerError::Validation(format!(
                "{} proof ids but {} validity flags",
                ids.len(),
                validity.len()
            )));
        }
        for (id, is_valid) in ids.iter().zip(validity) {
            self.emit(LedgerEvent::ProofSubmitted {
                proof_id: id.clone(),
                submitter: self.sender,
                family: family.clone(),
            });
            self.state.registry.submit(id.clone(), self.sender, family.clone(), self.now, *is_valid);
            self.pending_proofs.insert(id.clone());
            self.emit(LedgerEvent::ProofVerified { proof_id: id.clone(), is_valid: *is_valid });
        }
        tracing::warn!(count = ids.len(), family = %family, "admin batch submission recorded without verification");
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        let mut b = [0u8; 32];
        b[31] = n;
        Address::from_bytes(b)
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn absent_id_reports_sentinel() {
        let reg = ProofRegistry::default();
        let id = ProofId::from_bytes(vec![1, 2, 3]);
        assert!(!reg.is_verified(&id));
        assert_eq!(reg.get_record(&id), None);
        assert_eq!(reg.status(&id), ProofStatus::Absent);
        let s = reg.record_or_sentinel(&id);
        assert_eq!(s.submitter, Address::ZERO);
        assert_eq!(s.family.as_str(), "");
        assert_eq!(s.verified_at.epoch_secs(), 0);
        assert!(!s.is_valid);
    }

    #[test]
    fn resubmission_overwrites_without_counting() {
        let mut reg = ProofRegistry::default();
        let id = ProofId::from_bytes(vec![9; 256]);
        assert!(reg.submit(id.clone(), addr(1), ProofFamily::authenticity(), ts("2026-01-01T00:00:00Z"), false));
        assert_eq!(reg.status(&id), ProofStatus::Rejected);
        assert!(!reg.submit(id.clone(), addr(2), ProofFamily::quality(), ts("2026-01-02T00:00:00Z"), true));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.total_proofs(), 1);
        let r = reg.get_record(&id).unwrap();
        assert_eq!(r.submitter, addr(2));
        assert_eq!(r.family, ProofFamily::quality());
        assert!(reg.is_verified(&id));
        assert_eq!(reg.status(&id), ProofStatus::Accepted);
    }

    #[test]
    fn key_store_is_write_once() {
        let mut ks = KeyStore::default();
        ks.register(VerificationKey::new(ProofFamily::quality(), vec![1; 264])).unwrap();
        let again = ks.register(VerificationKey::new(ProofFamily::quality(), vec![2; 264]));
        assert!(matches!(again, Err(LedgerError::AlreadyExists(_))));
        assert_eq!(ks.get(&ProofFamily::quality()).unwrap().as_bytes()[0], 1);
        assert_eq!(ks.len(), 1);
    }

    #[test]
    fn status_display() {
        assert_eq!(ProofStatus::Accepted.to_string(), "accepted");
        assert_eq!(serde_json::to_string(&ProofStatus::Absent).unwrap(), "\"absent\"");
    }
}
