//! Shared fixtures for ledger integration tests.
//!
//! Every harness runs against [`MockPairingCheck`], with one key registered
//! per proof family by the admin account.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use zkdv_core::{Address, DatasetId, PolicyId, ProofFamily, ProofId, Timestamp};
use zkdv_ledger::{Ledger, LedgerError, ListingRequest, MarketConfig, SubmissionOutcome};
use zkdv_zkp::{MockPairingCheck, VerificationGate, VerificationKey, PROOF_LEN};

pub const ADMIN: Address = account(0xAD);
pub const SELLER: Address = account(1);
pub const BUYER: Address = account(2);
pub const STRANGER: Address = account(3);
pub const TREASURY: Address = account(7);

pub const fn account(n: u8) -> Address {
    let mut b = [0u8; 32];
    b[31] = n;
    Address::from_bytes(b)
}

pub fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).expect("test timestamp")
}

/// Logical time most scenarios run at.
pub fn now() -> Timestamp {
    ts("2026-03-01T00:00:00Z")
}

/// Expiry most policies carry.
pub fn expiry() -> Timestamp {
    ts("2026-06-30T23:59:59Z")
}

/// Prepared key bytes. The header does not declare an input count, so the
/// gate accepts any whole number of scalars.
pub fn key_bytes() -> Vec<u8> {
    vec![0x5a; 300]
}

/// Public inputs for a statement, one scalar per element.
pub fn inputs(values: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 32);
    for v in values {
        let mut scalar = [0u8; 32];
        scalar[0] = *v;
        out.extend_from_slice(&scalar);
    }
    out
}

pub struct Harness {
    pub ledger: Ledger,
    pub mock: MockPairingCheck,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(MarketConfig { admin: Some(ADMIN), ..MarketConfig::default() })
    }

    pub fn with_config(config: MarketConfig) -> Self {
        let mock = MockPairingCheck;
        let ledger = Ledger::new(config, VerificationGate::new(Arc::new(mock))).expect("ledger");
        let sender = ledger.config().admin.unwrap_or(SELLER);
        ledger
            .transact(sender, now(), |tx| {
                tx.register_key(VerificationKey::new(ProofFamily::authenticity(), key_bytes()))?;
                tx.register_key(VerificationKey::new(ProofFamily::quality(), key_bytes()))
            })
            .expect("key registration");
        Self { ledger, mock }
    }

    /// A proof the mock accepts for `public_inputs`.
    pub fn valid_proof(&self, public_inputs: &[u8]) -> [u8; PROOF_LEN] {
        self.mock.prove(&key_bytes(), public_inputs)
    }

    /// Submit in its own unit of work.
    pub fn submit(
        &self,
        sender: Address,
        family: &ProofFamily,
        public_inputs: &[u8],
        proof: &[u8],
    ) -> Result<SubmissionOutcome, LedgerError> {
        self.ledger.transact(sender, now(), |tx| tx.verify_and_submit(family, public_inputs, proof))
    }

    /// Submit a valid authenticity proof and return its id.
    pub fn verified_proof(&self, sender: Address, statement: u8) -> ProofId {
        let public = inputs(&[statement]);
        let proof = self.valid_proof(&public);
        let outcome =
            self.submit(sender, &ProofFamily::authenticity(), &public, &proof).expect("submission");
        assert!(outcome.is_valid);
        outcome.proof_id
    }

    pub fn fund(&self, account: Address, amount: u64) {
        self.ledger.transact(ADMIN, now(), |tx| tx.deposit(account, amount)).expect("deposit");
    }

    pub fn policy(&self, owner: Address, allowed: &[Address], max_uses: u64) -> PolicyId {
        let allowed: BTreeSet<Address> = allowed.iter().copied().collect();
        self.ledger
            .transact(owner, now(), |tx| tx.create_policy(allowed, expiry(), max_uses))
            .expect("policy")
    }

    /// Seller creates a policy for the buyer and lists `dataset` at `price`.
    pub fn listed(&self, dataset: &str, price: u64) -> (DatasetId, PolicyId) {
        let policy = self.policy(SELLER, &[BUYER], 1);
        let request = request(dataset, price, policy, 80);
        self.ledger.transact(SELLER, now(), |tx| tx.list(request)).expect("listing");
        (DatasetId::new(dataset).expect("dataset id"), policy)
    }

    pub fn burn(&self, owner: Address, policy: PolicyId) {
        self.ledger.transact(owner, now(), |tx| tx.burn_policy(&policy)).expect("burn");
    }

    /// Every scenario ends with no outstanding policies and an intact chain.
    pub fn finish(self) {
        assert_eq!(self.ledger.outstanding_policies(), 0, "policy leaked");
        assert!(self.ledger.verify_event_chain());
    }
}

pub fn request(dataset: &str, price: u64, policy_ref: PolicyId, quality_score: u8) -> ListingRequest {
    ListingRequest {
        dataset_id: DatasetId::new(dataset).expect("dataset id"),
        price,
        locator: format!("blob://{dataset}"),
        policy_ref,
        quality_score,
    }
}
