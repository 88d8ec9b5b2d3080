//! # Event Log
//!
//! Append-only, hash-chained record of every committed effect. Observers
//! (indexers, the presentation layer) replay this log; nothing else leaves
//! the ledger.
//!
//! ## Chain
//!
//! Each record's digest is `SHA256(JCS({seq, tx, sender, at, prev, event}))`
//! where `prev` is the previous record's digest, or all zeros for the
//! first record. Rewriting any record breaks every later link.
//!
//! Records are produced only at commit time, from the events a unit of work
//! buffered. An aborted unit leaves no trace here.

use serde::{Deserialize, Serialize};
use zkdv_core::{
    sha256_digest, Address, CanonicalBytes, ContentDigest, DatasetId, PolicyId, ProofFamily,
    ProofId, Timestamp,
};

use crate::error::LedgerError;

/// A domain event emitted by a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// External funds credited to an account.
    Deposited {
        /// Credited account.
        account: Address,
        /// Amount credited.
        amount: u64,
    },
    /// A verification key was registered for a family.
    KeyRegistered {
        /// The family the key verifies.
        family: ProofFamily,
        /// Key length in bytes.
        key_len: u64,
    },
    /// A proof was received, before verification.
    ProofSubmitted {
        /// Registry key.
        proof_id: ProofId,
        /// Submitting account.
        submitter: Address,
        /// Proof family.
        family: ProofFamily,
    },
    /// Verification finished, whatever the outcome.
    ProofVerified {
        /// Registry key.
        proof_id: ProofId,
        /// Outcome recorded in the registry.
        is_valid: bool,
    },
    /// An access policy was created.
    PolicyCreated {
        /// New policy.
        policy_id: PolicyId,
        /// Grantor.
        owner: Address,
        /// Usage limit.
        max_uses: u64,
        /// Expiry instant.
        expiry: Timestamp,
    },
    /// An access policy was used.
    AccessGranted {
        /// The policy.
        policy_id: PolicyId,
        /// Identity that used it.
        identity: Address,
        /// Uses so far, including this one.
        uses: u64,
    },
    /// An access policy was revoked.
    PolicyRevoked {
        /// The policy.
        policy_id: PolicyId,
    },
    /// An access policy was destroyed.
    PolicyBurned {
        /// The policy.
        policy_id: PolicyId,
    },
    /// A dataset was listed for sale.
    ListingCreated {
        /// Listed dataset.
        dataset_id: DatasetId,
        /// Seller and creator.
        seller: Address,
        /// Price in indivisible units.
        price: u64,
        /// Quality score attested for the dataset.
        quality_score: u8,
        /// Policy gating decryption.
        policy_ref: PolicyId,
    },
    /// A purchase settled.
    PurchaseCompleted {
        /// Purchased dataset.
        dataset_id: DatasetId,
        /// Buyer.
        buyer: Address,
        /// Seller at time of sale.
        seller: Address,
        /// Listing price.
        price: u64,
        /// Share credited to the treasury.
        platform_fee: u64,
        /// Share credited to the creator.
        creator_royalty: u64,
        /// Share credited to the seller in royalty mode; zero otherwise.
        reseller_share: u64,
    },
    /// The buyer may now obtain the decryption key.
    DecryptionGranted {
        /// Purchased dataset.
        dataset_id: DatasetId,
        /// Buyer.
        buyer: Address,
        /// Policy gating decryption.
        policy_ref: PolicyId,
    },
}

impl LedgerEvent {
    /// Snake-case event name, matching the serialized `kind` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "deposited",
            Self::KeyRegistered { .. } => "key_registered",
            Self::ProofSubmitted { .. } => "proof_submitted",
            Self::ProofVerified { .. } => "proof_verified",
            Self::PolicyCreated { .. } => "policy_created",
            Self::AccessGranted { .. } => "access_granted",
            Self::PolicyRevoked { .. } => "policy_revoked",
            Self::PolicyBurned { .. } => "policy_burned",
            Self::ListingCreated { .. } => "listing_created",
            Self::PurchaseCompleted { .. } => "purchase_completed",
            Self::DecryptionGranted { .. } => "decryption_granted",
        }
    }
}

/// A committed event with its chain link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, from 0.
    pub seq: u64,
    /// Sequence number of the unit of work that emitted it.
    pub tx: u64,
    /// Sender of that unit of work.
    pub sender: Address,
    /// Logical time of that unit of work.
    pub at: Timestamp,
    /// Digest of the previous record.
    pub prev: ContentDigest,
    /// The event.
    pub event: LedgerEvent,
    /// Digest of this record.
    pub digest: ContentDigest,
}

#[derive(Serialize)]
struct Link<'a> {
    seq: u64,
    tx: u64,
    sender: &'a Address,
    at: &'a Timestamp,
    prev: &'a ContentDigest,
    event: &'a LedgerEvent,
}

fn link_digest(
    seq: u64,
    tx: u64,
    sender: &Address,
    at: &Timestamp,
    prev: &ContentDigest,
    event: &LedgerEvent,
) -> Result<ContentDigest, LedgerError> {
    let link = Link { seq, tx, sender, at, prev, event };
    Ok(sha256_digest(&CanonicalBytes::new(&link)?))
}

/// The append-only event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Digest of the last record, or zero for an empty log.
    pub fn head(&self) -> ContentDigest {
        self.records.last().map(|r| r.digest).unwrap_or(ContentDigest::ZERO)
    }

    /// All records in order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Chain `events` onto the current head without modifying the log.
    ///
    /// The caller appends the result with [`EventLog::extend`] once the rest
    /// of the commit is known to succeed.
    pub fn link(
        &self,
        tx: u64,
        sender: Address,
        at: Timestamp,
        events: Vec<LedgerEvent>,
    ) -> Result<Vec<EventRecord>, LedgerError> {
        let mut prev = self.head();
        let mut seq = self.records.len() as u64;
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            let digest = link_digest(seq, tx, &sender, &at, &prev, &event)?;
            out.push(EventRecord { seq, tx, sender, at, prev, event, digest });
            prev = digest;
            seq += 1;
        }
        Ok(out)
    }

    /// Append records produced by [`EventLog::link`] against the current head.
    pub fn extend(&mut self, records: Vec<EventRecord>) {
        self.records.extend(records);
    }

    /// Recompute every link. `false` if any record was altered.
    pub fn verify_chain(&self) -> bool {
        let mut prev = ContentDigest::ZERO;
        for (i, r) in self.records.iter().enumerate() {
            if r.seq != i as u64 || r.prev != prev {
                return false;
            }
            match link_digest(r.seq, r.tx, &r.sender, &r.at, &r.prev, &r.event) {
                Ok(d) if d == r.digest => prev = d,
                _ => return false,
            }
        }
        true
    }
}
