//! # Ledger and Unit of Work
//!
//! [`Ledger`] owns all mutable state. Every mutation runs inside
//! [`Ledger::transact`], which:
//!
//! 1. takes the ledger lock, so units of work are totally ordered;
//! 2. hands the closure a [`Tx`] over a **snapshot** of the state;
//! 3. on `Ok`, chains the buffered events onto the log, swaps the snapshot
//!    in, and assigns the next sequence number;
//! 4. on `Err`, drops the snapshot. No state, no events, no sequence number.
//!
//! Queries read committed state only.
//!
//! ## Reentrancy
//!
//! The lock is not reentrant. Calling `transact` or a query on the same
//! ledger from inside a closure deadlocks; use the [`Tx`] accessors
//! instead.

use std::collections::BTreeSet;

use parking_lot::Mutex;
use zkdv_core::{Address, ContentDigest, DatasetId, PolicyId, ProofFamily, ProofId, Timestamp};
use zkdv_zkp::{VerificationGate, VerificationKey};

use crate::balances::Balances;
use crate::config::MarketConfig;
use crate::error::LedgerError;
use crate::events::{EventLog, EventRecord, LedgerEvent};
use crate::listing::{Directory, Listing};
use crate::policy::{AccessPolicy, PolicyBook};
use crate::registry::{KeyStore, ProofRecord, ProofRegistry, ProofStatus};

/// Everything a unit of work may change.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    pub(crate) balances: Balances,
    pub(crate) registry: ProofRegistry,
    pub(crate) keys: KeyStore,
    pub(crate) policies: PolicyBook,
    pub(crate) directory: Directory,
}

impl LedgerState {
    /// Account balances.
    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    /// Proof records.
    pub fn registry(&self) -> &ProofRegistry {
        &self.registry
    }

    /// Registered verification keys.
    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Access policies and their issuance counters.
    pub fn policies(&self) -> &PolicyBook {
        &self.policies
    }

    /// Dataset listings.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}

#[derive(Debug, Default)]
struct Committed {
    state: LedgerState,
    log: EventLog,
    sequence: u64,
}

/// The settlement ledger.
pub struct Ledger {
    config: MarketConfig,
    gate: VerificationGate,
    inner: Mutex<Committed>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Ledger")
            .field("sequence", &inner.sequence)
            .field("events", &inner.log.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A unit of work in progress.
///
/// Operations are methods on `Tx`, defined next to the state they touch.
/// They mutate the snapshot and buffer events; nothing is visible outside
/// until [`Ledger::transact`] commits.
pub struct Tx<'a> {
    pub(crate) config: &'a MarketConfig,
    pub(crate) gate: &'a VerificationGate,
    pub(crate) state: LedgerState,
    pub(crate) sender: Address,
    pub(crate) now: Timestamp,
    pub(crate) sequence: u64,
    pub(crate) events: Vec<LedgerEvent>,
    /// Proofs recorded in this unit. Gated operations refuse them until a
    /// later unit, since their record is not yet committed.
    pub(crate) pending_proofs: BTreeSet<ProofId>,
}

impl Tx<'_> {
    /// The account that issued this unit of work.
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Logical time of this unit of work.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// The sequence number this unit will receive if it commits.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Ledger configuration.
    pub fn config(&self) -> &MarketConfig {
        self.config
    }

    /// The snapshot, including this unit's uncommitted changes.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Events buffered so far.
    pub fn pending_events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub(crate) fn require_admin(&self, action: &str) -> Result<(), LedgerError> {
        match self.config.admin {
            Some(admin) if admin == self.sender => Ok(()),
            Some(_) => Err(LedgerError::Unauthorized(format!(
                "{action} is restricted to the admin account"
            ))),
            None => Err(LedgerError::Unauthorized(format!("{action} requires a configured admin"))),
        }
    }
}

impl Ledger {
    /// Build an empty ledger.
    ///
    /// The gate's minimum key length is taken from the configuration.
    pub fn new(config: MarketConfig, gate: VerificationGate) -> Result<Self, LedgerError> {
        config.validate().map_err(|e| LedgerError::Validation(e.to_string()))?;
        let gate = gate.with_min_key_len(config.min_verification_key_len);
        Ok(Self { config, gate, inner: Mutex::new(Committed::default()) })
    }

    /// Ledger configuration.
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Run `f` as one atomic unit of work issued by `sender` at `now`.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, with all of its effects discarded;
    /// `Unauthorized` for the zero sender.
    pub fn transact<T, F>(&self, sender: Address, now: Timestamp, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Tx<'_>) -> Result<T, LedgerError>,
    {
        let mut inner = self.inner.lock();
        let sequence = inner.sequence + 1;
        let result = if sender.is_zero() {
            Err(LedgerError::Unauthorized("the zero address cannot send".into()))
        } else {
            let mut tx = Tx {
                config: &self.config,
                gate: &self.gate,
                state: inner.state.clone(),
                sender,
                now,
                sequence,
                events: Vec::new(),
                pending_proofs: BTreeSet::new(),
            };
            f(&mut tx).and_then(|value| {
                let records = inner.log.link(sequence, sender, now, tx.events)?;
                Ok((value, tx.state, records))
            })
        };

        match result {
            Ok((value, state, records)) => {
                record_metrics(&records);
                tracing::info!(
                    seq = sequence,
                    sender = %sender,
                    events = records.len(),
                    "unit of work committed"
                );
                inner.state = state;
                inner.log.extend(records);
                inner.sequence = sequence;
                metrics::counter!("zkdv_tx_committed_total").increment(1);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(sender = %sender, error = %e, kind = e.kind(), "unit of work aborted");
                metrics::counter!("zkdv_tx_aborted_total", "kind" => e.kind()).increment(1);
                Err(e)
            }
        }
    }

    // ── Queries (committed state) ────────────────────────────────────

    /// Sequence number of the last committed unit; 0 before the first.
    pub fn sequence(&self) -> u64 {
        self.inner.lock().sequence
    }

    /// Whether a committed, valid record exists for `id`.
    pub fn is_verified(&self, id: &ProofId) -> bool {
        let verified = self.inner.lock().state.registry.is_verified(id);
        tracing::debug!(proof = %id, verified, "registry query");
        verified
    }

    /// The record for `id`, if any.
    pub fn get_record(&self, id: &ProofId) -> Option<ProofRecord> {
        self.inner.lock().state.registry.get_record(id).cloned()
    }

    /// The record for `id`, or the zero sentinel.
    pub fn record_or_sentinel(&self, id: &ProofId) -> ProofRecord {
        self.inner.lock().state.registry.record_or_sentinel(id)
    }

    /// Three-way status of `id`.
    pub fn proof_status(&self, id: &ProofId) -> ProofStatus {
        self.inner.lock().state.registry.status(id)
    }

    /// Number of distinct proof ids ever recorded.
    pub fn total_proofs(&self) -> u64 {
        self.inner.lock().state.registry.total_proofs()
    }

    /// The key registered for `family`.
    pub fn verification_key(&self, family: &ProofFamily) -> Option<VerificationKey> {
        self.inner.lock().state.keys.get(family).cloned()
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.inner.lock().state.balances.balance_of(account)
    }

    /// The policy `id`, if not burned.
    pub fn policy(&self, id: &PolicyId) -> Option<AccessPolicy> {
        self.inner.lock().state.policies.get(id).cloned()
    }

    /// Whether `identity` may use policy `id` at `now`. False for unknown
    /// or burned policies.
    pub fn check_access(&self, id: &PolicyId, identity: &Address, now: Timestamp) -> bool {
        self.inner
            .lock()
            .state
            .policies
            .get(id)
            .is_some_and(|p| p.check_access(identity, now))
    }

    /// Policies issued and not yet burned.
    pub fn outstanding_policies(&self) -> u64 {
        self.inner.lock().state.policies.outstanding()
    }

    /// The listing for `dataset_id`, if one was ever created.
    pub fn listing(&self, dataset_id: &DatasetId) -> Option<Listing> {
        self.inner.lock().state.directory.get(dataset_id).cloned()
    }

    /// Copy of all committed event records.
    pub fn events(&self) -> Vec<EventRecord> {
        self.inner.lock().log.records().to_vec()
    }

    /// Digest at the head of the event chain.
    pub fn event_head(&self) -> ContentDigest {
        self.inner.lock().log.head()
    }

    /// Recompute the event hash chain.
    pub fn verify_event_chain(&self) -> bool {
        self.inner.lock().log.verify_chain()
    }

    /// Run `f` against the committed state.
    pub fn with_state<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> T {
        f(&self.inner.lock().state)
    }
}

fn record_metrics(records: &[EventRecord]) {
    for r in records {
        match &r.event {
            LedgerEvent::ProofSubmitted { family, .. } => {
                metrics::counter!("zkdv_proofs_submitted_total", "family" => family.to_string())
                    .increment(1);
            }
            LedgerEvent::PurchaseCompleted { platform_fee, .. } => {
                metrics::counter!("zkdv_purchases_total").increment(1);
                metrics::counter!("zkdv_platform_fees_total").increment(*platform_fee);
            }
            _ => {}
        }
    }
}
