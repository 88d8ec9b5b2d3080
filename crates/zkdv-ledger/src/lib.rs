//! # zkdv-ledger — Proof-Gated Data Marketplace Settlement
//!
//! The stateful half of zkDataVault: a proof registry fed by the
//! verification gate, time- and usage-bounded access policies, a dataset
//! directory, and atomic purchase settlement with platform fee and creator
//! royalty.
//!
//! ## Unit of Work
//!
//! All mutation goes through [`Ledger::transact`]. A unit of work sees a
//! snapshot of the state, buffers its events, and either commits whole or
//! leaves no trace. Units are serialized by one lock, so there is no
//! interleaving and no reentrancy.
//!
//! ```text
//! ledger.transact(sender, now, |tx| {
//!     tx.deposit(buyer, 10_000)?;
//!     tx.purchase(&dataset, 10_000, Some(treasury))
//! })
//! ```
//!
//! Operations are `Tx` methods, defined in the module that owns the state
//! they touch:
//!
//! | Module | Operations |
//! |--------|-----------|
//! | `balances` | `deposit` |
//! | `registry` | `register_key`, `verify_and_submit`, `submit_batch` |
//! | `policy` | `create_policy`, `increment_usage`, `revoke_policy`, `burn_policy` |
//! | `listing` | `list` |
//! | `settlement` | `purchase` |
//! | `gate` | `list_gated`, `purchase_gated` |
//!
//! ## Events
//!
//! Committed events are hash-chained (see [`events`]). Metrics counters are
//! derived from them at commit time, so an aborted unit never moves a
//! counter other than `zkdv_tx_aborted_total`.

pub mod balances;
pub mod config;
pub mod error;
pub mod events;
pub mod flow;
pub mod gate;
pub mod ledger;
pub mod listing;
pub mod policy;
pub mod registry;
pub mod royalty;
pub mod settlement;

// ─── Ledger re-exports ──────────────────────────────────────────────

pub use error::LedgerError;
pub use ledger::{Ledger, LedgerState, Tx};

// ─── Configuration re-exports ───────────────────────────────────────

pub use config::{ConfigError, MarketConfig};

// ─── State re-exports ───────────────────────────────────────────────

pub use balances::Balances;
pub use events::{EventLog, EventRecord, LedgerEvent};
pub use flow::{AwaitingProof, FlowState, Listed, ListingFlow, PendingCommit, Verified};
pub use listing::{Directory, Listing, ListingRequest};
pub use policy::{AccessPolicy, PolicyBook};
pub use registry::{KeyStore, ProofRecord, ProofRegistry, ProofStatus, SubmissionOutcome};

// ─── Settlement re-exports ──────────────────────────────────────────

pub use royalty::{RoyaltyConfig, RoyaltySplit, BPS_DENOMINATOR};
pub use settlement::{
    flat_fee_split, split_price, FeeSplit, PurchaseReceipt, SettlementPolicy, DEFAULT_FEE_PERCENT,
};
