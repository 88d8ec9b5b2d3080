//! # zkdv-core — Foundational Types for zkDataVault Settlement
//!
//! Every other crate in the workspace depends on `zkdv-core`; it depends on
//! nothing internal. It defines the identifiers, timestamps, and digest
//! primitives that the proof codec, the verification registry, and the
//! settlement ledger share.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `Address`, `DatasetId`,
//!    `PolicyId`, `ProofId`, `ProofFamily` are distinct types. A dataset id
//!    cannot be passed where a proof id is expected.
//!
//! 2. **`CanonicalBytes` for every JSON digest.** Event hash-chain links are
//!    computed over JCS-canonical bytes, never over ad-hoc `to_vec()` output.
//!
//! 3. **UTC-only timestamps.** `Timestamp` carries seconds precision, which
//!    is the granularity policy expiry and proof records are compared at.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkdv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, Sha256Accumulator};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{Address, DatasetId, PolicyId, ProofFamily, ProofId, ProofIdScheme};
pub use temporal::Timestamp;
