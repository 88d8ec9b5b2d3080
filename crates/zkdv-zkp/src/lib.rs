//! # zkdv-zkp: Groth16 Proof Artifacts
//!
//! Everything between a prover's output and the verifier's input.
//!
//! ## Architecture
//!
//! - **Field** (`field.rs`): BN254 base and scalar moduli, decimal parsing
//!   with overflow and range checks.
//! - **Codec** (`codec.rs`): the 256-byte proof wire format and the
//!   little-endian public-input encoding.
//! - **Compressed** (`compressed.rs`): arkworks-compatible compressed point
//!   encoding, used for verification keys and compact proofs.
//! - **snarkjs** (`snarkjs.rs`): `proof.json`, `public.json` and
//!   `verification_key.json` interchange.
//! - **Key** (`key.rs`): verification key preparation and the opaque
//!   per-family `VerificationKey`.
//! - **Gate** (`gate.rs`): the `PairingCheck` seam and the strict and
//!   lenient verification wrappers.
//! - **Mock** (`mock.rs`, feature `mock`): a deterministic SHA-256 pairing
//!   check for tests and local runs.
//!
//! ## Crate Policy
//!
//! - No elliptic-curve arithmetic. Points are carried as coordinates and
//!   checked only for field range; the pairing check is injected.
//! - Byte layouts are pinned by fixed vectors in the tests, and the
//!   compressed forms against arkworks output.

pub mod codec;
pub mod compressed;
pub mod error;
pub mod field;
pub mod gate;
pub mod key;
#[cfg(feature = "mock")]
pub mod mock;
pub mod snarkjs;

pub use codec::{
    decode_proof, decode_public_inputs, encode_proof, encode_public_inputs, Fq2, G1Point,
    G2Point, Groth16Proof, PROOF_LEN, SCALAR_LEN,
};
pub use error::{CodecError, GateError};
pub use gate::{PairingCheck, VerificationGate};
pub use key::{Groth16VerifyingKey, VerificationKey, MIN_VERIFICATION_KEY_LEN};
#[cfg(feature = "mock")]
pub use mock::MockPairingCheck;

/// Re-exported so callers can build coordinates and scalars without a
/// direct dependency.
pub use alloy_primitives::U256;
