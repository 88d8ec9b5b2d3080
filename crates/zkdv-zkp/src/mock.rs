//! # Mock Pairing Check
//!
//! A deterministic, transparent stand-in for the BN254 pairing equation,
//! for tests and local runs of the ledger.
//!
//! ## How It Works
//!
//! - [`MockPairingCheck::prove`] derives each of the eight 32-byte proof
//!   limbs as `SHA256(domain || limb_index || key || public_inputs)` with the
//!   top byte cleared, so every limb is a valid base-field element and the
//!   result decodes through the wire codec.
//! - [`PairingCheck::check`] recomputes the same bytes and compares.
//!
//! ## Security Warning
//!
//! **NOT SOUND.** Anyone holding the key and inputs can produce an accepted
//! proof. Never wire this into a deployment that settles real value.

use zkdv_core::Sha256Accumulator;

use crate::codec::{PROOF_LEN, SCALAR_LEN};
use crate::gate::PairingCheck;

const DOMAIN: &[u8] = b"zkdv-mock-groth16-v1";

/// SHA-256 mock of the Groth16 pairing check.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPairingCheck;

impl MockPairingCheck {
    /// The unique proof this mock accepts for `key` and `public_inputs`.
    pub fn prove(&self, key: &[u8], public_inputs: &[u8]) -> [u8; PROOF_LEN] {
        let mut out = [0u8; PROOF_LEN];
        for (i, limb) in out.chunks_exact_mut(SCALAR_LEN).enumerate() {
            let mut acc = Sha256Accumulator::new();
            acc.update(DOMAIN);
            acc.update(&[i as u8]);
            acc.update(key);
            acc.update(public_inputs);
            limb.copy_from_slice(acc.finalize().as_bytes());
            limb[0] = 0;
        }
        out
    }
}

impl PairingCheck for MockPairingCheck {
    fn check(&self, key: &[u8], public_inputs: &[u8], proof: &[u8]) -> bool {
        proof == self.prove(key, public_inputs).as_slice()
    }
}
