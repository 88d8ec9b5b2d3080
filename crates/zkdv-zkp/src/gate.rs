//! # Verification Gate
//!
//! Decision wrapper around an injected pairing check. The gate owns shape
//! validation; the pairing check owns the cryptography.
//!
//! Preconditions checked before any pairing work:
//!
//! 1. key length is at least the configured minimum (264 bytes by default);
//! 2. public inputs are a whole number of 32-byte scalars;
//! 3. the proof is exactly 256 bytes;
//! 4. when the key header is parseable, the public-input count matches the
//!    count the key declares.
//!
//! [`VerificationGate::verify`] reports a failed precondition as
//! [`GateError::Malformed`], separate from a proof that simply does not
//! verify. [`VerificationGate::verify_lenient`] folds both into `false`.

use std::sync::Arc;

use crate::codec::{PROOF_LEN, SCALAR_LEN};
use crate::error::GateError;
use crate::key::{VerificationKey, MIN_VERIFICATION_KEY_LEN};

/// The Groth16 pairing equation over BN254, supplied by the host.
///
/// Implementations receive inputs that already passed the gate's shape
/// checks and must be pure: same bytes in, same answer out.
pub trait PairingCheck: Send + Sync {
    /// Whether `proof` verifies against `key` for `public_inputs`.
    fn check(&self, key: &[u8], public_inputs: &[u8], proof: &[u8]) -> bool;
}

/// Shape validation plus an injected [`PairingCheck`].
#[derive(Clone)]
pub struct VerificationGate {
    pairing: Arc<dyn PairingCheck>,
    min_key_len: usize,
}

impl std::fmt::Debug for VerificationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationGate")
            .field("min_key_len", &self.min_key_len)
            .finish_non_exhaustive()
    }
}

impl VerificationGate {
    /// A gate with the default minimum key length.
    pub fn new(pairing: Arc<dyn PairingCheck>) -> Self {
        Self { pairing, min_key_len: MIN_VERIFICATION_KEY_LEN }
    }

    /// Override the minimum key length.
    pub fn with_min_key_len(mut self, min_key_len: usize) -> Self {
        self.min_key_len = min_key_len;
        self
    }

    /// The configured minimum key length.
    pub fn min_key_len(&self) -> usize {
        self.min_key_len
    }

    fn validate(&self, key: &[u8], public_inputs: &[u8], proof: &[u8]) -> Result<(), GateError> {
        if key.len() < self.min_key_len {
            return Err(GateError::Malformed(format!(
                "verification key is {} bytes, minimum is {}",
                key.len(),
                self.min_key_len
            )));
        }
        if public_inputs.len() % SCALAR_LEN != 0 {
            return Err(GateError::Malformed(format!(
                "public inputs are {} bytes, not a multiple of {SCALAR_LEN}",
                public_inputs.len()
            )));
        }
        if proof.len() != PROOF_LEN {
            return Err(GateError::Malformed(format!(
                "proof is {} bytes, expected {PROOF_LEN}",
                proof.len()
            )));
        }
        if let Some(declared) = crate::key::declared_inputs(key) {
            let supplied = public_inputs.len() / SCALAR_LEN;
            if declared != supplied {
                return Err(GateError::Malformed(format!(
                    "key declares {declared} public inputs, {supplied} supplied"
                )));
            }
        }
        Ok(())
    }

    /// Strict verification.
    ///
    /// # Errors
    ///
    /// `Malformed` if any precondition fails. The pairing check is not run.
    pub fn verify(
        &self,
        key: &VerificationKey,
        public_inputs: &[u8],
        proof: &[u8],
    ) -> Result<bool, GateError> {
        self.validate(key.as_bytes(), public_inputs, proof)?;
        let accepted = self.pairing.check(key.as_bytes(), public_inputs, proof);
        tracing::debug!(
            family = %key.family(),
            inputs = public_inputs.len() / SCALAR_LEN,
            accepted,
            "pairing check evaluated"
        );
        Ok(accepted)
    }

    /// Boolean verification: malformed input is simply not valid.
    pub fn verify_lenient(&self, key: &VerificationKey, public_inputs: &[u8], proof: &[u8]) -> bool {
        match self.verify(key, public_inputs, proof) {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::debug!(family = %key.family(), error = %e, "lenient gate rejected input");
                false
            }
        }
    }
}
