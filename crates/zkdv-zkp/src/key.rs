//! # Verification Keys
//!
//! [`Groth16VerifyingKey`] is the structured, unprepared key. Preparing it
//! produces the byte layout the ledger stores and the pairing check reads:
//!
//! ```text
//! alpha (G1c, 32) || beta (G2c, 64) || gamma (G2c, 64) || delta (G2c, 64)
//!   || len(IC) (u64 LE, 8) || IC[0..len] (G1c, 32 each)
//! ```
//!
//! [`VerificationKey`] wraps those bytes with the proof family they verify.
//! It is opaque and immutable after construction.

use serde::{Deserialize, Serialize};
use zkdv_core::ProofFamily;

use crate::codec::{G1Point, G2Point};
use crate::compressed::{compress_g1, compress_g2, G1_COMPRESSED_LEN, G2_COMPRESSED_LEN};
use crate::error::CodecError;

/// Bytes before the IC vector: alpha, beta, gamma, delta, and the length.
pub const KEY_HEADER_LEN: usize = G1_COMPRESSED_LEN + 3 * G2_COMPRESSED_LEN + 8;

/// Smallest well-formed key: a header plus a single IC point (no public
/// inputs).
pub const MIN_VERIFICATION_KEY_LEN: usize = KEY_HEADER_LEN + G1_COMPRESSED_LEN;

/// An unprepared Groth16 verifying key over BN254.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groth16VerifyingKey {
    /// `alpha` in G1.
    pub alpha: G1Point,
    /// `beta` in G2.
    pub beta: G2Point,
    /// `gamma` in G2.
    pub gamma: G2Point,
    /// `delta` in G2.
    pub delta: G2Point,
    /// Input commitment bases; `ic[0]` is the constant term.
    pub ic: Vec<G1Point>,
}

impl Groth16VerifyingKey {
    /// Number of public inputs this key accepts.
    pub fn public_input_count(&self) -> usize {
        self.ic.len().saturating_sub(1)
    }

    /// Serialize to the prepared byte layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        if self.ic.is_empty() {
            return Err(CodecError::KeyFormat("IC must contain at least one point".into()));
        }
        let mut out = Vec::with_capacity(KEY_HEADER_LEN + self.ic.len() * G1_COMPRESSED_LEN);
        out.extend_from_slice(&compress_g1(&self.alpha)?);
        out.extend_from_slice(&compress_g2(&self.beta)?);
        out.extend_from_slice(&compress_g2(&self.gamma)?);
        out.extend_from_slice(&compress_g2(&self.delta)?);
        out.extend_from_slice(&(self.ic.len() as u64).to_le_bytes());
        for point in &self.ic {
            out.extend_from_slice(&compress_g1(point)?);
        }
        Ok(out)
    }
}

/// Read the public-input count declared by prepared key bytes.
///
/// Returns `None` when the header is missing, the IC length is zero, or the
/// total length disagrees with the declared IC length.
pub fn declared_inputs(bytes: &[u8]) -> Option<usize> {
    let len_bytes: [u8; 8] = bytes.get(KEY_HEADER_LEN - 8..KEY_HEADER_LEN)?.try_into().ok()?;
    let ic_len = usize::try_from(u64::from_le_bytes(len_bytes)).ok()?;
    let expected = ic_len.checked_mul(G1_COMPRESSED_LEN)?.checked_add(KEY_HEADER_LEN)?;
    if ic_len == 0 || expected != bytes.len() {
        return None;
    }
    Some(ic_len - 1)
}

/// A prepared verification key bound to a proof family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    family: ProofFamily,
    #[serde(with = "hex_bytes")]
    bytes: Vec<u8>,
}

impl VerificationKey {
    /// Wrap already-prepared key bytes. No structural check is made; the
    /// gate validates shape at verification time.
    pub fn new(family: ProofFamily, bytes: Vec<u8>) -> Self {
        Self { family, bytes }
    }

    /// Prepare a structured key for `family`.
    pub fn prepare(family: ProofFamily, vk: &Groth16VerifyingKey) -> Result<Self, CodecError> {
        Ok(Self { family, bytes: vk.to_bytes()? })
    }

    /// The family this key verifies.
    pub fn family(&self) -> &ProofFamily {
        &self.family
    }

    /// The prepared key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length of the prepared key.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key has no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Public-input count declared by the key header, if parseable.
    pub fn declared_inputs(&self) -> Option<usize> {
        declared_inputs(&self.bytes)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
