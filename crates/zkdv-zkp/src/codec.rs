//! # Proof Wire Codec
//!
//! Stateless conversion between native Groth16/BN254 objects and the bytes
//! the on-chain verifier consumes.
//!
//! ## Proof layout (256 bytes)
//!
//! Eight 32-byte **big-endian** integers:
//!
//! ```text
//! a.x | a.y | b.y.c0 | b.y.c1 | b.x.c0 | b.x.c1 | c.x | c.y
//! ```
//!
//! The G2 point is written y before x. This matches the deployed verifier
//! and is pinned by `g2_limb_order_is_pinned` below; re-check it whenever
//! the verifier changes.
//!
//! ## Public-input layout
//!
//! `N` scalars, each 32 bytes **little-endian**, in statement order. The
//! verifier reads proofs big-endian and scalars little-endian; both layouts
//! are pinned by tests.

use alloy_primitives::U256;

use crate::error::CodecError;
use crate::field::Field;

/// Length of an encoded proof.
pub const PROOF_LEN: usize = 256;

/// Length of one encoded scalar or coordinate.
pub const SCALAR_LEN: usize = 32;

/// An affine G1 point, coordinates in `Fq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct G1Point {
    /// x coordinate.
    pub x: U256,
    /// y coordinate.
    pub y: U256,
}

/// An element of `Fq2 = Fq[u] / (u^2 + 1)`, written `c0 + c1 * u`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fq2 {
    /// Real component.
    pub c0: U256,
    /// Imaginary component.
    pub c1: U256,
}

/// An affine G2 point, coordinates in `Fq2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct G2Point {
    /// x coordinate.
    pub x: Fq2,
    /// y coordinate.
    pub y: Fq2,
}

/// A Groth16 proof `(A, B, C)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Groth16Proof {
    /// `A` in G1.
    pub a: G1Point,
    /// `B` in G2.
    pub b: G2Point,
    /// `C` in G1.
    pub c: G1Point,
}

impl G1Point {
    /// Build from coordinates.
    pub fn new(x: U256, y: U256) -> Self {
        Self { x, y }
    }

    /// Whether this is the all-zero encoding of the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Fail unless both coordinates are in `Fq`.
    pub fn ensure_in_field(&self) -> Result<(), CodecError> {
        Field::Base.ensure(&self.x)?;
        Field::Base.ensure(&self.y)
    }
}

impl Fq2 {
    /// Build from components.
    pub fn new(c0: U256, c1: U256) -> Self {
        Self { c0, c1 }
    }

    /// Whether both components are zero.
    pub fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    /// Fail unless both components are in `Fq`.
    pub fn ensure_in_field(&self) -> Result<(), CodecError> {
        Field::Base.ensure(&self.c0)?;
        Field::Base.ensure(&self.c1)
    }
}

impl G2Point {
    /// Build from coordinates.
    pub fn new(x: Fq2, y: Fq2) -> Self {
        Self { x, y }
    }

    /// Whether this is the all-zero encoding of the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Fail unless every component is in `Fq`.
    pub fn ensure_in_field(&self) -> Result<(), CodecError> {
        self.x.ensure_in_field()?;
        self.y.ensure_in_field()
    }
}

impl Groth16Proof {
    /// The eight coordinates in wire order.
    fn wire_limbs(&self) -> [U256; 8] {
        [
            self.a.x, self.a.y, self.b.y.c0, self.b.y.c1, self.b.x.c0, self.b.x.c1, self.c.x,
            self.c.y,
        ]
    }

    fn from_wire_limbs(l: [U256; 8]) -> Self {
        Self {
            a: G1Point::new(l[0], l[1]),
            b: G2Point::new(Fq2::new(l[4], l[5]), Fq2::new(l[2], l[3])),
            c: G1Point::new(l[6], l[7]),
        }
    }
}

/// Encode a proof into its 256-byte wire form.
///
/// # Errors
///
/// `OutOfField` if any coordinate is not below the base-field modulus.
pub fn encode_proof(proof: &Groth16Proof) -> Result<[u8; PROOF_LEN], CodecError> {
    let mut out = [0u8; PROOF_LEN];
    for (chunk, limb) in out.chunks_exact_mut(SCALAR_LEN).zip(proof.wire_limbs()) {
        Field::Base.ensure(&limb)?;
        chunk.copy_from_slice(&limb.to_be_bytes::<SCALAR_LEN>());
    }
    Ok(out)
}

/// Decode a 256-byte wire proof.
///
/// # Errors
///
/// `ProofLength` unless exactly 256 bytes; `OutOfField` for a coordinate at
/// or above the base-field modulus.
pub fn decode_proof(bytes: &[u8]) -> Result<Groth16Proof, CodecError> {
    if bytes.len() != PROOF_LEN {
        return Err(CodecError::ProofLength { expected: PROOF_LEN, actual: bytes.len() });
    }
    let mut limbs = [U256::ZERO; 8];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(SCALAR_LEN)) {
        let value = U256::from_be_bytes(to_array(chunk));
        Field::Base.ensure(&value)?;
        *limb = value;
    }
    Ok(Groth16Proof::from_wire_limbs(limbs))
}

/// Encode public inputs as concatenated 32-byte little-endian scalars.
///
/// # Errors
///
/// `OutOfField` if any input is not below the scalar-field modulus.
pub fn encode_public_inputs(inputs: &[U256]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(inputs.len() * SCALAR_LEN);
    for input in inputs {
        Field::Scalar.ensure(input)?;
        out.extend_from_slice(&input.to_le_bytes::<SCALAR_LEN>());
    }
    Ok(out)
}

/// Decode concatenated 32-byte little-endian scalars.
///
/// # Errors
///
/// `InputLength` if the length is not a multiple of 32; `OutOfField` for a
/// scalar at or above the scalar-field modulus.
pub fn decode_public_inputs(bytes: &[u8]) -> Result<Vec<U256>, CodecError> {
    if bytes.len() % SCALAR_LEN != 0 {
        return Err(CodecError::InputLength(bytes.len()));
    }
    bytes
        .chunks_exact(SCALAR_LEN)
        .map(|chunk| {
            let value = U256::from_le_bytes(to_array(chunk));
            Field::Scalar.ensure(&value)?;
            Ok(value)
        })
        .collect()
}

fn to_array(chunk: &[u8]) -> [u8; SCALAR_LEN] {
    let mut arr = [0u8; SCALAR_LEN];
    arr.copy_from_slice(chunk);
    arr
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::field::{BASE_MODULUS, SCALAR_MODULUS};
    use proptest::prelude::*;

    fn below(modulus: U256) -> impl Strategy<Value = U256> {
        any::<[u8; 32]>().prop_map(move |b| U256::from_be_bytes(b) % modulus)
    }

    fn arb_proof() -> impl Strategy<Value = Groth16Proof> {
        prop::array::uniform8(below(BASE_MODULUS)).prop_map(Groth16Proof::from_wire_limbs)
    }

    proptest! {
        #[test]
        fn proof_roundtrip(proof in arb_proof()) {
            let bytes = encode_proof(&proof).unwrap();
            prop_assert_eq!(decode_proof(&bytes).unwrap(), proof);
        }

        #[test]
        fn public_input_roundtrip(inputs in prop::collection::vec(below(SCALAR_MODULUS), 0..8)) {
            let bytes = encode_public_inputs(&inputs).unwrap();
            prop_assert_eq!(bytes.len(), inputs.len() * SCALAR_LEN);
            prop_assert_eq!(decode_public_inputs(&bytes).unwrap(), inputs);
        }
    }
}
