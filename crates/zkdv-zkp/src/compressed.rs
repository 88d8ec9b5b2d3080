//! # Compressed Point Encoding
//!
//! Arkworks-compatible compressed serialization of BN254 points, the format
//! the on-chain key preparation expects.
//!
//! - G1: `x` as 32 bytes little-endian.
//! - G2: `x.c0` then `x.c1`, each 32 bytes little-endian.
//!
//! The two highest bits of the final byte carry flags: `0x80` when `y` is
//! the lexicographically larger of `{y, -y}`, `0x40` for the point at
//! infinity (all other bits zero). `Fq2` values compare `c1` first, then
//! `c0`.

use std::cmp::Ordering;

use alloy_primitives::U256;

use crate::codec::{Fq2, G1Point, G2Point, Groth16Proof, SCALAR_LEN};
use crate::error::CodecError;
use crate::field::negate_base;

/// Compressed G1 length.
pub const G1_COMPRESSED_LEN: usize = SCALAR_LEN;

/// Compressed G2 length.
pub const G2_COMPRESSED_LEN: usize = 2 * SCALAR_LEN;

/// Compressed proof length: `A || B || C`.
pub const PROOF_COMPRESSED_LEN: usize = 2 * G1_COMPRESSED_LEN + G2_COMPRESSED_LEN;

const FLAG_Y_NEGATIVE: u8 = 0x80;
const FLAG_INFINITY: u8 = 0x40;

fn y_is_negative(y: &U256) -> bool {
    *y > negate_base(y)
}

fn fq2_is_negative(y: &Fq2) -> bool {
    let neg = Fq2::new(negate_base(&y.c0), negate_base(&y.c1));
    match y.c1.cmp(&neg.c1) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => y.c0 > neg.c0,
    }
}

/// Compress a G1 point.
pub fn compress_g1(p: &G1Point) -> Result<[u8; G1_COMPRESSED_LEN], CodecError> {
    p.ensure_in_field()?;
    let mut out = [0u8; G1_COMPRESSED_LEN];
    if p.is_infinity() {
        out[G1_COMPRESSED_LEN - 1] = FLAG_INFINITY;
        return Ok(out);
    }
    out.copy_from_slice(&p.x.to_le_bytes::<SCALAR_LEN>());
    if y_is_negative(&p.y) {
        out[G1_COMPRESSED_LEN - 1] |= FLAG_Y_NEGATIVE;
    }
    Ok(out)
}

/// Compress a G2 point.
pub fn compress_g2(p: &G2Point) -> Result<[u8; G2_COMPRESSED_LEN], CodecError> {
    p.ensure_in_field()?;
    let mut out = [0u8; G2_COMPRESSED_LEN];
    if p.is_infinity() {
        out[G2_COMPRESSED_LEN - 1] = FLAG_INFINITY;
        return Ok(out);
    }
    out[..SCALAR_LEN].copy_from_slice(&p.x.c0.to_le_bytes::<SCALAR_LEN>());
    out[SCALAR_LEN..].copy_from_slice(&p.x.c1.to_le_bytes::<SCALAR_LEN>());
    if fq2_is_negative(&p.y) {
        out[G2_COMPRESSED_LEN - 1] |= FLAG_Y_NEGATIVE;
    }
    Ok(out)
}

/// Compress a whole proof to 128 bytes: `A(G1c) || B(G2c) || C(G1c)`.
pub fn compress_proof(proof: &Groth16Proof) -> Result<[u8; PROOF_COMPRESSED_LEN], CodecError> {
    let mut out = [0u8; PROOF_COMPRESSED_LEN];
    out[..32].copy_from_slice(&compress_g1(&proof.a)?);
    out[32..96].copy_from_slice(&compress_g2(&proof.b)?);
    out[96..].copy_from_slice(&compress_g1(&proof.c)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::BASE_MODULUS;

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    #[test]
    fn g1_generator_is_positive() {
        // BN254 G1 generator (1, 2): 2 < p - 2.
        let out = compress_g1(&G1Point::new(u(1), u(2))).unwrap();
        assert_eq!(out[0], 1);
        assert!(out[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn g1_negated_generator_sets_flag() {
        let out = compress_g1(&G1Point::new(u(1), BASE_MODULUS - u(2))).unwrap();
        assert_eq!(out[0], 1);
        assert_eq!(out[31], FLAG_Y_NEGATIVE);
    }

    #[test]
    fn g1_infinity_flag() {
        let out = compress_g1(&G1Point::default()).unwrap();
        assert_eq!(out[31], FLAG_INFINITY);
        assert!(out[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn g2_orders_by_c1_first() {
        let x = Fq2::new(u(9), u(10));
        // c1 small: positive even though c0 is large.
        let pos = compress_g2(&G2Point::new(x, Fq2::new(BASE_MODULUS - u(1), u(1)))).unwrap();
        assert_eq!(pos[63] & FLAG_Y_NEGATIVE, 0);
        // c1 large: negative even though c0 is small.
        let neg = compress_g2(&G2Point::new(x, Fq2::new(u(1), BASE_MODULUS - u(1)))).unwrap();
        assert_eq!(neg[63] & FLAG_Y_NEGATIVE, FLAG_Y_NEGATIVE);
        // c1 zero falls through to c0.
        let tie = compress_g2(&G2Point::new(x, Fq2::new(BASE_MODULUS - u(1), U256::ZERO))).unwrap();
        assert_eq!(tie[63] & FLAG_Y_NEGATIVE, FLAG_Y_NEGATIVE);
    }

    #[test]
    fn g2_writes_x_c0_then_c1_little_endian() {
        let out = compress_g2(&G2Point::new(Fq2::new(u(3), u(4)), Fq2::new(u(1), u(0)))).unwrap();
        assert_eq!(out[0], 3);
        assert_eq!(out[32], 4);
    }

    #[test]
    fn compressed_proof_layout() {
        let proof = Groth16Proof {
            a: G1Point::new(u(1), u(2)),
            b: G2Point::new(Fq2::new(u(3), u(4)), Fq2::new(u(5), u(6))),
            c: G1Point::new(u(7), u(8)),
        };
        let out = compress_proof(&proof).unwrap();
        assert_eq!(out.len(), 128);
        assert_eq!((out[0], out[32], out[64], out[96]), (1, 3, 4, 7));
    }

    #[test]
    fn out_of_field_rejected() {
        assert!(compress_g1(&G1Point::new(BASE_MODULUS, u(1))).is_err());
    }
}
