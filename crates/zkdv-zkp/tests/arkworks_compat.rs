//! # Compressed Encodings Against arkworks
//!
//! The prepared key and compressed proof must be byte-identical to
//! `serialize_compressed` from `ark-bn254`, since that is what the on-chain
//! verifier deserializes. Points are built with arkworks, converted to our
//! coordinate types, and both encodings compared.

use alloy_primitives::U256;
use ark_bn254::{Bn254, Fq, Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_groth16::{Proof, VerifyingKey};
use ark_serialize::CanonicalSerialize;
use proptest::prelude::*;
use zkdv_zkp::compressed::{compress_g1, compress_g2, compress_proof};
use zkdv_zkp::{Fq2, G1Point, G2Point, Groth16Proof, Groth16VerifyingKey};

fn fq(x: &Fq) -> U256 {
    U256::from_limbs(x.into_bigint().0)
}

fn g1(p: &G1Affine) -> G1Point {
    if p.infinity {
        return G1Point::default();
    }
    G1Point::new(fq(&p.x), fq(&p.y))
}

fn fq2(x: &ark_bn254::Fq2) -> Fq2 {
    Fq2::new(fq(&x.c0), fq(&x.c1))
}

fn g2(p: &G2Affine) -> G2Point {
    if p.infinity {
        return G2Point::default();
    }
    G2Point::new(fq2(&p.x), fq2(&p.y))
}

fn ark_bytes<T: CanonicalSerialize>(value: &T) -> Vec<u8> {
    let mut out = Vec::new();
    value.serialize_compressed(&mut out).unwrap();
    out
}

fn g1_mul(k: u64) -> G1Affine {
    (G1Affine::generator() * Fr::from(k)).into_affine()
}

fn g2_mul(k: u64) -> G2Affine {
    (G2Affine::generator() * Fr::from(k)).into_affine()
}

/// Generators, small and large multiples, their negations, and infinity.
fn g1_points() -> Vec<G1Affine> {
    let mut points: Vec<G1Affine> = [1, 2, 3, 7, 1_000_003, u64::MAX].into_iter().map(g1_mul).collect();
    let negated: Vec<G1Affine> = points.iter().map(|p| -*p).collect();
    points.extend(negated);
    points.push(G1Affine::zero());
    points
}

fn g2_points() -> Vec<G2Affine> {
    let mut points: Vec<G2Affine> = [1, 2, 3, 7, 1_000_003, u64::MAX].into_iter().map(g2_mul).collect();
    let negated: Vec<G2Affine> = points.iter().map(|p| -*p).collect();
    points.extend(negated);
    points.push(G2Affine::zero());
    points
}

#[test]
fn g1_matches_arkworks() {
    for p in g1_points() {
        assert_eq!(compress_g1(&g1(&p)).unwrap().to_vec(), ark_bytes(&p), "G1 point {p}");
    }
}

#[test]
fn g2_matches_arkworks() {
    for p in g2_points() {
        assert_eq!(compress_g2(&g2(&p)).unwrap().to_vec(), ark_bytes(&p), "G2 point {p}");
    }
}

#[test]
fn negation_flips_only_the_sign_flag() {
    let p = g1_mul(5);
    let pos = compress_g1(&g1(&p)).unwrap();
    let neg = compress_g1(&g1(&-p)).unwrap();
    assert_eq!(pos[..31], neg[..31]);
    assert_eq!(pos[31] ^ neg[31], 0x80);
}

#[test]
fn proof_matches_arkworks() {
    let (a, b, c) = (g1_mul(11), g2_mul(13), -g1_mul(17));
    let ark = Proof::<Bn254> { a, b, c };
    let ours = Groth16Proof { a: g1(&a), b: g2(&b), c: g1(&c) };
    assert_eq!(compress_proof(&ours).unwrap().to_vec(), ark_bytes(&ark));
}

#[test]
fn prepared_key_matches_arkworks() {
    for inputs in [0u64, 1, 3] {
        let ic: Vec<G1Affine> = (0..=inputs).map(|i| g1_mul(100 + i)).collect();
        let ark = VerifyingKey::<Bn254> {
            alpha_g1: g1_mul(2),
            beta_g2: g2_mul(3),
            gamma_g2: G2Affine::generator(),
            delta_g2: -g2_mul(5),
            gamma_abc_g1: ic.clone(),
        };
        let ours = Groth16VerifyingKey {
            alpha: g1(&ark.alpha_g1),
            beta: g2(&ark.beta_g2),
            gamma: g2(&ark.gamma_g2),
            delta: g2(&ark.delta_g2),
            ic: ic.iter().map(g1).collect(),
        };
        assert_eq!(ours.to_bytes().unwrap(), ark_bytes(&ark), "{inputs} public inputs");
        assert_eq!(ours.public_input_count() as u64, inputs);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_multiples_match_arkworks(k in 1u64.., negate in any::<bool>()) {
        let (p1, p2) = if negate { (-g1_mul(k), -g2_mul(k)) } else { (g1_mul(k), g2_mul(k)) };
        prop_assert_eq!(compress_g1(&g1(&p1)).unwrap().to_vec(), ark_bytes(&p1));
        prop_assert_eq!(compress_g2(&g2(&p2)).unwrap().to_vec(), ark_bytes(&p2));
    }
}
