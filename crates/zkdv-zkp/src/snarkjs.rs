//! # snarkjs Interchange
//!
//! Reads the three JSON documents a snarkjs Groth16 run produces and turns
//! them into native objects:
//!
//! - `proof.json`: `pi_a`, `pi_b`, `pi_c` as projective decimal strings.
//!   `pi_b` is `[[x.c0, x.c1], [y.c0, y.c1], [z.c0, z.c1]]`.
//! - `public.json`: an array of decimal strings.
//! - `verification_key.json`: `vk_alpha_1`, `vk_beta_2`, `vk_gamma_2`,
//!   `vk_delta_2`, `IC`, and optionally `nPublic`.
//!
//! Coordinates are taken as affine with `z = 1`; a `z` of zero marks the
//! point at infinity. Any other `z` is rejected since snarkjs never emits
//! one.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::codec::{Fq2, G1Point, G2Point, Groth16Proof};
use crate::error::CodecError;
use crate::field::{parse_element, Field};
use crate::key::Groth16VerifyingKey;

/// `proof.json` as snarkjs writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofJson {
    /// `[x, y, z]`.
    pub pi_a: Vec<String>,
    /// `[[x.c0, x.c1], [y.c0, y.c1], [z.c0, z.c1]]`.
    pub pi_b: Vec<Vec<String>>,
    /// `[x, y, z]`.
    pub pi_c: Vec<String>,
    /// Always `groth16` for documents this crate accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Curve tag, `bn128` in snarkjs terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
}

/// `verification_key.json` as snarkjs writes it. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationKeyJson {
    /// Declared number of public inputs.
    #[serde(rename = "nPublic", default)]
    pub n_public: Option<usize>,
    /// `alpha` in G1.
    pub vk_alpha_1: Vec<String>,
    /// `beta` in G2.
    pub vk_beta_2: Vec<Vec<String>>,
    /// `gamma` in G2.
    pub vk_gamma_2: Vec<Vec<String>>,
    /// `delta` in G2.
    pub vk_delta_2: Vec<Vec<String>>,
    /// Input commitment bases, one more than the number of public inputs.
    #[serde(rename = "IC")]
    pub ic: Vec<Vec<String>>,
}

fn coordinate<'a>(coords: &'a [String], idx: usize, what: &str) -> Result<&'a str, CodecError> {
    coords
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| CodecError::Snarkjs(format!("{what}: missing coordinate {idx}")))
}

fn parse_g1(coords: &[String], what: &str) -> Result<G1Point, CodecError> {
    let x = parse_element(coordinate(coords, 0, what)?, Field::Base)?;
    let y = parse_element(coordinate(coords, 1, what)?, Field::Base)?;
    match coords.get(2).map(String::as_str) {
        None | Some("1") => Ok(G1Point::new(x, y)),
        Some("0") => Ok(G1Point::default()),
        Some(z) => Err(CodecError::Snarkjs(format!("{what}: unsupported z coordinate {z:?}"))),
    }
}

fn parse_fq2(pair: &[String], what: &str) -> Result<Fq2, CodecError> {
    let c0 = parse_element(coordinate(pair, 0, what)?, Field::Base)?;
    let c1 = parse_element(coordinate(pair, 1, what)?, Field::Base)?;
    Ok(Fq2::new(c0, c1))
}

fn parse_g2(coords: &[Vec<String>], what: &str) -> Result<G2Point, CodecError> {
    let [x, y, rest @ ..] = coords else {
        return Err(CodecError::Snarkjs(format!("{what}: expected at least two Fq2 pairs")));
    };
    let x = parse_fq2(x, what)?;
    let y = parse_fq2(y, what)?;
    let z: Option<Vec<&str>> = rest.first().map(|z| z.iter().map(String::as_str).collect());
    match z.as_deref() {
        None | Some(["1", "0"]) => Ok(G2Point::new(x, y)),
        Some(["0", "0"]) => Ok(G2Point::default()),
        Some(other) => {
            Err(CodecError::Snarkjs(format!("{what}: unsupported z coordinate {other:?}")))
        }
    }
}

/// Parse `proof.json`.
pub fn parse_proof_json(json: &str) -> Result<Groth16Proof, CodecError> {
    let doc: ProofJson = serde_json::from_str(json)?;
    if let Some(protocol) = doc.protocol.as_deref() {
        if protocol != "groth16" {
            return Err(CodecError::Snarkjs(format!("unsupported protocol {protocol:?}")));
        }
    }
    Ok(Groth16Proof {
        a: parse_g1(&doc.pi_a, "pi_a")?,
        b: parse_g2(&doc.pi_b, "pi_b")?,
        c: parse_g1(&doc.pi_c, "pi_c")?,
    })
}

/// Parse `public.json` into scalar-field elements.
pub fn parse_public_json(json: &str) -> Result<Vec<U256>, CodecError> {
    let values: Vec<String> = serde_json::from_str(json)?;
    values.iter().map(|v| parse_element(v, Field::Scalar)).collect()
}

/// Parse `verification_key.json`.
pub fn parse_verification_key_json(json: &str) -> Result<Groth16VerifyingKey, CodecError> {
    let doc: VerificationKeyJson = serde_json::from_str(json)?;
    let ic = doc
        .ic
        .iter()
        .enumerate()
        .map(|(i, p)| parse_g1(p, &format!("IC[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    if ic.is_empty() {
        return Err(CodecError::Snarkjs("IC must contain at least one point".into()));
    }
    if let Some(n) = doc.n_public {
        if n + 1 != ic.len() {
            return Err(CodecError::Snarkjs(format!(
                "nPublic is {n} but IC has {} points",
                ic.len()
            )));
        }
    }
    Ok(Groth16VerifyingKey {
        alpha: parse_g1(&doc.vk_alpha_1, "vk_alpha_1")?,
        beta: parse_g2(&doc.vk_beta_2, "vk_beta_2")?,
        gamma: parse_g2(&doc.vk_gamma_2, "vk_gamma_2")?,
        delta: parse_g2(&doc.vk_delta_2, "vk_delta_2")?,
        ic,
    })
}

fn g1_json(p: &G1Point) -> Vec<String> {
    if p.is_infinity() {
        return vec!["0".into(), "1".into(), "0".into()];
    }
    vec![p.x.to_string(), p.y.to_string(), "1".into()]
}

fn g2_json(p: &G2Point) -> Vec<Vec<String>> {
    let z = if p.is_infinity() { ["0", "0"] } else { ["1", "0"] };
    vec![
        vec![p.x.c0.to_string(), p.x.c1.to_string()],
        vec![p.y.c0.to_string(), p.y.c1.to_string()],
        z.iter().map(|s| s.to_string()).collect(),
    ]
}

/// Render a proof back into snarkjs `proof.json` form.
pub fn proof_to_json(proof: &Groth16Proof) -> ProofJson {
    ProofJson {
        pi_a: g1_json(&proof.a),
        pi_b: g2_json(&proof.b),
        pi_c: g1_json(&proof.c),
        protocol: Some("groth16".into()),
        curve: Some("bn128".into()),
    }
}

/// Render public inputs as snarkjs `public.json` decimal strings.
pub fn public_inputs_to_json(inputs: &[U256]) -> Vec<String> {
    inputs.iter().map(U256::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_proof, encode_proof};
    use crate::field::SCALAR_MODULUS;

    const PROOF: &str = r#"{
        "pi_a": ["1", "2", "1"],
        "pi_b": [["3", "4"], ["5", "6"], ["1", "0"]],
        "pi_c": ["7", "8", "1"],
        "protocol": "groth16",
        "curve": "bn128"
    }"#;

    #[test]
    fn proof_json_maps_pi_b_pairs_to_c0_c1() {
        let proof = parse_proof_json(PROOF).unwrap();
        assert_eq!(proof.b.x, Fq2::new(U256::from(3u64), U256::from(4u64)));
        assert_eq!(proof.b.y, Fq2::new(U256::from(5u64), U256::from(6u64)));
        let wire = encode_proof(&proof).unwrap();
        let tail: Vec<u8> = wire.chunks(32).map(|c| c[31]).collect();
        assert_eq!(tail, vec![1, 2, 5, 6, 3, 4, 7, 8]);
    }

    #[test]
    fn proof_json_survives_wire_and_back() {
        let proof = parse_proof_json(PROOF).unwrap();
        let decoded = decode_proof(&encode_proof(&proof).unwrap()).unwrap();
        let rendered = serde_json::to_string(&proof_to_json(&decoded)).unwrap();
        assert_eq!(parse_proof_json(&rendered).unwrap(), proof);
    }

    #[test]
    fn proof_json_rejects_bad_shapes() {
        assert!(parse_proof_json(r#"{"pi_a":["1"],"pi_b":[],"pi_c":[]}"#).is_err());
        assert!(parse_proof_json(&PROOF.replace("groth16", "plonk")).is_err());
        assert!(parse_proof_json(&PROOF.replace(r#""7", "8", "1""#, r#""7", "8", "5""#)).is_err());
        assert!(matches!(
            parse_proof_json(&PROOF.replace(r#""1", "2", "1""#, r#""-1", "2", "1""#)),
            Err(CodecError::InvalidDecimal(_))
        ));
    }

    #[test]
    fn public_json_checks_scalar_field() {
        let inputs = parse_public_json(r#"["1", "42"]"#).unwrap();
        assert_eq!(inputs, vec![U256::from(1u64), U256::from(42u64)]);
        let over = format!(r#"["{}"]"#, SCALAR_MODULUS);
        assert!(matches!(parse_public_json(&over), Err(CodecError::OutOfField { .. })));
        let huge = format!(r#"["{}0"]"#, U256::MAX);
        assert!(matches!(parse_public_json(&huge), Err(CodecError::ScalarOverflow(_))));
        assert_eq!(public_inputs_to_json(&inputs), vec!["1", "42"]);
    }

    #[test]
    fn infinity_z_coordinate() {
        let doc = PROOF.replace(r#""7", "8", "1""#, r#""0", "1", "0""#);
        let proof = parse_proof_json(&doc).unwrap();
        assert!(proof.c.is_infinity());
    }

    #[test]
    fn vk_json_checks_n_public() {
        let vk = r#"{
            "protocol": "groth16", "curve": "bn128", "nPublic": 1,
            "vk_alpha_1": ["1", "2", "1"],
            "vk_beta_2": [["3", "4"], ["5", "6"], ["1", "0"]],
            "vk_gamma_2": [["3", "4"], ["5", "6"], ["1", "0"]],
            "vk_delta_2": [["3", "4"], ["5", "6"], ["1", "0"]],
            "IC": [["1", "2", "1"], ["1", "2", "1"]]
        }"#;
        let parsed = parse_verification_key_json(vk).unwrap();
        assert_eq!(parsed.public_input_count(), 1);
        assert!(parse_verification_key_json(&vk.replace("\"nPublic\": 1", "\"nPublic\": 2")).is_err());
        assert!(parse_verification_key_json(
            &vk.replace(r#""IC": [["1", "2", "1"], ["1", "2", "1"]]"#, r#""IC": []"#)
                .replace("\"nPublic\": 1,", "")
        )
        .is_err());
    }
}
