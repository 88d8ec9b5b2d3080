//! # Artifact Subcommands
//!
//! snarkjs JSON in, ledger bytes out, and back again.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use serde::Serialize;
use zkdv_core::ProofFamily;
use zkdv_zkp::compressed::compress_proof;
use zkdv_zkp::snarkjs::{
    parse_proof_json, parse_public_json, parse_verification_key_json, proof_to_json,
    public_inputs_to_json, ProofJson,
};
use zkdv_zkp::{decode_proof, decode_public_inputs, encode_proof, encode_public_inputs, VerificationKey};

use crate::output::{print_json, read_bytes, read_text, OutputArgs};

/// Proof byte layout.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProofFormat {
    /// Eight 32-byte big-endian limbs, as the registry expects.
    #[default]
    Wire,
    /// Three compressed points, 128 bytes.
    Compressed,
}

/// Arguments for the proof subcommand.
#[derive(Args, Debug)]
pub struct ProofArgs {
    /// Path to snarkjs `proof.json`.
    pub proof: PathBuf,
    /// Output layout.
    #[arg(long, value_enum, default_value_t = ProofFormat::Wire)]
    pub format: ProofFormat,
    #[command(flatten)]
    pub output: OutputArgs,
}

impl ProofArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let json = read_text(&self.proof)?;
        let bytes = convert_proof(&json, self.format)
            .with_context(|| format!("converting {}", self.proof.display()))?;
        tracing::debug!(format = ?self.format, len = bytes.len(), "proof converted");
        self.output.emit(&bytes)
    }
}

/// Arguments for the inputs subcommand.
#[derive(Args, Debug)]
pub struct InputsArgs {
    /// Path to snarkjs `public.json`.
    pub public: PathBuf,
    #[command(flatten)]
    pub output: OutputArgs,
}

impl InputsArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let json = read_text(&self.public)?;
        let bytes = convert_inputs(&json).with_context(|| format!("converting {}", self.public.display()))?;
        self.output.emit(&bytes)
    }
}

/// Arguments for the vk subcommand.
#[derive(Args, Debug)]
pub struct VkArgs {
    /// Path to snarkjs `verification_key.json`.
    pub key: PathBuf,
    /// Proof family the key verifies.
    #[arg(long, default_value = "authenticity")]
    pub family: String,
    /// Print the family-tagged key as JSON instead of raw bytes.
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub output: OutputArgs,
}

impl VkArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let json = read_text(&self.key)?;
        let family = ProofFamily::new(self.family.as_str())?;
        let key = prepare_key(&json, family).with_context(|| format!("preparing {}", self.key.display()))?;
        tracing::info!(family = %key.family(), len = key.len(), inputs = ?key.declared_inputs(), "verification key prepared");
        if self.json {
            return print_json(&key);
        }
        self.output.emit(key.as_bytes())
    }
}

/// Arguments for the decode subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding 256 wire-format proof bytes.
    pub proof: PathBuf,
    /// File holding little-endian public-input bytes.
    #[arg(long)]
    pub public: Option<PathBuf>,
    /// Treat input files as hex text rather than raw bytes.
    #[arg(long)]
    pub hex: bool,
}

impl DecodeArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let proof = read_bytes(&self.proof, self.hex)?;
        let public = self.public.as_deref().map(|p| read_bytes(p, self.hex)).transpose()?;
        print_json(&decode(&proof, public.as_deref())?)
    }
}

/// Decoded artifacts in snarkjs form.
#[derive(Debug, Serialize)]
pub struct Decoded {
    pub proof: ProofJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<Vec<String>>,
}

/// `proof.json` text to bytes in `format`.
pub fn convert_proof(json: &str, format: ProofFormat) -> anyhow::Result<Vec<u8>> {
    let proof = parse_proof_json(json)?;
    Ok(match format {
        ProofFormat::Wire => encode_proof(&proof)?.to_vec(),
        ProofFormat::Compressed => compress_proof(&proof)?.to_vec(),
    })
}

/// `public.json` text to little-endian scalar bytes.
pub fn convert_inputs(json: &str) -> anyhow::Result<Vec<u8>> {
    Ok(encode_public_inputs(&parse_public_json(json)?)?)
}

/// `verification_key.json` text to a prepared key for `family`.
pub fn prepare_key(json: &str, family: ProofFamily) -> anyhow::Result<VerificationKey> {
    let vk = parse_verification_key_json(json)?;
    Ok(VerificationKey::prepare(family, &vk)?)
}

/// Wire bytes back to snarkjs JSON.
pub fn decode(proof: &[u8], public: Option<&[u8]>) -> anyhow::Result<Decoded> {
    let proof = proof_to_json(&decode_proof(proof)?);
    let public = public
        .map(|bytes| decode_public_inputs(bytes).map(|v| public_inputs_to_json(&v)))
        .transpose()?;
    Ok(Decoded { proof, public })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROOF: &str = r#"{
        "pi_a": ["1", "2", "1"],
        "pi_b": [["3", "4"], ["5", "6"], ["1", "0"]],
        "pi_c": ["7", "8", "1"],
        "protocol": "groth16"
    }"#;

    const VK: &str = r#"{
        "protocol": "groth16",
        "curve": "bn128",
        "nPublic": 1,
        "vk_alpha_1": ["1", "2", "1"],
        "vk_beta_2": [["3", "4"], ["5", "6"], ["1", "0"]],
        "vk_gamma_2": [["3", "4"], ["5", "6"], ["1", "0"]],
        "vk_delta_2": [["3", "4"], ["5", "6"], ["1", "0"]],
        "IC": [["1", "2", "1"], ["1", "2", "1"]]
    }"#;

    #[test]
    fn proof_formats() {
        let wire = convert_proof(PROOF, ProofFormat::Wire).unwrap();
        assert_eq!(wire.len(), 256);
        assert_eq!(wire[31], 1);
        let compressed = convert_proof(PROOF, ProofFormat::Compressed).unwrap();
        assert_eq!(compressed.len(), 128);
    }

    #[test]
    fn inputs_are_little_endian() {
        let bytes = convert_inputs(r#"["1", "258"]"#).unwrap();
        assert_eq!(bytes.len(), 64);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[32..34], &[2, 1]);
        assert!(convert_inputs(r#"["not a number"]"#).is_err());
    }

    #[test]
    fn key_declares_its_inputs() {
        let key = prepare_key(VK, ProofFamily::quality()).unwrap();
        assert_eq!(key.declared_inputs(), Some(1));
        assert_eq!(key.len(), zkdv_zkp::MIN_VERIFICATION_KEY_LEN + 32);
    }

    #[test]
    fn decode_round_trips_proof_and_inputs() {
        let wire = convert_proof(PROOF, ProofFormat::Wire).unwrap();
        let inputs = convert_inputs(r#"["42"]"#).unwrap();
        let decoded = decode(&wire, Some(&inputs)).unwrap();
        assert_eq!(decoded.proof.pi_a, vec!["1", "2", "1"]);
        assert_eq!(decoded.public, Some(vec!["42".to_string()]));
        assert!(decode(&wire[..100], None).is_err());
    }
}
