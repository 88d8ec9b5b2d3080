//! # Identity Newtypes
//!
//! Distinct types for every identifier namespace on the ledger: accounts,
//! datasets, access policies, proofs, and proof families.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::digest::Sha256Accumulator;
use crate::error::CoreError;

/// Maximum length of a dataset identifier in bytes.
pub const MAX_DATASET_ID_LEN: usize = 128;

// ─── Address ─────────────────────────────────────────────────────────

/// A 32-byte account identity (seller, buyer, treasury, submitter).
///
/// The all-zero address is the absent-record sentinel returned by registry
/// queries; it is never a valid transaction sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 32]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Wrap raw address bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = CoreError;

    /// Parse `0x`-prefixed or bare hex. Short inputs are left-padded with
    /// zeros, so `0x2` parses to the address ending in `...02`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > 64 {
            return Err(CoreError::InvalidHex(format!(
                "address must have 1..=64 hex digits, got {}",
                digits.len()
            )));
        }
        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| CoreError::InvalidHex(format!("{s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── DatasetId ───────────────────────────────────────────────────────

/// Identifier of a dataset offered for sale.
///
/// Non-empty, at most [`MAX_DATASET_ID_LEN`] bytes, no surrounding
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetId(String);

impl DatasetId {
    /// Validate and wrap a dataset identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::Validation("dataset id must not be empty".into()));
        }
        if id.len() > MAX_DATASET_ID_LEN {
            return Err(CoreError::Validation(format!(
                "dataset id exceeds {MAX_DATASET_ID_LEN} bytes"
            )));
        }
        if id.trim() != id {
            return Err(CoreError::Validation(format!(
                "dataset id has surrounding whitespace: {id:?}"
            )));
        }
        Ok(Self(id))
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DatasetId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DatasetId> for String {
    fn from(value: DatasetId) -> Self {
        value.0
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dataset:{}", self.0)
    }
}

// ─── PolicyId ────────────────────────────────────────────────────────

/// Identifier of an access policy object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolicyId(pub Uuid);

impl PolicyId {
    /// Generate a new random policy identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PolicyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "policy:{}", self.0)
    }
}

// ─── ProofFamily ─────────────────────────────────────────────────────

/// The statement a proof attests to, e.g. `authenticity` or `quality`.
///
/// Lowercase ASCII letters, digits, `-` and `_`; 1 to 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProofFamily(String);

impl ProofFamily {
    /// Validate and wrap a family tag.
    pub fn new(tag: impl Into<String>) -> Result<Self, CoreError> {
        let tag = tag.into();
        let well_formed = !tag.is_empty()
            && tag.len() <= 64
            && tag
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
        if !well_formed {
            return Err(CoreError::Validation(format!("invalid proof family tag: {tag:?}")));
        }
        Ok(Self(tag))
    }

    /// Dataset origin/integrity attestation.
    pub fn authenticity() -> Self {
        Self("authenticity".to_string())
    }

    /// Dataset quality attestation.
    pub fn quality() -> Self {
        Self("quality".to_string())
    }

    /// The empty tag carried by absent-record sentinels. Not constructible
    /// through [`ProofFamily::new`].
    pub fn none() -> Self {
        Self(String::new())
    }

    /// The tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProofFamily {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProofFamily> for String {
    fn from(value: ProofFamily) -> Self {
        value.0
    }
}

impl std::fmt::Display for ProofFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── ProofId ─────────────────────────────────────────────────────────

/// How a registry key is derived from proof bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofIdScheme {
    /// The wire-encoded proof bytes are the key. No collision resistance
    /// beyond byte equality; matches the deployed registry contract.
    #[default]
    Raw,
    /// SHA-256 of the wire-encoded proof bytes. Changes the registry key
    /// format, so callers and observers must agree on it.
    Sha256,
}

/// Registry key of a verification record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProofId(#[serde(with = "hex_vec")] Vec<u8>);

impl ProofId {
    /// Derive the key for `proof_bytes` under `scheme`.
    pub fn derive(scheme: ProofIdScheme, proof_bytes: &[u8]) -> Self {
        match scheme {
            ProofIdScheme::Raw => Self(proof_bytes.to_vec()),
            ProofIdScheme::Sha256 => {
                let mut acc = Sha256Accumulator::new();
                acc.update(proof_bytes);
                Self(acc.finalize().as_bytes().to_vec())
            }
        }
    }

    /// Wrap raw key bytes exactly as given.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Short hex prefix for log fields.
    pub fn short_hex(&self) -> String {
        let n = self.0.len().min(8);
        hex::encode(&self.0[..n])
    }
}

impl std::fmt::Display for ProofId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "proof:{}", self.short_hex())
    }
}

mod hex_vec {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parse_and_display() {
        let a: Address = "0x2".parse().unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 2;
        assert_eq!(a.as_bytes(), &expected);
        assert_eq!(a.to_string(), format!("0x{}02", "0".repeat(62)));
        assert!(!a.is_zero());
        assert!(Address::ZERO.is_zero());
    }

    #[test]
    fn address_rejects_bad_hex() {
        assert!("0x".parse::<Address>().is_err());
        assert!("0xzz".parse::<Address>().is_err());
        assert!(format!("0x{}", "1".repeat(65)).parse::<Address>().is_err());
    }

    #[test]
    fn address_serde_is_hex_string() {
        let a: Address = "0xabc".parse().unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.starts_with("\"0x"));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }

    #[test]
    fn dataset_id_validation() {
        assert!(DatasetId::new("blob-7f3a").is_ok());
        assert!(DatasetId::new("").is_err());
        assert!(DatasetId::new(" padded").is_err());
        assert!(DatasetId::new("x".repeat(MAX_DATASET_ID_LEN + 1)).is_err());
        assert!(serde_json::from_str::<DatasetId>("\"\"").is_err());
    }

    #[test]
    fn proof_family_validation() {
        assert_eq!(ProofFamily::new("authenticity").unwrap(), ProofFamily::authenticity());
        assert!(ProofFamily::new("Quality").is_err());
        assert!(ProofFamily::new("").is_err());
        assert!(ProofFamily::new("has space").is_err());
        assert_eq!(ProofFamily::none().as_str(), "");
    }

    #[test]
    fn proof_id_schemes() {
        let bytes = vec![7u8; 256];
        let raw = ProofId::derive(ProofIdScheme::Raw, &bytes);
        assert_eq!(raw.as_bytes(), bytes.as_slice());

        let hashed = ProofId::derive(ProofIdScheme::Sha256, &bytes);
        assert_eq!(hashed.as_bytes().len(), 32);
        assert_ne!(hashed, raw);
        assert_eq!(hashed, ProofId::derive(ProofIdScheme::Sha256, &bytes));
    }

    #[test]
    fn proof_id_display_is_short() {
        let id = ProofId::from_bytes(vec![0xab; 256]);
        assert_eq!(id.to_string(), "proof:abababababababab");
    }

    #[test]
    fn proof_id_scheme_serde_names() {
        assert_eq!(serde_json::to_string(&ProofIdScheme::Sha256).unwrap(), "\"sha256\"");
        assert_eq!(ProofIdScheme::default(), ProofIdScheme::Raw);
    }
}
