//! Market configuration.
//!
//! Loaded from YAML, then optionally overridden from the environment:
//!
//! - `ZKDV_FEE_PERCENT`: platform fee percent, 0..=100 (default 3); only
//!   valid under flat-fee settlement
//! - `ZKDV_MIN_QUALITY`: minimum quality score floor (default 0)
//! - `ZKDV_TREASURY`: treasury credited when a purchase names none
//! - `ZKDV_ADMIN`: admin address for key registration and batch backfill
//!
//! ```yaml
//! min_quality: 60
//! treasury: "0x7"
//! admin: "0xa"
//! proof_id_scheme: raw
//! settlement:
//!   mode: royalty
//!   creator_bps: 8500
//!   platform_bps: 1000
//!   reseller_bps: 500
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use zkdv_core::{Address, ProofIdScheme};
use zkdv_zkp::MIN_VERIFICATION_KEY_LEN;

use crate::settlement::SettlementPolicy;

/// Configuration for a settlement ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Floor applied to every gated quality check.
    pub min_quality: u8,
    /// Smallest verification key the gate accepts.
    pub min_verification_key_len: usize,
    /// Treasury credited by purchases that do not name one.
    pub treasury: Option<Address>,
    /// Account allowed to register keys and run batch backfill. When
    /// unset, key registration is open and batch backfill is disabled.
    pub admin: Option<Address>,
    /// How registry keys are derived from proof bytes.
    pub proof_id_scheme: ProofIdScheme,
    /// How purchase proceeds are divided.
    pub settlement: SettlementPolicy,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            min_quality: 0,
            min_verification_key_len: MIN_VERIFICATION_KEY_LEN,
            treasury: None,
            admin: None,
            proof_id_scheme: ProofIdScheme::Raw,
            settlement: SettlementPolicy::default(),
        }
    }
}

impl MarketConfig {
    /// Parse YAML and validate.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file, apply environment overrides, and validate.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_yaml_file_with(path, |var| std::env::var(var).ok())
    }

    /// [`Self::from_yaml_file`] with overrides taken from `lookup`.
    pub fn from_yaml_file_with(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        let mut config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ZKDV_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("ZKDV_FEE_PERCENT") {
            match &mut self.settlement {
                SettlementPolicy::FlatFee { fee_percent } => {
                    *fee_percent = parse_var("ZKDV_FEE_PERCENT", &v)?;
                }
                SettlementPolicy::Royalty(_) => {
                    return Err(ConfigError::Env(
                        "ZKDV_FEE_PERCENT".into(),
                        "only applies to flat_fee settlement".into(),
                    ));
                }
            }
        }
        if let Some(v) = lookup("ZKDV_MIN_QUALITY") {
            self.min_quality = parse_var("ZKDV_MIN_QUALITY", &v)?;
        }
        if let Some(v) = lookup("ZKDV_TREASURY") {
            self.treasury = Some(parse_var("ZKDV_TREASURY", &v)?);
        }
        if let Some(v) = lookup("ZKDV_ADMIN") {
            self.admin = Some(parse_var("ZKDV_ADMIN", &v)?);
        }
        Ok(())
    }

    /// Check cross-field rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settlement.validate().map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.treasury.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::Invalid("treasury must not be the zero address".into()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Env(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read: path, then the I/O error.
    #[error("cannot read {0}: {1}")]
    Io(String, String),
    /// The YAML is malformed or names an unknown field.
    #[error("invalid YAML: {0}")]
    Parse(String),
    /// An environment override did not parse: variable, then reason.
    #[error("invalid value for {0}: {1}")]
    Env(String, String),
    /// The values parsed but break a cross-field rule.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
