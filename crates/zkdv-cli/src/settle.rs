//! # Settle Subcommand
//!
//! Preview the split of one purchase without touching a ledger.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use zkdv_ledger::{split_price, FeeSplit, LedgerError, MarketConfig, SettlementPolicy};

use crate::output::print_json;

/// Arguments for the settle subcommand.
#[derive(Args, Debug)]
pub struct SettleArgs {
    /// Market configuration YAML. Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Listing price.
    #[arg(long)]
    pub price: u64,
    /// Amount the buyer offers; defaults to the price.
    #[arg(long)]
    pub payment: Option<u64>,
}

/// What a purchase at `price` with `payment` would do.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SettlementPreview {
    pub policy: SettlementPolicy,
    pub price: u64,
    pub payment: u64,
    pub refund: u64,
    pub split: FeeSplit,
}

impl SettleArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => MarketConfig::from_yaml_file(path)?,
            None => {
                let mut config = MarketConfig::default();
                config.apply_env_overrides()?;
                config.validate()?;
                config
            }
        };
        let preview = preview(&config, self.price, self.payment.unwrap_or(self.price))?;
        print_json(&preview)
    }
}

/// Compute the split the ledger would apply.
pub fn preview(config: &MarketConfig, price: u64, payment: u64) -> Result<SettlementPreview, LedgerError> {
    if price == 0 {
        return Err(LedgerError::Validation("price must be positive".into()));
    }
    if payment < price {
        return Err(LedgerError::InsufficientPayment { required: price, offered: payment });
    }
    let policy = config.settlement;
    let split = split_price(price, &policy)?;
    Ok(SettlementPreview { policy, price, payment, refund: payment - price, split })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkdv_ledger::RoyaltyConfig;

    #[test]
    fn flat_fee_preview() {
        let p = preview(&MarketConfig::default(), 100_000, 100_500).unwrap();
        assert_eq!(p.split.platform_fee, 3_000);
        assert_eq!(p.split.creator_royalty, 97_000);
        assert_eq!(p.refund, 500);
    }

    #[test]
    fn royalty_preview() {
        let config = MarketConfig {
            settlement: SettlementPolicy::Royalty(RoyaltyConfig::new(8_500, 1_000, 500).unwrap()),
            ..MarketConfig::default()
        };
        let p = preview(&config, 10_000, 10_000).unwrap();
        assert_eq!((p.split.platform_fee, p.split.reseller_share, p.split.creator_royalty), (1_000, 500, 8_500));
    }

    #[test]
    fn underpayment_and_zero_price() {
        let cfg = MarketConfig::default();
        assert_eq!(
            preview(&cfg, 50_000, 10_000),
            Err(LedgerError::InsufficientPayment { required: 50_000, offered: 10_000 })
        );
        assert!(matches!(preview(&cfg, 0, 0), Err(LedgerError::Validation(_))));
    }
}
