//! # Royalty Split
//!
//! Basis-point division of a sale price between platform, reseller and
//! creator. Platform and reseller shares are floor-divided; the creator
//! takes the remainder, so the three shares always sum to the price
//! exactly and rounding dust goes to the creator.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Basis points in a whole.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Basis-point shares; must sum to [`BPS_DENOMINATOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyConfig {
    /// Creator share.
    pub creator_bps: u16,
    /// Platform (treasury) share.
    pub platform_bps: u16,
    /// Reseller (current seller) share.
    pub reseller_bps: u16,
}

/// Result of a royalty split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoyaltySplit {
    /// Treasury share.
    pub platform: u64,
    /// Seller share.
    pub reseller: u64,
    /// Creator share, including rounding remainder.
    pub creator: u64,
}

impl RoyaltyConfig {
    /// Construct and validate.
    pub fn new(creator_bps: u16, platform_bps: u16, reseller_bps: u16) -> Result<Self, LedgerError> {
        let cfg = Self { creator_bps, platform_bps, reseller_bps };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Fail unless the shares sum to exactly 10,000.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let sum =
            u32::from(self.creator_bps) + u32::from(self.platform_bps) + u32::from(self.reseller_bps);
        if sum != BPS_DENOMINATOR {
            return Err(LedgerError::Validation(format!(
                "royalty shares sum to {sum} bps, expected {BPS_DENOMINATOR}"
            )));
        }
        Ok(())
    }

    /// Split `price` according to the shares.
    pub fn split(&self, price: u64) -> RoyaltySplit {
        let platform = bps_of(price, self.platform_bps);
        let reseller = bps_of(price, self.reseller_bps);
        // platform + reseller <= price because their bps sum to at most 10,000.
        let creator = price - platform - reseller;
        RoyaltySplit { platform, reseller, creator }
    }
}

fn bps_of(amount: u64, bps: u16) -> u64 {
    // The quotient is at most `amount`, so the narrowing cannot fail.
    let share = u128::from(amount) * u128::from(bps) / u128::from(BPS_DENOMINATOR);
    u64::try_from(share).unwrap_or(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn shares_must_sum_to_whole() {
        assert!(RoyaltyConfig::new(8500, 1000, 500).is_ok());
        assert!(RoyaltyConfig::new(8500, 1000, 501).is_err());
        assert!(RoyaltyConfig::new(0, 0, 0).is_err());
        assert!(RoyaltyConfig::new(10_000, 0, 0).is_ok());
    }

    #[test]
    fn creator_takes_remainder() {
        let cfg = RoyaltyConfig::new(8500, 1000, 500).unwrap();
        let split = cfg.split(999);
        // 99.9 -> 99, 49.95 -> 49, creator 999 - 148.
        assert_eq!(split, RoyaltySplit { platform: 99, reseller: 49, creator: 851 });
    }

    #[test]
    fn max_price_does_not_overflow() {
        let cfg = RoyaltyConfig::new(0, 10_000, 0).unwrap();
        assert_eq!(cfg.split(u64::MAX).platform, u64::MAX);
        assert_eq!(cfg.split(u64::MAX).creator, 0);
    }

    fn arb_config() -> impl Strategy<Value = RoyaltyConfig> {
        (0u16..=10_000).prop_flat_map(|p| {
            (Just(p), 0u16..=(10_000 - p)).prop_map(|(p, r)| RoyaltyConfig {
                creator_bps: 10_000 - p - r,
                platform_bps: p,
                reseller_bps: r,
            })
        })
    }

    proptest! {
        #[test]
        fn shares_sum_to_price(price in 1u64.., cfg in arb_config()) {
            let s = cfg.split(price);
            prop_assert_eq!(
                u128::from(s.platform) + u128::from(s.reseller) + u128::from(s.creator),
                u128::from(price)
            );
        }
    }
}
