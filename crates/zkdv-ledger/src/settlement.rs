//! # Purchase Settlement
//!
//! One purchase is one unit of work: validate, move funds, mark the
//! listing sold, emit events. Any failure leaves balances and the listing
//! untouched.
//!
//! ## Fee arithmetic (flat-fee mode)
//!
//! ```text
//! refund          = payment - price
//! platform_fee    = floor(price * fee_percent / 100)     (u128 intermediate)
//! creator_royalty = price - platform_fee
//! ```
//!
//! so `platform_fee + creator_royalty == price` for every price and
//! `fee_percent <= 100`. Royalty mode uses [`RoyaltyConfig::split`] instead.

use serde::{Deserialize, Serialize};
use zkdv_core::{sha256_digest, Address, CanonicalBytes, ContentDigest, DatasetId, PolicyId, Timestamp};

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::Tx;
use crate::royalty::RoyaltyConfig;

/// Platform fee percent when nothing else is configured.
pub const DEFAULT_FEE_PERCENT: u8 = 3;

fn default_fee_percent() -> u8 {
    DEFAULT_FEE_PERCENT
}

/// How a price is divided.
///
/// ```yaml
/// mode: flat_fee
/// fee_percent: 3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SettlementPolicy {
    /// Percentage fee to the treasury, remainder to the creator.
    FlatFee {
        /// 0..=100.
        #[serde(default = "default_fee_percent")]
        fee_percent: u8,
    },
    /// Basis-point split; reseller share goes to the current seller.
    Royalty(RoyaltyConfig),
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self::FlatFee { fee_percent: DEFAULT_FEE_PERCENT }
    }
}

impl SettlementPolicy {
    /// `Validation` for a fee above 100 percent or royalty shares that do
    /// not sum to a whole.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match self {
            Self::FlatFee { fee_percent } if *fee_percent > 100 => Err(LedgerError::Validation(
                format!("fee_percent must be at most 100, got {fee_percent}"),
            )),
            Self::FlatFee { .. } => Ok(()),
            Self::Royalty(cfg) => cfg.validate(),
        }
    }
}

/// The division of one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// To the treasury.
    pub platform_fee: u64,
    /// To the creator.
    pub creator_royalty: u64,
    /// To the current seller; zero in flat-fee mode.
    pub reseller_share: u64,
}

impl FeeSplit {
    /// Sum of all shares, widened.
    pub fn total(&self) -> u128 {
        u128::from(self.platform_fee) + u128::from(self.creator_royalty) + u128::from(self.reseller_share)
    }
}

/// Flat-fee split of `price`.
///
/// # Errors
///
/// `Validation` if `fee_percent` exceeds 100.
pub fn flat_fee_split(price: u64, fee_percent: u8) -> Result<FeeSplit, LedgerError> {
    if fee_percent > 100 {
        return Err(LedgerError::Validation(format!(
            "fee_percent must be at most 100, got {fee_percent}"
        )));
    }
    let fee = u128::from(price) * u128::from(fee_percent) / 100;
    let platform_fee = u64::try_from(fee)
        .map_err(|_| LedgerError::Overflow(format!("platform fee on {price}")))?;
    Ok(FeeSplit { platform_fee, creator_royalty: price - platform_fee, reseller_share: 0 })
}

/// Split `price` under `policy`.
pub fn split_price(price: u64, policy: &SettlementPolicy) -> Result<FeeSplit, LedgerError> {
    match policy {
        SettlementPolicy::FlatFee { fee_percent } => flat_fee_split(price, *fee_percent),
        SettlementPolicy::Royalty(cfg) => {
            cfg.validate()?;
            let s = cfg.split(price);
            Ok(FeeSplit { platform_fee: s.platform, creator_royalty: s.creator, reseller_share: s.reseller })
        }
    }
}

/// Everything a buyer needs to prove what they paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Sequence number of the settling unit of work.
    pub tx: u64,
    /// Purchased dataset.
    pub dataset_id: DatasetId,
    /// Buyer.
    pub buyer: Address,
    /// Seller at time of sale.
    pub seller: Address,
    /// Creator credited with the royalty.
    pub creator: Address,
    /// Treasury credited with the fee.
    pub treasury: Address,
    /// Listing price.
    pub price: u64,
    /// Amount offered.
    pub payment: u64,
    /// `payment - price`, credited back to the buyer.
    pub refund: u64,
    /// The division of `price`.
    pub split: FeeSplit,
    /// Policy gating decryption.
    pub policy_ref: PolicyId,
    /// Settlement time.
    pub settled_at: Timestamp,
}

impl PurchaseReceipt {
    /// SHA-256 over the canonical receipt.
    pub fn digest(&self) -> Result<ContentDigest, LedgerError> {
        Ok(sha256_digest(&CanonicalBytes::new(self)?))
    }
}

impl Tx<'_> {
    /// Buy `dataset_id` for the sender.
    ///
    /// The sender is debited the full `payment`; the refund is credited
    /// back in the same unit. The fee goes to `treasury`, or to the
    /// configured treasury when `None`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `ListingUnavailable`, the listing policy's state,
    /// `InsufficientPayment`, then `InsufficientFunds`, in that order. The
    /// policy must still exist (`NotFound` once burned) and be redeemable
    /// (`Revoked`, `Expired`, `UsageExceeded`). `Validation` when no
    /// treasury is given or configured, or it is the zero address.
    pub fn purchase(
        &mut self,
        dataset_id: &DatasetId,
        payment: u64,
        treasury: Option<Address>,
    ) -> Result<PurchaseReceipt, LedgerError> {
        let treasury = treasury
            .or(self.config.treasury)
            .ok_or_else(|| LedgerError::Validation("no treasury given or configured".into()))?;
        if treasury.is_zero() {
            return Err(LedgerError::Validation("treasury must not be the zero address".into()));
        }
        let listing = self
            .state
            .directory
            .get(dataset_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(dataset_id.to_string()))?;
        if !listing.available {
            return Err(LedgerError::ListingUnavailable(dataset_id.clone()));
        }
        self.state
            .policies
            .get(&listing.policy_ref)
            .ok_or_else(|| LedgerError::NotFound(listing.policy_ref.to_string()))?
            .ensure_redeemable(self.now)?;
        if payment < listing.price {
            return Err(LedgerError::InsufficientPayment { required: listing.price, offered: payment });
        }
        let buyer = self.sender;
        let available = self.state.balances.balance_of(&buyer);
        if available < payment {
            return Err(LedgerError::InsufficientFunds { required: payment, available });
        }

        let refund = payment - listing.price;
        let split = split_price(listing.price, &self.config.settlement)?;

        let balances = &mut self.state.balances;
        balances.debit(buyer, payment)?;
        balances.credit(treasury, split.platform_fee)?;
        balances.credit(listing.creator, split.creator_royalty)?;
        if split.reseller_share > 0 {
            balances.credit(listing.seller, split.reseller_share)?;
        }
        if refund > 0 {
            balances.credit(buyer, refund)?;
        }
        self.state.directory.mark_sold(dataset_id)?;

        self.emit(LedgerEvent::PurchaseCompleted {
            dataset_id: dataset_id.clone(),
            buyer,
            seller: listing.seller,
            price: listing.price,
            platform_fee: split.platform_fee,
            creator_royalty: split.creator_royalty,
            reseller_share: split.reseller_share,
        });
        self.emit(LedgerEvent::DecryptionGranted {
            dataset_id: dataset_id.clone(),
            buyer,
            policy_ref: listing.policy_ref,
        });
        tracing::info!(
            dataset = %dataset_id,
            buyer = %buyer,
            price = listing.price,
            platform_fee = split.platform_fee,
            creator_royalty = split.creator_royalty,
            refund,
            "purchase settled"
        );

        Ok(PurchaseReceipt {
            tx: self.sequence,
            dataset_id: dataset_id.clone(),
            buyer,
            seller: listing.seller,
            creator: listing.creator,
            treasury,
            price: listing.price,
            payment,
            refund,
            split,
            policy_ref: listing.policy_ref,
            settled_at: self.now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn three_percent_of_100000() {
        let s = flat_fee_split(100_000, 3).unwrap();
        assert_eq!((s.platform_fee, s.creator_royalty, s.reseller_share), (3_000, 97_000, 0));
    }

    #[test]
    fn fee_rounds_down() {
        let s = flat_fee_split(12_345, 3).unwrap();
        // 370.35 -> 370
        assert_eq!(s.platform_fee, 370);
        assert_eq!(s.creator_royalty, 11_975);
    }

    #[test]
    fn fee_bounds() {
        assert_eq!(flat_fee_split(500, 0).unwrap().creator_royalty, 500);
        assert_eq!(flat_fee_split(500, 100).unwrap().platform_fee, 500);
        assert!(flat_fee_split(500, 101).is_err());
        let max = flat_fee_split(u64::MAX, 100).unwrap();
        assert_eq!(max.platform_fee, u64::MAX);
    }

    #[test]
    fn royalty_policy_split() {
        let cfg = RoyaltyConfig::new(8_000, 1_500, 500).unwrap();
        let s = split_price(10_000, &SettlementPolicy::Royalty(cfg)).unwrap();
        assert_eq!((s.platform_fee, s.reseller_share, s.creator_royalty), (1_500, 500, 8_000));
    }

    #[test]
    fn policy_yaml_and_validation() {
        let flat: SettlementPolicy = serde_yaml::from_str("mode: flat_fee").unwrap();
        assert_eq!(flat, SettlementPolicy::default());
        let flat: SettlementPolicy = serde_yaml::from_str("mode: flat_fee\nfee_percent: 5").unwrap();
        assert_eq!(flat, SettlementPolicy::FlatFee { fee_percent: 5 });
        assert!(SettlementPolicy::FlatFee { fee_percent: 101 }.validate().is_err());
        let uneven = SettlementPolicy::Royalty(RoyaltyConfig { creator_bps: 1, platform_bps: 1, reseller_bps: 1 });
        assert!(uneven.validate().is_err());
    }

    #[test]
    fn receipt_digest_is_stable() {
        let r = PurchaseReceipt {
            tx: 4,
            dataset_id: DatasetId::new("ds").unwrap(),
            buyer: Address::from_bytes([2; 32]),
            seller: Address::from_bytes([1; 32]),
            creator: Address::from_bytes([1; 32]),
            treasury: Address::from_bytes([7; 32]),
            price: 100,
            payment: 120,
            refund: 20,
            split: flat_fee_split(100, 3).unwrap(),
            policy_ref: PolicyId::new(),
            settled_at: Timestamp::epoch(),
        };
        assert_eq!(r.digest().unwrap(), r.clone().digest().unwrap());
        let mut other = r.clone();
        other.refund = 21;
        assert_ne!(r.digest().unwrap(), other.digest().unwrap());
    }

    proptest! {
        #[test]
        fn flat_fee_conserves_price(price in 1u64.., fee_percent in 0u8..=100) {
            let s = flat_fee_split(price, fee_percent).unwrap();
            prop_assert_eq!(s.total(), u128::from(price));
            prop_assert_eq!(s.platform_fee + s.creator_royalty, price);
        }
    }
}
