//! # Dataset Listings
//!
//! At most one listing per dataset id, ever. A listing starts available
//! and flips to unavailable exactly once, on a successful purchase; the
//! record stays so the id cannot be listed again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zkdv_core::{Address, DatasetId, PolicyId, Timestamp};

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::Tx;

/// A dataset offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Dataset identifier.
    pub dataset_id: DatasetId,
    /// Original creator; receives the creator royalty.
    pub creator: Address,
    /// Current seller.
    pub seller: Address,
    /// Price in indivisible units, positive.
    pub price: u64,
    /// Where the encrypted blob is stored.
    pub locator: String,
    /// Policy gating decryption.
    pub policy_ref: PolicyId,
    /// Attested quality, 0-255.
    pub quality_score: u8,
    /// False once sold.
    pub available: bool,
    /// When the listing was created.
    pub listed_at: Timestamp,
}

/// Arguments to [`Tx::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    /// Dataset to list.
    pub dataset_id: DatasetId,
    /// Asking price.
    pub price: u64,
    /// Blob locator.
    pub locator: String,
    /// Policy gating decryption.
    pub policy_ref: PolicyId,
    /// Attested quality.
    pub quality_score: u8,
}

impl ListingRequest {
    /// Price must be positive and the locator non-blank.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.price == 0 {
            return Err(LedgerError::Validation("price must be positive".into()));
        }
        if self.locator.trim().is_empty() {
            return Err(LedgerError::Validation("locator must not be empty".into()));
        }
        Ok(())
    }
}

/// All listings ever created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    listings: BTreeMap<DatasetId, Listing>,
}

impl Directory {
    /// The listing for `dataset_id`.
    pub fn get(&self, dataset_id: &DatasetId) -> Option<&Listing> {
        self.listings.get(dataset_id)
    }

    /// Add a listing; `DuplicateListing` if the id was ever listed.
    pub fn insert(&mut self, listing: Listing) -> Result<(), LedgerError> {
        if self.listings.contains_key(&listing.dataset_id) {
            return Err(LedgerError::DuplicateListing(listing.dataset_id));
        }
        self.listings.insert(listing.dataset_id.clone(), listing);
        Ok(())
    }

    /// Flip an available listing to sold.
    pub fn mark_sold(&mut self, dataset_id: &DatasetId) -> Result<(), LedgerError> {
        let listing = self
            .listings
            .get_mut(dataset_id)
            .ok_or_else(|| LedgerError::NotFound(dataset_id.to_string()))?;
        if !listing.available {
            return Err(LedgerError::ListingUnavailable(dataset_id.clone()));
        }
        listing.available = false;
        Ok(())
    }

    /// Listings still for sale.
    pub fn available(&self) -> impl Iterator<Item = &Listing> {
        self.listings.values().filter(|l| l.available)
    }

    /// Number of listings ever created.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether nothing was ever listed.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl Tx<'_> {
    /// List a dataset with the sender as creator and seller.
    ///
    /// # Errors
    ///
    /// `Validation` for a zero price or blank locator; `DuplicateListing`
    /// if the dataset was ever listed; `NotFound` if the policy does not
    /// exist.
    pub fn list(&mut self, request: ListingRequest) -> Result<(), LedgerError> {
        request.validate()?;
        if self.state.directory.get(&request.dataset_id).is_some() {
            return Err(LedgerError::DuplicateListing(request.dataset_id));
        }
        if self.state.policies.get(&request.policy_ref).is_none() {
            return Err(LedgerError::NotFound(request.policy_ref.to_string()));
        }
        let listing = Listing {
            dataset_id: request.dataset_id,
            creator: self.sender,
            seller: self.sender,
            price: request.price,
            locator: request.locator,
            policy_ref: request.policy_ref,
            quality_score: request.quality_score,
            available: true,
            listed_at: self.now,
        };
        let event = LedgerEvent::ListingCreated {
            dataset_id: listing.dataset_id.clone(),
            seller: listing.seller,
            price: listing.price,
            quality_score: listing.quality_score,
            policy_ref: listing.policy_ref,
        };
        tracing::info!(
            dataset = %listing.dataset_id,
            seller = %listing.seller,
            price = listing.price,
            quality = listing.quality_score,
            "dataset listed"
        );
        self.state.directory.insert(listing)?;
        self.emit(event);
        Ok(())
    }
}
