//! # Access Policies
//!
//! A time- and usage-bounded capability that gates decryption grants.
//!
//! ## Lifecycle
//!
//! ```text
//! create ──▶ active ──increment_usage()*──▶ exhausted (current_uses == max_uses)
//!              │
//!              ├──revoke()──▶ inactive (usage retained)
//!              │
//!              └──now > expiry──▶ expired
//!
//! any state ──burn()──▶ destroyed
//! ```
//!
//! `current_uses <= max_uses` holds in every state. Once expired or
//! exhausted, `check_access` is false even while the policy is active.
//!
//! ## Issuance ledger
//!
//! [`PolicyBook`] counts every policy issued and burned. `outstanding()`
//! is their difference; a test scenario that ends with non-zero
//! outstanding policies leaked one.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use zkdv_core::{Address, PolicyId, Timestamp};

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::Tx;

/// A decryption capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Policy identifier.
    pub id: PolicyId,
    /// Grantor; the only account that may revoke or burn.
    pub owner: Address,
    /// Identities that may use the policy.
    pub allowed: BTreeSet<Address>,
    /// Last instant at which the policy is usable.
    pub expiry: Timestamp,
    /// Usage limit, at least 1.
    pub max_uses: u64,
    /// Uses so far.
    pub current_uses: u64,
    /// Cleared by revocation.
    pub active: bool,
}

impl AccessPolicy {
    /// A fresh, active policy with no uses.
    ///
    /// # Errors
    ///
    /// `Validation` if `max_uses` is zero.
    pub fn create(
        owner: Address,
        allowed: BTreeSet<Address>,
        expiry: Timestamp,
        max_uses: u64,
    ) -> Result<Self, LedgerError> {
        if max_uses == 0 {
            return Err(LedgerError::Validation("max_uses must be at least 1".into()));
        }
        Ok(Self {
            id: PolicyId::new(),
            owner,
            allowed,
            expiry,
            max_uses,
            current_uses: 0,
            active: true,
        })
    }

    /// Whether `now` is past the expiry.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expiry
    }

    /// Whether every use has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.current_uses >= self.max_uses
    }

    /// Active, unexpired, not exhausted, and `identity` is allowed.
    pub fn check_access(&self, identity: &Address, now: Timestamp) -> bool {
        self.active
            && !self.is_expired(now)
            && !self.is_exhausted()
            && self.allowed.contains(identity)
    }

    /// Whether a use could still be consumed at `now` by some allowed
    /// identity. A purchase settles only against a redeemable policy.
    ///
    /// # Errors
    ///
    /// `Revoked`, `Expired`, or `UsageExceeded`, checked in that order.
    pub fn ensure_redeemable(&self, now: Timestamp) -> Result<(), LedgerError> {
        if !self.active {
            return Err(LedgerError::Revoked(self.id));
        }
        if self.is_expired(now) {
            return Err(LedgerError::Expired { expiry: self.expiry });
        }
        if self.is_exhausted() {
            return Err(LedgerError::UsageExceeded { max_uses: self.max_uses });
        }
        Ok(())
    }

    /// Consume one use on behalf of `identity`. Returns the new use count.
    ///
    /// # Errors
    ///
    /// `Revoked`, `Expired`, `UsageExceeded`, or `Unauthorized`, checked in
    /// that order. The policy is unchanged on error.
    pub fn increment_usage(&mut self, identity: &Address, now: Timestamp) -> Result<u64, LedgerError> {
        self.ensure_redeemable(now)?;
        if !self.allowed.contains(identity) {
            return Err(LedgerError::Unauthorized(format!("{identity} is not allowed by {}", self.id)));
        }
        self.current_uses += 1;
        Ok(self.current_uses)
    }

    /// Deactivate. Usage count is kept.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the owner.
    pub fn revoke(&mut self, caller: &Address) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        self.active = false;
        Ok(())
    }

    fn require_owner(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller != self.owner {
            return Err(LedgerError::Unauthorized(format!("{caller} does not own {}", self.id)));
        }
        Ok(())
    }
}

/// Live policies plus issuance and burn counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyBook {
    policies: BTreeMap<PolicyId, AccessPolicy>,
    issued: u64,
    burned: u64,
}

impl PolicyBook {
    /// Take ownership of a newly created policy.
    pub fn issue(&mut self, policy: AccessPolicy) -> Result<PolicyId, LedgerError> {
        let id = policy.id;
        if self.policies.contains_key(&id) {
            return Err(LedgerError::AlreadyExists(id.to_string()));
        }
        self.policies.insert(id, policy);
        self.issued += 1;
        Ok(id)
    }

    /// The live policy `id`.
    pub fn get(&self, id: &PolicyId) -> Option<&AccessPolicy> {
        self.policies.get(id)
    }

    /// Mutable access, `NotFound` if absent or burned.
    pub fn get_mut(&mut self, id: &PolicyId) -> Result<&mut AccessPolicy, LedgerError> {
        self.policies.get_mut(id).ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    /// Destroy policy `id`. Owner only; a second burn is `NotFound`.
    pub fn burn(&mut self, id: &PolicyId, caller: &Address) -> Result<AccessPolicy, LedgerError> {
        self.get_mut(id)?.require_owner(caller)?;
        let policy = self.policies.remove(id).ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        self.burned += 1;
        Ok(policy)
    }

    /// Policies ever issued.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Policies burned.
    pub fn burned(&self) -> u64 {
        self.burned
    }

    /// Issued and not burned.
    pub fn outstanding(&self) -> u64 {
        self.issued - self.burned
    }
}

impl Tx<'_> {
    /// Create a policy owned by the sender.
    pub fn create_policy(
        &mut self,
        allowed: BTreeSet<Address>,
        expiry: Timestamp,
        max_uses: u64,
    ) -> Result<PolicyId, LedgerError> {
        let policy = AccessPolicy::create(self.sender, allowed, expiry, max_uses)?;
        let id = self.state.policies.issue(policy)?;
        tracing::info!(policy = %id, owner = %self.sender, max_uses, "access policy created");
        self.emit(LedgerEvent::PolicyCreated { policy_id: id, owner: self.sender, max_uses, expiry });
        Ok(id)
    }

    /// Consume one use of policy `id` for the sender.
    pub fn increment_usage(&mut self, id: &PolicyId) -> Result<u64, LedgerError> {
        let (sender, now) = (self.sender, self.now);
        let uses = self.state.policies.get_mut(id)?.increment_usage(&sender, now)?;
        tracing::info!(policy = %id, identity = %sender, uses, "access granted");
        self.emit(LedgerEvent::AccessGranted { policy_id: *id, identity: sender, uses });
        Ok(uses)
    }

    /// Revoke policy `id`; sender must own it.
    pub fn revoke_policy(&mut self, id: &PolicyId) -> Result<(), LedgerError> {
        let sender = self.sender;
        self.state.policies.get_mut(id)?.revoke(&sender)?;
        tracing::info!(policy = %id, "access policy revoked");
        self.emit(LedgerEvent::PolicyRevoked { policy_id: *id });
        Ok(())
    }

    /// Burn policy `id`; sender must own it.
    pub fn burn_policy(&mut self, id: &PolicyId) -> Result<(), LedgerError> {
        let sender = self.sender;
        self.state.policies.burn(id, &sender)?;
        tracing::info!(policy = %id, "access policy burned");
        self.emit(LedgerEvent::PolicyBurned { policy_id: *id });
        Ok(())
    }
}
