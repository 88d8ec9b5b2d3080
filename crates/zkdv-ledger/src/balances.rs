//! # Account Balances
//!
//! Integer balances in indivisible units. Every mutation is checked; an
//! overflow or shortfall fails the unit of work instead of wrapping.

use std::collections::BTreeMap;

use zkdv_core::Address;

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::Tx;

/// Balance table keyed by account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    accounts: BTreeMap<Address, u64>,
}

impl Balances {
    /// Current balance; zero for unknown accounts.
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.accounts.get(account).copied().unwrap_or(0)
    }

    /// Add `amount` to `account`.
    pub fn credit(&mut self, account: Address, amount: u64) -> Result<(), LedgerError> {
        let entry = self.accounts.entry(account).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(format!("crediting {amount} to {account}")))?;
        Ok(())
    }

    /// Remove `amount` from `account`.
    pub fn debit(&mut self, account: Address, amount: u64) -> Result<(), LedgerError> {
        let available = self.balance_of(&account);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds { required: amount, available })?;
        self.accounts.insert(account, remaining);
        Ok(())
    }

    /// Sum of all balances.
    pub fn total(&self) -> u128 {
        self.accounts.values().map(|v| u128::from(*v)).sum()
    }
}

impl Tx<'_> {
    /// Credit external funds to `account`.
    ///
    /// Funding enters from outside the ledger, so any sender may deposit to
    /// any account. Zero deposits are rejected.
    pub fn deposit(&mut self, account: Address, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::Validation("deposit amount must be positive".into()));
        }
        if account.is_zero() {
            return Err(LedgerError::Validation("cannot deposit to the zero address".into()));
        }
        self.state.balances.credit(account, amount)?;
        self.emit(LedgerEvent::Deposited { account, amount });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        let mut b = [0u8; 32];
        b[31] = n;
        Address::from_bytes(b)
    }

    #[test]
    fn credit_and_debit() {
        let mut b = Balances::default();
        b.credit(addr(1), 100).unwrap();
        b.debit(addr(1), 40).unwrap();
        assert_eq!(b.balance_of(&addr(1)), 60);
        assert_eq!(b.balance_of(&addr(2)), 0);
        assert_eq!(b.total(), 60);
    }

    #[test]
    fn debit_beyond_balance_fails_without_change() {
        let mut b = Balances::default();
        b.credit(addr(1), 10).unwrap();
        assert_eq!(
            b.debit(addr(1), 11),
            Err(LedgerError::InsufficientFunds { required: 11, available: 10 })
        );
        assert_eq!(b.balance_of(&addr(1)), 10);
    }

    #[test]
    fn credit_overflow_is_an_error() {
        let mut b = Balances::default();
        b.credit(addr(1), u64::MAX).unwrap();
        assert!(matches!(b.credit(addr(1), 1), Err(LedgerError::Overflow(_))));
        assert_eq!(b.balance_of(&addr(1)), u64::MAX);
    }
}
