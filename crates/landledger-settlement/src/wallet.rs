//! Payment wallets.
//!
//! Holds the currency that buyers attach to purchases. Funds enter with
//! [`Wallets::deposit`], leave with [`Wallets::withdraw`], and move between
//! accounts only inside settlement. All mutations are atomic: either the
//! full operation succeeds or the balances are unchanged.

use std::collections::HashMap;

use landledger_types::{AccountId, LedgerError, Result};
use rust_decimal::Decimal;

use crate::supply_conservation::SupplyConservation;

/// Per-account currency balances with conservation tracking.
pub struct Wallets {
    balances: HashMap<AccountId, Decimal>,
    supply: SupplyConservation,
}

impl Wallets {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            supply: SupplyConservation::new(),
        }
    }

    /// Credit funds from outside the ledger.
    ///
    /// # Errors
    /// - [`LedgerError::InvalidPrice`] for non-positive amounts
    /// - [`LedgerError::PaymentOverflow`] if the wallet or the deposit total
    ///   would overflow; nothing is credited
    pub fn deposit(&mut self, account: AccountId, amount: Decimal) -> Result<()> {
        ensure_positive(amount, "deposit")?;
        let credited = self.check_credit(account, amount)?;
        self.supply.record_deposit(amount)?;
        self.balances.insert(account, credited);
        Ok(())
    }

    /// Debit funds to outside the ledger.
    ///
    /// # Errors
    /// - [`LedgerError::InvalidPrice`] for non-positive amounts
    /// - [`LedgerError::InsufficientFunds`] if the balance is short
    pub fn withdraw(&mut self, account: AccountId, amount: Decimal) -> Result<()> {
        ensure_positive(amount, "withdrawal")?;
        self.check_funds(account, amount)?;
        self.debit(account, amount);
        self.supply.record_withdrawal(amount);
        Ok(())
    }

    /// Check that `account` can pay `amount`, without mutating.
    pub fn check_funds(&self, account: AccountId, amount: Decimal) -> Result<()> {
        let available = self.balance(account);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Balance `account` would hold after receiving `amount`, without mutating.
    ///
    /// # Errors
    /// [`LedgerError::PaymentOverflow`] if the sum does not fit.
    pub fn check_credit(&self, account: AccountId, amount: Decimal) -> Result<Decimal> {
        self.balance(account)
            .checked_add(amount)
            .ok_or(LedgerError::PaymentOverflow)
    }

    /// Move a payment between wallets.
    ///
    /// # Errors
    /// - [`LedgerError::InsufficientFunds`] if `from` cannot cover `amount`
    /// - [`LedgerError::PaymentOverflow`] if crediting `to` would overflow
    pub fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        self.check_funds(from, amount)?;
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let credited = self.check_credit(to, amount)?;
        self.debit(from, amount);
        self.balances.insert(to, credited);
        Ok(())
    }

    #[must_use]
    pub fn balance(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of every wallet.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.balances.values().copied().sum()
    }

    /// Verify `Σ wallets == Σ deposits − Σ withdrawals`.
    pub fn verify_supply(&self) -> Result<()> {
        self.supply.verify(self.total_supply())
    }

    fn debit(&mut self, account: AccountId, amount: Decimal) {
        if let Some(balance) = self.balances.get_mut(&account) {
            *balance -= amount;
            if balance.is_zero() {
                self.balances.remove(&account);
            }
        }
    }
}

impl Default for Wallets {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_positive(amount: Decimal, what: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidPrice {
            reason: format!("{what} amount must be positive, got {amount}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_increases_balance() {
        let mut w = Wallets::new();
        let user = AccountId::new();
        w.deposit(user, Decimal::new(1000, 0)).unwrap();
        assert_eq!(w.balance(user), Decimal::new(1000, 0));
        w.verify_supply().unwrap();
    }

    #[test]
    fn non_positive_deposit_rejected() {
        let mut w = Wallets::new();
        let user = AccountId::new();
        assert!(w.deposit(user, Decimal::ZERO).is_err());
        assert!(w.deposit(user, Decimal::new(-5, 0)).is_err());
        assert_eq!(w.balance(user), Decimal::ZERO);
    }

    #[test]
    fn transfer_moves_funds() {
        let mut w = Wallets::new();
        let (a, b) = (AccountId::new(), AccountId::new());
        w.deposit(a, Decimal::new(10, 0)).unwrap();
        w.transfer(a, b, Decimal::new(4, 0)).unwrap();
        assert_eq!(w.balance(a), Decimal::new(6, 0));
        assert_eq!(w.balance(b), Decimal::new(4, 0));
        w.verify_supply().unwrap();
    }

    #[test]
    fn transfer_insufficient_fails_without_change() {
        let mut w = Wallets::new();
        let (a, b) = (AccountId::new(), AccountId::new());
        w.deposit(a, Decimal::new(1, 0)).unwrap();
        let err = w.transfer(a, b, Decimal::new(2, 0)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        assert_eq!(w.balance(a), Decimal::ONE);
        assert_eq!(w.balance(b), Decimal::ZERO);
    }

    #[test]
    fn overflowing_deposit_credits_nothing() {
        let mut w = Wallets::new();
        let (a, b) = (AccountId::new(), AccountId::new());
        w.deposit(a, Decimal::MAX).unwrap();

        let err = w.deposit(b, Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::PaymentOverflow));
        assert_eq!(w.balance(b), Decimal::ZERO);

        let err = w.deposit(a, Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::PaymentOverflow));
        assert_eq!(w.balance(a), Decimal::MAX);
        w.verify_supply().unwrap();
    }

    #[test]
    fn check_credit_reports_overflow() {
        let mut w = Wallets::new();
        let a = AccountId::new();
        w.deposit(a, Decimal::MAX).unwrap();
        assert!(matches!(
            w.check_credit(a, Decimal::ONE).unwrap_err(),
            LedgerError::PaymentOverflow
        ));
        assert_eq!(w.check_credit(a, Decimal::ZERO).unwrap(), Decimal::MAX);
    }

    #[test]
    fn withdraw_reduces_supply() {
        let mut w = Wallets::new();
        let user = AccountId::new();
        w.deposit(user, Decimal::new(10, 0)).unwrap();
        w.withdraw(user, Decimal::new(10, 0)).unwrap();
        assert_eq!(w.balance(user), Decimal::ZERO);
        assert_eq!(w.total_supply(), Decimal::ZERO);
        w.verify_supply().unwrap();

        let err = w.withdraw(user, Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }
}
