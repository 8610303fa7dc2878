//! Currency supply conservation.
//!
//! Mathematical invariant enforced after every settlement:
//! ```text
//! Σ wallet balances == Σ deposits − Σ withdrawals
//! ```
//!
//! Settlement only moves currency between wallets, so the identity must hold
//! after every commit. If it ever breaks, payment and ownership have drifted
//! apart and the ledger reports a critical error.

use landledger_types::{LedgerError, Result};
use rust_decimal::Decimal;

/// Tracks money entering and leaving the ledger.
pub struct SupplyConservation {
    /// Total deposits since genesis.
    deposits: Decimal,
    /// Total withdrawals since genesis.
    withdrawals: Decimal,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            deposits: Decimal::ZERO,
            withdrawals: Decimal::ZERO,
        }
    }

    /// Add to the deposit total.
    ///
    /// # Errors
    /// [`LedgerError::PaymentOverflow`] if the total would overflow. The total
    /// is left unchanged.
    pub fn record_deposit(&mut self, amount: Decimal) -> Result<()> {
        self.deposits = self
            .deposits
            .checked_add(amount)
            .ok_or(LedgerError::PaymentOverflow)?;
        Ok(())
    }

    /// Withdrawals never exceed deposits, so this cannot overflow.
    pub fn record_withdrawal(&mut self, amount: Decimal) {
        self.withdrawals += amount;
    }

    /// Expected total supply: deposits − withdrawals.
    #[must_use]
    pub fn expected_supply(&self) -> Decimal {
        self.deposits - self.withdrawals
    }

    /// Verify that the actual wallet total matches the expected supply.
    ///
    /// # Errors
    /// Returns [`LedgerError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            return Err(LedgerError::SupplyInvariantViolation {
                reason: format!(
                    "currency: actual supply {actual_supply} != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.deposits, self.withdrawals,
                ),
            });
        }
        Ok(())
    }
}

impl Default for SupplyConservation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.expected_supply(), Decimal::ZERO);
        assert!(sc.verify(Decimal::ZERO).is_ok());
    }

    #[test]
    fn deposits_and_withdrawals() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(Decimal::new(1000, 0)).unwrap();
        sc.record_deposit(Decimal::new(500, 0)).unwrap();
        sc.record_withdrawal(Decimal::new(300, 0));
        assert_eq!(sc.expected_supply(), Decimal::new(1200, 0));
        assert!(sc.verify(Decimal::new(1200, 0)).is_ok());
    }

    #[test]
    fn deposit_overflow_leaves_total() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(Decimal::MAX).unwrap();
        let err = sc.record_deposit(Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::PaymentOverflow));
        assert_eq!(sc.expected_supply(), Decimal::MAX);
    }

    #[test]
    fn verify_fails_when_imbalanced() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(Decimal::new(10, 0)).unwrap();
        let err = sc.verify(Decimal::new(11, 0)).unwrap_err();
        assert!(matches!(err, LedgerError::SupplyInvariantViolation { .. }));
    }
}
