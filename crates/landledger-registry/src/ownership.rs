//! Ownership ledger: per-(account, parcel) unit balances.
//!
//! Mathematical invariant checked after every mutation:
//! ```text
//! ∀ parcel: Σ balance(account, parcel) == parcel.total_shares
//! ```
//!
//! A whole parcel has a supply of 1. Fractionalisation rescales the single
//! unit to `total_shares` on the same account, so supply is conserved.
//! A zero balance is the same as no entry; zero entries are removed.

use std::collections::BTreeMap;

use landledger_types::{constants, AccountId, LedgerError, ParcelId, Result};

/// Multi-holder unit balances for every parcel.
pub struct OwnershipLedger {
    /// Keyed by account first so per-account lookups are a range scan.
    balances: BTreeMap<(AccountId, ParcelId), u64>,
}

impl OwnershipLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn balance(&self, account: AccountId, parcel: ParcelId) -> u64 {
        self.balances.get(&(account, parcel)).copied().unwrap_or(0)
    }

    /// Issue the initial supply of a freshly registered parcel.
    ///
    /// # Errors
    /// [`LedgerError::SupplyInvariantViolation`] if the parcel already has supply.
    pub fn mint(&mut self, account: AccountId, parcel: ParcelId, amount: u64) -> Result<()> {
        let existing = self.total_supply(parcel);
        if existing != 0 {
            return Err(LedgerError::SupplyInvariantViolation {
                reason: format!(
                    "{parcel} already has supply {existing}, refusing to mint {amount}"
                ),
            });
        }
        if amount > 0 {
            self.balances.insert((account, parcel), amount);
        }
        Ok(())
    }

    /// Convert `account`'s holding of `from` units into `to` units.
    ///
    /// Used by fractionalisation, where the sole holder's whole unit becomes
    /// the full share supply.
    ///
    /// # Errors
    /// [`LedgerError::InsufficientShares`] if the balance is not exactly `from`.
    pub fn rescale(
        &mut self,
        account: AccountId,
        parcel: ParcelId,
        from: u64,
        to: u64,
    ) -> Result<()> {
        let held = self.balance(account, parcel);
        if held != from {
            return Err(LedgerError::InsufficientShares {
                needed: from,
                available: held,
            });
        }
        if to == 0 {
            self.balances.remove(&(account, parcel));
        } else {
            self.balances.insert((account, parcel), to);
        }
        Ok(())
    }

    /// Move `amount` units of `parcel` from one account to another.
    ///
    /// Either both balances change or neither does.
    ///
    /// # Errors
    /// [`LedgerError::InsufficientShares`] if `from` holds less than `amount`.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        parcel: ParcelId,
        amount: u64,
    ) -> Result<()> {
        let held = self.balance(from, parcel);
        if held < amount {
            return Err(LedgerError::InsufficientShares {
                needed: amount,
                available: held,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }

        let remaining = held - amount;
        if remaining == 0 {
            self.balances.remove(&(from, parcel));
        } else {
            self.balances.insert((from, parcel), remaining);
        }
        *self.balances.entry((to, parcel)).or_insert(0) += amount;
        Ok(())
    }

    /// Sum of all balances for a parcel.
    #[must_use]
    pub fn total_supply(&self, parcel: ParcelId) -> u64 {
        self.balances
            .iter()
            .filter(|((_, p), _)| *p == parcel)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Verify `Σ balances == expected` for a parcel.
    ///
    /// # Errors
    /// [`LedgerError::SupplyInvariantViolation`] if the sums differ.
    pub fn verify_supply(&self, parcel: ParcelId, expected: u64) -> Result<()> {
        let actual = self.total_supply(parcel);
        if actual != expected {
            tracing::error!(
                parcel = %parcel,
                expected,
                actual,
                "Ownership supply invariant violated"
            );
            return Err(LedgerError::SupplyInvariantViolation {
                reason: format!("{parcel}: balances sum to {actual}, total shares {expected}"),
            });
        }
        Ok(())
    }

    /// Parcels in which `account` holds a non-zero balance, ascending.
    #[must_use]
    pub fn parcels_of(&self, account: AccountId) -> Vec<ParcelId> {
        self.balances
            .range((account, ParcelId(0))..=(account, ParcelId(u64::MAX)))
            .map(|((_, parcel), _)| *parcel)
            .collect()
    }

    /// Every (account, balance) holding the parcel.
    #[must_use]
    pub fn holders(&self, parcel: ParcelId) -> Vec<(AccountId, u64)> {
        self.balances
            .iter()
            .filter(|((_, p), _)| *p == parcel)
            .map(|((account, _), amount)| (*account, *amount))
            .collect()
    }

    /// `balance * 100 / total_shares`, always within `[0, 100]`.
    #[must_use]
    pub fn ownership_percentage(
        &self,
        account: AccountId,
        parcel: ParcelId,
        total_shares: u64,
    ) -> u64 {
        if total_shares == 0 {
            return 0;
        }
        let balance = self.balance(account, parcel);
        let pct =
            u128::from(balance) * u128::from(constants::PERCENT_SCALE) / u128::from(total_shares);
        u64::try_from(pct).unwrap_or(constants::PERCENT_SCALE)
    }

    /// `true` if `account` holds the parcel's entire supply.
    #[must_use]
    pub fn is_full_owner(&self, account: AccountId, parcel: ParcelId, total_shares: u64) -> bool {
        total_shares > 0 && self.balance(account, parcel) == total_shares
    }
}

impl Default for OwnershipLedger {
    fn default() -> Self {
        Self::new()
    }
}
