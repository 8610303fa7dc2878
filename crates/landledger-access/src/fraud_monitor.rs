//! Fraud monitor: wash-trade detection on ordered (buyer, seller) pairs.
//!
//! Every settled transaction between two accounts is recorded against the
//! ordered pair. One below the threshold raises a warning; reaching the
//! threshold flags the pair and blocks further settlement in that direction
//! until an administrator clears it.
//!
//! ## Invariants
//!
//! - Counts never decrease. Clearing a flag keeps the count.
//! - The automatic flag is raised exactly when the count first reaches the
//!   threshold, never earlier.
//! - `(A, B)` and `(B, A)` are tracked independently.

use std::collections::HashMap;

use landledger_types::{
    constants, AccountId, LedgerError, LedgerEvent, PairKey, PairRecord, PairState, ParcelId,
    Result,
};

/// Pairwise transaction-volume tracker.
pub struct FraudMonitor {
    /// Count at which a pair is flagged.
    threshold: u32,
    /// Per ordered pair bookkeeping.
    pairs: HashMap<PairKey, PairRecord>,
}

impl FraudMonitor {
    /// Create a monitor with the given threshold.
    ///
    /// # Panics
    /// Panics if `threshold` is below [`constants::MIN_FRAUD_THRESHOLD`].
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        assert!(
            threshold >= constants::MIN_FRAUD_THRESHOLD,
            "fraud threshold must be >= {}",
            constants::MIN_FRAUD_THRESHOLD
        );
        Self {
            threshold,
            pairs: HashMap::new(),
        }
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Gate a settlement attempt.
    ///
    /// # Errors
    /// [`LedgerError::FraudBlocked`] if the ordered pair is flagged.
    pub fn check(&self, buyer: AccountId, seller: AccountId) -> Result<()> {
        if self.is_flagged(buyer, seller) {
            tracing::warn!(
                buyer = %buyer,
                seller = %seller,
                count = self.count(buyer, seller),
                "Settlement blocked: flagged pair"
            );
            return Err(LedgerError::FraudBlocked { buyer, seller });
        }
        Ok(())
    }

    /// Record one committed transaction and return the notifications it raised.
    pub fn record(
        &mut self,
        buyer: AccountId,
        seller: AccountId,
        parcel: ParcelId,
    ) -> Vec<LedgerEvent> {
        let threshold = u64::from(self.threshold);
        let record = self.pairs.entry(PairKey::new(buyer, seller)).or_default();
        record.count += 1;
        record.history.push(parcel);

        let mut events = Vec::new();
        if record.count + 1 == threshold {
            tracing::warn!(
                buyer = %buyer,
                seller = %seller,
                count = record.count,
                parcel = %parcel,
                "Suspicious activity: pair approaching fraud threshold"
            );
            events.push(LedgerEvent::SuspiciousActivity {
                buyer,
                seller,
                count: record.count,
                parcel,
            });
        } else if record.count == threshold {
            record.flagged = true;
            tracing::warn!(
                buyer = %buyer,
                seller = %seller,
                count = record.count,
                "Pair flagged at fraud threshold"
            );
            events.push(LedgerEvent::PairFlagged {
                buyer,
                seller,
                count: record.count,
            });
        } else {
            tracing::debug!(
                buyer = %buyer,
                seller = %seller,
                count = record.count,
                "Pair transaction recorded"
            );
        }
        events
    }

    /// Set or clear a pair's flag by hand. The count is left untouched.
    ///
    /// Returns `PairFlagged` when setting and `PairUnflagged` when clearing.
    /// Clearing a pair that has never traded is a no-op and returns `None`.
    pub fn set_flag(
        &mut self,
        buyer: AccountId,
        seller: AccountId,
        flag: bool,
    ) -> Option<LedgerEvent> {
        let key = PairKey::new(buyer, seller);
        if !flag && !self.pairs.contains_key(&key) {
            tracing::debug!(buyer = %buyer, seller = %seller, "Unflag ignored: unseen pair");
            return None;
        }
        let record = self.pairs.entry(key).or_default();
        record.flagged = flag;
        tracing::info!(
            buyer = %buyer,
            seller = %seller,
            count = record.count,
            flagged = flag,
            "Pair flag set manually"
        );
        Some(if flag {
            LedgerEvent::PairFlagged {
                buyer,
                seller,
                count: record.count,
            }
        } else {
            LedgerEvent::PairUnflagged { buyer, seller }
        })
    }

    #[must_use]
    pub fn count(&self, buyer: AccountId, seller: AccountId) -> u64 {
        self.pairs
            .get(&PairKey::new(buyer, seller))
            .map_or(0, |r| r.count)
    }

    /// Parcel ids involved in this pair's transactions, oldest first.
    #[must_use]
    pub fn history(&self, buyer: AccountId, seller: AccountId) -> Vec<ParcelId> {
        self.pairs
            .get(&PairKey::new(buyer, seller))
            .map(|r| r.history.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_flagged(&self, buyer: AccountId, seller: AccountId) -> bool {
        self.pairs
            .get(&PairKey::new(buyer, seller))
            .is_some_and(|r| r.flagged)
    }

    #[must_use]
    pub fn state(&self, buyer: AccountId, seller: AccountId) -> PairState {
        self.pairs
            .get(&PairKey::new(buyer, seller))
            .map_or(PairState::Unseen, |r| r.state(self.threshold))
    }

    /// All currently flagged pairs, in key order.
    #[must_use]
    pub fn flagged_pairs(&self) -> Vec<PairKey> {
        let mut flagged: Vec<PairKey> = self
            .pairs
            .iter()
            .filter(|(_, r)| r.flagged)
            .map(|(k, _)| *k)
            .collect();
        flagged.sort();
        flagged
    }
}

impl Default for FraudMonitor {
    fn default() -> Self {
        Self::new(constants::DEFAULT_FRAUD_THRESHOLD)
    }
}
