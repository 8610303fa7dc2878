//! Pairwise fraud-volume model.
//!
//! ## State Machine (per ordered buyer/seller pair)
//!
//! ```text
//!   ┌────────┐ 1st tx  ┌──────────┐ count == T-1 ┌────────┐ count == T ┌─────────┐
//!   │ UNSEEN ├────────▶│ TRACKING ├─────────────▶│ WARNED ├───────────▶│ FLAGGED │
//!   └────────┘         └────▲─────┘              └────────┘            └────┬────┘
//!                           │            admin clears flag                  │
//!                           └───────────────────────────────────────────────┘
//! ```
//!
//! The count never decreases. Clearing the flag keeps the count.

use serde::{Deserialize, Serialize};

use crate::ParcelId;

/// Bookkeeping for one ordered (buyer, seller) pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PairRecord {
    /// Number of recorded transactions. Monotonically non-decreasing.
    pub count: u64,
    /// Sticky until an administrator clears it.
    pub flagged: bool,
    /// Parcel ids involved, in transaction order.
    pub history: Vec<ParcelId>,
}

impl PairRecord {
    /// Lifecycle state for a given flag threshold.
    #[must_use]
    pub fn state(&self, threshold: u32) -> PairState {
        if self.flagged {
            PairState::Flagged
        } else if self.count == 0 {
            PairState::Unseen
        } else if self.count + 1 == u64::from(threshold) {
            PairState::Warned
        } else {
            PairState::Tracking
        }
    }
}

/// Lifecycle state of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairState {
    /// No transaction recorded yet.
    Unseen,
    /// Transactions recorded, below the warning level.
    Tracking,
    /// One transaction below the threshold.
    Warned,
    /// Further settlement between this pair is blocked.
    Flagged,
}

impl std::fmt::Display for PairState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unseen => write!(f, "UNSEEN"),
            Self::Tracking => write!(f, "TRACKING"),
            Self::Warned => write!(f, "WARNED"),
            Self::Flagged => write!(f, "FLAGGED"),
        }
    }
}
