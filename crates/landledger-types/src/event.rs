//! Notifications emitted by the ledger.
//!
//! Every committed entry point appends its events to an append-only journal.
//! Failed entry points append nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, ParcelId};

/// A single ledger notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Buyer and seller capabilities were auto-granted.
    RolesGranted { account: AccountId },
    /// A new parcel was registered.
    LandRegistered {
        parcel: ParcelId,
        owner: AccountId,
        address: String,
    },
    /// A whole parcel was listed for sale.
    WholeListed { parcel: ParcelId, price: Decimal },
    /// A whole parcel was taken off the market.
    WholeDelisted { parcel: ParcelId, by: AccountId },
    /// A whole parcel changed hands for payment.
    WholePurchased {
        parcel: ParcelId,
        buyer: AccountId,
        seller: AccountId,
        price: Decimal,
    },
    /// A parcel was split into shares.
    Fractionalised {
        parcel: ParcelId,
        total_shares: u64,
        price_per_share: Decimal,
    },
    /// Shares were bought from the registered owner.
    SharesPurchased {
        parcel: ParcelId,
        buyer: AccountId,
        seller: AccountId,
        shares: u64,
        amount: Decimal,
    },
    /// Shares moved between accounts without payment.
    SharesTransferred {
        parcel: ParcelId,
        from: AccountId,
        to: AccountId,
        shares: u64,
    },
    /// A pair reached one below the fraud threshold.
    SuspiciousActivity {
        buyer: AccountId,
        seller: AccountId,
        count: u64,
        parcel: ParcelId,
    },
    /// A pair was flagged, automatically or by an administrator.
    PairFlagged {
        buyer: AccountId,
        seller: AccountId,
        count: u64,
    },
    /// An administrator cleared a pair's flag.
    PairUnflagged { buyer: AccountId, seller: AccountId },
    /// Currency entered a wallet from outside the ledger.
    FundsDeposited { account: AccountId, amount: Decimal },
    /// Currency left a wallet to outside the ledger.
    FundsWithdrawn { account: AccountId, amount: Decimal },
}

impl LedgerEvent {
    /// Stable upper-case name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RolesGranted { .. } => "ROLES_GRANTED",
            Self::LandRegistered { .. } => "LAND_REGISTERED",
            Self::WholeListed { .. } => "WHOLE_LISTED",
            Self::WholeDelisted { .. } => "WHOLE_DELISTED",
            Self::WholePurchased { .. } => "WHOLE_PURCHASED",
            Self::Fractionalised { .. } => "FRACTIONALISED",
            Self::SharesPurchased { .. } => "SHARES_PURCHASED",
            Self::SharesTransferred { .. } => "SHARES_TRANSFERRED",
            Self::SuspiciousActivity { .. } => "SUSPICIOUS_ACTIVITY",
            Self::PairFlagged { .. } => "PAIR_FLAGGED",
            Self::PairUnflagged { .. } => "PAIR_UNFLAGGED",
            Self::FundsDeposited { .. } => "FUNDS_DEPOSITED",
            Self::FundsWithdrawn { .. } => "FUNDS_WITHDRAWN",
        }
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A journaled event with its position and commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the journal, starting at 0. Never reused.
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub event: LedgerEvent,
}
