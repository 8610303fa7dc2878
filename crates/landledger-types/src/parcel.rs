//! Parcel model: the canonical record of a registered piece of land and the
//! views handed to readers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, LedgerError, ParcelId, RegistrationFingerprint, Result};

/// Input to `register_land`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandRegistration {
    /// Physical address string.
    pub address: String,
    /// Land area (square units).
    pub area: u64,
    /// Declared tax / registration reference.
    pub reference: String,
    /// Display name.
    pub name: String,
}

impl LandRegistration {
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        area: u64,
        reference: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            area,
            reference: reference.into(),
            name: name.into(),
        }
    }

    /// Structural checks that do not need registry state.
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(LedgerError::InvalidRegistration {
                reason: "address must not be empty".to_string(),
            });
        }
        if self.reference.trim().is_empty() {
            return Err(LedgerError::InvalidRegistration {
                reason: "reference must not be empty".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(LedgerError::InvalidRegistration {
                reason: "name must not be empty".to_string(),
            });
        }
        if self.area == 0 {
            return Err(LedgerError::InvalidRegistration {
                reason: "area must be positive".to_string(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn fingerprint(&self) -> RegistrationFingerprint {
        RegistrationFingerprint::compute(&self.address, &self.reference)
    }
}

/// Sample registrations for tests. `n` makes address and reference unique.
#[cfg(any(test, feature = "test-helpers"))]
impl LandRegistration {
    pub fn sample(n: u64) -> Self {
        Self::new(
            format!("{n} Fraud St"),
            500,
            format!("TAX-{n:05}"),
            format!("House {n}"),
        )
    }
}

/// The canonical parcel record owned by the registry.
///
/// Created once per unique (address, reference). Mutated by listing,
/// delisting, whole sale and fractionalisation. Never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: ParcelId,
    pub address: String,
    pub area: u64,
    pub reference: String,
    pub name: String,
    /// Registered owner. For a whole parcel this is the holder of the single
    /// unit; for a fractionalised parcel it is the account selling shares.
    pub owner: AccountId,
    /// Whole-sale price, meaningful while `for_sale` is set.
    pub whole_price: Decimal,
    /// Price of one share, meaningful once `fractionalised` is set.
    pub price_per_share: Decimal,
    /// `1` until fractionalised.
    pub total_shares: u64,
    /// Shares the owner still offers for sale.
    pub available_shares: u64,
    pub for_sale: bool,
    pub fractionalised: bool,
    pub fingerprint: RegistrationFingerprint,
    pub registered_at: DateTime<Utc>,
}

impl Parcel {
    /// Build a freshly registered whole parcel owned by `owner`.
    #[must_use]
    pub fn new(id: ParcelId, owner: AccountId, registration: LandRegistration) -> Self {
        let fingerprint = registration.fingerprint();
        Self {
            id,
            address: registration.address,
            area: registration.area,
            reference: registration.reference,
            name: registration.name,
            owner,
            whole_price: Decimal::ZERO,
            price_per_share: Decimal::ZERO,
            total_shares: constants::WHOLE_UNIT_SUPPLY,
            available_shares: constants::WHOLE_UNIT_SUPPLY,
            for_sale: false,
            fractionalised: false,
            fingerprint,
            registered_at: Utc::now(),
        }
    }

    /// Public listing view.
    #[must_use]
    pub fn marketplace_view(&self) -> MarketplaceView {
        MarketplaceView {
            id: self.id,
            address: self.address.clone(),
            area: self.area,
            name: self.name.clone(),
            for_sale: self.for_sale,
            whole_price: self.whole_price,
            fractionalised: self.fractionalised,
            price_per_share: self.price_per_share,
            total_shares: self.total_shares,
            available_shares: self.available_shares,
        }
    }
}

/// Unauthenticated listing fields, for browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceView {
    pub id: ParcelId,
    pub address: String,
    pub area: u64,
    pub name: String,
    pub for_sale: bool,
    pub whole_price: Decimal,
    pub fractionalised: bool,
    pub price_per_share: Decimal,
    pub total_shares: u64,
    pub available_shares: u64,
}

/// Gated detail view: the full record plus ownership context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandDetails {
    pub parcel: Parcel,
    pub current_owner: AccountId,
    /// The requesting account's own balance in this parcel.
    pub caller_balance: u64,
    /// Number of accounts holding a non-zero balance.
    pub holder_count: usize,
}
