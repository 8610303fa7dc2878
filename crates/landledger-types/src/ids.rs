//! Identifiers used throughout LandLedger.
//!
//! Accounts use UUIDv7 for time-ordered sorting. Parcels use a sequential
//! `u64` allocated by the registry, starting at [`ParcelId::FIRST`].

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a caller: the account that signs an entry point and holds
/// balances, roles and wallet funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Trailing four bytes in hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0.as_bytes()[12..])
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ParcelId
// ---------------------------------------------------------------------------

/// Sequential parcel identifier. Never reused, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ParcelId(pub u64);

impl ParcelId {
    /// The id handed to the first registered parcel.
    pub const FIRST: Self = Self(1);

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parcel:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PairKey
// ---------------------------------------------------------------------------

/// An **ordered** (buyer, seller) pair. `(A, B)` and `(B, A)` are distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PairKey {
    pub buyer: AccountId,
    pub seller: AccountId,
}

impl PairKey {
    #[must_use]
    pub fn new(buyer: AccountId, seller: AccountId) -> Self {
        Self { buyer, seller }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<-{}", self.buyer.short(), self.seller.short())
    }
}

// ---------------------------------------------------------------------------
// RegistrationFingerprint
// ---------------------------------------------------------------------------

/// Content hash of a parcel's (address, reference) pair.
///
/// Two registrations collide only when address and reference are equal
/// byte for byte. Each field is length-prefixed so concatenations cannot
/// alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RegistrationFingerprint(pub [u8; 32]);

impl RegistrationFingerprint {
    #[must_use]
    pub fn compute(address: &str, reference: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"landledger:registration:v1:");
        hasher.update((address.len() as u64).to_le_bytes());
        hasher.update(address.as_bytes());
        hasher.update((reference.len() as u64).to_le_bytes());
        hasher.update(reference.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for RegistrationFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
