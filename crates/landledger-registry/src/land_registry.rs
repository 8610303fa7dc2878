//! Land registry: creates and uniquely identifies parcels.
//!
//! Ids are sequential from [`ParcelId::FIRST`]. Uniqueness of the
//! (address, reference) pair is enforced on its [`RegistrationFingerprint`].
//! Parcels are never removed.

use std::collections::{BTreeMap, HashMap};

use landledger_types::{
    AccountId, LandRegistration, LedgerError, Parcel, ParcelId, RegistrationFingerprint, Result,
};

/// Canonical store of parcel records.
pub struct LandRegistry {
    /// All parcels, in id order.
    parcels: BTreeMap<ParcelId, Parcel>,
    /// Fingerprint → parcel, for duplicate detection.
    fingerprints: HashMap<RegistrationFingerprint, ParcelId>,
    /// Id handed to the next registration.
    next_id: ParcelId,
}

impl LandRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parcels: BTreeMap::new(),
            fingerprints: HashMap::new(),
            next_id: ParcelId::FIRST,
        }
    }

    /// Validate a registration against the request itself and the registry,
    /// without mutating.
    ///
    /// # Errors
    /// - [`LedgerError::InvalidRegistration`] for malformed input
    /// - [`LedgerError::DuplicateRegistration`] if (address, reference) exists
    pub fn check_registration(&self, registration: &LandRegistration) -> Result<()> {
        registration.validate()?;
        if let Some(existing) = self.fingerprints.get(&registration.fingerprint()) {
            return Err(LedgerError::DuplicateRegistration {
                address: registration.address.clone(),
                reference: registration.reference.clone(),
                existing: *existing,
            });
        }
        Ok(())
    }

    /// Store a new whole parcel owned by `owner` and return its id.
    ///
    /// The caller is responsible for minting the owner's unit in the
    /// ownership ledger.
    pub fn register(
        &mut self,
        owner: AccountId,
        registration: LandRegistration,
    ) -> Result<ParcelId> {
        self.check_registration(&registration)?;

        let id = self.next_id;
        let parcel = Parcel::new(id, owner, registration);
        tracing::info!(
            parcel = %id,
            owner = %owner,
            fingerprint = %parcel.fingerprint.short(),
            address = %parcel.address,
            "Land registered"
        );
        self.fingerprints.insert(parcel.fingerprint, id);
        self.parcels.insert(id, parcel);
        self.next_id = id.next();
        Ok(id)
    }

    /// Look up a parcel.
    ///
    /// # Errors
    /// [`LedgerError::ParcelNotFound`] for unknown ids.
    pub fn get(&self, id: ParcelId) -> Result<&Parcel> {
        self.parcels.get(&id).ok_or(LedgerError::ParcelNotFound(id))
    }

    pub fn get_mut(&mut self, id: ParcelId) -> Result<&mut Parcel> {
        self.parcels
            .get_mut(&id)
            .ok_or(LedgerError::ParcelNotFound(id))
    }

    /// Parcels with something to buy: a whole listing or unsold shares.
    #[must_use]
    pub fn on_market(&self) -> Vec<&Parcel> {
        self.parcels
            .values()
            .filter(|p| p.for_sale || (p.fractionalised && p.available_shares > 0))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parcel> {
        self.parcels.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }
}

impl Default for LandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
