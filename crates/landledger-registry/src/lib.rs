//! # landledger-registry
//!
//! **Record plane** of the ledger: what exists and who holds it.
//!
//! 1. **LandRegistry**: sequential parcel ids, one record per unique
//!    (address, reference), never deleted
//! 2. **OwnershipLedger**: `(account, parcel) → units`, whole or
//!    share-denominated, with the supply conservation check
//!
//! Neither component knows about payments, roles or fraud. The settlement
//! crate composes them into atomic entry points.

pub mod land_registry;
pub mod ownership;

pub use land_registry::LandRegistry;
pub use ownership::OwnershipLedger;
