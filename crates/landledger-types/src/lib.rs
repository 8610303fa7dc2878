//! # landledger-types
//!
//! Shared types, errors, and configuration for the **LandLedger** parcel
//! ownership ledger.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`ParcelId`], [`PairKey`], [`RegistrationFingerprint`]
//! - **Parcel model**: [`LandRegistration`], [`Parcel`], [`MarketplaceView`], [`LandDetails`]
//! - **Roles**: [`RoleRecord`]
//! - **Fraud model**: [`PairRecord`], [`PairState`]
//! - **Events**: [`LedgerEvent`], [`EventRecord`]
//! - **Configuration**: [`LedgerConfig`]
//! - **Errors**: [`LedgerError`] with `LL_ERR_` prefix codes, [`ErrorKind`]
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod fraud;
pub mod ids;
pub mod parcel;
pub mod role;

pub use config::*;
pub use error::*;
pub use event::*;
pub use fraud::*;
pub use ids::*;
pub use parcel::*;
pub use role::*;

// Constants are accessed via `landledger_types::constants::FOO`.
