//! # landledger-settlement
//!
//! **Finality plane** of the land ledger: the [`LandLedger`] facade and the
//! atomic exchange of payment for ownership.
//!
//! ## Settlement
//!
//! Every marketplace operation:
//! 1. Checks the caller's role eligibility (the administrator never trades)
//! 2. Validates parcel state, balances and the fraud flag on the pair
//! 3. Checks the attached payment against the price exactly
//! 4. Moves ownership units and currency together
//! 5. Verifies supply conservation (units per parcel, currency overall)
//! 6. Records the pair with the fraud monitor and journals the events
//!
//! A failure at any step before 4 leaves the ledger untouched.

pub mod ledger;
pub mod settlement;
pub mod supply_conservation;
pub mod wallet;

pub use ledger::LandLedger;
pub use supply_conservation::SupplyConservation;
pub use wallet::Wallets;
