//! Error types for the LandLedger ownership ledger.
//!
//! All errors use the `LL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by failure class:
//! - 1xx: Validation errors (bad input, duplicates)
//! - 2xx: Authorization errors (missing role / admin capability)
//! - 3xx: State errors (parcel or balance in the wrong state)
//! - 4xx: Payment errors (attached payment does not match)
//! - 5xx: Fraud blocks (flagged pair)
//! - 6xx: Not found
//! - 8xx: Invariant violations
//! - 9xx: Configuration errors
//!
//! Every error aborts the whole entry point. Nothing is partially applied.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, ParcelId};

/// Central error enum for all LandLedger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// A parcel with the same (address, reference) is already registered.
    #[error("LL_ERR_100: Property already registered as {existing}: {address} / {reference}")]
    DuplicateRegistration {
        address: String,
        reference: String,
        existing: ParcelId,
    },

    /// The registration request failed validation.
    #[error("LL_ERR_101: Invalid registration: {reason}")]
    InvalidRegistration { reason: String },

    /// Share amounts must be strictly positive and within configured bounds.
    #[error("LL_ERR_102: Invalid share amount: {requested}")]
    InvalidShareAmount { requested: u64 },

    /// More shares requested than are currently offered.
    #[error("LL_ERR_103: Only {available} shares available, requested {requested}")]
    SharesUnavailable { requested: u64, available: u64 },

    /// Listing or share price is not acceptable.
    #[error("LL_ERR_104: Invalid price: {reason}")]
    InvalidPrice { reason: String },

    /// Buyer and seller (or sender and recipient) are the same account.
    #[error("LL_ERR_105: Self-trade rejected for {0}")]
    SelfTrade(AccountId),

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The caller lacks the capability required for this action.
    #[error("LL_ERR_200: {account} is not authorized to {action}")]
    Unauthorized {
        account: AccountId,
        action: &'static str,
    },

    /// The administrator never receives trading roles.
    #[error("LL_ERR_201: Admin doesn't need auto roles: {0}")]
    AdminCannotTrade(AccountId),

    /// `request_roles` called by an account that is already provisioned.
    #[error("LL_ERR_202: Roles already granted to {0}")]
    RolesAlreadyGranted(AccountId),

    // =================================================================
    // State Errors (3xx)
    // =================================================================
    /// The parcel has already been split into shares.
    #[error("LL_ERR_300: {0} is already fractionalised")]
    AlreadyFractionalised(ParcelId),

    /// The operation needs a fractionalised parcel.
    #[error("LL_ERR_301: {0} is not fractionalised")]
    NotFractionalised(ParcelId),

    /// The caller does not hold the parcel's entire balance.
    #[error("LL_ERR_302: {account} is not the full owner of {parcel}")]
    NotFullOwner {
        account: AccountId,
        parcel: ParcelId,
    },

    /// The parcel is not listed for whole sale.
    #[error("LL_ERR_303: {0} is not for sale")]
    NotForSale(ParcelId),

    /// Not enough shares on the debited account.
    #[error("LL_ERR_304: Insufficient shares: need {needed}, have {available}")]
    InsufficientShares { needed: u64, available: u64 },

    // =================================================================
    // Payment Errors (4xx)
    // =================================================================
    /// Attached payment differs from the required amount.
    #[error("LL_ERR_400: Payment mismatch: expected {expected}, attached {attached}")]
    PaymentMismatch { expected: Decimal, attached: Decimal },

    /// The payer's wallet cannot cover the attached payment.
    #[error("LL_ERR_401: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    /// A payment amount or a wallet credit would overflow.
    #[error("LL_ERR_402: Payment amount overflow")]
    PaymentOverflow,

    // =================================================================
    // Fraud Errors (5xx)
    // =================================================================
    /// The ordered (buyer, seller) pair is flagged.
    #[error("LL_ERR_500: Transaction blocked: flagged pair {buyer} <- {seller}")]
    FraudBlocked { buyer: AccountId, seller: AccountId },

    // =================================================================
    // Not Found (6xx)
    // =================================================================
    /// No parcel with this id exists.
    #[error("LL_ERR_600: Land does not exist: {0}")]
    ParcelNotFound(ParcelId),

    // =================================================================
    // Invariant Violations (8xx)
    // =================================================================
    /// Supply conservation broke. Critical.
    #[error("LL_ERR_800: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Configuration error (bad JSON, invalid values).
    #[error("LL_ERR_900: Configuration error: {0}")]
    Configuration(String),
}

/// Coarse failure class of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    Payment,
    FraudBlock,
    NotFound,
    Internal,
}

impl LedgerError {
    /// Which failure class this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateRegistration { .. }
            | Self::InvalidRegistration { .. }
            | Self::InvalidShareAmount { .. }
            | Self::SharesUnavailable { .. }
            | Self::InvalidPrice { .. }
            | Self::SelfTrade(_) => ErrorKind::Validation,
            Self::Unauthorized { .. }
            | Self::AdminCannotTrade(_)
            | Self::RolesAlreadyGranted(_) => ErrorKind::Authorization,
            Self::AlreadyFractionalised(_)
            | Self::NotFractionalised(_)
            | Self::NotFullOwner { .. }
            | Self::NotForSale(_)
            | Self::InsufficientShares { .. } => ErrorKind::State,
            Self::PaymentMismatch { .. }
            | Self::InsufficientFunds { .. }
            | Self::PaymentOverflow => ErrorKind::Payment,
            Self::FraudBlocked { .. } => ErrorKind::FraudBlock,
            Self::ParcelNotFound(_) => ErrorKind::NotFound,
            Self::SupplyInvariantViolation { .. } | Self::Configuration(_) => ErrorKind::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;
