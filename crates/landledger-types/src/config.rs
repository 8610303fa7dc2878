//! Ledger configuration.

use serde::{Deserialize, Serialize};

use crate::{constants, AccountId, LedgerError, Result};

/// Construction-time configuration of a ledger instance.
///
/// The administrator is fixed here and cannot change for the lifetime of
/// the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The single regulatory account.
    pub admin: AccountId,
    /// Transactions per ordered pair at which the pair is flagged.
    #[serde(default = "default_fraud_threshold")]
    pub fraud_threshold: u32,
    /// Upper bound on `total_shares` accepted by `fractionalise`.
    #[serde(default = "default_max_shares")]
    pub max_shares_per_parcel: u64,
    /// Denomination of payments, informational.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_fraud_threshold() -> u32 {
    constants::DEFAULT_FRAUD_THRESHOLD
}

fn default_max_shares() -> u64 {
    constants::DEFAULT_MAX_SHARES_PER_PARCEL
}

fn default_currency() -> String {
    constants::DEFAULT_CURRENCY.to_string()
}

impl LedgerConfig {
    /// Default configuration for the given administrator.
    #[must_use]
    pub fn new(admin: AccountId) -> Self {
        Self {
            admin,
            fraud_threshold: default_fraud_threshold(),
            max_shares_per_parcel: default_max_shares(),
            currency: default_currency(),
        }
    }

    #[must_use]
    pub fn with_fraud_threshold(mut self, threshold: u32) -> Self {
        self.fraud_threshold = threshold;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| LedgerError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the ledger cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.fraud_threshold < constants::MIN_FRAUD_THRESHOLD {
            return Err(LedgerError::Configuration(format!(
                "fraud_threshold must be at least {}, got {}",
                constants::MIN_FRAUD_THRESHOLD,
                self.fraud_threshold
            )));
        }
        if self.max_shares_per_parcel == 0 {
            return Err(LedgerError::Configuration(
                "max_shares_per_parcel must be positive".to_string(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(LedgerError::Configuration(
                "currency must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
