//! System-wide constants for the LandLedger ownership ledger.

/// Number of transactions between one ordered (buyer, seller) pair at which
/// the pair is flagged. One below this emits a suspicious-activity warning.
pub const DEFAULT_FRAUD_THRESHOLD: u32 = 10;

/// Smallest threshold that still leaves room for a warning before the flag.
pub const MIN_FRAUD_THRESHOLD: u32 = 2;

/// Supply of a parcel that has not been fractionalised.
pub const WHOLE_UNIT_SUPPLY: u64 = 1;

/// Upper bound on `total_shares` for a single fractionalisation.
pub const DEFAULT_MAX_SHARES_PER_PARCEL: u64 = 1_000_000;

/// Denomination of attached payments.
pub const DEFAULT_CURRENCY: &str = "ETH";

/// Scale used by ownership percentages (`balance * 100 / total_shares`).
pub const PERCENT_SCALE: u64 = 100;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ledger name.
pub const LEDGER_NAME: &str = "LandLedger";
