//! Role records: the per-account capability bits.
//!
//! Buyer and seller capabilities are granted together, once, by
//! self-service provisioning. The admin bit is fixed at ledger construction.
//! There is no type or operation that revokes a capability.

use serde::{Deserialize, Serialize};

/// Capabilities held by one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoleRecord {
    pub can_buy: bool,
    pub can_sell: bool,
    pub is_admin: bool,
    /// Set when the buyer/seller pair was granted by auto-provisioning.
    pub auto_granted: bool,
}

impl RoleRecord {
    /// The record written on first interaction.
    #[must_use]
    pub fn auto_trader() -> Self {
        Self {
            can_buy: true,
            can_sell: true,
            is_admin: false,
            auto_granted: true,
        }
    }

    /// The immutable administrator record.
    #[must_use]
    pub fn administrator() -> Self {
        Self {
            can_buy: false,
            can_sell: false,
            is_admin: true,
            auto_granted: false,
        }
    }

    /// `true` if any capability bit is set.
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        self.can_buy || self.can_sell || self.is_admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_has_no_capability() {
        let record = RoleRecord::default();
        assert!(!record.is_provisioned());
        assert!(!record.auto_granted);
    }

    #[test]
    fn auto_trader_can_buy_and_sell() {
        let record = RoleRecord::auto_trader();
        assert!(record.can_buy && record.can_sell);
        assert!(!record.is_admin);
        assert!(record.auto_granted);
    }

    #[test]
    fn administrator_cannot_trade() {
        let record = RoleRecord::administrator();
        assert!(record.is_admin);
        assert!(!record.can_buy && !record.can_sell);
        assert!(record.is_provisioned());
    }
}
