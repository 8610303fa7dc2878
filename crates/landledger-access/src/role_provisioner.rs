//! Role provisioner: one-shot, self-service capability grants.
//!
//! Every state-changing entry point calls [`RoleProvisioner::check_eligible`]
//! before validating anything else and [`RoleProvisioner::ensure_roles`] once
//! the operation is committed. Splitting the two keeps failed operations from
//! leaving a grant behind.
//!
//! There is no revoke and no way to grant roles to a different account.

use std::collections::HashMap;

use landledger_types::{AccountId, LedgerError, LedgerEvent, Result, RoleRecord};

/// Per-account role table with an immutable administrator.
pub struct RoleProvisioner {
    /// Fixed at construction.
    admin: AccountId,
    /// Role records, including the administrator's.
    records: HashMap<AccountId, RoleRecord>,
}

impl RoleProvisioner {
    /// Create a provisioner whose only record is the administrator's.
    #[must_use]
    pub fn new(admin: AccountId) -> Self {
        let mut records = HashMap::new();
        records.insert(admin, RoleRecord::administrator());
        Self { admin, records }
    }

    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.admin
    }

    #[must_use]
    pub fn is_admin(&self, account: &AccountId) -> bool {
        *account == self.admin
    }

    /// The account's capabilities. Unknown accounts get an empty record.
    #[must_use]
    pub fn roles(&self, account: &AccountId) -> RoleRecord {
        self.records.get(account).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn has_auto_roles(&self, account: &AccountId) -> bool {
        self.records.get(account).is_some_and(|r| r.auto_granted)
    }

    /// `true` for the admin and for every auto-provisioned account.
    #[must_use]
    pub fn is_provisioned(&self, account: &AccountId) -> bool {
        self.records.get(account).is_some_and(RoleRecord::is_provisioned)
    }

    /// Check whether `account` may take part in trading, without mutating.
    ///
    /// Returns `Ok(true)` if [`ensure_roles`](Self::ensure_roles) would
    /// create a record, `Ok(false)` if the account is already provisioned.
    ///
    /// # Errors
    /// [`LedgerError::AdminCannotTrade`] for the administrator.
    pub fn check_eligible(&self, account: &AccountId) -> Result<bool> {
        if self.is_admin(account) {
            return Err(LedgerError::AdminCannotTrade(*account));
        }
        Ok(!self.records.contains_key(account))
    }

    /// Idempotent grant. Returns the `RolesGranted` event on first call.
    pub fn ensure_roles(&mut self, account: AccountId) -> Result<Option<LedgerEvent>> {
        if !self.check_eligible(&account)? {
            return Ok(None);
        }
        Ok(Some(self.grant(account)))
    }

    /// Explicit, one-time request.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::RolesAlreadyGranted`] on a second call
    pub fn request_roles(&mut self, account: AccountId) -> Result<LedgerEvent> {
        if !self.check_eligible(&account)? {
            return Err(LedgerError::RolesAlreadyGranted(account));
        }
        Ok(self.grant(account))
    }

    fn grant(&mut self, account: AccountId) -> LedgerEvent {
        self.records.insert(account, RoleRecord::auto_trader());
        tracing::debug!(account = %account, "Auto roles granted");
        LedgerEvent::RolesGranted { account }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_touch_grants_once() {
        let mut rp = RoleProvisioner::new(AccountId::new());
        let user = AccountId::new();

        assert!(!rp.has_auto_roles(&user));
        let event = rp.ensure_roles(user).unwrap();
        assert_eq!(event, Some(LedgerEvent::RolesGranted { account: user }));
        assert!(rp.has_auto_roles(&user));

        // Second call is a silent no-op
        assert_eq!(rp.ensure_roles(user).unwrap(), None);
        assert!(rp.roles(&user).auto_granted);
    }

    #[test]
    fn granted_record_can_buy_and_sell() {
        let mut rp = RoleProvisioner::new(AccountId::new());
        let user = AccountId::new();
        rp.request_roles(user).unwrap();
        let roles = rp.roles(&user);
        assert!(roles.can_buy);
        assert!(roles.can_sell);
        assert!(!roles.is_admin);
    }

    #[test]
    fn request_twice_fails() {
        let mut rp = RoleProvisioner::new(AccountId::new());
        let user = AccountId::new();
        rp.request_roles(user).unwrap();
        let err = rp.request_roles(user).unwrap_err();
        assert!(matches!(err, LedgerError::RolesAlreadyGranted(a) if a == user));
    }

    #[test]
    fn request_after_auto_grant_fails() {
        let mut rp = RoleProvisioner::new(AccountId::new());
        let user = AccountId::new();
        rp.ensure_roles(user).unwrap();
        assert!(rp.request_roles(user).is_err());
    }

    #[test]
    fn admin_never_gets_trading_roles() {
        let admin = AccountId::new();
        let mut rp = RoleProvisioner::new(admin);

        let err = rp.ensure_roles(admin).unwrap_err();
        assert!(matches!(err, LedgerError::AdminCannotTrade(_)));
        let err = rp.request_roles(admin).unwrap_err();
        assert!(matches!(err, LedgerError::AdminCannotTrade(_)));

        let roles = rp.roles(&admin);
        assert!(roles.is_admin);
        assert!(!roles.can_buy && !roles.can_sell && !roles.auto_granted);
    }

    #[test]
    fn check_eligible_does_not_mutate() {
        let mut rp = RoleProvisioner::new(AccountId::new());
        let user = AccountId::new();
        assert!(rp.check_eligible(&user).unwrap());
        assert!(rp.check_eligible(&user).unwrap());
        assert!(!rp.is_provisioned(&user));

        rp.ensure_roles(user).unwrap();
        assert!(!rp.check_eligible(&user).unwrap());
    }

    #[test]
    fn unknown_account_has_empty_record() {
        let rp = RoleProvisioner::new(AccountId::new());
        let stranger = AccountId::new();
        assert_eq!(rp.roles(&stranger), RoleRecord::default());
        assert!(!rp.is_provisioned(&stranger));
    }
}
