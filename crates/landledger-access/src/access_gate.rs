//! Access gate for protected reads and regulatory actions.
//!
//! The gate only reads the role table. It never grants anything.

use landledger_types::{AccountId, LedgerError, ParcelId, Result};

use crate::role_provisioner::RoleProvisioner;

/// Authorization checks over a borrowed role table.
pub struct AccessGate<'a> {
    roles: &'a RoleProvisioner,
}

impl<'a> AccessGate<'a> {
    #[must_use]
    pub fn new(roles: &'a RoleProvisioner) -> Self {
        Self { roles }
    }

    /// Parcel detail lookups: the admin or any provisioned account.
    pub fn authorize_details(&self, caller: AccountId) -> Result<()> {
        if self.roles.is_provisioned(&caller) {
            return Ok(());
        }
        tracing::debug!(caller = %caller, "Detail lookup denied: no role record");
        Err(LedgerError::Unauthorized {
            account: caller,
            action: "view land details",
        })
    }

    /// Administrator-only actions.
    pub fn require_admin(&self, caller: AccountId, action: &'static str) -> Result<()> {
        if self.roles.is_admin(&caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                account: caller,
                action,
            })
        }
    }

    /// Owner-or-regulator actions such as delisting.
    ///
    /// # Errors
    /// [`LedgerError::NotFullOwner`] when the caller is neither the full
    /// owner nor the administrator.
    pub fn authorize_owner_or_admin(
        &self,
        caller: AccountId,
        is_full_owner: bool,
        parcel: ParcelId,
    ) -> Result<()> {
        if is_full_owner || self.roles.is_admin(&caller) {
            Ok(())
        } else {
            Err(LedgerError::NotFullOwner {
                account: caller,
                parcel,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_for_admin_and_provisioned_only() {
        let admin = AccountId::new();
        let mut rp = RoleProvisioner::new(admin);
        let user = AccountId::new();
        let stranger = AccountId::new();
        rp.request_roles(user).unwrap();

        let gate = AccessGate::new(&rp);
        assert!(gate.authorize_details(admin).is_ok());
        assert!(gate.authorize_details(user).is_ok());
        let err = gate.authorize_details(stranger).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { account, .. } if account == stranger));
    }

    #[test]
    fn admin_only_actions() {
        let admin = AccountId::new();
        let mut rp = RoleProvisioner::new(admin);
        let user = AccountId::new();
        rp.request_roles(user).unwrap();

        let gate = AccessGate::new(&rp);
        assert!(gate.require_admin(admin, "flag pairs").is_ok());
        let err = gate.require_admin(user, "flag pairs").unwrap_err();
        assert!(format!("{err}").contains("flag pairs"));
    }

    #[test]
    fn owner_or_admin() {
        let admin = AccountId::new();
        let rp = RoleProvisioner::new(admin);
        let gate = AccessGate::new(&rp);
        let user = AccountId::new();

        assert!(gate.authorize_owner_or_admin(user, true, ParcelId(1)).is_ok());
        assert!(gate.authorize_owner_or_admin(admin, false, ParcelId(1)).is_ok());
        let err = gate
            .authorize_owner_or_admin(user, false, ParcelId(1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFullOwner { .. }));
    }
}
