//! The ledger facade.
//!
//! [`LandLedger`] owns every component and is the only type callers touch.
//! Each entry point takes `&mut self`, so calls are applied one at a time in a
//! total order and invariants hold between any two calls.
//!
//! Every state-changing entry point follows the same shape:
//! 1. Role eligibility (non-mutating): the administrator is turned away
//! 2. Full validation against current state (non-mutating)
//! 3. Commit: role grant, balances, payment, fraud bookkeeping
//! 4. Supply verification
//! 5. Journal the events
//!
//! Nothing is mutated before step 3, so a failed call leaves no trace.

use chrono::Utc;
use landledger_access::{AccessGate, FraudMonitor, RoleProvisioner};
use landledger_registry::{LandRegistry, OwnershipLedger};
use landledger_types::{
    constants, AccountId, EventRecord, LandDetails, LandRegistration, LedgerConfig, LedgerError,
    LedgerEvent, MarketplaceView, PairKey, PairState, ParcelId, Result, RoleRecord,
};
use rust_decimal::Decimal;

use crate::wallet::Wallets;

/// Land ownership ledger with marketplace settlement and fraud monitoring.
pub struct LandLedger {
    pub(crate) config: LedgerConfig,
    pub(crate) roles: RoleProvisioner,
    pub(crate) registry: LandRegistry,
    pub(crate) ownership: OwnershipLedger,
    pub(crate) fraud: FraudMonitor,
    pub(crate) wallets: Wallets,
    /// Append-only event journal.
    journal: Vec<EventRecord>,
    /// Sequence number of the next journaled event.
    next_sequence: u64,
}

impl LandLedger {
    /// Build a ledger from a validated configuration.
    ///
    /// # Errors
    /// [`LedgerError::Configuration`] if the configuration is invalid.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            ledger = constants::LEDGER_NAME,
            version = constants::VERSION,
            admin = %config.admin,
            fraud_threshold = config.fraud_threshold,
            currency = %config.currency,
            "Ledger initialised"
        );
        Ok(Self {
            roles: RoleProvisioner::new(config.admin),
            registry: LandRegistry::new(),
            ownership: OwnershipLedger::new(),
            fraud: FraudMonitor::new(config.fraud_threshold),
            wallets: Wallets::new(),
            journal: Vec::new(),
            next_sequence: 0,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.roles.admin()
    }

    // ── Roles ───────────────────────────────────────────────────────

    /// Explicitly provision buyer and seller capabilities for `caller`.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::RolesAlreadyGranted`] if already provisioned
    pub fn request_roles(&mut self, caller: AccountId) -> Result<()> {
        let event = self.roles.request_roles(caller)?;
        self.commit(vec![event]);
        Ok(())
    }

    #[must_use]
    pub fn roles(&self, account: AccountId) -> RoleRecord {
        self.roles.roles(&account)
    }

    #[must_use]
    pub fn has_auto_roles(&self, account: AccountId) -> bool {
        self.roles.has_auto_roles(&account)
    }

    #[must_use]
    pub fn is_admin(&self, account: AccountId) -> bool {
        self.roles.is_admin(&account)
    }

    // ── Registry ────────────────────────────────────────────────────

    /// Register a new whole parcel owned by `caller`.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::InvalidRegistration`] for malformed input
    /// - [`LedgerError::DuplicateRegistration`] if (address, reference) is taken
    pub fn register_land(
        &mut self,
        caller: AccountId,
        address: impl Into<String>,
        area: u64,
        reference: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<ParcelId> {
        let registration = LandRegistration::new(address, area, reference, name);

        self.roles.check_eligible(&caller)?;
        self.registry.check_registration(&registration)?;

        let mut events: Vec<LedgerEvent> = self.roles.ensure_roles(caller)?.into_iter().collect();
        let address = registration.address.clone();
        let id = self.registry.register(caller, registration)?;
        self.ownership.mint(caller, id, constants::WHOLE_UNIT_SUPPLY)?;
        self.ownership.verify_supply(id, constants::WHOLE_UNIT_SUPPLY)?;

        events.push(LedgerEvent::LandRegistered {
            parcel: id,
            owner: caller,
            address,
        });
        self.commit(events);
        Ok(id)
    }

    /// Ids of parcels in which `account` holds a non-zero balance, ascending.
    #[must_use]
    pub fn lands_by_owner(&self, account: AccountId) -> Vec<ParcelId> {
        self.ownership.parcels_of(account)
    }

    /// Listing views of every parcel with a whole listing or unsold shares.
    #[must_use]
    pub fn parcels_for_sale(&self) -> Vec<MarketplaceView> {
        self.registry
            .on_market()
            .into_iter()
            .map(|p| p.marketplace_view())
            .collect()
    }

    #[must_use]
    pub fn parcel_count(&self) -> usize {
        self.registry.len()
    }

    // ── Ownership reads ─────────────────────────────────────────────

    #[must_use]
    pub fn balance_of(&self, account: AccountId, parcel: ParcelId) -> u64 {
        self.ownership.balance(account, parcel)
    }

    /// `balance * 100 / total_shares`, in `[0, 100]`.
    ///
    /// # Errors
    /// [`LedgerError::ParcelNotFound`] for unknown ids.
    pub fn ownership_percentage(&self, account: AccountId, parcel: ParcelId) -> Result<u64> {
        let total = self.registry.get(parcel)?.total_shares;
        Ok(self.ownership.ownership_percentage(account, parcel, total))
    }

    // ── Wallets ─────────────────────────────────────────────────────

    /// Fund `caller`'s wallet from outside the ledger.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::InvalidPrice`] for non-positive amounts
    /// - [`LedgerError::PaymentOverflow`] if the wallet or the total supply would overflow
    pub fn deposit(&mut self, caller: AccountId, amount: Decimal) -> Result<()> {
        self.reject_admin(caller)?;
        self.wallets.deposit(caller, amount)?;
        self.wallets.verify_supply()?;
        tracing::info!(account = %caller, amount = %amount, "Funds deposited");
        self.commit(vec![LedgerEvent::FundsDeposited {
            account: caller,
            amount,
        }]);
        Ok(())
    }

    /// Pay out of `caller`'s wallet to outside the ledger.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::InvalidPrice`] for non-positive amounts
    /// - [`LedgerError::InsufficientFunds`] if the wallet is short
    pub fn withdraw(&mut self, caller: AccountId, amount: Decimal) -> Result<()> {
        self.reject_admin(caller)?;
        self.wallets.withdraw(caller, amount)?;
        self.wallets.verify_supply()?;
        tracing::info!(account = %caller, amount = %amount, "Funds withdrawn");
        self.commit(vec![LedgerEvent::FundsWithdrawn {
            account: caller,
            amount,
        }]);
        Ok(())
    }

    #[must_use]
    pub fn wallet_balance(&self, account: AccountId) -> Decimal {
        self.wallets.balance(account)
    }

    // ── Fraud monitor ───────────────────────────────────────────────

    /// Set or clear the flag on an ordered pair. Administrator only.
    ///
    /// Clearing never resets the transaction count. Clearing a pair that has
    /// never traded changes nothing and journals nothing.
    ///
    /// # Errors
    /// [`LedgerError::Unauthorized`] for anyone but the administrator.
    pub fn set_flagged_pair(
        &mut self,
        caller: AccountId,
        buyer: AccountId,
        seller: AccountId,
        flag: bool,
    ) -> Result<()> {
        AccessGate::new(&self.roles).require_admin(caller, "set flagged pair")?;
        if let Some(event) = self.fraud.set_flag(buyer, seller, flag) {
            self.commit(vec![event]);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_pair_flagged(&self, buyer: AccountId, seller: AccountId) -> bool {
        self.fraud.is_flagged(buyer, seller)
    }

    #[must_use]
    pub fn pair_state(&self, buyer: AccountId, seller: AccountId) -> PairState {
        self.fraud.state(buyer, seller)
    }

    #[must_use]
    pub fn fraud_threshold(&self) -> u32 {
        self.fraud.threshold()
    }

    // ── Gated reads ─────────────────────────────────────────────────

    /// Full parcel record plus ownership context.
    ///
    /// # Errors
    /// - [`LedgerError::Unauthorized`] unless `caller` is the admin or provisioned
    /// - [`LedgerError::ParcelNotFound`] for unknown ids
    pub fn get_land_details(&self, caller: AccountId, id: ParcelId) -> Result<LandDetails> {
        AccessGate::new(&self.roles).authorize_details(caller)?;
        let parcel = self.registry.get(id)?.clone();
        Ok(LandDetails {
            current_owner: parcel.owner,
            caller_balance: self.ownership.balance(caller, id),
            holder_count: self.ownership.holders(id).len(),
            parcel,
        })
    }

    /// Public listing view. No authorization.
    ///
    /// # Errors
    /// [`LedgerError::ParcelNotFound`] for unknown ids.
    pub fn get_marketplace_details(&self, id: ParcelId) -> Result<MarketplaceView> {
        Ok(self.registry.get(id)?.marketplace_view())
    }

    /// Settled transactions for the ordered pair. Administrator only.
    pub fn get_transaction_count(
        &self,
        caller: AccountId,
        buyer: AccountId,
        seller: AccountId,
    ) -> Result<u64> {
        AccessGate::new(&self.roles).require_admin(caller, "read transaction count")?;
        Ok(self.fraud.count(buyer, seller))
    }

    /// Parcel ids traded between the ordered pair, oldest first.
    /// Administrator only.
    pub fn get_transaction_history(
        &self,
        caller: AccountId,
        buyer: AccountId,
        seller: AccountId,
    ) -> Result<Vec<ParcelId>> {
        AccessGate::new(&self.roles).require_admin(caller, "read transaction history")?;
        Ok(self.fraud.history(buyer, seller))
    }

    /// Every currently flagged pair, in key order. Administrator only.
    pub fn get_flagged_pairs(&self, caller: AccountId) -> Result<Vec<PairKey>> {
        AccessGate::new(&self.roles).require_admin(caller, "read flagged pairs")?;
        Ok(self.fraud.flagged_pairs())
    }

    // ── Invariants ──────────────────────────────────────────────────

    /// Check supply conservation for every parcel and for the wallets.
    ///
    /// # Errors
    /// [`LedgerError::SupplyInvariantViolation`] on the first mismatch.
    pub fn verify_invariants(&self) -> Result<()> {
        for parcel in self.registry.iter() {
            self.ownership.verify_supply(parcel.id, parcel.total_shares)?;
            if parcel.available_shares > self.ownership.balance(parcel.owner, parcel.id) {
                return Err(LedgerError::SupplyInvariantViolation {
                    reason: format!(
                        "{}: {} shares offered but owner holds {}",
                        parcel.id,
                        parcel.available_shares,
                        self.ownership.balance(parcel.owner, parcel.id)
                    ),
                });
            }
        }
        self.wallets.verify_supply()
    }

    // ── Journal ─────────────────────────────────────────────────────

    /// Every event committed so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.journal
    }

    /// Take the journal, leaving it empty. Sequence numbers keep counting.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.journal)
    }

    /// Append the events of one committed call.
    pub(crate) fn commit(&mut self, events: Vec<LedgerEvent>) {
        let recorded_at = Utc::now();
        for event in events {
            tracing::debug!(sequence = self.next_sequence, event = %event, "Event journaled");
            self.journal.push(EventRecord {
                sequence: self.next_sequence,
                recorded_at,
                event,
            });
            self.next_sequence += 1;
        }
    }

    fn reject_admin(&self, caller: AccountId) -> Result<()> {
        if self.roles.is_admin(&caller) {
            return Err(LedgerError::AdminCannotTrade(caller));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> (LandLedger, AccountId) {
        let admin = AccountId::new();
        (LandLedger::new(LedgerConfig::new(admin)).unwrap(), admin)
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = LedgerConfig::new(AccountId::new()).with_fraud_threshold(1);
        let err = LandLedger::new(cfg).err().unwrap();
        assert!(matches!(err, LedgerError::Configuration(_)));
    }

    #[test]
    fn register_provisions_and_mints() {
        let (mut l, _) = ledger();
        let alice = AccountId::new();
        let id = l
            .register_land(alice, "123 Elm St", 500, "12345", "Elm House")
            .unwrap();
        assert_eq!(id, ParcelId(1));
        assert_eq!(l.balance_of(alice, id), 1);
        assert!(l.has_auto_roles(alice));
        assert_eq!(l.lands_by_owner(alice), vec![id]);

        let names: Vec<&str> = l.events().iter().map(|r| r.event.name()).collect();
        assert_eq!(names, vec!["ROLES_GRANTED", "LAND_REGISTERED"]);
    }

    #[test]
    fn admin_cannot_register() {
        let (mut l, admin) = ledger();
        let err = l
            .register_land(admin, "1 Gov St", 10, "G-1", "Office")
            .unwrap_err();
        assert!(matches!(err, LedgerError::AdminCannotTrade(_)));
        assert_eq!(l.parcel_count(), 0);
        assert!(l.events().is_empty());
    }

    #[test]
    fn failed_registration_leaves_no_grant() {
        let (mut l, _) = ledger();
        let alice = AccountId::new();
        let bob = AccountId::new();
        l.register_land(alice, "1 Oak St", 10, "R-1", "Oak").unwrap();

        let err = l.register_land(bob, "1 Oak St", 10, "R-1", "Oak").unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateRegistration { .. }));
        assert!(!l.has_auto_roles(bob));
    }

    #[test]
    fn request_roles_once() {
        let (mut l, admin) = ledger();
        let user = AccountId::new();
        l.request_roles(user).unwrap();
        assert!(matches!(
            l.request_roles(user).unwrap_err(),
            LedgerError::RolesAlreadyGranted(_)
        ));
        assert!(matches!(
            l.request_roles(admin).unwrap_err(),
            LedgerError::AdminCannotTrade(_)
        ));
    }

    #[test]
    fn details_gated_marketplace_public() {
        let (mut l, admin) = ledger();
        let alice = AccountId::new();
        let stranger = AccountId::new();
        let id = l.register_land(alice, "5 Pine St", 80, "P-5", "Pine").unwrap();

        let details = l.get_land_details(alice, id).unwrap();
        assert_eq!(details.current_owner, alice);
        assert_eq!(details.caller_balance, 1);
        assert_eq!(details.holder_count, 1);
        assert!(l.get_land_details(admin, id).is_ok());
        assert!(matches!(
            l.get_land_details(stranger, id).unwrap_err(),
            LedgerError::Unauthorized { .. }
        ));
        assert!(matches!(
            l.get_land_details(admin, ParcelId(99)).unwrap_err(),
            LedgerError::ParcelNotFound(_)
        ));

        let view = l.get_marketplace_details(id).unwrap();
        assert_eq!(view.address, "5 Pine St");
        assert!(!view.for_sale);
    }

    #[test]
    fn journal_sequence_survives_drain() {
        let (mut l, _) = ledger();
        let alice = AccountId::new();
        l.deposit(alice, Decimal::new(5, 0)).unwrap();
        let drained = l.drain_events();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].sequence, 0);
        assert!(l.events().is_empty());

        l.withdraw(alice, Decimal::new(2, 0)).unwrap();
        assert_eq!(l.events()[0].sequence, 1);
        assert_eq!(l.wallet_balance(alice), Decimal::new(3, 0));
    }

    #[test]
    fn unflag_of_unseen_pair_journals_nothing() {
        let (mut l, admin) = ledger();
        let (buyer, seller) = (AccountId::new(), AccountId::new());
        l.set_flagged_pair(admin, buyer, seller, false).unwrap();
        assert!(l.events().is_empty());
        assert_eq!(l.pair_state(buyer, seller), PairState::Unseen);
        assert!(l.get_flagged_pairs(admin).unwrap().is_empty());
    }

    #[test]
    fn flagged_pairs_admin_only() {
        let (mut l, admin) = ledger();
        let (buyer, seller) = (AccountId::new(), AccountId::new());
        l.set_flagged_pair(admin, buyer, seller, true).unwrap();
        assert_eq!(
            l.get_flagged_pairs(admin).unwrap(),
            vec![PairKey::new(buyer, seller)]
        );
        assert!(matches!(
            l.get_flagged_pairs(buyer).unwrap_err(),
            LedgerError::Unauthorized { .. }
        ));

        l.set_flagged_pair(admin, buyer, seller, false).unwrap();
        assert!(l.get_flagged_pairs(admin).unwrap().is_empty());
        let names: Vec<&str> = l.events().iter().map(|r| r.event.name()).collect();
        assert_eq!(names, vec!["PAIR_FLAGGED", "PAIR_UNFLAGGED"]);
    }

    #[test]
    fn admin_has_no_wallet() {
        let (mut l, admin) = ledger();
        assert!(matches!(
            l.deposit(admin, Decimal::ONE).unwrap_err(),
            LedgerError::AdminCannotTrade(_)
        ));
    }
}
