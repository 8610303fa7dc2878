//! Marketplace settlement: whole sales, fractionalisation, share sales and
//! share transfers.
//!
//! Each operation validates everything against current state first, then
//! mutates balances and payments together. Supply conservation is checked on
//! the touched parcel and on the wallets before the events are journaled.

use landledger_access::AccessGate;
use landledger_types::{constants, AccountId, LedgerError, LedgerEvent, ParcelId, Result};
use rust_decimal::Decimal;

use crate::ledger::LandLedger;

impl LandLedger {
    /// List a whole parcel for sale at `price`.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::ParcelNotFound`] for unknown ids
    /// - [`LedgerError::AlreadyFractionalised`] once split into shares
    /// - [`LedgerError::NotFullOwner`] unless `caller` holds the whole unit
    /// - [`LedgerError::InvalidPrice`] for non-positive prices
    pub fn list_whole(&mut self, caller: AccountId, id: ParcelId, price: Decimal) -> Result<()> {
        self.roles.check_eligible(&caller)?;
        let parcel = self.registry.get(id)?;
        if parcel.fractionalised {
            return Err(LedgerError::AlreadyFractionalised(id));
        }
        if !self.ownership.is_full_owner(caller, id, parcel.total_shares) {
            return Err(LedgerError::NotFullOwner {
                account: caller,
                parcel: id,
            });
        }
        if price <= Decimal::ZERO {
            return Err(LedgerError::InvalidPrice {
                reason: format!("listing price must be positive, got {price}"),
            });
        }

        let mut events: Vec<LedgerEvent> = self.roles.ensure_roles(caller)?.into_iter().collect();
        let parcel = self.registry.get_mut(id)?;
        parcel.for_sale = true;
        parcel.whole_price = price;

        tracing::info!(parcel = %id, owner = %caller, price = %price, "Whole parcel listed");
        events.push(LedgerEvent::WholeListed { parcel: id, price });
        self.commit(events);
        Ok(())
    }

    /// Take a whole listing off the market. The full owner or the
    /// administrator may delist.
    ///
    /// # Errors
    /// - [`LedgerError::ParcelNotFound`] for unknown ids
    /// - [`LedgerError::NotFullOwner`] for anyone else
    pub fn delist_whole(&mut self, caller: AccountId, id: ParcelId) -> Result<()> {
        let parcel = self.registry.get(id)?;
        let is_full_owner = self.ownership.is_full_owner(caller, id, parcel.total_shares);
        AccessGate::new(&self.roles).authorize_owner_or_admin(caller, is_full_owner, id)?;

        // The regulator acts without provisioning; owners pass through the
        // usual role step.
        let mut events = Vec::new();
        if !self.roles.is_admin(&caller) {
            events.extend(self.roles.ensure_roles(caller)?);
        }
        self.registry.get_mut(id)?.for_sale = false;

        tracing::info!(parcel = %id, by = %caller, "Whole parcel delisted");
        events.push(LedgerEvent::WholeDelisted {
            parcel: id,
            by: caller,
        });
        self.commit(events);
        Ok(())
    }

    /// Buy a listed whole parcel. `payment` must equal the listed price.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::ParcelNotFound`] for unknown ids
    /// - [`LedgerError::SelfTrade`] if `caller` already owns it
    /// - [`LedgerError::FraudBlocked`] if (caller, owner) is flagged
    /// - [`LedgerError::AlreadyFractionalised`] / [`LedgerError::NotForSale`]
    /// - [`LedgerError::PaymentMismatch`] unless `payment` equals the price
    /// - [`LedgerError::InsufficientFunds`] if the wallet cannot cover it
    pub fn buy_whole(&mut self, caller: AccountId, id: ParcelId, payment: Decimal) -> Result<()> {
        // 1. Eligibility and parcel state
        self.roles.check_eligible(&caller)?;
        let parcel = self.registry.get(id)?;
        let seller = parcel.owner;
        let price = parcel.whole_price;
        let supply = parcel.total_shares;
        if seller == caller {
            return Err(LedgerError::SelfTrade(caller));
        }
        self.fraud.check(caller, seller)?;
        if parcel.fractionalised {
            return Err(LedgerError::AlreadyFractionalised(id));
        }
        if !parcel.for_sale {
            return Err(LedgerError::NotForSale(id));
        }
        if !self.ownership.is_full_owner(seller, id, supply) {
            return Err(LedgerError::NotFullOwner {
                account: seller,
                parcel: id,
            });
        }

        // 2. Payment
        if payment != price {
            return Err(LedgerError::PaymentMismatch {
                expected: price,
                attached: payment,
            });
        }
        self.wallets.check_funds(caller, payment)?;
        self.wallets.check_credit(seller, payment)?;

        // 3. Commit
        let mut events: Vec<LedgerEvent> = self.roles.ensure_roles(caller)?.into_iter().collect();
        self.ownership.transfer(seller, caller, id, supply)?;
        self.wallets.transfer(caller, seller, payment)?;
        let parcel = self.registry.get_mut(id)?;
        parcel.owner = caller;
        parcel.for_sale = false;

        // 4. Conservation
        self.ownership.verify_supply(id, supply)?;
        self.wallets.verify_supply()?;

        tracing::info!(
            parcel = %id,
            buyer = %caller,
            seller = %seller,
            price = %price,
            "Whole parcel settled"
        );
        events.push(LedgerEvent::WholePurchased {
            parcel: id,
            buyer: caller,
            seller,
            price,
        });
        events.extend(self.fraud.record(caller, seller, id));
        self.commit(events);
        Ok(())
    }

    /// Split a whole parcel into `total_shares` shares at `price_per_share`.
    ///
    /// The owner's single unit becomes the full share supply, all of it on
    /// offer.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::ParcelNotFound`] for unknown ids
    /// - [`LedgerError::AlreadyFractionalised`] on a second split
    /// - [`LedgerError::NotFullOwner`] unless `caller` holds the whole unit
    /// - [`LedgerError::InvalidShareAmount`] for zero or above the configured maximum
    /// - [`LedgerError::InvalidPrice`] for a non-positive share price
    pub fn fractionalise(
        &mut self,
        caller: AccountId,
        id: ParcelId,
        total_shares: u64,
        price_per_share: Decimal,
    ) -> Result<()> {
        self.roles.check_eligible(&caller)?;
        let parcel = self.registry.get(id)?;
        if parcel.fractionalised {
            return Err(LedgerError::AlreadyFractionalised(id));
        }
        if !self.ownership.is_full_owner(caller, id, parcel.total_shares) {
            return Err(LedgerError::NotFullOwner {
                account: caller,
                parcel: id,
            });
        }
        if total_shares == 0 || total_shares > self.config.max_shares_per_parcel {
            return Err(LedgerError::InvalidShareAmount {
                requested: total_shares,
            });
        }
        if price_per_share <= Decimal::ZERO {
            return Err(LedgerError::InvalidPrice {
                reason: format!("price per share must be positive, got {price_per_share}"),
            });
        }

        let mut events: Vec<LedgerEvent> = self.roles.ensure_roles(caller)?.into_iter().collect();
        self.ownership
            .rescale(caller, id, constants::WHOLE_UNIT_SUPPLY, total_shares)?;
        let parcel = self.registry.get_mut(id)?;
        parcel.total_shares = total_shares;
        parcel.available_shares = total_shares;
        parcel.price_per_share = price_per_share;
        parcel.fractionalised = true;
        parcel.for_sale = false;
        self.ownership.verify_supply(id, total_shares)?;

        tracing::info!(
            parcel = %id,
            owner = %caller,
            total_shares,
            price_per_share = %price_per_share,
            "Parcel fractionalised"
        );
        events.push(LedgerEvent::Fractionalised {
            parcel: id,
            total_shares,
            price_per_share,
        });
        self.commit(events);
        Ok(())
    }

    /// Buy `shares` from the registered owner of a fractionalised parcel.
    ///
    /// `payment` must equal `shares × price_per_share` exactly.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] for the administrator
    /// - [`LedgerError::ParcelNotFound`] for unknown ids
    /// - [`LedgerError::NotFractionalised`] for whole parcels
    /// - [`LedgerError::InvalidShareAmount`] for zero shares
    /// - [`LedgerError::SelfTrade`] if `caller` is the owner
    /// - [`LedgerError::FraudBlocked`] if (caller, owner) is flagged
    /// - [`LedgerError::SharesUnavailable`] above the offered amount
    /// - [`LedgerError::InsufficientShares`] if the owner holds fewer
    /// - [`LedgerError::PaymentOverflow`] / [`LedgerError::PaymentMismatch`]
    /// - [`LedgerError::InsufficientFunds`] if the wallet cannot cover it
    pub fn buy_shares(
        &mut self,
        caller: AccountId,
        id: ParcelId,
        shares: u64,
        payment: Decimal,
    ) -> Result<()> {
        // 1. Eligibility and parcel state
        self.roles.check_eligible(&caller)?;
        let parcel = self.registry.get(id)?;
        if !parcel.fractionalised {
            return Err(LedgerError::NotFractionalised(id));
        }
        if shares == 0 {
            return Err(LedgerError::InvalidShareAmount { requested: shares });
        }
        let seller = parcel.owner;
        let supply = parcel.total_shares;
        let available = parcel.available_shares;
        let price_per_share = parcel.price_per_share;
        if seller == caller {
            return Err(LedgerError::SelfTrade(caller));
        }
        self.fraud.check(caller, seller)?;
        if shares > available {
            return Err(LedgerError::SharesUnavailable {
                requested: shares,
                available,
            });
        }
        let seller_balance = self.ownership.balance(seller, id);
        if seller_balance < shares {
            return Err(LedgerError::InsufficientShares {
                needed: shares,
                available: seller_balance,
            });
        }

        // 2. Payment
        let required = share_cost(shares, price_per_share)?;
        if payment != required {
            return Err(LedgerError::PaymentMismatch {
                expected: required,
                attached: payment,
            });
        }
        self.wallets.check_funds(caller, payment)?;
        self.wallets.check_credit(seller, payment)?;

        // 3. Commit
        let mut events: Vec<LedgerEvent> = self.roles.ensure_roles(caller)?.into_iter().collect();
        self.ownership.transfer(seller, caller, id, shares)?;
        self.wallets.transfer(caller, seller, payment)?;
        self.registry.get_mut(id)?.available_shares = available - shares;

        // 4. Conservation
        self.ownership.verify_supply(id, supply)?;
        self.wallets.verify_supply()?;

        tracing::info!(
            parcel = %id,
            buyer = %caller,
            seller = %seller,
            shares,
            amount = %payment,
            "Share purchase settled"
        );
        events.push(LedgerEvent::SharesPurchased {
            parcel: id,
            buyer: caller,
            seller,
            shares,
            amount: payment,
        });
        events.extend(self.fraud.record(caller, seller, id));
        self.commit(events);
        Ok(())
    }

    /// Give `shares` of a fractionalised parcel to `to`, without payment.
    ///
    /// Counts toward the (recipient, sender) pair in the fraud monitor.
    /// When the registered owner gives shares away, the offered amount is
    /// clamped to what the owner still holds.
    ///
    /// # Errors
    /// - [`LedgerError::AdminCannotTrade`] if either side is the administrator
    /// - [`LedgerError::ParcelNotFound`] for unknown ids
    /// - [`LedgerError::NotFractionalised`] for whole parcels
    /// - [`LedgerError::InvalidShareAmount`] for zero shares
    /// - [`LedgerError::SelfTrade`] if `to == caller`
    /// - [`LedgerError::FraudBlocked`] if (to, caller) is flagged
    /// - [`LedgerError::InsufficientShares`] if `caller` holds fewer
    pub fn transfer_shares(
        &mut self,
        caller: AccountId,
        to: AccountId,
        id: ParcelId,
        shares: u64,
    ) -> Result<()> {
        self.roles.check_eligible(&caller)?;
        let parcel = self.registry.get(id)?;
        if !parcel.fractionalised {
            return Err(LedgerError::NotFractionalised(id));
        }
        if shares == 0 {
            return Err(LedgerError::InvalidShareAmount { requested: shares });
        }
        if to == caller {
            return Err(LedgerError::SelfTrade(caller));
        }
        if self.roles.is_admin(&to) {
            return Err(LedgerError::AdminCannotTrade(to));
        }
        let owner = parcel.owner;
        let supply = parcel.total_shares;
        self.fraud.check(to, caller)?;
        let held = self.ownership.balance(caller, id);
        if held < shares {
            return Err(LedgerError::InsufficientShares {
                needed: shares,
                available: held,
            });
        }

        let mut events: Vec<LedgerEvent> = self.roles.ensure_roles(caller)?.into_iter().collect();
        self.ownership.transfer(caller, to, id, shares)?;
        if caller == owner {
            let remaining = self.ownership.balance(owner, id);
            let parcel = self.registry.get_mut(id)?;
            parcel.available_shares = parcel.available_shares.min(remaining);
        }
        self.ownership.verify_supply(id, supply)?;

        tracing::info!(
            parcel = %id,
            from = %caller,
            to = %to,
            shares,
            "Shares transferred"
        );
        events.push(LedgerEvent::SharesTransferred {
            parcel: id,
            from: caller,
            to,
            shares,
        });
        events.extend(self.fraud.record(to, caller, id));
        self.commit(events);
        Ok(())
    }
}

/// `shares × price_per_share`, refusing to overflow.
fn share_cost(shares: u64, price_per_share: Decimal) -> Result<Decimal> {
    Decimal::from(shares)
        .checked_mul(price_per_share)
        .ok_or(LedgerError::PaymentOverflow)
}
