//! Test doubles shared by the unit tests.

use ink::prelude::collections::BTreeMap;
use ink::primitives::AccountId;

use crate::custody::{Distribution, Treasury};
use crate::errors::SettlementError;
use crate::record::Balance;

/// Treasury backed by a plain balance pool. It checks both legs before
/// applying either, so a refused leg leaves every balance untouched.
#[derive(Debug, Default)]
pub struct LedgerTreasury {
    pub pool: Balance,
    paid: BTreeMap<AccountId, Balance>,
    refused: Option<AccountId>,
}

impl LedgerTreasury {
    pub fn funded(pool: Balance) -> Self {
        Self {
            pool,
            ..Self::default()
        }
    }

    pub fn deposit(&mut self, amount: Balance) {
        self.pool += amount;
    }

    /// Makes every payout to `account` fail.
    pub fn refuse(&mut self, account: AccountId) {
        self.refused = Some(account);
    }

    pub fn paid_to(&self, account: &AccountId) -> Balance {
        self.paid.get(account).copied().unwrap_or_default()
    }
}

impl Treasury for LedgerTreasury {
    fn payout(&mut self, distribution: &Distribution) -> Result<(), SettlementError> {
        if self.pool < distribution.total() {
            return Err(SettlementError::InsufficientCustody);
        }
        let refused = |account| self.refused == Some(account);
        if refused(distribution.seller) || refused(distribution.government) {
            return Err(SettlementError::TransferFailed);
        }

        self.pool -= distribution.total();
        *self.paid.entry(distribution.seller).or_default() += distribution.seller_share;
        *self.paid.entry(distribution.government).or_default() += distribution.government_share;
        Ok(())
    }
}
