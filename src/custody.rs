//! Custody of the buyer's payment and the one-time settlement on completion.

use ink::primitives::AccountId;

use crate::errors::{EscrowError, Result, SettlementError};
use crate::record::{Balance, SaleRecord, Stage};

/// How custodied funds are split when a sale completes.
#[derive(scale::Decode, scale::Encode, Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct Distribution {
    pub seller: AccountId,
    pub seller_share: Balance,
    pub government: AccountId,
    pub government_share: Balance,
}

impl Distribution {
    /// Splits `price` into the seller's share and the tax owed to government.
    pub fn split(
        price: Balance,
        tax_amount: Balance,
        seller: AccountId,
        government: AccountId,
    ) -> Result<Self> {
        let seller_share = price
            .checked_sub(tax_amount)
            .ok_or(EscrowError::InvalidAmount)?;
        Ok(Self {
            seller,
            seller_share,
            government,
            government_share: tax_amount,
        })
    }

    pub fn total(&self) -> Balance {
        self.seller_share.saturating_add(self.government_share)
    }
}

/// Moves settled funds out of custody.
///
/// `payout` is all-or-nothing: on `Err` neither leg may appear to have
/// happened. Implementations that cannot undo a completed leg themselves
/// must run inside a host that reverts the whole call on error.
pub trait Treasury {
    fn payout(&mut self, distribution: &Distribution) -> core::result::Result<(), SettlementError>;
}

impl<T: Treasury + ?Sized> Treasury for &mut T {
    fn payout(&mut self, distribution: &Distribution) -> core::result::Result<(), SettlementError> {
        (**self).payout(distribution)
    }
}

/// Pays out of the contract's own balance. An `Err` from a contract message
/// reverts the call frame, so a failed second leg also undoes the first.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvTreasury;

impl Treasury for EnvTreasury {
    fn payout(&mut self, distribution: &Distribution) -> core::result::Result<(), SettlementError> {
        let available = ink::env::balance::<ink::env::DefaultEnvironment>();
        if available < distribution.total() {
            return Err(SettlementError::InsufficientCustody);
        }

        let legs = [
            (distribution.seller, distribution.seller_share),
            (distribution.government, distribution.government_share),
        ];
        for (recipient, amount) in legs {
            if amount == 0 {
                continue;
            }
            ink::env::transfer::<ink::env::DefaultEnvironment>(recipient, amount)
                .map_err(|_| SettlementError::TransferFailed)?;
        }
        Ok(())
    }
}

/// Places the buyer's payment into custody for a freshly created record.
pub fn deposit(record: &mut SaleRecord, amount: Balance) -> Result<()> {
    if record.stage != Stage::Initiated || record.custodied_amount != 0 {
        return Err(EscrowError::InvalidTransition {
            expected: Stage::Initiated,
            actual: record.stage,
        });
    }
    if amount == 0 || amount != record.price {
        return Err(EscrowError::InvalidAmount);
    }
    record.custodied_amount = amount;
    Ok(())
}

/// Releases the full custodied amount to seller and government.
///
/// The record is only touched once the treasury reports success.
pub fn settle<T: Treasury>(record: &mut SaleRecord, treasury: &mut T) -> Result<Distribution> {
    if record.custodied_amount != record.price {
        return Err(EscrowError::SettlementFailure);
    }
    let distribution =
        Distribution::split(record.price, record.tax_amount, record.seller, record.government)?;
    debug_assert_eq!(distribution.total(), record.custodied_amount);

    treasury.payout(&distribution)?;
    record.custodied_amount = 0;
    Ok(distribution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Parties;
    use crate::testing::LedgerTreasury;

    fn record(price: Balance) -> SaleRecord {
        let parties = Parties {
            buyer: AccountId::from([1; 32]),
            seller: AccountId::from([2; 32]),
            notary: AccountId::from([3; 32]),
            government: AccountId::from([4; 32]),
        };
        SaleRecord::new(&parties, price)
    }

    #[test]
    fn split_conserves_price() {
        let seller = AccountId::from([2; 32]);
        let government = AccountId::from([4; 32]);
        let distribution = Distribution::split(1_000_000, 500_000, seller, government).unwrap();
        assert_eq!(distribution.seller_share, 500_000);
        assert_eq!(distribution.government_share, 500_000);
        assert_eq!(distribution.total(), 1_000_000);

        assert_eq!(
            Distribution::split(10, 11, seller, government),
            Err(EscrowError::InvalidAmount)
        );
    }

    #[test]
    fn deposit_happens_once() {
        let mut record = record(700);
        assert_eq!(deposit(&mut record, 699), Err(EscrowError::InvalidAmount));
        assert_eq!(record.custodied_amount, 0);

        assert_eq!(deposit(&mut record, 700), Ok(()));
        assert_eq!(record.custodied_amount, 700);

        assert!(matches!(
            deposit(&mut record, 700),
            Err(EscrowError::InvalidTransition { .. })
        ));
        assert_eq!(record.custodied_amount, 700);
    }

    #[test]
    fn settle_pays_both_parties_and_empties_custody() {
        let mut record = record(1_000);
        deposit(&mut record, 1_000).unwrap();
        record.tax_amount = 250;

        let mut treasury = LedgerTreasury::funded(1_000);
        let distribution = settle(&mut record, &mut treasury).unwrap();

        assert_eq!(distribution.seller_share, 750);
        assert_eq!(record.custodied_amount, 0);
        assert_eq!(treasury.paid_to(&record.seller), 750);
        assert_eq!(treasury.paid_to(&record.government), 250);
        assert_eq!(treasury.pool, 0);
    }

    #[test]
    fn failed_payout_leaves_custody_in_place() {
        let mut record = record(1_000);
        deposit(&mut record, 1_000).unwrap();
        record.tax_amount = 100;

        let mut treasury = LedgerTreasury::funded(1_000);
        treasury.refuse(record.government);

        assert_eq!(
            settle(&mut record, &mut treasury),
            Err(EscrowError::SettlementFailure)
        );
        assert_eq!(record.custodied_amount, 1_000);
        assert_eq!(treasury.paid_to(&record.seller), 0);
        assert_eq!(treasury.pool, 1_000);
    }

    #[test]
    fn settle_refuses_without_full_custody() {
        let mut record = record(1_000);
        let mut treasury = LedgerTreasury::funded(1_000);
        assert_eq!(
            settle(&mut record, &mut treasury),
            Err(EscrowError::SettlementFailure)
        );
    }
}
