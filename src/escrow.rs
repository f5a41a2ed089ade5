//! The escrow state machine: composes store, roles, transition rules and
//! custody into the four public operations.
//!
//! Every operation either returns a [`Receipt`] with the store and treasury
//! updated, or an error with neither touched. Records are only written
//! through `SaleStore::create` and `SaleStore::update`, and the update
//! closure does all checks and the payout before anything is written back.

use ink::primitives::AccountId;

use crate::custody::{self, Distribution, Treasury};
use crate::errors::Result;
use crate::record::{Balance, Parties, PropertyId, SaleRecord, SaleRecordView, Stage};
use crate::roles;
use crate::store::SaleStore;
use crate::transition::{self, Operation};

/// What a successful operation did, for events and audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Receipt {
    Initiated {
        property_id: PropertyId,
        parties: Parties,
        price: Balance,
    },
    NotaryVerified {
        property_id: PropertyId,
        notary: AccountId,
    },
    TaxesVerified {
        property_id: PropertyId,
        government: AccountId,
        tax_amount: Balance,
    },
    Completed {
        property_id: PropertyId,
        buyer: AccountId,
        distribution: Distribution,
    },
}

impl Receipt {
    pub fn operation(&self) -> Operation {
        match self {
            Receipt::Initiated { .. } => Operation::Initiate,
            Receipt::NotaryVerified { .. } => Operation::VerifyNotary,
            Receipt::TaxesVerified { .. } => Operation::VerifyTaxes,
            Receipt::Completed { .. } => Operation::Complete,
        }
    }

    pub fn property_id(&self) -> PropertyId {
        match self {
            Receipt::Initiated { property_id, .. }
            | Receipt::NotaryVerified { property_id, .. }
            | Receipt::TaxesVerified { property_id, .. }
            | Receipt::Completed { property_id, .. } => *property_id,
        }
    }

    pub fn stage(&self) -> Stage {
        self.operation().resulting_stage()
    }
}

pub struct SaleEscrow<'a, S, T> {
    store: &'a mut S,
    treasury: T,
}

impl<'a, S: SaleStore, T: Treasury> SaleEscrow<'a, S, T> {
    pub fn new(store: &'a mut S, treasury: T) -> Self {
        Self { store, treasury }
    }

    pub fn get_sale(&self, property_id: PropertyId) -> Option<SaleRecordView> {
        self.store
            .get(property_id)
            .map(|record| SaleRecordView::new(property_id, &record))
    }

    /// Opens a sale with `buyer` as the caller and takes `payment` into
    /// custody.
    #[allow(clippy::too_many_arguments)]
    pub fn initiate_sale(
        &mut self,
        buyer: AccountId,
        property_id: PropertyId,
        seller: AccountId,
        notary: AccountId,
        government: AccountId,
        price: Balance,
        payment: Balance,
    ) -> Result<Receipt> {
        let parties = Parties {
            buyer,
            seller,
            notary,
            government,
        };
        let existing = self.store.get(property_id);
        transition::check_initiation(existing.as_ref(), &parties, price, payment)?;

        let mut record = SaleRecord::new(&parties, price);
        custody::deposit(&mut record, payment)?;
        debug_assert!(record.invariants_hold());
        self.store.create(property_id, record)?;

        Ok(Receipt::Initiated {
            property_id,
            parties,
            price,
        })
    }

    pub fn verify_notary(&mut self, caller: AccountId, property_id: PropertyId) -> Result<Receipt> {
        self.store.update(property_id, |record| {
            roles::authorize_operation(record, caller, Operation::VerifyNotary)?;
            let next = transition::check(record, Operation::VerifyNotary)?;

            record.notary_verified = true;
            record.stage = next;
            debug_assert!(record.invariants_hold());

            Ok(Receipt::NotaryVerified {
                property_id,
                notary: caller,
            })
        })
    }

    pub fn verify_taxes(
        &mut self,
        caller: AccountId,
        property_id: PropertyId,
        tax_amount: Balance,
    ) -> Result<Receipt> {
        self.store.update(property_id, |record| {
            roles::authorize_operation(record, caller, Operation::VerifyTaxes)?;
            let next = transition::check(record, Operation::VerifyTaxes)?;
            transition::check_tax_amount(record, tax_amount)?;

            record.tax_amount = tax_amount;
            record.taxes_verified = true;
            record.stage = next;
            debug_assert!(record.invariants_hold());

            Ok(Receipt::TaxesVerified {
                property_id,
                government: caller,
                tax_amount,
            })
        })
    }

    /// Settles custody to seller and government and closes the sale.
    pub fn complete_sale(&mut self, caller: AccountId, property_id: PropertyId) -> Result<Receipt> {
        let treasury = &mut self.treasury;
        self.store.update(property_id, |record| {
            roles::authorize_operation(record, caller, Operation::Complete)?;
            let next = transition::check(record, Operation::Complete)?;

            let distribution = custody::settle(record, treasury)?;
            record.stage = next;
            debug_assert!(record.invariants_hold());

            Ok(Receipt::Completed {
                property_id,
                buyer: caller,
                distribution,
            })
        })
    }
}
