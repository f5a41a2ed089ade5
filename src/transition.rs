//! Stage transition rules, independent of who is calling.
//!
//! | operation     | requires                                   | moves to       |
//! |---------------|--------------------------------------------|----------------|
//! | initiate      | no record for the id                       | Initiated      |
//! | verify-notary | Initiated, notary not yet verified         | NotaryVerified |
//! | verify-taxes  | NotaryVerified, taxes not yet verified     | TaxesVerified  |
//! | complete      | TaxesVerified                              | Completed      |

use ink::primitives::AccountId;

use crate::errors::{EscrowError, Result};
use crate::record::{Balance, Parties, SaleRecord, Stage};

#[derive(scale::Decode, scale::Encode, Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub enum Operation {
    Initiate,
    VerifyNotary,
    VerifyTaxes,
    Complete,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Initiate => "initiate_sale",
            Operation::VerifyNotary => "verify_notary",
            Operation::VerifyTaxes => "verify_taxes",
            Operation::Complete => "complete_sale",
        }
    }

    /// Stage a record must be in for this operation. `None` for `Initiate`,
    /// which requires the record to be absent.
    pub fn required_stage(self) -> Option<Stage> {
        match self {
            Operation::Initiate => None,
            Operation::VerifyNotary => Some(Stage::Initiated),
            Operation::VerifyTaxes => Some(Stage::NotaryVerified),
            Operation::Complete => Some(Stage::TaxesVerified),
        }
    }

    pub fn resulting_stage(self) -> Stage {
        match self {
            Operation::Initiate => Stage::Initiated,
            Operation::VerifyNotary => Stage::NotaryVerified,
            Operation::VerifyTaxes => Stage::TaxesVerified,
            Operation::Complete => Stage::Completed,
        }
    }
}

/// Checks `operation` against an existing record and returns the stage the
/// record moves to. The record is never modified here.
pub fn check(record: &SaleRecord, operation: Operation) -> Result<Stage> {
    let Some(expected) = operation.required_stage() else {
        return Err(EscrowError::AlreadyExists);
    };
    let already_attested = match operation {
        Operation::VerifyNotary => record.notary_verified,
        Operation::VerifyTaxes => record.taxes_verified,
        _ => false,
    };
    if record.stage != expected || already_attested {
        return Err(EscrowError::InvalidTransition {
            expected,
            actual: record.stage,
        });
    }

    let next = operation.resulting_stage();
    debug_assert_eq!(expected.next(), Some(next));
    Ok(next)
}

/// Checks everything `initiate` needs before a record is created.
pub fn check_initiation(
    existing: Option<&SaleRecord>,
    parties: &Parties,
    price: Balance,
    payment: Balance,
) -> Result<()> {
    if existing.is_some() {
        return Err(EscrowError::AlreadyExists);
    }
    check_parties(parties)?;
    if price == 0 || payment != price {
        return Err(EscrowError::InvalidAmount);
    }
    Ok(())
}

/// All four role addresses must be set and pairwise distinct.
pub fn check_parties(parties: &Parties) -> Result<()> {
    let null = AccountId::from([0u8; 32]);
    let addresses = parties.as_array();
    for (i, address) in addresses.iter().enumerate() {
        if *address == null || addresses[i + 1..].contains(address) {
            return Err(EscrowError::InvalidParties);
        }
    }
    Ok(())
}

/// Tax may not exceed what is held for the sale.
pub fn check_tax_amount(record: &SaleRecord, tax_amount: Balance) -> Result<()> {
    if tax_amount > record.price {
        return Err(EscrowError::InvalidAmount);
    }
    Ok(())
}
