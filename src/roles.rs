//! Role authorization: the caller of an operation must be the address
//! recorded for the role that operation requires.

use ink::primitives::AccountId;

use crate::errors::{EscrowError, Result};
use crate::record::SaleRecord;
use crate::transition::Operation;

#[derive(scale::Decode, scale::Encode, Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Role {
    Buyer,
    Seller,
    Notary,
    Government,
}

impl Role {
    /// Role whose address must match the caller. `Initiate` has none: there is
    /// no record yet and the caller becomes the buyer.
    pub fn required_for(operation: Operation) -> Option<Role> {
        match operation {
            Operation::Initiate => None,
            Operation::VerifyNotary => Some(Role::Notary),
            Operation::VerifyTaxes => Some(Role::Government),
            Operation::Complete => Some(Role::Buyer),
        }
    }

    pub fn holder(self, record: &SaleRecord) -> AccountId {
        match self {
            Role::Buyer => record.buyer,
            Role::Seller => record.seller,
            Role::Notary => record.notary,
            Role::Government => record.government,
        }
    }
}

pub fn authorize(record: &SaleRecord, caller: AccountId, required: Role) -> Result<()> {
    if required.holder(record) != caller {
        return Err(EscrowError::Unauthorized);
    }
    Ok(())
}

/// Authorizes `caller` for `operation` on an existing record.
pub fn authorize_operation(
    record: &SaleRecord,
    caller: AccountId,
    operation: Operation,
) -> Result<()> {
    match Role::required_for(operation) {
        Some(role) => authorize(record, caller, role),
        None => Err(EscrowError::AlreadyExists),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Parties;

    fn record() -> SaleRecord {
        let parties = Parties {
            buyer: AccountId::from([1; 32]),
            seller: AccountId::from([2; 32]),
            notary: AccountId::from([3; 32]),
            government: AccountId::from([4; 32]),
        };
        SaleRecord::new(&parties, 100)
    }

    #[test]
    fn each_operation_requires_its_role() {
        let record = record();
        assert_eq!(
            authorize_operation(&record, record.notary, Operation::VerifyNotary),
            Ok(())
        );
        assert_eq!(
            authorize_operation(&record, record.government, Operation::VerifyTaxes),
            Ok(())
        );
        assert_eq!(
            authorize_operation(&record, record.buyer, Operation::Complete),
            Ok(())
        );
    }

    #[test]
    fn other_parties_are_rejected() {
        let record = record();
        for caller in [record.buyer, record.seller, record.government] {
            assert_eq!(
                authorize(&record, caller, Role::Notary),
                Err(EscrowError::Unauthorized)
            );
        }
        assert_eq!(
            authorize(&record, record.seller, Role::Buyer),
            Err(EscrowError::Unauthorized)
        );
    }

    #[test]
    fn initiate_against_existing_record_is_rejected() {
        let record = record();
        assert_eq!(
            authorize_operation(&record, record.buyer, Operation::Initiate),
            Err(EscrowError::AlreadyExists)
        );
    }
}
