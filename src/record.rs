//! Sale records and the stages a sale moves through.

use ink::primitives::AccountId;

/// Caller-supplied identifier of the property under sale.
pub type PropertyId = u128;

pub type Balance = u128;

/// Position of a sale in its fixed lifecycle. Ordering follows the lifecycle,
/// so `stage >= Stage::NotaryVerified` reads as "notary has attested".
#[derive(
    scale::Decode, scale::Encode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default,
)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub enum Stage {
    #[default]
    Initiated,
    NotaryVerified,
    TaxesVerified,
    Completed,
}

impl Stage {
    /// The stage that directly follows this one, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Initiated => Some(Stage::NotaryVerified),
            Stage::NotaryVerified => Some(Stage::TaxesVerified),
            Stage::TaxesVerified => Some(Stage::Completed),
            Stage::Completed => None,
        }
    }

    /// Funds stay in custody in every stage but the terminal one.
    pub fn holds_custody(self) -> bool {
        self != Stage::Completed
    }
}

/// The four role addresses of a sale, as supplied at initiation.
#[derive(scale::Decode, scale::Encode, Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct Parties {
    pub buyer: AccountId,
    pub seller: AccountId,
    pub notary: AccountId,
    pub government: AccountId,
}

impl Parties {
    pub fn as_array(&self) -> [AccountId; 4] {
        [self.buyer, self.seller, self.notary, self.government]
    }
}

/// Authoritative record of a single property sale.
#[derive(scale::Decode, scale::Encode, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct SaleRecord {
    pub buyer: AccountId,
    pub seller: AccountId,
    pub notary: AccountId,
    pub government: AccountId,
    pub price: Balance,
    pub tax_amount: Balance,
    pub stage: Stage,
    pub notary_verified: bool,
    pub taxes_verified: bool,
    pub custodied_amount: Balance,
}

impl SaleRecord {
    /// A fresh record in `Initiated` with nothing in custody yet. Custody is
    /// taken by `custody::deposit` before the record is stored.
    pub fn new(parties: &Parties, price: Balance) -> Self {
        Self {
            buyer: parties.buyer,
            seller: parties.seller,
            notary: parties.notary,
            government: parties.government,
            price,
            tax_amount: 0,
            stage: Stage::Initiated,
            notary_verified: false,
            taxes_verified: false,
            custodied_amount: 0,
        }
    }

    pub fn parties(&self) -> Parties {
        Parties {
            buyer: self.buyer,
            seller: self.seller,
            notary: self.notary,
            government: self.government,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.stage == Stage::Completed
    }

    /// Checks the record-level invariants that must hold after every
    /// committed operation.
    pub fn invariants_hold(&self) -> bool {
        let custody_matches_stage = if self.stage.holds_custody() {
            self.custodied_amount == self.price && self.custodied_amount > 0
        } else {
            self.custodied_amount == 0
        };
        let notary_flag = !self.notary_verified || self.stage >= Stage::NotaryVerified;
        let notary_stage = self.stage < Stage::NotaryVerified || self.notary_verified;
        let taxes_flag =
            !self.taxes_verified || (self.stage >= Stage::TaxesVerified && self.notary_verified);
        let taxes_stage = self.stage < Stage::TaxesVerified || self.taxes_verified;
        let tax_bound = !self.taxes_verified || self.tax_amount <= self.price;

        custody_matches_stage && notary_flag && notary_stage && taxes_flag && taxes_stage && tax_bound
    }
}

/// Public read view of a sale, returned by the query surface.
#[derive(scale::Decode, scale::Encode, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct SaleRecordView {
    pub property_id: PropertyId,
    pub buyer: AccountId,
    pub seller: AccountId,
    pub notary: AccountId,
    pub government: AccountId,
    pub price: Balance,
    pub tax_amount: Balance,
    pub stage: Stage,
    pub notary_verified: bool,
    pub taxes_verified: bool,
    pub custodied_amount: Balance,
}

impl SaleRecordView {
    pub fn new(property_id: PropertyId, record: &SaleRecord) -> Self {
        Self {
            property_id,
            buyer: record.buyer,
            seller: record.seller,
            notary: record.notary,
            government: record.government,
            price: record.price,
            tax_amount: record.tax_amount,
            stage: record.stage,
            notary_verified: record.notary_verified,
            taxes_verified: record.taxes_verified,
            custodied_amount: record.custodied_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parties() -> Parties {
        Parties {
            buyer: AccountId::from([1; 32]),
            seller: AccountId::from([2; 32]),
            notary: AccountId::from([3; 32]),
            government: AccountId::from([4; 32]),
        }
    }

    #[test]
    fn stages_advance_in_fixed_order() {
        assert_eq!(Stage::Initiated.next(), Some(Stage::NotaryVerified));
        assert_eq!(Stage::NotaryVerified.next(), Some(Stage::TaxesVerified));
        assert_eq!(Stage::TaxesVerified.next(), Some(Stage::Completed));
        assert_eq!(Stage::Completed.next(), None);
        assert!(Stage::Initiated < Stage::Completed);
    }

    #[test]
    fn new_record_has_no_custody_until_deposit() {
        let record = SaleRecord::new(&parties(), 1_000);
        assert_eq!(record.stage, Stage::Initiated);
        assert_eq!(record.custodied_amount, 0);
        assert!(!record.invariants_hold());
    }

    #[test]
    fn invariants_reject_flag_ahead_of_stage() {
        let mut record = SaleRecord::new(&parties(), 1_000);
        record.custodied_amount = 1_000;
        assert!(record.invariants_hold());

        record.taxes_verified = true;
        assert!(!record.invariants_hold());
    }

    #[test]
    fn completed_record_holds_nothing() {
        let mut record = SaleRecord::new(&parties(), 1_000);
        record.notary_verified = true;
        record.taxes_verified = true;
        record.tax_amount = 400;
        record.stage = Stage::Completed;
        assert!(record.invariants_hold());

        record.custodied_amount = 1_000;
        assert!(!record.invariants_hold());
    }

    #[test]
    fn view_preserves_every_field() {
        let mut record = SaleRecord::new(&parties(), u128::MAX);
        record.custodied_amount = u128::MAX;
        let view = SaleRecordView::new(7, &record);
        assert_eq!(view.property_id, 7);
        assert_eq!(view.price, u128::MAX);
        assert_eq!(view.custodied_amount, u128::MAX);
        assert_eq!(view.government, record.government);
    }
}
