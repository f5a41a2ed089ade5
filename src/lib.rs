#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub mod custody;
pub mod errors;
pub mod escrow;
pub mod record;
pub mod roles;
pub mod store;
pub mod transition;

#[cfg(test)]
mod testing;

pub use errors::{EscrowError, Result, SettlementError};
pub use record::{PropertyId, SaleRecord, SaleRecordView, Stage};

#[ink::contract]
mod propertysale {
    use crate::custody::EnvTreasury;
    use crate::errors::{EscrowError, Result};
    use crate::escrow::{Receipt, SaleEscrow};
    use crate::record::{PropertyId, SaleRecord, SaleRecordView, Stage};
    use crate::transition::Operation;
    use ink::prelude::vec::Vec;

    #[derive(scale::Decode, scale::Encode, Clone, PartialEq, Eq, Debug)]
    #[cfg_attr(
        feature = "std",
        derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
    )]
    pub struct AuditLogEntry {
        pub caller: AccountId,
        pub operation: Operation,
        pub property_id: PropertyId,
        pub block_number: u64,
        pub timestamp: u64,
    }

    #[ink(storage)]
    pub struct PropertySale {
        owner: AccountId,
        paused: bool,
        sales: ink::storage::Mapping<PropertyId, SaleRecord>,
        sale_count: u64,
        total_custodied: Balance,
        audit_log: ink::storage::Mapping<u64, AuditLogEntry>,
        audit_log_count: u64,
    }

    #[ink(event)]
    pub struct ContractCreated {
        #[ink(topic)]
        pub owner: AccountId,
    }

    #[ink(event)]
    pub struct ContractPaused {
        #[ink(topic)]
        pub by: AccountId,
    }

    #[ink(event)]
    pub struct ContractUnpaused {
        #[ink(topic)]
        pub by: AccountId,
    }

    #[ink(event)]
    pub struct SaleInitiated {
        #[ink(topic)]
        pub property_id: PropertyId,
        #[ink(topic)]
        pub buyer: AccountId,
        pub seller: AccountId,
        pub notary: AccountId,
        pub government: AccountId,
        pub price: Balance,
    }

    #[ink(event)]
    pub struct NotaryVerified {
        #[ink(topic)]
        pub property_id: PropertyId,
        #[ink(topic)]
        pub notary: AccountId,
    }

    #[ink(event)]
    pub struct TaxesVerified {
        #[ink(topic)]
        pub property_id: PropertyId,
        #[ink(topic)]
        pub government: AccountId,
        pub tax_amount: Balance,
    }

    #[ink(event)]
    pub struct SaleCompleted {
        #[ink(topic)]
        pub property_id: PropertyId,
        #[ink(topic)]
        pub buyer: AccountId,
        pub seller: AccountId,
        pub seller_share: Balance,
        pub government: AccountId,
        pub government_share: Balance,
    }

    impl PropertySale {
        #[ink(constructor)]
        pub fn new() -> Self {
            let caller = Self::env().caller();

            Self::env().emit_event(ContractCreated { owner: caller });

            Self {
                owner: caller,
                paused: false,
                sales: ink::storage::Mapping::default(),
                sale_count: 0,
                total_custodied: 0,
                audit_log: ink::storage::Mapping::default(),
                audit_log_count: 0,
            }
        }

        #[ink(constructor)]
        pub fn default() -> Self {
            Self::new()
        }

        #[ink(message)]
        pub fn get_owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn is_paused(&self) -> bool {
            self.paused
        }

        /// Stops new sales from being opened. Sales already holding funds can
        /// still be verified and completed.
        #[ink(message)]
        pub fn pause(&mut self) -> Result<()> {
            let caller = self.env().caller();
            if caller != self.owner {
                return Err(EscrowError::Unauthorized);
            }

            self.paused = true;
            self.env().emit_event(ContractPaused { by: caller });
            Ok(())
        }

        #[ink(message)]
        pub fn unpause(&mut self) -> Result<()> {
            let caller = self.env().caller();
            if caller != self.owner {
                return Err(EscrowError::Unauthorized);
            }

            self.paused = false;
            self.env().emit_event(ContractUnpaused { by: caller });
            Ok(())
        }

        // === SALE LIFECYCLE ===

        /// Opens a sale with the caller as buyer. The attached value is the
        /// payment and must equal `price`.
        #[ink(message, payable)]
        pub fn initiate_sale(
            &mut self,
            property_id: PropertyId,
            seller: AccountId,
            notary: AccountId,
            government: AccountId,
            price: Balance,
        ) -> Result<Stage> {
            if self.paused {
                return self.reject(Operation::Initiate, property_id, EscrowError::ContractPaused);
            }

            let buyer = self.env().caller();
            let payment = self.env().transferred_value();
            let outcome = SaleEscrow::new(&mut self.sales, EnvTreasury).initiate_sale(
                buyer,
                property_id,
                seller,
                notary,
                government,
                price,
                payment,
            );
            self.commit(Operation::Initiate, property_id, outcome)
        }

        #[ink(message)]
        pub fn verify_notary(&mut self, property_id: PropertyId) -> Result<Stage> {
            let caller = self.env().caller();
            let outcome =
                SaleEscrow::new(&mut self.sales, EnvTreasury).verify_notary(caller, property_id);
            self.commit(Operation::VerifyNotary, property_id, outcome)
        }

        #[ink(message)]
        pub fn verify_taxes(
            &mut self,
            property_id: PropertyId,
            tax_amount: Balance,
        ) -> Result<Stage> {
            let caller = self.env().caller();
            let outcome = SaleEscrow::new(&mut self.sales, EnvTreasury).verify_taxes(
                caller,
                property_id,
                tax_amount,
            );
            self.commit(Operation::VerifyTaxes, property_id, outcome)
        }

        /// Releases custody: `price - tax_amount` to the seller and
        /// `tax_amount` to the government.
        #[ink(message)]
        pub fn complete_sale(&mut self, property_id: PropertyId) -> Result<Stage> {
            let caller = self.env().caller();
            let outcome =
                SaleEscrow::new(&mut self.sales, EnvTreasury).complete_sale(caller, property_id);
            self.commit(Operation::Complete, property_id, outcome)
        }

        // === QUERIES ===

        #[ink(message)]
        pub fn get_sale(&self, property_id: PropertyId) -> Option<SaleRecordView> {
            self.sales
                .get(property_id)
                .map(|record| SaleRecordView::new(property_id, &record))
        }

        #[ink(message)]
        pub fn get_stage(&self, property_id: PropertyId) -> Option<Stage> {
            self.sales.get(property_id).map(|record| record.stage)
        }

        #[ink(message)]
        pub fn is_notary_verified(&self, property_id: PropertyId) -> bool {
            self.sales
                .get(property_id)
                .map(|record| record.notary_verified)
                .unwrap_or(false)
        }

        #[ink(message)]
        pub fn is_taxes_verified(&self, property_id: PropertyId) -> bool {
            self.sales
                .get(property_id)
                .map(|record| record.taxes_verified)
                .unwrap_or(false)
        }

        #[ink(message)]
        pub fn get_custodied_amount(&self, property_id: PropertyId) -> Balance {
            self.sales
                .get(property_id)
                .map(|record| record.custodied_amount)
                .unwrap_or(0)
        }

        /// Sum of custody across all sales that have not completed.
        #[ink(message)]
        pub fn get_total_custodied(&self) -> Balance {
            self.total_custodied
        }

        #[ink(message)]
        pub fn get_sale_count(&self) -> u64 {
            self.sale_count
        }

        // === BOOKKEEPING ===

        /// Records a successful operation, or reports and returns the error.
        fn commit(
            &mut self,
            operation: Operation,
            property_id: PropertyId,
            outcome: Result<Receipt>,
        ) -> Result<Stage> {
            let receipt = match outcome {
                Ok(receipt) => receipt,
                Err(error) => return self.reject(operation, property_id, error),
            };

            match &receipt {
                Receipt::Initiated { price, .. } => {
                    self.sale_count = self.sale_count.saturating_add(1);
                    self.total_custodied = self.total_custodied.saturating_add(*price);
                }
                Receipt::Completed { distribution, .. } => {
                    self.total_custodied =
                        self.total_custodied.saturating_sub(distribution.total());
                }
                Receipt::NotaryVerified { .. } | Receipt::TaxesVerified { .. } => {}
            }

            self.log_operation(&receipt);
            self.emit_receipt(&receipt);
            Ok(receipt.stage())
        }

        fn reject(
            &self,
            operation: Operation,
            property_id: PropertyId,
            error: EscrowError,
        ) -> Result<Stage> {
            ink::env::debug_println!(
                "{} rejected for property {}: {:?}",
                operation.name(),
                property_id,
                error
            );
            Err(error)
        }

        fn emit_receipt(&self, receipt: &Receipt) {
            match *receipt {
                Receipt::Initiated {
                    property_id,
                    parties,
                    price,
                } => self.env().emit_event(SaleInitiated {
                    property_id,
                    buyer: parties.buyer,
                    seller: parties.seller,
                    notary: parties.notary,
                    government: parties.government,
                    price,
                }),
                Receipt::NotaryVerified {
                    property_id,
                    notary,
                } => self.env().emit_event(NotaryVerified {
                    property_id,
                    notary,
                }),
                Receipt::TaxesVerified {
                    property_id,
                    government,
                    tax_amount,
                } => self.env().emit_event(TaxesVerified {
                    property_id,
                    government,
                    tax_amount,
                }),
                Receipt::Completed {
                    property_id,
                    buyer,
                    distribution,
                } => self.env().emit_event(SaleCompleted {
                    property_id,
                    buyer,
                    seller: distribution.seller,
                    seller_share: distribution.seller_share,
                    government: distribution.government,
                    government_share: distribution.government_share,
                }),
            }
        }

        // === AUDIT LOG FUNCTIONALITY ===

        /// Append a committed operation to the audit log
        fn log_operation(&mut self, receipt: &Receipt) {
            let log_entry = AuditLogEntry {
                caller: self.env().caller(),
                operation: receipt.operation(),
                property_id: receipt.property_id(),
                block_number: self.env().block_number() as u64,
                timestamp: self.env().block_timestamp(),
            };

            // Store with current count as index, then increment
            self.audit_log.insert(self.audit_log_count, &log_entry);
            self.audit_log_count = self.audit_log_count.saturating_add(1);
        }

        #[ink(message)]
        pub fn get_audit_log_count(&self) -> u64 {
            self.audit_log_count
        }

        #[ink(message)]
        pub fn get_audit_log(&self, start: u64, limit: u64) -> Vec<AuditLogEntry> {
            let mut entries = Vec::new();
            let end = start.saturating_add(limit).min(self.audit_log_count);

            for i in start..end {
                if let Some(entry) = self.audit_log.get(i) {
                    entries.push(entry);
                }
            }

            entries
        }

        #[ink(message)]
        pub fn get_audit_log_for_property(&self, property_id: PropertyId) -> Vec<AuditLogEntry> {
            let mut matching_entries = Vec::new();

            for i in 0..self.audit_log_count {
                if let Some(entry) = self.audit_log.get(i) {
                    if entry.property_id == property_id {
                        matching_entries.push(entry);
                    }
                }
            }

            matching_entries
        }
    }


}
