//! Keyed storage of sale records.
//!
//! The store knows nothing about roles or stages. It only guarantees that a
//! property id is created once and that an update is written back whole or
//! not at all.

use ink::prelude::collections::BTreeMap;
use ink::storage::traits::StorageKey;
use ink::storage::Mapping;

use crate::errors::{EscrowError, Result};
use crate::record::{PropertyId, SaleRecord};

pub trait SaleStore {
    fn get(&self, property_id: PropertyId) -> Option<SaleRecord>;

    /// Unchecked write, used by `create` and `update`.
    fn put(&mut self, property_id: PropertyId, record: &SaleRecord);

    fn contains(&self, property_id: PropertyId) -> bool {
        self.get(property_id).is_some()
    }

    fn create(&mut self, property_id: PropertyId, record: SaleRecord) -> Result<()> {
        if self.contains(property_id) {
            return Err(EscrowError::AlreadyExists);
        }
        self.put(property_id, &record);
        Ok(())
    }

    /// Runs `mutator` on a copy of the stored record and writes the copy back
    /// only if the mutator succeeds.
    fn update<R, F>(&mut self, property_id: PropertyId, mutator: F) -> Result<R>
    where
        F: FnOnce(&mut SaleRecord) -> Result<R>,
    {
        let mut record = self.get(property_id).ok_or(EscrowError::NotFound)?;
        let outcome = mutator(&mut record)?;
        self.put(property_id, &record);
        Ok(outcome)
    }
}

impl<KeyType: StorageKey> SaleStore for Mapping<PropertyId, SaleRecord, KeyType> {
    fn get(&self, property_id: PropertyId) -> Option<SaleRecord> {
        Mapping::get(self, property_id)
    }

    fn put(&mut self, property_id: PropertyId, record: &SaleRecord) {
        self.insert(property_id, record);
    }

    fn contains(&self, property_id: PropertyId) -> bool {
        Mapping::contains(self, property_id)
    }
}

/// In-memory store for running the escrow outside a contract.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<PropertyId, SaleRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SaleStore for MemoryStore {
    fn get(&self, property_id: PropertyId) -> Option<SaleRecord> {
        self.records.get(&property_id).cloned()
    }

    fn put(&mut self, property_id: PropertyId, record: &SaleRecord) {
        self.records.insert(property_id, record.clone());
    }
}
