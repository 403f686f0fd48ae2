use super::backend::StorageBackend;
use super::{order_records, ItemQuery, Write, WriteBatch};
use crate::error::{Result, TierzError};
use crate::model::{ItemId, ItemRecord, TierRecord};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since tierz is single-threaded.
/// Batches are applied to a staged copy and swapped in only when every write
/// succeeded.
#[derive(Default)]
pub struct MemBackend {
    items: RefCell<BTreeMap<ItemId, ItemRecord>>,
    tiers: RefCell<Vec<TierRecord>>,
    simulate_read_error: RefCell<bool>,
    /// Fail a batch once this many of its writes have been staged.
    fail_after_writes: RefCell<Option<usize>>,
    committed_batches: RefCell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable read error simulation for testing load fallback.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.borrow_mut() = simulate;
    }

    /// Make the next batches fail after `writes` writes were staged. `Some(0)`
    /// fails before anything is staged; `None` disables the simulation.
    pub fn set_fail_after_writes(&self, writes: Option<usize>) {
        *self.fail_after_writes.borrow_mut() = writes;
    }

    /// Number of batches that were successfully applied.
    pub fn committed_batches(&self) -> usize {
        *self.committed_batches.borrow()
    }

    /// Test helper: overwrite a stored record directly, bypassing batches.
    pub fn put_raw(&self, record: ItemRecord) {
        self.items
            .borrow_mut()
            .insert(record.item_id.clone(), record);
    }
}

impl StorageBackend for MemBackend {
    fn query_items(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>> {
        if *self.simulate_read_error.borrow() {
            return Err(TierzError::Load("Simulated read error".to_string()));
        }
        let mut records: Vec<ItemRecord> = self
            .items
            .borrow()
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        order_records(&mut records);
        Ok(records)
    }

    fn commit_batch(&self, batch: &WriteBatch) -> Result<()> {
        let fail_after = *self.fail_after_writes.borrow();
        let mut staged = self.items.borrow().clone();

        for (applied, write) in batch.writes.iter().enumerate() {
            if fail_after == Some(applied) {
                return Err(TierzError::Persistence(format!(
                    "Simulated write error after {} of {} writes",
                    applied,
                    batch.len()
                )));
            }
            match write {
                Write::Put(record) => {
                    staged.insert(record.item_id.clone(), record.clone());
                }
                Write::Delete(id) => {
                    staged.remove(id);
                }
            }
        }

        *self.items.borrow_mut() = staged;
        *self.committed_batches.borrow_mut() += 1;
        Ok(())
    }

    fn load_tiers(&self) -> Result<Vec<TierRecord>> {
        if *self.simulate_read_error.borrow() {
            return Err(TierzError::Load("Simulated read error".to_string()));
        }
        Ok(self.tiers.borrow().clone())
    }

    fn save_tiers(&self, tiers: &[TierRecord]) -> Result<()> {
        *self.tiers.borrow_mut() = tiers.to_vec();
        Ok(())
    }

    fn location(&self) -> String {
        "memory://".to_string()
    }
}
