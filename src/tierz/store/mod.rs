//! # Storage Layer
//!
//! The arrangement is persisted in an ordered document collection: one
//! [`ItemRecord`] per placed item plus one [`TierRecord`] per tier. The
//! collection is abstracted behind [`backend::StorageBackend`], which handles
//! the "how" (memory, files); [`adapter::PersistenceAdapter`] handles the
//! "what" (reconstruction, fallback, batching deltas).
//!
//! ## Incremental, atomic writes
//!
//! A move never rewrites the whole arrangement. Its deltas become a
//! [`WriteBatch`] holding only the records that changed, and a backend applies
//! a batch completely or not at all. A cross-tier move therefore lands as one
//! unit: the compaction of the vacated tier, the expansion of the destination
//! tier and the moved item's own record.
//!
//! ## Implementations
//!
//! - [`mem_backend::MemBackend`]: in-memory, for tests; can simulate read
//!   failures and failures part-way through a batch.
//! - [`fs_backend::FsBackend`]: JSON documents in a data directory, written
//!   through a temp file and rename.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── items.json    # ItemRecord documents keyed by item id
//! ├── tiers.json    # TierRecord documents
//! └── config.json   # TierzConfig
//! ```

use crate::model::{ItemId, ItemRecord, TierId};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod adapter;
pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

/// Field filter for item queries. Results are always ordered by tier id, then position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub tier: Option<TierId>,
}

impl ItemQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_tier(tier: TierId) -> Self {
        Self { tier: Some(tier) }
    }

    pub fn matches(&self, record: &ItemRecord) -> bool {
        match &self.tier {
            Some(tier) => &record.tier_id == tier,
            None => true,
        }
    }
}

/// Sorts query results into the order every backend returns.
pub(crate) fn order_records(records: &mut [ItemRecord]) {
    records.sort_by(|a, b| {
        a.tier_id
            .cmp(&b.tier_id)
            .then(a.position.cmp(&b.position))
            .then(a.item_id.cmp(&b.item_id))
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Put(ItemRecord),
    Delete(ItemId),
}

/// A set of writes applied together or not at all.
#[derive(Debug, Clone)]
pub struct WriteBatch {
    pub id: Uuid,
    pub written_at: DateTime<Utc>,
    pub writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            written_at: Utc::now(),
            writes: Vec::new(),
        }
    }

    pub fn put(&mut self, record: ItemRecord) {
        self.writes.push(Write::Put(record));
    }

    pub fn delete(&mut self, id: ItemId) {
        self.writes.push(Write::Delete(id));
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl Default for WriteBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepairReport {
    pub rewritten: usize,
    pub removed: usize,
}
