use super::{ItemQuery, WriteBatch};
use crate::error::Result;
use crate::model::{ItemRecord, TierRecord};

/// Abstract interface for the ordered document collection.
///
/// Methods take `&self`; implementations that hold state use interior
/// mutability, since tierz runs on a single logical thread.
pub trait StorageBackend {
    // --- Item documents ---

    /// Item records matching `query`, ordered by tier id then position.
    fn query_items(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>>;

    /// Apply every write of `batch`, or none of them.
    fn commit_batch(&self, batch: &WriteBatch) -> Result<()>;

    // --- Tier documents ---

    fn load_tiers(&self) -> Result<Vec<TierRecord>>;

    fn save_tiers(&self, tiers: &[TierRecord]) -> Result<()>;

    // --- Capabilities ---

    /// Human readable location, e.g. a directory or `memory://`.
    fn location(&self) -> String;
}
