use super::backend::StorageBackend;
use super::{order_records, ItemQuery, Write, WriteBatch};
use crate::error::{Result, TierzError};
use crate::model::{ItemId, ItemRecord, TierRecord};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ITEMS_FILE: &str = "items.json";
const TIERS_FILE: &str = "tiers.json";

/// File-backed document collection.
///
/// A batch is applied to an in-memory copy of `items.json` and the result is
/// written to a temp file that is renamed over the original, so readers see
/// either the old documents or the new ones.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(TierzError::Io)?;
        }
        Ok(())
    }

    fn load_items(&self) -> Result<BTreeMap<ItemId, ItemRecord>> {
        let path = self.root.join(ITEMS_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path).map_err(TierzError::Io)?;
        let items = serde_json::from_str(&content).map_err(TierzError::Serialization)?;
        Ok(items)
    }

    fn write_atomic(&self, filename: &str, content: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.root.join(filename);
        let tmp = self.root.join(format!(".{}-{}.tmp", filename, Uuid::new_v4()));
        if let Err(err) = fs::write(&tmp, content).and_then(|_| fs::rename(&tmp, &target)) {
            let _ = fs::remove_file(&tmp);
            return Err(TierzError::Io(err));
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn query_items(&self, query: &ItemQuery) -> Result<Vec<ItemRecord>> {
        let mut records: Vec<ItemRecord> = self
            .load_items()?
            .into_values()
            .filter(|r| query.matches(r))
            .collect();
        order_records(&mut records);
        Ok(records)
    }

    fn commit_batch(&self, batch: &WriteBatch) -> Result<()> {
        let mut staged = self.load_items()?;
        for write in &batch.writes {
            match write {
                Write::Put(record) => {
                    staged.insert(record.item_id.clone(), record.clone());
                }
                Write::Delete(id) => {
                    staged.remove(id);
                }
            }
        }
        let content = serde_json::to_string_pretty(&staged).map_err(TierzError::Serialization)?;
        self.write_atomic(ITEMS_FILE, &content)
    }

    fn load_tiers(&self) -> Result<Vec<TierRecord>> {
        let path = self.root.join(TIERS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path).map_err(TierzError::Io)?;
        let tiers = serde_json::from_str(&content).map_err(TierzError::Serialization)?;
        Ok(tiers)
    }

    fn save_tiers(&self, tiers: &[TierRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(tiers).map_err(TierzError::Serialization)?;
        self.write_atomic(TIERS_FILE, &content)
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}
