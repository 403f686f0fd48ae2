//! # Persistence Adapter
//!
//! Bridges the in-memory [`Arrangement`] and a [`StorageBackend`].
//!
//! ## Loading
//!
//! [`PersistenceAdapter::load`] never fails. It reads every item record,
//! groups them by tier, sorts each tier by stored position and appends the
//! items in that order, which also closes any gaps left in stored positions.
//! While rebuilding:
//!
//! - records for retired or unknown items are skipped;
//! - records in unknown tiers are skipped;
//! - an anchor stored outside the pinned tier is put back into it, and a
//!   foreign item stored in the pinned tier goes back to its seed tier;
//! - active catalog items with no record are appended to their seed tier.
//!
//! If the backend cannot be read, or holds nothing yet, the catalog's seed
//! arrangement is returned instead and the reason is logged.
//!
//! ## Committing
//!
//! [`PersistenceAdapter::commit`] turns a delta list into one [`WriteBatch`]
//! with a single timestamp. The backend applies it whole or not at all.

use super::backend::StorageBackend;
use super::{ItemQuery, RepairReport, WriteBatch};
use crate::arrangement::Arrangement;
use crate::catalog::Catalog;
use crate::error::{Result, TierzError};
use crate::model::{Delta, ItemId, ItemRecord, TierId};
use crate::planner::PinRules;
use crate::tiers::TierRegistry;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Store,
    /// Seed data stood in for the store.
    Fallback { reason: String },
}

/// What a rebuild had to correct in stored data.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub skipped: usize,
    pub compacted: usize,
    pub relocated: usize,
    pub missing: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        *self == LoadReport::default()
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub arrangement: Arrangement,
    pub source: LoadSource,
    pub last_updated: Option<DateTime<Utc>>,
    pub report: LoadReport,
}

impl LoadOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, LoadSource::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub items: usize,
    pub tiers: usize,
    pub removed: usize,
}

pub struct PersistenceAdapter<B: StorageBackend> {
    backend: B,
    catalog: Catalog,
    tiers: TierRegistry,
}

impl<B: StorageBackend> PersistenceAdapter<B> {
    pub fn new(backend: B, catalog: Catalog, tiers: TierRegistry) -> Self {
        Self {
            backend,
            catalog,
            tiers,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tiers(&self) -> &TierRegistry {
        &self.tiers
    }

    pub fn rules(&self) -> PinRules {
        PinRules::new(&self.catalog, &self.tiers)
    }

    /// Whether the backend holds no item records. Unreadable stores count as not empty.
    pub fn is_empty(&self) -> bool {
        self.backend
            .query_items(&ItemQuery::all())
            .map(|records| records.is_empty())
            .unwrap_or(false)
    }

    /// Loads the arrangement, falling back to seed data on any failure.
    pub fn load(&self) -> LoadOutcome {
        match self.fetch() {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "using seed arrangement");
                self.fallback(err.to_string())
            }
        }
    }

    /// Loads the arrangement from the store, without fallback.
    pub fn fetch(&self) -> Result<LoadOutcome> {
        let records = self
            .backend
            .query_items(&ItemQuery::all())
            .map_err(TierzError::into_load)?;
        if records.is_empty() {
            return Err(TierzError::Load(format!(
                "no arrangement stored at {}",
                self.backend.location()
            )));
        }
        self.check_tier_records();

        let last_updated = records.iter().map(|r| r.updated_at).max();
        let (arrangement, report) = self.rebuild(records)?;
        if !report.is_clean() {
            tracing::warn!(
                skipped = report.skipped,
                compacted = report.compacted,
                relocated = report.relocated,
                missing = report.missing,
                "stored arrangement needed corrections"
            );
        }
        tracing::debug!(items = arrangement.len(), "loaded arrangement");

        Ok(LoadOutcome {
            arrangement,
            source: LoadSource::Store,
            last_updated,
            report,
        })
    }

    fn fallback(&self, reason: String) -> LoadOutcome {
        let arrangement = self
            .catalog
            .seed_arrangement(&self.tiers)
            .unwrap_or_else(|_| Arrangement::empty(&self.tiers));
        LoadOutcome {
            arrangement,
            source: LoadSource::Fallback { reason },
            last_updated: None,
            report: LoadReport::default(),
        }
    }

    fn check_tier_records(&self) {
        match self.backend.load_tiers() {
            Ok(stored) if !stored.is_empty() && stored != self.tiers.records() => {
                tracing::warn!("stored tier records differ from the catalog tiers");
            }
            Ok(_) => {}
            Err(err) => tracing::debug!(error = %err, "tier records unavailable"),
        }
    }

    fn rebuild(&self, records: Vec<ItemRecord>) -> Result<(Arrangement, LoadReport)> {
        let rules = self.rules();
        let mut report = LoadReport::default();
        let mut by_tier: HashMap<TierId, Vec<ItemRecord>> = HashMap::new();
        let mut seen: HashSet<ItemId> = HashSet::new();

        for record in records {
            let Some(entry) = self.catalog.get(&record.item_id) else {
                tracing::warn!(item = %record.item_id, "skipping record for unknown item");
                report.skipped += 1;
                continue;
            };
            if entry.retired || !seen.insert(record.item_id.clone()) {
                report.skipped += 1;
                continue;
            }
            if !self.tiers.contains(&record.tier_id) {
                tracing::warn!(item = %record.item_id, tier = %record.tier_id, "skipping record in unknown tier");
                seen.remove(&record.item_id);
                report.skipped += 1;
                continue;
            }

            let mut record = record;
            if rules.check(&record.item_id, &record.tier_id, &record.tier_id).is_err() {
                record.tier_id = match &rules.pinned_tier {
                    Some(pinned) if rules.anchor.as_ref() == Some(&record.item_id) => pinned.clone(),
                    _ => entry.seed_tier.clone(),
                };
                record.position = usize::MAX;
                report.relocated += 1;
            }
            by_tier.entry(record.tier_id.clone()).or_default().push(record);
        }

        let mut arrangement = Arrangement::empty(&self.tiers);
        for tier in self.tiers.list_tiers() {
            let Some(mut stored) = by_tier.remove(&tier.id) else {
                continue;
            };
            stored.sort_by(|a, b| a.position.cmp(&b.position).then(a.item_id.cmp(&b.item_id)));
            for (index, record) in stored.into_iter().enumerate() {
                if record.position != index && record.position != usize::MAX {
                    report.compacted += 1;
                }
                let name = self
                    .catalog
                    .get(&record.item_id)
                    .map(|e| e.name.clone())
                    .unwrap_or(record.name);
                arrangement.push(record.item_id, name, &tier.id)?;
            }
        }

        for entry in self.catalog.list_items() {
            if !entry.retired && !seen.contains(&entry.id) {
                arrangement.push(entry.id.clone(), entry.name.clone(), &entry.seed_tier)?;
                report.missing += 1;
            }
        }

        Ok((arrangement, report))
    }

    /// Writes `deltas` as one atomic batch. Returns the batch id, or `None`
    /// when there was nothing to write.
    pub fn commit(&self, deltas: &[Delta]) -> Result<Option<Uuid>> {
        if deltas.is_empty() {
            return Ok(None);
        }

        let mut batch = WriteBatch::new();
        for delta in deltas {
            let name = self
                .catalog
                .get(&delta.item_id)
                .map(|e| e.name.clone())
                .ok_or_else(|| TierzError::ItemNotFound(delta.item_id.clone()))?;
            batch.put(ItemRecord {
                item_id: delta.item_id.clone(),
                name,
                tier_id: delta.new_tier.clone(),
                position: delta.new_position,
                updated_at: batch.written_at,
            });
        }

        self.backend
            .commit_batch(&batch)
            .map_err(TierzError::into_persistence)?;
        tracing::info!(batch = %batch.id, writes = batch.len(), "committed move");
        Ok(Some(batch.id))
    }

    /// Writes the tier records and the catalog's seed arrangement.
    ///
    /// Refuses to touch a non-empty store unless `force` is set; with `force`,
    /// records that are not part of the seed are deleted in the same batch.
    pub fn seed(&self, force: bool) -> Result<SeedReport> {
        let existing = self
            .backend
            .query_items(&ItemQuery::all())
            .map_err(TierzError::into_load)?;
        if !existing.is_empty() && !force {
            return Err(TierzError::Api(format!(
                "store already holds {} items (use --force to overwrite)",
                existing.len()
            )));
        }

        let arrangement = self.catalog.seed_arrangement(&self.tiers)?;
        let mut batch = WriteBatch::new();
        let records = arrangement.records(batch.written_at);
        let keep: HashSet<&ItemId> = records.iter().map(|r| &r.item_id).collect();
        let mut removed = 0;
        for record in &existing {
            if !keep.contains(&record.item_id) {
                batch.delete(record.item_id.clone());
                removed += 1;
            }
        }
        let items = records.len();
        for record in records {
            batch.put(record);
        }

        let tier_records = self.tiers.records();
        self.backend
            .save_tiers(&tier_records)
            .map_err(TierzError::into_persistence)?;
        self.backend
            .commit_batch(&batch)
            .map_err(TierzError::into_persistence)?;
        tracing::info!(items, tiers = tier_records.len(), "seeded store");

        Ok(SeedReport {
            items,
            tiers: tier_records.len(),
            removed,
        })
    }

    /// Rebuilds the arrangement from the store and writes back every record
    /// whose stored placement differs, deleting records that cannot be placed.
    pub fn repair(&self) -> Result<RepairReport> {
        let stored = self
            .backend
            .query_items(&ItemQuery::all())
            .map_err(TierzError::into_load)?;
        let (arrangement, _) = self.rebuild(stored.clone())?;

        let mut batch = WriteBatch::new();
        let mut report = RepairReport::default();
        let rebuilt = arrangement.records(batch.written_at);
        let by_id: HashMap<&ItemId, &ItemRecord> =
            stored.iter().map(|r| (&r.item_id, r)).collect();

        for record in &rebuilt {
            let unchanged = by_id
                .get(&record.item_id)
                .map(|s| s.tier_id == record.tier_id && s.position == record.position)
                .unwrap_or(false);
            if !unchanged {
                batch.put(record.clone());
                report.rewritten += 1;
            }
        }
        let placed: HashSet<&ItemId> = rebuilt.iter().map(|r| &r.item_id).collect();
        for record in &stored {
            if !placed.contains(&record.item_id) {
                batch.delete(record.item_id.clone());
                report.removed += 1;
            }
        }

        if !batch.is_empty() {
            self.backend
                .commit_batch(&batch)
                .map_err(TierzError::into_persistence)?;
            tracing::info!(
                rewritten = report.rewritten,
                removed = report.removed,
                "repaired stored arrangement"
            );
        }
        Ok(report)
    }
}
