//! # Entity Catalog
//!
//! The fixed set of items a tier list is built from, plus the tier set they are
//! ranked into. A catalog is plain data: which item is the anchor and which
//! tier is pinned are flags on the records, never names compared in code.
//!
//! ## Sources
//!
//! - [`CatalogFile::bundled`]: the built-in catalog, used when no custom
//!   catalog is configured and as the offline fallback arrangement.
//! - [`CatalogFile::load`]: a user-supplied JSON file with the same shape:
//!
//! ```json
//! {
//!   "tiers": [{ "id": "EX", "rank_order": 0, "pinned_only": true, "color": "#FF1493" }],
//!   "items": [{ "id": "1", "name": "Mita", "tier": "EX", "anchor": true }]
//! }
//! ```
//!
//! Item order inside the file is the seed order within each tier.

use crate::arrangement::Arrangement;
use crate::error::{Result, TierzError};
use crate::model::{ItemId, Tier, TierId};
use crate::tiers::TierRegistry;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub name: String,
    /// Tier the item starts in when no stored arrangement exists.
    #[serde(rename = "tier")]
    pub seed_tier: TierId,
    #[serde(default)]
    pub anchor: bool,
    /// Retired items stay in the catalog but are never placed.
    #[serde(default)]
    pub retired: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub tiers: Vec<Tier>,
    pub items: Vec<CatalogEntry>,
}

static BUNDLED: Lazy<CatalogFile> = Lazy::new(|| CatalogFile {
    tiers: crate::seed::TIERS
        .iter()
        .enumerate()
        .map(|(rank, (id, color, pinned_only))| Tier {
            id: TierId::from(*id),
            rank_order: rank as i64,
            pinned_only: *pinned_only,
            color: color.to_string(),
        })
        .collect(),
    items: crate::seed::ITEMS
        .iter()
        .enumerate()
        .map(|(i, (name, tier))| CatalogEntry {
            id: ItemId::new((i + 1).to_string()),
            name: name.to_string(),
            seed_tier: TierId::from(*tier),
            anchor: i == 0,
            retired: false,
        })
        .collect(),
});

impl CatalogFile {
    pub fn bundled() -> Self {
        BUNDLED.clone()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(TierzError::Io)?;
        let file: CatalogFile =
            serde_json::from_str(&content).map_err(TierzError::Serialization)?;
        Ok(file)
    }

    /// Validates the file and splits it into its two registries.
    pub fn into_parts(self) -> Result<(Catalog, TierRegistry)> {
        let tiers = TierRegistry::new(self.tiers)?;
        let catalog = Catalog::new(self.items, &tiers)?;
        Ok((catalog, tiers))
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Checks entries against the tier set.
    ///
    /// - ids are unique and every seed tier exists;
    /// - at most one anchor, and it seeds into the pinned tier;
    /// - no other active item seeds into the pinned tier.
    pub fn new(entries: Vec<CatalogEntry>, tiers: &TierRegistry) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.clone()) {
                return Err(TierzError::Catalog(format!("duplicate item id {}", entry.id)));
            }
            if !tiers.contains(&entry.seed_tier) {
                return Err(TierzError::Catalog(format!(
                    "item {} seeds into unknown tier {}",
                    entry.id, entry.seed_tier
                )));
            }
        }

        let anchors: Vec<&CatalogEntry> = entries.iter().filter(|e| e.anchor).collect();
        if anchors.len() > 1 {
            return Err(TierzError::Catalog(format!(
                "{} anchor items declared, at most one is allowed",
                anchors.len()
            )));
        }

        let pinned = tiers.pinned_tier().map(|t| t.id.clone());
        if let Some(anchor) = anchors.first() {
            match &pinned {
                Some(tier) if *tier == anchor.seed_tier => {}
                Some(tier) => {
                    return Err(TierzError::Catalog(format!(
                        "anchor {} must seed into pinned tier {}",
                        anchor.id, tier
                    )))
                }
                None => {
                    return Err(TierzError::Catalog(format!(
                        "anchor {} declared without a pinned tier",
                        anchor.id
                    )))
                }
            }
        }

        if let Some(tier) = &pinned {
            if let Some(intruder) = entries
                .iter()
                .find(|e| !e.anchor && !e.retired && &e.seed_tier == tier)
            {
                return Err(TierzError::Catalog(format!(
                    "item {} seeds into pinned tier {}",
                    intruder.id, tier
                )));
            }
        }

        Ok(Self { entries })
    }

    /// All catalog entries, retired ones included.
    pub fn list_items(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: &ItemId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn is_anchor(&self, id: &ItemId) -> bool {
        self.get(id).map(|e| e.anchor).unwrap_or(false)
    }

    pub fn anchor(&self) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.anchor)
    }

    pub fn is_active(&self, id: &ItemId) -> bool {
        self.get(id).map(|e| !e.retired).unwrap_or(false)
    }

    /// Exact id match first, then a case-insensitive name match.
    pub fn find(&self, key: &str) -> Option<&CatalogEntry> {
        let key = key.trim();
        self.entries
            .iter()
            .find(|e| e.id.as_str() == key)
            .or_else(|| self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(key)))
    }

    /// The default arrangement: active items in catalog order, grouped by seed tier.
    pub fn seed_arrangement(&self, tiers: &TierRegistry) -> Result<Arrangement> {
        let mut arrangement = Arrangement::empty(tiers);
        for entry in self.entries.iter().filter(|e| !e.retired) {
            arrangement.push(entry.id.clone(), entry.name.clone(), &entry.seed_tier)?;
        }
        Ok(arrangement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, tier: &str, anchor: bool) -> CatalogEntry {
        CatalogEntry {
            id: ItemId::from(id),
            name: name.to_string(),
            seed_tier: TierId::from(tier),
            anchor,
            retired: false,
        }
    }

    fn tiers() -> TierRegistry {
        TierRegistry::new(vec![
            Tier {
                id: TierId::from("EX"),
                rank_order: 0,
                pinned_only: true,
                color: String::new(),
            },
            Tier {
                id: TierId::from("A"),
                rank_order: 1,
                pinned_only: false,
                color: String::new(),
            },
        ])
        .unwrap()
    }

    #[test]
    fn bundled_catalog_is_valid() {
        let (catalog, tiers) = CatalogFile::bundled().into_parts().unwrap();
        assert_eq!(tiers.pinned_tier().unwrap().id, TierId::from("EX"));
        let anchor = catalog.anchor().unwrap();
        assert_eq!(anchor.name, "Mita");
        assert_eq!(catalog.list_items().len(), 44);

        let arrangement = catalog.seed_arrangement(&tiers).unwrap();
        let ex = arrangement.items_in_tier(&TierId::from("EX")).unwrap();
        assert_eq!(ex.len(), 1);
        assert_eq!(ex[0].name, "Mita");
    }

    #[test]
    fn rejects_second_anchor() {
        let err = Catalog::new(
            vec![entry("1", "a", "EX", true), entry("2", "b", "A", true)],
            &tiers(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("anchor"));
    }

    #[test]
    fn rejects_anchor_outside_pinned_tier() {
        let err = Catalog::new(vec![entry("1", "a", "A", true)], &tiers()).unwrap_err();
        assert!(err.to_string().contains("pinned tier"));
    }

    #[test]
    fn rejects_intruder_in_pinned_tier() {
        let err = Catalog::new(
            vec![entry("1", "a", "EX", true), entry("2", "b", "EX", false)],
            &tiers(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("seeds into pinned tier"));
    }

    #[test]
    fn rejects_unknown_seed_tier() {
        let err = Catalog::new(vec![entry("1", "a", "Z", false)], &tiers()).unwrap_err();
        assert!(err.to_string().contains("unknown tier"));
    }

    #[test]
    fn retired_items_are_not_seeded() {
        let mut retired = entry("3", "gone", "A", false);
        retired.retired = true;
        let catalog = Catalog::new(
            vec![entry("1", "a", "EX", true), entry("2", "b", "A", false), retired],
            &tiers(),
        )
        .unwrap();
        let arrangement = catalog.seed_arrangement(&tiers()).unwrap();
        assert_eq!(arrangement.len(), 2);
        assert!(!catalog.is_active(&ItemId::from("3")));
    }

    #[test]
    fn find_by_id_or_name() {
        let catalog = Catalog::new(
            vec![entry("1", "Mita", "EX", true), entry("2", "Meguro", "A", false)],
            &tiers(),
        )
        .unwrap();
        assert_eq!(catalog.find("2").unwrap().name, "Meguro");
        assert_eq!(catalog.find("mita").unwrap().id, ItemId::from("1"));
        assert!(catalog.find("nowhere").is_none());
        assert!(catalog.is_anchor(&ItemId::from("1")));
        assert!(!catalog.is_anchor(&ItemId::from("2")));
    }

    #[test]
    fn loads_catalog_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{
                "tiers": [
                    {"id": "EX", "rank_order": 0, "pinned_only": true},
                    {"id": "A", "rank_order": 1}
                ],
                "items": [
                    {"id": "1", "name": "Mita", "tier": "EX", "anchor": true},
                    {"id": "2", "name": "Meguro", "tier": "A"}
                ]
            }"#,
        )
        .unwrap();

        let (catalog, tiers) = CatalogFile::load(&path).unwrap().into_parts().unwrap();
        assert_eq!(catalog.list_items().len(), 2);
        assert_eq!(tiers.list_tiers().len(), 2);
    }
}
