//! # Tier Registry
//!
//! The closed, ordered set of tiers. Built once from catalog data and never
//! changed afterwards: there is no API to add or remove a tier.

use crate::error::{Result, TierzError};
use crate::model::{Tier, TierId, TierRecord};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct TierRegistry {
    tiers: Vec<Tier>,
}

impl TierRegistry {
    /// Validates and sorts tiers by rank order.
    ///
    /// Rejects an empty set, duplicate ids and more than one pinned tier.
    pub fn new(mut tiers: Vec<Tier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(TierzError::Catalog("at least one tier is required".into()));
        }

        let mut seen = HashSet::new();
        for tier in &tiers {
            if !seen.insert(tier.id.clone()) {
                return Err(TierzError::Catalog(format!("duplicate tier id {}", tier.id)));
            }
        }

        let pinned = tiers.iter().filter(|t| t.pinned_only).count();
        if pinned > 1 {
            return Err(TierzError::Catalog(format!(
                "{} pinned tiers declared, at most one is allowed",
                pinned
            )));
        }

        // Stable sort keeps declaration order for equal ranks.
        tiers.sort_by_key(|t| t.rank_order);
        Ok(Self { tiers })
    }

    pub fn list_tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn get(&self, id: &TierId) -> Option<&Tier> {
        self.tiers.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TierId) -> bool {
        self.get(id).is_some()
    }

    pub fn pinned_tier(&self) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.pinned_only)
    }

    pub fn is_pinned_tier(&self, id: &TierId) -> bool {
        self.get(id).map(|t| t.pinned_only).unwrap_or(false)
    }

    /// Case-insensitive lookup, for user-typed tier names like `a+` or `ex`.
    pub fn find_by_name(&self, name: &str) -> Option<&Tier> {
        self.tiers
            .iter()
            .find(|t| t.id.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn records(&self) -> Vec<TierRecord> {
        self.tiers
            .iter()
            .map(|t| TierRecord {
                tier_id: t.id.clone(),
                rank_order: t.rank_order,
            })
            .collect()
    }
}
