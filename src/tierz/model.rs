//! # Domain Model
//!
//! Core value types shared by every layer: identifiers, [`Item`], [`Tier`],
//! the ephemeral [`Move`] and the persisted [`Delta`] / [`ItemRecord`].
//!
//! ## Positions
//!
//! Positions are zero-based. For a tier holding `n` items the positions are
//! exactly `0..n`, no gaps, no duplicates. Only the arrangement store assigns
//! them; everything else reads them. UIs that show one-based ordinals convert
//! at their own boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(String);

impl TierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TierId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub tier: TierId,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    pub rank_order: i64,
    /// Only the catalog's anchor item may be placed here.
    #[serde(default)]
    pub pinned_only: bool,
    /// Display color as `#RRGGBB`.
    #[serde(default)]
    pub color: String,
}

/// A request to put `item_id` at `target_position` of `target_tier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub item_id: ItemId,
    pub target_tier: TierId,
    pub target_position: usize,
}

impl Move {
    pub fn new(item_id: ItemId, target_tier: TierId, target_position: usize) -> Self {
        Self {
            item_id,
            target_tier,
            target_position,
        }
    }
}

/// A single item's new placement, as produced by planning and written by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub item_id: ItemId,
    pub new_tier: TierId,
    pub new_position: usize,
}

/// Per-item document as kept by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub item_id: ItemId,
    pub name: String,
    pub tier_id: TierId,
    pub position: usize,
    pub updated_at: DateTime<Utc>,
}

impl ItemRecord {
    pub fn from_item(item: &Item, updated_at: DateTime<Utc>) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            tier_id: item.tier.clone(),
            position: item.position,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRecord {
    pub tier_id: TierId,
    pub rank_order: i64,
}

/// One rendered tier: the tier itself and its items in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierRow {
    pub tier: Tier,
    pub items: Vec<Item>,
}

/// Read-only handle to the rendered arrangement, handed to export collaborators.
///
/// `revision` increases with every accepted change so a rasterizer can tell
/// whether its last capture is still current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRoot {
    pub id: String,
    pub revision: u64,
}
