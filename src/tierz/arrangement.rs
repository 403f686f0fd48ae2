//! # Arrangement Store
//!
//! The authoritative in-memory placement of items into tiers.
//!
//! Each tier keeps an ordered `Vec<ItemId>`; an item's position *is* its index
//! in that vector, so positions are always contiguous from zero and there is
//! nothing to keep in sync by hand.
//!
//! ## Mutation
//!
//! There is one transition: [`Arrangement::apply_move`]. It plans the move
//! (validation, clamping, delta computation in [`crate::planner`]) and then
//! applies the resulting deltas with [`Arrangement::apply_deltas`]. Planning
//! and applying share [`Arrangement::splice`], so the position arithmetic
//! exists in exactly one place:
//!
//! ```text
//! same tier:   remove item, insert at target      [P1 P2 P3] -(P3→0)-> [P3 P1 P2]
//! cross tier:  remove from source (later items
//!              shift down), insert into dest      B [X Y]  C [Z] -(X→C@1)-> B [Y]  C [Z X]
//!              (items at/after target shift up)
//! ```
//!
//! A failed move leaves the arrangement untouched.

use crate::error::{Result, TierzError};
use crate::model::{Delta, Item, ItemId, ItemRecord, Move, Tier, TierId, TierRow};
use crate::planner::{self, PinRules};
use crate::tiers::TierRegistry;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    /// Tiers in rank order.
    tiers: Vec<Tier>,
    order: HashMap<TierId, Vec<ItemId>>,
    names: HashMap<ItemId, String>,
    tier_of: HashMap<ItemId, TierId>,
}

/// New orderings for the tiers touched by a splice.
#[derive(Debug, Clone)]
pub(crate) struct Spliced {
    pub(crate) tiers: Vec<(TierId, Vec<ItemId>)>,
}

impl Arrangement {
    /// An arrangement with every tier of the registry and no items.
    pub fn empty(tiers: &TierRegistry) -> Self {
        let tiers: Vec<Tier> = tiers.list_tiers().to_vec();
        let order = tiers.iter().map(|t| (t.id.clone(), Vec::new())).collect();
        Self {
            tiers,
            order,
            names: HashMap::new(),
            tier_of: HashMap::new(),
        }
    }

    /// Appends an item to the end of `tier`. Used while building an arrangement
    /// from seed data or stored records.
    pub fn push(&mut self, id: ItemId, name: String, tier: &TierId) -> Result<()> {
        if self.tier_of.contains_key(&id) {
            return Err(TierzError::Api(format!("item {} placed twice", id)));
        }
        let slots = self
            .order
            .get_mut(tier)
            .ok_or_else(|| TierzError::TierNotFound(tier.clone()))?;
        slots.push(id.clone());
        self.tier_of.insert(id.clone(), tier.clone());
        self.names.insert(id, name);
        Ok(())
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn has_tier(&self, tier: &TierId) -> bool {
        self.order.contains_key(tier)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.tier_of.contains_key(id)
    }

    /// Number of placed items.
    pub fn len(&self) -> usize {
        self.tier_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tier_of.is_empty()
    }

    pub fn tier_len(&self, tier: &TierId) -> Option<usize> {
        self.order.get(tier).map(|slots| slots.len())
    }

    pub fn tier_of(&self, id: &ItemId) -> Option<&TierId> {
        self.tier_of.get(id)
    }

    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        let tier = self.tier_of.get(id)?;
        self.order.get(tier)?.iter().position(|i| i == id)
    }

    pub fn item(&self, id: &ItemId) -> Option<Item> {
        let tier = self.tier_of.get(id)?;
        let position = self.position_of(id)?;
        Some(Item {
            id: id.clone(),
            name: self.names.get(id).cloned().unwrap_or_default(),
            tier: tier.clone(),
            position,
        })
    }

    /// Items of `tier` ordered by position.
    pub fn items_in_tier(&self, tier: &TierId) -> Result<Vec<Item>> {
        let slots = self
            .order
            .get(tier)
            .ok_or_else(|| TierzError::TierNotFound(tier.clone()))?;
        Ok(slots
            .iter()
            .enumerate()
            .map(|(position, id)| Item {
                id: id.clone(),
                name: self.names.get(id).cloned().unwrap_or_default(),
                tier: tier.clone(),
                position,
            })
            .collect())
    }

    /// Every tier in rank order with its items.
    pub fn view(&self) -> Vec<TierRow> {
        self.tiers
            .iter()
            .map(|tier| TierRow {
                tier: tier.clone(),
                items: self.items_in_tier(&tier.id).unwrap_or_default(),
            })
            .collect()
    }

    /// Plans and applies `mv`, returning the updated view.
    pub fn apply_move(&mut self, mv: &Move, rules: &PinRules) -> Result<Vec<TierRow>> {
        let plan = planner::plan(self, rules, mv)?;
        self.apply_deltas(&plan.deltas)?;
        Ok(self.view())
    }

    /// Applies a planned delta set.
    ///
    /// Items not named by a delta keep their tier and position. The result must
    /// leave every touched tier contiguous, otherwise nothing is applied.
    pub fn apply_deltas(&mut self, deltas: &[Delta]) -> Result<()> {
        if deltas.is_empty() {
            return Ok(());
        }

        let mut target: HashMap<&ItemId, (&TierId, usize)> = HashMap::new();
        for delta in deltas {
            if !self.tier_of.contains_key(&delta.item_id) {
                return Err(TierzError::ItemNotFound(delta.item_id.clone()));
            }
            if !self.order.contains_key(&delta.new_tier) {
                return Err(TierzError::TierNotFound(delta.new_tier.clone()));
            }
            target.insert(&delta.item_id, (&delta.new_tier, delta.new_position));
        }

        let mut touched: Vec<TierId> = Vec::new();
        for delta in deltas {
            for tier in [&self.tier_of[&delta.item_id], &delta.new_tier] {
                if !touched.contains(tier) {
                    touched.push(tier.clone());
                }
            }
        }

        let mut rebuilt: Vec<(TierId, Vec<ItemId>)> = Vec::new();
        for tier in &touched {
            let mut placed: Vec<(usize, ItemId)> = Vec::new();
            for (id, current) in &self.tier_of {
                let (final_tier, final_pos) = match target.get(id) {
                    Some((t, p)) => (*t, *p),
                    None => (current, self.position_of(id).unwrap_or(usize::MAX)),
                };
                if final_tier == tier {
                    placed.push((final_pos, id.clone()));
                }
            }
            placed.sort_by(|a, b| a.0.cmp(&b.0));

            let contiguous = placed.iter().enumerate().all(|(i, (pos, _))| i == *pos);
            if !contiguous {
                return Err(TierzError::Api(format!(
                    "deltas leave tier {} with gaps or duplicate positions",
                    tier
                )));
            }
            rebuilt.push((tier.clone(), placed.into_iter().map(|(_, id)| id).collect()));
        }

        for (tier, slots) in rebuilt {
            for id in &slots {
                self.tier_of.insert(id.clone(), tier.clone());
            }
            self.order.insert(tier, slots);
        }
        Ok(())
    }

    /// Removes `item` from its tier and inserts it into `tier` at `position`.
    ///
    /// `position` must already be clamped for the kind of move (see
    /// [`crate::planner::normalize`]). Returns the new orderings of the touched
    /// tiers without modifying `self`.
    pub(crate) fn splice(&self, item: &ItemId, tier: &TierId, position: usize) -> Result<Spliced> {
        let source = self
            .tier_of
            .get(item)
            .ok_or_else(|| TierzError::ItemNotFound(item.clone()))?;
        let mut source_slots = self.order[source].clone();
        source_slots.retain(|id| id != item);

        if source == tier {
            let at = position.min(source_slots.len());
            source_slots.insert(at, item.clone());
            return Ok(Spliced {
                tiers: vec![(source.clone(), source_slots)],
            });
        }

        let mut dest_slots = self
            .order
            .get(tier)
            .ok_or_else(|| TierzError::TierNotFound(tier.clone()))?
            .clone();
        let at = position.min(dest_slots.len());
        dest_slots.insert(at, item.clone());

        Ok(Spliced {
            tiers: vec![(source.clone(), source_slots), (tier.clone(), dest_slots)],
        })
    }

    /// Deltas turning the current state into `spliced`: one per item whose
    /// tier or position changes.
    pub(crate) fn diff(&self, spliced: &Spliced) -> Vec<Delta> {
        let mut deltas = Vec::new();
        for (tier, slots) in &spliced.tiers {
            for (position, id) in slots.iter().enumerate() {
                let unchanged = self.tier_of.get(id) == Some(tier)
                    && self.position_of(id) == Some(position);
                if !unchanged {
                    deltas.push(Delta {
                        item_id: id.clone(),
                        new_tier: tier.clone(),
                        new_position: position,
                    });
                }
            }
        }
        deltas
    }

    /// One-based ordinals a picker can offer for placing `item` into `tier`:
    /// `1..=n` within its own tier, `1..=n+1` for any other tier.
    pub fn position_options(&self, item: &ItemId, tier: &TierId) -> Result<Vec<usize>> {
        let current = self
            .tier_of
            .get(item)
            .ok_or_else(|| TierzError::ItemNotFound(item.clone()))?;
        let len = self
            .tier_len(tier)
            .ok_or_else(|| TierzError::TierNotFound(tier.clone()))?;
        let upper = if current == tier { len } else { len + 1 };
        Ok((1..=upper).collect())
    }

    /// Verifies structural and pin invariants.
    pub fn check_invariants(&self, rules: &PinRules) -> Result<()> {
        let mut seen = 0;
        for (tier, slots) in &self.order {
            for id in slots {
                seen += 1;
                if self.tier_of.get(id) != Some(tier) {
                    return Err(TierzError::Api(format!(
                        "item {} listed in tier {} but recorded elsewhere",
                        id, tier
                    )));
                }
            }
        }
        if seen != self.tier_of.len() {
            return Err(TierzError::Api(
                "an item appears in more than one tier".to_string(),
            ));
        }

        if let Some(pinned) = &rules.pinned_tier {
            if let Some(slots) = self.order.get(pinned) {
                if let Some(intruder) = slots.iter().find(|id| Some(*id) != rules.anchor.as_ref()) {
                    return Err(TierzError::TierRestricted {
                        item: intruder.clone(),
                        tier: pinned.clone(),
                    });
                }
            }
            if let Some(anchor) = &rules.anchor {
                if let Some(tier) = self.tier_of.get(anchor) {
                    if tier != pinned {
                        return Err(TierzError::AnchorImmovable {
                            item: anchor.clone(),
                            tier: pinned.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Snapshot of every placement as store documents.
    pub fn records(&self, updated_at: DateTime<Utc>) -> Vec<ItemRecord> {
        self.view()
            .iter()
            .flat_map(|row| row.items.iter())
            .map(|item| ItemRecord::from_item(item, updated_at))
            .collect()
    }
}
