//! # Move Planner
//!
//! Turns what a UI observed ("item X was dropped onto Y") into a validated
//! [`Move`] and the minimal list of [`Delta`]s that persist it.
//!
//! ## Drop resolution
//!
//! | Drop target        | Resolves to                                             |
//! |--------------------|---------------------------------------------------------|
//! | `Outside`          | nothing: no move, no error                              |
//! | `Item(t)`          | `t`'s tier at `t`'s position; same tier moving forward  |
//! |                    | takes one off, since the source slot disappears first   |
//! | `Tier(t)`          | end of `t`                                              |
//!
//! ## Clamping
//!
//! Cross-tier targets are clamped into `0..=len`, same-tier targets into
//! `0..len`, where `len` is the target tier's current size.
//!
//! ## Validation order
//!
//! Unknown item, unknown tier, anchor leaving the pinned tier, foreign item
//! entering the pinned tier. The first failing check is reported.

use crate::arrangement::Arrangement;
use crate::catalog::Catalog;
use crate::error::{Result, TierzError};
use crate::model::{Delta, ItemId, Move, TierId};
use crate::tiers::TierRegistry;

/// The pin relation: which item is the anchor and which tier it is confined to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinRules {
    pub anchor: Option<ItemId>,
    pub pinned_tier: Option<TierId>,
}

impl PinRules {
    pub fn new(catalog: &Catalog, tiers: &TierRegistry) -> Self {
        Self {
            anchor: catalog.anchor().map(|e| e.id.clone()),
            pinned_tier: tiers.pinned_tier().map(|t| t.id.clone()),
        }
    }

    fn is_anchor(&self, id: &ItemId) -> bool {
        self.anchor.as_ref() == Some(id)
    }

    fn is_pinned(&self, tier: &TierId) -> bool {
        self.pinned_tier.as_ref() == Some(tier)
    }

    /// Rejects moves that break the pin relation.
    pub fn check(&self, item: &ItemId, current: &TierId, target: &TierId) -> Result<()> {
        if self.is_anchor(item) && !self.is_pinned(target) {
            return Err(TierzError::AnchorImmovable {
                item: item.clone(),
                tier: self.pinned_tier.clone().unwrap_or_else(|| current.clone()),
            });
        }
        if self.is_pinned(target) && !self.is_anchor(item) {
            return Err(TierzError::TierRestricted {
                item: item.clone(),
                tier: target.clone(),
            });
        }
        Ok(())
    }
}

/// Where a dragged item was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Onto a tier row, outside any item: append.
    Tier(TierId),
    /// Onto another item: take its place.
    Item(ItemId),
    /// Not over anything recognized.
    Outside,
}

/// A validated move and the deltas that persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub mv: Move,
    pub deltas: Vec<Delta>,
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Resolves a drop into a raw move. `None` means nothing should happen.
pub fn resolve_drop(
    arrangement: &Arrangement,
    item: &ItemId,
    target: &DropTarget,
) -> Result<Option<Move>> {
    let source_tier = arrangement
        .tier_of(item)
        .ok_or_else(|| TierzError::ItemNotFound(item.clone()))?;
    let source_pos = arrangement.position_of(item).unwrap_or(0);

    match target {
        DropTarget::Outside => Ok(None),
        DropTarget::Item(onto) if onto == item => Ok(None),
        DropTarget::Item(onto) => {
            let tier = arrangement
                .tier_of(onto)
                .ok_or_else(|| TierzError::ItemNotFound(onto.clone()))?;
            let mut position = arrangement.position_of(onto).unwrap_or(0);
            if tier == source_tier && position > source_pos {
                position -= 1;
            }
            Ok(Some(Move::new(item.clone(), tier.clone(), position)))
        }
        DropTarget::Tier(tier) => {
            let len = arrangement
                .tier_len(tier)
                .ok_or_else(|| TierzError::TierNotFound(tier.clone()))?;
            let position = if tier == source_tier {
                len.saturating_sub(1)
            } else {
                len
            };
            Ok(Some(Move::new(item.clone(), tier.clone(), position)))
        }
    }
}

/// Clamps the target position for the kind of move. Assumes the item and tier exist.
pub fn normalize(arrangement: &Arrangement, mv: &Move) -> Move {
    let len = arrangement.tier_len(&mv.target_tier).unwrap_or(0);
    let same_tier = arrangement.tier_of(&mv.item_id) == Some(&mv.target_tier);
    let max = if same_tier { len.saturating_sub(1) } else { len };
    Move {
        target_position: mv.target_position.min(max),
        ..mv.clone()
    }
}

/// Validates `mv` against the arrangement and pin rules and computes its deltas.
pub fn plan(arrangement: &Arrangement, rules: &PinRules, mv: &Move) -> Result<Plan> {
    let current = arrangement
        .tier_of(&mv.item_id)
        .ok_or_else(|| TierzError::ItemNotFound(mv.item_id.clone()))?;
    if !arrangement.has_tier(&mv.target_tier) {
        return Err(TierzError::TierNotFound(mv.target_tier.clone()));
    }
    rules.check(&mv.item_id, current, &mv.target_tier)?;

    let mv = normalize(arrangement, mv);
    let spliced = arrangement.splice(&mv.item_id, &mv.target_tier, mv.target_position)?;
    let deltas = arrangement.diff(&spliced);

    tracing::debug!(
        item = %mv.item_id,
        tier = %mv.target_tier,
        position = mv.target_position,
        deltas = deltas.len(),
        "planned move"
    );
    Ok(Plan { mv, deltas })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_arrangement, sample_rules};

    fn delta(item: &str, tier: &str, pos: usize) -> Delta {
        Delta {
            item_id: item.into(),
            new_tier: tier.into(),
            new_position: pos,
        }
    }

    #[test]
    fn outside_drop_is_noop() {
        let arr = sample_arrangement();
        let res = resolve_drop(&arr, &"P1".into(), &DropTarget::Outside).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn drop_on_self_is_noop() {
        let arr = sample_arrangement();
        let res = resolve_drop(&arr, &"P1".into(), &DropTarget::Item("P1".into())).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn drop_forward_in_same_tier_decrements() {
        let arr = sample_arrangement();
        // P1@0 dropped onto P3@2 -> lands at 1 (P2 P1 P3)
        let mv = resolve_drop(&arr, &"P1".into(), &DropTarget::Item("P3".into()))
            .unwrap()
            .unwrap();
        assert_eq!(mv.target_position, 1);

        let plan = plan(&arr, &sample_rules(), &mv).unwrap();
        let mut after = arr.clone();
        after.apply_deltas(&plan.deltas).unwrap();
        let order: Vec<String> = after
            .items_in_tier(&"A".into())
            .unwrap()
            .iter()
            .map(|i| i.id.to_string())
            .collect();
        assert_eq!(order, vec!["P2", "P1", "P3"]);
    }

    #[test]
    fn drop_backward_in_same_tier_takes_target_slot() {
        let arr = sample_arrangement();
        let mv = resolve_drop(&arr, &"P3".into(), &DropTarget::Item("P1".into()))
            .unwrap()
            .unwrap();
        assert_eq!(mv.target_position, 0);
    }

    #[test]
    fn drop_on_item_in_other_tier_takes_its_slot() {
        let arr = sample_arrangement();
        let mv = resolve_drop(&arr, &"X".into(), &DropTarget::Item("P2".into()))
            .unwrap()
            .unwrap();
        assert_eq!(mv, Move::new("X".into(), "A".into(), 1));
    }

    #[test]
    fn drop_on_tier_appends() {
        let arr = sample_arrangement();
        let cross = resolve_drop(&arr, &"X".into(), &DropTarget::Tier("A".into()))
            .unwrap()
            .unwrap();
        assert_eq!(cross.target_position, 3);

        let same = resolve_drop(&arr, &"P1".into(), &DropTarget::Tier("A".into()))
            .unwrap()
            .unwrap();
        assert_eq!(same.target_position, 2);
    }

    #[test]
    fn drop_resolution_reports_unknown_targets() {
        let arr = sample_arrangement();
        assert!(matches!(
            resolve_drop(&arr, &"P1".into(), &DropTarget::Tier("Q".into())),
            Err(TierzError::TierNotFound(_))
        ));
        assert!(matches!(
            resolve_drop(&arr, &"ghost".into(), &DropTarget::Outside),
            Err(TierzError::ItemNotFound(_))
        ));
    }

    #[test]
    fn normalize_clamps_by_move_kind() {
        let arr = sample_arrangement();
        let same = normalize(&arr, &Move::new("P1".into(), "A".into(), 10));
        assert_eq!(same.target_position, 2);
        let cross = normalize(&arr, &Move::new("P1".into(), "C".into(), 10));
        assert_eq!(cross.target_position, 1);
        let empty = normalize(&arr, &Move::new("P1".into(), "D".into(), 4));
        assert_eq!(empty.target_position, 0);
    }

    #[test]
    fn same_tier_plan_covers_shifted_siblings() {
        let arr = sample_arrangement();
        let plan = plan(&arr, &sample_rules(), &Move::new("P3".into(), "A".into(), 0)).unwrap();
        assert_eq!(
            plan.deltas,
            vec![delta("P3", "A", 0), delta("P1", "A", 1), delta("P2", "A", 2)]
        );
    }

    #[test]
    fn cross_tier_plan_covers_both_tiers() {
        let arr = sample_arrangement();
        let plan = plan(&arr, &sample_rules(), &Move::new("X".into(), "C".into(), 1)).unwrap();
        assert_eq!(plan.deltas, vec![delta("Y", "B", 0), delta("X", "C", 1)]);
    }

    #[test]
    fn unchanged_target_plans_no_deltas() {
        let arr = sample_arrangement();
        let plan = plan(&arr, &sample_rules(), &Move::new("P2".into(), "A".into(), 1)).unwrap();
        assert!(plan.is_noop());

        let anchor = plan_anchor_in_place(&arr);
        assert!(anchor.is_noop());
    }

    fn plan_anchor_in_place(arr: &Arrangement) -> Plan {
        plan(arr, &sample_rules(), &Move::new("Mita".into(), "EX".into(), 0)).unwrap()
    }

    #[test]
    fn validation_checks_not_found_before_pin_rules() {
        let arr = sample_arrangement();
        let err = plan(&arr, &sample_rules(), &Move::new("Mita".into(), "Q".into(), 0)).unwrap_err();
        assert!(matches!(err, TierzError::TierNotFound(_)));
    }

    #[test]
    fn pin_rules_without_anchor_close_the_pinned_tier() {
        let rules = PinRules {
            anchor: None,
            pinned_tier: Some("EX".into()),
        };
        let err = rules
            .check(&"P1".into(), &"A".into(), &"EX".into())
            .unwrap_err();
        assert!(matches!(err, TierzError::TierRestricted { .. }));
        rules.check(&"P1".into(), &"A".into(), &"B".into()).unwrap();
    }
}
