use crate::arrangement::Arrangement;
use crate::catalog::{Catalog, CatalogEntry};
use crate::model::{Item, ItemId, Tier, TierId};
use crate::planner::PinRules;
use crate::tiers::TierRegistry;

/// Tiers: `EX` (pinned), `A`, `B`, `C`, `D`.
pub fn sample_tiers() -> TierRegistry {
    let tiers = ["EX", "A", "B", "C", "D"]
        .iter()
        .enumerate()
        .map(|(rank, id)| Tier {
            id: TierId::from(*id),
            rank_order: rank as i64,
            pinned_only: *id == "EX",
            color: "#FFFFFF".to_string(),
        })
        .collect();
    TierRegistry::new(tiers).expect("sample tiers are valid")
}

/// `EX [Mita]`, `A [P1 P2 P3]`, `B [X Y]`, `C [Z]`, `D []`.
pub fn sample_catalog() -> Catalog {
    let layout = [
        ("Mita", "EX"),
        ("P1", "A"),
        ("P2", "A"),
        ("P3", "A"),
        ("X", "B"),
        ("Y", "B"),
        ("Z", "C"),
    ];
    let entries = layout
        .iter()
        .map(|(id, tier)| CatalogEntry {
            id: ItemId::from(*id),
            name: format!("{} shop", id),
            seed_tier: TierId::from(*tier),
            anchor: *id == "Mita",
            retired: false,
        })
        .collect();
    Catalog::new(entries, &sample_tiers()).expect("sample catalog is valid")
}

pub fn sample_arrangement() -> Arrangement {
    sample_catalog()
        .seed_arrangement(&sample_tiers())
        .expect("sample arrangement is valid")
}

pub fn sample_rules() -> PinRules {
    PinRules::new(&sample_catalog(), &sample_tiers())
}

pub fn ids(items: &[Item]) -> Vec<String> {
    items.iter().map(|i| i.id.to_string()).collect()
}
