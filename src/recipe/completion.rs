use indexmap::IndexMap;

use crate::inventory::InventorySnapshot;
use crate::recipe::model::GroupedRequirements;

/// Completion of one recipe against one inventory snapshot.
///
/// `can_craft` holds exactly when `missing` is empty. `available` only lists
/// items the player actually has.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeSummary {
    pub required: GroupedRequirements,
    pub available: IndexMap<String, u32>,
    pub missing: IndexMap<String, u32>,
    pub can_craft: bool,
    pub max_crafts: u32,
    pub completion_ratio: f64,
}

impl RecipeSummary {
    pub fn completion_percent(&self) -> u32 {
        (self.completion_ratio * 100.0).round() as u32
    }

    pub fn total_missing(&self) -> u32 {
        self.missing.values().sum()
    }
}

/// Summarize `required` against `inventory`. Pure: same inputs, same output.
pub fn summarize(inventory: &InventorySnapshot, required: &GroupedRequirements) -> RecipeSummary {
    let required: GroupedRequirements = required
        .iter()
        .filter(|(_, amount)| **amount > 0)
        .map(|(id, amount)| (id.clone(), *amount))
        .collect();

    let mut available = IndexMap::new();
    let mut missing = IndexMap::new();
    let mut satisfied: u64 = 0;
    let mut total: u64 = 0;
    let mut max_crafts: Option<u32> = None;

    for (item_id, &needed) in &required {
        let have = inventory.count_of(item_id);
        if have > 0 {
            available.insert(item_id.clone(), have);
        }
        if have < needed {
            missing.insert(item_id.clone(), needed - have);
        }

        satisfied += u64::from(have.min(needed));
        total += u64::from(needed);

        let crafts = have / needed;
        max_crafts = Some(max_crafts.map_or(crafts, |current| current.min(crafts)));
    }

    let completion_ratio = if total == 0 {
        0.0
    } else {
        satisfied as f64 / total as f64
    };

    RecipeSummary {
        can_craft: missing.is_empty(),
        max_crafts: max_crafts.unwrap_or(0),
        completion_ratio,
        required,
        available,
        missing,
    }
}
