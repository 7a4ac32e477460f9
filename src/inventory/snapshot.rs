/// Point-in-time view of the player's carried items
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::gui::PlayerInventory;
use crate::types::ItemStack;
use crate::utils::normalize_item_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub slot: usize,
    /// Resolved, normalized id (see [`ItemStack::resolved_id`])
    pub item_id: String,
    pub count: u32,
    pub max_stack_size: u32,
}

/// Immutable ordered list of non-empty player stacks. Never mutated, only
/// re-captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    entries: Vec<SnapshotEntry>,
}

impl InventorySnapshot {
    pub fn from_stacks<I>(stacks: I) -> Self
    where
        I: IntoIterator<Item = (usize, ItemStack)>,
    {
        let entries = stacks
            .into_iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(slot, stack)| SnapshotEntry {
                slot,
                item_id: stack.resolved_id(),
                count: stack.count,
                max_stack_size: stack.max_stack_size,
            })
            .collect();
        Self { entries }
    }

    pub fn capture<P: PlayerInventory + ?Sized>(inventory: &P) -> Self {
        Self::from_stacks(inventory.player_stacks())
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total count of stacks matching `item_id` (case-insensitive)
    pub fn count_of(&self, item_id: &str) -> u32 {
        let wanted = normalize_item_id(item_id);
        self.entries
            .iter()
            .filter(|e| e.item_id.eq_ignore_ascii_case(&wanted))
            .map(|e| e.count)
            .sum()
    }

    /// First player slot holding `item_id`
    pub fn first_slot_of(&self, item_id: &str) -> Option<usize> {
        let wanted = normalize_item_id(item_id);
        self.entries
            .iter()
            .find(|e| e.item_id.eq_ignore_ascii_case(&wanted))
            .map(|e| e.slot)
    }

    pub fn contains_any<'a, I>(&self, item_ids: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        item_ids.into_iter().any(|id| self.count_of(id) > 0)
    }

    /// Cheap, collision-tolerant signature: wrapping sum of
    /// `hash(item_id) + count` over every stack. Order-insensitive.
    pub fn fingerprint(&self) -> u64 {
        self.entries.iter().fold(0u64, |acc, entry| {
            let mut hasher = DefaultHasher::new();
            entry.item_id.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
                .wrapping_add(u64::from(entry.count))
        })
    }
}
