/// Host-side interfaces the automation core reads from and acts through.
///
/// The game client implements these; the core never touches the live game
/// state directly. Every action method is one click-equivalent and is
/// fire-and-forget: a returned error is logged by the caller and the next
/// tick's rescans reconcile whatever actually happened.
use anyhow::Result;
use serde_json::Value as JsonValue;

use crate::types::{BlockPos, ItemStack};

/// Read-only view of what the player carries
pub trait PlayerInventory {
    /// Non-empty player stacks as `(player slot index, stack)`, where the
    /// index is the one accepted by [`InventoryActions::transfer_player_stack_to_slot`]
    fn player_stacks(&self) -> Vec<(usize, ItemStack)>;
}

/// The machine container screen currently open
pub trait OpenContainer {
    /// Stack in a container slot, `None` when the slot is empty
    fn slot(&self, index: usize) -> Option<ItemStack>;

    /// Number of container (non-player) slots
    fn slot_count(&self) -> usize;
}

pub trait InventoryActions {
    /// Quick-move the stack in a container slot into the player inventory
    fn transfer_slot_to_player(&mut self, slot: usize) -> Result<()>;

    /// Move a player stack into a container slot
    fn transfer_player_stack_to_slot(&mut self, player_slot: usize, target_slot: usize)
        -> Result<()>;
}

pub trait WorldView {
    /// Block ids (e.g. `minecraft:oak_fence`) in the cube of `radius` around
    /// `center`. Air may be omitted.
    fn scan_blocks(&self, center: BlockPos, radius: i32) -> Vec<(BlockPos, String)>;
}

pub trait WorldActions {
    /// One right-click-equivalent on a world position
    fn trigger_interaction(&mut self, pos: BlockPos) -> Result<()>;
}

/// Everything the automation core needs from the host
pub trait GameClient: PlayerInventory + OpenContainer + InventoryActions + WorldView + WorldActions {}

impl<T> GameClient for T where
    T: PlayerInventory + OpenContainer + InventoryActions + WorldView + WorldActions
{
}

/// Extract the plain text of a container title.
///
/// Titles may arrive as chat components like
/// `{"text":"","extra":[{"text":"Electric Furnace"}]}`; the first `extra`
/// text wins, then `translate`, then `text`. Anything else is returned as-is.
pub fn parse_container_title(raw_title: &str) -> String {
    let Ok(json) = serde_json::from_str::<JsonValue>(raw_title) else {
        return raw_title.to_string();
    };

    let from_extra = json
        .get("extra")
        .and_then(JsonValue::as_array)
        .and_then(|extra| extra.first())
        .and_then(|first| first.get("text").or(Some(first)))
        .and_then(JsonValue::as_str);
    if let Some(text) = from_extra {
        return text.to_string();
    }

    if let Some(translate) = json.get("translate").and_then(JsonValue::as_str) {
        return translate.to_string();
    }

    match json.get("text").and_then(JsonValue::as_str) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => match json.as_str() {
            Some(text) => text.to_string(),
            None => raw_title.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_container_title_json_extra() {
        let raw = r#"{"text":"","extra":[{"text":"Electric Furnace"}]}"#;
        assert_eq!(parse_container_title(raw), "Electric Furnace");
    }

    #[test]
    fn test_parse_container_title_translate_and_text() {
        assert_eq!(
            parse_container_title(r#"{"translate":"container.dispenser"}"#),
            "container.dispenser"
        );
        assert_eq!(parse_container_title(r#"{"text":"§cOre Washer"}"#), "§cOre Washer");
        assert_eq!(parse_container_title(r#""Juicer""#), "Juicer");
    }

    #[test]
    fn test_parse_container_title_plain() {
        assert_eq!(parse_container_title("§8Electric Furnace"), "§8Electric Furnace");
    }
}
