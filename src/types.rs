use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{normalize_item_id, remove_minecraft_colors};

/// Item id used for empty grid cells and empty slots
pub const AIR: &str = "AIR";

/// Represents an item stack in a container or the player inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Intrinsic item type, e.g. `minecraft:iron_ingot`
    pub item_type: String,
    /// Custom (possibly colored) name, set for content-mod items
    #[serde(default)]
    pub display_name: Option<String>,
    pub count: u32,
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: u32,
}

fn default_max_stack_size() -> u32 {
    64
}

impl ItemStack {
    pub fn new(item_type: impl Into<String>, count: u32) -> Self {
        Self {
            item_type: item_type.into(),
            display_name: None,
            count,
            max_stack_size: default_max_stack_size(),
        }
    }

    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_max_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.item_type.eq_ignore_ascii_case(AIR)
    }

    /// Normalized id used for recipe matching.
    ///
    /// The custom display name wins when present (color codes stripped),
    /// otherwise the item type without its namespace.
    pub fn resolved_id(&self) -> String {
        if let Some(name) = self.display_name.as_deref() {
            let stripped = remove_minecraft_colors(name);
            if !stripped.trim().is_empty() {
                return normalize_item_id(&stripped);
            }
        }

        let intrinsic = self
            .item_type
            .rsplit_once(':')
            .map(|(_, path)| path)
            .unwrap_or(&self.item_type);
        normalize_item_id(intrinsic)
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size
    }
}

/// Integer block position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn distance_squared(&self, other: &BlockPos) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        let dz = i64::from(self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Persistence key, `"x,y,z"`
    pub fn key(&self) -> String {
        format!("{},{},{}", self.x, self.y, self.z)
    }

    pub fn parse_key(key: &str) -> Option<Self> {
        let mut parts = key.split(',').map(|p| p.trim().parse::<i32>());
        let pos = Self::new(
            parts.next()?.ok()?,
            parts.next()?.ok()?,
            parts.next()?.ok()?,
        );
        if parts.next().is_some() {
            return None;
        }
        Some(pos)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_id_prefers_display_name() {
        let stack = ItemStack::new("minecraft:glowstone_dust", 3).named("§6Gold Dust");
        assert_eq!(stack.resolved_id(), "GOLD_DUST");
    }

    #[test]
    fn test_resolved_id_falls_back_to_item_type() {
        assert_eq!(ItemStack::new("minecraft:oak_log", 1).resolved_id(), "OAK_LOG");
        assert_eq!(ItemStack::new("WOOD", 1).resolved_id(), "WOOD");
        assert_eq!(
            ItemStack::new("minecraft:stick", 1).named("§r").resolved_id(),
            "STICK"
        );
    }

    #[test]
    fn test_block_pos_key_round_trip() {
        let pos = BlockPos::new(-12, 64, 300);
        assert_eq!(pos.key(), "-12,64,300");
        assert_eq!(BlockPos::parse_key(&pos.key()), Some(pos));
        assert_eq!(BlockPos::parse_key("1,2"), None);
        assert_eq!(BlockPos::parse_key("1,2,3,4"), None);
    }
}
