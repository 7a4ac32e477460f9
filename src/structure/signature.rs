use indexmap::IndexMap;

use crate::structure::materials::normalize_material;
use crate::utils::normalize_item_id;

/// Built-in signature sets. The first material is the block the auto-clicker
/// right-clicks to run the machine.
const DEFAULT_SIGNATURES: &[(&str, &[&str])] = &[
    ("ARMOR_FORGE", &["ANVIL"]),
    ("GRIND_STONE", &["FENCE"]),
    ("MAGIC_WORKBENCH", &["BOOKSHELF"]),
    ("ENHANCED_CRAFTING_TABLE", &["CRAFTING_TABLE"]),
    ("ORE_CRUSHER", &["IRON_BARS", "NETHER_BRICK_FENCE"]),
    ("COMPRESSOR", &["PISTON", "NETHER_BRICK_FENCE"]),
    ("SMELTERY", &["NETHER_BRICK_FENCE", "NETHER_BRICK"]),
    ("MAKESHIFT_SMELTERY", &["FURNACE"]),
    ("PRESSURE_CHAMBER", &["SMOOTH_STONE_SLAB", "PISTON", "GLASS"]),
    ("ORE_WASHER", &["CAULDRON", "FENCE"]),
    ("AUTOMATED_PANNING_MACHINE", &["CAULDRON", "TRAP_DOOR"]),
    ("JUICER", &["GLASS", "NETHER_BRICK_FENCE"]),
    ("ANCIENT_ALTAR", &["ENCHANTING_TABLE"]),
    ("TABLE_SAW", &["SMOOTH_STONE_SLAB", "STONECUTTER"]),
];

/// Machine id -> characteristic materials
#[derive(Debug, Clone)]
pub struct SignatureTable {
    sets: IndexMap<String, Vec<String>>,
}

impl SignatureTable {
    pub fn empty() -> Self {
        Self {
            sets: IndexMap::new(),
        }
    }

    /// Built-in sets with `overrides` replacing (or adding) whole entries
    pub fn with_overrides(overrides: &IndexMap<String, Vec<String>>) -> Self {
        let mut table = Self::default();
        for (machine_id, materials) in overrides {
            table.insert(machine_id, materials.iter().map(String::as_str));
        }
        table
    }

    pub fn insert<'a, I>(&mut self, machine_id: &str, materials: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let materials: Vec<String> = materials.into_iter().map(normalize_material).collect();
        self.sets.insert(normalize_item_id(machine_id), materials);
    }

    pub fn signature(&self, machine_id: &str) -> Option<&[String]> {
        self.sets
            .get(&normalize_item_id(machine_id))
            .map(Vec::as_slice)
            .filter(|set| !set.is_empty())
    }

    /// Block the auto-clicker interacts with for this machine
    pub fn trigger_material(&self, machine_id: &str) -> Option<&str> {
        self.signature(machine_id)
            .and_then(|set| set.first())
            .map(String::as_str)
    }
}

impl Default for SignatureTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (machine_id, materials) in DEFAULT_SIGNATURES {
            table.insert(machine_id, materials.iter().copied());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_triggers() {
        let table = SignatureTable::default();
        assert_eq!(table.trigger_material("smeltery"), Some("NETHER_BRICK_FENCE"));
        assert_eq!(table.trigger_material("ANCIENT_ALTAR"), Some("ENCHANTING_TABLE"));
        assert_eq!(table.trigger_material("UNKNOWN"), None);
    }

    #[test]
    fn test_overrides_replace_entries_and_normalize() {
        let mut overrides = IndexMap::new();
        overrides.insert("JUICER".to_string(), vec!["minecraft:lime_stained_glass".to_string()]);
        overrides.insert("CUSTOM".to_string(), vec![]);
        let table = SignatureTable::with_overrides(&overrides);
        assert_eq!(table.signature("JUICER"), Some(&["GLASS".to_string()][..]));
        assert_eq!(table.signature("CUSTOM"), None);
        assert_eq!(table.trigger_material("ARMOR_FORGE"), Some("ANVIL"));
    }
}
