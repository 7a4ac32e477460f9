use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::persistence::store::KeyValueStore;
use crate::types::BlockPos;

pub const MULTIBLOCK_CACHE_KEY: &str = "multiblock_cache";

/// A structure that was verified once and need not be detected again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiblockCacheEntry {
    pub machine_id: String,
    pub display_name: String,
    pub position: BlockPos,
    pub constructed_at: DateTime<Utc>,
    #[serde(default)]
    pub last_selected_recipe_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStatistics {
    pub total: usize,
    pub by_machine: IndexMap<String, usize>,
}

/// Verified multiblocks keyed by their exact `"x,y,z"` position
pub struct MultiblockCache {
    store: Arc<dyn KeyValueStore>,
    entries: IndexMap<String, MultiblockCacheEntry>,
}

impl MultiblockCache {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.load(MULTIBLOCK_CACHE_KEY) {
            Ok(Some(value)) => {
                match serde_json::from_value::<IndexMap<String, MultiblockCacheEntry>>(value) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!("Ignoring malformed multiblock cache: {}", e);
                        IndexMap::new()
                    }
                }
            }
            Ok(None) => IndexMap::new(),
            Err(e) => {
                error!("Failed to load multiblock cache: {}", e);
                IndexMap::new()
            }
        };

        info!("Multiblock cache loaded with {} structures", entries.len());
        Self { store, entries }
    }

    /// Cache a verified structure, replacing whatever was cached there
    pub fn add(
        &mut self,
        machine_id: &str,
        display_name: &str,
        position: BlockPos,
        constructed_at: DateTime<Utc>,
    ) -> &MultiblockCacheEntry {
        let key = position.key();
        info!("Caching {} at {}", machine_id, position);
        self.entries.insert(
            key.clone(),
            MultiblockCacheEntry {
                machine_id: machine_id.to_string(),
                display_name: display_name.to_string(),
                position,
                constructed_at,
                last_selected_recipe_id: None,
            },
        );
        self.save();
        &self.entries[&key]
    }

    pub fn get_at(&self, position: BlockPos) -> Option<&MultiblockCacheEntry> {
        self.entries.get(&position.key())
    }

    /// Closest cached structure within `radius` blocks of `position`
    pub fn find_nearest(&self, position: BlockPos, radius: i32) -> Option<&MultiblockCacheEntry> {
        let limit = i64::from(radius) * i64::from(radius);
        self.entries
            .values()
            .map(|entry| (entry.position.distance_squared(&position), entry))
            .filter(|(distance, _)| *distance <= limit)
            .min_by_key(|(distance, entry)| (*distance, entry.position))
            .map(|(_, entry)| entry)
    }

    /// Remember the recipe last chosen for the structure at `position`.
    /// Returns false when nothing is cached there.
    pub fn update_recipe(&mut self, position: BlockPos, recipe_id: &str) -> bool {
        let Some(entry) = self.entries.get_mut(&position.key()) else {
            return false;
        };
        if entry.last_selected_recipe_id.as_deref() == Some(recipe_id) {
            return true;
        }
        entry.last_selected_recipe_id = Some(recipe_id.to_string());
        debug!("Structure at {} now uses recipe {}", position, recipe_id);
        self.save();
        true
    }

    pub fn remove(&mut self, position: BlockPos) -> Option<MultiblockCacheEntry> {
        let removed = self.entries.shift_remove(&position.key());
        if removed.is_some() {
            self.save();
        }
        removed
    }

    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.save();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> CacheStatistics {
        let mut by_machine = IndexMap::new();
        for entry in self.entries.values() {
            *by_machine.entry(entry.machine_id.clone()).or_insert(0) += 1;
        }
        CacheStatistics {
            total: self.entries.len(),
            by_machine,
        }
    }

    fn save(&self) {
        let value = match serde_json::to_value(&self.entries) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize multiblock cache: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.persist(MULTIBLOCK_CACHE_KEY, &value) {
            error!("Failed to save multiblock cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::store::InMemoryStore;

    fn timestamp() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_add_get_and_reload() {
        let store = InMemoryStore::new();
        let mut cache = MultiblockCache::load(Arc::new(store.clone()));
        let pos = BlockPos::new(10, 64, -3);

        cache.add("SMELTERY", "Smeltery", pos, timestamp());
        assert_eq!(cache.get_at(pos).unwrap().machine_id, "SMELTERY");
        assert!(cache.get_at(pos.offset(1, 0, 0)).is_none());

        let reloaded = MultiblockCache::load(Arc::new(store.clone()));
        assert_eq!(reloaded.get_at(pos), cache.get_at(pos));
        assert!(store.get(MULTIBLOCK_CACHE_KEY).unwrap().get("10,64,-3").is_some());
    }

    #[test]
    fn test_find_nearest_within_radius() {
        let mut cache = MultiblockCache::load(Arc::new(InMemoryStore::new()));
        cache.add("ORE_WASHER", "Ore Washer", BlockPos::new(8, 0, 0), timestamp());
        cache.add("JUICER", "Juicer", BlockPos::new(3, 0, 0), timestamp());

        let origin = BlockPos::new(0, 0, 0);
        assert_eq!(cache.find_nearest(origin, 10).unwrap().machine_id, "JUICER");
        assert!(cache.find_nearest(origin, 2).is_none());
    }

    #[test]
    fn test_update_recipe_writes_only_on_change() {
        let store = InMemoryStore::new();
        let mut cache = MultiblockCache::load(Arc::new(store.clone()));
        let pos = BlockPos::new(0, 0, 0);
        cache.add("COMPRESSOR", "Compressor", pos, timestamp());

        assert!(cache.update_recipe(pos, "CARBON"));
        assert!(cache.update_recipe(pos, "CARBON"));
        assert!(!cache.update_recipe(BlockPos::new(1, 1, 1), "CARBON"));
        assert_eq!(store.write_count(), 2);
        assert_eq!(
            cache.get_at(pos).unwrap().last_selected_recipe_id.as_deref(),
            Some("CARBON")
        );
    }

    #[test]
    fn test_remove_clear_and_statistics() {
        let mut cache = MultiblockCache::load(Arc::new(InMemoryStore::new()));
        cache.add("SMELTERY", "Smeltery", BlockPos::new(0, 0, 0), timestamp());
        cache.add("SMELTERY", "Smeltery", BlockPos::new(20, 0, 0), timestamp());
        cache.add("JUICER", "Juicer", BlockPos::new(40, 0, 0), timestamp());

        let stats = cache.statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_machine["SMELTERY"], 2);

        assert!(cache.remove(BlockPos::new(20, 0, 0)).is_some());
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
