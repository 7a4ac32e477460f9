use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::persistence::store::KeyValueStore;
use crate::utils::normalize_item_id;

pub const RECIPE_MEMORY_KEY: &str = "recipe_memory";

/// Last manually selected recipe per machine.
///
/// Held in memory and written through to the store on every change. Store
/// failures are logged and otherwise ignored.
pub struct RecipeMemory {
    store: Arc<dyn KeyValueStore>,
    entries: IndexMap<String, String>,
}

impl RecipeMemory {
    /// Load from `store`; unreadable or malformed data yields an empty memory
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.load(RECIPE_MEMORY_KEY) {
            Ok(Some(value)) => match serde_json::from_value::<IndexMap<String, String>>(value) {
                Ok(entries) => entries
                    .into_iter()
                    .map(|(machine, recipe)| (normalize_item_id(&machine), recipe))
                    .collect(),
                Err(e) => {
                    warn!("Ignoring malformed recipe memory: {}", e);
                    IndexMap::new()
                }
            },
            Ok(None) => IndexMap::new(),
            Err(e) => {
                error!("Failed to load recipe memory: {}", e);
                IndexMap::new()
            }
        };

        info!("Recipe memory loaded with {} entries", entries.len());
        Self { store, entries }
    }

    /// Record a manual choice and write it through
    pub fn remember(&mut self, machine_id: &str, recipe_id: &str) {
        if machine_id.is_empty() || recipe_id.is_empty() {
            warn!("Not remembering empty machine or recipe id");
            return;
        }

        self.entries
            .insert(normalize_item_id(machine_id), recipe_id.to_string());
        info!("Remembered recipe '{}' for machine '{}'", recipe_id, machine_id);
        self.save();
    }

    pub fn recall(&self, machine_id: &str) -> Option<&str> {
        self.entries
            .get(&normalize_item_id(machine_id))
            .map(String::as_str)
    }

    pub fn forget(&mut self, machine_id: &str) -> Option<String> {
        let removed = self.entries.shift_remove(&normalize_item_id(machine_id));
        if removed.is_some() {
            self.save();
        }
        removed
    }

    pub fn clear_all(&mut self) {
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

    pub fn snapshot(&self) -> IndexMap<String, String> {
        self.entries.clone()
    }

    fn save(&self) {
        let value = JsonValue::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
                .collect(),
        );
        match self.store.persist(RECIPE_MEMORY_KEY, &value) {
            Ok(()) => debug!("Saved {} remembered recipes", self.entries.len()),
            Err(e) => error!("Failed to save recipe memory: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::store::InMemoryStore;
    use serde_json::json;

    #[test]
    fn test_remember_writes_through() {
        let store = InMemoryStore::new();
        let mut memory = RecipeMemory::load(Arc::new(store.clone()));

        memory.remember("electric_furnace", "IRON_INGOT_SMELT");
        assert_eq!(memory.recall("ELECTRIC_FURNACE"), Some("IRON_INGOT_SMELT"));
        assert_eq!(store.write_count(), 1);
        assert_eq!(
            store.get(RECIPE_MEMORY_KEY),
            Some(json!({"ELECTRIC_FURNACE": "IRON_INGOT_SMELT"}))
        );
    }

    #[test]
    fn test_reload_and_recall_do_not_write() {
        let store = InMemoryStore::new();
        store
            .persist(RECIPE_MEMORY_KEY, &json!({"SMELTERY": "BRONZE"}))
            .unwrap();

        let memory = RecipeMemory::load(Arc::new(store.clone()));
        assert_eq!(memory.recall("smeltery"), Some("BRONZE"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_forget_and_clear() {
        let store = InMemoryStore::new();
        let mut memory = RecipeMemory::load(Arc::new(store.clone()));
        memory.remember("A", "r1");
        memory.remember("B", "r2");

        assert_eq!(memory.forget("A"), Some("r1".to_string()));
        assert_eq!(memory.forget("A"), None);
        assert_eq!(memory.len(), 1);
        assert_eq!(store.write_count(), 3);

        memory.clear_all();
        assert!(memory.is_empty());
        assert_eq!(store.write_count(), 4);
        memory.clear_all();
        assert_eq!(store.write_count(), 4);
    }

    #[test]
    fn test_malformed_memory_is_ignored() {
        let store = InMemoryStore::new();
        store.persist(RECIPE_MEMORY_KEY, &json!(["not", "a", "map"])).unwrap();
        let memory = RecipeMemory::load(Arc::new(store));
        assert!(memory.is_empty());
    }
}
