/// Recipe index: lookups by id, machine, output item and input item, plus a
/// short-lived craftability cache.
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::inventory::InventorySnapshot;
use crate::recipe::completion::{summarize, RecipeSummary};
use crate::recipe::model::Recipe;
use crate::utils::normalize_item_id;

/// Craftable results older than this are dropped, all at once
pub const CRAFTABLE_CACHE_TTL_MS: u64 = 5_000;

#[derive(Debug, Default)]
struct CraftableCache {
    /// When the oldest live entry was written
    epoch: Option<u64>,
    entries: HashMap<(String, u64), Vec<String>>,
}

impl CraftableCache {
    fn expire(&mut self, now: u64) {
        if let Some(epoch) = self.epoch {
            if now.saturating_sub(epoch) > CRAFTABLE_CACHE_TTL_MS {
                debug!("Dropping {} craftable cache entries", self.entries.len());
                self.clear();
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.epoch = None;
    }
}

#[derive(Debug, Default)]
pub struct RecipeIndex {
    by_id: IndexMap<String, Recipe>,
    by_machine: HashMap<String, Vec<String>>,
    by_output: HashMap<String, Vec<String>>,
    by_input: HashMap<String, Vec<String>>,
    craftable_cache: Mutex<CraftableCache>,
}

impl RecipeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recipe. An existing recipe with the same id is replaced
    /// (last writer wins) and keeps its registration position.
    pub fn register(&mut self, recipe: Recipe) {
        let id = recipe.recipe_id().to_string();
        let replaced = self.by_id.contains_key(&id);

        if replaced {
            debug!("Replacing recipe {}", id);
            for ids in self
                .by_machine
                .values_mut()
                .chain(self.by_output.values_mut())
                .chain(self.by_input.values_mut())
            {
                ids.retain(|existing| existing != &id);
            }
        }

        let machine_key = normalize_item_id(recipe.machine_id());
        let output_keys: Vec<String> = recipe
            .outputs()
            .iter()
            .map(|o| normalize_item_id(&o.item_id))
            .collect();
        let input_keys: Vec<String> = recipe.grouped_inputs().keys().cloned().collect();

        self.by_id.insert(id.clone(), recipe);

        let mut touched = vec![(IndexKind::Machine, machine_key)];
        touched.extend(output_keys.into_iter().map(|k| (IndexKind::Output, k)));
        touched.extend(input_keys.into_iter().map(|k| (IndexKind::Input, k)));

        for (kind, key) in touched {
            let ids = self.secondary_mut(kind).entry(key).or_default();
            if !ids.contains(&id) {
                ids.push(id.clone());
            }
        }

        if replaced {
            self.restore_registration_order();
        }

        self.invalidate_cache();
    }

    /// Register many recipes, returning how many were registered
    pub fn register_all<I: IntoIterator<Item = Recipe>>(&mut self, recipes: I) -> usize {
        let mut count = 0;
        for recipe in recipes {
            self.register(recipe);
            count += 1;
        }
        count
    }

    fn secondary_mut(&mut self, kind: IndexKind) -> &mut HashMap<String, Vec<String>> {
        match kind {
            IndexKind::Machine => &mut self.by_machine,
            IndexKind::Output => &mut self.by_output,
            IndexKind::Input => &mut self.by_input,
        }
    }

    fn restore_registration_order(&mut self) {
        let by_id = &self.by_id;
        for ids in self
            .by_machine
            .values_mut()
            .chain(self.by_output.values_mut())
            .chain(self.by_input.values_mut())
        {
            ids.sort_by_key(|id| by_id.get_index_of(id).unwrap_or(usize::MAX));
        }
        self.by_machine.retain(|_, ids| !ids.is_empty());
        self.by_output.retain(|_, ids| !ids.is_empty());
        self.by_input.retain(|_, ids| !ids.is_empty());
    }

    fn resolve<'a>(&'a self, ids: Option<&'a Vec<String>>) -> Vec<&'a Recipe> {
        ids.map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn recipe(&self, recipe_id: &str) -> Option<&Recipe> {
        self.by_id.get(recipe_id)
    }

    /// Recipes of a machine in registration order
    pub fn recipes_for_machine(&self, machine_id: &str) -> Vec<&Recipe> {
        self.resolve(self.by_machine.get(&normalize_item_id(machine_id)))
    }

    pub fn has_recipes(&self, machine_id: &str) -> bool {
        self.by_machine
            .get(&normalize_item_id(machine_id))
            .is_some_and(|ids| !ids.is_empty())
    }

    pub fn recipes_producing(&self, item_id: &str) -> Vec<&Recipe> {
        self.resolve(self.by_output.get(&normalize_item_id(item_id)))
    }

    pub fn recipes_using(&self, item_id: &str) -> Vec<&Recipe> {
        self.resolve(self.by_input.get(&normalize_item_id(item_id)))
    }

    /// Case-insensitive substring search over output ids and display names
    pub fn search_by_output(&self, term: &str) -> Vec<&Recipe> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }

        self.by_id
            .values()
            .filter(|recipe| {
                recipe.outputs().iter().any(|o| {
                    o.item_id.to_lowercase().contains(&term)
                        || o.display_name.to_lowercase().contains(&term)
                })
            })
            .collect()
    }

    /// Recipes of `machine_id` the inventory can craft right now.
    ///
    /// Cached per `(machine, inventory fingerprint)`; the whole cache is
    /// dropped once it is older than [`CRAFTABLE_CACHE_TTL_MS`]. A fingerprint
    /// collision can return a stale answer until then.
    pub fn craftable(&self, machine_id: &str, inventory: &InventorySnapshot, now: u64) -> Vec<&Recipe> {
        let machine_key = normalize_item_id(machine_id);
        let cache_key = (machine_key.clone(), inventory.fingerprint());

        let mut cache = self.craftable_cache.lock();
        cache.expire(now);

        if let Some(ids) = cache.entries.get(&cache_key) {
            return ids.iter().filter_map(|id| self.by_id.get(id)).collect();
        }

        let craftable: Vec<&Recipe> = self
            .recipes_for_machine(&machine_key)
            .into_iter()
            .filter(|recipe| summarize(inventory, recipe.grouped_inputs()).can_craft)
            .collect();

        cache.epoch.get_or_insert(now);
        cache.entries.insert(
            cache_key,
            craftable.iter().map(|r| r.recipe_id().to_string()).collect(),
        );

        craftable
    }

    /// Machine recipes with their summaries, best completion first. Equal
    /// ratios keep registration order.
    pub fn sorted_by_completion(
        &self,
        machine_id: &str,
        inventory: &InventorySnapshot,
    ) -> Vec<(&Recipe, RecipeSummary)> {
        let mut ranked: Vec<(&Recipe, RecipeSummary)> = self
            .recipes_for_machine(machine_id)
            .into_iter()
            .map(|recipe| (recipe, summarize(inventory, recipe.grouped_inputs())))
            .collect();
        ranked.sort_by(|a, b| b.1.completion_ratio.total_cmp(&a.1.completion_ratio));
        ranked
    }

    pub fn invalidate_cache(&self) {
        self.craftable_cache.lock().clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.craftable_cache.lock().entries.len()
    }

    pub fn total_recipes(&self) -> usize {
        self.by_id.len()
    }

    pub fn total_machines(&self) -> usize {
        self.by_machine.len()
    }

    pub fn machine_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.by_machine.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_machine.clear();
        self.by_output.clear();
        self.by_input.clear();
        self.invalidate_cache();
    }

    /// Log totals and the machines with the most recipes
    pub fn log_stats(&self) {
        info!(
            "Recipe index: {} recipes across {} machines",
            self.total_recipes(),
            self.total_machines()
        );

        let mut counts: Vec<(&String, usize)> =
            self.by_machine.iter().map(|(m, ids)| (m, ids.len())).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (machine, count) in counts.into_iter().take(10) {
            info!("  {}: {} recipes", machine, count);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum IndexKind {
    Machine,
    Output,
    Input,
}
