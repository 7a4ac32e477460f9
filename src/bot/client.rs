use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigLoader};
use crate::error::SelectionError;
use crate::gui::{parse_container_title, GameClient, PlayerInventory, WorldView};
use crate::handlers::{
    AutoClicker, ClickJob, MachineHandler, MultiblockHandler, StopReason, TickCounters, TickReport,
};
use crate::inventory::InventorySnapshot;
use crate::machine::{load_machines_file, load_recipes_file, MachineDescriptor, MachineRegistry};
use crate::persistence::{
    JsonFileStore, KeyValueStore, MultiblockCache, MultiblockCacheEntry, QueuedStore, RecipeMemory,
};
use crate::recipe::{summarize, Recipe, RecipeIndex, RecipeSummary};
use crate::state::{OpenOutcome, OpenPolicy, SessionManager};
use crate::structure::{SignatureTable, StructureMatcher};
use crate::types::BlockPos;
use crate::utils::{Clock, SystemClock};

/// Persisted state lives here, under the config directory
const DATA_DIR_NAME: &str = "data";

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickResult {
    pub transfers: TickReport,
    pub dispenser_actions: usize,
    pub clicker_stopped: Option<StopReason>,
}

/// The automation context owned by the host.
///
/// Holds every piece of mutable state (session, caches, recipe memory,
/// multiblock cache) and is driven through the entry points below from the
/// game's client thread. Each game-facing call takes the host client as an
/// argument.
pub struct AutomationBot {
    config: Config,
    machines: MachineRegistry,
    recipes: RecipeIndex,
    matcher: StructureMatcher,
    memory: RecipeMemory,
    multiblocks: MultiblockCache,
    session: SessionManager,
    electric: MachineHandler,
    dispenser: MultiblockHandler,
    clicker: AutoClicker,
    clock: Arc<dyn Clock>,
}

impl AutomationBot {
    pub fn new(
        mut config: Config,
        machines: MachineRegistry,
        recipes: RecipeIndex,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        config.sanitize();
        let matcher = StructureMatcher::new(
            config.detection.clone(),
            SignatureTable::with_overrides(&config.signatures),
        );

        info!(
            "Automation ready: {} machines, {} recipes",
            machines.len(),
            recipes.total_recipes()
        );

        Self {
            machines,
            recipes,
            matcher,
            memory: RecipeMemory::load(store.clone()),
            multiblocks: MultiblockCache::load(store),
            session: SessionManager::new(config.automation_enabled),
            electric: MachineHandler::new(config.automation_delay_ms),
            dispenser: MultiblockHandler::new(config.multiblock_fill_delay_ms),
            clicker: AutoClicker::new(config.click_interval_ms),
            clock,
            config,
        }
    }

    /// Load config and data files and start the persistence writer on
    /// `runtime`. Unreadable data files leave the registry or index empty.
    pub fn bootstrap(loader: &ConfigLoader, runtime: &Handle) -> Result<(Self, JoinHandle<()>)> {
        let config = loader.load()?;

        let machines = load_or_empty(
            &loader.resolve_data_path(&config.machines_file),
            "machines",
            load_machines_file,
        );
        let mut recipes = RecipeIndex::new();
        recipes.register_all(load_or_empty(
            &loader.resolve_data_path(&config.recipes_file),
            "recipes",
            load_recipes_file,
        ));
        recipes.log_stats();

        let files: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::new(loader.config_dir().join(DATA_DIR_NAME)));
        let (store, writer) = QueuedStore::spawn(files, runtime);

        let bot = Self::new(
            config,
            MachineRegistry::from_machines(machines),
            recipes,
            Arc::new(store),
            Arc::new(SystemClock),
        );
        Ok((bot, writer))
    }

    /// A container screen opened. Resolves the machine by title.
    pub fn on_machine_open<C: PlayerInventory + ?Sized>(&mut self, client: &C, raw_title: &str) -> OpenOutcome {
        let title = parse_container_title(raw_title);
        let Some(machine) = self.machines.resolve_by_title(&title).cloned() else {
            debug!("'{}' is not a known machine", title);
            if self.session.is_active() {
                self.close_session();
            }
            return OpenOutcome::NotAMachine;
        };

        self.activate(client, machine, None)
    }

    /// A multiblock's dispenser opened at `dispenser`. Known structures come
    /// from the position cache; anything else is classified and cached.
    pub fn on_structure_open<C>(&mut self, client: &C, dispenser: BlockPos) -> OpenOutcome
    where
        C: PlayerInventory + WorldView + ?Sized,
    {
        let machine_id = match self.multiblocks.get_at(dispenser) {
            Some(entry) => {
                debug!("Known {} at {}", entry.machine_id, dispenser);
                Some(entry.machine_id.clone())
            }
            None => self.detect_structure(client, dispenser),
        };

        let machine = match machine_id {
            Some(id) => match self.machines.resolve_by_id(&id) {
                Some(machine @ MachineDescriptor::Multiblock { .. }) => Some(machine.clone()),
                _ => {
                    warn!("Cached structure {} at {} is not a known multiblock", id, dispenser);
                    self.multiblocks.remove(dispenser);
                    None
                }
            },
            None => None,
        };

        match machine {
            Some(machine) => self.activate(client, machine, Some(dispenser)),
            None => {
                if self.session.is_active() {
                    self.close_session();
                }
                OpenOutcome::NotAMachine
            }
        }
    }

    fn detect_structure<C: WorldView + ?Sized>(&mut self, client: &C, dispenser: BlockPos) -> Option<String> {
        let detection = self.matcher.detect(client, dispenser, &self.machines)?;
        info!(
            "Detected {} at {} (confidence {:.2})",
            detection.display_name, dispenser, detection.confidence
        );
        self.multiblocks.add(
            &detection.machine_id,
            &detection.display_name,
            dispenser,
            self.clock.now_utc(),
        );
        Some(detection.machine_id)
    }

    fn activate<C: PlayerInventory + ?Sized>(
        &mut self,
        client: &C,
        machine: MachineDescriptor,
        anchor: Option<BlockPos>,
    ) -> OpenOutcome {
        let other_machine = self
            .clicker
            .job()
            .is_some_and(|job| !job.machine_id.eq_ignore_ascii_case(machine.id()));
        if other_machine {
            self.clicker.stop(StopReason::Cancelled);
        }

        self.reset_derived_caches();

        let remembered = self.remembered_recipe(machine.id(), anchor);
        let inventory = InventorySnapshot::capture(client);
        let policy = OpenPolicy {
            remember_last_recipe: self.config.remember_last_recipe,
            auto_show_overlay: self.config.auto_show_overlay,
        };
        self.session.open(
            machine,
            anchor,
            policy,
            &self.recipes,
            remembered.as_deref(),
            &inventory,
        )
    }

    fn remembered_recipe(&self, machine_id: &str, anchor: Option<BlockPos>) -> Option<String> {
        if let Some(recipe_id) = self.memory.recall(machine_id) {
            return Some(recipe_id.to_string());
        }
        anchor
            .and_then(|pos| self.multiblocks.get_at(pos))
            .and_then(|entry| entry.last_selected_recipe_id.clone())
    }

    /// The machine screen closed. A multiblock whose dispenser was left
    /// fully loaded starts the auto-clicker.
    pub fn on_machine_close(&mut self) {
        self.maybe_start_clicker();
        self.close_session();
    }

    fn close_session(&mut self) {
        self.session.close(self.config.remember_last_recipe);
        self.reset_derived_caches();
    }

    fn maybe_start_clicker(&mut self) {
        if !self.session.automation_enabled() {
            return;
        }
        let Some(MachineDescriptor::Multiblock { id, .. }) = self.session.active_machine() else {
            return;
        };
        let Some(anchor) = self.session.anchor() else {
            return;
        };
        let Some(recipe) = self.selected_recipe() else {
            return;
        };

        let status = self.dispenser.last_status();
        if !status.complete || status.process_count == 0 {
            debug!("Dispenser not ready ({:?}), no auto-clicking", status);
            return;
        }
        let Some(trigger) = self.matcher.signatures().trigger_material(id) else {
            warn!("No trigger block known for {}, no auto-clicking", id);
            return;
        };

        let job = ClickJob {
            machine_id: id.clone(),
            recipe_id: recipe.recipe_id().to_string(),
            trigger_material: trigger.to_string(),
            anchor,
            required_items: recipe.grouped_inputs().keys().cloned().collect(),
            target_clicks: status.process_count,
            clicks_done: 0,
        };
        self.clicker.start(job);
    }

    /// One game tick
    pub fn tick<C: GameClient + ?Sized>(&mut self, client: &mut C) -> TickResult {
        let now = self.clock.now_millis();
        let mut result = TickResult {
            clicker_stopped: self
                .clicker
                .tick(client, self.session.automation_enabled(), now),
            ..TickResult::default()
        };

        if !self.session.automation_enabled() || !self.session.is_active() {
            return result;
        }

        match self.session.active_machine() {
            Some(MachineDescriptor::Electric {
                input_slots,
                output_slots,
                ..
            }) => {
                result.transfers = self.electric.tick(
                    client,
                    input_slots,
                    output_slots,
                    self.session.cached_requirements(),
                    now,
                );
            }
            Some(MachineDescriptor::Multiblock { .. }) => {
                let recipe = self
                    .session
                    .selected_recipe_id()
                    .and_then(|id| self.recipes.recipe(id));
                if let Some(recipe) = recipe {
                    result.dispenser_actions = self.dispenser.tick(client, recipe, now);
                }
            }
            None => {}
        }

        result
    }

    /// Manual recipe choice for the active machine. With `remember` the
    /// choice is stored for the next time this machine opens.
    pub fn select_recipe<C: GameClient + ?Sized>(
        &mut self,
        client: &mut C,
        recipe_id: &str,
        remember: bool,
    ) -> Result<(), SelectionError> {
        let previous = self.session.select_by_id(&self.recipes, recipe_id)?;
        let Some(machine) = self.session.active_machine() else {
            return Err(SelectionError::NoActiveMachine);
        };
        let machine_id = machine.id().to_string();
        let is_multiblock = matches!(machine, MachineDescriptor::Multiblock { .. });

        info!("Selected recipe {} for {}", recipe_id, machine_id);

        if remember {
            self.memory.remember(&machine_id, recipe_id);
        }
        if is_multiblock {
            if let Some(anchor) = self.session.anchor() {
                self.multiblocks.update_recipe(anchor, recipe_id);
            }
        }

        let changed = previous.as_deref().is_some_and(|p| p != recipe_id);
        if changed && is_multiblock {
            self.dispenser.clear_dispenser(client);
        }
        self.electric.clear_caches();

        if self.config.start_on_select {
            self.session.set_automation_enabled(true);
        }
        Ok(())
    }

    /// Drop the current selection and stop any running clicker
    pub fn clear_selection(&mut self) -> Option<String> {
        self.clicker.stop(StopReason::Cancelled);
        self.electric.clear_caches();
        self.session.clear_selection()
    }

    /// Flip automation; returns the new state. Turning it off drops every
    /// derived cache and stops the clicker.
    pub fn toggle_automation(&mut self) -> bool {
        let enabled = !self.session.automation_enabled();
        self.session.set_automation_enabled(enabled);
        if !enabled {
            self.electric.clear_caches();
            self.dispenser.reset();
            self.recipes.invalidate_cache();
            self.clicker.stop(StopReason::AutomationDisabled);
        }
        enabled
    }

    /// Completion of the selected recipe against what the player carries now.
    /// A selection kept across a close still reports against its recipe.
    pub fn current_summary<C: PlayerInventory + ?Sized>(&self, client: &C) -> Option<RecipeSummary> {
        let recipe = self.selected_recipe()?;
        let inventory = InventorySnapshot::capture(client);
        Some(summarize(&inventory, recipe.grouped_inputs()))
    }

    /// Recipes of the active machine the player can craft right now
    pub fn craftable_recipes<C: PlayerInventory + ?Sized>(&self, client: &C) -> Vec<&Recipe> {
        let Some(machine) = self.session.active_machine() else {
            return Vec::new();
        };
        let inventory = InventorySnapshot::capture(client);
        self.recipes
            .craftable(machine.id(), &inventory, self.clock.now_millis())
    }

    /// Closest cached multiblock within the configured search radius
    pub fn nearby_multiblock(&self, pos: BlockPos) -> Option<&MultiblockCacheEntry> {
        self.multiblocks
            .find_nearest(pos, self.config.detection.cache_search_radius)
    }

    /// Swap in a new config; throttles pick up the new intervals
    pub fn apply_config(&mut self, mut config: Config) {
        config.sanitize();
        self.electric.set_delay_ms(config.automation_delay_ms);
        self.dispenser.set_fill_delay_ms(config.multiblock_fill_delay_ms);
        self.clicker.set_click_interval_ms(config.click_interval_ms);
        self.matcher = StructureMatcher::new(
            config.detection.clone(),
            SignatureTable::with_overrides(&config.signatures),
        );
        self.config = config;
    }

    fn selected_recipe(&self) -> Option<&Recipe> {
        self.session
            .selected_recipe_id()
            .and_then(|id| self.recipes.recipe(id))
    }

    fn reset_derived_caches(&mut self) {
        self.electric.reset();
        self.dispenser.reset();
        self.recipes.invalidate_cache();
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn is_automation_enabled(&self) -> bool {
        self.session.automation_enabled()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn machines(&self) -> &MachineRegistry {
        &self.machines
    }

    pub fn recipes(&self) -> &RecipeIndex {
        &self.recipes
    }

    pub fn memory(&self) -> &RecipeMemory {
        &self.memory
    }

    pub fn multiblocks(&self) -> &MultiblockCache {
        &self.multiblocks
    }

    pub fn clicker(&self) -> &AutoClicker {
        &self.clicker
    }

    pub fn tick_counters(&self) -> TickCounters {
        self.electric.counters()
    }

    pub fn cached_empty_slots(&self) -> usize {
        self.electric.cached_empty_slots().len()
    }
}

fn load_or_empty<T>(path: &Path, what: &str, load: fn(&Path) -> Result<Vec<T>>) -> Vec<T> {
    match load(path) {
        Ok(records) => {
            info!("Loaded {} {} from {:?}", records.len(), what, path);
            records
        }
        Err(e) => {
            warn!("No {} loaded: {:#}", what, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{InMemoryStore, MULTIBLOCK_CACHE_KEY, RECIPE_MEMORY_KEY};
    use crate::test_support::{
        ore_washer, ore_washer_blocks, planks, sawmill, sifted_ore, washed_sand, Action, FakeClient,
    };
    use crate::types::ItemStack;
    use crate::utils::ManualClock;

    struct Harness {
        bot: AutomationBot,
        store: InMemoryStore,
        clock: ManualClock,
    }

    fn harness(config: Config) -> Harness {
        let store = InMemoryStore::new();
        let clock = ManualClock::new(10_000);
        let mut recipes = RecipeIndex::new();
        recipes.register_all(vec![planks(), sifted_ore(), washed_sand()]);
        let bot = AutomationBot::new(
            config,
            MachineRegistry::from_machines(vec![sawmill(), ore_washer()]),
            recipes,
            Arc::new(store.clone()),
            Arc::new(clock.clone()),
        );
        Harness { bot, store, clock }
    }

    #[test]
    fn test_electric_machine_end_to_end() {
        let Harness { mut bot, clock, .. } = harness(Config::default());
        let mut client = FakeClient::new(3)
            .with_player_stack(9, ItemStack::new("WOOD", 5))
            .with_player_stack(10, ItemStack::new("WOOD", 5));

        let outcome = bot.on_machine_open(&client, r#"{"text":"","extra":[{"text":"Sawmill"}]}"#);
        assert!(matches!(outcome, OpenOutcome::ShowRecipeList(_)));
        bot.select_recipe(&mut client, "PLANKS", false).unwrap();
        assert!(bot.is_automation_enabled());

        let result = bot.tick(&mut client);
        assert_eq!(result.transfers, TickReport { extracted: 0, inserted: 1 });
        assert_eq!(client.actions, vec![Action::ToSlot { player_slot: 9, target_slot: 0 }]);

        // Inside the throttle window
        clock.advance(50);
        assert_eq!(bot.tick(&mut client), TickResult::default());

        client.container[2] = Some(ItemStack::new("PLANK", 4));
        clock.advance(150);
        let result = bot.tick(&mut client);
        assert_eq!(result.transfers, TickReport { extracted: 1, inserted: 1 });
        assert_eq!(
            client.actions[1..],
            [
                Action::ToPlayer(2),
                Action::ToSlot { player_slot: 10, target_slot: 1 },
            ]
        );

        let summary = bot.current_summary(&client).unwrap();
        assert!(!summary.can_craft);
    }

    #[test]
    fn test_unknown_title_stays_idle() {
        let Harness { mut bot, .. } = harness(Config::default());
        let mut client = FakeClient::new(27);
        assert_eq!(bot.on_machine_open(&client, "Chest"), OpenOutcome::NotAMachine);
        assert!(!bot.is_active());
        assert_eq!(bot.tick(&mut client), TickResult::default());
    }

    #[test]
    fn test_remembered_recipe_is_not_rewritten() {
        let config = Config {
            remember_last_recipe: true,
            ..Config::default()
        };
        let Harness { mut bot, store, .. } = harness(config);
        let mut client = FakeClient::new(3);

        bot.on_machine_open(&client, "Sawmill");
        bot.select_recipe(&mut client, "PLANKS", true).unwrap();
        assert_eq!(store.write_count(), 1);
        bot.on_machine_close();

        for _ in 0..2 {
            let outcome = bot.on_machine_open(&client, "Sawmill");
            assert_eq!(
                outcome,
                OpenOutcome::Restored {
                    recipe_id: "PLANKS".to_string()
                }
            );
            bot.on_machine_close();
        }
        assert_eq!(store.write_count(), 1);
        assert!(store.get(RECIPE_MEMORY_KEY).is_some());
    }

    #[test]
    fn test_opening_other_machine_resets_session() {
        let Harness { mut bot, .. } = harness(Config::default());
        let mut client = FakeClient::new(3).with_player_stack(9, ItemStack::new("WOOD", 5));
        let dispenser = BlockPos::new(0, 64, 0);
        client = ore_washer_blocks(client, dispenser);

        bot.on_machine_open(&client, "Sawmill");
        bot.select_recipe(&mut client, "PLANKS", false).unwrap();
        bot.tick(&mut client);
        assert!(bot.cached_empty_slots() > 0);

        bot.on_structure_open(&client, dispenser);
        assert_eq!(bot.session().active_machine().unwrap().id(), "ORE_WASHER");
        assert_eq!(bot.session().selected_recipe_id(), None);
        assert_eq!(bot.cached_empty_slots(), 0);
        assert_eq!(bot.tick_counters(), TickCounters::default());
    }

    #[test]
    fn test_multiblock_fill_then_auto_click() {
        let Harness { mut bot, store, clock } = harness(Config::default());
        let dispenser = BlockPos::new(5, 70, -2);
        let mut client = ore_washer_blocks(FakeClient::new(9), dispenser)
            .with_player_stack(0, ItemStack::new("GRAVEL", 64));

        let outcome = bot.on_structure_open(&client, dispenser);
        assert!(matches!(outcome, OpenOutcome::ShowRecipeList(_)));
        assert_eq!(bot.multiblocks().get_at(dispenser).unwrap().machine_id, "ORE_WASHER");
        assert!(store.get(MULTIBLOCK_CACHE_KEY).is_some());

        bot.select_recipe(&mut client, "SIFTED_ORE", true).unwrap();
        let result = bot.tick(&mut client);
        assert_eq!(result.dispenser_actions, 1);

        bot.on_machine_close();
        assert!(!bot.is_active());
        assert_eq!(bot.clicker().job().unwrap().target_clicks, 64);

        bot.tick(&mut client);
        assert_eq!(
            client.actions.last(),
            Some(&Action::Interact(dispenser.offset(0, 1, 0)))
        );

        // The player has no gravel left after the first click
        clock.advance(1_000);
        let result = bot.tick(&mut client);
        assert_eq!(result.clicker_stopped, Some(StopReason::OutOfMaterials));
        assert_eq!(client.interactions(), 1);
    }

    #[test]
    fn test_known_structure_uses_cache_and_last_recipe() {
        let config = Config {
            remember_last_recipe: true,
            ..Config::default()
        };
        let Harness { mut bot, .. } = harness(config);
        let dispenser = BlockPos::new(0, 64, 0);
        let mut client = ore_washer_blocks(FakeClient::new(9), dispenser);

        bot.on_structure_open(&client, dispenser);
        bot.select_recipe(&mut client, "WASHED_SAND", true).unwrap();
        bot.on_machine_close();
        assert_eq!(
            bot.multiblocks()
                .get_at(dispenser)
                .unwrap()
                .last_selected_recipe_id
                .as_deref(),
            Some("WASHED_SAND")
        );

        // Structure no longer detectable, cache still resolves it
        client.blocks.clear();
        let outcome = bot.on_structure_open(&client, dispenser);
        assert_eq!(
            outcome,
            OpenOutcome::Restored {
                recipe_id: "WASHED_SAND".to_string()
            }
        );
        assert_eq!(bot.nearby_multiblock(dispenser.offset(3, 0, 0)).unwrap().machine_id, "ORE_WASHER");
    }

    #[test]
    fn test_changing_recipe_clears_dispenser() {
        let Harness { mut bot, .. } = harness(Config::default());
        let dispenser = BlockPos::new(0, 64, 0);
        let mut client = ore_washer_blocks(FakeClient::new(9), dispenser)
            .with_player_stack(0, ItemStack::new("GRAVEL", 64));

        bot.on_structure_open(&client, dispenser);
        bot.select_recipe(&mut client, "SIFTED_ORE", false).unwrap();
        bot.tick(&mut client);
        assert!(client.container[0].is_some());

        bot.select_recipe(&mut client, "WASHED_SAND", false).unwrap();
        assert!(client.container.iter().all(Option::is_none));
    }

    #[test]
    fn test_selection_validation() {
        let Harness { mut bot, .. } = harness(Config::default());
        let mut client = FakeClient::new(3);
        assert_eq!(
            bot.select_recipe(&mut client, "PLANKS", true),
            Err(SelectionError::NoActiveMachine)
        );
        bot.on_machine_open(&client, "Sawmill");
        assert!(matches!(
            bot.select_recipe(&mut client, "SIFTED_ORE", true),
            Err(SelectionError::WrongMachine { .. })
        ));
        assert_eq!(bot.memory().len(), 0);
    }

    #[test]
    fn test_toggle_off_stops_work_and_clears_caches() {
        let Harness { mut bot, clock, .. } = harness(Config::default());
        let mut client = FakeClient::new(3)
            .with_player_stack(9, ItemStack::new("WOOD", 5))
            .with_player_stack(10, ItemStack::new("WOOD", 5));
        bot.on_machine_open(&client, "Sawmill");
        bot.select_recipe(&mut client, "PLANKS", false).unwrap();
        bot.tick(&mut client);

        assert!(!bot.toggle_automation());
        assert_eq!(bot.cached_empty_slots(), 0);
        clock.advance(1_000);
        assert_eq!(bot.tick(&mut client), TickResult::default());
        assert_eq!(client.actions.len(), 1);

        assert!(bot.toggle_automation());
        assert_eq!(bot.tick(&mut client).transfers.inserted, 1);
    }

    #[test]
    fn test_summary_after_close_keeps_recipe_requirements() {
        let config = Config {
            remember_last_recipe: true,
            ..Config::default()
        };
        let Harness { mut bot, .. } = harness(config);
        let mut client = FakeClient::new(3);

        bot.on_machine_open(&client, "Sawmill");
        bot.select_recipe(&mut client, "PLANKS", true).unwrap();
        let open = bot.current_summary(&client).unwrap();
        assert!(!open.can_craft);

        bot.on_machine_close();
        assert_eq!(bot.session().selected_recipe_id(), Some("PLANKS"));
        let closed = bot.current_summary(&client).unwrap();
        assert_eq!(closed, open);
        assert_eq!(closed.missing["WOOD"], 2);
    }

    #[test]
    fn test_multiblock_selection_updates_cache_without_remember() {
        let Harness { mut bot, .. } = harness(Config::default());
        let dispenser = BlockPos::new(0, 64, 0);
        let mut client = ore_washer_blocks(FakeClient::new(9), dispenser);

        bot.on_structure_open(&client, dispenser);
        bot.select_recipe(&mut client, "WASHED_SAND", false).unwrap();
        assert_eq!(bot.memory().len(), 0);
        assert_eq!(
            bot.multiblocks()
                .get_at(dispenser)
                .unwrap()
                .last_selected_recipe_id
                .as_deref(),
            Some("WASHED_SAND")
        );
    }

    #[test]
    fn test_craftable_recipes_for_active_machine() {
        let Harness { mut bot, .. } = harness(Config::default());
        let client = FakeClient::new(3).with_player_stack(0, ItemStack::new("WOOD", 2));
        assert!(bot.craftable_recipes(&client).is_empty());
        bot.on_machine_open(&client, "Sawmill");
        let craftable = bot.craftable_recipes(&client);
        assert_eq!(craftable.len(), 1);
        assert_eq!(craftable[0].recipe_id(), "PLANKS");
    }
}
