use tracing::{debug, info, warn};

use crate::error::SelectionError;
use crate::inventory::InventorySnapshot;
use crate::machine::MachineDescriptor;
use crate::recipe::{GroupedRequirements, Recipe, RecipeIndex};
use crate::state::session::{OpenOutcome, RecipeChoice, Session, SessionState};
use crate::types::BlockPos;

/// Open-time policy switches, taken from the config
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenPolicy {
    pub remember_last_recipe: bool,
    pub auto_show_overlay: bool,
}

/// Owns the session and performs every state transition. Nothing in here
/// fails outward: bad input is logged and leaves the session consistent.
#[derive(Debug)]
pub struct SessionManager {
    session: Session,
}

impl SessionManager {
    pub fn new(automation_enabled: bool) -> Self {
        Self {
            session: Session::new(automation_enabled),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    fn set_state(&mut self, new_state: SessionState) {
        let old_state = self.session.state;
        if old_state != new_state {
            info!("State changed: {:?} -> {:?}", old_state, new_state);
            self.session.state = new_state;
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.state == SessionState::Active && self.session.active_machine.is_some()
    }

    pub fn active_machine(&self) -> Option<&MachineDescriptor> {
        self.session.active_machine.as_ref()
    }

    pub fn anchor(&self) -> Option<BlockPos> {
        self.session.anchor
    }

    pub fn selected_recipe_id(&self) -> Option<&str> {
        self.session.selected_recipe_id.as_deref()
    }

    pub fn cached_requirements(&self) -> &GroupedRequirements {
        &self.session.cached_requirements
    }

    pub fn automation_enabled(&self) -> bool {
        self.session.automation_enabled
    }

    /// Returns true when the value changed
    pub fn set_automation_enabled(&mut self, enabled: bool) -> bool {
        if self.session.automation_enabled == enabled {
            return false;
        }
        self.session.automation_enabled = enabled;
        info!("Automation {}", if enabled { "ENABLED" } else { "DISABLED" });
        true
    }

    /// Make `machine` the active machine.
    ///
    /// A machine that is already active is closed first. `remembered` is the
    /// recipe stored for this machine, if any; it is selected without being
    /// written back.
    pub fn open(
        &mut self,
        machine: MachineDescriptor,
        anchor: Option<BlockPos>,
        policy: OpenPolicy,
        recipes: &RecipeIndex,
        remembered: Option<&str>,
        inventory: &InventorySnapshot,
    ) -> OpenOutcome {
        if let Some(previous) = self.session.active_machine.as_ref() {
            debug!("Closing {} before opening {}", previous.id(), machine.id());
            self.close(policy.remember_last_recipe);
        }

        self.set_state(SessionState::Opening);
        info!("Opened {} machine {}", machine.kind_label(), machine.id());

        self.session.selected_recipe_id = None;
        self.session.cached_requirements.clear();
        self.session.anchor = anchor;
        self.session.active_machine = Some(machine);
        self.set_state(SessionState::Active);

        if policy.remember_last_recipe {
            if let Some(recipe_id) = remembered {
                match self.select_by_id(recipes, recipe_id) {
                    Ok(_) => {
                        info!("Restored remembered recipe {}", recipe_id);
                        return OpenOutcome::Restored {
                            recipe_id: recipe_id.to_string(),
                        };
                    }
                    Err(e) => warn!("Remembered recipe not usable: {}", e),
                }
            }
        }

        if policy.auto_show_overlay {
            let machine_id = self.session.active_machine.as_ref().map(|m| m.id()).unwrap_or_default();
            let choices: Vec<RecipeChoice> = recipes
                .sorted_by_completion(machine_id, inventory)
                .into_iter()
                .map(|(recipe, summary)| RecipeChoice {
                    recipe_id: recipe.recipe_id().to_string(),
                    summary,
                })
                .collect();
            if !choices.is_empty() {
                return OpenOutcome::ShowRecipeList(choices);
            }
            debug!("No recipes to show for {}", machine_id);
        }

        OpenOutcome::Ready
    }

    /// Select `recipe` for the active machine. Returns the previous selection.
    pub fn select(&mut self, recipe: &Recipe) -> Result<Option<String>, SelectionError> {
        let machine = self
            .session
            .active_machine
            .as_ref()
            .ok_or(SelectionError::NoActiveMachine)?;

        if !recipe.belongs_to(machine.id()) {
            return Err(SelectionError::WrongMachine {
                recipe_id: recipe.recipe_id().to_string(),
                machine_id: machine.id().to_string(),
            });
        }

        self.session.cached_requirements = recipe.grouped_inputs().clone();
        let previous = self
            .session
            .selected_recipe_id
            .replace(recipe.recipe_id().to_string());
        debug!(
            "Selected {} ({} distinct inputs)",
            recipe.recipe_id(),
            self.session.cached_requirements.len()
        );
        Ok(previous)
    }

    pub fn select_by_id(
        &mut self,
        recipes: &RecipeIndex,
        recipe_id: &str,
    ) -> Result<Option<String>, SelectionError> {
        let recipe = recipes
            .recipe(recipe_id)
            .ok_or_else(|| SelectionError::UnknownRecipe(recipe_id.to_string()))?;
        self.select(recipe)
    }

    pub fn clear_selection(&mut self) -> Option<String> {
        self.session.cached_requirements.clear();
        self.session.selected_recipe_id.take()
    }

    /// Leave the active machine. The selection survives only when
    /// `remember_last_recipe` is set. Returns the machine that was active.
    pub fn close(&mut self, remember_last_recipe: bool) -> Option<MachineDescriptor> {
        let machine = self.session.active_machine.take();
        if let Some(machine) = machine.as_ref() {
            info!("Closed machine {}", machine.id());
        }

        if !remember_last_recipe {
            self.session.selected_recipe_id = None;
        }
        self.session.cached_requirements.clear();
        self.session.anchor = None;
        self.set_state(SessionState::Idle);
        machine
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(true)
    }
}
