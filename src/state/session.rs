use crate::machine::MachineDescriptor;
use crate::recipe::{GroupedRequirements, RecipeSummary};
use crate::types::BlockPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No machine active
    Idle,
    /// A machine was detected and is being set up
    Opening,
    /// Machine active, recipe optionally selected
    Active,
}

/// Mutable per-game-session context
#[derive(Debug, Clone)]
pub struct Session {
    pub state: SessionState,
    pub active_machine: Option<MachineDescriptor>,
    /// Dispenser position for multiblocks
    pub anchor: Option<BlockPos>,
    pub selected_recipe_id: Option<String>,
    /// Grouped inputs of the selected recipe, empty without a selection
    pub cached_requirements: GroupedRequirements,
    pub automation_enabled: bool,
}

impl Session {
    pub fn new(automation_enabled: bool) -> Self {
        Self {
            state: SessionState::Idle,
            active_machine: None,
            anchor: None,
            selected_recipe_id: None,
            cached_requirements: GroupedRequirements::new(),
            automation_enabled,
        }
    }
}

/// A recipe offered for manual choice, with how close the player is to it
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeChoice {
    pub recipe_id: String,
    pub summary: RecipeSummary,
}

/// What the host should do after a machine opened
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// Title or position did not resolve to a machine; the session is idle
    NotAMachine,
    /// A remembered recipe was selected
    Restored { recipe_id: String },
    /// Recipes sorted by completion, best first
    ShowRecipeList(Vec<RecipeChoice>),
    /// Machine active, nothing to show
    Ready,
}
