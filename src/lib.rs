//! Slimefun machine automation core
//!
//! Detects the Slimefun machine or multiblock the player is using, matches
//! recipes against the player inventory and decides, tick by tick, which
//! item transfer or process click to perform next.

pub mod bot;
pub mod config;
pub mod error;
pub mod gui;
pub mod handlers;
pub mod inventory;
pub mod logging;
pub mod machine;
pub mod persistence;
pub mod recipe;
pub mod state;
pub mod structure;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use bot::{handle_event, AutomationBot, BotEvent, EventOutcome, TickResult};
pub use machine::MachineDescriptor;
pub use recipe::{Recipe, RecipeIndex, RecipeSummary};
pub use state::{OpenOutcome, SessionState};
pub use types::{BlockPos, ItemStack};
