use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::bot::client::{AutomationBot, TickResult};
use crate::error::SelectionError;
use crate::gui::GameClient;
use crate::state::OpenOutcome;
use crate::types::BlockPos;

/// Events the host feeds into the automation core
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    /// A container screen opened (raw title, possibly a JSON chat component)
    ContainerOpened(String),
    /// A multiblock dispenser was opened at this position
    DispenserOpened(BlockPos),
    /// The open container closed
    ContainerClosed,
    /// One client tick elapsed
    Tick,
    /// The player picked a recipe from the overlay
    RecipeSelected { recipe_id: String, remember: bool },
    ClearSelection,
    ToggleAutomation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Opened(OpenOutcome),
    Closed,
    Ticked(TickResult),
    Selected(Result<(), SelectionError>),
    SelectionCleared(Option<String>),
    Toggled(bool),
}

/// Apply one event to the bot
pub fn handle_event<C: GameClient + ?Sized>(
    bot: &mut AutomationBot,
    client: &mut C,
    event: BotEvent,
) -> EventOutcome {
    match event {
        BotEvent::ContainerOpened(title) => EventOutcome::Opened(bot.on_machine_open(&*client, &title)),
        BotEvent::DispenserOpened(pos) => EventOutcome::Opened(bot.on_structure_open(&*client, pos)),
        BotEvent::ContainerClosed => {
            bot.on_machine_close();
            EventOutcome::Closed
        }
        BotEvent::Tick => EventOutcome::Ticked(bot.tick(client)),
        BotEvent::RecipeSelected { recipe_id, remember } => {
            let result = bot.select_recipe(client, &recipe_id, remember);
            if let Err(e) = &result {
                warn!("Recipe selection rejected: {}", e);
            }
            EventOutcome::Selected(result)
        }
        BotEvent::ClearSelection => EventOutcome::SelectionCleared(bot.clear_selection()),
        BotEvent::ToggleAutomation => EventOutcome::Toggled(bot.toggle_automation()),
    }
}

/// Drain `events` in order until every sender is gone. Returns the number
/// of events handled.
pub async fn run_event_loop<C: GameClient + ?Sized>(
    bot: &mut AutomationBot,
    client: &mut C,
    mut events: mpsc::UnboundedReceiver<BotEvent>,
) -> usize {
    let mut handled = 0;
    while let Some(event) = events.recv().await {
        if !matches!(event, BotEvent::Tick) {
            debug!("Event: {:?}", event);
        }
        handle_event(bot, client, event);
        handled += 1;
    }
    debug!("Event channel closed after {} events", handled);
    handled
}
