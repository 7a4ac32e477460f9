pub mod client;
pub mod events;

pub use client::{AutomationBot, TickResult};
pub use events::{handle_event, run_event_loop, BotEvent, EventOutcome};
