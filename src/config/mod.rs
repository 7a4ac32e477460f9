pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{Config, DetectionConfig, MAX_AUTOMATION_DELAY_MS, MIN_AUTOMATION_DELAY_MS};
