use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const MIN_AUTOMATION_DELAY_MS: u64 = 100;
pub const MAX_AUTOMATION_DELAY_MS: u64 = 2_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Initial automation state of a fresh session
    #[serde(default = "default_true")]
    pub automation_enabled: bool,

    /// Throttle window for each electric tick phase, clamped to 100..=2000
    #[serde(default = "default_automation_delay_ms")]
    pub automation_delay_ms: u64,

    /// Surface the sorted recipe list when a machine opens without a
    /// remembered recipe
    #[serde(default = "default_true")]
    pub auto_show_overlay: bool,

    /// Load the last chosen recipe when a machine opens and keep the
    /// selection across close
    #[serde(default)]
    pub remember_last_recipe: bool,

    /// Selecting a recipe switches automation on
    #[serde(default = "default_true")]
    pub start_on_select: bool,

    #[serde(default)]
    pub debug_mode: bool,

    /// Throttle window for dispenser fill passes
    #[serde(default = "default_multiblock_fill_delay_ms")]
    pub multiblock_fill_delay_ms: u64,

    /// Interval between auto-clicker clicks
    #[serde(default = "default_click_interval_ms")]
    pub click_interval_ms: u64,

    /// Machine records, relative to the config directory unless absolute
    #[serde(default = "default_machines_file")]
    pub machines_file: String,

    #[serde(default = "default_recipes_file")]
    pub recipes_file: String,

    #[serde(default)]
    pub detection: DetectionConfig,

    /// Machine id -> signature materials, replacing the built-in set.
    /// The first material is the block the auto-clicker interacts with.
    #[serde(default)]
    pub signatures: IndexMap<String, Vec<String>>,
}

/// Structure matcher scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_scan_radius")]
    pub scan_radius: i32,

    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    #[serde(default = "default_excess_penalty_step")]
    pub excess_penalty_step: f64,

    #[serde(default = "default_excess_penalty_cap")]
    pub excess_penalty_cap: f64,

    #[serde(default = "default_missing_penalty_step")]
    pub missing_penalty_step: f64,

    #[serde(default = "default_missing_penalty_cap")]
    pub missing_penalty_cap: f64,

    #[serde(default = "default_exact_match_bonus")]
    pub exact_match_bonus: f64,

    #[serde(default = "default_signature_bonus")]
    pub signature_bonus: f64,

    /// Radius searched for a remembered structure near a dispenser
    #[serde(default = "default_cache_search_radius")]
    pub cache_search_radius: i32,
}

// Default values
fn default_true() -> bool {
    true
}

fn default_automation_delay_ms() -> u64 {
    200
}

fn default_multiblock_fill_delay_ms() -> u64 {
    25
}

fn default_click_interval_ms() -> u64 {
    1_000
}

fn default_machines_file() -> String {
    "slimefun_machines.json".to_string()
}

fn default_recipes_file() -> String {
    "slimefun_recipes.json".to_string()
}

fn default_scan_radius() -> i32 {
    4
}

fn default_min_confidence() -> f64 {
    0.6
}

fn default_excess_penalty_step() -> f64 {
    0.05
}

fn default_excess_penalty_cap() -> f64 {
    0.3
}

fn default_missing_penalty_step() -> f64 {
    0.1
}

fn default_missing_penalty_cap() -> f64 {
    0.5
}

fn default_exact_match_bonus() -> f64 {
    0.2
}

fn default_signature_bonus() -> f64 {
    0.1
}

fn default_cache_search_radius() -> i32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            automation_enabled: true,
            automation_delay_ms: default_automation_delay_ms(),
            auto_show_overlay: true,
            remember_last_recipe: false,
            start_on_select: true,
            debug_mode: false,
            multiblock_fill_delay_ms: default_multiblock_fill_delay_ms(),
            click_interval_ms: default_click_interval_ms(),
            detection: DetectionConfig::default(),
            signatures: IndexMap::new(),
            machines_file: default_machines_file(),
            recipes_file: default_recipes_file(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            scan_radius: default_scan_radius(),
            min_confidence: default_min_confidence(),
            excess_penalty_step: default_excess_penalty_step(),
            excess_penalty_cap: default_excess_penalty_cap(),
            missing_penalty_step: default_missing_penalty_step(),
            missing_penalty_cap: default_missing_penalty_cap(),
            exact_match_bonus: default_exact_match_bonus(),
            signature_bonus: default_signature_bonus(),
            cache_search_radius: default_cache_search_radius(),
        }
    }
}

impl Config {
    /// Clamp values that have a valid range
    pub fn sanitize(&mut self) {
        self.automation_delay_ms = self
            .automation_delay_ms
            .clamp(MIN_AUTOMATION_DELAY_MS, MAX_AUTOMATION_DELAY_MS);
        self.detection.scan_radius = self.detection.scan_radius.clamp(1, 16);
        self.detection.min_confidence = self.detection.min_confidence.clamp(0.0, 1.0);
    }

    pub fn set_automation_delay_ms(&mut self, delay_ms: u64) {
        self.automation_delay_ms = delay_ms.clamp(MIN_AUTOMATION_DELAY_MS, MAX_AUTOMATION_DELAY_MS);
    }

    /// Log level used when `RUST_LOG` is unset
    pub fn default_log_level(&self) -> &'static str {
        if self.debug_mode {
            "debug"
        } else {
            "info"
        }
    }
}
