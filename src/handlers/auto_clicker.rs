use tracing::{debug, info, warn};

use crate::gui::GameClient;
use crate::handlers::throttle::Throttle;
use crate::inventory::InventorySnapshot;
use crate::structure::normalize_material;
use crate::types::BlockPos;

/// Radius of the cube around the dispenser searched for the trigger block
pub const TRIGGER_SEARCH_RADIUS: i32 = 1;

/// A running batch of process clicks on one multiblock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickJob {
    pub machine_id: String,
    pub recipe_id: String,
    /// Canonical material of the block that runs the machine
    pub trigger_material: String,
    /// Dispenser position
    pub anchor: BlockPos,
    pub required_items: Vec<String>,
    pub target_clicks: u32,
    pub clicks_done: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Completed,
    AutomationDisabled,
    OutOfMaterials,
    Cancelled,
}

#[derive(Debug)]
pub struct AutoClicker {
    throttle: Throttle,
    job: Option<ClickJob>,
}

impl AutoClicker {
    pub fn new(click_interval_ms: u64) -> Self {
        Self {
            throttle: Throttle::new(click_interval_ms),
            job: None,
        }
    }

    pub fn set_click_interval_ms(&mut self, click_interval_ms: u64) {
        self.throttle.set_interval_ms(click_interval_ms);
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    pub fn job(&self) -> Option<&ClickJob> {
        self.job.as_ref()
    }

    /// Replace any running job with `job`
    pub fn start(&mut self, job: ClickJob) {
        if job.target_clicks == 0 {
            debug!("Not starting auto-clicker for {} with no runs", job.machine_id);
            return;
        }
        info!(
            "Auto-clicker started: {} x{} on {} at {}",
            job.recipe_id, job.target_clicks, job.machine_id, job.anchor
        );
        self.throttle.reset();
        self.job = Some(job);
    }

    pub fn stop(&mut self, reason: StopReason) -> Option<ClickJob> {
        let job = self.job.take()?;
        info!(
            "Auto-clicker stopped ({:?}) after {}/{} clicks on {}",
            reason, job.clicks_done, job.target_clicks, job.machine_id
        );
        Some(job)
    }

    /// Advance the running job. Returns why it stopped, if it did.
    pub fn tick<C: GameClient + ?Sized>(
        &mut self,
        client: &mut C,
        automation_enabled: bool,
        now: u64,
    ) -> Option<StopReason> {
        let job = self.job.as_ref()?;

        let stop = if !automation_enabled {
            Some(StopReason::AutomationDisabled)
        } else if job.clicks_done >= job.target_clicks {
            Some(StopReason::Completed)
        } else if job.clicks_done > 0
            && !InventorySnapshot::capture(&*client).contains_any(&job.required_items)
        {
            Some(StopReason::OutOfMaterials)
        } else {
            None
        };
        if let Some(reason) = stop {
            self.stop(reason);
            return Some(reason);
        }

        if !self.throttle.try_acquire(now) {
            return None;
        }

        let Some(target) = find_trigger(&*client, job) else {
            debug!("{} not found near {}, skipping click", job.trigger_material, job.anchor);
            return None;
        };

        match client.trigger_interaction(target) {
            Ok(()) => {
                let job = self.job.as_mut()?;
                job.clicks_done += 1;
                debug!("Click {}/{} on {}", job.clicks_done, job.target_clicks, target);
                if job.clicks_done >= job.target_clicks {
                    self.stop(StopReason::Completed);
                    return Some(StopReason::Completed);
                }
            }
            Err(e) => warn!("Failed to click {} at {}: {}", job.trigger_material, target, e),
        }
        None
    }
}

/// Closest block of the trigger material around the dispenser
fn find_trigger<C: GameClient + ?Sized>(client: &C, job: &ClickJob) -> Option<BlockPos> {
    client
        .scan_blocks(job.anchor, TRIGGER_SEARCH_RADIUS)
        .into_iter()
        .filter(|(_, block)| normalize_material(block) == job.trigger_material)
        .map(|(pos, _)| pos)
        .min_by_key(|pos| (pos.distance_squared(&job.anchor), *pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ore_washer_blocks, Action, FakeClient};
    use crate::types::ItemStack;

    fn job(anchor: BlockPos, target_clicks: u32) -> ClickJob {
        ClickJob {
            machine_id: "ORE_WASHER".to_string(),
            recipe_id: "SIFTED_ORE".to_string(),
            trigger_material: "CAULDRON".to_string(),
            anchor,
            required_items: vec!["GRAVEL".to_string()],
            target_clicks,
            clicks_done: 0,
        }
    }

    #[test]
    fn test_clicks_trigger_until_target() {
        let anchor = BlockPos::new(0, 64, 0);
        let mut client = ore_washer_blocks(FakeClient::new(9), anchor)
            .with_player_stack(0, ItemStack::new("GRAVEL", 64));
        let mut clicker = AutoClicker::new(1_000);
        clicker.start(job(anchor, 2));

        assert_eq!(clicker.tick(&mut client, true, 0), None);
        assert_eq!(clicker.tick(&mut client, true, 500), None);
        assert_eq!(client.interactions(), 1);
        assert_eq!(clicker.tick(&mut client, true, 1_000), Some(StopReason::Completed));
        assert_eq!(client.actions.last(), Some(&Action::Interact(anchor.offset(0, 1, 0))));
        assert!(!clicker.is_running());
    }

    #[test]
    fn test_stops_when_automation_disabled() {
        let anchor = BlockPos::new(0, 64, 0);
        let mut client = ore_washer_blocks(FakeClient::new(9), anchor);
        let mut clicker = AutoClicker::new(1_000);
        clicker.start(job(anchor, 5));

        assert_eq!(clicker.tick(&mut client, false, 0), Some(StopReason::AutomationDisabled));
        assert_eq!(client.interactions(), 0);
    }

    #[test]
    fn test_stops_when_player_runs_out_after_first_click() {
        let anchor = BlockPos::new(0, 64, 0);
        let mut client = ore_washer_blocks(FakeClient::new(9), anchor);
        let mut clicker = AutoClicker::new(1_000);
        clicker.start(job(anchor, 5));

        // The first click only relies on the dispenser contents
        assert_eq!(clicker.tick(&mut client, true, 0), None);
        assert_eq!(client.interactions(), 1);
        assert_eq!(clicker.tick(&mut client, true, 1_000), Some(StopReason::OutOfMaterials));
    }

    #[test]
    fn test_missing_trigger_skips_click() {
        let anchor = BlockPos::new(0, 64, 0);
        let mut client = FakeClient::new(9).with_block(anchor, "minecraft:dispenser");
        let mut clicker = AutoClicker::new(1_000);
        clicker.start(job(anchor, 1));

        assert_eq!(clicker.tick(&mut client, true, 0), None);
        assert!(clicker.is_running());
        assert_eq!(clicker.job().unwrap().clicks_done, 0);
    }

    #[test]
    fn test_zero_target_never_starts() {
        let mut clicker = AutoClicker::new(1_000);
        clicker.start(job(BlockPos::new(0, 0, 0), 0));
        assert!(!clicker.is_running());
    }
}
