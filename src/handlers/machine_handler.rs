/// Electric machine tick engine
///
/// Each tick runs two independently throttled phases:
/// - Output phase: every occupied output slot is quick-moved to the player
/// - Input phase: one player stack per required item is moved into a cached
///   empty input slot
///
/// The empty-slot cache is updated optimistically when a transfer is issued
/// and may be briefly stale; the periodic rescan reconciles it.
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::gui::{GameClient, OpenContainer, PlayerInventory};
use crate::handlers::throttle::Throttle;
use crate::inventory::InventorySnapshot;
use crate::recipe::GroupedRequirements;

/// Input slots are rescanned at most this often, regardless of the phase delay
pub const EMPTY_SLOT_REFRESH_MS: u64 = 100;

/// Player inventory snapshots are reused for at most this long
pub const SNAPSHOT_MAX_AGE_MS: u64 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCounters {
    pub output_passes: u64,
    pub input_passes: u64,
    pub extracted: u64,
    pub inserted: u64,
    pub failed_actions: u64,
}

/// Transfers issued by one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub extracted: usize,
    pub inserted: usize,
}

#[derive(Debug)]
pub struct MachineHandler {
    output_throttle: Throttle,
    input_throttle: Throttle,
    empty_slot_refresh: Throttle,
    empty_slots: BTreeSet<usize>,
    snapshot: Option<(u64, InventorySnapshot)>,
    counters: TickCounters,
}

impl MachineHandler {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            output_throttle: Throttle::new(delay_ms),
            input_throttle: Throttle::new(delay_ms),
            empty_slot_refresh: Throttle::new(EMPTY_SLOT_REFRESH_MS),
            empty_slots: BTreeSet::new(),
            snapshot: None,
            counters: TickCounters::default(),
        }
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.output_throttle.set_interval_ms(delay_ms);
        self.input_throttle.set_interval_ms(delay_ms);
    }

    pub fn counters(&self) -> TickCounters {
        self.counters
    }

    /// Input slots currently believed to be empty
    pub fn cached_empty_slots(&self) -> &BTreeSet<usize> {
        &self.empty_slots
    }

    /// One tick against the open machine container
    pub fn tick<C: GameClient + ?Sized>(
        &mut self,
        client: &mut C,
        input_slots: &[usize],
        output_slots: &[usize],
        requirements: &GroupedRequirements,
        now: u64,
    ) -> TickReport {
        let mut report = TickReport::default();

        if !output_slots.is_empty() && self.output_throttle.try_acquire(now) {
            report.extracted = self.run_output_phase(client, output_slots);
        }

        if !input_slots.is_empty()
            && !requirements.is_empty()
            && self.input_throttle.try_acquire(now)
        {
            report.inserted = self.run_input_phase(client, input_slots, requirements, now);
        }

        report
    }

    fn run_output_phase<C: GameClient + ?Sized>(&mut self, client: &mut C, output_slots: &[usize]) -> usize {
        self.counters.output_passes += 1;
        let mut extracted = 0;

        for &slot in output_slots {
            let occupied = client.slot(slot).map_or(false, |stack| !stack.is_empty());
            if !occupied {
                continue;
            }

            match client.transfer_slot_to_player(slot) {
                Ok(()) => {
                    debug!("Extracted output slot {}", slot);
                    extracted += 1;
                    self.counters.extracted += 1;
                    // Player inventory changed
                    self.snapshot = None;
                }
                Err(e) => {
                    warn!("Failed to extract output slot {}: {}", slot, e);
                    self.counters.failed_actions += 1;
                }
            }
        }

        extracted
    }

    fn run_input_phase<C: GameClient + ?Sized>(
        &mut self,
        client: &mut C,
        input_slots: &[usize],
        requirements: &GroupedRequirements,
        now: u64,
    ) -> usize {
        self.counters.input_passes += 1;

        if self.empty_slot_refresh.try_acquire(now) {
            self.refresh_empty_slots(&*client, input_slots);
        }
        if self.empty_slots.is_empty() {
            return 0;
        }

        let sources: Vec<(&String, usize)> = {
            let snapshot = self.snapshot(&*client, now);
            requirements
                .keys()
                .filter_map(|item| snapshot.first_slot_of(item).map(|slot| (item, slot)))
                .collect()
        };

        let mut inserted = 0;
        for (item, player_slot) in sources {
            let Some(target) = self.empty_slots.pop_first() else {
                break;
            };

            match client.transfer_player_stack_to_slot(player_slot, target) {
                Ok(()) => {
                    debug!("Moved {} from player slot {} to input slot {}", item, player_slot, target);
                    inserted += 1;
                    self.counters.inserted += 1;
                }
                Err(e) => {
                    warn!("Failed to move {} into slot {}: {}", item, target, e);
                    self.counters.failed_actions += 1;
                }
            }
        }

        if inserted > 0 {
            self.snapshot = None;
        }
        inserted
    }

    fn refresh_empty_slots<C: OpenContainer + ?Sized>(&mut self, client: &C, input_slots: &[usize]) {
        self.empty_slots = input_slots
            .iter()
            .copied()
            .filter(|&slot| client.slot(slot).map_or(true, |stack| stack.is_empty()))
            .collect();
        debug!("Empty input slots: {:?}", self.empty_slots);
    }

    fn snapshot<C: PlayerInventory + ?Sized>(&mut self, client: &C, now: u64) -> &InventorySnapshot {
        let stale = self
            .snapshot
            .as_ref()
            .map_or(true, |(taken, _)| now.saturating_sub(*taken) > SNAPSHOT_MAX_AGE_MS);
        if stale {
            self.snapshot = None;
        }
        &self
            .snapshot
            .get_or_insert_with(|| (now, InventorySnapshot::capture(client)))
            .1
    }

    /// Drop the empty-slot and inventory caches
    pub fn clear_caches(&mut self) {
        self.empty_slots.clear();
        self.snapshot = None;
        self.empty_slot_refresh.reset();
    }

    /// Caches, throttle windows and counters back to a fresh state
    pub fn reset(&mut self) {
        self.clear_caches();
        self.output_throttle.reset();
        self.input_throttle.reset();
        self.counters = TickCounters::default();
    }
}
