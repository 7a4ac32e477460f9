/// Multiblock dispenser filling
///
/// While an active multiblock's dispenser is open, its 9 cells are driven
/// toward the selected recipe's padded 3x3 layout: stray items are moved out
/// and recipe cells are topped up from the player inventory, a few cells per
/// pass in round-robin order.
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::gui::{GameClient, OpenContainer};
use crate::handlers::throttle::Throttle;
use crate::inventory::InventorySnapshot;
use crate::recipe::{Ingredient, Recipe};
use crate::types::ItemStack;
use crate::utils::normalize_item_id;

pub const DISPENSER_SLOTS: usize = 9;

/// Cells worked per fill pass
pub const MAX_ACTIONS_PER_PASS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispenserStatus {
    /// Every cell matches the layout and recipe cells hold a full stack
    pub complete: bool,
    /// Machine runs the loaded contents support
    pub process_count: u32,
}

fn matches_cell(stack: &ItemStack, expected: &Ingredient) -> bool {
    stack
        .resolved_id()
        .eq_ignore_ascii_case(&normalize_item_id(&expected.item_id))
}

fn occupied<C: OpenContainer + ?Sized>(container: &C, cell: usize) -> Option<ItemStack> {
    container.slot(cell).filter(|stack| !stack.is_empty())
}

/// Compare the dispenser cells against `layout` (padded to 9 cells)
pub fn dispenser_status<C: OpenContainer + ?Sized>(container: &C, layout: &[Ingredient]) -> DispenserStatus {
    let mut complete = true;
    let mut process_count: Option<u32> = None;

    for (cell, expected) in layout.iter().enumerate().take(DISPENSER_SLOTS) {
        let stack = occupied(container, cell);

        if expected.is_empty() {
            if stack.is_some() {
                complete = false;
            }
            continue;
        }

        let runs = match stack {
            Some(stack) if matches_cell(&stack, expected) => {
                if !stack.is_full() {
                    complete = false;
                }
                stack.count / expected.amount.max(1)
            }
            _ => {
                complete = false;
                0
            }
        };
        process_count = Some(process_count.map_or(runs, |current| current.min(runs)));
    }

    DispenserStatus {
        complete,
        process_count: process_count.unwrap_or(0),
    }
}

#[derive(Debug)]
pub struct MultiblockHandler {
    throttle: Throttle,
    cursor: usize,
    last_status: DispenserStatus,
}

impl MultiblockHandler {
    pub fn new(fill_delay_ms: u64) -> Self {
        Self {
            throttle: Throttle::new(fill_delay_ms),
            cursor: 0,
            last_status: DispenserStatus::default(),
        }
    }

    pub fn set_fill_delay_ms(&mut self, fill_delay_ms: u64) {
        self.throttle.set_interval_ms(fill_delay_ms);
    }

    /// Status observed on the most recent tick
    pub fn last_status(&self) -> DispenserStatus {
        self.last_status
    }

    /// One fill pass, if the throttle allows. Returns the number of actions
    /// issued. The dispenser status is refreshed on every call.
    pub fn tick<C: GameClient + ?Sized>(&mut self, client: &mut C, recipe: &Recipe, now: u64) -> usize {
        let layout = recipe.padded_layout(DISPENSER_SLOTS);

        let actions = if self.throttle.try_acquire(now) {
            self.fill_pass(client, &layout)
        } else {
            0
        };

        self.last_status = dispenser_status(&*client, &layout);
        actions
    }

    fn fill_pass<C: GameClient + ?Sized>(&mut self, client: &mut C, layout: &[Ingredient]) -> usize {
        let snapshot = InventorySnapshot::capture(&*client);
        let mut used_player_slots = HashSet::new();
        let mut actions = 0;
        let mut last_worked = None;

        for step in 0..DISPENSER_SLOTS {
            if actions >= MAX_ACTIONS_PER_PASS {
                break;
            }
            let cell = (self.cursor + step) % DISPENSER_SLOTS;
            let expected = &layout[cell];

            let worked = match occupied(&*client, cell) {
                Some(stack) if expected.is_empty() || !matches_cell(&stack, expected) => {
                    debug!("Removing {} from dispenser cell {}", stack.resolved_id(), cell);
                    if let Err(e) = client.transfer_slot_to_player(cell) {
                        warn!("Failed to clear dispenser cell {}: {}", cell, e);
                    }
                    true
                }
                Some(stack) if stack.is_full() => false,
                _ if expected.is_empty() => false,
                _ => {
                    let wanted = normalize_item_id(&expected.item_id);
                    let source = snapshot
                        .entries()
                        .iter()
                        .find(|e| e.item_id.eq_ignore_ascii_case(&wanted) && !used_player_slots.contains(&e.slot));
                    match source {
                        Some(entry) => {
                            used_player_slots.insert(entry.slot);
                            if let Err(e) = client.transfer_player_stack_to_slot(entry.slot, cell) {
                                warn!("Failed to load {} into dispenser cell {}: {}", wanted, cell, e);
                            }
                            true
                        }
                        None => false,
                    }
                }
            };

            if worked {
                actions += 1;
                last_worked = Some(cell);
            }
        }

        if let Some(cell) = last_worked {
            self.cursor = (cell + 1) % DISPENSER_SLOTS;
            debug!("Dispenser fill pass issued {} actions", actions);
        }
        actions
    }

    /// Move every occupied dispenser cell back to the player
    pub fn clear_dispenser<C: GameClient + ?Sized>(&mut self, client: &mut C) -> usize {
        let mut cleared = 0;
        for cell in 0..DISPENSER_SLOTS {
            if occupied(&*client, cell).is_none() {
                continue;
            }
            match client.transfer_slot_to_player(cell) {
                Ok(()) => cleared += 1,
                Err(e) => warn!("Failed to clear dispenser cell {}: {}", cell, e),
            }
        }
        if cleared > 0 {
            info!("Cleared {} dispenser cells", cleared);
        }
        self.last_status = DispenserStatus::default();
        cleared
    }

    pub fn reset(&mut self) {
        self.throttle.reset();
        self.cursor = 0;
        self.last_status = DispenserStatus::default();
    }
}
