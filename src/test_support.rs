//! Shared fixtures for unit tests: an in-memory game client and sample data
use anyhow::{anyhow, Result};

use crate::gui::{InventoryActions, OpenContainer, PlayerInventory, WorldActions, WorldView};
use crate::machine::{MachineDescriptor, StructureBlock};
use crate::recipe::{Ingredient, Output, Recipe};
use crate::types::{BlockPos, ItemStack};

pub const PLAYER_SLOTS: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToPlayer(usize),
    ToSlot { player_slot: usize, target_slot: usize },
    Interact(BlockPos),
}

/// Game client double. Transfers are applied to its own slots so later ticks
/// observe their effect, and every successful action is recorded.
#[derive(Debug, Clone)]
pub struct FakeClient {
    pub container: Vec<Option<ItemStack>>,
    pub player: Vec<Option<ItemStack>>,
    pub blocks: Vec<(BlockPos, String)>,
    pub actions: Vec<Action>,
    pub fail_actions: bool,
}

impl FakeClient {
    pub fn new(container_size: usize) -> Self {
        Self {
            container: vec![None; container_size],
            player: vec![None; PLAYER_SLOTS],
            blocks: Vec::new(),
            actions: Vec::new(),
            fail_actions: false,
        }
    }

    pub fn with_player_stack(mut self, slot: usize, stack: ItemStack) -> Self {
        self.player[slot] = Some(stack);
        self
    }

    pub fn with_container_stack(mut self, slot: usize, stack: ItemStack) -> Self {
        self.container[slot] = Some(stack);
        self
    }

    pub fn with_block(mut self, pos: BlockPos, block: &str) -> Self {
        self.blocks.push((pos, block.to_string()));
        self
    }

    pub fn interactions(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, Action::Interact(_)))
            .count()
    }

    fn check(&self) -> Result<()> {
        if self.fail_actions {
            return Err(anyhow!("action rejected"));
        }
        Ok(())
    }
}

impl PlayerInventory for FakeClient {
    fn player_stacks(&self) -> Vec<(usize, ItemStack)> {
        self.player
            .iter()
            .enumerate()
            .filter_map(|(slot, stack)| stack.clone().map(|s| (slot, s)))
            .collect()
    }
}

impl OpenContainer for FakeClient {
    fn slot(&self, index: usize) -> Option<ItemStack> {
        self.container.get(index).cloned().flatten()
    }

    fn slot_count(&self) -> usize {
        self.container.len()
    }
}

impl InventoryActions for FakeClient {
    fn transfer_slot_to_player(&mut self, slot: usize) -> Result<()> {
        self.check()?;
        let stack = self
            .container
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or_else(|| anyhow!("slot {} is empty", slot))?;
        let free = self
            .player
            .iter()
            .position(Option::is_none)
            .ok_or_else(|| anyhow!("player inventory full"))?;
        self.player[free] = Some(stack);
        self.actions.push(Action::ToPlayer(slot));
        Ok(())
    }

    fn transfer_player_stack_to_slot(&mut self, player_slot: usize, target_slot: usize) -> Result<()> {
        self.check()?;
        let mut moving = self
            .player
            .get_mut(player_slot)
            .and_then(Option::take)
            .ok_or_else(|| anyhow!("player slot {} is empty", player_slot))?;

        match self.container[target_slot].as_mut() {
            None => self.container[target_slot] = Some(moving),
            Some(existing)
                if existing.item_type == moving.item_type
                    && existing.display_name == moving.display_name =>
            {
                let room = existing.max_stack_size.saturating_sub(existing.count);
                let moved = room.min(moving.count);
                existing.count += moved;
                moving.count -= moved;
                if moving.count > 0 {
                    self.player[player_slot] = Some(moving);
                }
            }
            Some(_) => self.player[player_slot] = Some(moving),
        }

        self.actions.push(Action::ToSlot {
            player_slot,
            target_slot,
        });
        Ok(())
    }
}

impl WorldView for FakeClient {
    fn scan_blocks(&self, center: BlockPos, radius: i32) -> Vec<(BlockPos, String)> {
        self.blocks
            .iter()
            .filter(|(pos, _)| {
                (pos.x - center.x).abs() <= radius
                    && (pos.y - center.y).abs() <= radius
                    && (pos.z - center.z).abs() <= radius
            })
            .cloned()
            .collect()
    }
}

impl WorldActions for FakeClient {
    fn trigger_interaction(&mut self, pos: BlockPos) -> Result<()> {
        self.check()?;
        self.actions.push(Action::Interact(pos));
        Ok(())
    }
}

/// Electric sawmill: inputs 0 and 1, output 2
pub fn sawmill() -> MachineDescriptor {
    MachineDescriptor::Electric {
        id: "SAWMILL".to_string(),
        display_name: "Sawmill".to_string(),
        inventory_title: "Sawmill".to_string(),
        input_slots: vec![0, 1],
        output_slots: vec![2],
    }
}

pub fn electric_furnace() -> MachineDescriptor {
    MachineDescriptor::Electric {
        id: "ELECTRIC_FURNACE".to_string(),
        display_name: "Electric Furnace".to_string(),
        inventory_title: "Electric Furnace".to_string(),
        input_slots: vec![19, 20],
        output_slots: vec![24, 25],
    }
}

/// Ore washer: dispenser on a fence, cauldron on top
pub fn ore_washer() -> MachineDescriptor {
    MachineDescriptor::Multiblock {
        id: "ORE_WASHER".to_string(),
        display_name: "Ore Washer".to_string(),
        inventory_title: None,
        structure: vec![
            StructureBlock::new("DISPENSER", "input"),
            StructureBlock::new("OAK_FENCE", "base"),
            StructureBlock::new("CAULDRON", "top"),
        ],
    }
}

pub fn planks() -> Recipe {
    Recipe::new(
        "PLANKS",
        "SAWMILL",
        vec![Ingredient::new("WOOD", 2)],
        vec![Output::new("PLANK", 4)],
    )
}

pub fn sifted_ore() -> Recipe {
    Recipe::new(
        "SIFTED_ORE",
        "ORE_WASHER",
        vec![Ingredient::new("GRAVEL", 1)],
        vec![Output::new("SIFTED_ORE", 1)],
    )
}

pub fn washed_sand() -> Recipe {
    Recipe::new(
        "WASHED_SAND",
        "ORE_WASHER",
        vec![Ingredient::new("SAND", 1)],
        vec![Output::new("CLAY", 1)],
    )
}

/// Blocks of a built ore washer with its dispenser at `dispenser`
pub fn ore_washer_blocks(client: FakeClient, dispenser: BlockPos) -> FakeClient {
    client
        .with_block(dispenser, "minecraft:dispenser")
        .with_block(dispenser.offset(0, -1, 0), "minecraft:oak_fence")
        .with_block(dispenser.offset(0, 1, 0), "minecraft:cauldron")
}
