use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::types::AIR;
use crate::utils::{display_name_from_id, normalize_item_id};

/// Item id -> total required amount, in order of first appearance
pub type GroupedRequirements = IndexMap<String, u32>;

/// One cell of a recipe's input list. `AIR` or a zero amount is an empty
/// grid cell: kept in ordered lists, never counted as a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ingredient {
    pub item_id: String,
    pub amount: u32,
}

impl Ingredient {
    pub fn new(item_id: impl Into<String>, amount: u32) -> Self {
        Self {
            item_id: item_id.into(),
            amount,
        }
    }

    pub fn air() -> Self {
        Self::new(AIR, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.amount == 0 || self.item_id.trim().is_empty() || self.item_id.eq_ignore_ascii_case(AIR)
    }

    /// Parse `"ITEM_ID:AMOUNT"`. An empty string is `AIR:0`; a missing or
    /// unparsable amount is 1; negative amounts collapse to 0.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::air();
        }

        match text.split_once(':') {
            Some((id, amount)) => Self::new(id.trim(), parse_amount(amount, 0)),
            None => Self::new(text, 1),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_id, self.amount)
    }
}

fn parse_amount(raw: &str, floor: i64) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(value) => u32::try_from(value.max(floor)).unwrap_or(u32::MAX),
        Err(_) => 1,
    }
}

/// A produced item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub item_id: String,
    pub display_name: String,
    pub amount: u32,
}

impl Output {
    pub fn new(item_id: impl Into<String>, amount: u32) -> Self {
        let item_id = item_id.into();
        Self {
            display_name: display_name_from_id(&item_id),
            item_id,
            amount: amount.max(1),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Parse `"ITEM_ID:AMOUNT"`, deriving the display name from the id
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::new("UNKNOWN", 1).with_display_name("Unknown Item");
        }

        match text.split_once(':') {
            Some((id, amount)) => Self::new(id.trim(), parse_amount(amount, 1)),
            None => Self::new(text, 1),
        }
    }
}

/// Group ingredients into requirement totals.
///
/// Ids are normalized; empty cells are skipped; duplicates are summed,
/// saturating at `u32::MAX`.
pub fn group_ingredients(inputs: &[Ingredient]) -> GroupedRequirements {
    let mut grouped = GroupedRequirements::new();
    for ingredient in inputs.iter().filter(|i| !i.is_empty()) {
        let total = grouped
            .entry(normalize_item_id(&ingredient.item_id))
            .or_insert(0);
        *total = total.saturating_add(ingredient.amount);
    }
    grouped
}

/// Immutable recipe. `grouped_inputs` is derived once from `inputs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    recipe_id: String,
    machine_id: String,
    inputs: Vec<Ingredient>,
    outputs: Vec<Output>,
    grouped_inputs: GroupedRequirements,
}

impl Recipe {
    pub fn new(
        recipe_id: impl Into<String>,
        machine_id: impl Into<String>,
        inputs: Vec<Ingredient>,
        outputs: Vec<Output>,
    ) -> Self {
        let grouped_inputs = group_ingredients(&inputs);
        Self {
            recipe_id: recipe_id.into(),
            machine_id: machine_id.into(),
            inputs,
            outputs,
            grouped_inputs,
        }
    }

    /// Build a recipe whose id is derived from its content
    pub fn with_content_id(
        machine_id: impl Into<String>,
        inputs: Vec<Ingredient>,
        outputs: Vec<Output>,
    ) -> Self {
        let machine_id = machine_id.into();
        let id = content_id(&machine_id, &inputs, &outputs);
        Self::new(id, machine_id, inputs, outputs)
    }

    pub fn recipe_id(&self) -> &str {
        &self.recipe_id
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn inputs(&self) -> &[Ingredient] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn grouped_inputs(&self) -> &GroupedRequirements {
        &self.grouped_inputs
    }

    pub fn primary_output(&self) -> Option<&Output> {
        self.outputs.first()
    }

    pub fn belongs_to(&self, machine_id: &str) -> bool {
        self.machine_id.eq_ignore_ascii_case(machine_id)
    }

    pub fn total_input_count(&self) -> u32 {
        self.grouped_inputs
            .values()
            .fold(0u32, |total, amount| total.saturating_add(*amount))
    }

    /// Ordered input cells padded with `AIR` (or truncated) to `size`
    pub fn padded_layout(&self, size: usize) -> Vec<Ingredient> {
        let mut layout: Vec<Ingredient> = self.inputs.iter().take(size).cloned().collect();
        layout.resize(size, Ingredient::air());
        layout
    }

    /// `Gold Dust x4 + 1 more`
    pub fn display_string(&self) -> String {
        let Some(primary) = self.primary_output() else {
            return "Unknown Recipe".to_string();
        };

        let mut display = primary.display_name.clone();
        if primary.amount > 1 {
            display.push_str(&format!(" x{}", primary.amount));
        }
        if self.outputs.len() > 1 {
            display.push_str(&format!(" + {} more", self.outputs.len() - 1));
        }
        display
    }

    pub fn inputs_string(&self) -> String {
        self.grouped_inputs
            .iter()
            .map(|(id, amount)| format!("{} x{}", id, amount))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recipe[{} -> {}]", self.inputs_string(), self.display_string())
    }
}

/// `<MACHINE>_<first 12 hex chars of sha256(inputs|outputs)>`
pub fn content_id(machine_id: &str, inputs: &[Ingredient], outputs: &[Output]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(machine_id.as_bytes());
    for input in inputs {
        hasher.update(b"|in:");
        hasher.update(input.to_string().as_bytes());
    }
    for output in outputs {
        hasher.update(b"|out:");
        hasher.update(format!("{}:{}", output.item_id, output.amount).as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    format!("{}_{}", normalize_item_id(machine_id), &digest[..12])
}
