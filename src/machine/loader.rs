/// Machine and recipe records from JSON arrays.
///
/// Each array element is decoded on its own; a malformed element is logged
/// and skipped without affecting the rest.
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::RecordError;
use crate::machine::descriptor::{MachineDescriptor, StructureBlock};
use crate::recipe::{Ingredient, Output, Recipe};
use crate::utils::display_name_from_id;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachineRecord {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inventory_title: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    input_slots: Vec<usize>,
    #[serde(default)]
    output_slots: Vec<usize>,
    #[serde(default)]
    structure: Vec<StructureEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StructureEntry {
    Material(String),
    Block(StructureBlock),
}

impl From<StructureEntry> for StructureBlock {
    fn from(entry: StructureEntry) -> Self {
        match entry {
            StructureEntry::Material(material) => StructureBlock::new(material, ""),
            StructureEntry::Block(block) => block,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipeRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "machine")]
    machine_type: Option<String>,
    #[serde(default)]
    inputs: Vec<String>,
    #[serde(default)]
    outputs: Vec<String>,
    #[serde(default)]
    output: Option<String>,
}

fn require_object<'a>(value: &'a JsonValue, field: &'static str) -> Result<&'a JsonValue, RecordError> {
    let object = value.as_object().ok_or(RecordError::NotAnObject)?;
    if !object.contains_key(field) {
        return Err(RecordError::MissingField(field));
    }
    Ok(value)
}

pub fn machine_from_value(value: &JsonValue) -> Result<MachineDescriptor, RecordError> {
    let record: MachineRecord = serde_json::from_value(require_object(value, "id")?.clone())?;

    let display_name = record
        .name
        .unwrap_or_else(|| display_name_from_id(&record.id));
    let is_multiblock = match record.kind.as_deref() {
        Some(kind) => kind.eq_ignore_ascii_case("MULTIBLOCK"),
        None => !record.structure.is_empty(),
    };

    if is_multiblock {
        if record.structure.is_empty() {
            return Err(RecordError::NoStructure(record.id));
        }
        return Ok(MachineDescriptor::Multiblock {
            id: record.id,
            display_name,
            inventory_title: record.inventory_title,
            structure: record.structure.into_iter().map(StructureBlock::from).collect(),
        });
    }

    Ok(MachineDescriptor::Electric {
        inventory_title: record.inventory_title.unwrap_or_else(|| record.id.clone()),
        id: record.id,
        display_name,
        input_slots: record.input_slots,
        output_slots: record.output_slots,
    })
}

pub fn recipe_from_value(value: &JsonValue) -> Result<Recipe, RecordError> {
    let record: RecipeRecord =
        serde_json::from_value(require_object(value, "inputs")?.clone())?;

    let machine_id = record.machine_type.unwrap_or_else(|| "UNKNOWN".to_string());
    let inputs: Vec<Ingredient> = record.inputs.iter().map(|s| Ingredient::parse(s)).collect();
    let mut outputs: Vec<Output> = record.outputs.iter().map(|s| Output::parse(s)).collect();
    if outputs.is_empty() {
        outputs.extend(record.output.as_deref().map(Output::parse));
    }

    if inputs.iter().all(Ingredient::is_empty) || outputs.is_empty() {
        return Err(RecordError::Empty(
            record.id.unwrap_or_else(|| machine_id.clone()),
        ));
    }

    Ok(match record.id {
        Some(id) if !id.trim().is_empty() => Recipe::new(id, machine_id, inputs, outputs),
        _ => Recipe::with_content_id(machine_id, inputs, outputs),
    })
}

fn parse_array<T, F>(json: &str, what: &str, decode: F) -> Result<Vec<T>>
where
    F: Fn(&JsonValue) -> Result<T, RecordError>,
{
    let document: JsonValue =
        serde_json::from_str(json).with_context(|| format!("Failed to parse {} JSON", what))?;
    let Some(elements) = document.as_array() else {
        bail!("{} data must be a JSON array", what);
    };

    let mut parsed = Vec::with_capacity(elements.len());
    for (position, element) in elements.iter().enumerate() {
        match decode(element) {
            Ok(value) => parsed.push(value),
            Err(e) => warn!("Skipping {} record #{}: {}", what, position, e),
        }
    }

    info!("Loaded {} of {} {} records", parsed.len(), elements.len(), what);
    Ok(parsed)
}

pub fn parse_machines(json: &str) -> Result<Vec<MachineDescriptor>> {
    parse_array(json, "machine", machine_from_value)
}

pub fn parse_recipes(json: &str) -> Result<Vec<Recipe>> {
    parse_array(json, "recipe", recipe_from_value)
}

pub fn load_machines_file(path: &Path) -> Result<Vec<MachineDescriptor>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read machines file {:?}", path))?;
    parse_machines(&contents)
}

pub fn load_recipes_file(path: &Path) -> Result<Vec<Recipe>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipes file {:?}", path))?;
    parse_recipes(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MACHINES: &str = r#"[
        {"id": "ELECTRIC_FURNACE", "name": "Electric Furnace",
         "inventoryTitle": "&cElectric Furnace", "inputSlots": [19, 20], "outputSlots": [24, 25]},
        {"inventoryTitle": "no id here"},
        {"id": "SMELTERY", "type": "MULTIBLOCK",
         "structure": ["NETHER_BRICK_FENCE", {"material": "DISPENSER", "label": "input"}]},
        {"id": "BROKEN", "type": "MULTIBLOCK"},
        {"id": "ORE_WASHER_TITLE", "inputSlots": "oops"},
        42
    ]"#;

    #[test]
    fn test_parse_machines_skips_malformed_records() {
        let machines = parse_machines(MACHINES).unwrap();
        assert_eq!(machines.len(), 2);

        match &machines[0] {
            MachineDescriptor::Electric { input_slots, output_slots, inventory_title, .. } => {
                assert_eq!(input_slots, &vec![19, 20]);
                assert_eq!(output_slots, &vec![24, 25]);
                assert_eq!(inventory_title, "&cElectric Furnace");
            }
            other => panic!("expected electric machine, got {:?}", other),
        }

        match &machines[1] {
            MachineDescriptor::Multiblock { structure, display_name, .. } => {
                assert_eq!(display_name, "Smeltery");
                assert_eq!(structure.len(), 2);
                assert_eq!(structure[1].label, "input");
            }
            other => panic!("expected multiblock, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_recipes() {
        let json = r#"[
            {"id": "IRON_INGOT_SMELT", "machineType": "SMELTERY",
             "inputs": ["IRON_DUST:1"], "outputs": ["IRON_INGOT:1"]},
            {"machineType": "ENHANCED_CRAFTING_TABLE",
             "inputs": ["STICK:1", "", "STICK:1"], "output": "TORCH:4"},
            {"id": "EMPTY", "machineType": "SMELTERY", "inputs": ["AIR:0"], "outputs": ["X:1"]},
            {"id": "NO_INPUTS", "outputs": ["X:1"]}
        ]"#;
        let recipes = parse_recipes(json).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].recipe_id(), "IRON_INGOT_SMELT");
        assert!(recipes[1].recipe_id().starts_with("ENHANCED_CRAFTING_TABLE_"));
        assert_eq!(recipes[1].inputs().len(), 3);
        assert_eq!(recipes[1].grouped_inputs()["STICK"], 2);
        assert_eq!(recipes[1].outputs()[0].amount, 4);
    }

    #[test]
    fn test_oversized_duplicate_inputs_do_not_abort_loading() {
        let json = r#"[
            {"id": "HUGE", "machineType": "COMPRESSOR",
             "inputs": ["COAL:4294967295", "COAL:1"], "outputs": ["CARBON:1"]},
            {"id": "CARBON", "machineType": "COMPRESSOR",
             "inputs": ["COAL:8"], "outputs": ["CARBON:1"]}
        ]"#;
        let recipes = parse_recipes(json).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].grouped_inputs()["COAL"], u32::MAX);
        assert_eq!(recipes[1].recipe_id(), "CARBON");
    }

    #[test]
    fn test_non_array_document_is_an_error() {
        assert!(parse_machines(r#"{"id": "X"}"#).is_err());
        assert!(parse_recipes("not json").is_err());
    }
}
