use serde::{Deserialize, Serialize};

/// One block of a multiblock's structure template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureBlock {
    pub material: String,
    #[serde(default)]
    pub label: String,
}

impl StructureBlock {
    pub fn new(material: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            label: label.into(),
        }
    }
}

/// A known Slimefun machine.
///
/// Electric machines are GUI containers with fixed input/output slots.
/// Multiblocks are block arrangements fed through a dispenser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineDescriptor {
    Electric {
        id: String,
        display_name: String,
        inventory_title: String,
        input_slots: Vec<usize>,
        output_slots: Vec<usize>,
    },
    Multiblock {
        id: String,
        display_name: String,
        inventory_title: Option<String>,
        structure: Vec<StructureBlock>,
    },
}

impl MachineDescriptor {
    pub fn id(&self) -> &str {
        match self {
            MachineDescriptor::Electric { id, .. } | MachineDescriptor::Multiblock { id, .. } => id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            MachineDescriptor::Electric { display_name, .. }
            | MachineDescriptor::Multiblock { display_name, .. } => display_name,
        }
    }

    pub fn inventory_title(&self) -> Option<&str> {
        match self {
            MachineDescriptor::Electric { inventory_title, .. } => Some(inventory_title),
            MachineDescriptor::Multiblock { inventory_title, .. } => inventory_title.as_deref(),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            MachineDescriptor::Electric { .. } => "electric",
            MachineDescriptor::Multiblock { .. } => "multiblock",
        }
    }
}
