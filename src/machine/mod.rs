pub mod descriptor;
pub mod loader;
pub mod registry;

pub use descriptor::{MachineDescriptor, StructureBlock};
pub use loader::{load_machines_file, load_recipes_file, parse_machines, parse_recipes};
pub use registry::MachineRegistry;
