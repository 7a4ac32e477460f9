pub mod materials;
pub mod matcher;
pub mod signature;

pub use materials::normalize_material;
pub use matcher::{DetectionResult, ScanResult, StructureMatcher, TemplateScore};
pub use signature::SignatureTable;
