pub mod snapshot;

pub use snapshot::{InventorySnapshot, SnapshotEntry};
