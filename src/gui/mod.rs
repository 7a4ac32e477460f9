pub mod container;

pub use container::{
    parse_container_title, GameClient, InventoryActions, OpenContainer, PlayerInventory,
    WorldActions, WorldView,
};
