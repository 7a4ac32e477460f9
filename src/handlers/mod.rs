pub mod auto_clicker;
pub mod machine_handler;
pub mod multiblock_handler;
pub mod throttle;

pub use auto_clicker::{AutoClicker, ClickJob, StopReason};
pub use machine_handler::{MachineHandler, TickCounters, TickReport};
pub use multiblock_handler::{dispenser_status, DispenserStatus, MultiblockHandler, DISPENSER_SLOTS};
pub use throttle::Throttle;
