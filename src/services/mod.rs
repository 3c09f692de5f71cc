pub mod forecasting;
pub mod inventory;

pub use inventory::{InventoryService, InventorySnapshot, LoadPhase};
