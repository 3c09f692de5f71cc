// Wire and view models for the inventory store
pub mod consumption_log;
pub mod item;
pub mod restock_alert;

pub use consumption_log::{ConsumptionLog, ConsumptionReceipt, NewConsumptionLog};
pub use item::{
    DaysRemaining, EnrichedItem, Item, NewItem, StockStatus, DEFAULT_UNIT, UNIT_OPTIONS,
};
pub use restock_alert::{RestockAlert, RestockCalendarEntry};
