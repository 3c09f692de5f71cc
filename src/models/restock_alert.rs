use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DaysRemaining;

/// Read-only reorder recommendation computed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockAlert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub item_name: String,
    #[serde(alias = "current_stock")]
    pub current_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restock_threshold: Option<u32>,
    #[serde(alias = "predicted_days_to_run_out")]
    pub days_until_depletion: DaysRemaining,
    #[serde(alias = "recommended_reorder_quantity")]
    pub recommended_order_quantity: u32,
}

/// One row of the store's weekly restock calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockCalendarEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub item_name: String,
    pub restock_date: NaiveDate,
    pub recommended_quantity: u32,
}
