use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};
use validator::{Validate, ValidationError};

/// Suggested units of measure offered by the item form. Not enforced.
pub const UNIT_OPTIONS: [&str; 13] = [
    "pieces", "kg", "g", "lbs", "oz", "liters", "ml", "gallons", "cups", "boxes", "bottles",
    "cans", "packages",
];

pub const DEFAULT_UNIT: &str = "pieces";

/// An inventory record as held by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Assigned by the store; absent until persisted.
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub restock_threshold: u32,
    /// Average daily usage. Zero means the usage rate is not tracked.
    pub daily_consumption: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// An item that has not been persisted yet: the create payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewItem {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub quantity: u32,
    #[validate(range(min = 1, message = "Restock threshold must be a positive number"))]
    pub restock_threshold: u32,
    #[validate(custom = "validate_daily_consumption")]
    pub daily_consumption: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,
}

fn validate_daily_consumption(rate: f64) -> Result<(), ValidationError> {
    if rate.is_finite() && rate > 0.0 {
        return Ok(());
    }
    let mut err = ValidationError::new("positive");
    err.message = Some("Daily consumption must be a positive number".into());
    Err(err)
}

/// Stock health derived from quantity against the restock threshold.
///
/// Declaration order is also the sort order used by the dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Human-readable label, e.g. "Low Stock".
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }

    pub fn needs_restock(&self) -> bool {
        !matches!(self, StockStatus::InStock)
    }
}

/// Projected whole days until stock runs out.
///
/// `Unbounded` sorts after every finite value. On the wire it is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum DaysRemaining {
    Finite(u64),
    Unbounded,
}

impl DaysRemaining {
    pub fn finite(&self) -> Option<u64> {
        match self {
            DaysRemaining::Finite(days) => Some(*days),
            DaysRemaining::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, DaysRemaining::Unbounded)
    }

    /// True when the projection is finite and no more than `days`.
    pub fn is_within(&self, days: u64) -> bool {
        matches!(self, DaysRemaining::Finite(d) if *d <= days)
    }
}

impl From<Option<u64>> for DaysRemaining {
    fn from(value: Option<u64>) -> Self {
        value.map_or(DaysRemaining::Unbounded, DaysRemaining::Finite)
    }
}

impl From<DaysRemaining> for Option<u64> {
    fn from(value: DaysRemaining) -> Self {
        value.finite()
    }
}

impl fmt::Display for DaysRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysRemaining::Finite(days) => write!(f, "{}", days),
            DaysRemaining::Unbounded => f.write_str("Infinite"),
        }
    }
}

/// An item with its derived, never-persisted status and forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: Item,
    pub status: StockStatus,
    pub days_remaining: DaysRemaining,
}

impl EnrichedItem {
    /// The base record without derived fields.
    pub fn as_item(&self) -> &Item {
        &self.item
    }

    pub fn name(&self) -> &str {
        &self.item.name
    }

    pub fn quantity(&self) -> u32 {
        self.item.quantity
    }
}
