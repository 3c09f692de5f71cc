use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

use crate::models::{EnrichedItem, StockStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Quantity,
    DaysRemaining,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Dashboard view over the cached items: search, status filter and sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryQuery {
    /// Case-insensitive substring of the item name.
    pub search: Option<String>,
    /// `None` shows every status.
    pub status: Option<StockStatus>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl InventoryQuery {
    /// Clicking the active column flips the direction; a new column starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.reversed();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    pub fn matches(&self, item: &EnrichedItem) -> bool {
        let name_ok = match &self.search {
            Some(term) if !term.is_empty() => item
                .name()
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        name_ok && self.status.map_or(true, |status| item.status == status)
    }

    pub fn apply(&self, items: &[EnrichedItem]) -> Vec<EnrichedItem> {
        let mut selected: Vec<EnrichedItem> =
            items.iter().filter(|item| self.matches(item)).cloned().collect();
        selected.sort_by(|a, b| {
            let ordering = compare(self.sort_field, a, b);
            match self.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        selected
    }
}

fn compare(field: SortField, a: &EnrichedItem, b: &EnrichedItem) -> Ordering {
    match field {
        SortField::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortField::Quantity => a.quantity().cmp(&b.quantity()),
        SortField::DaysRemaining => a.days_remaining.cmp(&b.days_remaining),
        SortField::Status => a.status.cmp(&b.status),
    }
}

/// Headline counts shown above the dashboard table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    /// Items projected to run out within the critical window.
    pub critical: usize,
}

impl DashboardStats {
    pub fn from_items(items: &[EnrichedItem], critical_days: u64) -> Self {
        items.iter().fold(
            DashboardStats {
                total: items.len(),
                ..Default::default()
            },
            |mut stats, item| {
                match item.status {
                    StockStatus::LowStock => stats.low_stock += 1,
                    StockStatus::OutOfStock => stats.out_of_stock += 1,
                    StockStatus::InStock => {}
                }
                if item.days_remaining.is_within(critical_days) {
                    stats.critical += 1;
                }
                stats
            },
        )
    }
}
