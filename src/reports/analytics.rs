use chrono::{Days, NaiveDate};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::models::{DaysRemaining, EnrichedItem, StockStatus};
use crate::services::forecasting::recommend_reorder_quantity;

const TOP_CONSUMERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: StockStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopConsumer {
    pub item_name: String,
    pub daily_consumption: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalItem {
    pub item_name: String,
    pub quantity: u32,
    pub status: StockStatus,
    pub days_remaining: DaysRemaining,
    pub recommended_order_quantity: u32,
}

/// Number of items projected to run out on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepletionDay {
    pub days_ahead: u64,
    pub date: NaiveDate,
    pub items_depleting: usize,
}

/// Inventory-wide summary behind the analytics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub generated_on: NaiveDate,
    pub status_distribution: Vec<StatusCount>,
    pub top_consumers: Vec<TopConsumer>,
    pub critical_items: Vec<CriticalItem>,
    pub depletion_outlook: Vec<DepletionDay>,
    pub total_daily_consumption: f64,
    pub total_units: u64,
}

impl AnalyticsReport {
    /// Builds the report for `items` as of `today`, looking `horizon_days` ahead.
    pub fn build(items: &[EnrichedItem], today: NaiveDate, horizon_days: u64) -> Self {
        Self {
            generated_on: today,
            status_distribution: status_distribution(items),
            top_consumers: top_consumers(items),
            critical_items: critical_items(items, horizon_days),
            depletion_outlook: depletion_outlook(items, today, horizon_days),
            total_daily_consumption: items
                .iter()
                .map(|item| item.item.daily_consumption)
                .sum(),
            total_units: items.iter().map(|item| u64::from(item.quantity())).sum(),
        }
    }
}

fn status_distribution(items: &[EnrichedItem]) -> Vec<StatusCount> {
    StockStatus::iter()
        .map(|status| StatusCount {
            status,
            count: items.iter().filter(|item| item.status == status).count(),
        })
        .collect()
}

fn top_consumers(items: &[EnrichedItem]) -> Vec<TopConsumer> {
    let mut ranked: Vec<&EnrichedItem> = items.iter().collect();
    ranked.sort_by(|a, b| {
        b.item
            .daily_consumption
            .total_cmp(&a.item.daily_consumption)
    });
    ranked
        .into_iter()
        .take(TOP_CONSUMERS)
        .map(|item| TopConsumer {
            item_name: item.name().to_string(),
            daily_consumption: item.item.daily_consumption,
        })
        .collect()
}

fn critical_items(items: &[EnrichedItem], horizon_days: u64) -> Vec<CriticalItem> {
    let mut critical: Vec<&EnrichedItem> = items
        .iter()
        .filter(|item| item.status.needs_restock() || item.days_remaining.is_within(horizon_days))
        .collect();
    // out of stock first, then the soonest to run out
    critical.sort_by(|a, b| {
        let a_out = a.status == StockStatus::OutOfStock;
        let b_out = b.status == StockStatus::OutOfStock;
        b_out
            .cmp(&a_out)
            .then_with(|| a.days_remaining.cmp(&b.days_remaining))
    });
    critical
        .into_iter()
        .map(|item| CriticalItem {
            item_name: item.name().to_string(),
            quantity: item.quantity(),
            status: item.status,
            days_remaining: item.days_remaining,
            recommended_order_quantity: recommend_reorder_quantity(item.as_item()),
        })
        .collect()
}

fn depletion_outlook(items: &[EnrichedItem], today: NaiveDate, horizon_days: u64) -> Vec<DepletionDay> {
    (1..=horizon_days)
        .filter_map(|days_ahead| {
            let date = today.checked_add_days(Days::new(days_ahead))?;
            let items_depleting = items
                .iter()
                .filter(|item| {
                    item.status != StockStatus::OutOfStock
                        && item.days_remaining == DaysRemaining::Finite(days_ahead)
                })
                .count();
            Some(DepletionDay {
                days_ahead,
                date,
                items_depleting,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::services::forecasting::enrich;

    fn stocked(name: &str, quantity: u32, threshold: u32, rate: f64) -> EnrichedItem {
        enrich(&Item {
            id: None,
            name: name.into(),
            quantity,
            restock_threshold: threshold,
            daily_consumption: rate,
            unit_of_measure: None,
            last_updated: None,
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 25).unwrap()
    }

    fn kitchen() -> Vec<EnrichedItem> {
        vec![
            stocked("Flour", 50, 10, 2.0),
            stocked("Eggs", 6, 12, 3.0),
            stocked("Milk", 0, 2, 1.0),
            stocked("Salt", 20, 2, 0.0),
            stocked("Butter", 20, 5, 4.0),
        ]
    }

    #[test]
    fn distribution_lists_every_status() {
        let report = AnalyticsReport::build(&[], today(), 7);
        assert_eq!(report.status_distribution.len(), 3);
        assert!(report.status_distribution.iter().all(|entry| entry.count == 0));
        assert!(report.critical_items.is_empty());
        assert_eq!(report.depletion_outlook.len(), 7);
    }

    #[test]
    fn totals_and_distribution() {
        let report = AnalyticsReport::build(&kitchen(), today(), 7);
        assert_eq!(
            report.status_distribution,
            vec![
                StatusCount { status: StockStatus::InStock, count: 3 },
                StatusCount { status: StockStatus::LowStock, count: 1 },
                StatusCount { status: StockStatus::OutOfStock, count: 1 },
            ]
        );
        assert_eq!(report.total_daily_consumption, 10.0);
        assert_eq!(report.total_units, 96);
    }

    #[test]
    fn top_consumers_are_ranked_and_capped() {
        let many: Vec<EnrichedItem> = (0..12)
            .map(|i| stocked(&format!("item-{i}"), 10, 1, f64::from(i)))
            .collect();
        let report = AnalyticsReport::build(&many, today(), 7);
        assert_eq!(report.top_consumers.len(), 10);
        assert_eq!(report.top_consumers[0].item_name, "item-11");
        assert_eq!(report.top_consumers[9].item_name, "item-2");
    }

    #[test]
    fn critical_items_put_out_of_stock_first() {
        let report = AnalyticsReport::build(&kitchen(), today(), 7);
        let names: Vec<&str> = report
            .critical_items
            .iter()
            .map(|item| item.item_name.as_str())
            .collect();
        // Milk is out, Eggs has 2 days, Butter has 5 days; Flour (25) and Salt are fine
        assert_eq!(names, ["Milk", "Eggs", "Butter"]);
        assert_eq!(report.critical_items[1].recommended_order_quantity, 21);
    }

    #[test]
    fn outlook_counts_items_by_depletion_day() {
        let report = AnalyticsReport::build(&kitchen(), today(), 7);
        let day_two = &report.depletion_outlook[1];
        assert_eq!(day_two.days_ahead, 2);
        assert_eq!(day_two.date, NaiveDate::from_ymd_opt(2025, 6, 27).unwrap());
        assert_eq!(day_two.items_depleting, 1);
        assert_eq!(report.depletion_outlook[4].items_depleting, 1);
        let total: usize = report
            .depletion_outlook
            .iter()
            .map(|day| day.items_depleting)
            .sum();
        assert_eq!(total, 2);
    }
}
