//! Stock status and depletion forecasts derived from a single item.
//!
//! Everything here is pure: inputs are borrowed and never mutated. Negative or
//! non-finite consumption rates are outside the domain and are not checked.

use chrono::{Days, NaiveDate};

use crate::models::{DaysRemaining, EnrichedItem, Item, StockStatus};

/// Days of usage covered by a reorder recommendation.
pub const REORDER_COVER_DAYS: f64 = 7.0;

/// Zero stock is out of stock; at or below the threshold is low stock.
pub fn compute_status(item: &Item) -> StockStatus {
    if item.quantity == 0 {
        StockStatus::OutOfStock
    } else if item.quantity <= item.restock_threshold {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Whole days of stock left at the current rate, truncated.
pub fn compute_days_remaining(item: &Item) -> DaysRemaining {
    if item.daily_consumption == 0.0 {
        return DaysRemaining::Unbounded;
    }
    let days = (f64::from(item.quantity) / item.daily_consumption).floor();
    DaysRemaining::Finite(days as u64)
}

pub fn enrich(item: &Item) -> EnrichedItem {
    EnrichedItem {
        item: item.clone(),
        status: compute_status(item),
        days_remaining: compute_days_remaining(item),
    }
}

/// Units to order so that stock clears the threshold and covers a week of use.
pub fn recommend_reorder_quantity(item: &Item) -> u32 {
    let shortfall = i64::from(item.restock_threshold) - i64::from(item.quantity);
    let weekly = (item.daily_consumption * REORDER_COVER_DAYS).floor() as i64;
    let recommended = shortfall.max(weekly).max(0);
    u32::try_from(recommended).unwrap_or(u32::MAX)
}

/// Calendar date on which stock is projected to hit zero, if it ever does.
pub fn projected_depletion_date(item: &Item, today: NaiveDate) -> Option<NaiveDate> {
    compute_days_remaining(item)
        .finite()
        .and_then(|days| today.checked_add_days(Days::new(days)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn item(quantity: u32, restock_threshold: u32, daily_consumption: f64) -> Item {
        Item {
            id: None,
            name: "Basil".into(),
            quantity,
            restock_threshold,
            daily_consumption,
            unit_of_measure: None,
            last_updated: None,
        }
    }

    #[rstest]
    #[case(0, 5, 2.0, StockStatus::OutOfStock, DaysRemaining::Finite(0))]
    #[case(5, 5, 1.0, StockStatus::LowStock, DaysRemaining::Finite(5))]
    #[case(100, 10, 0.0, StockStatus::InStock, DaysRemaining::Unbounded)]
    #[case(10, 2, 3.0, StockStatus::InStock, DaysRemaining::Finite(3))]
    #[case(10, 2, 4.0, StockStatus::InStock, DaysRemaining::Finite(2))]
    #[case(1, 1, 0.3, StockStatus::LowStock, DaysRemaining::Finite(3))]
    fn derives_status_and_days(
        #[case] quantity: u32,
        #[case] threshold: u32,
        #[case] rate: f64,
        #[case] status: StockStatus,
        #[case] days: DaysRemaining,
    ) {
        let enriched = enrich(&item(quantity, threshold, rate));
        assert_eq!(enriched.status, status);
        assert_eq!(enriched.days_remaining, days);
    }

    #[test]
    fn zero_stock_is_out_of_stock_even_with_untracked_usage() {
        let enriched = enrich(&item(0, 3, 0.0));
        assert_eq!(enriched.status, StockStatus::OutOfStock);
        assert_eq!(enriched.days_remaining, DaysRemaining::Unbounded);
    }

    #[test]
    fn enrich_leaves_the_input_untouched() {
        let original = item(7, 3, 2.0);
        let enriched = enrich(&original);
        assert_eq!(enriched.as_item(), &original);
        assert_eq!(enrich(enriched.as_item()), enriched);
    }

    #[rstest]
    #[case(2, 10, 1.0, 8)]
    #[case(2, 10, 3.0, 21)]
    #[case(50, 10, 0.0, 0)]
    #[case(0, 4, 0.5, 4)]
    fn reorder_quantity_covers_threshold_or_a_week(
        #[case] quantity: u32,
        #[case] threshold: u32,
        #[case] rate: f64,
        #[case] expected: u32,
    ) {
        assert_eq!(recommend_reorder_quantity(&item(quantity, threshold, rate)), expected);
    }

    #[test]
    fn depletion_date_offsets_from_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        assert_eq!(
            projected_depletion_date(&item(10, 2, 3.0), today),
            NaiveDate::from_ymd_opt(2025, 7, 1)
        );
        assert_eq!(projected_depletion_date(&item(10, 2, 0.0), today), None);
    }
}
