use chrono::NaiveDate;
use std::io::Write;

use crate::errors::ServiceError;
use crate::models::EnrichedItem;

pub const CSV_HEADER: [&str; 6] = [
    "Item Name",
    "Current Stock",
    "Restock Threshold",
    "Daily Consumption",
    "Days Remaining",
    "Status",
];

/// Default file name for an export produced on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("inventory-report-{}.csv", date.format("%Y-%m-%d"))
}

/// Writes one row per item; unbounded forecasts are written as `Infinite`.
pub fn write_csv<W: Write>(items: &[EnrichedItem], writer: W) -> Result<(), ServiceError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for item in items {
        csv.write_record([
            item.name().to_string(),
            item.quantity().to_string(),
            item.item.restock_threshold.to_string(),
            item.item.daily_consumption.to_string(),
            item.days_remaining.to_string(),
            item.status.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}
