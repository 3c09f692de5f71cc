pub mod analytics;
pub mod csv_export;

pub use analytics::{AnalyticsReport, CriticalItem, DepletionDay, StatusCount, TopConsumer};
pub use csv_export::{export_file_name, write_csv, CSV_HEADER};
