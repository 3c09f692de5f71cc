pub mod inventory_queries;

pub use inventory_queries::{DashboardStats, InventoryQuery, SortDirection, SortField};
