//! Kitchen Inventory Library
//!
//! Client-side core of a kitchen inventory tracker: stock status and depletion
//! forecasts, a typed client for the remote inventory store, and a cached,
//! refreshable view of items and restock alerts.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod client;
pub mod config;
pub mod dto;
pub mod errors;
pub mod events;
pub mod models;
pub mod queries;
pub mod reports;
pub mod services;

pub mod prelude {
    pub use crate::client::{HttpInventoryClient, InventoryApi};
    pub use crate::dto::*;
    pub use crate::errors::*;
    pub use crate::events::*;
    pub use crate::models::*;
    pub use crate::queries::*;
    pub use crate::services::forecasting::*;
    pub use crate::services::*;
}
