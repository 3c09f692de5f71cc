use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::FormErrors;
use crate::models::{NewItem, DEFAULT_UNIT};

/// Raw add-item form input, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItemForm {
    pub name: String,
    pub quantity: String,
    pub restock_threshold: String,
    pub daily_consumption: String,
    pub unit_of_measure: String,
}

impl Default for NewItemForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            quantity: String::new(),
            restock_threshold: String::new(),
            daily_consumption: String::new(),
            unit_of_measure: DEFAULT_UNIT.to_string(),
        }
    }
}

impl NewItemForm {
    /// Parses and validates every field, collecting all failures at once.
    pub fn parse(&self) -> Result<NewItem, FormErrors> {
        let mut errors = FormErrors::new();

        let quantity = self.quantity.trim().parse::<u32>().ok();
        if quantity.is_none() {
            errors.insert("quantity", "Quantity must be a non-negative number");
        }

        let restock_threshold = self.restock_threshold.trim().parse::<u32>().ok();
        if restock_threshold.is_none() {
            errors.insert(
                "restock_threshold",
                "Restock threshold must be a positive number",
            );
        }

        let daily_consumption = self.daily_consumption.trim().parse::<f64>().ok();
        if daily_consumption.is_none() {
            errors.insert(
                "daily_consumption",
                "Daily consumption must be a positive number",
            );
        }

        let unit = self.unit_of_measure.trim();
        let draft = NewItem {
            name: self.name.trim().to_string(),
            quantity: quantity.unwrap_or_default(),
            restock_threshold: restock_threshold.unwrap_or(1),
            daily_consumption: daily_consumption.unwrap_or(1.0),
            unit_of_measure: Some(if unit.is_empty() { DEFAULT_UNIT } else { unit }.to_string()),
        };

        if let Err(e) = draft.validate() {
            errors.merge(e.into());
        }
        errors.into_result(draft)
    }
}
