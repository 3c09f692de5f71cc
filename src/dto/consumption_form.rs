use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::FormErrors;
use crate::models::{EnrichedItem, NewConsumptionLog};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw log-usage form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionForm {
    pub item_name: String,
    pub quantity_used: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub date: String,
    pub notes: String,
}

impl ConsumptionForm {
    /// An empty form dated today.
    pub fn for_today() -> Self {
        Self {
            date: Utc::now().date_naive().format(DATE_FORMAT).to_string(),
            ..Default::default()
        }
    }

    /// Parses the form, checking usage against the cached stock of the selected item.
    ///
    /// An item name that is not in `items` is passed through unchecked; the
    /// store decides whether it exists.
    pub fn parse(&self, items: &[EnrichedItem]) -> Result<NewConsumptionLog, FormErrors> {
        let mut errors = FormErrors::new();

        let item_name = self.item_name.trim();
        if item_name.is_empty() {
            errors.insert("item_name", "Please select an item");
        }

        let quantity_used = match self.quantity_used.trim().parse::<u32>() {
            Ok(quantity) if quantity > 0 => Some(quantity),
            _ => {
                errors.insert("quantity_used", "Quantity must be a positive number");
                None
            }
        };

        if let Some(quantity) = quantity_used {
            if let Some(selected) = items.iter().find(|item| item.name() == item_name) {
                if quantity > selected.quantity() {
                    errors.insert(
                        "quantity_used",
                        format!(
                            "Cannot use more than current stock ({})",
                            selected.quantity()
                        ),
                    );
                }
            }
        }

        let date = match parse_date(&self.date) {
            Ok(date) => Some(date),
            Err(reason) => {
                errors.insert("date", reason);
                None
            }
        };

        let notes = self.notes.trim();
        match (quantity_used, date) {
            (Some(quantity_used), Some(date)) if errors.is_empty() => Ok(NewConsumptionLog {
                item_name: item_name.to_string(),
                quantity_used,
                date,
                notes: (!notes.is_empty()).then(|| notes.to_string()),
            }),
            _ => Err(errors),
        }
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Date is required");
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return day
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or("Date is not valid");
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| "Date must be YYYY-MM-DD or an RFC 3339 timestamp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use crate::services::forecasting::enrich;
    use chrono::TimeZone;

    fn stock() -> Vec<EnrichedItem> {
        vec![enrich(&Item {
            id: Some("1".into()),
            name: "Flour".into(),
            quantity: 10,
            restock_threshold: 4,
            daily_consumption: 2.0,
            unit_of_measure: Some("kg".into()),
            last_updated: None,
        })]
    }

    fn form(item: &str, quantity: &str, date: &str, notes: &str) -> ConsumptionForm {
        ConsumptionForm {
            item_name: item.into(),
            quantity_used: quantity.into(),
            date: date.into(),
            notes: notes.into(),
        }
    }

    #[test]
    fn plain_date_becomes_utc_midnight() {
        let log = form("Flour", "3", "2025-06-25", "  ").parse(&stock()).unwrap();
        assert_eq!(log.item_name, "Flour");
        assert_eq!(log.quantity_used, 3);
        assert_eq!(log.date, Utc.with_ymd_and_hms(2025, 6, 25, 0, 0, 0).unwrap());
        assert_eq!(log.notes, None);
    }

    #[test]
    fn rfc3339_dates_and_notes_are_kept() {
        let log = form("Flour", "10", "2025-06-25T14:30:00+02:00", " dinner rush ")
            .parse(&stock())
            .unwrap();
        assert_eq!(log.date, Utc.with_ymd_and_hms(2025, 6, 25, 12, 30, 0).unwrap());
        assert_eq!(log.notes.as_deref(), Some("dinner rush"));
    }

    #[test]
    fn usage_above_cached_stock_is_rejected() {
        let errors = form("Flour", "11", "2025-06-25", "").parse(&stock()).unwrap_err();
        assert_eq!(
            errors.get("quantity_used"),
            Some("Cannot use more than current stock (10)")
        );
    }

    #[test]
    fn unknown_item_skips_stock_check() {
        assert!(form("Saffron", "500", "2025-06-25", "").parse(&stock()).is_ok());
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = form("", "0", "", "").parse(&stock()).unwrap_err();
        assert_eq!(errors.get("item_name"), Some("Please select an item"));
        assert_eq!(
            errors.get("quantity_used"),
            Some("Quantity must be a positive number")
        );
        assert_eq!(errors.get("date"), Some("Date is required"));
    }

    #[test]
    fn garbage_date_is_rejected() {
        let errors = form("Flour", "1", "next tuesday", "").parse(&stock()).unwrap_err();
        assert!(errors.contains("date"));
    }

    #[test]
    fn todays_form_has_a_parseable_date() {
        let mut input = ConsumptionForm::for_today();
        input.item_name = "Flour".into();
        input.quantity_used = "1".into();
        assert!(input.parse(&stock()).is_ok());
    }
}
