use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An immutable usage event recorded against an item, referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionLog {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub item_name: String,
    pub quantity_used: u32,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The log-usage payload, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewConsumptionLog {
    #[validate(length(min = 1, message = "Please select an item"))]
    pub item_name: String,
    #[validate(range(min = 1, message = "Quantity must be a positive number"))]
    pub quantity_used: u32,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Confirmation returned by the store after a consumption entry is accepted.
///
/// Accepts both the echoed log (`_id`, `date`) and the store's receipt shape
/// (`log_id`, `item_id`, `timestamp`, `message`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionReceipt {
    #[serde(rename = "log_id", alias = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub item_name: String,
    pub quantity_used: u32,
    #[serde(alias = "date", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn new_log_serializes_iso_date() {
        let log = NewConsumptionLog {
            item_name: "Flour".into(),
            quantity_used: 3,
            date: Utc.with_ymd_and_hms(2025, 6, 25, 0, 0, 0).unwrap(),
            notes: None,
        };
        let out = serde_json::to_value(&log).unwrap();
        assert_eq!(out["date"], "2025-06-25T00:00:00Z");
        assert!(out.get("notes").is_none());
    }

    #[test]
    fn log_reads_echoed_store_record() {
        let echoed = json!({
            "_id": "abc",
            "item_name": "Flour",
            "quantity_used": 5,
            "date": "2025-06-25T00:00:00Z",
            "notes": "bread"
        });
        let log: ConsumptionLog = serde_json::from_value(echoed.clone()).unwrap();
        assert_eq!(log.id.as_deref(), Some("abc"));
        assert_eq!(log.date, Utc.with_ymd_and_hms(2025, 6, 25, 0, 0, 0).unwrap());
        assert_eq!(serde_json::to_value(&log).unwrap(), echoed);

        let receipt: ConsumptionReceipt = serde_json::from_value(echoed).unwrap();
        assert_eq!(receipt.id, log.id);
        assert_eq!(receipt.quantity_used, log.quantity_used);
    }

    #[test]
    fn receipt_accepts_store_shape() {
        let receipt: ConsumptionReceipt = serde_json::from_value(json!({
            "message": "Consumption logged",
            "log_id": "685c0232c4e420f5b8184cdf",
            "item_id": "685c1042d7df7340474a3437",
            "item_name": "Flour",
            "quantity_used": 5,
            "timestamp": "2025-06-25T10:00:00"
        }))
        .unwrap();
        assert_eq!(receipt.id.as_deref(), Some("685c0232c4e420f5b8184cdf"));
        assert_eq!(receipt.message.as_deref(), Some("Consumption logged"));
    }

    #[test]
    fn receipt_accepts_echoed_log() {
        let receipt: ConsumptionReceipt = serde_json::from_value(json!({
            "_id": "abc",
            "item_name": "Flour",
            "quantity_used": 5,
            "date": "2025-06-25T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(receipt.id.as_deref(), Some("abc"));
        assert_eq!(receipt.timestamp.as_deref(), Some("2025-06-25T00:00:00.000Z"));
        assert_eq!(receipt.item_id, None);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let log = NewConsumptionLog {
            item_name: "Flour".into(),
            quantity_used: 0,
            date: Utc::now(),
            notes: None,
        };
        assert!(log.validate().is_err());
    }
}
