use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event without waiting for channel capacity
    pub fn try_send(&self, event: Event) -> Result<(), String> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => "Failed to send event: channel full".to_string(),
            TrySendError::Closed(_) => "Failed to send event: channel closed".to_string(),
        })
    }
}

/// Local state changes published by the inventory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ItemsRefreshed { count: usize },
    RefreshFailed { message: String },
    AlertsRefreshed { count: usize },
    ItemAdded { id: Option<String>, name: String },
    ConsumptionLogged { item_name: String, quantity_used: u32 },
}

/// Drains the channel, logging each event until every sender is dropped.
pub async fn process_events(mut event_rx: mpsc::Receiver<Event>) {
    while let Some(event) = event_rx.recv().await {
        match &event {
            Event::RefreshFailed { message } => {
                warn!(message = %message, "inventory refresh failed")
            }
            Event::ItemAdded { id, name } => {
                info!(id = ?id, name = %name, "item added")
            }
            Event::ConsumptionLogged {
                item_name,
                quantity_used,
            } => info!(item_name = %item_name, quantity_used, "consumption logged"),
            other => debug!(event = ?other, "inventory event"),
        }
    }
    debug!("event channel closed");
}
