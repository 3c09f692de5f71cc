use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::{
    client::InventoryApi,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{ConsumptionReceipt, EnrichedItem, NewConsumptionLog, NewItem, RestockAlert},
    services::forecasting,
};

/// Message recorded when the item list cannot be fetched.
pub const ITEMS_FETCH_ERROR: &str = "Failed to fetch inventory items";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Point-in-time copy of the cached inventory view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventorySnapshot {
    pub items: Vec<EnrichedItem>,
    pub restock_alerts: Vec<RestockAlert>,
    pub phase: LoadPhase,
    pub error: Option<String>,
}

impl InventorySnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn find_item(&self, name: &str) -> Option<&EnrichedItem> {
        self.items.iter().find(|item| item.name() == name)
    }
}

/// Cache plus request bookkeeping. Sequence numbers are per refresh call.
#[derive(Debug, Default)]
struct SyncState {
    snapshot: InventorySnapshot,
    issued: u64,
    items_applied: u64,
    alerts_applied: u64,
}

impl SyncState {
    fn begin_fetch(&mut self) -> u64 {
        self.issued += 1;
        self.snapshot.phase = LoadPhase::Loading;
        self.issued
    }

    fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

/// Client-side inventory cache kept in step with the remote store.
///
/// All mutation goes through [`refresh`](Self::refresh),
/// [`add_item`](Self::add_item) and [`log_consumption`](Self::log_consumption).
#[derive(Clone)]
pub struct InventoryService {
    api: Arc<dyn InventoryApi>,
    state: Arc<RwLock<SyncState>>,
    event_sender: Option<Arc<EventSender>>,
}

impl InventoryService {
    pub fn new(api: Arc<dyn InventoryApi>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(SyncState::default())),
            event_sender,
        }
    }

    pub async fn snapshot(&self) -> InventorySnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn items(&self) -> Vec<EnrichedItem> {
        self.state.read().await.snapshot.items.clone()
    }

    pub async fn restock_alerts(&self) -> Vec<RestockAlert> {
        self.state.read().await.snapshot.restock_alerts.clone()
    }

    pub async fn phase(&self) -> LoadPhase {
        self.state.read().await.snapshot.phase
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.snapshot.error.clone()
    }

    /// Fetches items and alerts, replacing the cached collections.
    ///
    /// An item fetch failure keeps the previous items and records an error.
    /// An alert fetch failure is only logged. Responses belonging to a refresh
    /// that has since been superseded by a newer one are discarded.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), ServiceError> {
        let seq = self.state.write().await.begin_fetch();
        debug!(seq, "refresh started");

        let (items_result, alerts_result) =
            tokio::join!(self.api.list_items(), self.api.list_restock_alerts());

        let mut events = Vec::new();
        let outcome = {
            let mut state = self.state.write().await;

            if seq > state.alerts_applied {
                match alerts_result {
                    Ok(alerts) => {
                        state.alerts_applied = seq;
                        events.push(Event::AlertsRefreshed {
                            count: alerts.len(),
                        });
                        state.snapshot.restock_alerts = alerts;
                    }
                    Err(e) => warn!(error = %e, "Error fetching restock alerts"),
                }
            } else {
                debug!(seq, applied = state.alerts_applied, "discarding stale alerts response");
            }

            let outcome = if seq > state.items_applied {
                state.items_applied = seq;
                match items_result {
                    Ok(items) => {
                        state.snapshot.items = items.iter().map(forecasting::enrich).collect();
                        state.snapshot.error = None;
                        events.push(Event::ItemsRefreshed {
                            count: state.snapshot.items.len(),
                        });
                        Ok(())
                    }
                    Err(e) => {
                        error!(error = %e, "Error fetching items");
                        state.snapshot.error = Some(ITEMS_FETCH_ERROR.to_string());
                        events.push(Event::RefreshFailed {
                            message: e.to_string(),
                        });
                        Err(e)
                    }
                }
            } else {
                debug!(seq, applied = state.items_applied, "discarding stale items response");
                Ok(())
            };

            if state.is_latest(seq) {
                state.snapshot.phase = if state.snapshot.error.is_some() {
                    LoadPhase::Error
                } else {
                    LoadPhase::Ready
                };
            }
            outcome
        };

        for event in events {
            self.publish(event);
        }
        outcome
    }

    /// Creates an item remotely and appends the enriched result locally.
    ///
    /// No refetch happens; on failure the cache is untouched.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_item(&self, draft: NewItem) -> Result<EnrichedItem, ServiceError> {
        draft.validate()?;

        let created = self.api.create_item(&draft).await.map_err(|e| {
            error!(error = %e, "Error adding item");
            e
        })?;
        let enriched = forecasting::enrich(&created);

        self.state
            .write()
            .await
            .snapshot
            .items
            .push(enriched.clone());
        info!(id = ?enriched.item.id, status = %enriched.status, "item added");

        self.publish(Event::ItemAdded {
            id: enriched.item.id.clone(),
            name: enriched.item.name.clone(),
        });
        Ok(enriched)
    }

    /// Records usage remotely, then refreshes once to pick up the new quantities.
    ///
    /// A failed follow-up refresh is reflected in the cached error state but
    /// does not turn the accepted entry into an error.
    #[instrument(skip(self, draft), fields(item_name = %draft.item_name))]
    pub async fn log_consumption(
        &self,
        draft: NewConsumptionLog,
    ) -> Result<ConsumptionReceipt, ServiceError> {
        draft.validate()?;

        let receipt = self.api.log_consumption(&draft).await.map_err(|e| {
            error!(error = %e, "Error logging consumption");
            e
        })?;

        self.publish(Event::ConsumptionLogged {
            item_name: draft.item_name.clone(),
            quantity_used: draft.quantity_used,
        });

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "refresh after consumption failed");
        }
        Ok(receipt)
    }

    /// Never waits on the channel; a full or closed channel drops the event.
    fn publish(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.try_send(event) {
                warn!(error = %e, "dropping inventory event");
            }
        }
    }
}
