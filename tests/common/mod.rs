use std::sync::Arc;

use kitchen_inventory::{client::HttpInventoryClient, services::InventoryService};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// A mock inventory store plus a client pointed at it.
pub struct TestStore {
    pub server: MockServer,
    pub client: Arc<HttpInventoryClient>,
}

impl TestStore {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let client = Arc::new(
            HttpInventoryClient::new(&server.uri()).expect("mock server uri is a valid base url"),
        );
        Self { server, client }
    }

    pub fn service(&self) -> InventoryService {
        InventoryService::new(self.client.clone(), None)
    }

    /// Responds to `verb path` with `status` and a JSON body, any number of times.
    pub async fn respond(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

pub fn item_json(id: &str, name: &str, quantity: u32, threshold: u32, rate: f64) -> Value {
    json!({
        "_id": id,
        "name": name,
        "quantity": quantity,
        "restock_threshold": threshold,
        "daily_consumption": rate,
        "unit_of_measure": "pieces",
        "last_updated": "2025-06-25T10:00:00"
    })
}

pub fn alert_json(name: &str, current: u32, days: Option<u64>, order: u32) -> Value {
    json!({
        "item_id": "a-1",
        "item_name": name,
        "current_stock": current,
        "predicted_days_to_run_out": days,
        "recommended_reorder_quantity": order
    })
}
