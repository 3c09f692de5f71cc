//! HTTP access to the remote inventory store.
//!
//! One request per call: no retries, no caching. Any transport failure,
//! non-2xx status or undecodable body becomes [`ServiceError::RequestFailed`].

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::AppConfig;
use crate::errors::{RequestFailure, ServiceError};
use crate::models::{
    ConsumptionReceipt, Item, NewConsumptionLog, NewItem, RestockAlert, RestockCalendarEntry,
};

pub const ITEMS_PATH: &str = "/items/";
pub const CONSUMPTION_PATH: &str = "/consumption/";
pub const RESTOCK_ALERTS_PATH: &str = "/restock/alerts";
pub const RESTOCK_CALENDAR_PATH: &str = "/restock/calendar";

/// Operations the inventory store exposes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Item>, ServiceError>;

    /// Persists a new item; the returned record carries the store-assigned id.
    async fn create_item(&self, item: &NewItem) -> Result<Item, ServiceError>;

    async fn log_consumption(
        &self,
        log: &NewConsumptionLog,
    ) -> Result<ConsumptionReceipt, ServiceError>;

    async fn list_restock_alerts(&self) -> Result<Vec<RestockAlert>, ServiceError>;

    async fn restock_calendar(&self) -> Result<Vec<RestockCalendarEntry>, ServiceError>;
}

/// The store either echoes the item or wraps it with a status message.
#[derive(Deserialize)]
#[serde(untagged)]
enum CreateItemResponse {
    Envelope {
        item: Item,
        #[serde(default)]
        action: Option<String>,
    },
    Bare(Item),
}

impl CreateItemResponse {
    fn into_item(self) -> Item {
        match self {
            CreateItemResponse::Envelope { item, action } => {
                debug!(action = ?action, name = %item.name, "store acknowledged item");
                item
            }
            CreateItemResponse::Bare(item) => item,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// Build a client with reqwest defaults (no explicit timeout).
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let client = Client::builder().build().map_err(|e| {
            ServiceError::request_failed(base_url, RequestFailure::Transport(e.to_string()))
        })?;
        Self::with_client(base_url, client)
    }

    /// Build a client from configuration, applying the optional request timeout.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ServiceError::request_failed(
                config.api_base_url.as_str(),
                RequestFailure::Transport(e.to_string()),
            )
        })?;
        Self::with_client(&config.api_base_url, client)
    }

    /// Build a client from an existing reqwest client (useful for testing).
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ServiceError> {
        Url::parse(base_url).map_err(|e| {
            ServiceError::request_failed(
                base_url,
                RequestFailure::Transport(format!("invalid base url: {}", e)),
            )
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let result = self.send(method, path, body).await;
        if let Err(e) = &result {
            error!(endpoint = path, error = %e, "API request failed");
        }
        result
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(|e| {
                ServiceError::request_failed(path, RequestFailure::Decode(e.to_string()))
            })?;
            request = request.body(payload);
        }

        let response = request.send().await.map_err(|e| {
            ServiceError::request_failed(path, RequestFailure::Transport(e.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::request_failed(
                path,
                RequestFailure::Status(status.as_u16()),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            ServiceError::request_failed(path, RequestFailure::Decode(e.to_string()))
        })
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    #[instrument(skip(self))]
    async fn list_items(&self) -> Result<Vec<Item>, ServiceError> {
        self.request::<(), _>(Method::GET, ITEMS_PATH, None).await
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    async fn create_item(&self, item: &NewItem) -> Result<Item, ServiceError> {
        let response: CreateItemResponse = self.request(Method::POST, ITEMS_PATH, Some(item)).await?;
        Ok(response.into_item())
    }

    #[instrument(skip(self, log), fields(item_name = %log.item_name))]
    async fn log_consumption(
        &self,
        log: &NewConsumptionLog,
    ) -> Result<ConsumptionReceipt, ServiceError> {
        self.request(Method::POST, CONSUMPTION_PATH, Some(log)).await
    }

    #[instrument(skip(self))]
    async fn list_restock_alerts(&self) -> Result<Vec<RestockAlert>, ServiceError> {
        self.request::<(), _>(Method::GET, RESTOCK_ALERTS_PATH, None)
            .await
    }

    #[instrument(skip(self))]
    async fn restock_calendar(&self) -> Result<Vec<RestockCalendarEntry>, ServiceError> {
        self.request::<(), _>(Method::GET, RESTOCK_CALENDAR_PATH, None)
            .await
    }
}
