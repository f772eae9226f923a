//! Item sets fetched over HTTP.
//!
//! Requires the `networking` feature. The endpoint must return a JSON array of
//! item objects. Fetching runs on the caller's async runtime; install the
//! result with [`TableView::set_data_source`](crate::TableView::set_data_source).

use pushpop_core::logging::targets;
use serde_json::Value;

use crate::config::TableViewConfig;
use crate::error::Result;
use crate::model::ItemStore;

/// A remote JSON item set.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    url: String,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Share an existing client (connection pool, TLS settings, headers).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the item set.
    pub async fn fetch(&self) -> Result<ItemStore> {
        tracing::debug!(target: targets::SOURCE, url = self.url.as_str(), "fetching item set");
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body: Value = response.json().await?;
        let store = ItemStore::from_value(body)?;
        tracing::debug!(target: targets::SOURCE, count = store.full_count(), "item set loaded");
        Ok(store)
    }

    /// Fetch and apply the store settings from `config`.
    pub async fn fetch_with_config(&self, config: &TableViewConfig) -> Result<ItemStore> {
        Ok(self.fetch().await?.with_config(config))
    }
}

/// Fetch an item set from `url` with a default client.
pub async fn fetch_store(url: &str) -> Result<ItemStore> {
    RemoteSource::new(url).fetch().await
}
