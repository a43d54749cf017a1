//! Elasticsearch-backed result store
//!
//! Upserts plugin results into the shared `malice` index, keyed by scan ID.
//! Failures are wrapped with record context and returned to the caller;
//! retry policy, if any, belongs to the store deployment, not this adapter.

use serde::Serialize;
use std::time::Duration;

use crate::engine::ScanResult;

/// Index holding plugin results.
const INDEX: &str = "malice";

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to initialize elasticsearch at {url}: {cause}")]
    Init { url: String, cause: String },

    #[error("failed to index malice/{plugin} results for {id}: {cause}")]
    Index {
        plugin: String,
        id: String,
        cause: String,
    },
}

/// A scan result keyed and tagged for persistence.
#[derive(Debug, Clone, Serialize)]
pub struct PluginResultRecord {
    /// Scan ID: operator-supplied override or the file's content hash
    pub id: String,
    pub plugin: String,
    pub category: String,
    pub results: ScanResult,
}

impl PluginResultRecord {
    pub fn new(id: String, results: ScanResult) -> Self {
        Self {
            id,
            plugin: crate::PLUGIN_NAME.to_string(),
            category: crate::PLUGIN_CATEGORY.to_string(),
            results,
        }
    }
}

pub struct ElasticStore {
    url: String,
    client: reqwest::Client,
}

impl ElasticStore {
    /// Create a store client for the service at `url`. [`ElasticStore::init`]
    /// must succeed before any store call.
    pub fn new(url: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Init {
                url: url.to_string(),
                cause: e.to_string(),
            })?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Ensure the results index exists.
    pub async fn init(&self) -> Result<(), StoreError> {
        let endpoint = format!("{}/{}", self.url, INDEX);
        let response = self
            .client
            .put(&endpoint)
            .send()
            .await
            .map_err(|e| StoreError::Init {
                url: self.url.clone(),
                cause: e.to_string(),
            })?;

        // 400 here means resource_already_exists; the index is usable.
        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::BAD_REQUEST {
            Ok(())
        } else {
            Err(StoreError::Init {
                url: self.url.clone(),
                cause: format!("HTTP {}", status.as_u16()),
            })
        }
    }

    /// Upsert one result document, keyed by its scan ID.
    pub async fn store(&self, record: &PluginResultRecord) -> Result<(), StoreError> {
        let endpoint = format!("{}/{}/_doc/{}", self.url, INDEX, record.id);
        let wrap = |cause: String| StoreError::Index {
            plugin: record.plugin.clone(),
            id: record.id.clone(),
            cause,
        };

        let response = self
            .client
            .put(&endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| wrap(e.to_string()))?;

        if response.status().is_success() {
            log::debug!("stored {}/{} results for {}", INDEX, record.plugin, record.id);
            Ok(())
        } else {
            Err(wrap(format!("HTTP {}", response.status().as_u16())))
        }
    }
}
