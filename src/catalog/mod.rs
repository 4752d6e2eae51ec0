//! Pattern and model listing from the server.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Errors from catalog requests.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to fetch {what}: {message}")]
    Network { what: &'static str, message: String },

    #[error("server returned status {0}")]
    Status(u16),

    #[error("failed to parse {what}: {message}")]
    Parse { what: &'static str, message: String },
}

/// `GET /models/names` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub vendors: BTreeMap<String, Vec<String>>,
}

impl ModelsResponse {
    /// Vendor serving `model`, if listed.
    pub fn vendor_of(&self, model: &str) -> Option<&str> {
        self.vendors
            .iter()
            .find(|(_, models)| models.iter().any(|m| m == model))
            .map(|(vendor, _)| vendor.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternsBody {
    List(Vec<String>),
    Wrapped { patterns: Vec<String> },
}

/// Request/response client for the server's listing endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: crate::config::normalize_base_url(&base_url.into()),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Available pattern names, sorted.
    pub async fn patterns(&self) -> Result<Vec<String>, CatalogError> {
        let body = self.get_text("/patterns/names", "patterns").await?;
        let mut patterns = match serde_json::from_str::<PatternsBody>(&body) {
            Ok(PatternsBody::List(list)) | Ok(PatternsBody::Wrapped { patterns: list }) => list,
            Err(e) => {
                return Err(CatalogError::Parse {
                    what: "patterns",
                    message: e.to_string(),
                })
            }
        };
        patterns.sort();
        Ok(patterns)
    }

    /// Available models grouped by vendor.
    pub async fn models(&self) -> Result<ModelsResponse, CatalogError> {
        let body = self.get_text("/models/names", "models").await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Parse {
            what: "models",
            message: e.to_string(),
        })
    }

    async fn get_text(&self, path: &str, what: &'static str) -> Result<String, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CatalogError::Network {
                what,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| CatalogError::Network {
            what,
            message: e.to_string(),
        })
    }
}
