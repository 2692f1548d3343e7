//! War service client: the `WarApi` trait seam and its `reqwest` implementation.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use foxlog_core::config::ApiConfig;
use foxlog_core::types::{MapItem, WarInfo};

use crate::error::ApiError;
use crate::types::{parse_map_items, parse_map_names, parse_war_info};

/// Upstream operations the tracker depends on.
#[async_trait]
pub trait WarApi: Send + Sync {
    /// Current war metadata.
    async fn fetch_war_info(&self) -> Result<WarInfo, ApiError>;

    /// Names of the maps active in the current war, in upstream order.
    async fn list_active_maps(&self) -> Result<Vec<String>, ApiError>;

    /// Current dynamic items on `map_name`.
    async fn fetch_map_items(&self, map_name: &str) -> Result<Vec<MapItem>, ApiError>;
}

/// HTTP client for the live war service.
#[derive(Debug, Clone)]
pub struct HttpWarApi {
    http: Client,
    base_url: String,
}

impl HttpWarApi {
    /// Build a client from `config`. The timeout applies to every request.
    ///
    /// # Errors
    /// Returns [`ApiError::Network`] if the TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("foxlog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::from_reqwest(&base_url, &e))?;
        Ok(Self { http, base_url })
    }

    /// Base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the war state endpoint.
    #[must_use]
    pub fn war_url(&self) -> String {
        format!("{}/worldconquest/war", self.base_url)
    }

    /// URL of the active map list.
    #[must_use]
    pub fn maps_url(&self) -> String {
        format!("{}/worldconquest/maps", self.base_url)
    }

    /// URL of the public dynamic snapshot for `map_name`.
    #[must_use]
    pub fn dynamic_url(&self, map_name: &str) -> String {
        format!(
            "{}/worldconquest/maps/{}/dynamic/public",
            self.base_url, map_name
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let start = Instant::now();
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Upstream {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let json = resp
            .json::<Value>()
            .await
            .map_err(|e| ApiError::from_reqwest(url, &e))?;

        debug!(
            url,
            latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "War service request completed"
        );
        Ok(json)
    }
}

#[async_trait]
impl WarApi for HttpWarApi {
    async fn fetch_war_info(&self) -> Result<WarInfo, ApiError> {
        let url = self.war_url();
        let json = self.get_json(&url).await?;
        parse_war_info(&url, &json)
    }

    async fn list_active_maps(&self) -> Result<Vec<String>, ApiError> {
        let url = self.maps_url();
        let json = self.get_json(&url).await?;
        parse_map_names(&url, json)
    }

    async fn fetch_map_items(&self, map_name: &str) -> Result<Vec<MapItem>, ApiError> {
        let url = self.dynamic_url(map_name);
        let json = self.get_json(&url).await?;
        parse_map_items(&url, json)
    }
}
