//! HTTP connection to the SpreadScope backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use spreadscope_common::{RateTable, Result, SpreadRecord, SpreadScopeError};
use spreadscope_fx::RateProvider;
use spreadscope_spreads::{SpreadQuery, SpreadSource};

use crate::config::ClientConfig;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub exchanges_enabled: Vec<String>,
    /// Cached quote count per exchange.
    #[serde(default)]
    pub quotes_cached: BTreeMap<String, u64>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Connection to the backend's JSON endpoints.
///
/// Every call is a single GET: no retries, no caching.
#[derive(Debug, Clone)]
pub struct ApiConnection {
    http: reqwest::Client,
    api_base: String,
    rates_path: String,
    spreads_path: String,
    health_path: String,
}

impl ApiConnection {
    /// Create a connection from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SpreadScopeError::ConfigurationError(format!("HTTP client: {}", e)))?;

        Ok(Self::with_client(http, config))
    }

    /// Create a connection around an existing reqwest client.
    pub fn with_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            rates_path: config.rates_path.clone(),
            spreads_path: config.spreads_path.clone(),
            health_path: config.health_path.clone(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch the converter rate table.
    #[instrument(skip(self))]
    pub async fn fetch_rate_table(&self) -> Result<RateTable> {
        let body = self.get_text(&self.rates_path, &[]).await?;
        let table = RateTable::from_json(&body)?;
        debug!(base = %table.base, assets = table.len(), "Rate table received");
        Ok(table)
    }

    /// Fetch one page of spread records.
    #[instrument(skip(self), fields(limit = query.limit))]
    pub async fn fetch_spread_page(&self, query: &SpreadQuery) -> Result<Vec<SpreadRecord>> {
        let body = self.get_text(&self.spreads_path, &query.query_pairs()).await?;
        let records = SpreadRecord::list_from_json(&body)?;
        debug!(records = records.len(), "Spreads received");
        Ok(records)
    }

    /// Fetch the backend health document.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        let body = self.get_text(&self.health_path, &[]).await?;
        serde_json::from_str(&body).map_err(|e| SpreadScopeError::Decode(format!("health: {}", e)))
    }

    async fn get_text(&self, path: &str, query: &[(&'static str, String)]) -> Result<String> {
        let url = format!("{}{}", self.api_base, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| request_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpreadScopeError::Transport {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| request_error(path, e))
    }
}

fn request_error(path: &str, error: reqwest::Error) -> SpreadScopeError {
    if error.is_timeout() {
        SpreadScopeError::Timeout(path.to_string())
    } else {
        SpreadScopeError::NetworkError(format!("{}: {}", path, error))
    }
}

#[async_trait]
impl RateProvider for ApiConnection {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_rates(&self) -> Result<RateTable> {
        self.fetch_rate_table().await
    }
}

#[async_trait]
impl SpreadSource for ApiConnection {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_spreads(&self, query: &SpreadQuery) -> Result<Vec<SpreadRecord>> {
        self.fetch_spread_page(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_decodes_backend_document() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status":"ok","exchanges_enabled":["gate","mexc"],"quotes_cached":{"gate":812,"mexc":0}}"#,
        )
        .unwrap();

        assert!(health.is_ok());
        assert_eq!(health.exchanges_enabled, vec!["gate", "mexc"]);
        assert_eq!(health.quotes_cached.get("gate"), Some(&812));
    }

    #[test]
    fn test_health_defaults_missing_fields() {
        let health: HealthStatus = serde_json::from_str(r#"{"status":"degraded"}"#).unwrap();

        assert!(!health.is_ok());
        assert!(health.quotes_cached.is_empty());
    }

    #[test]
    fn test_connection_from_config() {
        let config = ClientConfig {
            api_base: "http://localhost:9000/".to_string(),
            ..ClientConfig::default()
        };

        let connection = ApiConnection::new(&config).unwrap();

        assert_eq!(connection.api_base(), "http://localhost:9000");
        assert_eq!(RateProvider::name(&connection), "HTTP");
    }
}
