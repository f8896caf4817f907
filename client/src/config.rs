//! Client configuration.

use spreadscope_common::{constants, limits, NumberLocale};
use spreadscope_spreads::{PollSchedule, SpreadQuery};
use std::time::Duration;

/// Configuration for the SpreadScope client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_base: String,
    /// Path of the converter rate table.
    pub rates_path: String,
    /// Path of the spread list.
    pub spreads_path: String,
    /// Path of the health document.
    pub health_path: String,
    /// Page size requested from the spread list.
    pub spreads_limit: u32,
    /// Server-side symbol filter.
    pub spreads_symbol: Option<String>,
    /// Server-side exchange filter.
    pub spreads_exchanges: Option<Vec<String>>,
    /// Request timeout.
    pub request_timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Spread polling timeline.
    pub poll: PollSchedule,
    /// Number formatting locale.
    pub locale: NumberLocale,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            rates_path: "/api/converter/rates".to_string(),
            spreads_path: "/api/spreads".to_string(),
            health_path: "/health".to_string(),
            spreads_limit: limits::SPREADS_PAGE_LIMIT,
            spreads_symbol: None,
            spreads_exchanges: None,
            request_timeout: constants::request_timeout(),
            user_agent: format!("spreadscope/{}", env!("CARGO_PKG_VERSION")),
            poll: PollSchedule::default(),
            locale: NumberLocale::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base) = std::env::var("SPREADSCOPE_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }

        if let Ok(secs) = std::env::var("SPREADSCOPE_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(locale) = std::env::var("SPREADSCOPE_LOCALE") {
            if let Ok(locale) = locale.parse() {
                config.locale = locale;
            }
        }

        if let Ok(symbol) = std::env::var("SPREADSCOPE_SPREADS_SYMBOL") {
            config.spreads_symbol = Some(symbol);
        }

        if let Ok(exchanges) = std::env::var("SPREADSCOPE_SPREADS_EXCHANGES") {
            config.spreads_exchanges = Some(parse_exchange_list(&exchanges));
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base.is_empty() {
            return Err("API base URL cannot be empty".to_string());
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(format!("API base URL must be http(s): {}", self.api_base));
        }

        if self.spreads_limit == 0 || self.spreads_limit > limits::SPREADS_MAX_LIMIT {
            return Err(format!(
                "Spreads limit must be between 1 and {}",
                limits::SPREADS_MAX_LIMIT
            ));
        }

        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        self.poll.validate()
    }

    /// Full URL for a configured path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Query sent on every spreads poll.
    pub fn spread_query(&self) -> SpreadQuery {
        SpreadQuery {
            symbol: self.spreads_symbol.clone(),
            exchanges: self.spreads_exchanges.clone(),
            ..SpreadQuery::with_limit(self.spreads_limit)
        }
    }
}

/// Split a comma separated exchange list, dropping blanks.
pub fn parse_exchange_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.url(&config.rates_path), "http://127.0.0.1:8000/api/converter/rates");
        assert_eq!(config.spread_query(), SpreadQuery::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig {
            api_base: "ftp://example".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        config.api_base = "http://localhost:8000".to_string();
        config.spreads_limit = 0;
        assert!(config.validate().is_err());

        config.spreads_limit = 100;
        config.poll.interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_url_joins_trailing_slash() {
        let config = ClientConfig {
            api_base: "http://localhost:8000/".to_string(),
            ..ClientConfig::default()
        };

        assert_eq!(config.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_parse_exchange_list() {
        assert_eq!(parse_exchange_list(" Gate, mexc ,,"), vec!["gate", "mexc"]);
        assert!(parse_exchange_list("").is_empty());
    }
}
