//! Rate table provider traits and implementations.

use async_trait::async_trait;
use spreadscope_common::{RateTable, Result};

/// Source of whole rate tables.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the current rate table.
    async fn fetch_rates(&self) -> Result<RateTable>;
}

/// Provider that always returns the same table.
pub struct StaticRateProvider {
    table: RateTable,
}

impl StaticRateProvider {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        "STATIC"
    }

    async fn fetch_rates(&self) -> Result<RateTable> {
        Ok(self.table.clone())
    }
}

/// Mock rate provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    name: String,
    response: parking_lot::Mutex<Result<RateTable>>,
    delay: parking_lot::Mutex<Option<std::time::Duration>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    /// Create a mock that serves an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: parking_lot::Mutex::new(Ok(RateTable::default())),
            delay: parking_lot::Mutex::new(None),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Serve this table from now on.
    pub fn set_table(&self, table: RateTable) {
        *self.response.lock() = Ok(table);
    }

    /// Fail with this error from now on.
    pub fn set_error(&self, error: spreadscope_common::SpreadScopeError) {
        *self.response.lock() = Err(error);
    }

    /// Hold every response for `delay` before returning it.
    pub fn set_delay(&self, delay: Option<std::time::Duration>) {
        *self.delay.lock() = delay;
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rates(&self) -> Result<RateTable> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let response = self.response.lock().clone();
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spreadscope_common::{AssetSymbol, SpreadScopeError};

    #[test]
    fn test_static_provider() {
        let provider = StaticRateProvider::new(RateTable::new("USD").with_rate("EUR", 0.92));

        let table = tokio_test::block_on(provider.fetch_rates()).unwrap();

        assert_eq!(table.rate(&AssetSymbol::eur()), Some(0.92));
        assert_eq!(provider.name(), "STATIC");
    }

    #[tokio::test]
    async fn test_mock_provider() {
        let provider = MockRateProvider::new("test");
        provider.set_table(RateTable::new("USD").with_rate("RUB", 95.0));

        let table = provider.fetch_rates().await.unwrap();
        assert_eq!(table.rate(&AssetSymbol::rub()), Some(95.0));

        provider.set_error(SpreadScopeError::Transport {
            endpoint: "/api/converter/rates".to_string(),
            status: 502,
        });
        assert!(provider.fetch_rates().await.is_err());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_provider_delay() {
        let provider = MockRateProvider::new("slow");
        provider.set_delay(Some(std::time::Duration::from_secs(10)));

        let started = tokio::time::Instant::now();
        provider.fetch_rates().await.unwrap();

        assert!(started.elapsed() >= std::time::Duration::from_secs(10));
    }
}
