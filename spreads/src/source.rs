//! Where spread records come from.

use async_trait::async_trait;
use serde::Serialize;
use spreadscope_common::{limits, Result, SpreadRecord};

/// Parameters of one `/api/spreads` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadQuery {
    /// Page size, capped at [`limits::SPREADS_MAX_LIMIT`].
    pub limit: u32,
    /// Server-side symbol filter.
    pub symbol: Option<String>,
    /// Restrict the comparison to these exchanges.
    pub exchanges: Option<Vec<String>>,
}

impl SpreadQuery {
    /// Query with the given page size and no server-side filters.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, limits::SPREADS_MAX_LIMIT),
            symbol: None,
            exchanges: None,
        }
    }

    /// Key/value pairs for the request URL, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(symbol) = self.symbol.as_ref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("symbol", symbol.trim().to_string()));
        }
        if let Some(exchanges) = self.exchanges.as_ref().filter(|e| !e.is_empty()) {
            pairs.push(("exchanges", exchanges.join(",")));
        }
        pairs
    }
}

impl Default for SpreadQuery {
    fn default() -> Self {
        Self::with_limit(limits::SPREADS_PAGE_LIMIT)
    }
}

/// Source of spread record pages.
#[async_trait]
pub trait SpreadSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch one page of spread records.
    async fn fetch_spreads(&self, query: &SpreadQuery) -> Result<Vec<SpreadRecord>>;
}

/// Mock spread source for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockSpreadSource {
    name: String,
    response: parking_lot::Mutex<Result<Vec<SpreadRecord>>>,
    delay: parking_lot::Mutex<Option<std::time::Duration>>,
    calls: std::sync::atomic::AtomicUsize,
    last_query: parking_lot::Mutex<Option<SpreadQuery>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockSpreadSource {
    /// Create a mock that serves an empty page.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: parking_lot::Mutex::new(Ok(Vec::new())),
            delay: parking_lot::Mutex::new(None),
            calls: std::sync::atomic::AtomicUsize::new(0),
            last_query: parking_lot::Mutex::new(None),
        }
    }

    /// Serve these records from now on.
    pub fn set_records(&self, records: Vec<SpreadRecord>) {
        *self.response.lock() = Ok(records);
    }

    /// Fail with this error from now on.
    pub fn set_error(&self, error: spreadscope_common::SpreadScopeError) {
        *self.response.lock() = Err(error);
    }

    /// Hold every response for `delay` before returning it.
    pub fn set_delay(&self, delay: Option<std::time::Duration>) {
        *self.delay.lock() = delay;
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Query of the most recent fetch.
    pub fn last_query(&self) -> Option<SpreadQuery> {
        self.last_query.lock().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl SpreadSource for MockSpreadSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_spreads(&self, query: &SpreadQuery) -> Result<Vec<SpreadRecord>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.last_query.lock() = Some(query.clone());

        // Snapshot the response when the fetch starts, like a real request would.
        let response = self.response.lock().clone();
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }
}
