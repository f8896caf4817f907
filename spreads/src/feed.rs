//! Spread feed state: the last applied page, the filter, and fetch ordering.

use serde::Serialize;
use spreadscope_common::{Result, SpreadRecord};
use tracing::debug;

use crate::filter::apply_filter;

/// Lifecycle of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    /// Nothing requested yet.
    Idle,
    /// First fetch in flight, nothing applied yet.
    Loading,
    /// The last applied fetch succeeded.
    Loaded,
    /// The last applied fetch failed.
    Failed,
}

/// What happened to a fetch result handed to [`SpreadFeedState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Records replaced.
    Applied,
    /// Failure recorded, records cleared.
    Failed,
    /// A later fetch was already applied; result dropped.
    Stale,
}

/// Fetch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub issued: u64,
    pub applied: u64,
    pub failed: u64,
    pub stale: u64,
}

/// Records of the last applied fetch plus the current filter text.
///
/// Every fetch takes a sequence number from [`begin_fetch`](Self::begin_fetch).
/// A result is applied only if no later-issued fetch was applied before it,
/// so overlapping polls can never roll the table back to older data.
#[derive(Debug, Clone)]
pub struct SpreadFeedState {
    records: Vec<SpreadRecord>,
    filter_text: String,
    status: FeedStatus,
    last_issued: u64,
    last_applied: u64,
    stats: FeedStats,
}

impl SpreadFeedState {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            filter_text: String::new(),
            status: FeedStatus::Idle,
            last_issued: 0,
            last_applied: 0,
            stats: FeedStats::default(),
        }
    }

    /// Register a new fetch and return its sequence number.
    pub fn begin_fetch(&mut self) -> u64 {
        self.last_issued += 1;
        self.stats.issued += 1;
        if self.status == FeedStatus::Idle {
            self.status = FeedStatus::Loading;
        }
        self.last_issued
    }

    /// Apply the result of fetch `sequence`.
    pub fn apply(&mut self, sequence: u64, result: Result<Vec<SpreadRecord>>) -> ApplyOutcome {
        if sequence <= self.last_applied {
            self.stats.stale += 1;
            debug!(
                sequence,
                last_applied = self.last_applied,
                "Dropping stale spreads response"
            );
            return ApplyOutcome::Stale;
        }
        self.last_applied = sequence;

        match result {
            Ok(records) => {
                self.records = records;
                self.status = FeedStatus::Loaded;
                self.stats.applied += 1;
                ApplyOutcome::Applied
            }
            Err(_) => {
                self.records.clear();
                self.status = FeedStatus::Failed;
                self.stats.failed += 1;
                ApplyOutcome::Failed
            }
        }
    }

    /// Replace the filter text. Records are untouched.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// All records of the last applied fetch, unfiltered.
    pub fn records(&self) -> &[SpreadRecord] {
        &self.records
    }

    /// Records passing the current filter, in server order.
    pub fn filtered(&self) -> Vec<SpreadRecord> {
        apply_filter(&self.records, &self.filter_text)
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }

    pub fn stats(&self) -> FeedStats {
        self.stats
    }
}

impl Default for SpreadFeedState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spreadscope_common::SpreadScopeError;

    fn page(symbols: &[&str]) -> Vec<SpreadRecord> {
        symbols
            .iter()
            .map(|s| SpreadRecord::new(*s, "gate", 100.0, "mexc", 101.0))
            .collect()
    }

    fn failure() -> SpreadScopeError {
        SpreadScopeError::Transport {
            endpoint: "/api/spreads".to_string(),
            status: 500,
        }
    }

    #[test]
    fn test_initial_state() {
        let feed = SpreadFeedState::new();

        assert_eq!(feed.status(), FeedStatus::Idle);
        assert!(feed.records().is_empty());
        assert_eq!(feed.filter_text(), "");
    }

    #[test]
    fn test_apply_replaces_records() {
        let mut feed = SpreadFeedState::new();

        let first = feed.begin_fetch();
        assert_eq!(feed.status(), FeedStatus::Loading);
        assert_eq!(feed.apply(first, Ok(page(&["BTC_USDT", "ETH_USDT"]))), ApplyOutcome::Applied);

        let second = feed.begin_fetch();
        feed.apply(second, Ok(page(&["SOL_USDT"])));

        assert_eq!(feed.records().len(), 1);
        assert_eq!(feed.records()[0].symbol, "SOL_USDT");
        assert_eq!(feed.status(), FeedStatus::Loaded);
    }

    #[test]
    fn test_failure_clears_records() {
        let mut feed = SpreadFeedState::new();
        let first = feed.begin_fetch();
        feed.apply(first, Ok(page(&["BTC_USDT"])));

        let second = feed.begin_fetch();
        assert_eq!(feed.apply(second, Err(failure())), ApplyOutcome::Failed);

        assert!(feed.records().is_empty());
        assert_eq!(feed.status(), FeedStatus::Failed);
    }

    #[test]
    fn test_out_of_order_response_is_dropped() {
        // Last-issued wins, not last-resolved.
        let mut feed = SpreadFeedState::new();
        let older = feed.begin_fetch();
        let newer = feed.begin_fetch();

        assert_eq!(feed.apply(newer, Ok(page(&["NEW"]))), ApplyOutcome::Applied);
        assert_eq!(feed.apply(older, Ok(page(&["OLD"]))), ApplyOutcome::Stale);

        assert_eq!(feed.records()[0].symbol, "NEW");
        assert_eq!(feed.stats().stale, 1);
        assert_eq!(feed.last_applied(), newer);
    }

    #[test]
    fn test_stale_failure_does_not_clear() {
        let mut feed = SpreadFeedState::new();
        let older = feed.begin_fetch();
        let newer = feed.begin_fetch();
        feed.apply(newer, Ok(page(&["NEW"])));

        assert_eq!(feed.apply(older, Err(failure())), ApplyOutcome::Stale);

        assert_eq!(feed.records().len(), 1);
        assert_eq!(feed.status(), FeedStatus::Loaded);
    }

    #[test]
    fn test_in_order_overlap_applies_both() {
        let mut feed = SpreadFeedState::new();
        let older = feed.begin_fetch();
        let newer = feed.begin_fetch();

        assert_eq!(feed.apply(older, Ok(page(&["OLD"]))), ApplyOutcome::Applied);
        assert_eq!(feed.apply(newer, Ok(page(&["NEW"]))), ApplyOutcome::Applied);

        assert_eq!(feed.records()[0].symbol, "NEW");
        assert_eq!(
            feed.stats(),
            FeedStats {
                issued: 2,
                applied: 2,
                failed: 0,
                stale: 0
            }
        );
    }

    #[test]
    fn test_filter_keeps_records() {
        let mut feed = SpreadFeedState::new();
        let seq = feed.begin_fetch();
        feed.apply(seq, Ok(page(&["BTC_USDT", "ETH_USDT"])));

        feed.set_filter("eth");

        assert_eq!(feed.filtered().len(), 1);
        assert_eq!(feed.records().len(), 2);

        feed.set_filter("");
        assert_eq!(feed.filtered().len(), 2);
    }
}
