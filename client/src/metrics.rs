//! Client-side counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use spreadscope_spreads::FeedStats;

/// Client metrics.
pub struct ClientMetrics {
    /// Successful rate table loads.
    pub rate_loads_ok: AtomicU64,
    /// Failed rate table loads.
    pub rate_loads_failed: AtomicU64,
    /// Conversions that produced a value.
    pub conversions_ok: AtomicU64,
    /// Conversions rejected for input or missing rates.
    pub conversions_rejected: AtomicU64,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self {
            rate_loads_ok: AtomicU64::new(0),
            rate_loads_failed: AtomicU64::new(0),
            conversions_ok: AtomicU64::new(0),
            conversions_rejected: AtomicU64::new(0),
        }
    }

    pub fn rate_load(&self, ok: bool) {
        let counter = if ok {
            &self.rate_loads_ok
        } else {
            &self.rate_loads_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn conversion(&self, ok: bool) {
        let counter = if ok {
            &self.conversions_ok
        } else {
            &self.conversions_rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot, with the spread feed counters attached.
    pub fn snapshot(&self, spreads: FeedStats) -> MetricsSnapshot {
        MetricsSnapshot {
            rate_loads_ok: self.rate_loads_ok.load(Ordering::Relaxed),
            rate_loads_failed: self.rate_loads_failed.load(Ordering::Relaxed),
            conversions_ok: self.conversions_ok.load(Ordering::Relaxed),
            conversions_rejected: self.conversions_rejected.load(Ordering::Relaxed),
            spreads,
        }
    }
}

impl Default for ClientMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the client counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub rate_loads_ok: u64,
    pub rate_loads_failed: u64,
    pub conversions_ok: u64,
    pub conversions_rejected: u64,
    pub spreads: FeedStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = ClientMetrics::new();

        metrics.rate_load(true);
        metrics.rate_load(false);
        metrics.conversion(true);
        metrics.conversion(true);
        metrics.conversion(false);

        let snapshot = metrics.snapshot(FeedStats::default());
        assert_eq!(snapshot.rate_loads_ok, 1);
        assert_eq!(snapshot.rate_loads_failed, 1);
        assert_eq!(snapshot.conversions_ok, 2);
        assert_eq!(snapshot.conversions_rejected, 1);
        assert_eq!(snapshot.spreads.issued, 0);
    }
}
