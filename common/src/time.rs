//! Timing constants and fixed limits of the SpreadScope client.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Client timing constants.
pub mod constants {
    use super::Duration;

    /// Delay before the second spreads fetch (2 seconds).
    ///
    /// The backend poller needs a moment to fill its price cache after start.
    pub fn spreads_warmup_delay() -> Duration {
        Duration::from_secs(2)
    }

    /// Interval of the recurring spreads fetch (5 seconds).
    pub fn spreads_refresh_interval() -> Duration {
        Duration::from_secs(5)
    }

    /// Default HTTP request timeout (10 seconds).
    pub fn request_timeout() -> Duration {
        Duration::from_secs(10)
    }
}

/// Fixed request limits.
pub mod limits {
    /// Page size requested from `/api/spreads`.
    pub const SPREADS_PAGE_LIMIT: u32 = 100;

    /// Largest page the backend accepts.
    pub const SPREADS_MAX_LIMIT: u32 = 1000;
}

/// Get current UTC timestamp.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert a backend unix-millisecond timestamp.
pub fn from_unix_ms(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_constants() {
        assert!(constants::spreads_warmup_delay() < constants::spreads_refresh_interval());
        assert!(limits::SPREADS_PAGE_LIMIT <= limits::SPREADS_MAX_LIMIT);
    }

    #[test]
    fn test_from_unix_ms() {
        let ts = from_unix_ms(1_700_000_000_000).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }
}
