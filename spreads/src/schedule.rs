//! Spread polling timeline.

use spreadscope_common::constants;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// When spreads are fetched: once immediately, once after `warmup_delay`,
/// then every `interval`, all measured from the end of the first fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub warmup_delay: Duration,
    pub interval: Duration,
}

impl PollSchedule {
    pub fn new(warmup_delay: Duration, interval: Duration) -> Self {
        Self {
            warmup_delay,
            interval,
        }
    }

    /// Check the schedule can drive a timer.
    pub fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("poll interval must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(
            constants::spreads_warmup_delay(),
            constants::spreads_refresh_interval(),
        )
    }
}

/// Run `refresh` on `schedule` until the returned task is aborted.
///
/// The first refresh is awaited; every later one is spawned as its own task,
/// so a slow response never delays the next tick.
pub fn spawn_schedule<F, Fut>(schedule: PollSchedule, refresh: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let refresh = Arc::new(refresh);

    tokio::spawn(async move {
        (*refresh)().await;
        let started = Instant::now();

        let warmup = Arc::clone(&refresh);
        tokio::spawn(async move {
            tokio::time::sleep(schedule.warmup_delay).await;
            debug!("Warm-up spreads refresh");
            (*warmup)().await;
        });

        let mut ticker = tokio::time::interval_at(started + schedule.interval, schedule.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            tokio::spawn((*refresh)());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_schedule() {
        let schedule = PollSchedule::default();

        assert_eq!(schedule.warmup_delay, Duration::from_secs(2));
        assert_eq!(schedule.interval, Duration::from_secs(5));
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let schedule = PollSchedule::new(Duration::from_secs(2), Duration::ZERO);
        assert!(schedule.validate().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_timeline() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let handle = spawn_schedule(PollSchedule::default(), move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);

        handle.abort();
    }
}
