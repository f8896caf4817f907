//! Spread table presenter.

use parking_lot::RwLock;
use spreadscope_common::{NumberLocale, SpreadRecord};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::feed::{ApplyOutcome, FeedStats, FeedStatus, SpreadFeedState};
use crate::render::{render, SpreadView};
use crate::schedule::{spawn_schedule, PollSchedule};
use crate::source::{SpreadQuery, SpreadSource};

/// Receives every re-rendered spread view.
///
/// Called with the feed locked, so views arrive in the order the feed
/// changed. Implementations must not call back into the presenter.
pub trait SpreadRenderer: Send + Sync {
    fn render_spreads(&self, view: &SpreadView);
}

/// Owns the spread feed and pushes a fresh view after every change.
pub struct SpreadPresenter {
    source: Arc<dyn SpreadSource>,
    query: SpreadQuery,
    feed: RwLock<SpreadFeedState>,
    renderer: Arc<dyn SpreadRenderer>,
    locale: NumberLocale,
}

impl SpreadPresenter {
    pub fn new(
        source: Arc<dyn SpreadSource>,
        query: SpreadQuery,
        renderer: Arc<dyn SpreadRenderer>,
        locale: NumberLocale,
    ) -> Self {
        Self {
            source,
            query,
            feed: RwLock::new(SpreadFeedState::new()),
            renderer,
            locale,
        }
    }

    /// Fetch one page and re-render.
    ///
    /// A failed fetch empties the table and shows the failure placeholder.
    #[instrument(skip(self), fields(source = %self.source.name()))]
    pub async fn refresh(&self) -> ApplyOutcome {
        let sequence = {
            let mut feed = self.feed.write();
            let first = feed.last_applied() == 0 && feed.last_issued() == 0;
            let sequence = feed.begin_fetch();
            if first {
                self.renderer.render_spreads(&render(&feed, self.locale));
            }
            sequence
        };

        let result = self.source.fetch_spreads(&self.query).await;
        if let Err(e) = &result {
            warn!(sequence, error = %e, code = e.error_code(), "Spreads fetch failed");
        }

        let mut feed = self.feed.write();
        let outcome = feed.apply(sequence, result);
        if outcome != ApplyOutcome::Stale {
            let view = render(&feed, self.locale);
            if outcome == ApplyOutcome::Applied {
                debug!(sequence, rows = view.rows().len(), "Spreads applied");
            }
            self.renderer.render_spreads(&view);
        }
        outcome
    }

    /// Replace the filter text and re-render from the records already held.
    ///
    /// Before the first fetch nothing is rendered; the filter applies from the
    /// first result on.
    pub fn set_filter(&self, text: impl Into<String>) -> SpreadView {
        let mut feed = self.feed.write();
        feed.set_filter(text);
        let view = render(&feed, self.locale);
        if feed.status() != FeedStatus::Idle {
            self.renderer.render_spreads(&view);
        }
        view
    }

    pub fn view(&self) -> SpreadView {
        render(&self.feed.read(), self.locale)
    }

    /// Unfiltered records of the last applied fetch.
    pub fn records(&self) -> Vec<SpreadRecord> {
        self.feed.read().records().to_vec()
    }

    pub fn filter_text(&self) -> String {
        self.feed.read().filter_text().to_string()
    }

    pub fn stats(&self) -> FeedStats {
        self.feed.read().stats()
    }

    pub fn query(&self) -> &SpreadQuery {
        &self.query
    }

    /// Start polling on `schedule`. The task runs until aborted.
    pub fn spawn_polling(self: &Arc<Self>, schedule: PollSchedule) -> JoinHandle<()> {
        info!(
            warmup_ms = schedule.warmup_delay.as_millis() as u64,
            interval_ms = schedule.interval.as_millis() as u64,
            limit = self.query.limit,
            "Starting spread polling"
        );
        let presenter = Arc::clone(self);
        spawn_schedule(schedule, move || {
            let presenter = Arc::clone(&presenter);
            async move {
                presenter.refresh().await;
            }
        })
    }
}
