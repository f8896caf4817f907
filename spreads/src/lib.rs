//! SpreadScope Spread Feed
//!
//! Polls the backend for cross-exchange spread records and keeps a filtered,
//! formatted table of them:
//! - **Source**: [`SpreadSource`] fetches one page per [`SpreadQuery`]
//! - **Feed**: [`SpreadFeedState`] holds the last applied page and drops
//!   responses that arrive after a newer one was applied
//! - **Render**: [`render`] maps the feed to rows or a placeholder
//! - **Presenter**: [`SpreadPresenter`] ties them together and polls on a
//!   [`PollSchedule`]

pub mod feed;
pub mod filter;
pub mod presenter;
pub mod render;
pub mod schedule;
pub mod source;

pub use feed::{ApplyOutcome, FeedStats, FeedStatus, SpreadFeedState};
pub use filter::apply_filter;
pub use presenter::{SpreadPresenter, SpreadRenderer};
pub use render::{render, SpreadRow, SpreadView, COLUMNS, EMPTY_TEXT, LOADING_TEXT, LOAD_FAILED_TEXT};
pub use schedule::{spawn_schedule, PollSchedule};
pub use source::{SpreadQuery, SpreadSource};

#[cfg(any(test, feature = "test-utils"))]
pub use source::MockSpreadSource;
