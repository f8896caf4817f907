//! Turning feed state into table rows or a placeholder.

use serde::Serialize;
use spreadscope_common::{digits, NumberLocale, SpreadRecord};

use crate::feed::{FeedStatus, SpreadFeedState};

pub const LOADING_TEXT: &str = "Loading...";
pub const LOAD_FAILED_TEXT: &str = "Failed to load spreads";
/// Shared by "no data" and "no matches".
pub const EMPTY_TEXT: &str = "No data to display";

/// Column headers, in display order.
pub const COLUMNS: [&str; 7] = [
    "Symbol",
    "Low exchange",
    "Low price",
    "High exchange",
    "High price",
    "Spread",
    "Spread %",
];

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadRow {
    pub symbol: String,
    pub low_exchange: String,
    pub low_price: String,
    pub high_exchange: String,
    pub high_price: String,
    pub spread_abs: String,
    pub spread_pct: String,
}

impl SpreadRow {
    pub fn from_record(record: &SpreadRecord, locale: NumberLocale) -> Self {
        Self {
            symbol: record.symbol.clone(),
            low_exchange: record.low_exchange.clone(),
            low_price: locale.format(record.low_price, digits::PRICE),
            high_exchange: record.high_exchange.clone(),
            high_price: locale.format(record.high_price, digits::PRICE),
            spread_abs: locale.format(record.spread_abs, digits::PRICE),
            spread_pct: format!("{}%", locale.format(record.spread_pct, digits::PERCENT)),
        }
    }

    /// Cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.symbol,
            &self.low_exchange,
            &self.low_price,
            &self.high_exchange,
            &self.high_price,
            &self.spread_abs,
            &self.spread_pct,
        ]
    }
}

/// What the spread table shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "rows", rename_all = "snake_case")]
pub enum SpreadView {
    Loading,
    LoadFailed,
    Empty,
    Rows(Vec<SpreadRow>),
}

impl SpreadView {
    /// Single-row placeholder text, if this view has no data rows.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            SpreadView::Loading => Some(LOADING_TEXT),
            SpreadView::LoadFailed => Some(LOAD_FAILED_TEXT),
            SpreadView::Empty => Some(EMPTY_TEXT),
            SpreadView::Rows(_) => None,
        }
    }

    pub fn rows(&self) -> &[SpreadRow] {
        match self {
            SpreadView::Rows(rows) => rows,
            _ => &[],
        }
    }
}

/// Render the feed through its current filter.
pub fn render(feed: &SpreadFeedState, locale: NumberLocale) -> SpreadView {
    match feed.status() {
        FeedStatus::Loading => SpreadView::Loading,
        FeedStatus::Failed => SpreadView::LoadFailed,
        FeedStatus::Idle | FeedStatus::Loaded => {
            let rows: Vec<SpreadRow> = feed
                .filtered()
                .iter()
                .map(|r| SpreadRow::from_record(r, locale))
                .collect();
            if rows.is_empty() {
                SpreadView::Empty
            } else {
                SpreadView::Rows(rows)
            }
        }
    }
}
