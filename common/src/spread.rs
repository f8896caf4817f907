//! Spread records as produced by the backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, SpreadScopeError};

/// Lowest and highest observed price of one symbol across exchanges.
///
/// Records are already computed upstream; the client only displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadRecord {
    /// Instrument symbol, e.g. `BTC_USDT`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: String,
    /// Exchange with the lowest price.
    #[serde(default, deserialize_with = "lenient_string")]
    pub low_exchange: String,
    /// Lowest price.
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub low_price: f64,
    /// Exchange with the highest price.
    #[serde(default, deserialize_with = "lenient_string")]
    pub high_exchange: String,
    /// Highest price.
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub high_price: f64,
    /// Absolute spread, `high_price - low_price`.
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub spread_abs: f64,
    /// Spread in percent of the low price.
    #[serde(default = "nan", deserialize_with = "lenient_f64")]
    pub spread_pct: f64,
    /// Exchanges that quoted the symbol, sorted by name.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub compared_exchanges: Vec<String>,
    /// Number of quotes compared.
    #[serde(default, deserialize_with = "lenient_integer")]
    pub quotes_count: Option<u32>,
    /// Oldest quote timestamp (unix ms).
    #[serde(default, deserialize_with = "lenient_integer")]
    pub ts_min: Option<i64>,
    /// Newest quote timestamp (unix ms).
    #[serde(default, deserialize_with = "lenient_integer")]
    pub ts_max: Option<i64>,
}

impl SpreadRecord {
    /// Create a record with the displayed fields only.
    pub fn new(
        symbol: impl Into<String>,
        low_exchange: impl Into<String>,
        low_price: f64,
        high_exchange: impl Into<String>,
        high_price: f64,
    ) -> Self {
        let spread_abs = high_price - low_price;
        Self {
            symbol: symbol.into(),
            low_exchange: low_exchange.into(),
            low_price,
            high_exchange: high_exchange.into(),
            high_price,
            spread_abs,
            spread_pct: spread_abs / low_price * 100.0,
            compared_exchanges: Vec::new(),
            quotes_count: None,
            ts_min: None,
            ts_max: None,
        }
    }

    /// Decode the `records` array of a `/api/spreads` response body.
    ///
    /// A missing or non-array `records` field is an empty list. Entries that are
    /// not objects are skipped.
    pub fn list_from_json(body: &str) -> Result<Vec<Self>> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| SpreadScopeError::Decode(format!("spreads: {}", e)))?;
        Ok(Self::list_from_value(value))
    }

    /// Decode the records of an already-parsed spreads document.
    pub fn list_from_value(value: Value) -> Vec<Self> {
        let records = match value {
            Value::Object(mut doc) => match doc.remove("records") {
                Some(Value::Array(records)) => records,
                _ => return Vec::new(),
            },
            _ => return Vec::new(),
        };

        records
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<SpreadRecord>(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed spread record");
                    None
                }
            })
            .collect()
    }
}

fn nan() -> f64 {
    f64::NAN
}

/// Number, numeric string or anything else (NaN).
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// String, number rendered as text, or empty.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Whole number, as a number or numeric string, that fits `T`; otherwise `None`.
fn lenient_integer<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    };
    Ok(number.and_then(|n| T::try_from(n).ok()))
}

fn whole(x: f64) -> Option<i64> {
    (x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64).then(|| x as i64)
}

/// Array of names; non-array values are empty and items go through [`lenient_string`].
fn lenient_string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
