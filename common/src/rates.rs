//! Asset symbols and base-currency rate tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use crate::error::{Result, SpreadScopeError};

/// Pivot currency assumed when the backend omits `base`.
pub const DEFAULT_BASE: &str = "USD";

/// Symbol of a quoted asset, kept exactly as the backend delivers it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetSymbol(String);

impl AssetSymbol {
    /// Create a new asset symbol.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the symbol text.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// An empty symbol never names an asset.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn rub() -> Self {
        Self::new("RUB")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetSymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetSymbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Rates of every asset relative to one implicit base asset.
///
/// `rate(X)` is the number of X units per one unit of `base`. Every stored
/// value is finite; values `<= 0` are kept but never usable for conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    /// The pivot currency.
    pub base: AssetSymbol,
    rates: BTreeMap<AssetSymbol, f64>,
}

impl RateTable {
    /// Create an empty table for the given base.
    pub fn new(base: impl Into<AssetSymbol>) -> Self {
        Self {
            base: base.into(),
            rates: BTreeMap::new(),
        }
    }

    /// Add a rate, builder style. Non-finite values are ignored.
    pub fn with_rate(mut self, asset: impl Into<AssetSymbol>, rate: f64) -> Self {
        self.insert(asset.into(), rate);
        self
    }

    /// Insert a rate. Returns false when the value is not finite and was dropped.
    pub fn insert(&mut self, asset: AssetSymbol, rate: f64) -> bool {
        if !rate.is_finite() {
            return false;
        }
        self.rates.insert(asset, rate);
        true
    }

    /// Raw rate for an asset, if present.
    pub fn rate(&self, asset: &AssetSymbol) -> Option<f64> {
        self.rates.get(asset).copied()
    }

    /// Rate for an asset only if it can take part in a conversion.
    pub fn usable_rate(&self, asset: &AssetSymbol) -> Option<f64> {
        self.rate(asset).filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Check whether the table lists an asset at all.
    pub fn contains(&self, asset: &AssetSymbol) -> bool {
        self.rates.contains_key(asset)
    }

    /// Listed assets in lexicographic order.
    pub fn assets(&self) -> impl Iterator<Item = &AssetSymbol> {
        self.rates.keys()
    }

    /// Iterate over `(asset, rate)` pairs in asset order.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetSymbol, f64)> {
        self.rates.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Decode the `/api/converter/rates` response body.
    ///
    /// Shape: `{ "base": "USD", "rates": { "EUR": 0.92, ... } }`. A missing base
    /// falls back to [`DEFAULT_BASE`], missing or non-object `rates` yields an
    /// empty table and non-numeric entries are dropped.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| SpreadScopeError::Decode(format!("rate table: {}", e)))?;
        Self::from_value(value)
    }

    /// Decode an already-parsed rates document.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut doc) = value else {
            return Err(SpreadScopeError::Decode(
                "rate table: expected a JSON object".to_string(),
            ));
        };

        let base = match doc.remove("base") {
            Some(Value::String(base)) if !base.is_empty() => base,
            _ => DEFAULT_BASE.to_string(),
        };

        let mut table = RateTable::new(base);
        if let Some(Value::Object(rates)) = doc.remove("rates") {
            for (asset, raw) in rates {
                let inserted = raw
                    .as_f64()
                    .map(|rate| table.insert(AssetSymbol::new(asset.clone()), rate))
                    .unwrap_or(false);
                if !inserted {
                    warn!(asset = %asset, value = %raw, "Dropping non-numeric rate");
                }
            }
        }

        Ok(table)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}
