//! Conversion inputs and outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spreadscope_common::AssetSymbol;

use crate::error::{FxError, FxResult};

/// A successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Source asset.
    pub from: AssetSymbol,
    /// Target asset.
    pub to: AssetSymbol,
    /// Parsed input amount, in `from` units.
    pub amount: f64,
    /// `to` units per one `from` unit.
    pub rate: f64,
    /// Converted amount, in `to` units. Never rounded.
    pub value: f64,
    /// When the conversion was evaluated.
    pub evaluated_at: DateTime<Utc>,
}

impl Conversion {
    /// Create a new conversion record.
    pub fn new(from: AssetSymbol, to: AssetSymbol, amount: f64, rate: f64, value: f64) -> Self {
        Self {
            from,
            to,
            amount,
            rate,
            value,
            evaluated_at: Utc::now(),
        }
    }
}

/// Outcome of [`crate::engine::convert`].
pub type ConversionResult = FxResult<Conversion>;

/// Parse a user-typed amount.
///
/// Trims, accepts one decimal comma in place of a point, and rejects anything
/// that is not a positive finite number, in that order.
pub fn parse_amount(text: &str) -> FxResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FxError::EmptyInput);
    }

    let normalized = trimmed.replacen(',', ".", 1);
    let amount = normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(FxError::NotANumber)?;

    if amount <= 0.0 {
        return Err(FxError::NonPositiveAmount);
    }

    Ok(amount)
}

/// Current state of the converter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSelection {
    /// Selected source asset.
    pub from: Option<AssetSymbol>,
    /// Selected target asset.
    pub to: Option<AssetSymbol>,
    /// Raw text of the amount field.
    pub amount_text: String,
}

impl ConversionSelection {
    /// Create a selection.
    pub fn new(
        from: impl Into<AssetSymbol>,
        to: impl Into<AssetSymbol>,
        amount_text: impl Into<String>,
    ) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            amount_text: amount_text.into(),
        }
    }

    /// Exchange source and target.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_order() {
        assert_eq!(parse_amount(""), Err(FxError::EmptyInput));
        assert_eq!(parse_amount("   \t"), Err(FxError::EmptyInput));
        assert_eq!(parse_amount("abc"), Err(FxError::NotANumber));
        assert_eq!(parse_amount("-5"), Err(FxError::NonPositiveAmount));
        assert_eq!(parse_amount("0"), Err(FxError::NonPositiveAmount));
    }

    #[test]
    fn test_parse_amount_decimal_comma() {
        assert_eq!(parse_amount("12,5"), Ok(12.5));
        assert_eq!(parse_amount(" 100 "), Ok(100.0));
        assert_eq!(parse_amount("1e3"), Ok(1000.0));
        // Only the first comma becomes a point.
        assert_eq!(parse_amount("1,000,5"), Err(FxError::NotANumber));
    }

    #[test]
    fn test_parse_amount_rejects_non_finite() {
        assert_eq!(parse_amount("inf"), Err(FxError::NotANumber));
        assert_eq!(parse_amount("NaN"), Err(FxError::NotANumber));
        assert_eq!(parse_amount("1e999"), Err(FxError::NotANumber));
    }

    #[test]
    fn test_selection_swap() {
        let mut selection = ConversionSelection::new("USD", "RUB", "10");
        selection.swap();

        assert_eq!(selection.from, Some(AssetSymbol::rub()));
        assert_eq!(selection.to, Some(AssetSymbol::usd()));
        assert_eq!(selection.amount_text, "10");
    }
}
