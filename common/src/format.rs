//! Locale-aware number formatting for display.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shown in place of any number that cannot be displayed.
pub const UNAVAILABLE: &str = "—";

/// Maximum fraction digits per displayed field.
pub mod digits {
    /// Pair rates.
    pub const RATE: u32 = 8;
    /// Converted amounts.
    pub const AMOUNT: u32 = 2;
    /// Spread prices and absolute spreads.
    pub const PRICE: u32 = 8;
    /// Spread percentages.
    pub const PERCENT: u32 = 4;
}

/// Grouping and decimal conventions of a display locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberLocale {
    /// `1 234 567,89`, groups only from five integer digits.
    Ru,
    /// `1,234,567.89`.
    En,
}

impl NumberLocale {
    pub fn decimal_separator(&self) -> char {
        match self {
            NumberLocale::Ru => ',',
            NumberLocale::En => '.',
        }
    }

    pub fn group_separator(&self) -> char {
        match self {
            NumberLocale::Ru => '\u{a0}',
            NumberLocale::En => ',',
        }
    }

    /// Integer digits needed before grouping kicks in.
    fn grouping_threshold(&self) -> usize {
        match self {
            NumberLocale::Ru => 5,
            NumberLocale::En => 4,
        }
    }

    /// Format `value` with at most `max_fraction_digits` fraction digits.
    ///
    /// Rounds half away from zero and drops trailing zeros. Non-finite values
    /// yield [`UNAVAILABLE`].
    pub fn format(&self, value: f64, max_fraction_digits: u32) -> String {
        if !value.is_finite() {
            return UNAVAILABLE.to_string();
        }

        // Shortest round-trip digits, not the exact binary expansion.
        let shortest = value.to_string();
        let decimal = Decimal::from_str(&shortest)
            .ok()
            .or_else(|| Decimal::from_f64(value));

        let text = match decimal {
            Some(decimal) => {
                let rounded = decimal
                    .round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero)
                    .normalize();
                if rounded.is_zero() {
                    "0".to_string()
                } else {
                    rounded.to_string()
                }
            }
            // Outside the decimal range; such magnitudes have no fraction digits to keep.
            None => shortest,
        };

        self.localize(&text)
    }

    /// Apply separators to a plain `-1234.5` style string.
    fn localize(&self, plain: &str) -> String {
        let (sign, unsigned) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let mut out = String::with_capacity(plain.len() + int_part.len() / 3 * 2);
        out.push_str(sign);

        if int_part.len() >= self.grouping_threshold() {
            let lead = int_part.len() % 3;
            for (i, ch) in int_part.chars().enumerate() {
                if i != 0 && (i + 3 - lead) % 3 == 0 {
                    out.push(self.group_separator());
                }
                out.push(ch);
            }
        } else {
            out.push_str(int_part);
        }

        if let Some(frac) = frac_part {
            out.push(self.decimal_separator());
            out.push_str(frac);
        }

        out
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale::Ru
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberLocale::Ru => write!(f, "ru"),
            NumberLocale::En => write!(f, "en"),
        }
    }
}

impl FromStr for NumberLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" | "ru-ru" => Ok(NumberLocale::Ru),
            "en" | "en-us" | "en-gb" => Ok(NumberLocale::En),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

/// Format with the default locale.
pub fn format_number(value: f64, max_fraction_digits: u32) -> String {
    NumberLocale::default().format(value, max_fraction_digits)
}
