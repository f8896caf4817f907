//! Converter state behind the asset selectors and the amount field.

use parking_lot::RwLock;
use serde::Serialize;
use spreadscope_common::{digits, AssetSymbol, NumberLocale, RateTable, UNAVAILABLE};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::RateCache;
use crate::conversion::{ConversionResult, ConversionSelection};
use crate::engine::{convert_selection, derive_asset_list, pair_rate, select_defaults};

/// Shown when the initial rate table could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load local quotes";

const RATE_UNAVAILABLE_LABEL: &str = "Rate: unavailable";

/// Options for both asset selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    /// Same list for "from" and "to".
    pub assets: Vec<AssetSymbol>,
    pub from: Option<AssetSymbol>,
    pub to: Option<AssetSymbol>,
}

/// Everything the converter panel displays.
#[derive(Debug, Clone)]
pub struct ConverterView {
    /// Pair rate, shown even while the amount is invalid.
    pub pair_rate: Option<f64>,
    /// `Rate: 1 USD = 95 RUB` or `Rate: unavailable`.
    pub pair_label: String,
    /// Outcome of the last evaluation.
    pub outcome: ConversionResult,
    /// `Result: 92 EUR` or `Result: —`.
    pub result_label: String,
    /// Inline error line, if any.
    pub error: Option<String>,
}

impl ConverterView {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Default)]
struct Inputs {
    assets: Vec<AssetSymbol>,
    selection: ConversionSelection,
}

/// Owns the current rate table and the selection made against it.
pub struct Converter {
    cache: RateCache,
    inputs: RwLock<Inputs>,
    locale: NumberLocale,
}

impl Converter {
    /// Create a converter with no table loaded.
    pub fn new(locale: NumberLocale) -> Self {
        Self {
            cache: RateCache::new(),
            inputs: RwLock::new(Inputs::default()),
            locale,
        }
    }

    /// Install a freshly fetched table and reset the selectors.
    ///
    /// The amount text survives a reload.
    pub fn install_table(&self, table: RateTable) -> SelectorOptions {
        let assets = derive_asset_list(&table);
        let (from, to) = select_defaults(&assets);
        let generation = self.cache.replace(table);

        let mut inputs = self.inputs.write();
        inputs.assets = assets;
        inputs.selection.from = from;
        inputs.selection.to = to;

        info!(
            generation,
            assets = inputs.assets.len(),
            from = ?inputs.selection.from,
            to = ?inputs.selection.to,
            "Converter selectors populated"
        );

        SelectorOptions {
            assets: inputs.assets.clone(),
            from: inputs.selection.from.clone(),
            to: inputs.selection.to.clone(),
        }
    }

    /// View for a failed table load.
    pub fn mark_load_failed(&self) -> ConverterView {
        let mut view = self.evaluate();
        view.error = Some(LOAD_FAILED_MESSAGE.to_string());
        view
    }

    /// Current selector options.
    pub fn selectors(&self) -> SelectorOptions {
        let inputs = self.inputs.read();
        SelectorOptions {
            assets: inputs.assets.clone(),
            from: inputs.selection.from.clone(),
            to: inputs.selection.to.clone(),
        }
    }

    pub fn selection(&self) -> ConversionSelection {
        self.inputs.read().selection.clone()
    }

    /// Snapshot of the current table.
    pub fn table(&self) -> Arc<RateTable> {
        self.cache.current()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    pub fn select_from(&self, asset: impl Into<AssetSymbol>) -> ConverterView {
        self.inputs.write().selection.from = Some(asset.into());
        self.evaluate()
    }

    pub fn select_to(&self, asset: impl Into<AssetSymbol>) -> ConverterView {
        self.inputs.write().selection.to = Some(asset.into());
        self.evaluate()
    }

    pub fn set_amount(&self, text: impl Into<String>) -> ConverterView {
        self.inputs.write().selection.amount_text = text.into();
        self.evaluate()
    }

    /// Exchange "from" and "to", then re-evaluate.
    pub fn swap(&self) -> ConverterView {
        self.inputs.write().selection.swap();
        self.evaluate()
    }

    /// Explicit convert request for the current selection.
    pub fn convert(&self) -> ConverterView {
        let view = self.evaluate();
        if let Ok(conversion) = &view.outcome {
            info!(
                from = %conversion.from,
                to = %conversion.to,
                amount = conversion.amount,
                value = conversion.value,
                "Converted"
            );
        }
        view
    }

    /// Pair rate of the current selection.
    pub fn pair_rate(&self) -> Option<f64> {
        self.pair_label().0
    }

    /// Pair rate of the current selection with its display label.
    pub fn pair_label(&self) -> (Option<f64>, String) {
        let selection = self.selection();
        self.label_for(&selection, &self.cache.current())
    }

    fn label_for(&self, selection: &ConversionSelection, table: &RateTable) -> (Option<f64>, String) {
        match (&selection.from, &selection.to) {
            (Some(from), Some(to)) => match pair_rate(table, from, to) {
                Some(rate) => (
                    Some(rate),
                    format!(
                        "Rate: 1 {} = {} {}",
                        from,
                        self.locale.format(rate, digits::RATE),
                        to
                    ),
                ),
                None => (None, RATE_UNAVAILABLE_LABEL.to_string()),
            },
            _ => (None, RATE_UNAVAILABLE_LABEL.to_string()),
        }
    }

    /// Recompute the pair label and the conversion for the current selection.
    pub fn evaluate(&self) -> ConverterView {
        let selection = self.selection();
        let table = self.cache.current();

        let (rate, pair_label) = self.label_for(&selection, &table);

        let outcome = convert_selection(
            &table,
            selection.from.as_ref(),
            selection.to.as_ref(),
            &selection.amount_text,
        );

        let (result_label, error) = match &outcome {
            Ok(conversion) => (
                format!(
                    "Result: {} {}",
                    self.locale.format(conversion.value, digits::AMOUNT),
                    conversion.to
                ),
                None,
            ),
            Err(e) => {
                debug!(code = e.error_code(), "Conversion rejected");
                (format!("Result: {}", UNAVAILABLE), Some(e.to_string()))
            }
        };

        ConverterView {
            pair_rate: rate,
            pair_label,
            outcome,
            result_label,
            error,
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(NumberLocale::default())
    }
}
