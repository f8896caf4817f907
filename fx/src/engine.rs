//! Conversion through the base currency of a rate table.
//!
//! Every rate is quoted as units of the asset per one unit of the table's
//! base, so a pair rate is `rate[to] / rate[from]` and an amount converts as
//! `(amount / rate[from]) * rate[to]`. Both formulas live here and nowhere
//! else.

use spreadscope_common::{AssetSymbol, RateTable};

use crate::conversion::{parse_amount, Conversion, ConversionResult};
use crate::error::FxError;

/// Default source asset when the table lists it.
pub const DEFAULT_FROM: &str = "USD";
/// Default target asset when the table lists it.
pub const DEFAULT_TO: &str = "RUB";

/// Assets offered by both selectors, sorted and unique.
pub fn derive_asset_list(table: &RateTable) -> Vec<AssetSymbol> {
    let mut assets: Vec<AssetSymbol> = table.assets().cloned().collect();
    assets.sort();
    assets.dedup();
    assets
}

/// Initial `(from, to)` selection for a freshly loaded asset list.
///
/// Both start on the first asset, then `USD` and `RUB` win when present. A
/// same-asset pair is broken by moving `to` to the second asset.
pub fn select_defaults(assets: &[AssetSymbol]) -> (Option<AssetSymbol>, Option<AssetSymbol>) {
    let Some(first) = assets.first() else {
        return (None, None);
    };

    let find = |code: &str| assets.iter().find(|a| a.code() == code).cloned();

    let from = find(DEFAULT_FROM).unwrap_or_else(|| first.clone());
    let mut to = find(DEFAULT_TO).unwrap_or_else(|| first.clone());

    if from == to && assets.len() > 1 {
        to = assets[1].clone();
    }

    (Some(from), Some(to))
}

/// Number of `to` units per one `from` unit, if both rates are usable.
pub fn pair_rate(table: &RateTable, from: &AssetSymbol, to: &AssetSymbol) -> Option<f64> {
    if from.is_empty() || to.is_empty() {
        return None;
    }
    let rate_from = table.usable_rate(from)?;
    let rate_to = table.usable_rate(to)?;
    Some(rate_to / rate_from)
}

/// Convert a typed amount from one asset to another.
///
/// Checks run in a fixed order: blank input, unparsable input, non-positive
/// amount, then rate availability.
pub fn convert(
    table: &RateTable,
    from: &AssetSymbol,
    to: &AssetSymbol,
    amount_text: &str,
) -> ConversionResult {
    let amount = parse_amount(amount_text)?;

    let unavailable = || FxError::RateUnavailable {
        from: Some(from.clone()),
        to: Some(to.clone()),
    };
    let rate = pair_rate(table, from, to).ok_or_else(unavailable)?;
    let (Some(rate_from), Some(rate_to)) = (table.usable_rate(from), table.usable_rate(to)) else {
        return Err(unavailable());
    };

    let value = (amount / rate_from) * rate_to;

    Ok(Conversion::new(from.clone(), to.clone(), amount, rate, value))
}

/// [`convert`] for a selection whose sides may be unset.
pub fn convert_selection(
    table: &RateTable,
    from: Option<&AssetSymbol>,
    to: Option<&AssetSymbol>,
    amount_text: &str,
) -> ConversionResult {
    match (from, to) {
        (Some(from), Some(to)) => convert(table, from, to, amount_text),
        _ => {
            parse_amount(amount_text)?;
            Err(FxError::RateUnavailable {
                from: from.cloned(),
                to: to.cloned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_table() -> RateTable {
        RateTable::new("USD")
            .with_rate("USD", 1.0)
            .with_rate("RUB", 95.0)
            .with_rate("EUR", 0.92)
    }

    fn sym(code: &str) -> AssetSymbol {
        AssetSymbol::new(code)
    }

    #[test]
    fn test_derive_asset_list_sorted() {
        let assets = derive_asset_list(&sample_table());
        assert_eq!(assets, vec![sym("EUR"), sym("RUB"), sym("USD")]);
    }

    #[test]
    fn test_derive_asset_list_from_repeated_keys() {
        let table =
            RateTable::from_json(r#"{"rates":{"USD":1,"BTC":0.00002,"USD":1,"AED":3.67}}"#)
                .unwrap();

        let assets = derive_asset_list(&table);

        assert_eq!(assets, vec![sym("AED"), sym("BTC"), sym("USD")]);
    }

    #[test]
    fn test_select_defaults_usd_rub() {
        let assets = derive_asset_list(&sample_table());
        assert_eq!(select_defaults(&assets), (Some(sym("USD")), Some(sym("RUB"))));
    }

    #[test]
    fn test_select_defaults_breaks_same_pair() {
        // No RUB, so `to` starts on the first asset, which is USD as well.
        let assets = vec![sym("USD"), sym("ZAR")];
        assert_eq!(select_defaults(&assets), (Some(sym("USD")), Some(sym("ZAR"))));
    }

    #[test]
    fn test_select_defaults_keeps_distinct_pair() {
        let assets = vec![sym("EUR"), sym("USD")];
        assert_eq!(select_defaults(&assets), (Some(sym("USD")), Some(sym("EUR"))));
    }

    #[test]
    fn test_select_defaults_without_usd_or_rub() {
        let assets = vec![sym("AED"), sym("EUR"), sym("GBP")];
        assert_eq!(select_defaults(&assets), (Some(sym("AED")), Some(sym("EUR"))));
    }

    #[test]
    fn test_select_defaults_single_and_empty() {
        assert_eq!(select_defaults(&[sym("USD")]), (Some(sym("USD")), Some(sym("USD"))));
        assert_eq!(select_defaults(&[]), (None, None));
    }

    #[test]
    fn test_pair_rate_direction() {
        let table = sample_table();

        assert_eq!(pair_rate(&table, &sym("USD"), &sym("RUB")), Some(95.0));
        assert_eq!(pair_rate(&table, &sym("RUB"), &sym("USD")), Some(1.0 / 95.0));
        assert_eq!(pair_rate(&table, &sym("USD"), &sym("EUR")), Some(0.92));
    }

    #[test]
    fn test_pair_rate_unavailable() {
        let table = sample_table().with_rate("ZERO", 0.0).with_rate("NEG", -1.0);

        assert_eq!(pair_rate(&table, &sym(""), &sym("RUB")), None);
        assert_eq!(pair_rate(&table, &sym("USD"), &sym("")), None);
        assert_eq!(pair_rate(&table, &sym("XXX"), &sym("RUB")), None);
        assert_eq!(pair_rate(&table, &sym("USD"), &sym("XXX")), None);
        assert_eq!(pair_rate(&table, &sym("ZERO"), &sym("RUB")), None);
        assert_eq!(pair_rate(&table, &sym("NEG"), &sym("RUB")), None);
        // A zero target rate is unavailable too, rather than a 0 rate label.
        assert_eq!(pair_rate(&table, &sym("USD"), &sym("ZERO")), None);
        assert_eq!(pair_rate(&table, &sym("USD"), &sym("NEG")), None);
    }

    #[test]
    fn test_convert_through_base() {
        let table = sample_table();

        let conversion = convert(&table, &sym("RUB"), &sym("EUR"), "9500").unwrap();

        assert_eq!(conversion.value, (9500.0 / 95.0) * 0.92);
        assert!((conversion.value - 92.0).abs() < 1e-9);
        assert_eq!(conversion.amount, 9500.0);
        assert_eq!(conversion.rate, 0.92 / 95.0);
        assert_eq!(conversion.to, sym("EUR"));
    }

    #[test]
    fn test_convert_validation_precedence() {
        let table = sample_table();
        let missing = sym("XXX");

        assert_eq!(
            convert(&table, &sym("USD"), &sym("RUB"), ""),
            Err(FxError::EmptyInput)
        );
        assert_eq!(convert(&table, &missing, &missing, ""), Err(FxError::EmptyInput));
        assert_eq!(convert(&table, &missing, &missing, "abc"), Err(FxError::NotANumber));
        assert_eq!(
            convert(&table, &missing, &missing, "-5"),
            Err(FxError::NonPositiveAmount)
        );
        assert_eq!(
            convert(&table, &sym("USD"), &missing, "10"),
            Err(FxError::RateUnavailable {
                from: Some(sym("USD")),
                to: Some(missing.clone()),
            })
        );
    }

    #[test]
    fn test_convert_selection_with_unset_side() {
        let table = sample_table();

        assert_eq!(
            convert_selection(&table, None, Some(&sym("RUB")), ""),
            Err(FxError::EmptyInput)
        );
        assert!(matches!(
            convert_selection(&table, None, Some(&sym("RUB")), "5"),
            Err(FxError::RateUnavailable { from: None, .. })
        ));
        assert!(convert_selection(&table, Some(&sym("USD")), Some(&sym("RUB")), "5").is_ok());
    }

    fn asset_rate() -> impl Strategy<Value = f64> {
        1e-6f64..1e6f64
    }

    proptest! {
        #[test]
        fn prop_convert_matches_formula(
            rate_from in asset_rate(),
            rate_to in asset_rate(),
            amount in 1e-3f64..1e9f64,
        ) {
            let table = RateTable::new("USD").with_rate("A", rate_from).with_rate("B", rate_to);
            let text = amount.to_string();

            let conversion = convert(&table, &sym("A"), &sym("B"), &text).unwrap();

            prop_assert_eq!(conversion.value, amount / rate_from * rate_to);
        }

        #[test]
        fn prop_round_trip_recovers_amount(
            rate_from in asset_rate(),
            rate_to in asset_rate(),
            amount in 1e-3f64..1e9f64,
        ) {
            let table = RateTable::new("USD").with_rate("A", rate_from).with_rate("B", rate_to);

            let there = convert(&table, &sym("A"), &sym("B"), &amount.to_string()).unwrap();
            let back = convert(&table, &sym("B"), &sym("A"), &there.value.to_string()).unwrap();

            prop_assert!((back.value - amount).abs() <= amount * 1e-9);
        }

        #[test]
        fn prop_pair_rate_identity(rate in asset_rate()) {
            let table = RateTable::new("USD").with_rate("X", rate);
            prop_assert_eq!(pair_rate(&table, &sym("X"), &sym("X")), Some(1.0));
        }
    }
}
