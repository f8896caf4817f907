//! Plain-text rendering of client views.

use std::io::Write;

use spreadscope_client::ViewSink;
use spreadscope_fx::{ConverterView, SelectorOptions};
use spreadscope_spreads::{SpreadView, COLUMNS};

/// Sink that prints every spread table to stdout.
///
/// Converter views are ignored; one-shot commands print their own result.
pub struct TerminalSink;

impl TerminalSink {
    fn print(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // Closed pipe: nothing left to show.
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }
}

impl ViewSink for TerminalSink {
    fn selectors(&self, _options: &SelectorOptions) {}

    fn pair_rate(&self, _rate: Option<f64>, _label: &str) {}

    fn converter(&self, _view: &ConverterView) {}

    fn spreads(&self, view: &SpreadView) {
        self.print(&format_spread_table(view));
    }
}

pub fn format_selectors(options: &SelectorOptions) -> String {
    let list: Vec<&str> = options.assets.iter().map(|a| a.code()).collect();
    format!(
        "Assets ({}): {}\nFrom: {}  To: {}",
        list.len(),
        list.join(" "),
        options.from.as_ref().map(|a| a.code()).unwrap_or("-"),
        options.to.as_ref().map(|a| a.code()).unwrap_or("-"),
    )
}

pub fn format_converter(view: &ConverterView) -> String {
    let mut text = format!("{}\n{}", view.pair_label, view.result_label);
    if let Some(error) = &view.error {
        text.push_str(&format!("\nError: {}", error));
    }
    text
}

/// The spread table with a header, or the header and one placeholder line.
pub fn format_spread_table(view: &SpreadView) -> String {
    let rows: Vec<[&str; 7]> = view.rows().iter().map(|r| r.cells()).collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str; 7]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(&COLUMNS)];
    match view.placeholder() {
        Some(text) => lines.push(text.to_string()),
        None => lines.extend(rows.iter().map(|row| line(row))),
    }
    lines.join("\n")
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{}{}", cell, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spreadscope_common::{AssetSymbol, NumberLocale, RateTable, SpreadRecord};
    use spreadscope_fx::Converter;
    use spreadscope_spreads::SpreadRow;

    #[test]
    fn test_placeholder_table() {
        let text = format_spread_table(&SpreadView::LoadFailed);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Symbol"));
        assert_eq!(lines[1], "Failed to load spreads");
    }

    #[test]
    fn test_rows_are_aligned() {
        let rows = vec![
            SpreadRow::from_record(
                &SpreadRecord::new("BTC_USDT", "gate", 64000.5, "mexc", 64100.0),
                NumberLocale::En,
            ),
            SpreadRow::from_record(
                &SpreadRecord::new("X", "okx", 1.0, "gate", 1.5),
                NumberLocale::En,
            ),
        ];

        let text = format_spread_table(&SpreadView::Rows(rows));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let column = lines[0].find("Low exchange").unwrap();
        assert_eq!(lines[1].find("gate"), Some(column));
        assert_eq!(lines[2].find("okx"), Some(column));
        assert!(lines[2].ends_with("50%"));
    }

    #[test]
    fn test_format_converter_error_line() {
        let converter = Converter::new(NumberLocale::En);
        converter.install_table(RateTable::new("USD").with_rate("USD", 1.0).with_rate("RUB", 95.0));

        let ok = converter.set_amount("2");
        let rejected = converter.set_amount("abc");

        assert_eq!(format_converter(&ok), "Rate: 1 USD = 95 RUB\nResult: 190 RUB");
        let text = format_converter(&rejected);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "Error: Amount must be a number");
    }

    #[test]
    fn test_format_selectors() {
        let options = SelectorOptions {
            assets: vec![AssetSymbol::eur(), AssetSymbol::usd()],
            from: Some(AssetSymbol::usd()),
            to: None,
        };

        assert_eq!(format_selectors(&options), "Assets (2): EUR USD\nFrom: USD  To: -");
    }
}
