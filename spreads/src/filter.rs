//! Symbol filter over spread records.

use spreadscope_common::SpreadRecord;

/// Normalize raw filter input: trimmed and upper-cased.
pub fn normalize_filter(filter_text: &str) -> String {
    filter_text.trim().to_uppercase()
}

/// Check a single record against an already normalized filter.
pub fn matches(record: &SpreadRecord, normalized_filter: &str) -> bool {
    normalized_filter.is_empty() || record.symbol.to_uppercase().contains(normalized_filter)
}

/// Records whose symbol contains the filter, case-insensitively, in input order.
///
/// An empty (or blank) filter keeps every record.
pub fn apply_filter(records: &[SpreadRecord], filter_text: &str) -> Vec<SpreadRecord> {
    let needle = normalize_filter(filter_text);
    records
        .iter()
        .filter(|r| matches(r, &needle))
        .cloned()
        .collect()
}
