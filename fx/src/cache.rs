//! Slot holding the current rate table.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use spreadscope_common::RateTable;
use std::sync::Arc;
use tracing::debug;

/// One installed table with its bookkeeping.
#[derive(Debug, Clone)]
struct CacheEntry {
    table: Arc<RateTable>,
    installed_at: Option<DateTime<Utc>>,
    generation: u64,
}

/// The current rate table, swapped whole on every load.
///
/// Readers get an `Arc` snapshot, so a reader racing a swap sees either the old
/// or the new table in full.
pub struct RateCache {
    entry: RwLock<CacheEntry>,
}

impl RateCache {
    /// Create a cache holding an empty table.
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(CacheEntry {
                table: Arc::new(RateTable::default()),
                installed_at: None,
                generation: 0,
            }),
        }
    }

    /// Replace the table. Returns the new generation.
    pub fn replace(&self, table: RateTable) -> u64 {
        let mut entry = self.entry.write();
        let generation = entry.generation + 1;
        *entry = CacheEntry {
            table: Arc::new(table),
            installed_at: Some(Utc::now()),
            generation,
        };
        debug!(
            generation,
            assets = entry.table.len(),
            base = %entry.table.base,
            "Rate table replaced"
        );
        generation
    }

    /// Snapshot of the current table.
    pub fn current(&self) -> Arc<RateTable> {
        self.entry.read().table.clone()
    }

    /// When the current table was installed; `None` before the first load.
    pub fn installed_at(&self) -> Option<DateTime<Utc>> {
        self.entry.read().installed_at
    }

    /// Check whether any table was ever installed.
    pub fn is_loaded(&self) -> bool {
        self.entry.read().generation > 0
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entry = self.entry.read();
        CacheStats {
            generation: entry.generation,
            assets: entry.table.len(),
            installed_at: entry.installed_at,
        }
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub generation: u64,
    pub assets: usize,
    pub installed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use spreadscope_common::AssetSymbol;

    #[test]
    fn test_cache_starts_empty() {
        let cache = RateCache::new();

        assert!(!cache.is_loaded());
        assert!(cache.current().is_empty());
        assert!(cache.installed_at().is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let cache = RateCache::new();
        cache.replace(RateTable::new("USD").with_rate("EUR", 0.92).with_rate("RUB", 95.0));

        let before = cache.current();
        let generation = cache.replace(RateTable::new("USD").with_rate("GBP", 0.79));
        let after = cache.current();

        assert_eq!(generation, 2);
        // Old snapshot is untouched by the swap.
        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 1);
        assert!(!after.contains(&AssetSymbol::eur()));
        assert_eq!(cache.stats().assets, 1);
        assert!(cache.is_loaded());
    }
}
