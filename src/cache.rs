//! Bounded memoization of metrics reports.
//!
//! The engines themselves are pure and stateless; the calling layer owns
//! this cache and keys it by a deterministic composite of the data version
//! and the active filters. Purely an optimization: callers observe identical
//! reports whether or not a computation was cached.

use analytics::MetricsReport;
use chrono::NaiveDate;
use filters::TradeFilters;
use std::collections::{HashMap, VecDeque};

pub const DEFAULT_CACHE_CAPACITY: usize = 25;

/// Composite cache key. `data_version` changes whenever the underlying
/// batch changes (new import, new decode run), which implicitly invalidates
/// every filter combination computed from the previous batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub data_version: u64,
    pub symbol: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl CacheKey {
    pub fn new(data_version: u64, filters: &TradeFilters) -> Self {
        Self {
            data_version,
            // Normalized the same way the filter treats it, so "no symbol"
            // and "empty symbol" share an entry.
            symbol: filters.active_symbol().map(str::to_string),
            from: filters.from,
            to: filters.to,
        }
    }
}

/// Capacity-bounded map evicting its oldest entry once full.
#[derive(Debug)]
pub struct MetricsCache {
    capacity: usize,
    order: VecDeque<CacheKey>,
    entries: HashMap<CacheKey, MetricsReport>,
}

impl MetricsCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached report for `key`, computing and storing it on a
    /// miss. The oldest entry is evicted once the cache is at capacity.
    pub fn get_or_compute(
        &mut self,
        key: CacheKey,
        compute: impl FnOnce() -> MetricsReport,
    ) -> &MetricsReport {
        if !self.entries.contains_key(&key) {
            let report = compute();
            if self.order.len() == self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.order.push_back(key.clone());
            self.entries.insert(key.clone(), report);
        }
        // The entry exists: either it was already cached or just inserted.
        &self.entries[&key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn key(version: u64) -> CacheKey {
        CacheKey {
            data_version: version,
            symbol: None,
            from: None,
            to: None,
        }
    }

    fn report(marker: i64) -> MetricsReport {
        let mut report = MetricsReport::new();
        report.kpis.total_pnl = Decimal::from(marker);
        report
    }

    #[test]
    fn hits_do_not_recompute() {
        let mut cache = MetricsCache::new(4);
        let mut computed = 0;
        cache.get_or_compute(key(1), || {
            computed += 1;
            report(1)
        });
        let hit = cache.get_or_compute(key(1), || {
            computed += 1;
            report(99)
        });
        assert_eq!(hit.kpis.total_pnl, Decimal::from(1));
        assert_eq!(computed, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let mut cache = MetricsCache::new(2);
        cache.get_or_compute(key(1), || report(1));
        cache.get_or_compute(key(2), || report(2));
        cache.get_or_compute(key(3), || report(3));
        assert_eq!(cache.len(), 2);

        // Key 1 was evicted: recomputation runs again.
        let mut recomputed = false;
        cache.get_or_compute(key(1), || {
            recomputed = true;
            report(1)
        });
        assert!(recomputed);
    }

    #[test]
    fn distinct_filters_get_distinct_entries() {
        let filters_a = TradeFilters {
            symbol: Some("SOL/USDC".to_string()),
            ..TradeFilters::default()
        };
        let filters_b = TradeFilters {
            symbol: Some(String::new()),
            ..TradeFilters::default()
        };
        let a = CacheKey::new(1, &filters_a);
        let b = CacheKey::new(1, &filters_b);
        assert_ne!(a, b);
        // Empty symbol normalizes to "no symbol".
        assert_eq!(b, CacheKey::new(1, &TradeFilters::default()));
        // A new data version misses regardless of filters.
        assert_ne!(a, CacheKey::new(2, &filters_a));
    }
}
