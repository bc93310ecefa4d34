//! Caller-owned, time-bounded cache of fetched series.
//!
//! Entries are keyed by the requested symbol set, lookback and as-of date and
//! expire after a fixed TTL. The cache is an ordinary value owned by whoever
//! drives the fetches; nothing here is global. `now` is passed in explicitly so
//! expiry is deterministic in tests.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::RawSeries;

/// Default time-to-live for cached fetches.
pub const DEFAULT_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    symbols: Vec<String>,
    lookback_days: u32,
    as_of: NaiveDate,
}

impl CacheKey {
    /// Symbol order does not matter for the key.
    pub fn new<S: AsRef<str>>(symbols: &[S], lookback_days: u32, as_of: NaiveDate) -> Self {
        let mut symbols: Vec<String> = symbols.iter().map(|s| s.as_ref().to_string()).collect();
        symbols.sort();
        symbols.dedup();
        Self {
            symbols,
            lookback_days,
            as_of,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    series: Vec<RawSeries>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SeriesCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached series for `key` if the entry has not expired at `now`.
    pub fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<&[RawSeries]> {
        self.entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.series.as_slice())
    }

    pub fn insert(&mut self, key: CacheKey, series: Vec<RawSeries>, now: DateTime<Utc>) {
        let expires_at = now + self.ttl;
        self.entries.insert(key, CacheEntry { series, expires_at });
    }

    /// Return the cached value or run `fetch` and store its result.
    pub fn get_or_try_insert<E>(
        &mut self,
        key: CacheKey,
        now: DateTime<Utc>,
        fetch: impl FnOnce() -> Result<Vec<RawSeries>, E>,
    ) -> Result<(&[RawSeries], bool), E> {
        let hit = self.get(&key, now).is_some();
        if !hit {
            let series = fetch()?;
            self.insert(key.clone(), series, now);
        }
        let series = self
            .entries
            .get(&key)
            .map(|entry| entry.series.as_slice())
            .unwrap_or_default();
        Ok((series, hit))
    }

    /// Drop every entry that has expired at `now`; returns how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        before - self.entries.len()
    }
}
