//! Schedule cache with TTL support.
//!
//! Only successfully fetched schedules are stored. Fallback schedules never
//! enter the cache so that the next resolution retries the source.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use miqat_core::{DaySchedule, ScheduleKey};
use tracing::{debug, trace};

/// Cache entry containing a schedule and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Cached schedule.
    pub schedule: DaySchedule,
    /// When the entry was fetched.
    pub updated_at: DateTime<Utc>,
    /// When the entry expires (monotonic clock).
    expires_at: Instant,
}

impl CacheEntry {
    /// Creates a new cache entry with the given TTL.
    pub fn new(schedule: DaySchedule, ttl: Duration) -> Self {
        Self {
            schedule,
            updated_at: Utc::now(),
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns true if the entry has expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Returns the time until expiration.
    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Schedules keyed by [`ScheduleKey::cache_key`].
#[derive(Debug)]
pub struct ScheduleCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(6 * 60 * 60))
    }
}

impl ScheduleCache {
    /// Creates a new cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached schedule for `key` if present and not expired.
    pub fn get_valid(&self, key: &ScheduleKey) -> Option<&CacheEntry> {
        self.entries
            .get(&key.cache_key())
            .filter(|entry| !entry.is_expired())
    }

    /// Inserts or replaces the schedule for `key`.
    pub fn insert(&mut self, key: &ScheduleKey, schedule: DaySchedule) {
        let cache_key = key.cache_key();
        if self
            .entries
            .insert(cache_key.clone(), CacheEntry::new(schedule, self.ttl))
            .is_some()
        {
            debug!(key = %cache_key, "Replaced cache entry");
        } else {
            debug!(key = %cache_key, "Inserted new cache entry");
        }
    }

    /// Removes the entry for `key`.
    pub fn remove(&mut self, key: &ScheduleKey) -> Option<CacheEntry> {
        let removed = self.entries.remove(&key.cache_key());
        if removed.is_some() {
            debug!(key = %key.cache_key(), "Removed cache entry");
        }
        removed
    }

    /// Removes all expired entries, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired();
            if !keep {
                trace!(key = %key, "Purging expired entry");
            }
            keep
        });
        before - self.entries.len()
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count, "Cleared cache");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use miqat_core::{LocationConfig, MinuteOfDay};

    fn key(day: u32) -> ScheduleKey {
        ScheduleKey::new(
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            LocationConfig::new("Cairo", 30.0444, 31.2357, 5),
        )
    }

    fn schedule() -> DaySchedule {
        let t = |s: &str| s.parse::<MinuteOfDay>().unwrap();
        DaySchedule::from_times([
            t("04:32"),
            t("06:01"),
            t("11:57"),
            t("15:13"),
            t("17:53"),
            t("19:11"),
        ])
        .unwrap()
    }

    #[test]
    fn insert_and_get() {
        let mut cache = ScheduleCache::new(Duration::from_secs(60));
        cache.insert(&key(7), schedule());

        let entry = cache.get_valid(&key(7)).unwrap();
        assert_eq!(entry.schedule, schedule());
        assert!(entry.time_until_expiry() > Duration::ZERO);
        assert!(cache.get_valid(&key(8)).is_none());
    }

    #[test]
    fn location_is_part_of_the_key() {
        let mut cache = ScheduleCache::new(Duration::from_secs(60));
        cache.insert(&key(7), schedule());

        let mut elsewhere = key(7);
        elsewhere.location = LocationConfig::new("Mecca", 21.4225, 39.8262, 4);
        assert!(cache.get_valid(&elsewhere).is_none());
    }

    #[test]
    fn expired_entries_are_hidden_and_purged() {
        let mut cache = ScheduleCache::new(Duration::from_millis(1));
        cache.insert(&key(7), schedule());
        std::thread::sleep(Duration::from_millis(10));

        assert!(cache.get_valid(&key(7)).is_none());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_and_clear() {
        let mut cache = ScheduleCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(21600));
        cache.insert(&key(7), schedule());
        cache.insert(&key(8), schedule());

        assert!(cache.remove(&key(7)).is_some());
        assert!(cache.remove(&key(7)).is_none());
        cache.clear();
        assert!(cache.is_empty());
    }
}
