//! Schedule resolution: cache, source fetch, fallback, staleness guard.
//!
//! Resolution never fails. A fetch or parse error yields the configured
//! fallback schedule marked as degraded, and the error is logged.
//!
//! Every resolution is started with [`ScheduleResolver::begin`], which hands
//! out a [`Ticket`] carrying a generation number. Starting a newer resolution,
//! or calling [`ScheduleResolver::invalidate`], makes all older tickets stale,
//! so a slow response for a previous selection can never overwrite the
//! schedule of the current one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use miqat_core::{DaySchedule, ScheduleKey};
use miqat_providers::{ScheduleRequest, ScheduleSource, normalize_timings};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::ScheduleCache;

/// Where a resolved schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleOrigin {
    /// Fetched from the source just now.
    Live,
    /// Served from the cache.
    Cached,
    /// The configured fallback times.
    Fallback,
}

/// A schedule bound to the key it was resolved for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSchedule {
    pub key: ScheduleKey,
    pub schedule: DaySchedule,
    pub origin: ScheduleOrigin,
    /// Why the fallback was used, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResolvedSchedule {
    /// Returns true if this is the fallback schedule.
    pub fn is_degraded(&self) -> bool {
        self.origin == ScheduleOrigin::Fallback
    }
}

/// Handle for one in-flight resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    generation: u64,
    key: ScheduleKey,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &ScheduleKey {
        &self.key
    }
}

/// Outcome of a guarded resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The result belongs to the latest request and may be applied.
    Applied {
        generation: u64,
        resolved: ResolvedSchedule,
    },
    /// A newer request or a teardown superseded this one; the result was
    /// discarded.
    Stale { key: ScheduleKey },
}

/// Turns (date, location) keys into schedules.
pub struct ScheduleResolver {
    source: Arc<dyn ScheduleSource>,
    fallback: DaySchedule,
    cache: Mutex<ScheduleCache>,
    generation: AtomicU64,
}

impl ScheduleResolver {
    /// Creates a resolver over `source`, using `fallback` in degraded mode.
    pub fn new(source: Arc<dyn ScheduleSource>, fallback: DaySchedule, cache_ttl: Duration) -> Self {
        Self {
            source,
            fallback,
            cache: Mutex::new(ScheduleCache::new(cache_ttl)),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the name of the underlying source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Returns the fallback schedule.
    pub fn fallback(&self) -> DaySchedule {
        self.fallback
    }

    /// Delay the source suggests between retries.
    pub fn retry_delay(&self) -> Duration {
        self.source.suggested_retry_delay()
    }

    /// Starts a new resolution for `key`, superseding all earlier ones.
    pub fn begin(&self, key: ScheduleKey) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, key = %key.cache_key(), "Beginning resolution");
        Ticket { generation, key }
    }

    /// Returns true if no resolution was started after `generation`.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "Invalidated pending resolutions");
    }

    /// Resolves the ticket's key and checks it is still current.
    pub async fn complete(&self, ticket: Ticket) -> Resolution {
        let resolved = self.resolve(&ticket.key).await;
        if self.is_current(ticket.generation) {
            Resolution::Applied {
                generation: ticket.generation,
                resolved,
            }
        } else {
            debug!(
                generation = ticket.generation,
                key = %ticket.key.cache_key(),
                "Discarding stale resolution"
            );
            Resolution::Stale { key: ticket.key }
        }
    }

    /// Resolves `key` without any staleness check.
    pub async fn resolve(&self, key: &ScheduleKey) -> ResolvedSchedule {
        if let Some(schedule) = self.cached(key) {
            debug!(key = %key.cache_key(), "Schedule served from cache");
            return ResolvedSchedule {
                key: key.clone(),
                schedule,
                origin: ScheduleOrigin::Cached,
                error: None,
            };
        }

        let request = ScheduleRequest::from(key.clone());
        let result = self
            .source
            .fetch_day(request)
            .await
            .and_then(|raw| normalize_timings(&raw));

        match result {
            Ok(schedule) => {
                self.store(key, schedule);
                info!(
                    source = self.source.name(),
                    date = %key.date,
                    location = %key.location.name,
                    "Schedule resolved"
                );
                ResolvedSchedule {
                    key: key.clone(),
                    schedule,
                    origin: ScheduleOrigin::Live,
                    error: None,
                }
            }
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    date = %key.date,
                    location = %key.location.name,
                    error = %e,
                    "Schedule unavailable, using fallback times"
                );
                ResolvedSchedule {
                    key: key.clone(),
                    schedule: self.fallback,
                    origin: ScheduleOrigin::Fallback,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Drops the cached schedule for `key`, forcing the next resolution to
    /// hit the source.
    pub fn evict(&self, key: &ScheduleKey) {
        self.lock_cache().remove(key);
    }

    /// Removes expired cache entries, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.lock_cache().purge_expired()
    }

    /// Number of schedules currently cached, expired or not.
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    fn cached(&self, key: &ScheduleKey) -> Option<DaySchedule> {
        self.lock_cache().get_valid(key).map(|entry| entry.schedule)
    }

    fn store(&self, key: &ScheduleKey, schedule: DaySchedule) {
        self.lock_cache().insert(key, schedule);
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, ScheduleCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    use chrono::NaiveDate;
    use miqat_providers::{BoxFuture, ProviderError, ProviderResult, RawTimings};

    use super::*;

    /// A source with per-date timings and delays that counts its fetches.
    #[derive(Default)]
    pub struct ScriptedSource {
        days: HashMap<NaiveDate, (Duration, ProviderResult<RawTimings>)>,
        retry_delay: Option<Duration>,
        pub fetches: AtomicUsize,
    }

    impl ScriptedSource {
        pub fn with_day(mut self, date: NaiveDate, delay: Duration, times: [&str; 6]) -> Self {
            self.days
                .insert(date, (delay, Ok(RawTimings::from_strs(times))));
            self
        }

        pub fn with_failure(mut self, date: NaiveDate, error: ProviderError) -> Self {
            self.days.insert(date, (Duration::ZERO, Err(error)));
            self
        }

        pub fn with_retry_delay(mut self, delay: Duration) -> Self {
            self.retry_delay = Some(delay);
            self
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl ScheduleSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn suggested_retry_delay(&self) -> Duration {
            self.retry_delay.unwrap_or(Duration::from_secs(30))
        }

        fn fetch_day(&self, request: ScheduleRequest) -> BoxFuture<'_, ProviderResult<RawTimings>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let entry = self.days.get(&request.date).map(|(delay, result)| {
                let result = match result {
                    Ok(timings) => Ok(timings.clone()),
                    Err(e) => Err(ProviderError::new(e.code(), e.message())),
                };
                (*delay, result)
            });
            Box::pin(async move {
                match entry {
                    Some((delay, result)) => {
                        tokio::time::sleep(delay).await;
                        result
                    }
                    None => Err(ProviderError::network("no such day")),
                }
            })
        }
    }

    pub const CAIRO: [&str; 6] = [
        "04:32 (EET)",
        "06:01 (EET)",
        "11:57 (EET)",
        "15:13 (EET)",
        "17:53 (EET)",
        "19:11 (EET)",
    ];

    pub const MECCA: [&str; 6] = ["05:14", "06:31", "12:33", "15:55", "18:35", "19:55"];

    pub fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    pub fn cairo() -> miqat_core::LocationConfig {
        miqat_core::LocationConfig::new("Cairo", 30.0444, 31.2357, 5)
    }

    pub fn mecca() -> miqat_core::LocationConfig {
        miqat_core::LocationConfig::new("Mecca", 21.4225, 39.8262, 4)
    }
}
