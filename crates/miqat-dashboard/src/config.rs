//! Dashboard configuration.

use std::time::Duration;

use miqat_core::{DaySchedule, DisplayLanguage, MinuteOfDay};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// Clock times used when no live schedule is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackTimes {
    pub fajr: MinuteOfDay,
    pub sunrise: MinuteOfDay,
    pub dhuhr: MinuteOfDay,
    pub asr: MinuteOfDay,
    pub maghrib: MinuteOfDay,
    pub isha: MinuteOfDay,
}

impl Default for FallbackTimes {
    fn default() -> Self {
        let hm = |h, m| MinuteOfDay::from_hm(h, m).unwrap_or(MinuteOfDay::MIDNIGHT);
        Self {
            fajr: hm(4, 45),
            sunrise: hm(6, 0),
            dhuhr: hm(12, 15),
            asr: hm(15, 30),
            maghrib: hm(18, 0),
            isha: hm(19, 30),
        }
    }
}

impl FallbackTimes {
    /// Builds the fallback schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured times are not strictly ascending.
    pub fn to_schedule(&self) -> DashboardResult<DaySchedule> {
        Ok(DaySchedule::from_times([
            self.fajr,
            self.sunrise,
            self.dhuhr,
            self.asr,
            self.maghrib,
            self.isha,
        ])?)
    }
}

/// Configuration for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Period of the countdown ticker.
    pub tick_interval: Duration,

    /// How long a successfully fetched schedule is reused.
    pub cache_ttl: Duration,

    /// Language for schedule display names.
    pub language: DisplayLanguage,

    /// Times used in degraded mode.
    pub fallback: FallbackTimes,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(6 * 60 * 60),
            language: DisplayLanguage::default(),
            fallback: FallbackTimes::default(),
        }
    }
}

impl DashboardConfig {
    /// Builder: set tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Builder: set cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Builder: set display language.
    pub fn with_language(mut self, language: DisplayLanguage) -> Self {
        self.language = language;
        self
    }

    /// Builder: set fallback times.
    pub fn with_fallback(mut self, fallback: FallbackTimes) -> Self {
        self.fallback = fallback;
        self
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> DashboardResult<()> {
        if self.tick_interval.is_zero() {
            return Err(DashboardError::config("tick interval must be non-zero"));
        }
        self.fallback.to_schedule()?;
        Ok(())
    }
}
