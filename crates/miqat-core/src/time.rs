//! Time-of-day types for the daily prayer schedule.
//!
//! This module provides [`MinuteOfDay`] for the minute-granular clock times
//! that a schedule is made of, [`TimeOfDay`] for a second-granular wall-clock
//! reading, and the [`Clock`] seam used to read the current local time.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;

/// Number of minutes in a civil day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Number of seconds in a civil day.
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// A clock time with minute precision, stored as minutes since local midnight.
///
/// Always in `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    /// Local midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Creates a new minute-of-day, returning `None` when out of range.
    pub fn new(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Creates a minute-of-day from an hour and minute pair.
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Returns the number of minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Returns the hour component (0-23).
    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    /// Returns the minute component (0-59).
    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Returns the number of seconds from midnight to the start of this minute.
    pub fn as_seconds(self) -> u32 {
        u32::from(self.0) * 60
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for MinuteOfDay {
    type Err = ScheduleError;

    /// Parses a strict `HH:MM` clock string (the hour may have one digit).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidClock(s.to_string());

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if hour.is_empty()
            || hour.len() > 2
            || minute.len() != 2
            || !hour.bytes().all(|b| b.is_ascii_digit())
            || !minute.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for MinuteOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MinuteOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A wall-clock reading with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    /// The current minute of the day.
    pub minute: MinuteOfDay,
    /// The second within that minute (0-59).
    pub second: u8,
}

impl TimeOfDay {
    /// Creates a time of day from hours, minutes and seconds.
    pub fn from_hms(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if second >= 60 {
            return None;
        }
        Some(Self {
            minute: MinuteOfDay::from_hm(hour, minute)?,
            second,
        })
    }

    /// Creates a time of day from the number of seconds since midnight.
    ///
    /// Values past the end of the day wrap around.
    pub fn from_seconds(seconds: u32) -> Self {
        let seconds = seconds % SECONDS_PER_DAY;
        Self {
            minute: MinuteOfDay((seconds / 60) as u16),
            second: (seconds % 60) as u8,
        }
    }

    /// Returns the number of seconds elapsed since local midnight.
    pub fn seconds_since_midnight(self) -> u32 {
        self.minute.as_seconds() + u32::from(self.second)
    }

    /// Returns the number of seconds left until the next local midnight.
    pub fn seconds_until_midnight(self) -> u32 {
        SECONDS_PER_DAY - self.seconds_since_midnight()
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Leap seconds are folded into the last second of the minute.
    fn from(time: NaiveTime) -> Self {
        Self {
            minute: MinuteOfDay((time.hour() * 60 + time.minute()) as u16),
            second: time.second().min(59) as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minute, self.second)
    }
}

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Returns the current local time of day.
    fn time_of_day(&self) -> TimeOfDay {
        self.now().time().into()
    }
}

/// A [`Clock`] backed by the system's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A [`Clock`] whose reading is set explicitly.
///
/// Clones share the same reading.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<NaiveDateTime>>,
}

impl ManualClock {
    /// Creates a clock frozen at the given instant.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Moves the clock to the given instant.
    pub fn set(&self, now: NaiveDateTime) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    /// Moves the clock forward by the given number of seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard += chrono::Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}
