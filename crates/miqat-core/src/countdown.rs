//! Hours/minutes/seconds breakdown of a remaining duration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A remaining duration split into clock components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Countdown {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
}

impl Countdown {
    /// Splits a number of seconds into hours, minutes and seconds.
    pub fn from_seconds(total: u32) -> Self {
        Self {
            hours: total / 3600,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
        }
    }

    /// Returns the total number of seconds.
    pub fn total_seconds(&self) -> u32 {
        self.hours * 3600 + u32::from(self.minutes) * 60 + u32::from(self.seconds)
    }

    /// Returns the zero-padded string form of each component.
    pub fn padded(&self) -> FormattedCountdown {
        FormattedCountdown {
            hours: format!("{:02}", self.hours),
            minutes: format!("{:02}", self.minutes),
            seconds: format!("{:02}", self.seconds),
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Zero-padded countdown components, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedCountdown {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}
