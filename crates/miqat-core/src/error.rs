//! Error types for schedule construction and validation.

use thiserror::Error;

use crate::prayer::PrayerId;
use crate::time::MinuteOfDay;

/// Errors raised while building or validating schedule data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// A clock string was not a valid `HH:MM` time.
    #[error("invalid clock time: {0:?}")]
    InvalidClock(String),

    /// The events of a schedule are not in canonical prayer order.
    #[error("expected {expected} at position {position}, found {found}")]
    OutOfOrder {
        position: usize,
        expected: PrayerId,
        found: PrayerId,
    },

    /// Two consecutive events are not strictly ascending in time.
    #[error("{next} at {next_time} does not follow {previous} at {previous_time}")]
    NotAscending {
        previous: PrayerId,
        previous_time: MinuteOfDay,
        next: PrayerId,
        next_time: MinuteOfDay,
    },

    /// A location configuration is unusable.
    #[error("invalid location: {0}")]
    InvalidLocation(String),
}
