//! Next-event lookup over a day schedule.
//!
//! Everything here is a pure function of a [`DaySchedule`] and a wall-clock
//! reading. The same wraparound arithmetic backs both the general countdown
//! and the Iftar/Suhoor boundary in [`crate::fast`].

use serde::{Deserialize, Serialize};

use crate::prayer::PrayerId;
use crate::schedule::DaySchedule;
use crate::time::{MinuteOfDay, TimeOfDay};

/// The event a countdown is currently aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountdownTarget {
    /// The upcoming event.
    pub event: PrayerId,
    /// Whole seconds until the event's minute begins.
    pub seconds_remaining: u32,
}

/// Returns the seconds from `now` until the next occurrence of `target`.
///
/// If `target`'s minute is strictly later than the current minute the
/// occurrence is today; otherwise it is tomorrow, and the result is the
/// seconds left today plus the seconds from midnight to `target`.
pub fn seconds_until(target: MinuteOfDay, now: TimeOfDay) -> u32 {
    if target > now.minute {
        target.as_seconds() - now.seconds_since_midnight()
    } else {
        now.seconds_until_midnight() + target.as_seconds()
    }
}

/// Finds the next upcoming event.
///
/// An event whose minute equals the current minute counts as already
/// passed. After Isha the next event is the following day's Fajr.
pub fn find_next(schedule: &DaySchedule, now: TimeOfDay) -> CountdownTarget {
    let next = schedule
        .iter()
        .find(|event| event.time > now.minute)
        .copied()
        .unwrap_or_else(|| schedule.first());

    CountdownTarget {
        event: next.id,
        seconds_remaining: seconds_until(next.time, now),
    }
}
