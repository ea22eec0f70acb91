//! Iftar/Suhoor boundary tracking.
//!
//! A two-state projection of the schedule that only looks at Maghrib and
//! Fajr. Between Maghrib and the next Fajr the fast is over and the next
//! boundary is the start of the following fast (Suhoor ends at Fajr);
//! otherwise the next boundary is Iftar at Maghrib.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::finder::seconds_until;
use crate::prayer::PrayerId;
use crate::schedule::DaySchedule;
use crate::time::TimeOfDay;

/// Which fast boundary is being counted down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FastPhase {
    Iftar,
    Suhoor,
}

impl fmt::Display for FastPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iftar => f.write_str("Iftar"),
            Self::Suhoor => f.write_str("Suhoor"),
        }
    }
}

/// The current fast boundary and the time left until it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase")]
pub enum FastBoundaryState {
    /// Fasting; counting down to Maghrib.
    AwaitingIftar { seconds_remaining: u32 },
    /// Fast broken; counting down to the next Fajr.
    AwaitingSuhoor { seconds_remaining: u32 },
}

impl FastBoundaryState {
    /// Derives the state for the given wall-clock reading.
    ///
    /// From Maghrib's minute until midnight, and from midnight until Fajr's
    /// minute, the state is `AwaitingSuhoor`. The Fajr countdown uses the
    /// same wraparound arithmetic as [`crate::finder::find_next`].
    pub fn at(schedule: &DaySchedule, now: TimeOfDay) -> Self {
        let fajr = schedule.get(PrayerId::Fajr);
        let maghrib = schedule.get(PrayerId::Maghrib);

        if now.minute >= maghrib || now.minute < fajr {
            Self::AwaitingSuhoor {
                seconds_remaining: seconds_until(fajr, now),
            }
        } else {
            Self::AwaitingIftar {
                seconds_remaining: seconds_until(maghrib, now),
            }
        }
    }

    /// Returns the boundary being counted down to.
    pub fn phase(&self) -> FastPhase {
        match self {
            Self::AwaitingIftar { .. } => FastPhase::Iftar,
            Self::AwaitingSuhoor { .. } => FastPhase::Suhoor,
        }
    }

    /// Returns the seconds left until the boundary.
    pub fn seconds_remaining(&self) -> u32 {
        match self {
            Self::AwaitingIftar { seconds_remaining } | Self::AwaitingSuhoor { seconds_remaining } => {
                *seconds_remaining
            }
        }
    }
}

/// A phase change observed by an [`EventSwitcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastTransition {
    pub from: FastPhase,
    pub to: FastPhase,
}

/// Tracks the fast boundary across successive clock readings.
///
/// The state is re-derived on every update; the switcher only remembers the
/// previous phase so it can report transitions. It cycles forever.
#[derive(Debug, Clone)]
pub struct EventSwitcher {
    schedule: DaySchedule,
    state: FastBoundaryState,
}

impl EventSwitcher {
    /// Creates a switcher whose initial state is derived from `now`.
    pub fn new(schedule: DaySchedule, now: TimeOfDay) -> Self {
        let state = FastBoundaryState::at(&schedule, now);
        Self { schedule, state }
    }

    /// Returns the current state.
    pub fn state(&self) -> FastBoundaryState {
        self.state
    }

    /// Re-derives the state and reports a phase change, if any.
    pub fn update(&mut self, now: TimeOfDay) -> Option<FastTransition> {
        let next = FastBoundaryState::at(&self.schedule, now);
        let from = self.state.phase();
        self.state = next;

        (from != next.phase()).then(|| {
            debug!(%from, to = %next.phase(), at = %now, "Fast boundary crossed");
            FastTransition {
                from,
                to: next.phase(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{MinuteOfDay, SECONDS_PER_DAY};

    fn hm(h: u8, m: u8) -> MinuteOfDay {
        MinuteOfDay::from_hm(h, m).unwrap()
    }

    fn at(h: u8, m: u8, s: u8) -> TimeOfDay {
        TimeOfDay::from_hms(h, m, s).unwrap()
    }

    fn schedule() -> DaySchedule {
        DaySchedule::from_times([hm(4, 45), hm(6, 10), hm(12, 15), hm(15, 40), hm(18, 0), hm(19, 30)])
            .unwrap()
    }

    #[test]
    fn daytime_awaits_iftar() {
        let state = FastBoundaryState::at(&schedule(), at(12, 0, 0));
        assert_eq!(
            state,
            FastBoundaryState::AwaitingIftar {
                seconds_remaining: 6 * 3600
            }
        );
    }

    #[test]
    fn maghrib_minute_awaits_suhoor() {
        let state = FastBoundaryState::at(&schedule(), at(18, 0, 0));
        assert_eq!(state.phase(), FastPhase::Suhoor);
        assert_eq!(state.seconds_remaining(), 6 * 3600 + 4 * 3600 + 45 * 60);
    }

    #[test]
    fn after_midnight_still_awaits_suhoor() {
        let state = FastBoundaryState::at(&schedule(), at(2, 0, 0));
        assert_eq!(
            state,
            FastBoundaryState::AwaitingSuhoor {
                seconds_remaining: 2 * 3600 + 45 * 60
            }
        );
    }

    #[test]
    fn fajr_minute_awaits_iftar() {
        let state = FastBoundaryState::at(&schedule(), at(4, 45, 0));
        assert_eq!(state.phase(), FastPhase::Iftar);
        assert_eq!(state.seconds_remaining(), 18 * 3600 - (4 * 3600 + 45 * 60));
    }

    #[test]
    fn switcher_reports_each_transition_once() {
        let schedule = schedule();
        let mut switcher = EventSwitcher::new(schedule, at(17, 59, 58));
        assert_eq!(switcher.update(at(17, 59, 59)), None);
        assert_eq!(
            switcher.update(at(18, 0, 0)),
            Some(FastTransition {
                from: FastPhase::Iftar,
                to: FastPhase::Suhoor
            })
        );
        assert_eq!(switcher.update(at(18, 0, 1)), None);
        assert_eq!(switcher.update(at(0, 0, 0)), None);
        assert_eq!(
            switcher.update(at(4, 45, 0)),
            Some(FastTransition {
                from: FastPhase::Suhoor,
                to: FastPhase::Iftar
            })
        );
    }

    #[test]
    fn full_day_cycles_twice() {
        let schedule = schedule();
        let mut switcher = EventSwitcher::new(schedule, TimeOfDay::from_seconds(0));
        let transitions = (1..SECONDS_PER_DAY)
            .filter_map(|s| switcher.update(TimeOfDay::from_seconds(s)))
            .count();
        assert_eq!(transitions, 2);
    }

    #[test]
    fn serde_is_tagged() {
        let state = FastBoundaryState::AwaitingIftar {
            seconds_remaining: 42,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"phase":"AwaitingIftar","seconds_remaining":42}"#);
    }
}
