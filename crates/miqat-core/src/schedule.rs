//! The validated, ordered schedule for one day.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::prayer::{DisplayLanguage, PrayerEvent, PrayerId};
use crate::time::MinuteOfDay;

/// Exactly six prayer events, one per [`PrayerId`], in canonical order and
/// strictly ascending by time.
///
/// A schedule is never edited in place; a refetch replaces it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[PrayerEvent; 6]", into = "[PrayerEvent; 6]")]
pub struct DaySchedule {
    events: [PrayerEvent; 6],
}

impl DaySchedule {
    /// Builds a schedule, checking canonical order and strict ascent.
    pub fn new(events: [PrayerEvent; 6]) -> Result<Self, ScheduleError> {
        for (position, (event, expected)) in events.iter().zip(PrayerId::ALL).enumerate() {
            if event.id != expected {
                return Err(ScheduleError::OutOfOrder {
                    position,
                    expected,
                    found: event.id,
                });
            }
        }

        for pair in events.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(ScheduleError::NotAscending {
                    previous: pair[0].id,
                    previous_time: pair[0].time,
                    next: pair[1].id,
                    next_time: pair[1].time,
                });
            }
        }

        Ok(Self { events })
    }

    /// Builds a schedule from six times given in canonical order.
    pub fn from_times(times: [MinuteOfDay; 6]) -> Result<Self, ScheduleError> {
        let mut events = [PrayerEvent::new(PrayerId::Fajr, MinuteOfDay::MIDNIGHT); 6];
        for ((slot, id), time) in events.iter_mut().zip(PrayerId::ALL).zip(times) {
            *slot = PrayerEvent::new(id, time);
        }
        Self::new(events)
    }

    /// Returns the time of the given marker.
    pub fn get(&self, id: PrayerId) -> MinuteOfDay {
        self.events[id.index()].time
    }

    /// Returns the earliest event of the day (Fajr).
    pub fn first(&self) -> PrayerEvent {
        self.events[0]
    }

    /// Returns the latest event of the day (Isha).
    pub fn last(&self) -> PrayerEvent {
        self.events[5]
    }

    /// Returns the events in ascending time order.
    pub fn events(&self) -> &[PrayerEvent; 6] {
        &self.events
    }

    /// Iterates the events in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = &PrayerEvent> {
        self.events.iter()
    }

    /// Returns the presentation rows for this schedule.
    pub fn entries(&self, language: DisplayLanguage) -> Vec<ScheduleEntry> {
        self.events
            .iter()
            .map(|event| ScheduleEntry {
                id: event.id,
                display_name: event.id.display_name(language).to_string(),
                time: event.time.to_string(),
            })
            .collect()
    }
}

impl TryFrom<[PrayerEvent; 6]> for DaySchedule {
    type Error = ScheduleError;

    fn try_from(events: [PrayerEvent; 6]) -> Result<Self, Self::Error> {
        Self::new(events)
    }
}

impl From<DaySchedule> for [PrayerEvent; 6] {
    fn from(schedule: DaySchedule) -> Self {
        schedule.events
    }
}

/// One presentation row of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: PrayerId,
    pub display_name: String,
    /// Local clock time, `HH:MM`.
    pub time: String,
}
