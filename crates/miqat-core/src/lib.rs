//! Core types: prayer schedule, next-event finder, countdown, fast boundary

pub mod countdown;
pub mod error;
pub mod fast;
pub mod finder;
pub mod location;
pub mod prayer;
pub mod schedule;
pub mod time;
pub mod tracing;

pub use countdown::{Countdown, FormattedCountdown};
pub use error::ScheduleError;
pub use fast::{EventSwitcher, FastBoundaryState, FastPhase, FastTransition};
pub use finder::{CountdownTarget, find_next, seconds_until};
pub use location::{LocationConfig, ScheduleKey};
pub use prayer::{DisplayLanguage, PrayerEvent, PrayerId};
pub use schedule::{DaySchedule, ScheduleEntry};
pub use time::{Clock, ManualClock, MinuteOfDay, SECONDS_PER_DAY, SystemClock, TimeOfDay};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
