//! Text and JSON rendering of schedules and countdowns.

use chrono::NaiveDate;
use miqat_core::{
    DisplayLanguage, FastPhase, FormattedCountdown, MinuteOfDay, PrayerId, ScheduleEntry,
};
use miqat_dashboard::{ResolvedSchedule, ScheduleOrigin, TickSnapshot};
use serde::Serialize;

use crate::error::ClientResult;

/// Warning line printed above text output in degraded mode.
pub const DEGRADED_WARNING: &str = "⚠ using fallback times";

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tty,
    Json,
}

#[derive(Debug, Serialize)]
struct Header<'a> {
    location: &'a str,
    date: NaiveDate,
    origin: ScheduleOrigin,
    degraded: bool,
}

impl<'a> Header<'a> {
    fn new(resolved: &'a ResolvedSchedule) -> Self {
        Self {
            location: &resolved.key.location.name,
            date: resolved.key.date,
            origin: resolved.origin,
            degraded: resolved.is_degraded(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScheduleReport<'a> {
    #[serde(flatten)]
    header: Header<'a>,
    next: Option<PrayerId>,
    events: Vec<ScheduleEntry>,
}

#[derive(Debug, Serialize)]
struct NextReport<'a> {
    #[serde(flatten)]
    header: Header<'a>,
    event: PrayerId,
    name: &'static str,
    time: MinuteOfDay,
    seconds_remaining: u32,
    countdown: FormattedCountdown,
}

#[derive(Debug, Serialize)]
struct FastReport<'a> {
    #[serde(flatten)]
    header: Header<'a>,
    phase: FastPhase,
    time: MinuteOfDay,
    seconds_remaining: u32,
    countdown: FormattedCountdown,
}

fn with_warning(resolved: &ResolvedSchedule, body: String) -> String {
    if resolved.is_degraded() {
        format!("{}\n{}", DEGRADED_WARNING, body)
    } else {
        body
    }
}

fn boundary_time(resolved: &ResolvedSchedule, phase: FastPhase) -> MinuteOfDay {
    match phase {
        FastPhase::Iftar => resolved.schedule.get(PrayerId::Maghrib),
        FastPhase::Suhoor => resolved.schedule.get(PrayerId::Fajr),
    }
}

/// Renders the day's schedule, marking the next event.
pub fn schedule(
    resolved: &ResolvedSchedule,
    language: DisplayLanguage,
    next: Option<PrayerId>,
    format: OutputFormat,
) -> ClientResult<String> {
    let events = resolved.schedule.entries(language);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ScheduleReport {
            header: Header::new(resolved),
            next,
            events,
        })?),
        OutputFormat::Tty => {
            let mut lines = vec![format!(
                "{} · {}",
                resolved.key.location.name, resolved.key.date
            )];
            lines.extend(events.iter().map(|entry| {
                let marker = if Some(entry.id) == next { "▸" } else { " " };
                format!("{} {:<10} {}", marker, entry.display_name, entry.time)
            }));
            Ok(with_warning(resolved, lines.join("\n")))
        }
    }
}

/// Renders the next event and the countdown to it.
pub fn next_event(
    resolved: &ResolvedSchedule,
    snapshot: &TickSnapshot,
    language: DisplayLanguage,
    format: OutputFormat,
) -> ClientResult<String> {
    let event = snapshot.target.event;
    let time = resolved.schedule.get(event);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&NextReport {
            header: Header::new(resolved),
            event,
            name: event.display_name(language),
            time,
            seconds_remaining: snapshot.target.seconds_remaining,
            countdown: snapshot.countdown.padded(),
        })?),
        OutputFormat::Tty => Ok(with_warning(
            resolved,
            format!(
                "{} at {}, in {}",
                event.display_name(language),
                time,
                snapshot.countdown
            ),
        )),
    }
}

/// Renders the Iftar/Suhoor countdown.
pub fn fast(
    resolved: &ResolvedSchedule,
    snapshot: &TickSnapshot,
    format: OutputFormat,
) -> ClientResult<String> {
    let phase = snapshot.fast.phase();
    let time = boundary_time(resolved, phase);
    let countdown = miqat_core::Countdown::from_seconds(snapshot.fast.seconds_remaining());

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&FastReport {
            header: Header::new(resolved),
            phase,
            time,
            seconds_remaining: snapshot.fast.seconds_remaining(),
            countdown: countdown.padded(),
        })?),
        OutputFormat::Tty => Ok(with_warning(
            resolved,
            format!("{} at {}, in {}", phase, time, countdown),
        )),
    }
}

/// Renders one line of the live countdown.
pub fn watch_line(
    snapshot: &TickSnapshot,
    language: DisplayLanguage,
    format: OutputFormat,
) -> ClientResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(snapshot)?),
        OutputFormat::Tty => Ok(format!(
            "{} in {} · {} in {}",
            snapshot.target.event.display_name(language),
            snapshot.countdown,
            snapshot.fast.phase(),
            miqat_core::Countdown::from_seconds(snapshot.fast.seconds_remaining()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use miqat_core::{DaySchedule, LocationConfig, ScheduleKey};

    fn resolved(origin: ScheduleOrigin) -> ResolvedSchedule {
        let t = |s: &str| s.parse::<MinuteOfDay>().unwrap();
        ResolvedSchedule {
            key: ScheduleKey::new(
                NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
                LocationConfig::new("Cairo", 30.0444, 31.2357, 5),
            ),
            schedule: DaySchedule::from_times([
                t("04:32"),
                t("06:01"),
                t("11:57"),
                t("15:13"),
                t("17:53"),
                t("19:11"),
            ])
            .unwrap(),
            origin,
            error: None,
        }
    }

    fn snapshot_at(resolved: &ResolvedSchedule, h: u32, m: u32, s: u32) -> TickSnapshot {
        let at: NaiveDateTime = resolved.key.date.and_hms_opt(h, m, s).unwrap();
        TickSnapshot::compute(&resolved.schedule, at)
    }

    #[test]
    fn schedule_table() {
        let resolved = resolved(ScheduleOrigin::Live);
        let out = schedule(
            &resolved,
            DisplayLanguage::Transliterated,
            Some(PrayerId::Maghrib),
            OutputFormat::Tty,
        )
        .unwrap();
        insta::assert_snapshot!(out, @r"
        Cairo · 2025-03-07
          Fajr       04:32
          Sunrise    06:01
          Dhuhr      11:57
          Asr        15:13
        ▸ Maghrib    17:53
          Isha       19:11
        ");
    }

    #[test]
    fn degraded_table_has_warning() {
        let resolved = resolved(ScheduleOrigin::Fallback);
        let out = schedule(&resolved, DisplayLanguage::English, None, OutputFormat::Tty).unwrap();
        insta::assert_snapshot!(out, @r"
        ⚠ using fallback times
        Cairo · 2025-03-07
          Dawn       04:32
          Sunrise    06:01
          Noon       11:57
          Afternoon  15:13
          Sunset     17:53
          Night      19:11
        ");
    }

    #[test]
    fn schedule_json() {
        let resolved = resolved(ScheduleOrigin::Cached);
        let out = schedule(
            &resolved,
            DisplayLanguage::Transliterated,
            Some(PrayerId::Fajr),
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["location"], "Cairo");
        assert_eq!(value["date"], "2025-03-07");
        assert_eq!(value["origin"], "cached");
        assert_eq!(value["degraded"], false);
        assert_eq!(value["next"], "Fajr");
        assert_eq!(value["events"].as_array().unwrap().len(), 6);
        assert_eq!(value["events"][4]["time"], "17:53");
    }

    #[test]
    fn next_after_isha() {
        let resolved = resolved(ScheduleOrigin::Live);
        let snap = snapshot_at(&resolved, 23, 45, 0);
        let out = next_event(&resolved, &snap, DisplayLanguage::Transliterated, OutputFormat::Tty)
            .unwrap();
        insta::assert_snapshot!(out, @"Fajr at 04:32, in 04:47:00");
    }

    #[test]
    fn next_json() {
        let resolved = resolved(ScheduleOrigin::Live);
        let snap = snapshot_at(&resolved, 17, 50, 0);
        let out =
            next_event(&resolved, &snap, DisplayLanguage::Arabic, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["event"], "Maghrib");
        assert_eq!(value["name"], "المغرب");
        assert_eq!(value["time"], "17:53");
        assert_eq!(value["seconds_remaining"], 180);
        assert_eq!(value["countdown"]["minutes"], "03");
    }

    #[test]
    fn fast_countdowns() {
        let resolved = resolved(ScheduleOrigin::Live);
        let before = snapshot_at(&resolved, 12, 0, 0);
        insta::assert_snapshot!(
            fast(&resolved, &before, OutputFormat::Tty).unwrap(),
            @"Iftar at 17:53, in 05:53:00"
        );

        let after = snapshot_at(&resolved, 20, 0, 0);
        insta::assert_snapshot!(
            fast(&resolved, &after, OutputFormat::Tty).unwrap(),
            @"Suhoor at 04:32, in 08:32:00"
        );

        let value: serde_json::Value =
            serde_json::from_str(&fast(&resolved, &after, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(value["phase"], "Suhoor");
        assert_eq!(value["seconds_remaining"], 30_720);
    }

    #[test]
    fn watch_lines() {
        let resolved = resolved(ScheduleOrigin::Live);
        let snap = snapshot_at(&resolved, 17, 52, 30);
        insta::assert_snapshot!(
            watch_line(&snap, DisplayLanguage::Transliterated, OutputFormat::Tty).unwrap(),
            @"Maghrib in 00:00:30 · Iftar in 00:00:30"
        );

        let line = watch_line(&snap, DisplayLanguage::Transliterated, OutputFormat::Json).unwrap();
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["target"]["event"], "Maghrib");
        assert_eq!(value["fast"]["phase"], "AwaitingIftar");
    }
}
