//! RawTimings to DaySchedule conversion pipeline.
//!
//! Provider clock strings arrive decorated with zone annotations such as
//! `"04:32 (EET)"` or `"04:32 +03"`. This is the only place those
//! decorations are handled; the bare `HH:MM` that remains is parsed by
//! [`MinuteOfDay`]'s `FromStr`.
//!
//! The pipeline:
//! 1. Look up each of the six markers (missing → malformed response)
//! 2. Strip the zone suffix and parse (unparsable → parse failure)
//! 3. Build the [`DaySchedule`] (not strictly ascending → malformed response)

use std::sync::LazyLock;

use miqat_core::{DaySchedule, MinuteOfDay, PrayerId};
use regex::Regex;

use crate::error::{ProviderError, ProviderResult};
use crate::raw_timings::RawTimings;

/// A leading clock time followed by an optional zone annotation.
static CLOCK_WITH_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2}:\d{2})(?:\s*\([^)]*\)|\s+[A-Za-z0-9:+\-/_]+)?\s*$")
        .expect("valid clock regex")
});

/// Removes a provider zone annotation from a clock string.
///
/// Returns `None` when the input does not start with something clock-like.
pub fn strip_zone_suffix(raw: &str) -> Option<&str> {
    CLOCK_WITH_SUFFIX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parses one decorated provider clock string.
pub fn parse_clock(raw: &str) -> ProviderResult<MinuteOfDay> {
    let bare = strip_zone_suffix(raw)
        .ok_or_else(|| ProviderError::parse(format!("unrecognised clock string {:?}", raw)))?;
    bare.parse::<MinuteOfDay>()
        .map_err(|e| ProviderError::parse(format!("{:?}: {}", raw, e)).with_source(e))
}

/// Converts raw provider timings into a validated [`DaySchedule`].
pub fn normalize_timings(raw: &RawTimings) -> ProviderResult<DaySchedule> {
    let mut times = [MinuteOfDay::MIDNIGHT; 6];
    for (slot, id) in times.iter_mut().zip(PrayerId::ALL) {
        let value = raw
            .get(id)
            .ok_or_else(|| ProviderError::malformed(format!("missing {} time", id)))?;
        *slot = parse_clock(value)?;
    }

    DaySchedule::from_times(times)
        .map_err(|e| ProviderError::malformed(format!("inconsistent schedule: {}", e)).with_source(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    fn hm(h: u8, m: u8) -> MinuteOfDay {
        MinuteOfDay::from_hm(h, m).unwrap()
    }

    #[test]
    fn strips_known_decorations() {
        assert_eq!(strip_zone_suffix("04:32 (EET)"), Some("04:32"));
        assert_eq!(strip_zone_suffix("04:32(EET)"), Some("04:32"));
        assert_eq!(strip_zone_suffix("04:32 (+03)"), Some("04:32"));
        assert_eq!(strip_zone_suffix("04:32 +03"), Some("04:32"));
        assert_eq!(strip_zone_suffix("04:32 Asia/Riyadh"), Some("04:32"));
        assert_eq!(strip_zone_suffix(" 4:32 "), Some("4:32"));
        assert_eq!(strip_zone_suffix("04:32"), Some("04:32"));
    }

    #[test]
    fn strip_rejects_non_clock_text() {
        assert_eq!(strip_zone_suffix(""), None);
        assert_eq!(strip_zone_suffix("soon"), None);
        assert_eq!(strip_zone_suffix("(EET) 04:32"), None);
        assert_eq!(strip_zone_suffix("04:32 (EET) extra"), None);
    }

    #[test]
    fn parse_clock_reports_parse_failure() {
        assert_eq!(parse_clock("19:11 (EET)").unwrap(), hm(19, 11));

        let err = parse_clock("25:11 (EET)").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ParseFailure);

        let err = parse_clock("n/a").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ParseFailure);
    }

    #[test]
    fn normalizes_decorated_timings() {
        let raw = RawTimings::from_strs([
            "04:32 (EET)",
            "06:01 (EET)",
            "11:57 (EET)",
            "15:13 (EET)",
            "17:53 (EET)",
            "19:11 (EET)",
        ]);
        let schedule = normalize_timings(&raw).unwrap();
        assert_eq!(schedule.get(PrayerId::Fajr), hm(4, 32));
        assert_eq!(schedule.get(PrayerId::Maghrib), hm(17, 53));
        assert_eq!(schedule.get(PrayerId::Isha), hm(19, 11));
    }

    #[test]
    fn missing_field_is_malformed() {
        let mut raw = RawTimings::from_strs(["04:32", "06:01", "11:57", "15:13", "17:53", "19:11"]);
        raw.asr = None;
        let err = normalize_timings(&raw).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::MalformedResponse);
        assert!(err.message().contains("Asr"));
    }

    #[test]
    fn unparsable_field_is_parse_failure() {
        let raw = RawTimings::from_strs(["04:32", "06:01", "noon", "15:13", "17:53", "19:11"]);
        let err = normalize_timings(&raw).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ParseFailure);
    }

    #[test]
    fn non_ascending_is_malformed() {
        let raw = RawTimings::from_strs(["04:32", "06:01", "11:57", "15:13", "17:53", "17:53"]);
        let err = normalize_timings(&raw).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::MalformedResponse);
    }
}
