//! Raw timings as they come from a schedule source.
//!
//! [`RawTimings`] keeps the provider's clock strings untouched, zone
//! decorations included. It is turned into a
//! [`DaySchedule`](miqat_core::DaySchedule) by
//! [`normalize_timings`](crate::normalize_timings).

use miqat_core::PrayerId;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

/// The six clock strings for one day, exactly as the provider sent them.
///
/// Fields are optional so that a missing one is reported as a malformed
/// response instead of a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTimings {
    pub fajr: Option<String>,
    pub sunrise: Option<String>,
    pub dhuhr: Option<String>,
    pub asr: Option<String>,
    pub maghrib: Option<String>,
    pub isha: Option<String>,
}

impl RawTimings {
    /// Builds timings from six strings in canonical order.
    pub fn from_strs(values: [&str; 6]) -> Self {
        let [fajr, sunrise, dhuhr, asr, maghrib, isha] = values.map(|v| Some(v.to_string()));
        Self {
            fajr,
            sunrise,
            dhuhr,
            asr,
            maghrib,
            isha,
        }
    }

    /// Returns the raw string for the given marker.
    pub fn get(&self, id: PrayerId) -> Option<&str> {
        match id {
            PrayerId::Fajr => self.fajr.as_deref(),
            PrayerId::Sunrise => self.sunrise.as_deref(),
            PrayerId::Dhuhr => self.dhuhr.as_deref(),
            PrayerId::Asr => self.asr.as_deref(),
            PrayerId::Maghrib => self.maghrib.as_deref(),
            PrayerId::Isha => self.isha.as_deref(),
        }
    }
}

/// The response envelope of a day-timings request.
///
/// `code` mirrors the HTTP status; anything other than 200 is a failure
/// even when the transport succeeded. On failure `data` holds an error
/// string instead of an object, so it is decoded lazily.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDayResponse {
    pub code: u16,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RawDayResponse {
    /// Checks the status code and extracts the timings.
    pub fn into_timings(self) -> ProviderResult<RawTimings> {
        if self.code != 200 {
            let detail = self.data.as_str().unwrap_or_default();
            let message = format!("status {} {} {}", self.code, self.status, detail);
            return Err(ProviderError::malformed(message.trim_end()));
        }

        serde_json::from_value::<RawDayData>(self.data)
            .map(|data| data.timings)
            .map_err(|e| {
                ProviderError::malformed(format!("unexpected payload: {}", e)).with_source(e)
            })
    }
}

/// The payload part of [`RawDayResponse`].
///
/// The provider also sends date and meta blocks; only timings are used.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDayData {
    pub timings: RawTimings,
}
