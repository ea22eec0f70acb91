//! The six daily prayer-time markers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::MinuteOfDay;

/// One of the six canonical daily prayer-time markers, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrayerId {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerId {
    /// All markers in canonical (chronological) order.
    pub const ALL: [PrayerId; 6] = [
        PrayerId::Fajr,
        PrayerId::Sunrise,
        PrayerId::Dhuhr,
        PrayerId::Asr,
        PrayerId::Maghrib,
        PrayerId::Isha,
    ];

    /// Returns the position of this marker in canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the canonical name, which is also the provider's field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Sunrise => "Sunrise",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }

    /// Returns the name shown to the user in the given language.
    pub fn display_name(self, language: DisplayLanguage) -> &'static str {
        match language {
            DisplayLanguage::English => match self {
                Self::Fajr => "Dawn",
                Self::Sunrise => "Sunrise",
                Self::Dhuhr => "Noon",
                Self::Asr => "Afternoon",
                Self::Maghrib => "Sunset",
                Self::Isha => "Night",
            },
            DisplayLanguage::Transliterated => self.as_str(),
            DisplayLanguage::Arabic => match self {
                Self::Fajr => "الفجر",
                Self::Sunrise => "الشروق",
                Self::Dhuhr => "الظهر",
                Self::Asr => "العصر",
                Self::Maghrib => "المغرب",
                Self::Isha => "العشاء",
            },
        }
    }
}

impl fmt::Display for PrayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language used for user-facing prayer names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayLanguage {
    /// English descriptions ("Dawn", "Sunset", ...).
    English,
    /// Latin transliteration of the Arabic names ("Fajr", "Maghrib", ...).
    #[default]
    Transliterated,
    /// Arabic script.
    Arabic,
}

/// A single marker in a day's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrayerEvent {
    /// Which marker this is.
    pub id: PrayerId,
    /// Local clock time of the marker.
    pub time: MinuteOfDay,
}

impl PrayerEvent {
    /// Creates a new event.
    pub fn new(id: PrayerId, time: MinuteOfDay) -> Self {
        Self { id, time }
    }
}
