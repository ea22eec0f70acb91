//! Location selection and the (date, location) key a schedule is fetched for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A named place plus the calculation convention used for its prayer times.
///
/// Treated as immutable once selected: picking a different place means a new
/// `LocationConfig`, never an edit of the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Human-readable place name.
    pub name: String,
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
    /// Provider code selecting the astronomical convention.
    #[serde(alias = "method")]
    pub calculation_method: u8,
}

impl LocationConfig {
    /// Creates a new location configuration.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, calculation_method: u8) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            calculation_method,
        }
    }

    /// Checks that the coordinates are usable.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::InvalidLocation("name is empty".into()));
        }
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ScheduleError::InvalidLocation(format!(
                "latitude {} out of range",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ScheduleError::InvalidLocation(format!(
                "longitude {} out of range",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// The (date, location) pair a schedule is resolved for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKey {
    pub date: NaiveDate,
    pub location: LocationConfig,
}

impl ScheduleKey {
    /// Creates a new key.
    pub fn new(date: NaiveDate, location: LocationConfig) -> Self {
        Self { date, location }
    }

    /// Returns a stable string identifying this key.
    ///
    /// Coordinates are rounded to four decimals (about 11 m), which is far
    /// finer than any change in prayer times.
    pub fn cache_key(&self) -> String {
        format!(
            "{}@{:.4},{:.4}#{}",
            self.date, self.location.latitude, self.location.longitude, self.location.calculation_method
        )
    }
}
