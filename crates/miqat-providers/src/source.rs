//! ScheduleSource trait definition.
//!
//! A [`ScheduleSource`] answers one question: what are the six prayer clock
//! times for this date at this place? Implementations return the raw,
//! possibly decorated strings; normalization happens in
//! [`crate::normalize`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use miqat_core::{LocationConfig, ScheduleKey};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_timings::RawTimings;

/// A single day-timings request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRequest {
    pub date: NaiveDate,
    pub location: LocationConfig,
}

impl ScheduleRequest {
    /// Creates a new request.
    pub fn new(date: NaiveDate, location: LocationConfig) -> Self {
        Self { date, location }
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn latitude(&self) -> f64 {
        self.location.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.location.longitude
    }

    pub fn method(&self) -> u8 {
        self.location.calculation_method
    }
}

impl From<ScheduleKey> for ScheduleRequest {
    fn from(key: ScheduleKey) -> Self {
        Self::new(key.date, key.location)
    }
}

/// A boxed future for async trait methods.
///
/// Boxing keeps [`ScheduleSource`] object-safe so the resolver can hold an
/// `Arc<dyn ScheduleSource>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The external provider of daily prayer clock times.
///
/// # Implementation Notes
///
/// - Implementations should be `Send + Sync` for use in async contexts
/// - A non-success status, transport error, or missing field is an error;
///   never return partially filled timings as success
pub trait ScheduleSource: Send + Sync {
    /// Returns the name of this source (e.g., "aladhan", "static").
    fn name(&self) -> &str;

    /// Fetches the raw timings for one (date, location) pair.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, bad status codes, or an
    /// unexpected payload.
    fn fetch_day(&self, request: ScheduleRequest) -> BoxFuture<'_, ProviderResult<RawTimings>>;

    /// Suggested delay before retrying after a failure.
    fn suggested_retry_delay(&self) -> Duration {
        Duration::from_secs(30)
    }
}

/// A source that serves the same timings for every request.
///
/// Used for offline operation and in tests.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    timings: RawTimings,
}

impl StaticSource {
    /// Creates a static source serving the given timings.
    pub fn new(name: impl Into<String>, timings: RawTimings) -> Self {
        Self {
            name: name.into(),
            timings,
        }
    }
}

impl ScheduleSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_day(&self, _request: ScheduleRequest) -> BoxFuture<'_, ProviderResult<RawTimings>> {
        let timings = self.timings.clone();
        Box::pin(async move { Ok(timings) })
    }
}

/// A source that always returns an error.
///
/// Useful for testing degraded mode, or as a placeholder when a source
/// fails to initialize.
#[derive(Debug)]
pub struct ErrorSource {
    name: String,
    error: ProviderError,
}

impl ErrorSource {
    /// Creates a new error source.
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl ScheduleSource for ErrorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_day(&self, _request: ScheduleRequest) -> BoxFuture<'_, ProviderResult<RawTimings>> {
        let error =
            ProviderError::new(self.error.code(), self.error.message()).with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    fn request() -> ScheduleRequest {
        ScheduleRequest::new(
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            LocationConfig::new("Cairo", 30.0444, 31.2357, 5),
        )
    }

    #[test]
    fn request_accessors() {
        let req = request();
        assert_eq!((req.day(), req.month(), req.year()), (7, 3, 2025));
        assert_eq!(req.method(), 5);
        assert!((req.latitude() - 30.0444).abs() < f64::EPSILON);
        assert!((req.longitude() - 31.2357).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn static_source_serves_its_timings() {
        let timings = RawTimings::from_strs(["04:32", "06:01", "11:57", "15:13", "17:53", "19:11"]);
        let source = StaticSource::new("static", timings.clone());
        assert_eq!(source.name(), "static");
        assert_eq!(source.fetch_day(request()).await.unwrap(), timings);
    }

    #[tokio::test]
    async fn error_source_returns_error() {
        let source = ErrorSource::new("offline", ProviderError::network("no route to host"));
        let err = source.fetch_day(request()).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::NetworkFailure);
        assert_eq!(err.provider(), Some("offline"));
        assert_eq!(source.suggested_retry_delay(), Duration::from_secs(30));
    }
}
