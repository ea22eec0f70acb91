//! Dashboard error types.
//!
//! Schedule fetch failures never show up here: the resolver absorbs them
//! into degraded mode. These errors cover bad input and misconfiguration.

use miqat_core::ScheduleError;
use thiserror::Error;

/// Result type for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Errors that can occur in the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Invalid schedule or location data.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The refresh scheduler is no longer running.
    #[error("Scheduler stopped")]
    SchedulerStopped,
}

impl DashboardError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
