//! Aladhan prayer-times API source.
//!
//! Fetches one day of timings per request from
//! `GET {base}/timings/{DD-MM-YYYY}?latitude=..&longitude=..&method=..`.
//! The response clock strings carry a zone suffix (`"04:32 (EET)"`), which
//! [`crate::normalize`] strips.
//!
//! # Example
//!
//! ```ignore
//! use miqat_providers::aladhan::{AladhanConfig, AladhanSource};
//!
//! let source = AladhanSource::new(AladhanConfig::default())?;
//! let raw = source.fetch_day(ScheduleRequest::new(date, location)).await?;
//! ```

mod config;
mod source;

pub use config::AladhanConfig;
pub use source::AladhanSource;
