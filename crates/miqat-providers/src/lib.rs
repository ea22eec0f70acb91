//! ScheduleSource trait and implementations.
//!
//! This crate is the boundary between the outside world and the schedule
//! engine:
//!
//! - [`ScheduleSource`] - The trait every prayer-times backend implements
//! - [`RawTimings`] - Provider clock strings, untouched
//! - [`normalize_timings`] - Pipeline from raw strings to a validated schedule
//! - [`ProviderError`] - Error types for source operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │  Aladhan API    │    │  fixed timings  │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          ▼                      ▼
//! ┌─────────────────┐    ┌─────────────────┐
//! │ AladhanSource   │    │  StaticSource   │
//! └────────┬────────┘    └────────┬────────┘
//!          │                      │
//!          │    ScheduleSource    │
//!          └──────────┬───────────┘
//!                     │
//!                     ▼
//!              ┌─────────────┐
//!              │ RawTimings  │
//!              └──────┬──────┘
//!                     │
//!                     ▼ normalize_timings()
//!              ┌──────────────┐
//!              │ DaySchedule  │
//!              └──────────────┘
//! ```

#[cfg(feature = "aladhan")]
pub mod aladhan;
pub mod error;
pub mod normalize;
pub mod raw_timings;
pub mod source;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use normalize::{normalize_timings, parse_clock, strip_zone_suffix};
pub use raw_timings::{RawDayData, RawDayResponse, RawTimings};
pub use source::{BoxFuture, ErrorSource, ScheduleRequest, ScheduleSource, StaticSource};
