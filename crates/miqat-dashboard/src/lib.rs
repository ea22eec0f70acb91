//! Per-view runtime for the miqat prayer-time dashboard.
//!
//! This crate wires a [`ScheduleSource`](miqat_providers::ScheduleSource) to
//! the pure arithmetic in `miqat-core`:
//!
//! - [`ScheduleResolver`]: cache, fetch, fallback to configured times, and
//!   the generation guard that discards stale responses
//! - [`CountdownTicker`]: a periodic task publishing [`TickSnapshot`]s
//! - [`Dashboard`]: the selection plus everything derived from it
//! - [`Scheduler`]: background refresh across midnight and out of degraded
//!   mode

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod resolver;
pub mod scheduler;
pub mod ticker;

pub use cache::{CacheEntry, ScheduleCache};
pub use config::{DashboardConfig, FallbackTimes};
pub use dashboard::Dashboard;
pub use error::{DashboardError, DashboardResult};
pub use resolver::{Resolution, ResolvedSchedule, ScheduleOrigin, ScheduleResolver, Ticket};
pub use scheduler::{Scheduler, SchedulerCommand, SchedulerConfig, SchedulerHandle, SchedulerState};
pub use ticker::{CountdownTicker, SnapshotSender, TickSnapshot};
