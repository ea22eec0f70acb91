//! The per-view dashboard.
//!
//! A [`Dashboard`] holds the current (date, location) selection, the schedule
//! resolved for it, and the ticker counting down against that schedule. The
//! presentation layer reads everything through getters or subscribes to tick
//! snapshots; it never touches the resolver or ticker directly.

use std::sync::Arc;

use chrono::NaiveDate;
use miqat_core::{
    Clock, CountdownTarget, FastBoundaryState, FormattedCountdown, LocationConfig, ScheduleEntry,
    ScheduleKey,
};
use miqat_providers::ScheduleSource;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::error::DashboardResult;
use crate::resolver::{Resolution, ResolvedSchedule, ScheduleResolver, Ticket};
use crate::ticker::{CountdownTicker, SnapshotSender, TickSnapshot};

#[derive(Debug, Default)]
struct ViewState {
    selection: Option<ScheduleKey>,
    /// Move the selection to the clock's date when the day rolls over.
    follow_today: bool,
    resolved: Option<ResolvedSchedule>,
    ticker: Option<CountdownTicker>,
}

/// One view's schedule, countdown and fast boundary.
pub struct Dashboard {
    config: DashboardConfig,
    resolver: ScheduleResolver,
    clock: Arc<dyn Clock>,
    state: RwLock<ViewState>,
    snapshots: SnapshotSender,
}

impl Dashboard {
    /// Creates a dashboard with nothing selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: DashboardConfig,
        source: Arc<dyn ScheduleSource>,
        clock: Arc<dyn Clock>,
    ) -> DashboardResult<Self> {
        config.validate()?;
        let fallback = config.fallback.to_schedule()?;
        let resolver = ScheduleResolver::new(source, fallback, config.cache_ttl);
        let (tx, _) = watch::channel(None);

        Ok(Self {
            config,
            resolver,
            clock,
            state: RwLock::new(ViewState::default()),
            snapshots: Arc::new(tx),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn resolver(&self) -> &ScheduleResolver {
        &self.resolver
    }

    /// Selects a new (date, location) pair and resolves its schedule.
    ///
    /// The running ticker is stopped first, so nothing is displayed against
    /// the old schedule while the new one is being fetched. Returns `false`
    /// if a later selection or a teardown superseded this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is invalid.
    pub async fn select(&self, date: NaiveDate, location: LocationConfig) -> DashboardResult<bool> {
        self.select_key(ScheduleKey::new(date, location), false).await
    }

    /// Selects today's date, as read from the clock, for `location`.
    ///
    /// Unlike [`select`](Self::select), the selection then follows the clock:
    /// [`sync`](Self::sync) moves it to the new date after midnight.
    pub async fn select_today(&self, location: LocationConfig) -> DashboardResult<bool> {
        self.select_key(ScheduleKey::new(self.clock.today(), location), true)
            .await
    }

    async fn select_key(&self, key: ScheduleKey, follow_today: bool) -> DashboardResult<bool> {
        key.location.validate()?;

        let ticket = {
            let mut state = self.state.write().await;
            if let Some(ticker) = state.ticker.take() {
                ticker.stop();
            }
            state.resolved = None;
            state.selection = Some(key.clone());
            state.follow_today = follow_today;
            self.snapshots.send_replace(None);
            self.resolver.begin(key)
        };

        info!(
            source = self.resolver.source_name(),
            date = %ticket.key().date,
            location = %ticket.key().location.name,
            "Selection changed"
        );
        Ok(self.finish(ticket).await)
    }

    /// Re-resolves the current selection.
    ///
    /// The cached schedule is evicted so the source is asked again. Unlike
    /// [`select`](Self::select), the current schedule and ticker stay live
    /// until the new result arrives. Returns `false` if nothing is selected
    /// or the refresh was superseded.
    pub async fn refresh(&self) -> bool {
        let ticket = {
            let state = self.state.read().await;
            match state.selection.clone() {
                Some(key) => {
                    self.resolver.evict(&key);
                    self.resolver.begin(key)
                }
                None => return false,
            }
        };
        debug!(key = %ticket.key().cache_key(), "Refreshing schedule");
        self.finish(ticket).await
    }

    /// Clears the selection and stops the ticker.
    ///
    /// Any resolution still in flight becomes stale and will be discarded.
    pub async fn teardown(&self) {
        let mut state = self.state.write().await;
        self.resolver.invalidate();
        if let Some(ticker) = state.ticker.take() {
            ticker.stop();
        }
        state.selection = None;
        state.follow_today = false;
        state.resolved = None;
        self.snapshots.send_replace(None);
        debug!("Dashboard torn down");
    }

    /// Keeps the selection current.
    ///
    /// Drops expired cache entries, moves a today-following selection to the
    /// new date after midnight and retries the source while degraded. Meant
    /// to be driven by the [`Scheduler`](crate::Scheduler).
    ///
    /// # Errors
    ///
    /// Returns the reason the fallback is in use while still degraded.
    pub async fn sync(&self) -> Result<(), String> {
        let purged = self.resolver.purge_expired();
        if purged > 0 {
            debug!(
                purged,
                remaining = self.resolver.cached_len(),
                "Purged expired schedules"
            );
        }

        let (key, follow_today) = {
            let state = self.state.read().await;
            match &state.selection {
                Some(key) => (key.clone(), state.follow_today),
                None => return Ok(()),
            }
        };

        let today = self.clock.today();
        if follow_today && key.date != today {
            info!(from = %key.date, to = %today, "Day rolled over");
            self.select_key(ScheduleKey::new(today, key.location), true)
                .await
                .map_err(|e| e.to_string())?;
        } else if self.is_degraded().await {
            debug!("Retrying source while degraded");
            self.refresh().await;
        }

        match self.resolved().await {
            Some(resolved) if resolved.is_degraded() => Err(resolved
                .error
                .unwrap_or_else(|| "using fallback times".to_string())),
            _ => Ok(()),
        }
    }

    async fn finish(&self, ticket: Ticket) -> bool {
        match self.resolver.complete(ticket).await {
            Resolution::Applied {
                generation,
                resolved,
            } => self.apply(generation, resolved).await,
            Resolution::Stale { .. } => false,
        }
    }

    async fn apply(&self, generation: u64, resolved: ResolvedSchedule) -> bool {
        let mut state = self.state.write().await;

        // A newer resolution may have begun while waiting for the lock.
        if !self.resolver.is_current(generation) || state.selection.as_ref() != Some(&resolved.key)
        {
            debug!(generation, "Resolution superseded before apply");
            return false;
        }

        if let Some(ticker) = state.ticker.take() {
            ticker.stop();
        }
        state.ticker = Some(CountdownTicker::start(
            resolved.schedule,
            self.clock.clone(),
            self.config.tick_interval,
            self.snapshots.clone(),
        ));
        self.snapshots.send_replace(Some(TickSnapshot::compute(
            &resolved.schedule,
            self.clock.now(),
        )));
        state.resolved = Some(resolved);
        true
    }

    /// Returns the current selection, if any.
    pub async fn selection(&self) -> Option<ScheduleKey> {
        self.state.read().await.selection.clone()
    }

    /// Returns the applied schedule with its origin.
    pub async fn resolved(&self) -> Option<ResolvedSchedule> {
        self.state.read().await.resolved.clone()
    }

    /// Returns the ordered display entries of the applied schedule.
    pub async fn schedule(&self) -> Option<Vec<ScheduleEntry>> {
        self.state
            .read()
            .await
            .resolved
            .as_ref()
            .map(|r| r.schedule.entries(self.config.language))
    }

    /// Returns true if the applied schedule is the fallback.
    pub async fn is_degraded(&self) -> bool {
        self.state
            .read()
            .await
            .resolved
            .as_ref()
            .is_some_and(ResolvedSchedule::is_degraded)
    }

    /// Returns the latest tick snapshot.
    pub fn snapshot(&self) -> Option<TickSnapshot> {
        *self.snapshots.borrow()
    }

    /// Returns the event being counted down to.
    pub fn next_event(&self) -> Option<CountdownTarget> {
        self.snapshot().map(|s| s.target)
    }

    /// Returns the zero-padded countdown to the next event.
    pub fn formatted_countdown(&self) -> Option<FormattedCountdown> {
        self.snapshot().map(|s| s.countdown.padded())
    }

    /// Returns the current Iftar/Suhoor boundary.
    pub fn fast_boundary_state(&self) -> Option<FastBoundaryState> {
        self.snapshot().map(|s| s.fast)
    }

    /// Subscribes to tick snapshots. `None` means nothing is being counted.
    pub fn subscribe(&self) -> watch::Receiver<Option<TickSnapshot>> {
        self.snapshots.subscribe()
    }
}
