//! Background refresh scheduler.
//!
//! Periodically runs a sync function (normally [`Dashboard::sync`]) with:
//! - A fixed check interval, short enough to notice midnight promptly
//! - Exponential backoff while the sync keeps failing
//! - Manual refresh, pause, resume and stop commands
//!
//! A failing sync never stops the loop; the dashboard simply stays in
//! degraded mode until a later attempt succeeds.
//!
//! [`Dashboard::sync`]: crate::Dashboard::sync

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dashboard::Dashboard;
use crate::error::{DashboardError, DashboardResult};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between syncs while healthy.
    pub check_interval: Duration,
    /// Initial backoff duration on error.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub backoff_multiplier: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            initial_backoff: Duration::from_secs(30),
            max_backoff: Duration::from_secs(30 * 60),
            backoff_multiplier: 2.0,
        }
    }
}

impl SchedulerConfig {
    /// Creates a new scheduler config with the given check interval.
    pub fn new(check_interval: Duration) -> Self {
        Self {
            check_interval,
            ..Default::default()
        }
    }

    /// Builder: set backoff parameters.
    pub fn with_backoff(mut self, initial: Duration, max: Duration, multiplier: f64) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self.backoff_multiplier = multiplier;
        self
    }

    /// Builder: raise the initial backoff to at least `delay`.
    ///
    /// The cap is raised with it so the first retry is never shortened.
    pub fn with_min_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = self.initial_backoff.max(delay);
        self.max_backoff = self.max_backoff.max(self.initial_backoff);
        self
    }

    /// Calculates backoff delay based on consecutive failures.
    pub fn backoff_delay(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return Duration::ZERO;
        }

        let base = self.initial_backoff.as_secs_f64();
        let multiplier = self
            .backoff_multiplier
            .powi(consecutive_failures.saturating_sub(1).min(i32::MAX as u32) as i32);
        let delay = base * multiplier;
        let max = self.max_backoff.as_secs_f64();

        Duration::from_secs_f64(delay.min(max))
    }
}

/// Commands that can be sent to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Sync immediately.
    RefreshNow,
    /// Stop syncing until resumed.
    Pause,
    Resume,
    Stop,
}

/// Scheduler state.
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    pub paused: bool,
    /// Number of consecutive sync failures.
    pub consecutive_failures: u32,
    /// Last successful sync time.
    pub last_sync: Option<DateTime<Utc>>,
    /// Last sync attempt time.
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl SchedulerState {
    /// Records a successful sync.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.last_sync = Some(Utc::now());
        self.last_attempt = self.last_sync;
        self.last_error = None;
    }

    /// Records a failed sync.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_attempt = Some(Utc::now());
        self.last_error = Some(error.into());
    }
}

/// Shared scheduler state.
pub type SharedSchedulerState = Arc<RwLock<SchedulerState>>;

/// Runs a sync function on a schedule.
pub struct Scheduler {
    config: SchedulerConfig,
    state: SharedSchedulerState,
    command_tx: mpsc::Sender<SchedulerCommand>,
    command_rx: Option<mpsc::Receiver<SchedulerCommand>>,
}

impl Scheduler {
    /// Creates a new scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        Self {
            config,
            state: Arc::new(RwLock::new(SchedulerState::default())),
            command_tx,
            command_rx: Some(command_rx),
        }
    }

    /// Returns a handle for sending commands to the scheduler.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            command_tx: self.command_tx.clone(),
            state: self.state.clone(),
        }
    }

    /// Spawns a scheduler that keeps `dashboard` current.
    ///
    /// Retries never come sooner than the dashboard's source asks for.
    pub fn spawn_for(mut self, dashboard: Arc<Dashboard>) -> (SchedulerHandle, JoinHandle<()>) {
        let retry_delay = dashboard.resolver().retry_delay();
        self.config = self.config.with_min_backoff(retry_delay);
        debug!(
            source = dashboard.resolver().source_name(),
            initial_backoff_secs = self.config.initial_backoff.as_secs(),
            "Scheduler backoff seeded from source"
        );

        let handle = self.handle();
        let task = tokio::spawn(self.run(move || {
            let dashboard = dashboard.clone();
            async move { dashboard.sync().await }
        }));
        (handle, task)
    }

    /// Runs the scheduler loop with the given sync function.
    ///
    /// The first sync happens one interval after start; the caller is
    /// expected to have made the initial selection itself.
    pub async fn run<F, Fut>(mut self, sync_fn: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send,
    {
        let Some(mut command_rx) = self.command_rx.take() else {
            return;
        };

        info!(
            interval_secs = self.config.check_interval.as_secs(),
            "Scheduler started"
        );

        loop {
            let delay = self.next_delay().await;
            debug!(delay_secs = delay.as_secs(), "Scheduling next sync");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if self.state.read().await.paused {
                        debug!("Scheduler paused, skipping sync");
                        continue;
                    }
                    self.do_sync(&sync_fn).await;
                }
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(SchedulerCommand::RefreshNow) => {
                            debug!("Received RefreshNow command");
                            self.do_sync(&sync_fn).await;
                        }
                        Some(SchedulerCommand::Pause) => {
                            info!("Scheduler paused");
                            self.state.write().await.paused = true;
                        }
                        Some(SchedulerCommand::Resume) => {
                            info!("Scheduler resumed");
                            self.state.write().await.paused = false;
                        }
                        Some(SchedulerCommand::Stop) | None => {
                            info!("Scheduler stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn next_delay(&self) -> Duration {
        let state = self.state.read().await;
        if state.consecutive_failures > 0 {
            let backoff = self.config.backoff_delay(state.consecutive_failures);
            debug!(
                failures = state.consecutive_failures,
                backoff_secs = backoff.as_secs(),
                "Using backoff delay"
            );
            return backoff;
        }
        self.config.check_interval
    }

    async fn do_sync<F, Fut>(&self, sync_fn: &F)
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<(), String>>,
    {
        match sync_fn().await {
            Ok(()) => {
                debug!("Sync completed");
                self.state.write().await.record_success();
            }
            Err(e) => {
                warn!(error = %e, "Sync failed");
                self.state.write().await.record_failure(e);
            }
        }
    }
}

/// Handle for sending commands to a running scheduler.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    command_tx: mpsc::Sender<SchedulerCommand>,
    state: SharedSchedulerState,
}

impl SchedulerHandle {
    async fn send(&self, cmd: SchedulerCommand) -> DashboardResult<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| DashboardError::SchedulerStopped)
    }

    /// Triggers an immediate sync.
    pub async fn refresh_now(&self) -> DashboardResult<()> {
        self.send(SchedulerCommand::RefreshNow).await
    }

    pub async fn pause(&self) -> DashboardResult<()> {
        self.send(SchedulerCommand::Pause).await
    }

    pub async fn resume(&self) -> DashboardResult<()> {
        self.send(SchedulerCommand::Resume).await
    }

    pub async fn stop(&self) -> DashboardResult<()> {
        self.send(SchedulerCommand::Stop).await
    }

    /// Returns a copy of the current scheduler state.
    pub async fn state(&self) -> SchedulerState {
        self.state.read().await.clone()
    }

    pub async fn is_paused(&self) -> bool {
        self.state.read().await.paused
    }
}
