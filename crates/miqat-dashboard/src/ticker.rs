//! The per-view countdown ticker.
//!
//! A [`CountdownTicker`] owns one background task that wakes on a fixed
//! period, reads the [`Clock`], recomputes the next event and fast boundary,
//! and publishes a [`TickSnapshot`] on a watch channel. Dropping or stopping
//! the ticker ends the task, so a ticker never outlives its owner.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::NaiveDateTime;
use miqat_core::{
    Clock, Countdown, CountdownTarget, DaySchedule, EventSwitcher, FastBoundaryState, TimeOfDay,
    find_next,
};
use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Everything derived from one clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickSnapshot {
    /// The clock reading this snapshot was computed from.
    pub at: NaiveDateTime,
    pub target: CountdownTarget,
    pub countdown: Countdown,
    pub fast: FastBoundaryState,
}

impl TickSnapshot {
    /// Computes the snapshot for `schedule` at `at`.
    pub fn compute(schedule: &DaySchedule, at: NaiveDateTime) -> Self {
        let now = TimeOfDay::from(at.time());
        let target = find_next(schedule, now);
        Self {
            at,
            target,
            countdown: Countdown::from_seconds(target.seconds_remaining),
            fast: FastBoundaryState::at(schedule, now),
        }
    }
}

/// Sender side shared between a dashboard and its current ticker.
pub type SnapshotSender = Arc<watch::Sender<Option<TickSnapshot>>>;

/// Handle to a running ticker task.
#[derive(Debug)]
pub struct CountdownTicker {
    handle: JoinHandle<()>,
    stop_tx: Option<oneshot::Sender<()>>,
    stopped: Arc<AtomicBool>,
}

impl CountdownTicker {
    /// Spawns a ticker for `schedule`.
    ///
    /// The first snapshot is published immediately. If the task falls
    /// behind, missed ticks are skipped rather than replayed.
    pub fn start(
        schedule: DaySchedule,
        clock: Arc<dyn Clock>,
        period: Duration,
        publish: SnapshotSender,
    ) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(run(
            schedule,
            clock,
            period,
            publish,
            stopped.clone(),
            stop_rx,
        ));
        debug!(period_ms = period.as_millis() as u64, "Countdown ticker started");
        Self {
            handle,
            stop_tx: Some(stop_tx),
            stopped,
        }
    }

    /// Stops the ticker. No snapshot is published after this returns, even
    /// by a tick that was already running on another worker.
    pub fn stop(self) {
        drop(self);
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        self.handle.abort();
    }
}

async fn run(
    schedule: DaySchedule,
    clock: Arc<dyn Clock>,
    period: Duration,
    publish: SnapshotSender,
    stopped: Arc<AtomicBool>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut switcher = EventSwitcher::new(schedule, clock.time_of_day());
    let mut last_event = None;

    loop {
        tokio::select! {
            _ = &mut stop_rx => {
                debug!("Countdown ticker stopped");
                break;
            }
            _ = interval.tick() => {
                let snapshot = TickSnapshot::compute(&schedule, clock.now());

                if last_event != Some(snapshot.target.event) {
                    info!(event = %snapshot.target.event, "Next event changed");
                    last_event = Some(snapshot.target.event);
                }
                if let Some(transition) = switcher.update(TimeOfDay::from(snapshot.at.time())) {
                    info!(
                        from = %transition.from,
                        to = %transition.to,
                        "Fast boundary changed"
                    );
                }

                // The flag is checked under the channel lock, so a stop that
                // lands mid-tick still wins over this publish.
                publish.send_if_modified(|current| {
                    if stopped.load(Ordering::SeqCst) {
                        return false;
                    }
                    *current = Some(snapshot);
                    true
                });
            }
        }
    }
}
