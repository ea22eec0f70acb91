//! `watch`: a live countdown that runs until interrupted.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use miqat_dashboard::{Dashboard, Scheduler, SchedulerConfig};
use tracing::debug;

use crate::error::ClientResult;
use crate::output::{self, DEGRADED_WARNING, OutputFormat};

/// Prints a line per tick until `shutdown` completes.
///
/// Text output rewrites one terminal line in place; JSON output emits one
/// object per line. A background scheduler keeps the schedule current across
/// midnight and retries the source while degraded.
pub async fn run<W, S>(
    dashboard: Arc<Dashboard>,
    scheduler: SchedulerConfig,
    format: OutputFormat,
    out: &mut W,
    shutdown: S,
) -> ClientResult<()>
where
    W: Write,
    S: Future<Output = ()>,
{
    let (handle, task) = Scheduler::new(scheduler).spawn_for(dashboard.clone());
    let language = dashboard.config().language;
    let mut rx = dashboard.subscribe();
    let mut warned = false;

    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => break Ok(()),
            changed = rx.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let Some(snapshot) = *rx.borrow_and_update() else {
                    continue;
                };

                let degraded = dashboard.is_degraded().await;
                if format == OutputFormat::Tty && degraded != warned {
                    if degraded {
                        writeln!(out, "\r{}", DEGRADED_WARNING)?;
                    }
                    warned = degraded;
                }

                let line = match output::watch_line(&snapshot, language, format) {
                    Ok(line) => line,
                    Err(e) => break Err(e),
                };
                match format {
                    OutputFormat::Tty => write!(out, "\r{}", line)?,
                    OutputFormat::Json => writeln!(out, "{}", line)?,
                }
                out.flush()?;
            }
        }
    };

    if format == OutputFormat::Tty {
        writeln!(out)?;
    }

    debug!("Stopping live countdown");
    let _ = handle.stop().await;
    let _ = task.await;
    dashboard.teardown().await;
    result
}
