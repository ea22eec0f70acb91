//! One-shot commands: `today`, `next`, `fast`.

use miqat_dashboard::{Dashboard, ResolvedSchedule, TickSnapshot};

use crate::error::{ClientError, ClientResult};
use crate::output::{self, OutputFormat};

async fn current(dashboard: &Dashboard) -> ClientResult<(ResolvedSchedule, TickSnapshot)> {
    let resolved = dashboard
        .resolved()
        .await
        .ok_or_else(|| ClientError::Output("no schedule selected".to_string()))?;
    let snapshot = dashboard
        .snapshot()
        .ok_or_else(|| ClientError::Output("countdown not running".to_string()))?;
    Ok((resolved, snapshot))
}

/// Renders the selected day's schedule with the next event marked.
pub async fn today(dashboard: &Dashboard, format: OutputFormat) -> ClientResult<String> {
    let (resolved, snapshot) = current(dashboard).await?;
    output::schedule(
        &resolved,
        dashboard.config().language,
        Some(snapshot.target.event),
        format,
    )
}

/// Renders the next event and its countdown.
pub async fn next(dashboard: &Dashboard, format: OutputFormat) -> ClientResult<String> {
    let (resolved, snapshot) = current(dashboard).await?;
    output::next_event(&resolved, &snapshot, dashboard.config().language, format)
}

/// Renders the Iftar/Suhoor countdown.
pub async fn fast(dashboard: &Dashboard, format: OutputFormat) -> ClientResult<String> {
    let (resolved, snapshot) = current(dashboard).await?;
    output::fast(&resolved, &snapshot, format)
}
