//! Wiring from CLI flags and config to a live [`Dashboard`].

use std::sync::Arc;

use miqat_core::{Clock, SystemClock};
use miqat_dashboard::Dashboard;
use miqat_providers::ScheduleSource;
use tracing::debug;

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Builds the schedule source described by the config.
#[cfg(feature = "aladhan")]
pub fn schedule_source(config: &ClientConfig) -> ClientResult<Arc<dyn ScheduleSource>> {
    use std::time::Duration;

    use miqat_providers::aladhan::{AladhanConfig, AladhanSource};

    let aladhan = match config.provider.base_url {
        Some(ref base_url) => AladhanConfig::new(base_url).map_err(|e| {
            crate::error::ClientError::Config(format!("invalid provider base_url: {}", e))
        })?,
        None => AladhanConfig::default(),
    }
    .with_timeout(Duration::from_secs(config.provider.timeout));

    debug!(base_url = %aladhan.base_url, "Using Aladhan schedule source");
    Ok(Arc::new(AladhanSource::new(aladhan)?))
}

/// Builds the schedule source described by the config.
///
/// Without a network source every resolution degrades to the fallback times.
#[cfg(not(feature = "aladhan"))]
pub fn schedule_source(_config: &ClientConfig) -> ClientResult<Arc<dyn ScheduleSource>> {
    use miqat_providers::{ErrorSource, ProviderError};

    debug!("Built without a network source, using fallback times");
    Ok(Arc::new(ErrorSource::new(
        "offline",
        ProviderError::configuration("built without a schedule source"),
    )))
}

/// Creates a dashboard and selects the location and date from `cli`.
pub async fn open(
    cli: &Cli,
    config: &ClientConfig,
    source: Arc<dyn ScheduleSource>,
    clock: Arc<dyn Clock>,
) -> ClientResult<Arc<Dashboard>> {
    let location = cli.location(config)?;
    let dashboard_config = config.dashboard_config().with_language(cli.language(config));
    let dashboard = Arc::new(Dashboard::new(dashboard_config, source, clock)?);

    match cli.date {
        Some(date) => dashboard.select(date, location).await?,
        None => dashboard.select_today(location).await?,
    };
    Ok(dashboard)
}

/// Opens a dashboard against the configured source and the system clock.
pub async fn open_default(cli: &Cli, config: &ClientConfig) -> ClientResult<Arc<Dashboard>> {
    open(cli, config, schedule_source(config)?, Arc::new(SystemClock)).await
}
