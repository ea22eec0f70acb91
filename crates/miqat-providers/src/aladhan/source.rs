//! HTTP client for the Aladhan day-timings endpoint.

use reqwest::{Client, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::error::{ProviderError, ProviderResult};
use crate::raw_timings::{RawDayResponse, RawTimings};
use crate::source::{BoxFuture, ScheduleRequest, ScheduleSource};

use super::config::AladhanConfig;

const PROVIDER_NAME: &str = "aladhan";

/// A [`ScheduleSource`] backed by the Aladhan REST API.
pub struct AladhanSource {
    client: Client,
    config: AladhanConfig,
}

impl AladhanSource {
    /// Creates a new source with the given configuration.
    pub fn new(config: AladhanConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("Failed to create HTTP client: {}", e))
                    .with_provider(PROVIDER_NAME)
            })?;

        Ok(Self { client, config })
    }

    /// Builds the request URL for a day's timings.
    pub fn timings_url(&self, request: &ScheduleRequest) -> ProviderResult<Url> {
        let path = format!(
            "timings/{:02}-{:02}-{:04}",
            request.day(),
            request.month(),
            request.year()
        );
        let mut url = self.config.base_url.join(&path).map_err(|e| {
            ProviderError::configuration(format!("Invalid timings URL: {}", e))
                .with_provider(PROVIDER_NAME)
        })?;

        url.query_pairs_mut()
            .append_pair("latitude", &request.latitude().to_string())
            .append_pair("longitude", &request.longitude().to_string())
            .append_pair("method", &request.method().to_string());

        Ok(url)
    }

    async fn fetch(&self, request: ScheduleRequest) -> ProviderResult<RawTimings> {
        let url = self.timings_url(&request)?;
        trace!(url = %url, "Sending request");

        let response = self.client.get(url).send().await.map_err(|e| {
            ProviderError::network(format!("Request failed: {}", e))
                .with_provider(PROVIDER_NAME)
                .with_source(e)
        })?;

        let status = response.status();
        debug!(status = %status, date = %request.date, "Received timings response");
        check_status(status)?;

        let body: RawDayResponse = response.json().await.map_err(|e| {
            ProviderError::malformed(format!("Failed to decode response: {}", e))
                .with_provider(PROVIDER_NAME)
                .with_source(e)
        })?;

        body.into_timings()
            .map_err(|e| ProviderError::new(e.code(), e.message()).with_provider(PROVIDER_NAME))
    }
}

impl ScheduleSource for AladhanSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_day(&self, request: ScheduleRequest) -> BoxFuture<'_, ProviderResult<RawTimings>> {
        Box::pin(self.fetch(request))
    }
}

/// Maps a non-success HTTP status to a provider error.
fn check_status(status: StatusCode) -> ProviderResult<()> {
    if status.is_success() {
        return Ok(());
    }

    let err = match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited("Too many requests"),
        s if s.is_server_error() => ProviderError::server(format!("Server error: {}", s)),
        s => ProviderError::malformed(format!("Unexpected status: {}", s)),
    };
    Err(err.with_provider(PROVIDER_NAME))
}
