//! Aladhan source configuration.

use std::time::Duration;

use url::Url;

/// Configuration for the Aladhan timings API.
#[derive(Debug, Clone)]
pub struct AladhanConfig {
    /// API base URL; `timings/{DD-MM-YYYY}` is appended to it.
    pub base_url: Url,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl Default for AladhanConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(Self::DEFAULT_BASE_URL).expect("valid default URL"),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("miqat/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AladhanConfig {
    /// Default public endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.aladhan.com/v1/";

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Creates a configuration for a custom endpoint (mirrors, test servers).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let mut base = base_url.as_ref().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&base)?,
            ..Default::default()
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_public_api() {
        let config = AladhanConfig::default();
        assert_eq!(config.base_url.as_str(), "https://api.aladhan.com/v1/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("miqat/"));
    }

    #[test]
    fn custom_base_gets_trailing_slash() {
        let config = AladhanConfig::new("http://localhost:8080/v1")
            .unwrap()
            .with_timeout(Duration::from_secs(2))
            .with_user_agent("test");
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/v1/");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "test");
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(AladhanConfig::new("not a url").is_err());
    }
}
