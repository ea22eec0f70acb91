//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/miqat/config.toml` by default:
//!
//! ```toml
//! [location]
//! name = "Cairo"
//! latitude = 30.0444
//! longitude = 31.2357
//! method = 5
//!
//! [display]
//! language = "english"
//!
//! [fallback]
//! maghrib = "18:20"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use miqat_core::{DisplayLanguage, LocationConfig};
use miqat_dashboard::{DashboardConfig, FallbackTimes, SchedulerConfig};
use serde::{Deserialize, Serialize};

/// Calculation method used when only coordinates are given.
pub const DEFAULT_METHOD: u8 = 3;

/// Configuration for the miqat client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// The place prayer times are shown for.
    pub location: Option<LocationConfig>,

    /// Schedule source settings.
    pub provider: ProviderSettings,

    /// Display settings.
    pub display: DisplaySettings,

    /// Times used when the source is unavailable.
    pub fallback: FallbackTimes,

    /// Cache and background refresh settings.
    pub refresh: RefreshSettings,
}

/// Schedule source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API base URL; the public Aladhan endpoint when unset.
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: 10,
        }
    }
}

/// Display settings for output formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Language for prayer names.
    pub language: DisplayLanguage,

    /// Emit JSON instead of text.
    pub json: bool,
}

/// Cache and refresh intervals, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// How long a fetched schedule is reused.
    pub cache_ttl: u64,

    /// How often `watch` checks for midnight and retries a failed source.
    pub check_interval: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            cache_ttl: 6 * 60 * 60,
            check_interval: 30,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("miqat")
    }

    /// Builds the dashboard configuration.
    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig::default()
            .with_cache_ttl(Duration::from_secs(self.refresh.cache_ttl))
            .with_language(self.display.language)
            .with_fallback(self.fallback.clone())
    }

    /// Builds the background refresh configuration.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::new(Duration::from_secs(self.refresh.check_interval.max(1)))
    }

    /// Checks everything that can be checked without network access.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref location) = self.location {
            location
                .validate()
                .map_err(|e| format!("invalid [location]: {}", e))?;
        }
        self.dashboard_config()
            .validate()
            .map_err(|e| format!("invalid [fallback]: {}", e))?;
        if self.provider.timeout == 0 {
            return Err("provider timeout must be non-zero".to_string());
        }
        if let Some(ref base_url) = self.provider.base_url {
            validate_base_url(base_url)?;
        }
        Ok(())
    }
}

#[cfg(feature = "aladhan")]
fn validate_base_url(base_url: &str) -> Result<(), String> {
    miqat_providers::aladhan::AladhanConfig::new(base_url)
        .map(|_| ())
        .map_err(|e| format!("invalid provider base_url {:?}: {}", base_url, e))
}

#[cfg(not(feature = "aladhan"))]
fn validate_base_url(_base_url: &str) -> Result<(), String> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert!(config.location.is_none());
        assert_eq!(config.provider.timeout, 10);
        assert_eq!(config.refresh.check_interval, 30);
        assert_eq!(config.display.language, DisplayLanguage::Transliterated);
        assert!(config.validate().is_ok());
        assert!(ClientConfig::default_path().ends_with("miqat/config.toml"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[location]
name = "Cairo"
latitude = 30.0444
longitude = 31.2357
method = 5

[display]
language = "arabic"

[fallback]
maghrib = "18:20"

[refresh]
cache_ttl = 600
"#
        )
        .unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        let location = config.location.as_ref().unwrap();
        assert_eq!(location.name, "Cairo");
        assert_eq!(location.calculation_method, 5);
        assert_eq!(config.display.language, DisplayLanguage::Arabic);
        assert_eq!(config.fallback.maghrib.to_string(), "18:20");
        assert_eq!(config.fallback.isha.to_string(), "19:30");

        let dashboard = config.dashboard_config();
        assert_eq!(dashboard.cache_ttl, Duration::from_secs(600));
        assert_eq!(dashboard.language, DisplayLanguage::Arabic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fallback]\nfajr = \"25:00\"").unwrap();
        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(err.starts_with("failed to parse config"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.starts_with("failed to read config"));
    }

    #[test]
    fn validate_rejects_bad_location() {
        let config = ClientConfig {
            location: Some(LocationConfig::new("Pole", 95.0, 0.0, 3)),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("[location]"));
    }

    #[test]
    fn validate_rejects_unordered_fallback() {
        let mut config = ClientConfig::default();
        config.fallback.asr = "11:00".parse().unwrap();
        assert!(config.validate().unwrap_err().contains("[fallback]"));
    }

    #[test]
    fn dump_round_trips_through_toml() {
        let config = ClientConfig {
            location: Some(LocationConfig::new("Mecca", 21.4225, 39.8262, 4)),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.location, config.location);
        assert_eq!(back.fallback, config.fallback);
    }
}
