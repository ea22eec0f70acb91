//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Renders the current configuration as TOML.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    Ok(format!("# config.toml ({})\n{}", path.display(), toml_str))
}

/// Validates the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<String> {
    config.validate().map_err(ClientError::Config)?;

    let mut report = String::new();
    match config.location {
        Some(ref location) => report.push_str(&format!(
            "Location: {} ({}, {}), method {}\n",
            location.name, location.latitude, location.longitude, location.calculation_method
        )),
        None => report.push_str("No [location] configured; --lat/--lon will be required.\n"),
    }
    report.push_str("Configuration is valid.");
    Ok(report)
}

/// Shows the configuration file path.
pub fn path(path: &Path) -> ClientResult<String> {
    Ok(format!("config: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use miqat_core::LocationConfig;

    #[test]
    fn dump_includes_header_and_tables() {
        let config = ClientConfig {
            location: Some(LocationConfig::new("Cairo", 30.0444, 31.2357, 5)),
            ..Default::default()
        };
        let out = dump(&config, Path::new("/tmp/miqat.toml")).unwrap();
        assert!(out.starts_with("# config.toml (/tmp/miqat.toml)\n"));
        assert!(out.contains("[location]"));
        assert!(out.contains("name = \"Cairo\""));
        assert!(out.contains("[fallback]"));
        assert!(out.contains("fajr = \"04:45\""));
    }

    #[test]
    fn validate_reports_location() {
        let config = ClientConfig {
            location: Some(LocationConfig::new("Cairo", 30.0444, 31.2357, 5)),
            ..Default::default()
        };
        insta::assert_snapshot!(validate(&config).unwrap(), @r"
        Location: Cairo (30.0444, 31.2357), method 5
        Configuration is valid.
        ");
    }

    #[test]
    fn validate_without_location() {
        let out = validate(&ClientConfig::default()).unwrap();
        assert!(out.starts_with("No [location] configured"));
    }

    #[test]
    fn validate_propagates_errors() {
        let mut config = ClientConfig::default();
        config.provider.timeout = 0;
        assert!(matches!(validate(&config), Err(ClientError::Config(_))));
    }

    #[test]
    fn path_output() {
        assert_eq!(
            path(Path::new("/home/me/.config/miqat/config.toml")).unwrap(),
            "config: /home/me/.config/miqat/config.toml"
        );
    }
}
