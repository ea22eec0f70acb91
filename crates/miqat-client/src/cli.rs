//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use miqat_core::{DisplayLanguage, LocationConfig};

use crate::config::{ClientConfig, DEFAULT_METHOD};
use crate::error::{ClientError, ClientResult};
use crate::output::OutputFormat;

/// miqat - Prayer times and the countdown to the next one
#[derive(Debug, Parser)]
#[command(name = "miqat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MIQAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    // --- Location flags ---
    /// Latitude in degrees (overrides the configured location)
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Calculation method code
    #[arg(long)]
    pub method: Option<u8>,

    /// Place name shown in the output
    #[arg(long)]
    pub name: Option<String>,

    /// Date to show instead of today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Language for prayer names
    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format based on CLI flags and config.
    pub fn output_format(&self, config: &ClientConfig) -> OutputFormat {
        if self.json || config.display.json {
            OutputFormat::Json
        } else {
            OutputFormat::Tty
        }
    }

    /// Returns the display language, flag first, then config.
    pub fn language(&self, config: &ClientConfig) -> DisplayLanguage {
        self.language
            .map(DisplayLanguage::from)
            .unwrap_or(config.display.language)
    }

    /// Resolves the location from flags, falling back to the config file.
    ///
    /// `--method` and `--name` on their own adjust the configured location.
    pub fn location(&self, config: &ClientConfig) -> ClientResult<LocationConfig> {
        let base = config.location.clone();

        let mut location = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => LocationConfig::new(
                "Custom",
                lat,
                lon,
                base.as_ref()
                    .map_or(DEFAULT_METHOD, |b| b.calculation_method),
            ),
            _ => base.ok_or(ClientError::NoLocation)?,
        };

        if let Some(method) = self.method {
            location.calculation_method = method;
        }
        if let Some(ref name) = self.name {
            location.name = name.clone();
        }

        location
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(location)
    }
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the day's schedule (default)
    Today,

    /// Show the next prayer and the time left until it
    Next,

    /// Show the countdown to Iftar or Suhoor
    Fast,

    /// Keep a live countdown running until interrupted
    Watch,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

/// Prayer name language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    English,
    Transliterated,
    Arabic,
}

impl From<LanguageArg> for DisplayLanguage {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::English => Self::English,
            LanguageArg::Transliterated => Self::Transliterated,
            LanguageArg::Arabic => Self::Arabic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("miqat").chain(args.iter().copied())).unwrap()
    }

    fn configured() -> ClientConfig {
        ClientConfig {
            location: Some(LocationConfig::new("Cairo", 30.0444, 31.2357, 5)),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_to_no_subcommand() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.output_format(&ClientConfig::default()), OutputFormat::Tty);
    }

    #[test]
    fn parses_subcommands_and_date() {
        let cli = parse(&["--json", "--date", "2025-03-07", "next"]);
        assert!(matches!(cli.command, Some(Command::Next)));
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 3, 7));
        assert_eq!(cli.output_format(&ClientConfig::default()), OutputFormat::Json);

        let cli = parse(&["config", "validate"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Validate
            })
        ));
    }

    #[test]
    fn coordinates_override_config() {
        let cli = parse(&["--lat", "-33.8688", "--lon", "151.2093", "--name", "Sydney"]);
        let location = cli.location(&configured()).unwrap();
        assert_eq!(location.name, "Sydney");
        assert!((location.latitude + 33.8688).abs() < f64::EPSILON);
        assert_eq!(location.calculation_method, 5);
    }

    #[test]
    fn coordinates_without_config_use_default_method() {
        let cli = parse(&["--lat", "51.5", "--lon", "-0.12"]);
        let location = cli.location(&ClientConfig::default()).unwrap();
        assert_eq!(location.name, "Custom");
        assert_eq!(location.calculation_method, DEFAULT_METHOD);
    }

    #[test]
    fn method_adjusts_configured_location() {
        let cli = parse(&["--method", "4"]);
        let location = cli.location(&configured()).unwrap();
        assert_eq!(location.name, "Cairo");
        assert_eq!(location.calculation_method, 4);
    }

    #[test]
    fn missing_location_is_an_error() {
        let cli = parse(&["today"]);
        assert!(matches!(
            cli.location(&ClientConfig::default()),
            Err(ClientError::NoLocation)
        ));
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["miqat", "--lat", "30.0"]).is_err());
    }

    #[test]
    fn language_flag_wins() {
        let cli = parse(&["--language", "english"]);
        let mut config = ClientConfig::default();
        config.display.language = DisplayLanguage::Arabic;
        assert_eq!(cli.language(&config), DisplayLanguage::English);
        assert_eq!(parse(&[]).language(&config), DisplayLanguage::Arabic);
    }
}
