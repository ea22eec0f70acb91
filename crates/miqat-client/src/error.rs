//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// No location given on the command line or in the config file.
    NoLocation,
    /// Provider setup error.
    Provider(String),
    /// Dashboard error.
    Dashboard(miqat_dashboard::DashboardError),
    /// Output serialization error.
    Output(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::NoLocation => write!(
                f,
                "no location configured; pass --lat/--lon or add a [location] table to the config file"
            ),
            Self::Provider(msg) => write!(f, "provider error: {}", msg),
            Self::Dashboard(err) => write!(f, "{}", err),
            Self::Output(msg) => write!(f, "output error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Dashboard(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<miqat_dashboard::DashboardError> for ClientError {
    fn from(err: miqat_dashboard::DashboardError) -> Self {
        Self::Dashboard(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

#[cfg(feature = "aladhan")]
impl From<miqat_providers::ProviderError> for ClientError {
    fn from(err: miqat_providers::ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}
