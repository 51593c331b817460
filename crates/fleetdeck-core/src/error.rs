//! Error types for FleetDeck

use std::path::PathBuf;

/// FleetDeck error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Health check not found: {0}")]
    HealthCheckNotFound(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Result type alias for FleetDeck
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Error::InvalidValue(msg.into())
    }

    pub fn transition(from: impl ToString, to: impl ToString) -> Self {
        Error::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
