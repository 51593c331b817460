//! Console settings: endpoint, refresh interval and theme

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::constants::{
    settings_path, DEFAULT_API_ENDPOINT, DEFAULT_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS,
    MIN_REFRESH_INTERVAL_SECS,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(Error::invalid(format!("Invalid theme: {} (expected dark or light)", s))),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted console settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the backend, without the `/api/v1` suffix
    pub api_endpoint: String,

    /// Polling interval for list views
    pub refresh_interval_secs: u64,

    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Load from the default path, see [`Settings::load_or_default`]
    pub fn load() -> Self {
        Self::load_or_default(&settings_path())
    }

    /// Load settings, falling back to defaults when the file is missing,
    /// unreadable or fails validation
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(Error::ConfigNotFound(_)) => {
                debug!("Settings not found at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                warn!("Ignoring settings at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Strict load: missing, corrupt and out-of-range files are errors
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        SettingsForm::from(&settings)
            .validate()
            .map_err(|errors| Error::InvalidSettings(FieldError::join(&errors)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Fall back to the default interval if a hand-edited value is out of range
    pub fn refresh_interval(&self) -> std::time::Duration {
        let secs = if (MIN_REFRESH_INTERVAL_SECS..=MAX_REFRESH_INTERVAL_SECS)
            .contains(&self.refresh_interval_secs)
        {
            self.refresh_interval_secs
        } else {
            DEFAULT_REFRESH_INTERVAL_SECS
        };
        std::time::Duration::from_secs(secs)
    }
}

/// http(s) scheme followed by a host with no whitespace
static ENDPOINT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/]+(/\S*)?$").expect("Invalid endpoint regex"));

/// A validation failure tied to one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn join(errors: &[FieldError]) -> String {
        errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw, unvalidated settings as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub api_endpoint: String,
    pub refresh_interval: String,
    pub theme: String,
}

impl From<&Settings> for SettingsForm {
    fn from(settings: &Settings) -> Self {
        Self {
            api_endpoint: settings.api_endpoint.clone(),
            refresh_interval: settings.refresh_interval_secs.to_string(),
            theme: settings.theme.to_string(),
        }
    }
}

impl SettingsForm {
    /// Validate every field, collecting all errors rather than the first
    pub fn validate(&self) -> std::result::Result<Settings, Vec<FieldError>> {
        let mut errors = Vec::new();

        let endpoint = self.api_endpoint.trim();
        if endpoint.is_empty() {
            errors.push(FieldError::new("api_endpoint", "API endpoint is required"));
        } else if !ENDPOINT_REGEX.is_match(endpoint) {
            errors.push(FieldError::new(
                "api_endpoint",
                "API endpoint must be an http:// or https:// URL",
            ));
        }

        let interval = match self.refresh_interval.trim().parse::<u64>() {
            Ok(secs) if (MIN_REFRESH_INTERVAL_SECS..=MAX_REFRESH_INTERVAL_SECS).contains(&secs) => {
                Some(secs)
            }
            Ok(_) => {
                errors.push(FieldError::new(
                    "refresh_interval",
                    format!(
                        "Refresh interval must be between {} and {} seconds",
                        MIN_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS
                    ),
                ));
                None
            }
            Err(_) => {
                errors.push(FieldError::new("refresh_interval", "Refresh interval must be a number"));
                None
            }
        };

        let theme = match self.theme.parse::<Theme>() {
            Ok(theme) => Some(theme),
            Err(_) => {
                errors.push(FieldError::new("theme", "Theme must be dark or light"));
                None
            }
        };

        match (interval, theme) {
            (Some(refresh_interval_secs), Some(theme)) if errors.is_empty() => Ok(Settings {
                api_endpoint: endpoint.trim_end_matches('/').to_string(),
                refresh_interval_secs,
                theme,
            }),
            _ => Err(errors),
        }
    }

    /// Validate and persist. On any validation error nothing is written.
    pub fn save_to(&self, path: &Path) -> std::result::Result<Settings, SaveError> {
        let settings = self.validate().map_err(SaveError::Invalid)?;
        settings.save_to(path).map_err(SaveError::Io)?;
        Ok(settings)
    }
}

/// Why a settings form could not be saved
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Invalid settings: {}", FieldError::join(.0))]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Io(Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn form(endpoint: &str, interval: &str) -> SettingsForm {
        SettingsForm {
            api_endpoint: endpoint.to_string(),
            refresh_interval: interval.to_string(),
            theme: "dark".to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_endpoint, "http://localhost:8080");
        assert_eq!(settings.refresh_interval_secs, 30);
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_interval_bounds() {
        assert!(form("http://api", "3").validate().is_err());
        assert!(form("http://api", "1000").validate().is_err());
        assert!(form("http://api", "5").validate().is_ok());
        assert!(form("http://api", "600").validate().is_ok());
        assert_eq!(form("http://api", "30").validate().unwrap().refresh_interval_secs, 30);
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = SettingsForm {
            api_endpoint: "  ".to_string(),
            refresh_interval: "soon".to_string(),
            theme: "solarized".to_string(),
        }
        .validate()
        .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["api_endpoint", "refresh_interval", "theme"]);
    }

    #[test]
    fn test_endpoint_requires_scheme() {
        let errors = form("localhost:8080", "30").validate().unwrap_err();
        assert_eq!(errors[0].field, "api_endpoint");
        assert!(form("https://ops.example.com:8443", "30").validate().is_ok());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let settings = form("http://api.example.com/", "30").validate().unwrap();
        assert_eq!(settings.api_endpoint, "http://api.example.com");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let settings = Settings {
            api_endpoint: "http://10.0.0.2:8080".to_string(),
            refresh_interval_secs: 60,
            theme: Theme::Light,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_form_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        Settings::default().save_to(&path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let result = form("http://other", "1000").save_to(&path);
        assert!(matches!(result, Err(SaveError::Invalid(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_load_missing_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_corrupt_yields_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_endpoint = [not toml").unwrap();
        assert_eq!(Settings::load_or_default(file.path()), Settings::default());
    }

    #[test]
    fn test_load_out_of_range_yields_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "refresh_interval_secs = 2").unwrap();
        assert!(matches!(Settings::load_from(file.path()), Err(Error::InvalidSettings(_))));
        assert_eq!(Settings::load_or_default(file.path()), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "theme = \"light\"").unwrap();
        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.refresh_interval_secs, 30);
    }
}
