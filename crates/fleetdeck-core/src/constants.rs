//! Constants and default values for FleetDeck

use std::path::PathBuf;

/// Default FleetDeck home directory name
pub const FLEETDECK_DIR: &str = ".fleetdeck";

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.toml";

/// Versioned base path of the backend REST API
pub const API_BASE_PATH: &str = "/api/v1";

/// Default backend endpoint
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8080";

/// Default refresh interval in seconds
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Allowed refresh interval range in seconds (inclusive)
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 5;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 600;

/// Dashboard polling interval in seconds
pub const DASHBOARD_REFRESH_SECS: u64 = 30;

/// Health check list polling interval in seconds
pub const HEALTH_CHECK_REFRESH_SECS: u64 = 15;

/// HTTP request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Rows per page in list views
pub const PAGE_SIZE: usize = 20;

/// Maximum number of page buttons shown at once
pub const PAGE_WINDOW: usize = 7;

/// Alerts fetched per host on the host detail view
pub const HOST_ALERT_LIMIT: usize = 50;

/// Alerts fetched for the fleet-wide alert list
pub const ALERTS_PER_PAGE: usize = 200;

/// Hourly buckets in the dashboard alert timeline
pub const TIMELINE_HOURS: usize = 24;

/// Default metric shown on host detail
pub const DEFAULT_METRIC: &str = "cpu.usage_percent";

/// Get the FleetDeck home directory
pub fn fleetdeck_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(FLEETDECK_DIR))
        .unwrap_or_else(|| PathBuf::from(FLEETDECK_DIR))
}

/// Get the settings file path
pub fn settings_path() -> PathBuf {
    fleetdeck_home().join(SETTINGS_FILE)
}

/// Convert a range label ("1h", "6h", "24h", "7d") into hours.
/// Anything unrecognised is treated as a week.
pub fn range_hours(range: &str) -> u32 {
    match range {
        "1h" => 1,
        "6h" => 6,
        "24h" => 24,
        _ => 168,
    }
}
