//! FleetDeck backend access
//!
//! Everything the console reads or writes goes through [`DataSource`]:
//! - [`LiveSource`] talks to the backend and falls back per read
//! - [`MockSource`] serves the built-in demo fleet for offline use

mod client;
mod error;
mod live;
pub mod mock;
pub mod series;

pub use client::{unwrap_envelope, ApiClient};
pub use error::{ApiError, Result};
pub use live::LiveSource;
pub use mock::{simulated_runner, CommandRunner, MockSource};
pub use series::{generate_series, generate_series_at};

use async_trait::async_trait;
use fleetdeck_core::{
    Alert, ExecutionOutcome, FleetOverview, HealthCheck, HealthCheckQuery, Host, Inventory,
    InventoryRow, MetricSample, MetricSnapshot, Settings, REQUEST_TIMEOUT_SECS,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Read and write operations the console needs from a backend.
///
/// Reads never fail: implementations substitute fallback data. Approve,
/// reject and execute surface errors; acknowledge never does.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short label for status lines ("live" or "mock")
    fn name(&self) -> &'static str;

    async fn hosts(&self) -> Vec<Host>;

    async fn host(&self, hostname: &str) -> Option<Host>;

    async fn host_metrics(&self, hostname: &str, metric: &str, hours: u32) -> Vec<MetricSample>;

    /// Up to 50 alerts for one host
    async fn host_alerts(&self, hostname: &str) -> Vec<Alert>;

    async fn host_inventory(&self, hostname: &str) -> Option<Inventory>;

    async fn fleet_overview(&self) -> FleetOverview;

    /// Fleet-wide alerts, up to 200
    async fn alerts(&self) -> Vec<Alert>;

    async fn health_checks(&self, query: &HealthCheckQuery) -> Vec<HealthCheck>;

    async fn health_check(&self, id: &str) -> Option<HealthCheck>;

    async fn health_check_result(&self, id: &str) -> Option<ExecutionOutcome>;

    /// Latest cpu/memory/disk for the host table
    async fn metric_snapshot(&self, hostname: &str) -> MetricSnapshot;

    /// Best effort: failures are swallowed
    async fn acknowledge_alert(&self, id: &str);

    async fn approve_health_check(&self, id: &str) -> Result<()>;

    async fn reject_health_check(&self, id: &str) -> Result<()>;

    /// Run one action by index, or every action when `action_index` is None
    async fn execute_health_check(&self, id: &str, action_index: Option<usize>) -> Result<ExecutionOutcome>;
}

/// How the console reaches its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub endpoint: String,
    pub offline: bool,
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.api_endpoint.clone(),
            offline: false,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

/// Build the data source for this run
pub fn connect(config: &ConsoleConfig) -> Arc<dyn DataSource> {
    let mock: Arc<dyn DataSource> = Arc::new(MockSource::new());
    if config.offline {
        info!("Offline mode: serving the built-in demo fleet");
        return mock;
    }
    info!("Using backend at {}", config.endpoint);
    let client = ApiClient::with_timeout(config.endpoint.clone(), config.timeout);
    Arc::new(LiveSource::new(client, mock))
}

/// Every host joined with its inventory, fetched concurrently
pub async fn fetch_inventory_rows(source: &dyn DataSource) -> Vec<InventoryRow> {
    let hosts = source.hosts().await;
    let inventories =
        futures::future::join_all(hosts.iter().map(|h| source.host_inventory(&h.hostname))).await;
    hosts
        .into_iter()
        .zip(inventories)
        .map(|(host, inventory)| InventoryRow { host, inventory })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_offline_uses_mock() {
        let config = ConsoleConfig::from_settings(&Settings::default()).offline(true);
        assert_eq!(connect(&config).name(), "mock");
    }

    #[test]
    fn test_connect_online_uses_live() {
        let config = ConsoleConfig::from_settings(&Settings::default())
            .with_endpoint(Some("http://10.1.1.1:9000".to_string()));
        assert_eq!(config.endpoint, "http://10.1.1.1:9000");
        assert_eq!(connect(&config).name(), "live");
    }

    #[tokio::test]
    async fn test_inventory_rows_joined() {
        let mock = MockSource::new();
        let rows = fetch_inventory_rows(&mock).await;
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.inventory.is_some()));
        assert_eq!(rows[0].host.hostname, "web-server-01");
    }
}
