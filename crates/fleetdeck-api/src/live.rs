//! Backend-backed data source with per-read fallback

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use fleetdeck_core::{
    is_valid_path_segment, Alert, ExecutionOutcome, FleetOverview, HealthCheck, HealthCheckQuery,
    Host, Inventory, MetricSample, MetricSnapshot, ALERTS_PER_PAGE, HOST_ALERT_LIMIT,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::DataSource;

/// Reads go to the backend and fall back to `fallback` on any failure.
/// Writes go to the backend only, except acknowledge which never fails.
pub struct LiveSource {
    client: ApiClient,
    fallback: Arc<dyn DataSource>,
}

impl LiveSource {
    pub fn new(client: ApiClient, fallback: Arc<dyn DataSource>) -> Self {
        Self { client, fallback }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn check_segment(value: &str) -> Result<()> {
    if is_valid_path_segment(value) {
        Ok(())
    } else {
        Err(ApiError::InvalidId(value.to_string()))
    }
}

#[async_trait]
impl DataSource for LiveSource {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn hosts(&self) -> Vec<Host> {
        let fallback = self.fallback.hosts().await;
        self.client.fetch_or("/hosts", fallback).await
    }

    async fn host(&self, hostname: &str) -> Option<Host> {
        let fallback = self.fallback.host(hostname).await;
        if !is_valid_path_segment(hostname) {
            return fallback;
        }
        self.client
            .fetch_or(&format!("/hosts/{}", hostname), fallback)
            .await
    }

    async fn host_metrics(&self, hostname: &str, metric: &str, hours: u32) -> Vec<MetricSample> {
        let fallback = self.fallback.host_metrics(hostname, metric, hours).await;
        if !is_valid_path_segment(hostname) || !is_valid_path_segment(metric) {
            return fallback;
        }
        let to = Utc::now();
        let from = to - Duration::hours(i64::from(hours));
        let path = format!(
            "/hosts/{}/metrics?from={}&to={}&metrics={}",
            hostname,
            from.to_rfc3339_opts(SecondsFormat::Millis, true),
            to.to_rfc3339_opts(SecondsFormat::Millis, true),
            metric
        );
        self.client.fetch_or(&path, fallback).await
    }

    async fn host_alerts(&self, hostname: &str) -> Vec<Alert> {
        let fallback = self.fallback.host_alerts(hostname).await;
        if !is_valid_path_segment(hostname) {
            return fallback;
        }
        let path = format!("/hosts/{}/alerts?limit={}", hostname, HOST_ALERT_LIMIT);
        self.client.fetch_or(&path, fallback).await
    }

    async fn host_inventory(&self, hostname: &str) -> Option<Inventory> {
        let fallback = self.fallback.host_inventory(hostname).await;
        if !is_valid_path_segment(hostname) {
            return fallback;
        }
        self.client
            .fetch_or(&format!("/hosts/{}/inventory", hostname), fallback)
            .await
    }

    async fn fleet_overview(&self) -> FleetOverview {
        let fallback = self.fallback.fleet_overview().await;
        self.client.fetch_or("/fleet/overview", fallback).await
    }

    async fn alerts(&self) -> Vec<Alert> {
        let fallback = self.fallback.alerts().await;
        let path = format!("/alerts?per_page={}", ALERTS_PER_PAGE);
        self.client.fetch_or(&path, fallback).await
    }

    async fn health_checks(&self, query: &HealthCheckQuery) -> Vec<HealthCheck> {
        let fallback = self.fallback.health_checks(query).await;
        if let Some(hostname) = &query.hostname {
            if !is_valid_path_segment(hostname) {
                return fallback;
            }
        }
        let path = format!("/health-checks{}", query.to_query_string());
        self.client.fetch_or(&path, fallback).await
    }

    async fn health_check(&self, id: &str) -> Option<HealthCheck> {
        let fallback = self.fallback.health_check(id).await;
        if !is_valid_path_segment(id) {
            return fallback;
        }
        self.client
            .fetch_or(&format!("/health-checks/{}", id), fallback)
            .await
    }

    async fn health_check_result(&self, id: &str) -> Option<ExecutionOutcome> {
        let fallback = self.fallback.health_check_result(id).await;
        if !is_valid_path_segment(id) {
            return fallback;
        }
        let mut outcome: Option<ExecutionOutcome> = self
            .client
            .fetch_or(&format!("/health-checks/{}/result", id), fallback)
            .await;
        if let Some(outcome) = outcome.as_mut() {
            if outcome.check_id.is_empty() {
                outcome.check_id = id.to_string();
            }
        }
        outcome
    }

    /// The backend has no snapshot endpoint; always served by the fallback
    async fn metric_snapshot(&self, hostname: &str) -> MetricSnapshot {
        self.fallback.metric_snapshot(hostname).await
    }

    async fn acknowledge_alert(&self, id: &str) {
        if !is_valid_path_segment(id) {
            debug!("Ignoring ack for invalid alert id {:?}", id);
            return;
        }
        self.client
            .post_best_effort(&format!("/alerts/{}/ack", id))
            .await;
    }

    async fn approve_health_check(&self, id: &str) -> Result<()> {
        check_segment(id)?;
        self.client
            .post(&format!("/health-checks/{}/approve", id), None)
            .await?;
        info!("Approved health check {}", id);
        Ok(())
    }

    async fn reject_health_check(&self, id: &str) -> Result<()> {
        check_segment(id)?;
        self.client
            .post(&format!("/health-checks/{}/reject", id), None)
            .await?;
        info!("Rejected health check {}", id);
        Ok(())
    }

    async fn execute_health_check(&self, id: &str, action_index: Option<usize>) -> Result<ExecutionOutcome> {
        check_segment(id)?;
        let body = action_index.map(|index| json!({ "action_index": index }));
        let value = self
            .client
            .post(&format!("/health-checks/{}/execute", id), body.as_ref())
            .await?;

        let mut outcome: ExecutionOutcome = serde_json::from_value(value)?;
        if outcome.check_id.is_empty() {
            outcome.check_id = id.to_string();
        }
        info!("Executed health check {}: {}", id, outcome.status);
        Ok(outcome)
    }
}
