//! Built-in demo fleet
//!
//! Serves reads from a fixed dataset and simulates the backend's side of
//! every write, including the health check state machine.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fleetdeck_core::{
    Alert, AlertStatus, CheckStatus, CommandOutput, CpuInfo, ExecutionOutcome, ExecutionResult,
    FleetOverview, GpuInfo, Hardware, HealthCheck, HealthCheckQuery, Host, HostStatus, Inventory,
    MemoryInfo, MetricSample, MetricSnapshot, NetworkInterface, OsRelease, Package,
    ProposedAction, ReviewDecision, RiskLevel, Severity, Software, StorageDevice, HOST_ALERT_LIMIT,
};
use parking_lot::Mutex;
use rand::Rng;
use serde_json::Map;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ApiError, Result};
use crate::series::generate_series;
use crate::DataSource;

/// Runs one proposed action and reports how it went
pub type CommandRunner = Arc<dyn Fn(&ProposedAction) -> ExecutionResult + Send + Sync>;

/// Pretend to run the command; always succeeds
pub fn simulated_runner() -> CommandRunner {
    Arc::new(|action: &ProposedAction| {
        let duration_ms = rand::thread_rng().gen_range(40..1200);
        ExecutionResult::succeeded(
            action.command.clone(),
            CommandOutput {
                stdout: format!("$ {}\n(simulated) done\n", action.command),
                stderr: String::new(),
                exit_code: 0,
                duration_ms,
            },
        )
    })
}

struct MockState {
    hosts: Vec<Host>,
    alerts: Vec<Alert>,
    checks: Vec<HealthCheck>,
}

/// In-memory data source over the demo fleet
pub struct MockSource {
    state: Mutex<MockState>,
    runner: CommandRunner,
    seeded_at: DateTime<Utc>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Seed the dataset with timestamps relative to `now`
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(MockState {
                hosts: seed_hosts(now),
                alerts: seed_alerts(now),
                checks: seed_health_checks(now),
            }),
            runner: simulated_runner(),
            seeded_at: now,
        }
    }

    pub fn with_runner(mut self, runner: CommandRunner) -> Self {
        self.runner = runner;
        self
    }

    fn review(&self, id: &str, decision: ReviewDecision) -> Result<()> {
        let mut state = self.state.lock();
        let check = find_check(&mut state.checks, id)?;
        check.review(decision, Utc::now())?;
        info!("Health check {} {}d (mock)", id, decision.as_str());
        Ok(())
    }
}

fn find_check<'a>(checks: &'a mut [HealthCheck], id: &str) -> Result<&'a mut HealthCheck> {
    checks
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("health check {}", id)))
}

#[async_trait]
impl DataSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn hosts(&self) -> Vec<Host> {
        self.state.lock().hosts.clone()
    }

    async fn host(&self, hostname: &str) -> Option<Host> {
        self.state
            .lock()
            .hosts
            .iter()
            .find(|h| h.hostname == hostname)
            .cloned()
    }

    async fn host_metrics(&self, hostname: &str, metric: &str, hours: u32) -> Vec<MetricSample> {
        generate_series(hostname, metric, hours)
    }

    async fn host_alerts(&self, hostname: &str) -> Vec<Alert> {
        self.state
            .lock()
            .alerts
            .iter()
            .filter(|a| a.hostname == hostname)
            .take(HOST_ALERT_LIMIT)
            .cloned()
            .collect()
    }

    async fn host_inventory(&self, hostname: &str) -> Option<Inventory> {
        let state = self.state.lock();
        let host = state.hosts.iter().find(|h| h.hostname == hostname);
        Some(inventory_for(hostname, host, self.seeded_at))
    }

    async fn fleet_overview(&self) -> FleetOverview {
        let state = self.state.lock();
        FleetOverview::from_records(&state.hosts, &state.alerts)
    }

    async fn alerts(&self) -> Vec<Alert> {
        self.state.lock().alerts.clone()
    }

    async fn health_checks(&self, query: &HealthCheckQuery) -> Vec<HealthCheck> {
        let state = self.state.lock();
        let matching = state.checks.iter().filter(|c| query.matches(c)).cloned();
        match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    async fn health_check(&self, id: &str) -> Option<HealthCheck> {
        self.state.lock().checks.iter().find(|c| c.id == id).cloned()
    }

    async fn health_check_result(&self, id: &str) -> Option<ExecutionOutcome> {
        self.state
            .lock()
            .checks
            .iter()
            .find(|c| c.id == id)
            .map(ExecutionOutcome::from)
    }

    async fn metric_snapshot(&self, hostname: &str) -> MetricSnapshot {
        metric_snapshot_for(hostname)
    }

    async fn acknowledge_alert(&self, id: &str) {
        let mut state = self.state.lock();
        match state.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.status = AlertStatus::Resolved;
                debug!("Alert {} acknowledged (mock)", id);
            }
            None => debug!("Ignoring ack for unknown alert {}", id),
        }
    }

    async fn approve_health_check(&self, id: &str) -> Result<()> {
        self.review(id, ReviewDecision::Approve)
    }

    async fn reject_health_check(&self, id: &str) -> Result<()> {
        self.review(id, ReviewDecision::Reject)
    }

    async fn execute_health_check(&self, id: &str, action_index: Option<usize>) -> Result<ExecutionOutcome> {
        let mut state = self.state.lock();
        let check = find_check(&mut state.checks, id)?;

        if check.status != CheckStatus::Approved {
            return Err(ApiError::conflict(format!(
                "health check {} is {}, not approved",
                id, check.status
            )));
        }

        let actions: Vec<ProposedAction> = match action_index {
            Some(index) => match check.proposed_actions.get(index) {
                Some(action) => vec![action.clone()],
                None => {
                    return Err(ApiError::invalid_action(format!(
                        "health check {} has no action {}",
                        id, index
                    )))
                }
            },
            None if check.proposed_actions.is_empty() => {
                return Err(ApiError::invalid_action(format!(
                    "health check {} has no proposed actions",
                    id
                )))
            }
            None => check.proposed_actions.clone(),
        };

        check.begin_execution(Utc::now())?;
        // every action runs even after a failure; the batch status is aggregated
        let results: Vec<ExecutionResult> = actions.iter().map(|a| (self.runner)(a)).collect();
        check.finish_execution(results, Utc::now())?;

        info!(
            "Health check {} executed {} action(s): {} (mock)",
            id,
            actions.len(),
            check.status
        );
        Ok(ExecutionOutcome::from(&*check))
    }
}

/// Latest utilisation per demo host; unknown hosts read as zeros
pub fn metric_snapshot_for(hostname: &str) -> MetricSnapshot {
    let (cpu, memory, disk) = match hostname {
        "web-server-01" => (45.0, 62.0, 71.0),
        "web-server-02" => (38.0, 87.0, 45.0),
        "gpu-server-03" => (88.0, 45.0, 32.0),
        "db-server-01" => (52.0, 71.0, 95.0),
        "db-server-02" => (35.0, 58.0, 62.0),
        "cache-server-01" => (22.0, 78.0, 15.0),
        "monitor-01" => (78.0, 65.0, 48.0),
        "worker-01" => (65.0, 55.0, 38.0),
        "worker-02" => (58.0, 52.0, 35.0),
        "lb-01" => (15.0, 32.0, 12.0),
        "storage-nas-01" => (8.0, 25.0, 82.0),
        _ => return MetricSnapshot::default(),
    };
    MetricSnapshot { cpu, memory, disk }
}

#[allow(clippy::too_many_arguments)]
fn host(
    now: DateTime<Utc>,
    id: u32,
    hostname: &str,
    ip: &str,
    os: &str,
    kernel: &str,
    status: HostStatus,
    heartbeat_secs_ago: i64,
    tags: &[&str],
) -> Host {
    Host {
        id: id.to_string(),
        hostname: hostname.to_string(),
        ip_address: ip.to_string(),
        os: os.to_string(),
        kernel: kernel.to_string(),
        arch: "x86_64".to_string(),
        agent_version: "0.1.0".to_string(),
        status,
        last_heartbeat: now - Duration::seconds(heartbeat_secs_ago),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        metadata: Map::new(),
    }
}

fn seed_hosts(now: DateTime<Utc>) -> Vec<Host> {
    const UBUNTU: &str = "Ubuntu 22.04 LTS";
    const UBUNTU_KERNEL: &str = "5.15.0-91-generic";
    const ROCKY: &str = "Rocky Linux 9.3";
    const ROCKY_KERNEL: &str = "5.14.0-362.el9";
    use HostStatus::*;

    vec![
        host(now, 1, "web-server-01", "10.0.1.5", UBUNTU, UBUNTU_KERNEL, Online, 10, &["web", "production"]),
        host(now, 2, "web-server-02", "10.0.1.6", UBUNTU, UBUNTU_KERNEL, Online, 8, &["web", "production"]),
        host(now, 3, "gpu-server-03", "10.0.2.10", UBUNTU, UBUNTU_KERNEL, Critical, 120, &["gpu", "ml"]),
        host(now, 4, "db-server-01", "10.0.3.1", ROCKY, ROCKY_KERNEL, Online, 5, &["database", "production"]),
        host(now, 5, "db-server-02", "10.0.3.2", ROCKY, ROCKY_KERNEL, Online, 7, &["database", "production"]),
        host(now, 6, "cache-server-01", "10.0.4.1", "Debian 12", "6.1.0-17-amd64", Online, 3, &["cache", "redis"]),
        host(now, 7, "monitor-01", "10.0.5.1", UBUNTU, UBUNTU_KERNEL, Degraded, 45, &["monitoring"]),
        host(now, 8, "worker-01", "10.0.6.1", UBUNTU, UBUNTU_KERNEL, Online, 12, &["worker", "production"]),
        host(now, 9, "worker-02", "10.0.6.2", UBUNTU, UBUNTU_KERNEL, Online, 15, &["worker", "production"]),
        host(now, 10, "lb-01", "10.0.0.1", "Alpine 3.19", "6.6.8-0-lts", Online, 2, &["loadbalancer", "production"]),
        host(now, 11, "storage-nas-01", "10.0.7.1", "TrueNAS SCALE", "6.1.0", Online, 20, &["storage"]),
        host(now, 12, "edge-proxy-01", "10.0.0.5", UBUNTU, UBUNTU_KERNEL, Offline, 3600, &["edge", "proxy"]),
    ]
}

#[allow(clippy::too_many_arguments)]
fn alert(
    now: DateTime<Utc>,
    id: &str,
    hostname: &str,
    severity: Severity,
    metric_name: &str,
    value: f64,
    threshold: f64,
    message: &str,
    labels: &[(&str, &str)],
    status: AlertStatus,
    secs_ago: i64,
) -> Alert {
    Alert {
        id: id.to_string(),
        hostname: hostname.to_string(),
        severity,
        metric_name: metric_name.to_string(),
        value,
        threshold,
        message: message.to_string(),
        labels: labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
        status,
        created_at: now - Duration::seconds(secs_ago),
    }
}

fn seed_alerts(now: DateTime<Utc>) -> Vec<Alert> {
    use AlertStatus::{Active, Resolved};
    use Severity::{Critical, Info, Warning};

    vec![
        alert(now, "a1", "gpu-server-03", Critical, "gpu_temperature", 92.0, 85.0,
            "GPU 0 Temperature exceeds threshold", &[("gpu", "0")], Active, 120),
        alert(now, "a2", "db-server-01", Critical, "disk_usage_percent", 95.0, 90.0,
            "Disk usage critical on /data", &[("mount", "/data")], Active, 300),
        alert(now, "a3", "web-server-02", Warning, "memory_usage_percent", 87.0, 85.0,
            "Memory usage high, possible leak", &[("process", "java")], Active, 900),
        alert(now, "a4", "monitor-01", Warning, "cpu_usage", 78.0, 75.0,
            "CPU usage elevated", &[], Active, 1200),
        alert(now, "a5", "worker-01", Warning, "load_avg", 48.2, 44.8,
            "Load average exceeds threshold", &[], Active, 1800),
        alert(now, "a6", "gpu-server-03", Critical, "gpu_memory", 79.5, 75.0,
            "GPU memory utilization critical", &[("gpu", "1")], Active, 180),
        alert(now, "a7", "edge-proxy-01", Critical, "heartbeat", 0.0, 1.0,
            "Host unreachable, no heartbeat", &[], Active, 3600),
        alert(now, "a8", "cache-server-01", Info, "connections", 9500.0, 10000.0,
            "Connection count approaching limit", &[], Resolved, 7200),
    ]
}

fn action(description: &str, command: &str, risk_level: RiskLevel, expected_outcome: &str) -> ProposedAction {
    ProposedAction {
        description: description.to_string(),
        command: command.to_string(),
        risk_level,
        expected_outcome: expected_outcome.to_string(),
    }
}

fn seed_health_checks(now: DateTime<Utc>) -> Vec<HealthCheck> {
    let ago = |secs: i64| now - Duration::seconds(secs);

    vec![
        HealthCheck {
            id: "hc-1".to_string(),
            hostname: "gpu-server-03".to_string(),
            status: CheckStatus::Pending,
            severity: Severity::Critical,
            summary: "GPU 0 running hot under sustained training load".to_string(),
            details: "gpu_temperature reached 92°C against an 85°C threshold; GPU 1 memory at 79.5%."
                .to_string(),
            llm_response: "Thermals point to a throttled fan profile rather than a workload spike. \
                Confirm readings, reset the persistence daemon and cap board power until the \
                chassis fans are inspected."
                .to_string(),
            proposed_actions: vec![
                action(
                    "Capture current GPU thermal readings",
                    "nvidia-smi -q -d TEMPERATURE",
                    RiskLevel::Low,
                    "Per-GPU temperature report for the incident log",
                ),
                action(
                    "Restart the NVIDIA persistence daemon",
                    "systemctl restart nvidia-persistenced",
                    RiskLevel::Medium,
                    "Fan curve and clocks reinitialised",
                ),
                action(
                    "Cap GPU 0 power draw at 300W",
                    "nvidia-smi -i 0 -pl 300",
                    RiskLevel::Medium,
                    "Temperature settles below 85°C at reduced throughput",
                ),
            ],
            execution_results: vec![],
            created_at: ago(90),
            reviewed_at: None,
            executed_at: None,
            completed_at: None,
        },
        HealthCheck {
            id: "hc-2".to_string(),
            hostname: "db-server-01".to_string(),
            status: CheckStatus::Approved,
            severity: Severity::Critical,
            summary: "/data volume at 95% capacity".to_string(),
            details: "disk_usage_percent on /data is 95% (threshold 90%). WAL archive growth accounts \
                for most of the last 24h."
                .to_string(),
            llm_response: "Old WAL segments are already replicated. Vacuum the journal first, then \
                prune archived segments older than a week."
                .to_string(),
            proposed_actions: vec![
                action(
                    "Shrink the systemd journal",
                    "journalctl --vacuum-size=500M",
                    RiskLevel::Low,
                    "Reclaims a few GB on the root volume",
                ),
                action(
                    "Prune WAL archives older than 7 days",
                    "find /data/pg_archive -type f -mtime +7 -delete",
                    RiskLevel::High,
                    "/data usage drops below 80%",
                ),
            ],
            execution_results: vec![],
            created_at: ago(280),
            reviewed_at: Some(ago(120)),
            executed_at: None,
            completed_at: None,
        },
        HealthCheck {
            id: "hc-3".to_string(),
            hostname: "web-server-02".to_string(),
            status: CheckStatus::Completed,
            severity: Severity::Warning,
            summary: "JVM heap growth on web-server-02".to_string(),
            details: "memory_usage_percent at 87% and climbing for the java process.".to_string(),
            llm_response: "Heap usage pattern matches a known session cache leak; a rolling restart \
                of the service clears it."
                .to_string(),
            proposed_actions: vec![action(
                "Restart the application service",
                "systemctl restart webapp",
                RiskLevel::Medium,
                "Memory usage returns to baseline",
            )],
            execution_results: vec![ExecutionResult::succeeded(
                "systemctl restart webapp",
                CommandOutput {
                    stdout: String::new(),
                    stderr: String::new(),
                    exit_code: 0,
                    duration_ms: 2140,
                },
            )],
            created_at: ago(3000),
            reviewed_at: Some(ago(2700)),
            executed_at: Some(ago(2650)),
            completed_at: Some(ago(2648)),
        },
        HealthCheck {
            id: "hc-4".to_string(),
            hostname: "edge-proxy-01".to_string(),
            status: CheckStatus::Failed,
            severity: Severity::Critical,
            summary: "edge-proxy-01 stopped sending heartbeats".to_string(),
            details: "No heartbeat for 60 minutes; last seen 10.0.0.5.".to_string(),
            llm_response: "The agent is most likely wedged. Restarting it is safe; if the host is \
                unreachable, escalate to the datacenter team."
                .to_string(),
            proposed_actions: vec![action(
                "Restart the monitoring agent",
                "systemctl restart sysops-agent",
                RiskLevel::Low,
                "Heartbeats resume within a minute",
            )],
            execution_results: vec![ExecutionResult::failed(
                "systemctl restart sysops-agent",
                "ssh: connect to host 10.0.0.5 port 22: Connection timed out",
            )],
            created_at: ago(3400),
            reviewed_at: Some(ago(3300)),
            executed_at: Some(ago(3290)),
            completed_at: Some(ago(3260)),
        },
    ]
}

fn inventory_for(hostname: &str, host: Option<&Host>, now: DateTime<Utc>) -> Inventory {
    if hostname == "web-server-01" {
        return web_server_inventory(now);
    }

    let os = host.map(|h| h.os.as_str()).filter(|os| !os.is_empty());
    Inventory {
        hostname: hostname.to_string(),
        collected_at: now - Duration::minutes(5),
        hardware: Hardware {
            cpu: Some(CpuInfo {
                model: Some("Intel Xeon Silver 4314".to_string()),
                sockets: Some(1),
                cores_per_socket: Some(16),
                threads: Some(32),
                frequency_mhz: Some(2400.0),
                ..Default::default()
            }),
            memory: Some(MemoryInfo {
                total_gb: Some(128.0),
                kind: Some("DDR4-2933 ECC".to_string()),
                dimm_count: Some(8),
                ..Default::default()
            }),
            gpu: vec![],
            storage: vec![StorageDevice {
                device: Some("/dev/sda".to_string()),
                model: Some("Generic SSD".to_string()),
                size_gb: Some(960.0),
                kind: Some("SATA SSD".to_string()),
                ..Default::default()
            }],
            network: vec![nic("eth0", "10Gbps", "aa:bb:cc:00:00:01")],
            extra: Map::new(),
        },
        software: Software {
            os: Some(OsRelease {
                name: os
                    .and_then(|os| os.split_whitespace().next())
                    .unwrap_or("Linux")
                    .to_string(),
                version: os.unwrap_or("Unknown").to_string(),
                kernel: host.map(|h| h.kernel.clone()),
                extra: Map::new(),
            }),
            packages: vec![
                package("docker", "24.0.7"),
                package("sysops-agent", host.map(|h| h.agent_version.as_str()).unwrap_or("0.1.0")),
            ],
            services: vec!["sysops-agent".to_string()],
            extra: Map::new(),
        },
    }
}

fn web_server_inventory(now: DateTime<Utc>) -> Inventory {
    let nvme = |device: &str| StorageDevice {
        device: Some(device.to_string()),
        model: Some("Samsung PM9A3".to_string()),
        size_gb: Some(3840.0),
        kind: Some("NVMe SSD".to_string()),
        ..Default::default()
    };

    Inventory {
        hostname: "web-server-01".to_string(),
        collected_at: now - Duration::minutes(1),
        hardware: Hardware {
            cpu: Some(CpuInfo {
                model: Some("Intel Xeon Gold 6348".to_string()),
                sockets: Some(2),
                cores_per_socket: Some(28),
                threads: Some(112),
                frequency_mhz: Some(2600.0),
                ..Default::default()
            }),
            memory: Some(MemoryInfo {
                total_gb: Some(512.0),
                kind: Some("DDR4-3200 ECC".to_string()),
                dimm_count: Some(16),
                ..Default::default()
            }),
            gpu: vec![GpuInfo {
                model: "NVIDIA A100-80GB".to_string(),
                memory_gb: Some(80.0),
                count: Some(4),
                extra: Map::new(),
            }],
            storage: vec![nvme("/dev/nvme0n1"), nvme("/dev/nvme1n1")],
            network: vec![
                nic("eno1", "25Gbps", "aa:bb:cc:dd:ee:01"),
                nic("eno2", "25Gbps", "aa:bb:cc:dd:ee:02"),
            ],
            extra: Map::new(),
        },
        software: Software {
            os: Some(OsRelease {
                name: "Ubuntu".to_string(),
                version: "22.04 LTS".to_string(),
                kernel: Some("5.15.0-91-generic".to_string()),
                extra: Map::new(),
            }),
            packages: vec![
                package("nginx", "1.24.0"),
                package("docker", "24.0.7"),
                package("node", "20.11.0"),
                package("python3", "3.10.12"),
            ],
            services: ["nginx", "docker", "node-exporter", "sysops-agent"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extra: Map::new(),
        },
    }
}

fn nic(interface: &str, speed: &str, mac: &str) -> NetworkInterface {
    NetworkInterface {
        interface: interface.to_string(),
        speed: Some(speed.to_string()),
        mac: Some(mac.to_string()),
        extra: Map::new(),
    }
}

fn package(name: &str, version: &str) -> Package {
    Package {
        name: name.to_string(),
        version: version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_core::CheckTab;

    fn failing_on(command: &'static str) -> CommandRunner {
        Arc::new(move |action: &ProposedAction| {
            if action.command == command {
                ExecutionResult::failed(action.command.clone(), "exit status 1")
            } else {
                ExecutionResult::succeeded(action.command.clone(), CommandOutput::default())
            }
        })
    }

    #[tokio::test]
    async fn test_dataset_shape() {
        let mock = MockSource::new();
        assert_eq!(mock.hosts().await.len(), 12);
        assert_eq!(mock.alerts().await.len(), 8);
        assert_eq!(mock.health_checks(&HealthCheckQuery::default()).await.len(), 4);
    }

    #[tokio::test]
    async fn test_overview_derived_from_records() {
        let overview = MockSource::new().fleet_overview().await;
        assert_eq!(overview.total_hosts, 12);
        assert_eq!(overview.online_hosts, 9);
        assert_eq!(overview.offline_hosts, 1);
        assert_eq!(overview.degraded_hosts, 1);
        assert_eq!(overview.total_alerts_active, 7);
        assert_eq!(overview.critical_alerts, 4);
        assert!(overview.is_consistent());
    }

    #[tokio::test]
    async fn test_seeded_checks_cover_every_tab() {
        let checks = MockSource::new().health_checks(&HealthCheckQuery::default()).await;
        for tab in CheckTab::ALL {
            assert!(tab.count(&checks) > 0, "tab {} is empty", tab);
        }
    }

    #[tokio::test]
    async fn test_health_checks_filtered_by_host() {
        let mock = MockSource::new();
        let checks = mock.health_checks(&HealthCheckQuery::for_host("db-server-01")).await;
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].id, "hc-2");
    }

    #[tokio::test]
    async fn test_unknown_host_snapshot_is_zero() {
        let mock = MockSource::new();
        assert_eq!(mock.metric_snapshot("nope").await, MetricSnapshot::default());
        assert_eq!(mock.metric_snapshot("db-server-01").await.disk, 95.0);
    }

    #[tokio::test]
    async fn test_default_inventory_uses_host_os() {
        let mock = MockSource::new();
        let inv = mock.host_inventory("db-server-02").await.unwrap();
        assert_eq!(inv.hardware.cpu_label(), "Intel Xeon Silver 4314");
        let host = mock.host("db-server-02").await.unwrap();
        assert_eq!(inv.os_version(&host), "Rocky Linux 9.3");

        let detailed = mock.host_inventory("web-server-01").await.unwrap();
        assert_eq!(detailed.hardware.gpu_label(), "4× NVIDIA A100-80GB");
    }

    #[tokio::test]
    async fn test_ack_resolves_alert() {
        let mock = MockSource::new();
        mock.acknowledge_alert("a1").await;
        mock.acknowledge_alert("does-not-exist").await;
        let alerts = mock.alerts().await;
        let a1 = alerts.iter().find(|a| a.id == "a1").unwrap();
        assert_eq!(a1.status, AlertStatus::Resolved);
        assert_eq!(mock.fleet_overview().await.total_alerts_active, 6);
    }

    #[tokio::test]
    async fn test_approve_then_execute_all() {
        let mock = MockSource::new();
        mock.approve_health_check("hc-1").await.unwrap();
        let outcome = mock.execute_health_check("hc-1", None).await.unwrap();
        assert_eq!(outcome.check_id, "hc-1");
        assert_eq!(outcome.status, CheckStatus::Completed);
        assert_eq!(outcome.results.len(), 3);

        let check = mock.health_check("hc-1").await.unwrap();
        assert!(check.reviewed_at.is_some());
        assert!(check.executed_at.is_some());
        assert!(check.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_one_failure_fails_batch_but_all_run() {
        let mock = MockSource::new().with_runner(failing_on("journalctl --vacuum-size=500M"));
        let outcome = mock.execute_health_check("hc-2", None).await.unwrap();
        assert_eq!(outcome.status, CheckStatus::Failed);
        assert_eq!(outcome.results.len(), 2);
        assert!(!outcome.results[0].success);
        assert!(outcome.results[1].success);
    }

    #[tokio::test]
    async fn test_execute_single_action() {
        let mock = MockSource::new();
        let outcome = mock.execute_health_check("hc-2", Some(0)).await.unwrap();
        assert_eq!(outcome.status, CheckStatus::Completed);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].command, "journalctl --vacuum-size=500M");
    }

    #[tokio::test]
    async fn test_execute_bad_index() {
        let mock = MockSource::new();
        let err = mock.execute_health_check("hc-2", Some(9)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidAction(_)));
        let check = mock.health_check("hc-2").await.unwrap();
        assert_eq!(check.status, CheckStatus::Approved);
    }

    #[tokio::test]
    async fn test_execute_pending_conflicts() {
        let mock = MockSource::new();
        let err = mock.execute_health_check("hc-1", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_review_terminal_conflicts() {
        let mock = MockSource::new();
        assert!(matches!(
            mock.approve_health_check("hc-3").await.unwrap_err(),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            mock.reject_health_check("hc-404").await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_result_poll_reflects_state() {
        let mock = MockSource::new();
        let outcome = mock.health_check_result("hc-4").await.unwrap();
        assert_eq!(outcome.status, CheckStatus::Failed);
        assert_eq!(outcome.results.len(), 1);
        assert!(mock.health_check_result("hc-404").await.is_none());
    }
}
