//! Core types for FleetDeck

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Declares a closed status enum that still accepts values it does not know.
///
/// Known values map to unit variants; anything else is kept verbatim in
/// `Other` so records from a newer backend still deserialize and render.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A value this console does not recognise
            Other(String),
        }

        impl $name {
            /// Every recognised wire value, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.to_lowercase().as_str() {
                    $($text => $name::$variant,)+
                    _ => $name::Other(s),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match $name::from(s.to_string()) {
                    $name::Other(raw) => Err(Error::invalid(format!(
                        "'{}' is not a valid {} (expected one of: {})",
                        raw,
                        stringify!($name),
                        $name::VALUES.join(", ")
                    ))),
                    known => Ok(known),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Host status reported by the agent heartbeat
    HostStatus {
        Online => "online",
        Offline => "offline",
        Degraded => "degraded",
        Critical => "critical",
    }
}

wire_enum! {
    /// Alert and health check severity
    Severity {
        Critical => "critical",
        Warning => "warning",
        Info => "info",
    }
}

wire_enum! {
    /// Alert status; alerts only ever move from active to resolved
    AlertStatus {
        Active => "active",
        Resolved => "resolved",
    }
}

wire_enum! {
    /// Health check lifecycle status
    CheckStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Executing => "executing",
        Completed => "completed",
        Failed => "failed",
    }
}

wire_enum! {
    /// Declared risk of a proposed remediation command
    RiskLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Severity {
    /// Sort rank used by alert lists: critical first, unknown values last
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Other(_) => 3,
        }
    }
}

/// Hostnames and record ids are interpolated into request paths
static PATH_SEGMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._:-]+$").expect("Invalid path segment regex"));

/// Whether a hostname or id can be placed in a URL path as-is.
/// Rejects empty values, `..`, slashes and anything needing escaping.
pub fn is_valid_path_segment(value: &str) -> bool {
    value != "." && value != ".." && PATH_SEGMENT_REGEX.is_match(value)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Number(i64),
    Text(String),
}

/// Accept record ids sent either as JSON strings or numbers
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match IdInput::deserialize(deserializer)? {
        IdInput::Number(n) => Ok(n.to_string()),
        IdInput::Text(s) => Ok(s),
    }
}

/// Treat anything that is not a JSON array (null, object, missing) as empty
fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(DeError::custom),
        _ => Ok(Vec::new()),
    }
}

/// A monitored machine. Identity is the hostname.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub hostname: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub kernel: String,
    #[serde(default)]
    pub arch: String,
    #[serde(default)]
    pub agent_version: String,
    pub status: HostStatus,
    pub last_heartbeat: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form agent metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// One point of a metric time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub time: DateTime<Utc>,
    pub hostname: String,
    pub metric_name: String,
    pub value: f64,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// Latest cpu/memory/disk utilisation for a host, in percent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub hostname: String,
    pub severity: Severity,
    pub metric_name: String,
    pub value: f64,
    pub threshold: f64,
    pub message: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }
}

/// Aggregate fleet counts shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FleetOverview {
    pub total_hosts: u32,
    pub online_hosts: u32,
    pub offline_hosts: u32,
    pub degraded_hosts: u32,
    pub total_alerts_active: u32,
    pub critical_alerts: u32,
}

impl FleetOverview {
    /// Derive the overview from raw host and alert records.
    /// Hosts in `critical` status count toward the total only.
    pub fn from_records(hosts: &[Host], alerts: &[Alert]) -> Self {
        let count_hosts = |status: HostStatus| hosts.iter().filter(|h| h.status == status).count() as u32;
        let active = alerts.iter().filter(|a| a.is_active());

        Self {
            total_hosts: hosts.len() as u32,
            online_hosts: count_hosts(HostStatus::Online),
            offline_hosts: count_hosts(HostStatus::Offline),
            degraded_hosts: count_hosts(HostStatus::Degraded),
            total_alerts_active: active.clone().count() as u32,
            critical_alerts: active.filter(|a| a.severity == Severity::Critical).count() as u32,
        }
    }

    /// online + offline + degraded never exceeds the total
    pub fn is_consistent(&self) -> bool {
        self.online_hosts + self.offline_hosts + self.degraded_hosts <= self.total_hosts
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CpuInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sockets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores_per_socket: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_mhz: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimm_count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemoryInfo {
    /// Installed memory in GiB, from whichever field the agent reported
    pub fn size_gb(&self) -> Option<f64> {
        self.total_gb
            .or_else(|| self.total_bytes.map(|b| b as f64 / 1_073_741_824.0))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GpuInfo {
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageDevice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StorageDevice {
    pub fn size_gb(&self) -> f64 {
        self.size_gb
            .unwrap_or_else(|| self.size_bytes.unwrap_or(0) as f64 / 1_073_741_824.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(default)]
    pub interface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Hardware section of an inventory snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hardware {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryInfo>,
    #[serde(default)]
    pub gpu: Vec<GpuInfo>,
    #[serde(default, alias = "disks")]
    pub storage: Vec<StorageDevice>,
    #[serde(default)]
    pub network: Vec<NetworkInterface>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hardware {
    /// "Intel Xeon Gold 6348" or the arch when no model is known
    pub fn cpu_label(&self) -> String {
        self.cpu
            .as_ref()
            .and_then(|c| c.model.clone().or_else(|| c.arch.clone()))
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// "112T" when threads are known, "16C" for cores, empty otherwise
    pub fn cpu_threads_label(&self) -> String {
        match &self.cpu {
            Some(CpuInfo { threads: Some(t), .. }) => format!("{}T", t),
            Some(CpuInfo { cores: Some(c), .. }) => format!("{}C", c),
            _ => String::new(),
        }
    }

    pub fn memory_label(&self) -> String {
        match self.memory.as_ref().and_then(|m| m.size_gb()) {
            Some(gb) if gb.fract() == 0.0 => format!("{} GB", gb),
            Some(gb) => format!("{:.1} GB", gb),
            None => "N/A".to_string(),
        }
    }

    pub fn gpu_label(&self) -> String {
        if self.gpu.is_empty() {
            return "—".to_string();
        }
        self.gpu
            .iter()
            .map(|g| match g.count {
                Some(n) => format!("{}× {}", n, g.model),
                None => g.model.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// First three non-empty devices, e.g. "3840GB NVMe SSD, 3840GB NVMe SSD"
    pub fn storage_label(&self) -> String {
        let devices: Vec<String> = self
            .storage
            .iter()
            .filter(|s| s.size_gb() > 0.0)
            .take(3)
            .map(|s| match &s.kind {
                Some(kind) => format!("{:.0}GB {}", s.size_gb(), kind),
                None => format!("{:.0}GB", s.size_gb()),
            })
            .collect();
        if devices.is_empty() {
            "N/A".to_string()
        } else {
            devices.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OsRelease {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Software section of an inventory snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Software {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRelease>,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Latest inventory snapshot for a host; a newer one replaces it entirely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub hostname: String,
    pub collected_at: DateTime<Utc>,
    #[serde(default)]
    pub hardware: Hardware,
    #[serde(default)]
    pub software: Software,
}

impl Inventory {
    /// OS version from the snapshot, falling back to the host record
    pub fn os_version<'a>(&'a self, host: &'a Host) -> &'a str {
        self.software
            .os
            .as_ref()
            .map(|os| os.version.as_str())
            .filter(|v| !v.is_empty())
            .unwrap_or(host.os.as_str())
    }
}

/// One candidate remediation command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedAction {
    pub description: String,
    pub command: String,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub expected_outcome: String,
}

/// Captured output of a command run on the host
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandOutput {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    pub exit_code: i32,
    #[serde(default)]
    pub duration_ms: u64,
}

/// Outcome of running one proposed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

impl ExecutionResult {
    pub fn succeeded(command: impl Into<String>, output: CommandOutput) -> Self {
        Self {
            command: command.into(),
            result: Some(output),
            error: None,
            success: true,
        }
    }

    pub fn failed(command: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            result: None,
            error: Some(error.into()),
            success: false,
        }
    }
}

/// A backend-generated diagnostic finding with proposed remediation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub hostname: String,
    pub status: CheckStatus,
    pub severity: Severity,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub llm_response: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub proposed_actions: Vec<ProposedAction>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub execution_results: Vec<ExecutionResult>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response body of an execute call or a result poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Some backends omit the id; callers fill it from the request
    #[serde(default, alias = "id", deserialize_with = "deserialize_id")]
    pub check_id: String,
    pub status: CheckStatus,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub results: Vec<ExecutionResult>,
}

impl From<&HealthCheck> for ExecutionOutcome {
    fn from(check: &HealthCheck) -> Self {
        Self {
            check_id: check.id.clone(),
            status: check.status.clone(),
            results: check.execution_results.clone(),
        }
    }
}

/// Filters for the health check listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthCheckQuery {
    pub hostname: Option<String>,
    pub limit: Option<usize>,
}

impl HealthCheckQuery {
    pub fn for_host(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// "?hostname=web-01&limit=10", or an empty string when unfiltered
    pub fn to_query_string(&self) -> String {
        let mut params = Vec::new();
        if let Some(hostname) = &self.hostname {
            params.push(format!("hostname={}", hostname));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }

    pub fn matches(&self, check: &HealthCheck) -> bool {
        self.hostname
            .as_deref()
            .map_or(true, |h| check.hostname == h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_status_from_str() {
        assert_eq!("online".parse::<HostStatus>().unwrap(), HostStatus::Online);
        assert_eq!("DEGRADED".parse::<HostStatus>().unwrap(), HostStatus::Degraded);
        assert!("rebooting".parse::<HostStatus>().is_err());
    }

    #[test]
    fn test_unknown_status_round_trips_raw_value() {
        let status: CheckStatus = serde_json::from_value(json!("queued")).unwrap();
        assert_eq!(status, CheckStatus::Other("queued".to_string()));
        assert!(!status.is_known());
        assert_eq!(status.to_string(), "queued");
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("queued"));
    }

    #[test]
    fn test_severity_rank() {
        assert!(Severity::Critical.rank() < Severity::Warning.rank());
        assert!(Severity::Warning.rank() < Severity::Info.rank());
        assert!(Severity::Info.rank() < Severity::Other("debug".into()).rank());
    }

    #[test]
    fn test_path_segment_validation() {
        assert!(is_valid_path_segment("web-server-01"));
        assert!(is_valid_path_segment("hc-1"));
        assert!(is_valid_path_segment("10.0.1.5"));
        assert!(!is_valid_path_segment(""));
        assert!(!is_valid_path_segment(".."));
        assert!(!is_valid_path_segment("a/b"));
        assert!(!is_valid_path_segment("web 01"));
    }

    #[test]
    fn test_host_accepts_numeric_id() {
        let host: Host = serde_json::from_value(json!({
            "id": 7,
            "hostname": "lb-01",
            "ip_address": "10.0.0.1",
            "status": "online",
            "last_heartbeat": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(host.id, "7");
        assert!(host.tags.is_empty());
        assert!(host.metadata.is_empty());
    }

    #[test]
    fn test_fleet_overview_from_records() {
        let now = Utc::now();
        let host = |name: &str, status: HostStatus| Host {
            id: name.to_string(),
            hostname: name.to_string(),
            ip_address: String::new(),
            os: String::new(),
            kernel: String::new(),
            arch: String::new(),
            agent_version: String::new(),
            status,
            last_heartbeat: now,
            tags: vec![],
            metadata: Map::new(),
        };
        let hosts = vec![
            host("a", HostStatus::Online),
            host("b", HostStatus::Offline),
            host("c", HostStatus::Critical),
            host("d", HostStatus::Degraded),
        ];
        let overview = FleetOverview::from_records(&hosts, &[]);
        assert_eq!(overview.total_hosts, 4);
        assert_eq!(overview.online_hosts, 1);
        assert_eq!(overview.offline_hosts, 1);
        assert_eq!(overview.degraded_hosts, 1);
        assert!(overview.is_consistent());
    }

    #[test]
    fn test_inventory_structured_with_extras() {
        let inv: Inventory = serde_json::from_value(json!({
            "hostname": "gpu-01",
            "collected_at": "2024-01-01T00:00:00Z",
            "hardware": {
                "cpu": { "model": "AMD EPYC 7763", "threads": 128, "microcode": "0xa001173" },
                "memory": { "total_bytes": 549755813888u64, "type": "DDR4" },
                "disks": [{ "size_bytes": 1099511627776u64 }],
                "gpu": [{ "model": "NVIDIA H100", "count": 8 }],
                "bmc": { "vendor": "ASPEED" }
            },
            "software": { "packages": [{ "name": "docker", "version": "24.0.7" }] }
        }))
        .unwrap();

        let cpu = inv.hardware.cpu.as_ref().unwrap();
        assert_eq!(cpu.extra.get("microcode"), Some(&json!("0xa001173")));
        assert_eq!(inv.hardware.storage.len(), 1);
        assert!(inv.hardware.extra.contains_key("bmc"));
        assert_eq!(inv.hardware.cpu_threads_label(), "128T");
        assert_eq!(inv.hardware.memory_label(), "512 GB");
        assert_eq!(inv.hardware.gpu_label(), "8× NVIDIA H100");
        assert_eq!(inv.hardware.storage_label(), "1024GB");
    }

    #[test]
    fn test_empty_hardware_labels() {
        let hw = Hardware::default();
        assert_eq!(hw.cpu_label(), "N/A");
        assert_eq!(hw.cpu_threads_label(), "");
        assert_eq!(hw.memory_label(), "N/A");
        assert_eq!(hw.gpu_label(), "—");
        assert_eq!(hw.storage_label(), "N/A");
    }

    #[test]
    fn test_health_check_tolerates_non_array_actions() {
        let check: HealthCheck = serde_json::from_value(json!({
            "id": "hc1",
            "hostname": "db-01",
            "status": "pending",
            "severity": "warning",
            "proposed_actions": null,
            "execution_results": {},
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(check.proposed_actions.is_empty());
        assert!(check.execution_results.is_empty());
        assert!(check.reviewed_at.is_none());
    }

    #[test]
    fn test_execution_result_constructors() {
        let ok = ExecutionResult::succeeded("uptime", CommandOutput::default());
        assert!(ok.success && ok.result.is_some() && ok.error.is_none());

        let err = ExecutionResult::failed("false", "exit status 1");
        assert!(!err.success && err.result.is_none() && err.error.is_some());
    }

    #[test]
    fn test_health_check_query_string() {
        assert_eq!(HealthCheckQuery::default().to_query_string(), "");
        assert_eq!(
            HealthCheckQuery::for_host("web-01").with_limit(10).to_query_string(),
            "?hostname=web-01&limit=10"
        );
    }
}
