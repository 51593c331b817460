//! Table and JSON output

use chrono::{DateTime, Utc};
use colored::Colorize;
use fleetdeck_core::present::{
    check_status_tone, format_percent, host_status_glyph, host_status_tone, metric_tone,
    severity_tone, time_ago, truncate,
};
use fleetdeck_core::{
    Alert, HealthCheck, Host, HourBucket, InventoryRow, MetricSnapshot, PageView, Tone,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

/// Color text by tone
pub fn paint(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Good => text.green().to_string(),
        Tone::Warning => text.yellow().to_string(),
        Tone::Danger => text.red().bold().to_string(),
        Tone::Info => text.cyan().to_string(),
        Tone::Muted => text.dimmed().to_string(),
        Tone::Neutral => text.to_string(),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

fn print_table<R: Tabled>(rows: Vec<R>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::left()))
        .to_string();
    println!("{}", table);
}

/// JSON shape of one list page
#[derive(Serialize)]
pub struct PageJson<T: Serialize> {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

impl<T: Serialize> PageJson<T> {
    pub fn new<S>(view: &PageView<'_, S>, items: Vec<T>) -> Self {
        Self {
            page: view.page,
            total_pages: view.total_pages,
            total_items: view.total_items,
            items,
        }
    }
}

/// "Page 2 of 5 (21-40 of 97)  ‹ 1 2 [3] 4 5 ›"
pub fn page_footer<T>(view: &PageView<'_, T>) -> String {
    let range = match view.item_range() {
        Some((first, last)) => format!("{}-{} of {}", first, last, view.total_items),
        None => "0 results".to_string(),
    };
    let buttons: Vec<String> = view
        .window()
        .into_iter()
        .map(|p| {
            if p == view.page {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .collect();
    format!(
        "Page {} of {} ({})  {} {} {}",
        view.page,
        view.total_pages.max(1),
        range,
        if view.has_previous() { "‹" } else { " " },
        buttons.join(" "),
        if view.has_next() { "›" } else { " " },
    )
    .trim_end()
    .to_string()
}

#[derive(Tabled)]
pub struct HostRow {
    #[tabled(rename = "status")]
    pub status: String,
    #[tabled(rename = "hostname")]
    pub hostname: String,
    #[tabled(rename = "ip")]
    pub ip: String,
    #[tabled(rename = "os")]
    pub os: String,
    #[tabled(rename = "cpu")]
    pub cpu: String,
    #[tabled(rename = "mem")]
    pub mem: String,
    #[tabled(rename = "disk")]
    pub disk: String,
    #[tabled(rename = "seen")]
    pub seen: String,
}

impl HostRow {
    pub fn new(host: &Host, snapshot: MetricSnapshot, now: DateTime<Utc>) -> Self {
        let tone = host_status_tone(&host.status);
        Self {
            status: paint(
                &format!("{} {}", host_status_glyph(&host.status), host.status),
                tone,
            ),
            hostname: host.hostname.clone(),
            ip: host.ip_address.clone(),
            os: truncate(&host.os, 24),
            cpu: paint(&format_percent(snapshot.cpu), metric_tone(snapshot.cpu)),
            mem: paint(&format_percent(snapshot.memory), metric_tone(snapshot.memory)),
            disk: paint(&format_percent(snapshot.disk), metric_tone(snapshot.disk)),
            seen: time_ago(host.last_heartbeat, now),
        }
    }
}

/// JSON host row with its latest utilisation
#[derive(Serialize)]
pub struct HostJson<'a> {
    #[serde(flatten)]
    pub host: &'a Host,
    pub metrics: MetricSnapshot,
}

pub fn print_hosts(view: &PageView<'_, Host>, snapshot: impl Fn(&Host) -> MetricSnapshot) {
    if is_json_mode() {
        let items = view
            .items
            .iter()
            .map(|h| HostJson {
                host: h,
                metrics: snapshot(h),
            })
            .collect();
        print_json(&PageJson::new(view, items));
        return;
    }

    if view.items.is_empty() {
        println!("No hosts found");
        return;
    }

    let now = Utc::now();
    let rows: Vec<HostRow> = view
        .items
        .iter()
        .map(|h| HostRow::new(h, snapshot(h), now))
        .collect();
    print_table(rows);
    println!("{}", page_footer(view));
}

#[derive(Tabled)]
pub struct AlertRow {
    #[tabled(rename = "id")]
    pub id: String,
    #[tabled(rename = "severity")]
    pub severity: String,
    #[tabled(rename = "host")]
    pub host: String,
    #[tabled(rename = "message")]
    pub message: String,
    #[tabled(rename = "value")]
    pub value: String,
    #[tabled(rename = "status")]
    pub status: String,
    #[tabled(rename = "age")]
    pub age: String,
}

impl AlertRow {
    pub fn new(alert: &Alert, now: DateTime<Utc>) -> Self {
        Self {
            id: alert.id.clone(),
            severity: paint(&alert.severity.as_str().to_uppercase(), severity_tone(&alert.severity)),
            host: alert.hostname.clone(),
            message: truncate(&alert.message, 60),
            value: format!("{} / {}", alert.value, alert.threshold),
            status: if alert.is_active() {
                paint(alert.status.as_str(), Tone::Warning)
            } else {
                paint(alert.status.as_str(), Tone::Muted)
            },
            age: time_ago(alert.created_at, now),
        }
    }
}

pub fn print_alert_table(alerts: &[&Alert]) {
    let now = Utc::now();
    let rows: Vec<AlertRow> = alerts.iter().map(|a| AlertRow::new(a, now)).collect();
    print_table(rows);
}

#[derive(Tabled)]
pub struct TimelineRow {
    #[tabled(rename = "hour")]
    pub hour: String,
    #[tabled(rename = "critical")]
    pub critical: String,
    #[tabled(rename = "warning")]
    pub warning: String,
}

impl From<&HourBucket> for TimelineRow {
    fn from(bucket: &HourBucket) -> Self {
        let count = |n: usize, tone: Tone| {
            if n == 0 {
                paint("-", Tone::Muted)
            } else {
                paint(&n.to_string(), tone)
            }
        };
        Self {
            hour: if bucket.hours_ago == 0 {
                "now".to_string()
            } else {
                format!("-{}h", bucket.hours_ago)
            },
            critical: count(bucket.critical, Tone::Danger),
            warning: count(bucket.warning, Tone::Warning),
        }
    }
}

/// Hours with at least one critical or warning alert, oldest first
pub fn print_timeline(buckets: &[HourBucket]) {
    let rows: Vec<TimelineRow> = buckets
        .iter()
        .filter(|b| b.critical + b.warning > 0)
        .map(TimelineRow::from)
        .collect();
    if rows.is_empty() {
        println!("No alerts raised in the last 24 hours");
    } else {
        print_table(rows);
    }
}

#[derive(Tabled)]
pub struct InventoryTableRow {
    #[tabled(rename = "host")]
    pub host: String,
    #[tabled(rename = "cpu")]
    pub cpu: String,
    #[tabled(rename = "threads")]
    pub threads: String,
    #[tabled(rename = "memory")]
    pub memory: String,
    #[tabled(rename = "gpu")]
    pub gpu: String,
    #[tabled(rename = "storage")]
    pub storage: String,
    #[tabled(rename = "os")]
    pub os: String,
}

impl From<&InventoryRow> for InventoryTableRow {
    fn from(row: &InventoryRow) -> Self {
        let host = paint(&row.host.hostname, host_status_tone(&row.host.status));
        match &row.inventory {
            Some(inv) => Self {
                host,
                cpu: truncate(&inv.hardware.cpu_label(), 28),
                threads: inv.hardware.cpu_threads_label(),
                memory: inv.hardware.memory_label(),
                gpu: truncate(&inv.hardware.gpu_label(), 28),
                storage: truncate(&inv.hardware.storage_label(), 36),
                os: inv.os_version(&row.host).to_string(),
            },
            None => Self {
                host,
                cpu: "N/A".to_string(),
                threads: String::new(),
                memory: "N/A".to_string(),
                gpu: "—".to_string(),
                storage: "N/A".to_string(),
                os: row.host.os.clone(),
            },
        }
    }
}

#[derive(Serialize)]
pub struct InventoryJson<'a> {
    pub host: &'a Host,
    pub inventory: Option<&'a fleetdeck_core::Inventory>,
}

pub fn print_inventory(view: &PageView<'_, InventoryRow>) {
    if is_json_mode() {
        let items = view
            .items
            .iter()
            .map(|r| InventoryJson {
                host: &r.host,
                inventory: r.inventory.as_ref(),
            })
            .collect();
        print_json(&PageJson::new(view, items));
        return;
    }

    if view.items.is_empty() {
        println!("No hosts found");
        return;
    }

    let rows: Vec<InventoryTableRow> = view.items.iter().map(|r| InventoryTableRow::from(*r)).collect();
    print_table(rows);
    println!("{}", page_footer(view));
}

#[derive(Tabled)]
pub struct CheckRow {
    #[tabled(rename = "id")]
    pub id: String,
    #[tabled(rename = "severity")]
    pub severity: String,
    #[tabled(rename = "host")]
    pub host: String,
    #[tabled(rename = "summary")]
    pub summary: String,
    #[tabled(rename = "status")]
    pub status: String,
    #[tabled(rename = "actions")]
    pub actions: usize,
    #[tabled(rename = "age")]
    pub age: String,
}

impl CheckRow {
    pub fn new(check: &HealthCheck, now: DateTime<Utc>) -> Self {
        Self {
            id: check.id.clone(),
            severity: paint(&check.severity.as_str().to_uppercase(), severity_tone(&check.severity)),
            host: check.hostname.clone(),
            summary: truncate(&check.summary, 56),
            status: paint(check.status.as_str(), check_status_tone(&check.status)),
            actions: check.proposed_actions.len(),
            age: time_ago(check.created_at, now),
        }
    }
}

pub fn print_check_table(checks: &[&HealthCheck]) {
    let now = Utc::now();
    let rows: Vec<CheckRow> = checks.iter().map(|c| CheckRow::new(c, now)).collect();
    print_table(rows);
}

/// Bold label column used by detail views
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:>12} │ {}", label.bold(), value);
}

pub fn print_rule() {
    println!("{}", "─".repeat(60));
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// JSON wrapper for write results
#[derive(Serialize)]
pub struct ResponseJson<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Print a success message in JSON format if enabled
pub fn print_success_json<T: Serialize>(message: &str, data: Option<T>) {
    if is_json_mode() {
        print_json(&ResponseJson {
            success: true,
            message: Some(message.to_string()),
            data,
        });
    } else {
        print_success(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_core::{HostStatus, ListState, HostQuery};
    use serde_json::Map;

    fn host(name: &str) -> Host {
        Host {
            id: name.to_string(),
            hostname: name.to_string(),
            ip_address: "10.0.0.1".to_string(),
            os: "Ubuntu 22.04".to_string(),
            kernel: String::new(),
            arch: String::new(),
            agent_version: String::new(),
            status: HostStatus::Online,
            last_heartbeat: Utc::now(),
            tags: Vec::new(),
            metadata: Map::new(),
        }
    }

    #[test]
    fn test_json_mode_toggle() {
        set_json_mode(false);
        assert!(!is_json_mode());

        set_json_mode(true);
        assert!(is_json_mode());

        set_json_mode(false);
        assert!(!is_json_mode());
    }

    #[test]
    fn test_page_footer_marks_current_page() {
        let hosts: Vec<Host> = (0..45).map(|i| host(&format!("h{:02}", i))).collect();
        let mut state = ListState::new(HostQuery::default());
        state.set_page(2);
        let footer = page_footer(&state.view(&hosts));
        assert!(footer.starts_with("Page 2 of 3 (21-40 of 45)"));
        assert!(footer.contains("[2]"));
        assert!(footer.contains('‹'));
        assert!(footer.contains('›'));
    }

    #[test]
    fn test_page_footer_empty() {
        let hosts: Vec<Host> = Vec::new();
        let state = ListState::new(HostQuery::default());
        assert!(page_footer(&state.view(&hosts)).contains("0 results"));
    }

    #[test]
    fn test_host_json_flattens_record() {
        let h = host("web-01");
        let json = serde_json::to_value(HostJson {
            host: &h,
            metrics: MetricSnapshot {
                cpu: 12.0,
                memory: 34.0,
                disk: 56.0,
            },
        })
        .unwrap();
        assert_eq!(json["hostname"], "web-01");
        assert_eq!(json["metrics"]["disk"], 56.0);
    }

    #[test]
    fn test_paint_neutral_is_plain() {
        assert_eq!(paint("x", Tone::Neutral), "x");
    }

    #[test]
    fn test_timeline_row_labels_hours() {
        let row = TimelineRow::from(&HourBucket { hours_ago: 5, critical: 2, warning: 0 });
        assert_eq!(row.hour, "-5h");
        assert!(row.critical.contains('2'));
        assert!(row.warning.contains('-'));

        let current = TimelineRow::from(&HourBucket::default());
        assert_eq!(current.hour, "now");
    }
}
