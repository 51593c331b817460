//! Host detail command

use anyhow::{bail, Result};
use chrono::Utc;
use colored::Colorize;
use fleetdeck_core::present::{format_timestamp, host_status_glyph, host_status_tone, time_ago};
use fleetdeck_core::{
    sort_alerts, Alert, HealthCheck, HealthCheckQuery, Host, Inventory, MetricSample,
};
use serde::Serialize;

use super::metrics::{print_stats, SeriesStats};
use super::Context;
use crate::cli::HostArgs;
use crate::output::{
    is_json_mode, paint, print_alert_table, print_check_table, print_field, print_json, print_rule,
};

#[derive(Serialize)]
struct HostDetailJson {
    host: Host,
    metric: String,
    range: &'static str,
    stats: Option<SeriesStats>,
    samples: Vec<MetricSample>,
    alerts: Vec<Alert>,
    inventory: Option<Inventory>,
    health_checks: Vec<HealthCheck>,
}

pub async fn execute(ctx: &Context, args: HostArgs) -> Result<()> {
    let Some(host) = ctx.source.host(&args.hostname).await else {
        bail!("Host not found: {}", args.hostname);
    };

    let checks_query = HealthCheckQuery::for_host(host.hostname.clone());
    let (samples, mut alerts, inventory, checks) = tokio::join!(
        ctx.source
            .host_metrics(&host.hostname, &args.metric, args.range.hours()),
        ctx.source.host_alerts(&host.hostname),
        ctx.source.host_inventory(&host.hostname),
        ctx.source.health_checks(&checks_query),
    );
    sort_alerts(&mut alerts);
    let stats = SeriesStats::from_samples(&samples);

    if is_json_mode() {
        print_json(&HostDetailJson {
            host,
            metric: args.metric,
            range: args.range.label(),
            stats,
            samples,
            alerts,
            inventory,
            health_checks: checks,
        });
        return Ok(());
    }

    print_rule();
    print_field(
        "Status",
        paint(
            &format!("{} {}", host_status_glyph(&host.status), host.status),
            host_status_tone(&host.status),
        ),
    );
    print_field("Hostname", &host.hostname);
    print_field("IP", &host.ip_address);
    print_field("OS", &host.os);
    if !host.kernel.is_empty() {
        print_field("Kernel", &host.kernel);
    }
    if !host.arch.is_empty() {
        print_field("Arch", &host.arch);
    }
    if !host.agent_version.is_empty() {
        print_field("Agent", &host.agent_version);
    }
    print_field(
        "Heartbeat",
        format!(
            "{} ({})",
            format_timestamp(&host.last_heartbeat),
            time_ago(host.last_heartbeat, Utc::now())
        ),
    );
    if !host.tags.is_empty() {
        print_field("Tags", host.tags.join(", "));
    }
    print_rule();

    println!("{} ({})", args.metric.bold(), args.range.label());
    match &stats {
        Some(stats) => print_stats(stats),
        None => println!("  no samples"),
    }
    print_rule();

    if let Some(inv) = &inventory {
        println!("{}", "Inventory".bold());
        print_field(
            "CPU",
            format!("{} {}", inv.hardware.cpu_label(), inv.hardware.cpu_threads_label()),
        );
        print_field("Memory", inv.hardware.memory_label());
        print_field("GPU", inv.hardware.gpu_label());
        print_field("Storage", inv.hardware.storage_label());
        print_field("OS version", inv.os_version(&host));
        if !inv.software.services.is_empty() {
            print_field("Services", inv.software.services.join(", "));
        }
        print_rule();
    }

    if alerts.is_empty() {
        println!("No alerts");
    } else {
        println!("{} ({})", "Alerts".bold(), alerts.len());
        print_alert_table(&alerts.iter().collect::<Vec<_>>());
    }

    if !checks.is_empty() {
        println!("{} ({})", "Health checks".bold(), checks.len());
        print_check_table(&checks.iter().collect::<Vec<_>>());
    }

    Ok(())
}
