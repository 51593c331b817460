//! Fleet overview command

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use fleetdeck_core::present::{progress_bar, severity_tone};
use fleetdeck_core::{alert_timeline, sort_alerts, FleetOverview, HourBucket, Severity};
use serde::Serialize;

use super::Context;
use crate::output::{is_json_mode, paint, print_alert_table, print_json, print_timeline};

/// Active alert counts per severity
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn tally<'a>(severities: impl IntoIterator<Item = &'a Severity>) -> Self {
        let mut counts = Self::default();
        for severity in severities {
            match severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
                Severity::Other(_) => {}
            }
        }
        counts
    }
}

#[derive(Serialize)]
struct OverviewJson {
    overview: FleetOverview,
    active_by_severity: SeverityCounts,
    timeline: Vec<HourBucket>,
}

pub async fn execute(ctx: &Context) -> Result<()> {
    let (overview, mut alerts) = tokio::join!(ctx.source.fleet_overview(), ctx.source.alerts());
    let timeline = alert_timeline(&alerts, Utc::now());
    alerts.retain(|a| a.is_active());
    sort_alerts(&mut alerts);
    let counts = SeverityCounts::tally(alerts.iter().map(|a| &a.severity));

    if is_json_mode() {
        print_json(&OverviewJson {
            overview,
            active_by_severity: counts,
            timeline,
        });
        return Ok(());
    }

    let online_pct = if overview.total_hosts == 0 {
        0.0
    } else {
        overview.online_hosts as f64 / overview.total_hosts as f64 * 100.0
    };

    println!();
    println!("{} ({})", "Fleet Overview".bold(), ctx.source.name());
    println!("{}", "=".repeat(40));
    println!(
        "Hosts: {}  {} online  {} degraded  {} offline",
        overview.total_hosts.to_string().bold(),
        overview.online_hosts.to_string().green(),
        overview.degraded_hosts.to_string().yellow(),
        overview.offline_hosts.to_string().red(),
    );
    println!("Online  {} {:.0}%", progress_bar(online_pct, 30), online_pct);
    println!(
        "Active alerts: {} ({} critical)",
        overview.total_alerts_active.to_string().bold(),
        overview.critical_alerts.to_string().red()
    );
    println!(
        "  {}  {}  {}",
        paint(&format!("{} critical", counts.critical), severity_tone(&Severity::Critical)),
        paint(&format!("{} warning", counts.warning), severity_tone(&Severity::Warning)),
        paint(&format!("{} info", counts.info), severity_tone(&Severity::Info)),
    );
    println!();

    println!("{}", "Alerts by hour".bold());
    print_timeline(&timeline);
    println!();

    if alerts.is_empty() {
        println!("No active alerts");
    } else {
        let recent: Vec<_> = alerts.iter().take(10).collect();
        print_alert_table(&recent);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_ignores_unknown_severity() {
        let severities = [
            Severity::Critical,
            Severity::Warning,
            Severity::Critical,
            Severity::Other("notice".to_string()),
        ];
        assert_eq!(
            SeverityCounts::tally(severities.iter()),
            SeverityCounts {
                critical: 2,
                warning: 1,
                info: 0
            }
        );
    }
}
