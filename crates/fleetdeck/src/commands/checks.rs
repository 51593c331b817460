//! Health check list and detail commands

use anyhow::{bail, Result};
use chrono::Utc;
use colored::Colorize;
use fleetdeck_core::present::{
    check_status_tone, format_timestamp, risk_tone, severity_tone, time_ago,
};
use fleetdeck_core::{CheckTab, ExecutionResult, HealthCheck, HealthCheckQuery};
use serde::Serialize;

use super::Context;
use crate::cli::ChecksArgs;
use crate::output::{
    is_json_mode, paint, print_check_table, print_field, print_json, print_rule,
};

#[derive(Serialize)]
struct ChecksJson<'a> {
    tab: &'static str,
    counts: Vec<(&'static str, usize)>,
    items: Vec<&'a HealthCheck>,
}

/// "all (4)  [pending (1)]  approved (1)  completed (2)"
pub fn tab_bar(checks: &[HealthCheck], active: CheckTab) -> String {
    CheckTab::ALL
        .iter()
        .map(|tab| {
            let label = format!("{} ({})", tab.as_str(), tab.count(checks));
            if *tab == active {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub async fn list(ctx: &Context, args: ChecksArgs) -> Result<()> {
    let tab: CheckTab = args.tab.parse()?;
    let query = match args.host {
        Some(host) => HealthCheckQuery::for_host(host),
        None => HealthCheckQuery::default(),
    };

    let checks = ctx.source.health_checks(&query).await;
    let visible = tab.filter(&checks);

    if is_json_mode() {
        print_json(&ChecksJson {
            tab: tab.as_str(),
            counts: CheckTab::ALL
                .iter()
                .map(|t| (t.as_str(), t.count(&checks)))
                .collect(),
            items: visible,
        });
        return Ok(());
    }

    println!("{}", tab_bar(&checks, tab));
    if visible.is_empty() {
        println!("No health checks");
    } else {
        print_check_table(&visible);
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: &str) -> Result<()> {
    let Some(check) = ctx.source.health_check(id).await else {
        bail!("Health check not found: {}", id);
    };

    // older backends only return results from the result endpoint
    let results = if check.execution_results.is_empty() && check.status.is_terminal() {
        ctx.source
            .health_check_result(id)
            .await
            .map(|outcome| outcome.results)
            .unwrap_or_default()
    } else {
        check.execution_results.clone()
    };

    if is_json_mode() {
        let mut check = check;
        check.execution_results = results;
        print_json(&check);
        return Ok(());
    }

    print_check_detail(&check, &results);
    Ok(())
}

pub fn print_check_detail(check: &HealthCheck, results: &[ExecutionResult]) {
    let now = Utc::now();
    print_rule();
    print_field("ID", &check.id);
    print_field("Host", &check.hostname);
    print_field(
        "Severity",
        paint(check.severity.as_str(), severity_tone(&check.severity)),
    );
    print_field(
        "Status",
        paint(check.status.as_str(), check_status_tone(&check.status)),
    );
    print_field(
        "Created",
        format!("{} ({})", format_timestamp(&check.created_at), time_ago(check.created_at, now)),
    );
    if let Some(at) = &check.reviewed_at {
        print_field("Reviewed", format_timestamp(at));
    }
    if let Some(at) = &check.executed_at {
        print_field("Executed", format_timestamp(at));
    }
    if let Some(at) = &check.completed_at {
        print_field("Completed", format_timestamp(at));
    }
    print_rule();

    println!("{}", check.summary.bold());
    if !check.details.is_empty() {
        println!("{}", check.details);
    }
    if !check.llm_response.is_empty() {
        println!();
        println!("{}", check.llm_response.cyan());
    }

    if !check.proposed_actions.is_empty() {
        println!();
        println!("{}", "Proposed actions".bold());
        for (i, action) in check.proposed_actions.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i,
                action.description,
                paint(&format!("[{} risk]", action.risk_level), risk_tone(&action.risk_level))
            );
            println!("     $ {}", action.command.green());
            if !action.expected_outcome.is_empty() {
                println!("     → {}", action.expected_outcome.dimmed());
            }
        }
    }

    if !results.is_empty() {
        println!();
        println!("{}", "Execution results".bold());
        print_results(results);
    }
    print_rule();
}

pub fn print_results(results: &[ExecutionResult]) {
    for result in results {
        let marker = if result.success {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("  {} {}", marker, result.command);
        if let Some(out) = &result.result {
            println!("     exit {} in {}ms", out.exit_code, out.duration_ms);
            for line in out.stdout.lines() {
                println!("     │ {}", line);
            }
            for line in out.stderr.lines() {
                println!("     │ {}", line.red());
            }
        }
        if let Some(error) = &result.error {
            println!("     {}", error.red());
        }
    }
}
