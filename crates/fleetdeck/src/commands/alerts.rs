//! Alert list command

use anyhow::Result;
use colored::Colorize;
use fleetdeck_core::{group_by_host, Alert, AlertQuery, AlertStatus, ListState, Severity};
use serde::Serialize;

use super::Context;
use crate::cli::AlertsArgs;
use crate::output::{is_json_mode, page_footer, print_alert_table, print_json, PageJson};

#[derive(Serialize)]
struct AlertGroupJson<'a> {
    hostname: String,
    alerts: Vec<&'a Alert>,
}

pub async fn execute(ctx: &Context, args: AlertsArgs) -> Result<()> {
    let severity = args.severity.as_deref().map(str::parse::<Severity>).transpose()?;
    let status = args.status.as_deref().map(str::parse::<AlertStatus>).transpose()?;

    let mut state = ListState::new(AlertQuery::default());
    state.update(|q| {
        q.search = args.search;
        q.severity = severity;
        q.status = status;
    });
    state.set_page(args.page);

    let alerts = ctx.source.alerts().await;
    let view = state.view(&alerts);

    if is_json_mode() {
        if args.group_by_host {
            let groups: Vec<AlertGroupJson> = group_by_host(&view.items)
                .into_iter()
                .map(|(hostname, alerts)| AlertGroupJson { hostname, alerts })
                .collect();
            print_json(&PageJson::new(&view, groups));
        } else {
            print_json(&PageJson::new(&view, view.items.clone()));
        }
        return Ok(());
    }

    if view.items.is_empty() {
        println!("No alerts found");
        return Ok(());
    }

    if args.group_by_host {
        for (hostname, group) in group_by_host(&view.items) {
            println!("{} ({})", hostname.bold(), group.len());
            print_alert_table(&group);
        }
    } else {
        print_alert_table(&view.items);
    }
    println!("{}", page_footer(&view));
    Ok(())
}
