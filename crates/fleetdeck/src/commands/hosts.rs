//! Host list command

use anyhow::Result;
use fleetdeck_core::{HostQuery, HostStatus, ListState, MetricSnapshot};
use std::collections::HashMap;

use super::Context;
use crate::cli::HostsArgs;
use crate::output::print_hosts;

pub async fn execute(ctx: &Context, args: HostsArgs) -> Result<()> {
    let status = args.status.as_deref().map(str::parse::<HostStatus>).transpose()?;

    let mut state = ListState::new(HostQuery::default());
    state.update(|q| {
        q.search = args.search;
        q.status = status;
    });
    state.set_page(args.page);

    let hosts = ctx.source.hosts().await;
    let view = state.view(&hosts);

    // only the visible page needs utilisation numbers
    let snapshots = futures::future::join_all(
        view.items
            .iter()
            .map(|h| ctx.source.metric_snapshot(&h.hostname)),
    )
    .await;
    let snapshots: HashMap<&str, MetricSnapshot> = view
        .items
        .iter()
        .map(|h| h.hostname.as_str())
        .zip(snapshots)
        .collect();

    print_hosts(&view, |h| {
        snapshots
            .get(h.hostname.as_str())
            .copied()
            .unwrap_or_default()
    });
    Ok(())
}
