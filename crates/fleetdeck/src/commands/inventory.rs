//! Inventory list command

use anyhow::Result;
use fleetdeck_api::fetch_inventory_rows;
use fleetdeck_core::{InventoryQuery, ListState};

use super::Context;
use crate::cli::InventoryArgs;
use crate::output::print_inventory;

pub async fn execute(ctx: &Context, args: InventoryArgs) -> Result<()> {
    let mut state = ListState::new(InventoryQuery::default());
    state.update(|q| q.search = args.search);
    state.set_page(args.page);

    let rows = fetch_inventory_rows(ctx.source.as_ref()).await;
    print_inventory(&state.view(&rows));
    Ok(())
}
