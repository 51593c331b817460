//! Alert acknowledge command

use anyhow::Result;

use super::Context;
use crate::output::print_success_json;

/// Acknowledging is best effort and never fails
pub async fn execute(ctx: &Context, id: &str) -> Result<()> {
    ctx.source.acknowledge_alert(id).await;
    print_success_json::<()>(&format!("Alert {} acknowledged", id), None);
    Ok(())
}
