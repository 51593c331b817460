//! Approve and reject commands

use anyhow::Result;

use super::Context;
use crate::output::print_success_json;

pub async fn approve(ctx: &Context, id: &str) -> Result<()> {
    ctx.source.approve_health_check(id).await?;
    print_success_json::<()>(&format!("Health check {} approved", id), None);
    Ok(())
}

pub async fn reject(ctx: &Context, id: &str) -> Result<()> {
    ctx.source.reject_health_check(id).await?;
    print_success_json::<()>(&format!("Health check {} rejected", id), None);
    Ok(())
}
