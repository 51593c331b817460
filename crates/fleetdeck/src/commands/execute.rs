//! Health check execution command

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use fleetdeck_core::{CheckStatus, HealthCheck};

use super::checks::print_results;
use super::Context;
use crate::cli::ExecuteArgs;
use crate::output::{is_json_mode, print_info, print_json, print_success};

/// Which commands an execute request will run
fn planned_commands(check: &HealthCheck, action: Option<usize>) -> Result<Vec<String>> {
    match action {
        Some(index) => match check.proposed_actions.get(index) {
            Some(a) => Ok(vec![a.command.clone()]),
            None => bail!(
                "Health check {} has {} action(s); index {} is out of range",
                check.id,
                check.proposed_actions.len(),
                index
            ),
        },
        None => Ok(check.proposed_actions.iter().map(|a| a.command.clone()).collect()),
    }
}

fn confirm(commands: &[String]) -> Result<bool> {
    println!("The following will run:");
    for command in commands {
        println!("  $ {}", command);
    }
    Confirm::new()
        .with_prompt("Execute now?")
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

pub async fn execute(ctx: &Context, args: ExecuteArgs) -> Result<()> {
    if !args.yes {
        if !atty::is(atty::Stream::Stdin) {
            bail!("Refusing to execute without --yes when stdin is not a terminal");
        }
        let Some(check) = ctx.source.health_check(&args.id).await else {
            bail!("Health check not found: {}", args.id);
        };
        let commands = planned_commands(&check, args.action)?;
        if !confirm(&commands)? {
            print_info("Cancelled");
            return Ok(());
        }
    }

    let outcome = ctx
        .source
        .execute_health_check(&args.id, args.action)
        .await?;

    let passed = outcome.results.iter().filter(|r| r.success).count();
    let summary = format!(
        "Health check {} {}: {}/{} action(s) succeeded",
        outcome.check_id,
        outcome.status,
        passed,
        outcome.results.len()
    );

    if is_json_mode() {
        print_json(&outcome);
    } else {
        print_results(&outcome.results);
    }

    if outcome.status == CheckStatus::Failed {
        bail!(summary);
    }
    if !is_json_mode() {
        print_success(&summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_api::{DataSource, MockSource};

    #[tokio::test]
    async fn test_planned_commands() {
        let mock = MockSource::new();
        let check = mock.health_check("hc-2").await.unwrap();

        let all = planned_commands(&check, None).unwrap();
        assert_eq!(all.len(), check.proposed_actions.len());

        let one = planned_commands(&check, Some(0)).unwrap();
        assert_eq!(one, vec![check.proposed_actions[0].command.clone()]);

        assert!(planned_commands(&check, Some(99)).is_err());
    }
}
