//! FleetDeck CLI - operator console for a fleet of monitored hosts

use anyhow::Result;
use clap::Parser;
use fleetdeck_api::{connect, ConsoleConfig};
use fleetdeck_core::{constants::settings_path, Settings};
use tracing::debug;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    // .env may supply FLEETDECK_* flags, so it is read before parsing
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Set JSON output mode if requested
    output::set_json_mode(cli.json);

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Log lines would corrupt the dashboard while the terminal is in raw mode
    let writer = if matches!(cli.command, Commands::Monit) {
        BoxMakeWriter::new(std::io::sink)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("fleetdeck={0},fleetdeck_api={0},fleetdeck_core={0}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(writer))
        .init();

    let settings_file = cli.settings.clone().unwrap_or_else(settings_path);
    let settings = Settings::load_or_default(&settings_file);
    debug!("Settings from {:?}: {:?}", settings_file, settings);
    let config = ConsoleConfig::from_settings(&settings)
        .with_endpoint(cli.endpoint.clone())
        .offline(cli.offline);

    let ctx = Context {
        source: connect(&config),
        settings,
        settings_path: settings_file,
    };

    // Handle commands
    let result = match cli.command {
        Commands::Overview => overview::execute(&ctx).await,
        Commands::Hosts(args) => hosts::execute(&ctx, args).await,
        Commands::Host(args) => host::execute(&ctx, args).await,
        Commands::Metrics(args) => metrics::execute(&ctx, args).await,
        Commands::Alerts(args) => alerts::execute(&ctx, args).await,
        Commands::Ack { id } => ack::execute(&ctx, &id).await,
        Commands::Inventory(args) => inventory::execute(&ctx, args).await,
        Commands::Checks(args) => checks::list(&ctx, args).await,
        Commands::Check { id } => checks::show(&ctx, &id).await,
        Commands::Approve { id } => review::approve(&ctx, &id).await,
        Commands::Reject { id } => review::reject(&ctx, &id).await,
        Commands::Execute(args) => execute::execute(&ctx, args).await,
        Commands::Settings(args) => settings::execute(&ctx, args),
        Commands::Monit => fleetdeck_tui::run(ctx.source.clone(), ctx.settings.clone())
            .await
            .map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}
