//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetdeck")]
#[command(version, about = "Operator console for a fleet of monitored hosts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL for this run (overrides the settings file)
    #[arg(long, env = "FLEETDECK_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Serve the built-in demo fleet instead of contacting the backend
    #[arg(long, env = "FLEETDECK_OFFLINE", global = true)]
    pub offline: bool,

    /// Settings file to read and write
    #[arg(long, env = "FLEETDECK_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fleet counts and active alerts by severity
    Overview,

    /// List hosts
    Hosts(HostsArgs),

    /// Show one host: status, metrics, alerts and inventory
    Host(HostArgs),

    /// Print a metric time series for a host
    Metrics(MetricsArgs),

    /// List alerts
    Alerts(AlertsArgs),

    /// Acknowledge an alert
    Ack {
        /// Alert id
        id: String,
    },

    /// List hardware and software inventory
    Inventory(InventoryArgs),

    /// List health checks
    Checks(ChecksArgs),

    /// Show one health check with its proposed actions and results
    Check {
        /// Health check id
        id: String,
    },

    /// Approve a pending health check
    Approve {
        /// Health check id
        id: String,
    },

    /// Reject a pending health check
    Reject {
        /// Health check id
        id: String,
    },

    /// Run the proposed actions of an approved health check
    Execute(ExecuteArgs),

    /// View or change console settings
    Settings(SettingsArgs),

    /// Launch the live terminal dashboard
    Monit,
}

#[derive(Args)]
pub struct HostsArgs {
    /// Match hostname or IP address
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only hosts with this status (online, offline, degraded, critical)
    #[arg(long)]
    pub status: Option<String>,

    /// Page number (20 per page)
    #[arg(short, long, default_value = "1")]
    pub page: usize,
}

/// Time window for metric charts
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Range {
    #[value(name = "1h")]
    OneHour,
    #[value(name = "6h")]
    SixHours,
    #[value(name = "24h")]
    Day,
    #[value(name = "7d")]
    Week,
}

impl Range {
    pub fn label(self) -> &'static str {
        match self {
            Range::OneHour => "1h",
            Range::SixHours => "6h",
            Range::Day => "24h",
            Range::Week => "7d",
        }
    }

    pub fn hours(self) -> u32 {
        fleetdeck_core::range_hours(self.label())
    }
}

#[derive(Args)]
pub struct HostArgs {
    /// Hostname
    pub hostname: String,

    /// Metric to summarise
    #[arg(short, long, default_value = fleetdeck_core::DEFAULT_METRIC)]
    pub metric: String,

    /// Time window
    #[arg(short, long, value_enum, default_value = "24h")]
    pub range: Range,
}

#[derive(Args)]
pub struct MetricsArgs {
    /// Hostname
    pub hostname: String,

    /// Metric name
    #[arg(short, long, default_value = fleetdeck_core::DEFAULT_METRIC)]
    pub metric: String,

    /// Time window
    #[arg(short, long, value_enum, default_value = "24h")]
    pub range: Range,
}

#[derive(Args)]
pub struct AlertsArgs {
    /// Match hostname or message
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only alerts of this severity (critical, warning, info)
    #[arg(long)]
    pub severity: Option<String>,

    /// Only alerts with this status (active, resolved)
    #[arg(long)]
    pub status: Option<String>,

    /// Page number (20 per page)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Group the page by hostname
    #[arg(short, long)]
    pub group_by_host: bool,
}

#[derive(Args)]
pub struct InventoryArgs {
    /// Match hostname, OS or CPU model
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Page number (20 per page)
    #[arg(short, long, default_value = "1")]
    pub page: usize,
}

#[derive(Args)]
pub struct ChecksArgs {
    /// all, pending, approved or completed
    #[arg(short, long, default_value = "all")]
    pub tab: String,

    /// Only checks for this host
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Args)]
pub struct ExecuteArgs {
    /// Health check id
    pub id: String,

    /// Run only the action at this index (0-based)
    #[arg(short, long)]
    pub action: Option<usize>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Change one or more settings
    Set {
        /// Backend base URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Refresh interval in seconds (5-600)
        #[arg(long)]
        refresh: Option<String>,

        /// dark or light
        #[arg(long)]
        theme: Option<String>,
    },

    /// Edit settings interactively
    Edit,

    /// Restore defaults
    Reset,
}
