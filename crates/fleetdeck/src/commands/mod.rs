//! Command implementations

pub mod ack;
pub mod alerts;
pub mod checks;
pub mod execute;
pub mod host;
pub mod hosts;
pub mod inventory;
pub mod metrics;
pub mod overview;
pub mod review;
pub mod settings;

use fleetdeck_api::DataSource;
use fleetdeck_core::Settings;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs for one run
pub struct Context {
    pub source: Arc<dyn DataSource>,
    pub settings: Settings,
    pub settings_path: PathBuf,
}
