//! FleetDeck Core - Domain types, settings, list processing and presentation helpers

pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod present;
pub mod settings;
pub mod types;

pub use constants::*;
pub use error::{Error, Result};
pub use lifecycle::{CheckTab, ReviewDecision};
pub use listing::{
    alert_timeline, group_by_host, page_window, sort_alerts, total_pages, AlertQuery, HostQuery,
    HourBucket, InventoryQuery, InventoryRow, ListQuery, ListState, PageView,
};
pub use present::Tone;
pub use settings::{FieldError, SaveError, Settings, SettingsForm, Theme};
pub use types::*;
