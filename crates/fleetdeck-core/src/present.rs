//! Presentation helpers shared by the CLI and the TUI
//!
//! Everything here is pure: statuses map to a [`Tone`] and each front end
//! decides what colour a tone is.

use chrono::{DateTime, Utc};

use crate::types::{CheckStatus, HostStatus, RiskLevel, Severity};

/// Semantic colour class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Warning,
    Danger,
    Info,
    Muted,
    Neutral,
}

pub fn host_status_tone(status: &HostStatus) -> Tone {
    match status {
        HostStatus::Online => Tone::Good,
        HostStatus::Offline | HostStatus::Critical => Tone::Danger,
        HostStatus::Degraded => Tone::Warning,
        HostStatus::Other(_) => Tone::Neutral,
    }
}

pub fn host_status_glyph(status: &HostStatus) -> &'static str {
    match status {
        HostStatus::Online => "●",
        HostStatus::Critical => "▲",
        HostStatus::Degraded => "◆",
        HostStatus::Offline => "○",
        HostStatus::Other(_) => "●",
    }
}

pub fn severity_tone(severity: &Severity) -> Tone {
    match severity {
        Severity::Critical => Tone::Danger,
        Severity::Warning => Tone::Warning,
        Severity::Info => Tone::Info,
        Severity::Other(_) => Tone::Neutral,
    }
}

pub fn check_status_tone(status: &CheckStatus) -> Tone {
    match status {
        CheckStatus::Pending => Tone::Warning,
        CheckStatus::Approved | CheckStatus::Executing => Tone::Info,
        CheckStatus::Completed => Tone::Good,
        CheckStatus::Failed => Tone::Danger,
        CheckStatus::Rejected => Tone::Muted,
        CheckStatus::Other(_) => Tone::Neutral,
    }
}

pub fn risk_tone(risk: &RiskLevel) -> Tone {
    match risk {
        RiskLevel::Low => Tone::Good,
        RiskLevel::Medium => Tone::Warning,
        RiskLevel::High => Tone::Danger,
        RiskLevel::Other(_) => Tone::Neutral,
    }
}

/// Utilisation percentage: >= 90 danger, >= 75 warning
pub fn metric_tone(percent: f64) -> Tone {
    if percent >= 90.0 {
        Tone::Danger
    } else if percent >= 75.0 {
        Tone::Warning
    } else {
        Tone::Good
    }
}

/// Short relative time, e.g. "42s ago", "5m ago", "3h ago", "2d ago".
/// Future timestamps read as "0s ago".
pub fn time_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ts).num_seconds().max(0);
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}

/// Absolute timestamp for detail views
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Fixed-width text bar, e.g. `[██████░░░░]`
pub fn progress_bar(percent: f64, width: usize) -> String {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// One decimal place with a percent sign
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Truncate to `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}
