//! Rendering

use chrono::Utc;
use fleetdeck_core::present::{
    check_status_tone, format_percent, host_status_glyph, host_status_tone, metric_tone,
    risk_tone, severity_tone, time_ago, truncate,
};
use fleetdeck_core::{sort_alerts, Severity, Theme, Tone};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::app::{App, View, WriteAction};

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Good => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Danger => Color::Red,
        Tone::Info => Color::Cyan,
        Tone::Muted => Color::DarkGray,
        Tone::Neutral => Color::Gray,
    }
}

fn toned(text: impl Into<String>, tone: Tone) -> Cell<'static> {
    Cell::from(text.into()).style(Style::default().fg(tone_color(tone)))
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(
        cells
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
    )
    .height(1)
    .bottom_margin(1)
}

fn highlight(app: &App) -> Style {
    match app.theme {
        Theme::Dark => Style::default().bg(Color::DarkGray),
        Theme::Light => Style::default().bg(Color::Gray).fg(Color::Black),
    }
}

fn row_style(app: &App, index: usize) -> Style {
    if index == app.selected {
        highlight(app)
    } else {
        Style::default()
    }
}

fn loading(f: &mut Frame, area: Rect, title: &str) {
    let paragraph = Paragraph::new("Loading…")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);
}

/// "page 2/5 · 21-40 of 97"
fn page_label(page: usize, total_pages: usize, range: Option<(usize, usize)>, total: usize) -> String {
    match range {
        Some((first, last)) => format!(
            "page {}/{} · {}-{} of {}",
            page,
            total_pages.max(1),
            first,
            last,
            total
        ),
        None => "no matches".to_string(),
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Help / status bar
        ])
        .split(f.size());

    let titles: Vec<String> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{} {}", i + 1, v.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("FleetDeck ({})", app.source_name)),
        )
        .select(app.view.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    if !app.loaded.contains(&app.view) {
        loading(f, chunks[1], app.view.title());
    } else {
        match app.view {
            View::Dashboard => render_dashboard(f, app, chunks[1]),
            View::Hosts => render_hosts(f, app, chunks[1]),
            View::Alerts => render_alerts(f, app, chunks[1]),
            View::Inventory => render_inventory(f, app, chunks[1]),
            View::HealthChecks => render_checks(f, app, chunks[1]),
        }
    }

    render_footer(f, app, chunks[2]);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(search) = app.search_input() {
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(search),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    } else if let Some(status) = &app.status {
        let color = if status.is_error { Color::Red } else { Color::Green };
        Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
    } else {
        let help = match app.view {
            View::Dashboard => "Tab/1-5: Switch | r: Refresh | q: Quit",
            View::Hosts => "↑/↓: Select | /: Search | f: Status | n/p: Page | q: Quit",
            View::Alerts => {
                "↑/↓: Select | /: Search | f: Severity | s: Status | g: Group | a: Ack | n/p: Page | q: Quit"
            }
            View::Inventory => "↑/↓: Select | /: Search | n/p: Page | q: Quit",
            View::HealthChecks => "↑/↓: Select | f: Tab | y: Approve | x: Reject | e: Execute all | q: Quit",
        };
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))
    };
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Counts
            Constraint::Length(3), // Availability
            Constraint::Min(5),    // Recent alerts
        ])
        .split(area);

    let o = &app.overview;
    let active: Vec<_> = app.alerts.iter().filter(|a| a.is_active()).collect();
    let by_severity = |s: Severity| active.iter().filter(|a| a.severity == s).count();

    let counts = vec![
        Line::from(vec![
            Span::raw("Hosts: "),
            Span::styled(o.total_hosts.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   Online: "),
            Span::styled(o.online_hosts.to_string(), Style::default().fg(Color::Green)),
            Span::raw("   Degraded: "),
            Span::styled(o.degraded_hosts.to_string(), Style::default().fg(Color::Yellow)),
            Span::raw("   Offline: "),
            Span::styled(o.offline_hosts.to_string(), Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::raw("Active alerts: "),
            Span::styled(o.total_alerts_active.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   Critical: "),
            Span::styled(o.critical_alerts.to_string(), Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::raw("By severity: "),
            Span::styled(format!("{} critical", by_severity(Severity::Critical)), Style::default().fg(Color::Red)),
            Span::raw(" · "),
            Span::styled(format!("{} warning", by_severity(Severity::Warning)), Style::default().fg(Color::Yellow)),
            Span::raw(" · "),
            Span::styled(format!("{} info", by_severity(Severity::Info)), Style::default().fg(Color::Cyan)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(counts).block(Block::default().borders(Borders::ALL).title("Fleet")),
        chunks[0],
    );

    let online_pct = if o.total_hosts == 0 {
        0.0
    } else {
        o.online_hosts as f64 / o.total_hosts as f64 * 100.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Online"))
        .gauge_style(Style::default().fg(tone_color(metric_tone(100.0 - online_pct))))
        .percent(online_pct.round().clamp(0.0, 100.0) as u16)
        .label(format_percent(online_pct));
    f.render_widget(gauge, chunks[1]);

    let mut recent: Vec<_> = active.into_iter().cloned().collect();
    sort_alerts(&mut recent);
    let now = Utc::now();
    let rows: Vec<Row> = recent
        .iter()
        .take(chunks[2].height.saturating_sub(4) as usize)
        .map(|a| {
            Row::new(vec![
                toned(a.severity.as_str().to_uppercase(), severity_tone(&a.severity)),
                Cell::from(a.hostname.clone()),
                Cell::from(a.message.clone()),
                Cell::from(time_ago(a.created_at, now)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(18),
            Constraint::Min(20),
            Constraint::Length(8),
        ],
    )
    .header(header(&["Severity", "Host", "Message", "Age"]))
    .block(Block::default().borders(Borders::ALL).title("Active alerts"));
    f.render_widget(table, chunks[2]);
}

fn render_hosts(f: &mut Frame, app: &App, area: Rect) {
    let page = app.host_page();
    let now = Utc::now();

    let rows: Vec<Row> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let snap = app.snapshots.get(&h.hostname).copied().unwrap_or_default();
            let tone = host_status_tone(&h.status);
            Row::new(vec![
                toned(format!("{} {}", host_status_glyph(&h.status), h.status), tone),
                Cell::from(h.hostname.clone()),
                Cell::from(h.ip_address.clone()),
                Cell::from(truncate(&h.os, 18)),
                toned(format_percent(snap.cpu), metric_tone(snap.cpu)),
                toned(format_percent(snap.memory), metric_tone(snap.memory)),
                toned(format_percent(snap.disk), metric_tone(snap.disk)),
                Cell::from(time_ago(h.last_heartbeat, now)),
            ])
            .style(row_style(app, i))
        })
        .collect();

    let query = app.host_list.query();
    let title = format!(
        "Hosts [status: {}{}] {}",
        query.status.as_ref().map(|s| s.as_str()).unwrap_or("all"),
        if query.search.is_empty() {
            String::new()
        } else {
            format!(", search: {}", query.search)
        },
        page_label(page.page, page.total_pages, page.item_range(), page.total_items)
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(18),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(9),
        ],
    )
    .header(header(&["Status", "Hostname", "IP", "OS", "CPU", "Mem", "Disk", "Seen"]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn render_alerts(f: &mut Frame, app: &App, area: Rect) {
    let page = app.alert_page();
    let visible = app.visible_alerts();
    let now = Utc::now();

    let mut previous_host: Option<&str> = None;
    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, a)| {
            // in grouped mode only the first row of a group names the host
            let host = if app.group_by_host && previous_host == Some(a.hostname.as_str()) {
                String::new()
            } else {
                a.hostname.clone()
            };
            previous_host = Some(a.hostname.as_str());

            let busy = app.is_in_flight(WriteAction::Acknowledge, &a.id);
            Row::new(vec![
                toned(a.severity.as_str().to_uppercase(), severity_tone(&a.severity)),
                Cell::from(host),
                Cell::from(truncate(&a.message, 48)),
                Cell::from(format!("{} / {}", a.value, a.threshold)),
                if busy {
                    toned("acking…", Tone::Muted)
                } else if a.is_active() {
                    toned("active", Tone::Warning)
                } else {
                    toned(a.status.as_str(), Tone::Muted)
                },
                Cell::from(time_ago(a.created_at, now)),
            ])
            .style(row_style(app, i))
        })
        .collect();

    let query = app.alert_list.query();
    let title = format!(
        "Alerts [severity: {}, status: {}{}{}] {}",
        query.severity.as_ref().map(|s| s.as_str()).unwrap_or("all"),
        query.status.as_ref().map(|s| s.as_str()).unwrap_or("all"),
        if query.search.is_empty() {
            String::new()
        } else {
            format!(", search: {}", query.search)
        },
        if app.group_by_host { ", grouped" } else { "" },
        page_label(page.page, page.total_pages, page.item_range(), page.total_items)
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(18),
            Constraint::Min(24),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Length(8),
        ],
    )
    .header(header(&["Severity", "Host", "Message", "Value", "Status", "Age"]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn render_inventory(f: &mut Frame, app: &App, area: Rect) {
    let page = app.inventory_page();

    let rows: Vec<Row> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let (cpu, threads, memory, gpu, storage, os) = match &row.inventory {
                Some(inv) => (
                    inv.hardware.cpu_label(),
                    inv.hardware.cpu_threads_label(),
                    inv.hardware.memory_label(),
                    inv.hardware.gpu_label(),
                    inv.hardware.storage_label(),
                    inv.os_version(&row.host).to_string(),
                ),
                None => (
                    "N/A".to_string(),
                    String::new(),
                    "N/A".to_string(),
                    "—".to_string(),
                    "N/A".to_string(),
                    row.host.os.clone(),
                ),
            };
            Row::new(vec![
                toned(row.host.hostname.clone(), host_status_tone(&row.host.status)),
                Cell::from(truncate(&cpu, 24)),
                Cell::from(threads),
                Cell::from(memory),
                Cell::from(truncate(&gpu, 22)),
                Cell::from(truncate(&storage, 28)),
                Cell::from(os),
            ])
            .style(row_style(app, i))
        })
        .collect();

    let query = app.inventory_list.query();
    let title = format!(
        "Inventory{} {}",
        if query.search.is_empty() {
            String::new()
        } else {
            format!(" [search: {}]", query.search)
        },
        page_label(page.page, page.total_pages, page.item_range(), page.total_items)
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(24),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(22),
            Constraint::Min(20),
            Constraint::Length(18),
        ],
    )
    .header(header(&["Host", "CPU", "Thr", "Memory", "GPU", "Storage", "OS"]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn render_checks(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let now = Utc::now();
    let checks = app.visible_checks();
    let rows: Vec<Row> = checks
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let status = if app.is_in_flight(WriteAction::Execute, &c.id) {
                toned("executing…", Tone::Info)
            } else if app.is_in_flight(WriteAction::Approve, &c.id)
                || app.is_in_flight(WriteAction::Reject, &c.id)
            {
                toned("reviewing…", Tone::Info)
            } else {
                toned(c.status.as_str(), check_status_tone(&c.status))
            };
            Row::new(vec![
                Cell::from(c.id.clone()),
                toned(c.severity.as_str().to_uppercase(), severity_tone(&c.severity)),
                Cell::from(c.hostname.clone()),
                Cell::from(truncate(&c.summary, 48)),
                status,
                Cell::from(c.proposed_actions.len().to_string()),
                Cell::from(time_ago(c.created_at, now)),
            ])
            .style(row_style(app, i))
        })
        .collect();

    let tab_counts: Vec<String> = fleetdeck_core::CheckTab::ALL
        .iter()
        .map(|t| {
            let label = format!("{} ({})", t.as_str(), t.count(&app.checks));
            if *t == app.check_tab {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(16),
            Constraint::Min(24),
            Constraint::Length(12),
            Constraint::Length(7),
            Constraint::Length(8),
        ],
    )
    .header(header(&["ID", "Severity", "Host", "Summary", "Status", "Actions", "Age"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Health checks {}", tab_counts.join("  "))),
    );
    f.render_widget(table, chunks[0]);

    let detail: Vec<Line> = match app.selected_check() {
        None => vec![Line::from("No health checks")],
        Some(check) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(check.summary.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ]),
                Line::from(check.details.clone()),
            ];
            if !check.llm_response.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    check.llm_response.clone(),
                    Style::default().fg(Color::Cyan),
                )));
            }
            lines.push(Line::from(""));
            for (i, action) in check.proposed_actions.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::raw(format!("{}. {} ", i + 1, action.description)),
                    Span::styled(
                        format!("[{} risk]", action.risk_level),
                        Style::default().fg(tone_color(risk_tone(&action.risk_level))),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("   $ {}", action.command),
                    Style::default().fg(Color::Green),
                )));
            }
            for result in &check.execution_results {
                let (marker, tone) = if result.success {
                    ("✓", Tone::Good)
                } else {
                    ("✗", Tone::Danger)
                };
                let detail = match (&result.result, &result.error) {
                    (Some(out), _) => format!("exit {} in {}ms", out.exit_code, out.duration_ms),
                    (None, Some(err)) => err.clone(),
                    (None, None) => String::new(),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", marker), Style::default().fg(tone_color(tone))),
                    Span::raw(format!("{}  {}", result.command, detail)),
                ]));
            }
            lines
        }
    };
    let paragraph = Paragraph::new(detail)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Details"));
    f.render_widget(paragraph, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_label() {
        assert_eq!(page_label(2, 5, Some((21, 40)), 97), "page 2/5 · 21-40 of 97");
        assert_eq!(page_label(1, 0, None, 0), "no matches");
    }

    #[test]
    fn test_tone_colors_distinct_for_alarm_levels() {
        assert_ne!(tone_color(Tone::Danger), tone_color(Tone::Warning));
        assert_eq!(tone_color(Tone::Neutral), Color::Gray);
    }
}
