//! FleetDeck TUI Dashboard
//!
//! Live terminal view of the fleet (monit command). Fetches and writes run
//! as background tasks and report back over a channel so the UI never
//! blocks on the network.

mod app;
mod ui;

pub use app::{App, Command, Update, View, WriteAction, WriteKey, WriteOutcome};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fleetdeck_api::{fetch_inventory_rows, DataSource};
use fleetdeck_core::{HealthCheckQuery, Settings};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Run the dashboard until the user quits
pub async fn run(source: Arc<dyn DataSource>, settings: Settings) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, source, &settings).await;

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    source: Arc<dyn DataSource>,
    settings: &Settings,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(settings, source.name());

    loop {
        if let Some(command) = app.due_fetch(Instant::now()) {
            dispatch(command, &source, &tx);
        }

        while let Ok(update) = rx.try_recv() {
            if let Some(command) = app.apply(update) {
                dispatch(command, &source, &tx);
            }
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = app.handle_key(key) {
                        dispatch(command, &source, &tx);
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn dispatch(command: Command, source: &Arc<dyn DataSource>, tx: &mpsc::UnboundedSender<Update>) {
    match command {
        Command::Fetch(view) => spawn_fetch(view, source.clone(), tx.clone()),
        Command::Write(key) => spawn_write(key, source.clone(), tx.clone()),
    }
}

/// Load everything one view needs
pub async fn fetch_view(view: View, source: &dyn DataSource) -> Update {
    match view {
        View::Dashboard => {
            let (overview, alerts) = tokio::join!(source.fleet_overview(), source.alerts());
            Update::Dashboard { overview, alerts }
        }
        View::Hosts => {
            let hosts = source.hosts().await;
            let snapshots =
                futures::future::join_all(hosts.iter().map(|h| source.metric_snapshot(&h.hostname)))
                    .await;
            let snapshots: HashMap<_, _> = hosts
                .iter()
                .map(|h| h.hostname.clone())
                .zip(snapshots)
                .collect();
            Update::Hosts { hosts, snapshots }
        }
        View::Alerts => Update::Alerts(source.alerts().await),
        View::Inventory => Update::Inventory(fetch_inventory_rows(source).await),
        View::HealthChecks => {
            Update::HealthChecks(source.health_checks(&HealthCheckQuery::default()).await)
        }
    }
}

/// Perform one write and describe how it ended
pub async fn perform_write(key: &WriteKey, source: &dyn DataSource) -> Result<WriteOutcome, String> {
    let id = key.target.as_str();
    match key.action {
        WriteAction::Acknowledge => {
            source.acknowledge_alert(id).await;
            Ok(WriteOutcome::Done)
        }
        WriteAction::Approve => source
            .approve_health_check(id)
            .await
            .map(|_| WriteOutcome::Done)
            .map_err(|e| e.to_string()),
        WriteAction::Reject => source
            .reject_health_check(id)
            .await
            .map(|_| WriteOutcome::Done)
            .map_err(|e| e.to_string()),
        WriteAction::Execute => source
            .execute_health_check(id, None)
            .await
            .map(WriteOutcome::Executed)
            .map_err(|e| e.to_string()),
    }
}

fn spawn_fetch(view: View, source: Arc<dyn DataSource>, tx: mpsc::UnboundedSender<Update>) {
    debug!("Fetching {}", view.title());
    tokio::spawn(async move {
        let update = fetch_view(view, source.as_ref()).await;
        // receiver is gone once the dashboard exits
        let _ = tx.send(update);
    });
}

fn spawn_write(key: WriteKey, source: Arc<dyn DataSource>, tx: mpsc::UnboundedSender<Update>) {
    debug!("Starting {:?} on {}", key.action, key.target);
    tokio::spawn(async move {
        let result = perform_write(&key, source.as_ref()).await;
        let _ = tx.send(Update::WriteDone { key, result });
    });
}
