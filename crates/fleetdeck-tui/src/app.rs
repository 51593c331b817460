//! Dashboard state and key handling
//!
//! Nothing in here does I/O. Key presses turn into [`Command`]s that the run
//! loop executes, and finished fetches come back as [`Update`]s.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fleetdeck_core::{
    group_by_host, Alert, AlertQuery, AlertStatus, CheckTab, ExecutionOutcome, FleetOverview,
    HealthCheck, Host, HostQuery, HostStatus, InventoryQuery, InventoryRow, ListState,
    MetricSnapshot, PageView, Settings, Severity, Theme, DASHBOARD_REFRESH_SECS,
    HEALTH_CHECK_REFRESH_SECS,
};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Hosts,
    Alerts,
    Inventory,
    HealthChecks,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Hosts,
        View::Alerts,
        View::Inventory,
        View::HealthChecks,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Hosts => "Hosts",
            View::Alerts => "Alerts",
            View::Inventory => "Inventory",
            View::HealthChecks => "Health Checks",
        }
    }

    pub fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    fn previous(self) -> Self {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }

    fn searchable(self) -> bool {
        matches!(self, View::Hosts | View::Alerts | View::Inventory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteAction {
    Acknowledge,
    Approve,
    Reject,
    Execute,
}

/// One write against one record; at most one of each is in flight
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WriteKey {
    pub action: WriteAction,
    pub target: String,
}

impl WriteKey {
    pub fn new(action: WriteAction, target: impl Into<String>) -> Self {
        Self {
            action,
            target: target.into(),
        }
    }
}

/// Side effects requested by a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch(View),
    Write(WriteKey),
}

/// Results delivered by background tasks
#[derive(Debug, Clone)]
pub enum Update {
    Dashboard {
        overview: FleetOverview,
        alerts: Vec<Alert>,
    },
    Hosts {
        hosts: Vec<Host>,
        snapshots: HashMap<String, MetricSnapshot>,
    },
    Alerts(Vec<Alert>),
    Inventory(Vec<InventoryRow>),
    HealthChecks(Vec<HealthCheck>),
    WriteDone {
        key: WriteKey,
        result: Result<WriteOutcome, String>,
    },
}

#[derive(Debug, Clone)]
pub enum WriteOutcome {
    Done,
    Executed(ExecutionOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Fixed-interval poll timer for one view
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    last: Option<Instant>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    /// Whether a fetch is due; marks it fired when it is.
    /// Ticks fire regardless of whether the previous fetch has returned.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

const HOST_STATUS_FILTERS: [Option<HostStatus>; 5] = [
    None,
    Some(HostStatus::Online),
    Some(HostStatus::Offline),
    Some(HostStatus::Degraded),
    Some(HostStatus::Critical),
];

const SEVERITY_FILTERS: [Option<Severity>; 4] = [
    None,
    Some(Severity::Critical),
    Some(Severity::Warning),
    Some(Severity::Info),
];

const ALERT_STATUS_FILTERS: [Option<AlertStatus>; 3] =
    [None, Some(AlertStatus::Active), Some(AlertStatus::Resolved)];

fn cycle<T: Clone + PartialEq>(options: &[T], current: &T) -> T {
    let index = options.iter().position(|o| o == current).unwrap_or(0);
    options[(index + 1) % options.len()].clone()
}

/// TUI application state
pub struct App {
    pub view: View,
    pub source_name: &'static str,
    pub theme: Theme,

    pub overview: FleetOverview,
    pub hosts: Vec<Host>,
    pub snapshots: HashMap<String, MetricSnapshot>,
    pub alerts: Vec<Alert>,
    pub inventory: Vec<InventoryRow>,
    pub checks: Vec<HealthCheck>,
    pub loaded: HashSet<View>,

    pub host_list: ListState<HostQuery>,
    pub alert_list: ListState<AlertQuery>,
    pub inventory_list: ListState<InventoryQuery>,
    pub check_tab: CheckTab,
    pub group_by_host: bool,
    pub selected: usize,

    pub input_mode: InputMode,
    pub in_flight: HashSet<WriteKey>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,

    pollers: HashMap<View, Poller>,
}

impl App {
    pub fn new(settings: &Settings, source_name: &'static str) -> Self {
        let list_interval = settings.refresh_interval();
        let pollers = View::ALL
            .iter()
            .map(|view| {
                let interval = match view {
                    View::Dashboard => Duration::from_secs(DASHBOARD_REFRESH_SECS),
                    View::HealthChecks => Duration::from_secs(HEALTH_CHECK_REFRESH_SECS),
                    _ => list_interval,
                };
                (*view, Poller::new(interval))
            })
            .collect();

        Self {
            view: View::Dashboard,
            source_name,
            theme: settings.theme,
            overview: FleetOverview::default(),
            hosts: Vec::new(),
            snapshots: HashMap::new(),
            alerts: Vec::new(),
            inventory: Vec::new(),
            checks: Vec::new(),
            loaded: HashSet::new(),
            host_list: ListState::default(),
            alert_list: ListState::default(),
            inventory_list: ListState::default(),
            check_tab: CheckTab::default(),
            group_by_host: false,
            selected: 0,
            input_mode: InputMode::Normal,
            in_flight: HashSet::new(),
            status: None,
            should_quit: false,
            pollers,
        }
    }

    /// Fetch the active view if its timer has elapsed
    pub fn due_fetch(&mut self, now: Instant) -> Option<Command> {
        let poller = self.pollers.get_mut(&self.view)?;
        poller.tick(now).then_some(Command::Fetch(self.view))
    }

    pub fn host_page(&self) -> PageView<'_, Host> {
        self.host_list.view(&self.hosts)
    }

    pub fn inventory_page(&self) -> PageView<'_, InventoryRow> {
        self.inventory_list.view(&self.inventory)
    }

    pub fn alert_page(&self) -> PageView<'_, Alert> {
        self.alert_list.view(&self.alerts)
    }

    /// Alerts on the current page in display order
    pub fn visible_alerts(&self) -> Vec<&Alert> {
        let page = self.alert_page();
        if self.group_by_host {
            group_by_host(&page.items)
                .into_iter()
                .flat_map(|(_, items)| items)
                .collect()
        } else {
            page.items
        }
    }

    pub fn visible_checks(&self) -> Vec<&HealthCheck> {
        self.check_tab.filter(&self.checks)
    }

    pub fn selected_alert(&self) -> Option<&Alert> {
        self.visible_alerts().get(self.selected).copied()
    }

    pub fn selected_check(&self) -> Option<&HealthCheck> {
        self.visible_checks().get(self.selected).copied()
    }

    fn visible_len(&self) -> usize {
        match self.view {
            View::Dashboard => 0,
            View::Hosts => self.host_page().items.len(),
            View::Alerts => self.visible_alerts().len(),
            View::Inventory => self.inventory_page().items.len(),
            View::HealthChecks => self.visible_checks().len(),
        }
    }

    fn total_pages(&self) -> usize {
        match self.view {
            View::Hosts => self.host_page().total_pages,
            View::Alerts => self.alert_page().total_pages,
            View::Inventory => self.inventory_page().total_pages,
            _ => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn is_in_flight(&self, action: WriteAction, target: &str) -> bool {
        self.in_flight.contains(&WriteKey::new(action, target))
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    /// Apply a finished fetch or write
    pub fn apply(&mut self, update: Update) -> Option<Command> {
        match update {
            Update::Dashboard { overview, alerts } => {
                self.overview = overview;
                self.alerts = alerts;
                self.loaded.insert(View::Dashboard);
            }
            Update::Hosts { hosts, snapshots } => {
                self.hosts = hosts;
                self.snapshots = snapshots;
                self.loaded.insert(View::Hosts);
            }
            Update::Alerts(alerts) => {
                self.alerts = alerts;
                self.loaded.insert(View::Alerts);
            }
            Update::Inventory(rows) => {
                self.inventory = rows;
                self.loaded.insert(View::Inventory);
            }
            Update::HealthChecks(checks) => {
                self.checks = checks;
                self.loaded.insert(View::HealthChecks);
            }
            Update::WriteDone { key, result } => {
                self.in_flight.remove(&key);
                self.clamp_selection();
                return self.finish_write(key, result);
            }
        }
        self.clamp_selection();
        None
    }

    fn finish_write(&mut self, key: WriteKey, result: Result<WriteOutcome, String>) -> Option<Command> {
        match (key.action, result) {
            (WriteAction::Acknowledge, _) => {
                self.info(format!("Alert {} acknowledged", key.target));
                None
            }
            (_, Err(e)) => {
                self.error(format!("{} failed: {}", key.target, e));
                None
            }
            (WriteAction::Approve, Ok(_)) => {
                self.info(format!("Approved {}", key.target));
                Some(Command::Fetch(View::HealthChecks))
            }
            (WriteAction::Reject, Ok(_)) => {
                self.info(format!("Rejected {}", key.target));
                Some(Command::Fetch(View::HealthChecks))
            }
            (WriteAction::Execute, Ok(outcome)) => {
                let text = match outcome {
                    WriteOutcome::Executed(outcome) => {
                        let passed = outcome.results.iter().filter(|r| r.success).count();
                        format!(
                            "{} {}: {}/{} actions succeeded",
                            key.target,
                            outcome.status,
                            passed,
                            outcome.results.len()
                        )
                    }
                    WriteOutcome::Done => format!("Executed {}", key.target),
                };
                self.info(text);
                Some(Command::Fetch(View::HealthChecks))
            }
        }
    }

    /// Register a write unless the same one is still running
    fn begin_write(&mut self, key: WriteKey) -> Option<Command> {
        if !self.in_flight.insert(key.clone()) {
            return None;
        }
        Some(Command::Write(key))
    }

    fn switch_to(&mut self, view: View) -> Option<Command> {
        if self.view == view {
            return None;
        }
        self.view = view;
        self.selected = 0;
        self.input_mode = InputMode::Normal;
        // a freshly shown view fetches immediately, then on its own interval
        if let Some(poller) = self.pollers.get_mut(&view) {
            poller.reset();
        }
        None
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }
        match self.input_mode {
            InputMode::Search => self.handle_search_key(key.code),
            InputMode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn search_text(&self) -> String {
        match self.view {
            View::Hosts => self.host_list.query().search.clone(),
            View::Alerts => self.alert_list.query().search.clone(),
            View::Inventory => self.inventory_list.query().search.clone(),
            _ => String::new(),
        }
    }

    pub fn search_input(&self) -> Option<String> {
        (self.input_mode == InputMode::Search).then(|| self.search_text())
    }

    fn set_search(&mut self, text: String) {
        match self.view {
            View::Hosts => self.host_list.update(|q| q.search = text),
            View::Alerts => self.alert_list.update(|q| q.search = text),
            View::Inventory => self.inventory_list.update(|q| q.search = text),
            _ => {}
        }
        self.selected = 0;
    }

    fn handle_search_key(&mut self, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                self.set_search(String::new());
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                let mut text = self.search_text();
                text.pop();
                self.set_search(text);
            }
            KeyCode::Char(c) => {
                let mut text = self.search_text();
                text.push(c);
                self.set_search(text);
            }
            _ => {}
        }
        None
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => self.switch_to(self.view.next()),
            KeyCode::BackTab => self.switch_to(self.view.previous()),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.switch_to(View::ALL[index])
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.visible_len();
                if len > 0 {
                    self.selected = (self.selected + 1) % len;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let len = self.visible_len();
                if len > 0 {
                    self.selected = (self.selected + len - 1) % len;
                }
                None
            }
            KeyCode::Char('r') => Some(Command::Fetch(self.view)),
            KeyCode::Char('/') if self.view.searchable() => {
                self.input_mode = InputMode::Search;
                None
            }
            KeyCode::Char('n') | KeyCode::Right => {
                let total = self.total_pages();
                match self.view {
                    View::Hosts => self.host_list.next_page(total),
                    View::Alerts => self.alert_list.next_page(total),
                    View::Inventory => self.inventory_list.next_page(total),
                    _ => {}
                }
                self.selected = 0;
                None
            }
            KeyCode::Char('p') | KeyCode::Left => {
                let total = self.total_pages();
                match self.view {
                    View::Hosts => self.host_list.previous_page(total),
                    View::Alerts => self.alert_list.previous_page(total),
                    View::Inventory => self.inventory_list.previous_page(total),
                    _ => {}
                }
                self.selected = 0;
                None
            }
            KeyCode::Char('f') => {
                self.cycle_filter();
                None
            }
            KeyCode::Char('s') if self.view == View::Alerts => {
                let next = cycle(&ALERT_STATUS_FILTERS, &self.alert_list.query().status);
                self.alert_list.update(|q| q.status = next);
                self.selected = 0;
                None
            }
            KeyCode::Char('g') if self.view == View::Alerts => {
                self.group_by_host = !self.group_by_host;
                self.selected = 0;
                None
            }
            KeyCode::Char('a') if self.view == View::Alerts => self.acknowledge_selected(),
            KeyCode::Char('y') if self.view == View::HealthChecks => self.review_selected(WriteAction::Approve),
            KeyCode::Char('x') if self.view == View::HealthChecks => self.review_selected(WriteAction::Reject),
            KeyCode::Char('e') if self.view == View::HealthChecks => self.execute_selected(),
            _ => None,
        }
    }

    fn cycle_filter(&mut self) {
        match self.view {
            View::Hosts => {
                let next = cycle(&HOST_STATUS_FILTERS, &self.host_list.query().status);
                self.host_list.update(|q| q.status = next);
            }
            View::Alerts => {
                let next = cycle(&SEVERITY_FILTERS, &self.alert_list.query().severity);
                self.alert_list.update(|q| q.severity = next);
            }
            View::HealthChecks => self.check_tab = self.check_tab.next(),
            _ => {}
        }
        self.selected = 0;
    }

    fn acknowledge_selected(&mut self) -> Option<Command> {
        let (id, active) = self.selected_alert().map(|a| (a.id.clone(), a.is_active()))?;
        if !active {
            self.info(format!("Alert {} is already resolved", id));
            return None;
        }
        let command = self.begin_write(WriteKey::new(WriteAction::Acknowledge, &id))?;
        // optimistic; ack never reports failure
        if let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) {
            alert.status = AlertStatus::Resolved;
        }
        Some(command)
    }

    fn review_selected(&mut self, action: WriteAction) -> Option<Command> {
        let check = self.selected_check()?;
        if !check.can_review() {
            let text = format!("{} is {} and cannot be reviewed", check.id, check.status);
            self.error(text);
            return None;
        }
        let id = check.id.clone();
        // one review per check at a time, whichever button was pressed
        let other = match action {
            WriteAction::Approve => WriteAction::Reject,
            _ => WriteAction::Approve,
        };
        if self.is_in_flight(other, &id) {
            return None;
        }
        self.begin_write(WriteKey::new(action, id))
    }

    fn execute_selected(&mut self) -> Option<Command> {
        let check = self.selected_check()?;
        if !check.can_execute() {
            let text = format!("{} is {}; only approved checks can run", check.id, check.status);
            self.error(text);
            return None;
        }
        let id = check.id.clone();
        self.begin_write(WriteKey::new(WriteAction::Execute, id))
    }
}
