//! Client-side filtering, ordering and pagination for list views

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::constants::{PAGE_SIZE, PAGE_WINDOW, TIMELINE_HOURS};
use crate::types::{Alert, AlertStatus, Host, HostStatus, Inventory, Severity};

/// A filter plus an ordering over list items
pub trait ListQuery<T> {
    /// Whether the item passes every active predicate
    fn matches(&self, item: &T) -> bool;

    /// Display ordering; the default keeps source order
    fn order(&self, _a: &T, _b: &T) -> Ordering {
        Ordering::Equal
    }
}

/// Case-insensitive substring match; an empty needle matches everything
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

/// Hosts page filter: search over hostname and IP, exact status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostQuery {
    pub search: String,
    pub status: Option<HostStatus>,
}

impl ListQuery<Host> for HostQuery {
    fn matches(&self, host: &Host) -> bool {
        if let Some(status) = &self.status {
            if &host.status != status {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || contains_ci(&host.hostname, &needle) || contains_ci(&host.ip_address, &needle)
    }
}

/// Alerts page filter: search over hostname and message, exact severity and status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertQuery {
    pub search: String,
    pub severity: Option<Severity>,
    pub status: Option<AlertStatus>,
}

impl ListQuery<Alert> for AlertQuery {
    fn matches(&self, alert: &Alert) -> bool {
        if let Some(severity) = &self.severity {
            if &alert.severity != severity {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &alert.status != status {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || contains_ci(&alert.hostname, &needle) || contains_ci(&alert.message, &needle)
    }

    fn order(&self, a: &Alert, b: &Alert) -> Ordering {
        compare_alerts(a, b)
    }
}

/// Critical before warning before info, newest first within a severity
pub fn compare_alerts(a: &Alert, b: &Alert) -> Ordering {
    a.severity
        .rank()
        .cmp(&b.severity.rank())
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sort alerts in place with the fixed severity/recency ordering
pub fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(compare_alerts);
}

/// A host joined with its inventory snapshot, if one was fetched
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub host: Host,
    pub inventory: Option<Inventory>,
}

/// Inventory page filter: search over hostname, OS and CPU model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryQuery {
    pub search: String,
}

impl ListQuery<InventoryRow> for InventoryQuery {
    fn matches(&self, row: &InventoryRow) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let cpu_model = row
            .inventory
            .as_ref()
            .and_then(|inv| inv.hardware.cpu.as_ref())
            .and_then(|cpu| cpu.model.as_deref())
            .unwrap_or("");
        contains_ci(&row.host.hostname, &needle)
            || contains_ci(&row.host.os, &needle)
            || contains_ci(cpu_model, &needle)
    }
}

/// Number of pages needed for `total_items`
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(per_page)
}

/// Page numbers to show as buttons, at most `PAGE_WINDOW` of them.
///
/// Near the start the first seven are shown, near the end the last seven,
/// otherwise a window centred on `page`.
pub fn page_window(page: usize, total_pages: usize) -> Vec<usize> {
    let width = PAGE_WINDOW;
    let half = width / 2;
    if total_pages <= width {
        return (1..=total_pages).collect();
    }
    let start = if page <= half + 1 {
        1
    } else if page + half >= total_pages {
        total_pages - width + 1
    } else {
        page - half
    };
    (start..start + width).collect()
}

/// One page of a filtered, ordered list
#[derive(Debug, Clone)]
pub struct PageView<'a, T> {
    pub items: Vec<&'a T>,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<'a, T> PageView<'a, T> {
    /// Page buttons for this view
    pub fn window(&self) -> Vec<usize> {
        page_window(self.page, self.total_pages)
    }

    /// 1-indexed (first, last) item numbers shown, None when empty
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.per_page + 1;
        Some((first, first + self.items.len() - 1))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Query plus current page of a list view.
///
/// The query is only reachable through [`ListState::update`], which always
/// sends the view back to page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<Q> {
    query: Q,
    page: usize,
    per_page: usize,
}

impl<Q: Default> Default for ListState<Q> {
    fn default() -> Self {
        Self::new(Q::default())
    }
}

impl<Q> ListState<Q> {
    pub fn new(query: Q) -> Self {
        Self {
            query,
            page: 1,
            per_page: PAGE_SIZE,
        }
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Change the filter and reset to the first page
    pub fn update(&mut self, f: impl FnOnce(&mut Q)) {
        f(&mut self.query);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Pull a stale page back to the last one that exists
    fn clamp_to(&mut self, total_pages: usize) {
        self.page = self.page.min(total_pages).max(1);
    }

    /// Step forward from the page actually shown
    pub fn next_page(&mut self, total_pages: usize) {
        self.clamp_to(total_pages);
        if self.page < total_pages {
            self.page += 1;
        }
    }

    /// Step back from the page actually shown
    pub fn previous_page(&mut self, total_pages: usize) {
        self.clamp_to(total_pages);
        self.set_page(self.page - 1);
    }

    /// Filter, order and slice `items` for the current page.
    ///
    /// A page past the end (e.g. after a refresh shrank the list) shows the
    /// last page instead.
    pub fn view<'a, T>(&self, items: &'a [T]) -> PageView<'a, T>
    where
        Q: ListQuery<T>,
    {
        let mut filtered: Vec<&T> = items.iter().filter(|item| self.query.matches(item)).collect();
        filtered.sort_by(|a, b| self.query.order(a, b));

        let total_items = filtered.len();
        let total_pages = total_pages(total_items, self.per_page);
        let page = self.page.min(total_pages).max(1);
        let start = (page - 1) * self.per_page;
        let items = filtered.into_iter().skip(start).take(self.per_page).collect();

        PageView {
            items,
            page,
            per_page: self.per_page,
            total_pages,
            total_items,
        }
    }
}

/// Cluster an already-paginated slice by hostname.
///
/// Groups appear in order of each host's first item; items keep their
/// relative order inside a group. Visibility is unchanged.
pub fn group_by_host<'a>(items: &[&'a Alert]) -> Vec<(String, Vec<&'a Alert>)> {
    let mut groups: Vec<(String, Vec<&'a Alert>)> = Vec::new();
    for &alert in items {
        match groups.iter_mut().find(|(host, _)| host == &alert.hostname) {
            Some((_, members)) => members.push(alert),
            None => groups.push((alert.hostname.clone(), vec![alert])),
        }
    }
    groups
}

/// Critical and warning alerts raised in one hour-long bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HourBucket {
    /// Whole hours between the bucket and `now`; 0 is the last hour
    pub hours_ago: u32,
    pub critical: usize,
    pub warning: usize,
}

/// Alerts of the last 24 hours counted per hour, oldest bucket first.
///
/// An alert lands in bucket `floor((now - created_at) / 1h)`; alerts from
/// the future or older than the window are left out. Status is ignored.
pub fn alert_timeline(alerts: &[Alert], now: DateTime<Utc>) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (0..TIMELINE_HOURS)
        .rev()
        .map(|h| HourBucket {
            hours_ago: h as u32,
            ..HourBucket::default()
        })
        .collect();

    for alert in alerts {
        let age = now - alert.created_at;
        if age < chrono::Duration::zero() {
            continue;
        }
        let hours_ago = age.num_hours() as usize;
        if hours_ago >= TIMELINE_HOURS {
            continue;
        }
        let bucket = &mut buckets[TIMELINE_HOURS - 1 - hours_ago];
        match alert.severity {
            Severity::Critical => bucket.critical += 1,
            Severity::Warning => bucket.warning += 1,
            _ => {}
        }
    }
    buckets
}
