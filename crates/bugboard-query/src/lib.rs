//! Query/aggregation layer over bug snapshots.
//!
//! Every function here is pure: it takes the current `&[Bug]` (usually
//! `BugStore::snapshot()`) and recomputes its answer from scratch. There
//! is no cache to invalidate and nothing here can mutate the store.

mod board;
mod report;

pub use board::{BoardColumn, board_columns};
pub use report::{
    ANALYTICS_RECENT_LIMIT, ActivityEntry, AnalyticsReport, DASHBOARD_RECENT_LIMIT,
    DashboardSummary,
};

use bugboard_store::{Bug, Severity, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Share of bugs in `resolved`, as a ratio in `[0, 1]`. Zero for no bugs.
pub fn resolution_rate(bugs: &[Bug]) -> f64 {
    if bugs.is_empty() {
        return 0.0;
    }
    let resolved = count_status(bugs, Status::Resolved);
    resolved as f64 / bugs.len() as f64
}

/// Mean `actual_time` in hours over bugs that recorded one. Zero if none did.
pub fn average_resolution_time(bugs: &[Bug]) -> f64 {
    let (sum, count) = bugs
        .iter()
        .filter_map(|bug| bug.actual_time)
        .fold((0.0, 0usize), |(sum, count), hours| (sum + hours, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// One severity bucket of [`severity_distribution`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBucket {
    pub severity: Severity,
    pub count: usize,
    /// Percentage of all bugs, `0.0..=100.0`.
    pub percentage: f64,
}

/// Count and share per severity. All four buckets are always present,
/// most severe first.
pub fn severity_distribution(bugs: &[Bug]) -> Vec<SeverityBucket> {
    Severity::ALL
        .into_iter()
        .map(|severity| {
            let count = bugs.iter().filter(|bug| bug.severity == severity).count();
            SeverityBucket {
                severity,
                count,
                percentage: percentage(count, bugs.len()),
            }
        })
        .collect()
}

/// Count per distinct project name, keyed in sorted order.
pub fn project_distribution(bugs: &[Bug]) -> BTreeMap<String, usize> {
    let mut projects = BTreeMap::new();
    for bug in bugs {
        *projects.entry(bug.project.clone()).or_insert(0) += 1;
    }
    projects
}

/// Bug count per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Open => self.open,
            Status::InProgress => self.in_progress,
            Status::Resolved => self.resolved,
            Status::Closed => self.closed,
        }
    }

    pub fn total(&self) -> usize {
        self.open + self.in_progress + self.resolved + self.closed
    }
}

pub fn status_counts(bugs: &[Bug]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for bug in bugs {
        match bug.status {
            Status::Open => counts.open += 1,
            Status::InProgress => counts.in_progress += 1,
            Status::Resolved => counts.resolved += 1,
            Status::Closed => counts.closed += 1,
        }
    }
    counts
}

/// The `n` most recently updated bugs, newest first.
///
/// Equal `updated_at` values keep their snapshot order.
pub fn recent_activity(bugs: &[Bug], n: usize) -> Vec<&Bug> {
    let mut ordered: Vec<&Bug> = bugs.iter().collect();
    ordered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    ordered.truncate(n);
    ordered
}

fn count_status(bugs: &[Bug], status: Status) -> usize {
    bugs.iter().filter(|bug| bug.status == status).count()
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
