//! Dashboard and analytics reports.
//!
//! Both are plain owned values built from a snapshot, ready to print or to
//! serialize with `--json`.

use crate::{
    SeverityBucket, StatusCounts, average_resolution_time, project_distribution,
    recent_activity, resolution_rate, severity_distribution, status_counts,
};
use bugboard_store::{Bug, Severity, Status, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Recent bugs shown on the dashboard.
pub const DASHBOARD_RECENT_LIMIT: usize = 5;
/// Recent bugs shown in the analytics view.
pub const ANALYTICS_RECENT_LIMIT: usize = 10;

/// Summary line for a recently touched bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    pub title: String,
    pub project: String,
    pub status: Status,
    pub severity: Severity,
    pub updated_at: DateTime<Utc>,
}

impl From<&Bug> for ActivityEntry {
    fn from(bug: &Bug) -> Self {
        Self {
            id: bug.id.clone(),
            title: bug.title.clone(),
            project: bug.project.clone(),
            status: bug.status,
            severity: bug.severity,
            updated_at: bug.updated_at,
        }
    }
}

/// Landing-page overview for one viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub critical: usize,
    /// Bugs assigned to the viewer; zero without a viewer.
    pub assigned_to_viewer: usize,
    pub severity: Vec<SeverityBucket>,
    pub recent: Vec<ActivityEntry>,
}

impl DashboardSummary {
    pub fn build(bugs: &[Bug], viewer: Option<&User>) -> Self {
        Self::build_with_recent(bugs, viewer, DASHBOARD_RECENT_LIMIT)
    }

    pub fn build_with_recent(bugs: &[Bug], viewer: Option<&User>, recent: usize) -> Self {
        let counts = status_counts(bugs);
        let assigned_to_viewer = viewer.map_or(0, |user| {
            bugs.iter().filter(|bug| bug.is_assigned_to(&user.id)).count()
        });
        Self {
            total: bugs.len(),
            open: counts.open,
            in_progress: counts.in_progress,
            resolved: counts.resolved,
            critical: bugs
                .iter()
                .filter(|bug| bug.severity == Severity::Critical)
                .count(),
            assigned_to_viewer,
            severity: severity_distribution(bugs),
            recent: recent_entries(bugs, recent),
        }
    }
}

/// Team-wide metrics for the analytics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total: usize,
    pub statuses: StatusCounts,
    /// Resolved / total, `0.0..=1.0`.
    pub resolution_rate: f64,
    /// `resolution_rate` as a percentage rounded to one decimal.
    pub resolution_percent: f64,
    /// Mean actual hours over bugs with recorded time.
    pub average_resolution_time: f64,
    pub severity: Vec<SeverityBucket>,
    pub projects: BTreeMap<String, usize>,
    pub recent: Vec<ActivityEntry>,
}

impl AnalyticsReport {
    pub fn build(bugs: &[Bug]) -> Self {
        Self::build_with_recent(bugs, ANALYTICS_RECENT_LIMIT)
    }

    pub fn build_with_recent(bugs: &[Bug], recent: usize) -> Self {
        let rate = resolution_rate(bugs);
        Self {
            total: bugs.len(),
            statuses: status_counts(bugs),
            resolution_rate: rate,
            resolution_percent: (rate * 1000.0).round() / 10.0,
            average_resolution_time: average_resolution_time(bugs),
            severity: severity_distribution(bugs),
            projects: project_distribution(bugs),
            recent: recent_entries(bugs, recent),
        }
    }
}

fn recent_entries(bugs: &[Bug], n: usize) -> Vec<ActivityEntry> {
    recent_activity(bugs, n)
        .into_iter()
        .map(ActivityEntry::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugboard_store::{demo_bugs, demo_users};

    #[test]
    fn dashboard_counts_match_demo_data() {
        let users = demo_users();
        let developer = users.iter().find(|u| u.id == "USR-2");
        let summary = DashboardSummary::build(&demo_bugs(), developer);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.open, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.assigned_to_viewer, 3);
        assert_eq!(summary.recent.len(), 3);
        assert_eq!(summary.recent[0].id, "BUG-1");
    }

    #[test]
    fn dashboard_without_viewer_has_no_assignments() {
        let summary = DashboardSummary::build(&demo_bugs(), None);
        assert_eq!(summary.assigned_to_viewer, 0);
    }

    #[test]
    fn empty_snapshot_yields_zeroed_reports() {
        let summary = DashboardSummary::build(&[], None);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.severity.len(), 4);
        assert!(summary.recent.is_empty());

        let report = AnalyticsReport::build(&[]);
        assert_eq!(report.resolution_rate, 0.0);
        assert_eq!(report.resolution_percent, 0.0);
        assert_eq!(report.average_resolution_time, 0.0);
        assert!(report.projects.is_empty());
    }

    #[test]
    fn analytics_rounds_percent_to_one_decimal() {
        let report = AnalyticsReport::build(&demo_bugs());
        assert_eq!(report.resolution_percent, 33.3);
        assert_eq!(report.average_resolution_time, 2.0);
        assert_eq!(report.statuses.in_progress, 1);
        assert_eq!(report.recent.len(), 3);
    }

    #[test]
    fn recent_limit_is_respected() {
        let report = AnalyticsReport::build_with_recent(&demo_bugs(), 1);
        assert_eq!(report.recent.len(), 1);
        assert_eq!(report.recent[0].id, "BUG-1");
    }
}
