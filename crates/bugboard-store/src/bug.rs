//! Bug and comment types: the records held by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a severity/status/priority/role string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseLevelError {
    pub(crate) kind: &'static str,
    pub(crate) value: String,
    pub(crate) expected: &'static str,
}

/// How badly a bug hurts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Every severity, most severe first (display order of the dashboards).
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(ParseLevelError {
                kind: "severity",
                value: s.to_string(),
                expected: "low, medium, high, critical",
            }),
        }
    }
}

/// Workflow position of a bug; also the Kanban column it sits in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    /// Every status in workflow order.
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in-progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    /// Human label used for board column headings.
    pub fn title(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
        }
    }
}

impl FromStr for Status {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `in_progress` is accepted for shells where dashes are awkward.
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Status::Open),
            "in-progress" | "in_progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            "closed" => Ok(Status::Closed),
            _ => Err(ParseLevelError {
                kind: "status",
                value: s.to_string(),
                expected: "open, in-progress, resolved, closed",
            }),
        }
    }
}

/// Scheduling urgency, set by whoever triages the bug.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseLevelError {
                kind: "priority",
                value: s.to_string(),
                expected: "low, medium, high",
            }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timestamped note attached to a bug. Never edited once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    /// User ID of the author.
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Input for a new comment; the store fills in id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub text: String,
    pub author: String,
}

impl CommentDraft {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }
}

/// A tracked issue record.
///
/// Field names serialize in camelCase so snapshots line up with the
/// browser front end's data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    // ── Identity ──
    pub id: String,

    // ── Content ──
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project: String,

    // ── Triage ──
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,

    // ── People ──
    pub reported_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    // ── Timestamps ──
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // ── Discussion ──
    #[serde(default)]
    pub comments: Vec<Comment>,

    // ── Effort, in hours ──
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<f64>,
}

impl Bug {
    /// Materialize a draft. New reports always start `open`.
    pub(crate) fn from_draft(id: String, draft: BugDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            project: draft.project,
            severity: draft.severity,
            status: Status::Open,
            priority: draft.priority,
            reported_by: draft.reported_by,
            assigned_to: draft.assigned_to,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            estimated_time: draft.estimated_time,
            actual_time: draft.actual_time,
        }
    }

    /// Whether the bug is assigned to `user_id`.
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_to.as_deref() == Some(user_id)
    }
}

/// Creation payload: everything but id, timestamps and comments.
///
/// `status` exists only because callers coming from loosely-typed front
/// ends send one; the store overwrites it with [`Status::Open`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BugDraft {
    pub title: String,
    pub description: String,
    pub project: String,
    pub severity: Severity,
    pub priority: Priority,
    pub status: Option<Status>,
    pub reported_by: String,
    pub assigned_to: Option<String>,
    pub estimated_time: Option<f64>,
    pub actual_time: Option<f64>,
}

impl BugDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        project: impl Into<String>,
        reported_by: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            project: project.into(),
            reported_by: reported_by.into(),
            ..Self::default()
        }
    }

    /// Reasons this draft would be rejected by the strict creation path.
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push("title is required".to_string());
        }
        if self.description.trim().is_empty() {
            problems.push("description is required".to_string());
        }
        if self.project.trim().is_empty() {
            problems.push("project is required".to_string());
        }
        if self.reported_by.trim().is_empty() {
            problems.push("reporter is required".to_string());
        }
        problems.extend(hours_problem("estimated time", self.estimated_time));
        problems.extend(hours_problem("actual time", self.actual_time));
        problems
    }
}

/// Partial update for an existing bug.
///
/// There is deliberately no way to express `id`, `createdAt`, `comments`
/// or `reportedBy` here: those fields are update-exempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BugPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the assignee.
    pub assigned_to: Option<Option<String>>,
    pub estimated_time: Option<f64>,
    pub actual_time: Option<f64>,
}

impl BugPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    pub fn assign(assignee: Option<String>) -> Self {
        Self {
            assigned_to: Some(assignee),
            ..Self::default()
        }
    }

    /// True when applying the patch would change no field.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("project", &self.project),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                problems.push(format!("{name} cannot be blank"));
            }
        }
        if let Some(Some(assignee)) = &self.assigned_to
            && assignee.trim().is_empty()
        {
            problems.push("assignee cannot be blank (clear it instead)".to_string());
        }
        problems.extend(hours_problem("estimated time", self.estimated_time));
        problems.extend(hours_problem("actual time", self.actual_time));
        problems
    }

    /// Merge into `bug`. Does not touch `updated_at`; the store does that.
    pub(crate) fn apply_to(self, bug: &mut Bug) {
        if let Some(next) = self.title {
            bug.title = next;
        }
        if let Some(next) = self.description {
            bug.description = next;
        }
        if let Some(next) = self.project {
            bug.project = next;
        }
        if let Some(next) = self.severity {
            bug.severity = next;
        }
        if let Some(next) = self.status {
            bug.status = next;
        }
        if let Some(next) = self.priority {
            bug.priority = next;
        }
        if let Some(next) = self.assigned_to {
            bug.assigned_to = next;
        }
        if let Some(next) = self.estimated_time {
            bug.estimated_time = Some(next);
        }
        if let Some(next) = self.actual_time {
            bug.actual_time = Some(next);
        }
    }
}

fn hours_problem(name: &str, hours: Option<f64>) -> Option<String> {
    match hours {
        Some(h) if !h.is_finite() || h < 0.0 => {
            Some(format!("{name} must be a non-negative number of hours"))
        }
        _ => None,
    }
}
