//! Board search/filter predicate.

use crate::bug::{Bug, Severity, Status};

/// Conjunction of optional predicates over a bug.
///
/// `text` is a case-insensitive substring match against title and
/// description; a blank `text` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugFilter {
    pub text: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
    pub project: Option<String>,
    pub assignee: Option<String>,
}

impl BugFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn matches(&self, bug: &Bug) -> bool {
        self.matches_text(bug)
            && self.severity.is_none_or(|s| bug.severity == s)
            && self.status.is_none_or(|s| bug.status == s)
            && self.project.as_ref().is_none_or(|p| bug.project == *p)
            && self.assignee.as_ref().is_none_or(|a| bug.is_assigned_to(a))
    }

    fn matches_text(&self, bug: &Bug) -> bool {
        let Some(needle) = self.text.as_deref().map(str::trim) else {
            return true;
        };
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        bug.title.to_lowercase().contains(&needle)
            || bug.description.to_lowercase().contains(&needle)
    }
}
