//! Canonical in-memory bug store.
//!
//! This is the memory boundary for `bugboard-store`:
//! - own the bug collection and its insertion order
//! - apply creation/update/comment mutations with their invariants
//! - expose simple filtered views over the current snapshot
//!
//! Derived statistics live in `bugboard-query`, which reads
//! [`BugStore::snapshot`] and never mutates it.

use crate::access::{Action, authorize};
use crate::bug::{Bug, BugDraft, BugPatch, Comment, CommentDraft, Priority, Severity, Status};
use crate::clock::{Clock, SystemClock, advance_past};
use crate::filter::BugFilter;
use crate::jsonl::{JsonlError, read_bugs_from_path, write_bugs_to_path};
use crate::user::{Role, User};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Prefix of generated bug IDs (`BUG-1`, `BUG-2`, ...).
pub const BUG_ID_PREFIX: &str = "BUG-";

/// Errors raised by store mutations, snapshot I/O and role checks.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("bug not found: {0}")]
    BugNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("role {role} may not perform {action}")]
    Forbidden { role: Role, action: Action },
}

/// Owned bug collection. Hand it (or a reference to it) to whoever needs
/// to read or mutate bugs; there is no global instance.
#[derive(Debug, Clone)]
pub struct BugStore {
    bugs: Vec<Bug>,
    index: BTreeMap<String, usize>,
    clock: Arc<dyn Clock>,
}

impl Default for BugStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BugStore {
    /// Empty store on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Empty store reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            bugs: Vec::new(),
            index: BTreeMap::new(),
            clock,
        }
    }

    /// Build a store from fully-materialized bugs.
    ///
    /// Duplicate IDs are resolved with last-write-wins semantics; the
    /// surviving record keeps the position of the first occurrence.
    pub fn from_bugs(bugs: Vec<Bug>) -> Self {
        Self::from_bugs_with_clock(bugs, Arc::new(SystemClock))
    }

    pub fn from_bugs_with_clock(bugs: Vec<Bug>, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self::with_clock(clock);
        for bug in bugs {
            match store.index.get(&bug.id) {
                Some(&idx) => store.bugs[idx] = bug,
                None => {
                    store.index.insert(bug.id.clone(), store.bugs.len());
                    store.bugs.push(bug);
                }
            }
        }
        store
    }

    /// Load store state from a JSONL snapshot.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let bugs = read_bugs_from_path(path)?;
        Ok(Self::from_bugs(bugs))
    }

    /// Persist store state to a JSONL snapshot, in insertion order.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        write_bugs_to_path(path, &self.bugs)?;
        Ok(())
    }

    /// Total number of bugs.
    pub fn len(&self) -> usize {
        self.bugs.len()
    }

    /// Whether the store has zero bugs.
    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }

    /// Lookup one bug by ID.
    pub fn bug(&self, id: &str) -> Option<&Bug> {
        self.index.get(id).map(|&idx| &self.bugs[idx])
    }

    /// Iterate all bugs in insertion order.
    pub fn bugs(&self) -> impl Iterator<Item = &Bug> {
        self.bugs.iter()
    }

    /// The current state, in insertion order. Input for `bugboard-query`.
    pub fn snapshot(&self) -> &[Bug] {
        &self.bugs
    }

    // ── Mutations (lenient) ──

    /// File a new bug and return the stored record.
    ///
    /// The draft is not validated here (see [`BugStore::try_add_bug`]);
    /// whatever status it carries is replaced with `open`.
    pub fn add_bug(&mut self, draft: BugDraft) -> Bug {
        let id = self.next_bug_id();
        let now = self.clock.now();
        let bug = Bug::from_draft(id, draft, now);
        tracing::info!(bug = %bug.id, project = %bug.project, "bug added");
        self.index.insert(bug.id.clone(), self.bugs.len());
        self.bugs.push(bug.clone());
        bug
    }

    /// Merge `patch` into bug `id`. Silently does nothing if the bug is
    /// missing or the patch is rejected; use [`BugStore::try_update_bug`]
    /// to see why.
    ///
    /// An empty patch, or one that blanks the title, description or project,
    /// is ignored and leaves `updated_at` alone.
    pub fn update_bug(&mut self, id: &str, patch: BugPatch) {
        if let Err(error) = self.try_update_bug(id, patch) {
            tracing::debug!(bug = %id, %error, "update ignored");
        }
    }

    /// Append a comment to bug `bug_id`. Silently does nothing if the bug
    /// is missing or the text is blank; use [`BugStore::try_add_comment`]
    /// to see why.
    pub fn add_comment(&mut self, bug_id: &str, draft: CommentDraft) {
        if let Err(error) = self.try_add_comment(bug_id, draft) {
            tracing::debug!(bug = %bug_id, %error, "comment ignored");
        }
    }

    // ── Mutations (strict) ──

    /// [`BugStore::add_bug`], rejecting drafts with missing required fields.
    pub fn try_add_bug(&mut self, draft: BugDraft) -> Result<Bug, StoreError> {
        let problems = draft.problems();
        if !problems.is_empty() {
            return Err(StoreError::InvalidInput(problems.join("; ")));
        }
        Ok(self.add_bug(draft))
    }

    /// Merge `patch` into bug `id` and refresh its `updated_at`.
    ///
    /// The bug is left untouched if any field of the patch is invalid.
    pub fn try_update_bug(&mut self, id: &str, patch: BugPatch) -> Result<&Bug, StoreError> {
        let idx = self.position(id)?;
        if patch.is_empty() {
            return Err(StoreError::InvalidInput(
                "no update fields provided".to_string(),
            ));
        }
        let problems = patch.problems();
        if !problems.is_empty() {
            return Err(StoreError::InvalidInput(problems.join("; ")));
        }

        let now = self.clock.now();
        let bug = &mut self.bugs[idx];
        patch.apply_to(bug);
        bug.updated_at = advance_past(now, bug.updated_at);
        tracing::info!(bug = %bug.id, status = %bug.status, priority = %bug.priority, "bug updated");
        Ok(&*bug)
    }

    /// Append a comment (trimmed) to bug `bug_id` and touch the bug.
    pub fn try_add_comment(
        &mut self,
        bug_id: &str,
        draft: CommentDraft,
    ) -> Result<&Comment, StoreError> {
        let idx = self.position(bug_id)?;
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidInput(
                "comment text cannot be empty".to_string(),
            ));
        }
        if draft.author.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "comment author is required".to_string(),
            ));
        }

        let now = self.clock.now();
        let bug = &mut self.bugs[idx];
        let updated_at = advance_past(now, bug.updated_at);
        bug.comments.push(Comment {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            author: draft.author,
            created_at: updated_at,
        });
        bug.updated_at = updated_at;
        tracing::info!(bug = %bug.id, comments = bug.comments.len(), "comment added");

        let comment = bug
            .comments
            .last()
            .ok_or_else(|| StoreError::BugNotFound(bug_id.to_string()))?;
        Ok(comment)
    }

    // ── Mutations on behalf of a user ──

    /// File a bug as `actor`, who becomes its reporter.
    pub fn report_bug(&mut self, actor: &User, mut draft: BugDraft) -> Result<Bug, StoreError> {
        authorize(actor, Action::ReportBug)?;
        draft.reported_by = actor.id.clone();
        self.try_add_bug(draft)
    }

    pub fn change_status(
        &mut self,
        actor: &User,
        id: &str,
        status: Status,
    ) -> Result<&Bug, StoreError> {
        authorize(actor, Action::ChangeStatus)?;
        self.try_update_bug(id, BugPatch::status(status))
    }

    pub fn change_priority(
        &mut self,
        actor: &User,
        id: &str,
        priority: Priority,
    ) -> Result<&Bug, StoreError> {
        authorize(actor, Action::ChangePriority)?;
        self.try_update_bug(id, BugPatch::priority(priority))
    }

    /// Set (`Some`) or clear (`None`) the assignee.
    pub fn assign(
        &mut self,
        actor: &User,
        id: &str,
        assignee: Option<String>,
    ) -> Result<&Bug, StoreError> {
        authorize(actor, Action::Assign)?;
        self.try_update_bug(id, BugPatch::assign(assignee))
    }

    /// Record estimated and/or actual effort in hours. Gated like a
    /// status change, since it is part of working the bug.
    pub fn record_time(
        &mut self,
        actor: &User,
        id: &str,
        estimated: Option<f64>,
        actual: Option<f64>,
    ) -> Result<&Bug, StoreError> {
        authorize(actor, Action::ChangeStatus)?;
        let patch = BugPatch {
            estimated_time: estimated,
            actual_time: actual,
            ..BugPatch::default()
        };
        self.try_update_bug(id, patch)
    }

    /// Comment on bug `id` as `actor`.
    pub fn comment(
        &mut self,
        actor: &User,
        id: &str,
        text: impl Into<String>,
    ) -> Result<&Comment, StoreError> {
        authorize(actor, Action::Comment)?;
        self.try_add_comment(id, CommentDraft::new(text, actor.id.clone()))
    }

    // ── Views ──

    /// Bugs with `status`, in insertion order.
    pub fn by_status(&self, status: Status) -> Vec<&Bug> {
        self.bugs().filter(|bug| bug.status == status).collect()
    }

    /// Bugs with `severity`, in insertion order.
    pub fn by_severity(&self, severity: Severity) -> Vec<&Bug> {
        self.bugs().filter(|bug| bug.severity == severity).collect()
    }

    /// Bugs assigned to `user_id`, in insertion order.
    pub fn by_assignee(&self, user_id: &str) -> Vec<&Bug> {
        self.bugs().filter(|bug| bug.is_assigned_to(user_id)).collect()
    }

    /// Bugs matching `filter`, in insertion order.
    pub fn search(&self, filter: &BugFilter) -> Vec<&Bug> {
        self.bugs().filter(|bug| filter.matches(bug)).collect()
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::BugNotFound(id.to_string()))
    }

    fn next_bug_id(&self) -> String {
        let mut seq = self.bugs.len() + 1;
        loop {
            let candidate = format!("{BUG_ID_PREFIX}{seq}");
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
            seq += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::seed::{demo_bugs, demo_users};
    use chrono::{TimeZone, Utc};

    fn manual_store() -> (BugStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
        ));
        let store = BugStore::from_bugs_with_clock(demo_bugs(), clock.clone());
        (store, clock)
    }

    fn user(role: Role) -> User {
        demo_users()
            .into_iter()
            .find(|u| u.role == role)
            .expect("demo users cover every role")
    }

    #[test]
    fn add_bug_forces_open_and_fresh_id() {
        let (mut store, _) = manual_store();
        let mut draft = BugDraft::new("Crash on save", "Editor panics", "Desktop", "USR-3");
        draft.status = Some(Status::Closed);

        let bug = store.add_bug(draft);
        assert_eq!(bug.status, Status::Open);
        assert_eq!(bug.id, "BUG-4");
        assert_eq!(bug.created_at, bug.updated_at);
        assert!(bug.comments.is_empty());
        assert_eq!(store.bug("BUG-4"), Some(&bug));
    }

    #[test]
    fn generated_ids_skip_existing_ones() {
        let clash = Bug {
            id: "BUG-2".to_string(),
            ..demo_bugs().remove(0)
        };
        let mut store = BugStore::from_bugs(vec![clash]);
        let bug = store.add_bug(BugDraft::new("t", "d", "p", "r"));
        assert_eq!(bug.id, "BUG-3");
    }

    #[test]
    fn duplicate_ids_use_last_write_wins() {
        let first = demo_bugs().remove(0);
        let mut second = first.clone();
        second.status = Status::Closed;

        let store = BugStore::from_bugs(vec![first, demo_bugs().remove(1), second]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot()[0].status, Status::Closed);
    }

    #[test]
    fn try_add_bug_rejects_missing_fields() {
        let (mut store, _) = manual_store();
        let err = store
            .try_add_bug(BugDraft::new("", "desc", "Web App", "USR-3"))
            .expect_err("blank title must error");
        assert!(matches!(err, StoreError::InvalidInput(msg) if msg == "title is required"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn update_refreshes_updated_at_but_not_exempt_fields() {
        let (mut store, clock) = manual_store();
        let before = store.bug("BUG-1").cloned().expect("seeded");

        clock.advance(chrono::TimeDelta::hours(1));
        let after = store
            .try_update_bug("BUG-1", BugPatch::status(Status::InProgress))
            .expect("update should apply")
            .clone();

        assert_eq!(after.status, Status::InProgress);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.comments, before.comments);
        assert_eq!(after.reported_by, before.reported_by);
    }

    #[test]
    fn updated_at_strictly_increases_when_clock_stalls() {
        let (mut store, clock) = manual_store();
        clock.set(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let before = store.bug("BUG-2").expect("seeded").updated_at;
        store.update_bug("BUG-2", BugPatch::priority(Priority::Low));
        let first = store.bug("BUG-2").expect("seeded").updated_at;
        store.update_bug("BUG-2", BugPatch::priority(Priority::Medium));
        let second = store.bug("BUG-2").expect("seeded").updated_at;

        assert!(first > before);
        assert!(second > first);
    }

    #[test]
    fn update_missing_bug_is_a_silent_noop() {
        let (mut store, _) = manual_store();
        let before = store.snapshot().to_vec();
        store.update_bug("BUG-99", BugPatch::status(Status::Closed));
        assert_eq!(store.snapshot(), before.as_slice());

        let err = store
            .try_update_bug("BUG-99", BugPatch::status(Status::Closed))
            .expect_err("strict update must surface missing bug");
        assert!(matches!(err, StoreError::BugNotFound(id) if id == "BUG-99"));
    }

    #[test]
    fn invalid_patch_leaves_bug_untouched() {
        let (mut store, _) = manual_store();
        let before = store.bug("BUG-1").cloned();
        let patch = BugPatch {
            status: Some(Status::Closed),
            title: Some("  ".to_string()),
            ..BugPatch::default()
        };
        let err = store
            .try_update_bug("BUG-1", patch)
            .expect_err("blank title must error");
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(store.bug("BUG-1").cloned(), before);

        let err = store
            .try_update_bug("BUG-1", BugPatch::default())
            .expect_err("empty patch must error");
        assert!(matches!(err, StoreError::InvalidInput(msg) if msg == "no update fields provided"));
    }

    #[test]
    fn lenient_update_ignores_empty_and_blanking_patches() {
        let (mut store, clock) = manual_store();
        let before = store.bug("BUG-1").cloned();
        clock.advance(chrono::TimeDelta::hours(1));

        store.update_bug("BUG-1", BugPatch::default());
        store.update_bug(
            "BUG-1",
            BugPatch {
                project: Some(String::new()),
                ..BugPatch::default()
            },
        );
        assert_eq!(store.bug("BUG-1").cloned(), before);
    }

    #[test]
    fn assignee_can_be_cleared() {
        let (mut store, _) = manual_store();
        store.update_bug("BUG-1", BugPatch::assign(None));
        assert_eq!(store.bug("BUG-1").expect("seeded").assigned_to, None);
        assert!(store.by_assignee("USR-2").iter().all(|bug| bug.id != "BUG-1"));
    }

    #[test]
    fn comments_append_in_order_and_touch_bug() {
        let (mut store, clock) = manual_store();
        let before = store.bug("BUG-2").expect("seeded").updated_at;

        clock.advance(chrono::TimeDelta::minutes(1));
        store.add_comment("BUG-2", CommentDraft::new("  first  ", "USR-1"));
        store.add_comment("BUG-2", CommentDraft::new("second", "USR-3"));

        let bug = store.bug("BUG-2").expect("seeded");
        let texts: Vec<&str> = bug.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Looking into the connection pool settings", "first", "second"]);
        assert!(bug.updated_at > before);
        assert_eq!(bug.comments[2].created_at, bug.updated_at);
        assert_ne!(bug.comments[1].id, bug.comments[2].id);
    }

    #[test]
    fn blank_or_orphan_comments_change_nothing() {
        let (mut store, _) = manual_store();
        let before = store.snapshot().to_vec();

        store.add_comment("BUG-404", CommentDraft::new("hello", "USR-1"));
        store.add_comment("BUG-1", CommentDraft::new(" \n\t ", "USR-1"));
        assert_eq!(store.snapshot(), before.as_slice());

        let err = store
            .try_add_comment("BUG-1", CommentDraft::new("", "USR-1"))
            .expect_err("empty text must error");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn views_preserve_insertion_order() {
        let (mut store, _) = manual_store();
        store.add_bug(BugDraft {
            severity: Severity::Critical,
            assigned_to: Some("USR-2".to_string()),
            ..BugDraft::new("Outage", "Everything is down", "Backend API", "USR-1")
        });

        let ids = |bugs: Vec<&Bug>| bugs.into_iter().map(|b| b.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(store.by_status(Status::Open)), vec!["BUG-1", "BUG-4"]);
        assert_eq!(ids(store.by_severity(Severity::Critical)), vec!["BUG-2", "BUG-4"]);
        assert_eq!(
            ids(store.by_assignee("USR-2")),
            vec!["BUG-1", "BUG-2", "BUG-3", "BUG-4"]
        );
        assert_eq!(ids(store.search(&BugFilter::text("down"))), vec!["BUG-4"]);
    }

    #[test]
    fn gated_operations_check_roles_first() {
        let (mut store, _) = manual_store();
        let tester = user(Role::Tester);
        let developer = user(Role::Developer);
        let before = store.snapshot().to_vec();

        let err = store
            .change_status(&tester, "BUG-1", Status::Closed)
            .expect_err("tester cannot change status");
        assert!(matches!(err, StoreError::Forbidden { .. }));
        let err = store
            .report_bug(&developer, BugDraft::new("t", "d", "p", ""))
            .expect_err("developer cannot report");
        assert!(matches!(err, StoreError::Forbidden { .. }));
        assert_eq!(store.snapshot(), before.as_slice());

        let filed = store
            .report_bug(&tester, BugDraft::new("Broken link", "404 on docs", "Docs", "someone"))
            .expect("tester can report");
        assert_eq!(filed.reported_by, tester.id);

        let triaged = store
            .change_priority(&developer, &filed.id, Priority::High)
            .expect("developer can triage");
        assert_eq!(triaged.priority, Priority::High);

        let comment = store
            .comment(&tester, &filed.id, "Still broken")
            .expect("anyone can comment");
        assert_eq!(comment.author, tester.id);
    }

    #[test]
    fn record_time_sets_effort() {
        let (mut store, _) = manual_store();
        let admin = user(Role::Admin);
        let bug = store
            .record_time(&admin, "BUG-1", None, Some(2.5))
            .expect("admin can record time");
        assert_eq!(bug.estimated_time, Some(4.0));
        assert_eq!(bug.actual_time, Some(2.5));

        let err = store
            .record_time(&admin, "BUG-1", Some(-3.0), None)
            .expect_err("negative hours must error");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }
}
