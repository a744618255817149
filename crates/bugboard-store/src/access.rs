//! Role capabilities.
//!
//! Every gated mutation asks [`can_transition`] first; nothing else in the
//! crate branches on [`Role`].

use crate::memory::StoreError;
use crate::user::{Role, User};
use std::fmt;

/// A mutation that is subject to a role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// File a new bug report.
    ReportBug,
    /// Move a bug between workflow statuses (also covers effort tracking).
    ChangeStatus,
    ChangePriority,
    /// Set or clear the assignee.
    Assign,
    Comment,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ReportBug => "report-bug",
            Action::ChangeStatus => "change-status",
            Action::ChangePriority => "change-priority",
            Action::Assign => "assign",
            Action::Comment => "comment",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `role` may perform `action`.
///
/// Testers and admins file reports; developers and admins triage; anyone
/// signed in may comment.
pub fn can_transition(role: Role, action: Action) -> bool {
    match action {
        Action::ReportBug => matches!(role, Role::Tester | Role::Admin),
        Action::ChangeStatus | Action::ChangePriority | Action::Assign => {
            matches!(role, Role::Developer | Role::Admin)
        }
        Action::Comment => true,
    }
}

/// [`can_transition`] as a `Result`, for use with `?`.
pub fn authorize(user: &User, action: Action) -> Result<(), StoreError> {
    if can_transition(user.role, action) {
        Ok(())
    } else {
        tracing::debug!(user = %user.id, role = %user.role, %action, "action denied");
        Err(StoreError::Forbidden {
            role: user.role,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [Role; 3] = [Role::Admin, Role::Developer, Role::Tester];

    #[test]
    fn only_testers_and_admins_report() {
        let allowed: Vec<Role> = ROLES
            .into_iter()
            .filter(|role| can_transition(*role, Action::ReportBug))
            .collect();
        assert_eq!(allowed, vec![Role::Admin, Role::Tester]);
    }

    #[test]
    fn only_developers_and_admins_triage() {
        for action in [Action::ChangeStatus, Action::ChangePriority, Action::Assign] {
            assert!(can_transition(Role::Admin, action));
            assert!(can_transition(Role::Developer, action));
            assert!(!can_transition(Role::Tester, action), "{action}");
        }
    }

    #[test]
    fn everyone_comments() {
        assert!(ROLES.into_iter().all(|role| can_transition(role, Action::Comment)));
    }

    #[test]
    fn authorize_reports_role_and_action() {
        let tester = User::new("3", "Jane Tester", "tester@example.com", Role::Tester);
        let err = authorize(&tester, Action::ChangeStatus).expect_err("tester cannot triage");
        assert!(matches!(
            err,
            StoreError::Forbidden {
                role: Role::Tester,
                action: Action::ChangeStatus
            }
        ));
        assert_eq!(
            err.to_string(),
            "role tester may not perform change-status"
        );
    }
}
