use bugboard_store::{Bug, BugFilter, Status};
use serde::Serialize;

/// One Kanban column: every bug currently in `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn<'a> {
    pub status: Status,
    pub title: &'static str,
    pub bugs: Vec<&'a Bug>,
}

impl BoardColumn<'_> {
    pub fn len(&self) -> usize {
        self.bugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }
}

/// Split the bugs matching `filter` into one column per status, in
/// workflow order. Columns are present even when empty, and each keeps
/// snapshot order.
pub fn board_columns<'a>(bugs: &'a [Bug], filter: &BugFilter) -> Vec<BoardColumn<'a>> {
    let visible: Vec<&Bug> = bugs.iter().filter(|bug| filter.matches(bug)).collect();
    tracing::debug!(total = bugs.len(), visible = visible.len(), "board filtered");

    Status::ALL
        .into_iter()
        .map(|status| BoardColumn {
            status,
            title: status.title(),
            bugs: visible
                .iter()
                .copied()
                .filter(|bug| bug.status == status)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugboard_store::{Severity, demo_bugs};

    fn ids<'a>(column: &BoardColumn<'a>) -> Vec<&'a str> {
        column.bugs.iter().copied().map(|bug| bug.id.as_str()).collect()
    }

    #[test]
    fn columns_partition_bugs_by_status() {
        let bugs = demo_bugs();
        let board = board_columns(&bugs, &BugFilter::default());

        let titles: Vec<&str> = board.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Open", "In Progress", "Resolved", "Closed"]);
        assert_eq!(ids(&board[0]), vec!["BUG-1"]);
        assert_eq!(ids(&board[1]), vec!["BUG-2"]);
        assert_eq!(ids(&board[2]), vec!["BUG-3"]);
        assert!(board[3].is_empty());
        assert_eq!(board.iter().map(BoardColumn::len).sum::<usize>(), bugs.len());
    }

    #[test]
    fn filter_applies_before_grouping() {
        let bugs = demo_bugs();
        let board = board_columns(&bugs, &BugFilter::text("mobile"));
        assert_eq!(ids(&board[0]), vec!["BUG-1"]);
        assert!(board[1..].iter().all(BoardColumn::is_empty));

        let board = board_columns(&bugs, &BugFilter::default().with_severity(Severity::Medium));
        assert!(board.iter().all(BoardColumn::is_empty));
        assert_eq!(board.len(), 4);
    }
}
