use crate::support::{Session, print_json};
use bugboard_query::board_columns;
use bugboard_store::{BugFilter, Severity};
use serde_json::json;

pub fn run(
    session: &Session,
    search: Option<String>,
    severity: Option<Severity>,
    json_output: bool,
) {
    let (store, path) = session.load_store_or_exit();
    let filter = BugFilter {
        text: search,
        severity,
        ..BugFilter::default()
    };
    let columns = board_columns(store.snapshot(), &filter);

    if json_output {
        let payload = json!({
            "action": "board",
            "bugsPath": path.display().to_string(),
            "columns": columns
        });
        print_json(&payload);
        return;
    }

    println!("bugboard board\n  Path: {}", path.display());
    for column in &columns {
        println!();
        println!("  {} ({})", column.title, column.len());
        for bug in &column.bugs {
            println!(
                "    - {} [{} p:{}] {}",
                bug.id, bug.severity, bug.priority, bug.title
            );
        }
    }
}
