use crate::support::{Session, print_json};
use bugboard_query::DashboardSummary;
use serde_json::json;

pub fn run(session: &Session, json_output: bool) {
    let (store, path) = session.load_store_or_exit();
    let (provider, _) = session.load_identity_or_exit();
    let viewer = session.viewer_or_exit(&provider);

    let summary = DashboardSummary::build_with_recent(
        store.snapshot(),
        viewer.as_ref(),
        session.config.dashboard_recent_limit,
    );

    if json_output {
        let payload = json!({
            "action": "dashboard",
            "bugsPath": path.display().to_string(),
            "viewer": viewer,
            "summary": summary
        });
        print_json(&payload);
        return;
    }

    match &viewer {
        Some(user) => println!("bugboard dashboard ({} [{}])", user.name, user.role),
        None => println!("bugboard dashboard"),
    }
    println!("  total: {}", summary.total);
    println!("  open: {}", summary.open);
    println!("  in progress: {}", summary.in_progress);
    println!("  resolved: {}", summary.resolved);
    println!("  critical: {}", summary.critical);
    if viewer.is_some() {
        println!("  assigned to you: {}", summary.assigned_to_viewer);
    }
    println!();
    println!("  severity:");
    for bucket in &summary.severity {
        println!(
            "    {:<8} {:>3} ({:.1}%)",
            bucket.severity.as_str(), bucket.count, bucket.percentage
        );
    }
    println!();
    println!("  recent:");
    for entry in &summary.recent {
        println!(
            "    - {} [{} {}] {} ({})",
            entry.id,
            entry.status,
            entry.severity,
            entry.title,
            entry.updated_at.format("%Y-%m-%d")
        );
    }
}
