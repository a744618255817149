use crate::support::{Session, print_json};
use bugboard_query::AnalyticsReport;
use serde_json::json;

pub fn run(session: &Session, json_output: bool) {
    let (store, path) = session.load_store_or_exit();
    let report = AnalyticsReport::build_with_recent(store.snapshot(), session.config.recent_limit);

    if json_output {
        let payload = json!({
            "action": "analytics",
            "bugsPath": path.display().to_string(),
            "report": report
        });
        print_json(&payload);
        return;
    }

    println!("bugboard analytics\n  Path: {}", path.display());
    println!("  resolution rate: {:.1}%", report.resolution_percent);
    println!(
        "  avg resolution time: {:.1}h",
        report.average_resolution_time
    );
    println!("  open issues: {}", report.statuses.open);
    println!("  in progress: {}", report.statuses.in_progress);
    println!();
    println!("  severity:");
    for bucket in &report.severity {
        println!(
            "    {:<8} {:>3} ({:.1}%)",
            bucket.severity.as_str(), bucket.count, bucket.percentage
        );
    }
    println!();
    println!("  projects:");
    for (project, count) in &report.projects {
        println!("    {project}: {count}");
    }
    println!();
    println!("  recent activity:");
    for entry in &report.recent {
        println!(
            "    - {} [{}] {} ({})",
            entry.id,
            entry.status,
            entry.title,
            entry.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
}
