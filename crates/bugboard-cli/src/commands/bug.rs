use crate::cli::BugCommands;
use crate::support::{
    Session, bug_line, display_user, exit_with_error, hours, print_json, resolve_user_or_exit,
    save_store_or_exit,
};
use bugboard_store::{Bug, BugDraft, BugFilter, Priority, Severity, Status, StoreError};
use serde_json::json;
use std::path::Path;

pub fn run(session: &Session, command: BugCommands) {
    match command {
        BugCommands::Add {
            title,
            description,
            project,
            severity,
            priority,
            assignee,
            estimate,
            json,
        } => run_add(
            session,
            NewBug {
                title,
                description,
                project,
                severity,
                priority,
                assignee,
                estimate,
            },
            json,
        ),

        BugCommands::List {
            status,
            severity,
            assignee,
            project,
            search,
            json,
        } => run_list(
            session,
            ListFilter {
                status,
                severity,
                assignee,
                project,
                search,
            },
            json,
        ),

        BugCommands::Show { id, json } => run_show(session, &id, json),

        BugCommands::Status { id, status, json } => run_status(session, &id, status, json),

        BugCommands::Priority { id, priority, json } => {
            run_priority(session, &id, priority, json)
        }

        BugCommands::Assign { id, to, json } => run_assign(session, &id, to, json),

        BugCommands::Time {
            id,
            estimate,
            actual,
            json,
        } => run_time(session, &id, estimate, actual, json),

        BugCommands::Comment { id, text, json } => run_comment(session, &id, &text, json),
    }
}

struct NewBug {
    title: String,
    description: String,
    project: String,
    severity: Severity,
    priority: Priority,
    assignee: Option<String>,
    estimate: Option<f64>,
}

struct ListFilter {
    status: Option<Status>,
    severity: Option<Severity>,
    assignee: Option<String>,
    project: Option<String>,
    search: Option<String>,
}

fn run_add(session: &Session, new: NewBug, json_output: bool) {
    let (mut store, path) = session.load_store_or_exit();
    let (provider, _) = session.load_identity_or_exit();
    let actor = session.acting_user_or_exit(&provider);

    let assigned_to = new
        .assignee
        .as_deref()
        .map(|reference| resolve_user_or_exit(&provider, reference).id);
    let draft = BugDraft {
        severity: new.severity,
        priority: new.priority,
        assigned_to,
        estimated_time: new.estimate,
        ..BugDraft::new(new.title, new.description, new.project, actor.id.clone())
    };

    let bug = ok_or_exit(store.report_bug(&actor, draft));
    save_store_or_exit(&store, &path);

    if json_output {
        print_bug_payload("bug.add", &path, &bug);
    } else {
        println!(
            "bugboard bug add\n  Added: {} [{}]\n  Path: {}",
            bug.id,
            bug.status,
            path.display()
        );
    }
}

fn run_list(session: &Session, filter: ListFilter, json_output: bool) {
    let (store, path) = session.load_store_or_exit();
    let assignee = filter.assignee.as_deref().map(|reference| {
        let (provider, _) = session.load_identity_or_exit();
        resolve_user_or_exit(&provider, reference).id
    });
    let filter = BugFilter {
        text: filter.search,
        severity: filter.severity,
        status: filter.status,
        project: filter.project,
        assignee,
    };

    let rows = store.search(&filter);

    if json_output {
        let payload = json!({
            "action": "bug.list",
            "bugsPath": path.display().to_string(),
            "count": rows.len(),
            "items": rows
        });
        print_json(&payload);
    } else {
        println!(
            "bugboard bug list\n  Path: {}\n  Count: {}",
            path.display(),
            rows.len()
        );
        for bug in rows {
            println!("  - {}", bug_line(bug));
        }
    }
}

fn run_show(session: &Session, id: &str, json_output: bool) {
    let (store, path) = session.load_store_or_exit();
    let bug = store
        .bug(id)
        .unwrap_or_else(|| exit_with_error(StoreError::BugNotFound(id.to_string())));

    if json_output {
        print_bug_payload("bug.show", &path, bug);
        return;
    }

    let (provider, _) = session.load_identity_or_exit();
    println!("{}", bug_line(bug));
    println!();
    println!("  {}", bug.description);
    println!();
    println!("  reported by: {}", display_user(&provider, &bug.reported_by));
    println!(
        "  assigned to: {}",
        bug.assigned_to
            .as_deref()
            .map_or_else(|| "-".to_string(), |id| display_user(&provider, id))
    );
    println!("  created: {}", bug.created_at.to_rfc3339());
    println!("  updated: {}", bug.updated_at.to_rfc3339());
    println!(
        "  effort: {} estimated, {} actual",
        hours(bug.estimated_time),
        hours(bug.actual_time)
    );
    println!("  comments: {}", bug.comments.len());
    for comment in &bug.comments {
        println!(
            "    - {} ({}): {}",
            display_user(&provider, &comment.author),
            comment.created_at.to_rfc3339(),
            comment.text
        );
    }
}

fn run_status(session: &Session, id: &str, status: Status, json_output: bool) {
    let (mut store, path) = session.load_store_or_exit();
    let (provider, _) = session.load_identity_or_exit();
    let actor = session.acting_user_or_exit(&provider);

    let bug = ok_or_exit(store.change_status(&actor, id, status)).clone();
    save_store_or_exit(&store, &path);

    if json_output {
        print_bug_payload("bug.status", &path, &bug);
    } else {
        println!(
            "bugboard bug status\n  Updated: {} [{}]\n  Path: {}",
            bug.id,
            bug.status,
            path.display()
        );
    }
}

fn run_priority(session: &Session, id: &str, priority: Priority, json_output: bool) {
    let (mut store, path) = session.load_store_or_exit();
    let (provider, _) = session.load_identity_or_exit();
    let actor = session.acting_user_or_exit(&provider);

    let bug = ok_or_exit(store.change_priority(&actor, id, priority)).clone();
    save_store_or_exit(&store, &path);

    if json_output {
        print_bug_payload("bug.priority", &path, &bug);
    } else {
        println!(
            "bugboard bug priority\n  Updated: {} [p:{}]\n  Path: {}",
            bug.id,
            bug.priority,
            path.display()
        );
    }
}

fn run_assign(session: &Session, id: &str, to: Option<String>, json_output: bool) {
    let (mut store, path) = session.load_store_or_exit();
    let (provider, _) = session.load_identity_or_exit();
    let actor = session.acting_user_or_exit(&provider);
    let assignee = to
        .as_deref()
        .map(|reference| resolve_user_or_exit(&provider, reference).id);

    let bug = ok_or_exit(store.assign(&actor, id, assignee)).clone();
    save_store_or_exit(&store, &path);

    if json_output {
        print_bug_payload("bug.assign", &path, &bug);
    } else {
        println!(
            "bugboard bug assign\n  Updated: {} -> {}\n  Path: {}",
            bug.id,
            bug.assigned_to
                .as_deref()
                .map_or_else(|| "(unassigned)".to_string(), |id| display_user(&provider, id)),
            path.display()
        );
    }
}

fn run_time(
    session: &Session,
    id: &str,
    estimate: Option<f64>,
    actual: Option<f64>,
    json_output: bool,
) {
    let (mut store, path) = session.load_store_or_exit();
    let (provider, _) = session.load_identity_or_exit();
    let actor = session.acting_user_or_exit(&provider);

    let bug = ok_or_exit(store.record_time(&actor, id, estimate, actual)).clone();
    save_store_or_exit(&store, &path);

    if json_output {
        print_bug_payload("bug.time", &path, &bug);
    } else {
        println!(
            "bugboard bug time\n  Updated: {} ({} estimated, {} actual)\n  Path: {}",
            bug.id,
            hours(bug.estimated_time),
            hours(bug.actual_time),
            path.display()
        );
    }
}

fn run_comment(session: &Session, id: &str, text: &str, json_output: bool) {
    let (mut store, path) = session.load_store_or_exit();
    let (provider, _) = session.load_identity_or_exit();
    let actor = session.acting_user_or_exit(&provider);

    let comment = ok_or_exit(store.comment(&actor, id, text)).clone();
    save_store_or_exit(&store, &path);

    if json_output {
        let payload = json!({
            "action": "bug.comment",
            "bugsPath": path.display().to_string(),
            "bugId": id,
            "comment": comment
        });
        print_json(&payload);
    } else {
        println!(
            "bugboard bug comment\n  Added: {} on {}\n  Path: {}",
            comment.id,
            id,
            path.display()
        );
    }
}

fn ok_or_exit<T>(result: Result<T, StoreError>) -> T {
    result.unwrap_or_else(|e| exit_with_error(e))
}

fn print_bug_payload(action: &str, path: &Path, bug: &Bug) {
    let payload = json!({
        "action": action,
        "bugsPath": path.display().to_string(),
        "bug": bug
    });
    print_json(&payload);
}
