//! Demo data: three users (one per role) and three bugs.
//!
//! `bugboard init` writes these unless `--empty` is given.

use crate::bug::{Bug, Comment, Priority, Severity, Status};
use crate::user::{Role, User};
use chrono::{DateTime, TimeZone, Utc};

pub fn demo_users() -> Vec<User> {
    vec![
        User::new("USR-1", "Admin User", "admin@example.com", Role::Admin),
        User::new("USR-2", "John Developer", "dev@example.com", Role::Developer),
        User::new("USR-3", "Jane Tester", "tester@example.com", Role::Tester),
    ]
}

pub fn demo_bugs() -> Vec<Bug> {
    vec![
        Bug {
            id: "BUG-1".to_string(),
            title: "Login button not responsive on mobile".to_string(),
            description: "The login button becomes unclickable on screens smaller than 768px"
                .to_string(),
            project: "Web App".to_string(),
            severity: Severity::High,
            status: Status::Open,
            priority: Priority::High,
            reported_by: "USR-3".to_string(),
            assigned_to: Some("USR-2".to_string()),
            created_at: at(2024, 1, 15, 10, 30),
            updated_at: at(2024, 1, 15, 10, 30),
            comments: Vec::new(),
            estimated_time: Some(4.0),
            actual_time: None,
        },
        Bug {
            id: "BUG-2".to_string(),
            title: "Database connection timeout".to_string(),
            description: "Users experiencing timeouts when accessing user profiles".to_string(),
            project: "Backend API".to_string(),
            severity: Severity::Critical,
            status: Status::InProgress,
            priority: Priority::High,
            reported_by: "USR-3".to_string(),
            assigned_to: Some("USR-2".to_string()),
            created_at: at(2024, 1, 14, 14, 20),
            updated_at: at(2024, 1, 15, 9, 15),
            comments: vec![Comment {
                id: "8d6c1f0e-2b7a-4c1e-9f3d-5a0b7e2c4d11".to_string(),
                text: "Looking into the connection pool settings".to_string(),
                author: "USR-2".to_string(),
                created_at: at(2024, 1, 15, 9, 15),
            }],
            estimated_time: Some(8.0),
            actual_time: Some(3.0),
        },
        Bug {
            id: "BUG-3".to_string(),
            title: "Typography inconsistency in headers".to_string(),
            description: "H2 and H3 tags have inconsistent font weights across pages".to_string(),
            project: "Web App".to_string(),
            severity: Severity::Low,
            status: Status::Resolved,
            priority: Priority::Low,
            reported_by: "USR-3".to_string(),
            assigned_to: Some("USR-2".to_string()),
            created_at: at(2024, 1, 13, 16, 45),
            updated_at: at(2024, 1, 14, 11, 30),
            comments: Vec::new(),
            estimated_time: Some(2.0),
            actual_time: Some(1.0),
        },
    ]
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
