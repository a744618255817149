use bugboard_store::{Priority, Role, Severity, Status};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bugboard",
    about = "Bugboard: track bugs on a Kanban board with dashboard and analytics views",
    version
)]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config.toml (data files live next to it unless `data_dir` is set)
    #[arg(long, global = true, env = "BUGBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Email of the user to act as (falls back to `default_user` in config)
    #[arg(long = "as", global = true, env = "BUGBOARD_USER", value_name = "EMAIL")]
    pub acting_as: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create config, users and bugs files (seeded with demo data)
    Init {
        /// Start with no bugs instead of the demo set
        #[arg(long)]
        empty: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report, inspect and triage bugs
    Bug {
        #[command(subcommand)]
        command: BugCommands,
    },

    /// Show the Kanban board (one column per status)
    Board {
        /// Case-insensitive text to find in title or description
        #[arg(long)]
        search: Option<String>,

        /// Only show bugs of this severity
        #[arg(long)]
        severity: Option<Severity>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Overview counts and recent activity for the acting user
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolution rate, effort and distributions across all bugs
    Analytics {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage users of the mock identity provider
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum BugCommands {
    /// Report a new bug (testers and admins)
    Add {
        /// Bug title
        title: String,

        /// What goes wrong
        #[arg(long)]
        description: String,

        /// Project the bug belongs to
        #[arg(long)]
        project: String,

        /// low, medium, high or critical
        #[arg(long, default_value = "medium")]
        severity: Severity,

        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// Assignee (user ID or email)
        #[arg(long)]
        assignee: Option<String>,

        /// Estimated effort in hours
        #[arg(long)]
        estimate: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List bugs with optional filters
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<Status>,

        /// Filter by severity
        #[arg(long)]
        severity: Option<Severity>,

        /// Filter by assignee (user ID or email)
        #[arg(long)]
        assignee: Option<String>,

        /// Filter by project
        #[arg(long)]
        project: Option<String>,

        /// Case-insensitive text to find in title or description
        #[arg(long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one bug with its comments
    Show {
        /// Bug ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a bug to another status (developers and admins)
    Status {
        /// Bug ID
        id: String,

        /// open, in-progress, resolved or closed
        status: Status,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a bug's priority (developers and admins)
    Priority {
        /// Bug ID
        id: String,

        /// low, medium or high
        priority: Priority,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign a bug, or clear the assignee when `--to` is omitted
    Assign {
        /// Bug ID
        id: String,

        /// New assignee (user ID or email)
        #[arg(long)]
        to: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record estimated and/or actual effort in hours
    Time {
        /// Bug ID
        id: String,

        /// Estimated hours
        #[arg(long)]
        estimate: Option<f64>,

        /// Hours actually spent
        #[arg(long)]
        actual: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a comment to a bug
    Comment {
        /// Bug ID
        id: String,

        /// Comment text
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum UserCommands {
    /// List known users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that an email signs in, and show who it is
    Login {
        /// Account email
        email: String,

        /// Ignored by the mock provider
        #[arg(long, default_value = "")]
        password: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a new account
    Register {
        /// Display name
        name: String,

        /// Account email (must be unused)
        email: String,

        /// admin, developer or tester
        #[arg(long, default_value = "tester")]
        role: Role,

        /// Ignored by the mock provider
        #[arg(long, default_value = "")]
        password: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
