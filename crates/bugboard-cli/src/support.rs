use crate::config::{BUGS_FILE, Config, DEFAULT_CONFIG_PATH, USERS_FILE};
use bugboard_store::{
    Bug, BugStore, IdentityProvider, MockIdentityProvider, User, read_users_from_path,
    write_users_to_path,
};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Resolved config plus the acting-user hint, shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub config_path: PathBuf,
    pub config: Config,
    acting_as: Option<String>,
}

impl Session {
    pub fn open_or_exit(config_arg: Option<PathBuf>, acting_as: Option<String>) -> Self {
        let config_path = config_arg.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let config = Config::load_or_default(&config_path).unwrap_or_else(|e| exit_with_error(e));
        Self {
            config_path,
            config,
            acting_as,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.data_dir(&self.config_path)
    }

    pub fn bugs_path(&self) -> PathBuf {
        self.data_dir().join(BUGS_FILE)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir().join(USERS_FILE)
    }

    pub fn load_store_or_exit(&self) -> (BugStore, PathBuf) {
        let path = self.bugs_path();
        require_initialized_or_exit(&path);
        let store = BugStore::load_jsonl(&path).unwrap_or_else(|e| {
            exit_with_error(format!("failed to load {}: {e}", path.display()))
        });
        tracing::debug!(path = %path.display(), bugs = store.len(), "bugs loaded");
        (store, path)
    }

    pub fn load_identity_or_exit(&self) -> (MockIdentityProvider, PathBuf) {
        let path = self.users_path();
        require_initialized_or_exit(&path);
        let users = read_users_from_path(&path).unwrap_or_else(|e| {
            exit_with_error(format!("failed to load {}: {e}", path.display()))
        });
        (MockIdentityProvider::from_users(users), path)
    }

    /// The email to act as: `--as`/`BUGBOARD_USER`, then `default_user`.
    pub fn acting_email(&self) -> Option<&str> {
        self.acting_as
            .as_deref()
            .or(self.config.default_user.as_deref())
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }

    /// Sign in as the acting user, or exit.
    pub fn acting_user_or_exit(&self, provider: &MockIdentityProvider) -> User {
        let Some(email) = self.acting_email() else {
            exit_with_error(
                "no acting user; pass --as <email>, set BUGBOARD_USER, or set default_user in config",
            );
        };
        provider
            .login(email, "")
            .unwrap_or_else(|| exit_with_error(format!("unknown user: {email}")))
    }

    /// Like [`Session::acting_user_or_exit`], but anonymous is fine.
    pub fn viewer_or_exit(&self, provider: &MockIdentityProvider) -> Option<User> {
        self.acting_email()
            .map(|_| self.acting_user_or_exit(provider))
    }
}

pub fn save_store_or_exit(store: &BugStore, path: &Path) {
    store.save_jsonl(path).unwrap_or_else(|e| {
        exit_with_error(format!("failed to save {}: {e}", path.display()))
    });
}

pub fn save_users_or_exit(users: &[User], path: &Path) {
    write_users_to_path(path, users).unwrap_or_else(|e| {
        exit_with_error(format!("failed to save {}: {e}", path.display()))
    });
}

/// Find a user by ID or, failing that, by email.
pub fn resolve_user_or_exit(provider: &MockIdentityProvider, reference: &str) -> User {
    provider
        .user(reference.trim())
        .or_else(|| provider.find_by_email(reference))
        .cloned()
        .unwrap_or_else(|| exit_with_error(format!("unknown user: {reference}")))
}

fn require_initialized_or_exit(path: &Path) {
    if !path.exists() {
        exit_with_error(format!(
            "{} not found (run `bugboard init` first)",
            path.display()
        ));
    }
}

pub fn exit_with_error(message: impl Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

pub fn print_json(payload: &impl Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}

/// `name <email>` for a user ID, or the raw ID if unknown.
pub fn display_user(provider: &MockIdentityProvider, id: &str) -> String {
    match provider.user(id) {
        Some(user) => format!("{} <{}>", user.name, user.email),
        None => id.to_string(),
    }
}

pub fn bug_line(bug: &Bug) -> String {
    format!(
        "{} [{} {} p:{}] {} ({})",
        bug.id, bug.status, bug.severity, bug.priority, bug.title, bug.project
    )
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}

pub fn hours(value: Option<f64>) -> String {
    match value {
        Some(h) => format!("{h:.1}h"),
        None => "-".to_string(),
    }
}
