use crate::config::{BUGS_FILE, Config, USERS_FILE};
use crate::support::{Session, exit_with_error, print_json, yes_no};
use bugboard_store::{BugStore, demo_bugs, demo_users, write_users_to_path};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct InitOutcome {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub users_path: PathBuf,
    pub bugs_path: PathBuf,
    pub created_config: bool,
    pub created_users_file: bool,
    pub created_bugs_file: bool,
    pub seeded_bugs: usize,
}

/// Create whatever of config, users and bugs files is missing. Existing
/// files are never overwritten.
pub fn init_layout(
    config_path: &Path,
    config: &Config,
    empty: bool,
) -> Result<InitOutcome, String> {
    let mut created_config = false;
    if !config_path.exists() {
        config.save(config_path).map_err(|e| e.to_string())?;
        created_config = true;
    }

    let data_dir = config.data_dir(config_path);
    if !data_dir.as_os_str().is_empty() {
        fs::create_dir_all(&data_dir).map_err(|e| {
            format!(
                "failed to create data directory {}: {e}",
                data_dir.display()
            )
        })?;
    }

    let users_path = data_dir.join(USERS_FILE);
    let mut created_users_file = false;
    if !users_path.exists() {
        write_users_to_path(&users_path, &demo_users())
            .map_err(|e| format!("failed to initialize {}: {e}", users_path.display()))?;
        created_users_file = true;
    }

    let bugs_path = data_dir.join(BUGS_FILE);
    let mut created_bugs_file = false;
    let mut seeded_bugs = 0;
    if !bugs_path.exists() {
        let store = if empty {
            BugStore::new()
        } else {
            BugStore::from_bugs(demo_bugs())
        };
        store
            .save_jsonl(&bugs_path)
            .map_err(|e| format!("failed to initialize {}: {e}", bugs_path.display()))?;
        created_bugs_file = true;
        seeded_bugs = store.len();
    }

    tracing::info!(
        data_dir = %data_dir.display(),
        created_config,
        created_users_file,
        created_bugs_file,
        "workspace initialized"
    );

    Ok(InitOutcome {
        config_path: config_path.to_path_buf(),
        data_dir,
        users_path,
        bugs_path,
        created_config,
        created_users_file,
        created_bugs_file,
        seeded_bugs,
    })
}

pub fn run(session: &Session, empty: bool, json_output: bool) {
    let outcome = init_layout(&session.config_path, &session.config, empty)
        .unwrap_or_else(|e| exit_with_error(e));

    if json_output {
        let payload = json!({
            "action": "init",
            "configPath": outcome.config_path.display().to_string(),
            "dataDir": outcome.data_dir.display().to_string(),
            "usersPath": outcome.users_path.display().to_string(),
            "bugsPath": outcome.bugs_path.display().to_string(),
            "createdConfig": outcome.created_config,
            "createdUsersFile": outcome.created_users_file,
            "createdBugsFile": outcome.created_bugs_file,
            "seededBugs": outcome.seeded_bugs
        });
        print_json(&payload);
        return;
    }

    println!("bugboard init");
    println!();
    println!("  config: {}", outcome.config_path.display());
    println!("  data dir: {}", outcome.data_dir.display());
    println!("  created config: {}", yes_no(outcome.created_config));
    println!(
        "  created users file: {}",
        yes_no(outcome.created_users_file)
    );
    println!(
        "  created bugs file: {} ({} demo bugs)",
        yes_no(outcome.created_bugs_file),
        outcome.seeded_bugs
    );
}
