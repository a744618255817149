use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = ".bugboard/config.toml";
pub const BUGS_FILE: &str = "bugs.jsonl";
pub const USERS_FILE: &str = "users.jsonl";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Settings read from `config.toml`.
///
/// Every field is optional in the file; missing ones take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `bugs.jsonl` and `users.jsonl`. Relative paths
    /// resolve against the directory of the config file; unset means that
    /// directory itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Email to act as when neither `--as` nor `BUGBOARD_USER` is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,

    /// Bugs listed under recent activity in `analytics`.
    pub recent_limit: usize,

    /// Bugs listed under recent activity in `dashboard`.
    pub dashboard_recent_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_user: None,
            recent_limit: bugboard_query::ANALYTICS_RECENT_LIMIT,
            dashboard_recent_limit: bugboard_query::DASHBOARD_RECENT_LIMIT,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolved data directory for a config living at `config_path`.
    pub fn data_dir(&self, config_path: &Path) -> PathBuf {
        let base = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = toml::from_str("default_user = \"dev@example.com\"\n")
            .expect("partial config should parse");
        assert_eq!(config.default_user.as_deref(), Some("dev@example.com"));
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.dashboard_recent_limit, 5);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn data_dir_resolves_against_config_location() {
        let config_path = Path::new("/srv/board/config.toml");
        let mut config = Config::default();
        assert_eq!(config.data_dir(config_path), PathBuf::from("/srv/board"));

        config.data_dir = Some(PathBuf::from("data"));
        assert_eq!(config.data_dir(config_path), PathBuf::from("/srv/board/data"));

        config.data_dir = Some(PathBuf::from("/var/lib/bugboard"));
        assert_eq!(
            config.data_dir(config_path),
            PathBuf::from("/var/lib/bugboard")
        );
    }

    #[test]
    fn wrong_value_types_are_parse_errors() {
        let err = toml::from_str::<Config>("recent_limit = \"ten\"\n").expect_err("bad type");
        assert!(err.to_string().contains("recent_limit"));
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!(
            "bugboard-config-{}-{}.toml",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos()
        ));
        let config = Config {
            default_user: Some("tester@example.com".to_string()),
            recent_limit: 3,
            ..Config::default()
        };
        config.save(&path).expect("config should save");
        assert_eq!(Config::load(&path).expect("config should load"), config);
        let _ = std::fs::remove_file(path);
    }
}
