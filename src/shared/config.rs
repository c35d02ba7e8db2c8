use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::dirs;

/// Top-level configuration for ghkit.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Settings for calls made through the GitHub CLI.
    #[serde(default)]
    pub gh: GhConfig,

    /// Branch cleanup settings.
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

/// GitHub CLI invocation settings.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GhConfig {
    /// Per-call timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between repositories when listing issues for a user, in milliseconds (default: 500).
    #[serde(default = "default_list_delay_ms")]
    pub list_delay_ms: u64,

    /// Maximum number of repositories enumerated for `issue list --user` (default: 1000).
    #[serde(default = "default_repo_list_limit")]
    pub repo_list_limit: u32,
}

impl GhConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn list_delay(&self) -> Duration {
        Duration::from_millis(self.list_delay_ms)
    }
}

impl Default for GhConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            list_delay_ms: default_list_delay_ms(),
            repo_list_limit: default_repo_list_limit(),
        }
    }
}

/// Branch cleanup configuration.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CleanupConfig {
    /// Directory scanned when no path is given on the command line.
    /// Falls back to the current directory when unset.
    #[serde(default)]
    pub root: Option<String>,

    /// Trunk branch names in order of preference (default: ["main", "master"]).
    #[serde(default = "default_trunk_branches")]
    pub trunk_branches: Vec<String>,
}

impl CleanupConfig {
    /// Resolve the configured root, expanding `~`.
    pub fn root_path(&self) -> Option<PathBuf> {
        self.root.as_deref().map(dirs::expand_tilde)
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            root: None,
            trunk_branches: default_trunk_branches(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_list_delay_ms() -> u64 {
    500
}

fn default_repo_list_limit() -> u32 {
    1000
}

fn default_trunk_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file (permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid config file {path}: cleanup.trunk_branches must not be empty")]
    NoTrunkBranches { path: PathBuf },

    #[error("Invalid config file {path}: gh.timeout_secs must be at least 1")]
    ZeroTimeout { path: PathBuf },
}

/// Load configuration from ~/.config/ghkit/config.ya?ml.
/// Returns Config::default() if no config file exists.
pub fn load_config() -> anyhow::Result<Config> {
    let Some(dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    load_config_from_dir(&dir.join("ghkit"))
}

/// Load configuration from a specific directory.
/// Searches for config.yaml, then config.yml in the given directory.
/// Returns Config::default() if neither file exists.
pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    for filename in &["config.yaml", "config.yml"] {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loading config");
                return parse_config(&content, &path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }

    Ok(Config::default())
}

/// Parse YAML content into Config.
fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if config.gh.timeout_secs == 0 {
        return Err(ConfigError::ZeroTimeout {
            path: path.to_path_buf(),
        }
        .into());
    }

    if config.cleanup.trunk_branches.is_empty() {
        return Err(ConfigError::NoTrunkBranches {
            path: path.to_path_buf(),
        }
        .into());
    }

    Ok(config)
}
