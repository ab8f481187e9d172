//! Application configuration for rollup.
//!
//! User config lives at `~/.rollup/rollup.toml`.
//! CLI flags override environment variables, which override config file
//! values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RollupError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "rollup.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".rollup";

/// Fallback token variable used by the GitHub CLI.
const GH_TOKEN_ENV: &str = "GH_TOKEN";

// ---------------------------------------------------------------------------
// Config structs (matching rollup.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote API settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// What happens when a parent is closed.
    #[serde(default)]
    pub closing: ClosingConfig,

    /// Output defaults.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST API base URL (override for GitHub Enterprise).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Name of the env var holding the token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size when listing children.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
            per_page: default_per_page(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_per_page() -> u32 {
    100
}

/// `[closing]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingConfig {
    /// Comment posted on every item closed by rollup.
    #[serde(default = "default_note")]
    pub note: String,
}

impl Default for ClosingConfig {
    fn default() -> Self {
        Self {
            note: default_note(),
        }
    }
}

/// Comment posted on an item after it is closed, unless configured otherwise.
pub const DEFAULT_CLOSE_NOTE: &str = "All sub-issues are complete; closing automatically.";

fn default_note() -> String {
    DEFAULT_CLOSE_NOTE.into()
}

/// `[display]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Only print items that are closed (or would be).
    #[serde(default)]
    pub quiet: bool,

    /// Ask before closing anything.
    #[serde(default = "default_true")]
    pub confirm: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            confirm: true,
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.rollup/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RollupError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.rollup/rollup.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RollupError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| RollupError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| RollupError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| RollupError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| RollupError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Look up an API token from the environment.
///
/// Checks the variable named by `github.token_env`, then `GH_TOKEN`.
/// Empty values are ignored.
pub fn token_from_env(config: &AppConfig) -> Option<String> {
    [config.github.token_env.as_str(), GH_TOKEN_ENV]
        .into_iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
}

/// Error returned when no token source produced a value.
pub fn missing_token_error(config: &AppConfig) -> RollupError {
    let var_name = &config.github.token_env;
    RollupError::config(format!(
        "GitHub token not found. Set the {var_name} environment variable, pass --token,\n\
         or log in with `gh auth login`."
    ))
}
