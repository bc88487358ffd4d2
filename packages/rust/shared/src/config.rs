//! Application configuration for sitekb.
//!
//! User config lives at `~/.sitekb/sitekb.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SitekbError};
use crate::types::CrawlOptions;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitekb.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitekb";

// ---------------------------------------------------------------------------
// Config structs (matching sitekb.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTTP fetch policy.
    #[serde(default)]
    pub fetch: FetchDefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output directory for exported knowledge bases.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Default maximum link-following depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Default maximum number of pages per crawl.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_output_dir() -> String {
    "./kb".into()
}
fn default_max_depth() -> u32 {
    2
}
fn default_max_pages() -> usize {
    25
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchDefaultsConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirect hops to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Override for the User-Agent header (default is derived from the
    /// crate version).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for FetchDefaultsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}
fn default_max_redirects() -> usize {
    5
}

// ---------------------------------------------------------------------------
// Crawl config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Bounds passed to both discovery strategies.
    pub options: CrawlOptions,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum redirect hops.
    pub max_redirects: usize,
    /// Optional User-Agent override.
    pub user_agent: Option<String>,
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            options: CrawlOptions {
                max_depth: config.defaults.max_depth,
                max_pages: config.defaults.max_pages,
            },
            timeout_secs: config.fetch.timeout_secs,
            max_redirects: config.fetch.max_redirects,
            user_agent: config.fetch.user_agent.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitekb/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SitekbError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitekb/sitekb.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| SitekbError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SitekbError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SitekbError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SitekbError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SitekbError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
