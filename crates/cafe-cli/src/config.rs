//! Client configuration loading from file and environment variables.

use std::path::PathBuf;

use cafe_db::DbRuntimeSettings;
use cafe_types::UserType;
use serde::Deserialize;
use thiserror::Error;

/// Config file used when `CAFE_CONFIG_PATH` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "cafe.toml";

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Account creation settings.
    #[serde(default)]
    pub accounts: AccountsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Directory that `<dbname>.db` files are resolved against.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// SQLite busy timeout, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Whether to create missing tables on startup.
    #[serde(default = "default_bootstrap_schema")]
    pub bootstrap_schema: bool,
}

/// Account configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountsConfig {
    /// Role tag given to accounts created from the console.
    #[serde(default)]
    pub default_user_type: UserType,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "warn", "debug", "cafe_db=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_busy_timeout_ms() -> u64 {
    DbRuntimeSettings::default().busy_timeout_ms
}

fn default_bootstrap_schema() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            busy_timeout_ms: default_busy_timeout_ms(),
            bootstrap_schema: default_bootstrap_schema(),
        }
    }
}

impl DatabaseConfig {
    /// Connection tunables derived from this section.
    pub fn runtime_settings(&self) -> DbRuntimeSettings {
        DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Picks the config file path and reports where it came from.
pub fn resolve_config_path() -> (String, &'static str) {
    match std::env::var("CAFE_CONFIG_PATH") {
        Ok(path) if !path.trim().is_empty() => (path, "env-var"),
        _ => (DEFAULT_CONFIG_PATH.to_string(), "default"),
    }
}

/// Where the loaded configuration came from, before env overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    /// No file was given, or the file does not exist.
    Defaults,
}

impl ConfigOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Defaults => "defaults",
        }
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Runs before logging is initialised, so it logs nothing; the caller
/// reports the returned [`ConfigOrigin`].
///
/// Environment variable overrides:
/// - `CAFE_DATA_DIR` overrides `database.data_dir`
/// - `CAFE_BOOTSTRAP_SCHEMA` overrides `database.bootstrap_schema`
/// - `CAFE_LOG_LEVEL` overrides `logging.level`
/// - `CAFE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<(Config, ConfigOrigin), ConfigError> {
    let (mut config, origin) = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => (toml::from_str(&contents)?, ConfigOrigin::File),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (Config::default(), ConfigOrigin::Defaults)
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => (Config::default(), ConfigOrigin::Defaults),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok((config, origin))
}

/// Applies `CAFE_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup("CAFE_DATA_DIR") {
        config.database.data_dir = PathBuf::from(dir);
    }
    if let Some(bootstrap) = lookup("CAFE_BOOTSTRAP_SCHEMA") {
        config.database.bootstrap_schema = is_truthy(&bootstrap);
    }
    if let Some(level) = lookup("CAFE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("CAFE_LOG_JSON") {
        config.logging.json = is_truthy(&json);
    }
}

fn is_truthy(value: &str) -> bool {
    value == "true" || value == "1"
}
