//! Configuration loading and resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`<config dir>/vitaltrace/config.toml`)
//! 4. Compiled default (fallback)

use crate::outliers::Method;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable names
pub const ENV_DATABASE_PATH: &str = "VITALTRACE_DB";
pub const ENV_PORT: &str = "VITALTRACE_PORT";
pub const ENV_AUTH_URL: &str = "VITALTRACE_AUTH_URL";

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// SQLite database file path
    pub database_path: PathBuf,
    /// Identity resolver base URL; `None` runs development-mode auth
    pub auth_base_url: Option<String>,
    /// User-info path appended to the resolver base URL
    pub auth_user_info_path: String,
    /// Classification method used when a request does not name one
    pub default_method: Method,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5730,
            database_path: default_database_path(),
            auth_base_url: None,
            auth_user_info_path: "/users/me".to_string(),
            default_method: Method::IqrFence,
        }
    }
}

/// TOML file shape; every field optional so partial files merge over defaults
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    database_path: Option<PathBuf>,
    auth_base_url: Option<String>,
    auth_user_info_path: Option<String>,
    default_method: Option<String>,
}

/// Resolve the full service configuration
///
/// `cli_db` and `cli_port` come from clap in the binary and take the highest
/// priority; environment variables override the config file, which overrides
/// compiled defaults.
pub fn resolve_config(cli_db: Option<&str>, cli_port: Option<u16>) -> Result<ServiceConfig> {
    let file = load_config_file()?;
    let mut config = apply_file(ServiceConfig::default(), file)?;

    if let Ok(path) = std::env::var(ENV_DATABASE_PATH) {
        config.database_path = PathBuf::from(path);
    }
    if let Ok(port) = std::env::var(ENV_PORT) {
        config.port = port
            .parse()
            .map_err(|_| Error::Config(format!("{ENV_PORT} is not a valid port: {port}")))?;
    }
    if let Ok(url) = std::env::var(ENV_AUTH_URL) {
        if !url.is_empty() {
            config.auth_base_url = Some(url);
        }
    }

    if let Some(path) = cli_db {
        config.database_path = PathBuf::from(path);
    }
    if let Some(port) = cli_port {
        config.port = port;
    }

    Ok(config)
}

/// Parse a TOML config fragment over the compiled defaults
///
/// Split out of [`resolve_config`] so the merge logic is testable without a
/// file on disk.
pub fn config_from_toml_str(content: &str) -> Result<ServiceConfig> {
    let file: ConfigFile = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config file: {e}")))?;
    apply_file(ServiceConfig::default(), file)
}

fn apply_file(mut config: ServiceConfig, file: ConfigFile) -> Result<ServiceConfig> {
    if let Some(host) = file.host {
        config.host = host;
    }
    if let Some(port) = file.port {
        config.port = port;
    }
    if let Some(path) = file.database_path {
        config.database_path = path;
    }
    if let Some(url) = file.auth_base_url {
        config.auth_base_url = Some(url);
    }
    if let Some(path) = file.auth_user_info_path {
        config.auth_user_info_path = path;
    }
    if let Some(method) = file.default_method {
        config.default_method = Method::from_str(&method)
            .ok_or_else(|| Error::Config(format!("Unknown classification method: {method}")))?;
    }
    Ok(config)
}

fn load_config_file() -> Result<ConfigFile> {
    let Some(path) = dirs::config_dir().map(|d| d.join("vitaltrace").join("config.toml")) else {
        return Ok(ConfigFile::default());
    };
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {e}", path.display())))
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("vitaltrace"))
        .unwrap_or_else(|| PathBuf::from("./vitaltrace_data"))
        .join("vitaltrace.db")
}
