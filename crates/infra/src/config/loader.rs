//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `BEAUTYWIKI_API_BASE_URL` is unset, falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BEAUTYWIKI_API_BASE_URL`: Backend base URL (required for env loading)
//! - `BEAUTYWIKI_API_TIMEOUT`: Request timeout in seconds
//! - `BEAUTYWIKI_USER_AGENT`: `User-Agent` header value
//! - `BEAUTYWIKI_STORAGE_BACKEND`: `keychain` or `memory`
//! - `BEAUTYWIKI_KEYCHAIN_SERVICE`: Keychain service name
//! - `BEAUTYWIKI_FACEPP_API_KEY` / `BEAUTYWIKI_FACEPP_API_SECRET`: Face++ credentials
//! - `BEAUTYWIKI_IMGUR_CLIENT_ID`: Imgur client id
//! - `BEAUTYWIKI_VOICE_BASE_URL`: Voice search host
//! - `BEAUTYWIKI_LOG_FILTER`: Log filter directive
//! - `BEAUTYWIKI_LOG_JSON`: JSON log output (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./beautywiki.json` or `./beautywiki.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use beautywiki_domain::{Config, Result, StorageBackend, WikiError};

const BASE_URL_VAR: &str = "BEAUTYWIKI_API_BASE_URL";

/// Load configuration with automatic fallback strategy
///
/// Environment variables win when `BEAUTYWIKI_API_BASE_URL` is set;
/// otherwise a config file is probed. An invalid environment value is an
/// error rather than a reason to fall back.
///
/// # Errors
/// Returns `WikiError::Config` if:
/// - An environment value cannot be parsed
/// - No config file is found, or it is invalid
pub fn load() -> Result<Config> {
    if std::env::var_os(BASE_URL_VAR).is_none() {
        tracing::debug!("{BASE_URL_VAR} not set, trying config file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only `BEAUTYWIKI_API_BASE_URL` is required; every other setting keeps
/// its default when unset.
///
/// # Errors
/// Returns `WikiError::Config` if the base URL is missing or a value is
/// invalid.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.base_url = env_var(BASE_URL_VAR)?;
    if let Some(timeout) = env_parse::<u64>("BEAUTYWIKI_API_TIMEOUT")? {
        config.api.timeout_seconds = timeout;
    }
    if let Some(agent) = env_opt("BEAUTYWIKI_USER_AGENT") {
        config.api.user_agent = agent;
    }

    if let Some(backend) = env_parse::<StorageBackend>("BEAUTYWIKI_STORAGE_BACKEND")? {
        config.storage.backend = backend;
    }
    if let Some(service) = env_opt("BEAUTYWIKI_KEYCHAIN_SERVICE") {
        config.storage.keychain_service = service;
    }

    config.external.face_plus_plus_api_key = env_opt("BEAUTYWIKI_FACEPP_API_KEY");
    config.external.face_plus_plus_api_secret = env_opt("BEAUTYWIKI_FACEPP_API_SECRET");
    config.external.imgur_client_id = env_opt("BEAUTYWIKI_IMGUR_CLIENT_ID");
    config.external.voice_base_url = env_opt("BEAUTYWIKI_VOICE_BASE_URL");

    if let Some(filter) = env_opt("BEAUTYWIKI_LOG_FILTER") {
        config.logging.filter = filter;
    }
    config.logging.json = env_bool("BEAUTYWIKI_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `WikiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WikiError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WikiError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WikiError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WikiError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WikiError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WikiError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory and its two parents, then the directory
/// of the running executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("beautywiki.json"),
        dir.join("beautywiki.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `WikiError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| WikiError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional environment variable; blank counts as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `WikiError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| WikiError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
