use std::env;
use std::path::PathBuf;
use std::time::Duration;

use strum::{Display, EnumString};
use thiserror::Error;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// "sqlite" (default) or "memory"
    pub const NOTES_STORAGE: &str = "NOTES_STORAGE";
    pub const RATE_LIMIT_WINDOW_SECS: &str = "RATE_LIMIT_WINDOW_SECS";
    /// Set to "0" to turn the limiter off.
    pub const RATE_LIMIT_MAX_REQUESTS: &str = "RATE_LIMIT_MAX_REQUESTS";
    pub const PUBLIC_DIR: &str = "PUBLIC_DIR";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 3000;
    pub const DATABASE_URL: &str = "notes.db";
    pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;
    pub const RATE_LIMIT_MAX_REQUESTS: u32 = 100;
    pub const PUBLIC_DIR: &str = "public";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a valid number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be one of sqlite, memory; got {value:?}")]
    UnknownStorage { var: &'static str, value: String },
}

/// Which `NoteStore` implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    /// Single-table SQLite file, survives restarts
    Sqlite,
    /// Process memory only, lost on restart
    Memory,
}

/// Request ceiling per client address per window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn is_enabled(&self) -> bool {
        self.max_requests > 0 && !self.window.is_zero()
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(defaults::RATE_LIMIT_WINDOW_SECS),
            max_requests: defaults::RATE_LIMIT_MAX_REQUESTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Relative paths resolve against the working directory
    pub database_url: String,
    pub storage: StorageBackend,
    pub rate_limit: RateLimitConfig,
    pub public_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: defaults::PORT,
            database_url: defaults::DATABASE_URL.to_string(),
            storage: StorageBackend::Sqlite,
            rate_limit: RateLimitConfig::default(),
            public_dir: PathBuf::from(defaults::PUBLIC_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source; unset variables fall back to `defaults`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup(env_vars::NOTES_STORAGE) {
            Some(value) => value
                .trim()
                .parse::<StorageBackend>()
                .map_err(|_| ConfigError::UnknownStorage {
                    var: env_vars::NOTES_STORAGE,
                    value,
                })?,
            None => StorageBackend::Sqlite,
        };

        let window_secs: u64 = parse_var(
            &lookup,
            env_vars::RATE_LIMIT_WINDOW_SECS,
            defaults::RATE_LIMIT_WINDOW_SECS,
        )?;

        Ok(Self {
            port: parse_var(&lookup, env_vars::PORT, defaults::PORT)?,
            database_url: lookup(env_vars::DATABASE_URL)
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            storage,
            rate_limit: RateLimitConfig {
                window: Duration::from_secs(window_secs),
                max_requests: parse_var(
                    &lookup,
                    env_vars::RATE_LIMIT_MAX_REQUESTS,
                    defaults::RATE_LIMIT_MAX_REQUESTS,
                )?,
            },
            public_dir: lookup(env_vars::PUBLIC_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(defaults::PUBLIC_DIR)),
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        None => Ok(default),
    }
}
