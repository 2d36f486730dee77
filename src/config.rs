//! Configuration for locating and talking to the dispatcher
//!
//! Values are looked up through the [`ConfigProvider`] trait using dotted
//! keys such as `dispatcher.address`. [`Config`] is the file and environment
//! backed provider, [`MapConfig`] an in-memory one.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use crate::error::{Result, SdkError};

pub const DISPATCHER_ADDRESS: &str = "dispatcher.address";
pub const DISPATCHER_PORT: &str = "dispatcher.port";
pub const RESULTS_SHORT_RETRIES: &str = "results.short_retries";
pub const RESULTS_LONG_RETRIES: &str = "results.long_retries";
pub const RESULTS_CONNECT_TIMEOUT_SECS: &str = "results.connect_timeout_secs";

/// Name of the config file inside the config directory
pub const CONFIG_FILE_NAME: &str = "covalent.conf";

/// Prefix of environment variables overriding file values
pub const ENV_PREFIX: &str = "COVALENT_";

/// Read-only lookup of configuration values by dotted key
pub trait ConfigProvider: Send + Sync {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;
}

/// Dispatcher location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    pub address: String,
    pub port: u16,
}

/// Result polling tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsConfig {
    /// Retries allowed for a short poll
    pub short_retries: usize,
    /// Retries allowed for a long poll
    pub long_retries: usize,
    pub connect_timeout_secs: u64,
}

/// SDK configuration loaded from defaults, `covalent.conf` and the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub dispatcher: DispatcherConfig,
    pub results: ResultsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherConfig {
                address: "localhost".to_string(),
                port: 48008,
            },
            results: ResultsConfig {
                short_retries: 5,
                long_retries: 1000,
                connect_timeout_secs: 10,
            },
        }
    }
}

impl Config {
    /// Loads the configuration from the default config file (if present)
    /// with `COVALENT_` environment variables layered on top
    ///
    /// Nested keys use `__` in variable names, e.g. `COVALENT_DISPATCHER__PORT`.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = default_config_path() {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Loads the configuration from an explicit TOML file on top of the defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SdkError::InvalidConfig(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        let config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()?;
        Ok(config)
    }
}

impl ConfigProvider for Config {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            DISPATCHER_ADDRESS => Some(self.dispatcher.address.clone()),
            DISPATCHER_PORT => Some(self.dispatcher.port.to_string()),
            RESULTS_SHORT_RETRIES => Some(self.results.short_retries.to_string()),
            RESULTS_LONG_RETRIES => Some(self.results.long_retries.to_string()),
            RESULTS_CONNECT_TIMEOUT_SECS => Some(self.results.connect_timeout_secs.to_string()),
            _ => None,
        }
    }
}

/// In-memory configuration
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the updated config
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(key.into(), value.to_string());
        self
    }
}

impl ConfigProvider for MapConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Resolves the directory holding `covalent.conf`
fn default_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("COVALENT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join("covalent"))
}

fn default_config_path() -> Option<PathBuf> {
    default_config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Looks up a required key
pub fn require(provider: &dyn ConfigProvider, key: &str) -> Result<String> {
    provider
        .get(key)
        .ok_or_else(|| SdkError::InvalidConfig(format!("missing key '{}'", key)))
}

/// Looks up and parses an optional key, falling back to `default`
pub fn parse_or<T: FromStr>(provider: &dyn ConfigProvider, key: &str, default: T) -> Result<T> {
    match provider.get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            SdkError::InvalidConfig(format!("'{}' is not a valid value for '{}'", raw, key))
        }),
        None => Ok(default),
    }
}

/// Builds the default dispatcher URL from `dispatcher.address` and `dispatcher.port`
pub fn dispatcher_url(provider: &dyn ConfigProvider) -> Result<String> {
    let address = require(provider, DISPATCHER_ADDRESS)?;
    let port = require(provider, DISPATCHER_PORT)?;
    Ok(format!("http://{}:{}", address, port))
}
