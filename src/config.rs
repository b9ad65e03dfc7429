//! Configuration management

use std::{env, fmt, path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Message reported when the connection settings are absent
pub const MISSING_CONFIG_MESSAGE: &str = "BTCPayServer configuration missing. Please set BTCPAY_BASE_URL and BTCPAY_API_KEY environment variables.";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Environment files to load before reading `BTCPAY_*` variables.
    /// Paths support ~ expansion. Loaded in order; variables already set in
    /// the process environment win.
    pub env_files: Vec<String>,
    /// Upstream server connection
    pub btcpay: BtcPayConfig,
}

/// Connection settings for the upstream BTCPayServer
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BtcPayConfig {
    /// Server root, e.g. `https://btcpay.example.com`
    pub base_url: String,
    /// Greenfield API key
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Store used when a call omits `storeId`
    pub store_id: Option<String>,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for BtcPayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            store_id: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for BtcPayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BtcPayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("store_id", &self.store_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BtcPayConfig {
    /// Check that the server can be reached with these settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base URL or API key is missing, or
    /// when the base URL is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() || self.api_key.trim().is_empty() {
            return Err(Error::Config(MISSING_CONFIG_MESSAGE.to_string()));
        }

        let url = Url::parse(self.base_url.trim())
            .map_err(|e| Error::Config(format!("Invalid BTCPAY_BASE_URL '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "BTCPAY_BASE_URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Default store id, ignoring blank values
    #[must_use]
    pub fn default_store(&self) -> Option<&str> {
        self.store_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// `BTCPAY_BASE_URL`, `BTCPAY_API_KEY`, `BTCPAY_STORE_ID` and
    /// `BTCPAY_TIMEOUT` override the `btcpay` section of the file. Missing
    /// connection settings are not an error here; see
    /// [`BtcPayConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut file = Figment::new();

        // Load from file if provided
        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            file = file.merge(Yaml::file(p));
        }

        // env_files must be loaded before BTCPAY_* variables are read
        let env_files: Vec<String> = file
            .extract_inner("env_files")
            .unwrap_or_default();
        load_env_files(&env_files);

        let figment = file.merge(
            Env::prefixed("BTCPAY_").map(|key| format!("btcpay.{key}").into()),
        );

        let mut config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.expand_env_vars();

        Ok(config)
    }

    /// Expand ${VAR} and ${VAR:-default} patterns in config values
    fn expand_env_vars(&mut self) {
        // Pattern: ${VAR} or ${VAR:-default}
        let Ok(re) = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}") else {
            return;
        };

        self.btcpay.base_url = expand_string(&re, &self.btcpay.base_url);
        if let Some(store) = &self.btcpay.store_id {
            self.btcpay.store_id = Some(expand_string(&re, store));
        }
    }
}

/// Load environment files into the process environment.
/// Supports ~ expansion. Files that don't exist are silently skipped.
fn load_env_files(paths: &[String]) {
    for path_str in paths {
        let expanded = if path_str.starts_with('~') {
            if let Some(home) = dirs::home_dir() {
                path_str.replacen('~', &home.display().to_string(), 1)
            } else {
                path_str.clone()
            }
        } else {
            path_str.clone()
        };

        let path = Path::new(&expanded);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(()) => {
                    tracing::info!("Loaded env file: {expanded}");
                }
                Err(e) => {
                    tracing::warn!("Failed to load env file {expanded}: {e}");
                }
            }
        } else {
            tracing::debug!("Env file not found (skipped): {expanded}");
        }
    }
}

/// Expand environment variables in a string
fn expand_string(re: &Regex, value: &str) -> String {
    re.replace_all(value, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map_or("", |m| m.as_str());
        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .into_owned()
}

/// Custom humantime serde module for Duration
pub mod humantime_serde {
    use std::time::Duration;

    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize Duration to human-readable string (e.g., "30s")
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the serializer fails.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    /// Deserialize human-readable duration (e.g., "30s", "5m", "100ms", or a
    /// bare number of seconds)
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the value cannot be parsed as a duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
            Raw::Text(s) => parse(s.trim()).map_err(serde::de::Error::custom),
        }
    }

    fn parse(s: &str) -> Result<Duration, std::num::ParseIntError> {
        // "ms" must be checked before "m" and "s"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim().parse::<u64>().map(Duration::from_millis)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim().parse::<u64>().map(Duration::from_secs)
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim().parse::<u64>().map(|m| Duration::from_secs(m * 60))
        } else {
            // Assume seconds
            s.parse::<u64>().map(Duration::from_secs)
        }
    }
}
