//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const STATE_DIR_NAME: &str = "bountydesk";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API URL `{0}` (expected http:// or https://)")]
    InvalidApiUrl(String),

    #[error("no platform config directory; set BOUNTYDESK_STATE_DIR")]
    NoStateDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Where the token and intended-path slots are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// `session.json` inside this directory.
    Dir(PathBuf),
    /// Process memory only; nothing survives exit.
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub store: StoreLocation,
    pub timeouts: Timeouts,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `BOUNTYDESK_API_URL`: default `http://127.0.0.1:3000/api`
    /// - `BOUNTYDESK_STATE_DIR`: default `<config dir>/bountydesk`
    /// - `BOUNTYDESK_EPHEMERAL`: `1/true/yes/on` keeps the session in memory
    /// - `BOUNTYDESK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BOUNTYDESK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the URL is malformed or no state
    /// directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_api_url(&std::env::var("BOUNTYDESK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned()))?;

        let store = if env_bool("BOUNTYDESK_EPHEMERAL").unwrap_or(false) {
            StoreLocation::Ephemeral
        } else {
            match std::env::var("BOUNTYDESK_STATE_DIR") {
                Ok(dir) if !dir.trim().is_empty() => StoreLocation::Dir(PathBuf::from(dir)),
                _ => StoreLocation::Dir(default_state_dir()?),
            }
        };

        let timeouts = Timeouts {
            request_secs: env_parse_u64("BOUNTYDESK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BOUNTYDESK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_url, store, timeouts })
    }

    /// Ephemeral config pointed at `api_url`, with default timeouts.
    #[must_use]
    pub fn for_base_url(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            store: StoreLocation::Ephemeral,
            timeouts: Timeouts::default(),
        }
    }

    /// Replace the API URL (CLI override).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] if the URL is malformed.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(raw)?;
        Ok(self)
    }
}

pub(crate) fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(rest) if !rest.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidApiUrl(raw.to_owned())),
    }
}

fn default_state_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(STATE_DIR_NAME))
        .ok_or(ConfigError::NoStateDir)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
