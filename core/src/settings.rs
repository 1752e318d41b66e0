//! Transport settings for the joke API client.
//!
//! Loaded from a TOML file, from `ICNDB_*` environment variables, or both
//! (environment wins). Only the base URL and the agent options live here; the
//! block configuration is a separate, per-render concern.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SettingsError;

pub const DEFAULT_BASE_URL: &str = "http://api.icndb.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_BASE_URL: &str = "ICNDB_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ICNDB_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "ICNDB_USER_AGENT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    /// Whole-request timeout. `None` leaves the agent without a limit.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl ClientSettings {
    pub fn from_toml_str(raw: &str) -> Result<Self, SettingsError> {
        let settings: ClientSettings = toml::from_str(raw)?;
        settings.validated()
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values returned by `lookup` for the `ICNDB_*` keys.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| SettingsError::InvalidTimeout(raw.clone()))?;
            self.timeout_secs = (secs > 0).then_some(secs);
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            self.user_agent = Some(agent).filter(|a| !a.trim().is_empty());
        }
        self.validated()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check the base URL and normalize it to have no trailing slash.
    fn validated(mut self) -> Result<Self, SettingsError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| SettingsError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}
