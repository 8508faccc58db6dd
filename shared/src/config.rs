use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

/// Android emulator loopback to the host machine.
pub const EMULATOR_ANDROID_BASE: &str = "http://10.0.2.2:8000";
/// iOS simulator shares the host's loopback.
pub const SIMULATOR_IOS_BASE: &str = "http://localhost:8000";
/// Physical devices on the LAN; override with `API_URL`.
pub const LAN_DEFAULT_BASE: &str = "http://localhost:8000";

pub const MAX_BASE_URL_LENGTH: usize = 2048;
/// Environment variables consulted by `from_env`, first non-blank wins.
pub const ENV_KEYS: [&str; 2] = ["API_URL", "API_BASE"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API base URL cannot be empty")]
    Empty,

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Where the shell is running; only used to pick a fallback base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    AndroidEmulator,
    IosSimulator,
    Device,
}

impl Platform {
    #[must_use]
    pub const fn fallback_base(self) -> &'static str {
        match self {
            Self::AndroidEmulator => EMULATOR_ANDROID_BASE,
            Self::IosSimulator => SIMULATOR_IOS_BASE,
            Self::Device => LAN_DEFAULT_BASE,
        }
    }
}

/// Backend location, handed to the core on mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    api_base: String,
}

impl ApiConfig {
    /// Validates `api_base` and strips trailing slashes so paths can be
    /// appended directly.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = api_base.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty);
        }

        if trimmed.len() > MAX_BASE_URL_LENGTH {
            return Err(ConfigError::InvalidUrl {
                url: trimmed.chars().take(100).collect(),
                reason: format!("exceeds maximum length of {MAX_BASE_URL_LENGTH} bytes"),
            });
        }

        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        let invalid = |reason: &str| ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            reason: reason.to_string(),
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("only 'http' and 'https' are allowed"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host"));
        }
        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(invalid("credentials in URL are not allowed"));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed"));
        }

        Ok(Self {
            api_base: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Explicit value wins; otherwise the platform fallback.
    pub fn resolve(explicit: Option<&str>, platform: Platform) -> Result<Self, ConfigError> {
        match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) => Self::new(url),
            None => Self::new(platform.fallback_base()),
        }
    }

    /// Reads `API_URL`, then `API_BASE`, from the process environment.
    pub fn from_env(platform: Platform) -> Result<Self, ConfigError> {
        Self::from_lookup(platform, |key| env::var(key).ok())
    }

    /// Like [`ApiConfig::from_env`], with variables read through `lookup`.
    /// A blank variable counts as unset.
    pub fn from_lookup<F>(platform: Platform, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = ENV_KEYS
            .iter()
            .filter_map(|&key| lookup(key))
            .find(|value| !value.trim().is_empty());
        Self::resolve(explicit.as_deref(), platform)
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}
