//! Runtime configuration for the portal client.
//!
//! Defaults suit a local development backend; every value can be overridden
//! from the environment or programmatically.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Default API base address.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the API base address.
pub const ENV_API_URL: &str = "CAREPORTAL_API_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "CAREPORTAL_TIMEOUT_SECS";

/// Environment variable overriding the session storage directory.
pub const ENV_STORAGE_DIR: &str = "CAREPORTAL_STORAGE_DIR";

const SESSION_FILE: &str = "session.json";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API address is not a valid URL.
    #[error("Invalid API URL '{value}': {reason}")]
    InvalidUrl {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The timeout is not a positive number of seconds.
    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base address every endpoint path is appended to, without a trailing
    /// slash.
    pub api_base_url: String,
    /// Timeout applied to each request.
    pub request_timeout: Duration,
    /// `User-Agent` sent with each request.
    pub user_agent: String,
    /// Directory holding the persisted session.
    pub storage_dir: PathBuf,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            user_agent: format!("CarePortal/{}", env!("CARGO_PKG_VERSION")),
            storage_dir: default_storage_dir(),
        }
    }
}

impl PortalConfig {
    /// Builds the configuration from defaults and the process environment.
    ///
    /// # Errors
    /// Returns an error if an override is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from defaults and `lookup`.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    /// Returns an error if an override is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config = config.with_api_url(&url)?;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            config.request_timeout = parse_timeout(&secs)?;
        }
        if let Some(dir) = get(ENV_STORAGE_DIR) {
            config.storage_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Replaces the API base address after validating it.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidUrl`] unless `url` is an absolute
    /// `http` or `https` URL.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(url)?;
        Ok(self)
    }

    /// Replaces the storage directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Path of the persisted session file.
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.storage_dir.join(SESSION_FILE)
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".careportal"), |p| p.join("careportal"))
}

fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason,
    };

    let parsed = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(value.to_string())),
    }
}
