//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Default API root of the dashboard backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// Columns every uploaded CSV must carry (compared case-insensitively)
pub const DEFAULT_REQUIRED_COLUMNS: &[&str] = &[
    "name",
    "email",
    "gender",
    "aadhar no",
    "migration from city",
    "state",
    "education",
    "duration of living",
];

/// Client configuration for connecting to the dashboard API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://127.0.0.1:5000/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Where the session token is persisted. `None` keeps it in memory.
    pub token_path: Option<PathBuf>,

    /// Required CSV header columns
    pub required_columns: Vec<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            token_path: None,
            required_columns: DEFAULT_REQUIRED_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    /// Build a configuration from the environment (and `.env`, if present).
    ///
    /// - `DASHBOARD_API_URL`
    /// - `DASHBOARD_TIMEOUT_SECS`
    /// - `DASHBOARD_TOKEN_PATH`
    /// - `DASHBOARD_REQUIRED_COLUMNS` (comma separated)
    pub fn from_env() -> ClientResult<Self> {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env loaded: {}", e);
        }

        let base_url = std::env::var("DASHBOARD_API_URL").unwrap_or_else(|_| {
            tracing::debug!("DASHBOARD_API_URL not set, using development default");
            DEFAULT_BASE_URL.to_string()
        });
        let mut config = Self::new(base_url);

        if let Ok(raw) = std::env::var("DASHBOARD_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("DASHBOARD_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            config = config.with_timeout(secs);
        }
        if let Ok(path) = std::env::var("DASHBOARD_TOKEN_PATH") {
            config = config.with_token_path(path);
        }
        if let Ok(raw) = std::env::var("DASHBOARD_REQUIRED_COLUMNS") {
            config = config.with_required_columns(raw.split(','));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Persist the session token at this path
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Replace the required CSV columns
    pub fn with_required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.required_columns = columns
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    /// Request timeout as a `Duration`
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Reject configurations no client could work with
    pub fn validate(&self) -> ClientResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be at least 1 second".into()));
        }
        if self.required_columns.is_empty() {
            return Err(ClientError::Config(
                "at least one required CSV column must be configured".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
