use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::home::consts::{KEY_FILE_PATH_VAR, LOG_ON_READY_VAR, SAVED_TOKENS_PATH_VAR, TIMEOUT_MS_VAR};
use crate::types::{AuthConfig, Tokens};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid timeout, expected milliseconds: {0}")]
    InvalidTimeout(String),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything `GoogleHome` needs: the assistant's credentials plus the
/// readiness options. Unknown keys in a config file are ignored.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeConfig {
    #[serde(flatten)]
    auth: AuthConfig,

    /// How long to wait for the assistant to become ready, in milliseconds.
    /// Waits forever when unset.
    #[serde(default, rename = "timeout", skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,

    /// Log a notice once the assistant is ready.
    #[serde(default)]
    log_on_ready: bool,
}

pub struct HomeConfigBuilder {
    config: HomeConfig,
}

impl Default for HomeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: HomeConfig::new(),
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    pub fn with_paths(mut self, key_file_path: impl Into<PathBuf>, saved_tokens_path: impl Into<PathBuf>) -> Self {
        let auth = AuthConfig::new(key_file_path, saved_tokens_path);
        self.config.auth = match self.config.auth.tokens_updated() {
            Some(callback) => {
                let callback = callback.clone();
                auth.with_tokens_updated(move |tokens: &Tokens| callback(tokens))
            }
            None => auth,
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_log_on_ready(mut self, log_on_ready: bool) -> Self {
        self.config.log_on_ready = log_on_ready;
        self
    }

    pub fn build(self) -> HomeConfig {
        self.config
    }
}

impl HomeConfig {
    // Empty paths, no timeout, quiet.
    pub fn new() -> Self {
        Self {
            auth: AuthConfig::new("", ""),
            timeout_ms: None,
            log_on_ready: false,
        }
    }

    pub fn builder() -> HomeConfigBuilder {
        HomeConfigBuilder::new()
    }

    /// Loads configuration from environment variables, reading `.env` first if present.
    ///
    // *   `GOOGLE_HOME_KEY_FILE_PATH`: OAuth client secret file. Required.
    // *   `GOOGLE_HOME_SAVED_TOKENS_PATH`: Where the assistant keeps its tokens. Required.
    // *   `GOOGLE_HOME_TIMEOUT_MS`: (Optional) Readiness timeout in milliseconds.
    // *   `GOOGLE_HOME_LOG_ON_READY`: (Optional) "true"/"1"/"yes" to log once ready.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| lookup(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()));

        let key_file_path = required(KEY_FILE_PATH_VAR)?;
        let saved_tokens_path = required(SAVED_TOKENS_PATH_VAR)?;

        let timeout_ms = match lookup(TIMEOUT_MS_VAR) {
            Some(raw) => {
                let parsed = raw.trim().parse::<u64>();
                Some(parsed.map_err(|_| ConfigError::InvalidTimeout(raw))?)
            }
            None => None,
        };

        let log_on_ready = lookup(LOG_ON_READY_VAR)
            .map(|raw| matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            auth: AuthConfig::new(key_file_path, saved_tokens_path),
            timeout_ms,
            log_on_ready,
        })
    }

    /// Reads a JSON config such as
    /// `{ "keyFilePath": "...", "savedTokensPath": "...", "timeout": 5000, "logOnReady": true }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn log_on_ready(&self) -> bool {
        self.log_on_ready
    }
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self::new()
    }
}
