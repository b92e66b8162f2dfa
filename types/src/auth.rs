use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::SecretString;

/// Called by the assistant whenever it refreshes and persists its OAuth tokens.
pub type TokensUpdated = Arc<dyn Fn(&Tokens) + Send + Sync>;

/// Credentials the assistant needs to authenticate. Passed through untouched.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// OAuth client secret JSON downloaded from the Google console.
    key_file_path: PathBuf,
    /// Where the assistant saves tokens between runs.
    saved_tokens_path: PathBuf,
    #[serde(skip)]
    tokens_updated: Option<TokensUpdated>,
}

impl AuthConfig {
    pub fn new(key_file_path: impl Into<PathBuf>, saved_tokens_path: impl Into<PathBuf>) -> Self {
        Self {
            key_file_path: key_file_path.into(),
            saved_tokens_path: saved_tokens_path.into(),
            tokens_updated: None,
        }
    }

    pub fn with_tokens_updated<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Tokens) + Send + Sync + 'static,
    {
        self.tokens_updated = Some(Arc::new(callback));
        self
    }

    pub fn key_file_path(&self) -> &Path {
        &self.key_file_path
    }

    pub fn saved_tokens_path(&self) -> &Path {
        &self.saved_tokens_path
    }

    pub fn tokens_updated(&self) -> Option<&TokensUpdated> {
        self.tokens_updated.as_ref()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("key_file_path", &self.key_file_path)
            .field("saved_tokens_path", &self.saved_tokens_path)
            .field("tokens_updated", &self.tokens_updated.is_some())
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokensError {
    #[error("failed to read saved tokens: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse saved tokens: {0}")]
    Json(#[from] serde_json::Error),
}

/// OAuth tokens as the assistant persists them at `saved_tokens_path`.
#[derive(Debug, serde::Deserialize)]
pub struct Tokens {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    token_type: Option<String>,
    scope: Option<String>,
    /// Milliseconds since the unix epoch
    expiry_date: Option<u64>,
}

impl Tokens {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TokensError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn expiry_date(&self) -> Option<u64> {
        self.expiry_date
    }

    /// Tokens without an expiry never expire.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry <= now_ms)
    }
}
