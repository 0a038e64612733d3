//! Credential retrieval.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

/// Errors raised when a secret cannot be retrieved.
#[derive(Debug, Error)]
pub enum SecretError {
    /// No secret exists under the requested name.
    #[error("secret '{0}' not found")]
    NotFound(String),

    /// The secret backend failed.
    #[error("secret backend error: {0}")]
    Backend(String),
}

impl From<SecretError> for crate::error::ManagerError {
    fn from(err: SecretError) -> Self {
        crate::error::ManagerError::Secret(err.to_string())
    }
}

/// Looks up host credentials by secret name.
#[async_trait]
pub trait SecretClient: Send + Sync {
    /// Returns the secret stored under `name`.
    async fn get_secret(&self, name: &str) -> Result<SecretString, SecretError>;
}
