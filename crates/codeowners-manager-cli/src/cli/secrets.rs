//! Host credentials read from environment variables.

use async_trait::async_trait;
use codeowners_manager_core::secrets::{SecretClient, SecretError};
use secrecy::SecretString;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves a secret name to the environment variable holding it.
///
/// `github-token` is read from `GITHUB_TOKEN`, `ghe.prod/token` from
/// `GHE_PROD_TOKEN`.
pub fn secret_env_var(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// A `SecretClient` backed by the process environment.
pub struct EnvSecretClient {
    lookup: Lookup,
}

impl EnvSecretClient {
    /// Reads secrets from the process environment.
    pub fn new() -> Self {
        Self::from_fn(|var| std::env::var(var).ok())
    }

    /// Reads secrets through a custom variable lookup.
    pub fn from_fn(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvSecretClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretClient for EnvSecretClient {
    async fn get_secret(&self, name: &str) -> Result<SecretString, SecretError> {
        let var = secret_env_var(name);
        match (self.lookup)(&var) {
            Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
            _ => Err(SecretError::NotFound(format!("{} (env {})", name, var))),
        }
    }
}
