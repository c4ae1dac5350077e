//! Core traits and errors for secret retrieval

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ResolvedCredential;

/// Errors that can occur while fetching a secret
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// The local CLI could not produce the secret
    #[error("az CLI unavailable for secret {secret}: {reason}")]
    CliUnavailable { secret: String, reason: String },

    /// The store rejected or failed the read
    #[error("failed to read secret {secret}: {reason}")]
    SecretRead { secret: String, reason: String },
}

impl SecretError {
    pub fn cli_unavailable(secret: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CliUnavailable {
            secret: secret.into(),
            reason: reason.into(),
        }
    }

    pub fn secret_read(secret: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SecretRead {
            secret: secret.into(),
            reason: reason.into(),
        }
    }

    /// The secret the error is about
    pub fn secret(&self) -> &str {
        match self {
            Self::CliUnavailable { secret, .. } | Self::SecretRead { secret, .. } => secret,
        }
    }
}

pub type SecretResult<T> = Result<T, SecretError>;

/// A source that maps a secret name directly to its value
///
/// No separate credential step is involved: the provider is already
/// authenticated (a logged-in CLI) or holds the values itself.
#[async_trait]
pub trait DirectSecretProvider: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Fetch the current value of a secret
    async fn fetch(&self, secret_name: &str) -> SecretResult<String>;
}

/// A client that reads secrets from a vault with a bearer credential
#[async_trait]
pub trait SecretReader: Send + Sync {
    /// Read the latest version of `secret_name` from the vault at `vault_url`
    async fn read_secret(
        &self,
        vault_url: &str,
        secret_name: &str,
        credential: &ResolvedCredential,
    ) -> SecretResult<String>;
}
