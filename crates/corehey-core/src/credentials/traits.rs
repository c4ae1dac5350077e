//! Token acquisition trait and errors

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ResolvedCredential;

/// Errors that can occur while acquiring a credential
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Endpoint unreachable or answered with a non-200 status
    #[error("managed identity unavailable: {0}")]
    IdentityUnavailable(String),

    /// Endpoint answered 200 with a body that is not a usable token
    #[error("managed identity returned an invalid token response: {0}")]
    Decode(String),

    #[error("no credential available: managed identity is disabled")]
    NoCredential,
}

pub type CredentialResult<T> = Result<T, CredentialError>;

/// A source of bearer credentials for the secret store
///
/// Implementations make at most one attempt per call; fallback between
/// mechanisms is the resolver's job.
#[async_trait]
pub trait TokenAcquirer: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    /// Obtain a credential
    async fn acquire(&self) -> CredentialResult<ResolvedCredential>;
}
