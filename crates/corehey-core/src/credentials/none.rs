//! Acquirer used when no mechanism is enabled

use async_trait::async_trait;

use super::traits::{CredentialError, CredentialResult, TokenAcquirer};
use crate::types::ResolvedCredential;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredential;

impl NoCredential {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TokenAcquirer for NoCredential {
    fn name(&self) -> &str {
        "none"
    }

    async fn acquire(&self) -> CredentialResult<ResolvedCredential> {
        Err(CredentialError::NoCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let err = NoCredential::new().acquire().await.unwrap_err();
        assert_eq!(err, CredentialError::NoCredential);
    }
}
