//! Resolution strategies
//!
//! Each strategy fetches both secrets through one mechanism and either
//! returns the pair or the first error it hit. Secrets are always fetched
//! base URL first, then token.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::ResolveResult;
use super::secret_resolver::ResolutionState;
use crate::config::VaultDefaults;
use crate::credentials::TokenAcquirer;
use crate::logging::SharedLogger;
use crate::secrets::{DirectSecretProvider, SecretReader};
use crate::types::SecretPair;

/// Names of the two secrets to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretNames {
    pub base_url: String,
    pub token: String,
}

impl SecretNames {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub fn from_defaults(defaults: &VaultDefaults) -> Self {
        Self::new(defaults.base_url_secret.clone(), defaults.token_secret.clone())
    }
}

/// One entry of the fallback chain
#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Try to resolve both secrets
    async fn attempt(&self) -> ResolveResult<SecretPair>;
}

/// Resolves both secrets through a `DirectSecretProvider`
pub struct DirectSecretStrategy {
    provider: Arc<dyn DirectSecretProvider>,
    names: SecretNames,
    logger: SharedLogger,
}

impl DirectSecretStrategy {
    pub fn new(provider: Arc<dyn DirectSecretProvider>, names: SecretNames, logger: SharedLogger) -> Self {
        Self { provider, names, logger }
    }
}

#[async_trait]
impl ResolutionStrategy for DirectSecretStrategy {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn attempt(&self) -> ResolveResult<SecretPair> {
        self.logger.debug(&format!("Fetching secrets via {}", self.provider.name()));
        let base_url = self.provider.fetch(&self.names.base_url).await?;
        let token = self.provider.fetch(&self.names.token).await?;
        Ok(SecretPair { base_url, token })
    }
}

/// Acquires one credential, then reads both secrets from the vault with it
pub struct TokenThenSecretStrategy {
    acquirer: Arc<dyn TokenAcquirer>,
    reader: Arc<dyn SecretReader>,
    vault_url: String,
    names: SecretNames,
    logger: SharedLogger,
}

impl TokenThenSecretStrategy {
    pub fn new(
        acquirer: Arc<dyn TokenAcquirer>,
        reader: Arc<dyn SecretReader>,
        vault_url: impl Into<String>,
        names: SecretNames,
        logger: SharedLogger,
    ) -> Self {
        Self {
            acquirer,
            reader,
            vault_url: vault_url.into(),
            names,
            logger,
        }
    }
}

#[async_trait]
impl ResolutionStrategy for TokenThenSecretStrategy {
    fn name(&self) -> &str {
        self.acquirer.name()
    }

    async fn attempt(&self) -> ResolveResult<SecretPair> {
        self.logger.debug(&format!("Acquiring credential via {}", self.acquirer.name()));
        let credential = self.acquirer.acquire().await?;
        self.logger.debug(&format!("state -> {}", ResolutionState::TokenAcquired));

        self.logger.debug(&format!("Reading secrets from {}", self.vault_url));
        let base_url = self
            .reader
            .read_secret(&self.vault_url, &self.names.base_url, &credential)
            .await?;
        let token = self
            .reader
            .read_secret(&self.vault_url, &self.names.token, &credential)
            .await?;
        Ok(SecretPair { base_url, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialResult, NoCredential};
    use crate::logging::NoOpLogger;
    use crate::resolver::ResolveError;
    use crate::secrets::{MemorySecretProvider, SecretError, SecretResult};
    use crate::types::ResolvedCredential;
    use std::sync::Mutex;

    struct FixedToken;

    #[async_trait]
    impl TokenAcquirer for FixedToken {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn acquire(&self) -> CredentialResult<ResolvedCredential> {
            Ok(ResolvedCredential::bearer("abc"))
        }
    }

    #[derive(Default)]
    struct RecordingReader {
        reads: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl SecretReader for RecordingReader {
        async fn read_secret(
            &self,
            vault_url: &str,
            secret_name: &str,
            credential: &ResolvedCredential,
        ) -> SecretResult<String> {
            self.reads.lock().unwrap().push((
                vault_url.to_string(),
                secret_name.to_string(),
                credential.access_token.clone(),
            ));
            if secret_name == "missing" {
                return Err(SecretError::secret_read(secret_name, "key vault returned 404"));
            }
            Ok(format!("value-of-{}", secret_name))
        }
    }

    fn names() -> SecretNames {
        SecretNames::from_defaults(&VaultDefaults::default())
    }

    #[tokio::test]
    async fn test_direct_strategy_fetches_in_order() {
        let provider = Arc::new(
            MemorySecretProvider::new()
                .with_secret("url-whatapp", "https://x.example.com")
                .with_secret("token-whatapp", "tok123"),
        );
        let strategy = DirectSecretStrategy::new(provider.clone(), names(), Arc::new(NoOpLogger));

        let pair = strategy.attempt().await.unwrap();
        assert_eq!(pair, SecretPair::new("https://x.example.com", "tok123"));
        assert_eq!(provider.fetch_count(), 2);
        assert_eq!(strategy.name(), "memory");
    }

    #[tokio::test]
    async fn test_direct_strategy_stops_at_first_failure() {
        let provider = Arc::new(MemorySecretProvider::new().with_secret("token-whatapp", "tok123"));
        let strategy = DirectSecretStrategy::new(provider.clone(), names(), Arc::new(NoOpLogger));

        let err = strategy.attempt().await.unwrap_err();
        assert_eq!(err.secret(), Some("url-whatapp"));
        assert_eq!(provider.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_token_strategy_reads_both_with_one_credential() {
        let reader = Arc::new(RecordingReader::default());
        let strategy = TokenThenSecretStrategy::new(
            Arc::new(FixedToken),
            reader.clone(),
            "https://wasecrets.vault.azure.net",
            names(),
            Arc::new(NoOpLogger),
        );

        let pair = strategy.attempt().await.unwrap();
        assert_eq!(pair.base_url, "value-of-url-whatapp");
        assert_eq!(pair.token, "value-of-token-whatapp");

        let reads = reader.reads.lock().unwrap();
        let order: Vec<&str> = reads.iter().map(|(_, name, _)| name.as_str()).collect();
        assert_eq!(order, vec!["url-whatapp", "token-whatapp"]);
        assert!(reads.iter().all(|(url, _, token)| url == "https://wasecrets.vault.azure.net" && token == "abc"));
    }

    #[tokio::test]
    async fn test_token_strategy_without_credential_never_reads() {
        let reader = Arc::new(RecordingReader::default());
        let strategy = TokenThenSecretStrategy::new(
            Arc::new(NoCredential::new()),
            reader.clone(),
            "https://wasecrets.vault.azure.net",
            names(),
            Arc::new(NoOpLogger),
        );

        assert_eq!(strategy.attempt().await.unwrap_err(), ResolveError::NoCredential);
        assert!(reader.reads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_strategy_names_failing_secret() {
        let reader = Arc::new(RecordingReader::default());
        let strategy = TokenThenSecretStrategy::new(
            Arc::new(FixedToken),
            reader.clone(),
            "https://wasecrets.vault.azure.net",
            SecretNames::new("missing", "token-whatapp"),
            Arc::new(NoOpLogger),
        );

        let err = strategy.attempt().await.unwrap_err();
        assert_eq!(err.secret(), Some("missing"));
        assert_eq!(reader.reads.lock().unwrap().len(), 1);
    }
}
