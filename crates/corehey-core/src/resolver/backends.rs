//! Construction of the concrete mechanisms behind each strategy

use std::sync::Arc;

use crate::config::{VaultDefaults, VaultLocation};
use crate::credentials::{ManagedIdentityCredential, TokenAcquirer};
use crate::secrets::{AzCliSecretProvider, DirectSecretProvider, KeyVaultClient, SecretReader};

/// Factory for the mechanisms the resolver plugs into its strategies
///
/// The resolver decides which strategies run and in what order; the
/// backends only decide how each mechanism is built. Tests swap in doubles
/// here.
pub trait StrategyBackends: Send + Sync {
    /// Direct provider for the local CLI, bound to one vault
    fn cli_provider(&self, location: &VaultLocation) -> Arc<dyn DirectSecretProvider>;

    /// Managed identity acquirer, optionally for a user-assigned identity
    fn managed_identity(&self, client_id: Option<String>) -> Arc<dyn TokenAcquirer>;

    /// Key Vault REST client
    fn secret_reader(&self) -> Arc<dyn SecretReader>;
}

/// Production backends: `az` CLI, instance metadata service, Key Vault REST
#[derive(Debug, Clone, Default)]
pub struct AzureBackends {
    defaults: VaultDefaults,
}

impl AzureBackends {
    pub fn new(defaults: VaultDefaults) -> Self {
        Self { defaults }
    }
}

impl StrategyBackends for AzureBackends {
    fn cli_provider(&self, location: &VaultLocation) -> Arc<dyn DirectSecretProvider> {
        Arc::new(AzCliSecretProvider::from_defaults(&self.defaults, location.name.clone()))
    }

    fn managed_identity(&self, client_id: Option<String>) -> Arc<dyn TokenAcquirer> {
        Arc::new(ManagedIdentityCredential::from_defaults(&self.defaults, client_id))
    }

    fn secret_reader(&self) -> Arc<dyn SecretReader> {
        Arc::new(KeyVaultClient::from_defaults(&self.defaults))
    }
}
