//! corehey Core
//!
//! Resolves the WhatsApp API base URL and bearer token from Azure Key Vault
//! and calls the downstream API with them. Runtime-agnostic: the Python
//! extension and any native host drive the same async core.
//!
//! ## Resolution chain
//!
//! 1. `az keyvault secret show` through the local CLI
//! 2. Instance metadata token, then Key Vault REST reads
//!
//! ```rust,ignore
//! use corehey_core::{VaultSecretResolver, WhatsAppApiClient, ConsoleLogger};
//!
//! let resolver = VaultSecretResolver::new(Arc::new(ConsoleLogger::new()));
//! let secrets = resolver.resolve(r#"{"vault_url": "https://wasecrets.vault.azure.net"}"#).await?;
//!
//! let body = WhatsAppApiClient::new(&secrets).quick_replies("acme", "support").await?;
//! ```

pub mod types;
pub mod config;
pub mod logging;
pub mod credentials;
pub mod secrets;
pub mod resolver;
pub mod api;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use types::{ResolvedCredential, SecretPair};

pub use config::{VaultConfiguration, VaultDefaults, VaultLocation, ConfigError};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger};

pub use credentials::{TokenAcquirer, ManagedIdentityCredential, NoCredential, CredentialError};

pub use secrets::{
    DirectSecretProvider, SecretReader, SecretError,
    AzCliSecretProvider, KeyVaultClient, MemorySecretProvider,
};

pub use resolver::{VaultSecretResolver, ResolveError, ResolveResult, ResolutionStrategy};

pub use api::{WhatsAppApiClient, ApiError};
