//! Secret retrieval
//!
//! Two capabilities, kept apart on purpose:
//! - `DirectSecretProvider`: turns a secret name straight into its value
//!   (`AzCliSecretProvider`, `MemorySecretProvider`)
//! - `SecretReader`: reads a secret from Key Vault given a bearer credential
//!   obtained elsewhere (`KeyVaultClient`)

mod traits;
mod az_cli;
mod key_vault;
mod memory;

pub use traits::{DirectSecretProvider, SecretReader, SecretError, SecretResult};
pub use az_cli::AzCliSecretProvider;
pub use key_vault::KeyVaultClient;
pub use memory::MemorySecretProvider;
