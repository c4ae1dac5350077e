//! The credential resolution fallback chain
//!
//! `VaultSecretResolver` parses the caller's configuration, picks the vault,
//! builds an ordered list of `ResolutionStrategy` objects and runs them
//! until one yields a complete `SecretPair`.

mod error;
mod strategy;
mod backends;
mod secret_resolver;

pub use error::{ResolveError, ResolveResult};
pub use strategy::{ResolutionStrategy, DirectSecretStrategy, TokenThenSecretStrategy, SecretNames};
pub use backends::{StrategyBackends, AzureBackends};
pub use secret_resolver::{VaultSecretResolver, ResolutionState, EnvLookup};
