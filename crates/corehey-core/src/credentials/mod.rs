//! Bearer credential acquisition for Key Vault
//!
//! - `TokenAcquirer` trait for pluggable acquisition strategies
//! - `ManagedIdentityCredential`: the instance metadata service
//! - `NoCredential`: always fails, used when every other mechanism is disabled

mod traits;
mod managed_identity;
mod none;

pub use traits::{TokenAcquirer, CredentialError, CredentialResult};
pub use managed_identity::ManagedIdentityCredential;
pub use none::NoCredential;
