//! Values produced by secret resolution

mod credential;
mod pair;

pub use credential::ResolvedCredential;
pub use pair::SecretPair;
