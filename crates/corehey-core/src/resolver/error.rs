//! Terminal errors of secret resolution

use thiserror::Error;

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::secrets::SecretError;

/// Classified failure of a resolution request
///
/// `Configuration` and `EmptySecret` are fatal and stop the chain at once.
/// The others are produced by a strategy and only surface when every
/// strategy has failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid vault config: {0}")]
    Configuration(String),

    #[error("az CLI unavailable for secret {secret}: {reason}")]
    CliUnavailable { secret: String, reason: String },

    #[error("managed identity unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("no credential available: managed identity is disabled")]
    NoCredential,

    #[error("failed to read secret {secret}: {reason}")]
    SecretRead { secret: String, reason: String },

    #[error("secret {secret} resolved to an empty value")]
    EmptySecret { secret: String },
}

pub type ResolveResult<T> = Result<T, ResolveError>;

impl ResolveError {
    /// Stable classification string, suitable for callers across the FFI boundary
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::CliUnavailable { .. } => "cli_unavailable",
            Self::IdentityUnavailable(_) => "identity_unavailable",
            Self::NoCredential => "no_credential",
            Self::SecretRead { .. } => "secret_read",
            Self::EmptySecret { .. } => "empty_secret",
        }
    }

    /// Errors that end the chain without trying further strategies
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::EmptySecret { .. })
    }

    /// How far along the chain the failing attempt got
    ///
    /// A failed store read means a credential was obtained first, so it
    /// outranks an acquisition failure, which outranks a CLI failure.
    pub fn progress(&self) -> u8 {
        match self {
            Self::CliUnavailable { .. } => 1,
            Self::IdentityUnavailable(_) | Self::NoCredential => 2,
            Self::SecretRead { .. } => 3,
            Self::Configuration(_) | Self::EmptySecret { .. } => 4,
        }
    }

    /// The secret the error is about, if any
    pub fn secret(&self) -> Option<&str> {
        match self {
            Self::CliUnavailable { secret, .. }
            | Self::SecretRead { secret, .. }
            | Self::EmptySecret { secret } => Some(secret),
            _ => None,
        }
    }
}

impl From<ConfigError> for ResolveError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(e) => Self::Configuration(e.to_string()),
        }
    }
}

impl From<CredentialError> for ResolveError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::IdentityUnavailable(reason) => Self::IdentityUnavailable(reason),
            CredentialError::Decode(reason) => {
                Self::IdentityUnavailable(format!("invalid token response: {}", reason))
            }
            CredentialError::NoCredential => Self::NoCredential,
        }
    }
}

impl From<SecretError> for ResolveError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::CliUnavailable { secret, reason } => Self::CliUnavailable { secret, reason },
            SecretError::SecretRead { secret, reason } => Self::SecretRead { secret, reason },
        }
    }
}
