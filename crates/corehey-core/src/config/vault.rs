//! Per-request vault configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while decoding the configuration blob
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid vault config: {0}")]
    Invalid(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings supplied by the caller for a single resolution request
///
/// Every field is optional. Defaults are applied by the resolver, not here,
/// so that "unset" and "explicitly false" stay distinguishable.
///
/// # Example
///
/// ```
/// use corehey_core::config::VaultConfiguration;
///
/// let config = VaultConfiguration::parse(r#"{"skip_az_cli": true}"#).unwrap();
/// assert!(config.skips_cli());
/// assert!(VaultConfiguration::parse("").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfiguration {
    /// Full Key Vault URL, e.g. `https://my-vault.vault.azure.net`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_url: Option<String>,

    /// Whether the instance metadata service may be used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_managed_identity: Option<bool>,

    /// Client ID of a user-assigned managed identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Skip the `az` CLI and go straight to the Key Vault REST API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_az_cli: Option<bool>,
}

impl VaultConfiguration {
    /// Decode a configuration blob
    ///
    /// Empty or whitespace-only input and JSON `null` yield the all-defaults
    /// record. Anything else must be a JSON object.
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        let parsed: Option<Self> = serde_json::from_str(raw)?;
        Ok(parsed.unwrap_or_default())
    }

    /// Configuration naming a vault and identity, everything else default
    pub fn for_vault(vault_url: Option<String>, client_id: Option<String>) -> Self {
        Self {
            vault_url,
            client_id,
            ..Default::default()
        }
    }

    /// Encode back into the blob form accepted by `parse`
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// True when no field was set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `skip_az_cli`, defaulting to false
    pub fn skips_cli(&self) -> bool {
        self.skip_az_cli.unwrap_or(false)
    }

    /// `use_managed_identity`, defaulting to true
    pub fn allows_managed_identity(&self) -> bool {
        self.use_managed_identity.unwrap_or(true)
    }

    /// The explicit vault URL, ignoring empty strings
    pub fn explicit_vault_url(&self) -> Option<&str> {
        non_empty(self.vault_url.as_deref())
    }

    /// The explicit client ID, ignoring empty strings
    pub fn explicit_client_id(&self) -> Option<&str> {
        non_empty(self.client_id.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
