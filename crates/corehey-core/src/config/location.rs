//! Vault URL precedence

use reqwest::Url;

use super::defaults::VaultDefaults;
use super::vault::VaultConfiguration;

/// Where the vault URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Config,
    EnvUrl,
    EnvName,
    Default,
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationSource::Config => write!(f, "config"),
            LocationSource::EnvUrl => write!(f, "environment url"),
            LocationSource::EnvName => write!(f, "environment name"),
            LocationSource::Default => write!(f, "default name"),
        }
    }
}

/// The vault used for one resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultLocation {
    /// Base URL without a trailing slash
    pub url: String,
    /// Vault name for the CLI, when one is known or derivable from the URL
    pub name: Option<String>,
    pub source: LocationSource,
}

impl VaultLocation {
    /// Pick the vault URL
    ///
    /// Precedence: `config.vault_url`, then the URL environment variable,
    /// then the name environment variable composed into the URL template,
    /// then the default vault name. Empty values count as unset.
    pub fn resolve<F>(config: &VaultConfiguration, defaults: &VaultDefaults, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = config.explicit_vault_url() {
            return Self::from_url(url, defaults, LocationSource::Config);
        }
        if let Some(url) = lookup(&defaults.vault_url_env) {
            return Self::from_url(&url, defaults, LocationSource::EnvUrl);
        }
        if let Some(name) = lookup(&defaults.vault_name_env) {
            return Self::from_name(&name, defaults, LocationSource::EnvName);
        }
        Self::from_name(&defaults.vault_name, defaults, LocationSource::Default)
    }

    /// A CLI vault name is only derived when the URL is exactly what the
    /// template produces for its first host label. Any other host (another
    /// cloud, a custom domain, an IP) gets `None`.
    fn from_url(url: &str, defaults: &VaultDefaults, source: LocationSource) -> Self {
        let url = url.trim_end_matches('/').to_string();
        let name = Url::parse(&url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .and_then(|host| host.split('.').next().map(str::to_string))
            .filter(|label| !label.is_empty())
            .filter(|label| {
                defaults
                    .vault_url_for(label)
                    .trim_end_matches('/')
                    .eq_ignore_ascii_case(&url)
            });
        Self { url, name, source }
    }

    fn from_name(name: &str, defaults: &VaultDefaults, source: LocationSource) -> Self {
        Self {
            url: defaults.vault_url_for(name).trim_end_matches('/').to_string(),
            name: Some(name.to_string()),
            source,
        }
    }
}
