//! Constants used by the resolver

use std::time::Duration;

/// Process-level constants for secret resolution
///
/// `Default` holds the production values. Tests and embedding hosts
/// override individual fields with the `with_*` builders, for example to
/// point the metadata endpoint at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultDefaults {
    /// Vault name used when neither config nor environment name one
    pub vault_name: String,
    /// Environment variable holding a full vault URL
    pub vault_url_env: String,
    /// Environment variable holding a vault name
    pub vault_name_env: String,
    /// Environment variable holding a user-assigned identity client ID
    pub client_id_env: String,
    /// URL template for a vault name; `{name}` is substituted
    pub vault_url_template: String,

    /// Secret holding the downstream API base URL
    pub base_url_secret: String,
    /// Secret holding the downstream API bearer token
    pub token_secret: String,

    /// `api-version` for Key Vault secret reads
    pub secret_api_version: String,
    /// Instance metadata token endpoint
    pub metadata_endpoint: String,
    /// `api-version` for the instance metadata endpoint
    pub metadata_api_version: String,
    /// Audience requested from the metadata endpoint
    pub vault_resource: String,

    /// Program used for the local CLI strategy
    pub cli_program: String,

    pub metadata_timeout: Duration,
    pub secret_read_timeout: Duration,
    pub cli_timeout: Duration,
    pub api_timeout: Duration,
}

impl Default for VaultDefaults {
    fn default() -> Self {
        Self {
            vault_name: "wasecrets".to_string(),
            vault_url_env: "AZURE_KEY_VAULT_URL".to_string(),
            vault_name_env: "AZURE_KEY_VAULT_NAME".to_string(),
            client_id_env: "AZURE_CLIENT_ID".to_string(),
            vault_url_template: "https://{name}.vault.azure.net".to_string(),
            base_url_secret: "url-whatapp".to_string(),
            token_secret: "token-whatapp".to_string(),
            secret_api_version: "7.4".to_string(),
            metadata_endpoint: "http://169.254.169.254/metadata/identity/oauth2/token".to_string(),
            metadata_api_version: "2018-02-01".to_string(),
            vault_resource: "https://vault.azure.net".to_string(),
            cli_program: if cfg!(windows) { "az.cmd" } else { "az" }.to_string(),
            metadata_timeout: Duration::from_secs(10),
            secret_read_timeout: Duration::from_secs(30),
            cli_timeout: Duration::from_secs(30),
            api_timeout: Duration::from_secs(30),
        }
    }
}

impl VaultDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose a vault URL from a vault name
    pub fn vault_url_for(&self, name: &str) -> String {
        self.vault_url_template.replace("{name}", name)
    }

    /// The two secret names, in the order they are always fetched
    pub fn secret_names(&self) -> [&str; 2] {
        [self.base_url_secret.as_str(), self.token_secret.as_str()]
    }

    pub fn with_vault_name(mut self, name: impl Into<String>) -> Self {
        self.vault_name = name.into();
        self
    }

    pub fn with_secret_names(mut self, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        self.base_url_secret = base_url.into();
        self.token_secret = token.into();
        self
    }

    pub fn with_metadata_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.metadata_endpoint = endpoint.into();
        self
    }

    pub fn with_cli_program(mut self, program: impl Into<String>) -> Self {
        self.cli_program = program.into();
        self
    }

    pub fn with_env_names(
        mut self,
        vault_url_env: impl Into<String>,
        vault_name_env: impl Into<String>,
        client_id_env: impl Into<String>,
    ) -> Self {
        self.vault_url_env = vault_url_env.into();
        self.vault_name_env = vault_name_env.into();
        self.client_id_env = client_id_env.into();
        self
    }

    pub fn with_cli_timeout(mut self, timeout: Duration) -> Self {
        self.cli_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_values() {
        let defaults = VaultDefaults::default();
        assert_eq!(defaults.vault_url_for("wasecrets"), "https://wasecrets.vault.azure.net");
        assert_eq!(defaults.secret_names(), ["url-whatapp", "token-whatapp"]);
        assert_eq!(defaults.metadata_timeout, Duration::from_secs(10));
        assert_eq!(defaults.secret_read_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let defaults = VaultDefaults::new()
            .with_vault_name("other")
            .with_secret_names("a", "b")
            .with_cli_program("/opt/az");
        assert_eq!(defaults.vault_name, "other");
        assert_eq!(defaults.secret_names(), ["a", "b"]);
        assert_eq!(defaults.cli_program, "/opt/az");
    }
}
