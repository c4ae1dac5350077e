//! Key Vault REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::traits::{SecretError, SecretReader, SecretResult};
use crate::config::VaultDefaults;
use crate::logging::file_logger as log;
use crate::types::ResolvedCredential;

/// Reads the latest version of a secret:
/// `GET {vault_url}/secrets/{name}?api-version={version}`
///
/// One attempt per call, bounded by the configured timeout. Anything other
/// than HTTP 200 with a string `value` is a `SecretError::SecretRead`.
#[derive(Debug, Clone)]
pub struct KeyVaultClient {
    api_version: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct SecretBundle {
    #[serde(default)]
    value: Option<String>,
}

impl KeyVaultClient {
    pub fn new(api_version: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_version: api_version.into(),
            timeout,
        }
    }

    pub fn from_defaults(defaults: &VaultDefaults) -> Self {
        Self::new(defaults.secret_api_version.clone(), defaults.secret_read_timeout)
    }

    fn secret_url(vault_url: &str, secret_name: &str) -> Result<Url, String> {
        let mut url = Url::parse(vault_url).map_err(|e| format!("invalid vault url {}: {}", vault_url, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("invalid vault url {}", vault_url))?
            .pop_if_empty()
            .push("secrets")
            .push(secret_name);
        Ok(url)
    }
}

#[async_trait]
impl SecretReader for KeyVaultClient {
    async fn read_secret(
        &self,
        vault_url: &str,
        secret_name: &str,
        credential: &ResolvedCredential,
    ) -> SecretResult<String> {
        let url = Self::secret_url(vault_url, secret_name)
            .map_err(|reason| SecretError::secret_read(secret_name, reason))?;

        log::debug("secrets::key_vault", &format!("GET {}", url));

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| SecretError::secret_read(secret_name, format!("failed to build HTTP client: {}", e)))?;

        let response = client
            .get(url)
            .query(&[("api-version", self.api_version.as_str())])
            .header(reqwest::header::AUTHORIZATION, credential.authorization())
            .send()
            .await
            .map_err(|e| {
                log::warn("secrets::key_vault", &format!("Request for {} failed: {}", secret_name, e));
                SecretError::secret_read(secret_name, e.to_string())
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            log::warn("secrets::key_vault", &format!("Read of {} returned {}", secret_name, status));
            return Err(SecretError::secret_read(secret_name, format!("key vault returned {}", status)));
        }

        let bundle: SecretBundle = response
            .json()
            .await
            .map_err(|e| SecretError::secret_read(secret_name, format!("invalid response body: {}", e)))?;

        bundle
            .value
            .ok_or_else(|| SecretError::secret_read(secret_name, "secret has nil value"))
    }
}
