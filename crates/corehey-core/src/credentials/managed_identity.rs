//! Instance metadata service (managed identity) token acquisition

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::traits::{CredentialError, CredentialResult, TokenAcquirer};
use crate::config::VaultDefaults;
use crate::logging::file_logger as log;
use crate::types::ResolvedCredential;

/// Acquires a Key Vault token from the instance metadata endpoint
///
/// Issues a single `GET {endpoint}?api-version=..&resource=..[&client_id=..]`
/// with the `Metadata: true` header. Only HTTP 200 with a JSON body carrying
/// a non-empty `access_token` counts as success.
///
/// # Example
///
/// ```no_run
/// use corehey_core::config::VaultDefaults;
/// use corehey_core::credentials::{ManagedIdentityCredential, TokenAcquirer};
///
/// # async fn run() {
/// let credential = ManagedIdentityCredential::from_defaults(&VaultDefaults::default(), None);
/// let token = credential.acquire().await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ManagedIdentityCredential {
    endpoint: String,
    api_version: String,
    resource: String,
    client_id: Option<String>,
    timeout: Duration,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

impl ManagedIdentityCredential {
    pub fn new(
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
        resource: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_version: api_version.into(),
            resource: resource.into(),
            client_id: None,
            timeout,
        }
    }

    /// Build from the process defaults, optionally for a user-assigned identity
    pub fn from_defaults(defaults: &VaultDefaults, client_id: Option<String>) -> Self {
        Self::new(
            defaults.metadata_endpoint.clone(),
            defaults.metadata_api_version.clone(),
            defaults.vault_resource.clone(),
            defaults.metadata_timeout,
        )
        .with_client_id(client_id)
    }

    /// Request a token for a user-assigned identity
    pub fn with_client_id(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id.filter(|id| !id.trim().is_empty());
        self
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    fn query(&self) -> Vec<(&str, &str)> {
        let mut query = vec![
            ("api-version", self.api_version.as_str()),
            ("resource", self.resource.as_str()),
        ];
        if let Some(client_id) = &self.client_id {
            query.push(("client_id", client_id.as_str()));
        }
        query
    }

    fn decode(body: &str) -> CredentialResult<ResolvedCredential> {
        let response: TokenResponse =
            serde_json::from_str(body).map_err(|e| CredentialError::Decode(e.to_string()))?;

        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CredentialError::Decode("missing access_token".to_string()))?;

        Ok(ResolvedCredential {
            access_token,
            token_type: response
                .token_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Bearer".to_string()),
        })
    }
}

#[async_trait]
impl TokenAcquirer for ManagedIdentityCredential {
    fn name(&self) -> &str {
        "managed_identity"
    }

    async fn acquire(&self) -> CredentialResult<ResolvedCredential> {
        log::debug(
            "credentials::managed_identity",
            &format!(
                "Requesting token from {} (user-assigned: {})",
                self.endpoint,
                self.client_id.is_some()
            ),
        );

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| CredentialError::IdentityUnavailable(e.to_string()))?;

        let response = client
            .get(&self.endpoint)
            .header("Metadata", "true")
            .query(&self.query())
            .send()
            .await
            .map_err(|e| {
                log::warn("credentials::managed_identity", &format!("Request failed: {}", e));
                CredentialError::IdentityUnavailable(e.to_string())
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            log::warn("credentials::managed_identity", &format!("Endpoint returned {}", status));
            return Err(CredentialError::IdentityUnavailable(format!(
                "metadata endpoint returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CredentialError::IdentityUnavailable(e.to_string()))?;

        let credential = Self::decode(&body)?;
        log::debug(
            "credentials::managed_identity",
            &format!("Token acquired ({} chars)", credential.access_token.len()),
        );
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    const TOKEN_PATH: &str = "/metadata/identity/oauth2/token";

    fn credential_for(server: &MockServer) -> ManagedIdentityCredential {
        let defaults = VaultDefaults::default().with_metadata_endpoint(server.url(TOKEN_PATH));
        ManagedIdentityCredential::from_defaults(&defaults, None)
    }

    #[tokio::test]
    async fn test_acquires_token_with_required_request_shape() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(TOKEN_PATH)
                    .header("Metadata", "true")
                    .query_param("api-version", "2018-02-01")
                    .query_param("resource", "https://vault.azure.net");
                then.status(200)
                    .json_body(json!({ "access_token": "abc", "token_type": "Bearer" }));
            })
            .await;

        let credential = credential_for(&server).acquire().await.unwrap();

        mock.assert_async().await;
        assert_eq!(credential.access_token, "abc");
        assert_eq!(credential.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_sends_client_id_for_user_assigned_identity() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(TOKEN_PATH)
                    .query_param("client_id", "87654321-4321-4321-4321-210987654321");
                then.status(200).json_body(json!({ "access_token": "user-assigned" }));
            })
            .await;

        let credential = credential_for(&server)
            .with_client_id(Some("87654321-4321-4321-4321-210987654321".to_string()))
            .acquire()
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(credential.access_token, "user-assigned");
        assert_eq!(credential.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_non_200_is_identity_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(TOKEN_PATH);
                then.status(500).body("boom");
            })
            .await;

        let err = credential_for(&server).acquire().await.unwrap_err();
        assert!(matches!(err, CredentialError::IdentityUnavailable(ref m) if m.contains("500")));
    }

    #[tokio::test]
    async fn test_missing_access_token_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(TOKEN_PATH);
                then.status(200).json_body(json!({ "token_type": "Bearer" }));
            })
            .await;

        let err = credential_for(&server).acquire().await.unwrap_err();
        assert_eq!(err, CredentialError::Decode("missing access_token".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_identity_unavailable() {
        let defaults = VaultDefaults::default().with_metadata_endpoint("http://127.0.0.1:1/token");
        let err = ManagedIdentityCredential::from_defaults(&defaults, None)
            .acquire()
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::IdentityUnavailable(_)));
    }

    #[test]
    fn test_decode_rejects_non_object_body() {
        assert!(matches!(
            ManagedIdentityCredential::decode("[]"),
            Err(CredentialError::Decode(_))
        ));
        assert!(matches!(
            ManagedIdentityCredential::decode(r#"{"access_token": ""}"#),
            Err(CredentialError::Decode(_))
        ));
    }

    #[test]
    fn test_blank_client_id_is_ignored() {
        let credential = ManagedIdentityCredential::from_defaults(&VaultDefaults::default(), Some(" ".to_string()));
        assert_eq!(credential.client_id(), None);
    }
}
