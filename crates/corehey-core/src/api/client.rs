//! HTTP client for the quick reply and typification endpoints

use std::time::Duration;

use crate::config::VaultDefaults;
use crate::logging::file_logger as log;
use crate::types::SecretPair;

use super::error::{ApiError, ApiResult};

/// Calls the downstream API with a resolved base URL and token
///
/// # Example
///
/// ```no_run
/// use corehey_core::api::WhatsAppApiClient;
/// use corehey_core::types::SecretPair;
///
/// # async fn run() -> Result<(), corehey_core::api::ApiError> {
/// let client = WhatsAppApiClient::new(&SecretPair::new("https://x.example.com", "tok123"));
/// let body = client.quick_replies("acme", "support").await?;
/// println!("{}", body);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WhatsAppApiClient {
    base_url: String,
    token: String,
    timeout: Duration,
}

impl WhatsAppApiClient {
    pub fn new(secrets: &SecretPair) -> Self {
        Self::with_timeout(secrets, VaultDefaults::default().api_timeout)
    }

    pub fn with_timeout(secrets: &SecretPair, timeout: Duration) -> Self {
        Self {
            base_url: secrets.base_url.trim_end_matches('/').to_string(),
            token: secrets.token.clone(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/v2/quick_replies?org=..&group=..`
    pub async fn quick_replies(&self, org: &str, group: &str) -> ApiResult<String> {
        self.get("v2/quick_replies", org, group).await
    }

    /// `GET {base}/v2/typification?org=..&group=..`
    pub async fn typification(&self, org: &str, group: &str) -> ApiResult<String> {
        self.get("v2/typification", org, group).await
    }

    async fn get(&self, path: &str, org: &str, group: &str) -> ApiResult<String> {
        let url = format!("{}/{}", self.base_url, path);
        log::debug("api", &format!("GET {}", url));

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ApiError::Client)?;

        let response = client
            .get(&url)
            .query(&[("org", org), ("group", group)])
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| {
                log::warn("api", &format!("GET {} failed: {}", url, e));
                ApiError::Request(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::ReadBody)?;
        log::debug("api", &format!("GET {} -> {} ({} bytes)", url, status, body.len()));
        Ok(body)
    }
}

impl std::fmt::Debug for WhatsAppApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
