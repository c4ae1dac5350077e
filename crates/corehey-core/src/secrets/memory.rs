//! In-memory secret provider

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::traits::{DirectSecretProvider, SecretError, SecretResult};

/// Direct secret provider holding values in memory
///
/// For tests and for hosts that already have the values at hand. Counts
/// every `fetch` call, hit or miss.
///
/// # Example
///
/// ```
/// use corehey_core::secrets::MemorySecretProvider;
///
/// let provider = MemorySecretProvider::new()
///     .with_secret("url-whatapp", "https://x.example.com")
///     .with_secret("token-whatapp", "tok123");
/// assert_eq!(provider.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretProvider {
    secrets: RwLock<HashMap<String, String>>,
    fetches: AtomicUsize,
}

impl MemorySecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secrets(initial: HashMap<String, String>) -> Self {
        Self {
            secrets: RwLock::new(initial),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_secret(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut secrets) = self.secrets.write() {
            secrets.insert(name.into(), value.into());
        }
    }

    pub fn len(&self) -> usize {
        self.secrets.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `fetch` calls made so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectSecretProvider for MemorySecretProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, secret_name: &str) -> SecretResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let secrets = self
            .secrets
            .read()
            .map_err(|_| SecretError::secret_read(secret_name, "memory provider lock poisoned"))?;
        secrets
            .get(secret_name)
            .cloned()
            .ok_or_else(|| SecretError::secret_read(secret_name, "not found"))
    }
}
