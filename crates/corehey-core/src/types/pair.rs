//! The resolved (base URL, token) pair

/// Base URL and bearer token for the downstream API
///
/// The resolver never returns a pair with an empty field. `Debug` redacts
/// the token.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPair {
    pub base_url: String,
    pub token: String,
}

impl SecretPair {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for SecretPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPair")
            .field("base_url", &self.base_url)
            .field("token", &format!("[{} chars]", self.token.len()))
            .finish()
    }
}
