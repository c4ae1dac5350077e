//! Access token for the secret store

/// A bearer credential for Key Vault
///
/// Lives for one resolution call only. `Debug` redacts the token.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub access_token: String,
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl ResolvedCredential {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
        }
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        let scheme = if self.token_type.trim().is_empty() {
            "Bearer"
        } else {
            self.token_type.trim()
        };
        format!("{} {}", scheme, self.access_token)
    }
}

impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("access_token", &format!("[{} chars]", self.access_token.len()))
            .field("token_type", &self.token_type)
            .finish()
    }
}
