//! Secret provider backed by a logged-in `az` CLI

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::traits::{DirectSecretProvider, SecretError, SecretResult};
use crate::config::VaultDefaults;
use crate::logging::file_logger as log;

/// Reads secret values by running
/// `az keyvault secret show --vault-name {vault} --name {secret} --query value -o tsv`
///
/// The CLI must already be authenticated (`az login`, or a managed identity
/// login on the host). Output is trimmed; empty output counts as failure.
/// A run that exceeds the timeout is killed.
#[derive(Debug, Clone)]
pub struct AzCliSecretProvider {
    program: String,
    vault_name: Option<String>,
    timeout: Duration,
}

impl AzCliSecretProvider {
    pub fn new(program: impl Into<String>, vault_name: Option<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            vault_name,
            timeout,
        }
    }

    pub fn from_defaults(defaults: &VaultDefaults, vault_name: Option<String>) -> Self {
        Self::new(defaults.cli_program.clone(), vault_name, defaults.cli_timeout)
    }

    pub fn vault_name(&self) -> Option<&str> {
        self.vault_name.as_deref()
    }

    fn command(&self, vault_name: &str, secret_name: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["keyvault", "secret", "show"])
            .args(["--vault-name", vault_name])
            .args(["--name", secret_name])
            .args(["--query", "value", "-o", "tsv"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl DirectSecretProvider for AzCliSecretProvider {
    fn name(&self) -> &str {
        "az_cli"
    }

    async fn fetch(&self, secret_name: &str) -> SecretResult<String> {
        let vault_name = self.vault_name.as_deref().ok_or_else(|| {
            SecretError::cli_unavailable(secret_name, "vault name could not be determined")
        })?;

        log::debug(
            "secrets::az_cli",
            &format!("Running {} for {}/{}", self.program, vault_name, secret_name),
        );

        let output = tokio::time::timeout(self.timeout, self.command(vault_name, secret_name).output())
            .await
            .map_err(|_| {
                SecretError::cli_unavailable(secret_name, format!("timed out after {:?}", self.timeout))
            })?
            .map_err(|e| {
                log::warn("secrets::az_cli", &format!("Failed to start {}: {}", self.program, e));
                SecretError::cli_unavailable(secret_name, format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::warn(
                "secrets::az_cli",
                &format!("{} exited with {} for {}", self.program, output.status, secret_name),
            );
            let reason = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {}", output.status, stderr)
            };
            return Err(SecretError::cli_unavailable(secret_name, reason));
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            return Err(SecretError::cli_unavailable(secret_name, "empty output"));
        }

        log::debug(
            "secrets::az_cli",
            &format!("Read {} ({} chars)", secret_name, value.len()),
        );
        Ok(value)
    }
}
