//! Resolution orchestrator
//!
//! Order of attempts:
//! 1. The `az` CLI, unless `skip_az_cli` is set
//! 2. A bearer token, then Key Vault REST reads. The token comes from the
//!    managed identity endpoint unless `use_managed_identity` is explicitly
//!    `false`, in which case the attempt fails with `NoCredential`
//!
//! The first strategy producing both secrets wins. Otherwise the error that
//! got furthest along the chain is returned.

use std::sync::Arc;

use super::backends::{AzureBackends, StrategyBackends};
use super::error::{ResolveError, ResolveResult};
use super::strategy::{DirectSecretStrategy, ResolutionStrategy, SecretNames, TokenThenSecretStrategy};
use crate::config::{VaultConfiguration, VaultDefaults, VaultLocation};
use crate::credentials::{NoCredential, TokenAcquirer};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::types::SecretPair;

/// Environment lookup used for vault and client ID fallbacks
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Progress of one resolution request, reported through the logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Init,
    ConfigParsed,
    TryCli,
    TryManagedIdentity,
    TokenAcquired,
    SecretsFetched,
    Failed,
}

impl std::fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResolutionState::Init => "init",
            ResolutionState::ConfigParsed => "config_parsed",
            ResolutionState::TryCli => "try_cli",
            ResolutionState::TryManagedIdentity => "try_managed_identity",
            ResolutionState::TokenAcquired => "token_acquired",
            ResolutionState::SecretsFetched => "secrets_fetched",
            ResolutionState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Resolves the downstream API base URL and token from Key Vault
///
/// Stateless between calls: nothing is cached, every `resolve` builds its
/// own strategies and HTTP clients.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use corehey_core::logging::ConsoleLogger;
/// use corehey_core::resolver::VaultSecretResolver;
///
/// # async fn run() {
/// let resolver = VaultSecretResolver::new(Arc::new(ConsoleLogger::new()));
/// match resolver.resolve(r#"{"skip_az_cli": true}"#).await {
///     Ok(pair) => println!("calling {}", pair.base_url),
///     Err(e) => eprintln!("{} ({})", e, e.kind()),
/// }
/// # }
/// ```
pub struct VaultSecretResolver {
    defaults: VaultDefaults,
    backends: Arc<dyn StrategyBackends>,
    env: EnvLookup,
    logger: SharedLogger,
}

impl VaultSecretResolver {
    /// Production resolver reading the process environment
    pub fn new(logger: SharedLogger) -> Self {
        Self::with_defaults(VaultDefaults::default(), logger)
    }

    pub fn with_defaults(defaults: VaultDefaults, logger: SharedLogger) -> Self {
        let backends = Arc::new(AzureBackends::new(defaults.clone()));
        Self::with_backends(defaults, backends, logger)
    }

    pub fn with_backends(defaults: VaultDefaults, backends: Arc<dyn StrategyBackends>, logger: SharedLogger) -> Self {
        Self {
            defaults,
            backends,
            env: Arc::new(|key| std::env::var(key).ok()),
            logger,
        }
    }

    /// Replace the environment lookup
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }

    pub fn defaults(&self) -> &VaultDefaults {
        &self.defaults
    }

    /// The vault a configuration resolves to
    pub fn location(&self, config: &VaultConfiguration) -> VaultLocation {
        VaultLocation::resolve(config, &self.defaults, |key| (self.env)(key))
    }

    fn client_id(&self, config: &VaultConfiguration) -> Option<String> {
        config
            .explicit_client_id()
            .map(str::to_string)
            .or_else(|| (self.env)(&self.defaults.client_id_env))
            .filter(|id| !id.trim().is_empty())
    }

    /// Build the ordered strategy list for a configuration
    pub fn plan(&self, config: &VaultConfiguration) -> Vec<(ResolutionState, Box<dyn ResolutionStrategy>)> {
        let location = self.location(config);
        let names = SecretNames::from_defaults(&self.defaults);
        let mut chain: Vec<(ResolutionState, Box<dyn ResolutionStrategy>)> = Vec::new();

        self.logger.debug(&format!(
            "Vault {} (from {})",
            location.url, location.source
        ));

        if !config.skips_cli() {
            chain.push((
                ResolutionState::TryCli,
                Box::new(DirectSecretStrategy::new(
                    self.backends.cli_provider(&location),
                    names.clone(),
                    Arc::clone(&self.logger),
                )),
            ));
        }

        let acquirer: Arc<dyn TokenAcquirer> = if config.allows_managed_identity() {
            self.backends.managed_identity(self.client_id(config))
        } else {
            Arc::new(NoCredential::new())
        };
        chain.push((
            ResolutionState::TryManagedIdentity,
            Box::new(TokenThenSecretStrategy::new(
                acquirer,
                self.backends.secret_reader(),
                location.url.clone(),
                names,
                Arc::clone(&self.logger),
            )),
        ));

        chain
    }

    /// Resolve from a raw configuration blob (empty means defaults)
    pub async fn resolve(&self, raw_config: &str) -> ResolveResult<SecretPair> {
        self.transition(ResolutionState::Init);
        let config = VaultConfiguration::parse(raw_config).map_err(|e| {
            let err = ResolveError::from(e);
            self.logger.error(&format!("Configuration rejected: {}", err));
            self.transition(ResolutionState::Failed);
            err
        })?;
        self.resolve_config(&config).await
    }

    /// Resolve from an already parsed configuration
    pub async fn resolve_config(&self, config: &VaultConfiguration) -> ResolveResult<SecretPair> {
        self.transition(ResolutionState::ConfigParsed);

        let mut best: Option<ResolveError> = None;
        for (state, strategy) in self.plan(config) {
            self.transition(state);

            let err = match strategy.attempt().await {
                Ok(pair) => return self.accept(pair),
                Err(err) => err,
            };

            if err.is_fatal() {
                self.logger.error(&format!("{} failed fatally: {}", strategy.name(), err));
                self.transition(ResolutionState::Failed);
                return Err(err);
            }

            self.logger.warn(&format!("{} failed: {}", strategy.name(), err));
            let replace = best
                .as_ref()
                .map_or(true, |current| err.progress() >= current.progress());
            if replace {
                best = Some(err);
            }
        }

        self.transition(ResolutionState::Failed);
        let err = best.unwrap_or(ResolveError::NoCredential);
        self.logger.error(&format!("Secret resolution failed: {}", err));
        Err(err)
    }

    fn accept(&self, pair: SecretPair) -> ResolveResult<SecretPair> {
        let empty = if pair.base_url.is_empty() {
            Some(&self.defaults.base_url_secret)
        } else if pair.token.is_empty() {
            Some(&self.defaults.token_secret)
        } else {
            None
        };

        if let Some(secret) = empty {
            let err = ResolveError::EmptySecret { secret: secret.clone() };
            self.logger.error(&err.to_string());
            self.transition(ResolutionState::Failed);
            return Err(err);
        }

        self.transition(ResolutionState::SecretsFetched);
        Ok(pair)
    }

    fn transition(&self, state: ResolutionState) {
        self.logger.debug(&format!("state -> {}", state));
    }
}

impl Default for VaultSecretResolver {
    fn default() -> Self {
        Self::new(Arc::new(NoOpLogger::new()))
    }
}

impl std::fmt::Debug for VaultSecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSecretResolver")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
