//! Configuration for secret resolution
//!
//! - `VaultConfiguration`: per-request settings decoded from the caller's JSON blob
//! - `VaultDefaults`: process constants (names, endpoints, timeouts) injected into the resolver
//! - `VaultLocation`: the vault URL and name chosen for one resolution attempt

mod defaults;
mod location;
mod vault;

pub use defaults::VaultDefaults;
pub use location::{LocationSource, VaultLocation};
pub use vault::{ConfigError, ConfigResult, VaultConfiguration};
