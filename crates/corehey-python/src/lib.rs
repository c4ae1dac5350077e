//! Python bindings for corehey via PyO3
//!
//! Every call resolves secrets from scratch on its own single-threaded
//! runtime, with the GIL released while it runs.

use pyo3::prelude::*;
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::types::{PyDict, PyString};
use serde_json::json;
use std::sync::Arc;

use corehey_core::api::WhatsAppApiClient;
use corehey_core::config::VaultConfiguration;
use corehey_core::logging::{file_logger as log, NoOpLogger};
use corehey_core::resolver::{ResolveError, VaultSecretResolver};
use corehey_core::types::SecretPair as CoreSecretPair;

// ============================================================================
// Types
// ============================================================================

#[pyclass]
#[derive(Clone)]
pub struct SecretPair {
    #[pyo3(get)]
    pub base_url: String,
    #[pyo3(get)]
    pub token: String,
}

#[pymethods]
impl SecretPair {
    fn __repr__(&self) -> String {
        format!("SecretPair(base_url='{}', token=<{} chars>)", self.base_url, self.token.len())
    }
}

impl From<CoreSecretPair> for SecretPair {
    fn from(pair: CoreSecretPair) -> Self {
        Self { base_url: pair.base_url, token: pair.token }
    }
}

#[derive(Clone, Copy)]
enum Endpoint {
    QuickReplies,
    Typification,
}

// ============================================================================
// Helpers
// ============================================================================

/// Accepts `None`, a JSON string or a dict
fn config_json(py: Python<'_>, vault_config: Option<&Bound<'_, PyAny>>) -> PyResult<String> {
    let Some(value) = vault_config else {
        return Ok(String::new());
    };
    if value.is_none() {
        return Ok(String::new());
    }
    if let Ok(s) = value.downcast::<PyString>() {
        return Ok(s.to_cow()?.into_owned());
    }
    if let Ok(d) = value.downcast::<PyDict>() {
        let json = py.import("json")?;
        return json.call_method1("dumps", (d,))?.extract();
    }
    Err(PyTypeError::new_err(format!(
        "vault_config must be None, str or dict, got {}",
        value.get_type().name()?
    )))
}

fn simple_config(vault_url: Option<String>, client_id: Option<String>) -> PyResult<String> {
    VaultConfiguration::for_vault(vault_url, client_id)
        .to_json()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())
}

fn error_envelope(message: String) -> String {
    json!({ "error": message }).to_string()
}

async fn resolve(raw_config: &str) -> Result<CoreSecretPair, ResolveError> {
    VaultSecretResolver::new(Arc::new(NoOpLogger::new()))
        .resolve(raw_config)
        .await
}

async fn fetch(raw_config: &str, org: &str, group: &str, endpoint: Endpoint) -> String {
    let secrets = match resolve(raw_config).await {
        Ok(secrets) => secrets,
        Err(e) => return error_envelope(format!("Failed to get secrets: {}", e)),
    };

    let client = WhatsAppApiClient::new(&secrets);
    let result = match endpoint {
        Endpoint::QuickReplies => client.quick_replies(org, group).await,
        Endpoint::Typification => client.typification(org, group).await,
    };

    // ApiError already renders as "Request failed: .." / "Failed to read response: .."
    result.unwrap_or_else(|e| error_envelope(e.to_string()))
}

fn blocking_fetch(py: Python<'_>, raw_config: String, org: String, group: String, endpoint: Endpoint) -> String {
    py.allow_threads(move || match runtime() {
        Ok(rt) => rt.block_on(fetch(&raw_config, &org, &group, endpoint)),
        Err(e) => {
            log::error("python", &format!("Failed to start runtime: {}", e));
            error_envelope(format!("Failed to get secrets: {}", e))
        }
    })
}

// ============================================================================
// Functions
// ============================================================================

/// Fetch quick replies for an org/group, returning the raw response body
/// or a JSON error envelope
#[pyfunction]
#[pyo3(signature = (vault_config, org, group))]
fn get_quick_replies(
    py: Python<'_>,
    vault_config: Option<&Bound<'_, PyAny>>,
    org: String,
    group: String,
) -> PyResult<String> {
    let raw = config_json(py, vault_config)?;
    Ok(blocking_fetch(py, raw, org, group, Endpoint::QuickReplies))
}

/// Fetch the typification catalogue for an org/group
#[pyfunction]
#[pyo3(signature = (vault_config, org, group))]
fn get_typification(
    py: Python<'_>,
    vault_config: Option<&Bound<'_, PyAny>>,
    org: String,
    group: String,
) -> PyResult<String> {
    let raw = config_json(py, vault_config)?;
    Ok(blocking_fetch(py, raw, org, group, Endpoint::Typification))
}

/// `get_quick_replies` with an optional vault URL and identity client ID
#[pyfunction]
#[pyo3(signature = (org, group, vault_url=None, client_id=None))]
fn get_quick_replies_simple(
    py: Python<'_>,
    org: String,
    group: String,
    vault_url: Option<String>,
    client_id: Option<String>,
) -> PyResult<String> {
    let raw = simple_config(vault_url, client_id)?;
    Ok(blocking_fetch(py, raw, org, group, Endpoint::QuickReplies))
}

/// `get_typification` with an optional vault URL and identity client ID
#[pyfunction]
#[pyo3(signature = (org, group, vault_url=None, client_id=None))]
fn get_typification_simple(
    py: Python<'_>,
    org: String,
    group: String,
    vault_url: Option<String>,
    client_id: Option<String>,
) -> PyResult<String> {
    let raw = simple_config(vault_url, client_id)?;
    Ok(blocking_fetch(py, raw, org, group, Endpoint::Typification))
}

/// `get_quick_replies` with the default vault configuration
#[pyfunction]
fn get_quick_replies_ultra_simple(py: Python<'_>, org: String, group: String) -> String {
    blocking_fetch(py, String::new(), org, group, Endpoint::QuickReplies)
}

/// `get_typification` with the default vault configuration
#[pyfunction]
fn get_typification_ultra_simple(py: Python<'_>, org: String, group: String) -> String {
    blocking_fetch(py, String::new(), org, group, Endpoint::Typification)
}

/// Resolve the API base URL and token without calling the API
#[pyfunction]
#[pyo3(signature = (vault_config=None))]
fn resolve_secrets(py: Python<'_>, vault_config: Option<&Bound<'_, PyAny>>) -> PyResult<SecretPair> {
    let raw = config_json(py, vault_config)?;
    py.allow_threads(move || {
        let rt = runtime().map_err(PyRuntimeError::new_err)?;
        rt.block_on(resolve(&raw))
            .map(SecretPair::from)
            .map_err(|e| PyRuntimeError::new_err(format!("{} ({})", e, e.kind())))
    })
}

// ============================================================================
// Module
// ============================================================================

#[pymodule]
fn corehey(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SecretPair>()?;

    m.add_function(wrap_pyfunction!(get_quick_replies, m)?)?;
    m.add_function(wrap_pyfunction!(get_typification, m)?)?;
    m.add_function(wrap_pyfunction!(get_quick_replies_simple, m)?)?;
    m.add_function(wrap_pyfunction!(get_typification_simple, m)?)?;
    m.add_function(wrap_pyfunction!(get_quick_replies_ultra_simple, m)?)?;
    m.add_function(wrap_pyfunction!(get_typification_ultra_simple, m)?)?;
    m.add_function(wrap_pyfunction!(resolve_secrets, m)?)?;

    Ok(())
}

