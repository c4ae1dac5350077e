//! Downstream WhatsApp API calls
//!
//! The base URL and bearer token come from a resolved `SecretPair`.

mod error;
mod client;

pub use error::{ApiError, ApiResult};
pub use client::WhatsAppApiClient;
