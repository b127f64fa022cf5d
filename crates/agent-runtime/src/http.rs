//! Shared HTTP plumbing for the vendor adapters.

use std::time::Duration;

use agent_core::AgentError;
use reqwest::StatusCode;

/// Build a client with an optional request timeout
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, AgentError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))
}

/// Map a non-success response to an error. `detail` is the vendor's status
/// text and message, so the final text reads like `429 RESOURCE_EXHAUSTED: ...`.
pub(crate) fn status_error(status: StatusCode, detail: &str) -> AgentError {
    let message = format!("{} {detail}", status.as_u16());
    match status.as_u16() {
        401 | 403 => AgentError::Auth(message),
        429 => AgentError::RateLimited(message),
        500..=599 => AgentError::ProviderUnavailable(message),
        _ => AgentError::Provider(message),
    }
}

/// Map a transport failure (DNS, connect, timeout, body read) to an error
pub(crate) fn transport_error(err: &reqwest::Error) -> AgentError {
    if err.is_timeout() || err.is_connect() {
        AgentError::ProviderUnavailable(err.to_string())
    } else {
        AgentError::Provider(err.to_string())
    }
}

/// Read an environment-style key, treating blanks and placeholders as unset
pub(crate) fn configured_key(value: Option<String>, placeholder: &str) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != placeholder)
}
