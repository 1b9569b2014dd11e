/// Upstream API clients.
///
/// Two upstreams feed the report: the air-quality proxy (`air`) and the AI
/// advice service (`advice`). Each is accessed through a small trait so the
/// orchestration layer can be driven by in-memory fakes in tests; the
/// `Http*` implementations share one `reqwest` client.

pub mod advice;
pub mod air;

use std::time::Duration;

use crate::model::UpstreamError;

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> UpstreamError {
        if err.is_decode() {
            UpstreamError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Http(status.as_u16())
        } else {
            UpstreamError::Request(err.to_string())
        }
    }
}

/// Shared HTTP client with the service-wide request timeout. Both upstream
/// clients clone this one so they share a connection pool.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Joins a configured base URL and an API path without doubling slashes.
fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
