// crates/propline-resolvers/src/http.rs
// ============================================================================
// Module: HTTP Resource Fetching
// Description: Bounded GET requests for URL-backed resources.
// Purpose: Load resource documents over HTTP(S) with strict limits.
// Dependencies: propline-core, reqwest, serde
// ============================================================================

//! ## Overview
//! Resource documents may be loaded from URLs. Fetches are single bounded GET
//! requests: `https` only unless cleartext is enabled, no embedded
//! credentials, optional host allowlist, redirects never followed, a request
//! timeout, and a hard cap on body size.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::Read;
use std::time::Duration;

use propline_core::ResolverError;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Deserialize;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for URL fetches.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` URLs.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - If `allowed_hosts` is set, only listed hosts are permitted.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpFetchConfig {
    /// Allow cleartext HTTP.
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size, in bytes.
    pub max_response_bytes: usize,
    /// Optional host allowlist.
    pub allowed_hosts: Option<BTreeSet<String>>,
    /// User agent for outbound requests.
    pub user_agent: String,
}

impl Default for HttpFetchConfig {
    fn default() -> Self {
        Self {
            allow_http: false,
            timeout_ms: 5_000,
            max_response_bytes: 1024 * 1024,
            allowed_hosts: None,
            user_agent: "propline/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Fetch
// ============================================================================

/// Fetches `url` and returns its body as UTF-8 text.
///
/// # Errors
///
/// Returns [`ResolverError::Backend`] when the URL violates policy, the request
/// fails, the status is not a success, or the body is oversized or not UTF-8.
pub fn fetch_text(url: &str, config: &HttpFetchConfig) -> Result<String, ResolverError> {
    let url = Url::parse(url)
        .map_err(|err| ResolverError::backend_with_source(format!("invalid url: {url}"), err))?;
    validate_url(&url, config)?;
    let client = build_http_client(config)?;
    let mut response = client
        .get(url.as_str())
        .send()
        .map_err(|err| {
            ResolverError::backend_with_source(format!("http request failed: {url}"), err)
        })?;
    let status = response.status();
    if status.is_redirection() {
        return Err(ResolverError::backend(format!("http redirect not allowed: {url}")));
    }
    if !status.is_success() {
        return Err(ResolverError::backend(format!(
            "http status {} from {url}",
            status.as_u16()
        )));
    }
    let body = read_response_limited(&mut response, config.max_response_bytes)?;
    String::from_utf8(body)
        .map_err(|err| ResolverError::backend_with_source("http response is not UTF-8", err))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates URL scheme, credentials, and allowlist policy.
fn validate_url(url: &Url, config: &HttpFetchConfig) -> Result<(), ResolverError> {
    match url.scheme() {
        "https" => {}
        "http" if config.allow_http => {}
        other => {
            return Err(ResolverError::backend(format!("unsupported url scheme: {other}")));
        }
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ResolverError::backend("url credentials are not allowed"));
    }
    if let Some(allowlist) = &config.allowed_hosts {
        let host = normalize_host_label(
            url.host_str().ok_or_else(|| ResolverError::backend("url host required"))?,
        );
        let allowed = allowlist.iter().any(|entry| normalize_host_label(entry) == host);
        if !allowed {
            return Err(ResolverError::backend(format!("url host not allowed: {host}")));
        }
    }
    Ok(())
}

/// Builds an HTTP client that never follows redirects.
fn build_http_client(config: &HttpFetchConfig) -> Result<Client, ResolverError> {
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .build()
        .map_err(|err| ResolverError::backend_with_source("http client build failed", err))
}

/// Normalizes host labels for allowlist comparisons.
fn normalize_host_label(host: &str) -> String {
    let trimmed = host.trim_end_matches('.');
    let trimmed =
        trimmed.strip_prefix('[').and_then(|inner| inner.strip_suffix(']')).unwrap_or(trimmed);
    trimmed.to_ascii_lowercase()
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, ResolverError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ResolverError::backend("response size limit exceeds u64"))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(ResolverError::backend("http response exceeds size limit"));
    }
    let mut buf = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|err| ResolverError::io("reading http response", err))?;
    if buf.len() > max_bytes {
        return Err(ResolverError::backend("http response exceeds size limit"));
    }
    Ok(buf)
}
