//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate listener address and port
//! - Validate the upstream base URL and API prefix
//! - Validate header values that are sent verbatim
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("listener.bind_address `{0}` must use a non-zero port")]
    ZeroPort(String),

    #[error("upstream.base_url `{url}` is invalid: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("upstream.api_prefix `{0}` must start and end with '/' and name a segment")]
    InvalidApiPrefix(String),

    #[error("static_files.index_file `{0}` must be a plain file name")]
    InvalidIndexFile(String),

    #[error("cors.{field} `{value}` is not a valid header value")]
    InvalidCorsHeader { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error(
        "upstream.timeout_secs ({upstream}) must be shorter than timeouts.request_secs ({request})"
    )]
    TimeoutOrder { upstream: u64, request: u64 },
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.socket_addr() {
        Ok(addr) if addr.port() == 0 => {
            errors.push(ValidationError::ZeroPort(config.listener.bind_address.clone()));
        }
        Ok(_) => {}
        Err(_) => {
            errors.push(ValidationError::InvalidBindAddress(
                config.listener.bind_address.clone(),
            ));
        }
    }

    if let Err(reason) = check_upstream_url(&config.upstream.base_url) {
        errors.push(ValidationError::InvalidUpstreamUrl {
            url: config.upstream.base_url.clone(),
            reason,
        });
    }

    let prefix = &config.upstream.api_prefix;
    if prefix.len() < 3 || !prefix.starts_with('/') || !prefix.ends_with('/') {
        errors.push(ValidationError::InvalidApiPrefix(prefix.clone()));
    }

    let index = &config.static_files.index_file;
    if index.is_empty() || index == "." || index == ".." || index.contains(['/', '\\']) {
        errors.push(ValidationError::InvalidIndexFile(index.clone()));
    }

    let cors_fields = [
        ("allow_origin", &config.cors.allow_origin),
        ("allow_methods", &config.cors.allow_methods),
        ("allow_headers", &config.cors.allow_headers),
    ];
    for (field, value) in cors_fields {
        if HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError::InvalidCorsHeader {
                field,
                value: value.clone(),
            });
        }
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if let Err(e) = check_timeout_order(config.upstream.timeout_secs, config.timeouts.request_secs) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The upstream deadline has to expire first so a silent upstream is reported
/// as unavailable rather than cut off by the whole-request timeout.
pub fn check_timeout_order(upstream: u64, request: u64) -> Result<(), ValidationError> {
    if upstream >= request {
        return Err(ValidationError::TimeoutOrder { upstream, request });
    }
    Ok(())
}

/// The upstream client speaks plain HTTP only and appends paths and queries itself.
fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("scheme `{}` is not supported, use http", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}
