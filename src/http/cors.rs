//! CORS headers.
//!
//! Preflight requests are answered locally and never reach the upstream or the
//! file system. `Access-Control-Allow-Origin` on all other responses is added
//! by a response-header layer in the server.

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderValue, Response, StatusCode};
use thiserror::Error;

use crate::config::CorsConfig;

#[derive(Debug, Error)]
#[error("invalid CORS {field} header value `{value}`")]
pub struct CorsError {
    pub field: &'static str,
    pub value: String,
}

/// Pre-built CORS header values.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    max_age: HeaderValue,
}

impl CorsHeaders {
    pub fn from_config(config: &CorsConfig) -> Result<Self, CorsError> {
        let value = |field: &'static str, raw: &str| {
            HeaderValue::from_str(raw).map_err(|_| CorsError {
                field,
                value: raw.to_string(),
            })
        };

        Ok(Self {
            allow_origin: value("allow_origin", &config.allow_origin)?,
            allow_methods: value("allow_methods", &config.allow_methods)?,
            allow_headers: value("allow_headers", &config.allow_headers)?,
            max_age: HeaderValue::from(config.max_age_secs),
        })
    }

    pub fn allow_origin(&self) -> HeaderValue {
        self.allow_origin.clone()
    }

    /// 200 with an empty body and the full set of CORS headers.
    pub fn preflight_response(&self) -> Response<Body> {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;

        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        response
    }
}
