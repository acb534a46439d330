//! Upstream failure types and their JSON responses.

use std::error::Error as StdError;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors produced while forwarding an API request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Connection refused, reset, DNS failure or similar.
    #[error("could not reach upstream {upstream}")]
    Unavailable {
        upstream: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// No response head within the configured deadline.
    #[error("upstream {upstream} did not respond within {}s", .timeout.as_secs())]
    Timeout { upstream: String, timeout: Duration },

    /// The upstream answered with an HTML page instead of an API response.
    #[error("upstream {upstream} returned `{content_type}` instead of an API response")]
    UnexpectedHtml {
        upstream: String,
        content_type: String,
    },

    /// The body uses a content coding the client cannot decode.
    #[error("upstream {upstream} sent a body with unsupported content-encoding `{encoding}`")]
    UnsupportedEncoding { upstream: String, encoding: String },

    /// The rewritten request could not be built.
    #[error("invalid upstream target `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unavailable { .. } | Self::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnexpectedHtml { .. }
            | Self::UnsupportedEncoding { .. }
            | Self::InvalidTarget { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::Timeout { .. } => "timeout",
            Self::UnexpectedHtml { .. } => "unexpected_html",
            Self::UnsupportedEncoding { .. } => "unsupported_encoding",
            Self::InvalidTarget { .. } => "invalid_target",
        }
    }

    /// Full error chain, e.g. `client error (Connect): tcp connect error: Connection refused`.
    pub fn error_message(&self) -> String {
        let mut message = match self {
            Self::Unavailable { source, .. } => source.to_string(),
            other => return other.to_string(),
        };
        let mut cause = self.source().and_then(|err| err.source());
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

/// Body for 503 responses.
#[derive(Debug, Serialize)]
pub struct UnavailableBody {
    pub error: &'static str,
    pub details: String,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

/// Body for 502 responses.
#[derive(Debug, Serialize)]
pub struct BadGatewayBody {
    pub error: &'static str,
    pub details: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Unavailable { upstream, .. } | Self::Timeout { upstream, .. } => {
                let body = UnavailableBody {
                    error: "API server unavailable",
                    details: format!("Could not get a response from the API server at {upstream}"),
                    error_message: self.error_message(),
                };
                (status, Json(body)).into_response()
            }
            Self::UnexpectedHtml {
                upstream,
                content_type,
            } => {
                let body = BadGatewayBody {
                    error: "Invalid response from API server",
                    details: format!(
                        "Expected an API response but {upstream} returned {content_type}; \
                         check that the API URL points at the chat API service"
                    ),
                };
                (status, Json(body)).into_response()
            }
            Self::UnsupportedEncoding { .. } => {
                let body = BadGatewayBody {
                    error: "Invalid response from API server",
                    details: self.to_string(),
                };
                (status, Json(body)).into_response()
            }
            Self::InvalidTarget { .. } => {
                let body = BadGatewayBody {
                    error: "Invalid API request",
                    details: self.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_timeout_is_503_json() {
        let err = ProxyError::Timeout {
            upstream: "http://chat-api:8000".into(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.kind(), "timeout");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()["content-type"], "application/json");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "API server unavailable");
        assert!(json["details"].as_str().unwrap().contains("http://chat-api:8000"));
        assert!(json["errorMessage"].as_str().unwrap().contains("30s"));
    }

    #[tokio::test]
    async fn test_html_is_502_without_html() {
        let err = ProxyError::UnexpectedHtml {
            upstream: "http://chat-api:8000".into(),
            content_type: "text/html".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Invalid response from API server");
        assert!(json.get("details").is_some());
        assert!(json.get("errorMessage").is_none());
    }

    #[tokio::test]
    async fn test_unsupported_encoding_is_502() {
        let err = ProxyError::UnsupportedEncoding {
            upstream: "http://chat-api:8000".into(),
            encoding: "compress".into(),
        };
        assert_eq!(err.kind(), "unsupported_encoding");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Invalid response from API server");
        assert!(json["details"].as_str().unwrap().contains("compress"));
    }
}
