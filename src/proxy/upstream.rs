//! Forwarding API requests to the chat service.
//!
//! # Responsibilities
//! - Rewrite `/api/<rest>?<query>` to `<base>/<rest>?<query>`
//! - Filter request headers and forward the body for non-GET/HEAD methods
//! - Bound the wait for the upstream response head
//! - Reject HTML responses and bodies in an unsupported coding
//! - Sanitize headers and stream the body back
//!
//! # Design Decisions
//! - One pooled HTTP/1 client per process, cloned into each request
//! - Compressed upstream bodies are decoded by the client so the forwarded
//!   body never needs `content-encoding`. A coding the client cannot decode
//!   is a 502, since stripping its header would hand out unreadable bytes
//! - The forwarded body has no declared length; hyper frames it with chunked
//!   encoding instead of reusing the upstream's `content-length`

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response, Uri};
use http_body_util::BodyExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::{Decompression, DecompressionLayer};

use crate::config::UpstreamConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::headers::{
    filter_request_headers, forwards_body, is_html, sanitize_response_headers, undecoded_encoding,
};

type UpstreamClient = Decompression<Client<HttpConnector, Body>>;

/// Forwards API requests to a single fixed upstream.
#[derive(Clone)]
pub struct ApiProxy {
    client: UpstreamClient,
    base_url: Arc<str>,
    api_prefix: Arc<str>,
    timeout: Duration,
}

impl ApiProxy {
    /// Create a proxy for the given upstream.
    pub fn new(config: &UpstreamConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);
        let client = ServiceBuilder::new()
            .layer(DecompressionLayer::new())
            .service(client);

        Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            api_prefix: Arc::from(config.api_prefix.as_str()),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upstream URL for a request path and raw query string.
    ///
    /// The API prefix is removed exactly once; the query is appended untouched.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        let rest = path
            .strip_prefix(&*self.api_prefix)
            .unwrap_or_else(|| path.trim_start_matches('/'));

        let mut target = format!("{}/{}", self.base_url, rest);
        if let Some(query) = query {
            target.push('?');
            target.push_str(query);
        }
        target
    }

    /// Forward a request and return the sanitized upstream response.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();

        let target = self.target_url(parts.uri.path(), parts.uri.query());
        let uri: Uri = target.parse().map_err(|e: axum::http::uri::InvalidUri| {
            ProxyError::InvalidTarget {
                target: target.clone(),
                reason: e.to_string(),
            }
        })?;

        let with_body = forwards_body(&parts.method);
        let mut builder = Request::builder().method(parts.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            *headers = filter_request_headers(&parts.headers, with_body);
        }
        let outbound = builder
            .body(if with_body { body } else { Body::empty() })
            .map_err(|e| ProxyError::InvalidTarget {
                target: target.clone(),
                reason: e.to_string(),
            })?;

        let response = match tokio::time::timeout(self.timeout, self.client.clone().oneshot(outbound)).await {
            Ok(Ok(response)) => response,
            Ok(Err(source)) => {
                return Err(ProxyError::Unavailable {
                    upstream: self.base_url.to_string(),
                    source,
                });
            }
            Err(_) => {
                return Err(ProxyError::Timeout {
                    upstream: self.base_url.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        if is_html(response.headers()) {
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("text/html")
                .to_string();
            return Err(ProxyError::UnexpectedHtml {
                upstream: self.base_url.to_string(),
                content_type,
            });
        }

        if let Some(encoding) = undecoded_encoding(response.headers()) {
            return Err(ProxyError::UnsupportedEncoding {
                upstream: self.base_url.to_string(),
                encoding: encoding.to_string(),
            });
        }

        let (mut parts, body) = response.into_parts();
        sanitize_response_headers(&mut parts.headers);

        let upstream = Arc::clone(&self.base_url);
        let body = body.map_err(move |err| {
            tracing::warn!(upstream = %upstream, error = %err, "Upstream body ended with an error");
            err
        });
        let body = Body::from_stream(Body::new(body).into_data_stream());
        Ok(Response::from_parts(parts, body))
    }
}
