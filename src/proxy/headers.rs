//! Header filtering for forwarded requests and responses.
//!
//! # Responsibilities
//! - Drop connection-specific headers before forwarding upstream
//! - Drop body framing headers when no body is forwarded
//! - Strip encoding/length and hop-by-hop headers from upstream responses
//! - Spot response codings that were left undecoded
//!
//! # Design Decisions
//! - Comparison goes through `HeaderName`, which is always lowercase, so
//!   matching is case-insensitive regardless of how the client spelled it
//! - Duplicate inbound values collapse to the last one

use axum::http::{header, HeaderMap, HeaderName, Method};

/// Request headers tied to the client's connection.
pub const EXCLUDED_REQUEST_HEADERS: [&str; 4] = ["host", "connection", "upgrade", "keep-alive"];

/// Response headers that no longer describe the body the client receives,
/// plus hop-by-hop headers owned by our own connection.
pub const STRIPPED_RESPONSE_HEADERS: [&str; 6] = [
    "content-encoding",
    "content-length",
    "connection",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
];

/// GET and HEAD never carry a body upstream.
pub fn forwards_body(method: &Method) -> bool {
    !(*method == Method::GET || *method == Method::HEAD)
}

pub fn is_excluded_request_header(name: &HeaderName) -> bool {
    EXCLUDED_REQUEST_HEADERS.contains(&name.as_str())
}

fn is_body_framing_header(name: &HeaderName) -> bool {
    name == header::CONTENT_LENGTH || name == header::TRANSFER_ENCODING
}

/// Build the outbound header set from the inbound one.
pub fn filter_request_headers(inbound: &HeaderMap, forwards_body: bool) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if is_excluded_request_header(name) {
            continue;
        }
        if !forwards_body && is_body_framing_header(name) {
            continue;
        }
        outbound.insert(name.clone(), value.clone());
    }
    outbound
}

/// Remove headers from an upstream response before it is re-served.
pub fn sanitize_response_headers(headers: &mut HeaderMap) {
    for name in STRIPPED_RESPONSE_HEADERS {
        headers.remove(name);
    }
}

/// A `content-encoding` still present after the client decoded what it could.
///
/// `identity` is ignored. Anything else means the body is in a coding the
/// client does not understand, e.g. `compress`.
pub fn undecoded_encoding(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::CONTENT_ENCODING)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .find(|coding| !coding.is_empty() && !coding.eq_ignore_ascii_case("identity"))
}

/// True when the `content-type` media type is `text/html`.
pub fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("text/html"))
}
