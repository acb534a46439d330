//! API proxy subsystem.
//!
//! # Data Flow
//! ```text
//! /api/<rest>?<query>
//!     → upstream.rs (rewrite target URL, build outbound request)
//!     → headers.rs (drop host/connection/upgrade/keep-alive)
//!     → pooled client (timeout, decompression)
//!     → headers.rs (reject text/html, strip encoding/length)
//!     → streamed response
//!
//! Failures:
//!     connect/transport/timeout → error.rs → 503 JSON
//!     HTML instead of API      → error.rs → 502 JSON
//! ```

pub mod error;
pub mod headers;
pub mod upstream;

pub use error::ProxyError;
pub use upstream::ApiProxy;
