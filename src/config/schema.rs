//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Chat API upstream settings.
    pub upstream: UpstreamConfig,

    /// Static bundle settings.
    pub static_files: StaticFilesConfig,

    /// Cross-origin response headers.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// `/debug` endpoint settings.
    pub debug: DebugConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Raw environment values that were applied on top of the file.
    #[serde(skip)]
    pub env: EnvOverrides,
}

impl ProxyConfig {
    /// Parse the listener bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.listener.bind_address.parse()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Upstream (chat API) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL requests are forwarded to (e.g., "http://localhost:8000").
    pub base_url: String,

    /// Path prefix that marks a request as an API call. Removed before forwarding.
    pub api_prefix: String,

    /// Time allowed for the upstream to produce a response head, in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_prefix: "/api/".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Static bundle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory holding the compiled single-page application.
    pub root: PathBuf,

    /// Default document served for `/` and for unmatched paths.
    pub index_file: String,

    /// `max-age` for non-HTML assets, in seconds.
    pub asset_max_age_secs: u64,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dist"),
            index_file: "index.html".to_string(),
            asset_max_age_secs: 31_536_000,
        }
    }
}

/// CORS header values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `Access-Control-Allow-Origin`, set on every response.
    pub allow_origin: String,

    /// `Access-Control-Allow-Methods` for preflight responses.
    pub allow_methods: String,

    /// `Access-Control-Allow-Headers` for preflight responses.
    pub allow_headers: String,

    /// `Access-Control-Max-Age` for preflight responses, in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: "GET, POST, PUT, DELETE, OPTIONS".to_string(),
            allow_headers: "Content-Type, Authorization, X-Session-Id, X-Username".to_string(),
            max_age_secs: 86_400,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout applied to every handler, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// `/debug` endpoint configuration.
///
/// The endpoint exposes upstream addresses and environment values, so it is
/// off unless explicitly enabled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Environment variables as they were read at startup, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvOverrides {
    #[serde(rename = "API_URL")]
    pub api_url: Option<String>,

    #[serde(rename = "PORT")]
    pub port: Option<String>,

    #[serde(rename = "ASSET_ROOT")]
    pub asset_root: Option<String>,

    #[serde(rename = "ENABLE_DEBUG_ENDPOINT")]
    pub enable_debug_endpoint: Option<String>,
}
