//! Configuration snapshot served on `/debug` when enabled.

use axum::Json;
use serde::Serialize;

use crate::config::{EnvOverrides, ProxyConfig};

/// Effective configuration plus the raw environment values it came from.
#[derive(Debug, Serialize)]
pub struct DebugSnapshot<'a> {
    pub version: &'static str,
    pub upstream_url: &'a str,
    pub api_prefix: &'a str,
    pub upstream_timeout_secs: u64,
    pub asset_root: String,
    pub index_file: &'a str,
    pub listen_address: &'a str,
    pub env: &'a EnvOverrides,
}

impl<'a> DebugSnapshot<'a> {
    pub fn from_config(config: &'a ProxyConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            upstream_url: &config.upstream.base_url,
            api_prefix: &config.upstream.api_prefix,
            upstream_timeout_secs: config.upstream.timeout_secs,
            asset_root: config.static_files.root.display().to_string(),
            index_file: &config.static_files.index_file,
            listen_address: &config.listener.bind_address,
            env: &config.env,
        }
    }
}

pub fn get_debug(config: &ProxyConfig) -> Json<DebugSnapshot<'_>> {
    Json(DebugSnapshot::from_config(config))
}
