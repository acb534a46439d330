//! Configuration loading from disk, environment and command line.
//!
//! Precedence, lowest to highest: built-in defaults, TOML file, environment
//! variables, command-line overrides. The result is validated once and then
//! never changes for the lifetime of the process.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{EnvOverrides, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Upstream base URL.
pub const ENV_API_URL: &str = "API_URL";
/// Listen port; the host part of `listener.bind_address` is kept.
pub const ENV_PORT: &str = "PORT";
/// Static bundle directory.
pub const ENV_ASSET_ROOT: &str = "ASSET_ROOT";
/// `true`/`false` switch for the `/debug` endpoint.
pub const ENV_ENABLE_DEBUG: &str = "ENABLE_DEBUG_ENDPOINT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: `{value}`")]
    InvalidEnv { name: &'static str, value: String },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub upstream: Option<String>,
    pub root: Option<PathBuf>,
    pub enable_debug: bool,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut ProxyConfig) -> Result<(), ConfigError> {
        if let Some(port) = self.port {
            config.listener.bind_address = with_port(&config.listener.bind_address, port)?;
        }
        if let Some(upstream) = &self.upstream {
            config.upstream.base_url.clone_from(upstream);
        }
        if let Some(root) = &self.root {
            config.static_files.root.clone_from(root);
        }
        if self.enable_debug {
            config.debug.enabled = true;
        }
        Ok(())
    }
}

/// Load and validate configuration using the process environment.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ProxyConfig, ConfigError> {
    load_config_with(path, overrides, |name| std::env::var(name).ok())
}

/// Load and validate configuration, reading environment values through `lookup`.
pub fn load_config_with<F>(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
    lookup: F,
) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    overrides.apply(&mut config)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides and record the raw values on the config.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvOverrides {
        api_url: lookup(ENV_API_URL),
        port: lookup(ENV_PORT),
        asset_root: lookup(ENV_ASSET_ROOT),
        enable_debug_endpoint: lookup(ENV_ENABLE_DEBUG),
    };

    if let Some(url) = &env.api_url {
        config.upstream.base_url.clone_from(url);
    }

    if let Some(raw) = &env.port {
        let port: u16 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            name: ENV_PORT,
            value: raw.clone(),
        })?;
        config.listener.bind_address = with_port(&config.listener.bind_address, port)?;
    }

    if let Some(root) = &env.asset_root {
        config.static_files.root = PathBuf::from(root);
    }

    if let Some(raw) = &env.enable_debug_endpoint {
        config.debug.enabled = parse_flag(raw).ok_or_else(|| ConfigError::InvalidEnv {
            name: ENV_ENABLE_DEBUG,
            value: raw.clone(),
        })?;
    }

    config.env = env;
    Ok(())
}

fn with_port(bind_address: &str, port: u16) -> Result<String, ConfigError> {
    let mut addr: std::net::SocketAddr = bind_address.parse().map_err(|_| {
        ConfigError::Validation(vec![ValidationError::InvalidBindAddress(
            bind_address.to_string(),
        )])
    })?;
    addr.set_port(port);
    Ok(addr.to_string())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
