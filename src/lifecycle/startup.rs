//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve and bind the listen address
//! - Report startup failures as one typed error for `main`
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound last, after configuration and logging are ready

use std::io;
use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ProxyConfig};
use crate::http::server::ServerError;
use crate::observability::LoggingError;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("invalid listen address `{address}`: {source}")]
    Address {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Bind the configured listen address.
pub async fn bind_listener(config: &ProxyConfig) -> Result<TcpListener, StartupError> {
    let address = config.socket_addr().map_err(|source| StartupError::Address {
        address: config.listener.bind_address.clone(),
        source,
    })?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    tracing::info!(address = %address, "Listening for connections");
    Ok(listener)
}
