//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (API_URL, PORT, ASSET_ROOT, ENABLE_DEBUG_ENDPOINT)
//!     → command-line overrides
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to router, proxy and static file server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Raw environment values are kept for the `/debug` snapshot

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::{
    CorsConfig, DebugConfig, EnvOverrides, ListenerConfig, LogFormat, ObservabilityConfig,
    ProxyConfig, StaticFilesConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
