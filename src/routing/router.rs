//! Request classification.
//!
//! # Responsibilities
//! - Decide exactly one handling path per request
//! - Apply precedence: preflight, API, health, debug, static
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure function of method and path
//! - Static serving is the explicit default, never a silent no-match

use axum::http::Method;

use crate::config::ProxyConfig;
use crate::routing::matcher::{ExactPathMatcher, Matcher, PathPrefixMatcher};

/// Liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Configuration snapshot endpoint (opt-in).
pub const DEBUG_PATH: &str = "/debug";

/// How a request will be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// CORS preflight, answered locally with no body.
    Preflight,
    /// Forwarded to the chat API upstream.
    ApiProxy,
    /// Fixed liveness response.
    Health,
    /// Effective configuration snapshot.
    Debug,
    /// Static asset or SPA fallback.
    Static,
}

impl RouteDecision {
    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::ApiProxy => "api-proxy",
            Self::Health => "health",
            Self::Debug => "debug",
            Self::Static => "static",
        }
    }
}

/// Compiled routing rules.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    api: PathPrefixMatcher,
    health: ExactPathMatcher,
    debug: Option<ExactPathMatcher>,
}

impl RoutingTable {
    /// Build a table for the given API prefix. `/debug` is only routed when enabled.
    pub fn new(api_prefix: impl Into<String>, debug_enabled: bool) -> Self {
        Self {
            api: PathPrefixMatcher::new(api_prefix),
            health: ExactPathMatcher::new(HEALTH_PATH),
            debug: debug_enabled.then(|| ExactPathMatcher::new(DEBUG_PATH)),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(config.upstream.api_prefix.clone(), config.debug.enabled)
    }

    /// Classify a request. First match wins.
    pub fn classify(&self, method: &Method, path: &str) -> RouteDecision {
        if *method == Method::OPTIONS {
            return RouteDecision::Preflight;
        }
        if self.api.matches(path) {
            return RouteDecision::ApiProxy;
        }
        if self.health.matches(path) {
            return RouteDecision::Health;
        }
        if self.debug.as_ref().is_some_and(|m| m.matches(path)) {
            return RouteDecision::Debug;
        }
        RouteDecision::Static
    }
}
