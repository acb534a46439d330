//! Gateway for a single-page chat application.
//!
//! One listener, three kinds of traffic:
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!     Client Request      │                 SPA PROXY                    │
//!     ────────────────────┼─▶ http ──▶ routing ──┬─▶ cors (preflight)   │
//!                         │                      ├─▶ proxy ─────────────┼──▶ Chat API
//!                         │                      ├─▶ health (/health,   │
//!                         │                      │          /debug)     │
//!                         │                      └─▶ static_files ──────┼──▶ dist/
//!                         │                                              │
//!                         │   config · observability · lifecycle        │
//!                         └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;

// Responders
pub mod health;
pub mod proxy;
pub mod static_files;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
