//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered classification)
//!     → matcher.rs (evaluate path conditions)
//!     → Return: RouteDecision
//!
//! Route Compilation (at startup):
//!     ProxyConfig
//!     → API prefix, health path, optional debug path
//!     → Freeze as immutable RoutingTable
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (prefix and exact matching only)
//! - Deterministic: same input always yields the same decision
//! - First match wins

pub mod matcher;
pub mod router;

pub use router::{RouteDecision, RoutingTable, DEBUG_PATH, HEALTH_PATH};
