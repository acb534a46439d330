//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers produce:
//!     → logging.rs (structured log events with request_id)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the middleware stack into every handler log line
//! - Metrics are cheap and recorded whether or not an exporter is installed

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LoggingError};
