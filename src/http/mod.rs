//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign or keep x-request-id)
//!     → [routing table classifies the request]
//!     → cors.rs | proxy | health | static_files
//!     → Access-Control-Allow-Origin + x-request-id on the way out
//! ```

pub mod cors;
pub mod request;
pub mod server;

pub use cors::CorsHeaders;
pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
