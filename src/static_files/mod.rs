//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! GET|HEAD <path>
//!     → server.rs (normalize `/`, resolve under root, reject traversal)
//!     → found:   mime.rs (content type) + cache.rs (cache policy) → 200
//!     → missing: default document, no-cache → 200
//!     → no default document → 404 text/plain
//!     → other I/O failure   → 500 text/plain
//! ```

pub mod cache;
pub mod mime;
pub mod server;

pub use cache::CachePolicy;
pub use server::{ServedAsset, StaticFileError, StaticFileServer};
