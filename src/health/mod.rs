//! Health and debug responders.
//!
//! Both endpoints answer from process state only. `/debug` is routed here
//! only when enabled; otherwise the path falls through to the static server.

pub mod debug;
pub mod status;

pub use debug::{get_debug, DebugSnapshot};
pub use status::{get_health, HealthStatus};
