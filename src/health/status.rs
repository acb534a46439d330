//! Liveness endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub proxy: &'static str,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl HealthStatus {
    pub fn now() -> Self {
        Self {
            status: "healthy",
            proxy: "running",
            timestamp: epoch_millis(),
        }
    }
}

pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// `/health` handler. Never touches the upstream or the file system.
pub fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_body() {
        let before = epoch_millis();
        let Json(status) = get_health();
        let value = serde_json::to_value(&status).unwrap();

        assert_eq!(value["status"], "healthy");
        assert_eq!(value["proxy"], "running");
        assert!(value["timestamp"].as_u64().unwrap() >= before);
    }
}
