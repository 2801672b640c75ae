//! Health check handler
//!
//! Public status endpoint for load balancers and uptime monitors.

use axum::Json;
use serde::Serialize;

/// Public health check response
///
/// Simple status indicator. No build or configuration details are exposed.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Status indicator (always "ok")
    pub status: String,
}

/// Public health check handler that returns simple status
///
/// # Example
/// ```bash
/// curl http://localhost:3000/api/health
/// # Returns: {"status":"ok"}
/// ```
pub async fn health_check() -> Json<HealthCheckResponse> {
    tracing::debug!("Health check requested");
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}
