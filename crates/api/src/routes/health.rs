//! Health check endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

const SERVICE_NAME: &str = "trellis";

/// Liveness report for the service.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process can answer at all.
    pub status: &'static str,
    /// Service name, useful when several services share a gateway.
    pub service: &'static str,
    /// Workspace version baked in at compile time.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the health check route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
