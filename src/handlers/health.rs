use axum::{extract::State, response::Json};
use tracing::info;

use crate::models::{HealthResponse, ServiceStatus};
use crate::state::AppState;

pub const LIVENESS_MESSAGE: &str = "Earnings call analyzer is running";

/// Plain-text liveness probe
pub async fn root_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let inference_configured = state.pipeline.inference_configured();

    let status = if inference_configured {
        "healthy"
    } else {
        "degraded"
    };

    info!(
        status = status,
        inference_configured = inference_configured,
        "Health check completed"
    );

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services: ServiceStatus {
            inference_configured,
        },
    })
}
