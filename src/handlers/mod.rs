pub mod analyze;
pub mod health;
pub mod ui;

pub use analyze::*;
pub use health::*;
pub use ui::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::logging_middleware;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes();

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/app", get(app_handler))
        .route("/analyze", post(analyze_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
