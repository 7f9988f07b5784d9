pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers::handle_generate;
use crate::interview::handlers::handle_respond;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume generation
        .route("/api/generate", post(handle_generate))
        // Live interview
        .route("/api/interview/respond", post(handle_respond))
        .with_state(state)
}
