use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use subplaza_core::health::healthz;
use subplaza_core::middleware::{request_id_layer, trace_layer};

use crate::handlers::auth::{me, request_code, verify_code};
use crate::state::AppState;

/// Readiness probes the database, the one store every request path touches.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Admin one-time-code auth
        .route("/admin/request-code", post(request_code))
        .route("/admin/verify-code", post(verify_code))
        .route("/admin/me", get(me))
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
