use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check.
///
/// Readiness is service-specific (it probes backing stores), so each service
/// wires its own `/readyz` handler.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
