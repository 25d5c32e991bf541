use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Admin-auth domain error variants.
///
/// `AttemptsExhausted` is internally distinct from `InvalidOrExpired` so the
/// audit trail can tell them apart, but the two serialize to byte-identical
/// responses: a caller must not be able to distinguish "code wrong" from
/// "code expired" from "no code exists" from "budget spent".
#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    #[error("forbidden")]
    IdentityMismatch,
    #[error("too many requests")]
    RateLimited { retry_after_secs: u64 },
    #[error("invalid or expired code")]
    InvalidOrExpired,
    #[error("invalid or expired code")]
    AttemptsExhausted,
    #[error("invalid session")]
    InvalidToken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AdminAuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IdentityMismatch => "FORBIDDEN",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::InvalidOrExpired | Self::AttemptsExhausted => "INVALID_CODE",
            Self::InvalidToken => "INVALID_SESSION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::IdentityMismatch => StatusCode::FORBIDDEN,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidOrExpired | Self::AttemptsExhausted => StatusCode::BAD_REQUEST,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — the trace layer already records method/uri/status
        // for all requests, and 4xx are expected client errors. Internal
        // errors need the anyhow chain so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "success": false,
            "kind": self.kind(),
            "message": self.to_string(),
        });
        let mut response = (status, axum::Json(body)).into_response();
        if let Self::RateLimited { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
