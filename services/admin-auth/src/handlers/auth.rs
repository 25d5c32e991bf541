use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use subplaza_auth_types::cookie::{SUBPLAZA_ADMIN_SESSION, set_session_cookie};
use subplaza_auth_types::token::validate_session_token;

use crate::error::AdminAuthError;
use crate::state::AppState;
use crate::usecase::request_code::{RequestCodeInput, RequestCodeUseCase};
use crate::usecase::verify_code::{VerifyCodeInput, VerifyCodeUseCase};

/// The service sits behind the marketplace gateway, so the first
/// `X-Forwarded-For` hop identifies the caller for rate limiting and audit.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_owned())
}

fn client_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

// ── POST /admin/request-code ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestCodeRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct RequestCodeResponse {
    pub success: bool,
    pub message: String,
}

pub async fn request_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RequestCodeRequest>,
) -> Result<Json<RequestCodeResponse>, AdminAuthError> {
    let usecase = RequestCodeUseCase {
        codes: state.code_records(),
        limits: state.rate_limits(),
        audit: state.audit(),
        admin_email: state.admin_email.clone(),
        policy: state.policy.clone(),
    };
    usecase
        .execute(RequestCodeInput {
            email: body.email,
            client_key: client_key(&headers),
            client_agent: client_agent(&headers),
        })
        .await?;
    Ok(Json(RequestCodeResponse {
        success: true,
        message: "A sign-in code has been sent to the administrator address.".to_owned(),
    }))
}

// ── POST /admin/verify-code ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

pub async fn verify_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<impl IntoResponse, AdminAuthError> {
    let usecase = VerifyCodeUseCase {
        codes: state.code_records(),
        limits: state.rate_limits(),
        audit: state.audit(),
        admin_email: state.admin_email.clone(),
        jwt_secret: state.jwt_secret.clone(),
        policy: state.policy.clone(),
    };

    let out = usecase
        .execute(VerifyCodeInput {
            email: body.email,
            code: body.code,
            client_key: client_key(&headers),
            client_agent: client_agent(&headers),
        })
        .await?;

    let jar = set_session_cookie(jar, out.token.clone(), state.cookie_domain.clone());
    let body = VerifyCodeResponse {
        success: true,
        message: "Signed in.".to_owned(),
        token: out.token,
    };
    Ok((jar, Json(body)))
}

// ── GET /admin/me ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AdminIdentity {
    pub email: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub admin: AdminIdentity,
}

/// Bearer header wins over the cookie; both carry the same JWT.
fn session_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned);
    bearer.or_else(|| jar.get(SUBPLAZA_ADMIN_SESSION).map(|c| c.value().to_owned()))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<Json<MeResponse>, AdminAuthError> {
    let token = session_token(&headers, &jar).ok_or(AdminAuthError::InvalidToken)?;

    let info = validate_session_token(&token, &state.jwt_secret)
        .map_err(|_| AdminAuthError::InvalidToken)?;

    Ok(Json(MeResponse {
        success: true,
        admin: AdminIdentity {
            email: info.email,
            role: info.role,
        },
    }))
}
