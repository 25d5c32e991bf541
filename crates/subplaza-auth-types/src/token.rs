//! Admin session-token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_ADMIN_AUTH", test))]
use serde::Serialize;

/// The single role this system knows. There is exactly one privileged
/// identity; anything else never receives a token.
pub const ADMIN_ROLE: &str = "admin";

/// Admin identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub email: String,
    pub role: String,
    pub expires_at: u64,
}

/// Errors returned by [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by token creation (admin-auth service) and
/// validation (any consumer guarding an admin surface).
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | admin email (the single principal) |
/// | `role` | custom | always `"admin"` |
/// | `iat` | `iat` | issue timestamp, seconds since epoch |
/// | `exp` | `exp` | expiry timestamp, seconds since epoch |
///
/// [`Deserialize`] is always available — all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_ADMIN_AUTH`** cargo feature;
/// only the admin-auth service enables it because it is the sole issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_ADMIN_AUTH", test), derive(Serialize))]
pub struct SessionClaims {
    pub sub: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// Decode and validate a session JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s tolerates clock skew between services.
fn decode_jwt(token: &str, secret: &str) -> Result<SessionClaims, SessionTokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionTokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionTokenError::InvalidSignature,
        _ => SessionTokenError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a session-token value (cookie or bearer), returning parsed identity.
///
/// This is the primary public API for session validation — callers guarding
/// admin endpoints invoke it on every request.
pub fn validate_session_token(value: &str, secret: &str) -> Result<SessionInfo, SessionTokenError> {
    let claims = decode_jwt(value, secret)?;
    Ok(SessionInfo {
        email: claims.sub,
        role: claims.role,
        expires_at: claims.exp,
    })
}
