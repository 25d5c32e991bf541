use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};

use subplaza_auth_types::cookie::SESSION_TOKEN_EXP;
use subplaza_auth_types::token::{ADMIN_ROLE, SessionClaims};

use crate::error::AdminAuthError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Mint a signed admin session token. Fixed validity, independent of the
/// one-time code's TTL; there is no revocation — expiry is the only
/// termination path. The caller owns transport (JSON body + cookie).
pub fn issue_session_token(email: &str, secret: &str) -> Result<(String, u64), AdminAuthError> {
    let iat = now_secs();
    let exp = iat + SESSION_TOKEN_EXP;
    let claims = SessionClaims {
        sub: email.to_owned(),
        role: ADMIN_ROLE.to_owned(),
        iat,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AdminAuthError::Internal(e.into()))?;
    Ok((token, exp))
}
