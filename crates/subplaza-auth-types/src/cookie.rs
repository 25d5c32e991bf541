//! Cookie builder for the admin session token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the admin session token.
pub const SUBPLAZA_ADMIN_SESSION: &str = "subplaza_admin_session";

/// Session-token JWT lifetime in seconds (12 hours). A login session outlives
/// the one-time code that created it; expiry is the only termination path.
pub const SESSION_TOKEN_EXP: u64 = 43200;

/// Set the admin session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use subplaza_auth_types::cookie::{set_session_cookie, SUBPLAZA_ADMIN_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "example.com".to_string());
/// let cookie = jar.get(SUBPLAZA_ADMIN_SESSION).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(43200)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((SUBPLAZA_ADMIN_SESSION, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(SESSION_TOKEN_EXP as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
