use axum::http::{HeaderValue, header};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;

use subplaza_admin_auth::domain::types::CodePolicy;
use subplaza_admin_auth::router::build_router;
use subplaza_admin_auth::state::AppState;
use subplaza_admin_auth::usecase::session::issue_session_token;
use subplaza_auth_types::cookie::SUBPLAZA_ADMIN_SESSION;
use subplaza_auth_types::token::ADMIN_ROLE;

use crate::helpers::{TEST_ADMIN_EMAIL, TEST_JWT_SECRET, test_policy};

/// Router wired against a mock database — enough for the endpoints that
/// never touch a backing store.
fn test_server(policy: CodePolicy) -> TestServer {
    let db = DatabaseConnection::Disconnected;
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:1")
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("redis pool");

    let state = AppState {
        db,
        redis,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        cookie_domain: "subplaza.shop".to_owned(),
        admin_email: TEST_ADMIN_EMAIL.to_owned(),
        policy,
    };
    TestServer::new(build_router(state)).expect("test server")
}

#[tokio::test]
async fn healthz_answers_ok() {
    let server = test_server(test_policy());
    let response = server.get("/healthz").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn me_without_credentials_is_unauthorized() {
    let server = test_server(test_policy());

    let response = server.get("/admin/me").await;
    response.assert_status_unauthorized();

    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "INVALID_SESSION");
}

#[tokio::test]
async fn me_accepts_a_bearer_token() {
    let server = test_server(test_policy());
    let (token, _) = issue_session_token(TEST_ADMIN_EMAIL, TEST_JWT_SECRET).unwrap();

    let response = server
        .get("/admin/me")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
        .await;
    response.assert_status_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["admin"]["email"], TEST_ADMIN_EMAIL);
    assert_eq!(json["admin"]["role"], ADMIN_ROLE);
}

#[tokio::test]
async fn me_accepts_the_session_cookie() {
    let server = test_server(test_policy());
    let (token, _) = issue_session_token(TEST_ADMIN_EMAIL, TEST_JWT_SECRET).unwrap();

    let response = server
        .get("/admin/me")
        .add_header(
            header::COOKIE,
            HeaderValue::from_str(&format!("{SUBPLAZA_ADMIN_SESSION}={token}")).unwrap(),
        )
        .await;
    response.assert_status_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["admin"]["email"], TEST_ADMIN_EMAIL);
}

#[tokio::test]
async fn me_rejects_a_tampered_token() {
    let server = test_server(test_policy());
    let (token, _) = issue_session_token(TEST_ADMIN_EMAIL, "some-other-secret").unwrap();

    let response = server
        .get("/admin/me")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
        .await;
    response.assert_status_unauthorized();
}
