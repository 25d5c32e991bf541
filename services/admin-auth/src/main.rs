use sea_orm::Database;
use tracing::info;

use subplaza_admin_auth::config::AdminAuthConfig;
use subplaza_admin_auth::router::build_router;
use subplaza_admin_auth::state::AppState;
use subplaza_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AdminAuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let state = AppState {
        db,
        redis,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        admin_email: config.admin_email,
        policy: config.policy,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.admin_auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("admin-auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
