use crate::domain::types::CodePolicy;

/// Admin-auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AdminAuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (rate-limit counters).
    pub redis_url: String,
    /// HMAC secret for signing admin session JWTs.
    pub jwt_secret: String,
    /// The single authorized administrator identity, compared
    /// case-insensitively. Configuration, not data — there is no users table.
    pub admin_email: String,
    /// Cookie domain attribute (root domain, e.g. "subplaza.shop").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3119). Env var: `ADMIN_AUTH_PORT`.
    pub admin_auth_port: u16,
    /// Code issuance/verification tunables.
    pub policy: CodePolicy,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AdminAuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            admin_email: std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            admin_auth_port: env_parse("ADMIN_AUTH_PORT", 3119),
            policy: CodePolicy {
                ttl_minutes: env_parse("CODE_TTL_MINUTES", 10),
                min_len: env_parse("CODE_MIN_LEN", 20),
                max_len: env_parse("CODE_MAX_LEN", 30),
                max_failed_attempts: env_parse("MAX_FAILED_ATTEMPTS", 5),
                request_limit_per_hour: env_parse("MAX_CODE_REQUESTS_PER_HOUR", 6),
                verify_limit_per_hour: env_parse("MAX_VERIFY_ATTEMPTS_PER_HOUR", 20),
            },
        }
    }
}
