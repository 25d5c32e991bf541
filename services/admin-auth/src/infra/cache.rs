use std::time::Duration;

use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::RateLimitStore;
use crate::domain::types::{AuthAction, RateLimitDecision};
use crate::error::AdminAuthError;

/// Fixed-window rate limiting on Redis. `INCR` is atomic per key, so no two
/// concurrent requests can both observe the same count; the key's TTL is the
/// window anchor and doubles as the retry-after hint.
#[derive(Clone)]
pub struct RedisRateLimitStore {
    pub pool: Pool,
}

fn window_key(action: AuthAction, client_key: &str) -> String {
    format!("ratelimit:{}:{}", action.as_str(), client_key)
}

impl RateLimitStore for RedisRateLimitStore {
    async fn check_and_increment(
        &self,
        client_key: &str,
        action: AuthAction,
        limit: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, AdminAuthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AdminAuthError::Internal(e.into()))?;
        let key = window_key(action, client_key);

        let count: u64 = conn
            .incr(&key, 1)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AdminAuthError::Internal(e.into()))?;
        if count == 1 {
            // First hit opens a fresh window; when the key expires the
            // counter resets outright (fixed-window, not sliding).
            let (): () = conn
                .expire(&key, window.as_secs() as i64)
                .await
                .map_err(|e: deadpool_redis::redis::RedisError| {
                    AdminAuthError::Internal(e.into())
                })?;
        }

        if count <= u64::from(limit) {
            return Ok(RateLimitDecision::Allowed);
        }

        let ttl: i64 = conn
            .ttl(&key)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AdminAuthError::Internal(e.into()))?;
        Ok(RateLimitDecision::Denied {
            retry_after_secs: ttl.max(1) as u64,
        })
    }
}
