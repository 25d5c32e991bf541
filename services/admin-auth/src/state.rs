use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::domain::types::CodePolicy;
use crate::infra::audit::DbAuditSink;
use crate::infra::cache::RedisRateLimitStore;
use crate::infra::db::DbCodeRecordStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub admin_email: String,
    pub policy: CodePolicy,
}

impl AppState {
    pub fn code_records(&self) -> DbCodeRecordStore {
        DbCodeRecordStore {
            db: self.db.clone(),
        }
    }

    pub fn rate_limits(&self) -> RedisRateLimitStore {
        RedisRateLimitStore {
            pool: self.redis.clone(),
        }
    }

    pub fn audit(&self) -> DbAuditSink {
        DbAuditSink {
            db: self.db.clone(),
        }
    }
}
