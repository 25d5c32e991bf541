use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One outstanding sign-in challenge for the administrator.
#[derive(Debug, Clone)]
pub struct CodeRecord {
    pub id: Uuid,
    pub principal_id: String,
    /// Argon2 digest of the code; the plaintext is never stored here.
    pub code_digest: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub attempts_used: i32,
    pub max_attempts: i32,
    pub consumed: bool,
}

impl CodeRecord {
    /// A record can still succeed verification: unconsumed, unexpired, and
    /// under its attempt budget. Expiry is lazy — nothing sweeps dead rows.
    pub fn is_live(&self) -> bool {
        !self.consumed && self.attempts_used < self.max_attempts && self.expires_at > Utc::now()
    }
}

/// The two rate-limited / audited operations of this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    RequestCode,
    VerifyCode,
}

impl AuthAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestCode => "request_code",
            Self::VerifyCode => "verify_code",
        }
    }
}

/// Outcome recorded in the audit trail for a terminal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Success,
    Failure,
    RateLimited,
}

impl AuditOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::RateLimited => "rate_limited",
        }
    }
}

/// Immutable audit record, one per terminal outcome.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action: AuthAction,
    pub outcome: AuditOutcome,
    pub principal_id: Option<String>,
    pub client_key: String,
    pub client_agent: Option<String>,
    /// Non-sensitive context only (e.g. masked code tail), never the code.
    pub detail: Option<String>,
}

/// Result of a fixed-window rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied { retry_after_secs: u64 },
}

/// Outbox event for async delivery (the sign-in code email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Issuance and verification tunables, loaded from the environment once at
/// startup and snapshotted into each code record where relevant.
#[derive(Debug, Clone)]
pub struct CodePolicy {
    pub ttl_minutes: i64,
    pub min_len: usize,
    pub max_len: usize,
    pub max_failed_attempts: i32,
    pub request_limit_per_hour: u32,
    pub verify_limit_per_hour: u32,
}

/// Both rate-limit actions count against fixed one-hour windows.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(3600);
