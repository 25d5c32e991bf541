#![allow(async_fn_in_trait)]

use std::time::Duration;

use uuid::Uuid;

use crate::domain::types::{
    AuditEntry, AuthAction, CodeRecord, OutboxEvent, RateLimitDecision,
};
use crate::error::AdminAuthError;

/// Store for one-time code records. All mutating operations are atomic
/// primitives — callers never compose them from separate load + save steps.
pub trait CodeRecordStore: Send + Sync {
    /// Persist a new record and its outbox event in one transaction,
    /// consuming any record still live for the same principal. Under
    /// concurrent issuance at most one live record survives.
    async fn issue(&self, record: &CodeRecord, event: &OutboxEvent) -> Result<(), AdminAuthError>;

    /// The current live record for a principal, if any. Expired or consumed
    /// rows report `None` even when they physically exist.
    async fn load_live(&self, principal_id: &str) -> Result<Option<CodeRecord>, AdminAuthError>;

    /// Atomically increment `attempts_used`, consuming the record in the same
    /// statement when the new count reaches `max_attempts`. Returns
    /// `(attempts_used, max_attempts)` after the increment.
    async fn record_failed_attempt(&self, id: Uuid) -> Result<(i32, i32), AdminAuthError>;

    /// Compare-and-swap `consumed` from false to true. Returns whether this
    /// call performed the transition — the loser of a verify race gets false.
    async fn consume(&self, id: Uuid) -> Result<bool, AdminAuthError>;
}

/// Keyed fixed-window counters, independent of the code record store.
pub trait RateLimitStore: Send + Sync {
    /// Count this request against `(client_key, action)`. Starts a fresh
    /// window when none exists or the previous one elapsed; the increment is
    /// atomic, so no two concurrent requests can both be the Nth.
    async fn check_and_increment(
        &self,
        client_key: &str,
        action: AuthAction,
        limit: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, AdminAuthError>;
}

/// Append-only audit sink. Fire-and-forget: implementations must neither
/// block nor fail the request path — a lost entry is logged and swallowed.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}
