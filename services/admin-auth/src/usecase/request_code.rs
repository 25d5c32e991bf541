use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::code::{generate_code, hash_code, masked_tail};
use crate::domain::repository::{AuditSink, CodeRecordStore, RateLimitStore};
use crate::domain::types::{
    AuditEntry, AuditOutcome, AuthAction, CodePolicy, CodeRecord, OutboxEvent, RATE_LIMIT_WINDOW,
    RateLimitDecision,
};
use crate::error::AdminAuthError;

/// Outbox event kind for sign-in code delivery.
pub const CODE_ISSUED_EVENT: &str = "admin_code_issued";

pub struct RequestCodeInput {
    pub email: String,
    pub client_key: String,
    pub client_agent: Option<String>,
}

pub struct RequestCodeUseCase<S, R, L>
where
    S: CodeRecordStore,
    R: RateLimitStore,
    L: AuditSink,
{
    pub codes: S,
    pub limits: R,
    pub audit: L,
    pub admin_email: String,
    pub policy: CodePolicy,
}

impl<S, R, L> RequestCodeUseCase<S, R, L>
where
    S: CodeRecordStore,
    R: RateLimitStore,
    L: AuditSink,
{
    pub async fn execute(&self, input: RequestCodeInput) -> Result<(), AdminAuthError> {
        // 1. Rate-limit gate, keyed on the caller rather than the claimed
        //    identity. Counted before anything else happens.
        let decision = self
            .limits
            .check_and_increment(
                &input.client_key,
                AuthAction::RequestCode,
                self.policy.request_limit_per_hour,
                RATE_LIMIT_WINDOW,
            )
            .await?;
        if let RateLimitDecision::Denied { retry_after_secs } = decision {
            self.audit.record(AuditEntry {
                action: AuthAction::RequestCode,
                outcome: AuditOutcome::RateLimited,
                principal_id: None,
                client_key: input.client_key,
                client_agent: input.client_agent,
                detail: None,
            });
            return Err(AdminAuthError::RateLimited { retry_after_secs });
        }

        // 2. Single-principal identity gate. Resolved here; a mismatch never
        //    reaches the store layer.
        if !input.email.eq_ignore_ascii_case(&self.admin_email) {
            self.audit.record(AuditEntry {
                action: AuthAction::RequestCode,
                outcome: AuditOutcome::Failure,
                principal_id: None,
                client_key: input.client_key,
                client_agent: input.client_agent,
                detail: Some("identity mismatch".to_owned()),
            });
            return Err(AdminAuthError::IdentityMismatch);
        }

        // 3. Generate, hash, persist. Issuing consumes any prior live record
        //    in the same transaction, and the outbox row rides along so the
        //    response never waits on email delivery.
        let code = generate_code(self.policy.min_len, self.policy.max_len);
        let digest = hash_code(&code)?;
        let now = Utc::now();
        let record = CodeRecord {
            id: Uuid::new_v4(),
            principal_id: self.admin_email.clone(),
            code_digest: digest,
            issued_at: now,
            expires_at: now + Duration::minutes(self.policy.ttl_minutes),
            attempts_used: 0,
            max_attempts: self.policy.max_failed_attempts,
            consumed: false,
        };
        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: CODE_ISSUED_EVENT.to_owned(),
            payload: json!({ "email": self.admin_email, "code": code }),
            idempotency_key: format!("{CODE_ISSUED_EVENT}:{}", record.id),
        };
        self.codes.issue(&record, &event).await?;

        self.audit.record(AuditEntry {
            action: AuthAction::RequestCode,
            outcome: AuditOutcome::Success,
            principal_id: Some(self.admin_email.clone()),
            client_key: input.client_key,
            client_agent: input.client_agent,
            detail: Some(format!("code {}", masked_tail(&code))),
        });
        Ok(())
    }
}
