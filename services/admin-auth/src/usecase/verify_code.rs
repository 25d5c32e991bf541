use crate::code::verify_code;
use crate::domain::repository::{AuditSink, CodeRecordStore, RateLimitStore};
use crate::domain::types::{
    AuditEntry, AuditOutcome, AuthAction, CodePolicy, RATE_LIMIT_WINDOW, RateLimitDecision,
};
use crate::error::AdminAuthError;
use crate::usecase::session::issue_session_token;

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
    pub client_key: String,
    pub client_agent: Option<String>,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub token: String,
    pub expires_at: u64,
}

pub struct VerifyCodeUseCase<S, R, L>
where
    S: CodeRecordStore,
    R: RateLimitStore,
    L: AuditSink,
{
    pub codes: S,
    pub limits: R,
    pub audit: L,
    pub admin_email: String,
    pub jwt_secret: String,
    pub policy: CodePolicy,
}

impl<S, R, L> VerifyCodeUseCase<S, R, L>
where
    S: CodeRecordStore,
    R: RateLimitStore,
    L: AuditSink,
{
    fn record_audit(&self, outcome: AuditOutcome, input: &VerifyCodeInput, detail: Option<&str>) {
        let known = input.email.eq_ignore_ascii_case(&self.admin_email);
        self.audit.record(AuditEntry {
            action: AuthAction::VerifyCode,
            outcome,
            principal_id: known.then(|| self.admin_email.clone()),
            client_key: input.client_key.clone(),
            client_agent: input.client_agent.clone(),
            detail: detail.map(str::to_owned),
        });
    }

    pub async fn execute(&self, input: VerifyCodeInput) -> Result<VerifyCodeOutput, AdminAuthError> {
        // Rate-limit gate, independent of the record's own attempt budget.
        let decision = self
            .limits
            .check_and_increment(
                &input.client_key,
                AuthAction::VerifyCode,
                self.policy.verify_limit_per_hour,
                RATE_LIMIT_WINDOW,
            )
            .await?;
        if let RateLimitDecision::Denied { retry_after_secs } = decision {
            self.record_audit(AuditOutcome::RateLimited, &input, None);
            return Err(AdminAuthError::RateLimited { retry_after_secs });
        }

        if !input.email.eq_ignore_ascii_case(&self.admin_email) {
            self.record_audit(AuditOutcome::Failure, &input, Some("identity mismatch"));
            return Err(AdminAuthError::IdentityMismatch);
        }

        // No live record: nothing to count an attempt against. The response
        // is the same "invalid or expired" a wrong code gets.
        let Some(record) = self.codes.load_live(&self.admin_email).await? else {
            self.record_audit(AuditOutcome::Failure, &input, Some("no live code"));
            return Err(AdminAuthError::InvalidOrExpired);
        };

        let matched = verify_code(&input.code, &record.code_digest);
        if matched && record.attempts_used < record.max_attempts {
            if self.codes.consume(record.id).await? {
                let (token, expires_at) = issue_session_token(&self.admin_email, &self.jwt_secret)?;
                self.record_audit(AuditOutcome::Success, &input, Some("code consumed"));
                return Ok(VerifyCodeOutput { token, expires_at });
            }
            // A concurrent call spent the code first. Losing the race for a
            // single-use resource is an ordinary failure, not an error.
            self.record_audit(AuditOutcome::Failure, &input, Some("lost consume race"));
            return Err(AdminAuthError::InvalidOrExpired);
        }

        let (attempts_used, max_attempts) = self.codes.record_failed_attempt(record.id).await?;
        if attempts_used >= max_attempts {
            // The same statement that incremented the counter consumed the
            // record, so no further attempt can use it, correct or not.
            self.record_audit(AuditOutcome::Failure, &input, Some("attempt budget exhausted"));
            return Err(AdminAuthError::AttemptsExhausted);
        }
        self.record_audit(AuditOutcome::Failure, &input, Some("code mismatch"));
        Err(AdminAuthError::InvalidOrExpired)
    }
}
