use chrono::{Duration, Utc};

use subplaza_admin_auth::domain::types::CodePolicy;
use subplaza_admin_auth::error::AdminAuthError;
use subplaza_admin_auth::usecase::request_code::{RequestCodeInput, RequestCodeUseCase};
use subplaza_admin_auth::usecase::verify_code::{VerifyCodeInput, VerifyCodeUseCase};
use subplaza_auth_types::token::{ADMIN_ROLE, validate_session_token};

use crate::helpers::{
    MemAuditSink, MemCodeRecordStore, MemRateLimitStore, TEST_ADMIN_EMAIL, TEST_JWT_SECRET,
    test_policy,
};

struct Harness {
    codes: MemCodeRecordStore,
    limits: MemRateLimitStore,
    audit: MemAuditSink,
    policy: CodePolicy,
}

impl Harness {
    fn new() -> Self {
        Self {
            codes: MemCodeRecordStore::new(),
            limits: MemRateLimitStore::new(),
            audit: MemAuditSink::new(),
            policy: test_policy(),
        }
    }

    async fn issue(&self) -> String {
        let uc = RequestCodeUseCase {
            codes: self.codes.clone(),
            limits: self.limits.clone(),
            audit: self.audit.clone(),
            admin_email: TEST_ADMIN_EMAIL.to_owned(),
            policy: self.policy.clone(),
        };
        uc.execute(RequestCodeInput {
            email: TEST_ADMIN_EMAIL.to_owned(),
            client_key: "203.0.113.7".to_owned(),
            client_agent: None,
        })
        .await
        .unwrap();
        self.codes.last_delivered_code()
    }

    fn verifier(&self) -> VerifyCodeUseCase<MemCodeRecordStore, MemRateLimitStore, MemAuditSink> {
        VerifyCodeUseCase {
            codes: self.codes.clone(),
            limits: self.limits.clone(),
            audit: self.audit.clone(),
            admin_email: TEST_ADMIN_EMAIL.to_owned(),
            jwt_secret: TEST_JWT_SECRET.to_owned(),
            policy: self.policy.clone(),
        }
    }

    async fn verify(&self, code: &str) -> Result<String, AdminAuthError> {
        self.verifier()
            .execute(VerifyCodeInput {
                email: TEST_ADMIN_EMAIL.to_owned(),
                code: code.to_owned(),
                client_key: "203.0.113.7".to_owned(),
                client_agent: None,
            })
            .await
            .map(|out| out.token)
    }
}

#[tokio::test]
async fn should_sign_in_with_correct_code_exactly_once() {
    let h = Harness::new();
    let code = h.issue().await;

    let token = h.verify(&code).await.unwrap();
    let info = validate_session_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.email, TEST_ADMIN_EMAIL);
    assert_eq!(info.role, ADMIN_ROLE);

    // The code was a single-use resource; replay gets the generic failure.
    let replay = h.verify(&code).await;
    assert!(
        matches!(replay, Err(AdminAuthError::InvalidOrExpired)),
        "expected InvalidOrExpired on replay, got {replay:?}"
    );
}

#[tokio::test]
async fn should_reject_wrong_code_and_count_the_attempt() {
    let h = Harness::new();
    h.issue().await;

    let result = h.verify("definitely-not-the-code-1A!").await;
    assert!(matches!(result, Err(AdminAuthError::InvalidOrExpired)));

    let records = h.codes.records_handle();
    let records = records.lock().unwrap();
    assert_eq!(records[0].attempts_used, 1);
    assert!(!records[0].consumed);
}

#[tokio::test]
async fn should_reject_correct_code_after_attempt_budget_exhausted() {
    let h = Harness::new();
    let code = h.issue().await;

    for i in 0..4 {
        let result = h.verify("wrong-code-every-time-9Z!").await;
        assert!(
            matches!(result, Err(AdminAuthError::InvalidOrExpired)),
            "attempt {i}: expected InvalidOrExpired, got {result:?}"
        );
    }
    // The fifth failure spends the budget and consumes the record in the
    // same step.
    let fifth = h.verify("wrong-code-every-time-9Z!").await;
    assert!(
        matches!(fifth, Err(AdminAuthError::AttemptsExhausted)),
        "expected AttemptsExhausted, got {fifth:?}"
    );

    // Exhaustion dominates: the correct code is dead too.
    let result = h.verify(&code).await;
    assert!(
        matches!(result, Err(AdminAuthError::InvalidOrExpired)),
        "expected InvalidOrExpired after exhaustion, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_correct_code_at_expiry() {
    let h = Harness::new();
    let code = h.issue().await;

    // Rewind the record's expiry instead of sleeping through the TTL.
    {
        let records = h.codes.records_handle();
        let mut records = records.lock().unwrap();
        records[0].expires_at = Utc::now() - Duration::seconds(1);
    }

    let result = h.verify(&code).await;
    assert!(
        matches!(result, Err(AdminAuthError::InvalidOrExpired)),
        "expected InvalidOrExpired for expired code, got {result:?}"
    );

    // Nothing left to count attempts against.
    let records = h.codes.records_handle();
    assert_eq!(records.lock().unwrap()[0].attempts_used, 0);
}

#[tokio::test]
async fn should_fail_verify_when_no_code_was_ever_issued() {
    let h = Harness::new();
    let result = h.verify("AnyCodeAtAll-123!").await;
    assert!(matches!(result, Err(AdminAuthError::InvalidOrExpired)));
}

#[tokio::test]
async fn should_reject_unknown_email_without_touching_the_record() {
    let h = Harness::new();
    let code = h.issue().await;

    let result = h
        .verifier()
        .execute(VerifyCodeInput {
            email: "intruder@example.com".to_owned(),
            code: code.clone(),
            client_key: "203.0.113.7".to_owned(),
            client_agent: None,
        })
        .await;
    assert!(matches!(result, Err(AdminAuthError::IdentityMismatch)));

    let records = h.codes.records_handle();
    assert_eq!(records.lock().unwrap()[0].attempts_used, 0);
}

#[tokio::test]
async fn reissue_invalidates_the_previous_code() {
    let h = Harness::new();
    let code_a = h.issue().await;
    let code_b = h.issue().await;

    let result = h.verify(&code_a).await;
    assert!(
        matches!(result, Err(AdminAuthError::InvalidOrExpired)),
        "old code must not verify, got {result:?}"
    );

    h.verify(&code_b).await.expect("new code must verify");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_correct_code_verifies_yield_exactly_one_token() {
    let h = Harness::new();
    let code = h.issue().await;

    let (a, b) = tokio::join!(h.verify(&code), h.verify(&code));

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one racer may win: {a:?} / {b:?}");
    for loser in [a, b].into_iter().filter(Result::is_err) {
        assert!(matches!(loser, Err(AdminAuthError::InvalidOrExpired)));
    }
}
