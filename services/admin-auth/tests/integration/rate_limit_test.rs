use std::time::Duration;

use subplaza_admin_auth::domain::types::{AuditOutcome, CodePolicy};
use subplaza_admin_auth::error::AdminAuthError;
use subplaza_admin_auth::usecase::request_code::{RequestCodeInput, RequestCodeUseCase};
use subplaza_admin_auth::usecase::verify_code::{VerifyCodeInput, VerifyCodeUseCase};

use crate::helpers::{
    MemAuditSink, MemCodeRecordStore, MemRateLimitStore, TEST_ADMIN_EMAIL, TEST_JWT_SECRET,
    test_policy,
};

fn request_uc(
    codes: &MemCodeRecordStore,
    limits: &MemRateLimitStore,
    audit: &MemAuditSink,
    policy: CodePolicy,
) -> RequestCodeUseCase<MemCodeRecordStore, MemRateLimitStore, MemAuditSink> {
    RequestCodeUseCase {
        codes: codes.clone(),
        limits: limits.clone(),
        audit: audit.clone(),
        admin_email: TEST_ADMIN_EMAIL.to_owned(),
        policy,
    }
}

fn request_input(client_key: &str) -> RequestCodeInput {
    RequestCodeInput {
        email: TEST_ADMIN_EMAIL.to_owned(),
        client_key: client_key.to_owned(),
        client_agent: None,
    }
}

#[tokio::test]
async fn seventh_request_in_the_window_is_denied() {
    let codes = MemCodeRecordStore::new();
    let limits = MemRateLimitStore::new();
    let audit = MemAuditSink::new();
    let uc = request_uc(&codes, &limits, &audit, test_policy());

    for i in 0..6 {
        uc.execute(request_input("203.0.113.7"))
            .await
            .unwrap_or_else(|e| panic!("request {i} should be allowed: {e:?}"));
    }

    let denied = uc.execute(request_input("203.0.113.7")).await;
    match denied {
        Err(AdminAuthError::RateLimited { retry_after_secs }) => {
            assert!(retry_after_secs > 0, "retry-after must be positive");
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }

    // Denial is itself a terminal, audited outcome.
    let entries = audit.entries_handle();
    let entries = entries.lock().unwrap();
    assert_eq!(entries.last().unwrap().outcome, AuditOutcome::RateLimited);

    // The gate sits in front of issuance: only six records exist.
    assert_eq!(codes.records_handle().lock().unwrap().len(), 6);
}

#[tokio::test]
async fn first_request_after_the_window_boundary_is_allowed() {
    let codes = MemCodeRecordStore::new();
    let limits = MemRateLimitStore::new();
    let uc = request_uc(&codes, &limits, &MemAuditSink::new(), test_policy());

    for _ in 0..6 {
        uc.execute(request_input("203.0.113.7")).await.unwrap();
    }
    assert!(uc.execute(request_input("203.0.113.7")).await.is_err());

    // Fixed window: once it elapses the counter resets outright.
    limits.advance(Duration::from_secs(3601));
    uc.execute(request_input("203.0.113.7")).await.unwrap();
}

#[tokio::test]
async fn limits_are_tracked_per_client_key() {
    let codes = MemCodeRecordStore::new();
    let limits = MemRateLimitStore::new();
    let uc = request_uc(&codes, &limits, &MemAuditSink::new(), test_policy());

    for _ in 0..6 {
        uc.execute(request_input("203.0.113.7")).await.unwrap();
    }
    assert!(uc.execute(request_input("203.0.113.7")).await.is_err());

    // A different caller still has a fresh budget.
    uc.execute(request_input("198.51.100.4")).await.unwrap();
}

#[tokio::test]
async fn verify_ceiling_is_independent_of_the_attempt_budget() {
    let codes = MemCodeRecordStore::new();
    let limits = MemRateLimitStore::new();
    let audit = MemAuditSink::new();

    // Three verify calls per hour, while the record itself allows five
    // failures — the window ceiling must trip first.
    let mut policy = test_policy();
    policy.verify_limit_per_hour = 3;

    request_uc(&codes, &limits, &audit, policy.clone())
        .execute(request_input("203.0.113.7"))
        .await
        .unwrap();

    let verify = VerifyCodeUseCase {
        codes: codes.clone(),
        limits: limits.clone(),
        audit: audit.clone(),
        admin_email: TEST_ADMIN_EMAIL.to_owned(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        policy,
    };
    let verify_input = || VerifyCodeInput {
        email: TEST_ADMIN_EMAIL.to_owned(),
        code: "wrong-code-every-time-9Z!".to_owned(),
        client_key: "203.0.113.7".to_owned(),
        client_agent: None,
    };

    for _ in 0..3 {
        let result = verify.execute(verify_input()).await;
        assert!(matches!(result, Err(AdminAuthError::InvalidOrExpired)));
    }

    let fourth = verify.execute(verify_input()).await;
    assert!(
        matches!(fourth, Err(AdminAuthError::RateLimited { .. })),
        "expected RateLimited, got {fourth:?}"
    );

    // The denied call never reached the record store.
    let records = codes.records_handle();
    assert_eq!(records.lock().unwrap()[0].attempts_used, 3);
}
