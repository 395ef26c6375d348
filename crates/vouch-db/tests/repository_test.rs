//! Integration tests for the SurrealDB repositories, run against an
//! in-memory engine.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;
use vouch_core::error::VouchError;
use vouch_core::models::account::{AccountRole, CreateAccount};
use vouch_core::models::otp::OtpChallenge;
use vouch_core::models::session::CreateSession;
use vouch_core::models::verification::{DocumentKind, ReviewDecision, VerificationRecord};
use vouch_core::repository::{
    AccountRepository, OtpRepository, Pagination, SessionRepository, VerificationRepository,
};
use vouch_db::repository::{
    SurrealAccountRepository, SurrealOtpRepository, SurrealSessionRepository,
    SurrealVerificationRepository,
};

async fn setup_db() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vouch_db::run_migrations(&db).await.unwrap();
    db
}

fn employer_input(email: &str) -> CreateAccount {
    CreateAccount {
        email: email.into(),
        password: "correct-horse-battery".into(),
        company_name: "Test Staffing Ltd".into(),
        company_id: None,
        role: AccountRole::Employer,
    }
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = setup_db().await;
    // Second run must be a no-op.
    vouch_db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn account_create_and_get() {
    let db = setup_db().await;
    let repo = SurrealAccountRepository::new(db);

    let account = repo.create(employer_input("hr@acme.test")).await.unwrap();
    assert_eq!(account.email, "hr@acme.test");
    assert_eq!(account.role, AccountRole::Employer);
    // Raw password is never stored.
    assert_ne!(account.password_hash, "correct-horse-battery");
    assert!(account.password_hash.starts_with("$argon2id$"));

    let by_id = repo.get_by_id(account.id).await.unwrap();
    assert_eq!(by_id.email, account.email);

    let by_email = repo.get_by_email("hr@acme.test").await.unwrap();
    assert_eq!(by_email.id, account.id);
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let db = setup_db().await;
    let repo = SurrealAccountRepository::new(db);

    repo.create(employer_input("hr@acme.test")).await.unwrap();
    let err = repo.create(employer_input("hr@acme.test")).await.unwrap_err();
    assert!(matches!(err, VouchError::Conflict { .. }), "got: {err:?}");
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let db = setup_db().await;
    let repo = SurrealAccountRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, VouchError::NotFound { .. }));

    let err = repo.get_by_email("nobody@nowhere.test").await.unwrap_err();
    assert!(matches!(err, VouchError::NotFound { .. }));
}

#[tokio::test]
async fn verification_create_get_roundtrip() {
    let db = setup_db().await;
    let repo = SurrealVerificationRepository::new(db);

    let account_id = Uuid::new_v4();
    let record = VerificationRecord::new(account_id, None, false);
    let stored = repo.create(record).await.unwrap();
    assert_eq!(stored.account_id, account_id);
    assert_eq!(stored.revision, 0);

    let fetched = repo.get(account_id).await.unwrap();
    assert_eq!(fetched.account_id, account_id);
    assert!(!fetched.email_verified);
    assert!(fetched.documents.is_empty());
}

#[tokio::test]
async fn verification_double_create_is_a_conflict() {
    let db = setup_db().await;
    let repo = SurrealVerificationRepository::new(db);

    let account_id = Uuid::new_v4();
    repo.create(VerificationRecord::new(account_id, None, false))
        .await
        .unwrap();
    let err = repo
        .create(VerificationRecord::new(account_id, None, false))
        .await
        .unwrap_err();
    assert!(matches!(err, VouchError::Conflict { .. }), "got: {err:?}");
}

#[tokio::test]
async fn save_increments_revision_and_persists_transitions() {
    let db = setup_db().await;
    let repo = SurrealVerificationRepository::new(db);

    let account_id = Uuid::new_v4();
    let mut record = repo
        .create(VerificationRecord::new(account_id, None, false))
        .await
        .unwrap();

    record.confirm_email();
    let saved = repo.save(record).await.unwrap();
    assert_eq!(saved.revision, 1);
    assert!(saved.email_verified);
    assert!(saved.domain_verified);

    let mut next = saved;
    next.submit_id_card("sha256/abc".into()).unwrap();
    let saved = repo.save(next).await.unwrap();
    assert_eq!(saved.revision, 2);
    assert_eq!(saved.pending_items, 1);
    assert_eq!(saved.id_card.file_ref.as_deref(), Some("sha256/abc"));
}

#[tokio::test]
async fn stale_revision_save_is_a_conflict() {
    let db = setup_db().await;
    let repo = SurrealVerificationRepository::new(db);

    let account_id = Uuid::new_v4();
    let record = repo
        .create(VerificationRecord::new(account_id, None, false))
        .await
        .unwrap();

    // Two writers load the same revision.
    let mut first = record.clone();
    let mut second = record;

    first.confirm_email();
    repo.save(first).await.unwrap();

    second.submit_id_card("sha256/abc".into()).unwrap();
    let err = repo.save(second).await.unwrap_err();
    assert!(matches!(err, VouchError::Conflict { .. }), "got: {err:?}");

    // The first write survived untouched.
    let stored = repo.get(account_id).await.unwrap();
    assert!(stored.email_verified);
    assert_eq!(stored.id_card.file_ref, None);
}

#[tokio::test]
async fn save_of_missing_record_is_not_found() {
    let db = setup_db().await;
    let repo = SurrealVerificationRepository::new(db);

    let record = VerificationRecord::new(Uuid::new_v4(), None, false);
    let err = repo.save(record).await.unwrap_err();
    assert!(matches!(err, VouchError::NotFound { .. }));
}

#[tokio::test]
async fn company_business_approval_requires_an_approved_document() {
    let db = setup_db().await;
    let repo = SurrealVerificationRepository::new(db);

    let company_id = Uuid::new_v4();
    assert!(!repo.company_has_business_approval(company_id).await.unwrap());

    let mut record = repo
        .create(VerificationRecord::new(
            Uuid::new_v4(),
            Some(company_id),
            false,
        ))
        .await
        .unwrap();
    let doc_id = record.attach_document(DocumentKind::Gst, "sha256/gst".into());
    let mut record = repo.save(record).await.unwrap();

    // Pending documents do not count.
    assert!(!repo.company_has_business_approval(company_id).await.unwrap());

    record
        .review_document(doc_id, ReviewDecision::Approve)
        .unwrap();
    repo.save(record).await.unwrap();

    assert!(repo.company_has_business_approval(company_id).await.unwrap());
    // Other companies are unaffected.
    assert!(
        !repo
            .company_has_business_approval(Uuid::new_v4())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn list_pending_returns_only_records_with_pending_items() {
    let db = setup_db().await;
    let repo = SurrealVerificationRepository::new(db);

    // One record with a pending card, one fully idle.
    let busy_id = Uuid::new_v4();
    let mut busy = repo
        .create(VerificationRecord::new(busy_id, None, false))
        .await
        .unwrap();
    busy.submit_id_card("sha256/card".into()).unwrap();
    repo.save(busy).await.unwrap();

    repo.create(VerificationRecord::new(Uuid::new_v4(), None, false))
        .await
        .unwrap();

    let page = repo.list_pending(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].account_id, busy_id);
}

#[tokio::test]
async fn list_pending_paginates() {
    let db = setup_db().await;
    let repo = SurrealVerificationRepository::new(db);

    for _ in 0..3 {
        let mut record = repo
            .create(VerificationRecord::new(Uuid::new_v4(), None, false))
            .await
            .unwrap();
        record.submit_id_card("sha256/card".into()).unwrap();
        repo.save(record).await.unwrap();
    }

    let page = repo
        .list_pending(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let rest = repo
        .list_pending(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.total, 3);
    assert_eq!(rest.items.len(), 1);
}

#[tokio::test]
async fn otp_put_replaces_prior_challenge() {
    let db = setup_db().await;
    let repo = SurrealOtpRepository::new(db);

    let account_id = Uuid::new_v4();
    let now = chrono::Utc::now();
    repo.put(OtpChallenge {
        account_id,
        code_hash: "hash-1".into(),
        expires_at: now + chrono::Duration::minutes(10),
        created_at: now,
    })
    .await
    .unwrap();

    repo.put(OtpChallenge {
        account_id,
        code_hash: "hash-2".into(),
        expires_at: now + chrono::Duration::minutes(10),
        created_at: now,
    })
    .await
    .unwrap();

    let stored = repo.get(account_id).await.unwrap();
    assert_eq!(stored.code_hash, "hash-2");
}

#[tokio::test]
async fn otp_delete_removes_challenge() {
    let db = setup_db().await;
    let repo = SurrealOtpRepository::new(db);

    let account_id = Uuid::new_v4();
    let now = chrono::Utc::now();
    repo.put(OtpChallenge {
        account_id,
        code_hash: "hash-1".into(),
        expires_at: now + chrono::Duration::minutes(10),
        created_at: now,
    })
    .await
    .unwrap();

    repo.delete(account_id).await.unwrap();
    let err = repo.get(account_id).await.unwrap_err();
    assert!(matches!(err, VouchError::NotFound { .. }));

    // Deleting an absent challenge is a no-op.
    repo.delete(account_id).await.unwrap();
}

#[tokio::test]
async fn session_roundtrip_and_invalidation() {
    let db = setup_db().await;
    let repo = SurrealSessionRepository::new(db);

    let account_id = Uuid::new_v4();
    let session = repo
        .create(CreateSession {
            account_id,
            token_hash: "token-hash".into(),
            expires_at: chrono::Utc::now() + chrono::Duration::days(30),
        })
        .await
        .unwrap();
    assert_eq!(session.account_id, account_id);

    let fetched = repo.get_by_token_hash("token-hash").await.unwrap();
    assert_eq!(fetched.id, session.id);

    repo.invalidate(session.id).await.unwrap();
    let err = repo.get_by_token_hash("token-hash").await.unwrap_err();
    assert!(matches!(err, VouchError::NotFound { .. }));
}
