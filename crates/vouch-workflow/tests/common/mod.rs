//! Shared test fixtures: in-memory database, real repositories, and
//! recording stub collaborators.

use std::sync::{Arc, Mutex};

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use vouch_core::error::{VouchError, VouchResult};
use vouch_core::models::account::{AccountRole, CreateAccount, EmployerAccount};
use vouch_core::models::event::VerificationEvent;
use vouch_db::repository::{
    SurrealAccountRepository, SurrealOtpRepository, SurrealSessionRepository,
    SurrealVerificationRepository,
};
use vouch_workflow::{
    AccountService, DocumentStore, Mailer, Notifier, Upload, VerificationService, WorkflowConfig,
};

/// Mailer stub that records every (recipient, code) pair.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingMailer {
    pub fn last_code(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .expect("no mail was sent")
            .1
            .clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send_otp(&self, to: &str, code: &str) -> VouchResult<()> {
        self.sent.lock().unwrap().push((to.into(), code.into()));
        Ok(())
    }
}

/// Mailer stub that always fails delivery.
#[derive(Clone, Default)]
pub struct FailingMailer;

impl Mailer for FailingMailer {
    async fn send_otp(&self, _to: &str, _code: &str) -> VouchResult<()> {
        Err(VouchError::Internal("smtp unreachable".into()))
    }
}

/// In-memory document store handing out sequential file references.
#[derive(Clone, Default)]
pub struct MemDocumentStore {
    count: Arc<Mutex<u64>>,
}

impl DocumentStore for MemDocumentStore {
    async fn store(&self, upload: &Upload) -> VouchResult<String> {
        let mut count = self.count.lock().unwrap();
        *count += 1;
        Ok(format!("mem/{}/{}", count, upload.file_name))
    }

    async fn resolve(&self, file_ref: &str) -> VouchResult<String> {
        Ok(format!("mem://{file_ref}"))
    }
}

/// Notifier stub that records every dispatched event.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub events: Arc<Mutex<Vec<(Uuid, VerificationEvent)>>>,
}

impl RecordingNotifier {
    pub fn last_event(&self) -> VerificationEvent {
        self.events
            .lock()
            .unwrap()
            .last()
            .expect("no event was published")
            .1
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, account_id: Uuid, event: &VerificationEvent) -> VouchResult<()> {
        self.events.lock().unwrap().push((account_id, event.clone()));
        Ok(())
    }
}

pub type TestAccountService = AccountService<
    SurrealAccountRepository<Db>,
    SurrealVerificationRepository<Db>,
    SurrealSessionRepository<Db>,
>;

pub type TestVerificationService<M = RecordingMailer> = VerificationService<
    SurrealAccountRepository<Db>,
    SurrealVerificationRepository<Db>,
    SurrealOtpRepository<Db>,
    M,
    MemDocumentStore,
    RecordingNotifier,
>;

pub struct TestEnv {
    pub accounts: TestAccountService,
    pub service: TestVerificationService,
    pub mailer: RecordingMailer,
    pub notifier: RecordingNotifier,
    pub otp_repo: SurrealOtpRepository<Db>,
    pub verification_repo: SurrealVerificationRepository<Db>,
    pub session_repo: SurrealSessionRepository<Db>,
    pub db: Surreal<Db>,
}

/// Spin up an in-memory DB, run migrations, and wire both services to
/// real repositories with recording collaborators.
pub async fn setup() -> TestEnv {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vouch_db::run_migrations(&db).await.unwrap();

    let account_repo = SurrealAccountRepository::new(db.clone());
    let verification_repo = SurrealVerificationRepository::new(db.clone());
    let otp_repo = SurrealOtpRepository::new(db.clone());
    let session_repo = SurrealSessionRepository::new(db.clone());

    let mailer = RecordingMailer::default();
    let notifier = RecordingNotifier::default();

    TestEnv {
        accounts: AccountService::new(
            account_repo.clone(),
            verification_repo.clone(),
            session_repo.clone(),
            WorkflowConfig::default(),
        ),
        service: VerificationService::new(
            account_repo,
            verification_repo.clone(),
            otp_repo.clone(),
            mailer.clone(),
            MemDocumentStore::default(),
            notifier.clone(),
            WorkflowConfig::default(),
        ),
        mailer,
        notifier,
        otp_repo,
        verification_repo,
        session_repo,
        db,
    }
}

pub fn employer_input(email: &str, company_id: Option<Uuid>) -> CreateAccount {
    CreateAccount {
        email: email.into(),
        password: "correct-horse-battery".into(),
        company_name: "Test Staffing Ltd".into(),
        company_id,
        role: AccountRole::Employer,
    }
}

/// Register a plain employer account.
pub async fn register_employer(env: &TestEnv, email: &str) -> EmployerAccount {
    env.accounts.register(employer_input(email, None)).await.unwrap()
}

/// Register the reviewing admin.
pub async fn register_admin(env: &TestEnv) -> EmployerAccount {
    env.accounts
        .ensure_admin("admin@vouch.test", "admin-password-123")
        .await
        .unwrap()
}

/// A well-formed upload that passes validation.
pub fn png_upload(name: &str) -> Upload {
    Upload {
        file_name: name.into(),
        content_type: "image/png".into(),
        data: vec![0u8; 1024],
    }
}

/// Drive the account through the OTP flow with the real emailed code.
pub async fn verify_email(env: &TestEnv, account_id: Uuid) {
    env.service.request_otp(account_id).await.unwrap();
    let code = env.mailer.last_code();
    env.service.verify_otp(account_id, &code).await.unwrap();
}
