//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Misses surface as
//! [`VouchError::NotFound`](crate::error::VouchError::NotFound) rather
//! than `Option`, so callers translate absence into their own domain
//! error exactly once.

use uuid::Uuid;

use crate::error::VouchResult;
use crate::models::{
    account::{CreateAccount, EmployerAccount},
    otp::OtpChallenge,
    session::{CreateSession, Session},
    verification::VerificationRecord,
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait AccountRepository: Send + Sync {
    /// Create an account. The raw password in the input is hashed with
    /// Argon2id by the implementation; it is never stored.
    fn create(
        &self,
        input: CreateAccount,
    ) -> impl Future<Output = VouchResult<EmployerAccount>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VouchResult<EmployerAccount>> + Send;
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = VouchResult<EmployerAccount>> + Send;
}

pub trait VerificationRepository: Send + Sync {
    /// Persist a freshly built record. Fails with `Conflict` if the
    /// account already has one.
    fn create(
        &self,
        record: VerificationRecord,
    ) -> impl Future<Output = VouchResult<VerificationRecord>> + Send;

    fn get(&self, account_id: Uuid) -> impl Future<Output = VouchResult<VerificationRecord>> + Send;

    /// Persist a mutated record with a single compare-and-set write
    /// keyed on `record.revision`. Returns the stored copy (revision
    /// incremented); a revision mismatch fails with `Conflict` and is
    /// never retried here.
    fn save(
        &self,
        record: VerificationRecord,
    ) -> impl Future<Output = VouchResult<VerificationRecord>> + Send;

    /// Whether any account of the given company already holds an
    /// approved legal document.
    fn company_has_business_approval(
        &self,
        company_id: Uuid,
    ) -> impl Future<Output = VouchResult<bool>> + Send;

    /// All records with at least one pending item, oldest update first.
    fn list_pending(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = VouchResult<PaginatedResult<VerificationRecord>>> + Send;
}

pub trait OtpRepository: Send + Sync {
    /// Store a challenge, atomically replacing any prior challenge for
    /// the same account.
    fn put(&self, challenge: OtpChallenge) -> impl Future<Output = VouchResult<()>> + Send;
    fn get(&self, account_id: Uuid) -> impl Future<Output = VouchResult<OtpChallenge>> + Send;
    /// Remove the account's challenge (consumption or lazy expiry).
    fn delete(&self, account_id: Uuid) -> impl Future<Output = VouchResult<()>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = VouchResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = VouchResult<Session>> + Send;
    fn invalidate(&self, id: Uuid) -> impl Future<Output = VouchResult<()>> + Send;
}
