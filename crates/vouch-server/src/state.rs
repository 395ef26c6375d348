//! Shared application state: the two services wired to concrete
//! repository and collaborator implementations.

use std::sync::Arc;

use surrealdb::engine::remote::ws::Client;
use vouch_db::repository::{
    SurrealAccountRepository, SurrealOtpRepository, SurrealSessionRepository,
    SurrealVerificationRepository,
};
use vouch_workflow::{AccountService, VerificationService};

use crate::docstore::FsDocumentStore;
use crate::mailer::SmtpMailer;
use crate::notifier::TracingNotifier;

pub type Accounts = AccountService<
    SurrealAccountRepository<Client>,
    SurrealVerificationRepository<Client>,
    SurrealSessionRepository<Client>,
>;

pub type Verifications = VerificationService<
    SurrealAccountRepository<Client>,
    SurrealVerificationRepository<Client>,
    SurrealOtpRepository<Client>,
    SmtpMailer,
    FsDocumentStore,
    TracingNotifier,
>;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<Accounts>,
    pub verifications: Arc<Verifications>,
}
