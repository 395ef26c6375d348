//! VOUCH Server — application entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vouch_db::DbManager;
use vouch_db::repository::{
    SurrealAccountRepository, SurrealOtpRepository, SurrealSessionRepository,
    SurrealVerificationRepository,
};
use vouch_workflow::{AccountService, VerificationService};

use crate::config::ServerConfig;
use crate::docstore::FsDocumentStore;
use crate::mailer::SmtpMailer;
use crate::notifier::TracingNotifier;
use crate::state::AppState;

mod config;
mod docstore;
mod error;
mod extract;
mod mailer;
mod notifier;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    let config = ServerConfig::init();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.rust_log))
        .json()
        .init();

    tracing::info!("Starting VOUCH server...");

    let db = DbManager::connect(&config.db_config())
        .await
        .expect("Failed to connect to SurrealDB");
    vouch_db::run_migrations(db.client())
        .await
        .expect("Failed to run migrations");

    let client = db.client().clone();
    let account_repo = match &config.pepper {
        Some(pepper) => SurrealAccountRepository::with_pepper(client.clone(), pepper.clone()),
        None => SurrealAccountRepository::new(client.clone()),
    };
    let verification_repo = SurrealVerificationRepository::new(client.clone());
    let otp_repo = SurrealOtpRepository::new(client.clone());
    let session_repo = SurrealSessionRepository::new(client);

    let accounts = AccountService::new(
        account_repo.clone(),
        verification_repo.clone(),
        session_repo,
        config.workflow_config(),
    );
    let verifications = VerificationService::new(
        account_repo,
        verification_repo,
        otp_repo,
        SmtpMailer::new(&config).expect("Failed to build mailer"),
        FsDocumentStore::new(config.document_dir.clone()),
        TracingNotifier,
        config.workflow_config(),
    );

    accounts
        .ensure_admin(&config.admin_email, &config.admin_password)
        .await
        .expect("Failed to bootstrap admin account");

    let state = AppState {
        accounts: Arc::new(accounts),
        verifications: Arc::new(verifications),
    };
    let app = routes::init_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("SERVER_HOST/SERVER_PORT must form a valid address");
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
