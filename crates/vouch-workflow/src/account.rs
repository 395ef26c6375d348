//! Account service — registration, login, logout, and session-token
//! authentication.

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;
use vouch_core::error::{VouchError, VouchResult};
use vouch_core::models::account::{AccountRole, CreateAccount, EmployerAccount};
use vouch_core::models::session::CreateSession;
use vouch_core::models::verification::VerificationRecord;
use vouch_core::repository::{AccountRepository, SessionRepository, VerificationRepository};

use crate::config::WorkflowConfig;
use crate::password;
use crate::token;

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Raw opaque session token (return to client, not stored).
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub session_id: Uuid,
}

/// Account service.
///
/// Generic over repository implementations so that this layer has no
/// dependency on the database crate.
pub struct AccountService<A, V, S>
where
    A: AccountRepository,
    V: VerificationRepository,
    S: SessionRepository,
{
    accounts: A,
    verifications: V,
    sessions: S,
    config: WorkflowConfig,
}

impl<A, V, S> AccountService<A, V, S>
where
    A: AccountRepository,
    V: VerificationRepository,
    S: SessionRepository,
{
    pub fn new(accounts: A, verifications: V, sessions: S, config: WorkflowConfig) -> Self {
        Self {
            accounts,
            verifications,
            sessions,
            config,
        }
    }

    /// Create an account together with its all-default verification
    /// record.
    ///
    /// Inherited business verification is evaluated here, once: the
    /// record starts with `inherited_from_company = true` iff the
    /// account belongs to a company that already holds an approved
    /// legal document under another account. Existing sibling records
    /// are not retroactively flagged.
    pub async fn register(&self, input: CreateAccount) -> VouchResult<EmployerAccount> {
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(VouchError::Validation {
                message: "a valid email address is required".into(),
            });
        }
        if input.password.len() < 12 {
            return Err(VouchError::Validation {
                message: "password must be at least 12 characters".into(),
            });
        }

        let inherited = match input.company_id {
            Some(company_id) => {
                self.verifications
                    .company_has_business_approval(company_id)
                    .await?
            }
            None => false,
        };

        let account = self.accounts.create(input).await?;
        self.verifications
            .create(VerificationRecord::new(
                account.id,
                account.company_id,
                inherited,
            ))
            .await?;

        info!(
            account_id = %account.id,
            inherited_from_company = inherited,
            "account registered"
        );
        Ok(account)
    }

    /// Authenticate with email + password and issue an opaque session
    /// token.
    pub async fn login(&self, email: &str, password: &str) -> VouchResult<LoginOutput> {
        let account = self.accounts.get_by_email(email).await.map_err(|e| match e {
            VouchError::NotFound { .. } => VouchError::AuthenticationFailed {
                reason: "invalid credentials".into(),
            },
            other => other,
        })?;

        let valid = password::verify_password(
            password,
            &account.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(VouchError::AuthenticationFailed {
                reason: "invalid credentials".into(),
            });
        }

        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .sessions
            .create(CreateSession {
                account_id: account.id,
                token_hash,
                expires_at,
            })
            .await?;

        info!(account_id = %account.id, session_id = %session.id, "login");
        Ok(LoginOutput {
            token: raw_token,
            expires_at: session.expires_at,
            session_id: session.id,
        })
    }

    /// Resolve a raw session token to its account.
    ///
    /// Expiry is checked lazily here; an expired session is invalidated
    /// on sight.
    pub async fn authenticate(&self, raw_token: &str) -> VouchResult<EmployerAccount> {
        let token_hash = token::hash_session_token(raw_token);
        let session = self
            .sessions
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                VouchError::NotFound { .. } => VouchError::AuthenticationFailed {
                    reason: "invalid session token".into(),
                },
                other => other,
            })?;

        if session.expires_at <= Utc::now() {
            let _ = self.sessions.invalidate(session.id).await;
            return Err(VouchError::AuthenticationFailed {
                reason: "session expired".into(),
            });
        }

        self.accounts.get_by_id(session.account_id).await
    }

    /// Invalidate the session behind a raw token. A no-op when the
    /// session is already gone, so logout is idempotent.
    pub async fn logout(&self, raw_token: &str) -> VouchResult<()> {
        let token_hash = token::hash_session_token(raw_token);
        match self.sessions.get_by_token_hash(&token_hash).await {
            Ok(session) => self.sessions.invalidate(session.id).await,
            Err(VouchError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Ensure an admin account with the given credentials exists.
    ///
    /// Called once at server startup; safe to call on every boot.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> VouchResult<EmployerAccount> {
        match self.accounts.get_by_email(email).await {
            Ok(existing) => Ok(existing),
            Err(VouchError::NotFound { .. }) => {
                self.register(CreateAccount {
                    email: email.into(),
                    password: password.into(),
                    company_name: "VOUCH Admin".into(),
                    company_id: None,
                    role: AccountRole::Admin,
                })
                .await
            }
            Err(e) => Err(e),
        }
    }
}
