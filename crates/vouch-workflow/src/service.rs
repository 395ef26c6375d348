//! Verification workflow controller.
//!
//! Every mutation follows the same shape: load the record, apply a
//! transition in `vouch-core` (which recomputes the derived fields),
//! persist with a single compare-and-set save, then publish the
//! matching event. A `Conflict` from the save means another writer won
//! the revision race; it is surfaced, never retried here.

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use vouch_core::error::{VouchError, VouchResult};
use vouch_core::models::account::{AccountRole, EmployerAccount};
use vouch_core::models::event::VerificationEvent;
use vouch_core::models::otp::OtpChallenge;
use vouch_core::models::verification::{DocumentKind, ReviewDecision, VerificationRecord};
use vouch_core::repository::{
    AccountRepository, OtpRepository, PaginatedResult, Pagination, VerificationRepository,
};

use crate::collaborators::{DocumentStore, Mailer, Notifier, Upload};
use crate::config::WorkflowConfig;
use crate::otp;

/// Content types accepted for ID-card and legal-document uploads.
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];

/// Verification workflow service.
///
/// Generic over repository and collaborator implementations so that
/// this layer has no dependency on the database crate or on any
/// transport.
pub struct VerificationService<A, V, O, M, D, N>
where
    A: AccountRepository,
    V: VerificationRepository,
    O: OtpRepository,
    M: Mailer,
    D: DocumentStore,
    N: Notifier,
{
    accounts: A,
    verifications: V,
    otps: O,
    mailer: M,
    documents: D,
    notifier: N,
    config: WorkflowConfig,
}

impl<A, V, O, M, D, N> VerificationService<A, V, O, M, D, N>
where
    A: AccountRepository,
    V: VerificationRepository,
    O: OtpRepository,
    M: Mailer,
    D: DocumentStore,
    N: Notifier,
{
    pub fn new(
        accounts: A,
        verifications: V,
        otps: O,
        mailer: M,
        documents: D,
        notifier: N,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            accounts,
            verifications,
            otps,
            mailer,
            documents,
            notifier,
            config,
        }
    }

    /// Issue a fresh one-time code and dispatch it to the account's
    /// registered email.
    ///
    /// Fails with `RateLimited` while a non-expired challenge exists;
    /// the challenge lifetime doubles as the resend cooldown. Storing
    /// the new challenge atomically replaces any expired leftover, so
    /// at most one code is ever valid per account.
    pub async fn request_otp(&self, account_id: Uuid) -> VouchResult<()> {
        let account = self.accounts.get_by_id(account_id).await?;

        match self.otps.get(account_id).await {
            Ok(existing) if existing.expires_at > Utc::now() => {
                return Err(VouchError::RateLimited);
            }
            Ok(_) | Err(VouchError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let code = otp::generate_code();
        let now = Utc::now();
        self.otps
            .put(OtpChallenge {
                account_id,
                code_hash: otp::hash_code(&code),
                expires_at: now + Duration::seconds(self.config.otp_lifetime_secs as i64),
                created_at: now,
            })
            .await?;

        if let Err(e) = self.mailer.send_otp(&account.email, &code).await {
            // Undo the challenge so a failed delivery doesn't start the
            // resend cooldown.
            let _ = self.otps.delete(account_id).await;
            return Err(e);
        }

        info!(account_id = %account_id, "OTP issued");
        Ok(())
    }

    /// Validate a submitted code against the account's outstanding
    /// challenge.
    ///
    /// Expiry is checked lazily here — there is no background sweeper.
    /// On success the challenge is consumed, the record's email and
    /// domain flags are set, and the updated record is returned.
    pub async fn verify_otp(
        &self,
        account_id: Uuid,
        submitted_code: &str,
    ) -> VouchResult<VerificationRecord> {
        let challenge = self.otps.get(account_id).await.map_err(|e| match e {
            VouchError::NotFound { .. } => VouchError::OtpExpired,
            other => other,
        })?;

        if challenge.expires_at <= Utc::now() {
            let _ = self.otps.delete(account_id).await;
            return Err(VouchError::OtpExpired);
        }

        if otp::hash_code(submitted_code.trim()) != challenge.code_hash {
            return Err(VouchError::InvalidOtp);
        }

        // Single-use: consume before mutating the record.
        self.otps.delete(account_id).await?;

        let mut record = self.verifications.get(account_id).await?;
        record.confirm_email();
        let saved = self.verifications.save(record).await?;

        info!(account_id = %account_id, level = saved.level.as_u8(), "email verified");
        self.publish(account_id, VerificationEvent::EmailVerified { level: saved.level })
            .await;
        Ok(saved)
    }

    /// Store an ID-card upload and mark it pending review.
    pub async fn upload_id_card(
        &self,
        account_id: Uuid,
        upload: Upload,
    ) -> VouchResult<VerificationRecord> {
        self.validate_upload(&upload)?;
        let file_ref = self.documents.store(&upload).await?;

        let mut record = self.verifications.get(account_id).await?;
        record.submit_id_card(file_ref)?;
        let saved = self.verifications.save(record).await?;

        info!(account_id = %account_id, "id card submitted");
        Ok(saved)
    }

    /// Store a legal-document upload and append it, pending review.
    /// Returns the new document's id alongside the updated record.
    pub async fn upload_document(
        &self,
        account_id: Uuid,
        kind: DocumentKind,
        upload: Upload,
    ) -> VouchResult<(Uuid, VerificationRecord)> {
        self.validate_upload(&upload)?;
        let file_ref = self.documents.store(&upload).await?;

        let mut record = self.verifications.get(account_id).await?;
        let document_id = record.attach_document(kind, file_ref);
        let saved = self.verifications.save(record).await?;

        info!(
            account_id = %account_id,
            document_id = %document_id,
            kind = kind.as_str(),
            "legal document submitted"
        );
        Ok((document_id, saved))
    }

    /// Current record snapshot. Read-only; repeated calls without an
    /// interleaved mutation return identical snapshots.
    pub async fn status(&self, account_id: Uuid) -> VouchResult<VerificationRecord> {
        self.verifications.get(account_id).await
    }

    /// All accounts with at least one pending item, oldest update
    /// first. Admin-scoped.
    pub async fn list_pending(
        &self,
        caller: &EmployerAccount,
        pagination: Pagination,
    ) -> VouchResult<PaginatedResult<VerificationRecord>> {
        require_admin(caller)?;
        self.verifications.list_pending(pagination).await
    }

    /// Apply an admin verdict to an account's pending ID card.
    pub async fn review_id_card(
        &self,
        caller: &EmployerAccount,
        account_id: Uuid,
        decision: ReviewDecision,
    ) -> VouchResult<VerificationRecord> {
        require_admin(caller)?;

        let mut record = self.verifications.get(account_id).await?;
        let event_reason = match &decision {
            ReviewDecision::Approve => None,
            ReviewDecision::Reject { reason } => Some(reason.clone()),
        };
        record.review_id_card(decision)?;
        let saved = self.verifications.save(record).await?;

        let event = match event_reason {
            None => VerificationEvent::IdCardApproved { level: saved.level },
            Some(reason) => VerificationEvent::IdCardRejected {
                reason,
                level: saved.level,
            },
        };
        info!(
            account_id = %account_id,
            reviewer = %caller.id,
            level = saved.level.as_u8(),
            approved = matches!(event, VerificationEvent::IdCardApproved { .. }),
            "id card reviewed"
        );
        self.publish(account_id, event).await;
        Ok(saved)
    }

    /// Apply an admin verdict to one pending legal document.
    pub async fn review_document(
        &self,
        caller: &EmployerAccount,
        account_id: Uuid,
        document_id: Uuid,
        decision: ReviewDecision,
    ) -> VouchResult<VerificationRecord> {
        require_admin(caller)?;

        let mut record = self.verifications.get(account_id).await?;
        let event_reason = match &decision {
            ReviewDecision::Approve => None,
            ReviewDecision::Reject { reason } => Some(reason.clone()),
        };
        let kind = record.review_document(document_id, decision)?;
        let saved = self.verifications.save(record).await?;

        let event = match event_reason {
            None => VerificationEvent::DocumentApproved {
                document_id,
                kind,
                level: saved.level,
            },
            Some(reason) => VerificationEvent::DocumentRejected {
                document_id,
                kind,
                reason,
                level: saved.level,
            },
        };
        info!(
            account_id = %account_id,
            document_id = %document_id,
            reviewer = %caller.id,
            level = saved.level.as_u8(),
            "legal document reviewed"
        );
        self.publish(account_id, event).await;
        Ok(saved)
    }

    /// Resolve an account's submitted ID card to a retrievable URL for
    /// review.
    pub async fn id_card_file_url(
        &self,
        caller: &EmployerAccount,
        account_id: Uuid,
    ) -> VouchResult<String> {
        require_admin(caller)?;
        let record = self.verifications.get(account_id).await?;
        let file_ref = record.id_card.file_ref.as_deref().ok_or_else(|| {
            VouchError::NotFound {
                entity: "id_card".into(),
                id: account_id.to_string(),
            }
        })?;
        self.documents.resolve(file_ref).await
    }

    /// Resolve one legal document to a retrievable URL for review.
    pub async fn document_file_url(
        &self,
        caller: &EmployerAccount,
        account_id: Uuid,
        document_id: Uuid,
    ) -> VouchResult<String> {
        require_admin(caller)?;
        let record = self.verifications.get(account_id).await?;
        let document = record
            .documents
            .iter()
            .find(|d| d.id == document_id)
            .ok_or_else(|| VouchError::NotFound {
                entity: "document".into(),
                id: document_id.to_string(),
            })?;
        self.documents.resolve(&document.file_ref).await
    }

    fn validate_upload(&self, upload: &Upload) -> VouchResult<()> {
        if upload.data.is_empty() {
            return Err(VouchError::Validation {
                message: "uploaded file is empty".into(),
            });
        }
        if upload.data.len() > self.config.max_upload_bytes {
            return Err(VouchError::Validation {
                message: format!(
                    "file exceeds the {} byte upload limit",
                    self.config.max_upload_bytes
                ),
            });
        }
        if !ALLOWED_CONTENT_TYPES.contains(&upload.content_type.as_str()) {
            return Err(VouchError::Validation {
                message: format!(
                    "unsupported content type '{}'; expected JPEG, PNG, or PDF",
                    upload.content_type
                ),
            });
        }
        Ok(())
    }

    /// Notification delivery is best-effort; a failed dispatch never
    /// rolls back the persisted transition.
    async fn publish(&self, account_id: Uuid, event: VerificationEvent) {
        if let Err(e) = self.notifier.notify(account_id, &event).await {
            warn!(account_id = %account_id, error = %e, "notification dispatch failed");
        }
    }
}

fn require_admin(caller: &EmployerAccount) -> VouchResult<()> {
    if caller.role != AccountRole::Admin {
        return Err(VouchError::Forbidden {
            reason: "admin role required".into(),
        });
    }
    Ok(())
}
