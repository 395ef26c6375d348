//! Verification record domain model and its state transitions.
//!
//! The record is the single source of truth for an employer's trust
//! standing. Every transition recomputes the derived `level` and
//! `pending_items` fields before returning, so a persisted record is
//! always internally consistent. Callers never write `level` directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{VouchError, VouchResult};
use crate::level::{TrustLevel, compute_level};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IdCardStatus {
    Absent,
    Pending,
    Approved,
    Rejected,
}

impl IdCardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdCardStatus::Absent => "Absent",
            IdCardStatus::Pending => "Pending",
            IdCardStatus::Approved => "Approved",
            IdCardStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    Gst,
    Cin,
    Msme,
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Gst => "GST",
            DocumentKind::Cin => "CIN",
            DocumentKind::Msme => "MSME",
            DocumentKind::Other => "OTHER",
        }
    }
}

/// The employer's government-issued identity document submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdCard {
    pub status: IdCardStatus,
    pub file_ref: Option<String>,
    pub rejection_reason: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Default for IdCard {
    fn default() -> Self {
        Self {
            status: IdCardStatus::Absent,
            file_ref: None,
            rejection_reason: None,
            uploaded_at: None,
        }
    }
}

/// One uploaded legal business document (GST certificate, CIN, ...).
///
/// Immutable once created, except `status` and `rejection_reason`, which
/// only an admin review transition may change while `status == Pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalDocument {
    pub id: Uuid,
    pub kind: DocumentKind,
    pub file_ref: String,
    pub status: ReviewStatus,
    pub rejection_reason: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// An admin's verdict on a pending item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub account_id: Uuid,
    /// Copied from the owning account at creation; kept here so company-wide
    /// business approval can be queried without a join.
    pub company_id: Option<Uuid>,
    pub email_verified: bool,
    /// Verified together with the email by the OTP step.
    pub domain_verified: bool,
    pub id_card: IdCard,
    /// Insertion order preserved; no upper bound.
    pub documents: Vec<LegalDocument>,
    pub inherited_from_company: bool,
    /// Derived. Recomputed by every transition.
    pub level: TrustLevel,
    /// Derived count of Pending items (id card + documents). Drives the
    /// admin review queue query.
    pub pending_items: u32,
    /// Compare-and-set guard; incremented once per persisted mutation.
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Fresh all-default record for a newly created employer account.
    pub fn new(account_id: Uuid, company_id: Option<Uuid>, inherited_from_company: bool) -> Self {
        Self {
            account_id,
            company_id,
            email_verified: false,
            domain_verified: false,
            id_card: IdCard::default(),
            documents: Vec::new(),
            inherited_from_company,
            level: TrustLevel::Unverified,
            pending_items: 0,
            revision: 0,
            updated_at: Utc::now(),
        }
    }

    fn refresh_derived(&mut self) {
        self.level = compute_level(self);
        let pending_docs = self
            .documents
            .iter()
            .filter(|d| d.status == ReviewStatus::Pending)
            .count() as u32;
        let pending_id = u32::from(self.id_card.status == IdCardStatus::Pending);
        self.pending_items = pending_docs + pending_id;
        self.updated_at = Utc::now();
    }

    /// Mark the account email (and with it the domain) as verified.
    /// Idempotent.
    pub fn confirm_email(&mut self) {
        self.email_verified = true;
        self.domain_verified = true;
        self.refresh_derived();
    }

    /// Record a fresh ID-card submission.
    ///
    /// Replaces a `Pending` or `Rejected` submission; fails once the card
    /// is `Approved` so a reviewed identity cannot be swapped out without
    /// admin involvement.
    pub fn submit_id_card(&mut self, file_ref: String) -> VouchResult<()> {
        if self.id_card.status == IdCardStatus::Approved {
            return Err(VouchError::InvalidTransition {
                entity: "id_card".into(),
                status: IdCardStatus::Approved.as_str().into(),
            });
        }
        self.id_card = IdCard {
            status: IdCardStatus::Pending,
            file_ref: Some(file_ref),
            rejection_reason: None,
            uploaded_at: Some(Utc::now()),
        };
        self.refresh_derived();
        Ok(())
    }

    /// Append a new legal document awaiting review. Returns its id.
    ///
    /// Accepted unconditionally — even before Level 1 — so an employer
    /// never loses an upload; the level calculator simply ignores
    /// approved documents until the identity conditions hold.
    pub fn attach_document(&mut self, kind: DocumentKind, file_ref: String) -> Uuid {
        let id = Uuid::new_v4();
        self.documents.push(LegalDocument {
            id,
            kind,
            file_ref,
            status: ReviewStatus::Pending,
            rejection_reason: None,
            uploaded_at: Utc::now(),
        });
        self.refresh_derived();
        id
    }

    /// Apply an admin verdict to the ID card.
    ///
    /// Only a `Pending` card can be reviewed; `Approved` and `Rejected`
    /// are terminal. A rejection must carry a non-blank reason.
    pub fn review_id_card(&mut self, decision: ReviewDecision) -> VouchResult<()> {
        validate_decision(&decision)?;
        if self.id_card.status != IdCardStatus::Pending {
            return Err(VouchError::InvalidTransition {
                entity: "id_card".into(),
                status: self.id_card.status.as_str().into(),
            });
        }
        match decision {
            ReviewDecision::Approve => {
                self.id_card.status = IdCardStatus::Approved;
                self.id_card.rejection_reason = None;
            }
            ReviewDecision::Reject { reason } => {
                self.id_card.status = IdCardStatus::Rejected;
                self.id_card.rejection_reason = Some(reason);
            }
        }
        self.refresh_derived();
        Ok(())
    }

    /// Apply an admin verdict to one legal document. Returns the document's
    /// kind, for event publication.
    pub fn review_document(
        &mut self,
        document_id: Uuid,
        decision: ReviewDecision,
    ) -> VouchResult<DocumentKind> {
        validate_decision(&decision)?;
        let doc = self
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| VouchError::NotFound {
                entity: "document".into(),
                id: document_id.to_string(),
            })?;
        if doc.status != ReviewStatus::Pending {
            return Err(VouchError::InvalidTransition {
                entity: "document".into(),
                status: doc.status.as_str().into(),
            });
        }
        match decision {
            ReviewDecision::Approve => {
                doc.status = ReviewStatus::Approved;
                doc.rejection_reason = None;
            }
            ReviewDecision::Reject { reason } => {
                doc.status = ReviewStatus::Rejected;
                doc.rejection_reason = Some(reason);
            }
        }
        let kind = doc.kind;
        self.refresh_derived();
        Ok(kind)
    }
}

fn validate_decision(decision: &ReviewDecision) -> VouchResult<()> {
    if let ReviewDecision::Reject { reason } = decision {
        if reason.trim().is_empty() {
            return Err(VouchError::Validation {
                message: "a rejection requires a non-empty reason".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> VerificationRecord {
        VerificationRecord::new(Uuid::new_v4(), None, false)
    }

    fn pending_record() -> VerificationRecord {
        let mut r = record();
        r.submit_id_card("file-1".into()).unwrap();
        r
    }

    #[test]
    fn fresh_record_is_unverified() {
        let r = record();
        assert_eq!(r.level, TrustLevel::Unverified);
        assert_eq!(r.id_card.status, IdCardStatus::Absent);
        assert_eq!(r.pending_items, 0);
        assert_eq!(r.revision, 0);
    }

    #[test]
    fn confirm_email_alone_does_not_raise_level() {
        let mut r = record();
        r.confirm_email();
        assert!(r.email_verified);
        assert!(r.domain_verified);
        assert_eq!(r.level, TrustLevel::Unverified);
    }

    #[test]
    fn id_card_resubmission_replaces_pending_and_rejected() {
        let mut r = pending_record();
        r.submit_id_card("file-2".into()).unwrap();
        assert_eq!(r.id_card.file_ref.as_deref(), Some("file-2"));
        assert_eq!(r.pending_items, 1);

        r.review_id_card(ReviewDecision::Reject {
            reason: "blurry scan".into(),
        })
        .unwrap();
        r.submit_id_card("file-3".into()).unwrap();
        assert_eq!(r.id_card.status, IdCardStatus::Pending);
        assert_eq!(r.id_card.rejection_reason, None);
    }

    #[test]
    fn approved_id_card_cannot_be_resubmitted() {
        let mut r = pending_record();
        r.review_id_card(ReviewDecision::Approve).unwrap();

        let err = r.submit_id_card("file-2".into()).unwrap_err();
        assert!(matches!(err, VouchError::InvalidTransition { .. }));
        assert_eq!(r.id_card.file_ref.as_deref(), Some("file-1"));
    }

    #[test]
    fn approving_an_already_approved_card_fails_and_leaves_record_unchanged() {
        let mut r = pending_record();
        r.confirm_email();
        r.review_id_card(ReviewDecision::Approve).unwrap();
        let before_level = r.level;

        let err = r.review_id_card(ReviewDecision::Approve).unwrap_err();
        assert!(matches!(
            err,
            VouchError::InvalidTransition { ref status, .. } if status == "Approved"
        ));
        assert_eq!(r.level, before_level);
        assert_eq!(r.id_card.status, IdCardStatus::Approved);
    }

    #[test]
    fn blank_rejection_reason_is_a_validation_error() {
        let mut r = pending_record();
        let doc_id = r.attach_document(DocumentKind::Gst, "gst-1".into());

        let err = r
            .review_document(doc_id, ReviewDecision::Reject { reason: "  ".into() })
            .unwrap_err();
        assert!(matches!(err, VouchError::Validation { .. }));
        assert_eq!(r.documents[0].status, ReviewStatus::Pending);
        assert_eq!(r.documents[0].rejection_reason, None);
    }

    #[test]
    fn document_review_is_terminal() {
        let mut r = record();
        let doc_id = r.attach_document(DocumentKind::Cin, "cin-1".into());
        r.review_document(doc_id, ReviewDecision::Approve).unwrap();

        let err = r
            .review_document(
                doc_id,
                ReviewDecision::Reject {
                    reason: "changed my mind".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, VouchError::InvalidTransition { .. }));
        assert_eq!(r.documents[0].status, ReviewStatus::Approved);
    }

    #[test]
    fn reviewing_an_unknown_document_is_not_found() {
        let mut r = record();
        let err = r
            .review_document(Uuid::new_v4(), ReviewDecision::Approve)
            .unwrap_err();
        assert!(matches!(err, VouchError::NotFound { .. }));
    }

    #[test]
    fn same_kind_documents_coexist() {
        let mut r = record();
        let a = r.attach_document(DocumentKind::Gst, "gst-1".into());
        let b = r.attach_document(DocumentKind::Gst, "gst-2".into());
        assert_ne!(a, b);
        assert_eq!(r.documents.len(), 2);
        assert_eq!(r.pending_items, 2);
    }

    #[test]
    fn pending_items_tracks_both_item_kinds() {
        let mut r = pending_record();
        let doc_id = r.attach_document(DocumentKind::Msme, "msme-1".into());
        assert_eq!(r.pending_items, 2);

        r.review_id_card(ReviewDecision::Approve).unwrap();
        assert_eq!(r.pending_items, 1);

        r.review_document(doc_id, ReviewDecision::Approve).unwrap();
        assert_eq!(r.pending_items, 0);
    }

    #[test]
    fn stored_level_matches_recomputation_after_every_transition() {
        let mut r = record();
        r.confirm_email();
        assert_eq!(r.level, compute_level(&r));
        r.submit_id_card("file-1".into()).unwrap();
        assert_eq!(r.level, compute_level(&r));
        r.review_id_card(ReviewDecision::Approve).unwrap();
        assert_eq!(r.level, compute_level(&r));
        let doc_id = r.attach_document(DocumentKind::Gst, "gst-1".into());
        assert_eq!(r.level, compute_level(&r));
        r.review_document(doc_id, ReviewDecision::Approve).unwrap();
        assert_eq!(r.level, compute_level(&r));
        assert_eq!(r.level, TrustLevel::Business);
    }
}
