//! Notification events published after verification milestones.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::level::TrustLevel;
use crate::models::verification::DocumentKind;

/// Typed event handed to the notification dispatcher after a mutation
/// that the affected employer should hear about. Every variant carries
/// the trust level the record ended up at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum VerificationEvent {
    EmailVerified {
        level: TrustLevel,
    },
    IdCardApproved {
        level: TrustLevel,
    },
    IdCardRejected {
        reason: String,
        level: TrustLevel,
    },
    DocumentApproved {
        document_id: Uuid,
        kind: DocumentKind,
        level: TrustLevel,
    },
    DocumentRejected {
        document_id: Uuid,
        kind: DocumentKind,
        reason: String,
        level: TrustLevel,
    },
}
