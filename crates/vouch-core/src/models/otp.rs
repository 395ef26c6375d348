//! OTP challenge domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending email-ownership challenge.
///
/// At most one challenge exists per account: storing a new one replaces
/// any prior unconsumed challenge. Only the SHA-256 hash of the 6-digit
/// code is persisted; the raw code exists only in the delivery email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub account_id: Uuid,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
